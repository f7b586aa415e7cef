//! Hot-seat game in the terminal, on the local adapter.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;
use farkle::domain::roller::ChaChaRoller;
use farkle::domain::rules::{Rules, WINNING_SCORE};
use farkle::domain::snapshot::RoomSnapshot;
use farkle::domain::state::BankEvent;
use farkle::errors::domain::DomainError;
use farkle::services::LocalGame;
use farkle::sync::IntentEffect;
use farkle::telemetry;

#[derive(Parser)]
#[command(name = "solo")]
#[command(about = "Play 5000 against friends on one terminal")]
struct Args {
    /// Comma-separated player names, in turn order
    #[arg(long, value_delimiter = ',', default_value = "Player")]
    players: Vec<String>,

    /// Points a player's first bank must reach
    #[arg(long, default_value_t = 0)]
    min_entry: u32,

    /// Exact score that wins
    #[arg(long, default_value_t = WINNING_SCORE)]
    target: u32,

    /// Fixed RNG seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Pause before a roll is shown
    #[arg(long, default_value_t = 600)]
    reveal_delay_ms: u64,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Roll,
    Bank,
    /// Zero-based die index.
    Hold(usize),
    Quit,
}

const HELP: &str = "commands: r = roll, b = bank (or pass), h <1-5> = hold/release a die, q = quit";

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let cmd = match words.next()? {
        "r" => Command::Roll,
        "b" => Command::Bank,
        "q" => Command::Quit,
        "h" => {
            let n: usize = words.next()?.parse().ok()?;
            Command::Hold(n.checked_sub(1)?)
        }
        _ => return None,
    };
    words.next().is_none().then_some(cmd)
}

fn render(snap: &RoomSnapshot) {
    println!();
    for p in &snap.players {
        let marker = if p.is_current { '>' } else { ' ' };
        println!("{marker} {:<20} {:>5}", p.name, p.score);
    }

    let dice: Vec<String> = snap
        .turn
        .dice
        .dice()
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let tag = match (d.held, d.scoring) {
                (true, true) => "+",
                (true, false) => "#",
                (false, true) => "*",
                (false, false) => " ",
            };
            format!("{}:{}{tag}", i + 1, d.face)
        })
        .collect();
    println!("  dice  {}", dice.join("  "));
    println!(
        "  table {} (banked this turn {}, this roll {})",
        snap.turn.points_on_table, snap.turn.turn_accumulated, snap.turn.current_roll
    );
    if let Some(text) = &snap.turn.message_text {
        println!("  {text}");
    }
}

fn describe(effect: &IntentEffect, snap: &RoomSnapshot) {
    let name_of = |id: &str| {
        snap.players
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    };
    match effect {
        IntentEffect::Banked(BankEvent::Passed { .. }) => println!("  dice passed"),
        IntentEffect::Banked(BankEvent::EntryNotMet {
            points, min_entry, ..
        }) => println!("  {points} is below the {min_entry} needed to get on the board"),
        IntentEffect::Banked(BankEvent::Overshot { points, .. }) => {
            println!("  {points} would overshoot; score unchanged")
        }
        IntentEffect::Banked(BankEvent::Banked {
            player_id,
            points,
            bumped,
            ..
        }) => {
            println!("  {} banks {points}", name_of(player_id));
            for id in bumped {
                println!("  {} is bumped back to 0!", name_of(id));
            }
        }
        _ => {}
    }
}

fn reason(err: &DomainError) -> &str {
    match err {
        DomainError::Validation(_, detail)
        | DomainError::Conflict(_, detail)
        | DomainError::NotFound(_, detail)
        | DomainError::Infra(_, detail)
        | DomainError::Invariant(detail) => detail,
    }
}

/// Rules for this table; a target nobody can reach is refused up front.
fn table_rules(target: u32, min_entry: u32) -> Result<Rules, String> {
    if target == 0 {
        return Err("--target must be positive".to_string());
    }
    if min_entry > target {
        return Err(format!(
            "--min-entry {min_entry} is above --target {target}; nobody could win"
        ));
    }
    Ok(Rules::default().with_min_entry(min_entry).with_target(target))
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn main() -> ExitCode {
    telemetry::init_cli_tracing();
    let args = Args::parse();

    let rules = match table_rules(args.target, args.min_entry) {
        Ok(rules) => rules,
        Err(msg) => {
            eprintln!("❌ {msg}");
            return ExitCode::FAILURE;
        }
    };
    let roller = match args.seed {
        Some(seed) => ChaChaRoller::seeded(seed),
        None => ChaChaRoller::from_entropy(),
    };
    let mut game = match LocalGame::start(&args.players, rules, roller) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("❌ {}", reason(&e));
            return ExitCode::FAILURE;
        }
    };
    let delay = Duration::from_millis(args.reveal_delay_ms);

    println!("{HELP}");
    render(&game.snapshot());
    prompt();

    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        let result = match parse_command(&line) {
            None => {
                println!("{HELP}");
                prompt();
                continue;
            }
            Some(Command::Quit) => break,
            Some(Command::Roll) => {
                println!("  rolling...");
                let result = game.roll();
                thread::sleep(delay);
                result
            }
            Some(Command::Bank) => game.bank(),
            Some(Command::Hold(index)) => game.toggle_hold(index),
        };

        let snap = game.snapshot();
        match result {
            Ok(effect) => describe(&effect, &snap),
            Err(e) => println!("  ✗ {}", reason(&e)),
        }
        render(&snap);
        if game.is_finished() {
            return ExitCode::SUCCESS;
        }
        prompt();
    }
    ExitCode::SUCCESS
}
