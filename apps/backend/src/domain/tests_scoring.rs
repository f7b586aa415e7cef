use crate::domain::dice::DiceSet;
use crate::domain::scoring::{score_dice, score_subset, RollScore};

fn dice(symbols: &str) -> DiceSet {
    DiceSet::parse(symbols).expect("valid dice symbols")
}

fn scored(symbols: &str) -> RollScore {
    score_dice(&dice(symbols))
}

#[test]
fn hand_computed_table() {
    let cases: &[(&str, u32, &[usize])] = &[
        ("AAAKK", 1100, &[0, 1, 2, 3, 4]),
        ("KKK66", 500, &[0, 1, 2]),
        ("666QQ", 100, &[0, 1, 2]),
        ("QQQJJ", 400, &[0, 1, 2]),
        ("JJJ67", 300, &[0, 1, 2]),
        ("777AK", 350, &[0, 1, 2, 3, 4]),
        ("A6A7A", 1000, &[0, 2, 4]),
        ("AAAAK", 1150, &[0, 1, 2, 3, 4]),
        ("KKKKK", 600, &[0, 1, 2, 3, 4]),
        ("KAKAK", 700, &[0, 1, 2, 3, 4]),
        ("JQ7K6", 50, &[3]),
        ("6Q6Q6", 100, &[0, 2, 4]),
    ];
    for (symbols, points, idx) in cases {
        let got = scored(symbols);
        assert_eq!(got.points, *points, "points for {symbols}");
        assert_eq!(got.scoring, idx.to_vec(), "indices for {symbols}");
    }
}

#[test]
fn no_triple_and_no_ace_or_king_is_a_farkle() {
    let got = scored("67JQQ");
    assert_eq!(got.points, 0);
    assert!(got.scoring.is_empty());
    assert!(got.is_farkle());
}

#[test]
fn triple_marks_lowest_positions_first() {
    // Four aces: positions 0, 2, 3 form the triple and 4 scores alone.
    let got = scored("A6AAA");
    assert_eq!(got.points, 1100);
    assert_eq!(got.scoring, vec![0, 2, 3, 4]);
}

#[test]
fn held_dice_are_ignored() {
    let mut set = dice("AAAKK");
    set.dice_mut()[0].held = true;
    let got = score_dice(&set);
    // A A K K without a triple: singles only.
    assert_eq!(got.points, 300);
    assert_eq!(got.scoring, vec![1, 2, 3, 4]);
}

#[test]
fn held_dice_do_not_complete_a_triple() {
    let mut set = dice("QQQ67");
    set.dice_mut()[2].held = true;
    assert_eq!(score_dice(&set), RollScore::default());
}

#[test]
fn all_held_scores_zero_with_no_indices() {
    let mut set = dice("AAAAA");
    for d in set.dice_mut().iter_mut() {
        d.held = true;
    }
    let got = score_dice(&set);
    assert_eq!(got.points, 0);
    assert!(got.scoring.is_empty());
}

#[test]
fn subset_scores_only_the_named_dice() {
    let set = dice("QQQ6A");
    assert_eq!(score_subset(&set, &[0, 1]).points, 0);

    let triple = score_subset(&set, &[0, 1, 2]);
    assert_eq!(triple.points, 400);
    assert_eq!(triple.scoring, vec![0, 1, 2]);

    let ace = score_subset(&set, &[4]);
    assert_eq!(ace.points, 100);
    assert_eq!(ace.scoring, vec![4]);

    // Engine input untouched.
    assert_eq!(score_dice(&set).points, 500);
}
