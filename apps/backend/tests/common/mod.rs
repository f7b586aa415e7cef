#![allow(dead_code)]

use std::sync::Arc;

use farkle::domain::roller::ScriptedRoller;
use farkle::domain::rules::Rules;
use farkle::state::AppState;
use farkle::store::MemoryRoomStore;
use farkle::sync::RetryPolicy;
use farkle::ws::RoomSessionRegistry;
use farkle::RoomService;

// Logging is auto-installed for every test binary that includes this module
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Memory-backed state whose dice replay `script` forever.
pub fn memory_state(script: &str) -> AppState {
    AppState::new(Arc::new(scripted_service(script, Rules::default())), None)
}

pub fn scripted_service(script: &str, rules: Rules) -> RoomService {
    RoomService::new(
        Arc::new(MemoryRoomStore::new()),
        rules,
        RetryPolicy::default(),
        Arc::new(RoomSessionRegistry::new()),
    )
    .with_roller(Box::new(ScriptedRoller::parse(script)))
}

/// Full app with the production routes and request tracing.
#[macro_export]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(farkle::RequestTrace)
                .app_data(actix_web::web::Data::new($state))
                .configure(farkle::routes::configure),
        )
        .await
    };
}
