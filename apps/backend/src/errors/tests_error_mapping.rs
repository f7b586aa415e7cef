// Unit tests for error mapping - pure domain logic without HTTP or database dependencies
use actix_web::body::to_bytes;
use actix_web::ResponseError;

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::store::StoreError;
use crate::errors::ErrorCode;
use crate::AppError;

#[test]
fn maps_rule_violations() {
    let app: AppError = DomainError::validation(ValidationKind::OutOfTurn, "not yours").into();
    assert_eq!(app.code(), ErrorCode::OutOfTurn);
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError =
        DomainError::validation(ValidationKind::InvalidSelection, "partial triple").into();
    assert_eq!(app.code(), ErrorCode::InvalidSelection);
    assert_eq!(app.status().as_u16(), 400);

    let app: AppError = DomainError::validation(ValidationKind::NotHost, "host only").into();
    assert_eq!(app.status().as_u16(), 403);
}

#[test]
fn maps_conflicts() {
    let app: AppError =
        DomainError::conflict(ConflictKind::RetriesExhausted, "gave up").into();
    assert_eq!(app.code().as_str(), "RETRIES_EXHAUSTED");
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError = DomainError::conflict(ConflictKind::Other("x".into()), "generic").into();
    assert_eq!(app.code(), ErrorCode::Conflict);
}

#[test]
fn maps_not_found() {
    let app: AppError = DomainError::not_found(NotFoundKind::Room, "no room").into();
    assert_eq!(app.code().as_str(), "ROOM_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);
}

#[test]
fn maps_invariants_and_infra() {
    let app: AppError = DomainError::invariant("no seated player").into();
    assert_eq!(app.code(), ErrorCode::InvariantViolation);
    assert_eq!(app.status().as_u16(), 500);

    let app: AppError = DomainError::infra(InfraErrorKind::DataCorruption, "bad json").into();
    assert_eq!(app.code(), ErrorCode::DataCorruption);

    let app: AppError = StoreError::AlreadyExists("ABC".into()).into();
    assert_eq!(app.code(), ErrorCode::RoomCodeTaken);

    let app: AppError = StoreError::Corrupt {
        code: "ABC".into(),
        detail: "expected an array of length 5".into(),
    }
    .into();
    assert_eq!(app.code(), ErrorCode::DataCorruption);
    assert_eq!(app.status().as_u16(), 500);
}

#[actix_web::test]
async fn renders_problem_details() {
    let app: AppError = DomainError::validation(ValidationKind::RollAfterFarkle, "busted").into();
    let resp = app.error_response();
    assert_eq!(resp.status().as_u16(), 409);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/problem+json"
    );

    let body = to_bytes(resp.into_body()).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "ROLL_AFTER_FARKLE");
    assert_eq!(json["title"], "Roll After Farkle");
    assert_eq!(json["detail"], "busted");
    assert_eq!(json["status"], 409);
    assert_eq!(json["trace_id"], "unknown");
}
