use axum::{http::StatusCode, Json};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::planner::PlannerError;
use crate::timetable::{ListingError, TimetableError};

pub const PLANNER_UNAVAILABLE: &str = "Kunne ikke hente data fra ruteplanleggeren";

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Helper to log error and return generic internal server error
pub fn internal_error<E: std::fmt::Display>(err: E) -> ApiError {
    error!("Internal error: {}", err);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

pub fn timetable_error(err: TimetableError) -> ApiError {
    match err {
        TimetableError::Duplicate { .. } => error_response(StatusCode::CONFLICT, err.to_string()),
        TimetableError::DuplicateId(_) | TimetableError::IdsExhausted(_) => internal_error(err),
    }
}

pub fn listing_error(err: ListingError) -> ApiError {
    match err {
        ListingError::UnknownRoute(_) => error_response(StatusCode::NOT_FOUND, err.to_string()),
    }
}

/// Remote planner failures are reported with a generic advisory message
pub fn planner_error(err: PlannerError) -> ApiError {
    warn!(error = %err, "Planner request failed");
    error_response(StatusCode::BAD_GATEWAY, PLANNER_UNAVAILABLE)
}
