use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{error_response, timetable_error, ApiError, ErrorResponse};
use crate::api::AppState;
use crate::models::{DepartureRecord, DepartureTime, DepartureType, Weekday};
use crate::timetable::notification::{self, Notification};

/// Admin form submission
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartureInput {
    pub route_id: i64,
    pub weekday: Weekday,
    /// HH:MM or HH:MM:SS
    #[schema(value_type = String, example = "08:00")]
    pub time: DepartureTime,
    #[serde(rename = "type")]
    pub departure_type: DepartureType,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SavedDeparture {
    pub record: DepartureRecord,
    pub notification: Notification,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedDeparture {
    pub id: i64,
    /// False when no departure had this id
    pub removed: bool,
    pub notification: Notification,
}

/// Save a new departure
#[utoipa::path(
    post,
    path = "/api/timetable",
    request_body = DepartureInput,
    responses(
        (status = 201, description = "Departure saved", body = SavedDeparture),
        (status = 409, description = "An active departure already exists for this route, weekday and time", body = ErrorResponse)
    ),
    tag = "timetable"
)]
pub async fn create_departure(
    State(state): State<AppState>,
    Json(input): Json<DepartureInput>,
) -> Result<(StatusCode, Json<SavedDeparture>), ApiError> {
    let record = state
        .timetable
        .write()
        .await
        .upsert(input.route_id, input.weekday, input.time, input.departure_type)
        .map_err(timetable_error)?;

    Ok((
        StatusCode::CREATED,
        Json(SavedDeparture {
            record,
            notification: Notification::success(notification::SAVED),
        }),
    ))
}

/// Load a departure into the edit form
#[utoipa::path(
    get,
    path = "/api/timetable/{id}",
    params(
        ("id" = i64, Path, description = "Departure ID")
    ),
    responses(
        (status = 200, description = "Departure to edit", body = DepartureRecord),
        (status = 404, description = "Departure not found", body = ErrorResponse)
    ),
    tag = "timetable"
)]
pub async fn get_departure(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DepartureRecord>, ApiError> {
    state
        .timetable
        .read()
        .await
        .begin_edit(id)
        .map(Json)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Departure not found"))
}

/// Resubmit an edited departure; the saved record gets a new id
#[utoipa::path(
    put,
    path = "/api/timetable/{id}",
    params(
        ("id" = i64, Path, description = "ID of the departure being edited")
    ),
    request_body = DepartureInput,
    responses(
        (status = 200, description = "Departure replaced", body = SavedDeparture),
        (status = 409, description = "An active departure already exists for this route, weekday and time", body = ErrorResponse)
    ),
    tag = "timetable"
)]
pub async fn update_departure(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<DepartureInput>,
) -> Result<Json<SavedDeparture>, ApiError> {
    let record = state
        .timetable
        .write()
        .await
        .update(
            id,
            input.route_id,
            input.weekday,
            input.time,
            input.departure_type,
        )
        .map_err(timetable_error)?;

    Ok(Json(SavedDeparture {
        record,
        notification: Notification::success(notification::SAVED),
    }))
}

/// Delete a departure. Unknown ids are not an error.
#[utoipa::path(
    delete,
    path = "/api/timetable/{id}",
    params(
        ("id" = i64, Path, description = "Departure ID")
    ),
    responses(
        (status = 200, description = "Departure deleted", body = DeletedDeparture)
    ),
    tag = "timetable"
)]
pub async fn delete_departure(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Json<DeletedDeparture> {
    let removed = state.timetable.write().await.remove(id);

    Json(DeletedDeparture {
        id,
        removed: removed.is_some(),
        notification: Notification::success(notification::DELETED),
    })
}
