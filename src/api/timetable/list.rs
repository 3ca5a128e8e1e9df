use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::error::{error_response, listing_error, ApiError, ErrorResponse};
use crate::api::AppState;
use crate::models::Weekday;
use crate::timetable::{listing, ScheduleListing, ScheduleQuery};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TimetableQuery {
    /// Route to list
    pub route_id: i64,
    /// Earliest departure, HH:MM or HH:MM:SS. Defaults to midnight.
    pub min_time: Option<String>,
    /// Comma separated weekday names (e.g. "MONDAY,FRIDAY"); blank means all days
    pub weekdays: Option<String>,
}

impl TimetableQuery {
    fn to_schedule_query(&self) -> Result<ScheduleQuery, ApiError> {
        let mut query = ScheduleQuery::new(self.route_id);

        if let Some(raw) = self.min_time.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
            query.min_time = raw
                .parse()
                .map_err(|e| error_response(StatusCode::BAD_REQUEST, format!("{}", e)))?;
        }

        query.weekdays = self
            .weekdays
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|day| !day.is_empty())
            .map(|day| day.parse::<Weekday>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| error_response(StatusCode::BAD_REQUEST, e.to_string()))?;

        Ok(query)
    }
}

/// List the departures of one route, filtered by weekday and earliest time
#[utoipa::path(
    get,
    path = "/api/timetable",
    params(TimetableQuery),
    responses(
        (status = 200, description = "Filtered departures ordered by time", body = ScheduleListing),
        (status = 400, description = "Invalid time or weekday", body = ErrorResponse),
        (status = 404, description = "Route not found", body = ErrorResponse)
    ),
    tag = "timetable"
)]
pub async fn list_departures(
    State(state): State<AppState>,
    Query(query): Query<TimetableQuery>,
) -> Result<Json<ScheduleListing>, ApiError> {
    let query = query.to_schedule_query()?;
    let store = state.timetable.read().await;

    let listing = listing::build(&store, &state.routes, &query).map_err(listing_error)?;
    Ok(Json(listing))
}
