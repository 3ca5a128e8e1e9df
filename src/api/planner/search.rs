use axum::{extract::State, Json};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::api::error::{planner_error, ApiError, ErrorResponse};
use crate::api::AppState;
use crate::planner::models::{DepartureSearchRequest, DepartureView, Stop};
use crate::planner::{SearchForm, SearchInput};

pub const NO_ROUTES_FOUND: &str = "Ingen ruter funnet.";

#[derive(Debug, Serialize, ToSchema)]
pub struct StopListResponse {
    pub stops: Vec<Stop>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// The request as sent to the planner after defaults were applied
    pub request: DepartureSearchRequest,
    pub departures: Vec<DepartureView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

/// List stops available for the search form
#[utoipa::path(
    get,
    path = "/api/planner/stops",
    responses(
        (status = 200, description = "Stops known to the planner", body = StopListResponse),
        (status = 502, description = "Planner unavailable", body = ErrorResponse)
    ),
    tag = "planner"
)]
pub async fn list_stops(State(state): State<AppState>) -> Result<Json<StopListResponse>, ApiError> {
    let stops = state.planner.stops().await.map_err(planner_error)?;
    Ok(Json(StopListResponse { stops }))
}

/// Search stop-to-stop departures
#[utoipa::path(
    post,
    path = "/api/planner/search",
    request_body = SearchInput,
    responses(
        (status = 200, description = "Matching departures", body = SearchResponse),
        (status = 502, description = "Planner unavailable", body = ErrorResponse)
    ),
    tag = "planner"
)]
pub async fn search_departures(
    State(state): State<AppState>,
    Json(input): Json<SearchInput>,
) -> Result<Json<SearchResponse>, ApiError> {
    let now = chrono::Local::now().naive_local();
    let form = SearchForm::from_input(input, now);
    debug!(
        date = %form.date(),
        time = %form.time(),
        mode = ?form.mode(),
        "Searching departures"
    );
    let request = form.to_request();

    let departures: Vec<DepartureView> = state
        .planner
        .search(&request)
        .await
        .map_err(planner_error)?
        .into_iter()
        .map(DepartureView::from)
        .collect();

    Ok(Json(SearchResponse {
        request,
        empty_message: departures
            .is_empty()
            .then(|| NO_ROUTES_FOUND.to_string()),
        departures,
    }))
}
