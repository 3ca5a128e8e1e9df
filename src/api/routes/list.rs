use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::error::{error_response, ApiError, ErrorResponse};
use crate::api::AppState;
use crate::models::RouteEntry;

#[derive(Debug, Serialize, ToSchema)]
pub struct RouteListResponse {
    pub routes: Vec<RouteEntry>,
}

/// List the route directory used to label departures
#[utoipa::path(
    get,
    path = "/api/routes",
    responses(
        (status = 200, description = "Routes ordered by route number", body = RouteListResponse)
    ),
    tag = "routes"
)]
pub async fn list_routes(State(state): State<AppState>) -> Json<RouteListResponse> {
    Json(RouteListResponse {
        routes: state.routes.entries(),
    })
}

/// Get a single route
#[utoipa::path(
    get,
    path = "/api/routes/{route_id}",
    params(
        ("route_id" = i64, Path, description = "Route ID")
    ),
    responses(
        (status = 200, description = "Route details", body = RouteEntry),
        (status = 404, description = "Route not found", body = ErrorResponse)
    ),
    tag = "routes"
)]
pub async fn get_route(
    State(state): State<AppState>,
    Path(route_id): Path<i64>,
) -> Result<Json<RouteEntry>, ApiError> {
    state
        .routes
        .get(route_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Route not found"))
}
