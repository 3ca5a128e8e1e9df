pub mod schedule;
pub mod search;

use utoipa_axum::{router::OpenApiRouter, routes};

use crate::api::AppState;

pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(search::list_stops))
        .routes(routes!(search::search_departures))
        .routes(routes!(schedule::full_schedule))
}
