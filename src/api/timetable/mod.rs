pub mod edit;
pub mod list;

use utoipa_axum::{router::OpenApiRouter, routes};

use crate::api::AppState;

pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list::list_departures, edit::create_departure))
        .routes(routes!(
            edit::get_departure,
            edit::update_departure,
            edit::delete_departure
        ))
}
