pub mod list;

use utoipa_axum::{router::OpenApiRouter, routes};

use crate::api::AppState;

pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list::list_routes))
        .routes(routes!(list::get_route))
}
