use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::api::error::{planner_error, ApiError, ErrorResponse};
use crate::api::AppState;
use crate::planner::models::ScheduleCard;
use crate::planner::{Carousel, Step};

pub const NO_DEPARTURES_TODAY: &str = "Ingen avganger i dag.";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CarouselQuery {
    /// Card currently shown; defaults to the first card
    pub index: Option<usize>,
    /// Navigation applied from `index`
    pub step: Option<Step>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FullScheduleResponse {
    pub cards: Vec<ScheduleCard>,
    /// Index of the card to display, absent when there are no cards
    pub current: Option<usize>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

/// Full daily schedule as carousel cards, one per route
#[utoipa::path(
    get,
    path = "/api/planner/full-schedule",
    params(CarouselQuery),
    responses(
        (status = 200, description = "Daily schedule cards", body = FullScheduleResponse),
        (status = 502, description = "Planner unavailable", body = ErrorResponse)
    ),
    tag = "planner"
)]
pub async fn full_schedule(
    State(state): State<AppState>,
    Query(query): Query<CarouselQuery>,
) -> Result<Json<FullScheduleResponse>, ApiError> {
    let schedules = state.planner.full_schedule().await.map_err(planner_error)?;

    let mut carousel = Carousel::new(schedules.into_iter().map(ScheduleCard::from).collect());
    carousel.seek(query.index.unwrap_or(0));
    if let Some(step) = query.step {
        carousel.step(step);
    }

    if let Some(card) = carousel.current() {
        debug!(
            index = ?carousel.index(),
            route = card.route_number,
            "Showing schedule card"
        );
    }

    let current = carousel.index();
    let total = carousel.len();
    Ok(Json(FullScheduleResponse {
        empty_message: carousel
            .is_empty()
            .then(|| NO_DEPARTURES_TODAY.to_string()),
        cards: carousel.into_cards(),
        current,
        total,
    }))
}
