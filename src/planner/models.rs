use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::DepartureTime;

pub const NO_MESSAGES: &str = "Ingen";

/// A stop as listed by the remote planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Stop {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeMode {
    /// Travel right away
    #[default]
    Now,
    /// Leave from the origin at the given time
    Depart,
    /// Arrive at the destination by the given time
    Arrival,
}

/// Payload sent to the remote departure search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartureSearchRequest {
    pub from_stop: String,
    pub to_stop: String,
    pub travel_date: NaiveDate,
    #[schema(value_type = String, example = "08:30:00")]
    pub travel_time: DepartureTime,
    pub time_mode: TimeMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSavings {
    /// Grams of CO2
    pub emission_saved: f64,
    /// Kroner
    pub cost_saved: f64,
}

/// One result of the remote departure search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartureResult {
    pub route_number: u32,
    pub from_stop_name: String,
    pub to_stop_name: String,
    #[schema(value_type = String)]
    pub planned_departure: DepartureTime,
    #[schema(value_type = String)]
    pub arrival_time: DepartureTime,
    #[serde(default)]
    pub delay_minutes: i32,
    #[serde(default)]
    pub operation_message: Option<String>,
    pub environment_savings: EnvironmentSavings,
}

/// Search result ready for the results list and detail page
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartureView {
    pub route_number: u32,
    pub from_stop_name: String,
    pub to_stop_name: String,
    /// HH:MM
    pub departure: String,
    /// HH:MM
    pub arrival: String,
    pub delay_minutes: i32,
    pub operation_message: String,
    pub emission_saved: f64,
    pub cost_saved: f64,
}

impl From<DepartureResult> for DepartureView {
    fn from(result: DepartureResult) -> Self {
        let operation_message = result
            .operation_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| NO_MESSAGES.to_string());

        Self {
            route_number: result.route_number,
            departure: result.planned_departure.short(),
            arrival: result.arrival_time.short(),
            from_stop_name: result.from_stop_name,
            to_stop_name: result.to_stop_name,
            delay_minutes: result.delay_minutes,
            operation_message,
            emission_saved: result.environment_savings.emission_saved,
            cost_saved: result.environment_savings.cost_saved,
        }
    }
}

/// One route of the full daily schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteSchedule {
    pub route_number: u32,
    pub from_stop_name: String,
    pub to_stop_name: String,
    #[serde(default)]
    pub stops: Vec<String>,
    #[schema(value_type = Vec<String>)]
    #[serde(default)]
    pub planned_departures: Vec<DepartureTime>,
}

/// Carousel card for one route of the daily schedule
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleCard {
    pub route_number: u32,
    pub from_stop_name: String,
    pub to_stop_name: String,
    /// Stop names joined with " - ", empty when the route has no stop list
    pub stops: String,
    /// HH:MM
    pub times: Vec<String>,
}

impl From<RouteSchedule> for ScheduleCard {
    fn from(schedule: RouteSchedule) -> Self {
        Self {
            route_number: schedule.route_number,
            stops: schedule.stops.join(" - "),
            times: schedule
                .planned_departures
                .iter()
                .map(DepartureTime::short)
                .collect(),
            from_stop_name: schedule.from_stop_name,
            to_stop_name: schedule.to_stop_name,
        }
    }
}
