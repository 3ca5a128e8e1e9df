use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use super::filter::{self, ScheduleQuery};
use super::store::TimetableStore;
use crate::models::{DepartureType, RouteEntry};

pub const NO_DEPARTURES: &str = "Ingen avganger";

/// Route labels keyed by route id
#[derive(Debug, Clone, Default)]
pub struct RouteDirectory {
    routes: HashMap<i64, RouteEntry>,
}

impl RouteDirectory {
    pub fn new(routes: impl IntoIterator<Item = RouteEntry>) -> Self {
        Self {
            routes: routes.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    pub fn get(&self, route_id: i64) -> Option<&RouteEntry> {
        self.routes.get(&route_id)
    }

    /// All routes ordered by route number
    pub fn entries(&self) -> Vec<RouteEntry> {
        let mut entries: Vec<RouteEntry> = self.routes.values().cloned().collect();
        entries.sort_by_key(|r| (r.num, r.id));
        entries
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingError {
    #[error("Unknown route: {0}")]
    UnknownRoute(i64),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingRow {
    pub id: i64,
    pub route_number: u32,
    pub weekday: String,
    pub from: String,
    pub to: String,
    /// HH:MM
    pub time: String,
    #[serde(rename = "type")]
    pub departure_type: DepartureType,
    pub highlight: String,
}

/// Admin timetable view for one route
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleListing {
    pub title: String,
    pub subtitle: String,
    pub rows: Vec<ListingRow>,
    /// Set when there is nothing to show
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

pub fn build(
    store: &TimetableStore,
    routes: &RouteDirectory,
    query: &ScheduleQuery,
) -> Result<ScheduleListing, ListingError> {
    let route = routes
        .get(query.route_id)
        .ok_or(ListingError::UnknownRoute(query.route_id))?;

    let days = query
        .effective_weekdays()
        .iter()
        .map(|d| d.norwegian_name())
        .collect::<Vec<_>>()
        .join(", ");

    let rows: Vec<ListingRow> = filter::filter(store, query)
        .into_iter()
        .map(|record| {
            // Rows share the queried route, so its labels apply to every row
            ListingRow {
                id: record.id,
                route_number: route.num,
                weekday: record.weekday.norwegian_name().to_string(),
                from: route.from.clone(),
                to: route.to.clone(),
                time: record.time.short(),
                departure_type: record.departure_type,
                highlight: record.departure_type.highlight().to_string(),
            }
        })
        .collect();

    Ok(ScheduleListing {
        title: format!("Rute {}: {} → {}", route.num, route.from, route.to),
        subtitle: format!("{} fra kl. {}", days, query.min_time.short()),
        empty_message: rows.is_empty().then(|| NO_DEPARTURES.to_string()),
        rows,
    })
}
