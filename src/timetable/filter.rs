use std::collections::HashSet;

use super::store::TimetableStore;
use crate::models::{DepartureRecord, DepartureTime, Weekday};

/// Selection for a filtered timetable view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleQuery {
    pub route_id: i64,
    pub min_time: DepartureTime,
    /// Empty means every day of the week
    pub weekdays: Vec<Weekday>,
}

impl ScheduleQuery {
    pub fn new(route_id: i64) -> Self {
        Self {
            route_id,
            min_time: DepartureTime::MIDNIGHT,
            weekdays: Vec::new(),
        }
    }

    /// The weekdays actually selected, in calendar order
    pub fn effective_weekdays(&self) -> Vec<Weekday> {
        if self.weekdays.is_empty() {
            return Weekday::ALL.to_vec();
        }

        let mut days = self.weekdays.clone();
        days.sort();
        days.dedup();
        days
    }
}

/// Departures of one route on the selected days at or after `min_time`,
/// cancelled ones excluded, ordered by time of day.
pub fn filter(store: &TimetableStore, query: &ScheduleQuery) -> Vec<DepartureRecord> {
    let days: HashSet<Weekday> = query.effective_weekdays().into_iter().collect();

    let mut matches: Vec<DepartureRecord> = store
        .records()
        .iter()
        .filter(|r| {
            r.route_id == query.route_id
                && days.contains(&r.weekday)
                && r.time >= query.min_time
                && r.departure_type.is_listed()
        })
        .cloned()
        .collect();

    // Stable, so equal times keep insertion order
    matches.sort_by_key(|r| r.time);
    matches
}
