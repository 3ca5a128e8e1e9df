use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use utoipa::ToSchema;

use super::models::{DepartureSearchRequest, TimeMode};
use crate::models::DepartureTime;

/// Search form as submitted by a rider; blank fields fall back to defaults
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    pub from_stop: String,
    pub to_stop: String,
    #[serde(default)]
    pub travel_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, example = "08:30")]
    #[serde(default)]
    pub travel_time: Option<DepartureTime>,
    #[serde(default)]
    pub time_mode: Option<TimeMode>,
}

/// Date, time and time-mode state of the departure search form.
///
/// NOW is only available while the selected date is today; moving the date
/// away from today in NOW mode falls back to DEPART.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchForm {
    pub from_stop: String,
    pub to_stop: String,
    date: NaiveDate,
    time: DepartureTime,
    mode: TimeMode,
}

impl SearchForm {
    /// Fresh form: today's date, current time to the minute, NOW mode
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            from_stop: String::new(),
            to_stop: String::new(),
            date: now.date(),
            time: current_minute(now),
            mode: TimeMode::Now,
        }
    }

    /// Apply a submitted form on top of the defaults
    pub fn from_input(input: SearchInput, now: NaiveDateTime) -> Self {
        let mut form = Self::new(now);
        form.from_stop = input.from_stop.trim().to_string();
        form.to_stop = input.to_stop.trim().to_string();

        if let Some(date) = input.travel_date {
            form.set_date(date, now);
        }
        if let Some(time) = input.travel_time {
            form.set_time(time, now);
        }
        match input.time_mode.unwrap_or_default() {
            TimeMode::Now => {
                // Refused on another day, which leaves the form in DEPART
                form.select_now(now);
            }
            TimeMode::Depart => form.select_depart(),
            TimeMode::Arrival => form.select_arrival(),
        }
        form
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> DepartureTime {
        self.time
    }

    pub fn mode(&self) -> TimeMode {
        self.mode
    }

    /// Switch to NOW and reset the time; refused unless the date is today
    pub fn select_now(&mut self, now: NaiveDateTime) -> bool {
        if self.date != now.date() {
            if self.mode == TimeMode::Now {
                self.mode = TimeMode::Depart;
            }
            return false;
        }
        self.mode = TimeMode::Now;
        self.time = current_minute(now);
        true
    }

    pub fn select_depart(&mut self) {
        self.mode = TimeMode::Depart;
    }

    pub fn select_arrival(&mut self) {
        self.mode = TimeMode::Arrival;
    }

    pub fn set_date(&mut self, date: NaiveDate, now: NaiveDateTime) {
        self.date = date;
        self.leave_now_if_not_today(now);
    }

    pub fn set_time(&mut self, time: DepartureTime, now: NaiveDateTime) {
        self.time = time;
        self.leave_now_if_not_today(now);
    }

    pub fn to_request(&self) -> DepartureSearchRequest {
        DepartureSearchRequest {
            from_stop: self.from_stop.clone(),
            to_stop: self.to_stop.clone(),
            travel_date: self.date,
            travel_time: self.time,
            time_mode: self.mode,
        }
    }

    fn leave_now_if_not_today(&mut self, now: NaiveDateTime) {
        if self.mode == TimeMode::Now && self.date != now.date() {
            self.mode = TimeMode::Depart;
        }
    }
}

fn current_minute(now: NaiveDateTime) -> DepartureTime {
    use chrono::Timelike;
    DepartureTime::from_hms(now.hour(), now.minute(), 0).unwrap_or(DepartureTime::MIDNIGHT)
}
