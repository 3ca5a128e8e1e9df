use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Day of the week a departure runs on
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "MONDAY",
            Weekday::Tuesday => "TUESDAY",
            Weekday::Wednesday => "WEDNESDAY",
            Weekday::Thursday => "THURSDAY",
            Weekday::Friday => "FRIDAY",
            Weekday::Saturday => "SATURDAY",
            Weekday::Sunday => "SUNDAY",
        }
    }

    /// Label used in admin listings
    pub fn norwegian_name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Mandag",
            Weekday::Tuesday => "Tirsdag",
            Weekday::Wednesday => "Onsdag",
            Weekday::Thursday => "Torsdag",
            Weekday::Friday => "Fredag",
            Weekday::Saturday => "Lørdag",
            Weekday::Sunday => "Søndag",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseValueError::Weekday(s.to_string()))
    }
}

/// Run-type of a departure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepartureType {
    Regular,
    Extra,
    /// Suppressed for the date; exempt from the duplicate rule
    Omitted,
    /// Excluded from filtered listings
    Cancelled,
}

impl DepartureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepartureType::Regular => "REGULAR",
            DepartureType::Extra => "EXTRA",
            DepartureType::Omitted => "OMITTED",
            DepartureType::Cancelled => "CANCELLED",
        }
    }

    /// Whether a record of this type takes part in the business key uniqueness check
    pub fn blocks_duplicates(&self) -> bool {
        !matches!(self, DepartureType::Omitted)
    }

    pub fn is_listed(&self) -> bool {
        !matches!(self, DepartureType::Cancelled)
    }

    /// Text colour used when the type is rendered in a listing
    pub fn highlight(&self) -> &'static str {
        match self {
            DepartureType::Extra => "green",
            DepartureType::Omitted => "red",
            DepartureType::Regular | DepartureType::Cancelled => "black",
        }
    }
}

impl fmt::Display for DepartureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time of day of a departure, normalized to whole seconds.
///
/// Serialized as "HH:MM:SS". Parsing accepts "HH:MM" (as entered in the
/// admin form) and "HH:MM:SS" with optional fractional seconds, which are
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepartureTime(NaiveTime);

impl DepartureTime {
    pub const MIDNIGHT: DepartureTime = DepartureTime(NaiveTime::MIN);

    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(DepartureTime)
    }

    pub fn from_naive(time: NaiveTime) -> Self {
        // Drop sub-second precision so the string form stays fixed width
        DepartureTime(time.with_nanosecond(0).unwrap_or(time))
    }

    /// "HH:MM" form shown to users
    pub fn short(&self) -> String {
        self.0.format("%H:%M").to_string()
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

impl FromStr for DepartureTime {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map(DepartureTime::from_naive)
            .map_err(|_| ParseValueError::Time(s.to_string()))
    }
}

impl Serialize for DepartureTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DepartureTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseValueError {
    #[error("Unknown weekday: {0}")]
    Weekday(String),
    #[error("Invalid time of day (expected HH:MM or HH:MM:SS): {0}")]
    Time(String),
}

/// One scheduled trip instance in the admin timetable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartureRecord {
    pub id: i64,
    pub route_id: i64,
    pub weekday: Weekday,
    #[schema(value_type = String, example = "08:00:00")]
    pub time: DepartureTime,
    #[serde(rename = "type")]
    pub departure_type: DepartureType,
}

impl DepartureRecord {
    /// (routeId, weekday, time) triple used by the duplicate check
    pub fn business_key(&self) -> (i64, Weekday, DepartureTime) {
        (self.route_id, self.weekday, self.time)
    }
}

/// Route directory entry used to label departures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RouteEntry {
    pub id: i64,
    pub num: u32,
    pub from: String,
    pub to: String,
}
