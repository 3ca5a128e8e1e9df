use serde::Serialize;
use utoipa::ToSchema;

use crate::models::DepartureRecord;

pub const SAVED: &str = "Avgang lagret";
pub const DELETED: &str = "Avgang slettet";
pub const EDITING: &str = "Endre og lagre";
pub const DUPLICATE: &str = "Avgang finnes allerede";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// Message shown in the transient feedback banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// What happened to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Saved(DepartureRecord),
    /// `removed` is `None` when the id was not present
    Deleted { id: i64, removed: Option<DepartureRecord> },
    Replaced {
        previous: DepartureRecord,
        current: DepartureRecord,
    },
    EditStarted(DepartureRecord),
    Rejected,
}

impl StoreChange {
    /// Whether listings derived from the store need to be rebuilt
    pub fn mutates(&self) -> bool {
        match self {
            StoreChange::Saved(_) | StoreChange::Replaced { .. } => true,
            StoreChange::Deleted { removed, .. } => removed.is_some(),
            StoreChange::EditStarted(_) | StoreChange::Rejected => false,
        }
    }
}

/// Delivered to every subscribed listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub change: StoreChange,
    pub notification: Notification,
}

pub type Listener = Box<dyn Fn(&StoreEvent) + Send + Sync>;
