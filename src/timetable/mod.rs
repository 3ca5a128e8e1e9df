pub mod filter;
pub mod listing;
pub mod notification;
pub mod store;

pub use filter::ScheduleQuery;
pub use listing::{ListingError, RouteDirectory, ScheduleListing};
pub use notification::Severity;
pub use store::{TimetableError, TimetableStore};

use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to the admin timetable
pub type TimetableHandle = Arc<RwLock<TimetableStore>>;
