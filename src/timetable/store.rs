use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use super::notification::{self, Listener, Notification, StoreChange, StoreEvent};
use crate::models::{DepartureRecord, DepartureTime, DepartureType, Weekday};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimetableError {
    #[error("Avgang finnes allerede")]
    Duplicate {
        route_id: i64,
        weekday: Weekday,
        time: DepartureTime,
    },
    #[error("Departure id {0} appears more than once")]
    DuplicateId(i64),
    #[error("No departure id left after {0}")]
    IdsExhausted(i64),
}

/// Ordered in-memory timetable for the admin view.
///
/// Records keep insertion order. For any (route, weekday, time) at most one
/// record whose type is not OMITTED may exist.
#[derive(Default)]
pub struct TimetableStore {
    records: Vec<DepartureRecord>,
    listeners: Vec<Listener>,
}

impl fmt::Debug for TimetableStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimetableStore")
            .field("records", &self.records)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl TimetableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the store from an externally loaded timetable.
    ///
    /// The loaded records must satisfy the same rules the store enforces on
    /// insert: unique ids and no two active records on one business key.
    pub fn from_records(records: Vec<DepartureRecord>) -> Result<Self, TimetableError> {
        let mut ids = HashSet::with_capacity(records.len());
        let mut keys = HashSet::with_capacity(records.len());
        for record in &records {
            if !ids.insert(record.id) {
                return Err(TimetableError::DuplicateId(record.id));
            }
            if record.departure_type.blocks_duplicates() && !keys.insert(record.business_key()) {
                let (route_id, weekday, time) = record.business_key();
                return Err(TimetableError::Duplicate {
                    route_id,
                    weekday,
                    time,
                });
            }
        }

        let mut store = Self::new();
        store.records = records;
        Ok(store)
    }

    pub fn records(&self) -> &[DepartureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Register a callback invoked after every store event
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn find_by_id(&self, id: i64) -> Option<&DepartureRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Load a record into the edit form
    pub fn begin_edit(&self, id: i64) -> Option<DepartureRecord> {
        let record = self.find_by_id(id)?.clone();
        self.emit(
            StoreChange::EditStarted(record.clone()),
            Notification::success(notification::EDITING),
        );
        Some(record)
    }

    /// Insert a new departure, assigning it the next id
    pub fn upsert(
        &mut self,
        route_id: i64,
        weekday: Weekday,
        time: DepartureTime,
        departure_type: DepartureType,
    ) -> Result<DepartureRecord, TimetableError> {
        self.check_duplicate(route_id, weekday, time, departure_type, None)?;

        let record = DepartureRecord {
            id: self.next_id()?,
            route_id,
            weekday,
            time,
            departure_type,
        };
        self.records.push(record.clone());
        debug!(id = record.id, route_id, %weekday, %time, "Departure saved");

        self.emit(
            StoreChange::Saved(record.clone()),
            Notification::success(notification::SAVED),
        );
        Ok(record)
    }

    /// Resubmit an edited departure.
    ///
    /// The record under `id` is replaced by a new record with a fresh id. The
    /// replaced record does not count against the duplicate check. On error
    /// the store is unchanged.
    pub fn update(
        &mut self,
        id: i64,
        route_id: i64,
        weekday: Weekday,
        time: DepartureTime,
        departure_type: DepartureType,
    ) -> Result<DepartureRecord, TimetableError> {
        let Some(position) = self.records.iter().position(|r| r.id == id) else {
            return self.upsert(route_id, weekday, time, departure_type);
        };

        self.check_duplicate(route_id, weekday, time, departure_type, Some(id))?;

        // Computed before removal so the replacement never reuses the old id
        let new_id = self.next_id()?;
        let previous = self.records.remove(position);
        let record = DepartureRecord {
            id: new_id,
            route_id,
            weekday,
            time,
            departure_type,
        };
        self.records.push(record.clone());
        debug!(previous_id = previous.id, id = record.id, "Departure replaced");

        self.emit(
            StoreChange::Replaced {
                previous,
                current: record.clone(),
            },
            Notification::success(notification::SAVED),
        );
        Ok(record)
    }

    /// Delete a departure; deleting an unknown id is a no-op
    pub fn remove(&mut self, id: i64) -> Option<DepartureRecord> {
        let removed = self
            .records
            .iter()
            .position(|r| r.id == id)
            .map(|position| self.records.remove(position));

        debug!(id, found = removed.is_some(), "Departure removed");
        self.emit(
            StoreChange::Deleted {
                id,
                removed: removed.clone(),
            },
            Notification::success(notification::DELETED),
        );
        removed
    }

    fn next_id(&self) -> Result<i64, TimetableError> {
        match self.records.iter().map(|r| r.id).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or(TimetableError::IdsExhausted(max)),
        }
    }

    fn check_duplicate(
        &self,
        route_id: i64,
        weekday: Weekday,
        time: DepartureTime,
        departure_type: DepartureType,
        ignore_id: Option<i64>,
    ) -> Result<(), TimetableError> {
        if !departure_type.blocks_duplicates() {
            return Ok(());
        }

        let exists = self.records.iter().any(|r| {
            Some(r.id) != ignore_id
                && r.departure_type.blocks_duplicates()
                && r.business_key() == (route_id, weekday, time)
        });

        if exists {
            self.emit(
                StoreChange::Rejected,
                Notification::error(notification::DUPLICATE),
            );
            return Err(TimetableError::Duplicate {
                route_id,
                weekday,
                time,
            });
        }

        Ok(())
    }

    fn emit(&self, change: StoreChange, notification: Notification) {
        let event = StoreEvent {
            change,
            notification,
        };
        for listener in &self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::notification::Severity;
    use std::sync::{Arc, Mutex};

    fn time(s: &str) -> DepartureTime {
        s.parse().unwrap()
    }

    fn monday_eight() -> TimetableStore {
        TimetableStore::from_records(vec![DepartureRecord {
            id: 1,
            route_id: 5,
            weekday: Weekday::Monday,
            time: time("08:00:00"),
            departure_type: DepartureType::Regular,
        }])
        .unwrap()
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut store = TimetableStore::new();
        let slots = [
            (1, Weekday::Monday, "06:00"),
            (1, Weekday::Monday, "07:00"),
            (2, Weekday::Tuesday, "07:00"),
            (2, Weekday::Sunday, "23:45"),
        ];

        let mut ids = Vec::new();
        for (route, day, at) in slots {
            ids.push(store.upsert(route, day, time(at), DepartureType::Regular).unwrap().id);
        }

        assert_eq!(store.len(), slots.len());
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn next_id_follows_the_largest_existing_id() {
        let mut store = TimetableStore::from_records(vec![DepartureRecord {
            id: 40,
            route_id: 1,
            weekday: Weekday::Friday,
            time: time("10:00"),
            departure_type: DepartureType::Extra,
        }])
        .unwrap();

        let record = store
            .upsert(1, Weekday::Friday, time("11:00"), DepartureType::Regular)
            .unwrap();
        assert_eq!(record.id, 41);
    }

    #[test]
    fn duplicate_active_departure_is_rejected() {
        let mut store = monday_eight();
        let before = store.records().to_vec();

        let result = store.upsert(5, Weekday::Monday, time("08:00:00"), DepartureType::Regular);
        assert!(matches!(result, Err(TimetableError::Duplicate { route_id: 5, .. })));
        assert_eq!(store.records(), before.as_slice());

        let result = store.upsert(5, Weekday::Monday, time("08:00"), DepartureType::Extra);
        assert!(result.is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn omitted_departure_never_conflicts() {
        let mut store = monday_eight();

        let record = store
            .upsert(5, Weekday::Monday, time("08:00:00"), DepartureType::Omitted)
            .unwrap();
        assert_eq!(record.id, 2);
        assert_eq!(store.len(), 2);

        store
            .upsert(5, Weekday::Monday, time("08:00:00"), DepartureType::Omitted)
            .unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn omitted_record_does_not_block_an_active_one() {
        let mut store = TimetableStore::new();
        store
            .upsert(3, Weekday::Saturday, time("12:00"), DepartureType::Omitted)
            .unwrap();
        assert!(store
            .upsert(3, Weekday::Saturday, time("12:00"), DepartureType::Regular)
            .is_ok());
    }

    #[test]
    fn same_time_on_other_route_or_day_is_allowed() {
        let mut store = monday_eight();
        assert!(store
            .upsert(6, Weekday::Monday, time("08:00"), DepartureType::Regular)
            .is_ok());
        assert!(store
            .upsert(5, Weekday::Tuesday, time("08:00"), DepartureType::Regular)
            .is_ok());
    }

    #[test]
    fn removing_unknown_id_changes_nothing() {
        let mut store = monday_eight();
        assert!(store.remove(99).is_none());
        assert_eq!(store.len(), 1);

        assert!(store.remove(1).is_some());
        assert!(store.is_empty());
        assert!(store.remove(1).is_none());
    }

    #[test]
    fn find_by_id_does_not_mutate() {
        let store = monday_eight();
        assert_eq!(store.find_by_id(1).map(|r| r.route_id), Some(5));
        assert!(store.find_by_id(2).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_replaces_record_under_a_fresh_id() {
        let mut store = monday_eight();

        let record = store
            .update(1, 5, Weekday::Monday, time("09:15"), DepartureType::Extra)
            .unwrap();

        assert_eq!(record.id, 2);
        assert_eq!(store.len(), 1);
        assert!(store.find_by_id(1).is_none());
        assert_eq!(store.find_by_id(2).map(|r| r.time), Some(time("09:15:00")));
    }

    #[test]
    fn resubmitting_unchanged_values_is_not_a_duplicate() {
        let mut store = monday_eight();
        let record = store
            .update(1, 5, Weekday::Monday, time("08:00"), DepartureType::Regular)
            .unwrap();
        assert_eq!(record.id, 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn failed_update_leaves_store_untouched() {
        let mut store = monday_eight();
        store
            .upsert(5, Weekday::Monday, time("09:00"), DepartureType::Regular)
            .unwrap();
        let before = store.records().to_vec();

        let result = store.update(2, 5, Weekday::Monday, time("08:00"), DepartureType::Regular);
        assert!(matches!(result, Err(TimetableError::Duplicate { .. })));
        assert_eq!(store.records(), before.as_slice());
    }

    #[test]
    fn update_of_missing_id_inserts() {
        let mut store = monday_eight();
        let record = store
            .update(77, 5, Weekday::Wednesday, time("08:00"), DepartureType::Regular)
            .unwrap();
        assert_eq!(record.id, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn loading_rejects_repeated_ids() {
        let record = monday_eight().records()[0].clone();
        let result = TimetableStore::from_records(vec![record.clone(), record]);
        assert_eq!(result.unwrap_err(), TimetableError::DuplicateId(1));
    }

    #[test]
    fn loading_rejects_two_active_records_on_one_slot() {
        let record = |id, departure_type| DepartureRecord {
            id,
            route_id: 5,
            weekday: Weekday::Monday,
            time: time("08:00"),
            departure_type,
        };

        let result = TimetableStore::from_records(vec![
            record(1, DepartureType::Regular),
            record(2, DepartureType::Extra),
        ]);
        assert!(matches!(
            result,
            Err(TimetableError::Duplicate { route_id: 5, weekday: Weekday::Monday, .. })
        ));

        let store = TimetableStore::from_records(vec![
            record(1, DepartureType::Omitted),
            record(2, DepartureType::Regular),
            record(3, DepartureType::Omitted),
        ])
        .unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn largest_possible_id_cannot_be_followed() {
        let mut store = TimetableStore::from_records(vec![DepartureRecord {
            id: i64::MAX,
            route_id: 5,
            weekday: Weekday::Monday,
            time: time("08:00"),
            departure_type: DepartureType::Omitted,
        }])
        .unwrap();

        let result = store.upsert(5, Weekday::Tuesday, time("09:00"), DepartureType::Regular);
        assert_eq!(result.unwrap_err(), TimetableError::IdsExhausted(i64::MAX));

        let result = store.update(i64::MAX, 5, Weekday::Monday, time("10:00"), DepartureType::Regular);
        assert_eq!(result.unwrap_err(), TimetableError::IdsExhausted(i64::MAX));
        assert_eq!(store.len(), 1);
        assert!(store.find_by_id(i64::MAX).is_some());
    }

    #[test]
    fn listeners_receive_one_event_per_operation() {
        let events: Arc<Mutex<Vec<StoreEvent>>> = Arc::default();
        let mut store = monday_eight();
        let sink = events.clone();
        store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        store
            .upsert(5, Weekday::Monday, time("10:00"), DepartureType::Regular)
            .unwrap();
        let _ = store.upsert(5, Weekday::Monday, time("10:00"), DepartureType::Regular);
        store.begin_edit(1);
        store.remove(1);
        store.remove(1);

        let events = events.lock().unwrap();
        let messages: Vec<(&str, Severity, bool)> = events
            .iter()
            .map(|e| {
                (
                    e.notification.message.as_str(),
                    e.notification.severity,
                    e.change.mutates(),
                )
            })
            .collect();

        assert_eq!(
            messages,
            vec![
                (notification::SAVED, Severity::Success, true),
                (notification::DUPLICATE, Severity::Error, false),
                (notification::EDITING, Severity::Success, false),
                (notification::DELETED, Severity::Success, true),
                (notification::DELETED, Severity::Success, false),
            ]
        );
    }
}
