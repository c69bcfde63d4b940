//! Tracks whether the input form is creating a new record or editing an existing one.

use crate::model::{Record, RecordFields, RecordId};
use crate::storage::Backend;
use crate::store::RecordStore;
use crate::{Error, Result};
use tracing::debug;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing is loaded; a commit creates a new record.
    #[default]
    Idle,
    /// The record with this id is loaded; a commit updates it.
    Editing(RecordId),
}

/// The add/edit state machine behind the input form.
#[derive(Debug, Default, Clone)]
pub struct EditSession {
    state: SessionState,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The id being edited, if any.
    pub fn editing(&self) -> Option<RecordId> {
        match self.state {
            SessionState::Idle => None,
            SessionState::Editing(id) => Some(id),
        }
    }

    /// Loads `record` for editing and returns its current fields so the caller can fill the form.
    /// Beginning an edit while another is in progress switches to the new record.
    pub fn begin_edit(&mut self, record: &Record) -> RecordFields {
        debug!("Editing record {}", record.id());
        self.state = SessionState::Editing(record.id());
        record.fields()
    }

    /// Creates a record when idle, or updates the record being edited. Returns to `Idle` on
    /// success.
    ///
    /// On a validation or not-found error the session keeps its state so the user can correct
    /// the input. On a persistence error the change has already been applied to the store, so
    /// the session returns to `Idle` and the error is passed on.
    pub fn commit<B: Backend>(
        &mut self,
        store: &mut RecordStore<B>,
        fields: RecordFields,
    ) -> Result<Record> {
        let result = match self.state {
            SessionState::Idle => store.create(fields),
            SessionState::Editing(id) => store.update(id, fields),
        };
        match &result {
            Ok(_) | Err(Error::Persistence(_)) => self.state = SessionState::Idle,
            Err(_) => {}
        }
        result
    }

    /// Discards the edit in progress. The caller must also discard its form values.
    pub fn cancel(&mut self) {
        self.state = SessionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use crate::storage::tests::BrokenBackend;
    use crate::storage::{MemoryBackend, Persistence};
    use chrono::NaiveDate;

    fn store() -> RecordStore<MemoryBackend> {
        RecordStore::open(Persistence::new(MemoryBackend::new()))
    }

    fn lunch() -> RecordFields {
        RecordFields::new("Lunch", -15, NaiveDate::from_ymd_opt(2026, 2, 9), Some("Food"))
    }

    #[test]
    fn test_commit_when_idle_creates() {
        let mut store = store();
        let mut session = EditSession::new();
        let record = session.commit(&mut store, lunch()).unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(store.list(), &[record]);
    }

    #[test]
    fn test_edit_flow() {
        let mut store = store();
        let mut session = EditSession::new();
        let record = session.commit(&mut store, lunch()).unwrap();

        let mut fields = session.begin_edit(&record);
        assert_eq!(session.state(), SessionState::Editing(record.id()));
        assert_eq!(fields, lunch());

        fields.amount = Amount::from(-18);
        let updated = session.commit(&mut store, fields).unwrap();
        assert_eq!(updated.id(), record.id());
        assert_eq!(updated.amount(), Amount::from(-18));
        assert_eq!(session.editing(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut store = store();
        let mut session = EditSession::new();
        let record = session.commit(&mut store, lunch()).unwrap();
        let _ = session.begin_edit(&record);
        session.cancel();
        assert_eq!(session.state(), SessionState::Idle);

        // Cancelling when idle is harmless
        session.cancel();
        assert_eq!(session.state(), SessionState::Idle);

        // The next commit creates rather than updates
        let _ = session.commit(&mut store, lunch()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_failed_commit_keeps_state() {
        let mut store = store();
        let mut session = EditSession::new();
        let record = session.commit(&mut store, lunch()).unwrap();
        let mut fields = session.begin_edit(&record);
        fields.description = "  ".to_string();

        assert!(session.commit(&mut store, fields).is_err());
        assert_eq!(session.state(), SessionState::Editing(record.id()));
        assert_eq!(store.get(record.id()), Some(&record));
    }

    #[test]
    fn test_commit_after_record_deleted_elsewhere() {
        let mut store = store();
        let mut session = EditSession::new();
        let record = session.commit(&mut store, lunch()).unwrap();
        let fields = session.begin_edit(&record);
        let _ = store.delete(record.id()).unwrap();

        let err = session.commit(&mut store, fields).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(session.state(), SessionState::Editing(record.id()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_persistence_failure_returns_to_idle() {
        let mut store = RecordStore::open(Persistence::new(BrokenBackend));
        let mut session = EditSession::new();
        let err = session.commit(&mut store, lunch()).unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(store.len(), 1);
    }
}
