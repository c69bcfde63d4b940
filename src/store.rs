//! The record store owns the record set and persists it after every change.

use crate::model::{Record, RecordFields, RecordId};
use crate::storage::{Backend, Persistence};
use crate::{Error, Result};
use chrono::Utc;
use tracing::debug;

/// Owns the list of records. All mutations go through here and each successful mutation saves the
/// full set through the `Persistence` adapter.
///
/// When a save fails the in-memory change is kept and `Error::Persistence` is returned, so the
/// caller can warn that changes may not persist without losing anything the user entered.
#[derive(Debug)]
pub struct RecordStore<B> {
    records: Vec<Record>,
    persistence: Persistence<B>,
}

impl<B: Backend> RecordStore<B> {
    /// Loads the stored records. A missing or corrupt blob gives an empty store.
    pub fn open(persistence: Persistence<B>) -> Self {
        let records = persistence.load();
        Self {
            records,
            persistence,
        }
    }

    /// All records. The order carries no meaning; use `filter::view` for display order.
    pub fn list(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn persistence(&self) -> &Persistence<B> {
        &self.persistence
    }

    /// Validates `fields`, mints a new id and appends the record.
    ///
    /// # Errors
    /// - `Error::Validation` if the description is blank. The store is unchanged.
    /// - `Error::IdsExhausted` if a stored record already holds the largest id. The store is
    ///   unchanged.
    /// - `Error::Persistence` if saving fails. The record has been added in memory.
    pub fn create(&mut self, fields: RecordFields) -> Result<Record> {
        let fields = fields.normalize()?;
        let record = Record::new(self.next_id()?, fields);
        debug!("Creating record {}", record.id());
        self.records.push(record.clone());
        self.persist()?;
        Ok(record)
    }

    /// Replaces every field of the record with `id` except the id itself.
    ///
    /// # Errors
    /// - `Error::Validation` if the description is blank. The store is unchanged.
    /// - `Error::NotFound` if no record has this id. The store is unchanged.
    /// - `Error::Persistence` if saving fails. The update has been applied in memory.
    pub fn update(&mut self, id: RecordId, fields: RecordFields) -> Result<Record> {
        let fields = fields.normalize()?;
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(Error::NotFound(id))?;
        record.replace(fields);
        let updated = record.clone();
        debug!("Updated record {id}");
        self.persist()?;
        Ok(updated)
    }

    /// Removes the record with `id` and returns it.
    ///
    /// # Errors
    /// - `Error::NotFound` if no record has this id. The store is unchanged.
    /// - `Error::Persistence` if saving fails. The record has been removed in memory.
    pub fn delete(&mut self, id: RecordId) -> Result<Record> {
        let ix = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(Error::NotFound(id))?;
        let removed = self.records.remove(ix);
        debug!("Deleted record {id}");
        self.persist()?;
        Ok(removed)
    }

    fn persist(&mut self) -> Result<()> {
        self.persistence.save(&self.records)
    }

    /// The current time in milliseconds, bumped past the largest existing id so that ids stay
    /// unique and increasing even when the clock has not moved or has gone backwards.
    fn next_id(&self) -> Result<RecordId> {
        let now = Utc::now().timestamp_millis();
        let next = match self.records.iter().map(Record::id).max() {
            Some(max) if max.value() >= now => {
                max.value().checked_add(1).ok_or(Error::IdsExhausted(max))?
            }
            _ => now,
        };
        Ok(RecordId::new(next))
    }
}
