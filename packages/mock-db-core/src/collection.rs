//! Ordered record collection with auto-incremented ids.

use crate::error::DbError;
use crate::record::{id_from_value, Attrs, Record, RecordId};

/// Records of one model, kept in insertion order.
#[derive(Debug, Clone)]
pub struct Collection {
    /// Model name the collection stores
    pub model: String,
    records: Vec<Record>,
    next_id: RecordId,
}

impl Collection {
    /// Creates an empty collection.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Inserts a record.
    ///
    /// An `id` attribute is honored and moves the id counter past it;
    /// otherwise the next free id is assigned.
    ///
    /// # Errors
    /// - `InvalidRecordId` when `id` is not numeric
    /// - `DuplicateId` when the id is already taken
    pub fn insert(&mut self, attrs: Attrs) -> Result<Record, DbError> {
        let id = match attrs.get("id") {
            Some(value) => id_from_value(value)?,
            None => self.next_id,
        };
        if self.position(id).is_some() {
            return Err(DbError::DuplicateId {
                model: self.model.clone(),
                id,
            });
        }
        self.next_id = self.next_id.max(id.saturating_add(1));

        let record = Record::new(id, attrs);
        self.records.push(record.clone());
        Ok(record)
    }

    /// Returns every record in insertion order.
    pub fn all(&self) -> &[Record] {
        &self.records
    }

    /// Finds a record by id.
    pub fn find(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Returns the first record matching every query attribute.
    pub fn find_by(&self, query: &Attrs) -> Option<&Record> {
        self.records.iter().find(|r| r.matches(query))
    }

    /// Returns all records matching every query attribute.
    pub fn where_eq(&self, query: &Attrs) -> Vec<&Record> {
        self.records.iter().filter(|r| r.matches(query)).collect()
    }

    /// Merges attributes into a record; `id` in `attrs` is ignored.
    pub fn update(&mut self, id: RecordId, mut attrs: Attrs) -> Result<Record, DbError> {
        attrs.remove("id");
        let model = self.model.clone();
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DbError::RecordNotFound { model, id })?;
        for (key, value) in attrs {
            record.attrs.insert(key, value);
        }
        Ok(record.clone())
    }

    /// Removes a record and returns it.
    pub fn remove(&mut self, id: RecordId) -> Result<Record, DbError> {
        let index = self.position(id).ok_or_else(|| DbError::RecordNotFound {
            model: self.model.clone(),
            id,
        })?;
        Ok(self.records.remove(index))
    }

    /// Mutable access to every record, used to rewrite foreign keys.
    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut Record> {
        self.records.iter_mut()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}
