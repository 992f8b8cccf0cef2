use crate::domain::model::PersonRecord;

/// Append-only, insertion-ordered collection of submitted records. Insertion
/// order is display order is export order. Persistence is handled by the
/// caller through an injected `RecordStorage` collaborator.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<PersonRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the store from a persisted snapshot, keeping its order.
    pub fn from_records(records: Vec<PersonRecord>) -> Self {
        Self { records }
    }

    pub fn append(&mut self, record: PersonRecord) {
        self.records.push(record);
    }

    pub fn all(&self) -> &[PersonRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
