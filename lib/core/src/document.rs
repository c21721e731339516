use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::signal::Signal;

/// A document as held by the store: raw field values plus one signal
/// per space, keyed by space id.
///
/// The id is the primary key within an index. Re-ingesting an existing
/// id replaces the whole document (upsert, not duplicate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    pub fields: serde_json::Value,
    pub signals: HashMap<String, Signal>,
}

impl StoredDocument {
    #[must_use]
    pub fn new(id: impl Into<String>, fields: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            fields,
            signals: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_signal(mut self, space: impl Into<String>, signal: Signal) -> Self {
        self.signals.insert(space.into(), signal);
        self
    }

    /// Get the stored signal for a space, if the document was encoded for it
    pub fn signal(&self, space: &str) -> Option<&Signal> {
        self.signals.get(space)
    }

    /// Get a raw field value by name
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name)
    }
}
