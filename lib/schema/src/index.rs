//! Composite index: a named bundle of spaces plus filterable fields
//!
//! The index is the compile-time contract a query plan is validated
//! against. It performs no scoring itself.

use serde_json::Value;

use rankx_core::{Error, Result, StoredDocument};

use crate::field::Schema;
use crate::space::Space;

/// Binds a schema, an ordered list of spaces and the filterable fields
/// into one queryable unit.
#[derive(Debug, Clone)]
pub struct Index {
    name: String,
    schema: Schema,
    spaces: Vec<Space>,
    fields: Vec<String>,
}

impl Index {
    /// Create an index definition. Every space must embed a declared
    /// schema field, every filterable field must be declared, and space
    /// ids must be unique.
    pub fn new(
        name: impl Into<String>,
        schema: Schema,
        spaces: Vec<Space>,
        fields: Vec<String>,
    ) -> Result<Self> {
        for space in &spaces {
            if schema.field(space.field()).is_none() {
                return Err(Error::InvalidConfig(format!(
                    "space '{}' embeds undeclared field '{}'",
                    space.id(),
                    space.field()
                )));
            }
            let duplicates = spaces.iter().filter(|s| s.id() == space.id()).count();
            if duplicates > 1 {
                return Err(Error::InvalidConfig(format!(
                    "duplicate space id '{}'",
                    space.id()
                )));
            }
        }
        for field in &fields {
            if schema.field(field).is_none() {
                return Err(Error::InvalidConfig(format!(
                    "filterable field '{field}' is not declared in the schema"
                )));
            }
        }

        Ok(Self {
            name: name.into(),
            schema,
            spaces,
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Spaces that participate in scoring
    pub fn scorable_spaces(&self) -> &[Space] {
        &self.spaces
    }

    /// Fields usable in filter predicates
    pub fn filterable_fields(&self) -> &[String] {
        &self.fields
    }

    pub fn space(&self, id: &str) -> Option<&Space> {
        self.spaces.iter().find(|s| s.id() == id)
    }

    /// Resolve a space id, failing with [`Error::UnknownSpaceReference`]
    pub fn require_space(&self, id: &str) -> Result<&Space> {
        self.space(id)
            .ok_or_else(|| Error::UnknownSpaceReference(format!("space '{id}'")))
    }

    /// Check a field is declared filterable
    pub fn require_filterable(&self, field: &str) -> Result<()> {
        if self.fields.iter().any(|f| f == field) {
            Ok(())
        } else {
            Err(Error::UnknownSpaceReference(format!(
                "field '{field}' is not filterable"
            )))
        }
    }

    /// Encode a raw record into a stored document: validate it against
    /// the schema, then run every space over its field.
    ///
    /// A record missing a scored field is rejected; encoding is all or
    /// nothing so the store never holds a partially scored document.
    pub fn encode_document(&self, record: &Value) -> Result<StoredDocument> {
        let id = self.schema.validate_record(record)?;

        let mut doc = StoredDocument::new(id, record.clone());
        for space in &self.spaces {
            let value = record.get(space.field()).ok_or_else(|| {
                Error::invalid_field(space.field(), "missing value for scored field")
            })?;
            let signal = space.encode(value)?;
            doc.signals.insert(space.id().to_string(), signal);
        }

        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDef, FieldKind};
    use crate::space::Mode;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new(
            "product",
            vec![
                FieldDef::new("id", FieldKind::Identifier),
                FieldDef::new("description", FieldKind::LongText),
                FieldDef::new("price", FieldKind::Float),
                FieldDef::new("type", FieldKind::ShortText),
            ],
        )
        .unwrap()
    }

    fn index() -> Index {
        Index::new(
            "product_index",
            schema(),
            vec![
                Space::text("description", "description", "test-model"),
                Space::number("price", "price", 0.0, 1000.0, Mode::Minimum),
            ],
            vec!["type".into(), "price".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_encode_document_produces_signal_per_space() {
        let doc = index()
            .encode_document(&json!({
                "id": "B001",
                "description": "a history of rome",
                "price": 80.0,
                "type": "book",
            }))
            .unwrap();

        assert_eq!(doc.id, "B001");
        assert_eq!(doc.signals.len(), 2);
        assert!(doc.signal("description").is_some());
        assert!(doc.signal("price").is_some());
    }

    #[test]
    fn test_encode_document_missing_scored_field() {
        let err = index()
            .encode_document(&json!({"id": "B001", "description": "x"}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFieldValue { .. }));
    }

    #[test]
    fn test_unknown_space_reference() {
        let idx = index();
        assert!(idx.require_space("description").is_ok());
        assert!(matches!(
            idx.require_space("title"),
            Err(Error::UnknownSpaceReference(_))
        ));
        assert!(idx.require_filterable("type").is_ok());
        assert!(idx.require_filterable("description").is_err());
    }

    #[test]
    fn test_index_rejects_space_on_undeclared_field() {
        let result = Index::new(
            "bad",
            schema(),
            vec![Space::text("title", "title", "m")],
            vec![],
        );
        assert!(result.is_err());
    }
}
