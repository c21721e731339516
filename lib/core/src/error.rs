use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("Invalid query parameters: {}", .0.join("; "))]
    ParamValidation(Vec<String>),

    #[error("Unknown space or field reference: {0}")]
    UnknownSpaceReference(String),

    #[error("Reference document not found: {0}")]
    ReferenceDocumentNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Query not found: {0}")]
    QueryNotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidFieldValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
