use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid column identifier: {0:?}")]
    InvalidColumnId(String),
    #[error("duplicate column identifier: {0}")]
    DuplicateColumn(String),
    #[error("invalid sort directive: {0}")]
    InvalidSort(String),
    #[error("reserved key `{0}` used outside its position")]
    ReservedKey(&'static str),
    #[error("number filter bounds must be finite, got {0}")]
    NonFiniteNumber(f64),
    #[error("expected a JSON {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
