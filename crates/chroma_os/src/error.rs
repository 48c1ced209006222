#![forbid(unsafe_code)]

use chroma_contracts::ContractViolation;
use chroma_storage::store::StorageError;

/// Terminal outcome of a palette operation. Nothing here is retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaletteError {
    #[error("caller identity is required")]
    Unauthorized,
    #[error("palette {palette_id} is not accessible to the caller")]
    Forbidden { palette_id: String },
    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },
    #[error("invalid input: {0}")]
    Validation(ContractViolation),
    #[error("storage failure: {0}")]
    Storage(StorageError),
    #[error("internal failure: {detail}")]
    Internal { detail: String },
}

impl PaletteError {
    /// Machine-readable code surfaced at the transport boundary.
    pub fn code(&self) -> &'static str {
        match self {
            PaletteError::Unauthorized => "UNAUTHORIZED",
            PaletteError::Forbidden { .. } => "FORBIDDEN",
            PaletteError::NotFound { .. } => "NOT_FOUND",
            PaletteError::Validation(_) => "VALIDATION_ERROR",
            PaletteError::Storage(_) | PaletteError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<ContractViolation> for PaletteError {
    fn from(v: ContractViolation) -> Self {
        PaletteError::Validation(v)
    }
}

impl From<StorageError> for PaletteError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::RowNotFound { table, key } => PaletteError::NotFound { entity: table, key },
            StorageError::ForeignKeyViolation { table, key } => {
                PaletteError::NotFound { entity: table, key }
            }
            StorageError::ContractViolation(v) => PaletteError::Validation(v),
            other @ StorageError::DuplicateKey { .. } => PaletteError::Storage(other),
        }
    }
}
