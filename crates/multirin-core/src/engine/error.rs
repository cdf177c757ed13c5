use thiserror::Error;

use super::config::ConfigError;
use crate::core::alignment::mapper::MappingError;

/// Violation of the slice invariants of an aggregated tensor.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DataIntegrityError {
    #[error("Slice '{structure}' is asymmetric at ({row}, {column}): {value} vs {mirrored}")]
    Asymmetric {
        structure: String,
        row: usize,
        column: usize,
        value: f64,
        mirrored: f64,
    },
    #[error("Slice '{structure}' has nonzero diagonal value {value} at column {column}")]
    NonZeroDiagonal {
        structure: String,
        column: usize,
        value: f64,
    },
    #[error("Slice '{structure}' holds a non-finite value at ({row}, {column})")]
    NonFinite {
        structure: String,
        row: usize,
        column: usize,
    },
}

impl DataIntegrityError {
    pub fn structure(&self) -> &str {
        match self {
            DataIntegrityError::Asymmetric { structure, .. }
            | DataIntegrityError::NonZeroDiagonal { structure, .. }
            | DataIntegrityError::NonFinite { structure, .. } => structure,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Alignment mapping failed: {source}")]
    Mapping {
        #[from]
        source: MappingError,
    },

    #[error("Data integrity check failed: {source}")]
    DataIntegrity {
        #[from]
        source: DataIntegrityError,
    },

    #[error("Contact graph construction for '{structure}' was cancelled")]
    Cancelled { structure: String },

    #[error("Structure '{0}' appears more than once in the batch")]
    DuplicateStructure(String),
}
