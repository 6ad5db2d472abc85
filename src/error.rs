//! Error types for the ledgercast conversion pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`DocumentError`] - input reading and charset decoding errors
//! - [`MappingError`] - mapping configuration and locator lookup errors
//! - [`RegistryError`] - stored-mapping registry errors
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Conversion mismatches (an unrecognized type code, currency
//! abbreviation, or date) are deliberately NOT errors: converters
//! degrade to a sentinel value in the output so a batch keeps going and
//! mismatches stay auditable by inspection. See
//! [`crate::mapping::conversion`].

use thiserror::Error;

// =============================================================================
// Document Errors
// =============================================================================

/// Errors while reading or decoding an input blob.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode input bytes.
    #[error("Failed to decode input: {0}")]
    Encoding(String),
}

// =============================================================================
// Mapping Errors
// =============================================================================

/// Mapping configuration and locator lookup errors.
///
/// These are hard configuration errors: a lookup that cannot resolve
/// aborts the whole transformation rather than degrading record by
/// record, so a broken mapping is caught on the first run.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A header-name locator does not appear in the source header layout.
    #[error("Source header '{0}' not found in header layout")]
    UnknownHeader(String),

    /// A column/line index points past the end of a source record.
    #[error("Index {index} out of range in record {row} ({width} values)")]
    IndexOutOfRange {
        index: usize,
        row: usize,
        width: usize,
    },

    /// A header-name locator was used against a row layout, which is
    /// purely positional and has no header layout to resolve against.
    #[error("Field '{0}' uses a header locator in a row layout")]
    HeaderLocatorInRowLayout(String),

    /// Two mapping entries share a target field name.
    #[error("Duplicate target field: {0}")]
    DuplicateTarget(String),

    /// The mapping has no entries.
    #[error("Mapping has no entries")]
    Empty,

    /// A mapping spec failed structural validation.
    #[error("Invalid mapping spec: {0}")]
    InvalidSpec(String),

    /// JSON serialization/deserialization error.
    #[error("Mapping JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Registry Errors
// =============================================================================

/// Errors from the stored-mapping registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Mapping not found.
    #[error("Stored mapping not found: {0}")]
    NotFound(String),

    /// Imported file is not a usable mapping spec.
    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    /// IO error.
    #[error("Registry IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("Registry JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by
/// [`crate::transform::pipeline::convert_file`]. It wraps all
/// lower-level errors and adds pipeline-specific variants.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input reading/decoding error.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Mapping configuration error.
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Registry error.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// IO error (mapping file reads).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No built-in format with the given name.
    #[error("Unknown built-in format: {0}")]
    UnknownFormat(String),

    /// No mapping file, stored id, or built-in format was selected.
    #[error("No mapping selected: pass a mapping file, a stored id, or a built-in format")]
    NoMappingSelected,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Result type for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
