//! # Ledgercast - canonical account-record conversion
//!
//! Ledgercast converts account records from heterogeneous source
//! layouts (field-oriented statements, headered and bare CSV exports)
//! into one canonical schema, driven by declarative field mappings
//! instead of per-format parsing code.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ Source blob │────▶│  Document   │────▶│  Partition   │────▶│  Canonical  │
//! │ (any EOLs)  │     │ (lines)     │     │ + Map/Convert│     │   blob      │
//! └─────────────┘     └─────────────┘     └──────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use ledgercast::{transform_rows, FieldMapping, Locator, identity};
//!
//! let mapping = FieldMapping::builder()
//!     .field("Name", Locator::column(1), identity)
//!     .field("Code", Locator::column(0), identity)
//!     .build()
//!     .unwrap();
//!
//! let output = transform_rows("a-1,Savings\na-2,Chequing", false, &mapping).unwrap();
//! assert_eq!(output.text, "Name,Code\nSavings,a-1\nChequing,a-2\n");
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`document`] - Line splitting and charset handling
//! - [`models`] - Canonical schema vocabulary (account types, currencies)
//! - [`mapping`] - Locators, converters, mapping specs
//! - [`transform`] - Partitioning, the two engines, the pipeline
//! - [`formats`] - Built-in mappings for the known source layouts
//! - [`registry`] - Stored mapping registry

// Core modules
pub mod error;
pub mod models;

// Input handling
pub mod document;

// Mapping
pub mod mapping;

// Transformation
pub mod transform;

// Built-in formats
pub mod formats;

// Stored mappings
pub mod registry;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    DocumentError, DocumentResult, MappingError, MappingResult, PipelineError, PipelineResult,
    RegistryError, RegistryResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{AccountType, Currency, CANONICAL_FIELDS, SENTINEL};

// =============================================================================
// Re-exports - Document
// =============================================================================

pub use document::{
    decode_content, decode_input, detect_encoding, read_input, DecodedInput, RawDocument,
};

// =============================================================================
// Re-exports - Mapping
// =============================================================================

pub use mapping::{
    chain, conversions_description, identity, Conversion, Convert, FieldMapping, FieldSpec,
    LayoutSpec, Locator, MappingBuilder, MappingEntry, MappingSpec,
};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    convert_bytes, convert_file, partition_fields, partition_rows, transform_fields,
    transform_rows, transform_with_spec, ConvertOptions, ConvertReport, FieldPartition,
    RowPartition, SourceRecord, TransformOutput,
};

// =============================================================================
// Re-exports - Formats
// =============================================================================

pub use formats::{builtin, builtin_names};

// =============================================================================
// Re-exports - Registry
// =============================================================================

pub use registry::{MappingRegistry, StoredMapping};
