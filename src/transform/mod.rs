//! Transformation module.
//!
//! - Partition: framing lines/columns into source records
//! - Engine: the two sibling transformers and their orchestration
//! - Pipeline: file-level conversion used by the CLI

pub mod engine;
pub mod partition;
pub mod pipeline;

pub use engine::{transform_fields, transform_rows, transform_with_spec, TransformOutput};
pub use partition::{partition_fields, partition_rows, FieldPartition, RowPartition, SourceRecord};
pub use pipeline::{convert_bytes, convert_file, ConvertOptions, ConvertReport};
