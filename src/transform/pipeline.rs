//! High-level conversion pipeline.
//!
//! Combines the steps the CLI needs for one conversion: read and
//! decode the input, select a mapping spec (explicit file, stored
//! registry id, or built-in format), run the matching engine, and
//! report what happened.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::document::{self, DecodedInput, RawDocument};
use crate::error::PipelineError;
use crate::formats;
use crate::mapping::MappingSpec;
use crate::registry::MappingRegistry;

use super::engine::{transform_with_spec, TransformOutput};

/// Where the mapping spec for a conversion comes from.
///
/// Precedence: explicit mapping file, then stored registry id, then
/// built-in format name.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Path to a mapping spec JSON file.
    pub mapping_path: Option<PathBuf>,

    /// Id of a mapping stored in the registry.
    pub stored: Option<String>,

    /// Name of a built-in format.
    pub format: Option<String>,
}

/// Result of a file-level conversion.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    /// Engine output (canonical blob plus counts).
    pub output: TransformOutput,

    /// Detected input encoding.
    pub encoding: String,

    /// Physical line count of the input.
    pub line_count: usize,

    /// The mapping spec that was applied.
    pub spec: MappingSpec,

    /// Registry id, when the spec came from the registry.
    pub stored_id: Option<String>,
}

/// Convert an input file using the mapping selected by `options`.
pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<ConvertReport, PipelineError> {
    let input = document::read_input(path)?;
    convert_decoded(input, options)
}

/// Convert raw input bytes using the mapping selected by `options`.
pub fn convert_bytes(bytes: &[u8], options: &ConvertOptions) -> Result<ConvertReport, PipelineError> {
    let input = document::decode_input(bytes)?;
    convert_decoded(input, options)
}

fn convert_decoded(
    input: DecodedInput,
    options: &ConvertOptions,
) -> Result<ConvertReport, PipelineError> {
    debug!(encoding = %input.encoding, "input decoded");

    let (spec, stored_id) = select_spec(options)?;
    info!(
        description = %spec.description,
        fields = spec.fields.len(),
        "converting"
    );

    let line_count = RawDocument::parse(&input.content).line_count();
    let output = transform_with_spec(&input.content, &spec)?;
    info!(records = output.record_count, "conversion finished");

    if let Some(id) = &stored_id {
        // Track usage; a failed touch is not worth failing the conversion
        MappingRegistry::new().touch(id);
    }

    Ok(ConvertReport {
        output,
        encoding: input.encoding,
        line_count,
        spec,
        stored_id,
    })
}

fn select_spec(options: &ConvertOptions) -> Result<(MappingSpec, Option<String>), PipelineError> {
    if let Some(path) = &options.mapping_path {
        debug!(path = %path.display(), "loading mapping spec from file");
        let content = std::fs::read_to_string(path)?;
        let spec = MappingSpec::from_json(&content).map_err(crate::error::MappingError::from)?;
        return Ok((spec, None));
    }

    if let Some(id) = &options.stored {
        let registry = MappingRegistry::new();
        let stored = registry
            .get(id)
            .ok_or_else(|| crate::error::RegistryError::NotFound(id.clone()))?;
        return Ok((stored.spec.clone(), Some(stored.id.clone())));
    }

    if let Some(name) = &options.format {
        let spec = formats::builtin(name).ok_or_else(|| PipelineError::UnknownFormat(name.clone()))?;
        return Ok((spec, None));
    }

    Err(PipelineError::NoMappingSelected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_bytes_with_builtin_format() {
        let options = ConvertOptions {
            format: Some("statement".to_string()),
            ..Default::default()
        };
        let source =
            "Identifier\nName\nType\nOpened\nCurrency\n123|AbcCode\nMy Account\n2\n01-01-2018\nCD";

        let report = convert_bytes(source.as_bytes(), &options).unwrap();
        assert_eq!(report.encoding, "utf-8");
        assert_eq!(report.line_count, 10);
        assert_eq!(report.output.record_count, 1);
        assert!(report.output.text.starts_with("AccountCode\n"));
    }

    #[test]
    fn test_no_mapping_selected() {
        let result = convert_bytes(b"a,b\n1,2", &ConvertOptions::default());
        assert!(matches!(result, Err(PipelineError::NoMappingSelected)));
    }

    #[test]
    fn test_unknown_format() {
        let options = ConvertOptions {
            format: Some("nope".to_string()),
            ..Default::default()
        };
        let result = convert_bytes(b"a", &options);
        assert!(matches!(result, Err(PipelineError::UnknownFormat(name)) if name == "nope"));
    }
}
