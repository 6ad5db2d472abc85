//! Mapping registry: store and reuse mapping specs.
//!
//! Saves specs to disk as JSON, one file per mapping, so a layout
//! mapped once can be reused by name instead of being redescribed. The
//! registry directory defaults to `.ledgercast/mappings` and can be
//! overridden with the `LEDGERCAST_HOME` environment variable.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RegistryError;
use crate::mapping::MappingSpec;

/// Directory where mappings are stored (relative to current dir)
const DEFAULT_REGISTRY_DIR: &str = ".ledgercast/mappings";

/// Environment variable overriding the registry directory.
pub const REGISTRY_HOME_VAR: &str = "LEDGERCAST_HOME";

/// A stored mapping spec with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMapping {
    /// Unique identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// The mapping spec.
    pub spec: MappingSpec,
    /// Source header labels the spec locates (empty for purely
    /// positional row mappings).
    pub source_headers: Vec<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last time this mapping was used.
    pub last_used: Option<String>,
    /// Number of times used.
    pub use_count: u32,
}

/// Registry for managing stored mapping specs.
pub struct MappingRegistry {
    /// Directory where mappings are stored.
    registry_dir: PathBuf,
    /// Loaded mappings (id -> mapping).
    mappings: HashMap<String, StoredMapping>,
}

impl MappingRegistry {
    /// Create a registry at the default directory (or `LEDGERCAST_HOME`
    /// when set), loading existing mappings from disk.
    pub fn new() -> Self {
        let dir = std::env::var(REGISTRY_HOME_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_REGISTRY_DIR));
        Self::with_dir(dir)
    }

    /// Create a registry with a custom directory.
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        let mut registry = Self {
            registry_dir: dir.as_ref().to_path_buf(),
            mappings: HashMap::new(),
        };
        registry.load_all();
        registry
    }

    /// Load all mappings from the registry directory.
    fn load_all(&mut self) {
        if !self.registry_dir.exists() {
            return;
        }

        let entries = match fs::read_dir(&self.registry_dir) {
            Ok(e) => e,
            Err(_) => return,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                if let Ok(content) = fs::read_to_string(&path) {
                    if let Ok(stored) = serde_json::from_str::<StoredMapping>(&content) {
                        self.mappings.insert(stored.id.clone(), stored);
                    }
                }
            }
        }
        debug!(count = self.mappings.len(), "registry loaded");
    }

    /// All stored mappings.
    pub fn list(&self) -> Vec<&StoredMapping> {
        let mut all: Vec<&StoredMapping> = self.mappings.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Get a mapping by id.
    pub fn get(&self, id: &str) -> Option<&StoredMapping> {
        self.mappings.get(id)
    }

    /// Find mappings compatible with the given source header labels,
    /// sorted by compatibility score (descending).
    pub fn find_compatible(&self, headers: &[String]) -> Vec<(&StoredMapping, f64)> {
        let mut compatible: Vec<_> = self
            .mappings
            .values()
            .filter_map(|m| {
                let score = calculate_compatibility(&m.source_headers, headers);
                (score > 0.5).then_some((m, score))
            })
            .collect();

        compatible.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        compatible
    }

    /// Save a new mapping to the registry, returning its id.
    pub fn save(&mut self, spec: MappingSpec, name: &str) -> Result<String, RegistryError> {
        fs::create_dir_all(&self.registry_dir)?;

        let id = generate_id(name);
        let source_headers = spec
            .source_headers()
            .into_iter()
            .map(str::to_string)
            .collect();
        let stored = StoredMapping {
            id: id.clone(),
            name: name.to_string(),
            spec,
            source_headers,
            created_at: chrono::Utc::now().to_rfc3339(),
            last_used: None,
            use_count: 0,
        };

        let path = self.registry_dir.join(format!("{}.json", id));
        let content = serde_json::to_string_pretty(&stored)?;
        fs::write(&path, content)?;

        self.mappings.insert(id.clone(), stored);
        Ok(id)
    }

    /// Import a mapping spec from a JSON file.
    pub fn import(&mut self, path: &Path, name: Option<&str>) -> Result<String, RegistryError> {
        let content = fs::read_to_string(path)?;
        let spec = MappingSpec::from_json(&content)?;

        if let Err(problems) = spec.validate() {
            return Err(RegistryError::InvalidMapping(problems.join("; ")));
        }

        let mapping_name = name.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("imported")
        });

        self.save(spec, mapping_name)
    }

    /// Record one use of a mapping.
    pub fn touch(&mut self, id: &str) {
        if let Some(stored) = self.mappings.get_mut(id) {
            stored.last_used = Some(chrono::Utc::now().to_rfc3339());
            stored.use_count += 1;

            let path = self.registry_dir.join(format!("{}.json", id));
            if let Ok(content) = serde_json::to_string_pretty(stored) {
                let _ = fs::write(&path, content);
            }
        }
    }

    /// Delete a mapping from the registry.
    pub fn delete(&mut self, id: &str) -> Result<(), RegistryError> {
        if self.mappings.remove(id).is_some() {
            let path = self.registry_dir.join(format!("{}.json", id));
            fs::remove_file(&path)?;
            Ok(())
        } else {
            Err(RegistryError::NotFound(id.to_string()))
        }
    }
}

impl Default for MappingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Compatibility score: fraction of stored header labels present in the
/// source headers, case-insensitive.
fn calculate_compatibility(stored: &[String], source: &[String]) -> f64 {
    if stored.is_empty() {
        return 0.0;
    }

    let source_lower: Vec<String> = source.iter().map(|h| h.to_lowercase()).collect();
    let match_count = stored
        .iter()
        .filter(|h| source_lower.contains(&h.to_lowercase()))
        .count();

    match_count as f64 / stored.len() as f64
}

/// Generate a unique id from a name.
fn generate_id(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let timestamp = chrono::Utc::now().timestamp_millis();
    format!("{}-{}", slug, timestamp)
}
