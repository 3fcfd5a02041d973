//! Source configuration, deserialized from TOML.
//!
//! Describes where the three input files live and which columns carry
//! the territory code and name in each of them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Complete loader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Input file locations.
    pub sources: SourcePaths,
    /// Column names used for joining and display.
    pub fields: FieldMapping,
}

/// Input file locations. Relative paths are resolved against
/// [`SourcePaths::data_dir`] when it is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePaths {
    /// Base directory for relative paths.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Territory boundaries (`GeoJSON` `FeatureCollection`). Required.
    pub boundaries: PathBuf,
    /// Indicator table (CSV, one row per territory). Required.
    pub indicators: PathBuf,
    /// Variable metadata (CSV). Optional at runtime.
    pub metadata: PathBuf,
    /// Coarser administrative boundaries drawn as an overlay.
    #[serde(default)]
    pub overlay: Option<PathBuf>,
    /// CSV field delimiter shared by the indicator and metadata files.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl SourcePaths {
    /// Resolves a configured path against the data directory.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// The delimiter as a single byte, falling back to `,` for
    /// non-ASCII characters.
    #[must_use]
    pub fn delimiter_byte(&self) -> u8 {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .unwrap_or(b',')
    }
}

const fn default_delimiter() -> char {
    ','
}

/// Column names for the join key and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Territory code property in the boundary layer.
    pub boundary_code: String,
    /// Territory code column in the indicator table.
    pub indicator_code: String,
    /// Display name column in the indicator table.
    pub name: String,
    /// Display name property in the boundary layer, used when the
    /// indicator table has none.
    #[serde(default)]
    pub boundary_name: Option<String>,
    /// Code property of the overlay layer.
    #[serde(default)]
    pub overlay_code: Option<String>,
    /// Name property of the overlay layer.
    #[serde(default)]
    pub overlay_name: Option<String>,
}
