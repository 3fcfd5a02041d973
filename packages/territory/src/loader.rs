//! Reads every configured source and assembles the [`Dataset`].

use std::path::Path;

use seniaura_catalogue::Catalogue;
use seniaura_catalogue::builder::build_catalogue;
use seniaura_catalogue::reader::read_metadata_file;
use seniaura_territory_models::{Boundary, SourceConfig};

use crate::boundaries::parse_boundaries;
use crate::indicators::read_indicators;
use crate::merge::merge;
use crate::{Dataset, LoadError, SourceKind};

/// Loads and merges the dataset described by `config`.
///
/// The boundary layer and indicator table are required. A missing
/// metadata file yields an override-only catalogue, and a missing or
/// unreadable overlay is skipped.
///
/// # Errors
///
/// Returns [`LoadError`] if a required source is missing or malformed.
pub fn load(config: &SourceConfig) -> Result<Dataset, LoadError> {
    let sources = &config.sources;
    let fields = &config.fields;
    let delimiter = sources.delimiter_byte();

    let boundaries_path = sources.resolve(&sources.boundaries);
    require(&boundaries_path, SourceKind::Boundaries)?;
    let text = std::fs::read_to_string(&boundaries_path)?;
    let boundaries = parse_boundaries(
        &text,
        &fields.boundary_code,
        fields.boundary_name.as_deref(),
    )?;
    log::info!(
        "Read {} boundaries from {}",
        boundaries.len(),
        boundaries_path.display()
    );

    let indicators_path = sources.resolve(&sources.indicators);
    require(&indicators_path, SourceKind::Indicators)?;
    let file = std::fs::File::open(&indicators_path)?;
    let indicators = read_indicators(file, delimiter, &fields.indicator_code)?;
    log::info!(
        "Read {} indicator rows ({} columns) from {}",
        indicators.rows.len(),
        indicators.headers.len(),
        indicators_path.display()
    );

    let metadata_path = sources.resolve(&sources.metadata);
    let mut catalogue = read_metadata_file(&metadata_path, delimiter)?
        .map_or_else(Catalogue::new, |rows| build_catalogue(&rows));

    let territories = merge(boundaries, &indicators, &mut catalogue, fields);

    let overlay = sources
        .overlay
        .as_deref()
        .map(|path| load_overlay(&sources.resolve(path), config))
        .unwrap_or_default();

    Ok(Dataset {
        territories,
        catalogue,
        overlay,
    })
}

fn require(path: &Path, kind: SourceKind) -> Result<(), LoadError> {
    if path.exists() {
        Ok(())
    } else {
        Err(LoadError::MissingSource {
            kind,
            path: path.to_path_buf(),
        })
    }
}

fn load_overlay(path: &Path, config: &SourceConfig) -> Vec<Boundary> {
    if !path.exists() {
        log::warn!("Overlay layer not found at {}; skipping", path.display());
        return Vec::new();
    }

    let fields = &config.fields;
    let code_field = fields.overlay_code.as_deref().unwrap_or("code");
    let result = std::fs::read_to_string(path)
        .map_err(LoadError::from)
        .and_then(|text| parse_boundaries(&text, code_field, fields.overlay_name.as_deref()));

    match result {
        Ok(overlay) => {
            log::info!("Read {} overlay boundaries", overlay.len());
            overlay
        }
        Err(e) => {
            log::warn!("Failed to read overlay {}: {e}", path.display());
            Vec::new()
        }
    }
}
