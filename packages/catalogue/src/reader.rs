//! Variable metadata CSV reader.
//!
//! The metadata file has one row per indicator with (at least) a
//! `Variable` column. Unknown columns such as `Source` are ignored.

use std::io::Read;
use std::path::Path;

use seniaura_catalogue_models::MetadataRow;

use crate::CatalogueError;

/// Parses metadata rows from any reader.
///
/// # Errors
///
/// Returns [`CatalogueError::Csv`] if the data is not valid CSV or a row
/// cannot be deserialized.
pub fn read_metadata<R: Read>(reader: R, delimiter: u8) -> Result<Vec<MetadataRow>, CatalogueError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.deserialize::<MetadataRow>() {
        rows.push(result?);
    }

    Ok(rows)
}

/// Reads the metadata file at `path`.
///
/// Returns `Ok(None)` when the file does not exist: the catalogue is
/// optional and callers fall back to the override table.
///
/// # Errors
///
/// Returns [`CatalogueError`] if the file exists but cannot be read or
/// parsed.
pub fn read_metadata_file(
    path: &Path,
    delimiter: u8,
) -> Result<Option<Vec<MetadataRow>>, CatalogueError> {
    if !path.exists() {
        log::warn!(
            "Variable metadata not found at {}; using override labels only",
            path.display()
        );
        return Ok(None);
    }

    let file = std::fs::File::open(path)?;
    let rows = read_metadata(file, delimiter)?;
    log::info!("Read {} metadata rows from {}", rows.len(), path.display());

    Ok(Some(rows))
}
