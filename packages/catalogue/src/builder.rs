//! Builds a [`Catalogue`] from raw metadata rows.
//!
//! Rows explicitly categorized as "autre" are skipped so the variable
//! never reaches a selection list; the column itself still lives on the
//! territory rows.

use seniaura_catalogue_models::{Category, MetadataRow, Polarity, VariableEntry};

use crate::Catalogue;

/// Builds the catalogue from metadata rows.
///
/// Later rows for the same code replace earlier ones.
#[must_use]
pub fn build_catalogue(rows: &[MetadataRow]) -> Catalogue {
    let mut catalogue = Catalogue::new();
    let mut skipped = 0usize;

    for row in rows {
        match entry_from_row(row) {
            Some(entry) => {
                if catalogue.contains(&entry.code) {
                    log::debug!("Metadata row for {} replaces an earlier row", entry.code);
                }
                catalogue.insert(entry);
            }
            None => skipped += 1,
        }
    }

    log::info!(
        "Built catalogue: {} variables ({skipped} rows skipped)",
        catalogue.len()
    );

    catalogue
}

/// Converts one metadata row into an entry.
///
/// Returns `None` for rows without a code and for rows whose category is
/// the "autre" exclusion marker.
#[must_use]
pub fn entry_from_row(row: &MetadataRow) -> Option<VariableEntry> {
    let code = row.variable.trim();
    if code.is_empty() {
        return None;
    }

    let raw_category = row.category.as_deref().unwrap_or_default();
    if Category::is_exclusion_marker(raw_category) {
        return None;
    }

    let description = non_empty(row.description.as_deref());
    let label = non_empty(row.short_label.as_deref())
        .or_else(|| description.clone())
        .unwrap_or_else(|| code.to_string());

    Some(VariableEntry {
        code: code.to_string(),
        label,
        category: Category::from_metadata(raw_category),
        polarity: Polarity::from_sense(row.sense.as_deref()),
        unit: non_empty(row.unit.as_deref()),
        description,
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
