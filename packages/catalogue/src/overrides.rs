//! Fixed labels for critical columns the metadata file may miss.
//!
//! Overrides only fill gaps: a code already in the catalogue keeps its
//! metadata, and a code that is not a dataset column is ignored.

use seniaura_catalogue_models::{Category, Polarity, VariableEntry};

use crate::Catalogue;

/// Code of the global cardiovascular incidence rate.
pub const GLOBAL_INCIDENCE_CODE: &str = "Taux_CNR";

/// Label of the global cardiovascular incidence rate.
pub const GLOBAL_INCIDENCE_LABEL: &str = "Incidence Globale CNR";

/// `(code, label)` pairs applied when a column has no catalogue entry.
pub const OVERRIDES: &[(&str, &str)] = &[
    (GLOBAL_INCIDENCE_CODE, GLOBAL_INCIDENCE_LABEL),
    ("FDep_2021", "Score de Précarité (FDep 2021)"),
    ("Indice_Precarite", "Précarité (Score Global)"),
    ("Revenu médian", "Revenu Médian (€)"),
    ("Taux de chomeurs", "Taux de Chômage (%)"),
    ("POP_2021", "Population Totale (2021)"),
    ("Degré de densité (3 postes)", "Degré de Densité"),
];

/// Applies [`OVERRIDES`] for every code that is missing from the catalogue
/// and for which `is_column` returns `true`.
///
/// Override entries are [`Category::Other`] with
/// [`Polarity::HigherIsWorse`]. Returns the number of entries added.
pub fn apply_overrides(catalogue: &mut Catalogue, is_column: impl Fn(&str) -> bool) -> usize {
    let mut added = 0;

    for (code, label) in OVERRIDES {
        if catalogue.contains(code) || !is_column(code) {
            continue;
        }
        catalogue.insert(VariableEntry {
            code: (*code).to_string(),
            label: (*label).to_string(),
            category: Category::Other,
            polarity: Polarity::HigherIsWorse,
            unit: None,
            description: None,
        });
        added += 1;
    }

    if added > 0 {
        log::info!("Applied {added} catalogue overrides");
    }

    added
}
