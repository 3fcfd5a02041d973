//! Territory clustering.
//!
//! Territories complete on the selected variables are standardized and
//! partitioned with K-Means. The rest are reported as unclassified.

use std::collections::BTreeMap;

use seniaura_analytics_models::{
    ClusterAssignment, ClusterParams, ClusterProfile, ClusterResult, TerritoryRef, VariableRef,
};
use seniaura_catalogue::Catalogue;
use seniaura_territory_models::{Territory, TerritoryTable};

use crate::AnalyticsError;
use crate::kmeans::{KMeansConfig, kmeans};
use crate::normalize::{MinMax, mean, standardize};

/// Minimum number of variables to cluster on.
pub const MIN_CLUSTER_VARIABLES: usize = 2;

fn territory_ref(territory: &Territory) -> TerritoryRef {
    TerritoryRef {
        code: territory.code.clone(),
        name: territory.display_name().to_string(),
    }
}

/// Clusters territories on the selected variables.
///
/// Cluster labels are renumbered in order of first appearance in the
/// table, so identical inputs always produce identical labels. Clusters
/// left empty (fewer distinct points than `k`) get no profile.
///
/// # Errors
///
/// * [`AnalyticsError::TooFewVariables`] if fewer than two selected
///   variables are dataset columns
/// * [`AnalyticsError::InvalidClusterCount`] if `k` is zero
/// * [`AnalyticsError::InsufficientData`] if fewer than `k` territories
///   are complete on the selected variables
pub fn cluster(
    table: &TerritoryTable,
    catalogue: &Catalogue,
    params: &ClusterParams,
) -> Result<ClusterResult, AnalyticsError> {
    let variables = table.valid_variables(&params.variables);
    if variables.len() < MIN_CLUSTER_VARIABLES {
        return Err(AnalyticsError::TooFewVariables {
            required: MIN_CLUSTER_VARIABLES,
            selected: variables.len(),
        });
    }
    if params.k == 0 {
        return Err(AnalyticsError::InvalidClusterCount { k: params.k });
    }

    let rows = table.complete_rows(&variables);
    if rows.len() < params.k {
        return Err(AnalyticsError::InsufficientData {
            required: params.k,
            available: rows.len(),
        });
    }

    let columns: Vec<Vec<f64>> = (0..variables.len())
        .map(|j| rows.iter().map(|(_, values)| values[j]).collect())
        .collect();
    let scaled: Vec<Vec<f64>> = columns.iter().map(|c| standardize(c)).collect();
    let points: Vec<Vec<f64>> = (0..rows.len())
        .map(|i| scaled.iter().map(|c| c[i]).collect())
        .collect();

    let fit = kmeans(&points, &KMeansConfig::new(params.k));
    log::info!(
        "Clustered {} territories on {} variables into {} clusters (inertia {:.4})",
        rows.len(),
        variables.len(),
        params.k,
        fit.inertia
    );

    let mut relabel: BTreeMap<usize, usize> = BTreeMap::new();
    let labels: Vec<usize> = fit
        .labels
        .iter()
        .map(|raw| {
            let next = relabel.len();
            *relabel.entry(*raw).or_insert(next)
        })
        .collect();

    let scales: Vec<MinMax> = columns
        .iter()
        .map(|c| MinMax::fit(c).unwrap_or(MinMax { min: 0.0, max: 0.0 }))
        .collect();

    // Relabelled ids are contiguous, so empty clusters are the trailing ids.
    let populated = relabel.len();
    if populated < params.k {
        log::warn!(
            "Only {populated} of {} clusters received territories; empty clusters are omitted",
            params.k
        );
    }

    let clusters = (0..populated)
        .map(|id| {
            let members: Vec<usize> = (0..rows.len()).filter(|&i| labels[i] == id).collect();
            let means: Vec<f64> = columns
                .iter()
                .map(|c| {
                    let values: Vec<f64> = members.iter().map(|&i| c[i]).collect();
                    mean(&values).unwrap_or_default()
                })
                .collect();
            let normalized_means = means.iter().zip(&scales).map(|(m, s)| s.apply(*m)).collect();

            let mut refs: Vec<TerritoryRef> = members.iter().map(|&i| territory_ref(rows[i].0)).collect();
            refs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));

            ClusterProfile {
                id,
                size: members.len(),
                members: refs,
                means,
                normalized_means,
            }
        })
        .collect();

    let assignments = rows
        .iter()
        .zip(&labels)
        .map(|((territory, _), &cluster)| ClusterAssignment {
            code: territory.code.clone(),
            cluster,
        })
        .collect();

    let unclassified = table
        .iter()
        .filter(|t| t.complete_values(&variables).is_none())
        .map(territory_ref)
        .collect();

    Ok(ClusterResult {
        variables: variables
            .iter()
            .map(|code| VariableRef {
                code: code.clone(),
                label: catalogue.label_or_code(code).to_string(),
            })
            .collect(),
        assignments,
        clusters,
        unclassified,
        inertia: fit.inertia,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalogue, table, vars};

    fn pairs() -> TerritoryTable {
        table(
            &["X", "Y"],
            &[
                ("a", &[Some(0.0), Some(0.0)]),
                ("b", &[Some(10.0), Some(10.0)]),
                ("c", &[Some(0.0), Some(1.0)]),
                ("d", &[Some(10.0), Some(11.0)]),
                ("e", &[Some(3.0), None]),
            ],
        )
    }

    fn params(k: usize) -> ClusterParams {
        ClusterParams {
            variables: vars(&["X", "Y"]),
            k,
        }
    }

    #[test]
    fn obvious_pairs_land_in_different_clusters() {
        let result = cluster(&pairs(), &catalogue(&[]), &params(2)).unwrap();

        let a = result.label_of("a").unwrap();
        let b = result.label_of("b").unwrap();
        assert_eq!(result.label_of("c"), Some(a));
        assert_eq!(result.label_of("d"), Some(b));
        assert_ne!(a, b);
        assert_eq!(a, 0, "labels follow table order");
    }

    #[test]
    fn reruns_are_identical() {
        let first = cluster(&pairs(), &catalogue(&[]), &params(2)).unwrap();
        for _ in 0..3 {
            assert_eq!(cluster(&pairs(), &catalogue(&[]), &params(2)).unwrap(), first);
        }
    }

    #[test]
    fn every_territory_is_classified_or_unclassified() {
        let t = pairs();
        let result = cluster(&t, &catalogue(&[]), &params(2)).unwrap();

        for territory in &t {
            let labelled = result.label_of(&territory.code);
            let unclassified = result.unclassified.iter().any(|u| u.code == territory.code);
            assert!(labelled.is_some() != unclassified, "{} in exactly one", territory.code);
            if let Some(label) = labelled {
                assert!(label < 2);
            }
        }
        assert_eq!(result.unclassified.len(), 1);
        assert_eq!(result.unclassified[0].code, "e");
        let total: usize = result.clusters.iter().map(|c| c.size).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn profiles_use_minmax_over_clustered_territories() {
        let result = cluster(&pairs(), &catalogue(&[]), &params(2)).unwrap();
        let low = &result.clusters[0];

        assert_eq!(low.size, 2);
        assert_eq!(low.means, vec![0.0, 0.5]);
        assert_eq!(low.normalized_means, vec![0.0, 0.5 / 11.0]);
        assert_eq!(
            low.members.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            vec!["Ta", "Tc"]
        );
        let high = &result.clusters[1];
        assert_eq!(high.normalized_means, vec![1.0, 10.5 / 11.0]);
    }

    #[test]
    fn too_few_variables() {
        let p = ClusterParams {
            variables: vars(&["X", "Nope", "X"]),
            k: 2,
        };
        let err = cluster(&pairs(), &catalogue(&[]), &p).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::TooFewVariables {
                required: 2,
                selected: 1
            }
        );
    }

    #[test]
    fn k_larger_than_complete_rows() {
        let err = cluster(&pairs(), &catalogue(&[]), &params(5)).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InsufficientData {
                required: 5,
                available: 4
            }
        );
    }

    #[test]
    fn zero_clusters() {
        let err = cluster(&pairs(), &catalogue(&[]), &params(0)).unwrap_err();
        assert_eq!(err, AnalyticsError::InvalidClusterCount { k: 0 });
    }

    #[test]
    fn identical_points_leave_no_empty_profile() {
        let t = table(
            &["X", "Y"],
            &[
                ("a", &[Some(2.0), Some(5.0)]),
                ("b", &[Some(2.0), Some(5.0)]),
                ("c", &[Some(2.0), Some(5.0)]),
            ],
        );
        let result = cluster(&t, &catalogue(&[]), &params(2)).unwrap();

        assert_eq!(result.clusters.len(), 1);
        let only = &result.clusters[0];
        assert_eq!(only.size, 3);
        assert_eq!(only.means, vec![2.0, 5.0]);
        assert!(only.normalized_means.iter().all(|m| m.is_finite()));
        assert!(result.assignments.iter().all(|a| a.cluster == 0));
    }
}
