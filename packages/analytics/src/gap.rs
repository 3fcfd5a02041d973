//! Diagnostic gap ranking.
//!
//! Compares each territory's health outcome rank with the mean "badness"
//! rank of its context variables. A large positive gap flags a territory
//! whose outcome is worse than its context would suggest.

use seniaura_analytics_models::{GapEntry, GapParams, GapRanking, GapSkipReason, HealthTarget, VariableRef};
use seniaura_catalogue::Catalogue;
use seniaura_catalogue::overrides::GLOBAL_INCIDENCE_CODE;
use seniaura_catalogue_models::Polarity;
use seniaura_territory_models::TerritoryTable;

use crate::rank::{Order, percentile_rank};

/// Number of territories returned when the request does not say.
pub const DEFAULT_GAP_LIMIT: usize = 10;

/// Minimum number of complete territories for a meaningful ranking.
pub const MIN_GAP_SAMPLE: usize = 5;

/// Resolves a health target to a dataset column.
///
/// `INCI_CNR` falls back to the global incidence rate when the dataset
/// has no such column.
#[must_use]
pub fn resolve_health_target(table: &TerritoryTable, target: &HealthTarget) -> Option<String> {
    let column = target.column();
    if table.has_column(&column) {
        Some(column)
    } else if column == "INCI_CNR" && table.has_column(GLOBAL_INCIDENCE_CODE) {
        Some(GLOBAL_INCIDENCE_CODE.to_string())
    } else {
        None
    }
}

/// Ranks territories by diagnostic gap.
///
/// Never fails: when the ranking cannot be computed the result is empty
/// and [`GapRanking::skipped`] says why.
#[must_use]
pub fn rank_gaps(table: &TerritoryTable, catalogue: &Catalogue, params: &GapParams) -> GapRanking {
    let target = resolve_health_target(table, &params.target);
    let limit = params.limit.unwrap_or(DEFAULT_GAP_LIMIT);

    match target {
        Some(target) => rank_gaps_for(table, catalogue, &target, &params.context, limit),
        None => GapRanking {
            target: params.target.column(),
            context: Vec::new(),
            sample_size: 0,
            entries: Vec::new(),
            skipped: Some(GapSkipReason::UnknownTarget),
        },
    }
}

/// Ranks territories by diagnostic gap against an explicit outcome column.
#[must_use]
pub fn rank_gaps_for(
    table: &TerritoryTable,
    catalogue: &Catalogue,
    target: &str,
    context: &[String],
    limit: usize,
) -> GapRanking {
    let mut ranking = GapRanking {
        target: target.to_string(),
        context: Vec::new(),
        sample_size: 0,
        entries: Vec::new(),
        skipped: None,
    };

    if !table.has_column(target) {
        ranking.skipped = Some(GapSkipReason::UnknownTarget);
        return ranking;
    }

    let context = table.valid_variables(context);
    if context.is_empty() {
        ranking.skipped = Some(GapSkipReason::NoContextVariables);
        return ranking;
    }
    ranking.context = context
        .iter()
        .map(|code| VariableRef {
            code: code.clone(),
            label: catalogue.label_or_code(code).to_string(),
        })
        .collect();

    let mut columns = Vec::with_capacity(context.len() + 1);
    columns.push(target.to_string());
    columns.extend(context.iter().cloned());

    let rows = table.complete_rows(&columns);
    ranking.sample_size = rows.len();
    if rows.len() < MIN_GAP_SAMPLE {
        log::debug!(
            "Gap ranking for {target} skipped: {} complete territories",
            rows.len()
        );
        ranking.skipped = Some(GapSkipReason::InsufficientSample);
        return ranking;
    }

    let column_values = |j: usize| rows.iter().map(|(_, values)| values[j]).collect::<Vec<_>>();

    let health_rank = percentile_rank(&column_values(0), Order::Ascending);

    let context_ranks: Vec<Vec<f64>> = context
        .iter()
        .enumerate()
        .map(|(i, code)| {
            let order = match catalogue.polarity_of(code) {
                Polarity::HigherIsWorse => Order::Ascending,
                Polarity::HigherIsBetter => Order::Descending,
            };
            percentile_rank(&column_values(i + 1), order)
        })
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let n_context = context_ranks.len() as f64;

    let mut entries: Vec<GapEntry> = rows
        .iter()
        .enumerate()
        .map(|(row, (territory, values))| {
            let context_rank = context_ranks.iter().map(|r| r[row]).sum::<f64>() / n_context;
            GapEntry {
                code: territory.code.clone(),
                name: territory.display_name().to_string(),
                outcome: values[0],
                health_rank: health_rank[row],
                context_rank,
                gap: health_rank[row] - context_rank,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.gap.total_cmp(&a.gap));
    entries.truncate(limit);
    ranking.entries = entries;

    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalogue, table, vars};
    use seniaura_analytics_models::{HealthIndicator, Pathology};

    fn six() -> TerritoryTable {
        table(
            &["INCI_AVC", "MED_SL", "FDep"],
            &[
                ("1", &[Some(1.0), Some(20.0), Some(0.5)]),
                ("2", &[Some(2.0), Some(25.0), Some(0.1)]),
                ("3", &[Some(3.0), Some(18.0), Some(0.9)]),
                ("4", &[Some(4.0), Some(30.0), Some(-0.3)]),
                ("5", &[Some(5.0), Some(22.0), Some(0.2)]),
                ("6", &[Some(6.0), Some(27.0), Some(-1.0)]),
            ],
        )
    }

    fn params(context: &[&str]) -> GapParams {
        GapParams {
            target: HealthTarget {
                indicator: HealthIndicator::Inci,
                pathology: Pathology::Avc,
            },
            context: vars(context),
            limit: None,
        }
    }

    #[test]
    fn highest_outcome_gets_top_health_rank() {
        let cat = catalogue(&[("MED_SL", Polarity::HigherIsBetter)]);
        let ranking = rank_gaps(&six(), &cat, &params(&["MED_SL"]));

        assert!(ranking.skipped.is_none());
        assert_eq!(ranking.sample_size, 6);
        let worst = ranking.entries.iter().find(|e| e.code == "6").unwrap();
        assert!((worst.health_rank - 1.0).abs() < 1e-12);
    }

    #[test]
    fn gap_is_health_minus_context() {
        let cat = catalogue(&[("MED_SL", Polarity::HigherIsBetter)]);
        let ranking = rank_gaps(&six(), &cat, &params(&["MED_SL"]));

        for entry in &ranking.entries {
            assert!((entry.gap - (entry.health_rank - entry.context_rank)).abs() < 1e-12);
        }
        for pair in ranking.entries.windows(2) {
            assert!(pair[0].gap >= pair[1].gap, "sorted by gap descending");
        }
        // territory 6: worst outcome, second-highest income => context rank 2/6
        assert_eq!(ranking.entries[0].code, "6");
    }

    #[test]
    fn flipping_polarity_complements_the_context_rank() {
        let worse = catalogue(&[("MED_SL", Polarity::HigherIsWorse)]);
        let better = catalogue(&[("MED_SL", Polarity::HigherIsBetter)]);
        let a = rank_gaps(&six(), &worse, &params(&["MED_SL"]));
        let b = rank_gaps(&six(), &better, &params(&["MED_SL"]));

        let n = 6.0;
        for entry in &a.entries {
            let other = b.entries.iter().find(|e| e.code == entry.code).unwrap();
            assert!(
                (entry.context_rank + other.context_rank - (1.0 + 1.0 / n)).abs() < 1e-12,
                "opposite polarities give complementary badness ranks"
            );
        }
    }

    #[test]
    fn composite_is_mean_of_context_ranks() {
        let cat = catalogue(&[
            ("MED_SL", Polarity::HigherIsBetter),
            ("FDep", Polarity::HigherIsWorse),
        ]);
        let ranking = rank_gaps(&six(), &cat, &params(&["MED_SL", "FDep"]));

        let t1 = ranking.entries.iter().find(|e| e.code == "1").unwrap();
        // MED_SL 20 is the 2nd lowest => descending rank 5/6; FDep 0.5 is 5th => 5/6
        assert!((t1.context_rank - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn limit_truncates() {
        let cat = catalogue(&[]);
        let mut p = params(&["MED_SL"]);
        p.limit = Some(2);
        assert_eq!(rank_gaps(&six(), &cat, &p).entries.len(), 2);
    }

    #[test]
    fn small_sample_is_skipped() {
        let small = table(
            &["INCI_AVC", "MED_SL"],
            &[
                ("1", &[Some(1.0), Some(1.0)]),
                ("2", &[Some(2.0), Some(2.0)]),
                ("3", &[Some(3.0), None]),
                ("4", &[Some(4.0), Some(4.0)]),
                ("5", &[Some(5.0), Some(5.0)]),
            ],
        );
        let ranking = rank_gaps(&small, &catalogue(&[]), &params(&["MED_SL"]));
        assert!(ranking.entries.is_empty());
        assert_eq!(ranking.sample_size, 4);
        assert_eq!(ranking.skipped, Some(GapSkipReason::InsufficientSample));
    }

    #[test]
    fn unknown_target_and_context() {
        let mut p = params(&["MED_SL"]);
        p.target.pathology = Pathology::InsuCard;
        let ranking = rank_gaps(&six(), &catalogue(&[]), &p);
        assert_eq!(ranking.skipped, Some(GapSkipReason::UnknownTarget));

        let ranking = rank_gaps(&six(), &catalogue(&[]), &params(&["Nope"]));
        assert_eq!(ranking.skipped, Some(GapSkipReason::NoContextVariables));
    }

    #[test]
    fn inci_cnr_resolves_to_global_rate() {
        let t = table(&["Taux_CNR"], &[("1", &[Some(1.0)])]);
        let target = HealthTarget {
            indicator: HealthIndicator::Inci,
            pathology: Pathology::Cnr,
        };
        assert_eq!(resolve_health_target(&t, &target).as_deref(), Some("Taux_CNR"));

        let mort = HealthTarget {
            indicator: HealthIndicator::Mort,
            pathology: Pathology::Cnr,
        };
        assert_eq!(resolve_health_target(&t, &mort), None);
    }
}
