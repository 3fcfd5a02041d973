//! Range filter evaluation.
//!
//! A territory is included when every filtered variable has a value inside
//! its range. Exclusions are counted per variable in two disjoint buckets:
//! the value is present but out of range, or the value is missing.

use std::collections::BTreeMap;

use seniaura_analytics_models::{FilterEvaluation, FilterExclusion, FilterSpec};
use seniaura_territory_models::TerritoryTable;

/// Evaluates range filters against every territory.
///
/// Filters are grouped by variable, so the result does not depend on
/// their order. Several filters on one variable intersect. Filters on
/// variables that are not dataset columns are ignored and reported.
#[must_use]
pub fn evaluate_filters(table: &TerritoryTable, filters: &[FilterSpec]) -> FilterEvaluation {
    let mut ranges: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    let mut ignored: Vec<String> = Vec::new();

    for filter in filters {
        if !table.has_column(&filter.variable) {
            if !ignored.contains(&filter.variable) {
                ignored.push(filter.variable.clone());
            }
            continue;
        }
        ranges
            .entry(filter.variable.as_str())
            .and_modify(|(low, high)| {
                *low = low.max(filter.low);
                *high = high.min(filter.high);
            })
            .or_insert((filter.low, filter.high));
    }

    if !ignored.is_empty() {
        log::debug!("Ignoring filters on unknown variables: {ignored:?}");
    }

    let mut exclusions: BTreeMap<&str, FilterExclusion> = ranges
        .keys()
        .map(|v| {
            (
                *v,
                FilterExclusion {
                    variable: (*v).to_string(),
                    out_of_range: 0,
                    missing: 0,
                },
            )
        })
        .collect();

    let mut mask = Vec::with_capacity(table.len());
    let mut included = Vec::new();

    for territory in table {
        let mut keep = true;
        for (variable, (low, high)) in &ranges {
            let Some(counts) = exclusions.get_mut(variable) else {
                continue;
            };
            match territory.value(variable) {
                Some(v) if *low <= v && v <= *high => {}
                Some(_) => {
                    counts.out_of_range += 1;
                    keep = false;
                }
                None => {
                    counts.missing += 1;
                    keep = false;
                }
            }
        }

        if keep {
            included.push(territory.code.clone());
        }
        mask.push(keep);
    }

    FilterEvaluation {
        mask,
        included,
        exclusions: exclusions.into_values().collect(),
        ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::table;

    fn scenario() -> TerritoryTable {
        table(
            &["X", "Y"],
            &[
                ("1", &[Some(5.0), Some(1.0)]),
                ("2", &[Some(15.0), Some(2.0)]),
                ("3", &[Some(25.0), None]),
                ("4", &[None, Some(4.0)]),
            ],
        )
    }

    #[test]
    fn mask_and_exclusion_counts() {
        let eval = evaluate_filters(&scenario(), &[FilterSpec::new("X", 10.0, 20.0)]);

        assert_eq!(eval.mask, vec![false, true, false, false]);
        assert_eq!(eval.included, vec!["2"]);
        let x = eval.exclusion("X").unwrap();
        assert_eq!(x.out_of_range, 2);
        assert_eq!(x.missing, 1);
    }

    #[test]
    fn no_filters_include_everything() {
        let eval = evaluate_filters(&scenario(), &[]);
        assert_eq!(eval.mask, vec![true; 4]);
        assert!(eval.exclusions.is_empty());
    }

    #[test]
    fn bounds_are_inclusive() {
        let eval = evaluate_filters(&scenario(), &[FilterSpec::new("X", 5.0, 15.0)]);
        assert_eq!(eval.mask, vec![true, true, false, false]);
    }

    #[test]
    fn order_independent() {
        let a = FilterSpec::new("X", 0.0, 20.0);
        let b = FilterSpec::new("Y", 1.5, 10.0);
        let forward = evaluate_filters(&scenario(), &[a.clone(), b.clone()]);
        let backward = evaluate_filters(&scenario(), &[b, a]);
        assert_eq!(forward, backward);
        assert_eq!(forward.mask, vec![false, true, false, false]);
    }

    #[test]
    fn filters_on_one_variable_intersect() {
        let eval = evaluate_filters(
            &scenario(),
            &[FilterSpec::new("X", 0.0, 20.0), FilterSpec::new("X", 10.0, 30.0)],
        );
        assert_eq!(eval.mask, vec![false, true, false, false]);
    }

    #[test]
    fn removing_a_filter_never_shrinks_the_included_set() {
        let filters = vec![FilterSpec::new("X", 0.0, 20.0), FilterSpec::new("Y", 1.5, 10.0)];
        let all = evaluate_filters(&scenario(), &filters);
        for skip in 0..filters.len() {
            let fewer: Vec<FilterSpec> = filters
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, f)| f.clone())
                .collect();
            let relaxed = evaluate_filters(&scenario(), &fewer);
            for (before, after) in all.mask.iter().zip(&relaxed.mask) {
                assert!(!before || *after, "a previously included territory was dropped");
            }
        }
    }

    #[test]
    fn each_failing_variable_counted_once() {
        let filters = vec![FilterSpec::new("X", 10.0, 20.0), FilterSpec::new("Y", 0.0, 3.0)];
        let t = scenario();
        let eval = evaluate_filters(&t, &filters);

        for exclusion in &eval.exclusions {
            let (low, high) = filters
                .iter()
                .find(|f| f.variable == exclusion.variable)
                .map(|f| (f.low, f.high))
                .unwrap();
            let failing = t
                .iter()
                .filter(|ter| !ter.value(&exclusion.variable).is_some_and(|v| low <= v && v <= high))
                .count();
            assert_eq!(exclusion.out_of_range + exclusion.missing, failing);
        }
    }

    #[test]
    fn unknown_variables_are_ignored() {
        let eval = evaluate_filters(
            &scenario(),
            &[FilterSpec::new("Z", 0.0, 1.0), FilterSpec::new("Z", 0.0, 2.0)],
        );
        assert_eq!(eval.mask, vec![true; 4]);
        assert_eq!(eval.ignored, vec!["Z"]);
    }

    #[test]
    fn inverted_range_excludes_everything_present() {
        let eval = evaluate_filters(&scenario(), &[FilterSpec::new("X", 20.0, 10.0)]);
        assert_eq!(eval.mask, vec![false; 4]);
        assert_eq!(eval.exclusion("X").unwrap().out_of_range, 3);
    }
}
