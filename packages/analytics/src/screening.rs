//! Determinant screening by simple linear regression.
//!
//! Regresses each health outcome on each candidate determinant and ranks
//! the pairs by explained variance.

use seniaura_analytics_models::RegressionStats;
use seniaura_territory_models::TerritoryTable;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Outcomes screened when the request names none.
pub const DEFAULT_OUTCOMES: &[&str] = &[
    "INCI_AVC",
    "INCI_CardIsch",
    "INCI_InsuCard",
    "MORT_AVC",
    "MORT_CardIsch",
    "MORT_InsuCard",
    "Taux_CNR",
];

/// Determinants screened when the request names none.
pub const DEFAULT_DETERMINANTS: &[&str] = &[
    "FDep_2021",
    "Revenu médian",
    "Taux de chomeurs",
    "Taux d'ouvriers",
    "Taux de bacheliers",
    "APL-med_general_2023",
    "APL-infirmieres_2023",
    "POP_2021",
];

/// Minimum complete pairs for a regression.
pub const MIN_OBSERVATIONS: usize = 3;

/// Fits `y = slope * x + intercept` by least squares.
///
/// Returns `None` for fewer than [`MIN_OBSERVATIONS`] points or a
/// constant `x`.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::similar_names)]
pub fn linear_regression(x: &[f64], y: &[f64]) -> Option<(f64, f64, f64, f64)> {
    let n = x.len().min(y.len());
    if n < MIN_OBSERVATIONS {
        return None;
    }
    let nf = n as f64;
    let mean_x = x[..n].iter().sum::<f64>() / nf;
    let mean_y = y[..n].iter().sum::<f64>() / nf;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x[..n].iter().zip(&y[..n]) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = slope.mul_add(-mean_x, mean_y);
    let r = if syy == 0.0 {
        0.0
    } else {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    };

    let df = nf - 2.0;
    let p_value = if r.abs() >= 1.0 {
        0.0
    } else {
        let t = r * (df / (1.0 - r * r)).sqrt();
        student_t_two_sided(t, df)
    };

    Some((slope, intercept, r, p_value))
}

/// Runs every outcome × determinant regression on complete rows.
///
/// Columns absent from the dataset are skipped, as are pairs with too
/// few complete rows. Results are sorted by `r²` descending.
#[must_use]
pub fn screen(table: &TerritoryTable, outcomes: &[String], determinants: &[String]) -> Vec<RegressionStats> {
    let defaults = |list: &[&str]| list.iter().map(ToString::to_string).collect::<Vec<_>>();
    let outcomes = if outcomes.is_empty() {
        table.valid_variables(&defaults(DEFAULT_OUTCOMES))
    } else {
        table.valid_variables(outcomes)
    };
    let determinants = if determinants.is_empty() {
        table.valid_variables(&defaults(DEFAULT_DETERMINANTS))
    } else {
        table.valid_variables(determinants)
    };

    let mut results = Vec::new();

    for outcome in &outcomes {
        for determinant in &determinants {
            if outcome == determinant {
                continue;
            }
            let (x, y): (Vec<f64>, Vec<f64>) = table
                .iter()
                .filter_map(|t| t.value(determinant).zip(t.value(outcome)))
                .unzip();

            let Some((slope, intercept, r, p_value)) = linear_regression(&x, &y) else {
                log::debug!("Skipping {determinant} -> {outcome}: {} complete rows", x.len());
                continue;
            };

            results.push(RegressionStats {
                outcome: outcome.clone(),
                determinant: determinant.clone(),
                slope,
                intercept,
                r,
                r_squared: r * r,
                p_value,
                n: x.len(),
            });
        }
    }

    results.sort_by(|a, b| b.r_squared.total_cmp(&a.r_squared));
    results
}

/// Two-sided p-value of a Student t statistic with `df` degrees of
/// freedom.
#[must_use]
pub fn student_t_two_sided(t: f64, df: f64) -> f64 {
    if !t.is_finite() {
        return 0.0;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
        Err(e) => {
            log::warn!("No Student t distribution for {df} degrees of freedom: {e}");
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{table, vars};

    #[test]
    fn perfect_line() {
        let (slope, intercept, r, p) = linear_regression(&[1.0, 2.0, 3.0, 4.0], &[3.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
        assert!((r - 1.0).abs() < 1e-12);
        assert!(p.abs() < 1e-12);
    }

    #[test]
    fn constant_x_is_skipped() {
        assert!(linear_regression(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_none());
        assert!(linear_regression(&[1.0, 2.0], &[1.0, 2.0]).is_none());
    }

    #[test]
    fn student_t_reference_values() {
        // t = 2 with 10 df: two-sided p ≈ 0.0734
        assert!((student_t_two_sided(2.0, 10.0) - 0.073_388).abs() < 1e-4);
        // t = 0: p = 1
        assert!((student_t_two_sided(0.0, 5.0) - 1.0).abs() < 1e-9);
        // t = 12.706 with 1 df is the 97.5% quantile
        assert!((student_t_two_sided(12.706, 1.0) - 0.05).abs() < 1e-3);
        assert!(student_t_two_sided(f64::INFINITY, 4.0).abs() < f64::EPSILON);
        // no distribution without degrees of freedom
        assert!((student_t_two_sided(1.0, 0.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn screen_sorts_by_r_squared() {
        let t = table(
            &["Y", "Strong", "Weak"],
            &[
                ("1", &[Some(1.0), Some(1.0), Some(2.0)]),
                ("2", &[Some(2.0), Some(2.1), Some(1.0)]),
                ("3", &[Some(3.0), Some(2.9), Some(4.0)]),
                ("4", &[Some(4.0), Some(4.0), Some(1.0)]),
                ("5", &[Some(5.0), None, Some(3.0)]),
            ],
        );
        let results = screen(&t, &vars(&["Y"]), &vars(&["Weak", "Strong", "Missing"]));

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].determinant, "Strong");
        assert_eq!(results[0].n, 4);
        assert_eq!(results[1].determinant, "Weak");
        assert_eq!(results[1].n, 5);
        assert!(results[0].r_squared >= results[1].r_squared);
        for r in &results {
            assert!((0.0..=1.0).contains(&r.p_value));
        }
    }

    #[test]
    fn defaults_apply_when_lists_are_empty() {
        let t = table(
            &["INCI_AVC", "FDep_2021"],
            &[
                ("1", &[Some(1.0), Some(0.3)]),
                ("2", &[Some(2.0), Some(0.1)]),
                ("3", &[Some(4.0), Some(0.2)]),
            ],
        );
        let results = screen(&t, &[], &[]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].outcome, "INCI_AVC");
        assert_eq!(results[0].determinant, "FDep_2021");
    }
}
