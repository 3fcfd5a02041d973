//! Percentile ranks with average tie-breaking.

/// Direction of a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Largest value ranks 1.0.
    Ascending,
    /// Smallest value ranks 1.0.
    Descending,
}

/// Percentile rank of each value, `rank / n`.
///
/// Ranks are 1-based; tied values share the average of the ranks they
/// span. The result is aligned with the input.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentile_rank(values: &[f64], order: Order) -> Vec<f64> {
    let n = values.len();
    let mut indices: Vec<usize> = (0..n).collect();
    indices.sort_by(|&a, &b| match order {
        Order::Ascending => values[a].total_cmp(&values[b]),
        Order::Descending => values[b].total_cmp(&values[a]),
    });

    let mut ranks = vec![0.0; n];
    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && values[indices[end]] == values[indices[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let average = (start + 1 + end) as f64 / 2.0;
        for &i in &indices[start..end] {
            ranks[i] = average / n as f64;
        }
        start = end;
    }

    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascending_ranks() {
        let ranks = percentile_rank(&[30.0, 10.0, 20.0, 40.0], Order::Ascending);
        assert_eq!(ranks, vec![0.75, 0.25, 0.5, 1.0]);
    }

    #[test]
    fn descending_ranks() {
        let ranks = percentile_rank(&[30.0, 10.0, 20.0, 40.0], Order::Descending);
        assert_eq!(ranks, vec![0.5, 1.0, 0.75, 0.25]);
    }

    #[test]
    fn ties_share_average_rank() {
        let ranks = percentile_rank(&[1.0, 2.0, 2.0, 3.0], Order::Ascending);
        assert_eq!(ranks, vec![0.25, 0.625, 0.625, 1.0]);

        let all_tied = percentile_rank(&[5.0, 5.0, 5.0], Order::Ascending);
        assert_eq!(all_tied, vec![2.0 / 3.0; 3]);
    }

    #[test]
    fn opposite_orders_are_complementary() {
        let values = [3.1, 0.4, 7.7, 2.2, 9.0, 5.5];
        let n = values.len() as f64;
        let asc = percentile_rank(&values, Order::Ascending);
        let desc = percentile_rank(&values, Order::Descending);
        for (a, d) in asc.iter().zip(&desc) {
            assert!((a + d - (1.0 + 1.0 / n)).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_input() {
        assert!(percentile_rank(&[], Order::Ascending).is_empty());
    }
}
