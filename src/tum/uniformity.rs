//! Table uniformity measures.
//!
//! - `tau_0` (consistency): how close the field counts are to each other
//! - `tau_1` (dispersion): range, transitions and modal dominance of the counts

use super::table::Table;

/// `tau_0 = 1 / (1 + 2 * sigma)` where sigma is the standard deviation of
/// the field counts. 1.0 means every row has the same count.
pub fn calculate_tau_0(table: &Table) -> f64 {
    if table.field_counts.is_empty() {
        return 0.0;
    }

    let sigma = standard_deviation(&table.field_counts);
    1.0 / 2.0f64.mul_add(sigma, 1.0)
}

/// Weighted mix of range, transition and mode scores, in `[0, 1]`.
pub fn calculate_tau_1(table: &Table) -> f64 {
    let n = table.field_counts.len();
    match n {
        0 => return 0.0,
        1 => return 1.0,
        _ => {}
    }

    let min_fc = table.min_field_count();
    let max_fc = table.max_field_count();
    let range_score = if max_fc == 0 {
        0.0
    } else {
        1.0 - ((max_fc - min_fc) as f64 / max_fc as f64).min(1.0)
    };

    let transitions = table
        .field_counts
        .windows(2)
        .filter(|w| w[0] != w[1])
        .count();
    let transition_score = 1.0 - (transitions as f64 / (n - 1) as f64);

    let mode_score = table.modal_field_count_freq() as f64 / n as f64;

    // range * 0.3 + transitions * 0.3 + mode * 0.4
    mode_score.mul_add(0.4, range_score * 0.3 + transition_score * 0.3)
}

fn standard_deviation(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<usize>() as f64 / n;
    let variance = values
        .iter()
        .map(|&v| {
            let diff = v as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Whether every row has the same field count.
pub fn is_uniform(table: &Table) -> bool {
    table.field_counts.windows(2).all(|w| w[0] == w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(counts: Vec<usize>) -> Table {
        let mut table = Table::new();
        table.field_counts = counts;
        table.update_modal_field_count();
        table
    }

    #[test]
    fn test_tau_0() {
        assert!((calculate_tau_0(&table(vec![3, 3, 3, 3])) - 1.0).abs() < 0.001);

        let varied = calculate_tau_0(&table(vec![3, 4, 3, 5, 3]));
        assert!(varied < 1.0 && varied > 0.0);
    }

    #[test]
    fn test_tau_1() {
        assert!((calculate_tau_1(&table(vec![3, 3, 3, 3, 3])) - 1.0).abs() < 0.001);
        assert!(calculate_tau_1(&table(vec![1, 5, 1, 5])) < 0.5);
        assert_eq!(calculate_tau_1(&table(vec![7])), 1.0);
    }

    #[test]
    fn test_is_uniform() {
        assert!(is_uniform(&table(vec![3, 3, 3])));
        assert!(!is_uniform(&table(vec![3, 4, 3])));
        assert!(is_uniform(&table(Vec::new())));
    }
}
