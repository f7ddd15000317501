//! Combined scoring of candidate dialects.
//!
//! The gamma score combines uniformity, type consistency and pattern
//! specificity, then scales by delimiter, sample size and quote evidence.

use std::cmp::Ordering;

use tracing::trace;

use super::potential_dialects::PotentialDialect;
use super::table::{Table, candidate_dialect, parse_table};
use super::type_detection::{calculate_pattern_score, calculate_type_score};
use super::uniformity::{calculate_tau_0, calculate_tau_1, is_uniform};

/// Quote character counts for the whole sample, computed once per sniff.
#[derive(Debug, Clone, Copy)]
pub struct QuoteCounts {
    double: usize,
    single: usize,
    len: usize,
}

impl QuoteCounts {
    pub fn new(sample: &str) -> Self {
        let bytes = sample.as_bytes();
        Self {
            double: bytecount::count(bytes, b'"'),
            single: bytecount::count(bytes, b'\''),
            len: bytes.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DialectScore {
    pub dialect: PotentialDialect,
    /// Higher is better; 0.0 means the candidate is not consistent.
    pub gamma: f64,
    pub tau_0: f64,
    pub tau_1: f64,
    pub type_score: f64,
    pub num_rows: usize,
    /// Modal field count.
    pub num_fields: usize,
    pub is_uniform: bool,
}

impl DialectScore {
    pub fn new(dialect: PotentialDialect, table: &Table) -> Self {
        let tau_0 = calculate_tau_0(table);
        let tau_1 = calculate_tau_1(table);
        let type_score = calculate_type_score(table);
        let pattern_score = calculate_pattern_score(table);

        let gamma = compute_gamma(
            tau_0,
            tau_1,
            type_score,
            pattern_score,
            table,
            dialect.delimiter,
        );

        Self {
            dialect,
            gamma,
            tau_0,
            tau_1,
            type_score,
            num_rows: table.num_rows(),
            num_fields: table.modal_field_count(),
            is_uniform: is_uniform(table),
        }
    }

    pub const fn zero(dialect: PotentialDialect) -> Self {
        Self {
            dialect,
            gamma: 0.0,
            tau_0: 0.0,
            tau_1: 0.0,
            type_score: 0.0,
            num_rows: 0,
            num_fields: 0,
            is_uniform: false,
        }
    }
}

/// Tables whose modal field count is below 2 score zero.
fn compute_gamma(
    tau_0: f64,
    tau_1: f64,
    type_score: f64,
    pattern_score: f64,
    table: &Table,
    delimiter: char,
) -> f64 {
    let field_count = table.modal_field_count();
    if table.is_empty() || field_count < 2 {
        return 0.0;
    }

    let uniformity_score = (tau_0 * tau_1).sqrt();
    let type_contribution = type_score * 0.3;
    let pattern_contribution = pattern_score * 0.1;
    let row_bonus = (table.num_rows().min(20) as f64 / 20.0) * 0.1;
    let field_bonus = (field_count.min(10) as f64 / 10.0) * 0.2;

    let high_field_penalty = if field_count > 100 {
        0.5
    } else if field_count > 50 {
        0.8
    } else {
        1.0
    };

    let small_sample_penalty = match table.num_rows() {
        0..3 => 0.70,
        3..5 => 0.85,
        _ => 1.0,
    };

    let delimiter_penalty = match delimiter {
        ',' | ';' | '\t' => 1.0,
        '|' => 0.98,
        ':' => 0.90,
        '^' | '~' => 0.80,
        ' ' => 0.75,
        '/' => 0.65,
        '#' | '&' => 0.60,
        _ => 0.70,
    };

    let raw_score = uniformity_score.mul_add(0.5, type_contribution)
        + pattern_contribution
        + row_bonus
        + field_bonus;

    raw_score * high_field_penalty * delimiter_penalty * small_sample_penalty
}

/// Score multiplier from the density of quote characters in the sample.
///
/// Conservative with single quotes, since apostrophes in prose are common.
fn quote_evidence(counts: &QuoteCounts, dialect: &PotentialDialect) -> f64 {
    if counts.len == 0 {
        return 1.0;
    }

    // quotes per 1000 bytes; 5 is the significance threshold
    let double_density = (counts.double * 1000) / counts.len;
    let single_density = (counts.single * 1000) / counts.len;
    let threshold = 5;

    match dialect.quote {
        Some('"') if double_density >= threshold => 1.03,
        Some('\'') if single_density >= threshold * 2 && double_density < threshold => 1.05,
        Some('\'') if double_density >= threshold => 0.95,
        None if double_density >= threshold || single_density >= threshold * 2 => 0.90,
        _ => 1.0,
    }
}

/// Trial-parse `sample` with `dialect` and score the result.
pub fn score_dialect(
    sample: &str,
    dialect: &PotentialDialect,
    max_rows: usize,
    field_limit: usize,
    counts: &QuoteCounts,
) -> DialectScore {
    let Some(parse_dialect) = candidate_dialect(dialect) else {
        return DialectScore::zero(*dialect);
    };
    let table = parse_table(sample, &parse_dialect, max_rows, field_limit);
    if table.is_empty() {
        return DialectScore::zero(*dialect);
    }

    let mut score = DialectScore::new(*dialect, &table);
    score.gamma *= quote_evidence(counts, dialect);

    trace!(
        delimiter = ?dialect.delimiter,
        quote = ?dialect.quote,
        gamma = score.gamma,
        tau_0 = score.tau_0,
        tau_1 = score.tau_1,
        type_score = score.type_score,
        fields = score.num_fields,
        rows = score.num_rows,
        "scored candidate dialect"
    );
    score
}

/// Score every candidate, best first.
pub fn score_all_dialects(
    sample: &str,
    dialects: &[PotentialDialect],
    max_rows: usize,
    field_limit: usize,
) -> Vec<DialectScore> {
    let counts = QuoteCounts::new(sample);
    let mut scores: Vec<DialectScore> = dialects
        .iter()
        .map(|d| score_dialect(sample, d, max_rows, field_limit, &counts))
        .collect();
    scores.sort_by(|a, b| b.gamma.partial_cmp(&a.gamma).unwrap_or(Ordering::Equal));
    scores
}

/// The best consistent candidate.
///
/// Scores within 10% of each other are ranked by delimiter priority, then
/// quote priority, then gamma.
pub fn find_best_dialect(scores: &[DialectScore]) -> Option<&DialectScore> {
    scores.iter().filter(|s| s.gamma > 0.0).max_by(|a, b| {
        let ratio = a.gamma.min(b.gamma) / a.gamma.max(b.gamma);
        let by_gamma = a.gamma.partial_cmp(&b.gamma).unwrap_or(Ordering::Equal);
        if ratio > 0.90 {
            delimiter_priority(a.dialect.delimiter)
                .cmp(&delimiter_priority(b.dialect.delimiter))
                .then_with(|| quote_priority(a.dialect.quote).cmp(&quote_priority(b.dialect.quote)))
                .then(by_gamma)
        } else {
            by_gamma
        }
    })
}

/// Higher is preferred.
const fn delimiter_priority(delimiter: char) -> u8 {
    match delimiter {
        ',' => 10,
        ';' => 9,
        '\t' => 8,
        '|' => 7,
        ':' => 4,
        '^' | '~' => 3,
        ' ' | '/' => 2,
        '#' | '&' => 1,
        _ => 0,
    }
}

/// Higher is preferred.
const fn quote_priority(quote: Option<char>) -> u8 {
    match quote {
        Some('"') => 3,
        Some('\'') => 2,
        None => 1,
        Some(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DEFAULT_FIELD_SIZE_LIMIT;

    fn score(sample: &str, delimiter: char, quote: Option<char>) -> DialectScore {
        let counts = QuoteCounts::new(sample);
        score_dialect(
            sample,
            &PotentialDialect::new(delimiter, quote),
            100,
            DEFAULT_FIELD_SIZE_LIMIT,
            &counts,
        )
    }

    #[test]
    fn test_score_simple_csv() {
        let score = score("a,b,c\n1,2,3\n4,5,6\n", ',', Some('"'));
        assert!(score.gamma > 0.0);
        assert_eq!(score.num_fields, 3);
        assert!(score.is_uniform);
    }

    #[test]
    fn test_single_field_is_not_consistent() {
        let score = score("a,b,c\n1,2,3\n4,5,6\n", ';', Some('"'));
        assert_eq!(score.num_fields, 1);
        assert_eq!(score.gamma, 0.0);
    }

    #[test]
    fn test_find_best_dialect() {
        let sample = "a;b;c\n1;2;3\n4;5;6\n";
        let dialects = vec![
            PotentialDialect::new(',', Some('"')),
            PotentialDialect::new(';', Some('"')),
            PotentialDialect::new(';', None),
            PotentialDialect::new('\t', Some('"')),
        ];
        let scores = score_all_dialects(sample, &dialects, 100, DEFAULT_FIELD_SIZE_LIMIT);
        let best = find_best_dialect(&scores).unwrap();
        assert_eq!(best.dialect, PotentialDialect::new(';', Some('"')));
    }

    #[test]
    fn test_no_consistent_candidate() {
        let dialects = vec![PotentialDialect::new(',', Some('"'))];
        let scores = score_all_dialects("just words\n", &dialects, 100, DEFAULT_FIELD_SIZE_LIMIT);
        assert!(find_best_dialect(&scores).is_none());
    }

    #[test]
    fn test_quote_evidence() {
        let quoted = QuoteCounts::new("\"a\",\"b\"\n\"c\",\"d\"\n");
        assert!(quote_evidence(&quoted, &PotentialDialect::new(',', Some('"'))) > 1.0);
        assert!(quote_evidence(&quoted, &PotentialDialect::new(',', None)) < 1.0);

        let plain = QuoteCounts::new("a,b\nc,d\n");
        assert_eq!(quote_evidence(&plain, &PotentialDialect::new(',', None)), 1.0);
    }
}
