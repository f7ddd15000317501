//! Trial parse of a sample into a table for scoring.

use foldhash::{HashMap, HashMapExt};

use super::potential_dialects::PotentialDialect;
use crate::dialect::{Dialect, Quoting};
use crate::field::Record;
use crate::reader::Reader;
use crate::stream::text_lines;

/// Rows of a sample parsed under one candidate dialect.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub rows: Vec<Record>,
    pub field_counts: Vec<usize>,
    cached_modal_field_count: usize,
    cached_modal_freq: usize,
}

impl Table {
    pub const fn new() -> Self {
        Self {
            rows: Vec::new(),
            field_counts: Vec::new(),
            cached_modal_field_count: 0,
            cached_modal_freq: 0,
        }
    }

    /// Build a table from already-split rows.
    pub fn from_rows(rows: Vec<Record>) -> Self {
        let field_counts = rows.iter().map(Vec::len).collect();
        let mut table = Self {
            rows,
            field_counts,
            ..Self::new()
        };
        table.update_modal_field_count();
        table
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Most common field count. Ties go to the larger count.
    #[inline]
    pub fn modal_field_count(&self) -> usize {
        self.cached_modal_field_count
    }

    /// Number of rows having the modal field count.
    #[inline]
    pub fn modal_field_count_freq(&self) -> usize {
        self.cached_modal_freq
    }

    /// Recompute the cached mode. Call after modifying `field_counts`.
    pub fn update_modal_field_count(&mut self) {
        let mut counts: HashMap<usize, usize> = HashMap::with_capacity(self.field_counts.len());
        for &fc in &self.field_counts {
            *counts.entry(fc).or_insert(0) += 1;
        }

        let (mode, freq) = counts
            .into_iter()
            .max_by(|(fc_a, count_a), (fc_b, count_b)| {
                count_a.cmp(count_b).then_with(|| fc_a.cmp(fc_b))
            })
            .unwrap_or((0, 0));
        self.cached_modal_field_count = mode;
        self.cached_modal_freq = freq;
    }

    #[inline]
    pub fn min_field_count(&self) -> usize {
        self.field_counts.iter().copied().min().unwrap_or(0)
    }

    #[inline]
    pub fn max_field_count(&self) -> usize {
        self.field_counts.iter().copied().max().unwrap_or(0)
    }
}

/// Dialect used to trial-parse with `candidate`.
///
/// Returns `None` for candidates no dialect can express, such as a line
/// break used as delimiter.
pub fn candidate_dialect(candidate: &PotentialDialect) -> Option<Dialect> {
    let mut builder = Dialect::builder();
    builder.delimiter(candidate.delimiter).strict(false);
    match candidate.quote {
        Some(q) => builder.quotechar(Some(q)),
        None => builder.quoting(Quoting::None),
    };
    builder.build().ok()
}

/// Parse `sample` under `dialect`, stopping at the first malformed line.
///
/// Blank lines are skipped. `max_rows == 0` means no row limit.
pub fn parse_table(sample: &str, dialect: &Dialect, max_rows: usize, field_limit: usize) -> Table {
    let limit = if max_rows == 0 { usize::MAX } else { max_rows };
    let reader = Reader::new(text_lines(sample), dialect.clone()).with_field_limit(field_limit);

    let mut rows = Vec::new();
    for result in reader {
        let Ok(row) = result else { break };
        if row.len() == 1 && row[0].trim().is_empty() {
            continue;
        }
        rows.push(row);
        if rows.len() >= limit {
            break;
        }
    }

    Table::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DEFAULT_FIELD_SIZE_LIMIT;

    fn parse(sample: &str, delimiter: char, quote: Option<char>) -> Table {
        let dialect = candidate_dialect(&PotentialDialect::new(delimiter, quote)).unwrap();
        parse_table(sample, &dialect, 0, DEFAULT_FIELD_SIZE_LIMIT)
    }

    #[test]
    fn test_parse_simple_csv() {
        let table = parse("a,b,c\n1,2,3\n\n4,5,6\n", ',', Some('"'));
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.field_counts, vec![3, 3, 3]);
        assert_eq!(table.rows[0], vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_quoted_csv() {
        let table = parse("\"a,b\",c,d\n1,2,3\n", ',', Some('"'));
        assert_eq!(table.rows[0], vec!["a,b", "c", "d"]);

        let unquoted = parse("\"a,b\",c,d\n1,2,3\n", ',', None);
        assert_eq!(unquoted.field_counts, vec![4, 3]);
    }

    #[test]
    fn test_stops_at_malformed_line() {
        let table = parse("a,b\n\"open,x\nc,d\n", ',', Some('"'));
        assert_eq!(table.num_rows(), 1);
    }

    #[test]
    fn test_row_limit() {
        let dialect = Dialect::excel();
        let table = parse_table("a\nb\nc\n", &dialect, 2, DEFAULT_FIELD_SIZE_LIMIT);
        assert_eq!(table.num_rows(), 2);
    }

    #[test]
    fn test_modal_field_count() {
        let mut table = Table::new();
        table.field_counts = vec![3, 3, 3, 4, 3];
        table.update_modal_field_count();
        assert_eq!(table.modal_field_count(), 3);
        assert_eq!(table.modal_field_count_freq(), 4);

        table.field_counts = vec![2, 5];
        table.update_modal_field_count();
        assert_eq!(table.modal_field_count(), 5);
    }

    #[test]
    fn test_unrepresentable_candidate() {
        assert!(candidate_dialect(&PotentialDialect::new('\n', Some('"'))).is_none());
    }
}
