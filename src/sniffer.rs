//! Dialect and header sniffing.

use tracing::{debug, trace};

use crate::context::DEFAULT_FIELD_SIZE_LIMIT;
use crate::dialect::Dialect;
use crate::error::{CsvError, Result};
use crate::field::Record;
use crate::field_type::{Type, TypeClass};
use crate::metadata::Metadata;
use crate::sample::SampleSize;
use crate::tum::potential_dialects::{
    DELIMITERS, LineTerminator, detect_line_terminator, generate_potential_dialects,
};
use crate::tum::regexes::{
    backslash_escape_pattern, bracketed_field_pattern, doubled_quote_pattern,
};
use crate::tum::score::{find_best_dialect, score_all_dialects};
use crate::tum::table::{Table, parse_table};
use crate::tum::type_detection::{detect_cell_type, infer_column_types};

/// Quote characters considered when picking the dialect's quotechar.
const QUOTE_CANDIDATES: [char; 2] = ['"', '\''];

/// Infers a [`Dialect`] and header presence from a text sample.
///
/// # Example
///
/// ```
/// use csv_dialect::{SampleSize, Sniffer};
///
/// let mut sniffer = Sniffer::new();
/// sniffer.sample_size(SampleSize::Records(50));
///
/// let sample = "name;age;joined\nAlice;30;2021-01-04\nBob;24;2020-07-19\n";
/// let dialect = sniffer.sniff(sample, None).unwrap();
/// assert_eq!(dialect.delimiter(), ';');
/// assert!(sniffer.has_header(sample));
/// ```
#[derive(Debug, Clone)]
pub struct Sniffer {
    sample_size: SampleSize,
    field_size_limit: usize,
}

impl Default for Sniffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sniffer {
    pub fn new() -> Self {
        Self {
            sample_size: SampleSize::default(),
            field_size_limit: DEFAULT_FIELD_SIZE_LIMIT,
        }
    }

    /// Set how much of each sample is examined.
    pub fn sample_size(&mut self, sample_size: SampleSize) -> &mut Self {
        self.sample_size = sample_size;
        self
    }

    /// Set the field size limit for trial parses.
    pub fn field_size_limit(&mut self, limit: usize) -> &mut Self {
        self.field_size_limit = limit;
        self
    }

    /// Infer the dialect of `sample`.
    ///
    /// `delimiters` restricts the delimiter candidates to its characters;
    /// `None` tries `, ; \t | ^ ~`.
    pub fn sniff(&self, sample: &str, delimiters: Option<&str>) -> Result<Dialect> {
        let sample = self.sample_size.apply(sample);
        if sample.trim().is_empty() {
            return Err(CsvError::EmptySample);
        }

        let mut candidates: Vec<char> = match delimiters {
            Some(chars) => chars.chars().collect(),
            None => DELIMITERS.to_vec(),
        };
        // dedup while keeping the caller's order
        let mut seen = Vec::with_capacity(candidates.len());
        candidates.retain(|c| {
            let fresh = !seen.contains(c);
            seen.push(*c);
            fresh
        });

        let dialects = generate_potential_dialects(&candidates);
        let scores = score_all_dialects(sample, &dialects, 0, self.field_size_limit);
        let best = find_best_dialect(&scores).ok_or(CsvError::UndeterminedDelimiter)?;
        let delimiter = best.dialect.delimiter;

        let quotechar = detect_quotechar(sample, delimiter);
        let (doublequote, escapechar) = detect_quote_escaping(sample, delimiter, quotechar);
        let lineterminator = detect_line_terminator(sample).unwrap_or(LineTerminator::CRLF);

        let dialect = Dialect::builder()
            .delimiter(delimiter)
            .quotechar(Some(quotechar))
            .doublequote(doublequote)
            .escapechar(escapechar)
            .skipinitialspace(detect_skipinitialspace(sample, delimiter))
            .lineterminator(lineterminator.as_str())
            .build()?;

        debug!(
            dialect = %dialect,
            gamma = best.gamma,
            fields = best.num_fields,
            "sniffed dialect"
        );
        Ok(dialect)
    }

    /// Whether the first record of `sample` looks like a header.
    ///
    /// The sample is read with its sniffed dialect, or `excel` when sniffing
    /// fails. Fewer than two records never have a header.
    pub fn has_header(&self, sample: &str) -> bool {
        let dialect = self.sniff(sample, None).unwrap_or_else(|e| {
            trace!(error = %e, "header check falls back to excel");
            Dialect::excel()
        });
        let sample = self.sample_size.apply(sample);
        let table = parse_table(sample, &dialect, 0, self.field_size_limit);
        detect_header(&table)
    }

    /// Sniff the dialect and header, then describe the columns.
    ///
    /// `delimiters` has the same meaning as for [`sniff`](Self::sniff).
    pub fn analyze(&self, sample: &str, delimiters: Option<&str>) -> Result<Metadata> {
        let dialect = self.sniff(sample, delimiters)?;
        let sample = self.sample_size.apply(sample);
        let table = parse_table(sample, &dialect, 0, self.field_size_limit);

        let has_header = detect_header(&table);
        let num_fields = table.modal_field_count();

        let (fields, types) = match table.rows.split_first() {
            Some((header, data)) if has_header => {
                let data = Table::from_rows(data.to_vec());
                (header.clone(), column_types(&data, num_fields))
            }
            _ => (
                Metadata::generated_names(num_fields),
                column_types(&table, num_fields),
            ),
        };

        let avg_record_len = sample.chars().count() / table.num_rows().max(1);

        Ok(Metadata {
            dialect,
            has_header,
            num_fields,
            fields,
            types,
            avg_record_len,
        })
    }
}

/// Types for exactly `num_fields` columns.
fn column_types(table: &Table, num_fields: usize) -> Vec<Type> {
    let mut types = infer_column_types(table);
    types.resize(num_fields, Type::NULL);
    types
}

/// The quote candidate bracketing the most whole fields; `"` when none does.
fn detect_quotechar(sample: &str, delimiter: char) -> char {
    let mut best = None;
    let mut best_count = 0;

    for quote in QUOTE_CANDIDATES.into_iter().filter(|&q| q != delimiter) {
        let count = bracketed_field_pattern(delimiter, quote)
            .map_or(0, |re| re.find_iter(sample).count());
        trace!(?quote, count, "bracketed fields");
        if count > best_count {
            best = Some(quote);
            best_count = count;
        }
    }

    best.unwrap_or(if delimiter == '"' { '\'' } else { '"' })
}

/// `(doublequote, escapechar)` for `quote`.
///
/// Doubled quotes inside a field mean `doublequote`; otherwise a
/// backslash before a quote means escaping with `\`.
fn detect_quote_escaping(sample: &str, delimiter: char, quote: char) -> (bool, Option<char>) {
    let matches = |pattern: Option<regex::Regex>| pattern.is_some_and(|re| re.is_match(sample));

    if matches(doubled_quote_pattern(delimiter, quote)) {
        (true, None)
    } else if matches(backslash_escape_pattern(delimiter, quote)) {
        (false, Some('\\'))
    } else {
        (true, None)
    }
}

/// True when every delimiter occurrence is followed by a space.
fn detect_skipinitialspace(sample: &str, delimiter: char) -> bool {
    let mut total = 0;
    let mut spaced = 0;
    let mut chars = sample.chars().peekable();
    while let Some(c) = chars.next() {
        if c == delimiter {
            total += 1;
            if chars.peek() == Some(&' ') {
                spaced += 1;
            }
        }
    }
    total > 0 && total == spaced
}

/// Column-by-column vote of the first row against the rows below it.
///
/// A column votes for a header when the type class of its first cell differs
/// from the class shared by its data cells, and against when they agree.
/// Columns whose data is empty or mixes classes, and empty header cells, do
/// not vote. Only rows as wide as the first row are considered.
fn detect_header(table: &Table) -> bool {
    let Some((header, data)) = table.rows.split_first() else {
        return false;
    };
    if data.is_empty() {
        return false;
    }

    let mut votes: i64 = 0;
    for (col, cell) in header.iter().enumerate() {
        let header_class = detect_cell_type(cell).class();
        if header_class == TypeClass::Null {
            continue;
        }
        let Some(data_class) = column_class(data, col, header.len()) else {
            continue;
        };
        votes += if header_class == data_class { -1 } else { 1 };
    }

    trace!(votes, "header votes");
    votes > 0
}

/// The class shared by every non-null cell of `col`, if there is one.
fn column_class(rows: &[Record], col: usize, width: usize) -> Option<TypeClass> {
    let mut class = None;
    for row in rows.iter().filter(|r| r.len() == width) {
        let cell_class = detect_cell_type(&row[col]).class();
        match class {
            _ if cell_class == TypeClass::Null => {}
            None => class = Some(cell_class),
            Some(prev) if prev != cell_class => return None,
            Some(_) => {}
        }
    }
    class
}
