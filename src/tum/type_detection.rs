//! Cell type detection and per-table type scores.

use super::regexes::*;
use super::table::Table;
use crate::field_type::Type;

/// String match instead of `NULL_PATTERN`; called for every cell.
#[inline]
fn is_null_value(s: &str) -> bool {
    matches!(
        s,
        "-" | "--"
            | "."
            | ".."
            | "?"
            | "null"
            | "NULL"
            | "Null"
            | "nil"
            | "NIL"
            | "none"
            | "NONE"
            | "None"
            | "na"
            | "NA"
            | "n/a"
            | "N/A"
            | "nan"
            | "NaN"
            | "NAN"
            | "#N/A"
            | "#VALUE!"
            | "#REF!"
            | "#DIV/0!"
    )
}

/// At most 19 digits so the value fits a `u64`.
#[inline]
fn is_unsigned_int(s: &str) -> bool {
    let s = s.strip_prefix('+').unwrap_or(s);
    !s.is_empty() && s.len() <= 19 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Negative integers only; positive ones are unsigned.
#[inline]
fn is_signed_int(s: &str) -> bool {
    s.strip_prefix('-')
        .is_some_and(|rest| !rest.is_empty() && rest.len() <= 19 && rest.bytes().all(|b| b.is_ascii_digit()))
}

#[inline]
fn is_boolean(s: &str) -> bool {
    match s.len() {
        1 => matches!(
            s.as_bytes()[0].to_ascii_lowercase(),
            b'y' | b'n' | b't' | b'f'
        ),
        2 => s.eq_ignore_ascii_case("on") || s.eq_ignore_ascii_case("no"),
        3 => s.eq_ignore_ascii_case("yes") || s.eq_ignore_ascii_case("off"),
        4 => s.eq_ignore_ascii_case("true"),
        5 => s.eq_ignore_ascii_case("false"),
        _ => false,
    }
}

/// Classify one cell. Surrounding whitespace is ignored.
pub fn detect_cell_type(value: &str) -> Type {
    let trimmed = value.trim();

    if trimmed.is_empty() || is_null_value(trimmed) {
        return Type::NULL;
    }
    // integers before booleans so that 1 and 0 count as numbers
    if is_unsigned_int(trimmed) {
        return Type::Unsigned;
    }
    if is_signed_int(trimmed) {
        return Type::Signed;
    }
    if is_boolean(trimmed) {
        return Type::Boolean;
    }
    if FLOAT_PATTERN.is_match(trimmed) || FLOAT_THOUSANDS_PATTERN.is_match(trimmed) {
        return Type::Float;
    }
    if DATETIME_ISO_PATTERN.is_match(trimmed) || DATETIME_GENERAL_PATTERN.is_match(trimmed) {
        return Type::DateTime;
    }
    if DATE_ISO_PATTERN.is_match(trimmed)
        || DATE_US_PATTERN.is_match(trimmed)
        || DATE_EURO_PATTERN.is_match(trimmed)
    {
        return Type::Date;
    }

    Type::Text
}

/// Mean per-column type consistency over the modal number of columns.
///
/// NULL cells neither help nor hurt a column.
pub fn calculate_type_score(table: &Table) -> f64 {
    let num_cols = table.modal_field_count();
    if table.is_empty() || num_cols == 0 {
        return 0.0;
    }

    let mut col_type_counts = vec![[0usize; Type::COUNT]; num_cols];
    let mut col_totals = vec![0usize; num_cols];

    for row in &table.rows {
        for (col_idx, cell) in row.iter().enumerate().take(num_cols) {
            col_type_counts[col_idx][detect_cell_type(cell).as_index()] += 1;
            col_totals[col_idx] += 1;
        }
    }

    let scores: Vec<f64> = col_type_counts
        .iter()
        .zip(&col_totals)
        .map(|(counts, &total)| consistency_from_counts(counts, total))
        .filter(|&s| s > 0.0)
        .collect();

    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

#[inline]
fn consistency_from_counts(type_counts: &[usize; Type::COUNT], total_cells: usize) -> f64 {
    if total_cells == 0 {
        return 0.0;
    }

    let null_index = Type::NULL.as_index();
    let non_null_total = total_cells - type_counts[null_index];
    if non_null_total == 0 {
        return 0.5;
    }

    let max_non_null = type_counts
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != null_index)
        .map(|(_, &c)| c)
        .max()
        .unwrap_or(0);

    max_non_null as f64 / non_null_total as f64
}

/// Merged type of every column, over the modal number of columns.
pub fn infer_column_types(table: &Table) -> Vec<Type> {
    (0..table.modal_field_count())
        .map(|col_idx| {
            table
                .rows
                .iter()
                .filter_map(|row| row.get(col_idx))
                .fold(Type::NULL, |merged, cell| merged.merge(detect_cell_type(cell)))
        })
        .collect()
}

/// Specificity weight of the first pattern matching `value`; plain text
/// scores 0.1.
pub fn pattern_specificity_score(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    pattern_categories()
        .iter()
        .find(|pc| pc.pattern.is_match(trimmed))
        .map_or(0.1, |pc| pc.weight)
}

/// Mean pattern specificity over every cell of the table.
pub fn calculate_pattern_score(table: &Table) -> f64 {
    let (total, count) = table
        .rows
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(total, count), cell| {
            (total + pattern_specificity_score(cell), count + 1)
        });

    if count == 0 {
        return 0.0;
    }
    total / count as f64
}
