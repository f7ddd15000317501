//! Compiled regex patterns for cell classification and quote detection.

use std::sync::LazyLock;

use regex::Regex;

pub static NULL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(null|nil|none|na|n/a|\?|nan|-|--|\.|\.\.|#n/a|#value!|#ref!|#div/0!)$")
        .expect("Invalid null pattern")
});

pub static BOOLEAN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(true|false|yes|no|y|n|t|f|on|off)$").expect("Invalid boolean pattern")
});

pub static UNSIGNED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?\d{1,20}$").expect("Invalid unsigned pattern"));

pub static SIGNED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\d{1,20}$").expect("Invalid signed pattern"));

pub static FLOAT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:\d+\.?\d*|\d*\.?\d+)(?:[eE][-+]?\d+)?$").expect("Invalid float pattern")
});

/// US-style thousands separators: `1,234,567.89`.
pub static FLOAT_THOUSANDS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?\d{1,3}(?:,\d{3})+(?:\.\d+)?$").expect("Invalid thousands pattern")
});

pub static DATE_ISO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}$").expect("Invalid ISO date pattern")
});

pub static DATE_US_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}[-/]\d{1,2}[-/]\d{2,4}$").expect("Invalid US date pattern")
});

pub static DATE_EURO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}\.\d{1,2}\.\d{2,4}$").expect("Invalid Euro date pattern")
});

pub static DATETIME_ISO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}[T ]\d{1,2}:\d{2}(:\d{2})?(\.\d+)?(Z|[+-]\d{2}:?\d{2})?$",
    )
    .expect("Invalid ISO datetime pattern")
});

pub static DATETIME_GENERAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,4}[-/\.]\d{1,2}[-/\.]\d{1,4}[T ]?\d{1,2}:\d{2}(:\d{2})?(\s*(AM|PM|am|pm))?$")
        .expect("Invalid general datetime pattern")
});

pub static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}:\d{2}(:\d{2})?(\.\d+)?(\s*(AM|PM|am|pm))?$")
        .expect("Invalid time pattern")
});

pub static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid email pattern")
});

pub static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?|ftp)://[^\s/$.?#].[^\s]*$").expect("Invalid URL pattern")
});

pub static PERCENTAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?\d+\.?\d*\s*%$").expect("Invalid percentage pattern")
});

/// Short identifiers: `abc_12`, `X-1`.
pub static ALPHANUM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid alphanumeric pattern"));

/// A pattern with the specificity weight it contributes to the pattern score.
pub struct PatternCategory {
    pub pattern: &'static LazyLock<Regex>,
    pub weight: f64,
}

/// Most specific first; the first match wins.
static PATTERN_CATEGORIES: [PatternCategory; 15] = [
    PatternCategory { pattern: &NULL_PATTERN, weight: 0.5 },
    PatternCategory { pattern: &BOOLEAN_PATTERN, weight: 1.0 },
    PatternCategory { pattern: &UNSIGNED_PATTERN, weight: 1.0 },
    PatternCategory { pattern: &SIGNED_PATTERN, weight: 1.0 },
    PatternCategory { pattern: &FLOAT_PATTERN, weight: 1.0 },
    PatternCategory { pattern: &FLOAT_THOUSANDS_PATTERN, weight: 0.9 },
    PatternCategory { pattern: &DATE_ISO_PATTERN, weight: 1.0 },
    PatternCategory { pattern: &DATE_US_PATTERN, weight: 0.9 },
    PatternCategory { pattern: &DATE_EURO_PATTERN, weight: 0.9 },
    PatternCategory { pattern: &DATETIME_ISO_PATTERN, weight: 1.0 },
    PatternCategory { pattern: &TIME_PATTERN, weight: 0.8 },
    PatternCategory { pattern: &EMAIL_PATTERN, weight: 0.8 },
    PatternCategory { pattern: &URL_PATTERN, weight: 0.8 },
    PatternCategory { pattern: &PERCENTAGE_PATTERN, weight: 0.9 },
    PatternCategory { pattern: &ALPHANUM_PATTERN, weight: 0.3 },
];

pub fn pattern_categories() -> &'static [PatternCategory] {
    &PATTERN_CATEGORIES
}

/// A whole field bracketed by `quote`, starting a line or following
/// `delimiter` and ending a line or preceding `delimiter`.
pub fn bracketed_field_pattern(delimiter: char, quote: char) -> Option<Regex> {
    let d = regex::escape(&delimiter.to_string());
    let q = regex::escape(&quote.to_string());
    Regex::new(&format!(
        r"(?m)(?:^|{d})[ \t]*{q}[^{q}\n]*{q}[ \t\r]*(?:{d}|$)"
    ))
    .ok()
}

/// A bracketed field containing at least one doubled `quote`.
pub fn doubled_quote_pattern(delimiter: char, quote: char) -> Option<Regex> {
    let d = regex::escape(&delimiter.to_string());
    let q = regex::escape(&quote.to_string());
    Regex::new(&format!(
        r"(?m)(?:^|{d})[ \t]*{q}(?:[^{q}\n]|{q}{q})*{q}{q}(?:[^{q}\n]|{q}{q})*{q}[ \t\r]*(?:{d}|$)"
    ))
    .ok()
}

/// A quoted field in which `quote` is escaped with a backslash.
pub fn backslash_escape_pattern(delimiter: char, quote: char) -> Option<Regex> {
    let d = regex::escape(&delimiter.to_string());
    let q = regex::escape(&quote.to_string());
    Regex::new(&format!(r"(?m)(?:^|{d})[ \t]*{q}[^{q}\n]*\\{q}")).ok()
}
