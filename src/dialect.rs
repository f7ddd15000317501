//! Dialect configuration: punctuation and quoting policy.
//!
//! A [`Dialect`] is only ever produced by [`DialectBuilder::build`], which
//! validates every field. Once built it cannot be changed; derive a new one
//! with [`Dialect::to_builder`] instead.

use std::fmt;
use std::str::FromStr;

use crate::error::{CsvError, Result};

/// Policy controlling when the writer quotes a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quoting {
    /// Quote only fields containing special characters.
    #[default]
    Minimal,
    /// Quote every field.
    All,
    /// Quote every field that is not an integer or float.
    NonNumeric,
    /// Never quote; escape special characters instead.
    None,
}

impl fmt::Display for Quoting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quoting::Minimal => write!(f, "minimal"),
            Quoting::All => write!(f, "all"),
            Quoting::NonNumeric => write!(f, "nonnumeric"),
            Quoting::None => write!(f, "none"),
        }
    }
}

impl FromStr for Quoting {
    type Err = CsvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "minimal" | "quote_minimal" => Ok(Quoting::Minimal),
            "all" | "quote_all" => Ok(Quoting::All),
            "nonnumeric" | "quote_nonnumeric" => Ok(Quoting::NonNumeric),
            "none" | "quote_none" => Ok(Quoting::None),
            _ => Err(CsvError::invalid(
                "quoting must be one of minimal, all, nonnumeric, none",
            )),
        }
    }
}

/// CSV dialect: how fields and records are punctuated and quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    delimiter: char,
    quotechar: Option<char>,
    escapechar: Option<char>,
    doublequote: bool,
    skipinitialspace: bool,
    lineterminator: String,
    quoting: Quoting,
    strict: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::excel()
    }
}

impl Dialect {
    /// Start building a dialect from the `excel` defaults.
    pub fn builder() -> DialectBuilder {
        DialectBuilder::new()
    }

    /// Comma separated, double quotes, CRLF, minimal quoting.
    pub fn excel() -> Self {
        Self {
            delimiter: ',',
            quotechar: Some('"'),
            escapechar: None,
            doublequote: true,
            skipinitialspace: false,
            lineterminator: "\r\n".to_string(),
            quoting: Quoting::Minimal,
            strict: false,
        }
    }

    /// Same as `excel` but tab separated.
    pub fn excel_tab() -> Self {
        Self {
            delimiter: '\t',
            ..Self::excel()
        }
    }

    /// Comma separated, LF terminated, every field quoted.
    pub fn unix() -> Self {
        Self {
            lineterminator: "\n".to_string(),
            quoting: Quoting::All,
            ..Self::excel()
        }
    }

    /// Builder seeded with this dialect's settings.
    pub fn to_builder(&self) -> DialectBuilder {
        DialectBuilder::from(self)
    }

    #[inline]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    #[inline]
    pub fn quotechar(&self) -> Option<char> {
        self.quotechar
    }

    #[inline]
    pub fn escapechar(&self) -> Option<char> {
        self.escapechar
    }

    #[inline]
    pub fn doublequote(&self) -> bool {
        self.doublequote
    }

    #[inline]
    pub fn skipinitialspace(&self) -> bool {
        self.skipinitialspace
    }

    #[inline]
    pub fn lineterminator(&self) -> &str {
        &self.lineterminator
    }

    #[inline]
    pub fn quoting(&self) -> Quoting {
        self.quoting
    }

    #[inline]
    pub fn strict(&self) -> bool {
        self.strict
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "delimiter={:?} quotechar={} escapechar={} doublequote={} skipinitialspace={} lineterminator={:?} quoting={} strict={}",
            self.delimiter,
            display_char(self.quotechar),
            display_char(self.escapechar),
            self.doublequote,
            self.skipinitialspace,
            self.lineterminator,
            self.quoting,
            self.strict
        )
    }
}

fn display_char(c: Option<char>) -> String {
    c.map_or_else(|| "none".to_string(), |c| format!("{c:?}"))
}

/// Builder for [`Dialect`].
///
/// Typed setters cannot produce an out-of-range value on their own; the
/// cross-field rules (quotechar required for quoting, non-empty line
/// terminator, ...) are enforced by [`build`](Self::build). Text parameters
/// coming from the command line go through [`param`](Self::param), which
/// checks each value as it is parsed.
///
/// # Example
///
/// ```
/// use csv_dialect::{Dialect, Quoting};
///
/// let dialect = Dialect::builder()
///     .delimiter(';')
///     .quoting(Quoting::All)
///     .build()
///     .unwrap();
/// assert_eq!(dialect.delimiter(), ';');
/// ```
#[derive(Debug, Clone)]
pub struct DialectBuilder {
    delimiter: char,
    quotechar: Option<char>,
    escapechar: Option<char>,
    doublequote: bool,
    skipinitialspace: bool,
    lineterminator: String,
    quoting: Quoting,
    strict: bool,
}

impl Default for DialectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&Dialect> for DialectBuilder {
    fn from(d: &Dialect) -> Self {
        Self {
            delimiter: d.delimiter,
            quotechar: d.quotechar,
            escapechar: d.escapechar,
            doublequote: d.doublequote,
            skipinitialspace: d.skipinitialspace,
            lineterminator: d.lineterminator.clone(),
            quoting: d.quoting,
            strict: d.strict,
        }
    }
}

impl DialectBuilder {
    /// Create a builder with the `excel` settings.
    pub fn new() -> Self {
        Self::from(&Dialect::excel())
    }

    pub fn delimiter(&mut self, delimiter: char) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    pub fn quotechar(&mut self, quotechar: Option<char>) -> &mut Self {
        self.quotechar = quotechar;
        self
    }

    pub fn escapechar(&mut self, escapechar: Option<char>) -> &mut Self {
        self.escapechar = escapechar;
        self
    }

    pub fn doublequote(&mut self, doublequote: bool) -> &mut Self {
        self.doublequote = doublequote;
        self
    }

    pub fn skipinitialspace(&mut self, skipinitialspace: bool) -> &mut Self {
        self.skipinitialspace = skipinitialspace;
        self
    }

    pub fn lineterminator(&mut self, lineterminator: impl Into<String>) -> &mut Self {
        self.lineterminator = lineterminator.into();
        self
    }

    pub fn quoting(&mut self, quoting: Quoting) -> &mut Self {
        self.quoting = quoting;
        self
    }

    pub fn strict(&mut self, strict: bool) -> &mut Self {
        self.strict = strict;
        self
    }

    /// Apply one `name=value` text parameter.
    ///
    /// Fails with a message naming the parameter when the value has the
    /// wrong shape for it.
    pub fn param(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        match name {
            "delimiter" => {
                self.delimiter = parse_char("delimiter", value)?;
            }
            "quotechar" => {
                self.quotechar = parse_optional_char("quotechar", value)?;
            }
            "escapechar" => {
                self.escapechar = parse_optional_char("escapechar", value)?;
            }
            "doublequote" => {
                self.doublequote = parse_bool("doublequote", value)?;
            }
            "skipinitialspace" => {
                self.skipinitialspace = parse_bool("skipinitialspace", value)?;
            }
            "lineterminator" => {
                self.lineterminator = unescape(value);
            }
            "quoting" => {
                self.quoting = value.parse()?;
            }
            "strict" => {
                self.strict = parse_bool("strict", value)?;
            }
            _ => {
                return Err(CsvError::invalid(format!(
                    "unknown dialect parameter '{name}'"
                )));
            }
        }
        Ok(self)
    }

    /// Apply a sequence of text parameters, stopping at the first bad one.
    pub fn params<'p, I>(&mut self, params: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (&'p str, &'p str)>,
    {
        for (name, value) in params {
            self.param(name, value)?;
        }
        Ok(self)
    }

    /// Validate and produce the dialect.
    pub fn build(&self) -> Result<Dialect> {
        if matches!(self.delimiter, '\r' | '\n') {
            return Err(CsvError::invalid(
                "delimiter must not be a line break character",
            ));
        }
        if self.lineterminator.is_empty() {
            return Err(CsvError::invalid("lineterminator must be set"));
        }
        if self.quoting != Quoting::None && self.quotechar.is_none() {
            return Err(CsvError::invalid("quotechar must be set if quoting enabled"));
        }

        Ok(Dialect {
            delimiter: self.delimiter,
            quotechar: self.quotechar,
            escapechar: self.escapechar,
            doublequote: self.doublequote,
            skipinitialspace: self.skipinitialspace,
            lineterminator: self.lineterminator.clone(),
            quoting: self.quoting,
            strict: self.strict,
        })
    }
}

fn parse_char(name: &str, value: &str) -> Result<char> {
    let value = unescape(value);
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(CsvError::invalid(format!(
            "{name} must be a single character"
        ))),
    }
}

fn parse_optional_char(name: &str, value: &str) -> Result<Option<char>> {
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    parse_char(name, value).map(Some)
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(CsvError::invalid(format!("{name} must be a boolean"))),
    }
}

/// Expand `\n`, `\r`, `\t` and `\\` so line terminators and tab delimiters
/// can be typed on a command line.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
