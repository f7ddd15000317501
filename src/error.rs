use std::io;
use thiserror::Error;

/// Error type for dialect, reading, writing and sniffing operations.
#[derive(Error, Debug)]
pub enum CsvError {
    /// A dialect field failed validation at construction time.
    #[error("{0}")]
    InvalidDialect(String),

    /// Lookup or removal of a dialect name that is not registered.
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),

    /// End of line reached inside a quoted field.
    #[error("unclosed quote (line {line})")]
    UnclosedQuote { line: usize },

    /// Stray character after a closing quote, strict dialect.
    #[error("'{ch}' found after quoted field, delimiter expected after quotechar (line {line})")]
    UnexpectedAfterQuote { ch: char, line: usize },

    /// Stray character after a closing quote, non-strict dialect.
    #[error("malformed CSV row: '{ch}' found after quoted field (line {line})")]
    MalformedRow { ch: char, line: usize },

    /// End of line reached right after an escape character.
    #[error("unexpected end of line after escapechar (line {line})")]
    TrailingEscape { line: usize },

    /// A field grew to the configured field-size limit.
    #[error("field larger than field limit ({limit})")]
    FieldLimit { limit: usize },

    /// `QUOTE_NONE` writer met a special character without an escapechar.
    #[error("delimiter or quotechar found in field, but escapechar is not set")]
    EscapeCharNotSet,

    /// Quoted field contains the quotechar but neither doubling nor an escapechar applies.
    #[error("quotechar found in field, but no escape mechanism")]
    NoEscapeMechanism,

    /// Sniffer was handed nothing to look at.
    #[error("Cannot sniff an empty sample")]
    EmptySample,

    /// No candidate delimiter produced a consistent table.
    #[error("Could not determine delimiter")]
    UndeterminedDelimiter,

    /// A value of the wrong type was supplied where an integer is required.
    #[error("type error: {0}")]
    Type(String),

    /// IO error from an io-backed line source or sink.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl CsvError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CsvError::InvalidDialect(msg.into())
    }
}

/// Result type alias for CSV operations.
pub type Result<T> = std::result::Result<T, CsvError>;
