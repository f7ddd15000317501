//! Line-oriented record reader.
//!
//! Every unit pulled from the line source is one physical record. Trailing
//! `\r`/`\n` characters are stripped, then the line is run through a small
//! character-driven state machine. A quoted field left open at the end of a
//! line is an error: the reader never pulls a second line to complete it.
//! Sources that already yield logical rows (with embedded line breaks inside
//! quoted fields) parse as expected.

use std::mem;

use tracing::trace;

use crate::context::DEFAULT_FIELD_SIZE_LIMIT;
use crate::dialect::{Dialect, Quoting};
use crate::error::{CsvError, Result};
use crate::field::Record;
use crate::stream::IntoLine;

/// Lazy, forward-only sequence of records.
///
/// # Example
///
/// ```
/// use csv_dialect::{Dialect, Reader};
///
/// let reader = Reader::new(["a,b,c", "1,2,3"], Dialect::excel());
/// let rows: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
/// assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
/// ```
#[derive(Debug)]
pub struct Reader<I> {
    lines: I,
    dialect: Dialect,
    field_limit: usize,
    line_number: usize,
}

impl<I> Reader<I>
where
    I: Iterator,
    I::Item: IntoLine,
{
    /// Read `lines` under `dialect` with the default field-size limit.
    pub fn new<T>(lines: T, dialect: Dialect) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            lines: lines.into_iter(),
            dialect,
            field_limit: DEFAULT_FIELD_SIZE_LIMIT,
            line_number: 0,
        }
    }

    /// Replace the field-size limit.
    pub fn with_field_limit(mut self, field_limit: usize) -> Self {
        self.field_limit = field_limit;
        self
    }

    #[inline]
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    #[inline]
    pub fn field_limit(&self) -> usize {
        self.field_limit
    }

    /// Number of lines consumed so far.
    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn parse_line(&self, raw: &str) -> Result<Record> {
        let line = raw.trim_end_matches(['\r', '\n']);
        let mut parser = LineParser::new(&self.dialect, self.field_limit, self.line_number);
        for c in line.chars() {
            parser.feed(c)?;
        }
        parser.finish()
    }
}

impl<I> Iterator for Reader<I>
where
    I: Iterator,
    I::Item: IntoLine,
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.lines.next()?;
        self.line_number += 1;

        let result = item.into_line().and_then(|line| self.parse_line(&line));
        if let Err(e) = &result {
            trace!(line = self.line_number, error = %e, "failed to parse line");
        }
        Some(result)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    StartField,
    InUnquotedField,
    InQuotedField,
    QuoteSeenInQuotedField,
    EscapedChar,
}

/// Parse state for a single line.
struct LineParser<'d> {
    dialect: &'d Dialect,
    /// Quote character, or `None` when quoting is disabled for reading.
    quote: Option<char>,
    field_limit: usize,
    line: usize,
    state: ParserState,
    /// State to resume after an escaped character.
    resume: ParserState,
    fields: Record,
    field: String,
    field_len: usize,
}

impl<'d> LineParser<'d> {
    fn new(dialect: &'d Dialect, field_limit: usize, line: usize) -> Self {
        let quote = match dialect.quoting() {
            Quoting::None => None,
            _ => dialect.quotechar(),
        };
        Self {
            dialect,
            quote,
            field_limit,
            line,
            state: ParserState::StartField,
            resume: ParserState::InUnquotedField,
            fields: Vec::new(),
            field: String::new(),
            field_len: 0,
        }
    }

    fn feed(&mut self, c: char) -> Result<()> {
        let delimiter = self.dialect.delimiter();
        let escape = self.dialect.escapechar();

        match self.state {
            ParserState::StartField => {
                if Some(c) == self.quote {
                    self.state = ParserState::InQuotedField;
                } else if c == delimiter {
                    self.end_field();
                } else if Some(c) == escape {
                    // the field has begun, so resume as unquoted data
                    self.escape(ParserState::InUnquotedField);
                } else if c == ' ' && self.dialect.skipinitialspace() {
                } else {
                    self.push(c)?;
                    self.state = ParserState::InUnquotedField;
                }
            }
            ParserState::InUnquotedField => {
                if c == delimiter {
                    self.end_field();
                } else if Some(c) == escape {
                    self.escape(ParserState::InUnquotedField);
                } else {
                    self.push(c)?;
                }
            }
            ParserState::InQuotedField => {
                if Some(c) == self.quote {
                    self.state = ParserState::QuoteSeenInQuotedField;
                } else if Some(c) == escape && !self.dialect.doublequote() {
                    self.escape(ParserState::InQuotedField);
                } else {
                    self.push(c)?;
                }
            }
            ParserState::QuoteSeenInQuotedField => {
                if Some(c) == self.quote && self.dialect.doublequote() {
                    self.push(c)?;
                    self.state = ParserState::InQuotedField;
                } else if c == delimiter {
                    self.end_field();
                } else if self.dialect.strict() {
                    return Err(CsvError::UnexpectedAfterQuote {
                        ch: c,
                        line: self.line,
                    });
                } else {
                    return Err(CsvError::MalformedRow {
                        ch: c,
                        line: self.line,
                    });
                }
            }
            ParserState::EscapedChar => {
                self.push(c)?;
                self.state = self.resume;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Record> {
        match self.state {
            ParserState::InQuotedField => Err(CsvError::UnclosedQuote { line: self.line }),
            ParserState::EscapedChar => Err(CsvError::TrailingEscape { line: self.line }),
            _ => {
                self.fields.push(mem::take(&mut self.field));
                Ok(self.fields)
            }
        }
    }

    fn escape(&mut self, resume: ParserState) {
        self.resume = resume;
        self.state = ParserState::EscapedChar;
    }

    fn push(&mut self, c: char) -> Result<()> {
        self.field.push(c);
        self.field_len += 1;
        if self.field_len >= self.field_limit {
            return Err(CsvError::FieldLimit {
                limit: self.field_limit,
            });
        }
        Ok(())
    }

    fn end_field(&mut self) {
        self.fields.push(mem::take(&mut self.field));
        self.field_len = 0;
        self.state = ParserState::StartField;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{io_lines, text_lines};
    use std::io::Cursor;

    fn read_all(text: &str, dialect: Dialect) -> Result<Vec<Record>> {
        Reader::new(text_lines(text), dialect).collect()
    }

    fn dialect(configure: impl FnOnce(&mut crate::DialectBuilder)) -> Dialect {
        let mut builder = Dialect::builder();
        configure(&mut builder);
        builder.build().unwrap()
    }

    #[test]
    fn test_simple_default_dialect() {
        let rows = read_all("a,b,c\r\n1,2,3\r\n", Dialect::excel()).unwrap();
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn test_other_delimiters_and_quotes() {
        let semi = dialect(|b| {
            b.delimiter(';');
        });
        assert_eq!(
            read_all("a;b;c\n1;2;3", semi).unwrap(),
            vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]
        );

        let single = dialect(|b| {
            b.quotechar(Some('\''));
        });
        assert_eq!(
            read_all("'a','b','c'\n'1','2','3'", single).unwrap(),
            vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]
        );
    }

    #[test]
    fn test_doubled_quotes() {
        let rows = read_all("a,\"b\"\"c\",d\r\n\"e\"\"f\",g,h", Dialect::excel()).unwrap();
        assert_eq!(rows, vec![vec!["a", "b\"c", "d"], vec!["e\"f", "g", "h"]]);
    }

    #[test]
    fn test_escapechar_inside_quotes() {
        let d = dialect(|b| {
            b.doublequote(false).escapechar(Some('\\'));
        });
        let rows = read_all("a,\"b\\\"c\",d\r\n\"e\\\"f\",g,h", d).unwrap();
        assert_eq!(rows, vec![vec!["a", "b\"c", "d"], vec!["e\"f", "g", "h"]]);
    }

    #[test]
    fn test_quote_only_special_at_field_start() {
        let rows = read_all("a,b\"c\",d", Dialect::excel()).unwrap();
        assert_eq!(rows, vec![vec!["a", "b\"c\"", "d"]]);
    }

    #[test]
    fn test_quoting_none_treats_quotes_as_data() {
        let d = dialect(|b| {
            b.quoting(Quoting::None);
        });
        let rows = read_all("a,b\"c,d\n\"x\",y", d).unwrap();
        assert_eq!(rows, vec![vec!["a", "b\"c", "d"], vec!["\"x\"", "y"]]);
    }

    #[test]
    fn test_quoting_none_with_escapechar() {
        let d = dialect(|b| {
            b.quoting(Quoting::None).escapechar(Some('\\'));
        });
        let rows = read_all("a,b\\,c,d\ne,f\\\\,g", d).unwrap();
        assert_eq!(rows, vec![vec!["a", "b,c", "d"], vec!["e", "f\\", "g"]]);
    }

    #[test]
    fn test_escape_at_field_start() {
        let d = dialect(|b| {
            b.escapechar(Some('\\'));
        });
        let rows = read_all("\\\"quoted,x", d).unwrap();
        assert_eq!(rows, vec![vec!["\"quoted", "x"]]);
    }

    #[test]
    fn test_skipinitialspace() {
        let on = dialect(|b| {
            b.skipinitialspace(true);
        });
        assert_eq!(
            read_all("a, b, c\r\n1,  2,   3", on).unwrap(),
            vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]
        );
        assert_eq!(
            read_all("a, b, c\r\n1,  2,   3", Dialect::excel()).unwrap(),
            vec![vec!["a", " b", " c"], vec!["1", "  2", "   3"]]
        );

        let quoted = dialect(|b| {
            b.skipinitialspace(true);
        });
        assert_eq!(
            read_all("a, \"b,c\"", quoted).unwrap(),
            vec![vec!["a", "b,c"]]
        );
    }

    #[test]
    fn test_empty_and_blank_lines() {
        let rows = read_all("\r\n  \r\nval1,val2\r\n\r\n", Dialect::excel()).unwrap();
        assert_eq!(
            rows,
            vec![vec![""], vec!["  "], vec!["val1", "val2"], vec![""]]
        );
        assert_eq!(read_all("a,\n", Dialect::excel()).unwrap(), vec![vec!["a", ""]]);
    }

    #[test]
    fn test_internal_carriage_return_is_data() {
        let rows = read_all("a,b\r1,c\nd,e,f", Dialect::excel()).unwrap();
        assert_eq!(rows, vec![vec!["a", "b\r1", "c"], vec!["d", "e", "f"]]);
    }

    #[test]
    fn test_logical_rows_with_embedded_newlines() {
        let rows: Vec<Record> = Reader::new(["a,\"b\nc\",d", "e,\"f\r\ng\",h"], Dialect::excel())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(rows, vec![vec!["a", "b\nc", "d"], vec!["e", "f\r\ng", "h"]]);
    }

    #[test]
    fn test_physical_lines_do_not_join_quoted_fields() {
        let mut reader = Reader::new(io_lines(Cursor::new("a,\"b\nc\",d")), Dialect::excel());
        let err = reader.next().unwrap().unwrap_err();
        assert!(err.to_string().contains("unclosed quote"));
    }

    #[test]
    fn test_unclosed_quote_ignores_strict() {
        for strict in [false, true] {
            let d = dialect(|b| {
                b.strict(strict);
            });
            let err = read_all("a,\"b,c", d).unwrap_err();
            assert!(matches!(err, CsvError::UnclosedQuote { line: 1 }));
        }
    }

    #[test]
    fn test_char_after_closing_quote() {
        let strict = dialect(|b| {
            b.strict(true);
        });
        let err = read_all("\"a\"b,c", strict).unwrap_err();
        assert!(err.to_string().contains("'b' found after quoted field"));
        assert!(err.to_string().contains("delimiter expected after"));

        let err = read_all("\"a\"b,c", Dialect::excel()).unwrap_err();
        assert!(err.to_string().contains("malformed CSV row"));
    }

    #[test]
    fn test_doublequote_false_rejects_doubled_quote() {
        let d = dialect(|b| {
            b.doublequote(false).strict(true);
        });
        let err = read_all("FieldA,\"F\"\"B\",FieldC", d).unwrap_err();
        assert!(err.to_string().contains("delimiter expected after"));
    }

    #[test]
    fn test_trailing_escape() {
        let d = dialect(|b| {
            b.escapechar(Some('\\'));
        });
        let err = read_all("a,b\\", d).unwrap_err();
        assert!(matches!(err, CsvError::TrailingEscape { line: 1 }));
    }

    #[test]
    fn test_field_limit() {
        let limit = 100;
        let cases = [
            format!("a,{}", "b".repeat(limit)),
            format!("a,\"{}\"", "b".repeat(limit)),
            format!("short,ok,{},another", "b".repeat(limit)),
        ];
        for line in &cases {
            let err = Reader::new([line.as_str()], Dialect::excel())
                .with_field_limit(limit)
                .next()
                .unwrap()
                .unwrap_err();
            assert_eq!(err.to_string(), "field larger than field limit (100)");
        }

        let ok = format!("a,{}", "b".repeat(limit - 1));
        let row = Reader::new([ok.as_str()], Dialect::excel())
            .with_field_limit(limit)
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(row[1].len(), limit - 1);
    }

    #[test]
    fn test_error_does_not_stop_iteration() {
        let mut reader = Reader::new(["ok,1", "\"bad", "ok,2"], Dialect::excel());
        assert_eq!(reader.next().unwrap().unwrap(), vec!["ok", "1"]);
        assert!(reader.next().unwrap().is_err());
        assert_eq!(reader.line_number(), 2);
        assert_eq!(reader.next().unwrap().unwrap(), vec!["ok", "2"]);
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_borrowed_source_is_not_consumed_past_pull() {
        let mut lines = ["a,b", "c,d", "e,f"].into_iter();
        {
            let mut reader = Reader::new(&mut lines, Dialect::excel());
            assert_eq!(reader.next().unwrap().unwrap(), vec!["a", "b"]);
        }
        assert_eq!(lines.next(), Some("c,d"));
    }
}
