//! Record writer.

use std::borrow::Cow;

use crate::dialect::{Dialect, Quoting};
use crate::error::{CsvError, Result};
use crate::field::Field;
use crate::stream::TextSink;

/// Formats records as lines of text under a [`Dialect`] and appends them to a
/// [`TextSink`].
///
/// Each record is formatted completely before anything is appended, so a
/// record that fails to format leaves the sink untouched.
///
/// # Example
///
/// ```
/// use csv_dialect::{Dialect, Field, Writer};
///
/// let mut out = String::new();
/// let mut writer = Writer::new(&mut out, Dialect::excel());
/// writer.write_record(["a", "b", "c"]).unwrap();
/// writer.write_record([1, 2, 3]).unwrap();
/// assert_eq!(out, "a,b,c\r\n1,2,3\r\n");
/// ```
#[derive(Debug)]
pub struct Writer<S> {
    sink: S,
    dialect: Dialect,
}

impl<S: TextSink> Writer<S> {
    pub fn new(sink: S, dialect: Dialect) -> Self {
        Self { sink, dialect }
    }

    #[inline]
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Format one record and append it, line terminator included.
    pub fn write_record<I>(&mut self, record: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        let line = self.format_record(record)?;
        self.sink.append(&line)
    }

    /// Write records in order, stopping at the first failure.
    pub fn write_records<R, I>(&mut self, records: R) -> Result<()>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Format a record without writing it.
    pub fn format_record<I>(&self, record: I) -> Result<String>
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        let mut line = String::new();
        for (i, value) in record.into_iter().enumerate() {
            if i > 0 {
                line.push(self.dialect.delimiter());
            }
            let field = value.into();
            self.format_field(&field, &mut line)?;
        }
        line.push_str(self.dialect.lineterminator());
        Ok(line)
    }

    fn format_field(&self, field: &Field, out: &mut String) -> Result<()> {
        let text = field.to_text();
        let quote = match self.dialect.quoting() {
            Quoting::Minimal => self.needs_quotes(&text),
            Quoting::All => true,
            Quoting::NonNumeric => !field.is_numeric() || self.needs_quotes(&text),
            Quoting::None => {
                out.push_str(&self.escape_unquoted(&text)?);
                return Ok(());
            }
        };

        match (quote, self.dialect.quotechar()) {
            (true, Some(q)) => {
                out.push(q);
                out.push_str(&self.escape_quoted(&text, q)?);
                out.push(q);
            }
            _ => out.push_str(&text),
        }
        Ok(())
    }

    /// Whether minimal quoting applies: delimiter, quotechar, escapechar or
    /// any line terminator character present.
    fn needs_quotes(&self, text: &str) -> bool {
        let d = &self.dialect;
        text.chars().any(|c| {
            c == d.delimiter()
                || Some(c) == d.quotechar()
                || Some(c) == d.escapechar()
                || d.lineterminator().contains(c)
        })
    }

    fn escape_quoted<'t>(&self, text: &'t str, quote: char) -> Result<Cow<'t, str>> {
        if self.dialect.doublequote() {
            if !text.contains(quote) {
                return Ok(Cow::Borrowed(text));
            }
            let doubled: String = [quote, quote].iter().collect();
            return Ok(Cow::Owned(text.replace(quote, &doubled)));
        }

        match self.dialect.escapechar() {
            Some(esc) => {
                let mut out = String::with_capacity(text.len() + 2);
                for c in text.chars() {
                    if c == esc || c == quote {
                        out.push(esc);
                    }
                    out.push(c);
                }
                Ok(Cow::Owned(out))
            }
            None if text.contains(quote) => Err(CsvError::NoEscapeMechanism),
            None => Ok(Cow::Borrowed(text)),
        }
    }

    fn escape_unquoted<'t>(&self, text: &'t str) -> Result<Cow<'t, str>> {
        let d = &self.dialect;
        let special = |c: char| {
            c == d.delimiter()
                || Some(c) == d.quotechar()
                || matches!(c, '\r' | '\n')
                || d.lineterminator().contains(c)
        };

        match d.escapechar() {
            Some(esc) => {
                if !text.chars().any(|c| c == esc || special(c)) {
                    return Ok(Cow::Borrowed(text));
                }
                let mut out = String::with_capacity(text.len() + 2);
                for c in text.chars() {
                    if c == esc || special(c) {
                        out.push(esc);
                    }
                    out.push(c);
                }
                Ok(Cow::Owned(out))
            }
            None if text.chars().any(special) => Err(CsvError::EscapeCharNotSet),
            None => Ok(Cow::Borrowed(text)),
        }
    }
}
