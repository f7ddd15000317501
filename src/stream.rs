//! Line sources for the reader and text sinks for the writer.
//!
//! The engine never opens files. Callers hand the [`Reader`](crate::Reader)
//! any iterator of lines and the [`Writer`](crate::Writer) anything that
//! accepts appended text.

use std::borrow::Cow;
use std::io::{self, BufRead, Write};

use crate::error::Result;

/// One unit pulled from a line source.
pub trait IntoLine {
    fn into_line(self) -> Result<String>;
}

impl IntoLine for String {
    fn into_line(self) -> Result<String> {
        Ok(self)
    }
}

impl IntoLine for &str {
    fn into_line(self) -> Result<String> {
        Ok(self.to_string())
    }
}

impl IntoLine for &String {
    fn into_line(self) -> Result<String> {
        Ok(self.clone())
    }
}

impl IntoLine for Cow<'_, str> {
    fn into_line(self) -> Result<String> {
        Ok(self.into_owned())
    }
}

impl IntoLine for io::Result<String> {
    fn into_line(self) -> Result<String> {
        Ok(self?)
    }
}

/// Physical lines of a buffered reader, split on `\n` with terminators kept.
///
/// A lone `\r` does not end a line.
#[derive(Debug)]
pub struct IoLines<R> {
    inner: R,
}

/// Iterate the physical lines of `reader`.
pub fn io_lines<R: BufRead>(reader: R) -> IoLines<R> {
    IoLines { inner: reader }
}

impl<R: BufRead> Iterator for IoLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        match self.inner.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line)),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Split in-memory text into physical lines the same way [`io_lines`] does.
pub fn text_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
}

/// Destination for formatted records.
pub trait TextSink {
    /// Append one complete formatted line.
    fn append(&mut self, text: &str) -> Result<()>;
}

impl TextSink for String {
    fn append(&mut self, text: &str) -> Result<()> {
        self.push_str(text);
        Ok(())
    }
}

impl TextSink for Vec<String> {
    fn append(&mut self, text: &str) -> Result<()> {
        self.push(text.to_string());
        Ok(())
    }
}

impl<S: TextSink + ?Sized> TextSink for &mut S {
    fn append(&mut self, text: &str) -> Result<()> {
        (**self).append(text)
    }
}

/// Adapter writing appended text as UTF-8 to an [`io::Write`].
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
}

impl<W: Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Flush and hand back the wrapped writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> TextSink for IoSink<W> {
    fn append(&mut self, text: &str) -> Result<()> {
        self.inner.write_all(text.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_io_lines_keeps_terminators() {
        let lines: Vec<String> = io_lines(Cursor::new("a,b\r\nc\rd\ne"))
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["a,b\r\n", "c\rd\n", "e"]);
    }

    #[test]
    fn test_text_lines_matches_io_lines() {
        let text = "x\ny\r\n\nz";
        let a: Vec<&str> = text_lines(text).collect();
        let b: Vec<String> = io_lines(Cursor::new(text))
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sinks() {
        let mut s = String::new();
        s.append("a\n").unwrap();
        (&mut s).append("b\n").unwrap();
        assert_eq!(s, "a\nb\n");

        let mut v: Vec<String> = Vec::new();
        TextSink::append(&mut v, "row\r\n").unwrap();
        assert_eq!(v, vec!["row\r\n"]);

        let mut sink = IoSink::new(Vec::new());
        sink.append("bytes").unwrap();
        assert_eq!(sink.into_inner().unwrap(), b"bytes");
    }
}
