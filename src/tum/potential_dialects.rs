//! Candidate delimiter/quote combinations and line terminator detection.

/// A delimiter and quote pairing to trial-parse the sample with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PotentialDialect {
    pub delimiter: char,
    /// `None` parses with quoting disabled.
    pub quote: Option<char>,
}

impl PotentialDialect {
    pub const fn new(delimiter: char, quote: Option<char>) -> Self {
        Self { delimiter, quote }
    }
}

/// Line terminator sequences.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineTerminator {
    LF,
    CRLF,
    CR,
}

impl LineTerminator {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineTerminator::LF => "\n",
            LineTerminator::CRLF => "\r\n",
            LineTerminator::CR => "\r",
        }
    }
}

/// Delimiters tried when the caller gives none. Space and colon are left out
/// since they occur inside prose and timestamps.
pub const DELIMITERS: &[char] = &[',', ';', '\t', '|', '^', '~'];

/// Quote candidates, most common first.
pub const QUOTES: &[Option<char>] = &[Some('"'), Some('\''), None];

/// Every delimiter paired with every quote candidate.
pub fn generate_potential_dialects(delimiters: &[char]) -> Vec<PotentialDialect> {
    let mut dialects = Vec::with_capacity(delimiters.len() * QUOTES.len());
    for &delimiter in delimiters {
        for &quote in QUOTES {
            if quote == Some(delimiter) {
                continue;
            }
            dialects.push(PotentialDialect::new(delimiter, quote));
        }
    }
    dialects
}

/// The most frequent line terminator in `text`, or `None` if it has no line
/// breaks at all.
pub fn detect_line_terminator(text: &str) -> Option<LineTerminator> {
    let bytes = text.as_bytes();
    let mut crlf_count = 0;
    let mut lf_count = 0;
    let mut cr_count = 0;

    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                crlf_count += 1;
                i += 1;
            }
            b'\r' => cr_count += 1,
            b'\n' => lf_count += 1,
            _ => {}
        }
        i += 1;
    }

    if crlf_count == 0 && lf_count == 0 && cr_count == 0 {
        None
    } else if crlf_count > 0 && crlf_count >= lf_count && crlf_count >= cr_count {
        Some(LineTerminator::CRLF)
    } else if lf_count >= cr_count {
        Some(LineTerminator::LF)
    } else {
        Some(LineTerminator::CR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_potential_dialects() {
        assert_eq!(generate_potential_dialects(DELIMITERS).len(), 18);
        // a quote candidate equal to the delimiter is skipped
        assert_eq!(generate_potential_dialects(&['\'']).len(), 2);
    }

    #[test]
    fn test_detect_line_terminator() {
        assert_eq!(detect_line_terminator("a,b\nc,d\n"), Some(LineTerminator::LF));
        assert_eq!(
            detect_line_terminator("a,b\r\nc,d\r\n"),
            Some(LineTerminator::CRLF)
        );
        assert_eq!(detect_line_terminator("a,b\rc,d\r"), Some(LineTerminator::CR));
        assert_eq!(detect_line_terminator("a,b"), None);
    }
}
