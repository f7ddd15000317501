/// How much of a sample the sniffer looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSize {
    /// The first `n` lines.
    Records(usize),
    /// The first `n` bytes, cut back to the last complete line when possible.
    Bytes(usize),
    /// The whole sample.
    All,
}

impl Default for SampleSize {
    fn default() -> Self {
        SampleSize::Records(100)
    }
}

impl SampleSize {
    pub fn records(&self) -> Option<usize> {
        match self {
            SampleSize::Records(n) => Some(*n),
            _ => None,
        }
    }

    pub fn bytes(&self) -> Option<usize> {
        match self {
            SampleSize::Bytes(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow the part of `text` this size covers.
    pub fn apply<'t>(&self, text: &'t str) -> &'t str {
        match *self {
            SampleSize::All => text,
            SampleSize::Records(n) => match text.match_indices('\n').nth(n.saturating_sub(1)) {
                Some((i, _)) if n > 0 => &text[..=i],
                Some(_) => "",
                None if n == 0 => "",
                None => text,
            },
            SampleSize::Bytes(n) => {
                if n >= text.len() {
                    return text;
                }
                let mut end = n;
                while !text.is_char_boundary(end) {
                    end -= 1;
                }
                let head = &text[..end];
                match head.rfind('\n') {
                    Some(i) => &head[..=i],
                    None => head,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records() {
        let text = "a\nb\nc\n";
        assert_eq!(SampleSize::Records(2).apply(text), "a\nb\n");
        assert_eq!(SampleSize::Records(3).apply(text), text);
        assert_eq!(SampleSize::Records(10).apply("a\nb"), "a\nb");
        assert_eq!(SampleSize::Records(0).apply(text), "");
    }

    #[test]
    fn test_bytes_cut_to_line() {
        let text = "abc,def\nghi,jkl\n";
        assert_eq!(SampleSize::Bytes(10).apply(text), "abc,def\n");
        assert_eq!(SampleSize::Bytes(4).apply(text), "abc,");
        assert_eq!(SampleSize::Bytes(100).apply(text), text);
    }

    #[test]
    fn test_bytes_respect_char_boundaries() {
        assert_eq!(SampleSize::Bytes(2).apply("éa"), "é");
        assert_eq!(SampleSize::Bytes(1).apply("éa"), "");
    }

    #[test]
    fn test_all() {
        assert_eq!(SampleSize::All.apply("x\ny"), "x\ny");
        assert_eq!(SampleSize::default(), SampleSize::Records(100));
    }
}
