//! Byte input decoding using chardetng and `encoding_rs`.
//!
//! The engine itself works on text; this is for callers that start from raw
//! file contents.

use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use simdutf8::basic::from_utf8;

/// SIMD-accelerated UTF-8 validation.
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// Whether the data starts with the UTF-8 byte order mark `EF BB BF`.
pub fn has_utf8_bom(data: &[u8]) -> bool {
    data.starts_with(&[0xEF, 0xBB, 0xBF])
}

pub fn skip_bom(data: &[u8]) -> &[u8] {
    if has_utf8_bom(data) { &data[3..] } else { data }
}

/// Text recovered from bytes, plus how it was recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText<'a> {
    pub text: Cow<'a, str>,
    /// Name of the source encoding, e.g. `UTF-8` or `windows-1251`.
    pub encoding: &'static str,
    /// Whether a byte order mark was stripped.
    pub had_bom: bool,
}

impl DecodedText<'_> {
    /// Whether the bytes had to be converted to produce the text.
    pub fn was_transcoded(&self) -> bool {
        matches!(self.text, Cow::Owned(_))
    }
}

/// Decode `data` to text.
///
/// UTF-16 byte order marks and the UTF-8 byte order mark are honored first.
/// Valid UTF-8 is borrowed as is. Anything else is guessed with chardetng
/// (Windows-125x, ISO-8859, GBK, Shift_JIS, ...) and transcoded; bytes
/// that cannot be mapped become U+FFFD.
pub fn decode_text(data: &[u8]) -> DecodedText<'_> {
    if data.starts_with(&[0xFF, 0xFE]) || data.starts_with(&[0xFE, 0xFF]) {
        let encoding = if data[0] == 0xFF { UTF_16LE } else { UTF_16BE };
        return transcode(data, encoding, true);
    }

    let had_bom = has_utf8_bom(data);
    let body = skip_bom(data);
    if let Ok(text) = from_utf8(body) {
        return DecodedText {
            text: Cow::Borrowed(text),
            encoding: UTF_8.name(),
            had_bom,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    transcode(body, encoding, had_bom)
}

fn transcode<'a>(data: &'a [u8], encoding: &'static Encoding, had_bom: bool) -> DecodedText<'a> {
    // `decode` strips a BOM matching the encoding
    let (decoded, actual, _) = encoding.decode(data);
    DecodedText {
        text: Cow::Owned(decoded.into_owned()),
        encoding: actual.name(),
        had_bom,
    }
}
