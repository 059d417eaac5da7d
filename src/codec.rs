//! Text codec for renderer output.
//!
//! Converts text to and from the configured output encoding. Characters the
//! encoding cannot represent are replaced instead of failing: `?` when
//! encoding, U+FFFD when decoding.

use crate::error::{ReportError, Result};
use encoding_rs::{Encoding, EncoderResult, UTF_8};
use std::borrow::Cow;

/// Byte substituted for characters the output encoding cannot represent.
const REPLACEMENT: u8 = b'?';

/// A value handed to the codec: either decoded text or raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text<'a> {
    Decoded(&'a str),
    Encoded(&'a [u8]),
}

impl<'a> From<&'a str> for Text<'a> {
    fn from(s: &'a str) -> Self {
        Text::Decoded(s)
    }
}

impl<'a> From<&'a String> for Text<'a> {
    fn from(s: &'a String) -> Self {
        Text::Decoded(s.as_str())
    }
}

impl<'a> From<&'a [u8]> for Text<'a> {
    fn from(b: &'a [u8]) -> Self {
        Text::Encoded(b)
    }
}

/// Labels of US-ASCII, including the POSIX locale charset name.
const ASCII_LABELS: [&str; 11] = [
    "ascii",
    "us-ascii",
    "ansi_x3.4-1968",
    "ansi_x3.4-1986",
    "iso646-us",
    "iso_646.irv:1991",
    "iso-ir-6",
    "us",
    "646",
    "cp367",
    "csascii",
];

/// Labels of ISO-8859-1 proper.
const LATIN1_LABELS: [&str; 10] = [
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "iso_8859-1:1987",
    "8859-1",
    "latin1",
    "latin-1",
    "l1",
    "iso-ir-100",
    "cp819",
];

/// Output charset. WHATWG resolves the ASCII and Latin-1 labels to
/// windows-1252, so those two are handled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charset {
    Ascii,
    Latin1,
    Whatwg(&'static Encoding),
}

/// Encoder/decoder bound to one output encoding.
#[derive(Debug, Clone, Copy)]
pub struct TextCodec {
    charset: Charset,
}

impl TextCodec {
    /// Creates a codec for an encoding label such as `"utf-8"` or `"iso-8859-1"`.
    ///
    /// ASCII and ISO-8859-1 labels get their own codecs. Other labels are
    /// resolved with the WHATWG rules; encodings that cannot be produced as
    /// output (UTF-16, replacement) fall back to their output encoding.
    pub fn for_label(label: &str) -> Result<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        let charset = if ASCII_LABELS.contains(&normalized.as_str()) {
            Charset::Ascii
        } else if LATIN1_LABELS.contains(&normalized.as_str()) {
            Charset::Latin1
        } else {
            let encoding = Encoding::for_label(normalized.as_bytes())
                .ok_or_else(|| ReportError::UnknownEncoding(label.to_string()))?;
            Charset::Whatwg(encoding.output_encoding())
        };
        Ok(Self { charset })
    }

    /// Codec for the system's default encoding.
    pub fn system_default() -> Self {
        let label = default_encoding();
        Self::for_label(&label).unwrap_or(Self {
            charset: Charset::Whatwg(UTF_8),
        })
    }

    /// Canonical name of the configured encoding, e.g. `"UTF-8"`.
    pub fn name(&self) -> &'static str {
        match self.charset {
            Charset::Ascii => "US-ASCII",
            Charset::Latin1 => "ISO-8859-1",
            Charset::Whatwg(encoding) => encoding.name(),
        }
    }

    /// Encodes a value that must already be decoded text.
    ///
    /// # Errors
    /// Returns [`ReportError::NotText`] when given raw bytes.
    pub fn encode<'a>(&self, value: impl Into<Text<'a>>) -> Result<Vec<u8>> {
        match value.into() {
            Text::Decoded(s) => Ok(self.encode_str(s)),
            Text::Encoded(b) => Err(ReportError::NotText(b.to_vec())),
        }
    }

    /// Encodes text, replacing unrepresentable characters with `?`.
    pub fn encode_str(&self, text: &str) -> Vec<u8> {
        match self.charset {
            Charset::Ascii => encode_below(text, 0x80),
            Charset::Latin1 => encode_below(text, 0x100),
            Charset::Whatwg(encoding) if encoding == UTF_8 => text.as_bytes().to_vec(),
            Charset::Whatwg(encoding) => encode_whatwg(encoding, text),
        }
    }

    /// Decodes a value; decoded text passes through unchanged.
    pub fn decode<'a>(&self, value: impl Into<Text<'a>>) -> Cow<'a, str> {
        let bytes = match value.into() {
            Text::Decoded(s) => return Cow::Borrowed(s),
            Text::Encoded(b) => b,
        };
        match self.charset {
            Charset::Ascii => bytes
                .iter()
                .map(|&b| match b {
                    0..=0x7f => char::from(b),
                    _ => char::REPLACEMENT_CHARACTER,
                })
                .collect(),
            Charset::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Charset::Whatwg(encoding) => encoding.decode_without_bom_handling(bytes).0,
        }
    }
}

/// Single-byte encoding of the code points below `limit`.
fn encode_below(text: &str, limit: u32) -> Vec<u8> {
    text.chars()
        .map(|c| match u8::try_from(u32::from(c)) {
            Ok(b) if u32::from(b) < limit => b,
            _ => REPLACEMENT,
        })
        .collect()
}

fn encode_whatwg(encoding: &'static Encoding, text: &str) -> Vec<u8> {
    let mut encoder = encoding.new_encoder();
    let mut out = Vec::with_capacity(text.len());
    let mut src = text;
    loop {
        let needed = encoder
            .max_buffer_length_from_utf8_without_replacement(src.len())
            .unwrap_or(src.len() + 16);
        out.reserve(needed);
        let (result, read) =
            encoder.encode_from_utf8_to_vec_without_replacement(src, &mut out, true);
        src = &src[read..];
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => continue,
            EncoderResult::Unmappable(_) => out.push(REPLACEMENT),
        }
    }
    out
}

impl Default for TextCodec {
    fn default() -> Self {
        Self::system_default()
    }
}

/// Determines the default output encoding from the locale environment.
///
/// Looks at `LC_ALL`, `LC_CTYPE` and `LANG` in that order and takes the
/// charset part of the first non-empty one (`de_DE.ISO-8859-1` gives
/// `ISO-8859-1`). Falls back to `utf-8`.
pub fn default_encoding() -> String {
    for var in ["LC_ALL", "LC_CTYPE", "LANG"] {
        let Ok(value) = std::env::var(var) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        return charset_of_locale(&value).unwrap_or("utf-8").to_string();
    }
    "utf-8".to_string()
}

fn charset_of_locale(locale: &str) -> Option<&str> {
    let (_, rest) = locale.split_once('.')?;
    let charset = rest.split('@').next().unwrap_or(rest);
    (!charset.is_empty()).then_some(charset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_roundtrip() {
        let codec = TextCodec::for_label("utf-8").unwrap();
        let text = "Grüße, 日本語";
        let bytes = codec.encode(text).unwrap();
        assert_eq!(codec.decode(bytes.as_slice()), text);
    }

    #[test]
    fn test_latin1_roundtrip_and_replacement() {
        let codec = TextCodec::for_label("iso-8859-1").unwrap();
        assert_eq!(codec.encode("café").unwrap(), b"caf\xe9".to_vec());
        assert_eq!(codec.decode(&b"caf\xe9"[..]), "café");
        // unrepresentable characters are replaced deterministically
        assert_eq!(codec.encode("a日b本").unwrap(), b"a?b?".to_vec());
        assert_eq!(codec.encode("a日b本").unwrap(), codec.encode_str("a日b本"));
    }

    #[test]
    fn test_ascii_replaces_non_ascii() {
        for label in ["ascii", "US-ASCII", "ANSI_X3.4-1968"] {
            let codec = TextCodec::for_label(label).unwrap();
            assert_eq!(codec.name(), "US-ASCII");
            assert_eq!(codec.encode("café").unwrap(), b"caf?".to_vec());
            assert_eq!(codec.decode(&b"caf\xe9"[..]), "caf\u{FFFD}");
        }
    }

    #[test]
    fn test_latin1_keeps_c1_controls() {
        let codec = TextCodec::for_label("latin1").unwrap();
        assert_eq!(codec.name(), "ISO-8859-1");
        let bytes = codec.encode("a\u{0080}b\u{00ff}").unwrap();
        assert_eq!(bytes, b"a\x80b\xff".to_vec());
        assert_eq!(codec.decode(bytes.as_slice()), "a\u{0080}b\u{00ff}");
        assert_eq!(codec.encode("\u{20ac}").unwrap(), b"?".to_vec());
    }

    #[test]
    fn test_windows_1252_still_via_whatwg() {
        let codec = TextCodec::for_label("windows-1252").unwrap();
        assert_eq!(codec.name(), "windows-1252");
        assert_eq!(codec.encode("\u{20ac}").unwrap(), b"\x80".to_vec());
    }

    #[test]
    fn test_encode_rejects_bytes() {
        let codec = TextCodec::for_label("utf-8").unwrap();
        let err = codec.encode(&b"raw"[..]).unwrap_err();
        assert!(matches!(err, ReportError::NotText(_)));
    }

    #[test]
    fn test_decode_replaces_invalid_bytes() {
        let codec = TextCodec::for_label("utf-8").unwrap();
        assert_eq!(codec.decode(&b"a\xffb"[..]), "a\u{FFFD}b");
    }

    #[test]
    fn test_decode_passes_text_through() {
        let codec = TextCodec::for_label("utf-8").unwrap();
        let text = "already decoded";
        assert!(matches!(codec.decode(text), Cow::Borrowed(t) if t == text));
    }

    #[test]
    fn test_unknown_label() {
        assert!(matches!(
            TextCodec::for_label("klingon-8"),
            Err(ReportError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_charset_of_locale() {
        assert_eq!(charset_of_locale("de_DE.ISO-8859-1"), Some("ISO-8859-1"));
        assert_eq!(charset_of_locale("en_US.UTF-8@euro"), Some("UTF-8"));
        assert_eq!(charset_of_locale("C"), None);
    }
}
