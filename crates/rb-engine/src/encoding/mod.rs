//! Text encoding detection.
//!
//! [`detect`] classifies a byte buffer as [`Detection::Binary`] or as text in
//! one of the [`CANDIDATES`] encodings. It is pure and deterministic: the same
//! bytes always produce the same answer.
//!
//! # Policy
//!
//! 1. The first [`SAMPLE_LEN`] bytes are inspected. Any NUL byte, or a share
//!    of C0 control bytes (other than tab, newline, carriage return, form feed
//!    and escape) above [`CONTROL_RATIO_PERCENT`], means binary.
//! 2. UTF-8, with or without a BOM, wins as soon as it decodes the buffer.
//! 3. A legacy candidate qualifies only if it decodes the whole buffer without
//!    a malformed sequence and re-encoding the decoded text reproduces the
//!    buffer byte for byte. Among qualifying candidates the one whose text
//!    has the highest share of characters typical for its script wins. Ties
//!    go to the earlier candidate.
//! 4. If no candidate qualifies, the buffer is binary. Nothing is guessed.
//!
//! # Examples
//!
//! ```
//! use rb_engine::{detect, Detection, TextEncoding};
//!
//! assert_eq!(detect(b"plain text\n"), Detection::Text(TextEncoding::Utf8));
//! assert_eq!(detect(b"\x7fELF\x00\x01"), Detection::Binary);
//! ```

mod plausibility;

use std::borrow::Cow;
use std::fmt;

use encoding_rs::{BIG5, EUC_KR, Encoding, GB18030, SHIFT_JIS, UTF_8, WINDOWS_1252};

use self::plausibility::Score;

/// Number of leading bytes inspected by the binary gate.
pub const SAMPLE_LEN: usize = 8 * 1024;

/// Share of control bytes in the sample above which a file is binary.
pub const CONTROL_RATIO_PERCENT: usize = 30;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encodings a text file may be decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TextEncoding {
    /// UTF-8 without a byte order mark.
    Utf8,
    /// UTF-8 with a leading byte order mark, kept on re-encode.
    Utf8Bom,
    /// Simplified Chinese.
    Gb18030,
    /// Japanese.
    ShiftJis,
    /// Korean.
    EucKr,
    /// Traditional Chinese.
    Big5,
    /// Western European; decodes nearly any byte sequence.
    Windows1252,
}

/// Candidates in the order they are tried; later ones lose ties.
///
/// [`TextEncoding::Utf8Bom`] only applies when the buffer starts with a BOM.
/// [`TextEncoding::Windows1252`] is the permissive fallback and comes last.
pub const CANDIDATES: &[TextEncoding] = &[
    TextEncoding::Utf8Bom,
    TextEncoding::Utf8,
    TextEncoding::Gb18030,
    TextEncoding::ShiftJis,
    TextEncoding::EucKr,
    TextEncoding::Big5,
    TextEncoding::Windows1252,
];

impl TextEncoding {
    /// Returns the label recorded in outcomes.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Bom => "utf-8-bom",
            Self::Gb18030 => "gb18030",
            Self::ShiftJis => "shift_jis",
            Self::EucKr => "euc-kr",
            Self::Big5 => "big5",
            Self::Windows1252 => "windows-1252",
        }
    }

    const fn codec(self) -> &'static Encoding {
        match self {
            Self::Utf8 | Self::Utf8Bom => UTF_8,
            Self::Gb18030 => GB18030,
            Self::ShiftJis => SHIFT_JIS,
            Self::EucKr => EUC_KR,
            Self::Big5 => BIG5,
            Self::Windows1252 => WINDOWS_1252,
        }
    }

    /// Decodes the whole buffer, or returns `None` on any malformed sequence.
    ///
    /// For [`TextEncoding::Utf8Bom`] the buffer must start with the BOM, which
    /// is not part of the returned text.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        let body = match self {
            Self::Utf8Bom => bytes.strip_prefix(UTF8_BOM)?,
            _ => bytes,
        };
        self.codec()
            .decode_without_bom_handling_and_without_replacement(body)
    }

    /// Encodes text, or returns `None` if a character is unrepresentable.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_engine::TextEncoding;
    ///
    /// assert_eq!(
    ///     TextEncoding::Windows1252.encode("café").as_deref(),
    ///     Some(&b"caf\xe9"[..])
    /// );
    /// assert!(TextEncoding::Windows1252.encode("中文").is_none());
    /// ```
    #[must_use]
    pub fn encode(self, text: &str) -> Option<Vec<u8>> {
        match self {
            Self::Utf8 => Some(text.as_bytes().to_vec()),
            Self::Utf8Bom => {
                let mut out = Vec::with_capacity(UTF8_BOM.len() + text.len());
                out.extend_from_slice(UTF8_BOM);
                out.extend_from_slice(text.as_bytes());
                Some(out)
            }
            _ => {
                let (bytes, _, had_errors) = self.codec().encode(text);
                (!had_errors).then(|| bytes.into_owned())
            }
        }
    }

    /// Whether encoding `text`, decoded from `bytes`, reproduces `bytes`.
    ///
    /// Some decoders map bytes to characters their encoder writes
    /// differently, e.g. GB18030 reads `0x80` as `€` but writes `€` as
    /// `A2 E3`.
    #[must_use]
    pub fn round_trips(self, text: &str, bytes: &[u8]) -> bool {
        self.encode(text).as_deref() == Some(bytes)
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of [`detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Detection {
    /// Text that decodes cleanly with the given encoding.
    Text(TextEncoding),
    /// Binary content; never rewritten.
    Binary,
}

/// Classifies a buffer as binary or as text in one of the [`CANDIDATES`].
///
/// Text detection guarantees that encoding the decoded text with the
/// detected encoding gives back `bytes` unchanged. An empty buffer is UTF-8
/// text.
#[must_use]
pub fn detect(bytes: &[u8]) -> Detection {
    if looks_binary(&bytes[..bytes.len().min(SAMPLE_LEN)]) {
        return Detection::Binary;
    }

    let has_bom = bytes.starts_with(UTF8_BOM);
    let mut best: Option<(TextEncoding, Score)> = None;
    for &candidate in CANDIDATES {
        if candidate == TextEncoding::Utf8Bom && !has_bom {
            continue;
        }
        let Some(text) = candidate.decode(bytes) else {
            continue;
        };
        if matches!(candidate, TextEncoding::Utf8 | TextEncoding::Utf8Bom) {
            return Detection::Text(candidate);
        }
        if !candidate.round_trips(&text, bytes) {
            continue;
        }
        let score = Score::of(candidate, &text);
        if best.is_none_or(|(_, leader)| score.beats(leader)) {
            best = Some((candidate, score));
        }
    }
    best.map_or(Detection::Binary, |(encoding, _)| Detection::Text(encoding))
}

fn looks_binary(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    if memchr::memchr(0, sample).is_some() {
        return true;
    }
    let controls = sample.iter().filter(|&&b| is_suspicious_control(b)).count();
    controls * 100 > sample.len() * CONTROL_RATIO_PERCENT
}

const fn is_suspicious_control(byte: u8) -> bool {
    byte < 0x20 && !matches!(byte, b'\t' | b'\n' | b'\r' | 0x0c | 0x1b)
}
