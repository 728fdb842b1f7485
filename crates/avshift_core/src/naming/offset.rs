//! Audio offset value and its filename tag.

use std::fmt;

use super::{NamingError, NamingResult};

/// Seconds to shift audio relative to video.
///
/// Positive values delay the audio, negative values advance it. The text
/// is kept exactly as given because the filename tag is derived from it:
/// `+0.50` and `+0.5` are the same shift but different tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Offset {
    text: String,
    seconds: f64,
}

impl Offset {
    /// Parse an offset, keeping its original text.
    ///
    /// Surrounding whitespace is dropped. The text must be a plain decimal,
    /// `[+-]digits[.digits]`, the form FFmpeg's `-itsoffset` understands;
    /// exponents and bare dots are rejected. No range is enforced.
    pub fn parse(text: &str) -> NamingResult<Self> {
        let text = text.trim();
        if !is_plain_decimal(text) {
            return Err(NamingError::InvalidOffset(text.to_string()));
        }

        let seconds: f64 = text
            .parse()
            .map_err(|_| NamingError::InvalidOffset(text.to_string()))?;

        if !seconds.is_finite() {
            return Err(NamingError::InvalidOffset(text.to_string()));
        }

        Ok(Self {
            text: text.to_string(),
            seconds,
        })
    }

    /// The offset as typed, passed verbatim to `-itsoffset`.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Numeric value in seconds.
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Filesystem-safe tag for output names.
    pub fn tag(&self) -> String {
        sanitize_offset(&self.text)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

fn is_plain_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(whole) && fraction.map_or(true, all_digits)
}

/// Turn offset text into a filename tag: `-` -> `m`, `+` -> `p`, `.` -> `d`.
///
/// Works on text, not value, and leaves every other character alone.
pub fn sanitize_offset(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '-' => 'm',
            '+' => 'p',
            '.' => 'd',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_known_offsets() {
        assert_eq!(sanitize_offset("+0.5"), "p0d5");
        assert_eq!(sanitize_offset("-3.5"), "m3d5");
        assert_eq!(sanitize_offset("2"), "2");
    }

    #[test]
    fn sanitize_follows_text_not_value() {
        assert_eq!(sanitize_offset("+0.50"), "p0d50");
        assert_ne!(sanitize_offset("+0.50"), sanitize_offset("+0.5"));
    }

    #[test]
    fn sanitize_strips_all_unsafe_characters() {
        for text in ["+0.5", "-3.5", "--1..2++", "-0.000001", "1e-3", "+.5"] {
            let tag = sanitize_offset(text);
            assert!(!tag.contains(['-', '+', '.']), "{} -> {}", text, tag);
        }
    }

    #[test]
    fn sanitize_is_idempotent() {
        for text in ["+0.5", "-3.5", "12.25", "-.75"] {
            let once = sanitize_offset(text);
            assert_eq!(sanitize_offset(&once), once);
        }
    }

    #[test]
    fn parse_keeps_text() {
        let offset = Offset::parse(" +0.50 ").unwrap();
        assert_eq!(offset.as_str(), "+0.50");
        assert_eq!(offset.tag(), "p0d50");
        assert!((offset.seconds() - 0.5).abs() < 1e-12);
        assert_eq!(offset.to_string(), "+0.50");
    }

    #[test]
    fn parse_accepts_negative_and_large() {
        assert!((Offset::parse("-3.5").unwrap().seconds() + 3.5).abs() < 1e-12);
        assert!(Offset::parse("86400").is_ok());
    }

    #[test]
    fn parse_accepts_plain_decimals_only() {
        for text in ["0", "+0.5", "-3.50", "12", "-0.000001"] {
            assert!(Offset::parse(text).is_ok(), "{}", text);
        }
        assert!(Offset::parse("2.5e1").is_err());
        assert!(Offset::parse("-.75").is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        for text in ["", "abc", "0.5s", "inf", "NaN", "1,5", "1e-3", "5.", ".5", "+-1", "1.2.3"] {
            assert_eq!(
                Offset::parse(text),
                Err(NamingError::InvalidOffset(text.to_string())),
                "{}",
                text
            );
        }
    }
}
