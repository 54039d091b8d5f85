//! Markup stripping ahead of statistical analysis.

use regex::bytes::Regex;
use std::borrow::Cow;

/// A single `<...>` tag. Operates on raw bytes so undecoded input is fine.
static TAG_PATTERN: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?-u)<[^<>]*>").expect("Invalid tag pattern"));

/// Below this share of surviving bytes the input is analysed unstripped.
const MIN_SURVIVING_RATIO: f64 = 0.2;

/// Remove markup tags from `data`.
///
/// Returns the input untouched when there are no tags, or when stripping would
/// leave too little to analyse.
pub fn strip_tags(data: &[u8]) -> Cow<'_, [u8]> {
    let stripped = TAG_PATTERN.replace_all(data, &b""[..]);
    if let Cow::Owned(kept) = &stripped {
        if (kept.len() as f64) < data.len() as f64 * MIN_SURVIVING_RATIO {
            return Cow::Borrowed(data);
        }
    }
    stripped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        let html = b"<p>Bonjour le monde, ceci est un texte assez long.</p>";
        assert_eq!(
            &strip_tags(html)[..],
            b"Bonjour le monde, ceci est un texte assez long."
        );
    }

    #[test]
    fn test_no_tags_borrows() {
        assert!(matches!(strip_tags(b"plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_mostly_markup_kept() {
        let data = b"<html><head><meta charset=x></head><body>hi</body></html>";
        assert_eq!(&strip_tags(data)[..], &data[..]);
    }

    #[test]
    fn test_non_utf8_bytes() {
        let data = b"<b>\xcf\xf0\xe8\xe2\xe5\xf2 \xcf\xf0\xe8\xe2\xe5\xf2</b>";
        assert_eq!(&strip_tags(data)[..], b"\xcf\xf0\xe8\xe2\xe5\xf2 \xcf\xf0\xe8\xe2\xe5\xf2");
    }
}
