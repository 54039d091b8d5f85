use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Name reported for content classified as binary.
pub const BINARY_NAME: &str = "binary";

/// Kind of content a match describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Text in the named encoding.
    #[default]
    Text,
    /// Non-text content (images, archives, anything carrying NUL bytes).
    Binary,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchType::Text => write!(f, "text"),
            MatchType::Binary => write!(f, "binary"),
        }
    }
}

/// A single detection candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EncodingMatch {
    /// Canonical encoding name (e.g. `UTF-8`, `Shift_JIS`, `windows-1252`).
    pub name: &'static str,
    /// Detector certainty, 0 to 100.
    pub confidence: u8,
    /// ISO 639-1 code of the most likely language, when the encoding implies one.
    pub language: Option<&'static str>,
    /// Text or binary content.
    #[serde(rename = "type")]
    pub match_type: MatchType,
}

impl EncodingMatch {
    /// Create a text match.
    pub const fn text(name: &'static str, confidence: u8, language: Option<&'static str>) -> Self {
        Self {
            name,
            confidence,
            language,
            match_type: MatchType::Text,
        }
    }

    /// The match reported for binary content.
    pub const fn binary() -> Self {
        Self {
            name: BINARY_NAME,
            confidence: 100,
            language: None,
            match_type: MatchType::Binary,
        }
    }

    /// Returns true if this match describes binary content.
    #[inline]
    pub fn is_binary(&self) -> bool {
        self.match_type == MatchType::Binary
    }

    /// Ranking order: higher confidence first, then name.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .confidence
            .cmp(&self.confidence)
            .then_with(|| self.name.cmp(other.name))
    }
}

impl fmt::Display for EncodingMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%)", self.name, self.confidence)?;
        if let Some(lang) = self.language {
            write!(f, " [{lang}]")?;
        }
        Ok(())
    }
}

/// Sort matches into ranking order.
pub fn sort_matches(matches: &mut [EncodingMatch]) {
    matches.sort_by(EncodingMatch::rank_cmp);
}
