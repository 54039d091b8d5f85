//! Table of supported encodings and the scoring parameters used to rank them.
//!
//! The registry is built once by [`initialize`] and never mutated afterwards.
//! Detectors hold it behind an `Arc`, so any number of differently configured
//! detectors can share one table, and tests can build their own.

use encoding_rs::Encoding;
use foldhash::{HashMap, HashMapExt};
use std::sync::{Arc, LazyLock};

use crate::error::{CharlockError, Result};

/// How an entry is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// Decoded by `encoding_rs`.
    Rs(&'static Encoding),
    /// UTF-32 little endian (not covered by `encoding_rs`).
    Utf32Le,
    /// UTF-32 big endian (not covered by `encoding_rs`).
    Utf32Be,
}

/// Broad family of an encoding, used by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// UTF-8, UTF-16 and UTF-32.
    Unicode,
    /// Variable-width legacy CJK encodings.
    MultiByte,
    /// 7-bit escape-sequence encodings.
    Stateful,
    /// One byte per character.
    SingleByte,
}

/// A supported encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingEntry {
    /// Canonical name reported in matches.
    pub name: &'static str,
    pub codec: Codec,
    /// Language implied by the encoding, if it implies exactly one.
    pub language: Option<&'static str>,
    pub family: Family,
}

impl EncodingEntry {
    const fn rs(
        encoding: &'static Encoding,
        name: &'static str,
        language: Option<&'static str>,
        family: Family,
    ) -> Self {
        Self {
            name,
            codec: Codec::Rs(encoding),
            language,
            family,
        }
    }

    /// The `encoding_rs` encoding backing this entry, if any.
    pub fn encoding(&self) -> Option<&'static Encoding> {
        match self.codec {
            Codec::Rs(encoding) => Some(encoding),
            Codec::Utf32Le | Codec::Utf32Be => None,
        }
    }
}

/// Tunable constants of the scorer.
///
/// All confidences are on the 0..=100 scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringParams {
    /// Inputs (or signal bytes) below this count are considered too short
    /// to analyse with full confidence.
    pub min_analysis_window: usize,
    /// UTF-8 confidence for pure ASCII input.
    pub ascii_utf8: u8,
    /// windows-1252 confidence for pure ASCII input.
    pub ascii_latin: u8,
    /// Base confidence of the statistical detector's region-free guess.
    pub primary_base: u8,
    /// Base confidence of guesses only produced under a regional probe.
    pub alternate_base: u8,
    /// Confidence shared out among guesses in proportion to their votes.
    pub vote_weight: u8,
    /// Confidence of a multi-byte encoding that merely decodes cleanly.
    pub structural: u8,
    /// Added to the hinted encoding when it is already a candidate.
    pub hint_bonus: u8,
    /// Confidence of a hinted encoding that is not otherwise a candidate.
    pub hint_floor: u8,
    /// Ceiling for legacy candidates when the input is valid multi-byte UTF-8.
    pub utf8_dominance_cap: u8,
    /// Regional probes handed to the statistical detector.
    pub probes: &'static [&'static str],
}

/// Top-level domains used to ask the statistical detector for regional guesses.
pub const REGION_PROBES: &[&str] = &[
    "jp", "cn", "tw", "kr", "ru", "gr", "il", "th", "vn", "tr", "pl", "lt", "eg",
];

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            min_analysis_window: 4,
            ascii_utf8: 80,
            ascii_latin: 60,
            primary_base: 70,
            alternate_base: 30,
            vote_weight: 20,
            structural: 25,
            hint_bonus: 10,
            hint_floor: 35,
            utf8_dominance_cap: 50,
            probes: REGION_PROBES,
        }
    }
}

/// Immutable table of supported encodings plus scoring parameters.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<EncodingEntry>,
    by_name: HashMap<String, usize>,
    params: ScoringParams,
}

impl Registry {
    /// Build a registry with the default table and parameters.
    pub fn new() -> Self {
        Self::with_params(ScoringParams::default())
    }

    /// Build a registry with the default table and custom parameters.
    pub fn with_params(params: ScoringParams) -> Self {
        let entries = default_entries();
        let mut by_name = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            by_name.insert(entry.name.to_ascii_lowercase(), i);
        }
        Self {
            entries,
            by_name,
            params,
        }
    }

    /// All entries, in table order.
    pub fn entries(&self) -> &[EncodingEntry] {
        &self.entries
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    /// Canonical names of every supported encoding, in table order.
    pub fn supported_encodings(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    /// Look up an entry by canonical name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&EncodingEntry> {
        self.by_name
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.entries[i])
    }

    /// The entry backing an `encoding_rs` encoding, if it is supported.
    pub fn entry_for(&self, encoding: &'static Encoding) -> Option<&EncodingEntry> {
        self.get(encoding.name())
    }

    /// Resolve an encoding label (any WHATWG label, or a UTF-32 label).
    ///
    /// Labels are matched case-insensitively with surrounding whitespace ignored.
    pub fn resolve(&self, label: &str) -> Option<&EncodingEntry> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        if let Some(entry) = self.get(label) {
            return Some(entry);
        }
        match label.to_ascii_lowercase().as_str() {
            "utf-32" | "utf32" | "utf-32le" | "utf32le" | "ucs-4" | "ucs-4le" => {
                return self.get("UTF-32LE");
            }
            "utf-32be" | "utf32be" | "ucs-4be" => return self.get("UTF-32BE"),
            _ => {}
        }
        Encoding::for_label(label.as_bytes()).and_then(|enc| self.entry_for(enc))
    }

    /// Like [`Registry::resolve`], but unknown labels are an error.
    pub fn require(&self, label: &str) -> Result<&EncodingEntry> {
        self.resolve(label)
            .ok_or_else(|| CharlockError::UnsupportedEncodingName(label.to_string()))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a fresh registry.
///
/// Each call returns an independent value; use it with
/// [`Detector::with_registry`](crate::Detector::with_registry) to run detectors
/// with custom scoring parameters.
pub fn initialize() -> Registry {
    Registry::new()
}

static SHARED: LazyLock<Arc<Registry>> = LazyLock::new(|| Arc::new(Registry::new()));

/// The process-wide default registry, built on first use.
pub fn shared() -> Arc<Registry> {
    Arc::clone(&SHARED)
}

fn default_entries() -> Vec<EncodingEntry> {
    use Family::*;
    vec![
        // Unicode
        EncodingEntry::rs(encoding_rs::UTF_8, "UTF-8", None, Unicode),
        EncodingEntry::rs(encoding_rs::UTF_16LE, "UTF-16LE", None, Unicode),
        EncodingEntry::rs(encoding_rs::UTF_16BE, "UTF-16BE", None, Unicode),
        EncodingEntry {
            name: "UTF-32LE",
            codec: Codec::Utf32Le,
            language: None,
            family: Unicode,
        },
        EncodingEntry {
            name: "UTF-32BE",
            codec: Codec::Utf32Be,
            language: None,
            family: Unicode,
        },
        // East Asian
        EncodingEntry::rs(encoding_rs::SHIFT_JIS, "Shift_JIS", Some("ja"), MultiByte),
        EncodingEntry::rs(encoding_rs::EUC_JP, "EUC-JP", Some("ja"), MultiByte),
        EncodingEntry::rs(encoding_rs::ISO_2022_JP, "ISO-2022-JP", Some("ja"), Stateful),
        EncodingEntry::rs(encoding_rs::GBK, "GBK", Some("zh"), MultiByte),
        EncodingEntry::rs(encoding_rs::GB18030, "gb18030", Some("zh"), MultiByte),
        EncodingEntry::rs(encoding_rs::BIG5, "Big5", Some("zh"), MultiByte),
        EncodingEntry::rs(encoding_rs::EUC_KR, "EUC-KR", Some("ko"), MultiByte),
        // Windows code pages
        EncodingEntry::rs(encoding_rs::WINDOWS_1250, "windows-1250", None, SingleByte),
        EncodingEntry::rs(encoding_rs::WINDOWS_1251, "windows-1251", Some("ru"), SingleByte),
        EncodingEntry::rs(encoding_rs::WINDOWS_1252, "windows-1252", None, SingleByte),
        EncodingEntry::rs(encoding_rs::WINDOWS_1253, "windows-1253", Some("el"), SingleByte),
        EncodingEntry::rs(encoding_rs::WINDOWS_1254, "windows-1254", Some("tr"), SingleByte),
        EncodingEntry::rs(encoding_rs::WINDOWS_1255, "windows-1255", Some("he"), SingleByte),
        EncodingEntry::rs(encoding_rs::WINDOWS_1256, "windows-1256", Some("ar"), SingleByte),
        EncodingEntry::rs(encoding_rs::WINDOWS_1257, "windows-1257", None, SingleByte),
        EncodingEntry::rs(encoding_rs::WINDOWS_1258, "windows-1258", Some("vi"), SingleByte),
        EncodingEntry::rs(encoding_rs::WINDOWS_874, "windows-874", Some("th"), SingleByte),
        // ISO 8859
        EncodingEntry::rs(encoding_rs::ISO_8859_2, "ISO-8859-2", None, SingleByte),
        EncodingEntry::rs(encoding_rs::ISO_8859_4, "ISO-8859-4", None, SingleByte),
        EncodingEntry::rs(encoding_rs::ISO_8859_5, "ISO-8859-5", Some("ru"), SingleByte),
        EncodingEntry::rs(encoding_rs::ISO_8859_6, "ISO-8859-6", Some("ar"), SingleByte),
        EncodingEntry::rs(encoding_rs::ISO_8859_7, "ISO-8859-7", Some("el"), SingleByte),
        EncodingEntry::rs(encoding_rs::ISO_8859_8, "ISO-8859-8", Some("he"), SingleByte),
        EncodingEntry::rs(encoding_rs::ISO_8859_13, "ISO-8859-13", None, SingleByte),
        // Cyrillic
        EncodingEntry::rs(encoding_rs::KOI8_U, "KOI8-U", Some("ru"), SingleByte),
        EncodingEntry::rs(encoding_rs::KOI8_R, "KOI8-R", Some("ru"), SingleByte),
        EncodingEntry::rs(encoding_rs::IBM866, "IBM866", Some("ru"), SingleByte),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldhash::HashSet;

    #[test]
    fn test_names_match_encoding_rs() {
        let registry = initialize();
        for entry in registry.entries() {
            if let Some(enc) = entry.encoding() {
                assert_eq!(enc.name(), entry.name);
            }
        }
    }

    #[test]
    fn test_supported_encodings_unique() {
        let names = initialize().supported_encodings();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert!(!names.is_empty());
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_resolve_labels() {
        let registry = initialize();
        assert_eq!(registry.resolve("utf8").unwrap().name, "UTF-8");
        assert_eq!(registry.resolve(" SHIFT_JIS ").unwrap().name, "Shift_JIS");
        assert_eq!(registry.resolve("sjis").unwrap().name, "Shift_JIS");
        assert_eq!(registry.resolve("latin1").unwrap().name, "windows-1252");
        assert_eq!(registry.resolve("utf-32").unwrap().name, "UTF-32LE");
        assert_eq!(registry.resolve("UTF-32BE").unwrap().name, "UTF-32BE");
        assert!(registry.resolve("").is_none());
        assert!(registry.resolve("klingon").is_none());
        // Known to encoding_rs, but not a reportable encoding here.
        assert!(registry.resolve("x-user-defined").is_none());
    }

    #[test]
    fn test_require_unknown() {
        let err = initialize().require("klingon").unwrap_err();
        assert!(matches!(err, CharlockError::UnsupportedEncodingName(ref n) if n == "klingon"));
    }

    #[test]
    fn test_shared_is_shared() {
        assert!(Arc::ptr_eq(&shared(), &shared()));
    }

    #[test]
    fn test_probes_are_valid_tlds() {
        for probe in REGION_PROBES {
            assert!(probe.bytes().all(|b| b.is_ascii_lowercase()));
        }
    }
}
