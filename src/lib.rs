//! charlock: character encoding detection with ranked candidates
//!
//! Given raw bytes, charlock reports the encodings they are plausibly written
//! in, each with a 0 to 100 confidence, an optional language guess and a
//! text/binary classification.
//!
//! # Quick Start
//!
//! ```
//! // Best guess, with an optional declared-encoding hint
//! let best = charlock::detect(b"\xEF\xBB\xBFhello", None).unwrap();
//! assert_eq!(best.name, "UTF-8");
//! assert_eq!(best.confidence, 100);
//!
//! // Every candidate, best first
//! for candidate in charlock::detect_all(b"hello world", None) {
//!     println!("{candidate}");
//! }
//!
//! // Everything that can ever be reported
//! assert!(charlock::get_supported_encodings().contains(&"Shift_JIS"));
//! ```
//!
//! # Configuring a detector
//!
//! ```no_run
//! use charlock::{Detector, SampleSize};
//!
//! let mut detector = Detector::new();
//! detector
//!     .hint("sjis")
//!     .strip_tags(true)
//!     .sample_size(SampleSize::Bytes(16 * 1024));
//!
//! let best = detector.detect_path("notes.txt").unwrap();
//! println!("{best:?}");
//! ```
//!
//! # How candidates are scored
//!
//! 1. A byte order mark settles the question at confidence 100.
//! 2. File signatures and NUL bytes mark the input as binary.
//! 3. UTF-8 is scored from its multi-byte sequence statistics.
//! 4. Legacy encodings come from `chardetng`, asked once plainly and once per
//!    regional probe, plus multi-byte encodings that decode without errors.
//! 5. Replacement characters and very short input lower confidence; a hint
//!    raises it.

pub mod benchmark;
mod binary;
mod detector;
mod encoding;
mod error;
#[cfg(feature = "http")]
pub mod http;
mod markup;
mod matches;
mod registry;
mod sample;
mod score;
mod transcode;

pub use detector::{
    DEFAULT_MIN_CONFIDENCE, DetectOptions, DetectionRequest, Detector, detect, detect_all,
    get_supported_encodings,
};
pub use error::{CharlockError, Result};
pub use matches::{BINARY_NAME, EncodingMatch, MatchType};
pub use registry::{
    Codec, EncodingEntry, Family, REGION_PROBES, Registry, ScoringParams, initialize,
};
pub use sample::{DEFAULT_SAMPLE_BYTES, SampleSize};
pub use transcode::Decoded;

// Re-export for advanced usage
pub use binary::{DEFAULT_BINARY_SCAN_LEN, is_binary};
pub use encoding::{Bom, Utf8Stats, is_utf8, skip_bom, sniff_bom};
pub use markup::strip_tags;
