//! The `Detector` builder and its detect methods.

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use rayon::prelude::*;
use tracing::debug;

use crate::binary::{DEFAULT_BINARY_SCAN_LEN, is_binary};
use crate::encoding::sniff_bom;
use crate::error::{CharlockError, Result};
use crate::markup::strip_tags;
use crate::matches::{EncodingMatch, sort_matches};
use crate::registry::{EncodingEntry, Registry, shared};
use crate::sample::SampleSize;
use crate::score::score_text;
use crate::transcode::{Decoded, decode_with};

/// Default minimum confidence for a candidate to be reported.
pub const DEFAULT_MIN_CONFIDENCE: u8 = 10;

/// Named options for a detection call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectOptions {
    /// Declared or expected encoding. Biases results but never constrains them.
    pub hint: Option<String>,
    /// Candidates below this confidence are dropped.
    pub min_confidence: u8,
    /// Remove `<...>` markup before analysis.
    pub strip_tags: bool,
    /// Number of leading bytes searched for NUL when sniffing binary content.
    pub binary_scan_len: usize,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            hint: None,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            strip_tags: false,
            binary_scan_len: DEFAULT_BINARY_SCAN_LEN,
        }
    }
}

impl DetectOptions {
    /// Check that every field is in range.
    pub fn validate(&self) -> Result<()> {
        check_min_confidence(self.min_confidence)?;
        check_binary_scan_len(self.binary_scan_len)
    }
}

fn check_min_confidence(min_confidence: u8) -> Result<()> {
    if min_confidence > 100 {
        return Err(CharlockError::InvalidArgument(format!(
            "min_confidence must be between 0 and 100, got {min_confidence}"
        )));
    }
    Ok(())
}

fn check_binary_scan_len(len: usize) -> Result<()> {
    if len == 0 {
        return Err(CharlockError::InvalidArgument(
            "binary_scan_len must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Bytes to detect, plus an optional per-call hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionRequest<'a> {
    pub data: &'a [u8],
    pub hint: Option<&'a str>,
}

impl<'a> DetectionRequest<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, hint: None }
    }

    /// Attach a hint, overriding the detector's own.
    pub const fn with_hint(mut self, hint: &'a str) -> Self {
        self.hint = Some(hint);
        self
    }
}

impl<'a> From<&'a [u8]> for DetectionRequest<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

/// Character encoding detector.
///
/// A detector holds only immutable configuration and a shared registry, so it
/// can be cloned freely and used from many threads at once.
///
/// # Example
///
/// ```
/// use charlock::Detector;
///
/// let mut detector = Detector::new();
/// detector.min_confidence(20).unwrap().strip_tags(true);
///
/// let best = detector.detect(b"\xEF\xBB\xBFhello").unwrap();
/// assert_eq!(best.name, "UTF-8");
/// assert_eq!(best.confidence, 100);
/// ```
#[derive(Debug, Clone)]
pub struct Detector {
    /// Supported encodings and scoring parameters.
    registry: Arc<Registry>,
    /// Options applied to every call.
    options: DetectOptions,
    /// Sample size for path and reader input.
    sample_size: SampleSize,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector {
    /// Create a detector with default settings and the shared registry.
    pub fn new() -> Self {
        Self {
            registry: shared(),
            options: DetectOptions::default(),
            sample_size: SampleSize::default(),
        }
    }

    /// Create a detector backed by a specific registry.
    pub fn with_registry(registry: impl Into<Arc<Registry>>) -> Self {
        Self {
            registry: registry.into(),
            ..Self::new()
        }
    }

    /// Create a detector from a full set of options.
    pub fn with_options(options: DetectOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::new()
        })
    }

    pub fn options(&self) -> &DetectOptions {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Sample size used for path and reader input.
    pub fn sampling(&self) -> SampleSize {
        self.sample_size
    }

    /// Set the default hint for calls that do not carry their own.
    pub fn hint(&mut self, hint: impl Into<String>) -> &mut Self {
        self.options.hint = Some(hint.into());
        self
    }

    /// Set the minimum confidence (0 to 100) for reported candidates.
    pub fn min_confidence(&mut self, min_confidence: u8) -> Result<&mut Self> {
        check_min_confidence(min_confidence)?;
        self.options.min_confidence = min_confidence;
        Ok(self)
    }

    /// Strip markup tags before analysis.
    pub fn strip_tags(&mut self, strip_tags: bool) -> &mut Self {
        self.options.strip_tags = strip_tags;
        self
    }

    /// Set how many leading bytes are searched for NUL when sniffing binary content.
    pub fn binary_scan_len(&mut self, len: usize) -> Result<&mut Self> {
        check_binary_scan_len(len)?;
        self.options.binary_scan_len = len;
        Ok(self)
    }

    /// Set the sample size for path and reader input.
    pub fn sample_size(&mut self, sample_size: SampleSize) -> &mut Self {
        self.sample_size = sample_size;
        self
    }

    /// Canonical names of every encoding this detector can report.
    pub fn supported_encodings(&self) -> Vec<&'static str> {
        self.registry.supported_encodings()
    }

    /// The most likely encoding of `data`, or None if nothing qualifies.
    pub fn detect(&self, data: &[u8]) -> Option<EncodingMatch> {
        self.detect_request(&DetectionRequest::new(data))
    }

    /// Every plausible encoding of `data`, best first.
    pub fn detect_all(&self, data: &[u8]) -> Vec<EncodingMatch> {
        self.detect_all_request(&DetectionRequest::new(data))
    }

    pub fn detect_request(&self, request: &DetectionRequest<'_>) -> Option<EncodingMatch> {
        self.detect_all_request(request).into_iter().next()
    }

    pub fn detect_all_request(&self, request: &DetectionRequest<'_>) -> Vec<EncodingMatch> {
        let data = request.data;
        if data.is_empty() {
            return Vec::new();
        }

        if let Some(bom) = sniff_bom(data) {
            debug!(encoding = bom.encoding_name(), "byte order mark");
            return match self.registry.get(bom.encoding_name()) {
                Some(entry) => vec![EncodingMatch::text(entry.name, 100, entry.language)],
                None => Vec::new(),
            };
        }

        if is_binary(data, self.options.binary_scan_len) {
            debug!(len = data.len(), "binary content");
            return vec![EncodingMatch::binary()];
        }

        let analysed = if self.options.strip_tags {
            strip_tags(data)
        } else {
            Cow::Borrowed(data)
        };

        let hint = request.hint.or(self.options.hint.as_deref());
        let mut matches = score_text(&analysed, &self.registry, self.resolve_hint(hint));
        matches.retain(|m| m.confidence >= self.options.min_confidence);
        sort_matches(&mut matches);
        matches
    }

    /// Detect, then decode `data` to UTF-8 with the best match.
    ///
    /// Returns None for empty input, binary content, or when no candidate qualifies.
    pub fn decode(&self, data: &[u8]) -> Option<Decoded> {
        let best = self.detect(data)?;
        if best.is_binary() {
            return None;
        }
        let entry = self.registry.get(best.name)?;
        let (text, had_errors) = decode_with(entry, data);
        Some(Decoded {
            text,
            encoding: best,
            had_errors,
        })
    }

    /// Detect many independent inputs in parallel.
    ///
    /// Results are in input order and identical to calling [`Detector::detect`]
    /// on each input.
    pub fn detect_batch(&self, inputs: &[&[u8]]) -> Vec<Option<EncodingMatch>> {
        inputs.par_iter().map(|data| self.detect(data)).collect()
    }

    /// Detect the encoding of a file, reading a sample per the sample size.
    pub fn detect_path<P: AsRef<Path>>(&self, path: P) -> Result<Option<EncodingMatch>> {
        let file = File::open(path.as_ref())?;
        self.detect_reader(std::io::BufReader::new(file))
    }

    pub fn detect_all_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<EncodingMatch>> {
        let file = File::open(path.as_ref())?;
        self.detect_all_reader(std::io::BufReader::new(file))
    }

    /// Detect the encoding of data read from `reader`.
    pub fn detect_reader<R: Read>(&self, reader: R) -> Result<Option<EncodingMatch>> {
        let data = self.read_sample(reader)?;
        Ok(self.detect(&data))
    }

    pub fn detect_all_reader<R: Read>(&self, reader: R) -> Result<Vec<EncodingMatch>> {
        let data = self.read_sample(reader)?;
        Ok(self.detect_all(&data))
    }

    /// Read a sample of data from the reader based on sample_size settings.
    pub fn read_sample<R: Read>(&self, reader: R) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        match self.sample_size {
            SampleSize::Bytes(n) => {
                buffer.reserve(n);
                reader.take(n as u64).read_to_end(&mut buffer)?;
            }
            SampleSize::All => {
                let mut reader = reader;
                reader.read_to_end(&mut buffer)?;
            }
        }
        Ok(buffer)
    }

    fn resolve_hint(&self, hint: Option<&str>) -> Option<&EncodingEntry> {
        let label = hint?;
        match self.registry.require(label) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "ignoring hint");
                None
            }
        }
    }
}

static DEFAULT_DETECTOR: LazyLock<Detector> = LazyLock::new(Detector::new);

/// The most likely encoding of `data`, using default settings.
pub fn detect(data: &[u8], hint: Option<&str>) -> Option<EncodingMatch> {
    DEFAULT_DETECTOR.detect_request(&DetectionRequest { data, hint })
}

/// Every plausible encoding of `data`, best first, using default settings.
pub fn detect_all(data: &[u8], hint: Option<&str>) -> Vec<EncodingMatch> {
    DEFAULT_DETECTOR.detect_all_request(&DetectionRequest { data, hint })
}

/// Canonical names of every supported encoding.
pub fn get_supported_encodings() -> Vec<&'static str> {
    DEFAULT_DETECTOR.supported_encodings()
}
