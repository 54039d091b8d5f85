//! Candidate scoring for text input.
//!
//! Confidence comes from three sources:
//! - UTF-8 sequence statistics
//! - the statistical detector's guess, asked once without a region and once
//!   per regional probe, each guess counting as a vote
//! - structural validity of the multi-byte legacy encodings
//!
//! Legacy candidates are then penalized for replacement characters and short
//! input, and the caller's hint gets a bonus.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::encoding::{Utf8Stats, is_plain_ascii, signal_bytes};
use crate::matches::EncodingMatch;
use crate::registry::{EncodingEntry, Family, Registry};
use crate::transcode::{decodes_cleanly, replacement_ratio};

/// A candidate while it is being scored.
#[derive(Debug, Clone, Copy)]
struct Candidate<'r> {
    entry: &'r EncodingEntry,
    score: f64,
}

/// Candidates keyed by canonical name; the map order keeps scoring deterministic.
type Candidates<'r> = BTreeMap<&'static str, Candidate<'r>>;

/// Votes from the statistical detector.
#[derive(Debug, Clone)]
pub struct Votes {
    /// The guess made without any regional probe.
    pub primary: &'static Encoding,
    /// Guess counts per encoding, including the primary guess.
    pub counts: BTreeMap<&'static str, (&'static Encoding, usize)>,
    /// Number of guesses taken.
    pub total: usize,
}

/// Ask the statistical detector for its guesses over `data`.
pub fn collect_votes(data: &[u8], probes: &[&str]) -> Votes {
    let mut detector = EncodingDetector::new();
    detector.feed(data, true);

    let primary = detector.guess(None, false);
    let mut counts = BTreeMap::new();
    counts.insert(primary.name(), (primary, 1));

    for probe in probes {
        let guess = detector.guess(Some(probe.as_bytes()), false);
        counts.entry(guess.name()).or_insert((guess, 0)).1 += 1;
    }

    Votes {
        primary,
        counts,
        total: probes.len() + 1,
    }
}

/// Score every plausible encoding for `data`.
///
/// `data` must be non-empty and free of a BOM; binary content should be
/// filtered out before calling. The result is unsorted and unfiltered.
pub fn score_text(
    data: &[u8],
    registry: &Registry,
    hint: Option<&EncodingEntry>,
) -> Vec<EncodingMatch> {
    let params = registry.params();
    let mut candidates: Candidates<'_> = BTreeMap::new();

    if is_plain_ascii(data) {
        let short = data.len() < params.min_analysis_window;
        let scale = if short { 0.5 } else { 1.0 };
        add(&mut candidates, registry, "UTF-8", f64::from(params.ascii_utf8) * scale);
        add(&mut candidates, registry, "windows-1252", f64::from(params.ascii_latin) * scale);
    } else {
        let stats = Utf8Stats::collect(data);
        if let Some(confidence) = stats.confidence() {
            add(&mut candidates, registry, "UTF-8", f64::from(confidence));
        }

        let mut legacy = legacy_candidates(data, registry);
        let short = signal_bytes(data) < params.min_analysis_window;
        let utf8_dominant = stats.invalid == 0 && stats.valid > 0;

        for candidate in legacy.values_mut() {
            let ratio = replacement_ratio(candidate.entry, data);
            candidate.score *= 1.0 - (ratio * 10.0).min(1.0);
            if short {
                candidate.score *= 0.5;
            }
            if utf8_dominant {
                candidate.score = candidate.score.min(f64::from(params.utf8_dominance_cap));
            }
            trace!(
                encoding = candidate.entry.name,
                score = candidate.score,
                replacement_ratio = ratio,
                "legacy candidate"
            );
        }
        candidates.extend(legacy);
    }

    if let Some(entry) = hint {
        apply_hint(&mut candidates, entry, data, registry);
    }

    candidates
        .into_values()
        .map(|c| EncodingMatch::text(c.entry.name, to_confidence(c.score), c.entry.language))
        .collect()
}

/// Candidates from the statistical detector plus structurally valid multi-byte encodings.
fn legacy_candidates<'r>(data: &[u8], registry: &'r Registry) -> Candidates<'r> {
    let params = registry.params();
    let votes = collect_votes(data, params.probes);
    let mut candidates = BTreeMap::new();

    for (name, &(encoding, count)) in &votes.counts {
        let Some(entry) = registry.entry_for(encoding) else {
            debug!(encoding = *name, "guess is not a supported encoding");
            continue;
        };
        let base = if encoding == votes.primary {
            params.primary_base
        } else {
            params.alternate_base
        };
        let share = usize::from(params.vote_weight) * count / votes.total;
        let score = f64::from(base) + share as f64;
        candidates.insert(entry.name, Candidate { entry, score });
    }

    // 7-bit input decodes cleanly in every multi-byte encoding.
    if data.is_ascii() {
        return candidates;
    }

    for entry in registry.entries() {
        if entry.family != Family::MultiByte || candidates.contains_key(entry.name) {
            continue;
        }
        if decodes_cleanly(entry, data) {
            candidates.insert(
                entry.name,
                Candidate {
                    entry,
                    score: f64::from(params.structural),
                },
            );
        }
    }

    candidates
}

fn apply_hint<'r>(
    candidates: &mut Candidates<'r>,
    entry: &'r EncodingEntry,
    data: &[u8],
    registry: &Registry,
) {
    let params = registry.params();
    match candidates.get_mut(entry.name) {
        Some(candidate) => {
            candidate.score = (candidate.score + f64::from(params.hint_bonus)).min(100.0);
        }
        None if decodes_cleanly(entry, data) => {
            candidates.insert(
                entry.name,
                Candidate {
                    entry,
                    score: f64::from(params.hint_floor),
                },
            );
        }
        None => debug!(hint = entry.name, "hinted encoding does not decode the input"),
    }
}

fn add<'r>(candidates: &mut Candidates<'r>, registry: &'r Registry, name: &str, score: f64) {
    if let Some(entry) = registry.get(name) {
        candidates.insert(entry.name, Candidate { entry, score });
    }
}

fn to_confidence(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}
