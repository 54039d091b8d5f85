//! Decoding input to UTF-8 text with a detected or named encoding.

use crate::encoding::sniff_bom;
use crate::matches::EncodingMatch;
use crate::registry::{Codec, EncodingEntry};

/// Text decoded with the encoding the detector settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The decoded text, without any byte order mark.
    pub text: String,
    /// The match used for decoding.
    pub encoding: EncodingMatch,
    /// Whether malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Decode `data` with `entry`, replacing malformed sequences.
///
/// A BOM matching the entry is skipped; any other leading bytes are decoded
/// as content.
pub fn decode_with(entry: &EncodingEntry, data: &[u8]) -> (String, bool) {
    let data = match sniff_bom(data) {
        Some(bom) if bom.encoding_name() == entry.name => &data[bom.len()..],
        _ => data,
    };
    match entry.codec {
        Codec::Rs(encoding) => {
            let (text, had_errors) = encoding.decode_without_bom_handling(data);
            (text.into_owned(), had_errors)
        }
        Codec::Utf32Le => decode_utf32(data, u32::from_le_bytes),
        Codec::Utf32Be => decode_utf32(data, u32::from_be_bytes),
    }
}

/// Returns true if `data` decodes with `entry` without a single malformed sequence.
pub fn decodes_cleanly(entry: &EncodingEntry, data: &[u8]) -> bool {
    match entry.codec {
        Codec::Rs(encoding) => encoding
            .decode_without_bom_handling_and_without_replacement(data)
            .is_some(),
        Codec::Utf32Le | Codec::Utf32Be => !decode_with(entry, data).1,
    }
}

/// Share of decoded characters that are U+FFFD replacements.
pub fn replacement_ratio(entry: &EncodingEntry, data: &[u8]) -> f64 {
    let (text, had_errors) = decode_with(entry, data);
    if !had_errors {
        return 0.0;
    }
    let total = bytecount::num_chars(text.as_bytes()).max(1);
    let replaced = text.matches(char::REPLACEMENT_CHARACTER).count();
    replaced as f64 / total as f64
}

fn decode_utf32(data: &[u8], read: fn([u8; 4]) -> u32) -> (String, bool) {
    let chunks = data.chunks_exact(4);
    let dangling = !chunks.remainder().is_empty();
    let mut had_errors = dangling;
    let mut text = String::with_capacity(data.len() / 4);
    for chunk in chunks {
        let unit = read([chunk[0], chunk[1], chunk[2], chunk[3]]);
        match char::from_u32(unit) {
            Some(c) => text.push(c),
            None => {
                text.push(char::REPLACEMENT_CHARACTER);
                had_errors = true;
            }
        }
    }
    if dangling {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    (text, had_errors)
}
