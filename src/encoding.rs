//! Byte-level sniffing: BOMs, UTF-8 validity and sequence statistics.

use simdutf8::basic::from_utf8;

/// ESC, the lead byte of ISO-2022 shift sequences.
pub const ESC: u8 = 0x1B;

/// Check if the given bytes are valid UTF-8.
///
/// Uses SIMD-accelerated validation for performance.
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// Check if the data starts with a UTF-8 BOM (Byte Order Mark).
///
/// The UTF-8 BOM is the byte sequence: EF BB BF
pub fn has_utf8_bom(data: &[u8]) -> bool {
    data.starts_with(&[0xEF, 0xBB, 0xBF])
}

/// A Unicode byte order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bom {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl Bom {
    /// Canonical name of the encoding this BOM announces.
    pub const fn encoding_name(self) -> &'static str {
        match self {
            Bom::Utf8 => "UTF-8",
            Bom::Utf16Le => "UTF-16LE",
            Bom::Utf16Be => "UTF-16BE",
            Bom::Utf32Le => "UTF-32LE",
            Bom::Utf32Be => "UTF-32BE",
        }
    }

    /// Length of the mark in bytes.
    pub const fn len(self) -> usize {
        match self {
            Bom::Utf8 => 3,
            Bom::Utf16Le | Bom::Utf16Be => 2,
            Bom::Utf32Le | Bom::Utf32Be => 4,
        }
    }
}

/// Identify a leading byte order mark.
///
/// UTF-32LE is checked before UTF-16LE since `FF FE 00 00` also starts with
/// the UTF-16LE mark.
pub fn sniff_bom(data: &[u8]) -> Option<Bom> {
    if data.starts_with(&[0xFF, 0xFE, 0x00, 0x00]) {
        Some(Bom::Utf32Le)
    } else if data.starts_with(&[0x00, 0x00, 0xFE, 0xFF]) {
        Some(Bom::Utf32Be)
    } else if has_utf8_bom(data) {
        Some(Bom::Utf8)
    } else if data.starts_with(&[0xFF, 0xFE]) {
        Some(Bom::Utf16Le)
    } else if data.starts_with(&[0xFE, 0xFF]) {
        Some(Bom::Utf16Be)
    } else {
        None
    }
}

/// Skip a BOM if present and return the remaining data.
pub fn skip_bom(data: &[u8]) -> &[u8] {
    match sniff_bom(data) {
        Some(bom) => &data[bom.len()..],
        None => data,
    }
}

/// Number of bytes that carry encoding signal.
///
/// High-bit bytes and ESC count, as does the content of every run shifted
/// into a multi-byte set by an `ESC $` designation (ISO-2022 text).
pub fn signal_bytes(data: &[u8]) -> usize {
    let high = data.iter().filter(|&&b| b >= 0x80).count();
    let shifted: usize = data
        .split(|&b| b == ESC)
        .skip(1)
        .filter(|run| run.first() == Some(&b'$'))
        .map(|run| run.len().saturating_sub(2))
        .sum();
    high + bytecount::count(data, ESC) + shifted
}

/// Returns true if the data is 7-bit and free of escape sequences.
pub fn is_plain_ascii(data: &[u8]) -> bool {
    data.is_ascii() && !data.contains(&ESC)
}

/// Counts of well-formed and malformed UTF-8 multi-byte sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Utf8Stats {
    /// Complete, well-formed multi-byte sequences.
    pub valid: usize,
    /// Bytes that start or break a malformed sequence.
    pub invalid: usize,
}

impl Utf8Stats {
    /// Collect statistics over `data`.
    ///
    /// A sequence cut off by the end of the data counts as neither valid nor
    /// invalid, so truncated samples are not penalized.
    pub fn collect(data: &[u8]) -> Self {
        if is_utf8(data) {
            // Every lead byte starts a complete sequence.
            let valid = data.iter().filter(|&&b| b >= 0xC0).count();
            return Self { valid, invalid: 0 };
        }

        let mut stats = Self::default();
        let mut i = 0;
        while i < data.len() {
            let lead = data[i];
            i += 1;
            if lead < 0x80 {
                continue;
            }
            let trail = match lead {
                0xC2..=0xDF => 1,
                0xE0..=0xEF => 2,
                0xF0..=0xF4 => 3,
                _ => {
                    stats.invalid += 1;
                    continue;
                }
            };
            let end = i + trail;
            if end > data.len() {
                if data[i..].iter().all(|&b| b & 0xC0 == 0x80) {
                    break;
                }
                stats.invalid += 1;
                continue;
            }
            if data[i..end].iter().all(|&b| b & 0xC0 == 0x80) {
                stats.valid += 1;
                i = end;
            } else {
                stats.invalid += 1;
            }
        }
        stats
    }

    /// UTF-8 confidence implied by these statistics, if UTF-8 is plausible.
    pub fn confidence(&self) -> Option<u8> {
        match (self.valid, self.invalid) {
            (v, 0) if v > 3 => Some(100),
            (v, 0) if v > 0 => Some(80),
            (0, 0) => Some(15),
            (v, i) if v > i * 10 => Some(25),
            _ => None,
        }
    }
}
