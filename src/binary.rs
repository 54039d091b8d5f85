//! Binary-content sniffing.
//!
//! Well-known file signatures are checked first; anything else is considered
//! binary when a NUL byte shows up within the scan window.

/// Default number of leading bytes scanned for NUL.
pub const DEFAULT_BINARY_SCAN_LEN: usize = 1024;

/// Signatures that settle the question without a NUL scan.
/// `true` means binary.
const SIGNATURES: &[(&[u8], bool)] = &[
    (b"%!PS-Adobe-", false),
    (b"\x89PNG\r\n\x1a\n", true),
    (b"GIF87a", true),
    (b"GIF89a", true),
    (b"%PDF-", true),
    (b"\x00\x00\xfe\xff", false),
    (b"\xff\xfe\x00\x00", false),
    (b"\xff\xd8\xff", true),
    (b"\xfe\xff", false),
    (b"\xff\xfe", false),
];

/// Returns true if `data` looks like binary (non-text) content.
pub fn is_binary(data: &[u8], scan_len: usize) -> bool {
    for (magic, binary) in SIGNATURES {
        if data.starts_with(magic) {
            return *binary;
        }
    }
    let window = &data[..data.len().min(scan_len)];
    bytecount::count(window, 0) > 0
}
