/// Default sample: the first 64 KiB of the input.
pub const DEFAULT_SAMPLE_BYTES: usize = 64 * 1024;

/// How much of a file or reader to read before detecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSize {
    /// Sample a specific number of bytes.
    Bytes(usize),
    /// Read the entire input.
    ///
    /// # Warning
    ///
    /// This loads the entire input into memory. For large files (e.g., >100 MB), prefer
    /// [`SampleSize::Bytes`] with a reasonable limit to avoid excessive memory usage.
    All,
}

impl Default for SampleSize {
    fn default() -> Self {
        SampleSize::Bytes(DEFAULT_SAMPLE_BYTES)
    }
}

impl SampleSize {
    /// Returns the number of bytes to sample, or None for All.
    pub fn bytes(&self) -> Option<usize> {
        match self {
            SampleSize::Bytes(n) => Some(*n),
            SampleSize::All => None,
        }
    }
}
