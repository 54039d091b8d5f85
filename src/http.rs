//! Fetching a bounded sample of a remote resource for detection.

use std::io::Read;
use std::time::Duration;
use thiserror::Error;

use crate::sample::SampleSize;

/// Default timeout for HTTP requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while fetching a sample.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP error {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for HttpError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => HttpError::HttpStatus {
                status: code,
                message: format!("Server returned status {code}"),
            },
            _ => HttpError::Network(err.to_string()),
        }
    }
}

/// Returns true if `input` names an HTTP(S) resource rather than a path.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Fetch the leading bytes of `url` according to `sample`.
///
/// A bounded sample is requested with a Range header; servers that ignore it
/// still only have the first `n` bytes of their response read.
pub fn fetch_sample(url: &str, sample: SampleSize) -> Result<Vec<u8>, HttpError> {
    if !is_url(url) {
        return Err(HttpError::InvalidUrl(format!(
            "URL must start with http:// or https://: {url}"
        )));
    }

    let config = ureq::Agent::config_builder()
        .timeout_global(Some(DEFAULT_TIMEOUT))
        .build();
    let agent = ureq::Agent::new_with_config(config);

    let limit = sample.bytes();
    let request = agent.get(url);
    let response = match limit {
        Some(n) => {
            let range = format!("bytes=0-{}", n.saturating_sub(1));
            match request.header("Range", &range).call() {
                // Range Not Satisfiable: the resource is shorter than the range.
                Err(ureq::Error::StatusCode(416)) => agent.get(url).call()?,
                other => other?,
            }
        }
        None => request.call()?,
    };

    let mut reader = response.into_body().into_reader();
    let mut data = Vec::new();
    match limit {
        Some(n) => {
            data.reserve(n);
            reader.take(n as u64).read_to_end(&mut data)?;
        }
        None => {
            reader.read_to_end(&mut data)?;
        }
    }
    Ok(data)
}
