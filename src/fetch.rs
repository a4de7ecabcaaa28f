//! Fetch-and-persist: download one document URL to one destination path.
//!
//! Idempotent (an existing destination is success without network access),
//! streaming (the body never lives in memory whole), and atomic (bytes go
//! to a `.part` sibling that is renamed into place on completion).

use crate::retry::{ErrorKind, RetryDecision, RetryPolicy, classify_reqwest, classify_status};
use futures::StreamExt;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Error from a fetch-and-persist task
#[derive(Debug)]
pub enum FetchError {
    /// Response carried a non-success status
    Http(u16),
    /// Transport failure (connect, timeout, interrupted body)
    Network(reqwest::Error),
    /// Filesystem failure on the destination side
    Io(std::io::Error),
}

impl FetchError {
    /// Map this error onto the retry policy's classification
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Http(status) => classify_status(*status),
            FetchError::Network(e) => classify_reqwest(e),
            FetchError::Io(_) => ErrorKind::Other,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http(status) => write!(f, "HTTP {}", status),
            FetchError::Network(e) => write!(f, "network error: {}", e),
            FetchError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FetchError::Http(_) => None,
            FetchError::Network(e) => Some(e),
            FetchError::Io(e) => Some(e),
        }
    }
}

/// How a fetch-and-persist task concluded successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Destination already existed; no network call was made
    AlreadyPresent,
    /// Document was downloaded; carries the byte count
    Downloaded(u64),
}

/// Download `url` to `dest`, retrying transient failures per `policy`.
///
/// If `dest` already exists this returns immediately without touching the
/// network. A failed attempt never leaves a partial file at `dest`.
pub async fn fetch_to_path(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    policy: &RetryPolicy,
) -> Result<FetchOutcome, FetchError> {
    if dest.exists() {
        return Ok(FetchOutcome::AlreadyPresent);
    }

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(FetchError::Io)?;
    }

    let part = part_path(dest);
    let mut attempt = 1u32;
    loop {
        match fetch_once(client, url, dest, &part).await {
            Ok(written) => return Ok(FetchOutcome::Downloaded(written)),
            Err(e) => {
                // Clear the partial file so a later attempt (or run) starts clean
                let _ = tokio::fs::remove_file(&part).await;

                match policy.decide(attempt, e.kind()) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(delay) => {
                        ::log::warn!(
                            "attempt {} for {} failed ({}), retrying in {:.1}s",
                            attempt,
                            url,
                            e,
                            delay.as_secs_f64()
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                }
            }
        }
    }
}

/// One GET attempt: stream the body into the `.part` file, then rename
async fn fetch_once(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    part: &Path,
) -> Result<u64, FetchError> {
    let response = client.get(url).send().await.map_err(FetchError::Network)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http(status.as_u16()));
    }

    let mut file = tokio::fs::File::create(part).await.map_err(FetchError::Io)?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(FetchError::Network)?;
        file.write_all(&bytes).await.map_err(FetchError::Io)?;
        written += bytes.len() as u64;
    }

    file.flush().await.map_err(FetchError::Io)?;
    drop(file);

    tokio::fs::rename(part, dest).await.map_err(FetchError::Io)?;
    Ok(written)
}

/// Sibling temp path for in-progress downloads (`foo.pdf` -> `foo.pdf.part`)
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}
