//! Integration tests for the fetch-and-persist task against a local stub
//! HTTP server.

mod common;

use common::http_server::{self, Response};
use examfetch::fetch::{FetchError, FetchOutcome, fetch_to_path};
use examfetch::retry::RetryPolicy;
use std::time::Duration;

/// Retry policy with millisecond backoff so the tests stay fast
fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
    }
}

#[tokio::test]
async fn existing_file_short_circuits_without_network() {
    let server = http_server::start(vec![Response::ok(b"remote copy".to_vec())]);
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("2023_paper.pdf");
    std::fs::write(&dest, b"local copy").unwrap();

    let client = reqwest::Client::new();
    let outcome = fetch_to_path(&client, &server.base_url, &dest, &fast_policy())
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::AlreadyPresent);
    assert_eq!(server.hits(), 0);
    assert_eq!(std::fs::read(&dest).unwrap(), b"local copy");
}

#[tokio::test]
async fn downloads_and_renames_into_place() {
    let body = b"%PDF-1.4 pretend paper".to_vec();
    let server = http_server::start(vec![Response::ok(body.clone())]);
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("Higher").join("2023_paper.pdf");

    let client = reqwest::Client::new();
    let outcome = fetch_to_path(&client, &server.base_url, &dest, &fast_policy())
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Downloaded(body.len() as u64));
    assert_eq!(server.hits(), 1);
    assert_eq!(std::fs::read(&dest).unwrap(), body);

    // No partial file left behind
    let part = dir.path().join("Higher").join("2023_paper.pdf.part");
    assert!(!part.exists());
}

#[tokio::test]
async fn http_503_is_retried_exactly_three_times() {
    let server = http_server::start(vec![Response::status(503)]);
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("paper.pdf");

    let client = reqwest::Client::new();
    let err = fetch_to_path(&client, &server.base_url, &dest, &fast_policy())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Http(503)), "got {:?}", err);
    assert_eq!(server.hits(), 3);
    assert!(!dest.exists());
}

#[tokio::test]
async fn http_404_fails_without_retry() {
    let server = http_server::start(vec![Response::status(404)]);
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("paper.pdf");

    let client = reqwest::Client::new();
    let err = fetch_to_path(&client, &server.base_url, &dest, &fast_policy())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Http(404)), "got {:?}", err);
    assert_eq!(server.hits(), 1);
    assert!(!dest.exists());
}

#[tokio::test]
async fn transient_failure_then_success() {
    let body = b"eventually served".to_vec();
    let server = http_server::start(vec![Response::status(502), Response::ok(body.clone())]);
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("paper.pdf");

    let client = reqwest::Client::new();
    let outcome = fetch_to_path(&client, &server.base_url, &dest, &fast_policy())
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Downloaded(body.len() as u64));
    assert_eq!(server.hits(), 2);
    assert_eq!(std::fs::read(&dest).unwrap(), body);
}

#[tokio::test]
async fn one_present_one_fetched() {
    // Two documents, one already on disk: exactly one network fetch happens
    // and both paths exist with correct content afterwards.
    let body = b"fresh bytes".to_vec();
    let server = http_server::start(vec![Response::ok(body.clone())]);
    let dir = tempfile::tempdir().unwrap();

    let present = dir.path().join("2023_present.pdf");
    std::fs::write(&present, b"old bytes").unwrap();
    let missing = dir.path().join("2023_missing.pdf");

    let client = reqwest::Client::new();
    let policy = fast_policy();

    let first = fetch_to_path(&client, &server.base_url, &present, &policy)
        .await
        .unwrap();
    let second = fetch_to_path(&client, &server.base_url, &missing, &policy)
        .await
        .unwrap();

    assert_eq!(first, FetchOutcome::AlreadyPresent);
    assert!(matches!(second, FetchOutcome::Downloaded(_)));
    assert_eq!(server.hits(), 1);
    assert_eq!(std::fs::read(&present).unwrap(), b"old bytes");
    assert_eq!(std::fs::read(&missing).unwrap(), body);
}
