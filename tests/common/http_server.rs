//! Minimal HTTP/1.1 stub server for integration tests.
//!
//! Serves a scripted sequence of responses (the last one repeats) and
//! counts how many requests arrived. Every response carries
//! `Connection: close` so each request shows up as its own connection.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// One scripted HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    /// 200 response with the given body
    pub fn ok(body: Vec<u8>) -> Self {
        Self { status: 200, body }
    }

    /// Empty response with the given status
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }
}

/// Handle to a running stub server
pub struct StubServer {
    /// Base URL, e.g. `http://127.0.0.1:12345/`
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl StubServer {
    /// Number of requests served so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread serving `responses` in order.
/// The server runs until the process exits.
pub fn start(responses: Vec<Response>) -> StubServer {
    assert!(!responses.is_empty(), "need at least one scripted response");

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let responses = Arc::new(responses);

    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let n = server_hits.fetch_add(1, Ordering::SeqCst);
            let responses = Arc::clone(&responses);
            thread::spawn(move || handle(stream, &responses, n));
        }
    });

    StubServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

fn handle(mut stream: std::net::TcpStream, responses: &[Response], n: usize) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    // Drain the request line and headers; content is irrelevant
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }

    let response = responses.get(n).unwrap_or_else(|| {
        responses.last().expect("checked non-empty at start")
    });
    let header = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        reason(response.status),
        response.body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(&response.body);
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}
