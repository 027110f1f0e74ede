//! Minimal HTTP/1.1 server standing in for the Deal Engine in integration tests.
//!
//! Records every request (request line and headers) and answers with canned
//! responses in order; the last response repeats once the list is exhausted.
//! One connection at a time, always `Connection: close`.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CannedResponse {
    /// Status line tail, e.g. "200 OK".
    pub status: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    /// Advertise more bytes than are sent, then close (body read failure).
    pub truncate: bool,
    /// Hold the connection open this long before answering.
    pub stall: Option<Duration>,
}

impl CannedResponse {
    pub fn new(status: &str, content_type: Option<&str>, body: &str) -> Self {
        Self {
            status: status.to_string(),
            content_type: content_type.map(str::to_string),
            body: body.as_bytes().to_vec(),
            truncate: false,
            stall: None,
        }
    }

    pub fn json(body: &str) -> Self {
        Self::new("200 OK", Some("application/json"), body)
    }

    pub fn text(body: &str) -> Self {
        Self::new("200 OK", Some("text/plain"), body)
    }

    pub fn truncated(mut self) -> Self {
        self.truncate = true;
        self
    }

    pub fn stalled(mut self, d: Duration) -> Self {
        self.stall = Some(d);
        self
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// e.g. "GET /api/v1/deal/add_cid?cid=abc HTTP/1.1"
    pub request_line: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn method(&self) -> &str {
        self.request_line.split_whitespace().next().unwrap_or("")
    }

    pub fn target(&self) -> &str {
        self.request_line.split_whitespace().nth(1).unwrap_or("")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub struct DealServer {
    /// e.g. "http://127.0.0.1:12345"
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl DealServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts the server in a background thread. Runs until the process exits.
pub fn start(responses: Vec<CannedResponse>) -> DealServer {
    assert!(!responses.is_empty(), "need at least one canned response");
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    thread::spawn(move || {
        let mut served = 0usize;
        for stream in listener.incoming().flatten() {
            let idx = served.min(responses.len() - 1);
            if handle(stream, &responses[idx], &recorded) {
                served += 1;
            }
        }
    });
    DealServer {
        base_url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

/// Returns true if a request was read and answered.
fn handle(
    mut stream: TcpStream,
    response: &CannedResponse,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> bool {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return false,
            Ok(n) => raw.extend_from_slice(&buf[..n]),
        }
    }
    let text = String::from_utf8_lossy(&raw);
    let mut lines = text.split("\r\n");
    let request_line = lines.next().unwrap_or("").to_string();
    let headers = lines
        .take_while(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        // Only the OWS after the colon is dropped; trailing bytes are kept.
        .map(|(k, v)| (k.trim().to_string(), v.trim_start().to_string()))
        .collect();
    recorded.lock().unwrap().push(RecordedRequest {
        request_line,
        headers,
    });

    if let Some(d) = response.stall {
        thread::sleep(d);
    }

    let advertised = if response.truncate {
        response.body.len() + 100
    } else {
        response.body.len()
    };
    let content_type = response
        .content_type
        .as_deref()
        .map(|ct| format!("Content-Type: {}\r\n", ct))
        .unwrap_or_default();
    let head = format!(
        "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n",
        response.status, content_type, advertised
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&response.body);
    let _ = stream.flush();
    true
}
