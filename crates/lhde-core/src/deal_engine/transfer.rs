//! One blocking GET via curl's easy interface.
//!
//! The easy handle lives only for the duration of `get`, so the connection is
//! released on every return path, including body read failures.

use std::str;
use std::time::Duration;

use url::Url;

use super::error::DealError;

/// Timeouts applied to a single request.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Timeouts {
    pub connect: Duration,
    /// Whole-transfer limit; `None` leaves the request unbounded.
    pub total: Option<Duration>,
}

/// Status, headers of interest, and full body of the final response.
#[derive(Debug)]
pub(crate) struct HttpReply {
    pub code: u32,
    pub reason: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Header lines of the response currently being received. Reset on every
/// status line so redirects and `100 Continue` don't leak into the final reply.
#[derive(Debug, Default)]
struct HeaderBlock {
    status_line: Option<String>,
    lines: Vec<String>,
    /// Blank line seen for a final (non-1xx, non-3xx) response.
    complete: bool,
}

impl HeaderBlock {
    fn push(&mut self, line: &str) {
        if line.starts_with("HTTP/") {
            self.status_line = Some(line.to_string());
            self.lines.clear();
            self.complete = false;
            return;
        }
        if line.is_empty() {
            let code = self.status_line.as_deref().map(parse_status_line).map(|(c, _)| c);
            self.complete = matches!(code, Some(c) if !(100..200).contains(&c) && !(300..400).contains(&c));
            return;
        }
        self.lines.push(line.to_string());
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.lines.iter().rev().find_map(|line| {
            let (k, v) = line.split_once(':')?;
            k.trim().eq_ignore_ascii_case(name).then(|| v.trim())
        })
    }
}

/// Splits `HTTP/1.1 404 Not Found` into `(404, "Not Found")`. HTTP/2 status
/// lines carry no reason phrase.
fn parse_status_line(line: &str) -> (u32, String) {
    let mut parts = line.trim().splitn(3, ' ');
    let _version = parts.next();
    let code = parts
        .next()
        .and_then(|c| c.trim().parse::<u32>().ok())
        .unwrap_or(0);
    let reason = parts.next().unwrap_or("").trim().to_string();
    (code, reason)
}

/// Body-read only if the origin's final headers arrived and the error is not
/// one curl raises while connecting (DNS, TCP, proxy, TLS).
fn classify_failure(e: curl::Error, final_headers: bool, response_code: u32) -> DealError {
    let connect_phase = e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_couldnt_connect()
        || e.is_ssl_connect_error()
        || e.is_peer_failed_verification();
    if final_headers && response_code != 0 && !connect_phase {
        DealError::BodyRead(e)
    } else {
        DealError::Transport(e)
    }
}

fn configure(
    easy: &mut curl::easy::Easy,
    url: &Url,
    headers: &[(&str, String)],
    timeouts: Timeouts,
) -> Result<(), curl::Error> {
    easy.url(url.as_str())?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(timeouts.connect)?;
    if let Some(total) = timeouts.total {
        easy.timeout(total)?;
    }

    // Values go out verbatim: the bearer token is opaque.
    let mut list = curl::easy::List::new();
    for (k, v) in headers {
        list.append(&format!("{}: {}", k.trim(), v))?;
    }
    if !headers.is_empty() {
        easy.http_headers(list)?;
    }
    Ok(())
}

/// Sends a GET and reads the whole response. Any status is returned as-is;
/// status policy belongs to the caller.
pub(crate) fn get(
    url: &Url,
    headers: &[(&str, String)],
    timeouts: Timeouts,
) -> Result<HttpReply, DealError> {
    let mut easy = curl::easy::Easy::new();
    configure(&mut easy, url, headers, timeouts).map_err(DealError::Request)?;

    let mut block = HeaderBlock::default();
    let mut body: Vec<u8> = Vec::new();

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    block.push(s.trim_end());
                }
                true
            })
            .map_err(DealError::Request)?;
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(DealError::Request)?;
        transfer.perform()
    };

    if let Err(e) = performed {
        // A proxy CONNECT reply is not the origin's response; curl keeps the
        // response code at 0 until the real status line arrives.
        let code = easy.response_code().unwrap_or(0);
        return Err(classify_failure(e, block.complete, code));
    }

    let code = easy.response_code().map_err(DealError::Transport)?;
    let reason = block
        .status_line
        .as_deref()
        .map(parse_status_line)
        .map(|(_, reason)| reason)
        .unwrap_or_default();

    Ok(HttpReply {
        code,
        reason,
        content_type: block.get("content-type").map(str::to_string),
        body,
    })
}
