//! Raw wire dumps for `--debug`.
//!
//! Requests are rendered as an HTTP/1.1 request line, a `Host` header, the
//! request headers, a blank line and the body. Responses get a status line,
//! headers, blank line and body. Dumps go to the `kvpoll::http` tracing
//! target at debug level.

use std::fmt::Write as _;

use ureq::http::Uri;

use super::{HttpRequest, HttpResponse, Interceptor, RequestBody};
use crate::errors::Result;

/// Interceptor that logs every request and response verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct DumpInterceptor;

impl Interceptor for DumpInterceptor {
    fn on_request(&self, request: &HttpRequest) {
        tracing::debug!(target: "kvpoll::http", "request\n{}", dump_request(request));
    }

    fn on_response(&self, request: &HttpRequest, outcome: &Result<HttpResponse>) {
        match outcome {
            Ok(response) => {
                tracing::debug!(target: "kvpoll::http", "response\n{}", dump_response(response))
            }
            Err(e) => tracing::debug!(
                target: "kvpoll::http",
                "no response for {} {}: {e}",
                request.method,
                request.url
            ),
        }
    }
}

/// Render a request the way it goes out on the wire.
pub fn dump_request(request: &HttpRequest) -> String {
    let (host, path) = request_target(&request.url);
    let mut out = String::new();
    let _ = writeln!(out, "{} {} HTTP/1.1", request.method, path);
    if !host.is_empty() {
        let _ = writeln!(out, "Host: {host}");
    }
    for (name, value) in &request.headers {
        let _ = writeln!(out, "{name}: {value}");
    }
    match &request.body {
        RequestBody::Empty => {}
        RequestBody::Json(body) => {
            let _ = writeln!(out, "Content-Length: {}", body.len());
        }
        RequestBody::Form(_) => {
            let _ = writeln!(out, "Content-Type: application/x-www-form-urlencoded");
        }
    }
    out.push('\n');
    match &request.body {
        RequestBody::Empty => {}
        RequestBody::Json(body) => out.push_str(body),
        RequestBody::Form(pairs) => {
            let rendered: Vec<String> = pairs
                .iter()
                .map(|(k, v)| {
                    if k == "client_secret" {
                        format!("{k}=****")
                    } else {
                        format!("{k}={v}")
                    }
                })
                .collect();
            out.push_str(&rendered.join("&"));
        }
    }
    out
}

/// Render a response with its status line, headers and body.
pub fn dump_response(response: &HttpResponse) -> String {
    let reason = ureq::http::StatusCode::from_u16(response.status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("");
    let mut out = String::new();
    let _ = writeln!(out, "HTTP/1.1 {} {}", response.status, reason);
    for (name, value) in &response.headers {
        let _ = writeln!(out, "{name}: {value}");
    }
    out.push('\n');
    out.push_str(&response.body);
    out
}

/// Host header value and origin-form target for `url`.
///
/// `https://host:8443/path?q` gives `("host:8443", "/path?q")`. An
/// unparseable URL is dumped as-is with no host.
fn request_target(url: &str) -> (String, String) {
    let Ok(uri) = url.parse::<Uri>() else {
        return (String::new(), url.to_string());
    };
    let host = uri.authority().map(|a| a.to_string()).unwrap_or_default();
    let path = match uri.path_and_query().map(|p| p.as_str()) {
        Some(p) if p.starts_with('/') => p.to_string(),
        Some(p) if !p.is_empty() => format!("/{p}"),
        _ => "/".to_string(),
    };
    (host, path)
}
