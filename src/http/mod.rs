//! HTTP layer — a small request/response model, the `Transport` trait the
//! vault client and authenticator talk through, and interception hooks.
//!
//! This module provides:
//! - `HttpRequest` / `HttpResponse` value types
//! - The `Transport` trait and its `ureq`-backed implementation (`transport`)
//! - `Interceptor` hooks and the raw dump interceptor used by `--debug` (`dump`)

pub mod dump;
pub mod transport;

use std::fmt;

use crate::errors::Result;

pub use dump::{dump_request, dump_response, DumpInterceptor};
pub use transport::UreqTransport;

/// HTTP methods the vault and token endpoints need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    /// Serialized JSON document.
    Json(String),
    /// `application/x-www-form-urlencoded` pairs, encoded by the transport.
    Form(Vec<(String, String)>),
}

/// A fully described outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn json(mut self, body: String) -> Self {
        self.body = RequestBody::Json(body);
        self.header("Content-Type", "application/json")
    }

    pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(pairs);
        self
    }

    /// First header matching `name`, case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A received response, body fully read.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Something that can carry one request and bring back its response.
///
/// Non-2xx statuses are returned as responses, not errors; only failures to
/// get any response at all (DNS, TLS, connection reset, timeout) are `Err`.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Observes traffic flowing through an [`Intercepted`] transport.
pub trait Interceptor {
    /// Called before the request is handed to the inner transport.
    fn on_request(&self, request: &HttpRequest);

    /// Called with whatever the inner transport produced.
    fn on_response(&self, request: &HttpRequest, outcome: &Result<HttpResponse>);
}

/// Transport decorator that runs interceptors around every call.
///
/// Interceptors only observe; the request and the outcome pass through
/// untouched.
pub struct Intercepted {
    inner: Box<dyn Transport>,
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl Intercepted {
    pub fn new(inner: Box<dyn Transport>) -> Self {
        Self {
            inner,
            interceptors: Vec::new(),
        }
    }

    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }
}

impl Transport for Intercepted {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        for i in &self.interceptors {
            i.on_request(request);
        }
        let outcome = self.inner.send(request);
        for i in &self.interceptors {
            i.on_response(request, &outcome);
        }
        outcome
    }
}
