//! Shared test doubles: an in-memory vault speaking the Key Vault REST
//! shapes, and an interceptor that records what it sees.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use kvpoll::auth::StaticToken;
use kvpoll::errors::{KvPollError, Result};
use kvpoll::http::{HttpRequest, HttpResponse, Interceptor, Method, RequestBody, Transport};
use kvpoll::vault::VaultClient;
use serde_json::json;

pub const BASE: &str = "https://unit.vault.test";
pub const TOKEN: &str = "test-token";

#[derive(Default)]
struct State {
    /// name -> versions, newest last
    secrets: BTreeMap<String, Vec<String>>,
    requests: Vec<HttpRequest>,
    page_size: Option<usize>,
    /// scheme://host[:port] written into `nextLink`; `BASE` when unset
    link_origin: Option<String>,
    network_down: bool,
}

/// In-memory stand-in for one vault.
#[derive(Clone, Default)]
pub struct MemoryVault {
    state: Rc<RefCell<State>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(self, name: &str, value: &str) -> Self {
        self.state
            .borrow_mut()
            .secrets
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    /// Split list responses into pages of `size` entries.
    pub fn paged(self, size: usize) -> Self {
        self.state.borrow_mut().page_size = Some(size);
        self
    }

    /// Write `origin` instead of `BASE` at the front of every `nextLink`.
    pub fn with_link_origin(self, origin: &str) -> Self {
        self.state.borrow_mut().link_origin = Some(origin.to_string());
        self
    }

    pub fn set_network_down(&self, down: bool) {
        self.state.borrow_mut().network_down = down;
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.borrow().requests.len()
    }

    pub fn versions(&self, name: &str) -> usize {
        self.state.borrow().secrets.get(name).map_or(0, Vec::len)
    }

    /// Client authenticated with the token this vault accepts.
    pub fn client(&self) -> VaultClient {
        VaultClient::new(BASE, Box::new(self.clone()), Box::new(StaticToken::new(TOKEN)))
    }

    /// Client presenting `token` instead.
    pub fn client_with_token(&self, token: &str) -> VaultClient {
        VaultClient::new(BASE, Box::new(self.clone()), Box::new(StaticToken::new(token)))
    }
}

fn json_response(status: u16, body: serde_json::Value) -> HttpResponse {
    let mut resp = HttpResponse::new(status, body.to_string());
    resp.headers
        .push(("Content-Type".into(), "application/json; charset=utf-8".into()));
    resp
}

fn error_response(status: u16, code: &str, message: &str) -> HttpResponse {
    json_response(status, json!({"error": {"code": code, "message": message}}))
}

fn bundle(name: &str, value: &str, version: usize) -> serde_json::Value {
    json!({
        "value": value,
        "id": format!("{BASE}/secrets/{name}/v{version}"),
        "attributes": {"enabled": true, "created": 1_700_000_000, "updated": 1_700_000_000 + version}
    })
}

impl Transport for MemoryVault {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut st = self.state.borrow_mut();
        st.requests.push(request.clone());

        if st.network_down {
            return Err(KvPollError::Network("connection refused".into()));
        }

        let expected = format!("Bearer {TOKEN}");
        if request.header_value("Authorization") != Some(expected.as_str()) {
            return Ok(error_response(401, "Unauthorized", "AKV10000: Request is missing a Bearer or PoP token."));
        }

        let rest = request
            .url
            .strip_prefix(BASE)
            .expect("request must target the test vault");
        let rest = rest.strip_prefix(":443").unwrap_or(rest);
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        assert!(query.contains("api-version=7.4"), "missing api-version: {query}");

        if path == "/secrets" && request.method == Method::Get {
            let skip: usize = query
                .split('&')
                .find_map(|kv| kv.strip_prefix("$skiptoken="))
                .map(|v| v.parse().expect("numeric skiptoken"))
                .unwrap_or(0);
            let names: Vec<&String> = st.secrets.keys().collect();
            let take = st.page_size.unwrap_or(names.len().max(1));
            let page: Vec<_> = names
                .iter()
                .skip(skip)
                .take(take)
                .map(|name| {
                    json!({
                        "id": format!("{BASE}/secrets/{name}"),
                        "attributes": {"enabled": true, "created": 1_700_000_000, "updated": 1_700_000_000}
                    })
                })
                .collect();
            let origin = st.link_origin.as_deref().unwrap_or(BASE);
            let next = (skip + take < names.len()).then(|| {
                format!("{origin}/secrets?api-version=7.4&$skiptoken={}", skip + take)
            });
            return Ok(json_response(200, json!({"value": page, "nextLink": next})));
        }

        let name = path
            .strip_prefix("/secrets/")
            .expect("secret path")
            .to_string();

        match request.method {
            Method::Get => match st.secrets.get(&name).and_then(|v| v.last().cloned()) {
                Some(value) => {
                    let version = st.secrets[&name].len();
                    Ok(json_response(200, bundle(&name, &value, version)))
                }
                None => Ok(error_response(
                    404,
                    "SecretNotFound",
                    &format!("A secret with (name/id) {name} was not found in this key vault."),
                )),
            },
            Method::Put => {
                let RequestBody::Json(body) = &request.body else {
                    return Ok(error_response(400, "BadParameter", "body required"));
                };
                let parsed: serde_json::Value = serde_json::from_str(body).expect("json body");
                let value = parsed["value"].as_str().expect("value field").to_string();
                let versions = st.secrets.entry(name.clone()).or_default();
                versions.push(value.clone());
                let version = versions.len();
                Ok(json_response(200, bundle(&name, &value, version)))
            }
            Method::Delete => match st.secrets.remove(&name) {
                Some(_) => Ok(json_response(
                    200,
                    json!({"id": format!("{BASE}/secrets/{name}"), "recoveryId": format!("{BASE}/deletedsecrets/{name}")}),
                )),
                None => Ok(error_response(404, "SecretNotFound", "not found")),
            },
            Method::Post => Ok(error_response(405, "MethodNotAllowed", "")),
        }
    }
}

/// Interceptor that appends `request <METHOD> <url>` / `response <status>`
/// lines to a shared log.
#[derive(Clone, Default)]
pub struct Recorder {
    pub events: Rc<RefCell<Vec<String>>>,
}

impl Interceptor for Recorder {
    fn on_request(&self, request: &HttpRequest) {
        self.events
            .borrow_mut()
            .push(format!("request {} {}", request.method, request.url));
    }

    fn on_response(&self, _request: &HttpRequest, outcome: &Result<HttpResponse>) {
        let line = match outcome {
            Ok(resp) => format!("response {}", resp.status),
            Err(e) => format!("response error: {e}"),
        };
        self.events.borrow_mut().push(line);
    }
}
