//! Blocking `ureq` implementation of [`Transport`].

use std::time::Duration;

use ureq::Agent;

use super::{HttpRequest, HttpResponse, Method, RequestBody, Transport};
use crate::errors::{KvPollError, Result};

/// Real network transport.
///
/// The agent is configured so error statuses come back as ordinary
/// responses; mapping them to errors is the caller's job.
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Build a transport. `timeout` of `None` keeps ureq's defaults.
    pub fn new(timeout: Option<Duration>) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build();
        Self {
            agent: config.into(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = request.url.as_str();
        let headers = &request.headers;

        let result = match (&request.method, &request.body) {
            (_, RequestBody::Form(pairs)) => with_headers(self.agent.post(url), headers)
                .send_form(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
            (Method::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (Method::Delete, _) => with_headers(self.agent.delete(url), headers).call(),
            (Method::Put, RequestBody::Json(body)) => {
                with_headers(self.agent.put(url), headers).send(body.as_str())
            }
            (Method::Put, RequestBody::Empty) => {
                with_headers(self.agent.put(url), headers).send_empty()
            }
            (Method::Post, RequestBody::Json(body)) => {
                with_headers(self.agent.post(url), headers).send(body.as_str())
            }
            (Method::Post, RequestBody::Empty) => {
                with_headers(self.agent.post(url), headers).send_empty()
            }
        };

        let mut response = result.map_err(|e| KvPollError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| KvPollError::Network(format!("reading response body: {e}")))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
