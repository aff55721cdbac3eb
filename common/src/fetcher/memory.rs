use super::{RawResponse, ResponseInfo, Transport, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::{
    StatusCode,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use url::Url;

#[derive(Clone, Debug)]
enum Route {
    /// Responses handed out in order, the last one is repeated.
    Responses(VecDeque<(StatusCode, Bytes)>),
    Unreachable,
}

#[derive(Debug, Default)]
struct State {
    routes: HashMap<String, Route>,
    hits: HashMap<String, usize>,
}

/// A [`Transport`] serving pre-registered responses from memory.
///
/// Requests to URLs without a route are answered with `404 Not Found`. Cloning shares the routes
/// and the hit counters.
#[derive(Clone, Debug, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<State>>,
    headers: HeaderMap,
}

/// Normalize the key, so that `https://host` and `https://host/` are the same route.
fn key(url: &str) -> String {
    Url::parse(url)
        .map(String::from)
        .unwrap_or_else(|_| url.to_string())
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn route(self, url: &str, route: Route) -> Self {
        self.state.lock().routes.insert(key(url), route);
        self
    }

    /// Serve a sequence of responses, repeating the last one.
    pub fn with_sequence<B: Into<Bytes>>(
        self,
        url: &str,
        responses: impl IntoIterator<Item = (StatusCode, B)>,
    ) -> Self {
        let responses = responses
            .into_iter()
            .map(|(status, body)| (status, body.into()))
            .collect();
        self.route(url, Route::Responses(responses))
    }

    pub fn with_response(self, url: &str, status: StatusCode, body: impl Into<Bytes>) -> Self {
        self.with_sequence(url, [(status, body)])
    }

    pub fn with_text(self, url: &str, text: impl Into<String>) -> Self {
        self.with_response(url, StatusCode::OK, text.into())
    }

    /// Serve a value, serialized as JSON.
    pub fn with_json(self, url: &str, value: &impl Serialize) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        Ok(self.with_response(url, StatusCode::OK, body))
    }

    pub fn with_status(self, url: &str, status: StatusCode) -> Self {
        self.with_response(url, status, Bytes::new())
    }

    /// Fail requests to the URL, as if the host could not be reached.
    pub fn with_unreachable(self, url: &str) -> Self {
        self.route(url, Route::Unreachable)
    }

    /// Pretend to send a header with every request.
    pub fn with_request_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Number of requests seen for the URL.
    pub fn hits(&self, url: &str) -> usize {
        self.state.lock().hits.get(&key(url)).copied().unwrap_or_default()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, TransportError> {
        let (status, body) = {
            let mut state = self.state.lock();
            *state.hits.entry(url.to_string()).or_default() += 1;

            match state.routes.get_mut(url.as_str()) {
                None => (StatusCode::NOT_FOUND, Bytes::new()),
                Some(Route::Unreachable) => {
                    return Err(TransportError::Unreachable(url.to_string()));
                }
                Some(Route::Responses(responses)) => {
                    let next = match responses.len() {
                        0 => None,
                        1 => responses.front().cloned(),
                        _ => responses.pop_front(),
                    };
                    next.unwrap_or((StatusCode::NOT_FOUND, Bytes::new()))
                }
            }
        };

        log::trace!("{url} -> {status}");

        Ok(RawResponse {
            info: ResponseInfo {
                status,
                url: url.clone(),
                request_headers: self.headers.clone(),
            },
            body,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let transport = MemoryTransport::new();
        let response = transport
            .get(&Url::parse("https://example.com/missing").unwrap())
            .await
            .unwrap();

        assert_eq!(response.info.status, StatusCode::NOT_FOUND);
        assert_eq!(transport.hits("https://example.com/missing"), 1);
    }

    #[tokio::test]
    async fn host_only_urls_match() {
        let transport = MemoryTransport::new().with_text("https://csaf.data.security.example.com", "{}");
        let response = transport
            .get(&Url::parse("https://csaf.data.security.example.com").unwrap())
            .await
            .unwrap();

        assert_eq!(response.info.status, StatusCode::OK);
        assert_eq!(response.body, Bytes::from_static(b"{}"));
    }
}
