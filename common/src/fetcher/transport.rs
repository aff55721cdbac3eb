use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, ClientBuilder, StatusCode, header::HeaderMap};
use std::fmt::Debug;
use std::time::Duration;
use url::Url;

/// Information about a received response, and the request that caused it.
#[derive(Clone, Debug)]
pub struct ResponseInfo {
    pub status: StatusCode,
    /// The final URL of the request, after following redirects.
    pub url: Url,
    /// The headers sent with the request.
    pub request_headers: HeaderMap,
}

/// A response, as received from a [`Transport`].
#[derive(Clone, Debug)]
pub struct RawResponse {
    pub info: ResponseInfo,
    pub body: Bytes,
}

/// Failure to exchange a request with the remote side.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("unreachable: {0}")]
    Unreachable(String),
}

/// Perform a single GET request.
///
/// A transport only fails if no response could be received. A response with a non-success
/// status is still a response.
#[async_trait]
pub trait Transport: Debug + Send + Sync {
    async fn get(&self, url: &Url) -> Result<RawResponse, TransportError>;
}

/// A [`Transport`] performing actual HTTP requests.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl From<Client> for ReqwestTransport {
    fn from(client: Client) -> Self {
        Self { client }
    }
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: ClientBuilder::new().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, TransportError> {
        let request = self.client.get(url.clone()).build()?;
        let request_headers = request.headers().clone();

        let response = self.client.execute(request).await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await?;

        Ok(RawResponse {
            info: ResponseInfo {
                status,
                url,
                request_headers,
            },
            body,
        })
    }
}
