//! Fetching remote resources

mod data;
mod memory;
mod transport;

pub use data::*;
pub use memory::*;
pub use transport::*;

use backon::{ExponentialBuilder, Retryable};
use reqwest::StatusCode;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Fetch data using a [`Transport`].
///
/// This is some functionality sitting on top of the transport, allowing for additional options like
/// retries. Only `429 Too Many Requests` and server errors are retried. Any other non-success
/// status fails right away.
#[derive(Clone, Debug)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    retry: RetryOptions,
}

/// Error when retrieving
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Network error fetching {url}: {cause}")]
    Network {
        url: Url,
        #[source]
        cause: TransportError,
    },
    #[error("HTTP status {status} fetching {url}")]
    Status {
        status: StatusCode,
        url: Url,
        /// The response which carried the failing status
        response: Box<ResponseInfo>,
    },
    #[error("Failed to decode response from {url}: {cause}")]
    Deserialization {
        url: Url,
        #[source]
        cause: DataError,
    },
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Whether a request failing with this error should be tried again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }

    /// The response which was received before failing, if any.
    pub fn response(&self) -> Option<&ResponseInfo> {
        match self {
            Self::Status { response, .. } => Some(response),
            _ => None,
        }
    }
}

/// Options for retrying failed requests
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct RetryOptions {
    /// Number of retries after the first attempt.
    pub max_retries: usize,
    /// Factor the delay grows with, per attempt.
    pub base: f32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound for any delay.
    pub max_delay: Duration,
}

impl RetryOptions {
    /// Create a new instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of retries.
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the exponential factor.
    pub fn base(mut self, base: f32) -> Self {
        self.base = base;
        self
    }

    /// Set the initial delay.
    pub fn base_delay(mut self, base_delay: impl Into<Duration>) -> Self {
        self.base_delay = base_delay.into();
        self
    }

    /// Set the maximum delay.
    pub fn max_delay(mut self, max_delay: impl Into<Duration>) -> Self {
        self.max_delay = max_delay.into();
        self
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_factor(self.base)
            .with_min_delay(self.base_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries)
    }
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base: 2.0,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(60000),
        }
    }
}

/// Options for the [`Fetcher`]
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct FetcherOptions {
    pub timeout: Duration,
    pub retry: RetryOptions,
}

impl FetcherOptions {
    /// Create a new instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout.
    pub fn timeout(mut self, timeout: impl Into<Duration>) -> Self {
        self.timeout = timeout.into();
        self
    }

    /// Set the retry options.
    pub fn retry(mut self, retry: RetryOptions) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for FetcherOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry: RetryOptions::default(),
        }
    }
}

/// Data, fetched together with the information about the response.
#[derive(Clone, Debug)]
pub struct Fetched<D> {
    pub response: ResponseInfo,
    pub data: D,
}

impl<D> Fetched<D> {
    pub fn into_data(self) -> D {
        self.data
    }
}

impl Fetcher {
    /// Create a new fetcher, backed by an HTTP client, from options.
    pub fn new(options: FetcherOptions) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(options.timeout)?;
        Ok(Self::with_transport(transport, options.retry))
    }

    /// Create a fetcher providing an existing transport.
    pub fn with_transport(transport: impl Transport + 'static, retry: RetryOptions) -> Self {
        Self {
            transport: Arc::new(transport),
            retry,
        }
    }

    /// Fetch data, using a GET request.
    pub async fn fetch<D: Data>(&self, url: Url) -> Result<Fetched<D>, Error> {
        log::debug!("Fetching: {url}");

        let RawResponse { info, body } = (|| async { self.fetch_once(&url).await })
            .retry(self.retry.backoff())
            .when(Error::is_retryable)
            .notify(|err: &Error, after: Duration| {
                log::info!("Failed to retrieve, retrying in {after:?}: {err}");
            })
            .await?;

        match D::from_body(body) {
            Ok(data) => Ok(Fetched {
                response: info,
                data,
            }),
            Err(cause) => Err(Error::Deserialization {
                url: info.url,
                cause,
            }),
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<RawResponse, Error> {
        let response = self
            .transport
            .get(url)
            .await
            .map_err(|cause| Error::Network {
                url: url.clone(),
                cause,
            })?;

        let status = response.info.status;
        if !status.is_success() {
            return Err(Error::Status {
                status,
                url: url.clone(),
                response: Box::new(response.info),
            });
        }

        Ok(response)
    }
}
