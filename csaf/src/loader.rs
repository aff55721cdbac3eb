//! Loading CSAF related documents
//!
//! The loader knows where things are and how they are encoded, but doesn't judge them. Checking
//! requirements is up to the caller, using the context of a [`Loaded`] value.

use crate::context::{Document, RetrievalContext};
use crate::model::{
    advisory::Advisory, aggregator::AggregatorMetadata, metadata::ProviderMetadata,
    rolie::RolieFeed,
};
use csaf_retrieval_common::fetcher::{Error, Fetched, Fetcher, FetcherOptions, Json, ResponseInfo};
use serde::de::DeserializeOwned;
use url::Url;

/// A parsed document, together with the response it was loaded from.
#[derive(Clone, Debug)]
pub struct Loaded<T> {
    pub value: T,
    pub response: ResponseInfo,
}

impl<T> Loaded<T> {
    /// The context to check requirements against.
    pub fn context<'a>(&'a self) -> RetrievalContext<'a>
    where
        &'a T: Into<Document<'a>>,
    {
        RetrievalContext::new()
            .with_document(&self.value)
            .with_response(&self.response)
    }
}

impl<T> From<Fetched<Json<T>>> for Loaded<T>
where
    T: DeserializeOwned,
{
    fn from(value: Fetched<Json<T>>) -> Self {
        Self {
            value: value.data.into_inner(),
            response: value.response,
        }
    }
}

/// Loads CSAF documents using a [`Fetcher`].
#[derive(Clone, Debug)]
pub struct CsafLoader {
    fetcher: Fetcher,
}

impl From<Fetcher> for CsafLoader {
    fn from(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

impl CsafLoader {
    /// Create a new loader, backed by an HTTP client.
    pub fn new(options: FetcherOptions) -> anyhow::Result<Self> {
        Ok(Fetcher::new(options)?.into())
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &Url) -> Result<Loaded<T>, Error> {
        Ok(self.fetcher.fetch::<Json<T>>(url.clone()).await?.into())
    }

    /// Load a `provider-metadata.json`.
    pub async fn fetch_provider(&self, url: &Url) -> Result<Loaded<ProviderMetadata>, Error> {
        self.fetch_json(url).await
    }

    /// Load an `aggregator.json`.
    pub async fn fetch_aggregator(&self, url: &Url) -> Result<Loaded<AggregatorMetadata>, Error> {
        self.fetch_json(url).await
    }

    /// Load a CSAF advisory.
    pub async fn fetch_document(&self, url: &Url) -> Result<Loaded<Advisory>, Error> {
        self.fetch_json(url).await
    }

    /// Load a ROLIE feed.
    pub async fn fetch_rolie_feed(&self, url: &Url) -> Result<RolieFeed, Error> {
        Ok(self
            .fetcher
            .fetch::<Json<RolieFeed>>(url.clone())
            .await?
            .into_data()
            .into_inner())
    }

    /// Load a plain text resource, like an `index.txt`.
    pub async fn fetch_text(&self, url: &Url) -> Result<String, Error> {
        Ok(self.fetcher.fetch::<String>(url.clone()).await?.into_data())
    }

    /// Fetch the `security.txt` of a domain, and extract all CSAF entries.
    ///
    /// The current location (`/.well-known/security.txt`) is tried first, then the legacy one
    /// (`/security.txt`). Entries are returned in the order of the file, without checking them
    /// any further.
    pub async fn fetch_security_txt_csaf_urls(&self, domain: &str) -> Result<Vec<String>, Error> {
        let current = Url::parse(&format!("https://{domain}/.well-known/security.txt"))?;

        let text = match self.fetch_text(&current).await {
            Ok(text) => text,
            Err(err) => {
                log::debug!("Failed to fetch {current}, trying legacy location: {err}");
                let legacy = Url::parse(&format!("https://{domain}/security.txt"))?;
                self.fetch_text(&legacy).await?
            }
        };

        Ok(csaf_entries(&text).map(ToString::to_string).collect())
    }
}

/// Extract the values of all `CSAF: https://…` lines of a `security.txt`.
pub fn csaf_entries(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .filter_map(|line| line.strip_prefix("CSAF: "))
        .filter(|value| value.starts_with("https://"))
}

#[cfg(test)]
mod test {
    use super::*;
    use csaf_retrieval_common::fetcher::{MemoryTransport, RetryOptions};
    use reqwest::StatusCode;

    fn loader(transport: MemoryTransport) -> CsafLoader {
        Fetcher::with_transport(transport, RetryOptions::new().max_retries(0)).into()
    }

    #[test]
    fn security_txt_entries() {
        let text = r#"Contact: mailto:security@example.com
CSAF: https://example.com/first/provider-metadata.json
csaf: https://example.com/lowercase.json
CSAF: http://example.com/insecure.json
# CSAF: https://example.com/comment.json
CSAF: https://example.com/second/provider-metadata.json
Expires: 2030-01-01T00:00:00.000Z
"#;

        assert_eq!(
            csaf_entries(text).collect::<Vec<_>>(),
            vec![
                "https://example.com/first/provider-metadata.json",
                "https://example.com/second/provider-metadata.json",
            ]
        );
    }

    #[tokio::test]
    async fn security_txt_legacy_location() {
        let transport = MemoryTransport::new()
            .with_status(
                "https://example.com/.well-known/security.txt",
                StatusCode::NOT_FOUND,
            )
            .with_text(
                "https://example.com/security.txt",
                "CSAF: https://example.com/provider-metadata.json\r\n",
            );

        let urls = loader(transport)
            .fetch_security_txt_csaf_urls("example.com")
            .await
            .unwrap();

        assert_eq!(urls, vec!["https://example.com/provider-metadata.json"]);
    }

    #[tokio::test]
    async fn security_txt_missing() {
        let err = loader(MemoryTransport::new())
            .fetch_security_txt_csaf_urls("example.com")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn text_and_decode_failure() {
        let url = "https://example.com/feed.txt";
        let transport = MemoryTransport::new().with_text(url, "2024/a.json\n");
        let loader = loader(transport);

        let text = loader.fetch_text(&Url::parse(url).unwrap()).await.unwrap();
        assert_eq!(text, "2024/a.json\n");

        let err = loader
            .fetch_provider(&Url::parse(url).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }
}
