use super::{DocumentOptions, LoadError, ProviderError, RetrievedProvider};
use crate::loader::CsafLoader;
use crate::model::aggregator::{AggregatorMetadata, ListedProvider};
use crate::validation::Role;
use csaf_retrieval_common::utils::url::Urlify;
use futures::{StreamExt, stream};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("Failed to load CSAF Aggregator from {url}")]
    Load {
        url: Url,
        #[source]
        cause: LoadError,
    },
    #[error("Invalid aggregator URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Aggregator metadata, which was retrieved and fulfills the requirements of its category.
#[derive(Clone, Debug)]
pub struct RetrievedAggregator {
    pub metadata: AggregatorMetadata,
    pub url: Url,
}

impl Urlify for RetrievedAggregator {
    fn url(&self) -> &Url {
        &self.url
    }
}

impl RetrievedAggregator {
    /// The role, derived from the category of the aggregator.
    pub fn role(&self) -> &'static Role {
        self.metadata.aggregator.category.into()
    }

    /// Load the `aggregator.json` of a domain, from its well-known location.
    pub async fn from_domain(domain: &str, loader: &CsafLoader) -> Result<Self, AggregatorError> {
        let url = Url::parse(&format!(
            "https://{domain}/.well-known/csaf-aggregator/aggregator.json"
        ))?;

        log::debug!("Trying to retrieve aggregator by well-known approach: {url}");

        Self::from_url(url, loader).await
    }

    /// Load aggregator metadata from a URL.
    pub async fn from_url(url: Url, loader: &CsafLoader) -> Result<Self, AggregatorError> {
        let loaded = match loader.fetch_aggregator(&url).await {
            Ok(loaded) => loaded,
            Err(err) => {
                return Err(AggregatorError::Load {
                    url,
                    cause: err.into(),
                });
            }
        };

        let role: &Role = loaded.value.aggregator.category.into();
        if let Err(err) = role.check_role(&loaded.context()).into_result() {
            return Err(AggregatorError::Load {
                url,
                cause: err.into(),
            });
        }

        Ok(Self {
            metadata: loaded.value,
            url,
        })
    }

    /// Load the metadata of all listed providers.
    ///
    /// Results are in the order of the listing. At most `channel_capacity` requests are in
    /// flight.
    pub async fn fetch_providers(
        &self,
        loader: &CsafLoader,
        options: DocumentOptions,
    ) -> Vec<Result<RetrievedProvider, ProviderError>> {
        fetch_listed(&self.metadata.csaf_providers, loader, options).await
    }

    /// Load the metadata of all listed publishers.
    pub async fn fetch_publishers(
        &self,
        loader: &CsafLoader,
        options: DocumentOptions,
    ) -> Vec<Result<RetrievedProvider, ProviderError>> {
        fetch_listed(&self.metadata.csaf_publishers, loader, options).await
    }

    /// Load the metadata of all listed providers, followed by all listed publishers.
    ///
    /// Both lists share the same limit of requests in flight.
    pub async fn fetch_all(
        &self,
        loader: &CsafLoader,
        options: DocumentOptions,
    ) -> Vec<Result<RetrievedProvider, ProviderError>> {
        let listed = self
            .metadata
            .csaf_providers
            .iter()
            .chain(&self.metadata.csaf_publishers);
        fetch_listed(listed, loader, options).await
    }
}

async fn fetch_listed<'a>(
    listed: impl IntoIterator<Item = &'a ListedProvider>,
    loader: &CsafLoader,
    options: DocumentOptions,
) -> Vec<Result<RetrievedProvider, ProviderError>> {
    stream::iter(listed)
        .map(|entry| RetrievedProvider::from_url(entry.metadata.url.clone(), loader))
        .buffered(options.concurrency())
        .collect()
        .await
}
