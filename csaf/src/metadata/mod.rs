//! Discovery of provider metadata
//!
//! Follows "7.3.1 Finding provider-metadata.json" of the CSAF standard, see:
//! <https://docs.oasis-open.org/csaf/csaf/v2.0/os/csaf-v2.0-os.html#731-finding-provider-metadatajson>

use crate::context::DataSource;
use crate::loader::CsafLoader;
use crate::retrieve::{ResolveOptions, RetrievedProvider};
use crate::validation::ValidationError;
use csaf_retrieval_common::fetcher;
use std::fmt::{Display, Formatter};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Failed to fetch provider metadata: {0}")]
    Fetch(#[from] fetcher::Error),
    #[error("Provider metadata from {url} does not fulfill the requirements of its role")]
    Validation {
        url: Url,
        #[source]
        cause: ValidationError,
    },
    #[error("No usable CSAF entry in security.txt")]
    NoSecurityTxtEntry {
        /// The entries which were tried, with their failure
        failures: Vec<String>,
    },
    #[error(
        "Failed to resolve provider for {domain} via .well-known, security.txt or DNS.{}",
        list_attempts(.attempts)
    )]
    Exhausted {
        domain: String,
        attempts: Vec<Attempt>,
        #[source]
        last: Box<ProviderError>,
    },
}

impl From<url::ParseError> for ProviderError {
    fn from(value: url::ParseError) -> Self {
        Self::Fetch(value.into())
    }
}

/// A failed discovery approach.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attempt {
    pub data_source: DataSource,
    pub error: String,
}

impl Display for Attempt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "- {}: {}", self.data_source, self.error)
    }
}

fn list_attempts(attempts: &[Attempt]) -> String {
    attempts
        .iter()
        .map(|attempt| format!("\n{attempt}"))
        .collect()
}

/// Implements the CSAF metadata discovery process for a domain.
#[derive(Clone, Debug)]
pub struct MetadataRetriever {
    pub domain: String,
}

impl MetadataRetriever {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    /// Retrieve provider metadata through the full well-known URL.
    pub async fn approach_well_known(
        &self,
        loader: &CsafLoader,
    ) -> Result<RetrievedProvider, ProviderError> {
        let url = Url::parse(&format!(
            "https://{}/.well-known/csaf/provider-metadata.json",
            self.domain,
        ))?;

        log::debug!("Trying to retrieve by well-known approach: {url}");

        RetrievedProvider::load(url, loader, DataSource::WellKnown).await
    }

    /// Retrieve provider metadata through the CSAF entries of the domain's security.txt.
    ///
    /// Entries are tried in order, the first one which loads and validates wins.
    pub async fn approach_security_txt(
        &self,
        loader: &CsafLoader,
    ) -> Result<RetrievedProvider, ProviderError> {
        log::debug!("Trying to retrieve by security.txt approach: {}", self.domain);

        let entries = loader.fetch_security_txt_csaf_urls(&self.domain).await?;
        let mut failures = Vec::with_capacity(entries.len());

        for entry in entries {
            let result = match Url::parse(&entry) {
                Ok(url) => RetrievedProvider::load(url, loader, DataSource::SecurityTxt).await,
                Err(err) => Err(err.into()),
            };

            match result {
                Ok(provider) => return Ok(provider),
                Err(err) => {
                    log::info!("Skipping security.txt entry {entry}: {err}");
                    failures.push(format!("{entry}: {err}"));
                }
            }
        }

        Err(ProviderError::NoSecurityTxtEntry { failures })
    }

    /// Retrieve provider metadata through the DNS path of the domain.
    pub async fn approach_dns(
        &self,
        loader: &CsafLoader,
    ) -> Result<RetrievedProvider, ProviderError> {
        let url = Url::parse(&format!("https://csaf.data.security.{}", self.domain))?;

        log::debug!("Trying to retrieve by DNS approach: {url}");

        RetrievedProvider::load(url, loader, DataSource::Dns).await
    }

    /// Run all approaches, in order, until one succeeds.
    pub async fn retrieve(
        &self,
        loader: &CsafLoader,
        options: &ResolveOptions,
    ) -> Result<RetrievedProvider, ProviderError> {
        let mut attempts = Vec::new();

        match self.approach_well_known(loader).await {
            Ok(provider) => return Ok(provider),
            Err(err) if aborts(&err, options) => return Err(err),
            Err(err) => self.failed(DataSource::WellKnown, &err, &mut attempts),
        }

        match self.approach_security_txt(loader).await {
            Ok(provider) => return Ok(provider),
            Err(err) => self.failed(DataSource::SecurityTxt, &err, &mut attempts),
        }

        match self.approach_dns(loader).await {
            Ok(provider) => Ok(provider),
            Err(err) => {
                self.failed(DataSource::Dns, &err, &mut attempts);
                Err(ProviderError::Exhausted {
                    domain: self.domain.clone(),
                    attempts,
                    last: Box::new(err),
                })
            }
        }
    }

    fn failed(&self, data_source: DataSource, err: &ProviderError, attempts: &mut Vec<Attempt>) {
        log::info!(
            "Failed to resolve provider for {} via {data_source}: {err}",
            self.domain
        );
        attempts.push(Attempt {
            data_source,
            error: err.to_string(),
        });
    }
}

/// A `.well-known` document which doesn't fulfill its own role ends the discovery.
fn aborts(err: &ProviderError, options: &ResolveOptions) -> bool {
    matches!(err, ProviderError::Validation { .. }) && !options.fall_through_on_invalid
}
