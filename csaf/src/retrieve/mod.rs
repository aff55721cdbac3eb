//! Retrieving providers, aggregators and their documents

mod aggregator;
mod document;
mod provider;

pub use aggregator::*;
pub use document::*;
pub use provider::*;

pub use crate::metadata::{Attempt, ProviderError};

use crate::validation::ValidationError;
use chrono::{DateTime, Utc};
use csaf_retrieval_common::{fetcher, utils::url::Urlify};
use std::fmt::{Display, Formatter};
use url::Url;

/// Options for resolving a provider from its domain.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Continue with the next approach when the `.well-known` metadata fails validation.
    pub fall_through_on_invalid: bool,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fall_through_on_invalid(mut self, fall_through_on_invalid: bool) -> Self {
        self.fall_through_on_invalid = fall_through_on_invalid;
        self
    }
}

/// Options for fetching the documents of a provider.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Number of requests in flight, per stage.
    pub channel_capacity: usize,
    /// Only consider documents changed after this point in time.
    pub starting_from: Option<DateTime<Utc>>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            starting_from: None,
        }
    }
}

impl DocumentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.channel_capacity = channel_capacity;
        self
    }

    pub fn starting_from(mut self, starting_from: impl Into<Option<DateTime<Utc>>>) -> Self {
        self.starting_from = starting_from.into();
        self
    }

    fn concurrency(&self) -> usize {
        self.channel_capacity.max(1)
    }
}

/// The index file of a directory based distribution.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IndexFile {
    /// `index.txt`, listing all documents
    Index,
    /// `changes.csv`, listing documents with their last change
    Changes,
}

impl IndexFile {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Index => "index.txt",
            Self::Changes => "changes.csv",
        }
    }
}

impl Display for IndexFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Loading a document failed.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] fetcher::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A failure while fanning out the documents of a provider.
///
/// A failure only ever affects a single item of the stream.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error(
        "Failed to fetch {file} from directory at {}",
        .directory.as_str().trim_end_matches('/')
    )]
    Index {
        directory: Url,
        file: IndexFile,
        #[source]
        cause: fetcher::Error,
    },
    #[error("Failed to fetch ROLIE feed from {url}")]
    RolieFeed {
        url: Url,
        #[source]
        cause: fetcher::Error,
    },
    #[error("Failed to build document URL from entry {entry:?} of {directory}")]
    DocumentUrl {
        directory: Url,
        entry: String,
        #[source]
        cause: url::ParseError,
    },
    #[error("Failed to load CSAF document from {url}")]
    Document {
        url: Url,
        #[source]
        cause: LoadError,
    },
}

impl Urlify for RetrievalError {
    fn url(&self) -> &Url {
        match self {
            Self::Index { directory, .. } | Self::DocumentUrl { directory, .. } => directory,
            Self::RolieFeed { url, .. } | Self::Document { url, .. } => url,
        }
    }
}
