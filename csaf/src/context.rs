//! Evidence collected while retrieving a document

use crate::model::{
    advisory::Advisory, aggregator::AggregatorMetadata, metadata::ProviderMetadata,
};
use csaf_retrieval_common::fetcher::ResponseInfo;
use std::fmt::{Display, Formatter};
use url::Url;

/// How provider metadata was discovered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DataSource {
    #[default]
    Unset,
    WellKnown,
    SecurityTxt,
    Dns,
}

impl Display for DataSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => f.write_str("direct URL"),
            Self::WellKnown => f.write_str(".well-known"),
            Self::SecurityTxt => f.write_str("security.txt"),
            Self::Dns => f.write_str("DNS"),
        }
    }
}

impl DataSource {
    /// Guess the approach a provider metadata URL belongs to, from its shape.
    ///
    /// URLs which neither follow the `.well-known` nor the DNS convention are [`Self::Unset`].
    pub fn from_url(url: &Url) -> Self {
        if url.path() == "/.well-known/csaf/provider-metadata.json" {
            Self::WellKnown
        } else if url
            .host_str()
            .is_some_and(|host| host.starts_with("csaf.data.security."))
        {
            Self::Dns
        } else {
            Self::Unset
        }
    }
}

/// A parsed document, of any of the kinds requirements can be checked against.
#[derive(Clone, Copy, Debug)]
pub enum Document<'a> {
    Provider(&'a ProviderMetadata),
    Aggregator(&'a AggregatorMetadata),
    Advisory(&'a Advisory),
}

/// The evidence requirements are checked against.
///
/// A context is created for a single fetch, and only borrows what it describes.
#[derive(Clone, Copy, Debug, Default)]
pub struct RetrievalContext<'a> {
    pub document: Option<Document<'a>>,
    pub response: Option<&'a ResponseInfo>,
    pub data_source: DataSource,
}

impl<'a> RetrievalContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, document: impl Into<Document<'a>>) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn with_response(mut self, response: &'a ResponseInfo) -> Self {
        self.response = Some(response);
        self
    }

    pub fn with_data_source(mut self, data_source: DataSource) -> Self {
        self.data_source = data_source;
        self
    }

    pub fn advisory(&self) -> Option<&'a Advisory> {
        match self.document {
            Some(Document::Advisory(advisory)) => Some(advisory),
            _ => None,
        }
    }
}

impl<'a> From<&'a ProviderMetadata> for Document<'a> {
    fn from(value: &'a ProviderMetadata) -> Self {
        Self::Provider(value)
    }
}

impl<'a> From<&'a AggregatorMetadata> for Document<'a> {
    fn from(value: &'a AggregatorMetadata) -> Self {
        Self::Aggregator(value)
    }
}

impl<'a> From<&'a Advisory> for Document<'a> {
    fn from(value: &'a Advisory) -> Self {
        Self::Advisory(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn data_source_from_url() {
        let source = |url: &str| DataSource::from_url(&Url::parse(url).unwrap());

        assert_eq!(
            source("https://example.com/.well-known/csaf/provider-metadata.json"),
            DataSource::WellKnown
        );
        assert_eq!(source("https://csaf.data.security.example.com"), DataSource::Dns);
        assert_eq!(
            source("https://example.com/csaf/provider-metadata.json"),
            DataSource::Unset
        );
    }
}
