use super::{Publisher, metadata::Role};
use chrono::{DateTime, Utc};
use url::Url;

/// The content of an `aggregator.json` file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct AggregatorMetadata {
    pub aggregator: Aggregator,
    pub aggregator_version: String,
    pub canonical_url: Url,
    #[serde(default)]
    pub csaf_providers: Vec<ListedProvider>,
    #[serde(default)]
    pub csaf_publishers: Vec<ListedProvider>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Aggregator {
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_authority: Option<String>,
    pub name: String,
    pub namespace: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Aggregator,
    Lister,
}

/// A provider, or publisher, listed by an aggregator.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ListedProvider {
    pub metadata: ListedMetadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mirrors: Vec<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_interval: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ListedMetadata {
    pub last_updated: DateTime<Utc>,
    pub publisher: Publisher,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub url: Url,
}
