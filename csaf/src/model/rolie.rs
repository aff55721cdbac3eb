use chrono::{DateTime, Utc};
use url::Url;

/// A ROLIE feed document.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct RolieFeed {
    pub feed: Feed,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Feed {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub link: Vec<Link>,
    #[serde(default)]
    pub category: Vec<Category>,
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Category {
    pub scheme: String,
    pub term: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Entry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub link: Vec<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
    pub updated: DateTime<Utc>,
    pub content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Content {
    pub src: Url,
    #[serde(rename = "type")]
    pub content_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Format {
    pub schema: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Link {
    pub rel: String,
    pub href: Url,
}
