//! The parts of a CSAF advisory which are used during retrieval.
//!
//! Any field not modeled here is ignored when parsing.

use super::{Publisher, TlpLabel};
use chrono::{DateTime, Utc};
use csaf_retrieval_common::utils::hex::Hex;
use sha2::{Digest, Sha256};
use url::Url;

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Advisory {
    pub document: Document,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vulnerabilities: Vec<Vulnerability>,
}

impl Advisory {
    /// An identifier, unique across publishers.
    ///
    /// Tracking IDs are only unique within the namespace of a publisher. The ID combines a
    /// digest of the namespace with the tracking ID.
    pub fn unique_id(&self) -> String {
        let digest = Sha256::digest(self.document.publisher.namespace.as_bytes());
        let digest = Hex(&digest).to_lower();
        format!(
            "CSAF-{}-{}",
            &digest[..8],
            self.document.tracking.id
        )
    }

    pub fn tlp_label(&self) -> Option<TlpLabel> {
        self.document
            .distribution
            .as_ref()
            .and_then(|distribution| distribution.tlp.as_ref())
            .map(|tlp| tlp.label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Document {
    pub category: String,
    pub csaf_version: String,
    pub title: String,
    pub publisher: Publisher,
    pub tracking: Tracking,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Distribution>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Tracking {
    pub id: String,
    pub current_release_date: DateTime<Utc>,
    pub initial_release_date: DateTime<Utc>,
    pub status: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Distribution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tlp: Option<Tlp>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Tlp {
    pub label: TlpLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Vulnerability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cve: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scores: Vec<Score>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Score {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvss_v2: Option<CvssScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvss_v3: Option<CvssScore>,
}

/// A CVSS score, as declared by the publisher.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvssScore {
    pub version: String,
    pub vector_string: String,
    pub base_score: f64,
}
