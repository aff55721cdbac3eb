//! Calculating CVSS scores
//!
//! Supports CVSS v2 ([`v2::CvssV2`]) as well as CVSS v3.0 and v3.1 ([`v3::CvssV3`]). Vectors are
//! parsed into the weights of their metrics, scores are calculated from those.
//!
//! ```rust
//! use csaf_cvss::{Severity, v3::CvssV3};
//!
//! let cvss: CvssV3 = "CVSS:3.1/AV:N/AC:L/PR:N/UI:R/S:C/C:L/I:L/A:N".parse().unwrap();
//! assert_eq!(cvss.base_score(), 6.1);
//! assert_eq!(cvss.base_severity(), Severity::Medium);
//! ```

#![deny(clippy::unwrap_used)]

mod metrics;
pub mod v2;
pub mod v3;

use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid CVSS format or version")]
    InvalidFormat,
    #[error("Value for {0} is missing")]
    MissingValue(String),
    #[error("Metric {0} already defined")]
    DuplicateMetric(String),
    #[error("Required property not present: {0}")]
    MissingProperty(&'static str),
    #[error("Invalid value: {value} in {name}")]
    InvalidValue { value: String, name: &'static str },
}

/// Qualitative severity rating of a score.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn from_score(score: f64) -> Self {
        if score == 0.0 {
            Self::None
        } else if score < 4.0 {
            Self::Low
        } else if score < 7.0 {
            Self::Medium
        } else if score < 9.0 {
            Self::High
        } else {
            Self::Critical
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("NONE"),
            Self::Low => f.write_str("LOW"),
            Self::Medium => f.write_str("MEDIUM"),
            Self::High => f.write_str("HIGH"),
            Self::Critical => f.write_str("CRITICAL"),
        }
    }
}

/// The scores of a vector, with their severity.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize)]
pub struct Scores {
    pub base: f64,
    pub base_severity: Severity,
    pub temporal: f64,
    pub temporal_severity: Severity,
    pub environmental: f64,
    pub environmental_severity: Severity,
}

impl Scores {
    fn new(base: f64, temporal: f64, environmental: f64) -> Self {
        Self {
            base,
            base_severity: Severity::from_score(base),
            temporal,
            temporal_severity: Severity::from_score(temporal),
            environmental,
            environmental_severity: Severity::from_score(environmental),
        }
    }
}

/// Calculate the scores of a vector, of any supported version.
///
/// Vectors starting with `CVSS:` are treated as CVSS v3, all others as CVSS v2.
pub fn scores(vector: &str) -> Result<Scores, Error> {
    if vector.starts_with("CVSS:") {
        Ok(vector.parse::<v3::CvssV3>()?.scores())
    } else {
        Ok(vector.parse::<v2::CvssV2>()?.scores())
    }
}
