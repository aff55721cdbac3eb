//! CVSS v2

use crate::{Error, Scores, Severity, metrics};
use std::str::FromStr;

const ACCESS_VECTOR: &[(&str, f64)] = &[("L", 0.395), ("A", 0.646), ("N", 1.0)];
const ACCESS_COMPLEXITY: &[(&str, f64)] = &[("H", 0.35), ("M", 0.61), ("L", 0.71)];
const AUTHENTICATION: &[(&str, f64)] = &[("M", 0.45), ("S", 0.56), ("N", 0.704)];
const IMPACT: &[(&str, f64)] = &[("N", 0.0), ("P", 0.275), ("C", 0.660)];
const EXPLOITABILITY: &[(&str, f64)] =
    &[("U", 0.85), ("POC", 0.9), ("F", 0.95), ("H", 1.0), ("ND", 1.0)];
const REMEDIATION_LEVEL: &[(&str, f64)] =
    &[("OF", 0.87), ("TF", 0.90), ("W", 0.95), ("U", 1.0), ("ND", 1.0)];
const REPORT_CONFIDENCE: &[(&str, f64)] = &[("UC", 0.90), ("UR", 0.95), ("C", 1.0), ("ND", 1.0)];
const COLLATERAL_DAMAGE_POTENTIAL: &[(&str, f64)] = &[
    ("N", 0.0),
    ("L", 0.1),
    ("LM", 0.3),
    ("MH", 0.4),
    ("H", 0.5),
    ("ND", 0.0),
];
const TARGET_DISTRIBUTION: &[(&str, f64)] =
    &[("N", 0.0), ("L", 0.25), ("M", 0.75), ("H", 1.0), ("ND", 1.0)];
const REQUIREMENT: &[(&str, f64)] = &[("L", 0.5), ("M", 1.0), ("H", 1.51), ("ND", 1.0)];

/// The weights of a CVSS v2 vector.
#[derive(Clone, Debug, PartialEq)]
pub struct CvssV2 {
    // base
    pub access_vector: f64,
    pub access_complexity: f64,
    pub authentication: f64,
    pub confidentiality_impact: f64,
    pub integrity_impact: f64,
    pub availability_impact: f64,

    // temporal
    pub exploitability: f64,
    pub remediation_level: f64,
    pub report_confidence: f64,

    // environmental
    pub collateral_damage_potential: f64,
    pub target_distribution: f64,
    pub confidentiality_requirement: f64,
    pub integrity_requirement: f64,
    pub availability_requirement: f64,
}

impl FromStr for CvssV2 {
    type Err = Error;

    fn from_str(vector: &str) -> Result<Self, Self::Err> {
        let metrics = metrics::parse(vector, None)?;
        let optional = |key: &str, name: &'static str, weights: &[(&str, f64)]| {
            metrics.optional(key, name, "ND", weights)
        };

        Ok(Self {
            access_vector: metrics.required("AV", "access_vector", ACCESS_VECTOR)?,
            access_complexity: metrics.required("AC", "access_complexity", ACCESS_COMPLEXITY)?,
            authentication: metrics.required("Au", "authentication", AUTHENTICATION)?,
            confidentiality_impact: metrics.required("C", "confidentiality_impact", IMPACT)?,
            integrity_impact: metrics.required("I", "integrity_impact", IMPACT)?,
            availability_impact: metrics.required("A", "availability_impact", IMPACT)?,
            exploitability: optional("E", "exploitability", EXPLOITABILITY)?,
            remediation_level: optional("RL", "remediation_level", REMEDIATION_LEVEL)?,
            report_confidence: optional("RC", "report_confidence", REPORT_CONFIDENCE)?,
            collateral_damage_potential: optional(
                "CDP",
                "collateral_damage_potential",
                COLLATERAL_DAMAGE_POTENTIAL,
            )?,
            target_distribution: optional("TD", "target_distribution", TARGET_DISTRIBUTION)?,
            confidentiality_requirement: optional(
                "CR",
                "confidentiality_requirement",
                REQUIREMENT,
            )?,
            integrity_requirement: optional("IR", "integrity_requirement", REQUIREMENT)?,
            availability_requirement: optional("AR", "availability_requirement", REQUIREMENT)?,
        })
    }
}

fn round_to_1_decimal(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}

impl CvssV2 {
    fn base_score_for_impact(&self, impact: f64) -> f64 {
        let exploitability =
            20.0 * self.access_vector * self.access_complexity * self.authentication;
        let f_impact = if impact == 0.0 { 0.0 } else { 1.176 };

        round_to_1_decimal(((0.6 * impact) + (0.4 * exploitability) - 1.5) * f_impact)
    }

    fn temporal_for_base(&self, base: f64) -> f64 {
        round_to_1_decimal(
            base * self.exploitability * self.remediation_level * self.report_confidence,
        )
    }

    pub fn base_score(&self) -> f64 {
        let impact = 10.41
            * (1.0
                - (1.0 - self.confidentiality_impact)
                    * (1.0 - self.integrity_impact)
                    * (1.0 - self.availability_impact));

        self.base_score_for_impact(impact)
    }

    pub fn temporal_score(&self) -> f64 {
        self.temporal_for_base(self.base_score())
    }

    pub fn environmental_score(&self) -> f64 {
        let adjusted_impact = (10.41
            * (1.0
                - (1.0 - self.confidentiality_impact * self.confidentiality_requirement)
                    * (1.0 - self.integrity_impact * self.integrity_requirement)
                    * (1.0 - self.availability_impact * self.availability_requirement)))
            .min(10.0);

        let adjusted_temporal = self.temporal_for_base(self.base_score_for_impact(adjusted_impact));

        round_to_1_decimal(
            (adjusted_temporal + (10.0 - adjusted_temporal) * self.collateral_damage_potential)
                * self.target_distribution,
        )
    }

    pub fn base_severity(&self) -> Severity {
        Severity::from_score(self.base_score())
    }

    pub fn temporal_severity(&self) -> Severity {
        Severity::from_score(self.temporal_score())
    }

    pub fn environmental_severity(&self) -> Severity {
        Severity::from_score(self.environmental_score())
    }

    pub fn scores(&self) -> Scores {
        Scores::new(
            self.base_score(),
            self.temporal_score(),
            self.environmental_score(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const VECTOR: &str = "AV:N/AC:M/Au:N/C:C/I:C/A:N/E:POC/RL:W/RC:C/CDP:N/TD:M/CR:ND/IR:ND/AR:ND";

    #[test]
    fn scores() {
        let cvss: CvssV2 = VECTOR.parse().unwrap();

        assert_eq!(cvss.base_score(), 8.8);
        assert_eq!(cvss.base_severity(), Severity::High);
        assert_eq!(cvss.temporal_score(), 7.5);
        assert_eq!(cvss.temporal_severity(), Severity::High);
        assert_eq!(cvss.environmental_score(), 5.6);
        assert_eq!(cvss.environmental_severity(), Severity::Medium);
    }

    #[test]
    fn no_impact() {
        let cvss: CvssV2 = "AV:N/AC:M/Au:N/C:N/I:N/A:N/E:POC/RL:W/RC:C/CDP:N/TD:M"
            .parse()
            .unwrap();
        assert_eq!(cvss.base_score(), 0.0);
        assert_eq!(cvss.base_severity(), Severity::None);
    }

    #[test]
    fn base_only() {
        // temporal and environmental metrics are not defined
        let cvss: CvssV2 = "AV:N/AC:L/Au:N/C:P/I:P/A:P".parse().unwrap();
        assert_eq!(cvss.base_score(), 7.5);
        assert_eq!(cvss.temporal_score(), 7.5);
        assert_eq!(cvss.environmental_score(), 7.5);
    }

    #[test]
    fn security_requirements() {
        let cvss: CvssV2 = "AV:N/AC:L/Au:N/C:P/I:N/A:N/IR:H/AR:L".parse().unwrap();
        assert_eq!(cvss.integrity_requirement, 1.51);
        assert_eq!(cvss.availability_requirement, 0.5);
        assert_eq!(cvss.confidentiality_requirement, 1.0);
    }

    #[test]
    fn invalid() {
        assert_eq!(
            "AV:N/AC:L".parse::<CvssV2>().unwrap_err().to_string(),
            "Required property not present: authentication"
        );
        assert_eq!(
            "AV:N/AC:L/Au:N/C:P/I:P/A:P/E:X"
                .parse::<CvssV2>()
                .unwrap_err()
                .to_string(),
            "Invalid value: X in exploitability"
        );
    }
}
