//! CVSS v3.0 and v3.1

use crate::{Error, Scores, Severity, metrics};
use std::str::FromStr;

/// Minor version of CVSS v3.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Version {
    #[default]
    V3_0,
    V3_1,
}

const SCOPE: &[(&str, f64)] = &[("C", 1.0), ("U", 0.0)];
const IMPACT: &[(&str, f64)] = &[("H", 0.56), ("L", 0.22), ("N", 0.0)];
const ATTACK_VECTOR: &[(&str, f64)] = &[("N", 0.85), ("A", 0.62), ("L", 0.55), ("P", 0.2)];
const ATTACK_COMPLEXITY: &[(&str, f64)] = &[("L", 0.77), ("H", 0.44)];
const PRIVILEGES_REQUIRED: &[(&str, f64)] = &[("N", 0.85), ("L", 0.62), ("H", 0.27)];
const PRIVILEGES_REQUIRED_CHANGED: &[(&str, f64)] = &[("N", 0.85), ("L", 0.68), ("H", 0.5)];
const USER_INTERACTION: &[(&str, f64)] = &[("N", 0.85), ("R", 0.62)];
const EXPLOIT_CODE_MATURITY: &[(&str, f64)] =
    &[("X", 1.0), ("H", 1.0), ("F", 0.97), ("P", 0.94), ("U", 0.91)];
const REMEDIATION_LEVEL: &[(&str, f64)] =
    &[("X", 1.0), ("U", 1.0), ("W", 0.97), ("T", 0.96), ("O", 0.95)];
const REPORT_CONFIDENCE: &[(&str, f64)] = &[("X", 1.0), ("C", 1.0), ("R", 0.96), ("U", 0.92)];
const REQUIREMENT: &[(&str, f64)] = &[("X", 1.0), ("H", 1.5), ("M", 1.0), ("L", 0.5)];

/// The weights of a CVSS v3 vector.
#[derive(Clone, Debug, PartialEq)]
pub struct CvssV3 {
    pub version: Version,

    // base
    pub scope_changed: bool,
    pub confidentiality_impact: f64,
    pub integrity_impact: f64,
    pub availability_impact: f64,
    pub attack_vector: f64,
    pub attack_complexity: f64,
    pub privileges_required: f64,
    pub user_interaction: f64,

    // temporal
    pub exploit_code_maturity: f64,
    pub remediation_level: f64,
    pub report_confidence: f64,

    // environmental
    pub confidentiality_requirement: f64,
    pub integrity_requirement: f64,
    pub availability_requirement: f64,
    pub modified_scope_changed: bool,
    pub modified_attack_vector: f64,
    pub modified_attack_complexity: f64,
    pub modified_privileges_required: f64,
    pub modified_user_interaction: f64,
    pub modified_confidentiality_impact: f64,
    pub modified_integrity_impact: f64,
    pub modified_availability_impact: f64,
}

impl FromStr for CvssV3 {
    type Err = Error;

    fn from_str(vector: &str) -> Result<Self, Self::Err> {
        let metrics = metrics::parse(vector, Some(&["3.0", "3.1"]))?;
        let version = match metrics.get("CVSS") {
            Some("3.1") => Version::V3_1,
            _ => Version::V3_0,
        };
        Self::from_metrics(version, &metrics)
    }
}

impl CvssV3 {
    /// Evaluate metrics, in the order of the standard's metric groups.
    ///
    /// Modified metrics which are not defined take the weight of their base metric.
    fn from_metrics(version: Version, metrics: &metrics::Metrics) -> Result<Self, Error> {
        let scope_changed = metrics.required("S", "scope", SCOPE)? == 1.0;
        let confidentiality_impact = metrics.required("C", "confidentiality_impact", IMPACT)?;
        let integrity_impact = metrics.required("I", "integrity_impact", IMPACT)?;
        let availability_impact = metrics.required("A", "availability_impact", IMPACT)?;
        let attack_vector = metrics.required("AV", "attack_vector", ATTACK_VECTOR)?;
        let attack_complexity =
            metrics.required("AC", "attack_complexity", ATTACK_COMPLEXITY)?;
        let privileges_required = metrics.required(
            "PR",
            "privileges_required",
            privileges(scope_changed),
        )?;
        let user_interaction = metrics.required("UI", "user_interaction", USER_INTERACTION)?;

        let exploit_code_maturity =
            metrics.optional("E", "exploit_code_maturity", "X", EXPLOIT_CODE_MATURITY)?;
        let remediation_level =
            metrics.optional("RL", "remediation_level", "X", REMEDIATION_LEVEL)?;
        let report_confidence =
            metrics.optional("RC", "report_confidence", "X", REPORT_CONFIDENCE)?;

        let confidentiality_requirement =
            metrics.optional("CR", "confidentiality_requirement", "X", REQUIREMENT)?;
        let integrity_requirement =
            metrics.optional("IR", "integrity_requirement", "X", REQUIREMENT)?;
        let availability_requirement =
            metrics.optional("AR", "availability_requirement", "X", REQUIREMENT)?;

        let modified_scope_changed = match metrics.get("MS") {
            None | Some("X") => scope_changed,
            Some(_) => metrics.required("MS", "modified_scope", SCOPE)? == 1.0,
        };

        let modified = |key: &str, name: &'static str, weights: &[(&str, f64)], base: f64| {
            match metrics.get(key) {
                None | Some("X") => Ok(base),
                Some(_) => metrics.required(key, name, weights),
            }
        };

        Ok(Self {
            version,
            scope_changed,
            confidentiality_impact,
            integrity_impact,
            availability_impact,
            attack_vector,
            attack_complexity,
            privileges_required,
            user_interaction,
            exploit_code_maturity,
            remediation_level,
            report_confidence,
            confidentiality_requirement,
            integrity_requirement,
            availability_requirement,
            modified_scope_changed,
            modified_attack_vector: modified(
                "MAV",
                "modified_attack_vector",
                ATTACK_VECTOR,
                attack_vector,
            )?,
            modified_attack_complexity: modified(
                "MAC",
                "modified_attack_complexity",
                ATTACK_COMPLEXITY,
                attack_complexity,
            )?,
            modified_privileges_required: modified(
                "MPR",
                "modified_privileges_required",
                privileges(modified_scope_changed),
                privileges_required,
            )?,
            modified_user_interaction: modified(
                "MUI",
                "modified_user_interaction",
                USER_INTERACTION,
                user_interaction,
            )?,
            modified_confidentiality_impact: modified(
                "MC",
                "modified_confidentiality_impact",
                IMPACT,
                confidentiality_impact,
            )?,
            modified_integrity_impact: modified(
                "MI",
                "modified_integrity_impact",
                IMPACT,
                integrity_impact,
            )?,
            modified_availability_impact: modified(
                "MA",
                "modified_availability_impact",
                IMPACT,
                availability_impact,
            )?,
        })
    }

    /// Round up to one decimal.
    ///
    /// CVSS v3.1 avoids floating point artifacts, as described in appendix A of its
    /// specification. CVSS v3.0 doesn't.
    fn round_up(&self, x: f64) -> f64 {
        match self.version {
            Version::V3_1 => {
                let int_input = (x * 100_000.0).round() as i64;
                if int_input % 10_000 == 0 {
                    int_input as f64 / 100_000.0
                } else {
                    ((int_input / 10_000) as f64 + 1.0) / 10.0
                }
            }
            Version::V3_0 => (x * 10.0).ceil() / 10.0,
        }
    }

    fn impact(&self) -> f64 {
        let isc_base = 1.0
            - ((1.0 - self.confidentiality_impact)
                * (1.0 - self.integrity_impact)
                * (1.0 - self.availability_impact));

        match self.scope_changed {
            false => 6.42 * isc_base,
            true => 7.52 * (isc_base - 0.029) - 3.25 * (isc_base - 0.02).powf(15.0),
        }
    }

    fn exploitability(&self) -> f64 {
        8.22 * self.attack_vector
            * self.attack_complexity
            * self.privileges_required
            * self.user_interaction
    }

    fn modified_impact(&self) -> f64 {
        let isc_modified = (1.0
            - (1.0 - self.modified_confidentiality_impact * self.confidentiality_requirement)
                * (1.0 - self.modified_integrity_impact * self.integrity_requirement)
                * (1.0 - self.modified_availability_impact * self.availability_requirement))
            .min(0.915);

        match (self.modified_scope_changed, self.version) {
            (false, _) => 6.42 * isc_modified,
            (true, Version::V3_1) => {
                7.52 * (isc_modified - 0.029) - 3.25 * (isc_modified * 0.9731 - 0.02).powf(13.0)
            }
            (true, Version::V3_0) => {
                7.52 * (isc_modified - 0.029) - 3.25 * (isc_modified - 0.02).powf(15.0)
            }
        }
    }

    fn modified_exploitability(&self) -> f64 {
        8.22 * self.modified_attack_vector
            * self.modified_attack_complexity
            * self.modified_privileges_required
            * self.modified_user_interaction
    }

    pub fn base_score(&self) -> f64 {
        let impact = self.impact();
        let exploitability = self.exploitability();

        if impact <= 0.0 {
            0.0
        } else if !self.scope_changed {
            self.round_up((impact + exploitability).min(10.0))
        } else {
            self.round_up((1.08 * (impact + exploitability)).min(10.0))
        }
    }

    pub fn temporal_score(&self) -> f64 {
        self.round_up(
            self.base_score()
                * self.exploit_code_maturity
                * self.remediation_level
                * self.report_confidence,
        )
    }

    pub fn environmental_score(&self) -> f64 {
        let impact = self.modified_impact();
        let exploitability = self.modified_exploitability();

        if impact <= 0.0 {
            return 0.0;
        }

        let factor = match self.modified_scope_changed {
            false => 1.0,
            true => 1.08,
        };

        self.round_up(
            self.round_up((factor * (impact + exploitability)).min(10.0))
                * self.exploit_code_maturity
                * self.remediation_level
                * self.report_confidence,
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

fn privileges(scope_changed: bool) -> &'static [(&'static str, f64)] {
    match scope_changed {
        true => PRIVILEGES_REQUIRED_CHANGED,
        false => PRIVILEGES_REQUIRED,
    }
}
