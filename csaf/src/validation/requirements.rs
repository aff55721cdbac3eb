//! The numbered requirements of the CSAF standard, section 7.1.

use super::{Checking, Requirement, ValidationResult};
use crate::context::{DataSource, RetrievalContext};
use crate::model::TlpLabel;
use reqwest::header::AUTHORIZATION;

/// Requirement 1: Valid CSAF document
#[derive(Debug)]
pub struct ValidCsafDocument;

impl Requirement for ValidCsafDocument {
    fn check(&self, ctx: &RetrievalContext<'_>) -> ValidationResult {
        let Some(csaf) = ctx.advisory() else {
            return ValidationResult::failed("We do not have a valid JSON");
        };

        let errors = Checking::new()
            .require(
                "The CSAF file does not have a document publisher name",
                !csaf.document.publisher.name.is_empty(),
            )
            .require(
                "The CSAF file does not have a document title",
                !csaf.document.title.is_empty(),
            )
            .require(
                "The CSAF file's document tracking id is empty",
                !csaf.document.tracking.id.is_empty(),
            )
            .done();

        match errors.is_empty() {
            true => ValidationResult::Successful,
            false => ValidationResult::Failed(errors),
        }
    }
}

/// The filename an advisory with the tracking ID must have.
///
/// The ID is lowercased, and every run of characters other than `a-z`, `0-9`, `+` and `-` is
/// replaced with a single `_`.
pub fn expected_filename(tracking_id: &str) -> String {
    let mut result = String::with_capacity(tracking_id.len() + 5);
    let mut replacing = false;

    for c in tracking_id.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '+' || c == '-' {
            result.push(c);
            replacing = false;
        } else if !replacing {
            result.push('_');
            replacing = true;
        }
    }

    result.push_str(".json");
    result
}

/// Requirement 2: Filename
#[derive(Debug)]
pub struct ValidFilename;

impl Requirement for ValidFilename {
    fn check(&self, ctx: &RetrievalContext<'_>) -> ValidationResult {
        let Some(csaf) = ctx.advisory() else {
            return ValidationResult::NotApplicable;
        };

        let should = expected_filename(&csaf.document.tracking.id);
        let filename = ctx
            .response
            .and_then(|response| response.url.path_segments())
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();

        match filename == should {
            true => ValidationResult::Successful,
            false => ValidationResult::failed(format!(
                r#"Filename "{filename}" does not match conformance, expected "{should}""#
            )),
        }
    }
}

/// Requirement 3: TLS
#[derive(Debug)]
pub struct UsageOfTls;

impl Requirement for UsageOfTls {
    fn check(&self, ctx: &RetrievalContext<'_>) -> ValidationResult {
        let Some(response) = ctx.response else {
            return ValidationResult::NotApplicable;
        };

        match response.url.scheme() == "https" {
            true => ValidationResult::Successful,
            false => ValidationResult::failed("JSON was not retrieved via HTTPS"),
        }
    }
}

/// Requirement 4: TLP:WHITE
///
/// A TLP:WHITE advisory must be accessible without authentication.
#[derive(Debug)]
pub struct TlpWhiteAccessible;

impl Requirement for TlpWhiteAccessible {
    fn check(&self, ctx: &RetrievalContext<'_>) -> ValidationResult {
        let Some(csaf) = ctx.advisory() else {
            return ValidationResult::NotApplicable;
        };

        if csaf.tlp_label() != Some(TlpLabel::White) {
            return ValidationResult::NotApplicable;
        }

        let Some(response) = ctx.response else {
            return ValidationResult::failed("Response is null");
        };

        if response.status.is_success() && !response.request_headers.contains_key(AUTHORIZATION) {
            ValidationResult::Successful
        } else {
            ValidationResult::failed("TLP:WHITE document is not freely accessible")
        }
    }
}

/// Requirements 8, 9 and 10: the provider metadata was found through the expected approach.
#[derive(Debug)]
pub struct DiscoveredBy(pub DataSource);

impl Requirement for DiscoveredBy {
    fn check(&self, ctx: &RetrievalContext<'_>) -> ValidationResult {
        match ctx.data_source == self.0 {
            true => ValidationResult::Successful,
            false => ValidationResult::failed(format!(
                "Provider metadata was not retrieved via {}",
                self.0
            )),
        }
    }
}

/// A requirement which is not checked, and so always fulfilled.
#[derive(Debug)]
pub struct Unchecked {
    pub number: u8,
    pub name: &'static str,
}

impl Requirement for Unchecked {
    fn check(&self, _ctx: &RetrievalContext<'_>) -> ValidationResult {
        log::trace!("Requirement {} ({}) is not checked", self.number, self.name);
        ValidationResult::Successful
    }
}
