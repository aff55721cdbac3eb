//! Checking retrieved documents against the requirements of the CSAF standard
//!
//! Requirements are composed into trees, using [`all_of`], [`one_of`] and the `+` and `|`
//! operators. The trees are immutable and can be shared between concurrent checks. A [`Role`]
//! binds two of those trees to a CSAF role: one checked against the metadata of a party, one
//! checked against each of the documents it hosts.

mod check;
mod requirement;
mod requirements;
mod roles;

pub use check::*;
pub use requirement::*;
pub use requirements::*;
pub use roles::*;

use std::fmt::{Display, Formatter};

/// The outcome of checking a requirement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationResult {
    Successful,
    /// The requirement doesn't apply. Counts as success.
    NotApplicable,
    Failed(Vec<String>),
}

impl ValidationResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed(vec![error.into()])
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn is_successful(&self) -> bool {
        !self.is_failed()
    }

    pub fn errors(&self) -> &[String] {
        match self {
            Self::Failed(errors) => errors,
            _ => &[],
        }
    }

    /// Merge results, failing if any of them failed.
    ///
    /// The errors of all failed results are kept, in order.
    pub fn merge(results: impl IntoIterator<Item = ValidationResult>) -> Self {
        let mut failed = false;
        let mut errors = vec![];

        for result in results {
            if let Self::Failed(e) = result {
                failed = true;
                errors.extend(e);
            }
        }

        match failed {
            true => Self::Failed(errors),
            false => Self::Successful,
        }
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            Self::Failed(errors) => Err(ValidationError { errors }),
            Self::Successful | Self::NotApplicable => Ok(()),
        }
    }
}

/// A failed validation, carrying the violations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub struct ValidationError {
    pub errors: Vec<String>,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation failed: {}", self.errors.join("; "))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn merge_keeps_all_errors_in_order() {
        let result = ValidationResult::merge([
            ValidationResult::failed("a"),
            ValidationResult::Successful,
            ValidationResult::NotApplicable,
            ValidationResult::Failed(vec!["b".into(), "c".into()]),
        ]);

        assert_eq!(
            result,
            ValidationResult::Failed(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn merge_not_applicable_is_success() {
        assert_eq!(
            ValidationResult::merge([ValidationResult::NotApplicable]),
            ValidationResult::Successful
        );
        assert_eq!(ValidationResult::merge([]), ValidationResult::Successful);
    }

    #[test]
    fn into_result() {
        assert_eq!(ValidationResult::NotApplicable.into_result(), Ok(()));
        let err = ValidationResult::failed("broken").into_result().unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: broken");
    }
}
