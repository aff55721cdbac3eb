use super::ValidationResult;
use crate::context::RetrievalContext;
use std::fmt::Debug;
use std::ops::{Add, BitOr};
use std::sync::Arc;

/// A requirement, checked against the evidence of a single retrieval.
///
/// Implementations must not keep state between checks.
pub trait Requirement: Debug + Send + Sync {
    fn check(&self, ctx: &RetrievalContext<'_>) -> ValidationResult;
}

/// A shareable node of a requirement tree.
#[derive(Clone, Debug)]
pub struct Rule(Arc<dyn Requirement>);

impl Rule {
    pub fn new(requirement: impl Requirement + 'static) -> Self {
        Self(Arc::new(requirement))
    }
}

impl Requirement for Rule {
    fn check(&self, ctx: &RetrievalContext<'_>) -> ValidationResult {
        self.0.check(ctx)
    }
}

/// Both requirements must be fulfilled.
impl Add for Rule {
    type Output = Rule;

    fn add(self, rhs: Self) -> Self::Output {
        all_of([self, rhs])
    }
}

/// At least one of the requirements must be fulfilled.
impl BitOr for Rule {
    type Output = Rule;

    fn bitor(self, rhs: Self) -> Self::Output {
        one_of([self, rhs])
    }
}

#[derive(Debug)]
struct AllOf(Vec<Rule>);

impl Requirement for AllOf {
    fn check(&self, ctx: &RetrievalContext<'_>) -> ValidationResult {
        // evaluate all, so that all errors get reported
        ValidationResult::merge(self.0.iter().map(|rule| rule.check(ctx)))
    }
}

#[derive(Debug)]
struct OneOf(Vec<Rule>);

impl Requirement for OneOf {
    fn check(&self, ctx: &RetrievalContext<'_>) -> ValidationResult {
        let results = self
            .0
            .iter()
            .map(|rule| rule.check(ctx))
            .collect::<Vec<_>>();

        match results.iter().any(ValidationResult::is_successful) {
            true => ValidationResult::Successful,
            false => ValidationResult::merge(results),
        }
    }
}

#[derive(Debug)]
struct NoRequirement;

impl Requirement for NoRequirement {
    fn check(&self, _ctx: &RetrievalContext<'_>) -> ValidationResult {
        ValidationResult::Successful
    }
}

/// All requirements must be fulfilled.
///
/// Every requirement gets checked, failing with the errors of all failed requirements.
pub fn all_of(rules: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::new(AllOf(rules.into_iter().collect()))
}

/// At least one of the requirements must be fulfilled.
///
/// A requirement which is not applicable counts as fulfilled. When none is fulfilled, this fails
/// with the errors of all requirements. An empty list is never fulfilled.
pub fn one_of(rules: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::new(OneOf(rules.into_iter().collect()))
}

/// Nothing is required.
pub fn none() -> Rule {
    Rule::new(NoRequirement)
}
