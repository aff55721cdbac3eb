use super::{LoadError, RetrievalError};
use crate::loader::CsafLoader;
use crate::model::advisory::Advisory;
use crate::validation::{Role, ValidationResult};
use csaf_retrieval_common::utils::url::Urlify;
use url::Url;

/// An advisory, which was retrieved and fulfills the document requirements of its provider's
/// role.
#[derive(Clone, Debug)]
pub struct RetrievedDocument {
    pub advisory: Advisory,
    pub url: Url,
    pub validation: ValidationResult,
}

impl Urlify for RetrievedDocument {
    fn url(&self) -> &Url {
        &self.url
    }
}

impl RetrievedDocument {
    /// Load an advisory and check it against the document requirements of a role.
    pub async fn from_url(
        url: Url,
        loader: &CsafLoader,
        role: &Role,
    ) -> Result<Self, RetrievalError> {
        let loaded = match loader.fetch_document(&url).await {
            Ok(loaded) => loaded,
            Err(err) => return Err(document_error(url, err)),
        };

        let validation = role.check_document(&loaded.context());
        if let Err(err) = validation.clone().into_result() {
            log::debug!("Document {url} failed validation: {err}");
            return Err(document_error(url, err));
        }

        Ok(Self {
            advisory: loaded.value,
            url,
            validation,
        })
    }

    /// Parse an advisory which was retrieved by other means.
    ///
    /// There is no response to check requirements against, so the document is not validated.
    pub fn from_json(json: &str, url: Url) -> Result<Self, serde_json::Error> {
        Ok(Self {
            advisory: serde_json::from_str(json)?,
            url,
            validation: ValidationResult::NotApplicable,
        })
    }
}

fn document_error(url: Url, cause: impl Into<LoadError>) -> RetrievalError {
    RetrievalError::Document {
        url,
        cause: cause.into(),
    }
}
