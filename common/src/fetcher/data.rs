use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::ops::{Deref, DerefMut};

/// Error decoding a response body
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Data which can be extracted from the body of a successful response.
pub trait Data: Sized {
    fn from_body(body: Bytes) -> Result<Self, DataError>;
}

/// String data
impl Data for String {
    fn from_body(body: Bytes) -> Result<Self, DataError> {
        Ok(String::from_utf8(body.to_vec())?)
    }
}

/// BLOB data
impl Data for Bytes {
    fn from_body(body: Bytes) -> Result<Self, DataError> {
        Ok(body)
    }
}

/// JSON based data.
#[derive(Clone, Debug)]
pub struct Json<D>(pub D)
where
    D: DeserializeOwned;

impl<D> Data for Json<D>
where
    D: DeserializeOwned,
{
    fn from_body(body: Bytes) -> Result<Self, DataError> {
        Ok(Self(serde_json::from_slice(&body)?))
    }
}

impl<D: DeserializeOwned> Json<D> {
    #[inline]
    pub fn into_inner(self) -> D {
        self.0
    }
}

impl<D: DeserializeOwned> Deref for Json<D> {
    type Target = D;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<D: DeserializeOwned> DerefMut for Json<D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
