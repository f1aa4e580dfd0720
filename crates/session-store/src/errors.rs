use thiserror::Error;

use soulbrowser_core_types::SoulError;

#[derive(Clone, Debug, Error)]
pub enum StoreErrorKind {
    #[error("io failed: {0}")]
    Io(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Clone, Debug, Error)]
#[error(transparent)]
pub struct StoreError(pub StoreErrorKind);

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn new(kind: StoreErrorKind) -> Self {
        Self(kind)
    }

    pub fn kind(&self) -> &StoreErrorKind {
        &self.0
    }
}

impl From<StoreErrorKind> for StoreError {
    fn from(kind: StoreErrorKind) -> Self {
        StoreError(kind)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreErrorKind::Io(err.to_string()).into()
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreErrorKind::Serialization(err.to_string()).into()
    }
}

impl From<StoreError> for SoulError {
    fn from(value: StoreError) -> Self {
        SoulError::new(value.to_string())
    }
}
