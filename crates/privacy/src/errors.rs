use thiserror::Error;

use soulbrowser_core_types::SoulError;

#[derive(Debug, Error)]
pub enum PrivacyError {
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("internal error: {0}")]
    Internal(String),
}

pub type PrivacyResult<T> = Result<T, PrivacyError>;

impl From<PrivacyError> for SoulError {
    fn from(value: PrivacyError) -> Self {
        SoulError::new(value.to_string())
    }
}
