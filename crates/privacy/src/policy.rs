use parking_lot::RwLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::{PrivacyError, PrivacyResult};

#[cfg(test)]
use std::cell::RefCell;

#[cfg(not(test))]
use once_cell::sync::OnceCell;

pub(crate) const DEFAULT_EMAIL_PATTERN: &str = r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PrivacyPolicyView {
    /// When false values are stored verbatim. Only meant for local debugging.
    pub enable: bool,
    pub mask_char: char,
    pub password_mask_len: usize,
    pub mask_emails: bool,
    pub mask_cards: bool,
    /// Substrings of name/id/autocomplete that mark a field as password-like.
    pub password_hints: Vec<String>,
    /// Substrings of name/id/autocomplete that mark a field as a card number.
    pub card_hints: Vec<String>,
    pub email_pattern: String,
}

impl Default for PrivacyPolicyView {
    fn default() -> Self {
        Self {
            enable: true,
            mask_char: '*',
            password_mask_len: 8,
            mask_emails: true,
            mask_cards: true,
            password_hints: vec![
                "password".into(),
                "passwd".into(),
                "pwd".into(),
                "passcode".into(),
                "secret".into(),
                "otp".into(),
            ],
            card_hints: vec![
                "cc-number".into(),
                "ccnum".into(),
                "cardnumber".into(),
                "card-number".into(),
                "card_number".into(),
                "creditcard".into(),
            ],
            email_pattern: DEFAULT_EMAIL_PATTERN.into(),
        }
    }
}

impl PrivacyPolicyView {
    pub fn validate(&self) -> PrivacyResult<()> {
        Regex::new(&self.email_pattern).map_err(|err| PrivacyError::InvalidPattern {
            pattern: self.email_pattern.clone(),
            reason: err.to_string(),
        })?;
        if self.password_mask_len == 0 {
            return Err(PrivacyError::Internal(
                "password_mask_len must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(not(test))]
static PRIVACY_POLICY: OnceCell<Arc<RwLock<PrivacyPolicyView>>> = OnceCell::new();

#[cfg(test)]
thread_local! {
    static TEST_POLICY: RefCell<Arc<RwLock<PrivacyPolicyView>>> =
        RefCell::new(Arc::new(RwLock::new(PrivacyPolicyView::default())));
}

fn policy_cell() -> Arc<RwLock<PrivacyPolicyView>> {
    #[cfg(test)]
    {
        return TEST_POLICY.with(|cell| Arc::clone(&cell.borrow()));
    }

    #[cfg(not(test))]
    {
        PRIVACY_POLICY
            .get_or_init(|| Arc::new(RwLock::new(PrivacyPolicyView::default())))
            .clone()
    }
}

#[derive(Clone)]
pub struct PrivacyPolicyHandle {
    inner: Arc<RwLock<PrivacyPolicyView>>,
}

impl PrivacyPolicyHandle {
    pub fn new_with(view: PrivacyPolicyView) -> Self {
        Self {
            inner: Arc::new(RwLock::new(view)),
        }
    }

    pub fn global() -> Self {
        Self {
            inner: policy_cell(),
        }
    }

    pub fn snapshot(&self) -> PrivacyPolicyView {
        self.inner.read().clone()
    }

    pub fn update(&self, view: PrivacyPolicyView) -> PrivacyResult<()> {
        view.validate()?;
        *self.inner.write() = view;
        Ok(())
    }
}

pub fn set_policy(view: PrivacyPolicyView) -> PrivacyResult<()> {
    PrivacyPolicyHandle::global().update(view)
}

pub fn current_policy() -> PrivacyPolicyView {
    PrivacyPolicyHandle::global().snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_broken_email_pattern() {
        let view = PrivacyPolicyView {
            email_pattern: "([".into(),
            ..Default::default()
        };
        assert!(matches!(
            PrivacyPolicyHandle::global().update(view),
            Err(PrivacyError::InvalidPattern { .. })
        ));
        assert_eq!(current_policy().email_pattern, DEFAULT_EMAIL_PATTERN);
    }

    #[test]
    fn yaml_style_partial_override_keeps_defaults() {
        let view: PrivacyPolicyView =
            serde_json::from_str(r#"{"mask_emails": false}"#).expect("partial policy");
        assert!(!view.mask_emails);
        assert!(view.enable);
        assert_eq!(view.password_mask_len, 8);
    }
}
