use once_cell::sync::Lazy;
use regex::Regex;
use soulbrowser_core_types::SensitiveKind;
use tracing::warn;

use crate::policy::{PrivacyPolicyView, DEFAULT_EMAIL_PATTERN};
use crate::text::looks_like_card_number;

static DEFAULT_EMAIL_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(DEFAULT_EMAIL_PATTERN).ok());

/// Attributes of the field a value was typed into.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldHints<'a> {
    pub input_type: Option<&'a str>,
    pub name: Option<&'a str>,
    pub id: Option<&'a str>,
    pub autocomplete: Option<&'a str>,
    pub aria_label: Option<&'a str>,
    pub placeholder: Option<&'a str>,
}

impl<'a> FieldHints<'a> {
    fn identity_parts(&self) -> impl Iterator<Item = String> + '_ {
        [
            self.name,
            self.id,
            self.autocomplete,
            self.aria_label,
            self.placeholder,
        ]
        .into_iter()
        .flatten()
        .map(|part| part.to_ascii_lowercase())
    }

    fn mentions_any(&self, needles: &[String]) -> bool {
        self.identity_parts()
            .any(|part| needles.iter().any(|needle| part.contains(needle.as_str())))
    }
}

/// Decides whether a value needs masking before it is stored or described.
pub fn classify_sensitive(
    hints: &FieldHints<'_>,
    value: &str,
    policy: &PrivacyPolicyView,
) -> Option<SensitiveKind> {
    if !policy.enable {
        return None;
    }

    let input_type = hints.input_type.map(str::to_ascii_lowercase);
    if input_type.as_deref() == Some("password") || hints.mentions_any(&policy.password_hints) {
        return Some(SensitiveKind::Password);
    }

    if policy.mask_cards
        && (hints.mentions_any(&policy.card_hints) || looks_like_card_number(value))
    {
        return Some(SensitiveKind::CreditCard);
    }

    if policy.mask_emails
        && (input_type.as_deref() == Some("email") || matches_email(value, policy))
    {
        return Some(SensitiveKind::Email);
    }

    None
}

fn matches_email(value: &str, policy: &PrivacyPolicyView) -> bool {
    let value = value.trim();
    if !value.contains('@') {
        return false;
    }
    if policy.email_pattern == DEFAULT_EMAIL_PATTERN {
        return DEFAULT_EMAIL_RE
            .as_ref()
            .map(|re| re.is_match(value))
            .unwrap_or(false);
    }
    match Regex::new(&policy.email_pattern) {
        Ok(re) => re.is_match(value),
        Err(err) => {
            warn!(%err, "invalid email pattern in privacy policy");
            false
        }
    }
}
