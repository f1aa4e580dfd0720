use soulbrowser_core_types::{ActionValue, SensitiveKind};

use crate::detect::{classify_sensitive, FieldHints};
use crate::policy::{current_policy, PrivacyPolicyView};
use crate::text::card_digits;

/// Renders the masked form of a sensitive value.
pub fn mask_value(kind: SensitiveKind, value: &str, policy: &PrivacyPolicyView) -> String {
    let glyph = policy.mask_char;
    match kind {
        SensitiveKind::Password => glyph.to_string().repeat(policy.password_mask_len),
        SensitiveKind::CreditCard => {
            let digits = card_digits(value).unwrap_or_else(|| {
                value.chars().filter(char::is_ascii_digit).collect::<String>()
            });
            let tail: String = digits
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            let group = glyph.to_string().repeat(4);
            format!("{group} {group} {group} {tail}")
        }
        SensitiveKind::Email => {
            let trimmed = value.trim();
            let stars = glyph.to_string().repeat(3);
            match trimmed.split_once('@') {
                Some((local, domain)) => {
                    let first = local.chars().next().map(String::from).unwrap_or_default();
                    format!("{first}{stars}@{domain}")
                }
                None => {
                    let first = trimmed.chars().next().map(String::from).unwrap_or_default();
                    format!("{first}{stars}")
                }
            }
        }
    }
}

/// Wraps a typed value, masking it when the field or value looks sensitive.
pub fn protect_value_with(
    hints: &FieldHints<'_>,
    value: &str,
    policy: &PrivacyPolicyView,
) -> ActionValue {
    match classify_sensitive(hints, value, policy) {
        Some(kind) => ActionValue::Masked {
            kind,
            display: mask_value(kind, value, policy),
            length: value.chars().count(),
        },
        None => ActionValue::Text(value.to_string()),
    }
}

/// Same as [`protect_value_with`] using the process-wide privacy policy.
pub fn protect_value(hints: &FieldHints<'_>, value: &str) -> ActionValue {
    protect_value_with(hints, value, &current_policy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn masks_each_kind() {
        let policy = PrivacyPolicyView::default();
        assert_eq!(
            mask_value(SensitiveKind::Password, "secret123", &policy),
            "********"
        );
        assert_eq!(
            mask_value(SensitiveKind::CreditCard, "4111 1111 1111 1234", &policy),
            "**** **** **** 1234"
        );
        assert_eq!(
            mask_value(SensitiveKind::Email, "alice@example.com", &policy),
            "a***@example.com"
        );
    }

    #[test]
    fn protect_keeps_plain_text() {
        let value = protect_value(&FieldHints::default(), "github");
        assert_eq!(value, ActionValue::Text("github".into()));
    }

    #[test]
    fn protect_never_leaks_password() {
        let hints = FieldHints {
            input_type: Some("password"),
            ..Default::default()
        };
        let value = protect_value(&hints, "secret123");
        assert!(value.is_masked());
        assert!(!value.display().contains("secret"));
        assert_eq!(value.char_len(), 9);
    }
}
