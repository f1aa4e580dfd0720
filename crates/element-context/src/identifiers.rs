//! Selector candidates, ranked from most to least stable
//!
//! Ranking: `#id` > test attribute > aria-label > name > visible text >
//! class combination. Replay tries candidates in this order.

use soulbrowser_privacy::text::{normalize, truncate_chars};

use crate::descriptor::ElementDescriptor;

/// Test hooks checked in order; the first present one wins.
pub const TEST_ATTRIBUTES: &[&str] = &[
    "data-testid",
    "data-test",
    "data-test-id",
    "data-qa",
    "data-cy",
];

/// Classes kept in a combined class selector.
pub(crate) const MAX_CLASSES: usize = 3;

/// Characters of visible text kept in a text candidate.
const MAX_TEXT_CANDIDATE: usize = 50;

/// Builds the ranked candidate list for a descriptor.
pub fn rank_identifiers(desc: &ElementDescriptor) -> Vec<String> {
    let tag = desc.tag();
    let tag = if tag.is_empty() { "*".to_string() } else { tag };
    let mut out = Vec::new();

    if let Some(id) = desc.attr("id") {
        out.push(id_selector(id));
    }

    if let Some((attr, value)) = TEST_ATTRIBUTES
        .iter()
        .find_map(|attr| desc.attr(attr).map(|value| (*attr, value)))
    {
        out.push(format!("[{attr}={}]", quote(value)));
    }

    if let Some(label) = desc.attr("aria-label") {
        out.push(format!("{tag}[aria-label={}]", quote(label)));
    }

    if let Some(name) = desc.attr("name") {
        out.push(format!("{tag}[name={}]", quote(name)));
    }

    if let Some(text) = visible_text(desc) {
        out.push(format!(
            "text={}",
            quote(&truncate_chars(&text, MAX_TEXT_CANDIDATE))
        ));
    }

    if let Some(classes) = class_selector(desc) {
        out.push(format!("{tag}{classes}"));
    }

    out.dedup();
    out
}

/// Normalized visible text, when non-empty.
pub(crate) fn visible_text(desc: &ElementDescriptor) -> Option<String> {
    desc.text
        .as_deref()
        .map(normalize)
        .filter(|text| !text.is_empty())
}

/// `#id`, or the attribute form when the id is not a plain CSS identifier.
pub(crate) fn id_selector(id: &str) -> String {
    if is_css_ident(id) {
        format!("#{id}")
    } else {
        format!("[id={}]", quote(id))
    }
}

/// `.a.b.c` from the first few valid classes.
pub(crate) fn class_selector(desc: &ElementDescriptor) -> Option<String> {
    let classes: Vec<&str> = desc
        .classes()
        .filter(|class| is_css_ident(class))
        .take(MAX_CLASSES)
        .collect();
    if classes.is_empty() {
        return None;
    }
    Some(classes.iter().map(|class| format!(".{class}")).collect())
}

/// Double-quoted attribute value with quotes and backslashes escaped.
pub(crate) fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

fn is_css_ident(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '-' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ranks_candidates_in_stability_order() {
        let mut desc = ElementDescriptor {
            tag_name: Some("BUTTON".into()),
            id: Some("signin".into()),
            class_name: Some("btn btn-primary wide extra".into()),
            name: Some("login".into()),
            aria_label: Some("Sign in".into()),
            text: Some("  Sign\nin ".into()),
            ..Default::default()
        };
        desc.attributes.insert("data-qa".into(), "signin-btn".into());

        assert_eq!(
            rank_identifiers(&desc),
            vec![
                "#signin".to_string(),
                "[data-qa=\"signin-btn\"]".to_string(),
                "button[aria-label=\"Sign in\"]".to_string(),
                "button[name=\"login\"]".to_string(),
                "text=\"Sign in\"".to_string(),
                "button.btn.btn-primary.wide".to_string(),
            ]
        );
    }

    #[test]
    fn odd_ids_use_attribute_form() {
        assert_eq!(id_selector("1st"), "[id=\"1st\"]");
        assert_eq!(id_selector("main-nav"), "#main-nav");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn bare_element_has_no_candidates() {
        let desc = ElementDescriptor {
            tag_name: Some("div".into()),
            ..Default::default()
        };
        assert!(rank_identifiers(&desc).is_empty());
    }
}
