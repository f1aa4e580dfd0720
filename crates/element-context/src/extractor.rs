//! Element context extraction
//!
//! Produces the stable [`ElementContext`] stored with every action. All
//! functions here are total: partial or odd descriptors yield a degraded but
//! valid context.

use soulbrowser_core_types::{ElementContext, ElementOrigin, ParentSummary};
use soulbrowser_privacy::text::{normalize, truncate_chars};
use tracing::trace;

use crate::descriptor::ElementDescriptor;
use crate::identifiers::{
    class_selector, id_selector, quote, rank_identifiers, visible_text, TEST_ATTRIBUTES,
};
use crate::roles::{effective_role, is_interactive, is_vector_tag, MAX_ANCESTOR_DEPTH};

/// Extraction tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Characters of visible text kept in descriptions
    pub max_text_len: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { max_text_len: 50 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ElementContextExtractor {
    options: ExtractOptions,
}

impl ElementContextExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ExtractOptions {
        self.options
    }

    /// Builds the context for a descriptor captured on the given channel.
    pub fn extract(&self, desc: &ElementDescriptor, origin: ElementOrigin) -> ElementContext {
        let tag = desc.tag();
        if is_vector_tag(&tag) && !has_own_identity(desc) {
            if let Some(owner) = interactive_ancestor(desc) {
                trace!(tag = %tag, "vector leaf borrows identity from interactive parent");
                return self.extract_vector_leaf(desc, owner, origin);
            }
        }

        let bounding_rect = desc.bounding_rect;
        ElementContext {
            description: self.describe(desc),
            selector: selector(desc),
            xpath: xpath(desc),
            role: effective_role(desc),
            bounding_rect,
            is_visible: visibility(desc),
            is_interactive: is_interactive(desc),
            context: origin,
            element_type: (!tag.is_empty()).then_some(tag),
            text: self.accessible_name(desc),
            parent_element: desc.parent.as_deref().map(|parent| self.summarize(parent)),
            unique_identifiers: rank_identifiers(desc),
        }
    }

    /// Labeled fragments: tag/type, id, class, name, text, aria-label.
    pub fn describe(&self, desc: &ElementDescriptor) -> String {
        let mut parts = vec![tag_fragment(desc)];
        if let Some(id) = desc.attr("id") {
            parts.push(format!("id={}", quote(id)));
        }
        let classes: Vec<&str> = desc.classes().take(3).collect();
        if !classes.is_empty() {
            parts.push(format!("class={}", quote(&classes.join(" "))));
        }
        if let Some(name) = desc.attr("name") {
            parts.push(format!("name={}", quote(name)));
        }
        match visible_text(desc) {
            Some(text) => parts.push(format!(
                "text={}",
                quote(&truncate_chars(&text, self.options.max_text_len))
            )),
            None => {
                if let Some(placeholder) = desc.attr("placeholder") {
                    parts.push(format!("placeholder={}", quote(placeholder)));
                }
            }
        }
        if let Some(label) = desc.attr("aria-label") {
            parts.push(format!(
                "aria-label={}",
                quote(&truncate_chars(&normalize(label), self.options.max_text_len))
            ));
        }
        parts.join(" ")
    }

    /// Visible text, falling back to aria-label, placeholder and title.
    pub fn accessible_name(&self, desc: &ElementDescriptor) -> Option<String> {
        visible_text(desc)
            .or_else(|| {
                ["aria-label", "placeholder", "title"]
                    .iter()
                    .find_map(|attr| desc.attr(attr).map(normalize))
            })
            .filter(|text| !text.is_empty())
            .map(|text| truncate_chars(&text, self.options.max_text_len))
    }

    fn summarize(&self, parent: &ElementDescriptor) -> ParentSummary {
        let tag = parent.tag();
        ParentSummary {
            tag: (!tag.is_empty()).then_some(tag),
            id: parent.attr("id").map(str::to_string),
            class_name: parent.attr("class").map(normalize),
            role: Some(effective_role(parent)),
            text: visible_text(parent).map(|text| truncate_chars(&text, self.options.max_text_len)),
        }
    }

    fn extract_vector_leaf(
        &self,
        leaf: &ElementDescriptor,
        owner: &ElementDescriptor,
        origin: ElementOrigin,
    ) -> ElementContext {
        let tag = leaf.tag();
        let owner_selector = selector(owner);
        let unique_identifiers = rank_identifiers(owner)
            .into_iter()
            .filter(|candidate| !candidate.starts_with("text="))
            .map(|candidate| format!("{candidate} {tag}"))
            .collect();

        ElementContext {
            description: format!("{tag} in {}", self.describe(owner)),
            selector: format!("{owner_selector} {tag}"),
            xpath: leaf
                .xpath
                .as_deref()
                .map(str::trim)
                .filter(|xpath| !xpath.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}//*[local-name()={}]", xpath(owner), quote(&tag))),
            role: effective_role(owner),
            bounding_rect: leaf.bounding_rect.or(owner.bounding_rect),
            is_visible: visibility(leaf),
            is_interactive: true,
            context: origin,
            element_type: Some(tag),
            text: self.accessible_name(owner),
            parent_element: Some(self.summarize(owner)),
            unique_identifiers,
        }
    }
}

/// Nearest interactive ancestor, or the element itself when it is
/// interactive or nothing better exists within reach.
pub fn resolve_interaction_target(desc: &ElementDescriptor) -> &ElementDescriptor {
    if is_interactive(desc) {
        return desc;
    }
    interactive_ancestor(desc).unwrap_or(desc)
}

/// Stable identity of a form field, used to key pending text input.
pub fn element_identity(desc: &ElementDescriptor) -> String {
    rank_identifiers(desc)
        .into_iter()
        .find(|candidate| !candidate.starts_with("text="))
        .or_else(|| {
            desc.xpath
                .as_deref()
                .map(str::trim)
                .filter(|xpath| !xpath.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| selector(desc))
}

/// First ancestor flagged as interactive parent, else the first interactive
/// one, searched up to a fixed depth.
fn interactive_ancestor(desc: &ElementDescriptor) -> Option<&ElementDescriptor> {
    let mut fallback = None;
    for ancestor in desc.ancestors().take(MAX_ANCESTOR_DEPTH) {
        if ancestor.interactive_parent {
            return Some(ancestor);
        }
        if fallback.is_none() && is_interactive(ancestor) {
            fallback = Some(ancestor);
        }
    }
    fallback
}

fn has_own_identity(desc: &ElementDescriptor) -> bool {
    ["id", "aria-label", "name"]
        .iter()
        .chain(TEST_ATTRIBUTES.iter())
        .any(|attr| desc.attr(attr).is_some())
        || visible_text(desc).is_some()
}

fn visibility(desc: &ElementDescriptor) -> bool {
    desc.is_visible
        .unwrap_or_else(|| desc.bounding_rect.map(|rect| !rect.is_empty()).unwrap_or(true))
}

fn tag_fragment(desc: &ElementDescriptor) -> String {
    let tag = desc.tag();
    let tag = if tag.is_empty() { "element".to_string() } else { tag };
    match desc.kind() {
        Some(kind) if tag == "input" || tag == "button" => format!("{tag}(type={kind})"),
        _ => tag,
    }
}

/// Primary CSS-like selector following the identifier priority.
pub fn selector(desc: &ElementDescriptor) -> String {
    let tag = desc.tag();
    let mut out = if tag.is_empty() { "*".to_string() } else { tag.clone() };

    if tag == "input" {
        if let Some(kind) = desc.kind() {
            out.push_str(&format!("[type={}]", quote(&kind)));
        }
    }

    let mut pinned = false;
    if let Some(id) = desc.attr("id") {
        out.push_str(&id_selector(id));
        pinned = true;
    } else if let Some((attr, value)) = TEST_ATTRIBUTES
        .iter()
        .find_map(|attr| desc.attr(attr).map(|value| (*attr, value)))
    {
        out.push_str(&format!("[{attr}={}]", quote(value)));
        pinned = true;
    }
    if let Some(classes) = class_selector(desc) {
        out.push_str(&classes);
        pinned = true;
    }
    if let Some(name) = desc.attr("name") {
        out.push_str(&format!("[name={}]", quote(name)));
        pinned = true;
    }
    if let Some(label) = desc.attr("aria-label") {
        out.push_str(&format!("[aria-label={}]", quote(label)));
        pinned = true;
    }
    if !pinned {
        if let Some(text) = visible_text(desc) {
            out.push_str(&format!(":has-text({})", quote(&truncate_chars(&text, 50))));
        }
    }
    out
}

/// Descriptor-provided XPath, else one derived from the best attribute.
pub fn xpath(desc: &ElementDescriptor) -> String {
    if let Some(provided) = desc
        .xpath
        .as_deref()
        .map(str::trim)
        .filter(|xpath| !xpath.is_empty())
    {
        return provided.to_string();
    }

    let tag = desc.tag();
    let tag = if tag.is_empty() { "*".to_string() } else { tag };
    if let Some(id) = desc.attr("id") {
        return format!("//*[@id={}]", xpath_literal(id));
    }
    if let Some(name) = desc.attr("name") {
        return format!("//{tag}[@name={}]", xpath_literal(name));
    }
    if let Some(label) = desc.attr("aria-label") {
        return format!("//{tag}[@aria-label={}]", xpath_literal(label));
    }
    if let Some(text) = visible_text(desc) {
        return format!("//{tag}[normalize-space()={}]", xpath_literal(&text));
    }
    format!("//{tag}")
}

fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        format!("\"{value}\"")
    } else if !value.contains('\'') {
        format!("'{value}'")
    } else {
        let parts: Vec<String> = value
            .split('"')
            .map(|part| format!("\"{part}\""))
            .collect();
        format!("concat({})", parts.join(", '\"', "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn email_input() -> ElementDescriptor {
        ElementDescriptor {
            tag_name: Some("INPUT".into()),
            id: Some("email".into()),
            class_name: Some("form-control".into()),
            name: Some("email".into()),
            input_type: Some("email".into()),
            placeholder: Some("Email address".into()),
            ..Default::default()
        }
    }

    #[test]
    fn describes_form_field() {
        let extractor = ElementContextExtractor::default();
        let ctx = extractor.extract(&email_input(), ElementOrigin::InPage);
        assert_eq!(
            ctx.description,
            "input(type=email) id=\"email\" class=\"form-control\" name=\"email\" placeholder=\"Email address\""
        );
        assert_eq!(
            ctx.selector,
            "input[type=\"email\"]#email.form-control[name=\"email\"]"
        );
        assert_eq!(ctx.xpath, "//*[@id=\"email\"]");
        assert_eq!(ctx.role, "textbox");
        assert!(ctx.is_interactive);
        assert_eq!(ctx.best_identifier(), Some("#email"));
        assert_eq!(ctx.text.as_deref(), Some("Email address"));
    }

    #[test]
    fn truncates_long_text() {
        let desc = ElementDescriptor {
            tag_name: Some("p".into()),
            text: Some("x".repeat(80)),
            ..Default::default()
        };
        let ctx = ElementContextExtractor::default().extract(&desc, ElementOrigin::Native);
        let expected = format!("p text=\"{}…\"", "x".repeat(50));
        assert_eq!(ctx.description, expected);
        assert_eq!(ctx.context, ElementOrigin::Native);
    }

    #[test]
    fn vector_leaf_borrows_parent_identity() {
        let button = ElementDescriptor {
            tag_name: Some("button".into()),
            id: Some("close".into()),
            aria_label: Some("Close dialog".into()),
            interactive_parent: true,
            ..Default::default()
        };
        let path = ElementDescriptor {
            tag_name: Some("path".into()),
            parent: Some(Box::new(ElementDescriptor {
                tag_name: Some("svg".into()),
                class_name: Some("icon".into()),
                parent: Some(Box::new(button)),
                ..Default::default()
            })),
            ..Default::default()
        };

        let ctx = ElementContextExtractor::default().extract(&path, ElementOrigin::InPage);
        assert_eq!(
            ctx.description,
            "path in button id=\"close\" aria-label=\"Close dialog\""
        );
        assert_eq!(ctx.selector, "button#close[aria-label=\"Close dialog\"] path");
        assert_eq!(ctx.role, "button");
        assert!(ctx.is_interactive);
        assert_eq!(ctx.text.as_deref(), Some("Close dialog"));
        assert_eq!(ctx.best_identifier(), Some("#close path"));
    }

    #[test]
    fn resolves_span_inside_button() {
        let span = ElementDescriptor {
            tag_name: Some("span".into()),
            text: Some("Sign in".into()),
            parent: Some(Box::new(ElementDescriptor {
                tag_name: Some("button".into()),
                id: Some("signin".into()),
                ..Default::default()
            })),
            ..Default::default()
        };
        let target = resolve_interaction_target(&span);
        assert_eq!(target.tag(), "button");

        let plain = ElementDescriptor {
            tag_name: Some("div".into()),
            ..Default::default()
        };
        assert_eq!(resolve_interaction_target(&plain).tag(), "div");
    }

    #[test]
    fn bare_element_falls_back_to_text_selector() {
        let desc = ElementDescriptor {
            tag_name: Some("span".into()),
            text: Some("Docs".into()),
            ..Default::default()
        };
        assert_eq!(selector(&desc), "span:has-text(\"Docs\")");
        assert_eq!(xpath(&desc), "//span[normalize-space()=\"Docs\"]");
        assert_eq!(element_identity(&desc), "span:has-text(\"Docs\")");
    }

    #[test]
    fn xpath_literal_handles_quotes() {
        assert_eq!(xpath_literal("it's"), "\"it's\"");
        assert_eq!(xpath_literal("say \"hi\""), "'say \"hi\"'");
        assert_eq!(
            xpath_literal("a\"b'c"),
            "concat(\"a\", '\"', \"b'c\")"
        );
    }
}
