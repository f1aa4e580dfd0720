//! Wire shapes delivered by the capture channels
//!
//! Both channels describe the event target with the same opaque record. Every
//! field is optional; extraction tolerates partial descriptors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use soulbrowser_core_types::{BoundingRect, TimestampMs};

/// Element description as captured in the page or by the native channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementDescriptor {
    /// Lower- or upper-case tag name
    #[serde(alias = "tag")]
    pub tag_name: Option<String>,

    pub id: Option<String>,

    /// Space separated class list
    #[serde(alias = "class")]
    pub class_name: Option<String>,

    pub name: Option<String>,

    /// Input type attribute (`email`, `password`, `checkbox`, ...)
    #[serde(rename = "type")]
    pub input_type: Option<String>,

    /// Visible text content
    #[serde(alias = "innerText", alias = "textContent")]
    pub text: Option<String>,

    pub aria_label: Option<String>,

    /// Explicit ARIA role
    pub role: Option<String>,

    pub href: Option<String>,

    pub placeholder: Option<String>,

    pub title: Option<String>,

    pub autocomplete: Option<String>,

    /// Current value for form controls. Never stored verbatim.
    pub value: Option<String>,

    /// Checked state for checkboxes and radios
    pub checked: Option<bool>,

    /// Remaining attributes (`data-*`, `on*`, ...)
    pub attributes: BTreeMap<String, String>,

    /// XPath computed by the capturing side, when available
    pub xpath: Option<String>,

    pub bounding_rect: Option<BoundingRect>,

    pub is_visible: Option<bool>,

    pub is_content_editable: bool,

    /// Set by the capturing side on the nearest interactive ancestor
    #[serde(alias = "isInteractiveParent")]
    pub interactive_parent: bool,

    /// Parent element, nested recursively
    pub parent: Option<Box<ElementDescriptor>>,

    /// Enclosing form, when any
    pub form: Option<FormDescriptor>,
}

/// Enclosing form of a control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormDescriptor {
    pub id: Option<String>,
    pub name: Option<String>,
    pub action: Option<String>,
    /// Whether the form exposes a visible submit control
    pub has_visible_submit: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewportDescriptor {
    pub width: u32,
    pub height: u32,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyElementDescriptor {
    #[serde(alias = "tagName")]
    pub tag: Option<String>,
    pub text: Option<String>,
    pub href: Option<String>,
}

/// Page snapshot attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageContextDescriptor {
    pub url: Option<String>,
    pub title: Option<String>,
    pub timestamp: Option<TimestampMs>,
    pub viewport: Option<ViewportDescriptor>,
    pub user_agent: Option<String>,
    pub key_elements: Vec<KeyElementDescriptor>,
}

impl ElementDescriptor {
    /// Lower-cased tag name, empty when unknown.
    pub fn tag(&self) -> String {
        self.tag_name
            .as_deref()
            .map(|tag| tag.trim().to_ascii_lowercase())
            .unwrap_or_default()
    }

    /// Lower-cased input type.
    pub fn kind(&self) -> Option<String> {
        self.input_type
            .as_deref()
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty())
    }

    /// Looks up an attribute by name, checking the typed fields first.
    pub fn attr(&self, name: &str) -> Option<&str> {
        let typed = match name {
            "id" => self.id.as_deref(),
            "class" => self.class_name.as_deref(),
            "name" => self.name.as_deref(),
            "type" => self.input_type.as_deref(),
            "aria-label" => self.aria_label.as_deref(),
            "role" => self.role.as_deref(),
            "href" => self.href.as_deref(),
            "placeholder" => self.placeholder.as_deref(),
            "title" => self.title.as_deref(),
            "autocomplete" => self.autocomplete.as_deref(),
            _ => None,
        };
        typed
            .or_else(|| self.attributes.get(name).map(String::as_str))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.class_name
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
    }

    /// Iterates over the ancestors, nearest first.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: self.parent.as_deref(),
        }
    }
}

pub struct Ancestors<'a> {
    next: Option<&'a ElementDescriptor>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ElementDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_descriptor() {
        let json = r#"{
            "tagName": "SPAN",
            "className": "label  bold",
            "innerText": "Sign in",
            "parent": {"tagName": "BUTTON", "id": "signin", "interactiveParent": true}
        }"#;
        let desc: ElementDescriptor = serde_json::from_str(json).expect("descriptor");
        assert_eq!(desc.tag(), "span");
        assert_eq!(desc.classes().collect::<Vec<_>>(), vec!["label", "bold"]);
        assert_eq!(desc.text.as_deref(), Some("Sign in"));
        let parent = desc.ancestors().next().expect("parent");
        assert_eq!(parent.tag(), "button");
        assert!(parent.interactive_parent);
    }

    #[test]
    fn attr_prefers_typed_fields() {
        let mut desc = ElementDescriptor {
            id: Some("  ".into()),
            ..Default::default()
        };
        desc.attributes.insert("data-testid".into(), "submit".into());
        assert_eq!(desc.attr("id"), None);
        assert_eq!(desc.attr("data-testid"), Some("submit"));
    }
}
