use serde::{Deserialize, Serialize};

/// Element geometry in CSS pixels relative to the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingRect {
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Where the element description originated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementOrigin {
    /// Privileged capture channel.
    Native,
    /// In-page listener channel.
    #[default]
    InPage,
    /// Synthetic target standing for the page itself (navigations, scrolls).
    Page,
}

impl ElementOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementOrigin::Native => "native",
            ElementOrigin::InPage => "in-page",
            ElementOrigin::Page => "page",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParentSummary {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub class_name: Option<String>,
    pub role: Option<String>,
    pub text: Option<String>,
}

/// Stable description of an interacted-with element.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementContext {
    pub description: String,
    pub selector: String,
    pub xpath: String,
    pub role: String,
    pub bounding_rect: Option<BoundingRect>,
    pub is_visible: bool,
    pub is_interactive: bool,
    pub context: ElementOrigin,
    #[serde(default)]
    pub element_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub parent_element: Option<ParentSummary>,
    /// Ranked selector candidates, best first.
    #[serde(default)]
    pub unique_identifiers: Vec<String>,
}

impl ElementContext {
    /// Synthetic target used for actions that address the page rather than an element.
    pub fn page(title: Option<&str>) -> Self {
        let description = match title {
            Some(title) if !title.trim().is_empty() => format!("page \"{}\"", title.trim()),
            _ => "page".to_string(),
        };
        Self {
            description,
            selector: "document".into(),
            xpath: "/html".into(),
            role: "document".into(),
            bounding_rect: None,
            is_visible: true,
            is_interactive: false,
            context: ElementOrigin::Page,
            element_type: Some("document".into()),
            text: None,
            parent_element: None,
            unique_identifiers: Vec::new(),
        }
    }

    pub fn best_identifier(&self) -> Option<&str> {
        self.unique_identifiers.first().map(String::as_str)
    }

    /// True when the selector pins the element by id, class or attribute.
    pub fn has_identifying_fragment(&self) -> bool {
        self.selector.contains('#') || self.selector.contains('.') || self.selector.contains('[')
    }

    pub fn tag(&self) -> &str {
        self.element_type.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_serializes_as_tag() {
        let json = serde_json::to_string(&ElementOrigin::InPage).unwrap();
        assert_eq!(json, "\"in-page\"");
        assert_eq!(ElementOrigin::Native.as_str(), "native");
    }

    #[test]
    fn identifying_fragment_detection() {
        let mut ctx = ElementContext::page(None);
        assert!(!ctx.has_identifying_fragment());
        ctx.selector = "div.card".into();
        assert!(ctx.has_identifying_fragment());
        ctx.selector = "span[name=\"q\"]".into();
        assert!(ctx.has_identifying_fragment());
    }
}
