use crate::descriptor::ElementDescriptor;

/// Tags that are interactive by themselves.
const INTERACTIVE_TAGS: &[&str] = &[
    "a", "button", "input", "select", "textarea", "option", "summary", "label",
];

/// ARIA roles that mark a custom widget as interactive.
const INTERACTIVE_ROLES: &[&str] = &[
    "button",
    "link",
    "checkbox",
    "radio",
    "switch",
    "tab",
    "menuitem",
    "menuitemcheckbox",
    "menuitemradio",
    "option",
    "textbox",
    "searchbox",
    "combobox",
    "slider",
    "spinbutton",
    "treeitem",
];

/// Attributes frameworks use to bind click handlers.
const HANDLER_ATTRS: &[&str] = &["ng-click", "@click", "v-on:click", "data-action", "jsaction"];

/// Vector graphic leaves that rarely carry identifying attributes.
pub(crate) const VECTOR_TAGS: &[&str] = &[
    "svg", "path", "g", "use", "circle", "rect", "line", "polyline", "polygon", "ellipse", "text",
    "tspan",
];

/// Ancestor levels searched when resolving a nested target.
pub(crate) const MAX_ANCESTOR_DEPTH: usize = 6;

/// Role implied by the tag when no explicit role is present.
pub fn implicit_role(tag: &str, input_type: Option<&str>) -> &'static str {
    match tag {
        "a" => "link",
        "button" => "button",
        "select" => "combobox",
        "textarea" => "textbox",
        "option" => "option",
        "form" => "form",
        "nav" => "navigation",
        "img" => "img",
        "ul" | "ol" => "list",
        "li" => "listitem",
        "table" => "table",
        "dialog" => "dialog",
        "main" => "main",
        "header" => "banner",
        "footer" => "contentinfo",
        "summary" => "button",
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
        "input" => match input_type.unwrap_or("text") {
            "checkbox" => "checkbox",
            "radio" => "radio",
            "button" | "submit" | "reset" | "image" => "button",
            "range" => "slider",
            "number" => "spinbutton",
            "search" => "searchbox",
            _ => "textbox",
        },
        _ => "generic",
    }
}

/// Explicit role if present, otherwise the implicit one.
pub fn effective_role(desc: &ElementDescriptor) -> String {
    match desc.attr("role") {
        Some(role) => role.to_ascii_lowercase(),
        None => implicit_role(&desc.tag(), desc.kind().as_deref()).to_string(),
    }
}

/// Interactive by tag, role, bound handler or content editability.
pub fn is_interactive(desc: &ElementDescriptor) -> bool {
    let tag = desc.tag();
    if INTERACTIVE_TAGS.contains(&tag.as_str()) {
        return true;
    }
    if let Some(role) = desc.attr("role") {
        if INTERACTIVE_ROLES.contains(&role.to_ascii_lowercase().as_str()) {
            return true;
        }
    }
    if desc.is_content_editable {
        return true;
    }
    desc.attributes.keys().any(|key| {
        let key = key.to_ascii_lowercase();
        (key.starts_with("on") && key.len() > 2) || HANDLER_ATTRS.contains(&key.as_str())
    })
}

pub fn is_vector_tag(tag: &str) -> bool {
    VECTOR_TAGS.contains(&tag)
}

/// Text entry controls and their ARIA equivalents.
pub fn is_form_like_role(role: &str) -> bool {
    matches!(
        role,
        "textbox" | "searchbox" | "combobox" | "checkbox" | "radio" | "switch" | "slider"
            | "spinbutton" | "listbox" | "form"
    )
}

pub fn is_navigation_like_role(role: &str) -> bool {
    matches!(role, "link" | "navigation" | "menuitem" | "tab")
}
