//! Element Context Extraction
//!
//! Turns opaque element descriptors delivered by the capture channels into
//! stable [`ElementContext`] records:
//! - labeled human description
//! - primary CSS-like selector and XPath
//! - ranked unique-identifier candidates for replay
//! - interactive-target resolution for nested click targets
//!
//! [`ElementContext`]: soulbrowser_core_types::ElementContext

pub mod descriptor;
pub mod extractor;
pub mod identifiers;
pub mod page;
pub mod roles;

pub use descriptor::{
    ElementDescriptor, FormDescriptor, KeyElementDescriptor, PageContextDescriptor,
    ViewportDescriptor,
};
pub use extractor::{
    element_identity, resolve_interaction_target, selector, xpath, ElementContextExtractor,
    ExtractOptions,
};
pub use identifiers::rank_identifiers;
pub use page::build_page_context;
pub use roles::{
    effective_role, implicit_role, is_form_like_role, is_interactive, is_navigation_like_role,
};
