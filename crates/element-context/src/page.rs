use soulbrowser_core_types::{KeyElement, PageContext, TimestampMs, Viewport};
use soulbrowser_privacy::text::{normalize, truncate_chars};

use crate::descriptor::PageContextDescriptor;

const KEY_ELEMENT_TEXT_LEN: usize = 80;

/// Builds the page snapshot attached to an action.
///
/// The event's own `url`/`title`/`timestamp` fill whatever the descriptor
/// leaves out. Key elements without text are skipped and the rest capped at
/// `max_key_elements`.
pub fn build_page_context(
    descriptor: Option<&PageContextDescriptor>,
    url: &str,
    title: Option<&str>,
    timestamp: TimestampMs,
    max_key_elements: usize,
) -> PageContext {
    let Some(desc) = descriptor else {
        return PageContext::minimal(url, title.unwrap_or_default(), timestamp);
    };

    let viewport = desc
        .viewport
        .map(|vp| Viewport {
            width: vp.width,
            height: vp.height,
            scroll_x: vp.scroll_x,
            scroll_y: vp.scroll_y,
        })
        .unwrap_or_default();

    let key_elements = desc
        .key_elements
        .iter()
        .filter_map(|element| {
            let text = element.text.as_deref().map(normalize)?;
            if text.is_empty() {
                return None;
            }
            Some(KeyElement {
                tag: element
                    .tag
                    .as_deref()
                    .map(str::to_ascii_lowercase)
                    .unwrap_or_default(),
                text: truncate_chars(&text, KEY_ELEMENT_TEXT_LEN),
                href: element.href.clone().filter(|href| !href.trim().is_empty()),
            })
        })
        .take(max_key_elements)
        .collect();

    PageContext {
        url: desc
            .url
            .clone()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| url.to_string()),
        title: desc
            .title
            .clone()
            .or_else(|| title.map(str::to_string))
            .unwrap_or_default(),
        timestamp: desc.timestamp.unwrap_or(timestamp),
        viewport,
        user_agent: desc.user_agent.clone(),
        key_elements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{KeyElementDescriptor, ViewportDescriptor};

    #[test]
    fn falls_back_to_event_fields() {
        let ctx = build_page_context(None, "https://example.com", Some("Home"), 42, 10);
        assert_eq!(ctx.url, "https://example.com");
        assert_eq!(ctx.title, "Home");
        assert_eq!(ctx.timestamp, 42);
        assert!(ctx.key_elements.is_empty());
    }

    #[test]
    fn caps_key_elements() {
        let desc = PageContextDescriptor {
            viewport: Some(ViewportDescriptor {
                width: 1280,
                height: 720,
                scroll_x: 0.0,
                scroll_y: 300.0,
            }),
            key_elements: (0..15)
                .map(|idx| KeyElementDescriptor {
                    tag: Some("H2".into()),
                    text: Some(if idx == 0 { " ".into() } else { format!("Heading {idx}") }),
                    href: None,
                })
                .collect(),
            ..Default::default()
        };
        let ctx = build_page_context(Some(&desc), "https://example.com/docs", None, 7, 10);
        assert_eq!(ctx.url, "https://example.com/docs");
        assert_eq!(ctx.viewport.scroll_y, 300.0);
        assert_eq!(ctx.key_elements.len(), 10);
        assert_eq!(ctx.key_elements[0].text, "Heading 1");
        assert_eq!(ctx.key_elements[0].tag, "h2");
    }
}
