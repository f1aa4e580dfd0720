use serde::{Deserialize, Serialize};

use crate::TimestampMs;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

/// Sampled landmark on the page (heading, navigation link).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyElement {
    pub tag: String,
    pub text: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// Snapshot of the page at action time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContext {
    pub url: String,
    pub title: String,
    pub timestamp: TimestampMs,
    pub viewport: Viewport,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub key_elements: Vec<KeyElement>,
}

impl PageContext {
    pub fn minimal(url: impl Into<String>, title: impl Into<String>, timestamp: TimestampMs) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            timestamp,
            ..Default::default()
        }
    }
}
