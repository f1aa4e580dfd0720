//! Aggregation buffers
//!
//! Every buffer follows the same debounce-with-staleness pattern: each raw
//! event updates a pending entry under a stable key and bumps a generation
//! counter; the timer armed for that key carries the generation it was armed
//! with, and a firing timer only commits when the generations still match.

pub mod click;
pub mod input;
pub mod navigation;

pub use click::{ClickBuffer, ClickRecord, ClickSequence};
pub use input::{InputBuffer, InputKey, InputRejection, PendingInput};
pub use navigation::{NavigationBuffer, PendingNavigation};

/// Timer key of a pending buffer entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BufferKey {
    Navigation,
    Click,
    Input(InputKey),
}
