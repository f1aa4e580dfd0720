///! Semantic Classifier - taxonomy and admission for recorded actions
///!
///! Pure, total functions over candidate actions:
///! - raw event kind to action type mapping
///! - intent inference from a fixed decision table
///! - significance and quality gates
///! - human-readable action descriptions
pub mod describe;
pub mod gate;
pub mod intent;
pub mod keywords;
pub mod kinds;

// Re-exports
pub use describe::{describe_action, target_phrase};
pub use gate::{admit, is_low_quality, is_semantically_significant, is_whitelisted_key, Admission};
pub use intent::infer_intent;
pub use kinds::{action_type_for_kind, KindFamily};
