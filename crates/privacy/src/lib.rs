pub mod detect;
pub mod errors;
pub mod mask;
pub mod policy;
pub mod text;

pub use detect::{classify_sensitive, FieldHints};
pub use errors::{PrivacyError, PrivacyResult};
pub use mask::{mask_value, protect_value, protect_value_with};
pub use policy::{current_policy, set_policy, PrivacyPolicyHandle, PrivacyPolicyView};
