pub mod errors;
pub mod export;
pub mod kv;
pub mod sessions;

pub use errors::{StoreError, StoreErrorKind, StoreResult};
pub use export::{export_jsonl, write_lines, JsonlLine};
pub use kv::{FileKvStore, InMemoryKvStore, KvStore};
pub use sessions::{SessionStore, SESSION_KEY_PREFIX};
