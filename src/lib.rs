pub mod core;
pub mod generation;
pub mod session;
pub mod ui;

// Re-export the types most callers want without the module paths.
pub use self::core::{ChatError, Speaker, Turn, TurnSliceExt};
pub use self::generation::{EchoAdapter, GenerationParams, InferenceAdapter, ScriptedAdapter};
pub use self::session::{ChatSession, ConversationStore, FALLBACK_REPLY};
