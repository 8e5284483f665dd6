pub mod chat;
pub mod conversation;
pub mod worker;

pub use chat::ChatSession;
pub use conversation::{ConversationStore, FALLBACK_REPLY};
pub use worker::{GenerationRequest, WorkerHandle};
