use thiserror::Error;

/// Errors surfaced by the chat session and its parts.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The submitted message was empty or whitespace-only. The conversation
    /// is left unchanged.
    #[error("message text is empty")]
    EmptyInput,

    /// Settings input failed to parse or fell outside the accepted range.
    /// The previous configuration is left untouched.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// A reply is still being generated; the submission was rejected rather
    /// than queued.
    #[error("a reply is still being generated")]
    Busy,

    /// The inference call failed. The pending user turn has been rolled back,
    /// so the conversation is as it was before the submission.
    #[error("generation failed: {0}")]
    Generation(String),
}
