use crate::core::{ChatError, Turn};
use crate::generation::{GenerationParams, InferenceAdapter};
use crate::session::conversation::ConversationStore;
use crate::session::worker::{self, GenerationRequest, WorkerHandle};

/// A single user's chat with the model.
///
/// Owns the conversation, the generation parameters and the inference
/// worker. UI layers hold one of these and never touch ambient state; the
/// session enforces the busy gate and the turn-failure policy.
pub struct ChatSession {
    conversation: ConversationStore,
    params: GenerationParams,
    worker: WorkerHandle,
    busy: bool,
}

impl ChatSession {
    pub fn new(adapter: Box<dyn InferenceAdapter>) -> Self {
        Self::with_params(adapter, GenerationParams::default())
    }

    pub fn with_params(adapter: Box<dyn InferenceAdapter>, params: GenerationParams) -> Self {
        Self {
            conversation: ConversationStore::new(),
            params,
            worker: worker::spawn(adapter),
            busy: false,
        }
    }

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Whether a reply is still being generated.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Parse and apply new generation settings.
    ///
    /// See [`GenerationParams::update_from_strs`] for the all-or-nothing
    /// semantics.
    pub fn update_params(
        &mut self,
        max_len: &str,
        temperature: &str,
        top_p: &str,
    ) -> Result<(), ChatError> {
        self.params.update_from_strs(max_len, temperature, top_p)
    }

    /// Append the user's message and hand the rendered prompt to the worker.
    ///
    /// Fails with [`ChatError::Busy`] while a reply is pending and
    /// [`ChatError::EmptyInput`] for blank text; both leave the conversation
    /// untouched.
    pub fn submit(&mut self, text: &str) -> Result<(), ChatError> {
        if self.busy {
            return Err(ChatError::Busy);
        }
        self.conversation.append_user(text)?;

        let request = GenerationRequest {
            prompt: self.conversation.build_prompt(),
            params: self.params.clone(),
        };
        if let Err(err) = self.worker.dispatch(request) {
            self.conversation.pop_last();
            return Err(err);
        }
        self.busy = true;
        Ok(())
    }

    /// Check for a finished reply without blocking.
    ///
    /// `None` while generation is still running. On success the bot turn has
    /// been appended and is returned; on failure the pending user turn has
    /// been rolled back, so the conversation is as it was before [`submit`].
    ///
    /// [`submit`]: ChatSession::submit
    pub fn poll_reply(&mut self) -> Option<Result<Turn, ChatError>> {
        if !self.busy {
            return None;
        }
        let result = self.worker.try_reply()?;
        Some(self.finish_turn(result))
    }

    /// Block until the in-flight reply lands, with the same contract as
    /// [`poll_reply`]. Intended for tests and headless drivers; the terminal
    /// front-end polls.
    ///
    /// [`poll_reply`]: ChatSession::poll_reply
    pub fn wait_reply(&mut self) -> Result<Turn, ChatError> {
        if !self.busy {
            return Err(ChatError::Generation("no reply is pending".to_string()));
        }
        let result = self.worker.wait_reply();
        self.finish_turn(result)
    }

    fn finish_turn(&mut self, result: anyhow::Result<String>) -> Result<Turn, ChatError> {
        self.busy = false;
        match result {
            Ok(raw) => Ok(self.conversation.append_bot(&raw)),
            Err(err) => {
                self.conversation.pop_last();
                tracing::warn!(%err, "turn abandoned, user message rolled back");
                Err(ChatError::Generation(err.to_string()))
            }
        }
    }

    /// Drop the whole transcript and start over. Rejected while a reply is
    /// in flight, so a late reply cannot land in a fresh conversation.
    pub fn clear(&mut self) -> Result<(), ChatError> {
        if self.busy {
            return Err(ChatError::Busy);
        }
        self.conversation.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::ScriptedAdapter;

    #[test]
    fn clear_is_rejected_while_busy() -> anyhow::Result<()> {
        let mut session = ChatSession::new(Box::new(ScriptedAdapter::new(["ok"])));
        session.submit("Hi")?;
        assert!(matches!(session.clear(), Err(ChatError::Busy)));
        session.wait_reply()?;
        session.clear()?;
        assert!(session.conversation().is_empty());
        Ok(())
    }
}
