use crate::core::{ChatError, Turn};

/// Reply shown when the model produces nothing usable.
pub const FALLBACK_REPLY: &str = "I'm not sure.";

/// Continuation cue appended to every prompt so the model speaks next.
const BOT_CUE: &str = "Bot:";

/// Ordered dialogue history for one chat session.
///
/// The store is append-only: turns enter through [`append_user`] and
/// [`append_bot`] and are never edited afterwards. Everything shown to the
/// user is a projection of [`turns`], and every prompt sent to the model is
/// the deterministic join produced by [`build_prompt`].
///
/// [`append_user`]: ConversationStore::append_user
/// [`append_bot`]: ConversationStore::append_bot
/// [`turns`]: ConversationStore::turns
/// [`build_prompt`]: ConversationStore::build_prompt
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All turns so far, in conversation order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append the user's message.
    ///
    /// The text is trimmed before it is stored. Empty or whitespace-only
    /// input is rejected with [`ChatError::EmptyInput`] and the store is left
    /// unchanged.
    pub fn append_user(&mut self, text: &str) -> Result<(), ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        tracing::debug!(chars = text.len(), "user turn appended");
        self.turns.push(Turn::user(text));
        Ok(())
    }

    /// Render the full transcript as the next model prompt.
    ///
    /// Pure function of the current turns: each turn on its own line,
    /// followed by the `"Bot:"` cue for the model to continue.
    pub fn build_prompt(&self) -> String {
        let mut prompt = String::new();
        for turn in &self.turns {
            prompt.push_str(&turn.display_line());
            prompt.push('\n');
        }
        prompt.push_str(BOT_CUE);
        prompt
    }

    /// Append the model's reply from its raw output.
    ///
    /// The prompt the model was shown is stripped off the front when the
    /// output echoes it verbatim; otherwise the whole output is kept. The
    /// remainder is trimmed, and if nothing is left the fixed
    /// [`FALLBACK_REPLY`] is stored instead, so an empty turn can never
    /// appear. Returns the appended turn.
    pub fn append_bot(&mut self, raw: &str) -> Turn {
        // Nothing has mutated the store since the prompt was dispatched, so
        // recomputing the join yields the exact string the model saw.
        let prompt = self.build_prompt();
        let reply = raw.strip_prefix(&prompt).unwrap_or(raw).trim();
        let text = if reply.is_empty() {
            tracing::debug!("empty model output, substituting fallback reply");
            FALLBACK_REPLY
        } else {
            reply
        };
        let turn = Turn::bot(text);
        self.turns.push(turn.clone());
        turn
    }

    /// Display strings for the history pane, one per turn, in order.
    ///
    /// Lazy and restartable: each call walks the turns from the beginning.
    pub fn history_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.turns.iter().map(Turn::display_line)
    }

    /// Drop the whole transcript.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Remove the newest turn. Used by the session to undo a user turn whose
    /// generation failed.
    pub(crate) fn pop_last(&mut self) -> Option<Turn> {
        self.turns.pop()
    }
}
