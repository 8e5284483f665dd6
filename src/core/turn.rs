#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Side of the conversation a turn belongs to.
pub enum Speaker {
    /// The person typing into the chat window.
    User,
    /// The model's half of the dialogue.
    Bot,
}

impl Speaker {
    /// Returns the label used in prompts and display lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Bot => "Bot",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One utterance by either side, in conversation order.
///
/// Turns are immutable once created; the conversation store only ever
/// appends them.
pub struct Turn {
    speaker: Speaker,
    text: String,
}

impl Turn {
    /// Create a turn holding the user's message.
    pub fn user(text: &str) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.to_string(),
        }
    }

    /// Create a turn holding the model's reply.
    pub fn bot(text: &str) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: text.to_string(),
        }
    }

    /// Get the speaker of the turn.
    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    /// Get the text of the turn.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render the turn the way it appears in prompts and the history list,
    /// `"<speaker>: <text>"`.
    pub fn display_line(&self) -> String {
        format!("{}: {}", self.speaker.as_str(), self.text)
    }
}

/// Trait extension for `[Turn]` that provides convenient access to the most
/// recent utterance on each side without verbose iterator chains.
pub trait TurnSliceExt {
    /// Get the text of the last user turn in the conversation.
    ///
    /// # Returns
    /// - `Some(&str)` - The text of the last user turn if found
    /// - `None` - If no user turns exist in the conversation
    fn last_user(&self) -> Option<&str>;

    /// Get the text of the last bot turn in the conversation.
    ///
    /// # Returns
    /// - `Some(&str)` - The text of the last bot turn if found
    /// - `None` - If no bot turns exist in the conversation
    fn last_bot(&self) -> Option<&str>;
}

impl<T: AsRef<[Turn]>> TurnSliceExt for T {
    fn last_user(&self) -> Option<&str> {
        self.as_ref()
            .iter()
            .rev()
            .find(|turn| turn.speaker() == Speaker::User)
            .map(|turn| turn.text())
    }

    fn last_bot(&self) -> Option<&str> {
        self.as_ref()
            .iter()
            .rev()
            .find(|turn| turn.speaker() == Speaker::Bot)
            .map(|turn| turn.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_line_format() {
        assert_eq!(Turn::user("Hi").display_line(), "User: Hi");
        assert_eq!(Turn::bot("Hello there").display_line(), "Bot: Hello there");
    }

    #[test]
    fn test_turn_slice_ext_last_user() {
        let turns = vec![
            Turn::user("First question"),
            Turn::bot("First answer"),
            Turn::user("Second question"),
        ];

        assert_eq!(turns.last_user(), Some("Second question"));
    }

    #[test]
    fn test_turn_slice_ext_last_bot() {
        let turns = vec![
            Turn::user("Question"),
            Turn::bot("First answer"),
            Turn::user("Follow up"),
            Turn::bot("Second answer"),
        ];

        assert_eq!(turns.last_bot(), Some("Second answer"));
    }

    #[test]
    fn test_turn_slice_ext_empty() {
        let turns: Vec<Turn> = vec![];
        assert_eq!(turns.last_user(), None);
        assert_eq!(turns.last_bot(), None);
    }
}
