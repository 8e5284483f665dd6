use crate::session::conversation::ConversationStore;

/// Minimal surface the chat layers draw onto.
///
/// Keeps the conversation types independent of any particular toolkit: a
/// widget, a plain `Vec` of lines and a test recorder all qualify.
pub trait DisplaySurface {
    /// Add one line at the bottom of the surface.
    fn append_line(&mut self, line: &str);

    /// Remove everything shown so far.
    fn clear(&mut self);
}

impl DisplaySurface for Vec<String> {
    fn append_line(&mut self, line: &str) {
        self.push(line.to_string());
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

/// Re-render the history projection onto `surface`.
///
/// Afterwards the surface shows exactly `store.history_lines()`, nothing
/// else; callers re-run this whenever a turn completes so the displayed list
/// never drifts from the conversation.
pub fn project_history(store: &ConversationStore, surface: &mut dyn DisplaySurface) {
    surface.clear();
    for line in store.history_lines() {
        surface.append_line(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_replaces_previous_contents() -> anyhow::Result<()> {
        let mut store = ConversationStore::new();
        store.append_user("Hi")?;
        store.append_bot("Hello!");

        let mut surface = vec!["stale line".to_string()];
        project_history(&store, &mut surface);
        assert_eq!(surface, ["User: Hi", "Bot: Hello!"]);

        store.append_user("Another")?;
        project_history(&store, &mut surface);
        assert_eq!(surface.len(), 3);
        Ok(())
    }
}
