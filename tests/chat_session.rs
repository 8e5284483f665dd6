// Integration tests for the chat session
// This is a separate crate that tests the public API

use std::time::Duration;

use confab::generation::{GenerationParams, InferenceAdapter, ScriptedAdapter};
use confab::session::ChatSession;
use confab::{ChatError, Speaker, TurnSliceExt, FALLBACK_REPLY};

#[test]
fn full_turn_appends_user_and_bot_in_order() -> anyhow::Result<()> {
    let mut session = ChatSession::new(Box::new(ScriptedAdapter::new(["Hello yourself!"])));

    session.submit("Hi")?;
    let turn = session.wait_reply()?;
    assert_eq!(turn.speaker(), Speaker::Bot);
    assert_eq!(turn.text(), "Hello yourself!");

    let turns = session.conversation().turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns.last_user(), Some("Hi"));
    assert_eq!(turns.last_bot(), Some("Hello yourself!"));

    let lines: Vec<String> = session.conversation().history_lines().collect();
    assert_eq!(lines, ["User: Hi", "Bot: Hello yourself!"]);
    Ok(())
}

#[test]
fn echoed_prompt_is_stripped_from_the_reply() -> anyhow::Result<()> {
    // The scripted output repeats the prompt the way a decoder-style model
    // does; only the continuation may end up in the conversation.
    let mut session = ChatSession::new(Box::new(ScriptedAdapter::new([
        "User: Hi\nBot: I am fine",
    ])));

    session.submit("Hi")?;
    let turn = session.wait_reply()?;
    assert_eq!(turn.text(), "I am fine");
    Ok(())
}

#[test]
fn empty_model_output_becomes_the_fallback_reply() -> anyhow::Result<()> {
    let mut session = ChatSession::new(Box::new(ScriptedAdapter::new(["   "])));

    session.submit("Hi")?;
    let turn = session.wait_reply()?;
    assert_eq!(turn.text(), FALLBACK_REPLY);
    Ok(())
}

#[test]
fn blank_submission_is_rejected_without_state_change() {
    let mut session = ChatSession::new(Box::new(ScriptedAdapter::default()));

    let result = session.submit("   ");
    assert!(matches!(result, Err(ChatError::EmptyInput)));
    assert!(session.conversation().is_empty());
    assert!(!session.is_busy());
}

#[test]
fn generation_failure_rolls_back_the_user_turn() -> anyhow::Result<()> {
    // An exhausted script makes the adapter fail on the first call.
    let mut session = ChatSession::new(Box::new(ScriptedAdapter::default()));

    session.submit("Hi")?;
    let result = session.wait_reply();
    assert!(matches!(result, Err(ChatError::Generation(_))));
    assert!(session.conversation().is_empty());
    assert!(!session.is_busy());

    // The session stays usable after a failed turn.
    session.submit("Hi again")?;
    Ok(())
}

#[test]
fn second_submit_while_busy_is_rejected() -> anyhow::Result<()> {
    let mut session = ChatSession::new(Box::new(ScriptedAdapter::new(["ok", "ok again"])));

    session.submit("First")?;
    let result = session.submit("Second");
    assert!(matches!(result, Err(ChatError::Busy)));
    assert_eq!(session.conversation().len(), 1);

    session.wait_reply()?;
    session.submit("Second")?;
    session.wait_reply()?;
    assert_eq!(session.conversation().len(), 4);
    Ok(())
}

struct SlowAdapter;

impl InferenceAdapter for SlowAdapter {
    fn generate(&mut self, _prompt: &str, _params: &GenerationParams) -> anyhow::Result<String> {
        std::thread::sleep(Duration::from_millis(30));
        Ok("done".to_string())
    }
}

#[test]
fn polling_resolves_once_the_worker_finishes() -> anyhow::Result<()> {
    let mut session = ChatSession::new(Box::new(SlowAdapter));

    session.submit("Hi")?;
    assert!(session.is_busy());

    let outcome = loop {
        if let Some(outcome) = session.poll_reply() {
            break outcome;
        }
        std::thread::sleep(Duration::from_millis(5));
    };
    assert_eq!(outcome?.text(), "done");
    assert!(!session.is_busy());
    Ok(())
}

#[test]
fn settings_update_is_atomic_across_fields() -> anyhow::Result<()> {
    let mut session = ChatSession::new(Box::new(ScriptedAdapter::default()));

    let result = session.update_params("-5", "0.7", "0.9");
    assert!(matches!(result, Err(ChatError::InvalidSettings(_))));
    assert_eq!(session.params().max_len, 256);
    assert_eq!(session.params().temperature, 0.7);
    assert_eq!(session.params().top_p, 0.95);

    session.update_params("128", "0.9", "0.8")?;
    assert_eq!(session.params().max_len, 128);
    Ok(())
}

#[test]
fn prompt_growth_matches_the_transcript() -> anyhow::Result<()> {
    let mut session = ChatSession::new(Box::new(ScriptedAdapter::new(["Hello!", "A story."])));

    session.submit("Hi")?;
    session.wait_reply()?;
    session.submit("Tell me a story")?;
    session.wait_reply()?;

    assert_eq!(
        session.conversation().build_prompt(),
        "User: Hi\nBot: Hello!\nUser: Tell me a story\nBot: A story.\nBot:"
    );
    Ok(())
}
