use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::generation::GenerationParams;

/// Boundary into the pretrained model.
///
/// `generate` receives the fully rendered prompt and the caller's sampling
/// parameters and returns the model's raw output. Decoder-style models echo
/// the prompt back in front of the new text; callers must be prepared for
/// either shape. The call may take arbitrary latency, and a returned error
/// fails the current turn only, never the process.
pub trait InferenceAdapter: Send {
    fn generate(&mut self, prompt: &str, params: &GenerationParams) -> anyhow::Result<String>;
}

/// Adapter that replays a fixed sequence of raw outputs.
///
/// Intended for tests and headless drivers: each `generate` call pops the
/// next queued output, and the adapter fails once the script runs dry.
#[derive(Debug, Default)]
pub struct ScriptedAdapter {
    outputs: VecDeque<String>,
}

impl ScriptedAdapter {
    pub fn new<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            outputs: outputs.into_iter().map(Into::into).collect(),
        }
    }

    /// Queue one more raw output at the end of the script.
    pub fn push(&mut self, output: impl Into<String>) {
        self.outputs.push_back(output.into());
    }
}

impl InferenceAdapter for ScriptedAdapter {
    fn generate(&mut self, _prompt: &str, _params: &GenerationParams) -> anyhow::Result<String> {
        self.outputs
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("scripted adapter has no outputs left"))
    }
}

const REPLY_SHAPES: &[&str] = &[
    "Interesting, tell me more.",
    "Why do you say \"{}\"?",
    "I see. What makes you bring up \"{}\"?",
    "That makes sense to me.",
    "Let's stay on \"{}\" for a moment.",
];

/// Self-contained stand-in for a real conversational model.
///
/// Picks one of a few canned reply shapes around the last user utterance,
/// seeded so runs are reproducible. Like a decoder-style model it repeats
/// the prompt before the new text, and it honors `max_len` by cutting the
/// reply off at that many characters.
#[derive(Debug)]
pub struct EchoAdapter {
    rng: StdRng,
}

impl EchoAdapter {
    pub fn new() -> Self {
        Self::seeded(299792458)
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for EchoAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl InferenceAdapter for EchoAdapter {
    fn generate(&mut self, prompt: &str, params: &GenerationParams) -> anyhow::Result<String> {
        let utterance = prompt
            .lines()
            .rev()
            .find_map(|line| line.strip_prefix("User: "))
            .unwrap_or("")
            .trim();

        let mut reply = if utterance.is_empty() {
            REPLY_SHAPES[0].to_string()
        } else {
            let shape = REPLY_SHAPES[self.rng.random_range(0..REPLY_SHAPES.len())];
            shape.replace("{}", utterance)
        };

        if let Some((cut, _)) = reply.char_indices().nth(params.max_len) {
            reply.truncate(cut);
        }

        Ok(format!("{prompt} {reply}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_adapter_replays_in_order_then_fails() {
        let params = GenerationParams::default();
        let mut adapter = ScriptedAdapter::new(["first", "second"]);
        assert_eq!(adapter.generate("p", &params).unwrap(), "first");
        assert_eq!(adapter.generate("p", &params).unwrap(), "second");
        assert!(adapter.generate("p", &params).is_err());
    }

    #[test]
    fn echo_adapter_is_deterministic_for_a_seed() -> anyhow::Result<()> {
        let params = GenerationParams::default();
        let prompt = "User: Hello\nBot:";
        let a = EchoAdapter::seeded(7).generate(prompt, &params)?;
        let b = EchoAdapter::seeded(7).generate(prompt, &params)?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn echo_adapter_repeats_the_prompt_prefix() -> anyhow::Result<()> {
        let params = GenerationParams::default();
        let prompt = "User: Hello\nBot:";
        let raw = EchoAdapter::new().generate(prompt, &params)?;
        assert!(raw.starts_with(prompt));
        assert!(raw.len() > prompt.len());
        Ok(())
    }

    #[test]
    fn echo_adapter_honors_max_len() -> anyhow::Result<()> {
        let params = GenerationParams::new(5, 0.7, 0.95)?;
        let prompt = "User: a very long message that would produce a long reply\nBot:";
        let raw = EchoAdapter::new().generate(prompt, &params)?;
        let reply = raw.strip_prefix(prompt).unwrap().trim_start();
        assert!(reply.chars().count() <= 5);
        Ok(())
    }
}
