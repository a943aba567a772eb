//! Conversation history and persona for one conversation.
//!
//! # Window units
//!
//! The window `W` counts **exchanges**: one user turn plus one assistant
//! turn. `assemble` includes at most `2 * W` history turns, taken from the
//! end. A history shorter than that is included whole.

use std::num::NonZeroUsize;

use voyager_core::message::Turn;

/// Ordered, append-only conversation state plus the active persona.
#[derive(Debug, Clone)]
pub struct ContextStore {
    persona: String,
    history: Vec<Turn>,
    window: NonZeroUsize,
}

impl ContextStore {
    pub fn new(persona: impl Into<String>, window: NonZeroUsize) -> Self {
        Self {
            persona: persona.into(),
            history: Vec::new(),
            window,
        }
    }

    pub fn add_user(&mut self, text: impl Into<String>) {
        self.history.push(Turn::user(text));
    }

    pub fn add_assistant(&mut self, text: impl Into<String>) {
        self.history.push(Turn::assistant(text));
    }

    /// Replace the persona. Affects every later `assemble`.
    pub fn set_persona(&mut self, persona: impl Into<String>) {
        self.persona = persona.into();
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// The full history, oldest first.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn window(&self) -> NonZeroUsize {
        self.window
    }

    /// Maximum number of history turns an assembled prompt carries.
    pub fn max_history_turns(&self) -> usize {
        self.window.get().saturating_mul(2)
    }

    /// Build the prompt for one generation call.
    ///
    /// Order: persona, reasoning directive, optional `<tool_context>` note,
    /// then the windowed history. A blank `transient` is treated as absent.
    /// Pure: the store is not modified.
    pub fn assemble(&self, directive: &str, transient: Option<&str>) -> Vec<Turn> {
        let start = self.history.len().saturating_sub(self.max_history_turns());
        let recent = &self.history[start..];

        let mut prompt = Vec::with_capacity(recent.len() + 3);
        prompt.push(Turn::system(self.persona.as_str()));
        prompt.push(Turn::system(directive));

        if let Some(context) = transient.map(str::trim).filter(|c| !c.is_empty()) {
            prompt.push(Turn::system(tool_context_note(context)));
        }

        prompt.extend_from_slice(recent);
        prompt
    }
}

/// Wrap a formatted tool fragment as a transient system note.
pub fn tool_context_note(context: &str) -> String {
    format!("<tool_context>\n{context}\n</tool_context>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use voyager_core::message::Role;

    fn window(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn store_with_exchanges(w: usize, exchanges: usize) -> ContextStore {
        let mut store = ContextStore::new("persona", window(w));
        for i in 0..exchanges {
            store.add_user(format!("q{i}"));
            store.add_assistant(format!("a{i}"));
        }
        store
    }

    #[test]
    fn prefix_order() {
        let mut store = ContextStore::new("persona", window(2));
        store.add_user("hi");

        let prompt = store.assemble("directive", Some("Weather in Tokyo: 22°C, partly cloudy."));
        assert_eq!(prompt.len(), 4);
        assert_eq!(prompt[0], Turn::system("persona"));
        assert_eq!(prompt[1], Turn::system("directive"));
        assert_eq!(prompt[2].role, Role::System);
        assert!(prompt[2].content.starts_with("<tool_context>"));
        assert!(prompt[2].content.contains("22°C"));
        assert_eq!(prompt[3], Turn::user("hi"));
    }

    #[test]
    fn long_history_is_cut_to_two_w() {
        for w in 1..=4 {
            let store = store_with_exchanges(w, 10);
            let prompt = store.assemble("d", None);
            assert_eq!(prompt.len(), 2 + 2 * w, "window {w}");
            // The last history turn is always the newest
            assert_eq!(prompt.last().unwrap().content, "a9");
            assert_eq!(prompt[2].content, format!("q{}", 10 - w));
        }
    }

    #[test]
    fn short_history_is_included_whole() {
        let mut store = store_with_exchanges(8, 2);
        store.add_user("pending");
        let prompt = store.assemble("d", None);
        assert_eq!(prompt.len(), 2 + 5);
        assert_eq!(&prompt[2..], store.history());
    }

    #[test]
    fn odd_history_counts_turns_not_exchanges() {
        // 3 exchanges + an open user turn, W = 1: the last two turns
        let mut store = store_with_exchanges(1, 3);
        store.add_user("now");
        let prompt = store.assemble("d", None);
        let tail: Vec<_> = prompt[2..].iter().map(|t| t.content.as_str()).collect();
        assert_eq!(tail, vec!["a2", "now"]);
    }

    #[test]
    fn blank_transient_is_absent() {
        let store = store_with_exchanges(2, 1);
        assert_eq!(store.assemble("d", Some("   ")), store.assemble("d", None));
    }

    #[test]
    fn assemble_is_idempotent_and_pure() {
        let store = store_with_exchanges(2, 5);
        let before = store.history().to_vec();
        let a = store.assemble("d", Some("ctx"));
        let b = store.assemble("d", Some("ctx"));
        assert_eq!(a, b);
        assert_eq!(store.history(), before.as_slice());
    }

    #[test]
    fn set_persona_affects_later_assembles_only() {
        let mut store = store_with_exchanges(2, 1);
        let earlier = store.assemble("d", None);
        store.set_persona("You are a pirate travel guide.");
        let later = store.assemble("d", None);

        assert_eq!(earlier[0].content, "persona");
        assert_eq!(later[0].content, "You are a pirate travel guide.");
        assert_eq!(later.iter().filter(|t| t.role == Role::System).count(), 2);
    }
}
