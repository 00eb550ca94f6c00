use crate::models::chat::{ Speaker, Turn };

/// Append-only conversation log owned by the chat loop.
///
/// Storage grows for the lifetime of the process; reads go through
/// [`History::recent`], which only ever looks at the tail.
#[derive(Debug, Default, Clone)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    pub fn record(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.turns.push(Turn::new(speaker, text));
    }

    pub fn add_user(&mut self, text: impl Into<String>) {
        self.record(Speaker::User, text);
    }

    pub fn add_bot(&mut self, text: impl Into<String>) {
        self.record(Speaker::Bot, text);
    }

    /// Last `limit` turns in insertion order, or all of them when fewer exist.
    pub fn recent(&self, limit: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(limit);
        &self.turns[start..]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}

/// Renders turns as `Role: text` lines joined by newlines.
pub fn format_history_for_prompt(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}", turn.speaker().role_label(), turn.text()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> History {
        let mut history = History::new();
        for i in 0..n {
            if i % 2 == 0 {
                history.add_user(format!("u{}", i));
            } else {
                history.add_bot(format!("b{}", i));
            }
        }
        history
    }

    #[test]
    fn recent_returns_tail_in_order() {
        for total in 0..7 {
            let history = filled(total);
            for limit in 0..9 {
                let window = history.recent(limit);
                let expected = limit.min(total);
                assert_eq!(window.len(), expected, "total={} limit={}", total, limit);
                assert_eq!(window, &history.turns()[total - expected..]);
            }
        }
    }

    #[test]
    fn recent_does_not_mutate() {
        let history = filled(5);
        let _ = history.recent(2);
        let _ = history.recent(10);
        assert_eq!(history.len(), 5);
    }

    #[test]
    fn record_preserves_speaker_and_text() {
        let mut history = History::new();
        history.record(Speaker::User, "hi");
        history.record(Speaker::Bot, "hello");
        assert_eq!(history.turns()[0], Turn::user("hi"));
        assert_eq!(history.turns()[1], Turn::bot("hello"));
    }

    #[test]
    fn format_uses_role_labels() {
        let turns = vec![Turn::user("hi"), Turn::bot("hello")];
        assert_eq!(format_history_for_prompt(&turns), "User: hi\nAssistant: hello");
        assert_eq!(format_history_for_prompt(&[]), "");
    }
}
