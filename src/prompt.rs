use crate::history::format_history_for_prompt;
use crate::models::chat::{ Speaker, Turn };

/// Builds the dialogue prompt from a history window and the live input.
///
/// The window normally ends with the user turn that was just recorded for
/// `current_input`; that turn is dropped here and appended as the cue instead.
pub fn build_prompt(history_window: &[Turn], current_input: &str) -> String {
    let prior = match history_window.split_last() {
        Some((last, rest)) if last.speaker() == Speaker::User && last.text() == current_input => rest,
        _ => history_window,
    };

    let cue = format!("User: {}\nAssistant:", current_input);
    if prior.is_empty() {
        return cue;
    }
    format!("{}\n{}", format_history_for_prompt(prior), cue)
}

/// Instruction-style prompt used for the retry; ignores history.
pub fn build_retry_prompt(current_input: &str) -> String {
    format!("Please answer this question: {}\n\nAnswer:", current_input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_yields_only_cue() {
        assert_eq!(build_prompt(&[], "hi"), "User: hi\nAssistant:");
    }

    #[test]
    fn current_turn_is_not_duplicated() {
        let window = vec![Turn::user("hi")];
        assert_eq!(build_prompt(&window, "hi"), "User: hi\nAssistant:");
    }

    #[test]
    fn prior_turns_precede_cue() {
        let window = vec![Turn::bot("Hello there."), Turn::user("how are you")];
        assert_eq!(
            build_prompt(&window, "how are you"),
            "Assistant: Hello there.\nUser: how are you\nAssistant:"
        );
    }

    #[test]
    fn window_without_current_turn_is_kept_whole() {
        let window = vec![Turn::user("hi"), Turn::bot("Hello.")];
        assert_eq!(
            build_prompt(&window, "bye"),
            "User: hi\nAssistant: Hello.\nUser: bye\nAssistant:"
        );
    }

    #[test]
    fn retry_prompt_format() {
        assert_eq!(
            build_retry_prompt("what is rust"),
            "Please answer this question: what is rust\n\nAnswer:"
        );
    }
}
