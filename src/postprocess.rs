//! Cleanup and quality checks for raw model continuations.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

const MIN_RESPONSE_CHARS: usize = 3;
const MAX_RESPONSE_CHARS: usize = 200;
const REPETITION_MIN_WORDS: usize = 3;
const MIN_DISTINCT_WORD_RATIO: f64 = 0.5;

// `.` stops at a newline, so a hallucinated user turn is cut to the end of its line.
static USER_TURN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bUser:.*").unwrap());
static ROLE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:Assistant|Bot):").unwrap());
static LEADING_LABEL: Lazy<Regex> = Lazy::new(||
    Regex::new(r"(?i)^\s*(?:answer|response):\s*").unwrap()
);
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?](?:\s+|$)").unwrap());
static NON_PRINTABLE: Lazy<Regex> = Lazy::new(||
    Regex::new(r"[\p{Cc}\p{Cf}\p{Co}\p{Cn}\p{Zl}\p{Zp}]").unwrap()
);

/// Strips dialogue artifacts and keeps only the first sentence.
pub fn clean(raw_text: &str) -> String {
    if raw_text.is_empty() {
        return String::new();
    }

    let text = USER_TURN.replace_all(raw_text, "");
    let text = ROLE_MARKER.replace_all(&text, "");
    let text = LEADING_LABEL.replace(&text, "");

    let mut sentence = match
        SENTENCE_END.split(text.trim())
            .map(str::trim)
            .find(|segment| !segment.is_empty())
    {
        Some(segment) => segment.to_string(),
        None => return String::new(),
    };
    if !sentence.ends_with(&['.', '!', '?'][..]) {
        sentence.push('.');
    }

    let collapsed = sentence.split_whitespace().collect::<Vec<_>>().join(" ");
    // Removing a lone invisible character can leave a double space behind.
    NON_PRINTABLE.replace_all(&collapsed, "").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Quality gate for a cleaned response.
pub fn is_valid(text: &str, _user_input: &str) -> bool {
    let char_count = text.chars().count();
    if char_count < MIN_RESPONSE_CHARS || char_count > MAX_RESPONSE_CHARS {
        return false;
    }

    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    if words.len() > REPETITION_MIN_WORDS {
        let distinct = words.iter().collect::<HashSet<_>>().len();
        if (distinct as f64) < (words.len() as f64) * MIN_DISTINCT_WORD_RATIO {
            return false;
        }
    }

    text.chars().any(char::is_alphabetic)
}
