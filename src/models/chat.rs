use serde::{ Serialize, Deserialize };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

impl Speaker {
    /// Role label used when a turn is rendered into a prompt.
    pub fn role_label(&self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Bot => "Assistant",
        }
    }
}

/// A single utterance. Fields are private so a turn cannot change once recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    speaker: Speaker,
    text: String,
}

impl Turn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self { speaker, text: text.into() }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Speaker::Bot, text)
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
