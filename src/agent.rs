use crate::history::History;
use crate::llm::generate::{ extract_continuation, GenerationError, TextGenerator };
use crate::llm::GenerationConfig;
use crate::postprocess::{ clean, is_valid };
use crate::prompt::{ build_prompt, build_retry_prompt };

use log::{ debug, error, info, warn };
use std::borrow::Cow;
use std::io::{ self, Write };
use std::sync::Arc;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt };

pub const EXIT_COMMAND: &str = "/exit";
pub const READY_MESSAGE: &str = "Chatbot ready! Type /exit to quit.";
pub const FAREWELL_MESSAGE: &str = "Exiting chatbot. Goodbye!";
pub const FALLBACK_MESSAGE: &str =
    "I'm having trouble understanding. Could you rephrase your question?";
pub const ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

const DEFAULT_HISTORY_WINDOW: usize = 2;
const MIN_RETRY_CHARS: usize = 5;

/// How a user turn was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The primary generation passed validation.
    Accepted(String),
    /// The primary generation was rejected and the simplified retry was usable.
    Retried(String),
    /// Neither attempt produced something worth showing.
    Fallback,
    /// The backend failed.
    Failed,
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Accepted(text) | Reply::Retried(text) => text,
            Reply::Fallback => FALLBACK_MESSAGE,
            Reply::Failed => ERROR_MESSAGE,
        }
    }
}

pub struct ChatAgent {
    generator: Arc<dyn TextGenerator>,
    history: History,
    history_window: usize,
    primary: GenerationConfig,
    retry: GenerationConfig,
}

impl ChatAgent {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            history: History::new(),
            history_window: DEFAULT_HISTORY_WINDOW,
            primary: GenerationConfig::primary(None),
            retry: GenerationConfig::retry(),
        }
    }

    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    pub fn with_generation(mut self, primary: GenerationConfig, retry: GenerationConfig) -> Self {
        self.primary = primary;
        self.retry = retry;
        self
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Answers one user input and records both sides of the exchange.
    ///
    /// Always records exactly one bot turn, whatever the backend does.
    pub async fn respond(&mut self, input: &str) -> Reply {
        self.history.add_user(input);
        let reply = match self.attempt(input).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Generation failed: {}", e);
                Reply::Failed
            }
        };
        self.history.add_bot(reply.text());
        reply
    }

    async fn attempt(&self, input: &str) -> Result<Reply, GenerationError> {
        let prompt = build_prompt(self.history.recent(self.history_window), input);
        let response = self.complete(&prompt, &self.primary).await?;
        if is_valid(&response, input) {
            return Ok(Reply::Accepted(response));
        }

        info!("Rejected response {:?}; retrying with simplified prompt", response);
        let retry_prompt = build_retry_prompt(input);
        let retried = self.complete(&retry_prompt, &self.retry).await?;
        if retried.chars().count() > MIN_RETRY_CHARS {
            Ok(Reply::Retried(retried))
        } else {
            warn!("Retry produced {:?}; using fallback message", retried);
            Ok(Reply::Fallback)
        }
    }

    async fn complete(
        &self,
        prompt: &str,
        config: &GenerationConfig
    ) -> Result<String, GenerationError> {
        debug!("Prompt sent to {}:\n{}", self.generator.get_model(), prompt);
        let generated = self.generator.generate(prompt, config).await?;
        let continuation = extract_continuation(prompt, &generated);
        debug!("Raw continuation: {:?}", continuation);
        Ok(clean(&continuation))
    }

    /// Reads `User: ` lines from `reader` until `/exit` or end of input.
    pub async fn run<R, W>(&mut self, mut reader: R, writer: &mut W) -> io::Result<()>
        where R: AsyncBufRead + Unpin, W: Write
    {
        writeln!(writer, "{}", READY_MESSAGE)?;
        let mut buf = Vec::new();

        loop {
            write!(writer, "User: ")?;
            writer.flush()?;

            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                writeln!(writer)?;
                writeln!(writer, "{}", FAREWELL_MESSAGE)?;
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            if let Cow::Owned(_) = line {
                warn!("Input line was not valid UTF-8; invalid bytes replaced");
            }
            let input = line.trim();

            if input == EXIT_COMMAND {
                writeln!(writer, "{}", FAREWELL_MESSAGE)?;
                break;
            }
            if input.is_empty() {
                continue;
            }

            let reply = self.respond(input).await;
            writeln!(writer, "Bot: {}", reply.text())?;
        }

        info!("Chat session ended after {} turns", self.history.len());
        Ok(())
    }
}
