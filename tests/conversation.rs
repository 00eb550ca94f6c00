use async_trait::async_trait;
use chatbot::agent::{ ChatAgent, ERROR_MESSAGE, FALLBACK_MESSAGE, FAREWELL_MESSAGE, READY_MESSAGE };
use chatbot::llm::generate::{ GenerationError, TextGenerator };
use chatbot::llm::GenerationConfig;
use chatbot::models::chat::Speaker;
use std::sync::Arc;

/// Answers based on the prompt alone, the way a deterministic model would.
struct KeywordGenerator;

#[async_trait]
impl TextGenerator for KeywordGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _config: &GenerationConfig
    ) -> Result<String, GenerationError> {
        let continuation = if prompt.ends_with("User: hello\nAssistant:") {
            " Hello! Nice to meet you.\nUser: and then"
        } else if prompt.starts_with("Please answer this question: weather") {
            " Answer: It looks sunny today."
        } else if prompt.contains("User: weather") {
            " la la la la la la"
        } else if prompt.contains("crash") {
            return Err(GenerationError::EmptyResponse);
        } else {
            " ..."
        };
        Ok(format!("{}{}", prompt, continuation))
    }

    fn get_model(&self) -> String {
        "keyword".to_string()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }
}

#[tokio::test]
async fn full_session_transcript() {
    let mut agent = ChatAgent::new(Arc::new(KeywordGenerator));
    let input = "hello\n\nweather\ncrash please\nmumble\n/exit\nnever read\n";
    let mut out = Vec::new();

    agent.run(input.as_bytes(), &mut out).await.unwrap();

    let expected = format!(
        "{ready}\n\
         User: Bot: Hello.\n\
         User: User: Bot: It looks sunny today.\n\
         User: Bot: {error}\n\
         User: Bot: {fallback}\n\
         User: {farewell}\n",
        ready = READY_MESSAGE,
        error = ERROR_MESSAGE,
        fallback = FALLBACK_MESSAGE,
        farewell = FAREWELL_MESSAGE
    );
    assert_eq!(String::from_utf8(out).unwrap(), expected);

    let turns = agent.history().turns();
    assert_eq!(turns.len(), 8);
    let speakers: Vec<Speaker> = turns.iter().map(|t| t.speaker()).collect();
    assert_eq!(
        speakers,
        vec![
            Speaker::User,
            Speaker::Bot,
            Speaker::User,
            Speaker::Bot,
            Speaker::User,
            Speaker::Bot,
            Speaker::User,
            Speaker::Bot
        ]
    );
    assert_eq!(turns[3].text(), "It looks sunny today.");
}
