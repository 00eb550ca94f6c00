pub mod agent;
pub mod models;
pub mod cli;
pub mod history;
pub mod llm;
pub mod postprocess;
pub mod prompt;

use agent::ChatAgent;
use cli::Args;
use llm::generate::new_client;
use log::info;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let llm_config = args.llm_config()?;
    let generator = new_client(&llm_config)?;

    info!("--- Core Configuration ---");
    info!("Backend: {}", llm_config.llm_type);
    info!("Model: {}", generator.get_model());
    info!("Base URL: {}", generator.get_base_url().as_deref().unwrap_or("adapter default"));
    info!("Token Provided: {}", llm_config.api_key.is_some());
    info!("History Window: {}", args.history_window);
    info!("Primary Sampling: {:?}", args.primary_generation());
    info!("Retry Sampling: {:?}", args.retry_generation());
    info!("-------------------------");

    let mut agent = ChatAgent::new(generator)
        .with_history_window(args.history_window)
        .with_generation(args.primary_generation(), args.retry_generation());

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    agent.run(stdin, &mut stdout).await?;

    Ok(())
}
