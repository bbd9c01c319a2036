use dietary_assist::app::DietaryAssistant;
use dietary_assist::channels::CliChannel;
use dietary_assist::chat::ChatOrchestrator;
use dietary_assist::config::AssistantConfig;
use dietary_assist::llm::create_provider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the chat
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AssistantConfig::from_env()?;

    eprintln!("🥗 Dietary Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Ollama: {}", config.ollama_url);
    eprintln!("   Model: {} (temperature {})", config.model, config.temperature);
    eprintln!("   Type /sair to exit.\n");

    let llm = create_provider(&config);
    let orchestrator = ChatOrchestrator::from_config(llm, &config);

    let mut assistant = DietaryAssistant::new(CliChannel::new(), orchestrator);
    assistant.run().await?;

    Ok(())
}
