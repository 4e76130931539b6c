use chatbot_framework::{
    api::start_server, sentiment::LexiconScorer, service::ConversationService,
    store::ConversationStore,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let db_path = std::env::var("CHATBOT_DB").unwrap_or_else(|_| "chatbot.db".to_string());

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("Chatbot Framework - API Server");
    info!("Database: {}", db_path);
    info!("Port: {}", port);

    // Open the store (creates the database and schema if absent)
    let store = ConversationStore::connect(&db_path).await?;

    // Build the service and hand it to the transport layer
    let service = Arc::new(ConversationService::new(store, Arc::new(LexiconScorer)));

    start_server(service, port).await?;

    Ok(())
}
