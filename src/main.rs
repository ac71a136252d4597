#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file.
    // Fails if .env file not found, not readable or invalid.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    cli::run().await
}
