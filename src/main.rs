use anyhow::Result;
use bag_courier::cli::{run, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a .env file next to the config.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt::init();
    tracing::info!("bag-courier startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    let result = run(cli).await;
    match &result {
        Ok(_) => tracing::info!("bag-courier finished"),
        Err(e) => tracing::error!(error = %e, "bag-courier exited with error"),
    }
    result
}
