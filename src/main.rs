use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video_summarizer::cli::{Cli, Commands};
use video_summarizer::config::Config;
use video_summarizer::pipeline::SummaryPipeline;
use video_summarizer::web;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "video_summarizer=debug,tower_http=debug"
    } else {
        "video_summarizer=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let pipeline = SummaryPipeline::new(&config)?;

            tracing::info!(
                models = %config.gemini.models.join(","),
                languages = %config.transcript.languages.join(","),
                "Starting web UI"
            );

            web::serve(pipeline, &bind).await?;
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                println!("Configuration is read from config.yaml, .env and the environment.");
                println!("Run with --show to print the effective values.");
            }
        }
    }

    Ok(())
}
