use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "summarizer",
    about = "Video Summarizer - Summarize YouTube videos from their caption transcripts using Gemini",
    version,
    long_about = "A small web UI that takes a YouTube link, fetches the video's caption transcript and asks Google Gemini for a bullet-point summary. Set GOOGLE_API_KEY in the environment or a .env file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web UI
    Serve {
        /// Address to listen on (overrides config and SUMMARIZER_BIND)
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Show the effective configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}
