//! Bedtime CLI binary.
//!
//! This binary provides command-line access to bedtime:
//! - Tell a story from a recorded model stream, optionally narrated
//! - Print the prompt a request would send
//! - Show the effective configuration

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, show_config, show_prompt, tell_story};

    // Load .env before anything reads the environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    bedtime::init_console_telemetry(cli.verbose)?;

    match cli.command {
        Commands::Tell(args) => {
            tell_story(args).await?;
        }

        Commands::Prompt { story, revise } => {
            show_prompt(story, revise.as_deref())?;
        }

        Commands::Config => {
            show_config()?;
        }
    }

    Ok(())
}
