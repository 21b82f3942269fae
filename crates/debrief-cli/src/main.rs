//! debrief: run candidate interviews and summarize them.
//!
//! Usage:
//!   debrief interview [--no-llm] [--skip-faq]
//!   debrief summarize --answers answers.json [--no-llm] [--json]
//!   debrief faq
//!
//! Configuration comes from `--config <file.yaml>` plus environment
//! variables; a `.env` file in the working directory is loaded first.

mod cli;
mod commands;
mod console;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use debrief_core::SessionStore;

use cli::{Cli, Commands};
use commands::interview::InterviewRun;
use commands::AppContext;
use console::Console;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debrief=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Interview { no_llm, skip_faq } => {
            let ctx = AppContext::load(config_path, no_llm)?;
            let summarizer = ctx.summarizer();
            let responder = if skip_faq { None } else { ctx.faq_responder() };
            if !skip_faq && responder.is_none() {
                tracing::info!("Model disabled, skipping candidate Q&A");
            }
            let store = SessionStore::new(&ctx.config.paths.sessions);

            let run = InterviewRun {
                summarizer: &summarizer,
                responder: responder.as_ref(),
                store: &store,
            };
            run.run(&mut Console::stdio()).await?;
            ctx.log_usage();
        }

        Commands::Summarize {
            answers,
            no_llm,
            json,
        } => {
            let ctx = AppContext::load(config_path, no_llm)?;
            let text = commands::summarize::summarize_file(&ctx.summarizer(), &answers, json).await?;
            println!("{}", text);
            ctx.log_usage();
        }

        Commands::Faq => {
            let ctx = AppContext::load(config_path, false)?;
            let responder = ctx
                .faq_responder()
                .context("FAQ answers need a model backend; set summary.use_llm to true")?;
            commands::faq::run(&mut Console::stdio(), &responder).await?;
            ctx.log_usage();
        }
    }

    Ok(())
}
