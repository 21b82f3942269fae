//! Command-line argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Interview candidates and summarize their answers.
#[derive(Parser, Debug)]
#[command(name = "debrief")]
#[command(version, about = "Interview candidates and summarize their answers", long_about = None)]
pub struct Cli {
    /// YAML configuration file (environment variables still apply on top)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive text interview, then summarize and save it
    Interview {
        /// Build the template summary without calling a model
        #[arg(long)]
        no_llm: bool,

        /// Skip the candidate Q&A after the interview
        #[arg(long)]
        skip_faq: bool,
    },

    /// Summarize a stored answer set or session file
    Summarize {
        /// JSON file with an answers object, or a saved session
        #[arg(long, value_name = "FILE")]
        answers: PathBuf,

        /// Build the template summary without calling a model
        #[arg(long)]
        no_llm: bool,

        /// Print the structured record and markdown as JSON
        #[arg(long)]
        json: bool,
    },

    /// Answer questions about the program from the FAQ
    Faq,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interview_flags() {
        let cli = Cli::try_parse_from(["debrief", "interview", "--no-llm", "--skip-faq"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Interview {
                no_llm: true,
                skip_faq: true
            }
        ));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from([
            "debrief",
            "summarize",
            "--answers",
            "answers.json",
            "--json",
            "--config",
            "debrief.yaml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("debrief.yaml")));
        match cli.command {
            Commands::Summarize {
                answers,
                no_llm,
                json,
            } => {
                assert_eq!(answers, PathBuf::from("answers.json"));
                assert!(!no_llm);
                assert!(json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_summarize_requires_answers() {
        assert!(Cli::try_parse_from(["debrief", "summarize"]).is_err());
    }
}
