//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod ask;
pub mod health;
pub mod sessions;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::api::backend::HttpBackend;
use crate::cli::ask::run_ask;
use crate::cli::health::run_health;
use crate::cli::sessions::run_sessions;
use crate::cli::settings::{apply_set, apply_unset};
use crate::core::config::Config;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::init_file_logging;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "policy-navigator")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "A terminal client for the Education Policy Knowledge Assistant")]
#[command(
    long_about = "Policy Navigator is a full-screen terminal client for an education-policy \
question answering service. Ask questions about federal education requirements, optionally \
attach a URL for the backend to read, and keep several conversations as saved sessions.\n\n\
Environment Variables:\n\
  POLICY_NAVIGATOR_BACKEND_URL   Backend base URL (defaults to http://localhost:5000)\n\
  RUST_LOG                       Log filter used with --log-file (defaults to info)\n\n\
Controls:\n\
  Enter             Send the question\n\
  Shift+Enter       New line in the question\n\
  Tab / Shift+Tab   Move between question, URL and sessions\n\
  Ctrl+N            New session\n\
  Ctrl+D            Delete the current session (press twice)\n\
  Ctrl+L            Clear the conversation\n\
  Ctrl+T            Switch light/dark theme\n\
  Alt+1..3          Ask an example question\n\
  PageUp/PageDown   Scroll the conversation\n\
  Ctrl+C            Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL (overrides the environment and config file)
    #[arg(short = 'b', long, global = true, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Write diagnostic logs to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Ask a single question and print the answer
    Ask {
        /// The question to ask
        #[arg(trailing_var_arg = true, required = true)]
        question: Vec<String>,
        /// Page for the backend to read alongside the question
        #[arg(short = 'u', long)]
        url: Option<String>,
    },
    /// List saved sessions
    Sessions,
    /// Check that the backend is reachable
    Health,
    /// Set configuration values (backend-url, theme)
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_file_logging(args.log_file.as_deref())?;
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    match args.command.unwrap_or(Commands::Chat) {
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let Some(key) = key else {
                config.print_all();
                return Ok(());
            };
            match apply_set(&mut config, &key, &value) {
                Ok(message) => {
                    config.save()?;
                    println!("{message}");
                    Ok(())
                }
                Err(err) => {
                    err.print();
                    std::process::exit(1);
                }
            }
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            match apply_unset(&mut config, &key) {
                Ok(message) => {
                    config.save()?;
                    println!("{message}");
                    Ok(())
                }
                Err(err) => {
                    err.print();
                    std::process::exit(1);
                }
            }
        }
        Commands::Ask { question, url } => {
            let config = Config::load()?;
            let backend_url = config.resolve_backend_url(args.backend_url.as_deref());
            run_ask(&backend_url, question, url).await
        }
        Commands::Sessions => {
            let config = Config::load()?;
            let backend_url = config.resolve_backend_url(args.backend_url.as_deref());
            run_sessions(&backend_url).await
        }
        Commands::Health => {
            let config = Config::load()?;
            let backend_url = config.resolve_backend_url(args.backend_url.as_deref());
            run_health(&backend_url).await
        }
        Commands::Chat => {
            let config_path = Config::get_config_path()?;
            let config = Config::load_from_path(&config_path)?;
            let backend_url = config.resolve_backend_url(args.backend_url.as_deref());
            info!(%backend_url, "starting chat");
            let backend = Arc::new(HttpBackend::new(&backend_url));
            run_chat(backend, Some(config_path), config.is_dark_theme()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_chat() {
        let args = Args::try_parse_from(["policy-navigator"]).expect("parse");
        assert_eq!(args.command, None);
    }

    #[test]
    fn ask_collects_words_and_url() {
        let args = Args::try_parse_from([
            "policy-navigator",
            "ask",
            "--url",
            "https://ed.gov",
            "What",
            "is",
            "ESSA?",
        ])
        .expect("parse");
        assert_eq!(
            args.command,
            Some(Commands::Ask {
                question: vec!["What".into(), "is".into(), "ESSA?".into()],
                url: Some("https://ed.gov".into()),
            })
        );
    }

    #[test]
    fn ask_requires_a_question() {
        assert!(Args::try_parse_from(["policy-navigator", "ask"]).is_err());
    }

    #[test]
    fn backend_url_is_global() {
        let args = Args::try_parse_from([
            "policy-navigator",
            "health",
            "--backend-url",
            "http://policy.example",
        ])
        .expect("parse");
        assert_eq!(args.command, Some(Commands::Health));
        assert_eq!(args.backend_url.as_deref(), Some("http://policy.example"));
    }

    #[test]
    fn set_takes_key_and_value() {
        let args =
            Args::try_parse_from(["policy-navigator", "set", "theme", "dark"]).expect("parse");
        assert_eq!(
            args.command,
            Some(Commands::Set {
                key: Some("theme".into()),
                value: vec!["dark".into()],
            })
        );
    }
}
