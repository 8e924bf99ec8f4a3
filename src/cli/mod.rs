//! CLI module for Kiln
//!
//! Provides commands:
//! - `generate`: Generate code for an application
//! - `history`: Page through an application's chat history
//! - `reset`: Delete an application's history and cached sessions

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

pub mod generate;
pub mod history;

/// Kiln code generator CLI
#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(about = "Conversational web code generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate code for an application
    Generate {
        /// Application id
        #[arg(long)]
        app: i64,
        /// Requesting user id
        #[arg(long, default_value_t = 1)]
        user: i64,
        /// Output type: html, multi_file or vue_project
        #[arg(long = "type", default_value = "html")]
        code_gen_type: String,
        /// What to build or change
        prompt: String,
    },
    /// Show chat history, newest first
    History {
        /// Application id
        #[arg(long)]
        app: i64,
        /// Entries per page (1-50)
        #[arg(long, default_value_t = 10)]
        page_size: usize,
        /// Only entries created before this RFC 3339 timestamp
        #[arg(long)]
        before: Option<DateTime<Utc>>,
    },
    /// Delete history and cached sessions of an application
    Reset {
        /// Application id
        #[arg(long)]
        app: i64,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Generate {
            app,
            user,
            code_gen_type,
            prompt,
        }) => generate::run(app, user, &code_gen_type, prompt).await,
        Some(Commands::History {
            app,
            page_size,
            before,
        }) => history::run(app, page_size, before).await,
        Some(Commands::Reset { app }) => history::reset(app).await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "kiln",
            "generate",
            "--app",
            "3",
            "--type",
            "vue_project",
            "a todo app",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Generate {
                app,
                user,
                code_gen_type,
                prompt,
            }) => {
                assert_eq!(app, 3);
                assert_eq!(user, 1);
                assert_eq!(code_gen_type, "vue_project");
                assert_eq!(prompt, "a todo app");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_history_cursor() {
        let cli = Cli::try_parse_from([
            "kiln",
            "history",
            "--app",
            "3",
            "--before",
            "2026-01-02T03:04:05Z",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::History { before: Some(_), page_size: 10, .. })
        ));
    }
}
