//! Command-line parsing.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! service and the form. Neither the model path nor the form's service URL is
//! configurable here: both are fixed.

use clap::{Args, Parser, Subcommand};

use crate::service::ServeConfig;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "credit-risk",
    version,
    about = "Loan default risk: scoring service and terminal form"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the model and serve `/health` and `/predict`.
    Serve(ServeArgs),
    /// Launch the interactive borrower form.
    ///
    /// The form posts to the scoring service at http://127.0.0.1:8000.
    Form,
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Interface to bind.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind.
    #[arg(short = 'p', long, default_value_t = 8000)]
    pub port: u16,

    /// Number of worker threads (defaults to one per core).
    #[arg(long)]
    pub workers: Option<usize>,
}

impl From<ServeArgs> for ServeConfig {
    fn from(args: ServeArgs) -> Self {
        ServeConfig {
            host: args.host,
            port: args.port,
            workers: args.workers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults_match_the_form_url() {
        let cli = Cli::try_parse_from(["credit-risk", "serve"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let config = ServeConfig::from(args);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.workers, None);
    }

    #[test]
    fn serve_accepts_bind_overrides() {
        let cli =
            Cli::try_parse_from(["credit-risk", "serve", "--host", "0.0.0.0", "-p", "9000", "--workers", "2"])
                .unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.host, "0.0.0.0");
        assert_eq!(args.port, 9000);
        assert_eq!(args.workers, Some(2));
    }

    #[test]
    fn form_takes_no_url() {
        assert!(Cli::try_parse_from(["credit-risk", "form", "--url", "http://x"]).is_err());
    }
}
