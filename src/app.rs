//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` (if present)
//! - parses CLI arguments
//! - dispatches to the scoring service or the terminal form

use clap::Parser;

use crate::cli::{Cli, Command, ServeArgs};
use crate::error::AppError;

/// Entry point for the `credit-risk` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `credit-risk` with no arguments opens the form.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    match cli.command {
        Command::Serve(args) => handle_serve(args),
        Command::Form => handle_form(),
    }
}

fn handle_serve(args: ServeArgs) -> Result<(), AppError> {
    init_logging()?;
    crate::service::run(args.into())
}

fn handle_form() -> Result<(), AppError> {
    // The form owns the terminal, so nothing is logged while it runs.
    crate::tui::run()
}

/// `info` by default; `RUST_LOG` (from the environment or `.env`) overrides.
fn init_logging() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()
        .map_err(|e| AppError::usage(format!("Failed to initialize logging: {e}")))
}

/// Rewrite argv so a bare `credit-risk` defaults to `credit-risk form`.
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    if argv.len() <= 1 {
        argv.push("form".to_string());
    }
    argv
}
