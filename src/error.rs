//! Process-level errors.
//!
//! Anything that should stop the binary ends up as an `AppError`, which `main`
//! prints to stderr before exiting with the carried code. Request-level failures
//! of the scoring service never reach this type; see `service::PredictError`.

/// Bad command line or environment.
pub const EXIT_USAGE: u8 = 2;
/// The model artifact is missing or cannot be loaded.
pub const EXIT_MODEL_LOAD: u8 = 3;
/// Terminal setup, drawing or input failed.
pub const EXIT_TERMINAL: u8 = 4;
/// The HTTP server could not bind or stopped with an error.
pub const EXIT_SERVER: u8 = 5;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, message)
    }

    pub fn model_load(message: impl Into<String>) -> Self {
        Self::new(EXIT_MODEL_LOAD, message)
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self::new(EXIT_TERMINAL, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(EXIT_SERVER, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
