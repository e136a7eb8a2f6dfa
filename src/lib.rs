//! `credit-risk` library crate.
//!
//! The binary (`credit-risk`) is a thin wrapper around this library so that:
//!
//! - the service handlers and the form logic are testable without spawning processes
//! - the integration tests can start the service in-process

pub mod app;
pub mod cli;
pub mod client;
pub mod domain;
pub mod error;
pub mod form;
pub mod models;
pub mod service;
pub mod tui;
