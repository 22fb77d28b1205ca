//! Core types, configuration, and error handling for the Vigil review gate.
//!
//! This crate provides the shared foundation used by the other Vigil crates:
//! - [`GateError`] — unified error type using `thiserror`
//! - [`GateConfig`] — environment-backed configuration with an optional
//!   `.vigil.toml` overlay for file-path knobs
//! - Shared types: [`VerdictStatus`], [`Severity`], [`Issue`],
//!   [`ReviewVerdict`], [`FileReview`]

mod config;
mod error;
mod types;

pub use config::{FilesConfig, GateConfig, GithubConfig, LlmConfig, REQUIRED_VARS};
pub use error::GateError;
pub use types::{FileReview, Issue, ReviewVerdict, Severity, VerdictStatus};

/// A convenience `Result` type for Vigil operations.
pub type Result<T> = std::result::Result<T, GateError>;
