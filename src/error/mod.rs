//! Error types for the expansion notifier.
//!
//! Each domain (configuration, BGG API access, notification delivery) has
//! its own `thiserror` enum, aggregated into a single [`Error`] so the
//! pipeline can propagate everything with `?`.

pub mod bgg;
pub mod config;
pub mod notify;

use thiserror::Error;

pub use bgg::BggError;
pub use config::ConfigError;
pub use notify::NotifyError;

/// Main error type for the expansion notifier.
///
/// Aggregates the domain-specific error types via `thiserror`'s `#[from]`
/// attribute so underlying errors convert automatically with the `?`
/// operator. The top level prints the error and exits non-zero.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables,
    /// unreadable ignore-list files).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// BGG API error (retry budget exhausted, transport failure, or a
    /// response that could not be parsed).
    #[error(transparent)]
    BggError(#[from] BggError),
    /// Notification delivery error.
    #[error(transparent)]
    NotifyError(#[from] NotifyError),
    /// A batch size of zero was requested.
    #[error("Batch size must be at least 1, got {0}")]
    InvalidChunkSize(usize),
}
