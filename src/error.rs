//! Error types for the callback bridge.
//!
//! Report operations never fail. These errors only come out of lifecycle
//! calls: installing the global bridge, starting or stopping a frame clock,
//! talking to a host clipboard and saving recordings.

use thiserror::Error;

/// Result type alias for callbridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up or tearing down the bridge.
#[derive(Debug, Error)]
pub enum Error {
    /// A process-wide bridge has already been installed.
    #[error("a global bridge is already installed")]
    AlreadyInstalled,

    /// The frame clock is not running.
    #[error("frame clock is not running")]
    NotRunning,

    /// Thread-related error.
    #[error("thread error: {0}")]
    ThreadError(String),

    /// The host clipboard service failed.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// Other errors.
    #[error("{0}")]
    Other(String),
}
