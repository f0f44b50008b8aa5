//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with help text and
//! a distinct process exit code per failure class.

use miette::Diagnostic;
use thiserror::Error;

use devstore_config::ConfigError;
use devstore_core::{ChannelError, DecodeError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_AVAILABLE: i32 = 3;
    pub const DECODE: i32 = 4;
    pub const CONFIG: i32 = 5;
    /// 128 + SIGINT, as shells report an interrupted command.
    pub const CANCELLED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Channel ──────────────────────────────────────────────────────

    #[error("API channel '{channel}' not available after {waited_ms}ms")]
    #[diagnostic(
        code(devstore::not_available),
        help(
            "Check that the endpoint is up and reachable, or wait longer.\n\
             Try: devstore wait <ADDR> --timeout 30 --unit s"
        )
    )]
    NotAvailable { channel: String, waited_ms: u128 },

    #[error("Wait for '{channel}' was cancelled")]
    #[diagnostic(code(devstore::cancelled))]
    Cancelled { channel: String },

    // ── Documents ────────────────────────────────────────────────────

    #[error("Document does not decode as a device")]
    #[diagnostic(
        code(devstore::decode),
        help("A stored field holds a value of the wrong kind; fix or remove it.")
    )]
    Decode(#[from] DecodeError),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(devstore::json), help("Check the JSON input and try again."))]
    Json(#[from] serde_json::Error),

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(devstore::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(devstore::config),
        help("Fix the configuration file or the DEVSTORE_* environment variables.")
    )]
    Config(#[from] ConfigError),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotAvailable { .. } => exit_code::NOT_AVAILABLE,
            Self::Cancelled { .. } => exit_code::CANCELLED,
            Self::Decode(_) | Self::Json(_) => exit_code::DECODE,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Config(_) => exit_code::CONFIG,
            Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── ChannelError → CliError mapping ──────────────────────────────────

impl From<ChannelError> for CliError {
    fn from(err: ChannelError) -> Self {
        match err {
            ChannelError::ApiNotAvailable { channel, waited } => CliError::NotAvailable {
                channel,
                waited_ms: waited.as_millis(),
            },
            ChannelError::Cancelled { channel } => CliError::Cancelled { channel },
        }
    }
}
