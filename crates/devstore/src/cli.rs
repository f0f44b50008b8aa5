//! Clap derive structures for the `devstore` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use devstore_core::TimeUnit;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// devstore -- device documents and API channel readiness
#[derive(Debug, Parser)]
#[command(
    name = "devstore",
    version,
    about = "Encode and decode device documents, and wait for API channels",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, env = "DEVSTORE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit single-line JSON instead of pretty-printed output
    #[arg(long, global = true)]
    pub compact: bool,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert a device (JSON) into its stored document (extended JSON)
    Encode(InputArgs),

    /// Convert a stored document (extended JSON) back into a device (JSON)
    Decode(InputArgs),

    /// Wait for a TCP endpoint to accept connections
    Wait(WaitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input file; reads stdin when omitted or "-"
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct WaitArgs {
    /// Endpoint address, e.g. 127.0.0.1:8080 or localhost:8080
    pub addr: String,

    /// How long to wait, in --unit (defaults to channel.timeout_ms)
    #[arg(long, short = 't', visible_alias = "timeout-ms")]
    pub timeout: Option<u64>,

    /// Unit of --timeout: ns, us, ms, s, m, h, d
    #[arg(long, short = 'u', default_value = "ms")]
    pub unit: TimeUnit,

    /// Pause between connection attempts in milliseconds
    /// (defaults to channel.probe_interval_ms)
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
