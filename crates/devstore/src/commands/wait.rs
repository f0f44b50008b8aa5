//! `devstore wait`: block until a TCP endpoint accepts connections.

use std::net::SocketAddr;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use devstore_config::Config;
use devstore_core::{ApiChannel, AvailabilityGate, TcpProbeChannel, TimeUnit};

use crate::cli::{GlobalOpts, WaitArgs};
use crate::error::CliError;

pub async fn handle(args: &WaitArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let addr = resolve_addr(&args.addr).await?;

    let interval = args
        .interval_ms
        .map_or_else(|| cfg.channel.probe_interval(), Duration::from_millis);
    if interval.is_zero() {
        return Err(CliError::Validation {
            field: "interval-ms".into(),
            reason: "must be greater than zero".into(),
        });
    }

    let (amount, unit) = match args.timeout {
        Some(amount) => (amount, args.unit),
        None => (cfg.channel.timeout_ms, TimeUnit::Milliseconds),
    };

    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let gate = AvailabilityGate::new(TcpProbeChannel::spawn(addr, interval))
        .with_cancellation(cancel);
    let outcome = gate.wait_for_available(amount, unit).await;
    ctrl_c.abort();
    outcome?;

    if !global.quiet {
        println!("{} is available", gate.channel().name());
    }
    Ok(())
}

/// Resolve `host:port`, taking the first address the resolver returns.
async fn resolve_addr(raw: &str) -> Result<SocketAddr, CliError> {
    let invalid = |reason: String| CliError::Validation {
        field: "addr".into(),
        reason,
    };

    tokio::net::lookup_host(raw)
        .await
        .map_err(|e| invalid(format!("cannot resolve '{raw}': {e}")))?
        .next()
        .ok_or_else(|| invalid(format!("'{raw}' resolved to no addresses")))
}
