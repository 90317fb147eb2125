//! Tracing setup for applications embedding the SDK.
//!
//! The library itself only emits `tracing` events. Applications that do not install their
//! own subscriber can call [`init_tracing`] (or build a client with `debug` enabled) to get a
//! compact stdout formatter.
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a compact stdout subscriber.
///
/// - Respects `RUST_LOG` for filtering (defaults to `info`, or `aurelio_sdk=debug` when
///   `verbose` is set).
/// - Does nothing if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "info,aurelio_sdk=debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let stdout_layer = fmt::layer().with_target(true).compact();

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(verbose, "Tracing subscriber installed");
    }
}
