//! Headless CacheCraft dashboard.
//!
//! Runs the sync engine and logs a one-line summary of each applied poll.
//! Stops on Ctrl+C.
//!
//! ## Environment Variables
//!
//! - `LOG_FORMAT=json`: structured JSON output
//! - `RUST_LOG=info`: log level filter

use cachecraft_dashboard::cli::{build_api, parse_args, resolve_config};
use cachecraft_dashboard::config::schema_json;
use cachecraft_dashboard::{init_tracing, Action, Coordinator};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_args(std::env::args());
    if cli.print_schema {
        println!("{}", schema_json()?);
        return Ok(());
    }

    let _ = init_tracing();
    let config = resolve_config(&cli)?;
    let api = build_api(&cli, &config);

    let (coordinator, mut handle) = Coordinator::new(config, api);
    let engine = tokio::spawn(coordinator.run());

    let mut last_poll = 0;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, shutting down");
                break;
            }
            changed = handle.changed() => {
                let Ok(view) = changed else { break };
                if view.poll_count == last_poll {
                    continue;
                }
                last_poll = view.poll_count;
                let Some(snapshot) = &view.snapshot else { continue };
                info!(
                    identity = %view.identity,
                    entries = snapshot.cache.len(),
                    miss_rate_pct = view.miss_rate_percent().unwrap_or(0.0),
                    backend = view.distribution.backend,
                    cache = view.distribution.cache,
                    predicted = view.distribution.predicted,
                    api_calls_saved = snapshot.api_calls_saved,
                    "dashboard updated"
                );
            }
        }
    }

    if let Err(e) = handle.dispatch(Action::Shutdown).await {
        warn!(error = %e, "coordinator already stopped");
    }
    engine.await?;
    Ok(())
}
