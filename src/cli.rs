//! Command-line handling shared by both binaries.
//!
//! Flags are hand-parsed; unknown arguments are ignored.
//!
//! | Flag | Meaning |
//! |------|---------|
//! | `--config <path>` | TOML config file |
//! | `--base-url <url>` | override `server.base_url` |
//! | `--user <id>` | override `session.default_identity` |
//! | `--mock` | use the in-memory backend instead of HTTP |
//! | `--log-file <path>` | log destination of the terminal dashboard |
//! | `--print-schema` | print the config JSON Schema and exit |

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::client::{DashboardApi, HttpDashboardApi};
use crate::config::loader;
use crate::config::validation::{self, ConfigError};
use crate::config::DashboardConfig;
use crate::mock::MockBackend;

/// Default log file of the terminal dashboard.
pub const DEFAULT_LOG_FILE: &str = "cachecraft-tui.log";

/// Parsed command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    /// Config file to load.
    pub config: Option<PathBuf>,
    /// Base URL override.
    pub base_url: Option<String>,
    /// Startup identity override.
    pub user: Option<String>,
    /// Use [`MockBackend`].
    pub mock: bool,
    /// Log file path (terminal dashboard only).
    pub log_file: PathBuf,
    /// Print the config schema and exit.
    pub print_schema: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            config: None,
            base_url: None,
            user: None,
            mock: false,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            print_schema: false,
        }
    }
}

/// Parses arguments, skipping the program name.
pub fn parse_args<I>(args: I) -> CliArgs
where
    I: IntoIterator<Item = String>,
{
    let mut cli = CliArgs::default();
    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => cli.config = args.next().map(PathBuf::from),
            "--base-url" => cli.base_url = args.next(),
            "--user" => cli.user = args.next(),
            "--mock" => cli.mock = true,
            "--log-file" => {
                if let Some(path) = args.next() {
                    cli.log_file = PathBuf::from(path);
                }
            }
            "--print-schema" => cli.print_schema = true,
            _ => {} // Ignore unknown args
        }
    }
    cli
}

/// Loads the config file (or defaults), applies CLI overrides and validates
/// the result.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be loaded or the final config
/// is invalid.
pub fn resolve_config(cli: &CliArgs) -> Result<DashboardConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => loader::load_from_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(url) = &cli.base_url {
        config.server.base_url = url.clone();
    }
    if let Some(user) = &cli.user {
        config.session.default_identity = user.clone();
    }
    validation::validate(&config).map_err(|errors| {
        ConfigError::Validation(
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    })?;
    Ok(config)
}

/// Builds the API implementation selected by `--mock`.
pub fn build_api(cli: &CliArgs, config: &DashboardConfig) -> Arc<dyn DashboardApi> {
    if cli.mock {
        info!("using in-memory mock backend");
        Arc::new(MockBackend::new().with_latency(std::time::Duration::from_millis(120)))
    } else {
        info!(base_url = %config.server.base_url, "using HTTP backend");
        Arc::new(HttpDashboardApi::new(
            config.server.base_url.clone(),
            config.request_timeout(),
        ))
    }
}
