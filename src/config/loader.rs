//! Configuration file loading.
//!
//! ## Responsibility
//! Read a TOML file from disk, parse it into a [`DashboardConfig`], and run
//! validation before returning.
//!
//! ## Guarantees
//! - A successfully loaded config is always validated
//! - I/O errors and parse errors are distinguished in the error type
//! - File path is included in every error message

use std::path::Path;

use super::validation::{self, ConfigError};
use super::DashboardConfig;

/// Load a [`DashboardConfig`] from a TOML file.
///
/// # Returns
///
/// - `Ok(DashboardConfig)` if the file is readable, well-formed, and valid.
/// - `Err(ConfigError::Io)` if the file cannot be read.
/// - `Err(ConfigError::Parse)` if the TOML is malformed.
/// - `Err(ConfigError::Validation)` if semantic constraints are violated.
pub fn load_from_file(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        file: path.display().to_string(),
        source: e,
    })?;

    load_from_str(&content, &path.display().to_string())
}

/// Load a [`DashboardConfig`] from a TOML string.
///
/// `source_name` identifies the source in error messages.
pub fn load_from_str(content: &str, source_name: &str) -> Result<DashboardConfig, ConfigError> {
    let config: DashboardConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
        file: source_name.to_string(),
        source: e,
    })?;

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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID_TOML: &str = r#"
[server]
base_url = "http://cache.internal:8000"
request_timeout_ms = 5000

[session]
default_identity = "alice"
identities = ["alice", "bob"]
confidence = 0.7

[timing]
poll_interval_ms = 2000

[export]
directory = "/tmp/exports"
"#;

    #[test]
    fn test_load_from_str_valid_toml_succeeds() {
        let config = load_from_str(VALID_TOML, "test").expect("test: valid config");
        assert_eq!(config.server.base_url, "http://cache.internal:8000");
        assert_eq!(config.session.identities.len(), 2);
        assert_eq!(config.timing.toast_ttl_ms, 3000);
    }

    #[test]
    fn test_load_from_str_empty_uses_defaults() {
        let config = load_from_str("", "empty").expect("test: empty config");
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_load_from_str_invalid_toml_returns_parse_error() {
        let result = load_from_str("not valid toml [[[", "bad.toml");
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_load_from_str_invalid_values_returns_validation_error() {
        let toml = "[timing]\npoll_interval_ms = 0\n";
        let err = load_from_str(toml, "zero.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("timing.poll_interval_ms"));
    }

    #[test]
    fn test_load_from_file_reads_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("test: tempfile");
        file.write_all(VALID_TOML.as_bytes())
            .expect("test: write tempfile");
        let config = load_from_file(file.path()).expect("test: load");
        assert_eq!(config.session.default_identity, "alice");
    }

    #[test]
    fn test_load_from_file_missing_returns_io_error() {
        let err = load_from_file(Path::new("/nonexistent/dashboard.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
