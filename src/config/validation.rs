//! Configuration validation engine.
//!
//! ## Responsibility
//! Validate semantic constraints on a parsed [`DashboardConfig`] that cannot
//! be expressed through the type system alone (range checks, URL scheme).
//!
//! ## Guarantees
//! - Every validation rule has at least one test that triggers it
//! - Validation collects *all* errors before returning (no short-circuit)
//! - Error messages include the field path and the invalid value
//!
//! ## NOT Responsible For
//! - Parsing TOML (that belongs to `loader`)
//! - File I/O (that belongs to `loader`)

use super::{DashboardConfig, CONFIDENCE_MAX, CONFIDENCE_MIN};

/// Errors arising from configuration parsing, validation, or I/O.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parsing failed.
    #[error("Parse error in {file}: {source}")]
    Parse {
        /// Path of the file that failed to parse.
        file: String,
        /// Underlying TOML deserialization error.
        #[source]
        source: toml::de::Error,
    },

    /// One or more semantic validation rules failed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A specific field has an out-of-range or contradictory value.
    #[error("Field '{field}' has invalid value {value}: {reason}")]
    InvalidField {
        /// Dot-separated field path (e.g., "timing.poll_interval_ms").
        field: String,
        /// String representation of the invalid value.
        value: String,
        /// Human-readable explanation of the constraint.
        reason: String,
    },

    /// File I/O error.
    #[error("IO error reading {file}: {source}")]
    Io {
        /// Path of the file that could not be read.
        file: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Validate all semantic constraints on a [`DashboardConfig`].
///
/// # Returns
///
/// - `Ok(())` if all constraints pass.
/// - `Err(Vec<ConfigError>)` with every violation found.
pub fn validate(config: &DashboardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // ── Server ───────────────────────────────────────────────────────
    let url = config.server.base_url.trim();
    if url.is_empty() {
        errors.push(ConfigError::InvalidField {
            field: "server.base_url".into(),
            value: "\"\"".into(),
            reason: "must not be empty".into(),
        });
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(ConfigError::InvalidField {
            field: "server.base_url".into(),
            value: url.to_string(),
            reason: "must start with http:// or https://".into(),
        });
    }

    if config.server.request_timeout_ms == 0 {
        errors.push(zero_field("server.request_timeout_ms"));
    }

    // ── Session ──────────────────────────────────────────────────────
    if config.session.default_identity.trim().is_empty() {
        errors.push(ConfigError::InvalidField {
            field: "session.default_identity".into(),
            value: "\"\"".into(),
            reason: "must not be empty".into(),
        });
    }

    if let Some(blank) = config
        .session
        .identities
        .iter()
        .position(|id| id.trim().is_empty())
    {
        errors.push(ConfigError::InvalidField {
            field: format!("session.identities[{blank}]"),
            value: "\"\"".into(),
            reason: "must not be empty".into(),
        });
    }

    let conf = config.session.confidence;
    if !(CONFIDENCE_MIN..=CONFIDENCE_MAX).contains(&conf) {
        errors.push(ConfigError::InvalidField {
            field: "session.confidence".into(),
            value: conf.to_string(),
            reason: format!("must be between {CONFIDENCE_MIN} and {CONFIDENCE_MAX}"),
        });
    }

    // ── Timing ───────────────────────────────────────────────────────
    let timing = &config.timing;
    for (field, value) in [
        ("timing.poll_interval_ms", timing.poll_interval_ms),
        ("timing.clock_tick_ms", timing.clock_tick_ms),
        ("timing.toast_ttl_ms", timing.toast_ttl_ms),
    ] {
        if value == 0 {
            errors.push(zero_field(field));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn zero_field(field: &str) -> ConfigError {
    ConfigError::InvalidField {
        field: field.into(),
        value: "0".into(),
        reason: "must be greater than 0".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_names(errors: &[ConfigError]) -> Vec<String> {
        errors
            .iter()
            .filter_map(|e| match e {
                ConfigError::InvalidField { field, .. } => Some(field.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&DashboardConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let mut cfg = DashboardConfig::default();
        cfg.server.base_url = "  ".into();
        let errors = validate(&cfg).unwrap_err();
        assert_eq!(field_names(&errors), vec!["server.base_url"]);
    }

    #[test]
    fn test_base_url_without_scheme_rejected() {
        let mut cfg = DashboardConfig::default();
        cfg.server.base_url = "localhost:8000".into();
        let errors = validate(&cfg).unwrap_err();
        assert!(errors[0].to_string().contains("http://"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut cfg = DashboardConfig::default();
        cfg.server.request_timeout_ms = 0;
        let errors = validate(&cfg).unwrap_err();
        assert_eq!(field_names(&errors), vec!["server.request_timeout_ms"]);
    }

    #[test]
    fn test_blank_identity_rejected() {
        let mut cfg = DashboardConfig::default();
        cfg.session.default_identity = String::new();
        cfg.session.identities = vec!["alice".into(), " ".into()];
        let names = field_names(&validate(&cfg).unwrap_err());
        assert!(names.contains(&"session.default_identity".to_string()));
        assert!(names.contains(&"session.identities[1]".to_string()));
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        let mut cfg = DashboardConfig::default();
        cfg.session.confidence = 0.99;
        let names = field_names(&validate(&cfg).unwrap_err());
        assert_eq!(names, vec!["session.confidence"]);
    }

    #[test]
    fn test_zero_intervals_all_reported() {
        let mut cfg = DashboardConfig::default();
        cfg.timing.poll_interval_ms = 0;
        cfg.timing.clock_tick_ms = 0;
        cfg.timing.toast_ttl_ms = 0;
        let errors = validate(&cfg).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_zero_refresh_window_allowed() {
        let mut cfg = DashboardConfig::default();
        cfg.timing.refresh_min_visible_ms = 0;
        assert!(validate(&cfg).is_ok());
    }
}
