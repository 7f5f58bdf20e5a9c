//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable carrying the deploy base path.
pub const BASE_URL_ENV: &str = "BASE_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, honouring `BASE_URL`.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    load_config_with_base(path, std::env::var(BASE_URL_ENV).ok())
}

/// Load and validate configuration from a TOML file with an explicit base override.
pub fn load_config_with_base(
    path: &Path,
    base_override: Option<String>,
) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content, base_override)?;
    tracing::debug!(path = %path.display(), routes = config.routes.len(), "Configuration loaded");
    Ok(config)
}

/// Load the file if one is given, otherwise start from the defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<RouterConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => finish(RouterConfig::default(), std::env::var(BASE_URL_ENV).ok()),
    }
}

/// Parse, apply the base override and validate.
pub fn parse_config(content: &str, base_override: Option<String>) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = toml::from_str(content)?;
    finish(config, base_override)
}

fn finish(mut config: RouterConfig, base_override: Option<String>) -> Result<RouterConfig, ConfigError> {
    apply_base_override(&mut config, base_override);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Replace the history base with a non-empty deploy value.
pub fn apply_base_override(config: &mut RouterConfig, base: Option<String>) {
    if let Some(base) = base.filter(|b| !b.trim().is_empty()) {
        tracing::debug!(base = %base, "History base taken from environment");
        config.history.base = base;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_base_override() {
        let config = parse_config("[history]\nbase = \"/\"", Some("/lab/".into())).unwrap();
        assert_eq!(config.history.base, "/lab/");

        let config = parse_config("[history]\nbase = \"/app/\"", Some("  ".into())).unwrap();
        assert_eq!(config.history.base, "/app/");
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            parse_config("routes = 3", None),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_error_lists_everything() {
        let err = parse_config(
            r#"
            [[routes]]
            name = "a"
            path = "/"
            view = "home"

            [[routes]]
            name = "a"
            path = "/x"
            view = "home"
            "#,
            None,
        )
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::DuplicateName("a".into())]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "experiments = [\"resize\"]").unwrap();

        let config = load_config_with_base(file.path(), None).unwrap();
        assert_eq!(config.experiments, vec!["resize"]);
        assert_eq!(config.routes.len(), 3);
        assert_eq!(config.history.base, "/");
    }

    #[test]
    fn test_base_override_beats_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[history]\nbase = \"/from-file/\"").unwrap();

        let config = load_config_with_base(file.path(), Some("/deployed/".into())).unwrap();
        assert_eq!(config.history.base, "/deployed/");

        let config = load_config_with_base(file.path(), None).unwrap();
        assert_eq!(config.history.base, "/from-file/");
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_config(Path::new("/definitely/not/here.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
