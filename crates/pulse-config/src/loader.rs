//! Config file discovery and layered loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` → base
//! 2. Merge `~/.pulse/config.toml` (user)
//! 3. Merge the file given with `--config` (explicit)
//! 4. Apply env var fallbacks for fields no file set
//! 5. Deserialize merged tree → `Config`
//! 6. Validate

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, deep_merge_tracking, record_leaves};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// A loaded configuration plus where each value came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The final configuration.
    pub config: Config,
    /// Layer that set each dotted field path.
    pub field_sources: FieldSources,
    /// Config files that were found and merged, in order.
    pub loaded_files: Vec<String>,
}

impl ResolvedConfig {
    /// Render the configuration as TOML. The token is never included.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SerializeError`] if rendering fails.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(&self.config)?)
    }

    /// Which layer set `field`, if any.
    #[must_use]
    pub fn source_of(&self, field: &str) -> Option<&ConfigLayer> {
        self.field_sources.get(field)
    }
}

/// Load the configuration with layered precedence.
///
/// `config_file` is an explicit file that overlays the user config and must
/// exist. `pulse_home_override` replaces the `~/.pulse` directory.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is unreadable or
/// malformed, or if the merged configuration fails validation.
pub fn load(
    config_file: Option<&Path>,
    pulse_home_override: Option<&Path>,
) -> ConfigResult<ResolvedConfig> {
    let pulse_home = match pulse_home_override {
        Some(dir) => dir.to_path_buf(),
        None => home_directory()?.join(".pulse"),
    };
    load_layers(&pulse_home, config_file, &collect_env_vars())
}

/// [`load`] with an explicit home directory and environment.
///
/// # Errors
///
/// See [`load`].
pub fn load_layers<S: ::std::hash::BuildHasher>(
    pulse_home: &Path,
    config_file: Option<&Path>,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<ResolvedConfig> {
    // 1. Embedded defaults.
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;

    let mut field_sources = FieldSources::new();
    let mut loaded_files = Vec::new();
    record_leaves(&merged, "", &ConfigLayer::Defaults, &mut field_sources);

    // 2. User config. Missing is fine.
    let user_path = pulse_home.join("config.toml");
    if let Some(overlay) = try_load_file(&user_path)? {
        deep_merge_tracking(&mut merged, &overlay, "", &ConfigLayer::User, &mut field_sources);
        loaded_files.push(user_path.display().to_string());
        info!(path = %user_path.display(), "loaded user config");
    }

    // 3. Explicit config. Missing is an error.
    if let Some(path) = config_file {
        let overlay = try_load_file(path)?.ok_or_else(|| ConfigError::ReadError {
            path: path.display().to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })?;
        deep_merge_tracking(
            &mut merged,
            &overlay,
            "",
            &ConfigLayer::Explicit,
            &mut field_sources,
        );
        loaded_files.push(path.display().to_string());
        info!(path = %path.display(), "loaded config file");
    }

    // 4. Env var fallbacks.
    let env_count = apply_env_fallbacks(&mut merged, &mut field_sources, env_vars);
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    // 5. Deserialize.
    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged config>".to_owned(),
                source: e,
            })?;

    // 6. Validate.
    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// Try to load a file, returning `None` if it doesn't exist.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    // Checked after reading so there is no gap between stat and read.
    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {} byte limit",
                content.len(),
                MAX_CONFIG_FILE_SIZE
            ),
        });
    }

    let value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(Some(value))
}

/// Determine the user's home directory.
fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}

#[cfg(test)]
mod tests {
    use pulse_test::{test_dir, write_file};

    use super::*;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn defaults_deserialize_to_default_config() {
        let parsed: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        let built = Config::default();
        assert_eq!(parsed.gateway.url, built.gateway.url);
        assert_eq!(parsed.gateway.intents, built.gateway.intents);
        assert_eq!(parsed.gateway.properties.browser, built.gateway.properties.browser);
        assert_eq!(parsed.reconnect.delay_ms, built.reconnect.delay_ms);
        assert_eq!(parsed.logging.format, built.logging.format);
    }

    #[test]
    fn load_without_files_uses_defaults() {
        let home = test_dir();
        let resolved = load_layers(home.path(), None, &no_env()).unwrap();

        assert!(resolved.loaded_files.is_empty());
        assert_eq!(resolved.config.gateway.url, "wss://gateway.discord.gg");
        assert_eq!(resolved.source_of("gateway.url"), Some(&ConfigLayer::Defaults));
        assert!(resolved.config.gateway.token.is_none());
    }

    #[test]
    fn user_file_overlays_defaults() {
        let home = test_dir();
        write_file(home.path(), "config.toml", "[reconnect]\ndelay_ms = 5000\n");

        let resolved = load_layers(home.path(), None, &no_env()).unwrap();
        assert_eq!(resolved.config.reconnect.delay_ms, 5000);
        assert!(resolved.config.reconnect.enabled);
        assert_eq!(resolved.source_of("reconnect.delay_ms"), Some(&ConfigLayer::User));
        assert_eq!(resolved.loaded_files.len(), 1);
    }

    #[test]
    fn explicit_file_overlays_user_file() {
        let home = test_dir();
        write_file(home.path(), "config.toml", "[logging]\nlevel = \"warn\"\nformat = \"json\"\n");
        let extra = write_file(home.path(), "extra.toml", "[logging]\nlevel = \"debug\"\n");

        let resolved = load_layers(home.path(), Some(&extra), &no_env()).unwrap();
        assert_eq!(resolved.config.logging.level, "debug");
        assert_eq!(resolved.config.logging.format, "json");
        assert_eq!(resolved.source_of("logging.level"), Some(&ConfigLayer::Explicit));
        assert_eq!(resolved.loaded_files.len(), 2);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let home = test_dir();
        let missing = home.path().join("nope.toml");

        let result = load_layers(home.path(), Some(&missing), &no_env());
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn env_fills_fields_files_left_unset() {
        let home = test_dir();
        write_file(home.path(), "config.toml", "[gateway]\nurl = \"ws://127.0.0.1:9000\"\n");

        let vars = env(&[
            ("PULSE_TOKEN", "env-token"),
            ("PULSE_GATEWAY_URL", "ws://ignored"),
            ("PULSE_RECONNECT_DELAY_MS", "750"),
        ]);
        let resolved = load_layers(home.path(), None, &vars).unwrap();

        assert_eq!(resolved.config.gateway.token.as_deref(), Some("env-token"));
        assert_eq!(resolved.config.gateway.url, "ws://127.0.0.1:9000");
        assert_eq!(resolved.config.reconnect.delay_ms, 750);
        assert_eq!(resolved.source_of("gateway.token"), Some(&ConfigLayer::Environment));
    }

    #[test]
    fn file_token_beats_env_token() {
        let home = test_dir();
        write_file(home.path(), "config.toml", "[gateway]\ntoken = \"file-token\"\n");

        let vars = env(&[("PULSE_TOKEN", "env-token")]);
        let resolved = load_layers(home.path(), None, &vars).unwrap();
        assert_eq!(resolved.config.gateway.token.as_deref(), Some("file-token"));
    }

    #[test]
    fn invalid_env_delay_is_a_parse_error() {
        let home = test_dir();
        let vars = env(&[("PULSE_RECONNECT_DELAY_MS", "soon")]);

        let result = load_layers(home.path(), None, &vars);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn malformed_file_reports_its_path() {
        let home = test_dir();
        write_file(home.path(), "config.toml", "[gateway\nurl = ");

        match load_layers(home.path(), None, &no_env()) {
            Err(ConfigError::ParseError { path, .. }) => assert!(path.ends_with("config.toml")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn merged_result_is_validated() {
        let home = test_dir();
        write_file(home.path(), "config.toml", "[gateway]\nintents = 1\n");

        let result = load_layers(home.path(), None, &no_env());
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn oversized_config_rejected() {
        let home = test_dir();
        let data = "x = \"".to_owned() + &"a".repeat(1_100_000) + "\"";
        let path = write_file(home.path(), "huge.toml", &data);

        let result = try_load_file(&path);
        assert!(
            matches!(result, Err(ConfigError::ValidationError { .. })),
            "expected ValidationError for oversized config, got: {result:?}"
        );
    }

    #[test]
    fn rendered_toml_omits_token() {
        let home = test_dir();
        let vars = env(&[("PULSE_TOKEN", "hidden-token")]);
        let resolved = load_layers(home.path(), None, &vars).unwrap();

        let rendered = resolved.to_toml().unwrap();
        assert!(!rendered.contains("hidden-token"));
        assert!(rendered.contains("[gateway]"));
    }
}
