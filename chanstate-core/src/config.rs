use std::path::PathBuf;

use serde::Deserialize;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

const MAX_INDENT: usize = 16;

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    state: StateConfig,
    #[serde(default)]
    snapshot: SnapshotConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct StateConfig {
    missing_number: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct SnapshotConfig {
    indent: Option<usize>,
    normalize_separators: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Config {
    state: StateConfig,
    snapshot: SnapshotConfig,
}

impl Config {
    /// Embedded defaults overridden by the user's config file, if any.
    pub fn load() -> Self {
        let mut config = Self::embedded();

        if let Some(path) = user_config_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => {
                        if let Err(e) = config.apply_overrides(&contents) {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    }
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        config
    }

    /// Only the built-in defaults.
    pub fn embedded() -> Self {
        let base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");
        Config {
            state: base.state,
            snapshot: base.snapshot,
        }
    }

    /// Override every key present in `text`. On error nothing is changed.
    pub fn apply_overrides(&mut self, text: &str) -> Result<(), toml::de::Error> {
        let user: ConfigFile = toml::from_str(text)?;
        merge_state(&mut self.state, user.state);
        merge_snapshot(&mut self.snapshot, user.snapshot);
        Ok(())
    }

    /// Sentinel written by numeric getters when the engine has no store yet.
    pub fn missing_number(&self) -> f64 {
        self.state
            .missing_number
            .filter(|v| v.is_finite())
            .unwrap_or(-1.0)
    }

    /// Indent width of snapshot files (clamped to 0..=16).
    pub fn snapshot_indent(&self) -> usize {
        self.snapshot.indent.unwrap_or(4).min(MAX_INDENT)
    }

    pub fn normalize_separators(&self) -> bool {
        self.snapshot.normalize_separators.unwrap_or(true)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::embedded()
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chanstate").join("config.toml"))
}

fn merge_state(base: &mut StateConfig, user: StateConfig) {
    if user.missing_number.is_some() {
        base.missing_number = user.missing_number;
    }
}

fn merge_snapshot(base: &mut SnapshotConfig, user: SnapshotConfig) {
    if user.indent.is_some() {
        base.indent = user.indent;
    }
    if user.normalize_separators.is_some() {
        base.normalize_separators = user.normalize_separators;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_embedded_config() {
        let config = Config::embedded();
        assert_eq!(config.missing_number(), -1.0);
        assert_eq!(config.snapshot_indent(), 4);
        assert!(config.normalize_separators());
    }

    #[test]
    fn test_overrides_only_touch_present_keys() {
        let mut config = Config::embedded();
        config.apply_overrides("[snapshot]\nindent = 2\n").unwrap();
        assert_eq!(config.snapshot_indent(), 2);
        assert!(config.normalize_separators());
        assert_eq!(config.missing_number(), -1.0);
    }

    #[test]
    fn test_malformed_override_is_rejected() {
        let mut config = Config::embedded();
        assert!(config.apply_overrides("[snapshot\nindent = ").is_err());
        assert_eq!(config.snapshot_indent(), 4);
    }

    #[test]
    fn test_indent_is_clamped() {
        let mut config = Config::embedded();
        config.apply_overrides("[snapshot]\nindent = 400\n").unwrap();
        assert_eq!(config.snapshot_indent(), MAX_INDENT);
    }
}
