//! Runtime configuration: environment first, command-line flags on top.

use std::env;

use anyhow::{anyhow, Context, Result};

use crate::core::BoardDimensions;
use crate::types::{DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Raw width; validated by [`GameConfig::dimensions`]
    pub width: String,
    /// Raw height; validated by [`GameConfig::dimensions`]
    pub height: String,
    /// RNG seed; the clock is used when unset
    pub seed: Option<u32>,
    /// Diagnostic log file. Without one no subscriber is installed.
    pub log_path: Option<String>,
    /// `EnvFilter` directives for the log file
    pub log_filter: String,
    /// JSON-lines file receiving one record per locked piece
    pub record_path: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH.to_string(),
            height: DEFAULT_BOARD_HEIGHT.to_string(),
            seed: None,
            log_path: None,
            log_filter: "info".to_string(),
            record_path: None,
        }
    }
}

impl GameConfig {
    /// Read `TERMTRIS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let mut config = Self::default();
        if let Some(width) = non_empty("TERMTRIS_WIDTH") {
            config.width = width;
        }
        if let Some(height) = non_empty("TERMTRIS_HEIGHT") {
            config.height = height;
        }
        if let Some(seed) = non_empty("TERMTRIS_SEED") {
            config.seed = Some(parse_seed(&seed).context("TERMTRIS_SEED")?);
        }
        if let Some(filter) = non_empty("TERMTRIS_LOG") {
            config.log_filter = filter;
        }
        config.log_path = non_empty("TERMTRIS_LOG_PATH");
        config.record_path = non_empty("TERMTRIS_RECORD_PATH");
        Ok(config)
    }

    /// Apply `--width`, `--height`, `--seed` and `--record` flags.
    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        let mut i = 0usize;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--width" | "--height" | "--seed" | "--record" => {
                    i += 1;
                    let v = args
                        .get(i)
                        .ok_or_else(|| anyhow!("missing value for {}", flag))?;
                    match flag {
                        "--width" => self.width = v.clone(),
                        "--height" => self.height = v.clone(),
                        "--seed" => self.seed = Some(parse_seed(v)?),
                        _ => self.record_path = Some(v.clone()),
                    }
                }
                other => {
                    return Err(anyhow!("unknown argument: {}", other));
                }
            }
            i += 1;
        }
        Ok(())
    }

    /// Validate the configured board size
    pub fn dimensions(&self) -> Result<BoardDimensions> {
        BoardDimensions::parse(&self.width, &self.height).context("invalid board size")
    }
}

fn parse_seed(value: &str) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| anyhow!("invalid seed value: {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_without_environment() {
        let config = GameConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GameConfig::default());
        let dims = config.dimensions().unwrap();
        assert_eq!((dims.width(), dims.height()), (10, 20));
    }

    #[test]
    fn environment_values_are_read() {
        let config = GameConfig::from_lookup(lookup(&[
            ("TERMTRIS_WIDTH", "12"),
            ("TERMTRIS_HEIGHT", " 24 "),
            ("TERMTRIS_SEED", "99"),
            ("TERMTRIS_LOG", "termtris_core=debug"),
            ("TERMTRIS_LOG_PATH", "/tmp/termtris.log"),
            ("TERMTRIS_RECORD_PATH", ""),
        ]))
        .unwrap();

        assert_eq!(config.seed, Some(99));
        assert_eq!(config.log_filter, "termtris_core=debug");
        assert_eq!(config.log_path.as_deref(), Some("/tmp/termtris.log"));
        assert_eq!(config.record_path, None);
        let dims = config.dimensions().unwrap();
        assert_eq!((dims.width(), dims.height()), (12, 24));
    }

    #[test]
    fn bad_seed_in_environment_is_an_error() {
        let err = GameConfig::from_lookup(lookup(&[("TERMTRIS_SEED", "abc")])).unwrap_err();
        assert!(format!("{:#}", err).contains("TERMTRIS_SEED"));
    }

    #[test]
    fn args_override_environment() {
        let mut config = GameConfig::from_lookup(lookup(&[("TERMTRIS_WIDTH", "12")])).unwrap();
        config
            .apply_args(&args(&["--width", "8", "--seed", "5", "--record", "out.jsonl"]))
            .unwrap();
        assert_eq!(config.width, "8");
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.record_path.as_deref(), Some("out.jsonl"));
    }

    #[test]
    fn unknown_or_incomplete_args_fail() {
        let mut config = GameConfig::default();
        assert!(config.apply_args(&args(&["--speed", "3"])).is_err());
        assert!(config.apply_args(&args(&["--height"])).is_err());
    }

    #[test]
    fn invalid_dimensions_are_reported() {
        let mut config = GameConfig::default();
        config.width = "10.5".to_string();
        assert!(config.dimensions().is_err());

        config.width = "3".to_string();
        let err = config.dimensions().unwrap_err();
        assert!(format!("{:#}", err).contains("4..=50"));
    }
}
