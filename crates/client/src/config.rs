//! Simulation settings read from the environment.
use std::env;
use std::path::PathBuf;

/// Headless simulation configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    /// Seed for the AI tie-breaker of every battle.
    pub seed: u64,
    /// Overrides each battle's turn limit so AI-vs-AI runs always end.
    pub max_turns: u32,
    /// Directory for the log file; stderr only when unset.
    pub log_dir: Option<PathBuf>,
    /// TOML game configuration; the bundled one when unset.
    pub game_config: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            max_turns: 20,
            log_dir: None,
            game_config: None,
        }
    }
}

impl SimConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SIM_SEED` - AI seed (default: 7)
    /// - `SIM_MAX_TURNS` - Turn cap per battle (default: 20, minimum 1)
    /// - `SIM_LOG_DIR` - Log directory
    /// - `SIM_CONFIG` - Path to a game config TOML file
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(seed) = parse(&lookup, "SIM_SEED") {
            config.seed = seed;
        }
        if let Some(turns) = parse::<u32>(&lookup, "SIM_MAX_TURNS") {
            config.max_turns = turns.max(1);
        }
        config.log_dir = lookup("SIM_LOG_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        config.game_config = lookup("SIM_CONFIG")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        config
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> SimConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SimConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(config(&[]), SimConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = config(&[
            ("SIM_SEED", "42"),
            ("SIM_MAX_TURNS", "0"),
            ("SIM_LOG_DIR", "/tmp/sim"),
            ("SIM_CONFIG", "game.toml"),
        ]);
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_turns, 1);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/sim")));
        assert_eq!(config.game_config, Some(PathBuf::from("game.toml")));
    }

    #[test]
    fn malformed_numbers_keep_defaults() {
        let config = config(&[("SIM_SEED", "many"), ("SIM_LOG_DIR", "")]);
        assert_eq!(config.seed, SimConfig::default().seed);
        assert_eq!(config.log_dir, None);
    }
}
