//! Experiment configuration.
//!
//! Settings come from a TOML file, then `LIGHTSOUT_*` environment variables,
//! then command-line flags, each layer overriding the one before it.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use lightsout_core::{
    AStarConfig, GreedyConfig, MctsConfig, ScramblerConfig, Solver, Strategy, MAX_SIZE,
};
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "LIGHTSOUT_CONFIG";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lightsout.toml";

/// Everything one `lightsout run` needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Board side length
    pub size: usize,
    /// Number of scrambled boards
    pub trials: usize,
    /// Seed for the scrambler and the MCTS engines; entropy when unset
    pub seed: Option<u64>,
    /// Strategies run on every board, in this order
    pub strategies: Vec<Strategy>,
    pub scrambler: ScramblerConfig,
    pub greedy: GreedyConfig,
    pub astar: AStarConfig,
    pub mcts: MctsConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            size: 5,
            trials: 10,
            seed: None,
            strategies: Strategy::all().to_vec(),
            scrambler: ScramblerConfig::default(),
            greedy: GreedyConfig::default(),
            astar: AStarConfig::default(),
            mcts: MctsConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Build the solver facade from the per-strategy sections.
    pub fn solver(&self) -> Solver {
        Solver::new()
            .with_greedy(self.greedy)
            .with_a_star(self.astar)
            .with_mcts(self.mcts.clone())
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 || self.size > MAX_SIZE {
            bail!("size must be between 1 and {}, got {}", MAX_SIZE, self.size);
        }
        if self.trials == 0 {
            bail!("trials must be at least 1");
        }
        if self.strategies.is_empty() {
            bail!("at least one strategy must be selected");
        }
        self.scrambler.validate()?;
        self.solver().validate()?;
        Ok(())
    }
}

/// Where the loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// Resolve and load the configuration.
///
/// Looks in order at:
/// 1. `explicit` (the `--config` flag), which must exist
/// 2. the path in `LIGHTSOUT_CONFIG`, skipped if missing
/// 3. `lightsout.toml` in the working directory
///
/// and falls back to defaults. Environment overrides are applied on top.
/// Loading runs before logging is set up, so problems worth a warning are
/// returned in [`LoadedConfig::warnings`] for the caller to log.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let lookup = find_config_file(explicit, std::env::var(CONFIG_ENV_VAR).ok())?;
    let (config, source) = match lookup.path {
        Some(path) => (load_from_path(&path)?, ConfigSource::File(path)),
        None => (ExperimentConfig::default(), ConfigSource::Defaults),
    };
    Ok(LoadedConfig {
        config: apply_env_overrides(config),
        source,
        warnings: lookup.warning.into_iter().collect(),
    })
}

/// A resolved configuration and how it was found.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: ExperimentConfig,
    pub source: ConfigSource,
    pub warnings: Vec<String>,
}

#[derive(Debug, Default)]
struct ConfigLookup {
    path: Option<PathBuf>,
    warning: Option<String>,
}

fn find_config_file(explicit: Option<&Path>, from_env: Option<String>) -> Result<ConfigLookup> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
        return Ok(ConfigLookup {
            path: Some(path.to_path_buf()),
            warning: None,
        });
    }

    let mut lookup = ConfigLookup::default();
    if let Some(path) = from_env.map(PathBuf::from) {
        if path.exists() {
            lookup.path = Some(path);
            return Ok(lookup);
        }
        lookup.warning = Some(format!(
            "{}={} not found, searching defaults",
            CONFIG_ENV_VAR,
            path.display()
        ));
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    lookup.path = local.exists().then_some(local);
    Ok(lookup)
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<ExperimentConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

macro_rules! env_override {
    // String field
    ($config:expr, $field:ident, $lookup:expr, $key:expr) => {
        if let Some(v) = $lookup($key) {
            $config.$field = v;
        }
    };
    // Parseable field; unparseable values are ignored
    ($config:expr, $field:ident, $lookup:expr, $key:expr, parse) => {
        if let Some(v) = $lookup($key).and_then(|s: String| s.parse().ok()) {
            $config.$field = v;
        }
    };
    // Optional parseable field
    ($config:expr, $field:ident, $lookup:expr, $key:expr, optional_parse) => {
        if let Some(v) = $lookup($key).and_then(|s: String| s.parse().ok()) {
            $config.$field = Some(v);
        }
    };
}

/// Apply `LIGHTSOUT_*` environment variable overrides.
pub fn apply_env_overrides(config: ExperimentConfig) -> ExperimentConfig {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

fn apply_overrides_from<F>(mut config: ExperimentConfig, lookup: F) -> ExperimentConfig
where
    F: Fn(&str) -> Option<String>,
{
    env_override!(config, size, lookup, "LIGHTSOUT_SIZE", parse);
    env_override!(config, trials, lookup, "LIGHTSOUT_TRIALS", parse);
    env_override!(config, seed, lookup, "LIGHTSOUT_SEED", optional_parse);
    env_override!(config, log_level, lookup, "LIGHTSOUT_LOG_LEVEL");
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightsout_core::{OpenListOrder, SearchBudget};
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ExperimentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.strategies, Strategy::all().to_vec());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(
            r#"
size = 3
seed = 7

[astar]
order = "steps-plus-bound"

[mcts]
budget = { iterations = 200 }
"#,
        );
        let config = load_from_path(file.path()).unwrap();
        assert_eq!(config.size, 3);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.trials, 10);
        assert_eq!(config.astar.order, OpenListOrder::StepsPlusBound);
        assert_eq!(config.mcts.budget, SearchBudget::Iterations(200));
        assert_eq!(config.mcts.max_moves, MctsConfig::default().max_moves);
        assert_eq!(config.greedy, GreedyConfig::default());
    }

    #[test]
    fn test_strategies_parse_by_name() {
        let file = write_config("strategies = [\"astar\", \"greedy\"]\n");
        let config = load_from_path(file.path()).unwrap();
        assert_eq!(config.strategies, vec![Strategy::AStar, Strategy::Greedy]);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let file = write_config("size = \"five\"\n");
        let err = load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(find_config_file(Some(&missing), None).is_err());

        let file = write_config("");
        let found = find_config_file(Some(file.path()), None).unwrap();
        assert_eq!(found.path.as_deref(), Some(file.path()));
        assert!(found.warning.is_none());
    }

    #[test]
    fn test_env_path_used_when_present() {
        let file = write_config("trials = 2\n");
        let env_path = file.path().to_string_lossy().into_owned();
        let found = find_config_file(None, Some(env_path)).unwrap();
        assert_eq!(found.path.as_deref(), Some(file.path()));
        assert!(found.warning.is_none());
    }

    #[test]
    fn test_missing_env_path_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.toml");
        let found = find_config_file(None, Some(missing.to_string_lossy().into_owned())).unwrap();
        let warning = found.warning.expect("missing env path should warn");
        assert!(warning.starts_with("LIGHTSOUT_CONFIG="));
        assert!(warning.contains("gone.toml"));
        assert_ne!(found.path.as_deref(), Some(missing.as_path()));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("LIGHTSOUT_SIZE", "4"),
            ("LIGHTSOUT_TRIALS", "not-a-number"),
            ("LIGHTSOUT_SEED", "99"),
            ("LIGHTSOUT_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let config = apply_overrides_from(ExperimentConfig::default(), |key| {
            vars.get(key).map(|v| v.to_string())
        });
        assert_eq!(config.size, 4);
        assert_eq!(config.trials, 10);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ExperimentConfig {
            size: MAX_SIZE + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.size = 3;
        config.strategies.clear();
        assert!(config.validate().is_err());

        config.strategies = vec![Strategy::Greedy];
        config.scrambler = ScramblerConfig::default().with_presses(5, 2);
        assert!(config.validate().is_err());

        config.scrambler = ScramblerConfig::default();
        config.mcts = MctsConfig::default().with_iterations(0);
        assert!(config.validate().is_err());
    }
}
