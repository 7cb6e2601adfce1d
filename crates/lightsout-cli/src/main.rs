//! `lightsout`: run Lights Out search experiments from the command line.
//!
//! ```text
//! lightsout run --size 4 --trials 20 --strategy all --seed 7 --format csv
//! lightsout scramble --size 5 --presses 6
//! ```

mod config;
mod experiment;
mod export;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lightsout_core::{OpenListOrder, Scrambler, Strategy};
use tracing::{debug, info, warn};

use crate::config::{load_config, ExperimentConfig, LoadedConfig};
use crate::experiment::Experiment;
use crate::export::{export, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "lightsout", version, about = "Lights Out search experiments")]
struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (otherwise LIGHTSOUT_CONFIG, then ./lightsout.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scramble boards and run search strategies on them
    Run(RunArgs),
    /// Print one scrambled board
    Scramble(ScrambleArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Greedy,
    Astar,
    Mcts,
    All,
}

impl StrategyArg {
    fn strategies(self) -> Vec<Strategy> {
        match self {
            StrategyArg::Greedy => vec![Strategy::Greedy],
            StrategyArg::Astar => vec![Strategy::AStar],
            StrategyArg::Mcts => vec![Strategy::Mcts],
            StrategyArg::All => Strategy::all().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    LitCount,
    StepsPlusBound,
}

impl From<OrderArg> for OpenListOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::LitCount => OpenListOrder::LitCount,
            OrderArg::StepsPlusBound => OpenListOrder::StepsPlusBound,
        }
    }
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Board side length
    #[arg(long)]
    size: Option<usize>,

    /// Number of scrambled boards
    #[arg(long)]
    trials: Option<usize>,

    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Seed for scrambling and MCTS
    #[arg(long)]
    seed: Option<u64>,

    /// MCTS iterations per move
    #[arg(long, conflicts_with = "mcts_time_ms")]
    mcts_iterations: Option<u32>,

    /// MCTS time budget per move, in milliseconds
    #[arg(long)]
    mcts_time_ms: Option<u64>,

    /// UCT exploration constant
    #[arg(long)]
    exploration: Option<f64>,

    #[arg(long)]
    greedy_max_depth: Option<usize>,

    #[arg(long, value_enum)]
    astar_order: Option<OrderArg>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl RunArgs {
    /// Flags override file and environment settings.
    fn apply(&self, mut config: ExperimentConfig) -> ExperimentConfig {
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if let Some(strategy) = self.strategy {
            config.strategies = strategy.strategies();
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(n) = self.mcts_iterations {
            config.mcts = config.mcts.with_iterations(n);
        }
        if let Some(ms) = self.mcts_time_ms {
            config.mcts = config.mcts.with_time_limit_ms(ms);
        }
        if let Some(c) = self.exploration {
            config.mcts = config.mcts.with_exploration_constant(c);
        }
        if let Some(depth) = self.greedy_max_depth {
            config.greedy = config.greedy.with_max_depth(depth);
        }
        if let Some(order) = self.astar_order {
            config.astar = config.astar.with_order(order.into());
        }
        config
    }
}

#[derive(Args, Debug)]
struct ScrambleArgs {
    #[arg(long)]
    size: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Exact number of random presses (otherwise the configured range)
    #[arg(long)]
    presses: Option<usize>,
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level {:?}", level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let LoadedConfig {
        config,
        source,
        warnings,
    } = load_config(cli.config.as_deref())?;
    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    init_tracing(level)?;
    for warning in &warnings {
        warn!("{}", warning);
    }
    debug!(%source, "configuration loaded");

    match cli.command {
        Command::Run(args) => run(&args, config),
        Command::Scramble(args) => scramble(&args, &config),
    }
}

fn run(args: &RunArgs, config: ExperimentConfig) -> Result<()> {
    let experiment = Experiment::new(args.apply(config))?;
    let report = experiment.run()?;
    export(&report, args.format, args.output.as_deref())?;
    if let Some(path) = &args.output {
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

fn scramble(args: &ScrambleArgs, config: &ExperimentConfig) -> Result<()> {
    let size = args.size.unwrap_or(config.size);
    let mut scrambler = match args.seed.or(config.seed) {
        Some(seed) => Scrambler::with_seed(seed),
        None => Scrambler::new(),
    }
    .configured(config.scrambler)?;

    let board = match args.presses {
        Some(presses) => scrambler.scramble_with_presses(size, presses)?,
        None => scrambler.scramble(size)?,
    };
    println!("{}", board);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use lightsout_core::SearchBudget;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_flags_override_config() {
        let cli = Cli::parse_from([
            "lightsout",
            "run",
            "--size",
            "3",
            "--strategy",
            "astar",
            "--mcts-iterations",
            "50",
            "--astar-order",
            "steps-plus-bound",
            "--greedy-max-depth",
            "20",
            "--format",
            "csv",
        ]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.format, OutputFormat::Csv);

        let config = args.apply(ExperimentConfig::default());
        assert_eq!(config.size, 3);
        assert_eq!(config.trials, ExperimentConfig::default().trials);
        assert_eq!(config.strategies, vec![Strategy::AStar]);
        assert_eq!(config.mcts.budget, SearchBudget::Iterations(50));
        assert_eq!(config.astar.order, OpenListOrder::StepsPlusBound);
        assert_eq!(config.greedy.max_depth, 20);
    }

    #[test]
    fn test_mcts_budget_flags_conflict() {
        let parsed = Cli::try_parse_from([
            "lightsout",
            "run",
            "--mcts-iterations",
            "10",
            "--mcts-time-ms",
            "10",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["lightsout", "scramble", "--size", "4", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Scramble(ScrambleArgs { size: Some(4), .. })));
    }
}
