//! SwingLab CLI — feature generation and trade simulation over CSV inputs.
//!
//! Commands:
//! - `features` — pivots, structural features and scorer suggestions per asset
//! - `simulate` — features plus the decision batch and one policy episode
//! - `config-hash` — print the hash (and optionally the TOML) of a config

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use swinglab_runner::{AssetInput, PipelineConfig, PolicyKind, RunMode, RunReport};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "swinglab",
    about = "SwingLab CLI: swing structure features and barrier-hit trade simulation"
)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute structural features and scorer suggestions.
    Features {
        /// Input CSV files; the symbol is the file stem.
        #[arg(long = "input", short, required = true)]
        inputs: Vec<PathBuf>,

        /// Path to a TOML pipeline config. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output root. Overrides `[run] output_root`.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Compute features, simulate suggested trades and run a policy episode.
    Simulate {
        /// Input CSV files; the symbol is the file stem.
        #[arg(long = "input", short, required = true)]
        inputs: Vec<PathBuf>,

        /// Path to a TOML pipeline config. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output root. Overrides `[run] output_root`.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Episode policy. Overrides `[run] policy`.
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
    },
    /// Print the config hash used to tag artifacts.
    ConfigHash {
        /// Path to a TOML pipeline config. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also print the resolved config as TOML.
        #[arg(long, default_value_t = false)]
        print: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Confidence,
    Random,
}

impl From<PolicyArg> for PolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Confidence => PolicyKind::Confidence,
            PolicyArg::Random => PolicyKind::Random,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Features {
            inputs,
            config,
            out,
        } => {
            let config = load_config(config.as_deref())?;
            run_pipeline(&inputs, config, out, RunMode::Features)
        }
        Commands::Simulate {
            inputs,
            config,
            out,
            policy,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(policy) = policy {
                config.run.policy = policy.into();
            }
            run_pipeline(&inputs, config, out, RunMode::Simulate)
        }
        Commands::ConfigHash { config, print } => {
            let config = load_config(config.as_deref())?;
            println!("{}", config.config_hash()?);
            if print {
                print!("{}", config.to_toml_string()?);
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let config = PipelineConfig::load_or_default(path).with_context(|| match path {
        Some(p) => format!("failed to load config {}", p.display()),
        None => "failed to build default config".to_string(),
    })?;
    config.validate().context("invalid config")?;
    Ok(config)
}

fn run_pipeline(
    paths: &[PathBuf],
    mut config: PipelineConfig,
    out: Option<PathBuf>,
    mode: RunMode,
) -> Result<()> {
    if let Some(out) = out {
        config.run.output_root = out;
    }
    let inputs = paths
        .iter()
        .map(|p| AssetInput::from_path(p))
        .collect::<Result<Vec<_>, _>>()
        .context("invalid input path")?;

    let output_root = config.run.output_root.clone();
    let report = swinglab_runner::run_assets(&inputs, &config, mode, &output_root)
        .context("pipeline run failed")?;
    print_report(&report, &output_root);

    if report.assets.is_empty() {
        bail!("all {} assets failed", report.failures.len());
    }
    Ok(())
}

fn print_report(report: &RunReport, root: &Path) {
    println!("config hash: {}", report.config_hash);
    println!("output root: {}", root.display());
    for asset in &report.assets {
        print!(
            "{:<12} {:>7} bars {:>5} pivots",
            asset.symbol, asset.bars, asset.pivots
        );
        if let Some(batch) = &asset.batch {
            print!(
                "  {:>5} trades  win {:>5.1}%  mean R {:+.3}",
                batch.trade_count,
                batch.win_rate * 100.0,
                batch.mean_reward
            );
        }
        if let Some(episode) = &asset.episode {
            print!("  episode reward {:+.3}", episode.total_reward);
        }
        println!();
    }
    for failure in &report.failures {
        eprintln!("{:<12} FAILED: {}", failure.symbol, failure.error);
    }
}
