//! Robb CLI: inspect parameters, check config files, replay bars.
//!
//! Commands:
//! - `params`: print the effective parameters and session policy
//! - `check`: load and validate a strategy TOML file
//! - `replay`: drive a strategy session over a CSV of closes with paper fills

mod bars;
mod paper;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use robb_core::{Decision, OrderIntent, PositionState, StrategyConfig, StrategySession};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::bars::load_bars;
use crate::paper::{Fill, PaperBroker};

#[derive(Parser)]
#[command(
    name = "robb",
    about = "Robb CLI: lower Bollinger band short strategy with a standard-deviation profit target"
)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print effective parameters and session policy.
    Params {
        /// Strategy TOML file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Load and validate a strategy TOML file.
    Check {
        /// Strategy TOML file.
        #[arg(long)]
        config: PathBuf,
    },
    /// Replay a CSV of closes through a session with paper execution.
    Replay {
        /// CSV with a `close` column and an optional `date` column.
        #[arg(long)]
        bars: PathBuf,

        /// Strategy TOML file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit one JSON object per bar instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Only print bars with fills or intents.
        #[arg(long, default_value_t = false)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Params { config } => run_params(config.as_deref()),
        Commands::Check { config } => run_check(&config),
        Commands::Replay {
            bars,
            config,
            json,
            quiet,
        } => run_replay(&bars, config.as_deref(), json, quiet),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<StrategyConfig> {
    match path {
        Some(p) => StrategyConfig::from_file(p)
            .with_context(|| format!("load strategy config {}", p.display())),
        None => Ok(StrategyConfig::default()),
    }
}

fn run_params(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    println!("{}", config.name);
    for (name, value) in config.params.parameter_table() {
        println!("  {name:<36} {value}");
    }
    println!("  {:<36} {}", "Warmup bars", config.params.warmup_bars());
    println!(
        "  {:<36} {}",
        "Force close at session end", config.policy.force_close_at_session_end
    );
    println!(
        "  {:<36} {}",
        "Max open position", config.policy.max_open_position
    );
    println!(
        "  {:<36} {}",
        "Advanced order management", config.policy.uses_advanced_order_management
    );
    Ok(())
}

fn run_check(path: &Path) -> Result<()> {
    let config = load_config(Some(path))?;
    println!("{}: ok ({})", path.display(), config.name);
    Ok(())
}

/// One line of replay output.
#[derive(Debug, Serialize)]
struct ReplayLine<'a> {
    bar_index: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    close: f64,
    position: PositionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    fill: Option<Fill>,
    intents: &'a [OrderIntent],
}

fn run_replay(bars_path: &Path, config: Option<&Path>, json: bool, quiet: bool) -> Result<()> {
    let config = load_config(config)?;
    let bars = load_bars(bars_path)?;
    let mut session = StrategySession::start(&config)?;
    let mut broker = PaperBroker::new(*session.policy());

    for loaded in &bars {
        let fill = broker.match_orders(&loaded.bar);
        let position = broker.snapshot()?;
        let decision: Decision = session
            .on_bar(&loaded.bar, &position)
            .with_context(|| format!("evaluate bar {}", loaded.bar.index))?;
        broker.submit(&decision.intents);

        if quiet && fill.is_none() && decision.is_none() {
            continue;
        }
        let line = ReplayLine {
            bar_index: loaded.bar.index,
            date: loaded.date.map(|d| d.to_string()),
            close: loaded.bar.close,
            position: position.state,
            fill,
            intents: &decision.intents,
        };
        print_line(&line, json)?;
    }

    if let Some(last) = bars.last() {
        if let Some(fill) = broker.end_session(&last.bar) {
            let line = ReplayLine {
                bar_index: last.bar.index,
                date: last.date.map(|d| d.to_string()),
                close: last.bar.close,
                position: broker.snapshot()?.state,
                fill: Some(fill),
                intents: &[],
            };
            print_line(&line, json)?;
        }
    }

    let (evaluated, entries) = session.finish();
    if !json {
        println!("{evaluated} bars evaluated, {entries} entry signals");
    }
    Ok(())
}

fn print_line(line: &ReplayLine<'_>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(line)?);
        return Ok(());
    }

    let date = line.date.as_deref().unwrap_or("-");
    let mut text = format!(
        "{:>6} {:>10} {:>12.4} {:?}",
        line.bar_index, date, line.close, line.position
    );
    if let Some(fill) = &line.fill {
        text.push_str(&format!("  fill {:?} @ {:.4}", fill.kind, fill.price));
    }
    for intent in line.intents {
        match intent {
            OrderIntent::EnterShort { quantity } => {
                text.push_str(&format!("  {} {:?} x{quantity}", intent.label(), intent.kind()))
            }
            OrderIntent::ExitShort { limit_price } => {
                text.push_str(&format!(
                    "  {} {:?} @ {limit_price:.4}",
                    intent.label(),
                    intent.kind()
                ))
            }
        }
    }
    println!("{text}");
    Ok(())
}
