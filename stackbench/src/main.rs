//! # Stackbench Runtime
//!
//! Runs scripted block-stacking episodes headless and prints one JSON record
//! per step followed by a summary line.

mod app;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Command line options. Flags override values loaded from `--config`.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// JSON task configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of blocks
    #[arg(long)]
    pub num_blocks: Option<usize>,

    /// "sparse" or "dense"
    #[arg(long)]
    pub reward_type: Option<rl::stack::RewardType>,

    /// Sample block positions at reset instead of using a fixed row
    #[arg(long)]
    pub random_placement: bool,

    /// Number of episodes to run
    #[arg(long, default_value_t = 1)]
    pub episodes: u32,

    /// Seed for the first episode; later episodes continue the same stream
    #[arg(long)]
    pub seed: Option<u64>,

    /// Suppress per-step records
    #[arg(long)]
    pub quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    app::run(&Args::parse())
}
