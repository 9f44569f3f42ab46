//! Batched-embedding throughput driver.
//!
//! Usage:
//!   bench-embed            # full sweep, 3 warm iterations
//!   bench-embed --quick    # quick smoke test

use clap::Parser;

use embench::drivers::run_embed;
use embench::plan::{Cli, SweepPlan};
use embench::sim::SimEngine;

fn main() {
    let cli = Cli::parse();
    let plan = SweepPlan::embed(cli.quick);
    let mut engine = SimEngine::new();
    let mut out = std::io::stdout();
    if let Err(err) = run_embed(&mut engine, &plan, &mut out) {
        eprintln!("bench-embed: {err}");
        std::process::exit(1);
    }
}
