//! Rerank throughput driver.
//!
//! Usage:
//!   bench-rerank            # full sweep, 3 warm iterations
//!   bench-rerank --quick    # quick smoke test

use clap::Parser;

use embench::drivers::run_rerank;
use embench::plan::{Cli, SweepPlan};
use embench::sim::SimEngine;

fn main() {
    let cli = Cli::parse();
    let plan = SweepPlan::rerank(cli.quick);
    let mut engine = SimEngine::new();
    let mut out = std::io::stdout();
    if let Err(err) = run_rerank(&mut engine, &plan, &mut out) {
        eprintln!("bench-rerank: {err}");
        std::process::exit(1);
    }
}
