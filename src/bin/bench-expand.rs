//! Query-expansion latency driver.
//!
//! Usage:
//!   bench-expand            # all query shapes, 3 warm iterations
//!   bench-expand --quick    # quick smoke test

use clap::Parser;

use embench::drivers::run_expand;
use embench::plan::{Cli, SweepPlan};
use embench::sim::SimEngine;

fn main() {
    let cli = Cli::parse();
    let plan = SweepPlan::expand(cli.quick);
    let mut engine = SimEngine::new();
    let mut out = std::io::stdout();
    if let Err(err) = run_expand(&mut engine, &plan, &mut out) {
        eprintln!("bench-expand: {err}");
        std::process::exit(1);
    }
}
