//! Sweep plans and the driver command line.
//!
//! Every driver binary recognizes exactly one flag, `--quick`, which shrinks
//! its config list and drops the warm iteration count to 1. The full plans
//! use 3 warm iterations per config.

use clap::Parser;

use crate::sweep::BenchConfig;
use crate::workload::EXPANSION_QUERIES;

/// Warm iterations per config in a full run.
pub const FULL_ITERATIONS: usize = 3;

/// Fixed query used for every rerank measurement.
pub const RERANK_QUERY: &str = "How do AI agents work and what are their limitations?";

/// Command line shared by all driver binaries.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// Quick smoke test: shrink the sweep and run a single warm iteration
    /// per config.
    #[arg(long)]
    pub quick: bool,
}

/// The fixed measurement plan for one driver: the ordered config list and
/// the warm iteration count. Static input to the sweep, never mutated.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    /// Configurations measured in order.
    pub configs: Vec<BenchConfig>,
    /// Warm invocations per config.
    pub iterations: usize,
}

impl SweepPlan {
    /// Embedding sweep: batch sizes 1/10/50/100, or 1/10 in quick mode.
    pub fn embed(quick: bool) -> Self {
        let sizes: &[usize] = if quick { &[1, 10] } else { &[1, 10, 50, 100] };
        Self::batches(sizes, quick)
    }

    /// Rerank sweep: document counts 10/20/40/80/160, or 10/40 in quick
    /// mode.
    pub fn rerank(quick: bool) -> Self {
        let sizes: &[usize] = if quick {
            &[10, 40]
        } else {
            &[10, 20, 40, 80, 160]
        };
        Self::batches(sizes, quick)
    }

    /// Expansion sweep: all fixed queries, or the first two in quick mode.
    pub fn expand(quick: bool) -> Self {
        let take = if quick { 2 } else { EXPANSION_QUERIES.len() };
        Self {
            configs: EXPANSION_QUERIES
                .iter()
                .take(take)
                .map(|q| BenchConfig::Query {
                    label: q.label.to_string(),
                    text: q.text.to_string(),
                })
                .collect(),
            iterations: Self::iterations(quick),
        }
    }

    fn batches(sizes: &[usize], quick: bool) -> Self {
        Self {
            configs: sizes.iter().map(|&n| BenchConfig::Batch(n)).collect(),
            iterations: Self::iterations(quick),
        }
    }

    fn iterations(quick: bool) -> usize {
        if quick {
            1
        } else {
            FULL_ITERATIONS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(plan: &SweepPlan) -> Vec<usize> {
        plan.configs
            .iter()
            .map(|c| c.batch_size().unwrap())
            .collect()
    }

    #[test]
    fn embed_plan_scope() {
        let full = SweepPlan::embed(false);
        assert_eq!(sizes(&full), vec![1, 10, 50, 100]);
        assert_eq!(full.iterations, 3);

        let quick = SweepPlan::embed(true);
        assert_eq!(sizes(&quick), vec![1, 10]);
        assert_eq!(quick.iterations, 1);
    }

    #[test]
    fn rerank_plan_scope() {
        assert_eq!(sizes(&SweepPlan::rerank(false)), vec![10, 20, 40, 80, 160]);
        assert_eq!(sizes(&SweepPlan::rerank(true)), vec![10, 40]);
    }

    #[test]
    fn expand_plan_takes_query_prefix() {
        let full = SweepPlan::expand(false);
        assert_eq!(full.configs.len(), 5);
        assert_eq!(full.iterations, 3);

        let quick = SweepPlan::expand(true);
        assert_eq!(quick.configs.len(), 2);
        assert_eq!(quick.iterations, 1);
        let labels: Vec<_> = quick
            .configs
            .iter()
            .filter_map(|c| match c {
                BenchConfig::Query { label, .. } => Some(label.as_str()),
                BenchConfig::Batch(_) => None,
            })
            .collect();
        assert_eq!(labels, vec!["short", "question"]);
    }

    #[test]
    fn cli_parses_quick_flag() {
        use clap::Parser;
        let cli = Cli::parse_from(["bench-embed", "--quick"]);
        assert!(cli.quick);
        let cli = Cli::parse_from(["bench-embed"]);
        assert!(!cli.quick);
    }
}
