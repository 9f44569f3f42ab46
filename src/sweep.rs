//! Sweep orchestrator.
//!
//! One generic pipeline drives all three benchmarks: for each configuration
//! it generates inputs once, runs 1 cold + N warm invocations with
//! byte-identical inputs, samples RSS after every invocation, and appends an
//! immutable [`SweepItem`] in config order. Short engine results degrade to a
//! warning; a raised engine error terminates the sweep immediately
//! (fail-fast), leaving the completed results observable in the caller-owned
//! [`SweepContext`].

use std::io::Write;

use crate::engine::{EngineError, InferenceEngine, Queryable};
use crate::measure::{median, run_timed};
use crate::memory::PeakRss;
use crate::report;
use crate::BenchError;

// ─── Configurations ──────────────────────────────────────────────────────────

/// One axis point of a sweep. The ordered config list is fixed before the
/// sweep starts and never deduplicated: repeated configs are measured
/// independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BenchConfig {
    /// Workload size for batch-oriented operations.
    Batch(usize),
    /// A labelled query for query-oriented operations.
    Query {
        /// Short label identifying the query shape.
        label: String,
        /// The query text handed to the engine.
        text: String,
    },
}

impl BenchConfig {
    /// Batch size for batch-axis configs; query configs have none.
    pub fn batch_size(&self) -> Option<usize> {
        match self {
            BenchConfig::Batch(n) => Some(*n),
            BenchConfig::Query { .. } => None,
        }
    }

    /// Query text for query-axis configs.
    pub fn query_text(&self) -> Option<&str> {
        match self {
            BenchConfig::Batch(_) => None,
            BenchConfig::Query { text, .. } => Some(text),
        }
    }
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Per-type counts of expansion candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionBreakdown {
    /// Lexical rewrites.
    pub lex: usize,
    /// Dense-retrieval paraphrases.
    pub vec: usize,
    /// Hypothetical document passages.
    pub hyde: usize,
}

impl ExpansionBreakdown {
    /// Count candidates by tag.
    pub fn tally(items: &[Queryable]) -> Self {
        let mut counts = Self::default();
        for item in items {
            match item {
                Queryable::Lex(_) => counts.lex += 1,
                Queryable::Vec(_) => counts.vec += 1,
                Queryable::Hyde(_) => counts.hyde += 1,
            }
        }
        counts
    }

    /// Total candidates across all tags.
    pub fn total(&self) -> usize {
        self.lex + self.vec + self.hyde
    }
}

impl std::fmt::Display for ExpansionBreakdown {
    /// Renders only the tags that are present, e.g. `lex:3 vec:1`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if self.lex > 0 {
            parts.push(format!("lex:{}", self.lex));
        }
        if self.vec > 0 {
            parts.push(format!("vec:{}", self.vec));
        }
        if self.hyde > 0 {
            parts.push(format!("hyde:{}", self.hyde));
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// Domain-specific summary of what one configuration's invocations returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Embedding batch: how many of the requested items embedded
    /// successfully (non-null entries in the cold result).
    Embedded {
        /// Items requested.
        requested: usize,
        /// Items that produced a vector.
        valid: usize,
    },
    /// Rerank batch: how many scored documents came back.
    Reranked {
        /// Documents requested.
        requested: usize,
        /// Documents returned.
        returned: usize,
    },
    /// Query expansion: candidate count and per-type breakdown of the last
    /// warm result.
    Expanded {
        /// Total candidates returned.
        total: usize,
        /// Per-type counts.
        breakdown: ExpansionBreakdown,
    },
}

impl Outcome {
    /// `(delivered, requested)` when the engine under-delivered, `None`
    /// otherwise. A shortfall never aborts a sweep.
    pub fn shortfall(&self) -> Option<(usize, usize)> {
        match *self {
            Outcome::Embedded { requested, valid } if valid < requested => {
                Some((valid, requested))
            }
            Outcome::Reranked {
                requested,
                returned,
            } if returned < requested => Some((returned, requested)),
            _ => None,
        }
    }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// One immutable record per measured configuration.
#[derive(Debug, Clone)]
pub struct SweepItem {
    /// The configuration this record measures.
    pub config: BenchConfig,
    /// Wall time of the cold invocation in milliseconds.
    pub cold_ms: f64,
    /// Median wall time of the warm invocations in milliseconds.
    pub warm_ms: f64,
    /// Running peak RSS as of this configuration's completion. Cumulative
    /// across the whole sweep, so non-decreasing in sweep order.
    pub peak_rss_bytes: u64,
    /// Domain-specific result summary.
    pub outcome: Outcome,
}

impl SweepItem {
    /// Items per second for the cold run. Computed against the requested
    /// batch size even when the engine under-delivered; `None` for
    /// query-axis configs.
    pub fn cold_throughput(&self) -> Option<f64> {
        self.config
            .batch_size()
            .map(|n| n as f64 / self.cold_ms * 1000.0)
    }

    /// Items per second for the warm median; `None` for query-axis configs.
    pub fn warm_throughput(&self) -> Option<f64> {
        self.config
            .batch_size()
            .map(|n| n as f64 / self.warm_ms * 1000.0)
    }
}

/// Mutable state owned by exactly one sweep: the running memory peak and the
/// append-only result accumulator. Created at sweep start, discarded at
/// process end; the sequential execution model guarantees a single writer.
pub struct SweepContext {
    peak: PeakRss,
    /// Completed results in config order. Still observable after a fault
    /// terminated the sweep early.
    pub results: Vec<SweepItem>,
}

impl SweepContext {
    /// Start a fresh context, seeding the peak with the current RSS.
    pub fn start() -> Self {
        Self {
            peak: PeakRss::start(),
            results: Vec::new(),
        }
    }
}

// ─── Domain strategy ─────────────────────────────────────────────────────────

/// Per-domain strategy plugged into [`run_sweep`]: input generation, the
/// engine operation under test, and result summarization. The three drivers
/// differ only in their implementation of this trait.
pub trait BenchDomain<E: InferenceEngine> {
    /// Inputs generated once per config and reused byte-identical across the
    /// cold and warm runs.
    type Inputs;
    /// Raw engine output of one invocation.
    type Output;

    /// Axis label used in progress prefixes ("batch", "docs").
    fn axis(&self) -> &'static str;

    /// Build the inputs for one configuration. Pure and deterministic.
    fn generate(&self, config: &BenchConfig) -> Self::Inputs;

    /// Invoke the engine operation once.
    fn invoke(&self, engine: &mut E, inputs: &Self::Inputs) -> Result<Self::Output, EngineError>;

    /// Summarize a configuration from its cold output and the last warm
    /// output.
    fn outcome(&self, config: &BenchConfig, cold: &Self::Output, last_warm: &Self::Output)
        -> Outcome;
}

// ─── Orchestration ───────────────────────────────────────────────────────────

/// Measure every configuration in order, appending one [`SweepItem`] per
/// config to `ctx` and writing incremental result lines to `out`.
///
/// Per config: inputs are generated outside the timed region, then exactly
/// one cold invocation runs before `iterations` warm invocations. RSS is
/// sampled after the cold run and after every warm run; the running peak only
/// moves upward.
///
/// An engine error propagates immediately and unmodified — no further
/// configs are measured and no partial record is appended for the faulted
/// config.
pub fn run_sweep<E, D, W>(
    engine: &mut E,
    domain: &D,
    configs: &[BenchConfig],
    iterations: usize,
    ctx: &mut SweepContext,
    out: &mut W,
) -> Result<(), BenchError>
where
    E: InferenceEngine,
    D: BenchDomain<E>,
    W: Write,
{
    for config in configs {
        let inputs = domain.generate(config);

        write!(out, "{}", report::render_progress(config, domain.axis()))?;
        out.flush()?;

        let cold = run_timed(|| domain.invoke(engine, &inputs))?;
        ctx.peak.sample();
        let cold_output = cold.value;

        let mut warm_samples = Vec::with_capacity(iterations);
        let mut last_warm = None;
        for _ in 0..iterations {
            let warm = run_timed(|| domain.invoke(engine, &inputs))?;
            warm_samples.push(warm.elapsed_ms);
            last_warm = Some(warm.value);
            ctx.peak.sample();
        }
        let warm_ms = median(&warm_samples);

        let outcome = domain.outcome(
            config,
            &cold_output,
            last_warm.as_ref().unwrap_or(&cold_output),
        );
        if let Some((delivered, requested)) = outcome.shortfall() {
            writeln!(out, "{}", report::render_shortfall(&outcome, delivered, requested))?;
            write!(out, "  {:10}", "")?;
        }

        let item = SweepItem {
            config: config.clone(),
            cold_ms: cold.elapsed_ms,
            warm_ms,
            peak_rss_bytes: ctx.peak.bytes(),
            outcome,
        };
        writeln!(out, "{}", report::render_result_line(&item))?;
        ctx.results.push(item);
    }
    Ok(())
}
