//! Benchmark drivers.
//!
//! Thin compositions of the shared pipeline around one engine operation
//! each: batched embedding, reranking, and query expansion. Every driver
//! follows the same shape — device block, engine warm-up, sweep with
//! incremental lines, post-sweep RSS settle, summary table — and disposes
//! the engine exactly once on the success path.

use std::io::Write;

use chrono::Utc;

use crate::engine::{EngineError, InferenceEngine, Queryable, RerankDocument, RerankResponse};
use crate::measure::run_timed;
use crate::memory::current_rss_bytes;
use crate::plan::{SweepPlan, RERANK_QUERY};
use crate::report;
use crate::sweep::{run_sweep, BenchConfig, BenchDomain, Outcome, SweepContext, SweepItem};
use crate::workload;
use crate::BenchError;

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Banner, device snapshot and starting RSS. The device is queried exactly
/// once, before any measurement.
fn preamble<E: InferenceEngine, W: Write>(
    engine: &mut E,
    title: &str,
    out: &mut W,
) -> Result<(), BenchError> {
    write!(out, "{}\n", report::render_banner(title))?;
    let device = engine.device_info()?;
    write!(
        out,
        "{}",
        report::render_device(&device, current_rss_bytes(), Utc::now())
    )?;
    Ok(())
}

/// RSS line after the sweep has settled, before the summary.
fn settle<W: Write>(out: &mut W) -> Result<(), BenchError> {
    writeln!(
        out,
        "\nRSS: {} after sweep",
        report::format_bytes(current_rss_bytes())
    )?;
    Ok(())
}

fn sweep_header<W: Write>(out: &mut W, iterations: usize) -> Result<(), BenchError> {
    writeln!(
        out,
        "\nBenchmark (1 cold + {} warm iteration{} per config)",
        iterations,
        plural(iterations)
    )?;
    Ok(())
}

// ─── Embedding ───────────────────────────────────────────────────────────────

struct EmbedDomain;

impl<E: InferenceEngine> BenchDomain<E> for EmbedDomain {
    type Inputs = Vec<String>;
    type Output = Vec<Option<Vec<f32>>>;

    fn axis(&self) -> &'static str {
        "batch"
    }

    fn generate(&self, config: &BenchConfig) -> Vec<String> {
        workload::embedding_texts(config.batch_size().unwrap_or_default())
    }

    fn invoke(
        &self,
        engine: &mut E,
        inputs: &Vec<String>,
    ) -> Result<Vec<Option<Vec<f32>>>, EngineError> {
        engine.embed_batch(inputs)
    }

    fn outcome(
        &self,
        config: &BenchConfig,
        cold: &Vec<Option<Vec<f32>>>,
        _last_warm: &Vec<Option<Vec<f32>>>,
    ) -> Outcome {
        Outcome::Embedded {
            requested: config.batch_size().unwrap_or_default(),
            valid: cold.iter().filter(|e| e.is_some()).count(),
        }
    }
}

/// Batched-embedding throughput benchmark.
pub fn run_embed<E: InferenceEngine, W: Write>(
    engine: &mut E,
    plan: &SweepPlan,
    out: &mut W,
) -> Result<Vec<SweepItem>, BenchError> {
    preamble(engine, "Embedding Benchmark", out)?;

    // First embed triggers model load + context creation; measured
    // separately so per-config cold times stay comparable.
    writeln!(out, "\nLoading model + creating contexts...")?;
    let warmup = workload::embedding_texts(1);
    let init = run_timed(|| engine.embed_batch(&warmup))?;
    let counts = engine.context_counts();
    writeln!(
        out,
        "  {} embed context{} created in {:.0}ms",
        counts.embed,
        plural(counts.embed),
        init.elapsed_ms
    )?;

    sweep_header(out, plan.iterations)?;
    writeln!(out)?;

    let mut ctx = SweepContext::start();
    run_sweep(engine, &EmbedDomain, &plan.configs, plan.iterations, &mut ctx, out)?;

    settle(out)?;
    write!(
        out,
        "\n{}\n",
        report::render_batch_summary(&ctx.results, "Batch", "Texts/s")
    )?;
    engine.dispose()?;
    Ok(ctx.results)
}

// ─── Reranking ───────────────────────────────────────────────────────────────

struct RerankDomain {
    query: String,
}

impl<E: InferenceEngine> BenchDomain<E> for RerankDomain {
    type Inputs = Vec<RerankDocument>;
    type Output = RerankResponse;

    fn axis(&self) -> &'static str {
        "docs"
    }

    fn generate(&self, config: &BenchConfig) -> Vec<RerankDocument> {
        workload::rerank_docs(config.batch_size().unwrap_or_default())
    }

    fn invoke(
        &self,
        engine: &mut E,
        inputs: &Vec<RerankDocument>,
    ) -> Result<RerankResponse, EngineError> {
        engine.rerank(&self.query, inputs)
    }

    fn outcome(
        &self,
        config: &BenchConfig,
        cold: &RerankResponse,
        _last_warm: &RerankResponse,
    ) -> Outcome {
        Outcome::Reranked {
            requested: config.batch_size().unwrap_or_default(),
            returned: cold.results.len(),
        }
    }
}

/// Rerank throughput benchmark over a fixed query.
pub fn run_rerank<E: InferenceEngine, W: Write>(
    engine: &mut E,
    plan: &SweepPlan,
    out: &mut W,
) -> Result<Vec<SweepItem>, BenchError> {
    preamble(engine, "Reranker Benchmark", out)?;

    writeln!(out, "\nLoading model + creating contexts...")?;
    let warmup = workload::rerank_docs(2);
    let init = run_timed(|| engine.rerank(RERANK_QUERY, &warmup))?;
    let counts = engine.context_counts();
    writeln!(
        out,
        "  {} rerank context{} created in {:.0}ms",
        counts.rerank,
        plural(counts.rerank),
        init.elapsed_ms
    )?;

    sweep_header(out, plan.iterations)?;
    let echo: String = RERANK_QUERY.chars().take(50).collect();
    writeln!(out, "  Query: \"{echo}...\"\n")?;

    let domain = RerankDomain {
        query: RERANK_QUERY.to_string(),
    };
    let mut ctx = SweepContext::start();
    run_sweep(engine, &domain, &plan.configs, plan.iterations, &mut ctx, out)?;

    settle(out)?;
    write!(
        out,
        "\n{}\n",
        report::render_batch_summary(&ctx.results, "Docs", "Docs/s")
    )?;
    engine.dispose()?;
    Ok(ctx.results)
}

// ─── Query expansion ─────────────────────────────────────────────────────────

struct ExpandDomain;

impl<E: InferenceEngine> BenchDomain<E> for ExpandDomain {
    type Inputs = String;
    type Output = Vec<Queryable>;

    fn axis(&self) -> &'static str {
        "query"
    }

    fn generate(&self, config: &BenchConfig) -> String {
        config.query_text().unwrap_or_default().to_string()
    }

    fn invoke(&self, engine: &mut E, inputs: &String) -> Result<Vec<Queryable>, EngineError> {
        engine.expand_query(inputs)
    }

    fn outcome(
        &self,
        _config: &BenchConfig,
        _cold: &Vec<Queryable>,
        last_warm: &Vec<Queryable>,
    ) -> Outcome {
        Outcome::Expanded {
            total: last_warm.len(),
            breakdown: crate::sweep::ExpansionBreakdown::tally(last_warm),
        }
    }
}

/// Query-expansion latency benchmark across query shapes.
pub fn run_expand<E: InferenceEngine, W: Write>(
    engine: &mut E,
    plan: &SweepPlan,
    out: &mut W,
) -> Result<Vec<SweepItem>, BenchError> {
    preamble(engine, "Query Expansion Benchmark", out)?;

    writeln!(out, "\nLoading model...")?;
    let init = run_timed(|| engine.expand_query("warmup query"))?;
    writeln!(
        out,
        "  Model loaded in {:.0}ms (creates fresh context per call)",
        init.elapsed_ms
    )?;

    sweep_header(out, plan.iterations)?;
    writeln!(out)?;

    let mut ctx = SweepContext::start();
    run_sweep(engine, &ExpandDomain, &plan.configs, plan.iterations, &mut ctx, out)?;

    settle(out)?;
    write!(out, "\n{}\n", report::render_query_summary(&ctx.results))?;
    engine.dispose()?;
    Ok(ctx.results)
}
