#![warn(missing_docs)]
//! # embench
//!
//! Throughput and latency micro-benchmarks for a batched text-inference
//! engine: embedding, reranking, and query expansion.
//!
//! The crate is the measurement harness only; the engine behind
//! [`engine::InferenceEngine`] is an external collaborator. Three driver
//! binaries (`bench-embed`, `bench-rerank`, `bench-expand`) compose one
//! shared pipeline:
//!
//! - deterministic synthetic workloads ([`workload`])
//! - a cold + N-warm measurement protocol with median aggregation
//!   ([`measure`])
//! - a generic sweep orchestrator with cumulative peak-RSS tracking
//!   ([`sweep`], [`memory`])
//! - incremental and summary text reporting ([`report`])
//!
//! All engine invocations are strictly sequential — the engine's contexts
//! and accelerator memory are shared state — and a faulted invocation
//! terminates the sweep immediately instead of masking engine behavior.
//! Output is human-readable text on stdout; the only flag is `--quick`.

pub mod drivers;
pub mod engine;
pub mod measure;
pub mod memory;
pub mod plan;
pub mod report;
pub mod sim;
pub mod sweep;
pub mod workload;

use thiserror::Error;

/// Top-level driver failure.
#[derive(Debug, Error)]
pub enum BenchError {
    /// The engine raised; the sweep terminated fail-fast.
    #[error(transparent)]
    Engine(#[from] engine::EngineError),
    /// Writing benchmark output failed.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}
