//! External inference engine contract.
//!
//! The engine itself — model loading, execution contexts, the actual
//! embedding/reranking/expansion computation — is an external collaborator.
//! This module fixes only the call surface the benchmark drivers consume,
//! with tagged result types so downstream breakdown logic stays exhaustive.
//!
//! All calls are synchronous and must be issued strictly sequentially: the
//! engine's internal resource state (contexts, accelerator memory) is shared
//! and not assumed safe under concurrent access.

use thiserror::Error;

/// Fault raised by an engine operation.
///
/// Faults are fatal to a sweep: a failed invocation may have left engine-side
/// context state inconsistent, so no recovery or retry is attempted anywhere.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Model or execution context could not be initialized.
    #[error("engine initialization failed: {0}")]
    Init(String),
    /// An inference invocation failed outright.
    #[error("inference failed: {0}")]
    Inference(String),
    /// Backend I/O fault (model files, device queries).
    #[error("engine i/o: {0}")]
    Io(#[from] std::io::Error),
}

/// Immutable device snapshot, queried once per process before any
/// measurement.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Accelerator backend label (e.g. "cuda", "metal"); `None` means CPU
    /// only.
    pub accelerator: Option<String>,
    /// Names of the accelerator devices visible to the engine.
    pub accel_devices: Vec<String>,
    /// Accelerator memory, when the backend exposes it.
    pub accel_memory: Option<MemoryInfo>,
    /// Math core count used by the engine.
    pub cpu_cores: usize,
}

/// Total/free byte pair for accelerator memory.
#[derive(Debug, Clone, Copy)]
pub struct MemoryInfo {
    /// Total device memory in bytes.
    pub total: u64,
    /// Free device memory in bytes.
    pub free: u64,
}

/// One document handed to the reranker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RerankDocument {
    /// Source identifier, e.g. a file path.
    pub file: String,
    /// Passage body scored against the query.
    pub text: String,
    /// Display title.
    pub title: String,
}

/// One scored document coming back from the reranker.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    /// Source identifier of the ranked document.
    pub file: String,
    /// Relevance score, higher is better.
    pub score: f32,
}

/// Reranker output, best first. May contain fewer entries than the request.
#[derive(Debug, Clone)]
pub struct RerankResponse {
    /// Ranked documents.
    pub results: Vec<ScoredDocument>,
}

/// A structured expansion candidate produced by query expansion, tagged by
/// origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Queryable {
    /// Lexical rewrite for sparse (BM25-style) retrieval.
    Lex(String),
    /// Dense-retrieval paraphrase.
    Vec(String),
    /// Hypothetical document passage (HyDE-style).
    Hyde(String),
}

/// Counts of lazily created execution contexts. Diagnostic only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextCounts {
    /// Embedding contexts created so far.
    pub embed: usize,
    /// Rerank contexts created so far.
    pub rerank: usize,
}

/// The black-box collaborator every benchmark driver runs against.
pub trait InferenceEngine {
    /// Device snapshot. Idempotent; drivers call it once.
    fn device_info(&mut self) -> Result<DeviceInfo, EngineError>;

    /// Embed a batch of texts. The output has the same length and order as
    /// the input; `None` marks an item that failed to embed.
    fn embed_batch(&mut self, texts: &[String]) -> Result<Vec<Option<Vec<f32>>>, EngineError>;

    /// Score and rank `docs` against `query`. The response may be shorter
    /// than the request.
    fn rerank(
        &mut self,
        query: &str,
        docs: &[RerankDocument],
    ) -> Result<RerankResponse, EngineError>;

    /// Expand a query into retrieval candidates.
    fn expand_query(&mut self, query: &str) -> Result<Vec<Queryable>, EngineError>;

    /// Current per-operation context counts.
    fn context_counts(&self) -> ContextCounts;

    /// Release all engine resources. Invoked exactly once at process end on
    /// the success path.
    fn dispose(&mut self) -> Result<(), EngineError>;
}
