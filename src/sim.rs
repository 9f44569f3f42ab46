//! Deterministic stand-in engine.
//!
//! The bundled driver binaries need a backend to exercise the pipeline, and
//! the integration tests need one whose outcomes are exactly reproducible.
//! This engine computes everything in-process: hash-seeded pseudo-embeddings,
//! token-overlap rerank scores, and template-based expansions. Real
//! deployments implement [`InferenceEngine`] over an actual inference
//! runtime instead.

use fxhash::FxHashSet;

use crate::engine::{
    ContextCounts, DeviceInfo, EngineError, InferenceEngine, Queryable, RerankDocument,
    RerankResponse, ScoredDocument,
};

const EMBED_DIM: usize = 8;

/// In-process engine with deterministic outputs and lazily created contexts.
#[derive(Debug, Default)]
pub struct SimEngine {
    contexts: ContextCounts,
    disposed: bool,
}

impl SimEngine {
    /// Fresh engine with no contexts created yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`InferenceEngine::dispose`] has run.
    pub fn disposed(&self) -> bool {
        self.disposed
    }
}

impl InferenceEngine for SimEngine {
    fn device_info(&mut self) -> Result<DeviceInfo, EngineError> {
        Ok(DeviceInfo {
            accelerator: None,
            accel_devices: Vec::new(),
            accel_memory: None,
            cpu_cores: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        })
    }

    fn embed_batch(&mut self, texts: &[String]) -> Result<Vec<Option<Vec<f32>>>, EngineError> {
        if self.contexts.embed == 0 {
            self.contexts.embed = 1;
        }
        Ok(texts.iter().map(|t| Some(pseudo_embedding(t))).collect())
    }

    fn rerank(
        &mut self,
        query: &str,
        docs: &[RerankDocument],
    ) -> Result<RerankResponse, EngineError> {
        if self.contexts.rerank == 0 {
            self.contexts.rerank = 1;
        }
        let mut results: Vec<ScoredDocument> = docs
            .iter()
            .map(|doc| ScoredDocument {
                file: doc.file.clone(),
                score: overlap_score(query, &doc.text),
            })
            .collect();
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        Ok(RerankResponse { results })
    }

    fn expand_query(&mut self, query: &str) -> Result<Vec<Queryable>, EngineError> {
        let keywords: Vec<&str> = query
            .split_whitespace()
            .filter(|w| w.len() > 3)
            .collect();
        let mut out = vec![Queryable::Lex(query.to_lowercase())];
        if !keywords.is_empty() {
            out.push(Queryable::Lex(keywords.join(" ").to_lowercase()));
        }
        out.push(Queryable::Vec(format!("information related to {query}")));
        out.push(Queryable::Hyde(format!(
            "This document explains {query}. It covers the key concepts, \
             trade-offs, and practical details a reader searching for this \
             topic would expect to find."
        )));
        Ok(out)
    }

    fn context_counts(&self) -> ContextCounts {
        self.contexts
    }

    fn dispose(&mut self) -> Result<(), EngineError> {
        self.disposed = true;
        Ok(())
    }
}

/// Hash-seeded xorshift vector in [-1, 1). Identical text always embeds to
/// an identical vector.
fn pseudo_embedding(text: &str) -> Vec<f32> {
    let mut state = fxhash::hash64(&text) | 1;
    (0..EMBED_DIM)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            ((state >> 40) as f32 / (1u32 << 23) as f32) - 1.0
        })
        .collect()
}

/// Fraction of document tokens that also occur in the query.
fn overlap_score(query: &str, text: &str) -> f32 {
    let query_tokens: FxHashSet<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let total = text.split_whitespace().count().max(1);
    let hits = text
        .to_lowercase()
        .split_whitespace()
        .filter(|w| query_tokens.contains(*w))
        .count();
    hits as f32 / total as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload;

    #[test]
    fn embeddings_are_deterministic_and_dimensioned() {
        let mut engine = SimEngine::new();
        let texts = workload::embedding_texts(3);
        let a = engine.embed_batch(&texts).unwrap();
        let b = engine.embed_batch(&texts).unwrap();
        assert_eq!(a.len(), 3);
        for (x, y) in a.iter().zip(&b) {
            let x = x.as_ref().unwrap();
            assert_eq!(x.len(), EMBED_DIM);
            assert_eq!(x, y.as_ref().unwrap());
        }
    }

    #[test]
    fn distinct_texts_embed_differently() {
        let mut engine = SimEngine::new();
        let out = engine
            .embed_batch(&["alpha".to_string(), "beta".to_string()])
            .unwrap();
        assert_ne!(out[0], out[1]);
    }

    #[test]
    fn rerank_returns_all_docs_best_first() {
        let mut engine = SimEngine::new();
        let docs = workload::rerank_docs(10);
        let response = engine
            .rerank("transformer attention mechanisms", &docs)
            .unwrap();
        assert_eq!(response.results.len(), 10);
        for pair in response.results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn expansion_yields_all_three_tags() {
        let mut engine = SimEngine::new();
        let out = engine.expand_query("machine learning").unwrap();
        assert!(out.iter().any(|q| matches!(q, Queryable::Lex(_))));
        assert!(out.iter().any(|q| matches!(q, Queryable::Vec(_))));
        assert!(out.iter().any(|q| matches!(q, Queryable::Hyde(_))));
        assert_eq!(out, engine.expand_query("machine learning").unwrap());
    }

    #[test]
    fn contexts_are_created_lazily() {
        let mut engine = SimEngine::new();
        assert_eq!(engine.context_counts(), ContextCounts::default());
        engine.embed_batch(&["x".to_string()]).unwrap();
        assert_eq!(engine.context_counts().embed, 1);
        assert_eq!(engine.context_counts().rerank, 0);
        engine.rerank("q", &workload::rerank_docs(1)).unwrap();
        assert_eq!(engine.context_counts().rerank, 1);
    }
}
