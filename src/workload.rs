//! Deterministic synthetic workloads.
//!
//! Each generator cycles through a small fixed corpus (`i % corpus.len()`)
//! to build exactly `n` inputs. Generation is pure: the same `n` always
//! yields an identical sequence, so warm runs reuse byte-identical inputs to
//! the cold run.

use crate::engine::RerankDocument;

/// Sample passages for the embedding benchmark.
pub const EMBED_CORPUS: [&str; 10] = [
    "Query expansion generates hypothetical documents that help bridge the vocabulary gap between user queries and relevant documents in the corpus.",
    "BM25 scoring uses term frequency and inverse document frequency to rank documents by lexical relevance to the search query.",
    "Vector embeddings capture semantic meaning allowing retrieval of conceptually similar documents even without keyword overlap.",
    "Hybrid search combines sparse BM25 retrieval with dense vector search to get the best of both lexical and semantic matching.",
    "Reranking with cross-encoder models provides more accurate relevance scores by jointly encoding the query and document together.",
    "The transformer architecture revolutionized natural language processing through self-attention mechanisms that weigh input importance.",
    "Fine-tuning adapts pre-trained models to specific tasks using domain data while techniques like LoRA reduce trainable parameters.",
    "Retrieval-augmented generation combines information retrieval with language models for grounded, factual text generation.",
    "Neural network training involves forward propagation, loss computation, and backpropagation with optimizers adjusting weights.",
    "Large language models exhibit emergent capabilities at scale including few-shot learning and chain-of-thought reasoning.",
];

/// Sample passages for the rerank benchmark. Longer than the embedding
/// corpus, closer to real retrieval chunks.
pub const RERANK_CORPUS: [&str; 10] = [
    "Artificial intelligence agents are software systems that perceive their environment and take actions to achieve goals. They use techniques like reinforcement learning, planning, and natural language processing to operate autonomously.",
    "The transformer architecture, introduced in 2017, revolutionized natural language processing. Self-attention mechanisms allow models to weigh the importance of different parts of input sequences when generating outputs.",
    "Machine learning models require careful evaluation to avoid overfitting. Cross-validation, holdout sets, and metrics like precision, recall, and F1 score help assess generalization performance.",
    "Retrieval-augmented generation combines information retrieval with language models. Documents are embedded into vector spaces, retrieved based on query similarity, and used as context for generation.",
    "Neural network training involves forward propagation, loss computation, and backpropagation. Optimizers like Adam and SGD adjust weights to minimize the loss function over training iterations.",
    "Large language models exhibit emergent capabilities at scale, including few-shot learning, chain-of-thought reasoning, and instruction following. These properties were not explicitly trained for.",
    "Embedding models convert text into dense vector representations that capture semantic meaning. Similar texts produce similar vectors, enabling efficient similarity search and clustering.",
    "Autonomous agents face challenges including hallucination, lack of grounding, limited planning horizons, and difficulty with multi-step reasoning. Safety and alignment remain open research problems.",
    "The attention mechanism computes query-key-value interactions to determine which parts of the input are most relevant. Multi-head attention allows the model to attend to different representation subspaces.",
    "Fine-tuning adapts a pre-trained model to specific tasks using domain-specific data. Techniques like LoRA reduce the number of trainable parameters while maintaining performance.",
];

/// A labelled query for the expansion benchmark.
#[derive(Debug, Clone, Copy)]
pub struct QueryCase {
    /// Short label identifying the query shape.
    pub label: &'static str,
    /// The query text itself.
    pub text: &'static str,
}

/// Fixed query set covering the query shapes seen in production.
pub const EXPANSION_QUERIES: [QueryCase; 5] = [
    QueryCase {
        label: "short",
        text: "machine learning",
    },
    QueryCase {
        label: "question",
        text: "How do transformers handle long-range dependencies?",
    },
    QueryCase {
        label: "complex",
        text: "compare BM25 sparse retrieval vs dense vector search for domain-specific corpora",
    },
    QueryCase {
        label: "code",
        text: "async function embedBatch parallel context splitting",
    },
    QueryCase {
        label: "natural",
        text: "I want to find my notes about the quarterly review from last month",
    },
];

/// Frame a passage the way documents are framed before embedding: a title
/// heading followed by the body.
pub fn format_doc(title: &str, body: &str) -> String {
    format!("# {title}\n\n{body}")
}

/// `n` formatted documents for the embedding benchmark.
pub fn embedding_texts(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            format_doc(
                &format!("Document {}", i + 1),
                EMBED_CORPUS[i % EMBED_CORPUS.len()],
            )
        })
        .collect()
}

/// `n` document records for the rerank benchmark.
pub fn rerank_docs(n: usize) -> Vec<RerankDocument> {
    (0..n)
        .map(|i| RerankDocument {
            file: format!("doc-{i}.md"),
            text: RERANK_CORPUS[i % RERANK_CORPUS.len()].to_string(),
            title: format!("Document {}", i + 1),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generators_produce_exactly_n_inputs() {
        assert_eq!(embedding_texts(0).len(), 0);
        assert_eq!(embedding_texts(7).len(), 7);
        assert_eq!(rerank_docs(23).len(), 23);
    }

    #[test]
    fn generation_is_deterministic() {
        let a = embedding_texts(5);
        let b = embedding_texts(5);
        assert_eq!(a, b);
        assert_eq!(rerank_docs(5), rerank_docs(5));
    }

    #[test]
    fn corpus_cycles_modulo_length() {
        let texts = embedding_texts(12);
        assert!(texts[0].contains(EMBED_CORPUS[0]));
        assert!(texts[10].contains(EMBED_CORPUS[0]));
        assert!(texts[11].contains(EMBED_CORPUS[1]));

        let docs = rerank_docs(12);
        assert_eq!(docs[0].text, docs[10].text);
    }

    #[test]
    fn documents_carry_positional_identity() {
        let docs = rerank_docs(3);
        assert_eq!(docs[2].file, "doc-2.md");
        assert_eq!(docs[2].title, "Document 3");
    }
}
