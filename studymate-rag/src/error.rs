//! Error types for the `studymate-rag` crate.

use thiserror::Error;

/// Errors that can occur while building or querying a corpus.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid chunking, search or builder parameters. Caller error, not retried.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The embedding model was unreachable or returned an unusable response.
    #[error("Embedding unavailable ({provider}): {message}")]
    EmbeddingUnavailable {
        /// The embedder that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A vector did not have the dimensionality of the index it was used with.
    #[error("Dimension mismatch in {context}: expected {expected}, found {actual}")]
    DimensionMismatch {
        /// The dimensionality fixed by the index.
        expected: usize,
        /// The dimensionality that was supplied.
        actual: usize,
        /// Where the offending vector came from (a row number or the query).
        context: String,
    },

    /// A vector contained a NaN or infinite component.
    #[error("Non-finite value in {context}")]
    NonFiniteValue {
        /// Where the offending vector came from (a row number or the query).
        context: String,
    },

    /// An index was built from zero vectors.
    #[error("Cannot build an index from an empty corpus")]
    EmptyCorpus,

    /// The answering model was unreachable or returned an unusable response.
    #[error("Answer unavailable ({provider}): {message}")]
    AnswerUnavailable {
        /// The answerer that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A question was asked before any documents were ingested.
    #[error("No corpus loaded: ingest documents before asking questions")]
    NoCorpusLoaded,

    /// Writing a history export or log failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Encoding the CSV history export failed.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
