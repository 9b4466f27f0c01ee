//! Per-session question answering.
//!
//! A [`Session`] owns everything one user's study session needs: the
//! configuration, the embedder and answerer, the current [`Corpus`] and the
//! question history. Nothing is global, so independent sessions (and tests)
//! never interfere.
//!
//! Uploading a new batch builds a complete replacement corpus first and then
//! swaps it in under a write lock. Queries take an `Arc` snapshot of the
//! corpus, so a question is always answered from one batch's chunks and index.
//!
//! # Example
//!
//! ```rust,ignore
//! use studymate_rag::{Session, RagConfig, HashingEmbedder, ExtractiveAnswerer, Document};
//!
//! let session = Session::builder()
//!     .config(RagConfig::default())
//!     .embedder(Arc::new(HashingEmbedder::default()))
//!     .answerer(Arc::new(ExtractiveAnswerer))
//!     .build()?;
//!
//! session.ingest(&[Document::new("notes.txt", text)]).await?;
//! let answer = session.ask("What color is the sky?").await?;
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};

use crate::answer::Answerer;
use crate::chunking::{Chunker, FixedSizeChunker};
use crate::config::RagConfig;
use crate::document::{Document, RetrievedChunk};
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::history::{QaHistory, QaRecord};
use crate::retriever::{Corpus, Retriever};

/// An answered question with the passages it was grounded on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Answer {
    /// The question as asked.
    pub question: String,
    /// The generated answer.
    pub answer: String,
    /// Retrieved passages, most relevant first.
    pub sources: Vec<RetrievedChunk>,
    /// When the answer was recorded in the session history.
    pub asked_at: DateTime<Utc>,
}

impl Answer {
    /// Pair a history record with the passages it was answered from.
    pub fn from_record(record: QaRecord, sources: Vec<RetrievedChunk>) -> Self {
        Self { question: record.question, answer: record.answer, sources, asked_at: record.asked_at }
    }

    /// The history record this answer was stored as.
    pub fn record(&self) -> QaRecord {
        QaRecord { question: self.question.clone(), answer: self.answer.clone(), asked_at: self.asked_at }
    }
}

/// One user's corpus, collaborators and history.
pub struct Session {
    config: RagConfig,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn Embedder>,
    answerer: Arc<dyn Answerer>,
    corpus: RwLock<Option<Arc<Corpus>>>,
    history: Mutex<QaHistory>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Session {
    /// Create a new [`SessionBuilder`].
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// Return a reference to the session configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Chunk, embed and index `documents`, replacing the current corpus.
    ///
    /// Returns the number of chunks in the new corpus. The previous corpus
    /// stays active until the new one is fully built, and remains active if
    /// building fails.
    ///
    /// # Errors
    ///
    /// Propagates [`Corpus::build`] errors unchanged.
    pub async fn ingest(&self, documents: &[Document]) -> Result<usize> {
        let corpus =
            Corpus::build(documents, self.chunker.as_ref(), self.embedder.as_ref()).await?;
        let chunk_count = corpus.len();

        *self.corpus.write().await = Some(Arc::new(corpus));
        info!(documents = documents.len(), chunk_count, "replaced session corpus");
        Ok(chunk_count)
    }

    /// Returns `true` once a batch has been ingested successfully.
    pub async fn has_corpus(&self) -> bool {
        self.corpus.read().await.is_some()
    }

    /// A retriever over a snapshot of the current corpus.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NoCorpusLoaded`] before the first successful ingest.
    pub async fn retriever(&self) -> Result<Retriever> {
        let corpus = self.corpus.read().await.clone().ok_or(RagError::NoCorpusLoaded)?;
        Ok(Retriever::new(Arc::clone(&self.embedder), corpus))
    }

    /// Retrieve the configured `top_k` passages for `question`.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<RetrievedChunk>> {
        self.retriever().await?.retrieve(question, self.config.top_k).await
    }

    /// Retrieve context for `question`, answer it, and record the exchange.
    ///
    /// # Errors
    ///
    /// Retrieval and answerer errors propagate unchanged; nothing is recorded
    /// for a failed question.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let sources = self.retrieve(question).await?;
        let context: Vec<&str> = sources.iter().map(|s| s.chunk.text.as_str()).collect();

        let answer = self.answerer.answer(question, &context).await.map_err(|e| {
            error!(error = %e, "answer generation failed");
            e
        })?;

        let record = QaRecord::new(question, answer);
        self.history.lock().await.push(record.clone());
        info!(source_count = sources.len(), "answered question");

        Ok(Answer::from_record(record, sources))
    }

    /// A snapshot of the questions answered so far.
    pub async fn history(&self) -> QaHistory {
        self.history.lock().await.clone()
    }

    /// Forget all recorded questions.
    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }
}

/// Builder for constructing a [`Session`].
#[derive(Default)]
pub struct SessionBuilder {
    config: Option<RagConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    embedder: Option<Arc<dyn Embedder>>,
    answerer: Option<Arc<dyn Answerer>>,
}

impl SessionBuilder {
    /// Set the session configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the chunker. Defaults to a [`FixedSizeChunker`] built from the config.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedder.
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the answerer.
    pub fn answerer(mut self, answerer: Arc<dyn Answerer>) -> Self {
        self.answerer = Some(answerer);
        self
    }

    /// Build the [`Session`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if a required field is missing or the
    /// configuration is invalid.
    pub fn build(self) -> Result<Session> {
        let config =
            self.config.ok_or_else(|| RagError::ConfigError("config is required".to_string()))?;
        config.validate()?;
        let embedder =
            self.embedder.ok_or_else(|| RagError::ConfigError("embedder is required".to_string()))?;
        let answerer =
            self.answerer.ok_or_else(|| RagError::ConfigError("answerer is required".to_string()))?;
        let chunker = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(FixedSizeChunker::from_config(&config)?),
        };

        Ok(Session {
            config,
            chunker,
            embedder,
            answerer,
            corpus: RwLock::new(None),
            history: Mutex::new(QaHistory::new()),
        })
    }
}
