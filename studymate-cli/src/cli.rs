//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use studymate_rag::{HashingEmbedder, RagConfig};

/// Ask questions about your documents, answered strictly from their content.
#[derive(Debug, Clone, Parser)]
#[command(name = "studymate", version, about)]
pub struct Args {
    /// Text or PDF documents to load (one upload batch).
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Maximum chunk length in characters.
    #[arg(long, env = "STUDYMATE_CHUNK_SIZE", default_value_t = 500)]
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks.
    #[arg(long, env = "STUDYMATE_CHUNK_OVERLAP", default_value_t = 0)]
    pub chunk_overlap: usize,

    /// Passages retrieved per question.
    #[arg(long, env = "STUDYMATE_TOP_K", default_value_t = 3)]
    pub top_k: usize,

    /// Use the local hashing embedder and extractive answers; no API keys needed.
    #[arg(long)]
    pub offline: bool,

    /// Base URL of the OpenAI-compatible embeddings server.
    #[arg(long, env = "STUDYMATE_EMBEDDING_URL")]
    pub embedding_url: Option<String>,

    /// Embedding model name.
    #[arg(long, env = "STUDYMATE_EMBEDDING_MODEL")]
    pub embedding_model: Option<String>,

    /// Embedding dimensions (hashing buckets when offline).
    #[arg(long, env = "STUDYMATE_DIMENSIONS")]
    pub dimensions: Option<usize>,

    /// Chat model used to answer questions.
    #[arg(long, env = "STUDYMATE_CHAT_MODEL")]
    pub chat_model: Option<String>,

    /// File that every answered question is appended to.
    #[arg(long, default_value = "logs/qa_history.txt")]
    pub log_file: PathBuf,

    /// Do not append answered questions to the log file.
    #[arg(long)]
    pub no_log: bool,

    /// Write the session's Q&A history as text on exit.
    #[arg(long)]
    pub export_txt: Option<PathBuf>,

    /// Write the session's Q&A history as CSV on exit.
    #[arg(long)]
    pub export_csv: Option<PathBuf>,
}

impl Args {
    /// The validated retrieval configuration.
    pub fn rag_config(&self) -> studymate_rag::Result<RagConfig> {
        RagConfig::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .top_k(self.top_k)
            .build()
    }

    /// Dimensions for the offline embedder.
    pub fn offline_dimensions(&self) -> usize {
        self.dimensions.unwrap_or(HashingEmbedder::DEFAULT_DIMENSIONS)
    }

    /// The log file, unless logging is disabled.
    pub fn log_path(&self) -> Option<&std::path::Path> {
        (!self.no_log).then_some(self.log_file.as_path())
    }
}
