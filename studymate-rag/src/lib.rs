//! Retrieval core for StudyMate.
//!
//! Answers questions about uploaded documents by retrieving the most relevant
//! passages and handing them to a language model as the only allowed context.
//!
//! - [`chunking`]: bounded, optionally overlapping character windows
//! - [`Embedder`]: text to fixed-dimension vectors
//! - [`VectorIndex`] / [`FlatIndex`]: exact squared-L2 nearest-neighbor search
//! - [`Retriever`] / [`Corpus`]: top-k chunks for a question
//! - [`Session`]: per-user corpus, answerer and [`QaHistory`]
//!
//! Feature `openai` adds HTTP collaborators: [`openai::OpenAiEmbedder`] and
//! [`chat::ChatCompletionAnswerer`].

pub mod answer;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod flat;
pub mod hashing;
pub mod history;
pub mod retriever;
pub mod session;
pub mod vectorindex;

#[cfg(feature = "openai")]
pub mod chat;
#[cfg(feature = "openai")]
pub mod openai;

pub use answer::{Answerer, ExtractiveAnswerer, build_prompt};
pub use chunking::{Chunker, FixedSizeChunker, chunk_documents, chunk_text};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, Neighbor, RetrievedChunk};
pub use embedding::Embedder;
pub use error::{RagError, Result};
pub use flat::{FlatIndex, squared_l2};
pub use hashing::HashingEmbedder;
pub use history::{QaHistory, QaRecord, append_log};
pub use retriever::{Corpus, Retriever};
pub use session::{Answer, Session, SessionBuilder};
pub use vectorindex::VectorIndex;
