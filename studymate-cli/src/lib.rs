//! StudyMate command-line console.
//!
//! Loads a batch of plain-text documents into a [`Session`], then answers
//! questions about them interactively.

pub mod cli;
pub mod console;
pub mod loader;

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

use anyhow::Context;
use studymate_rag::chat::ChatCompletionAnswerer;
use studymate_rag::openai::OpenAiEmbedder;
use studymate_rag::{Answerer, Embedder, ExtractiveAnswerer, HashingEmbedder, Session};
use tracing::info;

pub use cli::Args;

/// Build the session described by `args`, ingest the files and run the console.
pub async fn run(args: Args) -> anyhow::Result<()> {
    let session = build_session(&args)?;

    let documents = loader::load_documents(&args.files)?;
    let chunk_count = session.ingest(&documents).await.context("failed to index documents")?;
    info!(documents = documents.len(), chunk_count, "documents indexed");
    println!("Indexed {} documents into {chunk_count} chunks. Type `exit` to quit.", documents.len());

    console::run_console(&session, args.log_path()).await?;

    let history = session.history().await;
    if let Some(path) = &args.export_txt {
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        history.write_text(BufWriter::new(file))?;
        println!("Wrote {}", path.display());
    }
    if let Some(path) = &args.export_csv {
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        history.write_csv(BufWriter::new(file))?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

/// Pick collaborators: hashing + extractive when offline, HTTP services otherwise.
pub fn build_session(args: &Args) -> anyhow::Result<Session> {
    let config = args.rag_config()?;

    let (embedder, answerer): (Arc<dyn Embedder>, Arc<dyn Answerer>) = if args.offline {
        (Arc::new(HashingEmbedder::new(args.offline_dimensions())?), Arc::new(ExtractiveAnswerer))
    } else {
        let mut embedder =
            OpenAiEmbedder::from_env().context("set OPENAI_API_KEY or pass --offline")?;
        if let Some(url) = &args.embedding_url {
            embedder = embedder.with_base_url(url);
        }
        if let Some(model) = &args.embedding_model {
            embedder = embedder.with_model(model);
        }
        if let Some(dimensions) = args.dimensions {
            embedder = embedder.with_dimensions(dimensions);
        }

        let mut answerer =
            ChatCompletionAnswerer::from_env().context("set GROQ_API_KEY or pass --offline")?;
        if let Some(model) = &args.chat_model {
            answerer = answerer.with_model(model);
        }
        (Arc::new(embedder), Arc::new(answerer))
    };

    Ok(Session::builder().config(config).embedder(embedder).answerer(answerer).build()?)
}
