//! Scenario tests for corpus building, retrieval and sessions.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use studymate_rag::{
    Corpus, Document, Embedder, ExtractiveAnswerer, FixedSizeChunker, FlatIndex,
    HashingEmbedder, RagConfig, RagError, Retriever, Session,
};

fn sentences() -> Vec<Document> {
    vec![
        Document::new("sky", "The sky is blue."),
        Document::new("water", "Water boils at 100C."),
        Document::new("paris", "Paris is in France."),
    ]
}

/// An embedder whose backend is down. Counts the calls it receives.
#[derive(Default)]
struct UnavailableEmbedder {
    calls: AtomicUsize,
}

#[async_trait]
impl Embedder for UnavailableEmbedder {
    async fn embed_one(&self, _text: &str) -> studymate_rag::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RagError::EmbeddingUnavailable {
            provider: "test".into(),
            message: "connection refused".into(),
        })
    }

    fn dimensions(&self) -> usize {
        4
    }
}

/// An embedder that drops the last vector of every batch.
struct ShortBatchEmbedder;

#[async_trait]
impl Embedder for ShortBatchEmbedder {
    async fn embed_one(&self, _text: &str) -> studymate_rag::Result<Vec<f32>> {
        Ok(vec![1.0, 0.0])
    }

    async fn embed(&self, texts: &[&str]) -> studymate_rag::Result<Vec<Vec<f32>>> {
        Ok(vec![vec![1.0, 0.0]; texts.len().saturating_sub(1)])
    }

    fn dimensions(&self) -> usize {
        2
    }
}

async fn build_retriever(documents: &[Document]) -> Retriever {
    let embedder: Arc<dyn Embedder> = Arc::new(HashingEmbedder::default());
    let chunker = FixedSizeChunker::new(100, 0).unwrap();
    let corpus = Corpus::build(documents, &chunker, embedder.as_ref()).await.unwrap();
    Retriever::new(embedder, Arc::new(corpus))
}

fn offline_session(config: RagConfig) -> Session {
    Session::builder()
        .config(config)
        .embedder(Arc::new(HashingEmbedder::default()))
        .answerer(Arc::new(ExtractiveAnswerer))
        .build()
        .unwrap()
}

#[tokio::test]
async fn one_chunk_per_short_sentence() {
    let retriever = build_retriever(&sentences()).await;
    let texts: Vec<&str> = retriever.corpus().chunks().iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["The sky is blue.", "Water boils at 100C.", "Paris is in France."]);
}

#[tokio::test]
async fn sky_question_retrieves_sky_sentence() {
    let retriever = build_retriever(&sentences()).await;

    let results = retriever.retrieve("What color is the sky?", 1).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk.text, "The sky is blue.");
    assert_eq!(results[0].chunk.position, 0);
    assert_eq!(results[0].chunk.document_id, "sky");
}

#[tokio::test]
async fn k_larger_than_corpus_returns_every_chunk() {
    let documents = &sentences()[..2];
    let retriever = build_retriever(documents).await;

    let results = retriever.retrieve("boiling water", 3).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].chunk.text, "Water boils at 100C.");
    assert!(results[0].distance <= results[1].distance);
}

#[tokio::test]
async fn empty_corpus_fails_before_embedding() {
    let embedder = UnavailableEmbedder::default();
    let chunker = FixedSizeChunker::new(100, 0).unwrap();

    let err = Corpus::build(&[Document::new("blank", "")], &chunker, &embedder).await.unwrap_err();

    assert!(matches!(err, RagError::EmptyCorpus));
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn embedder_failure_propagates_unchanged() {
    let embedder = UnavailableEmbedder::default();
    let chunker = FixedSizeChunker::new(100, 0).unwrap();

    let err = Corpus::build(&sentences(), &chunker, &embedder).await.unwrap_err();

    match err {
        RagError::EmbeddingUnavailable { provider, message } => {
            assert_eq!(provider, "test");
            assert_eq!(message, "connection refused");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn query_embedding_failure_propagates() {
    let working = build_retriever(&sentences()).await;
    let broken = Retriever::new(Arc::new(UnavailableEmbedder::default()), Arc::clone(working.corpus()));

    let err = broken.retrieve("anything", 3).await.unwrap_err();
    assert!(matches!(err, RagError::EmbeddingUnavailable { .. }));
}

#[tokio::test]
async fn short_embedding_batch_is_not_silently_accepted() {
    let chunker = FixedSizeChunker::new(100, 0).unwrap();
    let err = Corpus::build(&sentences(), &chunker, &ShortBatchEmbedder).await.unwrap_err();
    assert!(matches!(err, RagError::EmbeddingUnavailable { .. }));
}

#[tokio::test]
async fn corpus_from_parts_checks_alignment() {
    let chunker = FixedSizeChunker::new(100, 0).unwrap();
    let chunks = studymate_rag::chunk_documents(&chunker, &sentences());
    let index = FlatIndex::build(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();

    let err = Corpus::from_parts(chunks, Box::new(index)).unwrap_err();
    assert!(matches!(err, RagError::ConfigError(_)));
}

#[tokio::test]
async fn session_requires_a_corpus() {
    let session = offline_session(RagConfig::default());
    assert!(!session.has_corpus().await);
    assert!(matches!(session.ask("hello?").await, Err(RagError::NoCorpusLoaded)));
    assert!(session.history().await.is_empty());
}

#[tokio::test]
async fn session_answers_and_records_history() {
    let config = RagConfig::builder().chunk_size(100).top_k(1).build().unwrap();
    let session = offline_session(config);
    assert_eq!(session.ingest(&sentences()).await.unwrap(), 3);

    let answer = session.ask("What color is the sky?").await.unwrap();

    assert_eq!(answer.answer, "The sky is blue.");
    assert_eq!(answer.sources.len(), 1);
    let history = session.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history.records()[0].question, "What color is the sky?");
    assert_eq!(answer.record(), history.records()[0]);

    session.clear_history().await;
    assert!(session.history().await.is_empty());
}

#[tokio::test]
async fn new_batch_replaces_old_corpus() {
    let session = offline_session(RagConfig::default());
    session.ingest(&sentences()).await.unwrap();
    let before = session.retriever().await.unwrap();

    session.ingest(&[Document::new("rust", "Rust has no garbage collector.")]).await.unwrap();

    // A retriever taken earlier keeps its own snapshot.
    assert_eq!(before.corpus().len(), 3);
    let results = session.retrieve("What color is the sky?").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk.document_id, "rust");
}

#[tokio::test]
async fn failed_ingest_keeps_previous_corpus() {
    let session = offline_session(RagConfig::default());
    session.ingest(&sentences()).await.unwrap();

    let err = session.ingest(&[Document::new("blank", "")]).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyCorpus));

    let results = session.retrieve("Where is Paris?").await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].chunk.text, "Paris is in France.");
}

#[tokio::test]
async fn builder_rejects_missing_parts() {
    let err = Session::builder().config(RagConfig::default()).build().unwrap_err();
    assert!(matches!(err, RagError::ConfigError(_)));
}
