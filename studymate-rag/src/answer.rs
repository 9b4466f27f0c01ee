//! Answerer trait for grounded answer generation.

use async_trait::async_trait;

use crate::error::Result;

/// A language model that answers a question from retrieved context only.
///
/// The production implementation is
/// [`ChatCompletionAnswerer`](crate::chat::ChatCompletionAnswerer) (feature
/// `openai`); [`ExtractiveAnswerer`] is the deterministic offline stand-in.
#[async_trait]
pub trait Answerer: Send + Sync {
    /// Answer `question` using only `context`, ordered most relevant first.
    async fn answer(&self, question: &str, context: &[&str]) -> Result<String>;
}

/// Build the context-restricted prompt sent to a chat model.
pub fn build_prompt(question: &str, context: &[&str]) -> String {
    let mut prompt = String::from("Answer based strictly on the following context:\n");
    for chunk in context {
        prompt.push_str("- ");
        prompt.push_str(chunk);
        prompt.push('\n');
    }
    prompt.push_str("\nQuestion: ");
    prompt.push_str(question);
    prompt.push_str("\nAnswer:");
    prompt
}

/// Answers with the most relevant passage verbatim.
///
/// Needs no model, so it is used by tests and the CLI's offline mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractiveAnswerer;

impl ExtractiveAnswerer {
    /// Returned when no context was retrieved.
    pub const NO_CONTEXT: &'static str = "The provided documents do not contain an answer.";
}

#[async_trait]
impl Answerer for ExtractiveAnswerer {
    async fn answer(&self, _question: &str, context: &[&str]) -> Result<String> {
        Ok(context.first().map_or(Self::NO_CONTEXT, |c| c.trim()).to_string())
    }
}
