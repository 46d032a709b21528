//! LLM-phrased clarification questions.

use async_trait::async_trait;
use stall_core::error::{Result, StallError};
use stall_core::item::ItemType;
use stall_core::llm::LlmClarifier;
use stall_core::session::SessionContext;
use stall_core::slot::Slot;

use crate::chat_client::ChatClient;
use crate::prompts;

const QUOTES: &[char] = &['"', '\'', '「', '」', '“', '”'];

/// Trims whitespace and wrapping quotes from a model-phrased question.
pub fn clean_question(reply: &str) -> Option<String> {
    let question = reply.trim().trim_matches(QUOTES).trim();
    (!question.is_empty()).then(|| question.to_string())
}

/// [`LlmClarifier`] over an OpenAI-compatible chat endpoint.
#[derive(Debug, Clone)]
pub struct ChatLlmClarifier {
    client: ChatClient,
}

impl ChatLlmClarifier {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LlmClarifier for ChatLlmClarifier {
    async fn ask(
        &self,
        item_type: ItemType,
        slot: Slot,
        context: &SessionContext,
    ) -> Result<String> {
        let (system, user) = prompts::clarifier_prompts(item_type, slot, context)?;
        let reply = self.client.complete(&system, &user).await?;
        clean_question(&reply).ok_or_else(|| StallError::llm("Clarifier returned an empty question"))
    }
}
