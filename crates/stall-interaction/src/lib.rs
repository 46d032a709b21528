//! Optional LLM collaborators over an OpenAI-compatible chat completions API.
//!
//! The dialogue core works without them; when configured they classify
//! utterances the keyword router cannot place and phrase slot questions.

pub mod chat_client;
pub mod llm_clarifier;
pub mod llm_router;
pub mod prompts;

pub use crate::chat_client::ChatClient;
pub use crate::llm_clarifier::ChatLlmClarifier;
pub use crate::llm_router::ChatLlmRouter;
