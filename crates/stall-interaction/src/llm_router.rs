//! LLM-backed classifier for spans the keyword router leaves unplaced.

use async_trait::async_trait;
use serde::Deserialize;
use stall_core::error::{Result, StallError};
use stall_core::llm::{LlmRoute, LlmRouter};
use stall_core::router::RouteCategory;
use stall_core::session::SessionContext;

use crate::chat_client::ChatClient;
use crate::prompts;

/// Reply shape requested from the model. Older prompts used `category`.
#[derive(Debug, Deserialize)]
struct RouteReply {
    #[serde(alias = "category")]
    route_type: String,
    #[serde(default)]
    confidence: f32,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Strips a Markdown code fence around a JSON reply, if present.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Parses a classifier reply.
///
/// Only item categories may come back from the model; anything else,
/// command routes included, becomes `Unknown`.
pub fn parse_route_reply(reply: &str) -> Result<LlmRoute> {
    let body = strip_code_fence(reply);
    let parsed: RouteReply = serde_json::from_str(body).map_err(|e| {
        StallError::llm(format!("Malformed classifier reply: {} ({})", e, body))
    })?;

    let category = parsed
        .route_type
        .trim()
        .parse::<RouteCategory>()
        .ok()
        .filter(|c| c.item_type().is_some())
        .unwrap_or(RouteCategory::Unknown);

    Ok(LlmRoute {
        category,
        confidence: parsed.confidence.clamp(0.0, 1.0),
        reasoning: parsed.reasoning,
    })
}

/// [`LlmRouter`] over an OpenAI-compatible chat endpoint.
#[derive(Debug, Clone)]
pub struct ChatLlmRouter {
    client: ChatClient,
}

impl ChatLlmRouter {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LlmRouter for ChatLlmRouter {
    async fn classify(&self, text: &str, context: &SessionContext) -> Result<LlmRoute> {
        let (system, user) = prompts::router_prompts(text, context)?;
        let reply = self.client.complete(&system, &user).await?;
        let route = parse_route_reply(&reply)?;
        tracing::info!(
            "[LlmRouter] '{}' -> {} ({:.2})",
            text,
            route.category,
            route.confidence
        );
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let route = parse_route_reply(
            r#"{"route_type": "snack", "confidence": 0.86, "reasoning": "脆脆的通常是薯餅"}"#,
        )
        .unwrap();
        assert_eq!(route.category, RouteCategory::Snack);
        assert!((route.confidence - 0.86).abs() < f32::EPSILON);
        assert_eq!(route.reasoning.as_deref(), Some("脆脆的通常是薯餅"));
    }

    #[test]
    fn test_parse_fenced_reply_with_category_key() {
        let route =
            parse_route_reply("```json\n{\"category\": \"drink\", \"confidence\": 1.4}\n```")
                .unwrap();
        assert_eq!(route.category, RouteCategory::Drink);
        assert_eq!(route.confidence, 1.0);
    }

    #[test]
    fn test_unexpected_category_is_unknown() {
        let route = parse_route_reply(r#"{"route_type": "dessert", "confidence": 0.9}"#).unwrap();
        assert_eq!(route.category, RouteCategory::Unknown);

        let route = parse_route_reply(r#"{"route_type": "checkout", "confidence": 0.9}"#).unwrap();
        assert_eq!(route.category, RouteCategory::Unknown);
    }

    #[test]
    fn test_malformed_reply_is_llm_error() {
        let err = parse_route_reply("我覺得是飲料").unwrap_err();
        assert!(matches!(err, StallError::Llm(_)));
    }
}
