//! Optional LLM collaborators.
//!
//! Both are consulted at most once per decision point, under a timeout, and
//! callers always hold a deterministic fallback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::item::ItemType;
use crate::router::RouteCategory;
use crate::session::SessionContext;
use crate::slot::Slot;

/// Classification returned by an LLM router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmRoute {
    pub category: RouteCategory,
    pub confidence: f32,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[async_trait]
pub trait LlmRouter: Send + Sync {
    /// Classifies text the keyword router could not place.
    async fn classify(&self, text: &str, context: &SessionContext) -> Result<LlmRoute>;
}

#[async_trait]
pub trait LlmClarifier: Send + Sync {
    /// Phrases the question for a missing slot.
    async fn ask(&self, item_type: ItemType, slot: Slot, context: &SessionContext)
    -> Result<String>;
}
