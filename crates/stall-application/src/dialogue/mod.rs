//! Session/cart state machine.
//!
//! [`DialogueManager::handle`] drives one utterance to completion and
//! returns exactly one reply. The gates run in a fixed order: the terminal
//! gate, the checkout and clear confirmations, administrative commands, and
//! finally slot filling or new-order parsing.

mod commands;
mod ordering;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use stall_core::config::{ComboAliasConfig, PricingRules};
use stall_core::error::{Result, StallError};
use stall_core::item::{ItemFrame, ItemType};
use stall_core::llm::{LlmClarifier, LlmRouter};
use stall_core::menu::MenuCatalog;
use stall_core::order::{OrderLine, OrderRepository};
use stall_core::router::{RouteCategory, Router};
use stall_core::session::{Session, SessionStatus};
use stall_core::slot::Slot;
use stall_parsers::{KeywordRouter, ParserRegistry, normalize_text};

use crate::combo_resolver::ComboResolver;
use crate::pricing::PricingAggregator;
use crate::replies;
use crate::session_store::SessionStore;

const NEGATIVE: &[&str] = &[
    "不要", "不用", "不是", "不好", "不對", "算了", "取消", "否", "先不",
];
const AFFIRMATIVE: &[&str] = &[
    "沒問題", "確定", "沒錯", "可以", "送出", "yes", "ok", "好", "是", "對", "嗯",
];
/// Words that may pad a yes without adding a request.
const FILLERS: &[&str] = &[
    "訂單", "謝謝", "的", "啦", "吧", "了", "喔", "哦", "呀", "啊", "耶", "請",
];

/// Reads a yes/no answer. Negatives win, so `不是` is a no.
///
/// A yes must be the whole reply: `好，再一杯豆漿` is a new request, not a
/// confirmation.
fn confirmation(text: &str) -> Option<bool> {
    let lowered = text.trim().to_lowercase();
    if lowered == "不" || NEGATIVE.iter().any(|word| lowered.contains(word)) {
        return Some(false);
    }
    if !AFFIRMATIVE.iter().any(|word| lowered.contains(word)) {
        return None;
    }
    let rest = AFFIRMATIVE
        .iter()
        .chain(FILLERS)
        .fold(lowered, |rest, word| rest.replace(word, ""));
    rest.chars()
        .all(|c| c.is_whitespace() || c.is_ascii_punctuation() || "，。！？、～…".contains(c))
        .then_some(true)
}

/// Read-only order view for status endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub session_id: String,
    pub status: SessionStatus,
    pub lines: Vec<OrderLine>,
    /// `None` when some cart line cannot be priced.
    pub total_price: Option<u32>,
    pub pricing_error: Option<String>,
    pub pending_items: Vec<String>,
    pub order_id: Option<String>,
}

/// What one turn produced, rendered into the reply at the end.
#[derive(Debug, Default)]
struct TurnOutcome {
    /// Apologies and swap notices, shown first.
    notices: Vec<String>,
    /// Portions committed this turn, in order.
    completed: Vec<String>,
}

pub struct DialogueManager {
    sessions: SessionStore,
    router: Arc<dyn Router>,
    parsers: ParserRegistry,
    combos: ComboResolver,
    pricing: PricingAggregator,
    orders: Arc<dyn OrderRepository>,
    llm_router: Option<Arc<dyn LlmRouter>>,
    llm_clarifier: Option<Arc<dyn LlmClarifier>>,
    llm_timeout: Duration,
    confidence_threshold: f32,
    max_segments: usize,
}

impl DialogueManager {
    /// Creates a manager with the keyword router and the built-in parsers.
    ///
    /// # Arguments
    ///
    /// * `menu` - Canonical menu, shared by parsers, combos and pricing
    /// * `rules` - Add-on and size pricing rules
    /// * `aliases` - Combo component alias table
    /// * `orders` - Where submitted orders are persisted
    ///
    /// # Errors
    ///
    /// Returns `StallError::Config` if the alias table holds an invalid rule.
    pub fn new(
        menu: Arc<dyn MenuCatalog>,
        rules: PricingRules,
        aliases: ComboAliasConfig,
        orders: Arc<dyn OrderRepository>,
    ) -> Result<Self> {
        let parsers = ParserRegistry::standard(Arc::clone(&menu), &rules);
        let combos = ComboResolver::new(Arc::clone(&menu), parsers.clone(), aliases)?;
        let pricing = PricingAggregator::new(menu, rules);

        Ok(Self {
            sessions: SessionStore::new(),
            router: Arc::new(KeywordRouter::new()),
            parsers,
            combos,
            pricing,
            orders,
            llm_router: None,
            llm_clarifier: None,
            llm_timeout: Duration::from_millis(5000),
            confidence_threshold: 0.75,
            max_segments: 6,
        })
    }

    pub fn with_router(mut self, router: Arc<dyn Router>) -> Self {
        self.router = router;
        self
    }

    pub fn with_llm_router(mut self, router: Arc<dyn LlmRouter>) -> Self {
        self.llm_router = Some(router);
        self
    }

    pub fn with_llm_clarifier(mut self, clarifier: Arc<dyn LlmClarifier>) -> Self {
        self.llm_clarifier = Some(clarifier);
        self
    }

    pub fn with_llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = timeout;
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_max_segments(mut self, max_segments: usize) -> Self {
        self.max_segments = max_segments.max(1);
        self
    }

    /// Processes one utterance for `session_id` and returns the reply.
    ///
    /// Turns for the same session run one at a time; the session is created
    /// on first use. Never fails: collaborator errors become apologies.
    pub async fn handle(&self, session_id: &str, text: &str) -> String {
        let entry = self.sessions.get_or_create(session_id).await;
        let mut session = entry.lock().await;

        if session.is_submitted() {
            tracing::debug!("[DialogueManager] {} is submitted, ignoring turn", session_id);
            return replies::ALREADY_SUBMITTED.to_string();
        }
        session.history.push(text.to_string());

        let normalized = normalize_text(text);
        let reply = self.turn(&mut session, &normalized).await;
        debug_assert!(session.queues_consistent());
        tracing::debug!(
            "[DialogueManager] {} cart={} pending={} status={}",
            session_id,
            session.cart.len(),
            session.pending_frames.len(),
            session.status
        );
        reply
    }

    async fn turn(&self, session: &mut Session, text: &str) -> String {
        if session.status == SessionStatus::ConfirmingCheckout {
            match confirmation(text) {
                Some(true) => return self.submit(session).await,
                Some(false) => {
                    session.status = SessionStatus::Open;
                    return replies::CHECKOUT_DECLINED.to_string();
                }
                None => {
                    tracing::info!("[DialogueManager] {} left checkout confirmation", session.id);
                    session.status = SessionStatus::Open;
                }
            }
        }

        if session.pending_clear_confirm {
            session.pending_clear_confirm = false;
            if confirmation(text) == Some(true) {
                session.cart.clear();
                session.pending_frames.clear();
                session.combo_frames.clear();
                tracing::info!("[DialogueManager] {} cleared the cart", session.id);
                return replies::CLEARED.to_string();
            }
            return replies::CLEAR_KEPT.to_string();
        }

        let decision = self.router.route(text, session.cart_has_main_item());
        if decision.category.is_command() {
            tracing::info!(
                "[DialogueManager] Command {} (hit: {:?})",
                decision.category,
                decision.keyword
            );
            return self.command(session, decision.category, text).await;
        }

        let mut outcome = TurnOutcome::default();
        if session.pending_frames.is_empty() {
            self.take_order(session, text, &mut outcome).await;
        } else {
            self.continue_pending(session, text, &mut outcome).await;
        }
        self.render(session, outcome).await
    }

    /// Builds the reply: notices, then the first blocking question or the
    /// list of committed items.
    async fn render(&self, session: &Session, outcome: TurnOutcome) -> String {
        let mut parts = outcome.notices;
        if let Some(first) = session.pending_frames.first() {
            let question = self.question_for(session, first).await;
            if outcome.completed.is_empty() {
                parts.push(question);
            } else {
                parts.push(replies::added_then(&outcome.completed, &question));
            }
        } else if !outcome.completed.is_empty() {
            parts.push(replies::added(&outcome.completed));
        } else if parts.is_empty() {
            parts.push(replies::UNKNOWN.to_string());
        }
        parts.concat()
    }

    /// Question for the first missing slot of `frame`.
    ///
    /// Swap confirmations always use the built-in text so the prices shown
    /// come from the menu.
    async fn question_for(&self, session: &Session, frame: &ItemFrame) -> String {
        let Some(slot) = frame.first_missing() else {
            return replies::UNKNOWN.to_string();
        };
        if slot == Slot::SwapConfirm {
            return replies::question(frame, slot);
        }

        if let Some(clarifier) = &self.llm_clarifier {
            let context = session.context();
            let asked = tokio::time::timeout(
                self.llm_timeout,
                clarifier.ask(frame.item_type(), slot, &context),
            )
            .await;
            match asked {
                Ok(Ok(question)) if !question.trim().is_empty() => return question,
                Ok(Ok(_)) => tracing::warn!("[DialogueManager] Clarifier returned nothing"),
                Ok(Err(e)) => tracing::warn!("[DialogueManager] Clarifier failed: {}", e),
                Err(_) => tracing::warn!(
                    "[DialogueManager] Clarifier timed out after {:?}",
                    self.llm_timeout
                ),
            }
        }
        replies::question(frame, slot)
    }

    /// Asks the LLM router about text the keyword router could not place.
    async fn classify(&self, session: &Session, text: &str) -> RouteCategory {
        let Some(router) = &self.llm_router else {
            return RouteCategory::Unknown;
        };
        let context = session.context();
        match tokio::time::timeout(self.llm_timeout, router.classify(text, &context)).await {
            Ok(Ok(route))
                if route.category.item_type().is_some()
                    && route.confidence >= self.confidence_threshold =>
            {
                tracing::info!(
                    "[DialogueManager] LLM routed '{}' to {} ({:.2})",
                    text,
                    route.category,
                    route.confidence
                );
                route.category
            }
            Ok(Ok(route)) => {
                tracing::debug!(
                    "[DialogueManager] LLM route {} ({:.2}) rejected",
                    route.category,
                    route.confidence
                );
                RouteCategory::Unknown
            }
            Ok(Err(e)) => {
                tracing::warn!("[DialogueManager] LLM router failed: {}", e);
                RouteCategory::Unknown
            }
            Err(_) => {
                tracing::warn!(
                    "[DialogueManager] LLM router timed out after {:?}",
                    self.llm_timeout
                );
                RouteCategory::Unknown
            }
        }
    }

    /// User-facing apology for a collaborator failure.
    fn apology(item_type: ItemType, error: &StallError) -> String {
        if error.is_menu_unavailable() {
            tracing::error!("[DialogueManager] {} menu unavailable: {}", item_type, error);
        } else {
            tracing::error!("[DialogueManager] {} failed: {}", item_type, error);
        }
        replies::menu_unavailable(item_type)
    }

    /// Clone of the session state, if the session exists.
    pub async fn snapshot(&self, session_id: &str) -> Option<Session> {
        let entry = self.sessions.get(session_id).await?;
        let session = entry.lock().await;
        Some(session.clone())
    }

    /// Priced view of a session's order.
    ///
    /// A submitted session reports its frozen payload; an open one is priced
    /// from the current cart.
    pub async fn order_summary(&self, session_id: &str) -> Option<OrderSummary> {
        let entry = self.sessions.get(session_id).await?;
        let session = entry.lock().await;
        let pending_items = session.pending_frames.iter().map(|f| f.label()).collect();

        let summary = match &session.order_payload {
            Some(payload) => OrderSummary {
                session_id: session.id.clone(),
                status: session.status,
                lines: payload.items.clone(),
                total_price: Some(payload.total_price),
                pricing_error: None,
                pending_items,
                order_id: Some(payload.order_id.clone()),
            },
            None => {
                let (lines, total_price, pricing_error) = match self.pricing.quote(&session.cart)
                {
                    Ok(quote) => (quote.lines, Some(quote.total), None),
                    Err(e) => (Vec::new(), None, Some(e.to_string())),
                };
                OrderSummary {
                    session_id: session.id.clone(),
                    status: session.status,
                    lines,
                    total_price,
                    pricing_error,
                    pending_items,
                    order_id: None,
                }
            }
        };
        Some(summary)
    }
}
