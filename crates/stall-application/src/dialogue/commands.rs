//! Administrative intents: checkout, clearing, removals and submission.

use chrono::Utc;
use stall_core::error::StallError;
use stall_core::order::OrderPayload;
use stall_core::router::RouteCategory;
use stall_core::session::{Session, SessionStatus};
use stall_parsers::numerals::parse_ordinal;
use uuid::Uuid;

use super::DialogueManager;
use crate::replies;

/// `20261016083015-3f9a1c`: submission time plus a random suffix.
fn new_order_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().format("%Y%m%d%H%M%S"), &suffix[..6])
}

fn unpriceable(error: StallError) -> String {
    match error {
        StallError::Pricing { item, .. } => replies::unpriceable(&item),
        other => {
            tracing::error!("[DialogueManager] Quote failed: {}", other);
            replies::unpriceable("訂單")
        }
    }
}

impl DialogueManager {
    pub(super) async fn command(
        &self,
        session: &mut Session,
        category: RouteCategory,
        text: &str,
    ) -> String {
        match category {
            RouteCategory::Checkout => self.checkout(session).await,
            RouteCategory::ClearAll => {
                session.pending_clear_confirm = true;
                replies::CONFIRM_CLEAR.to_string()
            }
            RouteCategory::RemoveIndex => Self::remove_index(session, text),
            RouteCategory::CancelLast => match session.cart.pop() {
                Some(frame) => replies::cancelled(&frame),
                None => replies::NOTHING_TO_CANCEL.to_string(),
            },
            RouteCategory::CancelGeneric => self.cancel_generic(session).await,
            _ => replies::UNKNOWN.to_string(),
        }
    }

    /// Prices the cart and asks for confirmation.
    ///
    /// Blocked while anything is pending or any line cannot be priced.
    async fn checkout(&self, session: &mut Session) -> String {
        if let Some(first) = session.pending_frames.first() {
            return self.question_for(session, first).await;
        }
        if session.cart.is_empty() {
            return replies::EMPTY_CART.to_string();
        }
        match self.pricing.quote(&session.cart) {
            Ok(quote) => {
                session.status = SessionStatus::ConfirmingCheckout;
                tracing::info!(
                    "[DialogueManager] {} confirming checkout, total {}",
                    session.id,
                    quote.total
                );
                replies::checkout_summary(&quote)
            }
            Err(e) => unpriceable(e),
        }
    }

    fn remove_index(session: &mut Session, text: &str) -> String {
        if session.cart.is_empty() {
            return replies::EMPTY_CART.to_string();
        }
        match parse_ordinal(text).filter(|index| *index <= session.cart.len()) {
            Some(index) => {
                let frame = session.cart.remove(index - 1);
                replies::removed_index(index, &frame, &session.cart)
            }
            None => replies::remove_index_range(session.cart.len()),
        }
    }

    /// Cancels the item being asked about, or else the last cart item.
    ///
    /// Cancelling a combo sub-item drops the whole in-progress combo.
    async fn cancel_generic(&self, session: &mut Session) -> String {
        let Some(first) = session.pending_frames.first() else {
            return match session.cart.pop() {
                Some(frame) => replies::cancelled(&frame),
                None => replies::NOTHING_TO_CANCEL.to_string(),
            };
        };

        let cancelled = match first.combo_owner {
            Some(combo_id) => {
                session
                    .pending_frames
                    .retain(|f| f.combo_owner != Some(combo_id));
                let name = session
                    .combo_frames
                    .iter()
                    .position(|f| f.as_combo().is_some_and(|c| c.combo_id == combo_id))
                    .map(|index| session.combo_frames.remove(index).label())
                    .unwrap_or_else(|| "套餐".to_string());
                replies::cancelled_combo(&name)
            }
            None => replies::cancelled(&session.pending_frames.remove(0)),
        };

        match session.pending_frames.first() {
            Some(next) => {
                let question = self.question_for(session, next).await;
                format!("{}{}", cancelled, question)
            }
            None => cancelled,
        }
    }

    /// Persists the order, then freezes the session.
    ///
    /// A failed save keeps the session in confirmation so the customer can
    /// retry.
    pub(super) async fn submit(&self, session: &mut Session) -> String {
        if session.cart.is_empty() {
            session.status = SessionStatus::Open;
            return replies::EMPTY_CART.to_string();
        }
        let quote = match self.pricing.quote(&session.cart) {
            Ok(quote) => quote,
            Err(e) => {
                session.status = SessionStatus::Open;
                return unpriceable(e);
            }
        };

        let payload = OrderPayload {
            order_id: new_order_id(),
            items: quote.lines,
            total_price: quote.total,
            created_at: Utc::now(),
            status: "submitted".to_string(),
        };
        if let Err(e) = self.orders.save(&payload, &session.id).await {
            tracing::error!(
                "[DialogueManager] Failed to persist order {}: {}",
                payload.order_id,
                e
            );
            return replies::SUBMIT_FAILED.to_string();
        }

        tracing::info!(
            "[DialogueManager] {} submitted order {} ({}元)",
            session.id,
            payload.order_id,
            payload.total_price
        );
        let reply = replies::submitted(&payload.order_id, payload.total_price);
        session.order_payload = Some(payload);
        session.status = SessionStatus::Submitted;
        reply
    }
}
