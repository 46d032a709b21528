//! Conversation session model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::item::{ItemFrame, ItemType};
use crate::order::OrderPayload;

/// Session lifecycle status. `Submitted` is terminal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    #[default]
    Open,
    ConfirmingCheckout,
    Submitted,
}

/// State of one conversation, keyed by session id.
///
/// Created lazily on first access and mutated only by the dialogue manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// Committed items, in the order they were placed.
    pub cart: Vec<ItemFrame>,
    /// Incomplete items; the first entry is the one being asked about.
    pub pending_frames: Vec<ItemFrame>,
    pub status: SessionStatus,
    /// Raw user utterances, append-only.
    pub history: Vec<String>,
    /// In-progress combos whose sub-items are still pending.
    ///
    /// At most one combo is in progress in ordinary use; a single utterance
    /// naming two combos keeps both here in span order.
    pub combo_frames: Vec<ItemFrame>,
    /// Set once, at submission.
    pub order_payload: Option<OrderPayload>,
    pub pending_clear_confirm: bool,
    /// Next combo instance id.
    pub next_combo_id: u64,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cart: Vec::new(),
            pending_frames: Vec::new(),
            status: SessionStatus::Open,
            history: Vec::new(),
            combo_frames: Vec::new(),
            order_payload: None,
            pending_clear_confirm: false,
            next_combo_id: 1,
            created_at: Utc::now(),
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.status == SessionStatus::Submitted
    }

    pub fn cart_has_main_item(&self) -> bool {
        self.cart.iter().any(|f| f.item_type().is_main())
    }

    /// Hands out a fresh combo instance id.
    pub fn allocate_combo_id(&mut self) -> u64 {
        let id = self.next_combo_id;
        self.next_combo_id += 1;
        id
    }

    /// True when every cart frame is complete and every pending frame is not.
    pub fn queues_consistent(&self) -> bool {
        self.cart.iter().all(|f| f.missing_slots.is_empty())
            && self.pending_frames.iter().all(|f| !f.missing_slots.is_empty())
    }

    /// Compact view handed to LLM collaborators.
    pub fn context(&self) -> SessionContext {
        SessionContext {
            cart_count: self.cart.len(),
            cart_items: self.cart.iter().map(|f| f.label()).collect(),
            has_main_item: self.cart_has_main_item(),
            has_drink: self.cart.iter().any(|f| {
                f.item_type() == ItemType::Drink
                    || f.as_combo().is_some_and(|c| c.bundled_drink.is_some())
            }),
            pending_count: self.pending_frames.len(),
            pending_items: self.pending_frames.iter().map(|f| f.label()).collect(),
            status: self.status,
        }
    }
}

/// Read-only summary of a session for classifier and clarifier prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub cart_count: usize,
    pub cart_items: Vec<String>,
    pub has_main_item: bool,
    pub has_drink: bool,
    pub pending_count: usize,
    pub pending_items: Vec<String>,
    pub status: SessionStatus,
}
