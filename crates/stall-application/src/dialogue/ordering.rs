//! Slot filling, new-order spans and the pending-queue flush.

use stall_core::error::Result;
use stall_core::item::{DrinkAttrs, ItemFrame, ItemKind, ItemType, ParsedFrame};
use stall_core::router::RouteCategory;
use stall_core::session::Session;
use stall_parsers::numerals::{MAX_QUANTITY, oversized_quantity};
use stall_parsers::split_spans;

use super::{DialogueManager, TurnOutcome};
use crate::combo_resolver::{ComboDefinition, SwapAnswer, SwapOutcome, split_swap};
use crate::replies;

/// A slot answer for a combo's drink that names another drink or size.
struct ComboDrinkChange {
    combo_id: u64,
    requested: DrinkAttrs,
    /// Only the size changes.
    same_drink: bool,
}

/// Checks whether `parsed` answers the first pending frame, a combo drink,
/// with a drink or size that differs from what the combo holds.
fn combo_drink_change(session: &Session, parsed: &ParsedFrame) -> Option<ComboDrinkChange> {
    let first = session.pending_frames.first()?;
    let combo_id = first.combo_owner?;
    let (ItemKind::Drink(current), ItemKind::Drink(requested)) = (&first.kind, &parsed.kind)
    else {
        return None;
    };

    let new_drink = requested
        .drink
        .as_ref()
        .is_some_and(|d| current.drink.as_ref() != Some(d));
    let new_size = requested
        .size
        .is_some_and(|s| current.size != Some(s));
    if !new_drink && !new_size {
        return None;
    }

    let mut requested = requested.clone();
    if requested.drink.is_none() {
        requested.drink = current.drink.clone();
    }
    Some(ComboDrinkChange {
        combo_id,
        requested,
        same_drink: !new_drink,
    })
}

impl DialogueManager {
    /// Parses every span of an utterance as a new order.
    pub(super) async fn take_order(
        &self,
        session: &mut Session,
        text: &str,
        outcome: &mut TurnOutcome,
    ) {
        for span in split_spans(text, self.max_segments) {
            self.order_span(session, &span, outcome).await;
            Self::flush(session, outcome);
        }
    }

    /// Treats the utterance as an answer to the first pending frame.
    ///
    /// A span naming a different item category (or a combo) is a new order
    /// and queues behind the pending frames.
    pub(super) async fn continue_pending(
        &self,
        session: &mut Session,
        text: &str,
        outcome: &mut TurnOutcome,
    ) {
        match self.combos.answer_swap(session, text) {
            Ok(SwapAnswer::Applied {
                combo_name,
                to,
                delta,
            }) => {
                outcome
                    .notices
                    .push(replies::swap_applied(&combo_name, &to, delta));
                Self::flush(session, outcome);
                return;
            }
            Ok(SwapAnswer::Declined) => {
                outcome.notices.push(replies::SWAP_KEPT.to_string());
                Self::flush(session, outcome);
                return;
            }
            Ok(SwapAnswer::Unanswered) => {}
            Err(e) => {
                outcome.notices.push(Self::apology(ItemType::Drink, &e));
                return;
            }
        }

        if let (_, Some(target)) = split_swap(text) {
            let in_progress = session
                .pending_frames
                .first()
                .and_then(|f| f.combo_owner)
                .filter(|_| self.router.route(text, false).category != RouteCategory::Combo);
            if let Some(combo_id) = in_progress {
                self.swap(session, combo_id, target, outcome);
                Self::flush(session, outcome);
                return;
            }
        }

        for span in split_spans(text, self.max_segments) {
            if session.pending_frames.is_empty() {
                self.order_span(session, &span, outcome).await;
            } else {
                self.answer_span(session, &span, outcome).await;
            }
            Self::flush(session, outcome);
        }
    }

    async fn answer_span(&self, session: &mut Session, span: &str, outcome: &mut TurnOutcome) {
        let Some(first_type) = session.pending_frames.first().map(ItemFrame::item_type) else {
            return;
        };
        let route = self.router.route(span, session.cart_has_main_item());
        let routed_type = route.category.item_type();
        if routed_type.is_some_and(|t| t != first_type) {
            self.order_span(session, span, outcome).await;
            return;
        }

        let Some(parser) = self.parsers.get(first_type) else {
            tracing::error!("[DialogueManager] No parser for {}", first_type);
            return;
        };
        let parsed = match parser.parse(span) {
            Ok(parsed) => parsed,
            Err(e) => {
                outcome.notices.push(Self::apology(first_type, &e));
                return;
            }
        };

        if let Some(change) = combo_drink_change(session, &parsed) {
            self.change_combo_drink(session, change, outcome);
            return;
        }

        let changed = match session.pending_frames.first_mut() {
            Some(frame) => frame.merge(parsed),
            None => false,
        };
        if changed {
            tracing::debug!("[DialogueManager] Filled pending {}", first_type);
            return;
        }

        if routed_type.is_some() {
            // The same category named again without new details is another item.
            self.order_span(session, span, outcome).await;
            return;
        }
        let category = self.classify(session, span).await;
        if category.item_type().is_some_and(|t| t != first_type) {
            self.order_category(session, span, category, outcome).await;
        }
    }

    /// Orders one span: a combo if one is detected, otherwise a routed item.
    async fn order_span(&self, session: &mut Session, span: &str, outcome: &mut TurnOutcome) {
        let (head, swap_target) = split_swap(span);
        match self.combos.detect(head) {
            Ok(Some(definition)) => {
                self.add_combo(session, &definition, swap_target, outcome);
                return;
            }
            Ok(None) => {}
            // The category parser reports the failure for what was ordered.
            Err(e) => tracing::warn!("[DialogueManager] Combo detection failed: {}", e),
        }

        let route = self.router.route(span, session.cart_has_main_item());
        let category = match route.category {
            RouteCategory::Unknown => self.classify(session, span).await,
            category => category,
        };
        self.order_category(session, span, category, outcome).await;
    }

    async fn order_category(
        &self,
        session: &mut Session,
        span: &str,
        category: RouteCategory,
        outcome: &mut TurnOutcome,
    ) {
        match category {
            RouteCategory::Combo => match self.combos.combo_names() {
                Ok(names) => outcome.notices.push(replies::which_combo(&names)),
                Err(e) => outcome.notices.push(Self::apology(ItemType::Combo, &e)),
            },
            other => match other.item_type() {
                Some(item_type) => self.add_item(session, item_type, span, outcome),
                None => tracing::debug!("[DialogueManager] Unrouted span '{}'", span),
            },
        }
    }

    fn add_item(
        &self,
        session: &mut Session,
        item_type: ItemType,
        span: &str,
        outcome: &mut TurnOutcome,
    ) {
        if oversized_quantity(span) {
            tracing::info!("[DialogueManager] Refused oversized quantity in '{}'", span);
            outcome.notices.push(replies::too_many(MAX_QUANTITY));
            return;
        }
        let Some(parser) = self.parsers.get(item_type) else {
            tracing::error!("[DialogueManager] No parser for {}", item_type);
            return;
        };
        match parser.parse(span) {
            Ok(parsed) => {
                let frame = ItemFrame::from_parsed(parsed);
                tracing::info!(
                    "[DialogueManager] Queued {} (missing {:?})",
                    frame.label(),
                    frame.missing_slots
                );
                session.pending_frames.push(frame);
            }
            Err(e) => outcome.notices.push(Self::apology(item_type, &e)),
        }
    }

    fn add_combo(
        &self,
        session: &mut Session,
        definition: &ComboDefinition,
        swap_target: Option<&str>,
        outcome: &mut TurnOutcome,
    ) {
        let combo_id = session.allocate_combo_id();
        let exploded = match self.combos.explode(definition, combo_id) {
            Ok(exploded) => exploded,
            Err(e) => {
                outcome.notices.push(Self::apology(ItemType::Combo, &e));
                return;
            }
        };
        session.combo_frames.push(exploded.combo);
        session.pending_frames.extend(exploded.sub_items);

        if let Some(target) = swap_target {
            self.swap(session, combo_id, target, outcome);
        }
    }

    fn swap(&self, session: &mut Session, combo_id: u64, target: &str, outcome: &mut TurnOutcome) {
        let result = self.combos.request_swap(session, combo_id, target);
        Self::report_swap(result, outcome);
    }

    /// Prices a slot answer that changes a combo's drink or its size.
    fn change_combo_drink(
        &self,
        session: &mut Session,
        change: ComboDrinkChange,
        outcome: &mut TurnOutcome,
    ) {
        let ComboDrinkChange {
            combo_id,
            requested,
            same_drink,
        } = change;
        // Temperature and sugar are kept even when the swap waits for a size.
        if let Some(frame) = session.pending_frames.first_mut() {
            frame.merge(ParsedFrame::new(ItemKind::Drink(DrinkAttrs {
                temp: requested.temp.clone(),
                sugar: requested.sugar.clone(),
                ..Default::default()
            })));
        }
        let size = requested.size;
        match (self.combos.change_drink(session, combo_id, requested), size) {
            (
                Ok(SwapOutcome::Applied {
                    combo_name,
                    to,
                    delta,
                }),
                Some(size),
            ) if same_drink => outcome
                .notices
                .push(replies::resized(&combo_name, &to, size, delta)),
            (result, _) => Self::report_swap(result, outcome),
        }
    }

    fn report_swap(result: Result<SwapOutcome>, outcome: &mut TurnOutcome) {
        match result {
            Ok(SwapOutcome::Applied {
                combo_name,
                to,
                delta,
            }) => outcome
                .notices
                .push(replies::swap_applied(&combo_name, &to, delta)),
            // The offer is asked through the drink's pending confirmation.
            Ok(SwapOutcome::Offered(_)) => {}
            Ok(SwapOutcome::NotDrink) => outcome.notices.push(replies::SWAP_NOT_DRINK.to_string()),
            Err(e) => outcome.notices.push(Self::apology(ItemType::Drink, &e)),
        }
    }

    /// Moves every complete pending frame out of the queue, in order.
    ///
    /// Combo sub-items join their combo, which is committed once none of its
    /// sub-items remain pending. The scan continues past incomplete frames.
    pub(super) fn flush(session: &mut Session, outcome: &mut TurnOutcome) {
        let mut index = 0;
        while index < session.pending_frames.len() {
            if !session.pending_frames[index].is_complete() {
                index += 1;
                continue;
            }
            let frame = session.pending_frames.remove(index);
            let owner = frame.combo_owner.and_then(|combo_id| {
                session
                    .combo_frames
                    .iter_mut()
                    .filter_map(ItemFrame::as_combo_mut)
                    .find(|c| c.combo_id == combo_id)
            });
            match owner {
                Some(combo) => combo.sub_items.push(frame),
                None => {
                    outcome.completed.push(replies::portion(&frame));
                    session.cart.push(frame);
                }
            }
        }

        let mut index = 0;
        while index < session.combo_frames.len() {
            let combo_id = session.combo_frames[index]
                .as_combo()
                .map(|c| c.combo_id);
            let waiting = session
                .pending_frames
                .iter()
                .any(|f| combo_id.is_some() && f.combo_owner == combo_id);
            if waiting {
                index += 1;
                continue;
            }
            let combo = session.combo_frames.remove(index);
            tracing::info!("[DialogueManager] Committed {}", combo.label());
            outcome.completed.push(replies::portion(&combo));
            session.cart.push(combo);
        }
    }
}
