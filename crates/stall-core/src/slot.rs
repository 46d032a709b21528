//! Slot-completeness evaluation.
//!
//! Required attributes per category are fixed tables. The evaluator always
//! recomputes from the frame's current values.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::item::{ItemKind, ItemType};

/// A required attribute that may still be missing from a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Slot {
    Flavor,
    Rice,
    Drink,
    Temp,
    Size,
    Carrier,
    Snack,
    /// Pseudo-slot: a combo drink swap waits for a price-bearing choice.
    SwapConfirm,
}

const RICEBALL_SLOTS: &[Slot] = &[Slot::Flavor, Slot::Rice];
const DRINK_SLOTS: &[Slot] = &[Slot::Drink, Slot::Temp, Slot::Size];
const CARRIER_SLOTS: &[Slot] = &[Slot::Carrier, Slot::Flavor];
const SNACK_SLOTS: &[Slot] = &[Slot::Snack];
const FLAVOR_ONLY: &[Slot] = &[Slot::Flavor];

/// Required slots for a category, in asking order.
pub fn required_slots(item_type: ItemType) -> &'static [Slot] {
    match item_type {
        ItemType::Riceball => RICEBALL_SLOTS,
        ItemType::Drink => DRINK_SLOTS,
        ItemType::Carrier => CARRIER_SLOTS,
        ItemType::Snack => SNACK_SLOTS,
        ItemType::EggPancake | ItemType::JamToast => FLAVOR_ONLY,
        ItemType::Combo => &[],
    }
}

fn is_filled(kind: &ItemKind, slot: Slot) -> bool {
    match (kind, slot) {
        (ItemKind::Riceball(a), Slot::Flavor) => a.flavor.is_some(),
        (ItemKind::Riceball(a), Slot::Rice) => a.rice.is_some(),
        (ItemKind::Drink(a), Slot::Drink) => a.drink.is_some(),
        (ItemKind::Drink(a), Slot::Temp) => a.temp.is_some(),
        (ItemKind::Drink(a), Slot::Size) => a.size.is_some(),
        (ItemKind::Carrier(a), Slot::Carrier) => a.carrier.is_some(),
        (ItemKind::Carrier(a), Slot::Flavor) => a.flavor.is_some(),
        (ItemKind::Snack(a), Slot::Snack) => a.snack.is_some(),
        (ItemKind::EggPancake(a), Slot::Flavor) => a.flavor.is_some(),
        (ItemKind::JamToast(a), Slot::Flavor) => a.flavor.is_some(),
        _ => true,
    }
}

/// Returns the ordered list of required attributes still missing.
///
/// A drink carrying a pending swap offer reports only [`Slot::SwapConfirm`]
/// until the offer is resolved.
pub fn missing_slots(kind: &ItemKind) -> Vec<Slot> {
    if let ItemKind::Drink(drink) = kind {
        if drink.swap_offer.is_some() {
            return vec![Slot::SwapConfirm];
        }
    }

    required_slots(kind.item_type())
        .iter()
        .copied()
        .filter(|slot| !is_filled(kind, *slot))
        .collect()
}
