//! Item frames: the structured record for one orderable unit.
//!
//! A frame is a tagged union keyed by [`ItemType`]. Each variant carries a
//! fixed, typed attribute set; `missing_slots` is derived from those
//! attributes by [`crate::slot::missing_slots`] and never taken from a parser.

pub mod attrs;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::slot::{Slot, missing_slots};

pub use attrs::{
    BundledDrink, CarrierAttrs, ComboAttrs, DrinkAttrs, DrinkSize, DrinkSwap, EggPancakeAttrs,
    JAM_TOAST_THICK, JAM_TOAST_THIN, JamToastAttrs, RiceballAttrs, SnackAttrs, SwapCandidate,
    SwapOffer,
};

/// Item category tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemType {
    Riceball,
    Drink,
    Carrier,
    Snack,
    EggPancake,
    JamToast,
    Combo,
}

impl ItemType {
    /// Human-facing category name used in apologies and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            ItemType::Riceball => "飯糰",
            ItemType::Drink => "飲料",
            ItemType::Carrier => "吐司/漢堡/饅頭",
            ItemType::Snack => "點心",
            ItemType::EggPancake => "蛋餅",
            ItemType::JamToast => "果醬吐司",
            ItemType::Combo => "套餐",
        }
    }

    /// Main dishes, as opposed to drinks and sides.
    pub fn is_main(&self) -> bool {
        matches!(
            self,
            ItemType::Riceball
                | ItemType::Carrier
                | ItemType::EggPancake
                | ItemType::JamToast
                | ItemType::Combo
        )
    }
}

/// Category-specific attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "itemtype", rename_all = "snake_case")]
pub enum ItemKind {
    Riceball(RiceballAttrs),
    Drink(DrinkAttrs),
    Carrier(CarrierAttrs),
    Snack(SnackAttrs),
    EggPancake(EggPancakeAttrs),
    JamToast(JamToastAttrs),
    Combo(ComboAttrs),
}

impl ItemKind {
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemKind::Riceball(_) => ItemType::Riceball,
            ItemKind::Drink(_) => ItemType::Drink,
            ItemKind::Carrier(_) => ItemType::Carrier,
            ItemKind::Snack(_) => ItemType::Snack,
            ItemKind::EggPancake(_) => ItemType::EggPancake,
            ItemKind::JamToast(_) => ItemType::JamToast,
            ItemKind::Combo(_) => ItemType::Combo,
        }
    }

    /// Empty attribute set for a category.
    pub fn empty(item_type: ItemType) -> Self {
        match item_type {
            ItemType::Riceball => ItemKind::Riceball(RiceballAttrs::default()),
            ItemType::Drink => ItemKind::Drink(DrinkAttrs::default()),
            ItemType::Carrier => ItemKind::Carrier(CarrierAttrs::default()),
            ItemType::Snack => ItemKind::Snack(SnackAttrs::default()),
            ItemType::EggPancake => ItemKind::EggPancake(EggPancakeAttrs::default()),
            ItemType::JamToast => ItemKind::JamToast(JamToastAttrs::default()),
            ItemType::Combo => ItemKind::Combo(ComboAttrs::default()),
        }
    }

    /// Merges a parsed attribute set of the same category.
    ///
    /// Returns true when at least one attribute changed. A set of a different
    /// category is ignored.
    pub fn merge_from(&mut self, other: ItemKind) -> bool {
        match (self, other) {
            (ItemKind::Riceball(a), ItemKind::Riceball(b)) => a.merge_from(b),
            (ItemKind::Drink(a), ItemKind::Drink(b)) => a.merge_from(b),
            (ItemKind::Carrier(a), ItemKind::Carrier(b)) => a.merge_from(b),
            (ItemKind::Snack(a), ItemKind::Snack(b)) => a.merge_from(b),
            (ItemKind::EggPancake(a), ItemKind::EggPancake(b)) => a.merge_from(b),
            (ItemKind::JamToast(a), ItemKind::JamToast(b)) => a.merge_from(b),
            _ => false,
        }
    }

    /// Drops attribute combinations the stall does not offer.
    pub fn normalize(&mut self) {
        if let ItemKind::JamToast(attrs) = self {
            attrs.normalize();
        }
    }

    pub fn label(&self) -> String {
        match self {
            ItemKind::Riceball(a) => a.label(),
            ItemKind::Drink(a) => a.label(),
            ItemKind::Carrier(a) => a.label(),
            ItemKind::Snack(a) => a.label(),
            ItemKind::EggPancake(a) => a.label(),
            ItemKind::JamToast(a) => a.label(),
            ItemKind::Combo(a) => a.label(),
        }
    }
}

/// What a category parser extracted from one span of text.
///
/// `quantity` is only set when the text states a counted quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFrame {
    pub quantity: Option<u32>,
    pub kind: ItemKind,
}

impl ParsedFrame {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            quantity: None,
            kind,
        }
    }

    pub fn with_quantity(mut self, quantity: Option<u32>) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn item_type(&self) -> ItemType {
        self.kind.item_type()
    }
}

/// One orderable unit, in the pending queue or in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFrame {
    pub quantity: u32,
    #[serde(flatten)]
    pub kind: ItemKind,
    /// Id of the in-progress combo this frame was exploded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combo_owner: Option<u64>,
    #[serde(default)]
    pub missing_slots: Vec<Slot>,
}

impl ItemFrame {
    /// Builds a frame from parser output and derives its missing slots.
    pub fn from_parsed(parsed: ParsedFrame) -> Self {
        let mut frame = Self {
            quantity: parsed.quantity.filter(|q| *q > 0).unwrap_or(1),
            kind: parsed.kind,
            combo_owner: None,
            missing_slots: Vec::new(),
        };
        frame.kind.normalize();
        frame.refresh_missing_slots();
        frame
    }

    pub fn item_type(&self) -> ItemType {
        self.kind.item_type()
    }

    /// Merges newly parsed values and recomputes missing slots.
    ///
    /// Returns true when the frame changed.
    pub fn merge(&mut self, parsed: ParsedFrame) -> bool {
        let mut changed = self.kind.merge_from(parsed.kind);
        if let Some(quantity) = parsed.quantity.filter(|q| *q > 0) {
            if quantity != self.quantity && self.combo_owner.is_none() {
                self.quantity = quantity;
                changed = true;
            }
        }
        self.refresh_missing_slots();
        changed
    }

    pub fn refresh_missing_slots(&mut self) {
        self.missing_slots = missing_slots(&self.kind);
    }

    pub fn is_complete(&self) -> bool {
        self.missing_slots.is_empty()
    }

    pub fn first_missing(&self) -> Option<Slot> {
        self.missing_slots.first().copied()
    }

    pub fn label(&self) -> String {
        self.kind.label()
    }

    pub fn as_combo(&self) -> Option<&ComboAttrs> {
        match &self.kind {
            ItemKind::Combo(combo) => Some(combo),
            _ => None,
        }
    }

    pub fn as_combo_mut(&mut self) -> Option<&mut ComboAttrs> {
        match &mut self.kind {
            ItemKind::Combo(combo) => Some(combo),
            _ => None,
        }
    }

    pub fn as_drink_mut(&mut self) -> Option<&mut DrinkAttrs> {
        match &mut self.kind {
            ItemKind::Drink(drink) => Some(drink),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drink(drink: Option<&str>, temp: Option<&str>, size: Option<DrinkSize>) -> ParsedFrame {
        ParsedFrame::new(ItemKind::Drink(DrinkAttrs {
            drink: drink.map(String::from),
            temp: temp.map(String::from),
            size,
            ..Default::default()
        }))
    }

    #[test]
    fn test_from_parsed_defaults_quantity_to_one() {
        let frame = ItemFrame::from_parsed(drink(Some("豆漿"), None, None));
        assert_eq!(frame.quantity, 1);
        assert_eq!(frame.missing_slots, vec![Slot::Temp, Slot::Size]);
    }

    #[test]
    fn test_merge_recomputes_missing_slots() {
        let mut frame = ItemFrame::from_parsed(drink(Some("豆漿"), None, None));
        assert!(frame.merge(drink(None, Some("冰"), Some(DrinkSize::Large))));
        assert!(frame.is_complete());
        assert_eq!(frame.label(), "豆漿(大杯, 冰)");
    }

    #[test]
    fn test_merge_sequence_never_erases_earlier_values() {
        let mut frame = ItemFrame::from_parsed(drink(Some("豆漿"), None, None));
        frame.merge(drink(None, Some("溫"), None));
        frame.merge(drink(None, None, Some(DrinkSize::Medium)));
        frame.merge(drink(None, None, None));

        match &frame.kind {
            ItemKind::Drink(attrs) => {
                assert_eq!(attrs.drink.as_deref(), Some("豆漿"));
                assert_eq!(attrs.temp.as_deref(), Some("溫"));
                assert_eq!(attrs.size, Some(DrinkSize::Medium));
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_merge_ignores_other_category() {
        let mut frame = ItemFrame::from_parsed(drink(Some("豆漿"), None, None));
        let riceball = ParsedFrame::new(ItemKind::Riceball(RiceballAttrs {
            rice: Some("白米".into()),
            ..Default::default()
        }));
        assert!(!frame.merge(riceball));
        assert_eq!(frame.missing_slots, vec![Slot::Temp, Slot::Size]);
    }

    #[test]
    fn test_combo_owned_quantity_is_fixed() {
        let mut frame = ItemFrame::from_parsed(drink(Some("精選紅茶"), None, None));
        frame.combo_owner = Some(1);
        frame.merge(drink(None, Some("冰"), None).with_quantity(Some(3)));
        assert_eq!(frame.quantity, 1);
    }

    #[test]
    fn test_from_parsed_drops_cut_edge_on_thin_slice() {
        let frame = ItemFrame::from_parsed(ParsedFrame::new(ItemKind::JamToast(JamToastAttrs {
            flavor: Some("草莓".into()),
            cut_edge: true,
            ..Default::default()
        })));
        match &frame.kind {
            ItemKind::JamToast(attrs) => assert!(!attrs.cut_edge),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_item_type_string_forms() {
        assert_eq!(ItemType::EggPancake.to_string(), "egg_pancake");
        assert_eq!("jam_toast".parse::<ItemType>().unwrap(), ItemType::JamToast);
    }

    #[test]
    fn test_frame_serializes_with_itemtype_tag() {
        let frame = ItemFrame::from_parsed(drink(Some("豆漿"), None, None));
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["itemtype"], "drink");
        assert_eq!(json["missing_slots"][0], "temp");
    }
}
