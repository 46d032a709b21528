//! Routing contract: text span to category tag.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::item::ItemType;

/// Category tag produced by a router.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RouteCategory {
    Riceball,
    Drink,
    Carrier,
    Snack,
    EggPancake,
    JamToast,
    Combo,
    Checkout,
    ClearAll,
    RemoveIndex,
    CancelLast,
    CancelGeneric,
    Unknown,
}

impl RouteCategory {
    /// Item type ordered through this route, if any.
    pub fn item_type(&self) -> Option<ItemType> {
        match self {
            RouteCategory::Riceball => Some(ItemType::Riceball),
            RouteCategory::Drink => Some(ItemType::Drink),
            RouteCategory::Carrier => Some(ItemType::Carrier),
            RouteCategory::Snack => Some(ItemType::Snack),
            RouteCategory::EggPancake => Some(ItemType::EggPancake),
            RouteCategory::JamToast => Some(ItemType::JamToast),
            RouteCategory::Combo => Some(ItemType::Combo),
            _ => None,
        }
    }

    /// Administrative intents handled before any ordering logic.
    pub fn is_command(&self) -> bool {
        matches!(
            self,
            RouteCategory::Checkout
                | RouteCategory::ClearAll
                | RouteCategory::RemoveIndex
                | RouteCategory::CancelLast
                | RouteCategory::CancelGeneric
        )
    }
}

impl From<ItemType> for RouteCategory {
    fn from(item_type: ItemType) -> Self {
        match item_type {
            ItemType::Riceball => RouteCategory::Riceball,
            ItemType::Drink => RouteCategory::Drink,
            ItemType::Carrier => RouteCategory::Carrier,
            ItemType::Snack => RouteCategory::Snack,
            ItemType::EggPancake => RouteCategory::EggPancake,
            ItemType::JamToast => RouteCategory::JamToast,
            ItemType::Combo => RouteCategory::Combo,
        }
    }
}

/// Result of routing one span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub category: RouteCategory,
    /// The keyword that decided the route, for logging.
    pub keyword: Option<String>,
}

impl RouteDecision {
    pub fn new(category: RouteCategory, keyword: impl Into<String>) -> Self {
        Self {
            category,
            keyword: Some(keyword.into()),
        }
    }

    pub fn unknown() -> Self {
        Self {
            category: RouteCategory::Unknown,
            keyword: None,
        }
    }
}

/// Maps a text span to a category. Never fails: no match is `Unknown`.
pub trait Router: Send + Sync {
    fn route(&self, text: &str, current_cart_has_main_item: bool) -> RouteDecision;
}
