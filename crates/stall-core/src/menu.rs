//! Menu model and the price lookup contract.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StallError};
use crate::item::{DrinkSize, ItemType};

/// Menu category names as they appear in the menu dataset.
pub mod category {
    pub const RICEBALL: &str = "飯糰";
    pub const DRINK: &str = "飲品";
    pub const TOAST: &str = "吐司";
    pub const BURGER: &str = "漢堡";
    pub const MANTOU: &str = "饅頭";
    pub const EGG_PANCAKE: &str = "蛋餅";
    pub const SNACK: &str = "點心";
    pub const JAM_TOAST: &str = "果醬吐司";
    pub const COMBO: &str = "套餐";

    /// Categories whose entries are named `{flavor}{carrier}`.
    pub const CARRIERS: [&str; 3] = [TOAST, BURGER, MANTOU];
}

/// Maps a menu category to the item type that orders it.
pub fn item_type_for_category(name: &str) -> Option<ItemType> {
    match name {
        category::RICEBALL => Some(ItemType::Riceball),
        category::DRINK => Some(ItemType::Drink),
        category::TOAST | category::BURGER | category::MANTOU => Some(ItemType::Carrier),
        category::EGG_PANCAKE => Some(ItemType::EggPancake),
        category::SNACK => Some(ItemType::Snack),
        category::JAM_TOAST => Some(ItemType::JamToast),
        category::COMBO => Some(ItemType::Combo),
        _ => None,
    }
}

/// One menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub category: String,
    pub name: String,
    pub price: u32,
}

impl MenuItem {
    pub fn is_combo(&self) -> bool {
        self.category == category::COMBO
    }

    /// Name without a trailing size or variant parenthetical.
    ///
    /// `精選紅茶(大)` becomes `精選紅茶`, `果醬吐司(草莓/薄片)` becomes `果醬吐司`.
    pub fn base_name(&self) -> &str {
        strip_parenthetical(&self.name)
    }

    /// Size encoded in a drink entry name.
    pub fn drink_size(&self) -> Option<DrinkSize> {
        let inner = self.name.strip_suffix(')')?;
        let open = inner.rfind('(')?;
        DrinkSize::from_menu_suffix(&inner[open + 1..])
    }

    /// Combo short name and component description.
    ///
    /// `套餐二 源味飯糰+十穀漿(中)` splits into `套餐二` and `源味飯糰+十穀漿(中)`.
    pub fn combo_parts(&self) -> Option<(&str, &str)> {
        if !self.is_combo() {
            return None;
        }
        let trimmed = self.name.trim();
        match trimmed.split_once(char::is_whitespace) {
            Some((short, rest)) => Some((short, rest.trim())),
            None => Some((trimmed, "")),
        }
    }
}

/// Strips one trailing `(...)` group.
pub fn strip_parenthetical(name: &str) -> &str {
    match (name.strip_suffix(')'), name.rfind('(')) {
        (Some(_), Some(open)) => name[..open].trim_end(),
        _ => name,
    }
}

/// Canonical menu and price lookup.
///
/// Implementations load the dataset once and serve every later call from
/// the cache. A load failure surfaces as [`StallError::MenuUnavailable`];
/// an unknown entry as [`StallError::NotFound`].
pub trait MenuCatalog: Send + Sync {
    /// Returns the price of `name` within `category`.
    fn get_price(&self, category: &str, name: &str) -> Result<u32>;

    /// Returns every menu entry, combos included.
    fn get_all_items(&self) -> Result<Arc<Vec<MenuItem>>>;

    /// Entries of one category, in menu order.
    fn items_in(&self, category: &str) -> Result<Vec<MenuItem>> {
        Ok(self
            .get_all_items()?
            .iter()
            .filter(|item| item.category == category)
            .cloned()
            .collect())
    }

    /// All combo entries.
    fn combos(&self) -> Result<Vec<MenuItem>> {
        self.items_in(category::COMBO)
    }

    /// First non-combo entry whose name or base name equals `name`.
    fn find_sellable(&self, name: &str) -> Result<Option<MenuItem>> {
        let items = self.get_all_items()?;
        let exact = items
            .iter()
            .find(|item| !item.is_combo() && item.name == name);
        let found = exact.or_else(|| {
            items
                .iter()
                .find(|item| !item.is_combo() && item.base_name() == name)
        });
        Ok(found.cloned())
    }
}

/// Builds a not-found error for a menu entry.
pub fn menu_entry_not_found(category: &str, name: &str) -> StallError {
    StallError::not_found("menu item", format!("{}/{}", category, name))
}
