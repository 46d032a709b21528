//! Typed attribute sets, one per item category.
//!
//! Every attribute set knows how to absorb a freshly parsed copy of itself.
//! Absorbing never clears a value: `None`, `false` and empty lists coming
//! from the parser leave the existing value untouched.

use serde::{Deserialize, Serialize};

/// Copies `new` into `slot` when it carries a value. Returns true on change.
fn fill<T: PartialEq>(slot: &mut Option<T>, new: Option<T>) -> bool {
    match new {
        Some(value) if slot.as_ref() != Some(&value) => {
            *slot = Some(value);
            true
        }
        _ => false,
    }
}

/// Raises a flag when `new` is set. Flags are never lowered by a merge.
fn raise(flag: &mut bool, new: bool) -> bool {
    if new && !*flag {
        *flag = true;
        true
    } else {
        false
    }
}

/// Appends entries of `new` that are not already present.
fn extend_unique(list: &mut Vec<String>, new: Vec<String>) -> bool {
    let mut changed = false;
    for entry in new {
        if !list.contains(&entry) {
            list.push(entry);
            changed = true;
        }
    }
    changed
}

fn with_details(name: String, details: &[String]) -> String {
    if details.is_empty() {
        name
    } else {
        format!("{}({})", name, details.join(", "))
    }
}

// ============================================================================
// Riceball
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiceballAttrs {
    pub flavor: Option<String>,
    pub rice: Option<String>,
    #[serde(default)]
    pub large: bool,
    #[serde(default)]
    pub heavy: bool,
    #[serde(default)]
    pub extra_egg: bool,
    #[serde(default)]
    pub ingredients_add: Vec<String>,
}

impl RiceballAttrs {
    pub fn merge_from(&mut self, other: RiceballAttrs) -> bool {
        let mut changed = fill(&mut self.flavor, other.flavor);
        changed |= fill(&mut self.rice, other.rice);
        changed |= raise(&mut self.large, other.large);
        changed |= raise(&mut self.heavy, other.heavy);
        changed |= raise(&mut self.extra_egg, other.extra_egg);
        changed |= extend_unique(&mut self.ingredients_add, other.ingredients_add);
        changed
    }

    /// Display name of the flavour, e.g. `黑椒里肌飯糰`.
    pub fn display_name(&self) -> String {
        match &self.flavor {
            Some(flavor) if flavor.ends_with("飯糰") => flavor.clone(),
            Some(flavor) => format!("{}飯糰", flavor),
            None => "飯糰".to_string(),
        }
    }

    pub fn label(&self) -> String {
        let mut details = Vec::new();
        if let Some(rice) = &self.rice {
            details.push(rice.clone());
        }
        if self.heavy {
            details.push("重量".to_string());
        } else if self.large {
            details.push("加大".to_string());
        }
        if self.extra_egg {
            details.push("加蛋".to_string());
        }
        details.extend(self.ingredients_add.iter().map(|i| format!("加{}", i)));
        with_details(self.display_name(), &details)
    }
}

// ============================================================================
// Drink
// ============================================================================

/// Cup size. The menu carries one entry per size, suffixed `(中)` / `(大)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrinkSize {
    Medium,
    Large,
}

impl DrinkSize {
    pub const ALL: [DrinkSize; 2] = [DrinkSize::Medium, DrinkSize::Large];

    /// Spoken label, `中杯` / `大杯`.
    pub fn label(&self) -> &'static str {
        match self {
            DrinkSize::Medium => "中杯",
            DrinkSize::Large => "大杯",
        }
    }

    /// Suffix character used by menu entry names.
    pub fn menu_suffix(&self) -> &'static str {
        match self {
            DrinkSize::Medium => "中",
            DrinkSize::Large => "大",
        }
    }

    pub fn from_menu_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "中" => Some(DrinkSize::Medium),
            "大" => Some(DrinkSize::Large),
            _ => None,
        }
    }

    /// Menu entry name for `drink` in this size, e.g. `精選紅茶(大)`.
    pub fn menu_name(&self, drink: &str) -> String {
        format!("{}({})", drink, self.menu_suffix())
    }
}

/// One priced alternative offered while a combo drink swap awaits confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapCandidate {
    pub size: DrinkSize,
    pub menu_name: String,
    pub price: u32,
    pub delta: u32,
}

/// A combo drink swap whose price depends on a size the user has not chosen yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOffer {
    pub combo_name: String,
    pub target: String,
    pub candidates: Vec<SwapCandidate>,
}

impl SwapOffer {
    pub fn candidate(&self, size: DrinkSize) -> Option<&SwapCandidate> {
        self.candidates.iter().find(|c| c.size == size)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkAttrs {
    pub drink: Option<String>,
    pub temp: Option<String>,
    pub size: Option<DrinkSize>,
    pub sugar: Option<String>,
    /// Set while a price-changing swap waits for the user to pick a size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_offer: Option<SwapOffer>,
}

impl DrinkAttrs {
    pub fn merge_from(&mut self, other: DrinkAttrs) -> bool {
        let mut changed = fill(&mut self.drink, other.drink);
        changed |= fill(&mut self.temp, other.temp);
        changed |= fill(&mut self.size, other.size);
        changed |= fill(&mut self.sugar, other.sugar);
        changed
    }

    pub fn label(&self) -> String {
        let name = self.drink.clone().unwrap_or_else(|| "飲料".to_string());
        let mut details = Vec::new();
        if let Some(size) = self.size {
            details.push(size.label().to_string());
        }
        if let Some(temp) = &self.temp {
            details.push(temp.clone());
        }
        if let Some(sugar) = &self.sugar {
            details.push(sugar.clone());
        }
        with_details(name, &details)
    }
}

// ============================================================================
// Carrier (toast / burger / mantou)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierAttrs {
    pub carrier: Option<String>,
    pub flavor: Option<String>,
    #[serde(default)]
    pub ingredients_add: Vec<String>,
}

impl CarrierAttrs {
    pub fn merge_from(&mut self, other: CarrierAttrs) -> bool {
        let mut changed = fill(&mut self.carrier, other.carrier);
        changed |= fill(&mut self.flavor, other.flavor);
        changed |= extend_unique(&mut self.ingredients_add, other.ingredients_add);
        changed
    }

    /// Menu entry name, available once both slots are filled.
    pub fn menu_name(&self) -> Option<String> {
        match (&self.flavor, &self.carrier) {
            (Some(flavor), Some(carrier)) => Some(format!("{}{}", flavor, carrier)),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        let name = self.menu_name().unwrap_or_else(|| {
            format!(
                "{}{}",
                self.flavor.as_deref().unwrap_or(""),
                self.carrier.as_deref().unwrap_or("吐司/漢堡/饅頭")
            )
        });
        let details: Vec<String> = self
            .ingredients_add
            .iter()
            .map(|i| format!("加{}", i))
            .collect();
        with_details(name, &details)
    }
}

// ============================================================================
// Snack
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnackAttrs {
    pub snack: Option<String>,
    pub egg_cook: Option<String>,
}

impl SnackAttrs {
    pub fn merge_from(&mut self, other: SnackAttrs) -> bool {
        let mut changed = fill(&mut self.snack, other.snack);
        changed |= fill(&mut self.egg_cook, other.egg_cook);
        changed
    }

    pub fn label(&self) -> String {
        let name = self.snack.clone().unwrap_or_else(|| "點心".to_string());
        match &self.egg_cook {
            Some(cook) => format!("{}({})", name, cook),
            None => name,
        }
    }
}

// ============================================================================
// Egg pancake
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggPancakeAttrs {
    pub flavor: Option<String>,
    #[serde(default)]
    pub addons: Vec<String>,
}

impl EggPancakeAttrs {
    pub fn merge_from(&mut self, other: EggPancakeAttrs) -> bool {
        let mut changed = fill(&mut self.flavor, other.flavor);
        changed |= extend_unique(&mut self.addons, other.addons);
        changed
    }

    pub fn label(&self) -> String {
        let name = self.flavor.clone().unwrap_or_else(|| "蛋餅".to_string());
        let details: Vec<String> = self.addons.iter().map(|a| format!("加{}", a)).collect();
        with_details(name, &details)
    }
}

// ============================================================================
// Jam toast
// ============================================================================

pub const JAM_TOAST_THIN: &str = "薄片";
pub const JAM_TOAST_THICK: &str = "厚片";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JamToastAttrs {
    pub flavor: Option<String>,
    pub size: Option<String>,
    #[serde(default)]
    pub no_toast: bool,
    #[serde(default)]
    pub cut_edge: bool,
}

impl JamToastAttrs {
    pub fn merge_from(&mut self, other: JamToastAttrs) -> bool {
        let mut changed = fill(&mut self.flavor, other.flavor);
        changed |= fill(&mut self.size, other.size);
        changed |= raise(&mut self.no_toast, other.no_toast);
        changed |= raise(&mut self.cut_edge, other.cut_edge);
        self.normalize();
        changed
    }

    /// Edge cutting is only offered on thick slices.
    pub fn normalize(&mut self) {
        if self.size.as_deref() != Some(JAM_TOAST_THICK) {
            self.cut_edge = false;
        }
    }

    /// Size used for pricing; thin slices unless the customer asked otherwise.
    pub fn effective_size(&self) -> &str {
        self.size.as_deref().unwrap_or(JAM_TOAST_THIN)
    }

    pub fn menu_name(&self) -> Option<String> {
        self.flavor
            .as_ref()
            .map(|flavor| format!("果醬吐司({}/{})", flavor, self.effective_size()))
    }

    pub fn label(&self) -> String {
        let name = self.menu_name().unwrap_or_else(|| "果醬吐司".to_string());
        let mut details = Vec::new();
        if self.no_toast {
            details.push("不烤".to_string());
        }
        if self.cut_edge {
            details.push("切邊".to_string());
        }
        if details.is_empty() {
            name
        } else {
            format!("{} {}", name, details.join(" "))
        }
    }
}

// ============================================================================
// Combo
// ============================================================================

/// The drink a combo ships with, priced from the menu at explosion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundledDrink {
    pub drink: String,
    pub size: DrinkSize,
    pub price: u32,
}

/// A requested substitution of the combo's bundled drink.
///
/// `delta` stays `None` until the replacement is priced and confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkSwap {
    pub from: String,
    pub to: String,
    /// Chosen size; `None` while the offer is open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<DrinkSize>,
    pub delta: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboAttrs {
    /// Instance id shared with the sub-items this combo exploded into.
    pub combo_id: u64,
    /// Short name such as `套餐二` or `兒童餐`.
    pub name: String,
    /// Full menu entry name, used for the price lookup.
    pub menu_name: String,
    #[serde(default)]
    pub sub_items: Vec<super::ItemFrame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundled_drink: Option<BundledDrink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_drink: Option<DrinkSwap>,
}

impl ComboAttrs {
    pub fn label(&self) -> String {
        match &self.swap_drink {
            Some(DrinkSwap {
                from,
                to,
                size: Some(size),
                ..
            }) if from == to => format!("{}(飲料改{})", self.name, size.label()),
            Some(swap) => format!("{}(飲料換{})", self.name, swap.to),
            None => self.name.clone(),
        }
    }
}
