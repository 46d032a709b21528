//! Drink parser: drink name, temperature, cup size and sugar level.

use std::sync::Arc;

use stall_core::error::Result;
use stall_core::item::{DrinkAttrs, DrinkSize, ItemKind, ItemType, ParsedFrame};
use stall_core::menu::{MenuCatalog, category};
use stall_core::parser::CategoryParser;

use crate::numerals::parse_quantity;

/// One spoken form of a drink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrinkAlias {
    pub alias: &'static str,
    pub drink: &'static str,
    pub sugar: Option<&'static str>,
    /// `大冰X` counter shorthand: large and iced.
    pub large_iced: bool,
}

const fn alias(alias: &'static str, drink: &'static str) -> DrinkAlias {
    DrinkAlias {
        alias,
        drink,
        sugar: None,
        large_iced: false,
    }
}

const fn unsweetened(alias: &'static str, drink: &'static str) -> DrinkAlias {
    DrinkAlias {
        alias,
        drink,
        sugar: Some("無糖"),
        large_iced: false,
    }
}

const fn large_iced(alias: &'static str, drink: &'static str) -> DrinkAlias {
    DrinkAlias {
        alias,
        drink,
        sugar: None,
        large_iced: true,
    }
}

pub const DRINK_ALIASES: &[DrinkAlias] = &[
    large_iced("大冰豆", "豆漿"),
    DrinkAlias {
        alias: "大冰清",
        drink: "豆漿",
        sugar: Some("無糖"),
        large_iced: true,
    },
    large_iced("大冰紅", "精選紅茶"),
    large_iced("大冰米", "花生糙米漿"),
    large_iced("大冰混", "米漿豆漿"),
    large_iced("大冰薏", "燕麥薏仁漿"),
    large_iced("大冰綠", "無糖清香綠茶"),
    large_iced("大冰奶", "純鮮奶茶"),
    large_iced("大冰黑糖", "黑糖純鮮奶茶"),
    large_iced("大冰咖", "純鮮奶咖啡"),
    large_iced("大冰十穀", "十穀漿"),
    alias("豆漿", "豆漿"),
    unsweetened("無糖豆漿", "豆漿"),
    unsweetened("清漿", "豆漿"),
    unsweetened("白漿", "豆漿"),
    alias("紅茶", "精選紅茶"),
    alias("綠茶", "無糖清香綠茶"),
    alias("清香綠茶", "無糖清香綠茶"),
    alias("米漿", "花生糙米漿"),
    alias("糙米漿", "花生糙米漿"),
    alias("混漿", "米漿豆漿"),
    alias("十穀", "十穀漿"),
    alias("五穀漿", "十穀漿"),
    alias("薏仁漿", "燕麥薏仁漿"),
    alias("奶茶", "純鮮奶茶"),
    alias("鮮奶茶", "純鮮奶茶"),
    alias("黑糖奶茶", "黑糖純鮮奶茶"),
    alias("黑糖鮮奶茶", "黑糖純鮮奶茶"),
    alias("咖啡", "純鮮奶咖啡"),
    alias("鮮奶咖啡", "純鮮奶咖啡"),
    alias("拿鐵", "純鮮奶咖啡"),
];

const TEMPS: &[(&str, &str)] = &[
    ("去冰", "去冰"),
    ("少冰", "少冰"),
    ("微冰", "少冰"),
    ("常溫", "溫"),
    ("冷的", "冰"),
    ("冰", "冰"),
    ("溫", "溫"),
    ("熱", "熱"),
];

const SUGARS: &[&str] = &["無糖", "半糖", "微糖", "少糖", "全糖", "有糖"];

/// Whether `text` names any drink by one of its spoken aliases.
pub fn mentions_drink(text: &str) -> bool {
    DRINK_ALIASES.iter().any(|a| text.contains(a.alias))
}

fn parse_size(text: &str) -> Option<DrinkSize> {
    if text.contains("大杯") {
        Some(DrinkSize::Large)
    } else if text.contains("中杯") || text.contains("小杯") {
        Some(DrinkSize::Medium)
    } else if text.contains('大') {
        Some(DrinkSize::Large)
    } else if text.contains('中') || text.contains('小') {
        Some(DrinkSize::Medium)
    } else {
        None
    }
}

fn parse_temp(text: &str) -> Option<String> {
    TEMPS
        .iter()
        .find(|(word, _)| text.contains(*word))
        .map(|(_, temp)| temp.to_string())
}

fn parse_sugar(text: &str) -> Option<String> {
    SUGARS
        .iter()
        .find(|sugar| text.contains(**sugar))
        .map(|sugar| sugar.to_string())
}

/// The drink mention found in an utterance.
#[derive(Debug, Clone)]
struct Mention {
    surface: String,
    drink: String,
    sugar: Option<&'static str>,
    large_iced: bool,
}

pub struct DrinkParser {
    menu: Arc<dyn MenuCatalog>,
}

impl DrinkParser {
    pub fn new(menu: Arc<dyn MenuCatalog>) -> Self {
        Self { menu }
    }

    /// Longest mention among menu names and spoken aliases that is on the menu.
    fn detect(&self, text: &str) -> Result<Option<Mention>> {
        let drinks = self.menu.items_in(category::DRINK)?;

        let mut candidates: Vec<Mention> = DRINK_ALIASES
            .iter()
            .map(|a| Mention {
                surface: a.alias.to_string(),
                drink: a.drink.to_string(),
                sugar: a.sugar,
                large_iced: a.large_iced,
            })
            .collect();
        candidates.extend(drinks.iter().map(|item| Mention {
            surface: item.base_name().to_string(),
            drink: item.base_name().to_string(),
            sugar: None,
            large_iced: false,
        }));
        candidates.sort_by_key(|m| std::cmp::Reverse(m.surface.chars().count()));

        let Some(found) = candidates
            .into_iter()
            .find(|m| text.contains(m.surface.as_str()))
        else {
            return Ok(None);
        };

        if drinks.iter().any(|item| item.base_name() == found.drink) {
            Ok(Some(found))
        } else {
            tracing::debug!("[DrinkParser] '{}' is not on the menu", found.drink);
            Ok(None)
        }
    }
}

impl CategoryParser for DrinkParser {
    fn item_type(&self) -> ItemType {
        ItemType::Drink
    }

    fn parse(&self, text: &str) -> Result<ParsedFrame> {
        let mention = self.detect(text)?;

        // Size and temperature words are read with the drink name removed,
        // so names never leak into them.
        let rest = match &mention {
            Some(m) => text.replacen(m.surface.as_str(), " ", 1),
            None => text.to_string(),
        };

        let mut attrs = DrinkAttrs {
            drink: mention.as_ref().map(|m| m.drink.clone()),
            temp: parse_temp(&rest),
            size: parse_size(&rest),
            sugar: parse_sugar(&rest),
            swap_offer: None,
        };
        if let Some(m) = &mention {
            if m.large_iced {
                attrs.size = Some(DrinkSize::Large);
                attrs.temp.get_or_insert_with(|| "冰".to_string());
            }
            if let Some(sugar) = m.sugar {
                attrs.sugar.get_or_insert_with(|| sugar.to_string());
            }
        }

        Ok(ParsedFrame::new(ItemKind::Drink(attrs)).with_quantity(parse_quantity(text)))
    }
}
