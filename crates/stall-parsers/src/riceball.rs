//! Riceball parser.
//!
//! Recognizes the flavour (menu names and counter shorthands), the rice,
//! size variants (`加大`, `重量`), `加蛋` and `加X` ingredient add-ons.

use std::sync::Arc;

use stall_core::config::PricingRules;
use stall_core::error::Result;
use stall_core::item::{ItemKind, ItemType, ParsedFrame, RiceballAttrs};
use stall_core::menu::{MenuCatalog, category};
use stall_core::parser::CategoryParser;

use crate::numerals::parse_quantity;
use crate::text::{Lexicon, extract_addons};

const FLAVOR_ALIASES: &[(&str, &str)] = &[
    ("源味", "源味傳統"),
    ("源味飯糰", "源味傳統"),
    ("傳統源味", "源味傳統"),
    ("傳統", "源味傳統"),
    ("半甜", "半甜鹹"),
    ("鹹蛋", "懷古鹹蛋"),
    ("黑椒", "黑椒里肌"),
    ("醬燒", "醬燒里肌"),
    ("蜜汁", "蜜汁燒肉"),
    ("燒肉", "蜜汁燒肉"),
    ("泡菜", "韓式泡菜"),
    ("起司", "香濃起司"),
    ("和風", "和風雞肉"),
    ("咖哩", "咖哩嫩雞"),
    ("素食", "素料"),
];

const RICES: &[(&str, &str)] = &[
    ("混合米", "混米"),
    ("紫米", "紫米"),
    ("紫飯", "紫米"),
    ("白米", "白米"),
    ("白飯", "白米"),
    ("混米", "混米"),
];

/// Add-on name that maps to the dedicated egg flag rather than an ingredient.
const EGG_ADDON: &str = "蛋";

pub struct RiceballParser {
    menu: Arc<dyn MenuCatalog>,
    addon_names: Vec<String>,
}

impl RiceballParser {
    pub fn new(menu: Arc<dyn MenuCatalog>, rules: &PricingRules) -> Self {
        let mut addon_names: Vec<String> = rules.riceball.addons.keys().cloned().collect();
        if !addon_names.iter().any(|n| n == EGG_ADDON) {
            addon_names.push(EGG_ADDON.to_string());
        }
        Self { menu, addon_names }
    }

    fn flavors(&self) -> Result<Lexicon> {
        let menu_names: Vec<(String, String)> = self
            .menu
            .items_in(category::RICEBALL)?
            .into_iter()
            .map(|item| (item.name.clone(), item.name))
            .collect();
        Ok(Lexicon::new(
            FLAVOR_ALIASES
                .iter()
                .map(|(a, f)| (a.to_string(), f.to_string()))
                .chain(menu_names),
        ))
    }
}

impl CategoryParser for RiceballParser {
    fn item_type(&self) -> ItemType {
        ItemType::Riceball
    }

    fn parse(&self, text: &str) -> Result<ParsedFrame> {
        let names: Vec<&str> = self.addon_names.iter().map(String::as_str).collect();
        let (rest, addons) = extract_addons(text, &names);

        let flavor = self
            .flavors()?
            .find(&rest)
            .map(|(_, flavor)| flavor.to_string());
        let rice = RICES
            .iter()
            .find(|(word, _)| rest.contains(*word))
            .map(|(_, rice)| rice.to_string());

        let extra_egg = addons.iter().any(|a| a == EGG_ADDON);
        let attrs = RiceballAttrs {
            flavor,
            rice,
            large: rest.contains("加大") || rest.contains("大顆"),
            heavy: rest.contains("重量"),
            extra_egg,
            ingredients_add: addons.into_iter().filter(|a| a != EGG_ADDON).collect(),
        };

        Ok(ParsedFrame::new(ItemKind::Riceball(attrs)).with_quantity(parse_quantity(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stall_infrastructure::{JsonMenuCatalog, load_pricing_rules};

    fn parse(text: &str) -> (Option<u32>, RiceballAttrs) {
        let parser = RiceballParser::new(
            Arc::new(JsonMenuCatalog::bundled()),
            &load_pricing_rules(None).unwrap(),
        );
        let frame = parser.parse(text).unwrap();
        match frame.kind {
            ItemKind::Riceball(attrs) => (frame.quantity, attrs),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_bare_riceball_has_nothing() {
        let (quantity, attrs) = parse("我要一個飯糰");
        assert_eq!(quantity, Some(1));
        assert_eq!(attrs, RiceballAttrs::default());
    }

    #[test]
    fn test_flavor_and_rice_in_one_turn() {
        let (_, attrs) = parse("紫米黑椒");
        assert_eq!(attrs.flavor.as_deref(), Some("黑椒里肌"));
        assert_eq!(attrs.rice.as_deref(), Some("紫米"));
    }

    #[test]
    fn test_menu_name_beats_shorthand() {
        let (_, attrs) = parse("醬燒里肌飯糰白飯");
        assert_eq!(attrs.flavor.as_deref(), Some("醬燒里肌"));
        assert_eq!(attrs.rice.as_deref(), Some("白米"));

        let (_, attrs) = parse("源味飯糰");
        assert_eq!(attrs.flavor.as_deref(), Some("源味傳統"));
    }

    #[test]
    fn test_addons_do_not_become_flavor() {
        let (_, attrs) = parse("鮪魚飯糰加起司加蛋 加大 混米");
        assert_eq!(attrs.flavor.as_deref(), Some("鮪魚"));
        assert_eq!(attrs.ingredients_add, vec!["起司"]);
        assert!(attrs.extra_egg);
        assert!(attrs.large);
        assert_eq!(attrs.rice.as_deref(), Some("混米"));
    }

    #[test]
    fn test_heavy_and_quantity() {
        let (quantity, attrs) = parse("兩個重量蜜汁");
        assert_eq!(quantity, Some(2));
        assert!(attrs.heavy);
        assert_eq!(attrs.flavor.as_deref(), Some("蜜汁燒肉"));
    }
}
