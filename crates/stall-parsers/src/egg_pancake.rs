//! Egg pancake parser.
//!
//! A bare `蛋餅` is the plain pancake. When a plain pancake comes with an
//! add-on that is also a flavour of its own (`原味蛋餅加薯餅`), the parser
//! orders whichever of the two is cheaper.

use std::collections::HashMap;
use std::sync::Arc;

use stall_core::config::PricingRules;
use stall_core::error::Result;
use stall_core::item::{EggPancakeAttrs, ItemKind, ItemType, ParsedFrame};
use stall_core::menu::{MenuCatalog, category};
use stall_core::parser::CategoryParser;

use crate::numerals::parse_quantity;
use crate::text::{Lexicon, extract_addons};

pub const PLAIN_PANCAKE: &str = "原味蛋餅";

const FLAVOR_ALIASES: &[(&str, &str)] = &[
    ("蔬菜蛋餅", "高麗菜蛋餅"),
    ("醬燒蛋餅", "醬燒肉片蛋餅"),
    ("肉片蛋餅", "醬燒肉片蛋餅"),
    ("醬燒肉片", "醬燒肉片蛋餅"),
    ("泡菜蛋餅", "韓式泡菜蛋餅"),
    ("蛋餅", PLAIN_PANCAKE),
];

/// Spoken add-on names mapped to the priced add-on.
const ADDON_ALIASES: &[(&str, &str)] = &[("醬燒肉片", "肉片")];

/// Add-ons that exist as a pancake flavour of their own.
const ADDON_FLAVORS: &[(&str, &str)] = &[
    ("肉片", "醬燒肉片蛋餅"),
    ("薯餅", "薯餅蛋餅"),
    ("培根", "培根蛋餅"),
    ("火腿", "火腿蛋餅"),
    ("高麗菜", "高麗菜蛋餅"),
    ("起司", "起司蛋餅"),
];

pub struct EggPancakeParser {
    menu: Arc<dyn MenuCatalog>,
    addon_prices: HashMap<String, u32>,
}

impl EggPancakeParser {
    pub fn new(menu: Arc<dyn MenuCatalog>, rules: &PricingRules) -> Self {
        Self {
            menu,
            addon_prices: rules.egg_pancake_addons.clone(),
        }
    }

    fn flavors(&self) -> Result<Lexicon> {
        let menu_names: Vec<(String, String)> = self
            .menu
            .items_in(category::EGG_PANCAKE)?
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

    fn parse_addons(&self, text: &str) -> (String, Vec<String>) {
        let mut names: Vec<&str> = self.addon_prices.keys().map(String::as_str).collect();
        names.extend(ADDON_ALIASES.iter().map(|(alias, _)| *alias));
        let (rest, found) = extract_addons(text, &names);

        let mut addons: Vec<String> = Vec::new();
        for name in found {
            let canonical = ADDON_ALIASES
                .iter()
                .find(|(alias, _)| *alias == name)
                .map(|(_, addon)| addon.to_string())
                .unwrap_or(name);
            if !addons.contains(&canonical) {
                addons.push(canonical);
            }
        }
        (rest, addons)
    }

    /// Swaps `plain + addon` for the flavour named by the addon when strictly
    /// cheaper. Prices that cannot be looked up leave the order as spoken.
    fn cheapest(&self, flavor: String, mut addons: Vec<String>) -> (String, Vec<String>) {
        if flavor != PLAIN_PANCAKE {
            return (flavor, addons);
        }
        let Ok(plain) = self.menu.get_price(category::EGG_PANCAKE, PLAIN_PANCAKE) else {
            return (flavor, addons);
        };

        let mut best: Option<(usize, &str, u32)> = None;
        for (index, addon) in addons.iter().enumerate() {
            let Some(target) = ADDON_FLAVORS
                .iter()
                .find(|(a, _)| *a == addon.as_str())
                .map(|(_, target)| *target)
            else {
                continue;
            };
            let (Some(addon_price), Ok(target_price)) = (
                self.addon_prices.get(addon),
                self.menu.get_price(category::EGG_PANCAKE, target),
            ) else {
                continue;
            };
            let saving = (plain + addon_price).saturating_sub(target_price);
            if saving > 0 && best.is_none_or(|(_, _, s)| saving > s) {
                best = Some((index, target, saving));
            }
        }

        match best {
            Some((index, target, saving)) => {
                tracing::debug!(
                    "[EggPancakeParser] {} saves {} over {} + {}",
                    target,
                    saving,
                    PLAIN_PANCAKE,
                    addons[index]
                );
                addons.remove(index);
                (target.to_string(), addons)
            }
            None => (flavor, addons),
        }
    }
}

impl CategoryParser for EggPancakeParser {
    fn item_type(&self) -> ItemType {
        ItemType::EggPancake
    }

    fn parse(&self, text: &str) -> Result<ParsedFrame> {
        let (rest, addons) = self.parse_addons(text);
        let flavor = self
            .flavors()?
            .find(&rest)
            .map(|(_, flavor)| flavor.to_string());

        let attrs = match flavor {
            Some(flavor) => {
                let (flavor, addons) = self.cheapest(flavor, addons);
                EggPancakeAttrs {
                    flavor: Some(flavor),
                    addons,
                }
            }
            None => EggPancakeAttrs {
                flavor: None,
                addons,
            },
        };
        Ok(ParsedFrame::new(ItemKind::EggPancake(attrs)).with_quantity(parse_quantity(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stall_infrastructure::{JsonMenuCatalog, load_pricing_rules};

    fn parse(text: &str) -> EggPancakeAttrs {
        let parser = EggPancakeParser::new(
            Arc::new(JsonMenuCatalog::bundled()),
            &load_pricing_rules(None).unwrap(),
        );
        match parser.parse(text).unwrap().kind {
            ItemKind::EggPancake(attrs) => attrs,
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_bare_pancake_is_plain() {
        assert_eq!(parse("我要一個蛋餅").flavor.as_deref(), Some(PLAIN_PANCAKE));
    }

    #[test]
    fn test_named_flavor_and_alias() {
        assert_eq!(parse("玉米蛋餅").flavor.as_deref(), Some("玉米蛋餅"));
        assert_eq!(parse("蔬菜蛋餅").flavor.as_deref(), Some("高麗菜蛋餅"));
        assert_eq!(parse("醬燒蛋餅").flavor.as_deref(), Some("醬燒肉片蛋餅"));
    }

    #[test]
    fn test_addon_on_named_flavor_is_kept() {
        let attrs = parse("玉米蛋餅加起司");
        assert_eq!(attrs.flavor.as_deref(), Some("玉米蛋餅"));
        assert_eq!(attrs.addons, vec!["起司"]);
    }

    #[test]
    fn test_plain_plus_addon_becomes_cheaper_flavor() {
        // 30 + 20 for the hash brown add-on against 45 for the flavour.
        let attrs = parse("蛋餅加薯餅");
        assert_eq!(attrs.flavor.as_deref(), Some("薯餅蛋餅"));
        assert!(attrs.addons.is_empty());

        // 30 + 35 against 60.
        let attrs = parse("原味蛋餅加醬燒肉片");
        assert_eq!(attrs.flavor.as_deref(), Some("醬燒肉片蛋餅"));
        assert!(attrs.addons.is_empty());
    }

    #[test]
    fn test_equal_price_keeps_addon() {
        // 30 + 10 for cheese equals the 40 of the cheese pancake.
        let attrs = parse("蛋餅加起司");
        assert_eq!(attrs.flavor.as_deref(), Some(PLAIN_PANCAKE));
        assert_eq!(attrs.addons, vec!["起司"]);
    }
}
