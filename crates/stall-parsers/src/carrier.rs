//! Toast / burger / mantou parser.

use std::sync::Arc;

use stall_core::config::PricingRules;
use stall_core::error::Result;
use stall_core::item::{CarrierAttrs, ItemKind, ItemType, ParsedFrame};
use stall_core::menu::{MenuCatalog, category};
use stall_core::parser::CategoryParser;

use crate::numerals::parse_quantity;
use crate::text::{Lexicon, extract_addons};

/// Shorthands that do not follow the `{flavor}蛋` pattern.
const EXTRA_FLAVOR_ALIASES: &[(&str, &str)] = &[("肉片", "醬燒肉片蛋"), ("醬燒", "醬燒肉片蛋")];

pub struct CarrierParser {
    menu: Arc<dyn MenuCatalog>,
    addon_names: Vec<String>,
}

impl CarrierParser {
    pub fn new(menu: Arc<dyn MenuCatalog>, rules: &PricingRules) -> Self {
        Self {
            menu,
            addon_names: rules.carrier_addons.keys().cloned().collect(),
        }
    }

    /// Flavours are the carrier menu names with the carrier removed.
    ///
    /// `火腿蛋吐司` yields `火腿蛋`, also reachable as `火腿`.
    fn flavors(&self) -> Result<Lexicon> {
        let mut entries: Vec<(String, String)> = Vec::new();
        for carrier in category::CARRIERS {
            for item in self.menu.items_in(carrier)? {
                let Some(flavor) = item.name.strip_suffix(carrier) else {
                    continue;
                };
                if flavor.is_empty() {
                    continue;
                }
                entries.push((flavor.to_string(), flavor.to_string()));
                if let Some(short) = flavor.strip_suffix('蛋').filter(|s| !s.is_empty()) {
                    entries.push((short.to_string(), flavor.to_string()));
                }
            }
        }
        entries.extend(
            EXTRA_FLAVOR_ALIASES
                .iter()
                .map(|(a, f)| (a.to_string(), f.to_string())),
        );
        Ok(Lexicon::new(entries))
    }
}

impl CategoryParser for CarrierParser {
    fn item_type(&self) -> ItemType {
        ItemType::Carrier
    }

    fn parse(&self, text: &str) -> Result<ParsedFrame> {
        let names: Vec<&str> = self.addon_names.iter().map(String::as_str).collect();
        let (rest, ingredients_add) = extract_addons(text, &names);

        let carrier = category::CARRIERS
            .iter()
            .find(|carrier| rest.contains(**carrier))
            .map(|carrier| carrier.to_string());
        let flavor = self
            .flavors()?
            .find(&rest)
            .map(|(_, flavor)| flavor.to_string());

        let attrs = CarrierAttrs {
            carrier,
            flavor,
            ingredients_add,
        };
        Ok(ParsedFrame::new(ItemKind::Carrier(attrs)).with_quantity(parse_quantity(text)))
    }
}
