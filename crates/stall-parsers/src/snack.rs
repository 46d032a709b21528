//! Side dish parser.

use std::sync::Arc;

use stall_core::error::Result;
use stall_core::item::{ItemKind, ItemType, ParsedFrame, SnackAttrs};
use stall_core::menu::{MenuCatalog, category};
use stall_core::parser::CategoryParser;

use crate::numerals::parse_quantity;
use crate::text::Lexicon;

const SNACK_ALIASES: &[(&str, &str)] = &[
    ("雞塊", "麥克雞塊(5個)"),
    ("肉片", "醬燒肉片(1份)"),
    ("荷包", "荷包蛋"),
];

/// Keywords the router uses to spot a side dish.
pub const SNACK_KEYWORDS: &[&str] = &["薯餅", "熱狗", "荷包蛋", "蘿蔔糕", "薯條", "雞塊", "肉片"];

const EGG_COOK: &[&str] = &["半熟", "全熟"];

pub struct SnackParser {
    menu: Arc<dyn MenuCatalog>,
}

impl SnackParser {
    pub fn new(menu: Arc<dyn MenuCatalog>) -> Self {
        Self { menu }
    }

    fn snacks(&self) -> Result<Lexicon> {
        let items = self.menu.items_in(category::SNACK)?;
        let mut entries: Vec<(String, String)> = Vec::new();
        for item in &items {
            entries.push((item.name.clone(), item.name.clone()));
            entries.push((item.base_name().to_string(), item.name.clone()));
        }
        // Aliases only apply when their target is on the menu.
        entries.extend(
            SNACK_ALIASES
                .iter()
                .filter(|(_, target)| items.iter().any(|item| item.name == *target))
                .map(|(a, t)| (a.to_string(), t.to_string())),
        );
        Ok(Lexicon::new(entries))
    }
}

impl CategoryParser for SnackParser {
    fn item_type(&self) -> ItemType {
        ItemType::Snack
    }

    fn parse(&self, text: &str) -> Result<ParsedFrame> {
        let attrs = SnackAttrs {
            snack: self
                .snacks()?
                .find(text)
                .map(|(_, snack)| snack.to_string()),
            egg_cook: EGG_COOK
                .iter()
                .find(|cook| text.contains(**cook))
                .map(|cook| cook.to_string()),
        };
        Ok(ParsedFrame::new(ItemKind::Snack(attrs)).with_quantity(parse_quantity(text)))
    }
}
