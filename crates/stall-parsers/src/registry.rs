//! Category parser lookup by item type.

use std::collections::HashMap;
use std::sync::Arc;

use stall_core::config::PricingRules;
use stall_core::item::ItemType;
use stall_core::menu::MenuCatalog;
use stall_core::parser::CategoryParser;

use crate::carrier::CarrierParser;
use crate::drink::DrinkParser;
use crate::egg_pancake::EggPancakeParser;
use crate::jam_toast::JamToastParser;
use crate::riceball::RiceballParser;
use crate::snack::SnackParser;

/// Parsers keyed by the item type they produce.
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: HashMap<ItemType, Arc<dyn CategoryParser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the six built-in parsers over one shared menu.
    pub fn standard(menu: Arc<dyn MenuCatalog>, rules: &PricingRules) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RiceballParser::new(Arc::clone(&menu), rules)));
        registry.register(Arc::new(DrinkParser::new(Arc::clone(&menu))));
        registry.register(Arc::new(CarrierParser::new(Arc::clone(&menu), rules)));
        registry.register(Arc::new(SnackParser::new(Arc::clone(&menu))));
        registry.register(Arc::new(EggPancakeParser::new(Arc::clone(&menu), rules)));
        registry.register(Arc::new(JamToastParser::new(menu)));
        registry
    }

    /// Adds or replaces the parser for its item type.
    pub fn register(&mut self, parser: Arc<dyn CategoryParser>) {
        self.parsers.insert(parser.item_type(), parser);
    }

    pub fn get(&self, item_type: ItemType) -> Option<Arc<dyn CategoryParser>> {
        self.parsers.get(&item_type).cloned()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("item_types", &self.parsers.keys().collect::<Vec<_>>())
            .finish()
    }
}
