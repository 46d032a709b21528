//! Cart pricing.
//!
//! Prices are always re-derived from the menu and the pricing rules. Nothing
//! the customer said about money is ever consulted.

use std::sync::Arc;

use serde::Serialize;
use stall_core::config::PricingRules;
use stall_core::error::{Result, StallError};
use stall_core::item::{
    CarrierAttrs, ComboAttrs, DrinkAttrs, EggPancakeAttrs, ItemFrame, ItemKind, JamToastAttrs,
    RiceballAttrs, SnackAttrs,
};
use stall_core::menu::{MenuCatalog, category};
use stall_core::order::OrderLine;

/// Priced cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub lines: Vec<OrderLine>,
    pub total: u32,
}

impl Quote {
    /// Number of units across all lines.
    pub fn unit_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

fn overflow(item: impl Into<String>) -> StallError {
    StallError::pricing(item, "amount out of range")
}

fn add(a: u32, b: u32, item: &str) -> Result<u32> {
    a.checked_add(b).ok_or_else(|| overflow(item))
}

#[derive(Clone)]
pub struct PricingAggregator {
    menu: Arc<dyn MenuCatalog>,
    rules: PricingRules,
}

impl PricingAggregator {
    pub fn new(menu: Arc<dyn MenuCatalog>, rules: PricingRules) -> Self {
        Self { menu, rules }
    }

    /// Prices every cart line.
    ///
    /// # Errors
    ///
    /// Returns `StallError::Pricing` naming the first line that has no
    /// canonical price or whose amount does not fit. No partial quote is
    /// produced.
    pub fn quote(&self, cart: &[ItemFrame]) -> Result<Quote> {
        let mut lines = Vec::with_capacity(cart.len());
        let mut total: u32 = 0;
        for frame in cart {
            let unit_price = self.unit_price(frame)?;
            let subtotal = unit_price
                .checked_mul(frame.quantity)
                .ok_or_else(|| overflow(frame.label()))?;
            total = total
                .checked_add(subtotal)
                .ok_or_else(|| overflow(frame.label()))?;
            lines.push(OrderLine {
                name: frame.label(),
                quantity: frame.quantity,
                unit_price,
                subtotal,
            });
        }
        Ok(Quote { lines, total })
    }

    /// Price of one unit of `frame`.
    pub fn unit_price(&self, frame: &ItemFrame) -> Result<u32> {
        let price = match &frame.kind {
            ItemKind::Riceball(attrs) => self.riceball_price(attrs),
            ItemKind::Drink(attrs) => self.drink_price(attrs),
            ItemKind::Carrier(attrs) => self.carrier_price(attrs),
            ItemKind::Snack(attrs) => self.snack_price(attrs),
            ItemKind::EggPancake(attrs) => self.egg_pancake_price(attrs),
            ItemKind::JamToast(attrs) => self.jam_toast_price(attrs),
            ItemKind::Combo(attrs) => self.combo_price(attrs),
        };
        price.map_err(|e| {
            let reason = match e {
                StallError::Pricing { reason, .. } => reason,
                other => other.to_string(),
            };
            tracing::warn!("[Pricing] Cannot price '{}': {}", frame.label(), reason);
            StallError::pricing(frame.label(), reason)
        })
    }

    fn lookup(&self, category: &str, name: &str) -> Result<u32> {
        self.menu.get_price(category, name)
    }

    fn addon_total(
        &self,
        table: &std::collections::HashMap<String, u32>,
        addons: &[String],
    ) -> Result<u32> {
        addons.iter().try_fold(0u32, |sum, addon| {
            let price = table
                .get(addon)
                .ok_or_else(|| StallError::pricing(addon.clone(), "unknown add-on"))?;
            sum.checked_add(*price).ok_or_else(|| overflow(addon.clone()))
        })
    }

    fn riceball_price(&self, attrs: &RiceballAttrs) -> Result<u32> {
        let flavor = attrs
            .flavor
            .as_deref()
            .ok_or_else(|| StallError::pricing("飯糰", "no flavor"))?;
        let rules = &self.rules.riceball;
        let base = self.lookup(category::RICEBALL, flavor)?;

        let only_large = rules.only_large_flavors.iter().any(|f| f == flavor);
        let sized = if attrs.heavy && !only_large {
            rules.heavy_price
        } else if attrs.heavy || attrs.large {
            add(base, rules.large_delta, flavor)?
        } else {
            base
        };
        let egg = if attrs.extra_egg { rules.extra_egg } else { 0 };
        let addons = self.addon_total(&rules.addons, &attrs.ingredients_add)?;
        add(add(sized, egg, flavor)?, addons, flavor)
    }

    fn drink_price(&self, attrs: &DrinkAttrs) -> Result<u32> {
        match (&attrs.drink, attrs.size) {
            (Some(drink), Some(size)) => self.lookup(category::DRINK, &size.menu_name(drink)),
            _ => Err(StallError::pricing(attrs.label(), "drink or size missing")),
        }
    }

    fn carrier_price(&self, attrs: &CarrierAttrs) -> Result<u32> {
        let (Some(carrier), Some(name)) = (&attrs.carrier, attrs.menu_name()) else {
            return Err(StallError::pricing(attrs.label(), "carrier or flavor missing"));
        };
        let base = self.lookup(carrier, &name)?;
        let addons = self.addon_total(&self.rules.carrier_addons, &attrs.ingredients_add)?;
        add(base, addons, &name)
    }

    fn snack_price(&self, attrs: &SnackAttrs) -> Result<u32> {
        let snack = attrs
            .snack
            .as_deref()
            .ok_or_else(|| StallError::pricing("點心", "no snack"))?;
        self.lookup(category::SNACK, snack)
    }

    fn egg_pancake_price(&self, attrs: &EggPancakeAttrs) -> Result<u32> {
        let flavor = attrs
            .flavor
            .as_deref()
            .ok_or_else(|| StallError::pricing("蛋餅", "no flavor"))?;
        let base = self.lookup(category::EGG_PANCAKE, flavor)?;
        let addons = self.addon_total(&self.rules.egg_pancake_addons, &attrs.addons)?;
        add(base, addons, flavor)
    }

    fn jam_toast_price(&self, attrs: &JamToastAttrs) -> Result<u32> {
        let name = attrs
            .menu_name()
            .ok_or_else(|| StallError::pricing("果醬吐司", "no flavor"))?;
        self.lookup(category::JAM_TOAST, &name)
    }

    fn combo_price(&self, attrs: &ComboAttrs) -> Result<u32> {
        let base = self.lookup(category::COMBO, &attrs.menu_name)?;
        match &attrs.swap_drink {
            None => Ok(base),
            Some(swap) => {
                let delta = swap.delta.ok_or_else(|| {
                    StallError::pricing(
                        attrs.label(),
                        format!("drink swap to {} has no confirmed price", swap.to),
                    )
                })?;
                add(base, delta, &attrs.name)
            }
        }
    }
}
