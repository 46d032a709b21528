//! Loaders for the JSON rule files: combo aliases and pricing rules.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use stall_core::config::{ComboAliasConfig, PricingRules};
use stall_core::error::{Result, StallError};

pub const BUNDLED_COMBO_ALIASES: &str = include_str!("../data/combo_aliases.json");
pub const BUNDLED_PRICING_RULES: &str = include_str!("../data/pricing_rules.json");

fn parse_json<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T> {
    serde_json::from_str(raw.trim_start_matches('\u{feff}'))
        .map_err(|e| StallError::menu_unavailable(format!("malformed {}: {}", what, e)))
}

fn load_or_bundled<T: DeserializeOwned>(path: Option<&Path>, bundled: &str, what: &str) -> Result<T> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|e| {
                StallError::menu_unavailable(format!(
                    "failed to read {} from {}: {}",
                    what,
                    path.display(),
                    e
                ))
            })?;
            tracing::info!("[Rules] Loaded {} from {}", what, path.display());
            parse_json(&raw, what)
        }
        None => parse_json(bundled, what),
    }
}

/// Loads the combo alias table from `path`, or the bundled one.
pub fn load_combo_aliases(path: Option<&Path>) -> Result<ComboAliasConfig> {
    load_or_bundled(path, BUNDLED_COMBO_ALIASES, "combo aliases")
}

/// Loads the pricing rules from `path`, or the bundled ones.
pub fn load_pricing_rules(path: Option<&Path>) -> Result<PricingRules> {
    load_or_bundled(path, BUNDLED_PRICING_RULES, "pricing rules")
}
