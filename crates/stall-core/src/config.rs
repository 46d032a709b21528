//! Data-driven rule sets shared by parsers, combo resolution and pricing.
//!
//! These are plain serde models; loading lives in the infrastructure crate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Riceball price adjustments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiceballRules {
    pub large_delta: u32,
    /// Flat price of the heavy variant.
    pub heavy_price: u32,
    pub extra_egg: u32,
    /// Flavours that only come in large; a heavy request is priced as large.
    #[serde(default)]
    pub only_large_flavors: Vec<String>,
    #[serde(default)]
    pub addons: HashMap<String, u32>,
}

/// Addon and variant pricing on top of menu prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRules {
    pub riceball: RiceballRules,
    #[serde(default)]
    pub carrier_addons: HashMap<String, u32>,
    #[serde(default)]
    pub egg_pancake_addons: HashMap<String, u32>,
}

/// One regex rewrite applied to combo component names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeRule {
    pub pattern: String,
    #[serde(default)]
    pub replace: String,
}

/// Alias table for combo explosion and content-based combo inference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboAliasConfig {
    /// Surface name to canonical menu name.
    #[serde(default)]
    pub manual_aliases: HashMap<String, String>,
    /// Cosmetic rewrites (sizes, sugar levels, preparation words), in order.
    #[serde(default)]
    pub normalize_rules: Vec<NormalizeRule>,
    /// Canonical names allowed to infer a combo on their own.
    #[serde(default)]
    pub allow_single_item_keywords: Vec<String>,
}

// ============================================================================
// Application configuration (config.toml)
// ============================================================================

fn default_max_segments() -> usize {
    6
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_confidence_threshold() -> f32 {
    0.75
}

fn default_api_key_env() -> String {
    "STALL_LLM_API_KEY".to_string()
}

fn default_base_url() -> String {
    "http://localhost:1234/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StallConfig {
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub dialogue: DialogueConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub orders: OrdersConfig,
}

/// Data file locations. Unset paths use the bundled data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuConfig {
    pub menu_path: Option<String>,
    pub aliases_path: Option<String>,
    pub pricing_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueConfig {
    /// Upper bound on spans taken from one utterance.
    #[serde(default = "default_max_segments")]
    pub max_segments: usize,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            max_segments: default_max_segments(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_ms: default_timeout_ms(),
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStorage {
    Memory,
    #[default]
    Dir,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdersConfig {
    #[serde(default)]
    pub storage: OrderStorage,
    /// Directory for `dir` storage; defaults to the platform data dir.
    pub dir: Option<String>,
}
