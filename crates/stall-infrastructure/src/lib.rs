pub mod config_service;
pub mod menu_catalog;
pub mod order_repository;
pub mod paths;
pub mod rules;

pub use crate::config_service::ConfigService;
pub use crate::menu_catalog::JsonMenuCatalog;
pub use crate::order_repository::{InMemoryOrderRepository, JsonDirOrderRepository};
pub use crate::paths::StallPaths;
pub use crate::rules::{load_combo_aliases, load_pricing_rules};
