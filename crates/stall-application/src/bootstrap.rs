//! Wires a [`DialogueManager`] from [`StallConfig`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use stall_core::config::{OrderStorage, StallConfig};
use stall_core::error::Result;
use stall_core::menu::MenuCatalog;
use stall_core::order::OrderRepository;
use stall_infrastructure::{
    InMemoryOrderRepository, JsonDirOrderRepository, JsonMenuCatalog, StallPaths,
    load_combo_aliases, load_pricing_rules,
};
use stall_interaction::{ChatClient, ChatLlmClarifier, ChatLlmRouter};

use crate::dialogue::DialogueManager;

pub fn build_menu(config: &StallConfig) -> Arc<dyn MenuCatalog> {
    match &config.menu.menu_path {
        Some(path) => Arc::new(JsonMenuCatalog::from_path(path)),
        None => Arc::new(JsonMenuCatalog::bundled()),
    }
}

/// Order store selected by `[orders]`.
///
/// # Errors
///
/// Returns an error if the order directory cannot be resolved or created.
pub async fn build_order_repository(config: &StallConfig) -> Result<Arc<dyn OrderRepository>> {
    match config.orders.storage {
        OrderStorage::Memory => Ok(Arc::new(InMemoryOrderRepository::new())),
        OrderStorage::Dir => {
            let dir = match &config.orders.dir {
                Some(dir) => PathBuf::from(dir),
                None => StallPaths::default().orders_dir()?,
            };
            tracing::debug!("[Bootstrap] Orders stored in {}", dir.display());
            Ok(Arc::new(JsonDirOrderRepository::new(dir).await?))
        }
    }
}

/// Builds a manager over `orders` with every other collaborator taken from
/// `config`. LLM collaborators are attached only when `[llm] enabled`.
pub fn build_manager_with(
    config: &StallConfig,
    orders: Arc<dyn OrderRepository>,
) -> Result<DialogueManager> {
    let rules = load_pricing_rules(config.menu.pricing_path.as_deref().map(Path::new))?;
    let aliases = load_combo_aliases(config.menu.aliases_path.as_deref().map(Path::new))?;

    let mut manager = DialogueManager::new(build_menu(config), rules, aliases, orders)?
        .with_max_segments(config.dialogue.max_segments)
        .with_llm_timeout(Duration::from_millis(config.llm.timeout_ms))
        .with_confidence_threshold(config.llm.confidence_threshold);

    if config.llm.enabled {
        let client = ChatClient::from_config(&config.llm)?;
        tracing::info!(
            "[Bootstrap] LLM collaborators enabled ({} at {})",
            client.model(),
            config.llm.base_url
        );
        manager = manager
            .with_llm_router(Arc::new(ChatLlmRouter::new(client.clone())))
            .with_llm_clarifier(Arc::new(ChatLlmClarifier::new(client)));
    }
    Ok(manager)
}

/// # Errors
///
/// Returns an error if a data file is malformed or the order store cannot
/// be opened.
pub async fn build_manager(config: &StallConfig) -> Result<DialogueManager> {
    let orders = build_order_repository(config).await?;
    build_manager_with(config, orders)
}
