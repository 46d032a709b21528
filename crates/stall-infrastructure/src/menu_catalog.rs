//! JSON-backed menu catalog.
//!
//! The menu is a JSON array of `{category, name, price}` entries. It is read
//! on first access and served from memory afterwards. A failed load is not
//! cached, so the next call tries again.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use stall_core::error::{Result, StallError};
use stall_core::menu::{MenuCatalog, MenuItem, menu_entry_not_found};

/// Menu bundled with the binary.
pub const BUNDLED_MENU: &str = include_str!("../data/menu.json");

#[derive(Debug, Clone)]
enum MenuSource {
    Bundled,
    File(PathBuf),
    Inline(String),
}

#[derive(Debug)]
struct MenuIndex {
    items: Arc<Vec<MenuItem>>,
    prices: HashMap<String, HashMap<String, u32>>,
}

impl MenuIndex {
    fn build(items: Vec<MenuItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(StallError::menu_unavailable("menu has no entries"));
        }

        let mut prices: HashMap<String, HashMap<String, u32>> = HashMap::new();
        for item in &items {
            if item.name.trim().is_empty() || item.category.trim().is_empty() {
                return Err(StallError::menu_unavailable(format!(
                    "menu entry with empty name or category: {:?}",
                    item
                )));
            }
            prices
                .entry(item.category.clone())
                .or_default()
                .insert(item.name.clone(), item.price);
        }

        Ok(Self {
            items: Arc::new(items),
            prices,
        })
    }
}

/// Menu catalog reading a JSON menu once and caching it.
#[derive(Debug)]
pub struct JsonMenuCatalog {
    source: MenuSource,
    index: OnceCell<MenuIndex>,
}

impl JsonMenuCatalog {
    /// Catalog over the bundled menu.
    pub fn bundled() -> Self {
        Self::with_source(MenuSource::Bundled)
    }

    /// Catalog over a menu file.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::with_source(MenuSource::File(path.into()))
    }

    /// Catalog over an in-memory JSON document.
    pub fn from_json(json: impl Into<String>) -> Self {
        Self::with_source(MenuSource::Inline(json.into()))
    }

    fn with_source(source: MenuSource) -> Self {
        Self {
            source,
            index: OnceCell::new(),
        }
    }

    /// Drops the cached menu; the next lookup reloads it.
    pub fn clear_cache(&mut self) {
        self.index = OnceCell::new();
    }

    fn read_source(&self) -> Result<String> {
        match &self.source {
            MenuSource::Bundled => Ok(BUNDLED_MENU.to_string()),
            MenuSource::Inline(json) => Ok(json.clone()),
            MenuSource::File(path) => fs::read_to_string(path).map_err(|e| {
                StallError::menu_unavailable(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                ))
            }),
        }
    }

    fn load(&self) -> Result<MenuIndex> {
        let raw = self.read_source()?;
        let items: Vec<MenuItem> = serde_json::from_str(raw.trim_start_matches('\u{feff}'))
            .map_err(|e| StallError::menu_unavailable(format!("malformed menu: {}", e)))?;
        let index = MenuIndex::build(items)?;
        tracing::info!("[MenuCatalog] Loaded {} menu entries", index.items.len());
        Ok(index)
    }

    fn index(&self) -> Result<&MenuIndex> {
        self.index.get_or_try_init(|| {
            self.load().inspect_err(|e| {
                tracing::error!("[MenuCatalog] Menu load failed: {}", e);
            })
        })
    }
}

impl MenuCatalog for JsonMenuCatalog {
    fn get_price(&self, category: &str, name: &str) -> Result<u32> {
        self.index()?
            .prices
            .get(category)
            .and_then(|entries| entries.get(name))
            .copied()
            .ok_or_else(|| menu_entry_not_found(category, name))
    }

    fn get_all_items(&self) -> Result<Arc<Vec<MenuItem>>> {
        Ok(Arc::clone(&self.index()?.items))
    }
}
