//! Order repository implementations.
//!
//! - [`InMemoryOrderRepository`]: process-lifetime map, for tests and demos.
//! - [`JsonDirOrderRepository`]: one JSON file per order.
//!
//! Directory structure:
//! ```text
//! orders/
//! ├── 20260316083000-3f2a9c.json
//! └── 20260316084512-b81e07.json
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use stall_core::error::{Result, StallError};
use stall_core::order::{OrderFilter, OrderPayload, OrderRepository, StoredOrder};
use tokio::fs;
use tokio::sync::RwLock;

use crate::paths::StallPaths;

// ============================================================================
// In-memory
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<String, StoredOrder>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, payload: &OrderPayload, session_id: &str) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(
            payload.order_id.clone(),
            StoredOrder {
                session_id: session_id.to_string(),
                payload: payload.clone(),
            },
        );
        Ok(())
    }

    async fn get(&self, order_id: &str) -> Result<Option<StoredOrder>> {
        let orders = self.orders.read().await;
        Ok(orders.get(order_id).cloned())
    }

    async fn list(&self, filter: &OrderFilter) -> Result<Vec<StoredOrder>> {
        let orders = self.orders.read().await;
        Ok(filter.apply(orders.values().cloned().collect()))
    }
}

// ============================================================================
// JSON directory
// ============================================================================

/// Order ids become file names, so only a conservative character set passes.
fn validate_order_id(order_id: &str) -> Result<()> {
    let valid = !order_id.is_empty()
        && order_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StallError::data_access(format!(
            "invalid order id '{}'",
            order_id
        )))
    }
}

#[derive(Debug, Clone)]
pub struct JsonDirOrderRepository {
    dir: PathBuf,
}

impl JsonDirOrderRepository {
    /// Creates a repository at the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be resolved or created.
    pub async fn default() -> Result<Self> {
        Self::new(StallPaths::default().orders_dir()?).await
    }

    /// Creates a repository rooted at `dir`, creating it if needed.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StallError::io(format!("Failed to create order storage: {}", e)))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn order_path(&self, order_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", order_id))
    }

    async fn read_order(path: &Path) -> Result<StoredOrder> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait]
impl OrderRepository for JsonDirOrderRepository {
    async fn save(&self, payload: &OrderPayload, session_id: &str) -> Result<()> {
        validate_order_id(&payload.order_id)?;
        let record = StoredOrder {
            session_id: session_id.to_string(),
            payload: payload.clone(),
        };
        let json = serde_json::to_string_pretty(&record)?;

        // Write to a temporary file, then rename into place
        let path = self.order_path(&payload.order_id);
        let tmp_path = self.dir.join(format!(".{}.json.tmp", payload.order_id));
        fs::write(&tmp_path, json.as_bytes())
            .await
            .map_err(|e| StallError::data_access(format!("Failed to save order: {}", e)))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| StallError::data_access(format!("Failed to save order: {}", e)))?;

        tracing::info!(
            "[OrderRepository] Saved order {} for session {}",
            payload.order_id,
            session_id
        );
        Ok(())
    }

    async fn get(&self, order_id: &str) -> Result<Option<StoredOrder>> {
        validate_order_id(order_id)?;
        let path = self.order_path(order_id);
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }
        Self::read_order(&path).await.map(Some)
    }

    async fn list(&self, filter: &OrderFilter) -> Result<Vec<StoredOrder>> {
        let mut orders = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_order = path.extension().is_some_and(|ext| ext == "json")
                && !entry.file_name().to_string_lossy().starts_with('.');
            if !is_order {
                continue;
            }
            match Self::read_order(&path).await {
                Ok(order) => orders.push(order),
                Err(e) => {
                    tracing::warn!(
                        "[OrderRepository] Skipping unreadable order file {}: {}",
                        path.display(),
                        e
                    );
                }
            }
        }
        Ok(filter.apply(orders))
    }
}
