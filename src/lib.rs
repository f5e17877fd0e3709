pub mod config;
pub mod entities;
pub mod error;
pub mod models;
pub mod notifications;
pub mod storage;
pub mod web;

pub use error::{InventoryError, Result};
pub use models::{CategorySummary, InventoryItem, InventoryStats, ItemForm, NewItem, TopItem};
pub use notifications::InventoryEvent;

use notifications::NotificationHub;
use serde_json::Value;
use storage::InventoryStore;
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

/// Rows returned by the top-items report when no limit is given.
pub const DEFAULT_TOP_ITEMS: u64 = 10;

/// Query/command service over an injected store. Holds no inventory
/// state of its own; every call is a single store round-trip followed by
/// a change notification for writes.
pub struct Inventory<S: InventoryStore> {
    store: S,
    notifications: NotificationHub,
}

impl<S: InventoryStore> Inventory<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            notifications: NotificationHub::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifications(&self) -> &NotificationHub {
        &self.notifications
    }

    pub fn subscribe(&self) -> BroadcastStream<InventoryEvent> {
        BroadcastStream::new(self.notifications.sender().subscribe())
    }

    fn publish(&self, event: InventoryEvent) {
        let _ = self.notifications.sender().send(event);
    }

    /// Ensures the schema and seeds an empty table.
    pub async fn initialize(&self) -> Result<usize> {
        self.store.initialize().await
    }

    pub async fn list_all(&self) -> Result<Vec<InventoryItem>> {
        self.store.list_all().await
    }

    pub async fn compute_stats(&self) -> Result<InventoryStats> {
        self.store.stats().await
    }

    pub async fn create(&self, form: &ItemForm) -> Result<InventoryItem> {
        let item = form.validate()?;
        let created = self.store.insert(&item).await?;
        debug!(id = created.id, name = %created.name, "created inventory item");
        self.publish(InventoryEvent::Created(created.clone()));
        Ok(created)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<InventoryItem> {
        self.store
            .get(id)
            .await?
            .ok_or(InventoryError::NotFound(id))
    }

    /// Overwrites every mutable field. Unknown ids are `NotFound`.
    pub async fn update(&self, id: i32, form: &ItemForm) -> Result<InventoryItem> {
        let item = form.validate()?;
        let updated = self.store.update(id, &item).await?;
        debug!(id, "updated inventory item");
        self.publish(InventoryEvent::Updated(updated.clone()));
        Ok(updated)
    }

    /// Sets only the quantity. `quantity` is the raw JSON value from the
    /// request and must coerce to an integer.
    pub async fn update_quantity(&self, id: i32, quantity: Option<&Value>) -> Result<InventoryItem> {
        let quantity = models::quantity_from_json(quantity)?;
        let updated = self.store.update_quantity(id, quantity).await?;
        debug!(id, quantity, "updated inventory quantity");
        self.publish(InventoryEvent::Updated(updated.clone()));
        Ok(updated)
    }

    /// Removes the row if present. Deleting an unknown id succeeds.
    pub async fn delete(&self, id: i32) -> Result<()> {
        let removed = self.store.delete(id).await?;
        debug!(id, removed, "deleted inventory item");
        self.publish(InventoryEvent::Deleted(id));
        Ok(())
    }

    /// An empty or absent category searches across categories too.
    pub async fn search(&self, query: &str, category: Option<&str>) -> Result<Vec<InventoryItem>> {
        let category = category.filter(|c| !c.is_empty());
        self.store.search(query, category).await
    }

    pub async fn low_stock(&self) -> Result<Vec<InventoryItem>> {
        self.store.low_stock().await
    }

    pub async fn category_report(&self) -> Result<Vec<CategorySummary>> {
        self.store.category_report().await
    }

    pub async fn top_items_report(&self, limit: u64) -> Result<Vec<TopItem>> {
        self.store.top_items(limit).await
    }

    pub async fn distinct_categories(&self) -> Result<Vec<String>> {
        self.store.distinct_categories().await
    }
}
