use crate::error::Result;
use crate::models::{CategorySummary, InventoryItem, InventoryStats, NewItem, TopItem};
use async_trait::async_trait;

/// Persistence for the single `inventory` table.
///
/// Each method is one round-trip (a statement, or a short transaction for
/// seeding) and keeps no state between calls. Orderings are part of the
/// contract: backends must agree on them, including tie-breaks.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Creates the table if needed and seeds it when empty. Returns the
    /// number of rows seeded, so a second call on the same store yields 0.
    async fn initialize(&self) -> Result<usize>;

    /// All rows, newest id first.
    async fn list_all(&self) -> Result<Vec<InventoryItem>>;
    async fn stats(&self) -> Result<InventoryStats>;
    async fn insert(&self, item: &NewItem) -> Result<InventoryItem>;
    async fn get(&self, id: i32) -> Result<Option<InventoryItem>>;

    /// Overwrites every mutable column. `NotFound` when no row has `id`.
    async fn update(&self, id: i32, item: &NewItem) -> Result<InventoryItem>;
    async fn update_quantity(&self, id: i32, quantity: i32) -> Result<InventoryItem>;

    /// Returns the number of rows removed (0 or 1).
    async fn delete(&self, id: i32) -> Result<u64>;

    /// Case-insensitive substring search ordered by name. With a category,
    /// rows must be in that category and match on name or description;
    /// without one, name, description or category may match.
    async fn search(&self, query: &str, category: Option<&str>) -> Result<Vec<InventoryItem>>;

    /// Rows with `quantity <= min_stock_level`, lowest quantity first.
    async fn low_stock(&self) -> Result<Vec<InventoryItem>>;
    async fn category_report(&self) -> Result<Vec<CategorySummary>>;
    async fn top_items(&self, limit: u64) -> Result<Vec<TopItem>>;
    async fn distinct_categories(&self) -> Result<Vec<String>>;
}

pub mod memory;
pub mod seed;
pub mod sqlite;
