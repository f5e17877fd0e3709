use crate::error::{InventoryError, Result};
use crate::models::{CategorySummary, InventoryItem, InventoryStats, NewItem, TopItem};
use crate::storage::{seed, InventoryStore};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use sea_orm::prelude::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

/// Process-local store with the same query semantics as the SQLite one.
/// Clones share the same rows.
#[derive(Clone, Default)]
pub struct MemoryStore {
    items: Arc<DashMap<i32, InventoryItem>>,
    last_id: Arc<AtomicI32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Vec<InventoryItem> {
        self.items.iter().map(|entry| entry.value().clone()).collect()
    }

    fn build(id: i32, item: &NewItem) -> InventoryItem {
        InventoryItem {
            id,
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            supplier: Some(item.supplier.clone()),
            min_stock_level: item.min_stock_level,
            description: Some(item.description.clone()),
            last_updated: Utc::now(),
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn initialize(&self) -> Result<usize> {
        if !self.items.is_empty() {
            return Ok(0);
        }
        let samples = seed::sample_items();
        for sample in &samples {
            self.insert(sample).await?;
        }
        Ok(samples.len())
    }

    async fn list_all(&self) -> Result<Vec<InventoryItem>> {
        let mut items = self.snapshot();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(items)
    }

    async fn stats(&self) -> Result<InventoryStats> {
        let items = self.snapshot();
        Ok(InventoryStats {
            total_items: items.len() as i64,
            total_quantity: items.iter().map(|i| i64::from(i.quantity)).sum(),
            total_value: items
                .iter()
                .map(InventoryItem::total_value)
                .fold(Decimal::ZERO, Decimal::saturating_add)
                .round_dp(2),
            low_stock_count: items.iter().filter(|i| i.is_low_stock()).count() as i64,
        })
    }

    async fn insert(&self, item: &NewItem) -> Result<InventoryItem> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let row = Self::build(id, item);
        self.items.insert(id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: i32) -> Result<Option<InventoryItem>> {
        Ok(self.items.get(&id).map(|item| item.clone()))
    }

    async fn update(&self, id: i32, item: &NewItem) -> Result<InventoryItem> {
        let mut entry = self.items.get_mut(&id).ok_or(InventoryError::NotFound(id))?;
        *entry = Self::build(id, item);
        Ok(entry.clone())
    }

    async fn update_quantity(&self, id: i32, quantity: i32) -> Result<InventoryItem> {
        let mut entry = self.items.get_mut(&id).ok_or(InventoryError::NotFound(id))?;
        entry.quantity = quantity;
        entry.last_updated = Utc::now();
        Ok(entry.clone())
    }

    async fn delete(&self, id: i32) -> Result<u64> {
        Ok(self.items.remove(&id).map_or(0, |_| 1))
    }

    async fn search(&self, query: &str, category: Option<&str>) -> Result<Vec<InventoryItem>> {
        let needle = query.to_lowercase();
        let mut items: Vec<_> = self
            .snapshot()
            .into_iter()
            .filter(|item| {
                let text_match = contains_ci(&item.name, &needle)
                    || item
                        .description
                        .as_deref()
                        .is_some_and(|d| contains_ci(d, &needle));
                match category {
                    Some(category) => item.category == category && text_match,
                    None => text_match || contains_ci(&item.category, &needle),
                }
            })
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn low_stock(&self) -> Result<Vec<InventoryItem>> {
        let mut items: Vec<_> = self
            .snapshot()
            .into_iter()
            .filter(InventoryItem::is_low_stock)
            .collect();
        items.sort_by(|a, b| a.quantity.cmp(&b.quantity).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn category_report(&self) -> Result<Vec<CategorySummary>> {
        let mut groups: BTreeMap<String, CategorySummary> = BTreeMap::new();
        for item in self.snapshot() {
            let summary = groups
                .entry(item.category.clone())
                .or_insert_with(|| CategorySummary {
                    category: item.category.clone(),
                    item_count: 0,
                    total_quantity: 0,
                    total_value: Decimal::ZERO,
                });
            summary.item_count += 1;
            summary.total_quantity += i64::from(item.quantity);
            summary.total_value = summary.total_value.saturating_add(item.total_value());
        }

        // BTreeMap yields categories in order, so the stable sort keeps
        // ties alphabetical.
        let mut rows: Vec<_> = groups
            .into_values()
            .map(|row| CategorySummary {
                total_value: row.total_value.round_dp(2),
                ..row
            })
            .collect();
        rows.sort_by(|a, b| b.total_value.cmp(&a.total_value));
        Ok(rows)
    }

    async fn top_items(&self, limit: u64) -> Result<Vec<TopItem>> {
        let mut items: Vec<_> = self.snapshot().iter().map(TopItem::from).collect();
        items.sort_by(|a, b| b.total_value.cmp(&a.total_value).then(a.id.cmp(&b.id)));
        items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(items)
    }

    async fn distinct_categories(&self) -> Result<Vec<String>> {
        let mut categories: Vec<_> = self.snapshot().into_iter().map(|i| i.category).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}
