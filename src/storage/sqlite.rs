use crate::entities::inventory;
use crate::error::{InventoryError, Result};
use crate::models::{CategorySummary, InventoryItem, InventoryStats, NewItem, TopItem};
use crate::storage::{seed, InventoryStore};
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr, Order};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectOptions,
    ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
    TransactionTrait,
};
use tracing::{debug, info};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS inventory (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        quantity INTEGER NOT NULL,
        unit_price REAL NOT NULL,
        supplier TEXT,
        min_stock_level INTEGER NOT NULL DEFAULT 10,
        description TEXT,
        last_updated TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

const STATS: &str = r#"
    SELECT
        COUNT(*) AS total_items,
        COALESCE(SUM(quantity), 0) AS total_quantity,
        TOTAL(quantity * unit_price) AS total_value,
        COUNT(CASE WHEN quantity <= min_stock_level THEN 1 END) AS low_stock_count
    FROM inventory
"#;

const CATEGORY_REPORT: &str = r#"
    SELECT
        category,
        COUNT(*) AS item_count,
        COALESCE(SUM(quantity), 0) AS total_quantity,
        TOTAL(quantity * unit_price) AS total_value
    FROM inventory
    GROUP BY category
    ORDER BY total_value DESC, category ASC
"#;

/// SQLite-backed store. The connection handle is injected into the
/// service; each call checks a connection out of sqlx's pool for the
/// duration of its statement.
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        // Every connection to an in-memory database sees its own empty
        // database, so those must share a single connection.
        let max_connections = if is_in_memory(database_url) {
            1
        } else {
            max_connections.max(1)
        };

        let mut options = ConnectOptions::new(database_url.to_owned());
        options.max_connections(max_connections).sqlx_logging(false);
        let db = Database::connect(options).await?;

        Ok(Self { db })
    }

    pub fn acquire(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn create_schema(&self) -> Result<()> {
        self.db.execute_unprepared(CREATE_TABLE).await?;
        Ok(())
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn active_model(item: &NewItem) -> inventory::ActiveModel {
    inventory::ActiveModel {
        name: Set(item.name.clone()),
        category: Set(item.category.clone()),
        quantity: Set(item.quantity),
        unit_price: Set(item.unit_price),
        supplier: Set(Some(item.supplier.clone())),
        min_stock_level: Set(item.min_stock_level),
        description: Set(Some(item.description.clone())),
        ..inventory::ActiveModel::new()
    }
}

fn not_found_if_unmatched(err: DbErr, id: i32) -> InventoryError {
    match err {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => InventoryError::NotFound(id),
        other => InventoryError::Operation(other),
    }
}

/// `%query%` with the query's own `%`, `_` and `\\` matched literally.
fn substring_pattern(query: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('\\')
}

#[async_trait]
impl InventoryStore for SqliteStore {
    async fn initialize(&self) -> Result<usize> {
        self.create_schema().await?;

        let existing = inventory::Entity::find().count(&self.db).await?;
        if existing > 0 {
            debug!(existing, "inventory already populated, skipping seed");
            return Ok(0);
        }

        let samples = seed::sample_items();
        let txn = self.db.begin().await?;
        inventory::Entity::insert_many(samples.iter().map(active_model))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(rows = samples.len(), "seeded empty inventory with sample data");
        Ok(samples.len())
    }

    async fn list_all(&self) -> Result<Vec<InventoryItem>> {
        let items = inventory::Entity::find()
            .order_by_desc(inventory::Column::Id)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    async fn stats(&self) -> Result<InventoryStats> {
        let stats = InventoryStats::find_by_statement(Statement::from_string(
            DbBackend::Sqlite,
            STATS,
        ))
        .one(&self.db)
        .await?
        .unwrap_or_default();

        Ok(InventoryStats {
            total_value: stats.total_value.round_dp(2),
            ..stats
        })
    }

    async fn insert(&self, item: &NewItem) -> Result<InventoryItem> {
        let model = active_model(item).insert(&self.db).await?;
        Ok(model)
    }

    async fn get(&self, id: i32) -> Result<Option<InventoryItem>> {
        let item = inventory::Entity::find_by_id(id).one(&self.db).await?;
        Ok(item)
    }

    async fn update(&self, id: i32, item: &NewItem) -> Result<InventoryItem> {
        let mut model = active_model(item);
        model.id = Set(id);
        model
            .update(&self.db)
            .await
            .map_err(|e| not_found_if_unmatched(e, id))
    }

    async fn update_quantity(&self, id: i32, quantity: i32) -> Result<InventoryItem> {
        let model = inventory::ActiveModel {
            id: Set(id),
            quantity: Set(quantity),
            ..inventory::ActiveModel::new()
        };
        model
            .update(&self.db)
            .await
            .map_err(|e| not_found_if_unmatched(e, id))
    }

    async fn delete(&self, id: i32) -> Result<u64> {
        let result = inventory::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    async fn search(&self, query: &str, category: Option<&str>) -> Result<Vec<InventoryItem>> {
        let pattern = substring_pattern(query);
        let text_match = Condition::any()
            .add(inventory::Column::Name.like(pattern.clone()))
            .add(inventory::Column::Description.like(pattern.clone()));

        let condition = match category {
            Some(category) => Condition::all()
                .add(inventory::Column::Category.eq(category))
                .add(text_match),
            None => text_match.add(inventory::Column::Category.like(pattern)),
        };

        let items = inventory::Entity::find()
            .filter(condition)
            .order_by_asc(inventory::Column::Name)
            .order_by_asc(inventory::Column::Id)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    async fn low_stock(&self) -> Result<Vec<InventoryItem>> {
        let items = inventory::Entity::find()
            .filter(
                Expr::col(inventory::Column::Quantity)
                    .lte(Expr::col(inventory::Column::MinStockLevel)),
            )
            .order_by_asc(inventory::Column::Quantity)
            .order_by_asc(inventory::Column::Id)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    async fn category_report(&self) -> Result<Vec<CategorySummary>> {
        let rows = CategorySummary::find_by_statement(Statement::from_string(
            DbBackend::Sqlite,
            CATEGORY_REPORT,
        ))
        .all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CategorySummary {
                total_value: row.total_value.round_dp(2),
                ..row
            })
            .collect())
    }

    async fn top_items(&self, limit: u64) -> Result<Vec<TopItem>> {
        let items = inventory::Entity::find()
            .order_by(
                Expr::col(inventory::Column::Quantity)
                    .mul(Expr::col(inventory::Column::UnitPrice)),
                Order::Desc,
            )
            .order_by_asc(inventory::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(items.iter().map(TopItem::from).collect())
    }

    async fn distinct_categories(&self) -> Result<Vec<String>> {
        let categories = inventory::Entity::find()
            .select_only()
            .column(inventory::Column::Category)
            .distinct()
            .order_by_asc(inventory::Column::Category)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use sea_orm::prelude::Decimal;

    async fn setup_test_db() -> Result<SqliteStore> {
        let store = SqliteStore::connect("sqlite::memory:", 1).await?;
        store.create_schema().await?;
        Ok(store)
    }

    fn item(name: &str, category: &str, quantity: i32, price: i64, min: i32) -> NewItem {
        NewItem {
            name: name.to_string(),
            category: category.to_string(),
            quantity,
            unit_price: Decimal::from(price),
            supplier: "Acme".to_string(),
            min_stock_level: min,
            description: format!("{name} description"),
        }
    }

    #[tokio::test]
    async fn test_crud_operations() -> Result<()> {
        let store = setup_test_db().await?;

        let before = chrono::Utc::now();
        let created = store
            .insert(&item("Office Chair", "Furniture", 25, 5500, 5))
            .await?;
        assert!(created.last_updated >= before);

        let fetched = store.get(created.id).await?.expect("row exists");
        assert_eq!(fetched.name, "Office Chair");
        assert_eq!(fetched.unit_price, Decimal::from(5500));
        assert_eq!(fetched.supplier.as_deref(), Some("Acme"));

        let updated = store
            .update(created.id, &item("Office Chair v2", "Furniture", 20, 6000, 5))
            .await?;
        assert_eq!(updated.name, "Office Chair v2");
        assert!(updated.last_updated >= created.last_updated);

        assert_eq!(store.delete(created.id).await?, 1);
        assert_eq!(store.delete(created.id).await?, 0);
        assert!(store.get(created.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() -> Result<()> {
        let store = setup_test_db().await?;

        let err = store.update_quantity(999, 5).await.unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(999)));

        let err = store
            .update(999, &item("Ghost", "None", 1, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(999)));
        Ok(())
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() -> Result<()> {
        let store = setup_test_db().await?;
        let first = store.insert(&item("A", "X", 1, 1, 0)).await?;
        store.delete(first.id).await?;
        let second = store.insert(&item("B", "X", 1, 1, 0)).await?;
        assert!(second.id > first.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_schema_defaults_reorder_threshold() -> Result<()> {
        let store = setup_test_db().await?;
        store
            .acquire()
            .execute_unprepared(
                "INSERT INTO inventory (name, category, quantity, unit_price) \
                 VALUES ('Bare', 'Misc', 3, 1.5)",
            )
            .await?;

        let row = store.list_all().await?.pop().expect("inserted row");
        assert_eq!(row.min_stock_level, 10);
        assert!(row.supplier.is_none());
        assert!(row.is_low_stock());
        Ok(())
    }

    #[tokio::test]
    async fn test_stats_on_empty_table() -> Result<()> {
        let store = setup_test_db().await?;
        let stats = store.stats().await?;
        assert_eq!(stats, InventoryStats::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_category_report_ranks_by_value() -> Result<()> {
        let store = setup_test_db().await?;
        store.insert(&item("Mouse", "Electronics", 2, 500, 0)).await?;
        store.insert(&item("Monitor", "Electronics", 1, 2000, 0)).await?;
        store.insert(&item("Stool", "Furniture", 1, 500, 0)).await?;

        let report = store.category_report().await?;
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].category, "Electronics");
        assert_eq!(report[0].item_count, 2);
        assert_eq!(report[0].total_quantity, 3);
        assert_eq!(report[0].total_value, Decimal::from(3000));
        assert_eq!(report[1].category, "Furniture");
        assert_eq!(report[1].total_value, Decimal::from(500));
        Ok(())
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() -> Result<()> {
        let store = setup_test_db().await?;
        store.insert(&item("Wireless Mouse", "Electronics", 5, 500, 1)).await?;
        store.insert(&item("Office Chair", "Furniture", 5, 500, 1)).await?;

        let hits = store.search("MOUSE", None).await?;
        assert_eq!(hits.len(), 1);

        let hits = store.search("furn", None).await?;
        assert_eq!(hits[0].name, "Office Chair");

        // Category restricts, and the query no longer matches on category.
        let hits = store.search("furn", Some("Furniture")).await?;
        assert!(hits.is_empty());

        let hits = store.search("", Some("Electronics")).await?;
        assert_eq!(hits.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_low_stock_and_top_items() -> Result<()> {
        let store = setup_test_db().await?;
        store.insert(&item("Toner", "Electronics", 3, 100, 5)).await?;
        store.insert(&item("Paper", "Stationery", 10, 10, 10)).await?;
        store.insert(&item("Desk", "Furniture", 4, 9000, 1)).await?;

        let low: Vec<_> = store.low_stock().await?.into_iter().map(|i| i.name).collect();
        assert_eq!(low, vec!["Toner", "Paper"]);

        let top = store.top_items(2).await?;
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Desk");
        assert_eq!(top[0].total_value, Decimal::from(36000));
        assert_eq!(top[1].name, "Toner");
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_only_once() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("inventory.db").display());

        let store = SqliteStore::connect(&url, 2).await?;
        assert_eq!(store.initialize().await?, seed::sample_items().len());
        drop(store);

        // A restart against the same file must not duplicate rows.
        let store = SqliteStore::connect(&url, 2).await?;
        assert_eq!(store.initialize().await?, 0);
        assert_eq!(store.list_all().await?.len(), seed::sample_items().len());
        assert_eq!(
            store.distinct_categories().await?,
            vec!["Appliances", "Electronics", "Furniture", "Stationery"]
        );
        Ok(())
    }
}
