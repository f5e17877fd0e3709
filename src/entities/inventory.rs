use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub supplier: Option<String>,
    pub min_stock_level: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub last_updated: DateTimeUtc,
}

impl Model {
    /// Stock value of this row: `quantity * unit_price`. Saturates at the
    /// `Decimal` bounds for rows written outside [`crate::models::ItemForm`]
    /// validation.
    pub fn total_value(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.unit_price)
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock_level
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        use chrono::Utc;
        Self {
            last_updated: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    // Every write, insert or update, stamps the row.
    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self.last_updated = Set(chrono::Utc::now());
        Ok(self)
    }
}
