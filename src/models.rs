use std::str::FromStr;

use sea_orm::prelude::Decimal;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{InventoryError, Result};

pub use crate::entities::inventory::Model as InventoryItem;

/// Largest accepted `|unit_price|` (10^12). Any `i32` quantity times this
/// stays well inside `Decimal` range, as do the f64 aggregates SQLite
/// hands back.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Validated field set for create and full update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub supplier: String,
    pub min_stock_level: i32,
    pub description: String,
}

/// Raw add/edit form as submitted. Every field arrives as text and is
/// coerced by [`ItemForm::validate`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ItemForm {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
    pub supplier: Option<String>,
    pub min_stock_level: Option<String>,
    pub description: Option<String>,
}

impl ItemForm {
    pub fn validate(&self) -> Result<NewItem> {
        let unit_price = coerce_decimal("unit_price", required("unit_price", &self.unit_price)?)?;
        if unit_price.abs() > MAX_UNIT_PRICE {
            return Err(InventoryError::validation(format!(
                "unit_price must not exceed {MAX_UNIT_PRICE} in magnitude"
            )));
        }

        Ok(NewItem {
            name: required("name", &self.name)?.to_string(),
            category: required("category", &self.category)?.to_string(),
            quantity: coerce_int("quantity", required("quantity", &self.quantity)?)?,
            unit_price,
            supplier: required("supplier", &self.supplier)?.to_string(),
            min_stock_level: coerce_int(
                "min_stock_level",
                required("min_stock_level", &self.min_stock_level)?,
            )?,
            description: self.description.clone().unwrap_or_default(),
        })
    }
}

fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| InventoryError::validation(format!("missing required field '{field}'")))
}

pub fn coerce_int(field: &str, raw: &str) -> Result<i32> {
    raw.trim().parse::<i32>().map_err(|_| {
        InventoryError::validation(format!("{field} must be an integer, got '{raw}'"))
    })
}

pub fn coerce_decimal(field: &str, raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| InventoryError::validation(format!("{field} must be a number, got '{raw}'")))
}

/// Coerces the `quantity` member of a quick-update body. Accepts JSON
/// integers, integer strings, and finite floats (truncated toward zero).
pub fn quantity_from_json(value: Option<&Value>) -> Result<i32> {
    let out_of_range = || InventoryError::validation("quantity is out of range");
    match value {
        None | Some(Value::Null) => Err(InventoryError::validation(
            "missing required field 'quantity'",
        )),
        Some(Value::String(raw)) => coerce_int("quantity", raw),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i32::try_from(i).map_err(|_| out_of_range())
            } else {
                match n.as_f64() {
                    Some(f) if (i32::MIN as f64..=i32::MAX as f64).contains(&f.trunc()) => {
                        Ok(f.trunc() as i32)
                    }
                    _ => Err(out_of_range()),
                }
            }
        }
        Some(other) => Err(InventoryError::validation(format!(
            "quantity must be an integer, got {other}"
        ))),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct InventoryStats {
    pub total_items: i64,
    pub total_quantity: i64,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_value: Decimal,
    pub low_stock_count: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct CategorySummary {
    pub category: String,
    pub item_count: i64,
    pub total_quantity: i64,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_value: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TopItem {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub unit_price: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_value: Decimal,
}

impl From<&InventoryItem> for TopItem {
    fn from(item: &InventoryItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_value: item.total_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> ItemForm {
        ItemForm {
            name: Some("Stapler".to_string()),
            category: Some("Stationery".to_string()),
            quantity: Some(" 35 ".to_string()),
            unit_price: Some("150.50".to_string()),
            supplier: Some("Kangaro".to_string()),
            min_stock_level: Some("15".to_string()),
            description: None,
        }
    }

    #[test]
    fn test_form_coercion() {
        let item = form().validate().unwrap();
        assert_eq!(item.quantity, 35);
        assert_eq!(item.unit_price, Decimal::new(15050, 2));
        assert_eq!(item.min_stock_level, 15);
        assert_eq!(item.description, "");
    }

    #[test]
    fn test_missing_field_is_validation_error() {
        let mut f = form();
        f.supplier = None;
        match f.validate() {
            Err(InventoryError::Validation(msg)) => assert!(msg.contains("supplier")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_uncoercible_numbers_are_rejected() {
        let mut f = form();
        f.quantity = Some("lots".to_string());
        assert!(matches!(f.validate(), Err(InventoryError::Validation(_))));

        let mut f = form();
        f.unit_price = Some("cheap".to_string());
        assert!(matches!(f.validate(), Err(InventoryError::Validation(_))));

        let mut f = form();
        f.min_stock_level = Some("2.5".to_string());
        assert!(matches!(f.validate(), Err(InventoryError::Validation(_))));
    }

    #[test]
    fn test_scientific_price() {
        assert_eq!(coerce_decimal("unit_price", "1e3").unwrap(), Decimal::from(1000));
    }

    #[test]
    fn test_quantity_from_json() {
        assert_eq!(quantity_from_json(Some(&json!(5))).unwrap(), 5);
        assert_eq!(quantity_from_json(Some(&json!("12"))).unwrap(), 12);
        assert_eq!(quantity_from_json(Some(&json!(7.9))).unwrap(), 7);
        assert!(quantity_from_json(None).is_err());
        assert!(quantity_from_json(Some(&json!("abc"))).is_err());
        assert!(quantity_from_json(Some(&json!(true))).is_err());
        assert!(quantity_from_json(Some(&json!(1e12))).is_err());
        assert!(quantity_from_json(Some(&json!(-1e12))).is_err());
        assert_eq!(
            quantity_from_json(Some(&json!(-2147483648.5))).unwrap(),
            i32::MIN
        );
        assert_eq!(
            quantity_from_json(Some(&json!(2147483647.9))).unwrap(),
            i32::MAX
        );
        assert!(quantity_from_json(Some(&json!(2147483648.0))).is_err());
    }

    #[test]
    fn test_price_magnitude_is_bounded() {
        let mut f = form();
        f.quantity = Some("1000000000".to_string());
        f.unit_price = Some("1e20".to_string());
        match f.validate() {
            Err(InventoryError::Validation(msg)) => assert!(msg.contains("unit_price")),
            other => panic!("expected validation error, got {other:?}"),
        }

        f.unit_price = Some("-1000000000001".to_string());
        assert!(matches!(f.validate(), Err(InventoryError::Validation(_))));

        f.unit_price = Some("1000000000000".to_string());
        assert_eq!(f.validate().unwrap().unit_price, MAX_UNIT_PRICE);
    }

    #[test]
    fn test_report_rows_serialize_money_as_numbers() {
        let row = CategorySummary {
            category: "Furniture".to_string(),
            item_count: 2,
            total_quantity: 3,
            total_value: Decimal::new(1234550, 2),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["total_value"], json!(12345.5));
    }
}
