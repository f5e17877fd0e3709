//! Sample rows written into an empty inventory on first start.

use sea_orm::prelude::Decimal;

use crate::models::NewItem;

const SAMPLE_ITEMS: &[(&str, &str, i32, i64, &str, i32, &str)] = &[
    ("Laptop Dell XPS 15", "Electronics", 15, 85000, "Dell India", 5, "High-performance laptop for office use"),
    ("Wireless Mouse", "Electronics", 50, 500, "Logitech", 20, "Ergonomic wireless mouse"),
    ("Office Chair", "Furniture", 25, 5500, "Featherlite", 5, "Ergonomic office chair with lumbar support"),
    ("A4 Paper Ream", "Stationery", 100, 250, "JK Paper", 30, "500 sheets per ream"),
    ("Whiteboard Marker", "Stationery", 75, 50, "Camlin", 25, "Assorted colors"),
    ("USB Flash Drive 32GB", "Electronics", 40, 450, "SanDisk", 15, "High-speed USB 3.0"),
    ("Desktop Computer", "Electronics", 10, 45000, "HP", 3, "Intel i5, 8GB RAM, 512GB SSD"),
    ("Conference Table", "Furniture", 5, 25000, "Godrej", 2, "Large conference table for 10 people"),
    ("Printer Ink Cartridge", "Electronics", 30, 1200, "Canon", 10, "Black ink cartridge"),
    ("File Cabinet", "Furniture", 8, 8500, "Godrej", 3, "4-drawer steel file cabinet"),
    ("Notebook A5", "Stationery", 200, 60, "Classmate", 50, "200 pages ruled notebook"),
    ("Stapler", "Stationery", 35, 150, "Kangaro", 15, "Heavy-duty stapler"),
    ("LED Monitor 24\"", "Electronics", 20, 12000, "LG", 5, "Full HD LED monitor"),
    ("Keyboard", "Electronics", 30, 800, "Logitech", 10, "Wired USB keyboard"),
    ("Water Dispenser", "Appliances", 3, 15000, "Blue Star", 1, "Hot and cold water dispenser"),
];

pub fn sample_items() -> Vec<NewItem> {
    SAMPLE_ITEMS
        .iter()
        .map(
            |&(name, category, quantity, price, supplier, min_stock_level, description)| NewItem {
                name: name.to_string(),
                category: category.to_string(),
                quantity,
                unit_price: Decimal::from(price),
                supplier: supplier.to_string(),
                min_stock_level,
                description: description.to_string(),
            },
        )
        .collect()
}
