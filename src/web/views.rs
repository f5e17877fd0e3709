//! Bare HTML pages for the browser-facing routes. Layout and styling are
//! left to whoever fronts the service; these pages only carry the data.

use crate::models::{CategorySummary, InventoryItem, InventoryStats, TopItem};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n\
         <nav><a href=\"/\">Dashboard</a> | <a href=\"/add\">Add item</a> | <a href=\"/reports\">Reports</a></nav>\n\
         <h1>{title}</h1>\n{body}</body>\n</html>\n",
        title = escape(title),
    )
}

fn item_rows(items: &[InventoryItem], with_actions: bool) -> String {
    items
        .iter()
        .map(|item| {
            let actions = if with_actions {
                format!(
                    "<td><a href=\"/edit/{id}\">Edit</a> \
                     <form method=\"post\" action=\"/delete/{id}\"><button>Delete</button></form></td>",
                    id = item.id
                )
            } else {
                String::new()
            };
            format!(
                "<tr{class}><td>{id}</td><td>{name}</td><td>{category}</td><td>{quantity}</td>\
                 <td>{price:.2}</td><td>{value:.2}</td><td>{supplier}</td><td>{min}</td>{actions}</tr>\n",
                class = if item.is_low_stock() { " class=\"low-stock\"" } else { "" },
                id = item.id,
                name = escape(&item.name),
                category = escape(&item.category),
                quantity = item.quantity,
                price = item.unit_price,
                value = item.total_value(),
                supplier = escape(item.supplier.as_deref().unwrap_or("")),
                min = item.min_stock_level,
            )
        })
        .collect()
}

fn item_table(items: &[InventoryItem], with_actions: bool) -> String {
    format!(
        "<table>\n<tr><th>ID</th><th>Name</th><th>Category</th><th>Quantity</th><th>Unit price</th>\
         <th>Total value</th><th>Supplier</th><th>Min stock</th>{actions}</tr>\n{rows}</table>\n",
        actions = if with_actions { "<th></th>" } else { "" },
        rows = item_rows(items, with_actions),
    )
}

pub fn dashboard(items: &[InventoryItem], stats: &InventoryStats) -> String {
    let body = format!(
        "<ul>\n<li>Total items: {}</li>\n<li>Total quantity: {}</li>\n\
         <li>Total value: {:.2}</li>\n<li>Low stock: {}</li>\n</ul>\n{}",
        stats.total_items,
        stats.total_quantity,
        stats.total_value,
        stats.low_stock_count,
        item_table(items, true),
    );
    page("Inventory", &body)
}

/// Add form when `item` is `None`, edit form prefilled from `item` otherwise.
pub fn item_form(item: Option<&InventoryItem>) -> String {
    let action = item.map_or_else(|| "/add".to_string(), |i| format!("/edit/{}", i.id));
    let text = |f: fn(&InventoryItem) -> String| item.map(f).map(|v| escape(&v)).unwrap_or_default();

    let fields = [
        ("name", "Name", text(|i| i.name.clone())),
        ("category", "Category", text(|i| i.category.clone())),
        ("quantity", "Quantity", text(|i| i.quantity.to_string())),
        ("unit_price", "Unit price", text(|i| i.unit_price.to_string())),
        ("supplier", "Supplier", text(|i| i.supplier.clone().unwrap_or_default())),
        (
            "min_stock_level",
            "Minimum stock level",
            item.map_or_else(|| "10".to_string(), |i| i.min_stock_level.to_string()),
        ),
    ];

    let inputs: String = fields
        .iter()
        .map(|(name, label, value)| {
            format!("<label>{label} <input name=\"{name}\" value=\"{value}\" required></label><br>\n")
        })
        .collect();
    let body = format!(
        "<form method=\"post\" action=\"{action}\">\n{inputs}\
         <label>Description <textarea name=\"description\">{description}</textarea></label><br>\n\
         <button type=\"submit\">Save</button>\n</form>\n",
        description = text(|i| i.description.clone().unwrap_or_default()),
    );

    let title = if item.is_some() { "Edit item" } else { "Add item" };
    page(title, &body)
}

pub fn reports(
    categories: &[CategorySummary],
    top_items: &[TopItem],
    low_stock: &[InventoryItem],
) -> String {
    let category_rows: String = categories
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>\n",
                escape(&row.category),
                row.item_count,
                row.total_quantity,
                row.total_value,
            )
        })
        .collect();
    let top_rows: String = top_items
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td></tr>\n",
                escape(&row.name),
                escape(&row.category),
                row.quantity,
                row.unit_price,
                row.total_value,
            )
        })
        .collect();

    let body = format!(
        "<h2>By category</h2>\n<table>\n\
         <tr><th>Category</th><th>Items</th><th>Quantity</th><th>Total value</th></tr>\n\
         {category_rows}</table>\n<h2>Top items by value</h2>\n<table>\n\
         <tr><th>Name</th><th>Category</th><th>Quantity</th><th>Unit price</th><th>Total value</th></tr>\n\
         {top_rows}</table>\n<h2>Low stock</h2>\n{low}",
        low = item_table(low_stock, false),
    );

    page("Reports", &body)
}
