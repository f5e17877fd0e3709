use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::InventoryError;
use crate::models::ItemForm;
use crate::storage::InventoryStore;
use crate::web::{errors, views};
use crate::{Inventory, DEFAULT_TOP_ITEMS};

type Shared<S> = State<Arc<Inventory<S>>>;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub category: Option<String>,
}

pub async fn dashboard<S: InventoryStore>(State(inventory): Shared<S>) -> Response {
    let items = match inventory.list_all().await {
        Ok(items) => items,
        Err(e) => return errors::query_failure(e),
    };
    let stats = match inventory.compute_stats().await {
        Ok(stats) => stats,
        Err(e) => return errors::query_failure(e),
    };
    Html(views::dashboard(&items, &stats)).into_response()
}

pub async fn add_form() -> Html<String> {
    Html(views::item_form(None))
}

pub async fn add_item<S: InventoryStore>(
    State(inventory): Shared<S>,
    Form(form): Form<ItemForm>,
) -> Response {
    match inventory.create(&form).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => errors::form_failure(e),
    }
}

pub async fn edit_form<S: InventoryStore>(
    State(inventory): Shared<S>,
    Path(id): Path<i32>,
) -> Response {
    match inventory.get_by_id(id).await {
        Ok(item) => Html(views::item_form(Some(&item))).into_response(),
        Err(InventoryError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, "Item not found").into_response()
        }
        Err(e) => errors::query_failure(e),
    }
}

pub async fn edit_item<S: InventoryStore>(
    State(inventory): Shared<S>,
    Path(id): Path<i32>,
    Form(form): Form<ItemForm>,
) -> Response {
    match inventory.update(id, &form).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => errors::form_failure(e),
    }
}

pub async fn delete_item<S: InventoryStore>(
    State(inventory): Shared<S>,
    Path(id): Path<i32>,
) -> Response {
    match inventory.delete(id).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => errors::command_failure(e),
    }
}

pub async fn search<S: InventoryStore>(
    State(inventory): Shared<S>,
    Query(params): Query<SearchParams>,
) -> Response {
    match inventory
        .search(&params.q, params.category.as_deref())
        .await
    {
        Ok(items) => Json(items).into_response(),
        Err(e) => errors::query_failure(e),
    }
}

pub async fn low_stock<S: InventoryStore>(State(inventory): Shared<S>) -> Response {
    match inventory.low_stock().await {
        Ok(items) => Json(items).into_response(),
        Err(e) => errors::query_failure(e),
    }
}

pub async fn reports<S: InventoryStore>(State(inventory): Shared<S>) -> Response {
    let report = async {
        let categories = inventory.category_report().await?;
        let top_items = inventory.top_items_report(DEFAULT_TOP_ITEMS).await?;
        let low_stock = inventory.low_stock().await?;
        Ok::<_, InventoryError>(views::reports(&categories, &top_items, &low_stock))
    };
    match report.await {
        Ok(html) => Html(html).into_response(),
        Err(e) => errors::query_failure(e),
    }
}

pub async fn update_quantity<S: InventoryStore>(
    State(inventory): Shared<S>,
    Path(id): Path<i32>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            return errors::json_failure(StatusCode::BAD_REQUEST, rejection.body_text())
        }
    };
    match inventory.update_quantity(id, body.get("quantity")).await {
        Ok(_) => Json(json!({ "success": true })).into_response(),
        Err(e) => errors::command_failure(e),
    }
}

pub async fn categories<S: InventoryStore>(State(inventory): Shared<S>) -> Response {
    match inventory.distinct_categories().await {
        Ok(categories) => Json(categories).into_response(),
        Err(e) => errors::query_failure(e),
    }
}
