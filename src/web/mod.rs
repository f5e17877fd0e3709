use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::storage::InventoryStore;
use crate::Inventory;

pub mod errors;
pub mod handlers;
pub mod views;

pub fn router<S: InventoryStore + 'static>(inventory: Arc<Inventory<S>>) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard::<S>))
        .route("/add", get(handlers::add_form).post(handlers::add_item::<S>))
        .route(
            "/edit/:id",
            get(handlers::edit_form::<S>).post(handlers::edit_item::<S>),
        )
        .route("/delete/:id", post(handlers::delete_item::<S>))
        .route("/search", get(handlers::search::<S>))
        .route("/low-stock", get(handlers::low_stock::<S>))
        .route("/reports", get(handlers::reports::<S>))
        .route("/update-quantity/:id", post(handlers::update_quantity::<S>))
        .route("/api/categories", get(handlers::categories::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(inventory)
}

pub async fn serve<S: InventoryStore + 'static>(
    addr: SocketAddr,
    inventory: Arc<Inventory<S>>,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "inventory tracker listening");
    axum::serve(listener, router(inventory)).await?;
    Ok(())
}
