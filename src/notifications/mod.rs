use crate::models::InventoryItem;
use serde::Serialize;
use tokio::sync::broadcast::{self, Sender};

const CHANNEL_CAPACITY: usize = 100;

/// Write that just happened to the inventory table.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum InventoryEvent {
    Created(InventoryItem),
    Updated(InventoryItem),
    Deleted(i32),
}

pub struct NotificationHub {
    sender: Sender<InventoryEvent>,
}

impl NotificationHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn sender(&self) -> Sender<InventoryEvent> {
        self.sender.clone()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
