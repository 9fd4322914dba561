//! In-memory order store

use tracing::info;

use crate::orders::{Order, OrderId, OrderStore, OrderStoreError};

/// Order store kept in process memory with a fixed number of slots.
///
/// Orders are lost when the process exits.
#[derive(Debug)]
pub struct MemoryOrderStore<'a> {
    orders: Vec<Order<'a>>,
    capacity: usize,
}

impl MemoryOrderStore<'_> {
    /// Number of slots used by [`MemoryOrderStore::default`].
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Create an empty store holding at most `capacity` orders.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: Vec::new(),
            capacity,
        }
    }

    /// Maximum number of orders the store can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for MemoryOrderStore<'_> {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl<'a> OrderStore<'a> for MemoryOrderStore<'a> {
    fn next_order_id(&self) -> Result<OrderId, OrderStoreError> {
        self.orders
            .last()
            .map_or(Some(OrderId::FIRST), |order| order.id().next())
            .ok_or(OrderStoreError::IdsExhausted)
    }

    fn append(&mut self, order: &Order<'a>) -> Result<(), OrderStoreError> {
        if self.orders.len() >= self.capacity {
            return Err(OrderStoreError::Full(self.capacity));
        }

        self.orders.push(order.clone());

        info!(order_id = %order.id(), stored = self.orders.len(), "stored order in memory");

        Ok(())
    }

    fn orders(&self) -> Result<Vec<Order<'a>>, OrderStoreError> {
        if self.orders.is_empty() {
            return Err(OrderStoreError::NoOrders);
        }

        Ok(self.orders.clone())
    }
}
