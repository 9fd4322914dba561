//! Orders

use std::{fmt, io, num::ParseIntError, str::FromStr};

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::Cart,
    errors::StoreError,
    payments::PaymentMethod,
    pricing::{TotalPriceError, format_amount, line_total},
    products::ProductId,
};

pub mod log;
pub mod memory;

pub use log::OrderLog;
pub use memory::MemoryOrderStore;

/// Errors raised by order stores.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// Nothing has been recorded yet.
    #[error("No orders found")]
    NoOrders,

    /// The store has no free slots.
    #[error("Order store is full ({0} orders)")]
    Full(usize),

    /// The highest possible order id has already been used.
    #[error("No order ids left")]
    IdsExhausted,

    /// Reading or writing the order log failed.
    #[error("Order log error: {0}")]
    Io(#[from] io::Error),
}

/// Order identifier, rendered as `ORD<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(u64);

impl OrderId {
    /// The id given to the first order in an empty store.
    pub const FIRST: OrderId = OrderId(1);

    /// Creates an order id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw sequence number.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id following this one, or `None` after the last possible id.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ORD{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = ParseIntError;

    /// Accepts `ORD<n>` and bare `<n>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix("ORD").unwrap_or(s);

        digits.parse().map(Self)
    }
}

/// One product line frozen into an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine<'a> {
    /// Product id at the time of checkout
    pub product_id: ProductId,

    /// Product name at the time of checkout
    pub name: String,

    /// Unit price at the time of checkout
    pub price: Money<'a, Currency>,

    /// Quantity purchased
    pub quantity: u32,
}

impl<'a> OrderLine<'a> {
    /// Price of the whole line.
    ///
    /// # Errors
    ///
    /// Returns [`TotalPriceError::Overflow`] if the line total does not fit in minor units.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        line_total(&self.price, self.quantity)
    }

    /// Tab-separated `id name price quantity` record, without a trailing newline.
    pub fn log_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.product_id,
            self.name,
            format_amount(&self.price),
            self.quantity
        )
    }
}

/// A completed order.
///
/// The total is fixed when the order is created and is never recalculated.
#[derive(Debug, Clone, PartialEq)]
pub struct Order<'a> {
    id: OrderId,
    payment: PaymentMethod,
    lines: Vec<OrderLine<'a>>,
    total: Money<'a, Currency>,
}

impl<'a> Order<'a> {
    /// Create an order from already-known parts.
    pub fn new(
        id: OrderId,
        payment: PaymentMethod,
        lines: Vec<OrderLine<'a>>,
        total: Money<'a, Currency>,
    ) -> Self {
        Self {
            id,
            payment,
            lines,
            total,
        }
    }

    /// Snapshot the current contents of `cart` into a new order.
    ///
    /// # Errors
    ///
    /// - [`StoreError::EmptyCart`]: The cart has no items.
    /// - [`StoreError::TotalOverflow`]: The total does not fit in minor units.
    pub fn from_cart(
        id: OrderId,
        payment: PaymentMethod,
        cart: &Cart<'a>,
    ) -> Result<Self, StoreError> {
        let total = cart.total()?;

        let lines = cart
            .iter()
            .map(|item| OrderLine {
                product_id: item.product().id,
                name: item.product().name.clone(),
                price: *item.price(),
                quantity: item.quantity(),
            })
            .collect();

        Ok(Self::new(id, payment, lines, total))
    }

    /// Order id
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Payment method used
    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }

    /// Purchased lines in cart order
    pub fn lines(&self) -> &[OrderLine<'a>] {
        &self.lines
    }

    /// Total amount charged
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }
}

/// Storage for completed orders.
pub trait OrderStore<'a>: fmt::Debug {
    /// The id the next appended order should carry.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError::IdsExhausted`] once the last possible id
    /// has been used.
    fn next_order_id(&self) -> Result<OrderId, OrderStoreError>;

    /// Record a completed order.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderStoreError`] if the order could not be stored.
    fn append(&mut self, order: &Order<'a>) -> Result<(), OrderStoreError>;

    /// All recorded orders in the order they were appended.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError::NoOrders`] if nothing has been recorded,
    /// or another [`OrderStoreError`] if the store could not be read.
    fn orders(&self) -> Result<Vec<Order<'a>>, OrderStoreError>;
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::products::Product;

    use super::*;

    #[test]
    fn order_id_renders_with_prefix() {
        assert_eq!(OrderId::new(7).to_string(), "ORD7");
    }

    #[test]
    fn order_id_parses_prefixed_and_bare() -> TestResult {
        assert_eq!("ORD1712345678".parse::<OrderId>()?, OrderId::new(1_712_345_678));
        assert_eq!("42".parse::<OrderId>()?, OrderId::new(42));
        assert!("ORDX".parse::<OrderId>().is_err());

        Ok(())
    }

    #[test]
    fn next_id_stops_at_the_last_id() {
        assert_eq!(OrderId::new(41).next(), Some(OrderId::new(42)));
        assert_eq!(OrderId::new(u64::MAX).next(), None);
    }

    #[test]
    fn from_cart_snapshots_lines_and_total() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_product(&Product::new(1, "Laptop", Money::from_minor(99_999, USD)), 1)?;
        cart.add_product(&Product::new(3, "Headphones", Money::from_minor(9_999, USD)), 2)?;

        let order = Order::from_cart(OrderId::FIRST, PaymentMethod::Card, &cart)?;

        cart.clear();

        assert_eq!(order.id(), OrderId::FIRST);
        assert_eq!(order.payment(), PaymentMethod::Card);
        assert_eq!(order.total(), Money::from_minor(119_997, USD));
        assert_eq!(order.lines().len(), 2);
        assert_eq!(
            order.lines().iter().map(OrderLine::log_line).collect::<Vec<_>>(),
            ["1\tLaptop\t999.99\t1", "3\tHeadphones\t99.99\t2"]
        );

        Ok(())
    }

    #[test]
    fn from_empty_cart_errors() {
        let cart = Cart::new(USD);

        assert!(matches!(
            Order::from_cart(OrderId::FIRST, PaymentMethod::Cash, &cart),
            Err(StoreError::EmptyCart)
        ));
    }
}
