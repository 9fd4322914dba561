//! Items

use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{TotalPriceError, format_amount, line_total},
    products::Product,
};

/// A product in the cart with the quantity requested.
#[derive(Clone, Debug, PartialEq)]
pub struct CartItem<'a> {
    product: Product<'a>,
    quantity: u32,
}

impl<'a> CartItem<'a> {
    /// Creates a new cart item. A zero quantity is stored as one.
    pub fn new(product: Product<'a>, quantity: u32) -> Self {
        Self {
            product,
            quantity: quantity.max(1),
        }
    }

    /// Returns the product of the item
    pub fn product(&self) -> &Product<'a> {
        &self.product
    }

    /// Returns the unit price of the item
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.product.price
    }

    /// Returns the quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Increase the quantity, saturating at `u32::MAX`.
    pub fn add_quantity(&mut self, quantity: u32) {
        self.quantity = self.quantity.saturating_add(quantity);
    }

    /// Price of the whole line (unit price × quantity).
    ///
    /// # Errors
    ///
    /// Returns [`TotalPriceError::Overflow`] if the line total does not fit in minor units.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        line_total(&self.product.price, self.quantity)
    }

    /// Tab-separated `id name price quantity` record, without a trailing newline.
    pub fn log_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.product.id,
            self.product.name,
            format_amount(&self.product.price),
            self.quantity
        )
    }
}
