//! Storefront
//!
//! The catalog, the cart and the order store for one session.

use thiserror::Error;
use tracing::info;

use crate::{
    cart::Cart,
    catalog::{Catalog, CatalogError},
    checkout::checkout,
    config::StoreConfig,
    errors::StoreError,
    orders::{MemoryOrderStore, Order, OrderLog, OrderStore, OrderStoreError},
    payments::PaymentMethod,
    products::Product,
};

/// Errors raised while building a storefront from configuration.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The catalog file could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The order log could not be opened.
    #[error(transparent)]
    OrderStore(#[from] OrderStoreError),
}

/// A shopping session: catalog, cart and order store.
#[derive(Debug)]
pub struct Storefront<'a> {
    catalog: Catalog<'a>,
    cart: Cart<'a>,
    store: Box<dyn OrderStore<'a> + 'a>,
}

impl<'a> Storefront<'a> {
    /// Create a storefront with an empty cart.
    pub fn new(catalog: Catalog<'a>, store: Box<dyn OrderStore<'a> + 'a>) -> Self {
        let cart = Cart::new(catalog.currency());

        Self {
            catalog,
            cart,
            store,
        }
    }

    /// The products on sale.
    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// Add `quantity` units of the product with the given raw id to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidId`] if the id is not in the catalog, or
    /// [`StoreError::CurrencyMismatch`] if the product is not priced in the
    /// cart's currency.
    pub fn add_to_cart(&mut self, id: i64, quantity: u32) -> Result<&Product<'a>, StoreError> {
        let product = self.catalog.find(id)?;

        self.cart.add_product(product, quantity)?;

        Ok(product)
    }

    /// Check out the cart with the given payment method.
    ///
    /// # Errors
    ///
    /// See [`checkout`].
    pub fn checkout(&mut self, payment: PaymentMethod) -> Result<Order<'a>, StoreError> {
        checkout(&mut self.cart, payment, self.store.as_mut())
    }

    /// All completed orders.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoOrders`] if nothing has been recorded, or
    /// [`StoreError::OrderStore`] if the store cannot be read.
    pub fn orders(&self) -> Result<Vec<Order<'a>>, StoreError> {
        Ok(self.store.orders()?)
    }
}

impl Storefront<'static> {
    /// Build a storefront from configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`StartupError`] if the catalog file or the order log cannot be read.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StartupError> {
        let catalog = match &config.catalog {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin(),
        };

        let store: Box<dyn OrderStore<'static>> = if config.ephemeral {
            Box::new(MemoryOrderStore::with_capacity(config.max_orders))
        } else {
            Box::new(OrderLog::open(&config.order_log, catalog.currency())?)
        };

        info!(
            products = catalog.len(),
            currency = catalog.currency().iso_alpha_code,
            ephemeral = config.ephemeral,
            "storefront ready"
        );

        Ok(Self::new(catalog, store))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use super::*;

    fn storefront() -> Storefront<'static> {
        Storefront::new(Catalog::builtin(), Box::new(MemoryOrderStore::default()))
    }

    #[test]
    fn add_to_cart_looks_up_catalog() -> TestResult {
        let mut shop = storefront();

        let product = shop.add_to_cart(3, 2)?;

        assert_eq!(product.name, "Headphones");
        assert_eq!(shop.cart().total()?, Money::from_minor(19_998, USD));

        Ok(())
    }

    #[test]
    fn add_unknown_id_leaves_cart_empty() {
        let mut shop = storefront();

        assert!(matches!(shop.add_to_cart(99, 1), Err(StoreError::InvalidId(99))));
        assert!(shop.cart().is_empty());
    }

    #[test]
    fn fresh_storefront_has_no_orders() {
        assert!(matches!(storefront().orders(), Err(StoreError::NoOrders)));
    }

    #[test]
    fn from_config_uses_memory_store_when_ephemeral() -> TestResult {
        let config = StoreConfig::try_parse_from(["storefront", "--ephemeral", "--max-orders", "1"])?;
        let mut shop = Storefront::from_config(&config)?;

        shop.add_to_cart(4, 1)?;
        shop.checkout(PaymentMethod::Cash)?;
        shop.add_to_cart(4, 1)?;

        assert!(matches!(
            shop.checkout(PaymentMethod::Cash),
            Err(StoreError::OrderStore(OrderStoreError::Full(1)))
        ));
        assert_eq!(shop.cart().len(), 1);

        Ok(())
    }
}
