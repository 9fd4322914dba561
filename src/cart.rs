//! Cart

use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::{errors::StoreError, items::CartItem, pricing::total_price, products::Product};

/// Shopping cart.
///
/// Items keep the order in which their product was first added, and each
/// product appears at most once.
#[derive(Debug)]
pub struct Cart<'a> {
    items: Vec<CartItem<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create a new, empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Add `quantity` units of `product`.
    ///
    /// If the product is already in the cart its quantity is increased,
    /// otherwise a new line is appended.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CurrencyMismatch`] if the product is not priced
    /// in the cart's currency. The cart is left unchanged.
    pub fn add_product(&mut self, product: &Product<'a>, quantity: u32) -> Result<(), StoreError> {
        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(StoreError::CurrencyMismatch(
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product().id == product.id)
        {
            item.add_quantity(quantity);

            debug!(product_id = %product.id, quantity = item.quantity(), "merged cart line");

            return Ok(());
        }

        self.items.push(CartItem::new(product.clone(), quantity));

        debug!(product_id = %product.id, quantity, "added cart line");

        Ok(())
    }

    /// Calculate the total of the cart.
    ///
    /// # Errors
    ///
    /// - [`StoreError::EmptyCart`]: The cart has no items.
    /// - [`StoreError::TotalOverflow`]: The total does not fit in minor units.
    pub fn total(&self) -> Result<Money<'a, Currency>, StoreError> {
        let total = total_price(self.items.iter().map(|item| (item.price(), item.quantity())))?;

        Ok(total)
    }

    /// Remove every item from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get the number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the cart items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem<'a>> {
        self.items.iter()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Cart contents as order log item records, one newline-terminated line per item.
    pub fn contents(&self) -> String {
        self.items.iter().fold(String::new(), |mut acc, item| {
            acc.push_str(&item.log_line());
            acc.push('\n');
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    fn product<'a>(id: u32, name: &str, minor: i64) -> Product<'a> {
        Product::new(id, name, Money::from_minor(minor, USD))
    }

    #[test]
    fn new_cart_is_empty() {
        let cart = Cart::new(USD);

        assert!(cart.is_empty());
        assert_eq!(cart.len(), 0);
        assert_eq!(cart.currency(), USD);
    }

    #[test]
    fn adding_same_product_merges_quantities() -> TestResult {
        let mut cart = Cart::new(USD);
        let mouse = product(4, "Mouse", 1_999);

        cart.add_product(&mouse, 2)?;
        cart.add_product(&mouse, 3)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.iter().map(CartItem::quantity).collect::<Vec<_>>(), [5]);

        Ok(())
    }

    #[test]
    fn items_keep_first_add_order() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_product(&product(5, "Keyboard", 4_999), 1)?;
        cart.add_product(&product(1, "Laptop", 99_999), 1)?;
        cart.add_product(&product(5, "Keyboard", 4_999), 1)?;

        let ids: Vec<u32> = cart.iter().map(|item| item.product().id.get()).collect();

        assert_eq!(ids, [5, 1]);

        Ok(())
    }

    #[test]
    fn adding_product_in_other_currency_errors() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_product(&product(1, "Laptop", 99_999), 1)?;

        let tea = Product::new(2, "Tea", Money::from_minor(1_000, GBP));

        assert!(matches!(
            cart.add_product(&tea, 1),
            Err(StoreError::CurrencyMismatch("GBP", "USD"))
        ));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total()?, Money::from_minor(99_999, USD));

        Ok(())
    }

    #[test]
    fn first_product_must_match_cart_currency() {
        let mut cart = Cart::new(USD);
        let tea = Product::new(2, "Tea", Money::from_minor(1_000, GBP));

        assert!(matches!(
            cart.add_product(&tea, 1),
            Err(StoreError::CurrencyMismatch("GBP", "USD"))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn total_sums_line_totals() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_product(&product(1, "Ten", 1_000), 2)?;
        cart.add_product(&product(2, "Five", 500), 3)?;

        assert_eq!(cart.total()?, Money::from_minor(3_500, USD));

        Ok(())
    }

    #[test]
    fn total_of_empty_cart_errors_without_mutation() {
        let cart = Cart::new(USD);

        assert!(matches!(cart.total(), Err(StoreError::EmptyCart)));
        assert!(cart.is_empty());
    }

    #[test]
    fn clear_empties_the_cart() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_product(&product(1, "Laptop", 99_999), 1)?;
        cart.clear();

        assert!(cart.is_empty());
        assert!(matches!(cart.total(), Err(StoreError::EmptyCart)));

        Ok(())
    }

    #[test]
    fn contents_lists_log_records() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_product(&product(1, "Laptop", 99_999), 1)?;
        cart.add_product(&product(3, "Headphones", 9_999), 2)?;

        assert_eq!(
            cart.contents(),
            "1\tLaptop\t999.99\t1\n3\tHeadphones\t99.99\t2\n"
        );

        Ok(())
    }

    #[test]
    fn contents_of_empty_cart_is_empty() {
        assert_eq!(Cart::new(USD).contents(), "");
    }
}
