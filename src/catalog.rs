//! Catalog
//!
//! The products on sale. The built-in catalog is used unless a YAML file is
//! supplied:
//!
//! ```yaml
//! products:
//!   - id: 1
//!     name: Laptop
//!     price: "999.99 USD"
//! ```

use std::{fs, path::Path};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashSet;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    errors::StoreError,
    products::{Product, ProductId},
};

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Product ids start at 1
    #[error("Product id must be at least 1")]
    ZeroId,

    /// The same id is used twice
    #[error("Duplicate product id: {0}")]
    DuplicateId(u32),

    /// Name contains a character the order log cannot store
    #[error("Product name may not contain tabs or newlines: {0:?}")]
    InvalidName(String),

    /// No products in the file
    #[error("Catalog has no products")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: Vec<ProductFixture>,
}

#[derive(Debug, Deserialize)]
struct ProductFixture {
    id: u32,
    name: String,
    price: String,
}

/// The fixed set of products available for purchase.
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    products: Vec<Product<'a>>,
    currency: &'static Currency,
}

impl Catalog<'static> {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        let products = [
            (1, "Laptop", 99_999),
            (2, "Smartphone", 59_999),
            (3, "Headphones", 9_999),
            (4, "Mouse", 1_999),
            (5, "Keyboard", 4_999),
        ]
        .into_iter()
        .map(|(id, name, minor)| Product::new(id, name, Money::from_minor(minor, USD)))
        .collect();

        Self {
            products,
            currency: USD,
        }
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML is malformed, a price cannot be
    /// read, currencies differ, an id is zero or repeated, a name contains a
    /// tab or newline, or there are no products.
    pub fn from_yaml(contents: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(contents)?;

        let mut currency: Option<&'static Currency> = None;
        let mut seen = FxHashSet::default();
        let mut products = Vec::with_capacity(fixture.products.len());

        for product in fixture.products {
            let (minor_units, product_currency) = parse_price(&product.price)?;

            match currency {
                Some(existing) if existing != product_currency => {
                    return Err(CatalogError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        product_currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => currency = Some(product_currency),
            }

            if product.id == 0 {
                return Err(CatalogError::ZeroId);
            }

            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }

            if product.name.contains(['\t', '\n', '\r']) {
                return Err(CatalogError::InvalidName(product.name));
            }

            products.push(Product::new(
                product.id,
                product.name,
                Money::from_minor(minor_units, product_currency),
            ));
        }

        let currency = currency.ok_or(CatalogError::Empty)?;

        Ok(Self {
            products,
            currency,
        })
    }
}

impl<'a> Catalog<'a> {
    /// Find a product by a raw id as typed by the customer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidId`] if no product has that id.
    pub fn find(&self, id: i64) -> Result<&Product<'a>, StoreError> {
        u32::try_from(id)
            .ok()
            .map(ProductId::new)
            .and_then(|id| self.get(id))
            .ok_or(StoreError::InvalidId(id))
    }

    /// Get a product by id.
    pub fn get(&self, id: ProductId) -> Option<&Product<'a>> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Iterate over products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.products.iter()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency all prices are in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), CatalogError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(CatalogError::UnknownCurrency(other.to_string())),
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(CatalogError::InvalidPrice(s.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn builtin_catalog_has_five_products() -> TestResult {
        let catalog = Catalog::builtin();

        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.currency(), USD);

        let laptop = catalog.find(1)?;

        assert_eq!(laptop.name, "Laptop");
        assert_eq!(laptop.price, Money::from_minor(99_999, USD));

        Ok(())
    }

    #[test]
    fn find_unknown_id_errors() {
        let catalog = Catalog::builtin();

        for id in [0, 6, -1, i64::MAX] {
            assert!(
                matches!(catalog.find(id), Err(StoreError::InvalidId(found)) if found == id),
                "id {id} should be rejected"
            );
        }
    }

    #[test]
    fn from_yaml_keeps_file_order() -> TestResult {
        let catalog = Catalog::from_yaml(
            r#"
products:
  - id: 7
    name: Webcam
    price: "39.50 GBP"
  - id: 2
    name: Monitor
    price: "149 GBP"
"#,
        )?;

        let names: Vec<&str> = catalog.iter().map(|product| product.name.as_str()).collect();

        assert_eq!(names, ["Webcam", "Monitor"]);
        assert_eq!(catalog.currency(), GBP);
        assert_eq!(
            catalog.get(ProductId::new(2)).map(|product| product.price),
            Some(Money::from_minor(14_900, GBP))
        );

        Ok(())
    }

    #[test]
    fn from_yaml_rejects_duplicate_ids() {
        let result = Catalog::from_yaml(
            r#"
products:
  - { id: 1, name: A, price: "1.00 USD" }
  - { id: 1, name: B, price: "2.00 USD" }
"#,
        );

        assert!(matches!(result, Err(CatalogError::DuplicateId(1))));
    }

    #[test]
    fn from_yaml_rejects_zero_id() {
        let result = Catalog::from_yaml(r#"products: [{ id: 0, name: A, price: "1.00 USD" }]"#);

        assert!(matches!(result, Err(CatalogError::ZeroId)));
    }

    #[test]
    fn from_yaml_rejects_tab_in_name() {
        let result =
            Catalog::from_yaml("products: [{ id: 1, name: \"Key\\tboard\", price: \"1.00 USD\" }]");

        assert!(matches!(result, Err(CatalogError::InvalidName(name)) if name == "Key\tboard"));
    }

    #[test]
    fn from_yaml_rejects_mixed_currencies() {
        let result = Catalog::from_yaml(
            r#"
products:
  - { id: 1, name: A, price: "1.00 USD" }
  - { id: 2, name: B, price: "1.00 EUR" }
"#,
        );

        assert!(
            matches!(result, Err(CatalogError::CurrencyMismatch(expected, found)) if expected == "USD" && found == "EUR")
        );
    }

    #[test]
    fn from_yaml_rejects_empty_catalog() {
        let result = Catalog::from_yaml("products: []");

        assert!(matches!(result, Err(CatalogError::Empty)));
    }

    #[test]
    fn load_reads_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("catalog.yml");
        fs::write(&path, "products: [{ id: 9, name: Cable, price: \"4.99 USD\" }]")?;

        let catalog = Catalog::load(&path)?;

        assert_eq!(catalog.find(9)?.name, "Cable");

        Ok(())
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99GBP");

        assert!(matches!(result, Err(CatalogError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(CatalogError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_rejects_negative_amount() {
        assert!(matches!(
            parse_price("-1.00 USD"),
            Err(CatalogError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parse_price_accepts_usd_and_eur() -> Result<(), CatalogError> {
        let (usd_minor, usd) = parse_price("1.00 USD")?;
        let (eur_minor, eur) = parse_price("2.50 EUR")?;

        assert_eq!(usd_minor, 100);
        assert_eq!(usd, USD);
        assert_eq!(eur_minor, 250);
        assert_eq!(eur, EUR);

        Ok(())
    }
}
