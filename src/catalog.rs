//! Catalog
//!
//! Read-only product lookup keyed by [`ProductId`].

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;

use crate::products::{Product, ProductId, ProductKey};

/// Errors raised by catalog construction and lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No product with this identifier exists.
    #[error("Product with ID {0} not found")]
    ProductNotFound(ProductId),

    /// Two products share an identifier.
    #[error("Duplicate product ID {0}")]
    DuplicateProduct(ProductId),

    /// A product is priced in a different currency from the catalog.
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),
}

/// In-memory product catalog.
#[derive(Debug)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    keys: FxHashMap<ProductId, ProductKey>,
    currency: &'a Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog denominated in `currency`.
    pub fn new(currency: &'a Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            keys: FxHashMap::default(),
            currency,
        }
    }

    /// Build a catalog from a list of products.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateProduct`]: two products share an identifier.
    /// - [`CatalogError::CurrencyMismatch`]: a product is not priced in `currency`.
    pub fn with_products(
        products: impl IntoIterator<Item = Product<'a>>,
        currency: &'a Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(currency);

        for product in products {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    fn insert(&mut self, product: Product<'a>) -> Result<(), CatalogError> {
        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                product.id,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if self.keys.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        let id = product.id;
        let key = self.products.insert(product);

        self.keys.insert(id, key);

        Ok(())
    }

    /// Look up a product by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] when no product has this identifier.
    pub fn lookup(&self, id: ProductId) -> Result<&Product<'a>, CatalogError> {
        self.keys
            .get(&id)
            .and_then(|key| self.products.get(*key))
            .ok_or(CatalogError::ProductNotFound(id))
    }

    /// Check whether a product exists.
    pub fn contains(&self, id: ProductId) -> bool {
        self.keys.contains_key(&id)
    }

    /// Iterate products in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.products.values()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency all prices are denominated in.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }
}
