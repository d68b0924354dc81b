//! Basket
//!
//! A requested basket maps product identifiers to quantities. Resolving it against a
//! [`Catalog`] validates every identifier and yields one [`LineItem`] per product.

use std::iter;

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    products::{Product, ProductId},
};

/// Errors related to basket construction or resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BasketError {
    /// A requested quantity was zero.
    #[error("Quantity {quantity} for product {product} must be positive")]
    InvalidQuantity {
        /// Product the quantity was requested for
        product: ProductId,
        /// Rejected quantity
        quantity: u32,
    },

    /// Merging repeated requests for a product overflowed.
    #[error("Quantity for product {0} overflowed")]
    QuantityOverflow(ProductId),

    /// A requested product is missing from the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A product and the quantity of it being bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    /// Product identifier
    pub product_id: ProductId,

    /// Units requested
    pub quantity: u32,
}

impl LineItem {
    /// Create a new line item.
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Requested basket, in the order products were first asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedBasket {
    lines: SmallVec<[LineItem; 8]>,
}

impl RequestedBasket {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a request from raw `(product id, quantity)` pairs.
    ///
    /// # Errors
    ///
    /// See [`RequestedBasket::add`].
    pub fn with_quantities(
        entries: impl IntoIterator<Item = (u32, u32)>,
    ) -> Result<Self, BasketError> {
        let mut basket = Self::new();

        for (product_id, quantity) in entries {
            basket.add(ProductId::new(product_id), quantity)?;
        }

        Ok(basket)
    }

    /// Request `quantity` more units of a product.
    ///
    /// Repeated products are merged into their first position.
    ///
    /// # Errors
    ///
    /// - [`BasketError::InvalidQuantity`]: `quantity` is zero.
    /// - [`BasketError::QuantityOverflow`]: the merged quantity does not fit in a `u32`.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) -> Result<&mut Self, BasketError> {
        if quantity == 0 {
            return Err(BasketError::InvalidQuantity {
                product: product_id,
                quantity,
            });
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or(BasketError::QuantityOverflow(product_id))?;
        } else {
            self.lines.push(LineItem::new(product_id, quantity));
        }

        Ok(self)
    }

    /// Requested quantity for a product, if any.
    pub fn quantity(&self, product_id: ProductId) -> Option<u32> {
        self.lines
            .iter()
            .find(|line| line.product_id == product_id)
            .map(|line| line.quantity)
    }

    /// Requested lines in order.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Number of distinct products requested.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A basket whose every product has been found in the catalog.
#[derive(Debug, Clone)]
pub struct ResolvedBasket<'c, 'a> {
    lines: Vec<(&'c Product<'a>, u32)>,
}

impl<'c, 'a> ResolvedBasket<'c, 'a> {
    /// Resolve a request against the catalog.
    ///
    /// Fails on the first unknown product; nothing is returned for the others.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::Catalog`] wrapping [`CatalogError::ProductNotFound`].
    pub fn resolve(
        requested: &RequestedBasket,
        catalog: &'c Catalog<'a>,
    ) -> Result<Self, BasketError> {
        let lines = requested
            .lines()
            .iter()
            .map(|line| {
                catalog
                    .lookup(line.product_id)
                    .map(|product| (product, line.quantity))
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        Ok(Self { lines })
    }

    /// Resolved products with their quantities, in request order.
    pub fn lines(&self) -> &[(&'c Product<'a>, u32)] {
        &self.lines
    }

    /// Aggregated line items for pricing.
    pub fn line_items(&self) -> Vec<LineItem> {
        self.lines
            .iter()
            .map(|(product, quantity)| LineItem::new(product.id, *quantity))
            .collect()
    }

    /// One entry per unit, for displays that list every unit separately.
    pub fn units(&self) -> impl Iterator<Item = &'c Product<'a>> + '_ {
        self.lines.iter().flat_map(|(product, quantity)| {
            iter::repeat_n(*product, usize::try_from(*quantity).unwrap_or(usize::MAX))
        })
    }

    /// Total number of units.
    pub fn unit_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|(_, quantity)| u64::from(*quantity))
            .sum()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use super::*;

    fn test_catalog<'a>() -> Result<Catalog<'a>, CatalogError> {
        Catalog::with_products(
            [
                Product::new(1, "Milk", Money::from_minor(107, GBP), 10, true),
                Product::new(2, "Cream 400g", Money::from_minor(271, GBP), 20, true),
                Product::new(3, "Yogurt 400g", Money::from_minor(210, GBP), 7, true),
            ],
            GBP,
        )
    }

    #[test]
    fn add_merges_repeated_products_in_first_position() -> TestResult {
        let basket = RequestedBasket::with_quantities([(3, 1), (2, 5), (3, 1)])?;

        assert_eq!(
            basket.lines(),
            &[
                LineItem::new(ProductId::new(3), 2),
                LineItem::new(ProductId::new(2), 5)
            ]
        );
        assert_eq!(basket.quantity(ProductId::new(3)), Some(2));
        assert_eq!(basket.quantity(ProductId::new(1)), None);

        Ok(())
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let result = RequestedBasket::with_quantities([(1, 0)]);

        assert_eq!(
            result,
            Err(BasketError::InvalidQuantity {
                product: ProductId::new(1),
                quantity: 0,
            })
        );
    }

    #[test]
    fn merged_quantity_overflow_is_rejected() {
        let result = RequestedBasket::with_quantities([(1, u32::MAX), (1, 1)]);

        assert_eq!(result, Err(BasketError::QuantityOverflow(ProductId::new(1))));
    }

    #[test]
    fn resolve_keeps_request_order() -> TestResult {
        let catalog = test_catalog()?;
        let requested = RequestedBasket::with_quantities([(2, 5), (1, 4)])?;

        let resolved = ResolvedBasket::resolve(&requested, &catalog)?;

        assert_eq!(resolved.len(), 2);
        assert_eq!(
            resolved.line_items(),
            vec![
                LineItem::new(ProductId::new(2), 5),
                LineItem::new(ProductId::new(1), 4)
            ]
        );

        Ok(())
    }

    #[test]
    fn resolve_fails_on_unknown_product() -> TestResult {
        let catalog = test_catalog()?;
        let requested = RequestedBasket::with_quantities([(1, 1), (42, 2)])?;

        let result = ResolvedBasket::resolve(&requested, &catalog);

        assert!(matches!(
            result,
            Err(BasketError::Catalog(CatalogError::ProductNotFound(id))) if id == ProductId::new(42)
        ));

        Ok(())
    }

    #[test]
    fn units_expand_each_quantity() -> TestResult {
        let catalog = test_catalog()?;
        let requested = RequestedBasket::with_quantities([(1, 2), (3, 1)])?;
        let resolved = ResolvedBasket::resolve(&requested, &catalog)?;

        let descriptions: Vec<&str> = resolved
            .units()
            .map(|product| product.description.as_str())
            .collect();

        assert_eq!(descriptions, vec!["Milk", "Milk", "Yogurt 400g"]);
        assert_eq!(resolved.unit_count(), 3);

        Ok(())
    }

    #[test]
    fn empty_request_resolves_to_empty_basket() -> TestResult {
        let catalog = test_catalog()?;

        let resolved = ResolvedBasket::resolve(&RequestedBasket::new(), &catalog)?;

        assert!(resolved.is_empty());

        Ok(())
    }
}
