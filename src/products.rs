//! Products

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::new_key_type;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Catalog-facing product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    /// Create a product identifier.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product identifier
    pub id: ProductId,

    /// Product description
    pub description: String,

    /// Unit price
    pub price: Money<'a, Currency>,

    /// Units in stock at load time; never decremented by a checkout
    pub quantity_in_stock: u32,

    /// Whether the product qualifies for the bulk (wholesale) discount
    pub wholesale: bool,
}

impl<'a> Product<'a> {
    /// Create a new product.
    pub fn new(
        id: u32,
        description: impl Into<String>,
        price: Money<'a, Currency>,
        quantity_in_stock: u32,
        wholesale: bool,
    ) -> Self {
        Self {
            id: ProductId::new(id),
            description: description.into(),
            price,
            quantity_in_stock,
            wholesale,
        }
    }
}
