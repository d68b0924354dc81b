//! Checkout prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{BasketError, LineItem, RequestedBasket, ResolvedBasket},
    cards::{
        CardNumber, CardSource, DEFAULT_DISCOUNT_RATE, DiscountCard, DiscountCardRegistry,
        RegistryError,
    },
    catalog::{Catalog, CatalogError},
    checkout::{CheckoutError, checkout},
    discounts::{AppliedDiscount, DiscountError, DiscountKind, WHOLESALE_RATE, WHOLESALE_THRESHOLD},
    loaders::{LoaderError, currency_from_code, load_catalog, load_registry},
    pricing::{LineResult, PricedBasket, PricingError, ReceiptTotals, price},
    products::{Product, ProductId, ProductKey},
    receipt::{Receipt, ReceiptError},
};
