//! Discount Cards
//!
//! Loyalty cards and the registry they are looked up in. Unknown card numbers are not an
//! error: the customer gets a card with [`DEFAULT_DISCOUNT_RATE`] instead.

use std::fmt;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::discounts::to_scale_2;

/// Rate given to card numbers that are not in the registry (2.00%).
pub const DEFAULT_DISCOUNT_RATE: Decimal = Decimal::from_parts(200, 0, 0, false, 2);

/// Loyalty card number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct CardNumber(u32);

impl CardNumber {
    /// Create a card number.
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// Raw card number.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for CardNumber {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Where a discount card came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSource {
    /// Found in the registry.
    Registered,

    /// Synthesised for an unknown card number.
    Default,
}

/// A discount card with its rate in percentage points (e.g. `3.00` for 3%).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountCard {
    number: CardNumber,
    rate: Decimal,
    source: CardSource,
}

impl DiscountCard {
    /// Create a registered card. The rate is rounded half-up to two decimal places.
    pub fn new(number: u32, rate: Decimal) -> Self {
        Self {
            number: CardNumber::new(number),
            rate: to_scale_2(rate),
            source: CardSource::Registered,
        }
    }

    /// Create the fallback card for an unknown number.
    pub fn default_for(number: CardNumber) -> Self {
        Self {
            number,
            rate: DEFAULT_DISCOUNT_RATE,
            source: CardSource::Default,
        }
    }

    /// Card number.
    pub fn number(&self) -> CardNumber {
        self.number
    }

    /// Discount rate in percentage points.
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Where the card came from.
    pub fn source(&self) -> CardSource {
        self.source
    }

    /// Check if this card was synthesised rather than registered.
    pub fn is_default(&self) -> bool {
        self.source == CardSource::Default
    }
}

/// Errors raised while building a registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Two cards share a number.
    #[error("Duplicate discount card number {0}")]
    DuplicateCard(CardNumber),
}

/// Discount card registry.
#[derive(Debug, Default)]
pub struct DiscountCardRegistry {
    cards: FxHashMap<CardNumber, DiscountCard>,
}

impl DiscountCardRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of cards.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateCard`] if two cards share a number.
    pub fn with_cards(cards: impl IntoIterator<Item = DiscountCard>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();

        for card in cards {
            if registry.cards.insert(card.number, card).is_some() {
                return Err(RegistryError::DuplicateCard(card.number));
            }
        }

        Ok(registry)
    }

    /// Look up a card, falling back to a default-rate card for unknown numbers.
    ///
    /// The fallback card is not stored in the registry.
    pub fn lookup(&self, number: CardNumber) -> DiscountCard {
        if let Some(card) = self.find(number) {
            return card;
        }

        debug!(%number, rate = %DEFAULT_DISCOUNT_RATE, "unregistered card, applying default rate");

        DiscountCard::default_for(number)
    }

    /// Look up a registered card only.
    pub fn find(&self, number: CardNumber) -> Option<DiscountCard> {
        self.cards.get(&number).copied()
    }

    /// Number of registered cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
