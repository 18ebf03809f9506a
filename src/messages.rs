//! Data carried through one pass of the viewer pipeline, from the raw websocket payload
//! to the text frame handed to the viewer.

use std::fmt;

use rust_decimal::Decimal;

/// An opaque payload received from the exchange stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage(Vec<u8>);

impl RawMessage {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for RawMessage {
    fn from(text: String) -> Self {
        Self(text.into_bytes())
    }
}

impl From<&str> for RawMessage {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

/// Side of the order book.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Bids,
    Asks,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bids => f.write_str("bids"),
            Side::Asks => f.write_str("asks"),
        }
    }
}

/// A single price level. Both fields are non-negative once decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceLevel {
    pub price: Decimal,
    pub amount: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal, amount: Decimal) -> Self {
        Self { price, amount }
    }

    /// Monetary size of the level, `None` if it does not fit in a [Decimal].
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_mul(self.amount)
    }
}

/// A snapshot of the best levels of an order book, in the order the exchange sent them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrderbookSnapshot {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

/// The top-<depth> levels of each side, best price first.
/// Each side holds at most <depth> levels, fewer if the snapshot was shallower.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DepthWindow {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl DepthWindow {
    /// Number of table rows needed to show both sides.
    pub fn rows(&self) -> usize {
        self.bids.len().max(self.asks.len())
    }
}

/// Running sums over one side of a [DepthWindow].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SideAggregate {
    pub price_sum: Decimal,
    pub amount_sum: Decimal,
    pub notional_sum: Decimal,
}

/// The formatted table for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame(String);

impl RenderedFrame {
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
