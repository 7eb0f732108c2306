//! Price list models

/// A single spot price reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricePoint {
    /// Epoch milliseconds parsed from the feed timestamp
    pub timestamp_millis: i64,
    /// Price with exactly two decimals, e.g. "8123.46"
    pub price: String,
}
