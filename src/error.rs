//! The closed set of errors the engine can return.

/// Errors returned by the engine's mutating and pre-trade-validation
/// operations.
///
/// All of these are pre-match: once `PlaceOrder`'s match loop begins, no
/// error is possible, since every validation gate has already run and all
/// state mutation happens strictly after it (spec.md §7). `CancelOrder`
/// is infallible except for `OrderNotFound` on an unknown id (see
/// SPEC_FULL.md's resolution of the §9 open question), and `PushOrder` is
/// infallible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum EngineError {
    /// Quantity was absent, zero, or negative.
    #[error("invalid quantity")]
    InvalidQuantity,

    /// Price was absent or negative.
    #[error("invalid price")]
    InvalidPrice,

    /// A `ReplaceOrder` call referenced an order that doesn't match the
    /// resting one (owner, side, or price differs).
    #[error("invalid order")]
    InvalidOrder,

    /// A market order could not be fully priced/filled because the
    /// opposing side does not hold enough depth.
    #[error("insufficient quantity on the book")]
    InsufficientQuantity,

    /// The wallet does not hold enough free balance to place or replace
    /// the order.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// `PlaceOrder` was called with an id that is already resting in the
    /// book.
    #[error("order already exists")]
    OrderExists,

    /// The referenced order is not currently resting in the book.
    #[error("order not found")]
    OrderNotFound,
}
