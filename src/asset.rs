//! The two assets traded against each other by a single engine instance.

/// One of the two assets a trading pair is quoted in.
///
/// `Base` is the thing being sold in a sell order (e.g. the "apples" in an
/// apples/dollars market); `Quote` is the thing being paid (the
/// "dollars"). An `Engine` is created with one of each and never changes
/// them for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    /// The asset being bought and sold.
    Base,
    /// The asset prices are denominated in.
    Quote,
}
