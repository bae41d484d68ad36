//! Orders and fills.

use crate::value::Value;

/// An order submitted to, or resting in, the engine.
///
/// The engine mutates only `quantity` (via [`Order::set_quantity`], used
/// internally by the match loop and by `ReplaceOrder`); `id`, `owner`,
/// `sell`, and `price` are immutable for the order's lifetime, matching
/// spec.md §3's invariant that the engine "never mutates id, owner, side,
/// or price."
///
/// `W` is the host's wallet handle type (typically `Arc<SomeWallet>` or a
/// small `Copy` id the host resolves through its own registry); the
/// engine only ever clones and compares it, never dereferences its
/// contents beyond the `Wallet` trait.
#[derive(Debug, Clone)]
pub struct Order<V: Value, W: Clone> {
    id: String,
    owner: W,
    sell: bool,
    price: V,
    quantity: V,
}

impl<V: Value, W: Clone> Order<V, W> {
    /// Builds a new order. `price` of `Value::zero()` marks a market
    /// order that matches at any price (spec.md §3).
    pub fn new(id: impl Into<String>, owner: W, sell: bool, price: V, quantity: V) -> Self {
        Self {
            id: id.into(),
            owner,
            sell,
            price,
            quantity,
        }
    }

    /// The order's stable id, unique within the engine's lifetime.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The wallet this order belongs to.
    pub fn owner(&self) -> &W {
        &self.owner
    }

    /// `true` for a sell (ask-side) order, `false` for a buy (bid-side)
    /// order.
    pub fn sell(&self) -> bool {
        self.sell
    }

    /// The order's limit price. Zero means "market: match at any price".
    pub fn price(&self) -> &V {
        &self.price
    }

    /// Whether `price().sign() == 0`, i.e. this is a market order.
    pub fn is_market(&self) -> bool {
        self.price.is_zero()
    }

    /// The order's remaining, unfilled quantity.
    pub fn quantity(&self) -> &V {
        &self.quantity
    }

    /// Overwrites the remaining quantity. Used by the match loop and by
    /// `ReplaceOrder`; never exposed as a way to mutate a resting order
    /// from outside the engine.
    pub(crate) fn set_quantity(&mut self, quantity: V) {
        self.quantity = quantity;
    }
}

/// One fill: the quantity executed and the quote-asset amount exchanged
/// for it, both at the maker's price (spec.md §3 Volume, §4.E.4 — "fill
/// price always equals the maker's price").
#[derive(Debug, Clone)]
pub struct Volume<V: Value> {
    /// `maker_price * executed_quantity`: the quote-asset amount
    /// exchanged for this fill.
    pub price: V,
    /// The base-asset quantity executed in this fill.
    pub quantity: V,
}

impl<V: Value> Volume<V> {
    pub(crate) fn new(price: V, quantity: V) -> Self {
        Self { price, quantity }
    }
}
