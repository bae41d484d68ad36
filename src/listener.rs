//! The event-listener collaborator capability and its no-op default.

use crate::asset::Asset;
use crate::order::Order;
use crate::value::Value;

/// The eight lifecycle notifications the engine emits (spec.md §6).
///
/// Every method has a no-op default so a listener only needs to
/// implement the notifications it cares about. [`NoopListener`]
/// implements none of them, relying entirely on the defaults, and is
/// substituted automatically for any mutating call made with no
/// listener (spec.md §4.E.4 step 1, §4.F).
///
/// Ordering across a single call is guaranteed by the engine (spec.md
/// §5): within one `PlaceOrder`, per-fill pairs emit `OnExistingOrder*`
/// before `OnIncomingOrder*`, fills are emitted in price-time match
/// order, and the trailing `OnIncomingOrderPlaced` (if any quantity
/// rests) follows the match loop.
pub trait EventListener<V: Value, W: Clone>: Send + Sync {
    /// The incoming (taker) order was partially filled and still has
    /// quantity remaining.
    fn on_incoming_order_partial(&self, _order: &Order<V, W>) {}

    /// The incoming (taker) order was fully filled.
    fn on_incoming_order_done(&self, _order: &Order<V, W>) {}

    /// The incoming order's unfilled remainder was placed on the book.
    fn on_incoming_order_placed(&self, _order: &Order<V, W>) {}

    /// A resting (maker) order was partially filled and still has
    /// quantity remaining on the book.
    fn on_existing_order_partial(&self, _order: &Order<V, W>) {}

    /// A resting (maker) order was fully filled and removed from the
    /// book.
    fn on_existing_order_done(&self, _order: &Order<V, W>) {}

    /// A resting order was removed from the book via `CancelOrder`.
    fn on_existing_order_canceled(&self, _order: &Order<V, W>) {}

    /// A wallet's free balance of `asset` changed to `new_balance`.
    fn on_balance_changed(&self, _wallet: &W, _asset: Asset, _new_balance: V) {}

    /// A wallet's in-order reserve of `asset` changed to
    /// `new_in_order`.
    fn on_in_order_changed(&self, _wallet: &W, _asset: Asset, _new_in_order: V) {}
}

/// The default listener installed when a caller passes none: every
/// notification is dropped (spec.md §4.F).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl<V: Value, W: Clone + Send + Sync> EventListener<V, W> for NoopListener {}
