//! The wallet collaborator capability.

use crate::asset::Asset;
use crate::context::Context;
use crate::value::Value;

/// The balance/in-order ledger backing an order's owner.
///
/// The engine never stores balances itself; it only ever reads and
/// deltas them through this trait while its own lock is held (spec.md
/// §5). Implementations must be internally thread-safe if the same
/// wallet is shared across multiple engine instances, since the engine's
/// lock only serializes access from *this* engine.
///
/// An absent balance/in-order entry for an asset reads as `Value::zero()`
/// (spec.md §6).
///
/// `update_balance`/`update_in_order` apply a signed delta (the value
/// passed may be negative), matching every call site in spec.md §4.E.5
/// and §4.E.6, which always read as `wallet.Balance(asset) += value`.
///
/// `PartialEq` lets `ReplaceOrder` check that a replacement names the
/// same owner as the order it replaces (spec.md §4.E.7). `Send + Sync`
/// let `Engine<V, W>` itself be shared across threads behind an `Arc`.
pub trait Wallet<V: Value>: Clone + PartialEq + Send + Sync {
    /// The wallet's free (not reserved as collateral) balance of `asset`.
    fn balance(&self, ctx: &Context, asset: Asset) -> V;

    /// Apply `delta` to the wallet's free balance of `asset`.
    fn update_balance(&self, ctx: &Context, asset: Asset, delta: V);

    /// The portion of `asset` currently reserved as collateral for this
    /// wallet's resting orders.
    fn in_order(&self, ctx: &Context, asset: Asset) -> V;

    /// Apply `delta` to the wallet's in-order reserve of `asset`.
    fn update_in_order(&self, ctx: &Context, asset: Asset, delta: V);
}
