//! The fee-handler collaborator capability and its no-op default.

use crate::asset::Asset;
use crate::context::Context;
use crate::order::Order;
use crate::value::Value;

/// Computes the net amount credited to a wallet after fees, for the maker
/// and taker sides of a fill (spec.md §4.E.5, §6).
///
/// Both methods receive the gross amount the order would otherwise be
/// credited (`gross_in`) and return the net amount actually credited.
/// The engine does not enforce `net_in <= gross_in`; a handler that
/// returns a larger or negative value is applied as-is (spec.md §9 —
/// fee handler results are not clamped).
pub trait FeeHandler<V: Value, W: Clone>: Send + Sync {
    /// Net amount credited to a maker's `asset` balance for a fill worth
    /// `gross_in` gross.
    fn handle_fee_maker(&self, ctx: &Context, order: &Order<V, W>, asset: Asset, gross_in: V)
    -> V;

    /// Net amount credited to a taker's `asset` balance for a fill worth
    /// `gross_in` gross.
    fn handle_fee_taker(&self, ctx: &Context, order: &Order<V, W>, asset: Asset, gross_in: V)
    -> V;
}

/// The default fee handler installed when a caller passes none: identity
/// on `gross_in` — no fees, no rebates (spec.md §4.F).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFeeHandler;

impl<V: Value, W: Clone + Send + Sync> FeeHandler<V, W> for NoopFeeHandler {
    fn handle_fee_maker(
        &self,
        _ctx: &Context,
        _order: &Order<V, W>,
        _asset: Asset,
        gross_in: V,
    ) -> V {
        gross_in
    }

    fn handle_fee_taker(
        &self,
        _ctx: &Context,
        _order: &Order<V, W>,
        _asset: Asset,
        gross_in: V,
    ) -> V {
        gross_in
    }
}
