//! The abstract numeric type the engine is generic over.

use std::fmt::Debug;
use std::hash::Hash;

/// A host-supplied numeric scalar used for prices, quantities, and money
/// amounts.
///
/// The engine never inspects the internal representation of a value; it
/// only ever adds, subtracts, multiplies, compares, and hashes it. Hosts
/// typically implement this for `rust_decimal::Decimal`, a fixed-point
/// integer type, or whatever precision their ledger already uses.
///
/// `Ord` and `Hash` double as the `Cmp`/`Hash()` capabilities of the
/// original design: since the concrete type already orders and hashes
/// itself cheaply, there is no need for the secondary string-hash lookup
/// the distilled design used as an equality cache (see spec §9).
pub trait Value: Clone + Eq + Ord + Hash + Debug + Send + Sync + 'static {
    /// The additive identity. Used as the starting accumulator for probes
    /// and as the "absent" value treated as zero by `sign`.
    fn zero() -> Self;

    /// `self + other`, returning a fresh value.
    fn add(&self, other: &Self) -> Self;

    /// `self - other`, returning a fresh value.
    fn sub(&self, other: &Self) -> Self;

    /// `self * other`, returning a fresh value.
    fn mul(&self, other: &Self) -> Self;

    /// -1, 0, or +1 depending on whether `self` is negative, zero, or
    /// positive relative to `Value::zero()`.
    fn sign(&self) -> i32 {
        match self.cmp(&Self::zero()) {
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => 0,
            std::cmp::Ordering::Greater => 1,
        }
    }

    /// Convenience: `sign() > 0`.
    fn is_positive(&self) -> bool {
        self.sign() > 0
    }

    /// Convenience: `sign() == 0`.
    fn is_zero(&self) -> bool {
        self.sign() == 0
    }
}
