//! The order-id lookup index: component D of the engine (spec.md §4.D).

use crate::queue::Handle;
use crate::value::Value;
use std::collections::HashMap;

/// Where an order currently rests: which side, at what price, and its
/// handle into that price's [`crate::queue::PriceLevelQueue`].
#[derive(Debug, Clone)]
pub(crate) struct Location<V: Value> {
    pub(crate) sell: bool,
    pub(crate) price: V,
    pub(crate) handle: Handle,
}

/// `order id -> location`, updated in lockstep with
/// [`crate::side::BookSide::append`]/`remove` so that
/// `lookup.keys() == asks.ids() ∪ bids.ids()` always holds (spec.md
/// §3/§4.D).
#[derive(Default)]
pub(crate) struct OrderLookup<V: Value> {
    by_id: HashMap<String, Location<V>>,
}

impl<V: Value> OrderLookup<V> {
    pub(crate) fn new() -> Self {
        Self {
            by_id: HashMap::new(),
        }
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Location<V>> {
        self.by_id.get(id)
    }

    pub(crate) fn insert(&mut self, id: String, location: Location<V>) {
        self.by_id.insert(id, location);
    }

    /// Removes `id` and returns its last known location, if any.
    pub(crate) fn remove(&mut self, id: &str) -> Option<Location<V>> {
        self.by_id.remove(id)
    }

    /// Rewires the lookup key from `old_id` to `new_id`, keeping the same
    /// location. Used by `ReplaceOrder` to preserve the FIFO node while
    /// swapping in the new order's id (spec.md §4.E.7).
    pub(crate) fn rekey(&mut self, old_id: &str, new_id: String, location: Location<V>) {
        self.by_id.remove(old_id);
        self.by_id.insert(new_id, location);
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }
}
