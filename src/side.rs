//! One side of the book: component C of the engine (spec.md §4.C).

use crate::order::Order;
use crate::queue::{Handle, PriceLevelQueue};
use crate::tree::OrderedMap;
use crate::value::Value;

/// Bids or asks: a collection of [`PriceLevelQueue`]s indexed by price.
///
/// spec.md §3 describes this as a hash map (`prices_by_hash`) paired with
/// an ordered index (`price_index`) over the *same* queues. Per the
/// simplification spec.md §9 explicitly licenses ("Hash can be replaced
/// by using the value directly as the key in an ordered map and dropping
/// the secondary hash-map lookup entirely"), this crate keeps a single
/// [`OrderedMap`] keyed directly by price: existence checks and
/// traversal both go through it, since `Value: Ord + Hash` makes the
/// tree's own O(log n) lookup as cheap as a second hash map would have
/// been over the original's string-hashed keys.
pub struct BookSide<V: Value, W: Clone> {
    levels: OrderedMap<V, PriceLevelQueue<V, W>>,
    num_orders: usize,
}

impl<V: Value, W: Clone> Default for BookSide<V, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Value, W: Clone> BookSide<V, W> {
    /// An empty side.
    pub fn new() -> Self {
        Self {
            levels: OrderedMap::new(),
            num_orders: 0,
        }
    }

    /// Number of distinct price levels currently resting.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Total number of resting orders across every level.
    pub fn num_orders(&self) -> usize {
        self.num_orders
    }

    /// Append `order` at its own price, creating the level if needed.
    /// Returns the queue handle for later O(1) removal.
    pub fn append(&mut self, order: Order<V, W>) -> Handle {
        let price = order.price().clone();
        if !self.levels.contains_key(&price) {
            self.levels.put(price.clone(), PriceLevelQueue::new(price.clone()));
        }
        let level = self
            .levels
            .get_mut(&price)
            .expect("level was just inserted");
        let handle = level.append(order);
        self.num_orders += 1;
        handle
    }

    /// Remove the order at `handle` resting at `price`. Deletes the
    /// level if it becomes empty.
    pub fn remove(&mut self, price: &V, handle: Handle) -> Order<V, W> {
        let level = self
            .levels
            .get_mut(price)
            .expect("remove called with a stale price");
        let order = level.remove(handle);
        if level.is_empty() {
            self.levels.remove(price);
        }
        self.num_orders -= 1;
        order
    }

    /// The highest resting price, if any.
    pub fn max_price(&self) -> Option<&V> {
        self.levels.max().map(|(p, _)| p)
    }

    /// The lowest resting price, if any.
    pub fn min_price(&self) -> Option<&V> {
        self.levels.min().map(|(p, _)| p)
    }

    /// The next level strictly above `price` (ceiling), used to advance
    /// the match walk on the ask side once the best level is exhausted.
    pub fn greater_than(&self, price: &V) -> Option<(&V, &PriceLevelQueue<V, W>)> {
        self.levels.ceiling(price)
    }

    /// The next level strictly below `price` (floor), used to advance
    /// the match walk on the bid side once the best level is exhausted.
    pub fn less_than(&self, price: &V) -> Option<(&V, &PriceLevelQueue<V, W>)> {
        self.levels.floor(price)
    }

    /// The queue resting at `price`, if any.
    pub fn level(&self, price: &V) -> Option<&PriceLevelQueue<V, W>> {
        self.levels.get(price)
    }

    /// A mutable reference to the queue resting at `price`, if any.
    pub fn level_mut(&mut self, price: &V) -> Option<&mut PriceLevelQueue<V, W>> {
        self.levels.get_mut(price)
    }

    /// Every level in ascending price order (low to high). For asks this
    /// is best-to-worst; for bids it is worst-to-best.
    pub fn levels_ascending(&self) -> impl Iterator<Item = (&V, &PriceLevelQueue<V, W>)> {
        self.levels.iter_ascending()
    }

    /// Every level in descending price order (high to low). For bids
    /// this is best-to-worst; for asks it is worst-to-best.
    pub fn levels_descending(&self) -> impl Iterator<Item = (&V, &PriceLevelQueue<V, W>)> {
        self.levels.iter_descending()
    }
}
