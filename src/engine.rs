//! The engine core: component E (the match loop, balance protocol, and
//! probes) wrapped in component G (the single-mutex concurrency shell).

use std::cmp::Ordering;
use std::sync::Mutex;

use crate::asset::Asset;
use crate::context::Context;
use crate::error::EngineError;
use crate::fees::{FeeHandler, NoopFeeHandler};
use crate::listener::{EventListener, NoopListener};
use crate::lookup::{Location, OrderLookup};
use crate::order::{Order, Volume};
use crate::side::BookSide;
use crate::value::Value;
use crate::wallet::Wallet;

fn negative<V: Value>(v: &V) -> V {
    V::zero().sub(v)
}

struct Inner<V: Value, W: Wallet<V>> {
    base_symbol: String,
    quote_symbol: String,
    asks: BookSide<V, W>,
    bids: BookSide<V, W>,
    lookup: OrderLookup<V>,
    fee_handler: Box<dyn FeeHandler<V, W>>,
}

/// A central-limit-order-book matching engine for a single trading pair.
///
/// `Engine` owns its book and order-id index exclusively; every public
/// method acquires the engine-wide lock for its full duration (spec.md
/// §5, component G), so `wallet`/`listener`/`fee_handler` callbacks run
/// with the lock held. Those callbacks must not re-enter the same
/// `Engine` instance — doing so deadlocks.
///
/// Generic over the host's numeric type `V` and wallet handle type `W`.
pub struct Engine<V: Value, W: Wallet<V>> {
    inner: Mutex<Inner<V, W>>,
}

/// `(best_ask, best_bid)`: either side may be absent (spec.md glossary,
/// "Spread").
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Spread<V: Value> {
    /// The lowest resting ask price, if any.
    pub best_ask: Option<V>,
    /// The highest resting bid price, if any.
    pub best_bid: Option<V>,
}

/// One price level's summary, as reported by [`Engine::order_book`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LevelInfo<V: Value> {
    /// Whether this level is on the ask side.
    pub is_ask: bool,
    /// The level's price.
    pub price: V,
    /// Sum of remaining quantity across orders resting at this level.
    pub volume: V,
    /// Number of orders resting at this level.
    pub count: usize,
}

impl<V: Value, W: Wallet<V>> Engine<V, W> {
    /// A new, empty engine for the pair `(base, quote)`, with no fee
    /// handler (fees are the identity function until
    /// [`Engine::set_fee_handler`] is called).
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self::with_fee_handler(base, quote, NoopFeeHandler)
    }

    /// A new, empty engine with a fee handler installed from the start.
    pub fn with_fee_handler(
        base: impl Into<String>,
        quote: impl Into<String>,
        fee_handler: impl FeeHandler<V, W> + 'static,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                base_symbol: base.into(),
                quote_symbol: quote.into(),
                asks: BookSide::new(),
                bids: BookSide::new(),
                lookup: OrderLookup::new(),
                fee_handler: Box::new(fee_handler),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<V, W>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the installed fee handler.
    pub fn set_fee_handler(&self, fee_handler: impl FeeHandler<V, W> + 'static) {
        self.lock().fee_handler = Box::new(fee_handler);
    }

    /// The base asset's display symbol, as passed to the constructor.
    pub fn base_symbol(&self) -> String {
        self.lock().base_symbol.clone()
    }

    /// The quote asset's display symbol, as passed to the constructor.
    pub fn quote_symbol(&self) -> String {
        self.lock().quote_symbol.clone()
    }

    // -- pre-trade validation (spec.md §4.E.1) -------------------------

    /// Validates that `wallet` can place an order of `(sell, quantity,
    /// price)` without mutating any state.
    pub fn can_place(
        &self,
        ctx: &Context,
        wallet: &W,
        sell: bool,
        quantity: &V,
        price: &V,
    ) -> Result<(), EngineError> {
        let inner = self.lock();
        inner.can_place_locked(ctx, wallet, sell, quantity, price)
    }

    // -- market-price probe (spec.md §4.E.2) ---------------------------

    /// The quote-asset cost (for a buy) or proceeds (for a sell) of
    /// immediately executing `quantity` against the opposing side of the
    /// book at the best available prices.
    ///
    /// Fails with [`EngineError::InsufficientQuantity`] if the opposing
    /// side does not hold enough depth.
    pub fn price(&self, sell: bool, quantity: &V) -> Result<V, EngineError> {
        self.lock().probe_price(sell, quantity)
    }

    // -- cumulative depth probe (spec.md §4.E.3) -----------------------

    /// Total resting quantity on the opposing side that is still
    /// executable at `price_limit` (`None` means "no limit — full
    /// depth").
    pub fn quantity(&self, sell: bool, price_limit: Option<&V>) -> V {
        self.lock().probe_quantity(sell, price_limit)
    }

    // -- PlaceOrder (spec.md §4.E.4) -----------------------------------

    /// Places `order`: matches it against the opposing side under
    /// price-time priority, settles every fill through `wallet`, and
    /// rests any unfilled remainder on the book.
    #[allow(clippy::too_many_arguments)]
    pub fn place_order(
        &self,
        ctx: &Context,
        listener: Option<&dyn EventListener<V, W>>,
        mut order: Order<V, W>,
    ) -> Result<(), EngineError> {
        let fallback = NoopListener;
        let listener: &dyn EventListener<V, W> = listener.unwrap_or(&fallback);
        let mut inner = self.lock();

        if inner.lookup.contains(order.id()) {
            return Err(EngineError::OrderExists);
        }
        inner.can_place_locked(ctx, order.owner(), order.sell(), order.quantity(), order.price())?;

        tracing::trace!(id = order.id(), sell = order.sell(), "placing order");
        inner.run_match_loop(ctx, listener, &mut order);

        if order.quantity().is_positive() {
            inner.rest(&order);
            listener.on_incoming_order_placed(&order);
            inner.update_balance_on_placed(ctx, listener, &order);
        }
        Ok(())
    }

    // -- CancelOrder (spec.md §4.E.6) ----------------------------------

    /// Removes a resting order and returns its reserved funds to the
    /// wallet's free balance.
    ///
    /// Returns `Err(EngineError::OrderNotFound)` for an unknown id; see
    /// SPEC_FULL.md for why this deviates from the literal "cancel never
    /// fails" wording of spec.md §4.E.6.
    pub fn cancel_order(
        &self,
        ctx: &Context,
        listener: Option<&dyn EventListener<V, W>>,
        id: &str,
    ) -> Result<(), EngineError> {
        let fallback = NoopListener;
        let listener: &dyn EventListener<V, W> = listener.unwrap_or(&fallback);
        let mut inner = self.lock();

        let location = inner.lookup.remove(id).ok_or(EngineError::OrderNotFound)?;
        let side = if location.sell {
            &mut inner.asks
        } else {
            &mut inner.bids
        };
        let order = side.remove(&location.price, location.handle);

        let (asset, value) = reserved_value(&order);
        let wallet = order.owner().clone();
        wallet.update_balance(ctx, asset, value.clone());
        listener.on_balance_changed(&wallet, asset, wallet.balance(ctx, asset));
        wallet.update_in_order(ctx, asset, negative(&value));
        listener.on_in_order_changed(&wallet, asset, wallet.in_order(ctx, asset));
        listener.on_existing_order_canceled(&order);
        tracing::trace!(id = order.id(), "canceled order");
        Ok(())
    }

    // -- ReplaceOrder (spec.md §4.E.7) ---------------------------------

    /// Replaces a resting order in place, preserving its time-priority
    /// position.
    pub fn replace_order(
        &self,
        ctx: &Context,
        listener: Option<&dyn EventListener<V, W>>,
        old_id: &str,
        new_order: Order<V, W>,
    ) -> Result<(), EngineError> {
        let fallback = NoopListener;
        let listener: &dyn EventListener<V, W> = listener.unwrap_or(&fallback);
        let mut inner = self.lock();
        inner.replace_order_locked(ctx, listener, old_id, new_order)
    }

    // -- PushOrder (spec.md §4.E.8) -------------------------------------

    /// Appends `order` directly to the appropriate side, with no
    /// matching, validation, or balance movement. Intended for warming a
    /// freshly constructed engine up from a snapshot.
    pub fn push_order(&self, order: Order<V, W>) {
        self.lock().rest(&order);
    }

    // -- introspection (spec.md §4.E.9) --------------------------------

    /// `(best_ask, best_bid)`.
    pub fn spread(&self) -> Spread<V> {
        let inner = self.lock();
        Spread {
            best_ask: inner.asks.min_price().cloned(),
            best_bid: inner.bids.max_price().cloned(),
        }
    }

    /// The resting order with `id`, if any.
    pub fn find_order(&self, id: &str) -> Option<Order<V, W>> {
        let inner = self.lock();
        let location = inner.lookup.get(id)?;
        let side = if location.sell { &inner.asks } else { &inner.bids };
        Some(side.level(&location.price)?.get(location.handle).clone())
    }

    /// Every resting order, in no particular cross-side order (asks
    /// worst-to-best, then bids worst-to-best; within a level, FIFO
    /// order).
    pub fn orders(&self) -> Vec<Order<V, W>> {
        let inner = self.lock();
        let mut out = Vec::with_capacity(inner.lookup.len());
        for (_, level) in inner.asks.levels_descending() {
            out.extend(level.iter().cloned());
        }
        for (_, level) in inner.bids.levels_ascending() {
            out.extend(level.iter().cloned());
        }
        out
    }

    /// Walks asks top-down (worst to best) then bids top-down (worst to
    /// best), calling `visit(is_ask, price, level_volume, level_count)`
    /// for each resting price level.
    pub fn order_book(&self, mut visit: impl FnMut(LevelInfo<V>)) {
        let inner = self.lock();
        for (price, level) in inner.asks.levels_descending() {
            visit(LevelInfo {
                is_ask: true,
                price: price.clone(),
                volume: level.volume().clone(),
                count: level.len(),
            });
        }
        for (price, level) in inner.bids.levels_ascending() {
            visit(LevelInfo {
                is_ask: false,
                price: price.clone(),
                volume: level.volume().clone(),
                count: level.len(),
            });
        }
    }
}

/// `(asset, value)` reserved in-order for a resting `order` (spec.md
/// §4.E.5's "placed" case): `quantity` for a sell, `price * quantity`
/// for a buy.
fn reserved_value<V: Value, W: Wallet<V>>(order: &Order<V, W>) -> (Asset, V) {
    if order.sell() {
        (Asset::Base, order.quantity().clone())
    } else {
        (Asset::Quote, order.price().mul(order.quantity()))
    }
}

impl<V: Value, W: Wallet<V>> Inner<V, W> {
    fn can_place_locked(
        &self,
        ctx: &Context,
        wallet: &W,
        sell: bool,
        quantity: &V,
        price: &V,
    ) -> Result<(), EngineError> {
        if quantity.sign() <= 0 {
            return Err(EngineError::InvalidQuantity);
        }
        if price.sign() < 0 {
            return Err(EngineError::InvalidPrice);
        }

        let market_price = if price.is_zero() {
            self.probe_price(sell, quantity)?
        } else {
            price.mul(quantity)
        };

        if sell {
            if wallet.balance(ctx, Asset::Base).cmp(quantity) == Ordering::Less {
                return Err(EngineError::InsufficientFunds);
            }
        } else if wallet.balance(ctx, Asset::Quote).cmp(&market_price) == Ordering::Less {
            return Err(EngineError::InsufficientFunds);
        }
        Ok(())
    }

    fn opposing_side(&self, sell: bool) -> &BookSide<V, W> {
        if sell { &self.bids } else { &self.asks }
    }

    fn opposing_side_mut(&mut self, sell: bool) -> &mut BookSide<V, W> {
        if sell { &mut self.bids } else { &mut self.asks }
    }

    fn probe_price(&self, sell: bool, quantity: &V) -> Result<V, EngineError> {
        let opposing = self.opposing_side(sell);
        let mut remaining = quantity.clone();
        let mut total = V::zero();
        let mut cursor = if sell {
            opposing.max_price().cloned()
        } else {
            opposing.min_price().cloned()
        };

        while remaining.is_positive() {
            let Some(price) = cursor else {
                return Err(EngineError::InsufficientQuantity);
            };
            let level = opposing
                .level(&price)
                .expect("cursor always names a resting level");
            if remaining.cmp(level.volume()) == Ordering::Less {
                total = total.add(&price.mul(&remaining));
                remaining = V::zero();
            } else {
                total = total.add(&price.mul(level.volume()));
                remaining = remaining.sub(level.volume());
                cursor = if sell {
                    opposing.less_than(&price).map(|(p, _)| p.clone())
                } else {
                    opposing.greater_than(&price).map(|(p, _)| p.clone())
                };
            }
        }
        Ok(total)
    }

    fn probe_quantity(&self, sell: bool, price_limit: Option<&V>) -> V {
        let opposing = self.opposing_side(sell);
        let mut total = V::zero();
        let mut cursor = if sell {
            opposing.max_price().cloned()
        } else {
            opposing.min_price().cloned()
        };

        while let Some(price) = cursor {
            let executable = match price_limit {
                None => true,
                Some(limit) => {
                    if sell {
                        price.cmp(limit) != Ordering::Less
                    } else {
                        price.cmp(limit) != Ordering::Greater
                    }
                }
            };
            if !executable {
                break;
            }
            let level = opposing
                .level(&price)
                .expect("cursor always names a resting level");
            total = total.add(level.volume());
            cursor = if sell {
                opposing.less_than(&price).map(|(p, _)| p.clone())
            } else {
                opposing.greater_than(&price).map(|(p, _)| p.clone())
            };
        }
        total
    }

    /// The side walk + queue walk of spec.md §4.E.4 step 4-5, mutating
    /// `order`'s quantity down to whatever could not be matched.
    fn run_match_loop(
        &mut self,
        ctx: &Context,
        listener: &dyn EventListener<V, W>,
        order: &mut Order<V, W>,
    ) {
        let sell = order.sell();
        loop {
            if !order.quantity().is_positive() {
                break;
            }
            let best_price = if sell {
                self.bids.max_price().cloned()
            } else {
                self.asks.min_price().cloned()
            };
            let Some(level_price) = best_price else {
                break;
            };
            let crosses = order.is_market()
                || if sell {
                    order.price().cmp(&level_price) != Ordering::Greater
                } else {
                    order.price().cmp(&level_price) != Ordering::Less
                };
            if !crosses {
                break;
            }

            // Queue walk: drain this level until it is empty or the
            // taker is exhausted.
            loop {
                if !order.quantity().is_positive() {
                    break;
                }
                let Some(maker_handle) = self
                    .opposing_side(sell)
                    .level(&level_price)
                    .and_then(|level| level.front_handle())
                else {
                    break;
                };
                let maker_qty = self
                    .opposing_side(sell)
                    .level(&level_price)
                    .unwrap()
                    .get(maker_handle)
                    .quantity()
                    .clone();
                let taker_qty = order.quantity().clone();

                match taker_qty.cmp(&maker_qty) {
                    Ordering::Equal => {
                        let mut maker = self.opposing_side_mut(sell).remove(&level_price, maker_handle);
                        self.lookup.remove(maker.id());
                        let volume = Volume::new(level_price.mul(&maker_qty), maker_qty.clone());
                        maker.set_quantity(V::zero());
                        order.set_quantity(V::zero());
                        listener.on_existing_order_done(&maker);
                        listener.on_incoming_order_done(order);
                        self.settle_fill(ctx, listener, &maker, order, &volume);
                    }
                    Ordering::Greater => {
                        let mut maker = self.opposing_side_mut(sell).remove(&level_price, maker_handle);
                        self.lookup.remove(maker.id());
                        let volume = Volume::new(level_price.mul(&maker_qty), maker_qty.clone());
                        maker.set_quantity(V::zero());
                        order.set_quantity(taker_qty.sub(&maker_qty));
                        listener.on_existing_order_done(&maker);
                        listener.on_incoming_order_partial(order);
                        self.settle_fill(ctx, listener, &maker, order, &volume);
                    }
                    Ordering::Less => {
                        let fill_qty = taker_qty.clone();
                        self.opposing_side_mut(sell)
                            .level_mut(&level_price)
                            .unwrap()
                            .update(maker_handle, maker_qty.sub(&taker_qty));
                        let maker = self
                            .opposing_side(sell)
                            .level(&level_price)
                            .unwrap()
                            .get(maker_handle)
                            .clone();
                        let volume = Volume::new(level_price.mul(&fill_qty), fill_qty);
                        order.set_quantity(V::zero());
                        listener.on_existing_order_partial(&maker);
                        listener.on_incoming_order_done(order);
                        self.settle_fill(ctx, listener, &maker, order, &volume);
                    }
                }
            }
        }
    }

    fn settle_fill(
        &self,
        ctx: &Context,
        listener: &dyn EventListener<V, W>,
        maker: &Order<V, W>,
        taker: &Order<V, W>,
        volume: &Volume<V>,
    ) {
        self.update_balance_on_exchanged(ctx, listener, maker, volume, true);
        self.update_balance_on_exchanged(ctx, listener, taker, volume, false);
    }

    fn update_balance_on_exchanged(
        &self,
        ctx: &Context,
        listener: &dyn EventListener<V, W>,
        order: &Order<V, W>,
        volume: &Volume<V>,
        is_maker: bool,
    ) {
        let (asset_inc, asset_dec, value_inc, value_dec) = if order.sell() {
            (Asset::Quote, Asset::Base, volume.price.clone(), volume.quantity.clone())
        } else {
            (Asset::Base, Asset::Quote, volume.quantity.clone(), volume.price.clone())
        };

        let net_inc = if is_maker {
            self.fee_handler.handle_fee_maker(ctx, order, asset_inc, value_inc)
        } else {
            self.fee_handler.handle_fee_taker(ctx, order, asset_inc, value_inc)
        };

        let wallet = order.owner();
        wallet.update_balance(ctx, asset_inc, net_inc);
        listener.on_balance_changed(wallet, asset_inc, wallet.balance(ctx, asset_inc));

        if is_maker {
            wallet.update_in_order(ctx, asset_dec, negative(&value_dec));
            listener.on_in_order_changed(wallet, asset_dec, wallet.in_order(ctx, asset_dec));
        } else {
            wallet.update_balance(ctx, asset_dec, negative(&value_dec));
            listener.on_balance_changed(wallet, asset_dec, wallet.balance(ctx, asset_dec));
        }
    }

    fn update_balance_on_placed(
        &self,
        ctx: &Context,
        listener: &dyn EventListener<V, W>,
        order: &Order<V, W>,
    ) {
        let (asset, value) = reserved_value(order);
        let wallet = order.owner();
        wallet.update_balance(ctx, asset, negative(&value));
        listener.on_balance_changed(wallet, asset, wallet.balance(ctx, asset));
        wallet.update_in_order(ctx, asset, value);
        listener.on_in_order_changed(wallet, asset, wallet.in_order(ctx, asset));
    }

    fn rest(&mut self, order: &Order<V, W>) {
        let sell = order.sell();
        let id = order.id().to_string();
        let price = order.price().clone();
        let handle = if sell {
            self.asks.append(order.clone())
        } else {
            self.bids.append(order.clone())
        };
        self.lookup.insert(id, Location { sell, price, handle });
    }

    fn replace_order_locked(
        &mut self,
        ctx: &Context,
        listener: &dyn EventListener<V, W>,
        old_id: &str,
        new_order: Order<V, W>,
    ) -> Result<(), EngineError> {
        let location = self.lookup.get(old_id).ok_or(EngineError::OrderNotFound)?.clone();
        let side = if location.sell { &self.asks } else { &self.bids };
        let old = side
            .level(&location.price)
            .and_then(|level| Some(level.get(location.handle).clone()))
            .ok_or(EngineError::OrderNotFound)?;

        if old.owner() != new_order.owner()
            || old.sell() != new_order.sell()
            || old.price().cmp(new_order.price()) != Ordering::Equal
        {
            return Err(EngineError::InvalidOrder);
        }
        if new_order.quantity().sign() <= 0 {
            return Err(EngineError::InvalidQuantity);
        }

        let asset = if new_order.sell() { Asset::Base } else { Asset::Quote };
        let old_value = reserved_value(&old).1;
        let new_value = reserved_value(&new_order).1;
        let wallet = new_order.owner().clone();
        let projected = wallet.balance(ctx, asset).add(&old_value).sub(&new_value);
        if projected.sign() < 0 {
            return Err(EngineError::InsufficientFunds);
        }

        let side_mut = if location.sell {
            &mut self.asks
        } else {
            &mut self.bids
        };
        let level = side_mut
            .level_mut(&location.price)
            .ok_or(EngineError::InvalidPrice)?;
        level.replace(location.handle, new_order.clone());

        self.lookup.rekey(
            old_id,
            new_order.id().to_string(),
            Location {
                sell: location.sell,
                price: location.price,
                handle: location.handle,
            },
        );

        let balance_delta = old_value.sub(&new_value);
        wallet.update_balance(ctx, asset, balance_delta);
        listener.on_balance_changed(&wallet, asset, wallet.balance(ctx, asset));
        let in_order_delta = new_value.sub(&old_value);
        wallet.update_in_order(ctx, asset, in_order_delta);
        listener.on_in_order_changed(&wallet, asset, wallet.in_order(ctx, asset));
        Ok(())
    }
}
