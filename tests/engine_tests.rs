//! Integration tests exercising the full match loop, balance protocol,
//! and error paths against an in-memory wallet/listener harness.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use clob_engine::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A local newtype over `i64` so this test crate can implement `Value`
/// for it (the orphan rule forbids implementing a crate's trait
/// directly for a foreign primitive from outside that crate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Amt(i64);

impl Value for Amt {
    fn zero() -> Self {
        Amt(0)
    }
    fn add(&self, other: &Self) -> Self {
        Amt(self.0 + other.0)
    }
    fn sub(&self, other: &Self) -> Self {
        Amt(self.0 - other.0)
    }
    fn mul(&self, other: &Self) -> Self {
        Amt(self.0 * other.0)
    }
}

#[derive(Default)]
struct Ledger {
    balance: HashMap<Asset, Amt>,
    in_order: HashMap<Asset, Amt>,
}

#[derive(Clone)]
struct TestWallet(Arc<Mutex<Ledger>>);

impl TestWallet {
    fn new(base: i64, quote: i64) -> Self {
        let mut ledger = Ledger::default();
        ledger.balance.insert(Asset::Base, Amt(base));
        ledger.balance.insert(Asset::Quote, Amt(quote));
        Self(Arc::new(Mutex::new(ledger)))
    }

    fn free(&self, asset: Asset) -> Amt {
        *self.0.lock().unwrap().balance.get(&asset).unwrap_or(&Amt(0))
    }

    fn reserved(&self, asset: Asset) -> Amt {
        *self.0.lock().unwrap().in_order.get(&asset).unwrap_or(&Amt(0))
    }
}

impl PartialEq for TestWallet {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Wallet<Amt> for TestWallet {
    fn balance(&self, _ctx: &Context, asset: Asset) -> Amt {
        self.free(asset)
    }

    fn update_balance(&self, _ctx: &Context, asset: Asset, delta: Amt) {
        let mut guard = self.0.lock().unwrap();
        let entry = guard.balance.entry(asset).or_insert(Amt(0));
        *entry = Amt(entry.0 + delta.0);
    }

    fn in_order(&self, _ctx: &Context, asset: Asset) -> Amt {
        self.reserved(asset)
    }

    fn update_in_order(&self, _ctx: &Context, asset: Asset, delta: Amt) {
        let mut guard = self.0.lock().unwrap();
        let entry = guard.in_order.entry(asset).or_insert(Amt(0));
        *entry = Amt(entry.0 + delta.0);
    }
}

#[derive(Default, Clone)]
struct RecordingListener {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingListener {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn done_count(&self) -> usize {
        self.events().iter().filter(|e| e.contains("done")).count()
    }
}

impl EventListener<Amt, TestWallet> for RecordingListener {
    fn on_incoming_order_partial(&self, order: &Order<Amt, TestWallet>) {
        self.events.lock().unwrap().push(format!("incoming_partial:{}", order.id()));
    }
    fn on_incoming_order_done(&self, order: &Order<Amt, TestWallet>) {
        self.events.lock().unwrap().push(format!("incoming_done:{}", order.id()));
    }
    fn on_incoming_order_placed(&self, order: &Order<Amt, TestWallet>) {
        self.events.lock().unwrap().push(format!("incoming_placed:{}", order.id()));
    }
    fn on_existing_order_partial(&self, order: &Order<Amt, TestWallet>) {
        self.events.lock().unwrap().push(format!("existing_partial:{}", order.id()));
    }
    fn on_existing_order_done(&self, order: &Order<Amt, TestWallet>) {
        self.events.lock().unwrap().push(format!("existing_done:{}", order.id()));
    }
    fn on_existing_order_canceled(&self, order: &Order<Amt, TestWallet>) {
        self.events.lock().unwrap().push(format!("canceled:{}", order.id()));
    }
}

fn engine() -> Engine<Amt, TestWallet> {
    init_tracing();
    Engine::new("apples", "dollars")
}

fn order(id: &str, owner: TestWallet, sell: bool, price: i64, quantity: i64) -> Order<Amt, TestWallet> {
    Order::new(id, owner, sell, Amt(price), Amt(quantity))
}

// Scenario 1: place & cancel (sell).
#[test]
fn place_and_cancel_sell_round_trips_balance() {
    let e = engine();
    let w1 = TestWallet::new(10, 0);

    e.place_order(&Context::none(), None, order("1", w1.clone(), true, 10, 1))
        .unwrap();
    assert_eq!(w1.free(Asset::Base), Amt(9));
    assert_eq!(w1.reserved(Asset::Base), Amt(1));

    e.cancel_order(&Context::none(), None, "1").unwrap();
    assert_eq!(w1.free(Asset::Base), Amt(10));
    assert_eq!(w1.reserved(Asset::Base), Amt(0));
    assert_eq!(e.orders().len(), 0);
}

// Scenario 2: market sell fills two resting bids, best price first.
#[test]
fn market_sell_fills_two_bids_best_price_first() {
    let e = engine();
    let w1 = TestWallet::new(0, 10);
    let w2 = TestWallet::new(0, 20);
    let w3 = TestWallet::new(2, 0);
    let listener = RecordingListener::default();

    e.place_order(&Context::none(), None, order("w1-bid", w1.clone(), false, 10, 1))
        .unwrap();
    e.place_order(&Context::none(), None, order("w2-bid", w2.clone(), false, 20, 1))
        .unwrap();

    e.place_order(
        &Context::none(),
        Some(&listener),
        order("w3-sell", w3.clone(), true, 0, 2),
    )
    .unwrap();

    assert_eq!(listener.done_count(), 3);
    assert_eq!(w1.free(Asset::Base), Amt(1));
    assert_eq!(w1.free(Asset::Quote), Amt(0));
    assert_eq!(w2.free(Asset::Base), Amt(1));
    assert_eq!(w2.free(Asset::Quote), Amt(0));
    assert_eq!(w3.free(Asset::Base), Amt(0));
    assert_eq!(w3.free(Asset::Quote), Amt(30));
    assert_eq!(e.spread().best_bid, None);
}

// Scenario 3: limit sell crosses both bids and rests a residual.
#[test]
fn limit_sell_matches_available_depth_and_rests_residual() {
    let e = engine();
    let w1 = TestWallet::new(0, 10);
    let w2 = TestWallet::new(0, 20);
    let w3 = TestWallet::new(3, 0);

    e.place_order(&Context::none(), None, order("w1-bid", w1.clone(), false, 10, 1))
        .unwrap();
    e.place_order(&Context::none(), None, order("w2-bid", w2.clone(), false, 20, 1))
        .unwrap();
    e.place_order(&Context::none(), None, order("w3-sell", w3.clone(), true, 5, 3))
        .unwrap();

    assert_eq!(w3.free(Asset::Base), Amt(0));
    assert_eq!(w3.reserved(Asset::Base), Amt(1));
    assert_eq!(w3.free(Asset::Quote), Amt(30));

    let resting = e
        .find_order("w3-sell")
        .expect("residual quantity should rest on the book");
    assert_eq!(*resting.price(), Amt(5));
    assert_eq!(*resting.quantity(), Amt(1));

    let mut ask_volume = None;
    e.order_book(|info| {
        if info.is_ask && info.price == Amt(5) {
            ask_volume = Some(info.volume);
        }
    });
    assert_eq!(ask_volume, Some(Amt(1)));
}

// Scenario 4: invalid inputs.
#[test]
fn invalid_quantity_is_rejected() {
    let e = engine();
    let w = TestWallet::new(10, 10);
    let err = e
        .place_order(&Context::none(), None, order("x", w, true, 10, -1))
        .unwrap_err();
    assert_eq!(err, EngineError::InvalidQuantity);
}

#[test]
fn invalid_price_is_rejected() {
    let e = engine();
    let w = TestWallet::new(10, 10);
    let err = e
        .place_order(&Context::none(), None, order("x", w, true, -20, 1))
        .unwrap_err();
    assert_eq!(err, EngineError::InvalidPrice);
}

#[test]
fn duplicate_id_is_rejected() {
    let e = engine();
    let w = TestWallet::new(10, 10);
    e.place_order(&Context::none(), None, order("dup", w.clone(), true, 10, 1))
        .unwrap();
    let err = e
        .place_order(&Context::none(), None, order("dup", w, true, 10, 1))
        .unwrap_err();
    assert_eq!(err, EngineError::OrderExists);
}

#[test]
fn market_order_exceeding_depth_is_rejected() {
    let e = engine();
    let w = TestWallet::new(10, 10);
    let err = e
        .place_order(&Context::none(), None, order("x", w, true, 0, 5))
        .unwrap_err();
    assert_eq!(err, EngineError::InsufficientQuantity);
}

#[test]
fn buy_order_exceeding_quote_balance_is_rejected() {
    let e = engine();
    let w = TestWallet::new(0, 5);
    let err = e
        .place_order(&Context::none(), None, order("x", w, false, 10, 1))
        .unwrap_err();
    assert_eq!(err, EngineError::InsufficientFunds);
}

// Scenario 5: replace preserves time priority.
#[test]
fn replace_preserves_fifo_position() {
    let e = engine();
    let wa = TestWallet::new(0, 20);
    let wb = TestWallet::new(0, 10);
    let seller = TestWallet::new(5, 0);

    e.place_order(&Context::none(), None, order("A", wa.clone(), false, 10, 1))
        .unwrap();
    e.place_order(&Context::none(), None, order("B", wb.clone(), false, 10, 1))
        .unwrap();

    e.replace_order(&Context::none(), None, "A", order("A", wa.clone(), false, 10, 2))
        .unwrap();
    assert_eq!(wa.free(Asset::Quote), Amt(0));
    assert_eq!(wa.reserved(Asset::Quote), Amt(20));

    e.place_order(&Context::none(), None, order("sell", seller, true, 10, 1))
        .unwrap();

    assert_eq!(*e.find_order("A").unwrap().quantity(), Amt(1));
    assert_eq!(*e.find_order("B").unwrap().quantity(), Amt(1));
}

#[test]
fn replace_rejects_mismatched_owner() {
    let e = engine();
    let wa = TestWallet::new(0, 10);
    let wb = TestWallet::new(0, 10);
    e.place_order(&Context::none(), None, order("A", wa, false, 10, 1))
        .unwrap();
    let err = e
        .replace_order(&Context::none(), None, "A", order("A", wb, false, 10, 1))
        .unwrap_err();
    assert_eq!(err, EngineError::InvalidOrder);
}

// Scenario 6: self-match is allowed (no self-trade prevention).
#[test]
fn self_match_nets_out_consistently() {
    let e = engine();
    let w = TestWallet::new(2, 20);

    e.place_order(&Context::none(), None, order("self-bid", w.clone(), false, 10, 2))
        .unwrap();
    assert_eq!(w.free(Asset::Quote), Amt(0));
    assert_eq!(w.reserved(Asset::Quote), Amt(20));

    e.place_order(&Context::none(), None, order("self-sell", w.clone(), true, 5, 2))
        .unwrap();

    assert_eq!(w.free(Asset::Base), Amt(2));
    assert_eq!(w.reserved(Asset::Base), Amt(0));
    assert_eq!(w.free(Asset::Quote), Amt(20));
    assert_eq!(w.reserved(Asset::Quote), Amt(0));
}

// Law: place + cancel of an uncrossed order is a no-op on free balance and num_orders.
#[test]
fn place_then_cancel_is_a_no_op_law() {
    let e = engine();
    let w = TestWallet::new(0, 100);
    let before = w.free(Asset::Quote);

    e.place_order(&Context::none(), None, order("noop", w.clone(), false, 10, 3))
        .unwrap();
    e.cancel_order(&Context::none(), None, "noop").unwrap();

    assert_eq!(w.free(Asset::Quote), before);
    assert_eq!(w.reserved(Asset::Quote), Amt(0));
    assert_eq!(e.orders().len(), 0);
}

#[test]
fn cancel_unknown_order_reports_not_found() {
    let e = engine();
    let err = e.cancel_order(&Context::none(), None, "ghost").unwrap_err();
    assert_eq!(err, EngineError::OrderNotFound);
}

#[test]
fn price_probe_matches_market_fill_amount() {
    let e = engine();
    let w1 = TestWallet::new(0, 10);
    let w2 = TestWallet::new(0, 20);
    e.place_order(&Context::none(), None, order("w1-bid", w1, false, 10, 1))
        .unwrap();
    e.place_order(&Context::none(), None, order("w2-bid", w2, false, 20, 1))
        .unwrap();

    assert_eq!(e.price(true, &Amt(2)).unwrap(), Amt(30));
    assert_eq!(e.quantity(true, None), Amt(2));
    assert_eq!(e.quantity(true, Some(&Amt(15))), Amt(1));
}
