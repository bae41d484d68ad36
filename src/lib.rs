//! # clob-engine
//!
//! A central-limit-order-book matching engine for a single trading pair:
//! price-time priority matching over limit and market orders, a
//! balance-movement protocol for crediting/debiting a host-supplied
//! wallet on every fill, and market-price/depth probes for pre-trade
//! checks.
//!
//! ## Design
//!
//! The engine is generic over two things the host controls:
//!
//! - [`Value`] — the numeric type used for prices, quantities, and money
//!   amounts. The engine only ever adds, subtracts, multiplies, and
//!   compares it; bring your own `rust_decimal::Decimal`, fixed-point
//!   integer, or whatever precision your ledger already uses.
//! - [`Wallet`] — where balances live. The engine never stores balances
//!   itself; every fill and every resting order moves funds through this
//!   trait while the engine's lock is held.
//!
//! Everything else — [`EventListener`] for lifecycle notifications and
//! [`FeeHandler`] for maker/taker fee schedules — defaults to a no-op
//! ([`NoopListener`], [`NoopFeeHandler`]) so a minimal integration needs
//! only `Value` and `Wallet`.
//!
//! The book itself is two [`BookSide`]s (bids and asks), each an ordered
//! map from price to a FIFO queue of resting orders, backed by a
//! hand-rolled red-black tree ([`tree::OrderedMap`]) and an arena-based
//! intrusive queue ([`queue::PriceLevelQueue`]) rather than `Box`/`Rc`
//! links, so the match loop never allocates on the hot path beyond what
//! the host's own types allocate.
//!
//! `Engine` wraps its book in a single [`std::sync::Mutex`]: every public
//! method locks for its full duration, including whatever time the
//! host's `Wallet`/`EventListener`/`FeeHandler` callbacks take. This
//! trades away the intra-book parallelism a sharded or lock-free design
//! would offer for a much smaller, much easier to reason about surface —
//! appropriate for a single trading pair, where all activity already
//! serializes against the same book regardless of locking strategy.
//!
//! ## Example
//!
//! ```
//! use clob_engine::prelude::*;
//!
//! // A local newtype stands in for the host's real price/quantity type
//! // (e.g. `rust_decimal::Decimal`); `Value` can't be implemented for a
//! // bare `i64` from outside the crate that defines it.
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
//! struct Amt(i64);
//!
//! impl Value for Amt {
//!     fn zero() -> Self { Amt(0) }
//!     fn add(&self, other: &Self) -> Self { Amt(self.0 + other.0) }
//!     fn sub(&self, other: &Self) -> Self { Amt(self.0 - other.0) }
//!     fn mul(&self, other: &Self) -> Self { Amt(self.0 * other.0) }
//! }
//!
//! #[derive(Clone, PartialEq)]
//! struct Trader;
//!
//! impl Wallet<Amt> for Trader {
//!     fn balance(&self, _ctx: &Context, _asset: Asset) -> Amt { Amt(1_000) }
//!     fn update_balance(&self, _ctx: &Context, _asset: Asset, _delta: Amt) {}
//!     fn in_order(&self, _ctx: &Context, _asset: Asset) -> Amt { Amt(0) }
//!     fn update_in_order(&self, _ctx: &Context, _asset: Asset, _delta: Amt) {}
//! }
//!
//! let engine: Engine<Amt, Trader> = Engine::new("BTC", "USD");
//! let order = Order::new("order-1", Trader, false, Amt(100), Amt(5));
//! engine.place_order(&Context::none(), None, order).unwrap();
//! assert_eq!(engine.spread().best_bid, Some(Amt(100)));
//! ```

pub mod asset;
pub mod context;
pub mod engine;
pub mod error;
pub mod fees;
pub mod listener;
mod lookup;
pub mod order;
pub mod prelude;
mod queue;
mod side;
mod tree;
pub mod value;
pub mod wallet;

pub use asset::Asset;
pub use context::Context;
pub use engine::{Engine, LevelInfo, Spread};
pub use error::EngineError;
pub use fees::{FeeHandler, NoopFeeHandler};
pub use listener::{EventListener, NoopListener};
pub use order::{Order, Volume};
pub use value::Value;
pub use wallet::Wallet;
