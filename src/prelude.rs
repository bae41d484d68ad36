//! Convenience re-export of the types most integrations need.
//!
//! ```
//! use clob_engine::prelude::*;
//! ```

pub use crate::asset::Asset;
pub use crate::context::Context;
pub use crate::engine::{Engine, LevelInfo, Spread};
pub use crate::error::EngineError;
pub use crate::fees::{FeeHandler, NoopFeeHandler};
pub use crate::listener::{EventListener, NoopListener};
pub use crate::order::{Order, Volume};
pub use crate::value::Value;
pub use crate::wallet::Wallet;
