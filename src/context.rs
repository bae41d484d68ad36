//! Cancellation context threaded through collaborator calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// An opaque cancellation token passed to every `Wallet` and `FeeHandler`
/// call made while the engine lock is held.
///
/// The engine never inspects this itself (spec.md §5: "the engine itself
/// does not check it") — it only threads it through so a host's wallet
/// or fee implementation can observe cancellation of the surrounding
/// request without the engine needing to know what "cancelled" means for
/// the host.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancelled: Option<Arc<AtomicBool>>,
}

impl Context {
    /// A context that is never cancelled.
    pub fn none() -> Self {
        Self { cancelled: None }
    }

    /// A context backed by a shared cancellation flag the host can flip
    /// from another thread.
    pub fn with_flag(flag: Arc<AtomicBool>) -> Self {
        Self {
            cancelled: Some(flag),
        }
    }

    /// Whether the host has requested cancellation of the operation this
    /// context was created for.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }
}
