use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Run-wide stop flag handed to every worker at spawn time.
///
/// Goes from unset to set once and stays set.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Returns `true` only for the call that actually raised it.
    pub fn trigger(&self) -> bool {
        !self.flag.swap(true, Ordering::AcqRel)
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
