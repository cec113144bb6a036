use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use didit_core::ReloadSignal;

/// Collapses any number of reload requests into one pending redraw pass.
#[derive(Debug, Default)]
pub struct CoalescingReload {
    pending: AtomicBool,
    requests: AtomicU64,
}

impl CoalescingReload {
    /// Clears the pending flag; true when at least one reload was requested since the
    /// last call.
    pub fn take_pending(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Acquire)
    }
}

impl ReloadSignal for CoalescingReload {
    fn reload_all(&self) {
        self.requests.fetch_add(1, Ordering::AcqRel);
        self.pending.store(true, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LoggingReload {
    pub surface: &'static str,
}

impl ReloadSignal for LoggingReload {
    fn reload_all(&self) {
        tracing::info!(surface = self.surface, "reload all widget timelines");
    }
}
