use didit_core::increment;
use didit_core::keys;
use didit_core::IncrementTarget;
use didit_core::KeyValueStore;
use didit_core::ReloadSignal;

use crate::contracts::TapRequest;
use crate::contracts::TapResult;
use crate::contracts::TapStatus;

pub trait TapExecutor {
    fn execute(&self, request: &TapRequest) -> TapResult;
}

/// Applies taps to the shared store and broadcasts a reload after each one.
pub struct StoreTapExecutor<'a> {
    target: IncrementTarget<'a>,
    signal: &'a dyn ReloadSignal,
}

impl<'a> StoreTapExecutor<'a> {
    pub fn new(target: IncrementTarget<'a>, signal: &'a dyn ReloadSignal) -> Self {
        Self { target, signal }
    }
}

impl TapExecutor for StoreTapExecutor<'_> {
    fn execute(&self, request: &TapRequest) -> TapResult {
        let outcome = increment(&self.target, self.signal, &request.action_id);
        TapResult {
            action_id: request.action_id.clone(),
            status: TapStatus::Accepted,
            count: outcome.count,
            outcome: Some(outcome),
        }
    }
}

/// Reports what a tap would do without writing or signalling.
pub struct DryRunTapExecutor<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> DryRunTapExecutor<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }
}

impl TapExecutor for DryRunTapExecutor<'_> {
    fn execute(&self, request: &TapRequest) -> TapResult {
        let current = self
            .store
            .get_integer(&keys::count_key(&request.action_id))
            .ok()
            .flatten()
            .unwrap_or(0)
            .max(0);
        TapResult {
            action_id: request.action_id.clone(),
            status: TapStatus::Simulated,
            count: u64::try_from(current.saturating_add(1)).unwrap_or(0),
            outcome: None,
        }
    }
}
