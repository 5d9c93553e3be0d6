//! Cancel-and-replace coalescing of rapid parameter changes
//!
//! Callers pass the current `Instant` in, so the same code drives a UI
//! frame loop and deterministic tests. A pending value is released only
//! after `settle` has elapsed with no newer submission.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::params::{ParamKind, ParameterUpdate};

/// Holds at most one deferred value; newer submissions replace it.
#[derive(Debug)]
pub struct Debouncer<T> {
    settle: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(settle: Duration) -> Self {
        Self { settle, pending: None }
    }

    /// Schedule `value`, cancelling any pending one and restarting the timer.
    pub fn submit(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Release the pending value once it has settled.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let settled = matches!(
            &self.pending,
            Some((_, at)) if now.saturating_duration_since(*at) >= self.settle
        );
        if settled {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Drop the pending value without releasing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value will settle, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.settle)
    }
}

/// Coalesces slider updates: the latest progress per parameter is kept and
/// the whole batch is released once no slider has moved for `settle`.
#[derive(Debug)]
pub struct ParameterBatcher {
    batch: BTreeMap<ParamKind, f64>,
    timer: Debouncer<()>,
}

impl ParameterBatcher {
    pub fn new(settle: Duration) -> Self {
        Self {
            batch: BTreeMap::new(),
            timer: Debouncer::new(settle),
        }
    }

    pub fn submit(&mut self, update: ParameterUpdate, now: Instant) {
        self.batch.insert(update.kind, update.progress);
        self.timer.submit((), now);
    }

    /// Settled updates in a stable order, or `None` while still settling.
    pub fn poll(&mut self, now: Instant) -> Option<Vec<ParameterUpdate>> {
        self.timer.poll(now)?;
        let updates = std::mem::take(&mut self.batch)
            .into_iter()
            .map(|(kind, progress)| ParameterUpdate::new(kind, progress))
            .collect();
        Some(updates)
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
        self.batch.clear();
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }
}
