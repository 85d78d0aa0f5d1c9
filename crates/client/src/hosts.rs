//! Randomized fallback order over equivalent index hosts.
//!
//! The first attempt of every search goes to the canonical host. Retries walk
//! a permutation of the fallback hosts that is shuffled once when the client
//! is built, which spreads failover load across clients without a discovery
//! service.

use rand::Rng;
use rand::seq::SliceRandom;

/// Which host an attempt should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSlot {
    /// The unsuffixed, canonical host.
    Canonical,
    /// Zero-based index into the fallback hosts.
    Fallback(usize),
}

/// Fixed permutation of fallback hosts, generated once per client.
#[derive(Debug, Clone)]
pub struct HostRotator {
    order: Vec<usize>,
}

impl HostRotator {
    /// Shuffle `fallback_count` hosts with the thread-local RNG.
    pub fn new(fallback_count: usize) -> Self {
        Self::with_rng(fallback_count, &mut rand::thread_rng())
    }

    /// Shuffle with a caller-provided RNG. Fisher-Yates, so every order is
    /// equally likely.
    pub fn with_rng<R: Rng + ?Sized>(fallback_count: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..fallback_count).collect();
        order.shuffle(rng);
        Self { order }
    }

    /// Unshuffled order, so tests know which fallback comes next.
    #[cfg(test)]
    pub(crate) fn in_order(fallback_count: usize) -> Self {
        Self { order: (0..fallback_count).collect() }
    }

    pub fn fallback_count(&self) -> usize {
        self.order.len()
    }

    /// Total attempts for one search: the canonical host plus every fallback.
    pub fn attempt_budget(&self) -> usize {
        self.order.len() + 1
    }

    /// Host for the attempt made with `retries_remaining` retries left.
    ///
    /// A search starts with `retries_remaining == fallback_count()`, which
    /// maps to the canonical host. Each retry moves one step down the shuffled
    /// fallback list. Returns `None` when `retries_remaining` is out of range.
    pub fn host_at(&self, retries_remaining: usize) -> Option<HostSlot> {
        let n = self.order.len();
        if retries_remaining == n {
            Some(HostSlot::Canonical)
        } else if retries_remaining < n {
            Some(HostSlot::Fallback(self.order[n - 1 - retries_remaining]))
        } else {
            None
        }
    }

    /// The fallback order, front to back.
    pub fn order(&self) -> &[usize] {
        &self.order
    }
}
