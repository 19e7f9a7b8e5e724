use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use super::{
    demand::{Demand, UNLIMITED_RAW},
    event::Event,
    terminal::Terminal,
};

/// An observer attached to a [`Subject`](crate::subject::Subject).
///
/// `on_subscribe` hands over the [`Subscription`] before any value is
/// replayed, which is where the initial demand is requested. `on_value`
/// returns an additional demand increment, mirroring the request channel.
pub trait Subscriber {
    type Item;
    type Failure;

    fn on_subscribe(&mut self, subscription: Subscription);
    fn on_value(&mut self, value: Event<Self::Item>) -> Demand;
    fn on_terminal(&mut self, terminal: Terminal<Self::Failure>);
}

/// Demand counter and completion flag of a single subscription.
///
/// Kept atomic rather than behind the subject lock so that a downstream may
/// request demand or cancel from inside a delivery callback. All delivery
/// bookkeeping still happens inside the subject's critical section.
pub(crate) struct SubscriptionState {
    demand: AtomicU64,
    completed: AtomicBool,
}

impl SubscriptionState {
    pub(crate) fn new() -> Self {
        Self {
            demand: AtomicU64::new(0),
            completed: AtomicBool::new(false),
        }
    }

    pub(crate) fn add_demand(&self, demand: Demand) {
        if self.is_completed() || demand.is_none() {
            return;
        }

        if demand.is_unlimited() {
            self.demand.store(UNLIMITED_RAW, Ordering::SeqCst);
        } else {
            let added = demand.into_raw();
            let _ = self
                .demand
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                    if current == UNLIMITED_RAW {
                        None
                    } else {
                        Some(current.saturating_add(added))
                    }
                });
        }
    }

    pub(crate) fn has_demand(&self) -> bool {
        self.demand.load(Ordering::SeqCst) > 0
    }

    pub(crate) fn consume_one(&self) {
        let _ = self
            .demand
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                if current == UNLIMITED_RAW {
                    None
                } else {
                    Some(current.saturating_sub(1))
                }
            });
    }

    /// Flips the completion flag, returning whether this call flipped it.
    pub(crate) fn complete(&self) -> bool {
        !self.completed.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }
}

/// Handle to a single subscription, returned by
/// [`Subject::subscribe`](crate::subject::Subject::subscribe).
///
/// Cancelling stops all future delivery to the subscriber; it does not reach
/// back to the upstream source, which only ever sees the subject.
pub struct Subscription {
    state: Arc<SubscriptionState>,
}

impl Subscription {
    pub(crate) fn new(state: Arc<SubscriptionState>) -> Self {
        Self { state }
    }

    /// Authorizes delivery of `demand` further values. No-op once closed.
    pub fn request(&self, demand: Demand) {
        self.state.add_demand(demand);
    }

    /// Idempotent.
    pub fn cancel(&self) {
        self.state.complete();
    }

    /// True once cancelled or after terminal delivery.
    pub fn is_closed(&self) -> bool {
        self.state.is_completed()
    }
}

impl Clone for Subscription {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}
