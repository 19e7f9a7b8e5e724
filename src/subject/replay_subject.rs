use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::stream::{
    event::Event,
    subscriber::{Subscriber, Subscription, SubscriptionState},
    terminal::Terminal,
};

use super::Subject;

/// A subject that shares one upstream subscription among any number of
/// subscribers and replays at most `capacity` previously sent values to each
/// new subscriber, followed by the terminal signal once there is one.
///
/// Clones are handles to the same hub. Every state transition — buffering,
/// broadcast, registration, terminal assignment — happens inside one critical
/// section per hub, so values reach each subscriber in send order and replay
/// always precedes any value sent after registration.
pub struct ReplaySubject<T, E> {
    inner: Arc<Mutex<ReplayState<T, E>>>,
}

struct ReplayState<T, E> {
    capacity: usize,
    buffer: VecDeque<Event<T>>,
    terminal: Option<Terminal<E>>,
    links: Vec<Link<T, E>>,
}

/// Connection of one subscriber to the hub.
///
/// Delivery is gated on the subscription record: nothing is delivered at zero
/// demand or after completion, and values withheld for lack of demand are
/// dropped rather than queued.
struct Link<T, E> {
    state: Arc<SubscriptionState>,
    downstream: Box<dyn Subscriber<Item = T, Failure = E> + Send>,
}

impl<T, E> Link<T, E> {
    fn deliver(&mut self, value: Event<T>) {
        if self.state.is_completed() || !self.state.has_demand() {
            return;
        }

        let additional = self.downstream.on_value(value);
        self.state.add_demand(additional);
        self.state.consume_one();
    }

    fn deliver_terminal(&mut self, terminal: Terminal<E>) {
        if !self.state.complete() {
            return;
        }

        self.downstream.on_terminal(terminal);
    }

    fn replay(&mut self, history: &VecDeque<Event<T>>, terminal: Option<Terminal<E>>) {
        if self.state.is_completed() {
            return;
        }

        for value in history {
            self.deliver(value.clone());
        }

        if let Some(terminal) = terminal {
            self.deliver_terminal(terminal);
        }
    }
}

impl<T, E> ReplaySubject<T, E> {
    /// Creates a subject that retains the `capacity` most recent values.
    ///
    /// A capacity of zero disables replay: subscribers only see values sent
    /// after they attach.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ReplayState {
                capacity,
                buffer: VecDeque::new(),
                terminal: None,
                links: Vec::new(),
            })),
        }
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity
    }

    pub fn is_closed(&self) -> bool {
        self.lock().terminal.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, ReplayState<T, E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, E> Default for ReplaySubject<T, E> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T, E> Clone for ReplaySubject<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> Subject for ReplaySubject<T, E> {
    type Item = T;
    type Failure = E;

    fn send(&self, value: T) {
        let mut state = self.lock();
        let event = Event::new(value);

        state.buffer.push_back(event.clone());

        // keep the suffix of at most `capacity` values
        let excess = state.buffer.len().saturating_sub(state.capacity);
        state.buffer.drain(..excess);

        for link in &mut state.links {
            link.deliver(event.clone());
        }

        state.links.retain(|link| !link.state.is_completed());
    }

    fn send_completion(&self, terminal: Terminal<E>) {
        let mut state = self.lock();

        if state.terminal.is_some() {
            return;
        }

        state.terminal = Some(terminal.clone());

        for link in &mut state.links {
            link.deliver_terminal(terminal.clone());
        }

        state.links.clear();
    }

    fn subscribe<S>(&self, subscriber: S) -> Subscription
    where
        S: Subscriber<Item = T, Failure = E> + Send + 'static,
    {
        let mut state = self.lock();
        let link_state = Arc::new(SubscriptionState::new());
        let mut link = Link {
            state: Arc::clone(&link_state),
            downstream: Box::new(subscriber),
        };

        link.downstream
            .on_subscribe(Subscription::new(Arc::clone(&link_state)));
        link.replay(&state.buffer, state.terminal.clone());

        if !link.state.is_completed() {
            state.links.push(link);
        }

        Subscription::new(link_state)
    }
}

#[cfg(test)]
mod test {
    use std::{
        sync::{Arc, Mutex},
        thread,
    };

    use super::ReplaySubject;
    use crate::{
        stream::{
            demand::Demand,
            event::Event,
            subscriber::{Subscriber, Subscription},
            terminal::Terminal,
        },
        subject::Subject,
    };

    struct Recorder<T, E> {
        values: Arc<Mutex<Vec<T>>>,
        terminals: Arc<Mutex<Vec<Terminal<E>>>>,
        initial: Demand,
        replenish: Demand,
    }

    fn recorder<T, E>(
        initial: Demand,
        replenish: Demand,
    ) -> (
        Recorder<T, E>,
        Arc<Mutex<Vec<T>>>,
        Arc<Mutex<Vec<Terminal<E>>>>,
    ) {
        let values = Arc::new(Mutex::new(Vec::new()));
        let terminals = Arc::new(Mutex::new(Vec::new()));
        let subscriber = Recorder {
            values: Arc::clone(&values),
            terminals: Arc::clone(&terminals),
            initial,
            replenish,
        };

        (subscriber, values, terminals)
    }

    impl<T: Clone, E> Subscriber for Recorder<T, E> {
        type Item = T;
        type Failure = E;

        fn on_subscribe(&mut self, subscription: Subscription) {
            subscription.request(self.initial);
        }

        fn on_value(&mut self, value: Event<T>) -> Demand {
            self.values.lock().unwrap().push((*value).clone());
            self.replenish
        }

        fn on_terminal(&mut self, terminal: Terminal<E>) {
            self.terminals.lock().unwrap().push(terminal);
        }
    }

    #[test]
    fn replays_the_last_capacity_values_then_goes_live() {
        let subject = ReplaySubject::<i32, &str>::new(2);

        subject.send(1);
        subject.send(2);
        subject.send(3);

        let (subscriber, values, terminals) = recorder(Demand::UNLIMITED, Demand::NONE);
        subject.subscribe(subscriber);

        assert_eq!(*values.lock().unwrap(), [2, 3]);

        subject.send(4);
        assert_eq!(*values.lock().unwrap(), [2, 3, 4]);

        subject.send_completion(Terminal::Completed);
        assert_eq!(*terminals.lock().unwrap(), [Terminal::Completed]);
    }

    #[test]
    fn capacity_zero_skips_replay_but_delivers_the_terminal() {
        let subject = ReplaySubject::<i32, &str>::new(0);

        subject.send(1);
        subject.send(2);
        subject.send_completion(Terminal::Completed);

        let (subscriber, values, terminals) = recorder(Demand::UNLIMITED, Demand::NONE);
        subject.subscribe(subscriber);

        assert!(values.lock().unwrap().is_empty());
        assert_eq!(*terminals.lock().unwrap(), [Terminal::Completed]);
    }

    #[test]
    fn capacity_zero_still_delivers_live_values() {
        let subject = ReplaySubject::<i32, &str>::new(0);

        let (subscriber, values, _) = recorder(Demand::UNLIMITED, Demand::NONE);
        subject.subscribe(subscriber);

        subject.send(1);
        subject.send(2);

        assert_eq!(*values.lock().unwrap(), [1, 2]);
    }

    #[test]
    fn live_values_arrive_in_send_order() {
        let subject = ReplaySubject::<i32, &str>::new(4);

        let (subscriber, values, _) = recorder(Demand::UNLIMITED, Demand::NONE);
        subject.subscribe(subscriber);

        for i in 0..10 {
            subject.send(i);
        }

        assert_eq!(*values.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn the_first_completion_wins() {
        let subject = ReplaySubject::<i32, &str>::new(1);

        let (subscriber, _, terminals) = recorder(Demand::UNLIMITED, Demand::NONE);
        subject.subscribe(subscriber);

        subject.send_completion(Terminal::error("first"));
        subject.send_completion(Terminal::Completed);

        assert_eq!(*terminals.lock().unwrap(), [Terminal::error("first")]);

        let (late, _, late_terminals) = recorder(Demand::UNLIMITED, Demand::NONE);
        subject.subscribe(late);

        assert_eq!(*late_terminals.lock().unwrap(), [Terminal::error("first")]);
    }

    #[test]
    fn cancelling_stops_delivery() {
        let subject = ReplaySubject::<i32, &str>::new(2);

        let (subscriber, values, terminals) = recorder(Demand::UNLIMITED, Demand::NONE);
        let subscription = subject.subscribe(subscriber);

        subject.send(1);
        subscription.cancel();
        subject.send(2);
        subject.send_completion(Terminal::Completed);

        assert_eq!(*values.lock().unwrap(), [1]);
        assert!(terminals.lock().unwrap().is_empty());
    }

    #[test]
    fn replay_is_limited_by_demand_and_excess_history_is_dropped() {
        let subject = ReplaySubject::<i32, &str>::new(3);

        subject.send(1);
        subject.send(2);
        subject.send(3);

        let (subscriber, values, _) = recorder(Demand::max(2), Demand::NONE);
        let subscription = subject.subscribe(subscriber);

        assert_eq!(*values.lock().unwrap(), [1, 2]);

        // requesting afterwards does not resurrect the withheld history
        subscription.request(Demand::max(5));
        assert_eq!(*values.lock().unwrap(), [1, 2]);

        subject.send(4);
        assert_eq!(*values.lock().unwrap(), [1, 2, 4]);
    }

    #[test]
    fn demand_is_replenished_through_the_receive_path() {
        let subject = ReplaySubject::<i32, &str>::new(0);

        let (subscriber, values, _) = recorder(Demand::max(1), Demand::max(1));
        subject.subscribe(subscriber);

        subject.send(1);
        subject.send(2);
        subject.send(3);

        assert_eq!(*values.lock().unwrap(), [1, 2, 3]);
    }

    #[test]
    fn live_values_at_zero_demand_are_dropped() {
        let subject = ReplaySubject::<i32, &str>::new(0);

        let (subscriber, values, _) = recorder(Demand::NONE, Demand::NONE);
        let subscription = subject.subscribe(subscriber);

        subject.send(1);
        assert!(values.lock().unwrap().is_empty());

        subscription.request(Demand::max(1));
        subject.send(2);
        subject.send(3);

        assert_eq!(*values.lock().unwrap(), [2]);
    }

    #[test]
    fn late_subscriber_after_an_error_sees_history_then_the_error() {
        let subject = ReplaySubject::<i32, &str>::new(1);

        subject.send(1);
        subject.send_completion(Terminal::error("E"));

        let (subscriber, values, terminals) = recorder(Demand::UNLIMITED, Demand::NONE);
        subject.subscribe(subscriber);

        assert_eq!(*values.lock().unwrap(), [1]);
        assert_eq!(*terminals.lock().unwrap(), [Terminal::error("E")]);

        // a misbehaving upstream cannot reach a completed subscriber
        subject.send(2);
        assert_eq!(*values.lock().unwrap(), [1]);
        assert_eq!(terminals.lock().unwrap().len(), 1);
    }

    #[test]
    fn send_after_completion_only_feeds_the_buffer() {
        let subject = ReplaySubject::<i32, &str>::new(2);

        subject.send(1);
        subject.send_completion(Terminal::Completed);
        subject.send(2);

        let (subscriber, values, terminals) = recorder(Demand::UNLIMITED, Demand::NONE);
        subject.subscribe(subscriber);

        assert_eq!(*values.lock().unwrap(), [1, 2]);
        assert_eq!(*terminals.lock().unwrap(), [Terminal::Completed]);
    }

    #[test]
    fn subscribing_never_yields_more_than_was_sent() {
        let subject = ReplaySubject::<i32, &str>::new(8);

        subject.send(1);
        subject.send(2);

        let (subscriber, values, _) = recorder(Demand::UNLIMITED, Demand::NONE);
        subject.subscribe(subscriber);

        assert_eq!(*values.lock().unwrap(), [1, 2]);
    }

    #[test]
    fn concurrent_producer_preserves_per_subscriber_order() {
        let subject = ReplaySubject::<i32, &str>::new(4);
        let producer = subject.clone();

        let handle = thread::spawn(move || {
            for i in 0..100 {
                producer.send(i);
            }
            producer.send_completion(Terminal::Completed);
        });

        let (subscriber, values, terminals) = recorder(Demand::UNLIMITED, Demand::NONE);
        subject.subscribe(subscriber);

        handle.join().unwrap();

        let values = values.lock().unwrap();
        assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(*terminals.lock().unwrap(), [Terminal::Completed]);
    }

    #[test]
    fn late_subscriber_after_a_threaded_run_sees_the_tail() {
        let subject = ReplaySubject::<i32, &str>::new(4);
        let producer = subject.clone();

        thread::spawn(move || {
            for i in 0..100 {
                producer.send(i);
            }
            producer.send_completion(Terminal::Completed);
        })
        .join()
        .unwrap();

        let (subscriber, values, terminals) = recorder(Demand::UNLIMITED, Demand::NONE);
        subject.subscribe(subscriber);

        assert_eq!(*values.lock().unwrap(), [96, 97, 98, 99]);
        assert_eq!(*terminals.lock().unwrap(), [Terminal::Completed]);
    }

    #[test]
    fn the_subject_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<ReplaySubject<i32, String>>();
    }
}
