pub mod replay_subject;
pub(crate) mod shareable_subject;

use crate::stream::observable::Observable;
use crate::stream::subscriber::{Subscriber, Subscription};
use crate::stream::terminal::Terminal;

/// A multicast hub: values and one terminal signal go in from a single
/// upstream producer, and fan out to any number of subscribers.
pub trait Subject {
    type Item;
    type Failure;

    /// Delivers `value` to every active subscriber.
    fn send(&self, value: Self::Item);

    /// Records and broadcasts the terminal signal. The first call wins;
    /// later calls are no-ops.
    fn send_completion(&self, terminal: Terminal<Self::Failure>);

    /// Registers `subscriber` and returns its cancellation handle.
    fn subscribe<S>(&self, subscriber: S) -> Subscription
    where
        S: Subscriber<Item = Self::Item, Failure = Self::Failure> + Send + 'static;

    /// Bridges a subscription into a [`futures::Stream`](futures::Stream)
    /// with unbounded demand.
    fn observe(&self) -> Observable<Self::Item, Self::Failure>
    where
        Self: Sized,
        Self::Item: Send + Sync + 'static,
        Self::Failure: Send + Sync + 'static,
    {
        Observable::attach(self)
    }
}
