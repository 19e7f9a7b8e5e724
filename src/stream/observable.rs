use std::{
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    task::{Context, Poll},
};

use futures::{stream::FusedStream, Stream};

use crate::subject::Subject;

use super::{
    controller::{Controller, ControllerSubscriber},
    event::Event,
    subscriber::Subscription,
};

/// Stream over one subscription to a [`Subject`].
///
/// Requests unbounded demand and buffers internally, so no value the subject
/// delivers is lost to polling cadence. Ends after the completion signal, or
/// after yielding the terminal error once. Dropping the stream cancels the
/// subscription.
pub struct Observable<T, E> {
    controller: Arc<Mutex<Controller<T, E>>>,
    subscription: Subscription,
}

impl<T, E> Observable<T, E> {
    pub(crate) fn attach<Sub>(subject: &Sub) -> Self
    where
        Sub: Subject<Item = T, Failure = E>,
        T: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        let controller = Arc::new(Mutex::new(Controller::new()));
        let subscription = subject.subscribe(ControllerSubscriber {
            controller: Arc::clone(&controller),
        });

        Self {
            controller,
            subscription,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Controller<T, E>> {
        self.controller.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, E> Stream for Observable<T, E> {
    type Item = Result<Event<T>, Arc<E>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().lock().next(cx)
    }
}

impl<T, E> FusedStream for Observable<T, E> {
    fn is_terminated(&self) -> bool {
        self.lock().is_done()
    }
}

impl<T, E> Drop for Observable<T, E> {
    fn drop(&mut self) {
        self.subscription.cancel();
    }
}
