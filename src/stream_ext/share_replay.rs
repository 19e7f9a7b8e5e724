use std::{
    convert::Infallible,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    task::{Context, Poll},
};

use futures::{ready, stream::FusedStream, Stream, StreamExt};

use crate::{
    stream::{event::Event, observable::Observable},
    subject::{replay_subject::ReplaySubject, shareable_subject::ShareableSource, Subject},
};

/// Stream for the [`share_replay`](crate::RxExt::share_replay) method.
///
/// All clones drive and drain one shared source; each clone owns its own
/// subscription to the underlying replay subject, so a clone created late
/// first receives the buffered tail.
#[must_use = "streams do nothing unless polled"]
pub struct SharedReplay<S: Stream> {
    source: Arc<Mutex<ShareableSource<S, ReplaySubject<S::Item, Infallible>>>>,
    stream: Observable<S::Item, Infallible>,
}

impl<S: Stream> SharedReplay<S>
where
    S::Item: Send + Sync + 'static,
{
    pub(crate) fn new(stream: S, capacity: usize) -> Self {
        let source = ShareableSource::new(stream, ReplaySubject::new(capacity));
        let stream = source.observe();

        Self {
            source: Arc::new(Mutex::new(source)),
            stream,
        }
    }
}

impl<S: Stream> SharedReplay<S> {
    fn lock(&self) -> MutexGuard<'_, ShareableSource<S, ReplaySubject<S::Item, Infallible>>> {
        self.source.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: Stream> Clone for SharedReplay<S>
where
    S::Item: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        let stream = self.lock().observe();

        Self {
            source: Arc::clone(&self.source),
            stream,
        }
    }
}

impl<S: Stream> Stream for SharedReplay<S> {
    type Item = Event<S::Item>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        this.lock().poll_source(cx, |subject, item| {
            subject.send(item);

            false
        });

        match ready!(this.stream.poll_next_unpin(cx)) {
            Some(Ok(event)) => Poll::Ready(Some(event)),
            Some(Err(_)) => unreachable!(),
            None => Poll::Ready(None),
        }
    }
}

impl<S: Stream> FusedStream for SharedReplay<S> {
    fn is_terminated(&self) -> bool {
        self.stream.is_terminated()
    }
}
