use std::{
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    task::{Context, Poll},
};

use futures::{stream::FusedStream, Stream, StreamExt};

use crate::{
    stream::{event::Event, observable::Observable, terminal::Terminal},
    subject::{replay_subject::ReplaySubject, shareable_subject::ShareableSource, Subject},
};

/// Stream for the [`try_share_replay`](crate::RxExt::try_share_replay) method.
///
/// Like [`SharedReplay`](super::share_replay::SharedReplay), but the source
/// is fallible: the first `Err` item becomes the subject's terminal error and
/// reaches every clone — including clones created afterwards — right after
/// their replay.
#[must_use = "streams do nothing unless polled"]
pub struct TrySharedReplay<S: Stream, T, E> {
    source: Arc<Mutex<ShareableSource<S, ReplaySubject<T, E>>>>,
    stream: Observable<T, E>,
}

impl<S, T, E> TrySharedReplay<S, T, E>
where
    S: Stream<Item = Result<T, E>>,
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
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

impl<S: Stream, T, E> TrySharedReplay<S, T, E> {
    fn lock(&self) -> MutexGuard<'_, ShareableSource<S, ReplaySubject<T, E>>> {
        self.source.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S, T, E> Clone for TrySharedReplay<S, T, E>
where
    S: Stream<Item = Result<T, E>>,
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        let stream = self.lock().observe();

        Self {
            source: Arc::clone(&self.source),
            stream,
        }
    }
}

impl<S, T, E> Stream for TrySharedReplay<S, T, E>
where
    S: Stream<Item = Result<T, E>>,
{
    type Item = Result<Event<T>, Arc<E>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        this.lock().poll_source(cx, |subject, item| match item {
            Ok(value) => {
                subject.send(value);

                false
            }
            Err(error) => {
                subject.send_completion(Terminal::error(error));

                true
            }
        });

        this.stream.poll_next_unpin(cx)
    }
}

impl<S, T, E> FusedStream for TrySharedReplay<S, T, E>
where
    S: Stream<Item = Result<T, E>>,
{
    fn is_terminated(&self) -> bool {
        self.stream.is_terminated()
    }
}
