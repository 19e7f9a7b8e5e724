use std::{
    pin::Pin,
    task::{Context, Poll},
};

use futures::{
    ready,
    stream::{Fuse, FusedStream},
    Stream, StreamExt,
};
use pin_project_lite::pin_project;

pin_project! {
    /// Stream for the [`filter_by`](crate::RxExt::filter_by) method.
    #[must_use = "streams do nothing unless polled"]
    pub struct FilterBy<S: Stream, F, K> {
        #[pin]
        stream: Fuse<S>,
        field: F,
        value: K,
    }
}

impl<S: Stream, F, K> FilterBy<S, F, K> {
    pub(crate) fn new(stream: S, field: F, value: K) -> Self {
        Self {
            stream: stream.fuse(),
            field,
            value,
        }
    }
}

impl<S: Stream, F, K> FusedStream for FilterBy<S, F, K>
where
    F: FnMut(&S::Item) -> K,
    K: PartialEq,
{
    fn is_terminated(&self) -> bool {
        self.stream.is_terminated()
    }
}

impl<S: Stream, F, K> Stream for FilterBy<S, F, K>
where
    F: FnMut(&S::Item) -> K,
    K: PartialEq,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            match ready!(this.stream.as_mut().poll_next(cx)) {
                Some(item) => {
                    if (this.field)(&item) == *this.value {
                        return Poll::Ready(Some(item));
                    }
                }
                None => return Poll::Ready(None),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.stream.size_hint();

        (0, upper)
    }
}
