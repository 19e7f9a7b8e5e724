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

use crate::delegate_access_inner;

pin_project! {
    /// Stream for the [`as_void`](crate::RxExt::as_void) method.
    #[must_use = "streams do nothing unless polled"]
    pub struct AsVoid<S: Stream> {
        #[pin]
        stream: Fuse<S>,
    }
}

impl<S: Stream> AsVoid<S> {
    pub(crate) fn new(stream: S) -> Self {
        Self {
            stream: stream.fuse(),
        }
    }

    delegate_access_inner!(stream, S, (.));
}

impl<S: Stream> FusedStream for AsVoid<S> {
    fn is_terminated(&self) -> bool {
        self.stream.is_terminated()
    }
}

impl<S: Stream> Stream for AsVoid<S> {
    type Item = ();

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        let res = ready!(this.stream.as_mut().poll_next(cx));

        Poll::Ready(res.map(|_| ()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stream.size_hint()
    }
}
