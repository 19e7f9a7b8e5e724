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
    /// Stream for the [`replace_error_with`](crate::RxExt::replace_error_with) method.
    #[must_use = "streams do nothing unless polled"]
    pub struct ReplaceErrorWith<S: Stream, T, F> {
        #[pin]
        stream: Fuse<S>,
        output: Option<T>,
        handler: F,
        done: bool,
    }
}

impl<S: Stream, T, F> ReplaceErrorWith<S, T, F> {
    pub(crate) fn new(stream: S, output: T, handler: F) -> Self {
        Self {
            stream: stream.fuse(),
            output: Some(output),
            handler,
            done: false,
        }
    }
}

impl<S, T, E, F> FusedStream for ReplaceErrorWith<S, T, F>
where
    S: Stream<Item = Result<T, E>>,
    F: FnMut(&E) -> bool,
{
    fn is_terminated(&self) -> bool {
        self.done || self.stream.is_terminated()
    }
}

impl<S, T, E, F> Stream for ReplaceErrorWith<S, T, F>
where
    S: Stream<Item = Result<T, E>>,
    F: FnMut(&E) -> bool,
{
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        match ready!(this.stream.as_mut().poll_next(cx)) {
            Some(Ok(value)) => Poll::Ready(Some(Ok(value))),
            Some(Err(error)) => {
                *this.done = true;

                if (this.handler)(&error) {
                    Poll::Ready(this.output.take().map(Ok))
                } else {
                    Poll::Ready(Some(Err(error)))
                }
            }
            None => Poll::Ready(None),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            self.stream.size_hint()
        }
    }
}

pin_project! {
    /// Stream for the [`replace_error`](crate::RxExt::replace_error) method.
    #[must_use = "streams do nothing unless polled"]
    pub struct ReplaceError<S: Stream, T, E> {
        #[pin]
        stream: Fuse<S>,
        error: E,
        output: Option<T>,
        done: bool,
    }
}

impl<S: Stream, T, E> ReplaceError<S, T, E> {
    pub(crate) fn new(stream: S, error: E, output: T) -> Self {
        Self {
            stream: stream.fuse(),
            error,
            output: Some(output),
            done: false,
        }
    }
}

impl<S, T, E> FusedStream for ReplaceError<S, T, E>
where
    S: Stream<Item = Result<T, E>>,
    E: PartialEq,
{
    fn is_terminated(&self) -> bool {
        self.done || self.stream.is_terminated()
    }
}

impl<S, T, E> Stream for ReplaceError<S, T, E>
where
    S: Stream<Item = Result<T, E>>,
    E: PartialEq,
{
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        match ready!(this.stream.as_mut().poll_next(cx)) {
            Some(Ok(value)) => Poll::Ready(Some(Ok(value))),
            Some(Err(error)) => {
                *this.done = true;

                if error == *this.error {
                    Poll::Ready(this.output.take().map(Ok))
                } else {
                    Poll::Ready(Some(Err(error)))
                }
            }
            None => Poll::Ready(None),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            self.stream.size_hint()
        }
    }
}
