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
    /// Stream for the [`try_flat_map`](crate::RxExt::try_flat_map) method.
    #[must_use = "streams do nothing unless polled"]
    pub struct TryFlatMap<S: Stream, St, F> {
        #[pin]
        stream: Fuse<S>,
        #[pin]
        inner: Option<St>,
        f: F,
        done: bool,
    }
}

impl<S: Stream, St, F> TryFlatMap<S, St, F> {
    pub(crate) fn new(stream: S, f: F) -> Self {
        Self {
            stream: stream.fuse(),
            inner: None,
            f,
            done: false,
        }
    }
}

impl<S, St, F, T, U, E> FusedStream for TryFlatMap<S, St, F>
where
    S: Stream<Item = Result<T, E>>,
    St: Stream<Item = Result<U, E>>,
    F: FnMut(T) -> Result<St, E>,
{
    fn is_terminated(&self) -> bool {
        self.done || (self.stream.is_terminated() && self.inner.is_none())
    }
}

impl<S, St, F, T, U, E> Stream for TryFlatMap<S, St, F>
where
    S: Stream<Item = Result<T, E>>,
    St: Stream<Item = Result<U, E>>,
    F: FnMut(T) -> Result<St, E>,
{
    type Item = Result<U, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        loop {
            if let Some(inner) = this.inner.as_mut().as_pin_mut() {
                match ready!(inner.poll_next(cx)) {
                    Some(Ok(value)) => return Poll::Ready(Some(Ok(value))),
                    Some(Err(error)) => {
                        *this.done = true;

                        return Poll::Ready(Some(Err(error)));
                    }
                    None => this.inner.set(None),
                }
            } else {
                match ready!(this.stream.as_mut().poll_next(cx)) {
                    Some(Ok(value)) => match (this.f)(value) {
                        Ok(inner) => this.inner.set(Some(inner)),
                        Err(error) => {
                            *this.done = true;

                            return Poll::Ready(Some(Err(error)));
                        }
                    },
                    Some(Err(error)) => {
                        *this.done = true;

                        return Poll::Ready(Some(Err(error)));
                    }
                    None => return Poll::Ready(None),
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, None)
        }
    }
}

#[cfg(test)]
mod test {
    use futures::{executor::block_on, stream, StreamExt};

    use crate::RxExt;

    #[test]
    fn flattens_inner_streams_in_sequence() {
        block_on(async {
            let stream = stream::iter([Ok::<_, &str>(1), Ok(2)]);
            let all_events = stream
                .try_flat_map(|i| Ok(stream::iter([Ok::<_, &str>(i * 10), Ok(i * 10 + 1)])))
                .collect::<Vec<_>>()
                .await;

            assert_eq!(all_events, [Ok(10), Ok(11), Ok(20), Ok(21)]);
        });
    }

    #[test]
    fn a_failing_transform_ends_the_stream() {
        block_on(async {
            let stream = stream::iter([Ok::<_, &str>(1), Ok(2), Ok(3)]);
            let all_events = stream
                .try_flat_map(|i| {
                    if i == 2 {
                        Err("bad")
                    } else {
                        Ok(stream::iter([Ok::<_, &str>(i * 10)]))
                    }
                })
                .collect::<Vec<_>>()
                .await;

            assert_eq!(all_events, [Ok(10), Err("bad")]);
        });
    }

    #[test]
    fn an_inner_error_ends_the_stream() {
        block_on(async {
            let stream = stream::iter([Ok::<_, &str>(1), Ok(2)]);
            let all_events = stream
                .try_flat_map(|i| Ok(stream::iter([Ok::<_, &str>(i * 10), Err("inner")])))
                .collect::<Vec<_>>()
                .await;

            assert_eq!(all_events, [Ok(10), Err("inner")]);
        });
    }
}
