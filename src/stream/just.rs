use std::{
    pin::Pin,
    task::{Context, Poll},
};

use futures::{stream::FusedStream, Stream};

/// Creates a single-shot stream that immediately yields `value`, then
/// completes.
pub fn just<T>(value: T) -> Just<T> {
    Just { value: Some(value) }
}

/// Stream for the [`just`] function.
#[must_use = "streams do nothing unless polled"]
#[derive(Debug, Clone)]
pub struct Just<T> {
    value: Option<T>,
}

impl<T> Unpin for Just<T> {}

impl<T> FusedStream for Just<T> {
    fn is_terminated(&self) -> bool {
        self.value.is_none()
    }
}

impl<T> Stream for Just<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.get_mut().value.take())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.value {
            Some(_) => (1, Some(1)),
            None => (0, Some(0)),
        }
    }
}
