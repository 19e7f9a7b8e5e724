use std::{
    pin::Pin,
    task::{Context, Poll},
};

use futures::{stream::Fuse, Stream, StreamExt};

use crate::stream::{observable::Observable, terminal::Terminal};

use super::Subject;

/// The single upstream connection of a shared stream: one fused source
/// feeding one subject. Goes inert once the source's terminal has been
/// forwarded; the subject assumes exactly one producer.
pub(crate) struct ShareableSource<S: Stream, Sub: Subject> {
    stream: Pin<Box<Fuse<S>>>,
    subject: Sub,
    done: bool,
}

impl<S: Stream, Sub: Subject> ShareableSource<S, Sub> {
    pub(crate) fn new(stream: S, subject: Sub) -> Self {
        Self {
            stream: Box::pin(stream.fuse()),
            subject,
            done: false,
        }
    }

    pub(crate) fn observe(&self) -> Observable<Sub::Item, Sub::Failure>
    where
        Sub::Item: Send + Sync + 'static,
        Sub::Failure: Send + Sync + 'static,
    {
        self.subject.observe()
    }

    /// Pulls at most one ready item out of the source and forwards it.
    /// `forward` returns whether the item was terminal for the subject.
    pub(crate) fn poll_source<F>(&mut self, cx: &mut Context<'_>, forward: F)
    where
        F: FnOnce(&Sub, S::Item) -> bool,
    {
        if self.done {
            return;
        }

        match self.stream.poll_next_unpin(cx) {
            Poll::Ready(Some(item)) => self.done = forward(&self.subject, item),
            Poll::Ready(None) => {
                self.subject.send_completion(Terminal::Completed);
                self.done = true;
            }
            Poll::Pending => {}
        }
    }
}
