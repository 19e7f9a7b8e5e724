use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    task::{Context, Poll, Waker},
};

use super::{
    demand::Demand,
    event::Event,
    subscriber::{Subscriber, Subscription},
    terminal::Terminal,
};

/// Per-observer buffer between a subject's push side and a polled stream.
///
/// Values accumulate until the stream side drains them; the terminal slot is
/// written once and, if it carries an error, that error is yielded exactly
/// once before the stream ends.
pub(crate) struct Controller<T, E> {
    buffer: VecDeque<Event<T>>,
    terminal: Option<Terminal<E>>,
    failed: bool,
    waker: Option<Waker>,
}

impl<T, E> Controller<T, E> {
    pub(crate) fn new() -> Self {
        Self {
            buffer: VecDeque::new(),
            terminal: None,
            failed: false,
            waker: None,
        }
    }

    pub(crate) fn push(&mut self, value: Event<T>) {
        self.buffer.push_back(value);
        self.wake();
    }

    pub(crate) fn close(&mut self, terminal: Terminal<E>) {
        if self.terminal.is_none() {
            self.terminal = Some(terminal);
        }

        self.wake();
    }

    pub(crate) fn next(&mut self, cx: &mut Context<'_>) -> Poll<Option<Result<Event<T>, Arc<E>>>> {
        if let Some(value) = self.buffer.pop_front() {
            return Poll::Ready(Some(Ok(value)));
        }

        match &self.terminal {
            Some(Terminal::Completed) => Poll::Ready(None),
            Some(Terminal::Error(error)) => {
                if self.failed {
                    Poll::Ready(None)
                } else {
                    self.failed = true;
                    Poll::Ready(Some(Err(Arc::clone(error))))
                }
            }
            None => {
                self.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.buffer.is_empty()
            && match &self.terminal {
                Some(Terminal::Completed) => true,
                Some(Terminal::Error(_)) => self.failed,
                None => false,
            }
    }

    fn wake(&mut self) {
        if let Some(waker) = self.waker.take() {
            waker.wake();
        }
    }
}

/// Subscriber half of [`Observable`](super::observable::Observable): requests
/// unbounded demand up front and buffers everything for the stream side.
pub(crate) struct ControllerSubscriber<T, E> {
    pub(crate) controller: Arc<Mutex<Controller<T, E>>>,
}

impl<T, E> ControllerSubscriber<T, E> {
    fn lock(&self) -> MutexGuard<'_, Controller<T, E>> {
        self.controller.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, E> Subscriber for ControllerSubscriber<T, E> {
    type Item = T;
    type Failure = E;

    fn on_subscribe(&mut self, subscription: Subscription) {
        subscription.request(Demand::UNLIMITED);
    }

    fn on_value(&mut self, value: Event<T>) -> Demand {
        self.lock().push(value);

        Demand::NONE
    }

    fn on_terminal(&mut self, terminal: Terminal<E>) {
        self.lock().close(terminal);
    }
}
