use std::sync::Arc;

use futures::Stream;

use as_void::AsVoid;
use filter_by::FilterBy;
use replace_error::{ReplaceError, ReplaceErrorWith};
use share_replay::SharedReplay;
use try_flat_map::TryFlatMap;
use try_share_replay::TrySharedReplay;

use crate::stream::event::Event;

pub mod as_void;
pub mod filter_by;
pub mod replace_error;
pub mod share_replay;
pub mod try_flat_map;
pub mod try_share_replay;

impl<T: ?Sized> RxExt for T where T: Stream {}
pub trait RxExt: Stream {
    /// Erases the item type, carrying only the completion state downstream.
    fn as_void(self) -> AsVoid<Self>
    where
        Self: Sized,
    {
        assert_stream::<(), _>(AsVoid::new(self))
    }

    /// Republishes only the items whose projected `field` equals `value`.
    fn filter_by<K, F>(self, field: F, value: K) -> FilterBy<Self, F, K>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> K,
        K: PartialEq,
    {
        assert_stream::<Self::Item, _>(FilterBy::new(self, field, value))
    }

    /// Replaces the first error for which `handler` returns `true` with a
    /// final `output` value; any other error is republished. Either way the
    /// stream completes at the first error.
    fn replace_error_with<T, E, F>(self, output: T, handler: F) -> ReplaceErrorWith<Self, T, F>
    where
        Self: Stream<Item = Result<T, E>> + Sized,
        F: FnMut(&E) -> bool,
    {
        assert_stream::<Result<T, E>, _>(ReplaceErrorWith::new(self, output, handler))
    }

    /// Replaces `error`, if it ever arrives, with a final `output` value.
    fn replace_error<T, E>(self, error: E, output: T) -> ReplaceError<Self, T, E>
    where
        Self: Stream<Item = Result<T, E>> + Sized,
        E: PartialEq,
    {
        assert_stream::<Result<T, E>, _>(ReplaceError::new(self, error, output))
    }

    /// Maps each `Ok` item through a fallible transform to an inner stream
    /// and flattens the inner streams in sequence. The first error — from the
    /// source, the transform, or an inner stream — ends the output right
    /// after being yielded.
    fn try_flat_map<St, F, T, U, E>(self, f: F) -> TryFlatMap<Self, St, F>
    where
        Self: Stream<Item = Result<T, E>> + Sized,
        St: Stream<Item = Result<U, E>>,
        F: FnMut(T) -> Result<St, E>,
    {
        assert_stream::<Result<U, E>, _>(TryFlatMap::new(self, f))
    }

    /// Shares one subscription to this stream among all clones, replaying at
    /// most `capacity` previously emitted values to each late clone.
    fn share_replay(self, capacity: usize) -> SharedReplay<Self>
    where
        Self: Sized,
        Self::Item: Send + Sync + 'static,
    {
        assert_stream::<Event<Self::Item>, _>(SharedReplay::new(self, capacity))
    }

    /// [`share_replay`](RxExt::share_replay) for fallible streams: an `Err`
    /// item becomes the shared terminal error, delivered to every clone after
    /// its replay.
    fn try_share_replay<T, E>(self, capacity: usize) -> TrySharedReplay<Self, T, E>
    where
        Self: Stream<Item = Result<T, E>> + Sized,
        T: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        assert_stream::<Result<Event<T>, Arc<E>>, _>(TrySharedReplay::new(self, capacity))
    }
}

#[macro_export]
macro_rules! delegate_access_inner {
    ($field:ident, $inner:ty, ($($ind:tt)*)) => {
        /// Acquires a reference to the underlying sink or stream that this combinator is
        /// pulling from.
        pub fn get_ref(&self) -> &$inner {
            (&self.$field) $($ind get_ref())*
        }

        /// Acquires a mutable reference to the underlying sink or stream that this
        /// combinator is pulling from.
        ///
        /// Note that care must be taken to avoid tampering with the state of the
        /// sink or stream which may otherwise confuse this combinator.
        pub fn get_mut(&mut self) -> &mut $inner {
            (&mut self.$field) $($ind get_mut())*
        }

        /// Acquires a pinned mutable reference to the underlying sink or stream that this
        /// combinator is pulling from.
        ///
        /// Note that care must be taken to avoid tampering with the state of the
        /// sink or stream which may otherwise confuse this combinator.
        pub fn get_pin_mut(self: core::pin::Pin<&mut Self>) -> core::pin::Pin<&mut $inner> {
            self.project().$field $($ind get_pin_mut())*
        }

        /// Consumes this combinator, returning the underlying sink or stream.
        ///
        /// Note that this may discard intermediate state of this combinator, so
        /// care should be taken to avoid losing resources when this is called.
        pub fn into_inner(self) -> $inner {
            self.$field $($ind into_inner())*
        }
    }
}

pub(crate) fn assert_stream<T, S>(stream: S) -> S
where
    S: Stream<Item = T>,
{
    stream
}
