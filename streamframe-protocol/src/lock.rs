//! Mutual exclusion around a framer
//!
//! Framers are single-owner state machines. When several tasks or threads
//! must feed the same stream, wrap the framer in [`Locked`] and share a
//! reference; every call runs with the mutex held, so a sequence fed in one
//! call is never interleaved with another caller's characters.

use alloc::vec::Vec;
use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::framer::Framer;

/// A framer guarded by a blocking mutex
///
/// `M` selects the mutex flavour, e.g. `CriticalSectionRawMutex` when the
/// framer is shared across threads or `NoopRawMutex` for a single thread.
pub struct Locked<M: RawMutex, F> {
    inner: Mutex<M, RefCell<F>>,
}

impl<M: RawMutex, F> Locked<M, F> {
    /// Wrap a framer
    pub fn new(framer: F) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(framer)),
        }
    }

    /// Run `f` with exclusive access to the framer
    pub fn with<R>(&self, f: impl FnOnce(&mut F) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Unwrap the framer
    pub fn into_inner(self) -> F {
        self.inner.into_inner().into_inner()
    }
}

impl<M: RawMutex, F: Framer> Locked<M, F> {
    /// Feed a single character under the lock
    pub fn feed_char(&self, ch: char) -> Option<F::Output> {
        self.with(|framer| framer.feed_char(ch))
    }

    /// Feed a whole sequence under one lock acquisition
    pub fn feed_sequence<I>(&self, chs: I) -> Vec<F::Output>
    where
        I: IntoIterator<Item = char>,
    {
        self.with(|framer| framer.feed_sequence(chs))
    }

    /// Reset the framer under the lock
    pub fn reset(&self) {
        self.with(|framer| framer.reset())
    }
}

impl<M: RawMutex, F: Framer> Framer for Locked<M, F> {
    type Output = F::Output;

    fn feed_char(&mut self, ch: char) -> Option<Self::Output> {
        self.inner.get_mut().get_mut().feed_char(ch)
    }

    fn feed_sequence<I>(&mut self, chs: I) -> Vec<Self::Output>
    where
        I: IntoIterator<Item = char>,
    {
        self.inner.get_mut().get_mut().feed_sequence(chs)
    }

    fn reset(&mut self) {
        self.inner.get_mut().get_mut().reset()
    }
}

impl<M: RawMutex, F: Framer> Framer for &Locked<M, F> {
    type Output = F::Output;

    fn feed_char(&mut self, ch: char) -> Option<Self::Output> {
        Locked::feed_char(*self, ch)
    }

    fn feed_sequence<I>(&mut self, chs: I) -> Vec<Self::Output>
    where
        I: IntoIterator<Item = char>,
    {
        Locked::feed_sequence(*self, chs)
    }

    fn reset(&mut self) {
        Locked::reset(*self)
    }
}
