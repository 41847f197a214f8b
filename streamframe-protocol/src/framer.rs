//! The contract shared by every framer.

use alloc::vec::Vec;

/// A stateful parser that turns characters into complete messages
///
/// Implementations keep all parse state between calls, so a message may be
/// split across any number of `feed_*` calls.
pub trait Framer {
    /// What a completed message looks like to the caller
    type Output;

    /// Feed a single character
    ///
    /// Returns the message completed by this character, if any.
    fn feed_char(&mut self, ch: char) -> Option<Self::Output>;

    /// Feed a sequence of characters
    ///
    /// Returns every message completed by the sequence, in completion order.
    /// This is exactly a fold over [`Framer::feed_char`].
    fn feed_sequence<I>(&mut self, chs: I) -> Vec<Self::Output>
    where
        I: IntoIterator<Item = char>,
        Self: Sized,
    {
        chs.into_iter().filter_map(|ch| self.feed_char(ch)).collect()
    }

    /// Feed every character of a string slice
    fn feed_str(&mut self, text: &str) -> Vec<Self::Output>
    where
        Self: Sized,
    {
        self.feed_sequence(text.chars())
    }

    /// Drop any partial message and return to the initial state
    fn reset(&mut self);
}

impl<F: Framer + ?Sized> Framer for &mut F {
    type Output = F::Output;

    fn feed_char(&mut self, ch: char) -> Option<Self::Output> {
        (**self).feed_char(ch)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
