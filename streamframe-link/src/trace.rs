//! Logging wrapper for framers

use std::fmt::Debug;

use log::{debug, trace};
use streamframe_protocol::Framer;

/// Logs every message its inner framer completes
///
/// Output is unchanged; messages go to the `log` facade at debug level,
/// tagged with the wrapper's label.
#[derive(Debug, Clone)]
pub struct Traced<F> {
    label: &'static str,
    inner: F,
    emitted: u64,
}

impl<F> Traced<F> {
    /// Wrap `inner`, tagging log lines with `label`
    pub fn new(label: &'static str, inner: F) -> Self {
        Self {
            label,
            inner,
            emitted: 0,
        }
    }

    /// Messages completed so far
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// The wrapped framer
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Unwrap the framer
    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F> Framer for Traced<F>
where
    F: Framer,
    F::Output: Debug,
{
    type Output = F::Output;

    fn feed_char(&mut self, ch: char) -> Option<Self::Output> {
        let output = self.inner.feed_char(ch)?;
        self.emitted += 1;
        debug!("{} #{}: {:?}", self.label, self.emitted, output);
        Some(output)
    }

    fn reset(&mut self) {
        trace!("{}: reset", self.label);
        self.inner.reset();
    }
}
