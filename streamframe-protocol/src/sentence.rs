//! Checksum-framed sentence framing.
//!
//! Sentence format:
//! - `$` starts a sentence and clears anything collected so far
//! - header and fields, separated by `,`
//! - `*` ends the fields
//! - two checksum characters complete the sentence
//!
//! ```text
//! $GTIMU,100,2.5*5A
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::Serialize;

use crate::checksum::{AcceptAll, ChecksumPolicy};
use crate::framer::Framer;

/// Framer states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SentenceState {
    /// Waiting for `$`
    Idle,
    /// Collecting header and fields
    Collecting,
    /// Got `*`, waiting for the first checksum character
    AwaitingChecksum1,
    /// Waiting for the second checksum character
    AwaitingChecksum2,
}

/// Character classes that drive the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// `$`
    Dollar,
    /// `*`
    Asterisk,
    /// Anything else
    Data,
}

impl Trigger {
    /// Classify a character
    pub fn classify(ch: char) -> Self {
        match ch {
            '$' => Trigger::Dollar,
            '*' => Trigger::Asterisk,
            _ => Trigger::Data,
        }
    }
}

impl SentenceState {
    /// Process a trigger and return the next state
    ///
    /// Returns `None` when the trigger is not valid in this state; the
    /// framer treats that as a resync back to [`SentenceState::Idle`].
    pub fn transition(self, trigger: Trigger) -> Option<Self> {
        use SentenceState::*;
        use Trigger::*;

        match (self, trigger) {
            // `$` restarts from anywhere
            (_, Dollar) => Some(Collecting),

            (Collecting, Data) => Some(Collecting),
            (Collecting, Asterisk) => Some(AwaitingChecksum1),

            (AwaitingChecksum1, Data) => Some(AwaitingChecksum2),
            (AwaitingChecksum2, Data) => Some(Idle),

            // Idle data, and `*` anywhere but Collecting
            _ => None,
        }
    }
}

/// A sentence split into its parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedSentence {
    /// First field including the leading `$`, e.g. `$GTIMU`
    pub header: String,
    /// Remaining comma-separated fields, in order
    pub fields: Vec<String>,
    /// Text after `*`
    pub checksum: String,
}

impl ParsedSentence {
    /// Split raw sentence text
    ///
    /// The checksum is the text between the first `*` and the next `*` (or
    /// the end); the part before the first `*` is split on `,` into header
    /// and fields. Never fails: missing parts come back empty.
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split('*');
        let content = parts.next().unwrap_or_default();
        let checksum = parts.next().unwrap_or_default();

        let mut fields = content.split(',');
        let header = fields.next().unwrap_or_default();

        Self {
            header: header.to_string(),
            fields: fields.map(ToString::to_string).collect(),
            checksum: checksum.to_string(),
        }
    }

    /// Field at `index` (0 is the first field after the header)
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Text covered by the checksum: everything between `$` and `*`
    pub fn body(&self) -> String {
        let header = self.header.strip_prefix('$').unwrap_or(&self.header);
        let mut body = String::from(header);
        for field in &self.fields {
            body.push(',');
            body.push_str(field);
        }
        body
    }
}

/// Incremental framer for `$...*CC` sentences
///
/// Completed sentences are passed through a [`ChecksumPolicy`]; rejected
/// sentences are dropped silently.
#[derive(Debug, Clone)]
pub struct SentenceFramer<C = AcceptAll> {
    state: SentenceState,
    buffer: String,
    checksum: C,
}

impl Default for SentenceFramer<AcceptAll> {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceFramer<AcceptAll> {
    /// Create a framer that accepts every completed sentence
    pub fn new() -> Self {
        Self::with_checksum(AcceptAll)
    }
}

impl<C> SentenceFramer<C> {
    /// Create a framer that validates sentences with `checksum`
    pub fn with_checksum(checksum: C) -> Self {
        Self {
            state: SentenceState::Idle,
            buffer: String::new(),
            checksum,
        }
    }

    /// Current state
    pub fn state(&self) -> SentenceState {
        self.state
    }

    /// Text collected since the last `$`
    ///
    /// Not cleared when a sentence completes; only the next `$` clears it.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// The checksum policy in use
    pub fn checksum_policy(&self) -> &C {
        &self.checksum
    }
}

impl<C: ChecksumPolicy> Framer for SentenceFramer<C> {
    type Output = ParsedSentence;

    fn feed_char(&mut self, ch: char) -> Option<ParsedSentence> {
        let trigger = Trigger::classify(ch);
        let previous = self.state;

        self.state = match previous.transition(trigger) {
            Some(next) => {
                if trigger == Trigger::Dollar {
                    self.buffer.clear();
                }
                next
            }
            None => SentenceState::Idle,
        };
        self.buffer.push(ch);

        // Only the second checksum character completes a sentence. Forced
        // resets and data while idle never re-parse the stale buffer.
        if previous != SentenceState::AwaitingChecksum2 || self.state != SentenceState::Idle {
            return None;
        }

        let sentence = ParsedSentence::parse(&self.buffer);
        self.checksum.accept(&sentence).then_some(sentence)
    }

    fn reset(&mut self) {
        self.state = SentenceState::Idle;
        self.buffer.clear();
    }
}
