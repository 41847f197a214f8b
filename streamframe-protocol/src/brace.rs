//! Brace-delimited message framing.
//!
//! Collects characters from the first `{` until the matching `}` brings the
//! nesting depth back to zero, then decodes the collected span as JSON.
//! Braces inside string literals are counted like any other brace; the
//! framer never scans string contents.

use alloc::string::{String, ToString};
use core::fmt;
use core::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::framer::Framer;

/// Framer states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BraceState {
    /// Outside any message; everything but `{` is discarded
    AwaitingStart,
    /// Inside a message, collecting until depth returns to zero
    AccumulatingBody,
}

/// A brace-balanced span that did not decode
///
/// Scoped to one message: the framer has already returned to
/// [`BraceState::AwaitingStart`] when this is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    message: String,
    line: usize,
    column: usize,
    text: String,
}

impl DecodeError {
    fn new(err: &serde_json::Error, text: String) -> Self {
        Self {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
            text,
        }
    }

    /// Decoder's description of the failure
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 1-based line of the failure within the span
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the failure within the span
    pub fn column(&self) -> usize {
        self.column
    }

    /// The full brace-balanced span that was rejected
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "undecodable message `{}`: {}", self.text, self.message)
    }
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for DecodeError {}

#[cfg(feature = "defmt")]
impl defmt::Format for DecodeError {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "DecodeError(line {}, column {}, {=str})",
            self.line,
            self.column,
            self.message.as_str()
        );
    }
}

/// Incremental framer for brace-delimited JSON messages
///
/// Generic over the decoded type; by default every message decodes into a
/// [`serde_json::Value`].
#[derive(Debug, Clone)]
pub struct BraceFramer<T = Value> {
    state: BraceState,
    buffer: String,
    depth: usize,
    _decoded: PhantomData<fn() -> T>,
}

impl<T> Default for BraceFramer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BraceFramer<T> {
    /// Create a new framer awaiting the first `{`
    pub fn new() -> Self {
        Self {
            state: BraceState::AwaitingStart,
            buffer: String::new(),
            depth: 0,
            _decoded: PhantomData,
        }
    }

    /// Current state
    pub fn state(&self) -> BraceState {
        self.state
    }

    /// Number of unmatched `{` in the current message
    ///
    /// Zero exactly when the framer is awaiting a start.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Text collected for the message in progress
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    fn open(&mut self, ch: char) {
        self.buffer.push(ch);
        self.depth += 1;
        self.state = BraceState::AccumulatingBody;
    }
}

impl<T: DeserializeOwned> BraceFramer<T> {
    fn decode(&mut self) -> Result<T, DecodeError> {
        let text = core::mem::take(&mut self.buffer);
        serde_json::from_str(&text).map_err(|e| DecodeError::new(&e, text))
    }
}

impl<T: DeserializeOwned> Framer for BraceFramer<T> {
    type Output = Result<T, DecodeError>;

    fn feed_char(&mut self, ch: char) -> Option<Self::Output> {
        match (self.state, ch) {
            (BraceState::AwaitingStart, '{') => {
                // Resynchronize: nothing was in progress
                self.buffer.clear();
                self.depth = 0;
                self.open(ch);
                None
            }
            (BraceState::AccumulatingBody, '{') => {
                self.open(ch);
                None
            }
            (BraceState::AccumulatingBody, '}') => {
                self.buffer.push(ch);
                self.depth -= 1;
                if self.depth > 0 {
                    return None;
                }
                self.state = BraceState::AwaitingStart;
                Some(self.decode())
            }
            (BraceState::AccumulatingBody, _) => {
                self.buffer.push(ch);
                None
            }
            // Stray closers and noise between messages
            (BraceState::AwaitingStart, _) => None,
        }
    }

    fn reset(&mut self) {
        self.state = BraceState::AwaitingStart;
        self.buffer.clear();
        self.depth = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;
    use serde_json::json;

    fn values(results: Vec<Result<Value, DecodeError>>) -> Vec<Value> {
        results.into_iter().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_nested_then_flat() {
        let mut framer = BraceFramer::<Value>::new();
        let out = values(framer.feed_str(r#"{"a":{"b":1}}{"c":2}"#));

        assert_eq!(out, vec![json!({"a": {"b": 1}}), json!({"c": 2})]);
        assert_eq!(framer.state(), BraceState::AwaitingStart);
        assert_eq!(framer.depth(), 0);
    }

    #[test]
    fn test_garbage_prefix_discarded() {
        let mut framer = BraceFramer::<Value>::new();
        let out = values(framer.feed_str(r#"garbage{"x":1}"#));
        assert_eq!(out, vec![json!({"x": 1})]);
    }

    #[test]
    fn test_stray_closers_ignored() {
        let mut framer = BraceFramer::<Value>::new();
        assert!(framer.feed_str("}}} }\n}").is_empty());
        assert_eq!(framer.state(), BraceState::AwaitingStart);
        assert_eq!(framer.depth(), 0);
        assert!(framer.buffered().is_empty());

        let out = values(framer.feed_str(r#"{"ok":true}"#));
        assert_eq!(out, vec![json!({"ok": true})]);
    }

    #[test]
    fn test_decode_error_is_scoped() {
        let mut framer = BraceFramer::<Value>::new();
        let out = framer.feed_str(r#"{invalid json}{"x":1}"#);

        assert_eq!(out.len(), 2);
        let err = out[0].clone().unwrap_err();
        assert_eq!(err.text(), "{invalid json}");
        assert_eq!(err.line(), 1);
        assert!(!err.message().is_empty());
        assert_eq!(out[1].clone().unwrap(), json!({"x": 1}));
    }

    #[test]
    fn test_trailing_comma_rejected() {
        let mut framer = BraceFramer::<Value>::new();
        let out = framer.feed_str(r#"{"a":1,}"#);
        assert_eq!(out.len(), 1);
        assert!(out[0].is_err());
        assert_eq!(framer.state(), BraceState::AwaitingStart);
    }

    #[test]
    fn test_single_char_returns_on_closing_brace_only() {
        let mut framer = BraceFramer::<Value>::new();
        for ch in r#"{"k":[1,2]"#.chars() {
            assert!(framer.feed_char(ch).is_none());
        }
        assert_eq!(framer.depth(), 1);
        assert_eq!(framer.buffered(), r#"{"k":[1,2]"#);

        let value = framer.feed_char('}').unwrap().unwrap();
        assert_eq!(value, json!({"k": [1, 2]}));
        assert!(framer.buffered().is_empty());
    }

    #[test]
    fn test_whitespace_inside_message_preserved() {
        let mut framer = BraceFramer::<Value>::new();
        let out = values(framer.feed_str("{ \"s\" : \"a b\" ,\r\n \"n\" : -1.5 }"));
        assert_eq!(out, vec![json!({"s": "a b", "n": -1.5})]);
    }

    #[test]
    fn test_brace_inside_string_is_counted() {
        // A closer inside a string literal ends the span early
        let mut framer = BraceFramer::<Value>::new();
        let out = framer.feed_str(r#"{"s":"}"}{"x":1}"#);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].clone().unwrap_err().text(), r#"{"s":"}"#);
        assert_eq!(out[1].clone().unwrap(), json!({"x": 1}));
    }

    #[test]
    fn test_typed_decoding() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Status {
            mode: u8,
            armed: bool,
        }

        let mut framer = BraceFramer::<Status>::new();
        let out = framer.feed_str(r#"{"mode":3,"armed":false}{"mode":"x"}"#);

        assert_eq!(out[0], Ok(Status { mode: 3, armed: false }));
        assert!(out[1].is_err());
    }

    #[test]
    fn test_reset_drops_partial_message() {
        let mut framer = BraceFramer::<Value>::new();
        framer.feed_str(r#"{"a":{"#);
        assert_eq!(framer.depth(), 2);

        framer.reset();
        assert_eq!(framer.state(), BraceState::AwaitingStart);
        assert_eq!(framer.depth(), 0);

        // The leftover closers from the dropped message are now stray
        let out = values(framer.feed_str(r#"}}{"b":2}"#));
        assert_eq!(out, vec![json!({"b": 2})]);
    }

    const STREAM: &str = r#"noise{"a":{"b":[1,2,{"c":null}]}} junk } {"d":"e f"}{"g":true}"#;

    proptest! {
        #[test]
        fn prop_chunk_invariance(cuts in proptest::collection::vec(0..STREAM.len(), 0..8)) {
            let mut whole = BraceFramer::<Value>::new();
            let expected = whole.feed_str(STREAM);

            let mut cuts = cuts;
            cuts.push(STREAM.len());
            cuts.sort_unstable();

            let mut chunked = BraceFramer::<Value>::new();
            let mut actual = Vec::new();
            let mut start = 0;
            for cut in cuts {
                actual.extend(chunked.feed_str(&STREAM[start..cut]));
                start = cut;
            }

            let mut single = BraceFramer::<Value>::new();
            let one_by_one: Vec<_> = STREAM.chars().filter_map(|ch| single.feed_char(ch)).collect();

            prop_assert_eq!(&actual, &expected);
            prop_assert_eq!(&one_by_one, &expected);
        }

        #[test]
        fn prop_stray_closers_never_emit(n in 0usize..64) {
            let mut framer = BraceFramer::<Value>::new();
            let closers: String = core::iter::repeat('}').take(n).collect();
            prop_assert!(framer.feed_str(&closers).is_empty());
            prop_assert_eq!(framer.depth(), 0);
            prop_assert_eq!(framer.state(), BraceState::AwaitingStart);
        }

        #[test]
        fn prop_depth_matches_state(input in "[{}a ]{0,40}") {
            let mut framer = BraceFramer::<Value>::new();
            for ch in input.chars() {
                let _ = framer.feed_char(ch);
                let idle = framer.state() == BraceState::AwaitingStart;
                prop_assert_eq!(framer.depth() == 0, idle);
            }
        }
    }
}
