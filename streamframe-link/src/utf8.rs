//! Incremental UTF-8 decoding
//!
//! Serial reads split multi-byte characters at arbitrary points. The
//! decoder holds an incomplete trailing sequence until the next chunk
//! arrives; invalid bytes become U+FFFD so the framers keep running.

use std::borrow::Cow;

/// Stateful bytes-to-characters decoder
#[derive(Debug, Clone, Default)]
pub struct Utf8Stream {
    pending: Vec<u8>,
}

impl Utf8Stream {
    /// Create a decoder with nothing pending
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk
    ///
    /// Returns every complete character; an incomplete sequence at the end
    /// of `bytes` is held back for the next call.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let data: Cow<'_, [u8]> = if self.pending.is_empty() {
            Cow::Borrowed(bytes)
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.extend_from_slice(bytes);
            Cow::Owned(joined)
        };

        let mut out = String::with_capacity(data.len());
        let mut rest: &[u8] = &data;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending.extend_from_slice(after);
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush at end of stream
    ///
    /// A sequence still pending can never complete, so it becomes a single
    /// U+FFFD.
    pub fn finish(&mut self) -> Option<char> {
        if self.pending.is_empty() {
            return None;
        }
        self.pending.clear();
        Some(char::REPLACEMENT_CHARACTER)
    }

    /// Number of bytes held back
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drop any pending bytes
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}
