//! Checksum policies for completed sentences.
//!
//! A policy decides whether a sentence is handed to the caller. Most links
//! carry no usable checksum, so the default accepts everything; device
//! profiles that do checksum their sentences plug in [`XorChecksum`] or
//! their own closure.

use crate::sentence::ParsedSentence;

/// Decides whether a completed sentence is accepted
pub trait ChecksumPolicy {
    /// Return `true` to emit the sentence, `false` to drop it
    fn accept(&self, sentence: &ParsedSentence) -> bool;
}

impl<F> ChecksumPolicy for F
where
    F: Fn(&ParsedSentence) -> bool,
{
    fn accept(&self, sentence: &ParsedSentence) -> bool {
        self(sentence)
    }
}

/// Accept every sentence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AcceptAll;

impl ChecksumPolicy for AcceptAll {
    fn accept(&self, _sentence: &ParsedSentence) -> bool {
        true
    }
}

/// Reject every sentence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RejectAll;

impl ChecksumPolicy for RejectAll {
    fn accept(&self, _sentence: &ParsedSentence) -> bool {
        false
    }
}

/// The `$...*CC` checksum
///
/// `CC` is two hex digits (either case) equal to the XOR of every character
/// between `$` and `*`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct XorChecksum;

impl ChecksumPolicy for XorChecksum {
    fn accept(&self, sentence: &ParsedSentence) -> bool {
        let digits = sentence.checksum.as_bytes();
        // from_str_radix would also take a leading sign
        if digits.len() != 2 || !digits.iter().all(u8::is_ascii_hexdigit) {
            return false;
        }
        match u8::from_str_radix(&sentence.checksum, 16) {
            Ok(expected) => xor_checksum(&sentence.body()) == expected,
            Err(_) => false,
        }
    }
}

/// XOR of every byte in `body`
pub fn xor_checksum(body: &str) -> u8 {
    body.bytes().fold(0, |acc, byte| acc ^ byte)
}
