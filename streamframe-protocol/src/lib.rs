//! Incremental message framers
//!
//! This crate turns a character stream into discrete messages. Characters
//! may arrive in chunks of any size; each framer keeps its own parse state
//! between calls and recovers from malformed input without losing
//! synchronization with the stream.
//!
//! # Grammars
//!
//! Brace-delimited structured data, decoded as JSON once nesting balances:
//! ```text
//! garbage {"a":{"b":1}} {"c":2}
//!         └──── one ────┘└ two ┘
//! ```
//!
//! Checksum-framed sentences with comma-separated fields:
//! ```text
//! $GTIMU,100,2.5*5A
//! └hdr─┘ └fields┘ └┴ checksum
//! ```
//!
//! Both framers are pure state machines with no I/O. Feed them from a
//! transport, wrap them in [`Locked`] to share one across threads, and hand
//! their output to [`records`] for device-specific decoding.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod brace;
pub mod checksum;
pub mod framer;
pub mod lock;
pub mod records;
pub mod sentence;

pub use brace::{BraceFramer, BraceState, DecodeError};
pub use checksum::{xor_checksum, AcceptAll, ChecksumPolicy, RejectAll, XorChecksum};
pub use framer::Framer;
pub use lock::Locked;
pub use records::{ImuRecord, InsRecord, PositionRecord, RecordError};
pub use sentence::{ParsedSentence, SentenceFramer, SentenceState, Trigger};
