//! Host-side plumbing for streamframe framers
//!
//! A [`Link`] owns a transport and a framer. It reads raw bytes, decodes
//! them to characters with [`Utf8Stream`], and feeds the characters to the
//! framer, handing completed messages back to the caller. Configuration
//! comes from a TOML file ([`LinkConfig`]).

#![deny(unsafe_code)]

pub mod config;
pub mod io;
pub mod link;
pub mod trace;
pub mod utf8;

pub use config::{ChecksumMode, ConfigError, DebugConfig, FramingConfig, Grammar, LinkConfig, PortConfig};
pub use io::IoPort;
pub use link::{Link, LinkError, Received};
pub use trace::Traced;
pub use utf8::Utf8Stream;
