//! streamframe Hardware Abstraction Layer
//!
//! This crate defines the transport traits a character source must
//! implement before a framer can be fed from it. Serial ports, sockets and
//! in-memory test doubles all sit behind the same two traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  streamframe-link (owned Link)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  streamframe-hal (this crate - traits)  │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  serial port  │       │ file / stdin  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartRx`] - Receive raw bytes
//! - [`uart::Port`] - Connection lifecycle (validate, close)

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

pub use uart::{Port, UartConfig, UartRx};
