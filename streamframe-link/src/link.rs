//! Owned link between a transport and a framer
//!
//! The link owns its port for its whole lifetime: it is opened with a port
//! that has already been constructed, read through [`Link::poll`] or
//! [`Link::run`], and closed explicitly with [`Link::close`].

use std::fmt;

use log::{info, trace, warn};
use streamframe_hal::{Port, UartConfig};
use streamframe_protocol::Framer;

use crate::utf8::Utf8Stream;

/// Buffer size for one transport read
const RX_BUF_SIZE: usize = 256;

/// Link errors
#[derive(Debug)]
pub enum LinkError<E> {
    /// The transport failed; the link stays open and may be polled again
    Transport(E),
    /// The link has been closed
    Closed,
}

impl<E: fmt::Debug> fmt::Display for LinkError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Transport(e) => write!(f, "transport error: {e:?}"),
            LinkError::Closed => write!(f, "link is closed"),
        }
    }
}

impl<E: fmt::Debug> std::error::Error for LinkError<E> {}

/// Result of one poll
#[derive(Debug, Clone, PartialEq)]
pub enum Received<T> {
    /// Messages completed by the bytes just read (possibly none)
    Messages(Vec<T>),
    /// The transport reported end of stream
    EndOfStream,
}

/// A transport and the framer fed from it
pub struct Link<P, F> {
    port: P,
    framer: F,
    decoder: Utf8Stream,
    config: UartConfig,
    open: bool,
}

impl<P: Port, F: Framer> Link<P, F> {
    /// Open a link over `port`
    ///
    /// Fails if the port reports it is not usable with `config`.
    pub fn open(mut port: P, config: UartConfig, framer: F) -> Result<Self, LinkError<P::Error>> {
        port.validate(&config).map_err(|e| {
            warn!("Port rejected configuration: {:?}", e);
            LinkError::Transport(e)
        })?;

        info!("Link opened ({} baud)", config.baudrate);

        Ok(Self {
            port,
            framer,
            decoder: Utf8Stream::new(),
            config,
            open: true,
        })
    }

    /// Whether the link is still open
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Settings the link was opened with
    pub fn config(&self) -> &UartConfig {
        &self.config
    }

    /// The framer
    pub fn framer(&self) -> &F {
        &self.framer
    }

    /// The framer, mutably
    pub fn framer_mut(&mut self) -> &mut F {
        &mut self.framer
    }

    /// Read one chunk and frame it
    ///
    /// A transport error leaves framer state untouched, so a message split
    /// around a failed read still completes once reads succeed again.
    pub fn poll(&mut self) -> Result<Received<F::Output>, LinkError<P::Error>> {
        if !self.open {
            return Err(LinkError::Closed);
        }

        let mut buf = [0u8; RX_BUF_SIZE];
        let n = match self.port.read_blocking(&mut buf) {
            Ok(n) => n,
            Err(e) => {
                warn!("Read error: {:?}", e);
                return Err(LinkError::Transport(e));
            }
        };

        if n == 0 {
            // A dangling partial character may still complete a message
            if let Some(ch) = self.decoder.finish() {
                return Ok(Received::Messages(self.framer.feed_char(ch).into_iter().collect()));
            }
            trace!("End of stream");
            return Ok(Received::EndOfStream);
        }

        trace!("RX: {} bytes", n);
        let text = self.decoder.decode(&buf[..n]);
        Ok(Received::Messages(self.framer.feed_sequence(text.chars())))
    }

    /// Poll until end of stream, handing each message to `handler`
    ///
    /// Returns the number of messages handled. Stops at the first transport
    /// error; the link remains open and `run` may be called again.
    pub fn run(&mut self, mut handler: impl FnMut(F::Output)) -> Result<usize, LinkError<P::Error>> {
        let mut count = 0;
        loop {
            match self.poll()? {
                Received::Messages(messages) => {
                    count += messages.len();
                    messages.into_iter().for_each(&mut handler);
                }
                Received::EndOfStream => return Ok(count),
            }
        }
    }

    /// Close the link and its port
    ///
    /// Any partial message is dropped. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<(), LinkError<P::Error>> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.framer.reset();
        self.decoder.reset();

        self.port.close().map_err(LinkError::Transport)?;
        info!("Link closed");
        Ok(())
    }

    /// Give back the port and framer
    pub fn into_parts(self) -> (P, F) {
        (self.port, self.framer)
    }
}
