//! Transport over any `std::io::Read`
//!
//! Lets files, stdin, pipes and sockets stand in for a serial port.

use std::io::{self, ErrorKind, Read};

use streamframe_hal::{Port, UartConfig, UartRx};

/// A [`Port`] backed by a reader
///
/// Closing drops the reader; reads after that fail with `NotConnected`.
#[derive(Debug)]
pub struct IoPort<R> {
    reader: Option<R>,
}

impl<R: Read> IoPort<R> {
    /// Wrap an already opened reader
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }

    /// Whether the reader has been released
    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    /// Take back the reader, if still open
    pub fn into_inner(self) -> Option<R> {
        self.reader
    }

    fn reader(&mut self) -> io::Result<&mut R> {
        self.reader
            .as_mut()
            .ok_or_else(|| io::Error::new(ErrorKind::NotConnected, "port is closed"))
    }
}

impl<R: Read> UartRx for IoPort<R> {
    type Error = io::Error;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let reader = self.reader()?;
        loop {
            match reader.read(buf) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }
}

impl<R: Read> Port for IoPort<R> {
    fn validate(&mut self, config: &UartConfig) -> Result<(), Self::Error> {
        if config.baudrate == 0 {
            return Err(io::Error::new(ErrorKind::InvalidInput, "baud rate must be non-zero"));
        }
        self.reader().map(|_| ())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.reader = None;
        Ok(())
    }
}
