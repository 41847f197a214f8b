//! UART serial communication abstractions
//!
//! Provides the receive side of a serial link and its lifecycle. Framers
//! never touch these traits directly; a link owns the port and feeds
//! decoded characters into a framer.

/// UART receiver
///
/// Blocking trait for receiving data from a serial interface.
pub trait UartRx {
    /// Error type for receive operations
    type Error: core::fmt::Debug;

    /// Read available data from the UART
    ///
    /// Returns the number of bytes written into `buf`. A return of `Ok(0)`
    /// means the stream has ended and no more bytes will arrive.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Read a single byte from the UART
    ///
    /// Returns `Ok(None)` at end of stream.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut buf = [0u8; 1];
        match self.read_blocking(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }
}

/// Connection lifecycle
///
/// A port is opened by whoever constructs it; the link only checks that it
/// is usable and closes it. Closing an already closed port succeeds.
pub trait Port: UartRx {
    /// Check that the underlying connection is ready to be read
    fn validate(&mut self, _config: &UartConfig) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Release the underlying connection
    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// UART configuration
///
/// Frames are always 8N1; only the line rate varies between devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self { baudrate: 115200 }
    }
}
