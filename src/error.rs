//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display operations
//! - [`CodecError`](crate::codec::CodecError) - Pixel access errors
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! ## Example
//!
//! ```
//! use gdep073e01::{Builder, BuilderError, Dimensions, Profile};
//!
//! // Missing dimensions
//! let result = Builder::new().profile(Profile::GDEP073E01).build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Missing profile
//! let dims = Dimensions::new(800, 480).unwrap();
//! let result = Builder::new().dimensions(dims).build();
//! assert!(matches!(result, Err(BuilderError::MissingProfile)));
//! ```

use crate::codec::CodecError;
use crate::interface::DisplayInterface;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
/// This allows error handling code to match on the underlying hardware error.
/// `Debug` only needs the interface's error type, not the interface itself.
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO)
    ///
    /// Wraps the underlying hardware error together with the command that
    /// was being written (or whose busy wait was running) when it failed.
    Interface {
        /// Opcode in flight, `None` during reset or line setup
        command: Option<u8>,
        /// Underlying hardware error
        source: I::Error,
    },
    /// BUSY did not report ready in time
    ///
    /// The handle stays usable; the caller decides whether to retry.
    Timeout {
        /// Opcode whose completion was awaited, `None` after a reset pulse
        command: Option<u8>,
        /// GPIO number of the busy line, when configured
        busy_gpio: Option<u8>,
        /// Timeout that expired
        timeout_ms: u32,
        /// Time spent waiting
        elapsed_ms: u32,
    },
    /// Frame buffer length does not match the panel
    BufferSizeMismatch {
        /// Expected frame size in bytes
        expected: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// Region is empty, out of bounds, or came with an empty buffer
    InvalidRegion {
        /// X coordinate
        x: u16,
        /// Y coordinate
        y: u16,
        /// Width
        w: u16,
        /// Height
        h: u16,
    },
    /// Pixel access failed
    Codec(CodecError),
    /// Dimensions do not suit the profile's pixel format
    InvalidDimensions {
        /// Width in pixels
        width: u16,
        /// Height in pixels
        height: u16,
    },
    /// Frame allocation failed
    OutOfMemory {
        /// Bytes requested
        requested: usize,
    },
    /// The panel cannot perform this operation
    NotSupported {
        /// Operation name
        operation: &'static str,
    },
    /// Palette codes are wider than a pixel or not distinct
    InvalidPalette,
    /// The panel has not been initialized
    NotInitialized,
}

impl<I: DisplayInterface> core::fmt::Debug for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface { command, source } => f
                .debug_struct("Interface")
                .field("command", command)
                .field("source", source)
                .finish(),
            Self::Timeout {
                command,
                busy_gpio,
                timeout_ms,
                elapsed_ms,
            } => f
                .debug_struct("Timeout")
                .field("command", command)
                .field("busy_gpio", busy_gpio)
                .field("timeout_ms", timeout_ms)
                .field("elapsed_ms", elapsed_ms)
                .finish(),
            Self::BufferSizeMismatch { expected, provided } => f
                .debug_struct("BufferSizeMismatch")
                .field("expected", expected)
                .field("provided", provided)
                .finish(),
            Self::InvalidRegion { x, y, w, h } => f
                .debug_struct("InvalidRegion")
                .field("x", x)
                .field("y", y)
                .field("w", w)
                .field("h", h)
                .finish(),
            Self::Codec(e) => f.debug_tuple("Codec").field(e).finish(),
            Self::InvalidDimensions { width, height } => f
                .debug_struct("InvalidDimensions")
                .field("width", width)
                .field("height", height)
                .finish(),
            Self::OutOfMemory { requested } => f
                .debug_struct("OutOfMemory")
                .field("requested", requested)
                .finish(),
            Self::NotSupported { operation } => f
                .debug_struct("NotSupported")
                .field("operation", operation)
                .finish(),
            Self::InvalidPalette => f.write_str("InvalidPalette"),
            Self::NotInitialized => f.write_str("NotInitialized"),
        }
    }
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface {
                command: Some(command),
                source,
            } => {
                write!(f, "Interface error during command 0x{command:02X}: {source:?}")
            }
            Self::Interface {
                command: None,
                source,
            } => write!(f, "Interface error during reset: {source:?}"),
            Self::Timeout {
                command,
                busy_gpio,
                timeout_ms,
                elapsed_ms,
            } => {
                match command {
                    Some(command) => write!(f, "Busy timeout after command 0x{command:02X}")?,
                    None => write!(f, "Busy timeout after reset")?,
                }
                write!(f, ": {elapsed_ms} ms elapsed, limit {timeout_ms} ms")?;
                if let Some(gpio) = busy_gpio {
                    write!(f, " (busy on GPIO {gpio})")?;
                }
                Ok(())
            }
            Self::BufferSizeMismatch { expected, provided } => {
                write!(
                    f,
                    "Buffer size mismatch: expected {expected} bytes, provided {provided}"
                )
            }
            Self::InvalidRegion { x, y, w, h } => {
                write!(f, "Invalid region: x={x}, y={y}, w={w}, h={h}")
            }
            Self::Codec(e) => write!(f, "Codec error: {e}"),
            Self::InvalidDimensions { width, height } => {
                write!(f, "Invalid dimensions: {width}x{height}")
            }
            Self::OutOfMemory { requested } => {
                write!(f, "Out of memory: could not allocate {requested} bytes")
            }
            Self::NotSupported { operation } => write!(f, "Not supported: {operation}"),
            Self::InvalidPalette => write!(f, "Palette does not fit the pixel format"),
            Self::NotInitialized => write!(f, "Display not initialized"),
        }
    }
}

impl<I: DisplayInterface> core::error::Error for Error<I> {}

impl<I: DisplayInterface> From<CodecError> for Error<I> {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Panel profile was not specified
    ///
    /// [`Builder::profile()`](crate::config::Builder::profile) must be called before building.
    MissingProfile,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width in pixels
        width: u16,
        /// Height in pixels
        height: u16,
    },
    /// Palette codes are wider than the profile's pixel format or two
    /// colors share a code
    InvalidPalette,
    /// Maximum transfer size must be at least one byte
    InvalidTransferSize,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::MissingProfile => write!(f, "Panel profile must be specified"),
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (must be non-zero and fit the pixel format)"
            ),
            Self::InvalidPalette => write!(
                f,
                "Palette codes must fit the pixel format and be distinct"
            ),
            Self::InvalidTransferSize => write!(f, "Maximum transfer size must be non-zero"),
        }
    }
}

impl core::error::Error for BuilderError {}
