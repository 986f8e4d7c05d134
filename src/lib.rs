//! GDEP073E01 Multi-Color E-Paper Display Driver
//!
//! A driver for the 7.3" GDEP073E01 six-color (Spectra) e-paper panel and its
//! earlier seven-color ACeP revision.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Panel profiles for normal, fast and 7-color initialization
//! - 4-bit and 3-bit packed framebuffers with injectable palettes
//! - Chunked frame transfer and bounded busy waits
//! - Deep sleep and wake
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use gdep073e01::{Builder, Color, Dimensions, Display, FrameBuffer, Interface, Profile};
//!
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let busy = MockPin;
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, dc, rst, busy);
//! let config = match Builder::new()
//!     .dimensions(Dimensions::GDEP073E01)
//!     .profile(Profile::GDEP073E01)
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(interface, config);
//! let _ = display.initialize(&mut delay);
//!
//! let mut frame = match FrameBuffer::new_alloc(800, 480, display.codec()) {
//!     Some(frame) => frame,
//!     None => return,
//! };
//! frame.fill(Color::White);
//! let _ = frame.set_pixel(10, 10, Color::Red);
//!
//! let _ = display.display_frame(frame.as_bytes(), &mut delay);
//! let _ = display.sleep(&mut delay);
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Busy-line synchronization
pub mod busy;
/// Packed pixel codec
pub mod codec;
/// Color types for multi-color e-paper panels
pub mod color;
/// Panel command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Packed frame buffer
pub mod framebuffer;
/// Hardware interface abstraction
pub mod interface;
/// Panel profiles
pub mod profile;
/// Panel register sequencing
pub mod sequencer;

#[cfg(test)]
mod mock;

pub use busy::{BusyPolarity, POLL_INTERVAL_MS, SyncResult};
pub use codec::{CodecError, NibbleOrder, PixelCodec, PixelFormat};
pub use color::{Color, Palette};
pub use config::{Builder, Config, Dimensions, PinAssignment};
pub use display::{Display, PowerMode, State};
pub use error::{BuilderError, Error};
pub use framebuffer::FrameBuffer;
pub use interface::InterfaceError;
pub use interface::{DEFAULT_MAX_TRANSFER, DisplayInterface, Interface, Line};
pub use profile::{InitStep, Profile, RefreshSequence, StepData, Timing};
