//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for talking to the panel controller over SPI.
//!
//! ## Hardware Requirements
//!
//! The panel requires:
//! - SPI bus (MOSI + SCK) with chip-select managed by the [`SpiDevice`]
//!   (for example `embedded_hal_bus::spi::ExclusiveDevice`)
//! - 3 GPIO pins:
//!   - **DC**: Data/Command select (output, low = command)
//!   - **RST**: Reset (output, active low)
//!   - **BUSY**: Busy status (input, polarity depends on the panel profile)
//!
//! Every [`send_command`](DisplayInterface::send_command) and
//! [`send_data`](DisplayInterface::send_data) call is one or more complete
//! `SpiDevice` transactions, so CS is asserted and released around each
//! write. Payloads longer than the bus's single-transfer limit are split
//! into consecutive transactions.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use gdep073e01::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::{Operation, SpiDevice};
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
//! # let mut delay = MockDelay;
//! // Create interface with SPI and GPIO pins
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//!
//! // Pulse reset
//! let _ = interface.reset(&mut delay, 10);
//!
//! // Send command and payload
//! let _ = interface.send_command(0x61); // Resolution
//! let _ = interface.send_data(&[0x03, 0x20, 0x01, 0xE0]);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Largest payload written in a single SPI transaction by default
///
/// Matches the DMA transfer limit the panel was brought up with.
pub const DEFAULT_MAX_TRANSFER: usize = 4096;

/// Trait for the hardware interface to the panel controller
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// SPI + GPIO implementation that satisfies embedded-hal traits.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct. Tests and exotic
/// wiring (bit-banged SPI, GPIO expanders) can implement it directly.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send a command byte to the controller
    ///
    /// The implementation must:
    /// 1. Set DC low (command mode)
    /// 2. Send the command byte in its own chip-select framed transaction
    /// 3. Set DC back high (data mode)
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send data bytes to the controller
    ///
    /// The implementation must hold DC high for the whole payload and must
    /// deliver it in order, exactly once, in transactions no larger than
    /// the bus allows.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails. Chunks after the
    /// failing one are not sent.
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Set the largest payload [`send_data`](Self::send_data) writes per
    /// transaction
    ///
    /// [`Display::new`](crate::Display::new) calls this with
    /// [`Config::max_transfer`](crate::Config::max_transfer). A value of 0 is
    /// treated as 1.
    fn set_max_transfer(&mut self, bytes: usize);

    /// Perform hardware reset
    ///
    /// The implementation must:
    /// 1. Set RST low
    /// 2. Wait `pulse_ms`
    /// 3. Set RST high
    /// 4. Wait `pulse_ms`
    fn reset<D: DelayNs>(&mut self, delay: &mut D, pulse_ms: u32)
    -> InterfaceResult<(), Self::Error>;

    /// Drive the output lines to their idle levels (DC high, RST high)
    fn set_idle_levels(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Read the raw BUSY line level
    ///
    /// Interpretation (busy vs ready) is up to the caller; see
    /// [`BusyPolarity`](crate::busy::BusyPolarity).
    fn busy_is_high(&mut self) -> InterfaceResult<bool, Self::Error>;
}

/// GPIO line that failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    /// Data/Command select
    DataCommand,
    /// Reset
    Reset,
    /// Busy input
    Busy,
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error on the given line
    Pin(Line, PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(line, e) => write!(f, "Pin error on {line:?}: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Hardware interface implementation
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI and GPIO traits.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`] (owns chip-select)
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BUSY` - Busy pin implementing [`InputPin`]
pub struct Interface<SPI, DC, RST, BUSY> {
    /// SPI device for communication
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    /// Busy pin
    busy: BUSY,
    /// Largest payload per SPI transaction
    max_transfer: usize,
}

impl<SPI, DC, RST, BUSY> Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    /// Create a new Interface
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI device (must implement [`SpiDevice`])
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `rst` - Reset pin (output, active low)
    /// * `busy` - Busy pin (input)
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY) -> Self {
        Self {
            spi,
            dc,
            rst,
            busy,
            max_transfer: DEFAULT_MAX_TRANSFER,
        }
    }

    /// Get the largest payload written per SPI transaction
    pub fn max_transfer(&self) -> usize {
        self.max_transfer
    }

    /// Give back the owned bus device and pins
    pub fn release(self) -> (SPI, DC, RST, BUSY) {
        (self.spi, self.dc, self.rst, self.busy)
    }
}

impl<SPI, DC, RST, BUSY, PinErr> DisplayInterface for Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.dc
            .set_low()
            .map_err(|e| InterfaceError::Pin(Line::DataCommand, e))?;
        self.spi
            .write(&[command])
            .map_err(|e| InterfaceError::Spi(e))?;
        self.dc
            .set_high()
            .map_err(|e| InterfaceError::Pin(Line::DataCommand, e))?;
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.dc
            .set_high()
            .map_err(|e| InterfaceError::Pin(Line::DataCommand, e))?;
        for chunk in data.chunks(self.max_transfer) {
            self.spi.write(chunk).map_err(|e| InterfaceError::Spi(e))?;
        }
        Ok(())
    }

    fn set_max_transfer(&mut self, bytes: usize) {
        self.max_transfer = bytes.max(1);
    }

    fn reset<D: DelayNs>(
        &mut self,
        delay: &mut D,
        pulse_ms: u32,
    ) -> InterfaceResult<(), Self::Error> {
        self.rst
            .set_low()
            .map_err(|e| InterfaceError::Pin(Line::Reset, e))?;
        delay.delay_ms(pulse_ms);
        self.rst
            .set_high()
            .map_err(|e| InterfaceError::Pin(Line::Reset, e))?;
        delay.delay_ms(pulse_ms);
        Ok(())
    }

    fn set_idle_levels(&mut self) -> InterfaceResult<(), Self::Error> {
        self.dc
            .set_high()
            .map_err(|e| InterfaceError::Pin(Line::DataCommand, e))?;
        self.rst
            .set_high()
            .map_err(|e| InterfaceError::Pin(Line::Reset, e))?;
        Ok(())
    }

    fn busy_is_high(&mut self) -> InterfaceResult<bool, Self::Error> {
        self.busy
            .is_high()
            .map_err(|e| InterfaceError::Pin(Line::Busy, e))
    }
}
