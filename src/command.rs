//! Panel command definitions
//!
//! Opcodes understood by the GDEP073E01 family controller. Commands are sent
//! over SPI with the DC pin low, followed by their payload with DC high.
//!
//! ## Command Structure
//!
//! Every register write follows the pattern:
//! 1. Assert CS, set DC low, send the opcode, deassert CS
//! 2. Assert CS, set DC high, send the payload bytes (if any), deassert CS
//! 3. Optionally wait for BUSY to report ready
//!
//! Payload values differ between panel revisions and live in
//! [`crate::profile`], not here.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gdep073e01::{command, DisplayInterface, Interface};
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
//! # let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! // Enter deep sleep
//! let _ = interface.send_command(command::DEEP_SLEEP);
//! let _ = interface.send_data(&[command::DEEP_SLEEP_CHECK]);
//! ```

// Panel and power configuration

/// Panel setting (PSR, 0x00)
pub const PANEL_SETTING: u8 = 0x00;

/// Power setting (PWRR, 0x01)
///
/// One byte on the normal sequence, six on the fast sequence.
pub const POWER_SETTING: u8 = 0x01;

/// Power off (POF, 0x02)
///
/// BUSY reports busy until the charge pumps have discharged.
pub const POWER_OFF: u8 = 0x02;

/// Power off sequence setting (POFS, 0x03)
pub const POWER_OFF_SEQUENCE: u8 = 0x03;

/// Power on (PON, 0x04)
///
/// Must be followed by a busy wait before the refresh command.
pub const POWER_ON: u8 = 0x04;

/// Booster soft start, phase 1 (BTST1, 0x05)
pub const BOOSTER_SOFT_START_1: u8 = 0x05;

/// Booster soft start, phase 2 (BTST2, 0x06)
pub const BOOSTER_SOFT_START_2: u8 = 0x06;

/// Deep sleep (DSLP, 0x07)
///
/// Requires [`DEEP_SLEEP_CHECK`] as payload. Only a hardware reset wakes
/// the controller.
pub const DEEP_SLEEP: u8 = 0x07;

/// Booster soft start, phase 3 (BTST3, 0x08)
pub const BOOSTER_SOFT_START_3: u8 = 0x08;

// Frame transfer and refresh

/// Data transmission start (DTM, 0x10)
///
/// Followed by the whole packed frame.
pub const DATA_START: u8 = 0x10;

/// Display refresh (DRF, 0x12)
///
/// BUSY reports busy for the duration of the refresh (tens of seconds).
pub const DISPLAY_REFRESH: u8 = 0x12;

/// Input power current setting (IPC, 0x13)
pub const INPUT_CURRENT: u8 = 0x13;

// Timing and analog configuration

/// PLL control (PLL, 0x30)
///
/// Sets the frame rate; the fast sequence runs a higher rate.
pub const PLL_CONTROL: u8 = 0x30;

/// Temperature sensor enable (TSE, 0x41)
pub const TEMP_SENSOR_ENABLE: u8 = 0x41;

/// VCOM and data interval setting (CDI, 0x50)
pub const VCOM_DATA_INTERVAL: u8 = 0x50;

/// TCON setting (TCON, 0x60)
pub const TCON_SETTING: u8 = 0x60;

/// Resolution setting (TRES, 0x61)
///
/// Requires 4 bytes: [width MSB, width LSB, height MSB, height LSB]
pub const RESOLUTION: u8 = 0x61;

/// VCOM DC setting (VDCS, 0x82)
pub const VCOM_DC: u8 = 0x82;

/// VCOM DC auto measure (T_VDCS, 0x84)
pub const VCOM_DC_AUTO: u8 = 0x84;

/// Auto gate interval detect (AGID, 0x86)
pub const AUTO_GATE_DETECT: u8 = 0x86;

/// Command header unlock (CMDH, 0xAA)
///
/// Unlocks the vendor register bank; always the first write.
pub const COMMAND_HEADER: u8 = 0xAA;

/// Cascade setting (CCSET, 0xE0)
pub const CASCADE_SETTING: u8 = 0xE0;

/// Power saving (PWS, 0xE3)
pub const POWER_SAVING: u8 = 0xE3;

/// Force temperature (TSSET, 0xE6)
pub const TEMP_SENSOR_SET: u8 = 0xE6;

/// Check code that must accompany [`DEEP_SLEEP`]
pub const DEEP_SLEEP_CHECK: u8 = 0xA5;
