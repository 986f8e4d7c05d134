//! Core display operations
//!
//! [`Display`] owns the hardware interface and drives the panel through its
//! lifecycle:
//!
//! ```text
//! Uninitialized -> Initializing -> Ready -> Displaying -> Ready
//!                                    |                      |
//!                                    +------> Sleeping <----+
//!                                                |
//!                                 Initializing <-+ (wake / next frame)
//! ```
//!
//! Every operation takes `&mut self` and blocks until the panel reports
//! ready, so calls are serialized by the borrow checker.

use embedded_hal::delay::DelayNs;

use crate::busy::{self, SyncResult};
use crate::codec::PixelCodec;
use crate::color::Color;
use crate::command::{
    DATA_START, DEEP_SLEEP, DEEP_SLEEP_CHECK, DISPLAY_REFRESH, POWER_OFF, POWER_ON,
};
use crate::config::{Config, Dimensions};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::profile::Profile;
use crate::sequencer;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Lifecycle state of the panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum State {
    /// No init sequence has completed
    #[default]
    Uninitialized,
    /// Init sequence in progress
    Initializing,
    /// Registers configured, ready for a frame
    Ready,
    /// Frame transfer or refresh in progress
    Displaying,
    /// Deep sleep; registers are lost
    Sleeping,
}

/// What to do with the charge pumps after a refresh
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PowerMode {
    /// Power off after the refresh (the panel keeps its image unpowered)
    #[default]
    PowerOff,
    /// Leave power on; useful when another frame follows shortly
    KeepOn,
}

/// Driver for one panel
///
/// Created once per panel; holds the interface, configuration and the
/// lifecycle state. Use [`deinit`](Self::deinit) to put the panel to sleep
/// and get the interface back, or [`release`](Self::release) to take it back
/// without touching the panel.
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Codec derived from the active profile
    codec: PixelCodec,
    /// Lifecycle state
    state: State,
    /// Whether the active profile's init sequence has completed since the
    /// last reset or sleep
    init_done: bool,
    /// Whether the charge pumps are on
    powered: bool,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    ///
    /// Nothing is written to the panel until [`initialize`](Self::initialize).
    /// The interface takes its transfer limit from `config.max_transfer`.
    pub fn new(mut interface: I, config: Config) -> Self {
        interface.set_max_transfer(config.max_transfer);
        Self {
            interface,
            codec: config.profile.codec(),
            config,
            state: State::Uninitialized,
            init_done: false,
            powered: false,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// Display configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Panel dimensions
    pub fn dimensions(&self) -> Dimensions {
        self.config.dimensions
    }

    /// Frame size in bytes
    pub fn frame_size(&self) -> usize {
        self.config.frame_size()
    }

    /// Codec for building frames for this panel
    pub fn codec(&self) -> PixelCodec {
        self.codec
    }

    /// Whether the charge pumps are on
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Mutable access to the interface
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Initialize the panel with the configured profile
    ///
    /// Drives DC and RST to their idle levels, resets the controller and
    /// writes the profile's register sequence. Calling it again while the
    /// panel is initialized writes nothing.
    ///
    /// # Errors
    ///
    /// Transport errors and busy timeouts are returned as-is and leave the
    /// display in [`State::Uninitialized`].
    pub fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        if self.init_done {
            log::debug!("already initialized, skipping init sequence");
            return Ok(());
        }
        self.run_init(delay)
    }

    /// Switch to another profile and initialize with it
    ///
    /// Selecting the profile that is already active behaves like
    /// [`initialize`](Self::initialize).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the configured dimensions do
    /// not fit the new profile's pixel format and [`Error::InvalidPalette`]
    /// if its palette does not; the active profile is kept.
    pub fn initialize_with_profile<D: DelayNs>(
        &mut self,
        profile: Profile,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let dims = self.config.dimensions;
        if !dims.fits(profile.pixel_format) {
            return Err(Error::InvalidDimensions {
                width: dims.width,
                height: dims.height,
            });
        }
        if !profile.palette_fits() {
            return Err(Error::InvalidPalette);
        }
        if profile != self.config.profile {
            log::info!(
                "switching profile '{}' -> '{}'",
                self.config.profile.name,
                profile.name
            );
            self.config.profile = profile;
            self.codec = profile.codec();
            self.init_done = false;
        }
        self.initialize(delay)
    }

    fn run_init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        log::info!(
            "initializing '{}' ({}x{})",
            self.config.profile.name,
            self.config.dimensions.width,
            self.config.dimensions.height
        );
        self.state = State::Initializing;

        let result = self
            .interface
            .set_idle_levels()
            .map_err(|source| Error::Interface {
                command: None,
                source,
            })
            .and_then(|()| sequencer::run_init_sequence(&mut self.interface, &self.config, delay));

        match result {
            Ok(powered) => {
                self.powered = powered;
                self.init_done = true;
                self.state = State::Ready;
                log::info!("panel ready");
                Ok(())
            }
            Err(e) => {
                self.init_done = false;
                self.state = State::Uninitialized;
                Err(e)
            }
        }
    }

    /// Send a full frame and refresh the panel, then power off
    ///
    /// `buffer` must be exactly [`frame_size`](Self::frame_size) bytes,
    /// packed with [`codec`](Self::codec). After [`sleep`](Self::sleep) the
    /// init sequence runs again first.
    ///
    /// # Errors
    ///
    /// - [`Error::BufferSizeMismatch`] if the buffer length is wrong
    /// - [`Error::NotInitialized`] before the first [`initialize`](Self::initialize)
    /// - Transport errors and busy timeouts from the transfer or refresh;
    ///   the display stays usable
    pub fn display_frame<D: DelayNs>(&mut self, buffer: &[u8], delay: &mut D) -> DisplayResult<I> {
        self.display_frame_with(buffer, PowerMode::PowerOff, delay)
    }

    /// Send a full frame and refresh the panel, choosing whether to power off
    pub fn display_frame_with<D: DelayNs>(
        &mut self,
        buffer: &[u8],
        power: PowerMode,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let expected = self.frame_size();
        if buffer.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                provided: buffer.len(),
            });
        }
        if self.state == State::Uninitialized {
            return Err(Error::NotInitialized);
        }
        if !self.init_done {
            self.run_init(delay)?;
        }

        log::info!("displaying frame ({} bytes)", expected);
        self.state = State::Displaying;
        let result = self.transfer_and_refresh(buffer, power, delay);
        self.state = State::Ready;
        if result.is_ok() {
            log::info!("frame displayed");
        }
        result
    }

    fn transfer_and_refresh<D: DelayNs>(
        &mut self,
        buffer: &[u8],
        power: PowerMode,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let timing = self.config.profile.timing;
        let refresh = self.config.profile.refresh;

        sequencer::send(&mut self.interface, DATA_START, buffer)?;
        log::debug!(
            "frame sent in {} chunks",
            buffer.len().div_ceil(self.config.max_transfer.max(1))
        );

        sequencer::send(&mut self.interface, POWER_ON, &[])?;
        self.powered = true;
        sequencer::wait(
            &mut self.interface,
            &self.config,
            Some(POWER_ON),
            timing.power_on_timeout_ms,
            delay,
        )?;

        for step in refresh.pre_refresh {
            sequencer::run_step(&mut self.interface, &self.config, step, delay)?;
        }

        sequencer::send(&mut self.interface, DISPLAY_REFRESH, refresh.refresh_payload)?;
        let elapsed = sequencer::wait(
            &mut self.interface,
            &self.config,
            Some(DISPLAY_REFRESH),
            timing.refresh_timeout_ms,
            delay,
        )?;
        log::debug!("refresh took {} ms", elapsed);

        match power {
            PowerMode::PowerOff => self.power_off(delay),
            PowerMode::KeepOn => Ok(()),
        }
    }

    /// Fill the whole panel with one color
    ///
    /// Allocates a frame on the heap for the duration of the call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the frame cannot be allocated, and
    /// otherwise the errors of [`display_frame`](Self::display_frame).
    #[cfg(feature = "alloc")]
    pub fn clear<D: DelayNs>(&mut self, color: Color, delay: &mut D) -> DisplayResult<I> {
        let size = self.frame_size();
        let mut frame = alloc::vec::Vec::new();
        frame
            .try_reserve_exact(size)
            .map_err(|_| Error::OutOfMemory { requested: size })?;
        frame.resize(size, 0);
        self.codec.fill(&mut frame, color);
        self.display_frame(&frame, delay)
    }

    /// Fill `buffer` with one color and display it
    ///
    /// Same as [`clear`](Self::clear) with a caller-provided frame.
    pub fn clear_with_buffer<D: DelayNs>(
        &mut self,
        buffer: &mut [u8],
        color: Color,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let expected = self.frame_size();
        if buffer.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                provided: buffer.len(),
            });
        }
        self.codec.fill(buffer, color);
        self.display_frame(buffer, delay)
    }

    /// Refresh a rectangular region
    ///
    /// The controller has no windowed refresh, so a valid region is still
    /// rejected with [`Error::NotSupported`]. Nothing is written.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRegion`] for an empty region, a region outside the
    ///   panel, or an empty buffer
    /// - [`Error::NotSupported`] otherwise
    #[allow(clippy::many_single_char_names)]
    pub fn partial_update(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        buffer: &[u8],
    ) -> DisplayResult<I> {
        let dims = self.config.dimensions;
        let in_bounds = u32::from(x) + u32::from(w) <= u32::from(dims.width)
            && u32::from(y) + u32::from(h) <= u32::from(dims.height);
        if w == 0 || h == 0 || buffer.is_empty() || !in_bounds {
            return Err(Error::InvalidRegion { x, y, w, h });
        }
        log::warn!("partial update of {}x{} at ({}, {}) is not supported", w, h, x, y);
        Err(Error::NotSupported {
            operation: "partial_update",
        })
    }

    /// Turn the charge pumps off
    ///
    /// Does nothing when they are already off.
    pub fn power_off<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        if !self.powered {
            return Ok(());
        }
        let timing = self.config.profile.timing;
        sequencer::send(
            &mut self.interface,
            POWER_OFF,
            self.config.profile.refresh.power_off_payload,
        )?;
        sequencer::wait(
            &mut self.interface,
            &self.config,
            Some(POWER_OFF),
            timing.power_off_timeout_ms,
            delay,
        )?;
        self.powered = false;
        Ok(())
    }

    /// Enter deep sleep
    ///
    /// Powers off first if needed. The controller forgets its registers, so
    /// the next frame (or [`wake`](Self::wake)) runs the init sequence again.
    pub fn sleep<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        log::info!("entering deep sleep");
        self.power_off(delay)?;
        sequencer::send(&mut self.interface, DEEP_SLEEP, &[DEEP_SLEEP_CHECK])?;
        let settle_ms = self.config.profile.timing.sleep_settle_ms;
        if settle_ms > 0 {
            delay.delay_ms(settle_ms);
        }
        self.init_done = false;
        self.state = State::Sleeping;
        Ok(())
    }

    /// Leave deep sleep
    ///
    /// Pulses reset, waits for the controller and runs the init sequence.
    /// Does nothing if the panel is already initialized.
    pub fn wake<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        if self.init_done {
            return Ok(());
        }
        log::info!("waking up");
        self.state = State::Initializing;
        if let Err(e) = sequencer::reset(&mut self.interface, &self.config, delay) {
            self.state = State::Uninitialized;
            return Err(e);
        }
        self.run_init(delay)
    }

    /// Wait for the panel to report ready, using the profile's busy polarity
    pub fn wait_ready<D: DelayNs>(
        &mut self,
        timeout_ms: u32,
        delay: &mut D,
    ) -> Result<SyncResult, Error<I>> {
        busy::wait_ready(
            &mut self.interface,
            self.config.profile.busy_polarity,
            timeout_ms,
            delay,
        )
        .map_err(|source| Error::Interface {
            command: None,
            source,
        })
    }

    /// Put the panel to sleep and give back the interface
    ///
    /// # Errors
    ///
    /// If sleeping fails the display is handed back with the error, so the
    /// caller can retry or [`release`](Self::release) it.
    pub fn deinit<D: DelayNs>(mut self, delay: &mut D) -> Result<I, (Self, Error<I>)> {
        match self.sleep(delay) {
            Ok(()) => Ok(self.interface),
            Err(e) => Err((self, e)),
        }
    }

    /// Give back the interface without writing to the panel
    pub fn release(self) -> I {
        self.interface
    }
}
