//! Panel profiles
//!
//! A [`Profile`] bundles everything that differs between panel revisions:
//! the register initialization sequence, the color palette, the pixel
//! layout, busy-line polarity and the timing budget of each phase.
//!
//! Three profiles ship with the crate:
//!
//! | Profile | Palette | Notes |
//! |---|---|---|
//! | [`Profile::GDEP073E01`] | [`Palette::SPECTRA6`] | Normal 6-color init |
//! | [`Profile::GDEP073E01_FAST`] | [`Palette::SPECTRA6`] | Faster PLL, forced temperature |
//! | [`Profile::ACEP_7COLOR`] | [`Palette::ACEP7`] | Earlier 7-color revision, slow waits |
//!
//! Profiles are plain data; a custom one can be built by copying a shipped
//! profile and replacing fields.
//!
//! ```
//! use gdep073e01::{BusyPolarity, Profile};
//!
//! let profile = Profile {
//!     name: "GDEP073E01 (busy active high)",
//!     busy_polarity: BusyPolarity::ReadyLow,
//!     ..Profile::GDEP073E01
//! };
//! assert_eq!(profile.init_sequence.len(), Profile::GDEP073E01.init_sequence.len());
//! ```

use crate::busy::BusyPolarity;
use crate::codec::{NibbleOrder, PixelCodec, PixelFormat};
use crate::color::Palette;
use crate::command;

/// Payload of an initialization step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepData {
    /// Fixed bytes (may be empty)
    Bytes(&'static [u8]),
    /// `[width MSB, width LSB, height MSB, height LSB]` from the configured dimensions
    Resolution,
}

/// One register write of an initialization sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitStep {
    /// Opcode
    pub command: u8,
    /// Payload written after the opcode
    pub data: StepData,
    /// Busy wait after the write, in milliseconds
    pub wait_ms: Option<u32>,
}

impl InitStep {
    /// Step with a fixed payload and no busy wait
    pub const fn write(command: u8, data: &'static [u8]) -> Self {
        Self {
            command,
            data: StepData::Bytes(data),
            wait_ms: None,
        }
    }

    /// Resolution step derived from the configured dimensions
    pub const fn resolution() -> Self {
        Self {
            command: command::RESOLUTION,
            data: StepData::Resolution,
            wait_ms: None,
        }
    }

    /// Same step, followed by a busy wait
    pub const fn then_wait(self, wait_ms: u32) -> Self {
        Self {
            wait_ms: Some(wait_ms),
            ..self
        }
    }
}

/// Resolution payload for a `width` x `height` panel
pub const fn resolution_payload(width: u16, height: u16) -> [u8; 4] {
    let [w_hi, w_lo] = width.to_be_bytes();
    let [h_hi, h_lo] = height.to_be_bytes();
    [w_hi, w_lo, h_hi, h_lo]
}

/// Timing budget of a profile, in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// RST low (and following high) duration
    pub reset_pulse_ms: u32,
    /// Busy wait after each reset pulse
    pub reset_wait_ms: u32,
    /// Busy wait after power on
    pub power_on_timeout_ms: u32,
    /// Busy wait after display refresh
    pub refresh_timeout_ms: u32,
    /// Busy wait after power off
    pub power_off_timeout_ms: u32,
    /// Unconditional delay after the init sequence
    pub settle_after_init_ms: u32,
    /// Unconditional delay after entering deep sleep
    pub sleep_settle_ms: u32,
}

/// Commands issued around a display refresh
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshSequence {
    /// Steps written after power on and before the refresh command
    pub pre_refresh: &'static [InitStep],
    /// Payload of the display refresh command
    pub refresh_payload: &'static [u8],
    /// Payload of the power off command
    pub power_off_payload: &'static [u8],
}

/// Panel revision description
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Profile {
    /// Human readable name used in logs
    pub name: &'static str,
    /// Reset pulses before the init sequence (0 skips reset)
    pub reset_pulses: u8,
    /// Register writes, in order
    pub init_sequence: &'static [InitStep],
    /// Color code mapping
    pub palette: Palette,
    /// Framebuffer layout
    pub pixel_format: PixelFormat,
    /// BUSY line level that means ready
    pub busy_polarity: BusyPolarity,
    /// Wait budget
    pub timing: Timing,
    /// Refresh command details
    pub refresh: RefreshSequence,
}

const CMDH: InitStep = InitStep::write(
    command::COMMAND_HEADER,
    &[0x49, 0x55, 0x20, 0x08, 0x09, 0x18],
);
const PSR: InitStep = InitStep::write(command::PANEL_SETTING, &[0x5F, 0x69]);
const POFS: InitStep = InitStep::write(command::POWER_OFF_SEQUENCE, &[0x00, 0x54, 0x00, 0x44]);
const BTST1: InitStep = InitStep::write(command::BOOSTER_SOFT_START_1, &[0x40, 0x1F, 0x1F, 0x2C]);
const BTST2: InitStep = InitStep::write(command::BOOSTER_SOFT_START_2, &[0x6F, 0x1F, 0x17, 0x49]);
const BTST3: InitStep = InitStep::write(command::BOOSTER_SOFT_START_3, &[0x6F, 0x1F, 0x1F, 0x22]);
const CDI: InitStep = InitStep::write(command::VCOM_DATA_INTERVAL, &[0x3F]);
const TCON: InitStep = InitStep::write(command::TCON_SETTING, &[0x02, 0x00]);
const PWS: InitStep = InitStep::write(command::POWER_SAVING, &[0x2F]);
const PON: InitStep = InitStep::write(command::POWER_ON, &[]);

const POWER_ON_WAIT_MS: u32 = 5000;

const GDEP073E01_INIT: &[InitStep] = &[
    CMDH,
    InitStep::write(command::POWER_SETTING, &[0x3F]),
    PSR,
    POFS,
    BTST1,
    BTST2,
    BTST3,
    InitStep::write(command::PLL_CONTROL, &[0x08]),
    CDI,
    TCON,
    InitStep::resolution(),
    InitStep::write(command::VCOM_DC_AUTO, &[0x01]),
    PWS,
    PON.then_wait(POWER_ON_WAIT_MS),
];

const GDEP073E01_FAST_INIT: &[InitStep] = &[
    CMDH,
    InitStep::write(
        command::POWER_SETTING,
        &[0x3F, 0x00, 0x32, 0x2A, 0x0E, 0x2A],
    ),
    PSR,
    POFS,
    BTST1,
    InitStep::write(command::BOOSTER_SOFT_START_2, &[0x6F, 0x1F, 0x16, 0x25]),
    BTST3,
    InitStep::write(command::INPUT_CURRENT, &[0x00, 0x04]),
    InitStep::write(command::PLL_CONTROL, &[0x02]),
    InitStep::write(command::TEMP_SENSOR_ENABLE, &[0x00]),
    CDI,
    TCON,
    InitStep::resolution(),
    InitStep::write(command::VCOM_DC, &[0x1E]),
    InitStep::write(command::VCOM_DC_AUTO, &[0x00]),
    InitStep::write(command::AUTO_GATE_DETECT, &[0x00]),
    PWS,
    InitStep::write(command::CASCADE_SETTING, &[0x00]),
    InitStep::write(command::TEMP_SENSOR_SET, &[0x00]),
    PON.then_wait(POWER_ON_WAIT_MS),
];

// The 7-color revision waits for BUSY after every register write.
const ACEP_STEP_WAIT_MS: u32 = 1000;

const ACEP_7COLOR_INIT: &[InitStep] = &[
    CMDH.then_wait(ACEP_STEP_WAIT_MS),
    InitStep::write(command::POWER_SETTING, &[0x3F]).then_wait(ACEP_STEP_WAIT_MS),
    PSR.then_wait(ACEP_STEP_WAIT_MS),
    POFS.then_wait(ACEP_STEP_WAIT_MS),
    BTST1.then_wait(ACEP_STEP_WAIT_MS),
    BTST2.then_wait(ACEP_STEP_WAIT_MS),
    BTST3.then_wait(ACEP_STEP_WAIT_MS),
    InitStep::write(command::PLL_CONTROL, &[0x00]).then_wait(ACEP_STEP_WAIT_MS),
    CDI.then_wait(ACEP_STEP_WAIT_MS),
    TCON.then_wait(ACEP_STEP_WAIT_MS),
    InitStep::resolution().then_wait(ACEP_STEP_WAIT_MS),
    InitStep::write(command::VCOM_DC_AUTO, &[0x01]).then_wait(ACEP_STEP_WAIT_MS),
    PWS.then_wait(ACEP_STEP_WAIT_MS),
    PON.then_wait(ACEP_STEP_WAIT_MS),
];

const SPECTRA_TIMING: Timing = Timing {
    reset_pulse_ms: 10,
    reset_wait_ms: POWER_ON_WAIT_MS,
    power_on_timeout_ms: POWER_ON_WAIT_MS,
    refresh_timeout_ms: 30_000,
    power_off_timeout_ms: 5000,
    settle_after_init_ms: 0,
    sleep_settle_ms: 0,
};

const SPECTRA_REFRESH: RefreshSequence = RefreshSequence {
    pre_refresh: &[BTST2],
    refresh_payload: &[0x00],
    power_off_payload: &[0x00],
};

impl Profile {
    /// Whether the palette codes fit the pixel format and are distinct
    pub fn palette_fits(&self) -> bool {
        self.palette.fits(self.pixel_format.bits_per_pixel())
    }

    /// GDEP073E01 6-color panel, normal initialization
    pub const GDEP073E01: Self = Self {
        name: "GDEP073E01",
        reset_pulses: 1,
        init_sequence: GDEP073E01_INIT,
        palette: Palette::SPECTRA6,
        pixel_format: PixelFormat::Packed4(NibbleOrder::HighFirst),
        busy_polarity: BusyPolarity::ReadyHigh,
        timing: SPECTRA_TIMING,
        refresh: SPECTRA_REFRESH,
    };

    /// GDEP073E01 6-color panel, fast initialization
    pub const GDEP073E01_FAST: Self = Self {
        name: "GDEP073E01 (fast)",
        init_sequence: GDEP073E01_FAST_INIT,
        ..Self::GDEP073E01
    };

    /// Earlier 7-color ACeP revision of the 7.3" panel
    pub const ACEP_7COLOR: Self = Self {
        name: "ACeP 7-color",
        reset_pulses: 2,
        init_sequence: ACEP_7COLOR_INIT,
        palette: Palette::ACEP7,
        pixel_format: PixelFormat::Packed4(NibbleOrder::HighFirst),
        busy_polarity: BusyPolarity::ReadyHigh,
        timing: Timing {
            reset_pulse_ms: 20,
            reset_wait_ms: ACEP_STEP_WAIT_MS,
            power_on_timeout_ms: 45_000,
            refresh_timeout_ms: 45_000,
            power_off_timeout_ms: 5000,
            settle_after_init_ms: 1000,
            sleep_settle_ms: 200,
        },
        refresh: RefreshSequence {
            pre_refresh: &[],
            refresh_payload: &[0x00],
            power_off_payload: &[],
        },
    };

    /// Codec for this profile's palette and layout
    pub const fn codec(&self) -> PixelCodec {
        PixelCodec::new(self.palette, self.pixel_format)
    }

    /// Frame size in bytes for the given dimensions
    pub fn frame_size(&self, width: u16, height: u16) -> usize {
        self.pixel_format.frame_size(width, height)
    }

    /// Number of register writes (opcodes) the init sequence issues
    pub fn command_count(&self) -> usize {
        self.init_sequence.len()
    }
}
