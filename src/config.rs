//! Display configuration types and builder

pub use crate::error::BuilderError;
use crate::codec::PixelFormat;
use crate::interface::DEFAULT_MAX_TRANSFER;
use crate::profile::Profile;

/// Display dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels (source outputs)
    pub width: u16,
    /// Height in pixels (gate outputs)
    pub height: u16,
}

impl Dimensions {
    /// Native resolution of the 7.3" GDEP073E01 panel
    pub const GDEP073E01: Self = Self {
        width: 800,
        height: 480,
    };

    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if either side is zero.
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || height == 0 {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether a frame of these dimensions packs into whole bytes without
    /// splitting a 4-bit pixel pair across rows
    pub fn fits(&self, format: PixelFormat) -> bool {
        let bits = self.pixel_count() * format.bits_per_pixel() as usize;
        let pairs_aligned = match format {
            PixelFormat::Packed4(_) => self.width % 2 == 0,
            PixelFormat::Packed3 => true,
        };
        bits % 8 == 0 && pairs_aligned
    }
}

/// GPIO numbers of the panel lines
///
/// Only used for logging and error context; the lines themselves are owned
/// by the [`Interface`](crate::interface::Interface).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PinAssignment {
    /// Chip select
    pub cs: Option<u8>,
    /// Data/Command select
    pub dc: Option<u8>,
    /// Reset
    pub rst: Option<u8>,
    /// Busy input
    pub busy: Option<u8>,
}

/// Display configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Display dimensions
    pub dimensions: Dimensions,
    /// Panel profile
    pub profile: Profile,
    /// GPIO numbers, for diagnostics
    pub pins: PinAssignment,
    /// Largest payload per SPI transaction, handed to the interface by
    /// [`Display::new`](crate::Display::new)
    pub max_transfer: usize,
}

impl Config {
    /// Frame size in bytes for the configured profile and dimensions
    pub fn frame_size(&self) -> usize {
        self.profile
            .frame_size(self.dimensions.width, self.dimensions.height)
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust,no_run
/// use gdep073e01::{Builder, Dimensions, PinAssignment, Profile};
///
/// let dims = match Dimensions::new(800, 480) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new()
///     .dimensions(dims)
///     .profile(Profile::GDEP073E01)
///     .pins(PinAssignment {
///         cs: Some(10),
///         dc: Some(9),
///         rst: Some(8),
///         busy: Some(7),
///     })
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.frame_size(), 192_000);
/// ```
#[must_use]
pub struct Builder {
    /// Display dimensions (required)
    dimensions: Option<Dimensions>,
    /// Panel profile (required)
    profile: Option<Profile>,
    /// GPIO numbers
    pins: PinAssignment,
    /// Largest frame chunk written per data call
    max_transfer: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: None,
            profile: None,
            pins: PinAssignment::default(),
            max_transfer: DEFAULT_MAX_TRANSFER,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set the panel profile (required)
    ///
    /// There is no default: driving a panel with the wrong sequence can
    /// leave it in an undefined state.
    pub fn profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Set GPIO numbers used in logs and errors
    pub fn pins(mut self, pins: PinAssignment) -> Self {
        self.pins = pins;
        self
    }

    /// Set the largest payload written per SPI transaction
    ///
    /// Default is 4096 bytes.
    pub fn max_transfer(mut self, bytes: usize) -> Self {
        self.max_transfer = bytes;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// - `BuilderError::MissingDimensions` if dimensions were not set
    /// - `BuilderError::MissingProfile` if no profile was set
    /// - `BuilderError::InvalidDimensions` if the dimensions do not pack
    ///   into whole bytes with the profile's pixel format
    /// - `BuilderError::InvalidPalette` if a palette code is wider than a
    ///   pixel or two colors share a code
    /// - `BuilderError::InvalidTransferSize` if `max_transfer` is zero
    pub fn build(self) -> Result<Config, BuilderError> {
        let dimensions = self.dimensions.ok_or(BuilderError::MissingDimensions)?;
        let profile = self.profile.ok_or(BuilderError::MissingProfile)?;
        if !dimensions.fits(profile.pixel_format) {
            return Err(BuilderError::InvalidDimensions {
                width: dimensions.width,
                height: dimensions.height,
            });
        }
        if !profile.palette_fits() {
            return Err(BuilderError::InvalidPalette);
        }
        if self.max_transfer == 0 {
            return Err(BuilderError::InvalidTransferSize);
        }
        Ok(Config {
            dimensions,
            profile,
            pins: self.pins,
            max_transfer: self.max_transfer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Palette;

    #[test]
    fn test_dimensions_reject_zero() {
        assert_eq!(
            Dimensions::new(0, 480),
            Err(BuilderError::InvalidDimensions {
                width: 0,
                height: 480
            })
        );
        assert!(Dimensions::new(800, 0).is_err());
    }

    #[test]
    fn test_build_requires_profile() {
        let result = Builder::new().dimensions(Dimensions::GDEP073E01).build();
        assert_eq!(result, Err(BuilderError::MissingProfile));
    }

    #[test]
    fn test_build_requires_dimensions() {
        let result = Builder::new().profile(Profile::GDEP073E01).build();
        assert_eq!(result, Err(BuilderError::MissingDimensions));
    }

    #[test]
    fn test_build_defaults() {
        let config = Builder::new()
            .dimensions(Dimensions::GDEP073E01)
            .profile(Profile::GDEP073E01)
            .build()
            .unwrap();
        assert_eq!(config.max_transfer, 4096);
        assert_eq!(config.pins, PinAssignment::default());
        assert_eq!(config.frame_size(), 192_000);
    }

    #[test]
    fn test_build_rejects_odd_width_for_nibble_format() {
        let result = Builder::new()
            .dimensions(Dimensions::new(801, 480).unwrap())
            .profile(Profile::GDEP073E01)
            .build();
        assert_eq!(
            result,
            Err(BuilderError::InvalidDimensions {
                width: 801,
                height: 480
            })
        );
    }

    #[test]
    fn test_build_rejects_partial_byte_for_packed3() {
        let profile = Profile {
            pixel_format: PixelFormat::Packed3,
            ..Profile::GDEP073E01
        };
        // 3 * 3 pixels * 3 bits = 27 bits
        let result = Builder::new()
            .dimensions(Dimensions::new(3, 3).unwrap())
            .profile(profile)
            .build();
        assert!(matches!(result, Err(BuilderError::InvalidDimensions { .. })));

        let config = Builder::new()
            .dimensions(Dimensions::GDEP073E01)
            .profile(profile)
            .build()
            .unwrap();
        assert_eq!(config.frame_size(), 144_000);
    }

    #[test]
    fn test_build_rejects_palette_wider_than_pixel() {
        let profile = Profile {
            palette: Palette {
                red: 0x09,
                ..Palette::ACEP7
            },
            pixel_format: PixelFormat::Packed3,
            ..Profile::ACEP_7COLOR
        };
        let result = Builder::new()
            .dimensions(Dimensions::GDEP073E01)
            .profile(profile)
            .build();
        assert_eq!(result, Err(BuilderError::InvalidPalette));

        // The same code fits a 4-bit layout
        let profile = Profile {
            pixel_format: Profile::ACEP_7COLOR.pixel_format,
            ..profile
        };
        assert!(Builder::new()
            .dimensions(Dimensions::GDEP073E01)
            .profile(profile)
            .build()
            .is_ok());
    }

    #[test]
    fn test_build_rejects_duplicate_palette_codes() {
        let profile = Profile {
            palette: Palette {
                green: 0x01,
                ..Palette::SPECTRA6
            },
            ..Profile::GDEP073E01
        };
        let result = Builder::new()
            .dimensions(Dimensions::GDEP073E01)
            .profile(profile)
            .build();
        assert_eq!(result, Err(BuilderError::InvalidPalette));
    }

    #[test]
    fn test_build_rejects_zero_transfer() {
        let result = Builder::new()
            .dimensions(Dimensions::GDEP073E01)
            .profile(Profile::GDEP073E01)
            .max_transfer(0)
            .build();
        assert_eq!(result, Err(BuilderError::InvalidTransferSize));
    }
}
