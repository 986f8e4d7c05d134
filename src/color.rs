//! Color types for multi-color e-paper panels
//!
//! This module defines the logical [`Color`] set and the [`Palette`] that
//! maps it to the numeric codes a given panel revision expects.
//!
//! ## Device Codes
//!
//! Panel revisions disagree on which code means which color, so a palette
//! is always injected through the active [`Profile`](crate::Profile):
//!
//! | Color  | [`Palette::SPECTRA6`] | [`Palette::ACEP7`] |
//! |--------|-----------------------|--------------------|
//! | Black  | 0x0                   | 0x0                |
//! | White  | 0x1                   | 0x1                |
//! | Yellow | 0x2                   | 0x5                |
//! | Red    | 0x3                   | 0x4                |
//! | Blue   | 0x5                   | 0x3                |
//! | Green  | 0x6                   | 0x2                |
//! | Clean  | 0x7                   | 0x7                |
//!
//! ## Example
//!
//! ```
//! use gdep073e01::{Color, Palette};
//!
//! let palette = Palette::SPECTRA6;
//! assert_eq!(palette.encode(Color::Red), 0x03);
//! assert_eq!(palette.decode(0x03), Some(Color::Red));
//! assert_eq!(Palette::ACEP7.encode(Color::Red), 0x04);
//! ```

/// Logical colors understood by the driver
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Color {
    /// Black pixels
    Black,
    /// White pixels
    White,
    /// Red pixels
    Red,
    /// Green pixels
    Green,
    /// Blue pixels
    Blue,
    /// Yellow pixels
    Yellow,
    /// Not a visible color; drives the particles to their neutral state
    Clean,
}

impl Color {
    /// Map an 8-bit RGB332 source pixel to a panel color
    ///
    /// Only the six pure colors the panel can show are recognized
    /// (`0x00`, `0xFF`, `0xFC`, `0xE0`, `0x03`, `0x1C`); anything else is
    /// drawn black.
    pub const fn from_rgb332(value: u8) -> Self {
        match value {
            0xFF => Color::White,
            0xFC => Color::Yellow,
            0xE0 => Color::Red,
            0x03 => Color::Blue,
            0x1C => Color::Green,
            _ => Color::Black,
        }
    }

    /// Every logical color, in declaration order
    pub const ALL: [Color; 7] = [
        Color::Black,
        Color::White,
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Clean,
    ];
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU8;
}

/// Mapping from logical colors to device color codes
///
/// Codes must fit the pixel width of the panel (3 bits for every built-in
/// palette) and must be distinct, otherwise [`decode`](Self::decode) is
/// ambiguous.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Palette {
    /// Code for [`Color::Black`]
    pub black: u8,
    /// Code for [`Color::White`]
    pub white: u8,
    /// Code for [`Color::Red`]
    pub red: u8,
    /// Code for [`Color::Green`]
    pub green: u8,
    /// Code for [`Color::Blue`]
    pub blue: u8,
    /// Code for [`Color::Yellow`]
    pub yellow: u8,
    /// Code for [`Color::Clean`]
    pub clean: u8,
}

impl Palette {
    /// Six-color Spectra palette used by GDEP073E01
    pub const SPECTRA6: Self = Self {
        black: 0x00,
        white: 0x01,
        yellow: 0x02,
        red: 0x03,
        blue: 0x05,
        green: 0x06,
        clean: 0x07,
    };

    /// Seven-color ACeP palette used by the earlier panel revision
    pub const ACEP7: Self = Self {
        black: 0x00,
        white: 0x01,
        green: 0x02,
        blue: 0x03,
        red: 0x04,
        yellow: 0x05,
        clean: 0x07,
    };

    /// Device code for a logical color
    pub fn encode(&self, color: Color) -> u8 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
            Color::Red => self.red,
            Color::Green => self.green,
            Color::Blue => self.blue,
            Color::Yellow => self.yellow,
            Color::Clean => self.clean,
        }
    }

    /// Logical color for a device code, if the palette assigns one
    pub fn decode(&self, code: u8) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|color| self.encode(*color) == code)
    }

    /// Whether every code fits in `bits_per_pixel` bits and no two colors
    /// share a code
    pub fn fits(&self, bits_per_pixel: u32) -> bool {
        self.code_bits() <= bits_per_pixel && self.codes_distinct()
    }

    fn codes_distinct(&self) -> bool {
        Color::ALL.iter().enumerate().all(|(i, color)| {
            Color::ALL[i + 1..]
                .iter()
                .all(|other| self.encode(*other) != self.encode(*color))
        })
    }

    /// Widest code in the palette, in bits
    pub fn code_bits(&self) -> u32 {
        let widest = Color::ALL
            .into_iter()
            .map(|color| self.encode(color))
            .max()
            .unwrap_or(0);
        u8::BITS - widest.leading_zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectra6_round_trip() {
        for color in Color::ALL {
            let code = Palette::SPECTRA6.encode(color);
            assert_eq!(Palette::SPECTRA6.decode(code), Some(color));
        }
    }

    #[test]
    fn test_acep7_round_trip() {
        for color in Color::ALL {
            let code = Palette::ACEP7.encode(color);
            assert_eq!(Palette::ACEP7.decode(code), Some(color));
        }
    }

    #[test]
    fn test_palettes_disagree_on_red() {
        assert_ne!(
            Palette::SPECTRA6.encode(Color::Red),
            Palette::ACEP7.encode(Color::Red)
        );
    }

    #[test]
    fn test_unassigned_code_decodes_to_none() {
        assert_eq!(Palette::SPECTRA6.decode(0x04), None);
        assert_eq!(Palette::ACEP7.decode(0x06), None);
    }

    #[test]
    fn test_builtin_palettes_fit_three_bits() {
        assert_eq!(Palette::SPECTRA6.code_bits(), 3);
        assert_eq!(Palette::ACEP7.code_bits(), 3);
        assert!(Palette::SPECTRA6.fits(3));
        assert!(Palette::ACEP7.fits(4));
    }

    #[test]
    fn test_palette_rejects_wide_code() {
        let palette = Palette {
            red: 0x09,
            ..Palette::ACEP7
        };
        assert_eq!(palette.code_bits(), 4);
        assert!(!palette.fits(3));
        assert!(palette.fits(4));
    }

    #[test]
    fn test_palette_rejects_shared_code() {
        let palette = Palette {
            yellow: 0x03,
            ..Palette::SPECTRA6
        };
        assert!(!palette.fits(4));
    }

    #[test]
    fn test_rgb332_matches_spectra_codes() {
        let table = [
            (0x00, 0x00),
            (0xFF, 0x01),
            (0xFC, 0x02),
            (0xE0, 0x03),
            (0x03, 0x05),
            (0x1C, 0x06),
        ];
        for (source, code) in table {
            assert_eq!(Palette::SPECTRA6.encode(Color::from_rgb332(source)), code);
        }
    }

    #[test]
    fn test_rgb332_unknown_is_black() {
        assert_eq!(Color::from_rgb332(0x92), Color::Black);
        assert_eq!(Color::from_rgb332(0x1F), Color::Black);
    }
}
