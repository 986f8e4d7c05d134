//! Packed pixel codec
//!
//! Converts logical colors to device codes through a [`Palette`] and packs
//! them into the panel's framebuffer layout. Two layouts exist:
//!
//! - [`PixelFormat::Packed4`]: one nibble per pixel, two pixels per byte.
//!   Which pixel takes the high nibble is a [`NibbleOrder`] policy.
//! - [`PixelFormat::Packed3`]: three bits per pixel, packed LSB-first across
//!   byte boundaries. Pixel `i = y * width + x` starts at bit
//!   `(i * 3) % 8` of byte `(i * 3) / 8`; when that offset is above 5 the
//!   remaining bits spill into the low bits of the next byte.
//!
//! Writes are always masked read-modify-write so neighbouring pixels that
//! share a byte are preserved.
//!
//! ## Example
//!
//! ```
//! use gdep073e01::{Color, NibbleOrder, Palette, PixelCodec, PixelFormat};
//!
//! let codec = PixelCodec::new(Palette::SPECTRA6, PixelFormat::Packed4(NibbleOrder::HighFirst));
//! let mut frame = [0u8; 4]; // 4x2 pixels
//! codec.fill(&mut frame, Color::White);
//! assert_eq!(frame, [0x11; 4]);
//!
//! codec.set_pixel(&mut frame, 0, 0, Color::Red, 4, 2).unwrap();
//! assert_eq!(frame[0], 0x31);
//! assert_eq!(codec.get_pixel(&frame, 1, 0, 4, 2).unwrap(), Color::White);
//! ```

use crate::color::{Color, Palette};

/// Which pixel of a horizontal pair occupies the high nibble
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NibbleOrder {
    /// Even pixel in bits 7..4, odd pixel in bits 3..0
    #[default]
    HighFirst,
    /// Even pixel in bits 3..0, odd pixel in bits 7..4
    LowFirst,
}

/// Framebuffer pixel layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 4 bits per pixel
    Packed4(NibbleOrder),
    /// 3 bits per pixel, LSB-first, straddling byte boundaries
    Packed3,
}

impl PixelFormat {
    /// Bits used by one pixel
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            Self::Packed4(_) => 4,
            Self::Packed3 => 3,
        }
    }

    /// Bytes needed for a `width` x `height` frame
    ///
    /// Rounded up to a whole byte when the bit count is not a multiple of 8.
    pub fn frame_size(self, width: u16, height: u16) -> usize {
        let bits = width as usize * height as usize * self.bits_per_pixel() as usize;
        bits.div_ceil(8)
    }

    fn code_mask(self) -> u8 {
        match self {
            Self::Packed4(_) => 0x0F,
            Self::Packed3 => 0x07,
        }
    }
}

/// Errors raised while packing or unpacking pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// Coordinate lies outside the frame
    OutOfBounds {
        /// Requested column
        x: u16,
        /// Requested row
        y: u16,
        /// Frame width
        width: u16,
        /// Frame height
        height: u16,
    },
    /// Buffer is shorter than the frame it claims to hold
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// Source pixel slice does not match the frame geometry
    LengthMismatch {
        /// Expected number of source pixels
        expected: usize,
        /// Provided number of source pixels
        provided: usize,
    },
    /// Stored code has no color in the active palette
    UnknownCode {
        /// The raw code read from the buffer
        code: u8,
    },
}

impl core::fmt::Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(f, "Pixel ({x}, {y}) outside {width}x{height} frame"),
            Self::BufferTooSmall { required, provided } => write!(
                f,
                "Buffer too small: required {required} bytes, provided {provided}"
            ),
            Self::LengthMismatch { expected, provided } => write!(
                f,
                "Source length mismatch: expected {expected} pixels, provided {provided}"
            ),
            Self::UnknownCode { code } => write!(f, "Unknown color code {code:#04x}"),
        }
    }
}

impl core::error::Error for CodecError {}

/// Palette plus pixel layout for one panel profile
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelCodec {
    palette: Palette,
    format: PixelFormat,
}

impl PixelCodec {
    /// Create a codec from a palette and a layout
    pub const fn new(palette: Palette, format: PixelFormat) -> Self {
        Self { palette, format }
    }

    /// Active palette
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Active pixel layout
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Device code for a logical color, truncated to the pixel width
    pub fn encode(&self, color: Color) -> u8 {
        self.palette.encode(color) & self.format.code_mask()
    }

    /// Logical color for a device code
    pub fn decode(&self, code: u8) -> Option<Color> {
        self.palette.decode(code & self.format.code_mask())
    }

    /// Bytes needed for a `width` x `height` frame in this layout
    pub fn frame_size(&self, width: u16, height: u16) -> usize {
        self.format.frame_size(width, height)
    }

    /// Write one pixel into a packed frame
    ///
    /// Only the bits belonging to pixel `(x, y)` change; every other bit of
    /// the affected byte(s) is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::OutOfBounds`] if `x >= width` or `y >= height`,
    /// and [`CodecError::BufferTooSmall`] if `buffer` cannot hold the frame.
    #[allow(clippy::many_single_char_names)]
    pub fn set_pixel(
        &self,
        buffer: &mut [u8],
        x: u16,
        y: u16,
        color: Color,
        width: u16,
        height: u16,
    ) -> Result<(), CodecError> {
        let index = self.pixel_index(buffer.len(), x, y, width, height)?;
        let code = self.encode(color);

        match self.format {
            PixelFormat::Packed4(order) => {
                let byte = index / 2;
                let high = (index % 2 == 0) == (order == NibbleOrder::HighFirst);
                buffer[byte] = if high {
                    (buffer[byte] & 0x0F) | (code << 4)
                } else {
                    (buffer[byte] & 0xF0) | code
                };
            }
            PixelFormat::Packed3 => {
                let bit = index * 3;
                let byte = bit / 8;
                let offset = bit % 8;
                let value = u16::from(code) << offset;
                let mask = 0x07u16 << offset;

                buffer[byte] = (buffer[byte] & !(mask as u8)) | value as u8;
                if offset > 5 {
                    let next = byte + 1;
                    buffer[next] = (buffer[next] & !((mask >> 8) as u8)) | (value >> 8) as u8;
                }
            }
        }

        Ok(())
    }

    /// Read one pixel back from a packed frame
    ///
    /// # Errors
    ///
    /// Same bounds checks as [`set_pixel`](Self::set_pixel), plus
    /// [`CodecError::UnknownCode`] when the stored code is not in the palette.
    pub fn get_pixel(
        &self,
        buffer: &[u8],
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<Color, CodecError> {
        let index = self.pixel_index(buffer.len(), x, y, width, height)?;

        let code = match self.format {
            PixelFormat::Packed4(order) => {
                let byte = buffer[index / 2];
                let high = (index % 2 == 0) == (order == NibbleOrder::HighFirst);
                if high { byte >> 4 } else { byte & 0x0F }
            }
            PixelFormat::Packed3 => {
                let bit = index * 3;
                let byte = bit / 8;
                let offset = bit % 8;
                let mut value = u16::from(buffer[byte]);
                if offset > 5 {
                    value |= u16::from(buffer[byte + 1]) << 8;
                }
                ((value >> offset) & 0x07) as u8
            }
        };

        self.decode(code).ok_or(CodecError::UnknownCode { code })
    }

    /// Fill a whole frame with one color
    pub fn fill(&self, buffer: &mut [u8], color: Color) {
        let code = self.encode(color);
        match self.format {
            PixelFormat::Packed4(_) => buffer.fill(code | (code << 4)),
            PixelFormat::Packed3 => {
                // 8 pixels span exactly 3 bytes
                let run = (0..8).fold(0u32, |acc, slot| acc | (u32::from(code) << (slot * 3)));
                let pattern = [run as u8, (run >> 8) as u8, (run >> 16) as u8];
                for (byte, value) in buffer.iter_mut().zip(pattern.iter().cycle()) {
                    *byte = *value;
                }
            }
        }
    }

    fn pixel_index(
        &self,
        len: usize,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<usize, CodecError> {
        if x >= width || y >= height {
            return Err(CodecError::OutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        let required = self.frame_size(width, height);
        if len < required {
            return Err(CodecError::BufferTooSmall {
                required,
                provided: len,
            });
        }
        Ok(y as usize * width as usize + x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKED4: PixelCodec =
        PixelCodec::new(Palette::SPECTRA6, PixelFormat::Packed4(NibbleOrder::HighFirst));
    const PACKED3: PixelCodec = PixelCodec::new(Palette::ACEP7, PixelFormat::Packed3);

    #[test]
    fn test_frame_size_800x480() {
        assert_eq!(PACKED4.frame_size(800, 480), 192_000);
        assert_eq!(PACKED3.frame_size(800, 480), 144_000);
    }

    #[test]
    fn test_codec_round_trip_every_color() {
        for codec in [PACKED4, PACKED3] {
            for color in Color::ALL {
                assert_eq!(codec.decode(codec.encode(color)), Some(color));
            }
        }
    }

    #[test]
    fn test_packed4_high_first_nibbles() {
        let mut frame = [0u8; 2];
        PACKED4.set_pixel(&mut frame, 0, 0, Color::Red, 4, 1).unwrap();
        PACKED4.set_pixel(&mut frame, 1, 0, Color::Blue, 4, 1).unwrap();
        assert_eq!(frame, [0x35, 0x00]);
    }

    #[test]
    fn test_packed4_low_first_nibbles() {
        let codec = PixelCodec::new(Palette::SPECTRA6, PixelFormat::Packed4(NibbleOrder::LowFirst));
        let mut frame = [0u8; 2];
        codec.set_pixel(&mut frame, 0, 0, Color::Red, 4, 1).unwrap();
        codec.set_pixel(&mut frame, 1, 0, Color::Blue, 4, 1).unwrap();
        assert_eq!(frame, [0x53, 0x00]);
    }

    #[test]
    fn test_packed4_row_stride() {
        let mut frame = [0u8; 4];
        PACKED4.set_pixel(&mut frame, 2, 1, Color::White, 4, 2).unwrap();
        assert_eq!(frame, [0x00, 0x00, 0x00, 0x10]);
    }

    #[test]
    fn test_packed3_straddles_byte_boundary() {
        // Pixel 2 starts at bit 6: two bits in byte 0, one bit in byte 1
        let mut frame = [0u8; 3];
        PACKED3.set_pixel(&mut frame, 2, 0, Color::Clean, 8, 1).unwrap();
        assert_eq!(frame, [0b1100_0000, 0b0000_0001, 0x00]);
    }

    #[test]
    fn test_packed3_straddle_preserves_neighbours() {
        let mut frame = [0xFFu8; 3];
        PACKED3.set_pixel(&mut frame, 2, 0, Color::Black, 8, 1).unwrap();
        assert_eq!(frame, [0b0011_1111, 0b1111_1110, 0xFF]);
        for x in [0, 1, 3, 4, 5, 6, 7] {
            assert_eq!(PACKED3.get_pixel(&frame, x, 0, 8, 1).unwrap(), Color::Clean);
        }
    }

    #[test]
    fn test_adjacent_writes_are_order_independent() {
        for codec in [PACKED4, PACKED3] {
            for first in 0..7u16 {
                let mut forward = [0x5Au8; 4];
                let mut backward = [0x5Au8; 4];

                codec.set_pixel(&mut forward, first, 0, Color::Yellow, 8, 1).unwrap();
                codec.set_pixel(&mut forward, first + 1, 0, Color::Green, 8, 1).unwrap();

                codec.set_pixel(&mut backward, first + 1, 0, Color::Green, 8, 1).unwrap();
                codec.set_pixel(&mut backward, first, 0, Color::Yellow, 8, 1).unwrap();

                assert_eq!(forward, backward, "pixel {first} and {}", first + 1);
            }
        }
    }

    #[test]
    fn test_set_pixel_only_touches_its_bytes() {
        let mut frame = [0xA5u8; 6];
        // Pixel 5 occupies bits 15..17: bytes 1 and 2
        PACKED3.set_pixel(&mut frame, 5, 0, Color::Black, 16, 1).unwrap();
        assert_eq!(frame[0], 0xA5);
        assert_eq!(&frame[3..], &[0xA5, 0xA5, 0xA5]);
    }

    #[test]
    fn test_last_pixel_stays_in_bounds() {
        let mut frame = [0u8; 3];
        PACKED3.set_pixel(&mut frame, 7, 0, Color::Clean, 8, 1).unwrap();
        assert_eq!(frame, [0x00, 0x00, 0b1110_0000]);
    }

    #[test]
    fn test_set_pixel_out_of_bounds() {
        let mut frame = [0u8; 192_000];
        let result = PACKED4.set_pixel(&mut frame, 800, 0, Color::Black, 800, 480);
        assert!(matches!(result, Err(CodecError::OutOfBounds { x: 800, .. })));
        let result = PACKED4.set_pixel(&mut frame, 0, 480, Color::Black, 800, 480);
        assert!(matches!(result, Err(CodecError::OutOfBounds { y: 480, .. })));
    }

    #[test]
    fn test_set_pixel_short_buffer() {
        let mut frame = [0u8; 2];
        let result = PACKED3.set_pixel(&mut frame, 0, 0, Color::Black, 8, 1);
        assert_eq!(
            result,
            Err(CodecError::BufferTooSmall {
                required: 3,
                provided: 2
            })
        );
    }

    #[test]
    fn test_fill_packed3_decodes_everywhere() {
        let mut frame = [0u8; 9]; // 24 pixels
        PACKED3.fill(&mut frame, Color::Yellow);
        for x in 0..24 {
            assert_eq!(PACKED3.get_pixel(&frame, x, 0, 24, 1).unwrap(), Color::Yellow);
        }
    }

    #[test]
    fn test_fill_packed4() {
        let mut frame = [0u8; 4];
        PACKED4.fill(&mut frame, Color::Green);
        assert_eq!(frame, [0x66; 4]);
    }

    #[test]
    fn test_get_pixel_unknown_code() {
        let frame = [0x40u8];
        let result = PACKED4.get_pixel(&frame, 0, 0, 2, 1);
        assert_eq!(result, Err(CodecError::UnknownCode { code: 0x04 }));
    }
}
