//! Packed frame buffer
//!
//! [`FrameBuffer`] pairs a byte buffer with the panel dimensions and a
//! [`PixelCodec`], so pixels can be set by color and coordinates. The bytes
//! are sent with [`Display::display_frame`](crate::Display::display_frame).
//!
//! With the `graphics` feature the buffer is an embedded-graphics
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget).
//!
//! ## Example
//!
//! ```
//! use gdep073e01::{Color, FrameBuffer, Profile};
//!
//! let codec = Profile::GDEP073E01.codec();
//! let mut storage = [0u8; 8 * 4 / 2];
//! let mut frame = match FrameBuffer::try_new(&mut storage[..], 8, 4, codec) {
//!     Ok(frame) => frame,
//!     Err(_) => return,
//! };
//! frame.fill(Color::White);
//! let _ = frame.set_pixel(3, 1, Color::Red);
//! assert_eq!(frame.pixel(3, 1).ok(), Some(Color::Red));
//! assert_eq!(frame.pixel(2, 1).ok(), Some(Color::White));
//! ```

use crate::codec::{CodecError, PixelCodec};
use crate::color::Color;

/// Packed pixels for one full panel frame
pub struct FrameBuffer<B> {
    buffer: B,
    width: u16,
    height: u16,
    codec: PixelCodec,
}

impl<B> FrameBuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wrap an existing buffer
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferTooSmall`] if `buffer` cannot hold a
    /// `width` x `height` frame. Longer buffers are accepted; only the
    /// leading frame-size bytes are used.
    pub fn try_new(
        buffer: B,
        width: u16,
        height: u16,
        codec: PixelCodec,
    ) -> Result<Self, CodecError> {
        let required = codec.frame_size(width, height);
        let provided = buffer.as_ref().len();
        if provided < required {
            return Err(CodecError::BufferTooSmall { required, provided });
        }
        Ok(Self {
            buffer,
            width,
            height,
            codec,
        })
    }

    /// Frame width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Codec used to pack pixels
    pub fn codec(&self) -> PixelCodec {
        self.codec
    }

    /// Set one pixel
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), CodecError> {
        self.codec
            .set_pixel(self.buffer.as_mut(), x, y, color, self.width, self.height)
    }

    /// Read one pixel back
    pub fn pixel(&self, x: u16, y: u16) -> Result<Color, CodecError> {
        self.codec
            .get_pixel(self.buffer.as_ref(), x, y, self.width, self.height)
    }

    /// Set every pixel to `color`
    pub fn fill(&mut self, color: Color) {
        let size = self.frame_size();
        self.codec.fill(&mut self.buffer.as_mut()[..size], color);
    }

    /// Pack one row of 8-bit RGB332 source pixels
    ///
    /// `row` holds one byte per pixel and must be exactly
    /// [`width`](Self::width) long. Values are mapped with
    /// [`Color::from_rgb332`].
    pub fn write_rgb332_row(&mut self, y: u16, row: &[u8]) -> Result<(), CodecError> {
        if row.len() != self.width as usize {
            return Err(CodecError::LengthMismatch {
                expected: self.width as usize,
                provided: row.len(),
            });
        }
        for (x, value) in (0..self.width).zip(row) {
            self.set_pixel(x, y, Color::from_rgb332(*value))?;
        }
        Ok(())
    }

    /// Pack a whole RGB332 image, one byte per pixel in row-major order
    pub fn load_rgb332(&mut self, image: &[u8]) -> Result<(), CodecError> {
        let width = self.width as usize;
        let expected = width * self.height as usize;
        if image.len() != expected {
            return Err(CodecError::LengthMismatch {
                expected,
                provided: image.len(),
            });
        }
        if width == 0 {
            return Ok(());
        }
        for (y, row) in (0..self.height).zip(image.chunks(width)) {
            self.write_rgb332_row(y, row)?;
        }
        Ok(())
    }

    /// Frame size in bytes
    pub fn frame_size(&self) -> usize {
        self.codec.frame_size(self.width, self.height)
    }

    /// Packed frame, exactly [`frame_size`](Self::frame_size) bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.as_ref()[..self.frame_size()]
    }

    /// Give back the underlying buffer
    pub fn into_inner(self) -> B {
        self.buffer
    }
}

#[cfg(feature = "alloc")]
impl FrameBuffer<alloc::vec::Vec<u8>> {
    /// Allocate a zeroed frame on the heap
    ///
    /// Returns `None` if the allocation fails.
    pub fn new_alloc(width: u16, height: u16, codec: PixelCodec) -> Option<Self> {
        let size = codec.frame_size(width, height);
        let mut buffer = alloc::vec::Vec::new();
        buffer.try_reserve_exact(size).ok()?;
        buffer.resize(size, 0);
        Some(Self {
            buffer,
            width,
            height,
            codec,
        })
    }
}

#[cfg(feature = "graphics")]
mod graphics {
    use core::convert::Infallible;

    use embedded_graphics_core::{
        draw_target::DrawTarget,
        geometry::{OriginDimensions, Point, Size},
        prelude::Pixel,
    };

    use super::FrameBuffer;
    use crate::color::Color;

    impl<B> DrawTarget for FrameBuffer<B>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        type Color = Color;
        type Error = Infallible;

        fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
        where
            Iter: IntoIterator<Item = Pixel<Self::Color>>,
        {
            let width = i32::from(self.width);
            let height = i32::from(self.height);

            for Pixel(Point { x, y }, color) in pixels {
                if x < 0 || y < 0 || x >= width || y >= height {
                    continue;
                }
                // In bounds and the buffer length was checked at construction
                let _ = self.set_pixel(x as u16, y as u16, color);
            }

            Ok(())
        }

        fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
            self.fill(color);
            Ok(())
        }
    }

    impl<B> OriginDimensions for FrameBuffer<B>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        fn size(&self) -> Size {
            Size::new(u32::from(self.width), u32::from(self.height))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;

    #[test]
    fn test_try_new_rejects_short_buffer() {
        let codec = Profile::GDEP073E01.codec();
        let result = FrameBuffer::try_new([0u8; 15], 8, 4, codec);
        assert!(matches!(
            result,
            Err(CodecError::BufferTooSmall {
                required: 16,
                provided: 15
            })
        ));
    }

    #[test]
    fn test_as_bytes_is_frame_sized() {
        let codec = Profile::GDEP073E01.codec();
        let mut frame = FrameBuffer::try_new([0u8; 20], 8, 4, codec).unwrap();
        frame.fill(Color::Blue);
        assert_eq!(frame.as_bytes(), &[0x55; 16]);
        assert_eq!(frame.into_inner()[16..], [0u8; 4]);
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn test_clear_white_then_set_black() {
        let codec = Profile::GDEP073E01.codec();
        let mut frame = FrameBuffer::new_alloc(800, 480, codec).unwrap();
        assert_eq!(frame.as_bytes().len(), 192_000);
        frame.fill(Color::White);
        frame.set_pixel(0, 0, Color::Black).unwrap();
        assert_eq!(frame.pixel(0, 0).unwrap(), Color::Black);
        assert_eq!(frame.pixel(1, 0).unwrap(), Color::White);
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn test_packed3_frame() {
        use crate::codec::PixelFormat;

        let profile = Profile {
            pixel_format: PixelFormat::Packed3,
            ..Profile::GDEP073E01
        };
        let mut frame = FrameBuffer::new_alloc(800, 480, profile.codec()).unwrap();
        assert_eq!(frame.frame_size(), 144_000);
        frame.fill(Color::Green);
        frame.set_pixel(2, 0, Color::Yellow).unwrap();
        assert_eq!(frame.pixel(1, 0).unwrap(), Color::Green);
        assert_eq!(frame.pixel(2, 0).unwrap(), Color::Yellow);
        assert_eq!(frame.pixel(3, 0).unwrap(), Color::Green);
    }

    #[test]
    fn test_set_pixel_out_of_bounds() {
        let codec = Profile::GDEP073E01.codec();
        let mut frame = FrameBuffer::try_new([0u8; 16], 8, 4, codec).unwrap();
        assert!(matches!(
            frame.set_pixel(8, 0, Color::Red),
            Err(CodecError::OutOfBounds { x: 8, .. })
        ));
    }

    #[test]
    fn test_rgb332_row_packs_high_nibble_first() {
        let codec = Profile::GDEP073E01.codec();
        let mut frame = FrameBuffer::try_new([0u8; 8], 8, 2, codec).unwrap();
        frame
            .write_rgb332_row(1, &[0xFF, 0x00, 0xE0, 0xFC, 0x03, 0x1C, 0x92, 0xFF])
            .unwrap();
        assert_eq!(frame.as_bytes(), &[0x00, 0x00, 0x00, 0x00, 0x10, 0x32, 0x56, 0x01]);
    }

    #[test]
    fn test_rgb332_row_length_checked() {
        let codec = Profile::GDEP073E01.codec();
        let mut frame = FrameBuffer::try_new([0u8; 8], 8, 2, codec).unwrap();
        assert_eq!(
            frame.write_rgb332_row(0, &[0xFF; 7]),
            Err(CodecError::LengthMismatch {
                expected: 8,
                provided: 7
            })
        );
        assert!(matches!(
            frame.write_rgb332_row(2, &[0xFF; 8]),
            Err(CodecError::OutOfBounds { y: 2, .. })
        ));
    }

    #[test]
    fn test_load_rgb332_image() {
        let codec = Profile::GDEP073E01.codec();
        let mut frame = FrameBuffer::try_new([0u8; 4], 4, 2, codec).unwrap();
        let image = [0xFF, 0xFF, 0xE0, 0xE0, 0x1C, 0x03, 0x00, 0xFC];
        frame.load_rgb332(&image).unwrap();
        assert_eq!(frame.as_bytes(), &[0x11, 0x33, 0x65, 0x02]);
        assert!(matches!(
            frame.load_rgb332(&image[..7]),
            Err(CodecError::LengthMismatch { expected: 8, .. })
        ));
    }

    #[cfg(feature = "graphics")]
    #[test]
    fn test_draw_rectangle() {
        use embedded_graphics::prelude::*;
        use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

        let codec = Profile::GDEP073E01.codec();
        let mut frame = FrameBuffer::try_new([0u8; 16], 8, 4, codec).unwrap();
        frame.clear(Color::White).unwrap();
        assert_eq!(frame.size(), Size::new(8, 4));

        Rectangle::new(Point::new(2, 1), Size::new(3, 2))
            .into_styled(PrimitiveStyle::with_fill(Color::Red))
            .draw(&mut frame)
            .unwrap();

        assert_eq!(frame.pixel(1, 1).unwrap(), Color::White);
        assert_eq!(frame.pixel(2, 1).unwrap(), Color::Red);
        assert_eq!(frame.pixel(4, 2).unwrap(), Color::Red);
        assert_eq!(frame.pixel(5, 2).unwrap(), Color::White);
        assert_eq!(frame.pixel(2, 3).unwrap(), Color::White);
    }

    #[cfg(feature = "graphics")]
    #[test]
    fn test_draw_clips_outside_pixels() {
        use embedded_graphics::prelude::*;

        let codec = Profile::GDEP073E01.codec();
        let mut frame = FrameBuffer::try_new([0x11u8; 16], 8, 4, codec).unwrap();
        let pixels = [
            Pixel(Point::new(-1, 0), Color::Black),
            Pixel(Point::new(8, 0), Color::Black),
            Pixel(Point::new(0, 4), Color::Black),
        ];
        frame.draw_iter(pixels).unwrap();
        assert_eq!(frame.as_bytes(), &[0x11; 16]);
    }
}
