//! Owned interleaved 8-bit pixel buffers.

use crate::error::{ImageRole, ValidationError};

/// Row-major, channel-interleaved 8-bit image data
///
/// The buffer owns its bytes exclusively and is not `Clone`:
/// stages hand buffers on by value.
#[derive(Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Channel count required by the correction core
    pub const RGB_CHANNELS: u8 = 3;

    /// Wrap raw bytes. Shape consistency is checked by `validate`, not here,
    /// so decoders can hand over whatever the file described.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    /// Build an RGB buffer from packed pixels in row-major order.
    pub fn from_rgb_pixels(width: u32, height: u32, pixels: &[[u8; 3]]) -> Self {
        let data = pixels.iter().flat_map(|p| p.iter().copied()).collect();
        Self::new(width, height, Self::RGB_CHANNELS, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes the shape calls for: width * height * channels
    pub fn expected_len(&self) -> usize {
        self.pixel_count() * self.channels as usize
    }

    /// Describe why the buffer is malformed, if it is.
    pub fn layout_problem(&self) -> Option<String> {
        if self.width == 0 || self.height == 0 {
            return Some(format!(
                "dimensions must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        if self.channels == 0 {
            return Some("channel count must be non-zero".to_string());
        }
        if self.data.len() != self.expected_len() {
            return Some(format!(
                "expected {} bytes for {}x{}x{}, got {}",
                self.expected_len(),
                self.width,
                self.height,
                self.channels,
                self.data.len()
            ));
        }
        None
    }

    pub fn is_valid(&self) -> bool {
        self.layout_problem().is_none()
    }

    /// Reject malformed buffers with `InvalidImage`.
    pub fn validate(&self, image: ImageRole) -> Result<(), ValidationError> {
        match self.layout_problem() {
            Some(reason) => Err(ValidationError::InvalidImage { image, reason }),
            None => Ok(()),
        }
    }

    /// Reject anything that is not a well-formed 3-channel buffer.
    pub fn validate_rgb(&self, image: ImageRole) -> Result<(), ValidationError> {
        self.validate(image)?;
        if self.channels != Self::RGB_CHANNELS {
            return Err(ValidationError::ChannelMismatch {
                image,
                expected: Self::RGB_CHANNELS,
                found: self.channels,
            });
        }
        Ok(())
    }
}
