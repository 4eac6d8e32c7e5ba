//! Normalized color samples and byte quantization.

/// An RGB triple with each channel normalized to 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorSample(pub [f64; 3]);

impl ColorSample {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self([r, g, b])
    }

    /// Normalize the first three bytes of an interleaved pixel.
    #[inline]
    pub fn from_bytes(pixel: &[u8]) -> Self {
        Self([
            pixel[0] as f64 / 255.0,
            pixel[1] as f64 / 255.0,
            pixel[2] as f64 / 255.0,
        ])
    }

    /// Clamp, scale and round every channel back to a byte.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [
            quantize_channel(self.0[0]),
            quantize_channel(self.0[1]),
            quantize_channel(self.0[2]),
        ]
    }

    #[inline]
    pub fn r(&self) -> f64 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> f64 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> f64 {
        self.0[2]
    }
}

impl From<[u8; 3]> for ColorSample {
    fn from(rgb: [u8; 3]) -> Self {
        Self::from_bytes(&rgb)
    }
}

/// Quantize a normalized channel value to a byte.
///
/// The value is clamped to 0.0-1.0 first, then scaled by 255 and rounded to
/// the nearest integer with ties away from zero. NaN maps to 0.
#[inline]
pub fn quantize_channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
