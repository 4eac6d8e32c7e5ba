//! Data models for chromatch
//!
//! Pixel buffers, normalized color samples and the fitted correction matrix.

mod color;
mod matrix;
mod pixel_buffer;

pub use color::{quantize_channel, ColorSample};
pub use matrix::ColorCorrectionMatrix;
pub use pixel_buffer::PixelBuffer;
