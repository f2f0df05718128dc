//! Library for reading & writing RL multi-frame RGB565 block-palette
//! animations.
//!
//! An RL file is a small header (frame count, dimensions, a compression
//! savings estimate) followed by that many frames, each a 2x2-block-coded
//! image referencing a per-frame standard palette and an overflow extended
//! palette. See `low_level` for the wire format and [`Decoder`]/[`Encoder`]
//! for the streaming API most callers want.

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{Result, RlError};
pub use pixel::{rgb565_to_rgb888, rgb888_to_rgb565, Rgb565, Rgb888};

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod low_level;
pub mod pixel;
pub mod quantizer;
