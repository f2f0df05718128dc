//! High-level encoding API, analogous to this crate's donor's (stub)
//! `WriterRGB` — fully implemented here, since the reference CLI needs it.

use std::io::Write;

use crate::error::{Result, RlError};
use crate::low_level::header;
use crate::low_level::{frame, HEADER_SIZE};
use crate::pixel::Rgb565;
use crate::quantizer;

/// Builds a multi-frame RL file incrementally.
pub struct Encoder {
    width: u32,
    height: u32,
    alpha: Option<Rgb565>,
    frames: Vec<Vec<u8>>,
}

impl Encoder {
    pub fn new(width: u32, height: u32, alpha: Option<Rgb565>) -> Self {
        Encoder { width, height, alpha, frames: Vec::new() }
    }

    /// Quantizes `plane` in place and encodes it as the next frame.
    pub fn add_frame(&mut self, plane: &mut [Rgb565]) -> Result<()> {
        if plane.len() != (self.width as usize) * (self.height as usize) {
            return Err(RlError::MalformedInput("frame plane does not match encoder dimensions"));
        }
        if self.frames.len() >= u8::MAX as usize {
            return Err(RlError::MalformedInput("too many frames for an 8-bit frame count"));
        }
        quantizer::quantize(plane, self.width, self.height)?;
        let encoded = frame::encode_frame(plane, self.width, self.height, self.alpha)?;
        self.frames.push(encoded);
        Ok(())
    }

    /// Writes the completed container (header followed by every encoded
    /// frame in order) to `writer`, returning the total byte count.
    pub fn finish<W: Write>(self, mut writer: W) -> Result<usize> {
        if self.frames.is_empty() {
            return Err(RlError::MalformedInput("at least one frame is required"));
        }

        let raw_bytes = self.width as u64 * self.height as u64 * 2 * self.frames.len() as u64;
        let coded_bytes: u64 = self.frames.iter().map(|f| f.len() as u64).sum();
        let savings = header::calc_savings(raw_bytes, coded_bytes);

        let head = header::make_info(self.frames.len() as u8, self.width, self.height, savings, 0)?;
        writer.write_all(&head)?;
        let mut total = head.len();
        for f in &self.frames {
            writer.write_all(f)?;
            total += f.len();
        }
        debug_assert_eq!(total, HEADER_SIZE + self.frames.iter().map(Vec::len).sum::<usize>());
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;

    #[test]
    fn encodes_and_decodes_a_single_frame() {
        let mut enc = Encoder::new(2, 2, None);
        enc.add_frame(&mut [0xf800, 0xf800, 0x07e0, 0x07e0]).unwrap();
        let mut bytes = Vec::new();
        let written = enc.finish(&mut bytes).unwrap();
        assert_eq!(written, bytes.len());

        let dec = Decoder::from_mem(&bytes).unwrap();
        assert_eq!(dec.frame_count(), 1);
        assert_eq!(dec.width(), 2);
        assert_eq!(dec.height(), 2);
        let decoded = dec.decode_frame(0).unwrap();
        assert_eq!(decoded, vec![0xf800, 0xf800, 0x07e0, 0x07e0]);
    }

    #[test]
    fn rejects_mismatched_frame_dimensions() {
        let mut enc = Encoder::new(2, 2, None);
        assert!(enc.add_frame(&mut [0; 3]).is_err());
    }

    #[test]
    fn rejects_finishing_with_no_frames() {
        let enc = Encoder::new(2, 2, None);
        let mut bytes = Vec::new();
        assert!(enc.finish(&mut bytes).is_err());
    }
}
