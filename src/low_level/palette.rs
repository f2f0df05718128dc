//! Standard palette (SP), extended palette (EP), and the per-frame SP
//! builder (§4.5 of `spec.md`).

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, RlError};
use crate::low_level::{EP_MAX_BYTES, EP_MAX_ENTRIES, SP_BYTES, SP_SIZE};
use crate::pixel::Rgb565;

/// The fixed-size, per-frame standard palette. Always serializes to
/// [`SP_BYTES`] regardless of how many entries are populated; the unused
/// tail carries no meaning.
#[derive(Debug, Clone)]
pub struct StandardPalette {
    entries: Vec<Rgb565>,
}

impl StandardPalette {
    pub fn new() -> Self {
        StandardPalette { entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= SP_SIZE
    }

    /// Appends a color, if there's still room. Returns `false` if the
    /// palette is already full.
    pub fn push(&mut self, color: Rgb565) -> bool {
        if self.is_full() {
            return false;
        }
        self.entries.push(color);
        true
    }

    /// Linear scan for `color` among populated entries, as specified by
    /// §4.4 step 2 ("linear scan of SP's populated prefix").
    pub fn find(&self, color: Rgb565) -> Option<u8> {
        self.entries.iter().position(|&c| c == color).map(|i| i as u8)
    }

    pub fn get(&self, index: u8) -> Option<Rgb565> {
        self.entries.get(index as usize).copied()
    }

    /// Serializes to exactly [`SP_BYTES`], zero-padding the unused tail.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        let start = out.len();
        out.resize(start + SP_BYTES, 0);
        for (i, &c) in self.entries.iter().enumerate() {
            LittleEndian::write_u16(&mut out[start + i * 2..], c);
        }
    }

    /// Reads exactly [`SP_BYTES`] back out. The returned palette reports
    /// all 256 entries as populated — callers that only care about the
    /// live prefix use [`StandardPalette::get`] directly, matching the
    /// decoder's pattern of never needing to know how many SP entries the
    /// encoder actually used.
    pub fn read_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < SP_BYTES {
            return Err(RlError::truncated(SP_BYTES, bytes.len()));
        }
        let mut entries = Vec::with_capacity(SP_SIZE);
        for i in 0..SP_SIZE {
            entries.push(LittleEndian::read_u16(&bytes[i * 2..]));
        }
        Ok(StandardPalette { entries })
    }
}

impl Default for StandardPalette {
    fn default() -> Self {
        Self::new()
    }
}

/// The variable-length, per-frame overflow palette. The encoder appends in
/// block-encounter order; the decoder consumes sequentially through a
/// cursor that resets at every frame boundary (§3, §9).
#[derive(Debug, Clone)]
pub struct ExtendedPalette {
    entries: Vec<Rgb565>,
    read_cursor: usize,
}

impl ExtendedPalette {
    pub fn new() -> Self {
        ExtendedPalette { entries: Vec::new(), read_cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a color during encoding. The encoder's own extended-palette
    /// capacity is exhausted here — a runtime scratch-growth limit, not a
    /// malformed-input condition (that's reserved for a bad declared length
    /// encountered while *decoding*) — so this fails with `OutOfMemory`.
    pub fn push(&mut self, color: Rgb565) -> Result<()> {
        if self.entries.len() >= EP_MAX_ENTRIES {
            return Err(RlError::OutOfMemory("extended palette"));
        }
        self.entries.push(color);
        Ok(())
    }

    /// Resets the read cursor to the start. Called at every frame boundary.
    pub fn reset_cursor(&mut self) {
        self.read_cursor = 0;
    }

    /// Consumes and returns the next entry, advancing the read cursor.
    pub fn take_next(&mut self) -> Result<Rgb565> {
        let v = self
            .entries
            .get(self.read_cursor)
            .copied()
            .ok_or(RlError::MalformedInput("extended palette exhausted"))?;
        self.read_cursor += 1;
        Ok(v)
    }

    pub fn read_cursor(&self) -> usize {
        self.read_cursor
    }

    /// Serializes as `len_bytes: u32 LE` followed by the raw RGB565 entries.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        let len_bytes = (self.entries.len() * 2) as u32;
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, len_bytes);
        out.extend_from_slice(&buf);
        for &c in &self.entries {
            let mut pixel = [0u8; 2];
            LittleEndian::write_u16(&mut pixel, c);
            out.extend_from_slice(&pixel);
        }
    }

    /// Reads the length-prefixed EP from `bytes`, returning the palette and
    /// the number of bytes consumed (4 + declared length).
    pub fn read_from(bytes: &[u8]) -> Result<(Self, usize)> {
        if bytes.len() < 4 {
            return Err(RlError::truncated(4, bytes.len()));
        }
        let len_bytes = LittleEndian::read_u32(bytes) as usize;
        if len_bytes > EP_MAX_BYTES {
            return Err(RlError::MalformedInput("declared extended palette length exceeds 65536 bytes"));
        }
        if len_bytes % 2 != 0 {
            return Err(RlError::MalformedInput("extended palette length is not a multiple of 2"));
        }
        let body = &bytes[4..];
        if body.len() < len_bytes {
            return Err(RlError::truncated(len_bytes, body.len()));
        }
        let mut entries = Vec::with_capacity(len_bytes / 2);
        for i in (0..len_bytes).step_by(2) {
            entries.push(LittleEndian::read_u16(&body[i..]));
        }
        Ok((ExtendedPalette { entries, read_cursor: 0 }, 4 + len_bytes))
    }
}

impl Default for ExtendedPalette {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the standard palette for a frame from its top-left block pixels,
/// row by row, per §4.5: sort each row's top-left pixels, drop consecutive
/// duplicates and values already in SP, append survivors until SP reaches
/// 256 entries.
pub fn build_standard_palette(plane: &[Rgb565], width: u32, height: u32) -> StandardPalette {
    let mut sp = StandardPalette::new();
    let blocks_wide = ((width + 1) / 2) as usize;
    let blocks_high = ((height + 1) / 2) as usize;

    for by in 0..blocks_high {
        if sp.is_full() {
            break;
        }

        let mut row: Vec<Rgb565> = (0..blocks_wide)
            .map(|bx| {
                let x = (bx * 2) as u32;
                let y = (by * 2) as u32;
                plane[(y * width + x) as usize]
            })
            .collect();
        row.sort_unstable();
        row.dedup();

        for color in row {
            if sp.find(color).is_some() {
                continue;
            }
            if !sp.push(color) {
                break;
            }
        }
    }

    sp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sp_round_trips_through_wire_bytes() {
        let mut sp = StandardPalette::new();
        sp.push(0xf800);
        sp.push(0x07e0);
        let mut buf = Vec::new();
        sp.write_to(&mut buf);
        assert_eq!(buf.len(), SP_BYTES);
        let back = StandardPalette::read_from(&buf).unwrap();
        assert_eq!(back.get(0), Some(0xf800));
        assert_eq!(back.get(1), Some(0x07e0));
        assert_eq!(back.get(2), Some(0));
    }

    #[test]
    fn ep_round_trips_and_cursor_resets_per_frame() {
        let mut ep = ExtendedPalette::new();
        ep.push(0x1111).unwrap();
        ep.push(0x2222).unwrap();
        let mut buf = Vec::new();
        ep.write_to(&mut buf);

        let (mut decoded, consumed) = ExtendedPalette::read_from(&buf).unwrap();
        assert_eq!(consumed, buf.len());
        assert_eq!(decoded.take_next().unwrap(), 0x1111);
        assert_eq!(decoded.take_next().unwrap(), 0x2222);
        assert!(decoded.take_next().is_err());

        decoded.reset_cursor();
        assert_eq!(decoded.take_next().unwrap(), 0x1111);
    }

    #[test]
    fn ep_oversized_length_is_rejected() {
        let mut buf = vec![0u8; 4];
        LittleEndian::write_u32(&mut buf, (EP_MAX_BYTES + 2) as u32);
        assert!(ExtendedPalette::read_from(&buf).is_err());
    }

    #[test]
    fn build_standard_palette_dedupes_and_sorts() {
        // 4x2 image: top-left pixels of the two blocks are 5 and 3.
        let plane: Vec<Rgb565> = vec![5, 9, 9, 9, 3, 9, 9, 9];
        let sp = build_standard_palette(&plane, 4, 2);
        assert_eq!(sp.get(0), Some(3));
        assert_eq!(sp.get(1), Some(5));
    }

    #[test]
    fn build_standard_palette_stops_at_256() {
        // One row, 300 blocks wide -> 300 distinct top-left colors, only
        // the first (sorted) 256 survive.
        let width = 600u32;
        let mut plane = vec![0u16; (width * 2) as usize];
        for bx in 0..300u32 {
            plane[(bx * 2) as usize] = bx as u16 + 1; // top row
        }
        let sp = build_standard_palette(&plane, width, 2);
        assert_eq!(sp.len(), 256);
    }
}
