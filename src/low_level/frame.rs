//! Frame-level assembly/parsing (§4.6 of `spec.md`): standard palette,
//! length-prefixed extended palette, length-prefixed block data.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, RlError};
use crate::low_level::block::{self, Block};
use crate::low_level::block_codec::{decode_block, encode_block};
use crate::low_level::palette::{build_standard_palette, ExtendedPalette, StandardPalette};
use crate::low_level::SP_BYTES;
use crate::pixel::Rgb565;

fn block_grid(width: u32, height: u32) -> (u32, u32) {
    ((width + 1) / 2, (height + 1) / 2)
}

/// Encodes one quantized RGB565 frame. `alpha`, if set, marks a color as
/// transparent (§4.4's alpha-key rule). Returns the complete frame bytes
/// (standard palette, extended palette, block data, each length-prefixed
/// as the format requires).
pub fn encode_frame(plane: &[Rgb565], width: u32, height: u32, alpha: Option<Rgb565>) -> Result<Vec<u8>> {
    let sp = build_standard_palette(plane, width, height);
    let mut ep = ExtendedPalette::new();
    let mut data = Vec::new();

    let (blocks_wide, blocks_high) = block_grid(width, height);
    for by in 0..blocks_high {
        for bx in 0..blocks_wide {
            let blk = block::extract(plane, width, height, bx, by)?;
            encode_block(blk, alpha, &sp, &mut ep, &mut data)?;
        }
    }

    let mut out = Vec::with_capacity(SP_BYTES + 4 + ep.len() * 2 + 4 + data.len());
    sp.write_to(&mut out);
    ep.write_to(&mut out);
    let mut len_buf = [0u8; 4];
    LittleEndian::write_u32(&mut len_buf, data.len() as u32);
    out.extend_from_slice(&len_buf);
    out.extend_from_slice(&data);
    Ok(out)
}

/// Decodes one frame from `bytes`. When `out` is `Some`, decoded pixels are
/// written into the provided plane; when `None`, the frame is parsed and
/// the palette cursors advance identically, but no pixels are produced
/// (the mandatory null-output / skip-decode mode, used to fast-forward past
/// frames that precede the one the caller actually wants). Returns the
/// number of bytes consumed — never more than the frame's declared length,
/// even if block iteration would otherwise continue (§7).
pub fn decode_frame(bytes: &[u8], width: u32, height: u32, mut out: Option<&mut [Rgb565]>) -> Result<usize> {
    if bytes.len() < SP_BYTES {
        return Err(RlError::truncated(SP_BYTES, bytes.len()));
    }
    let sp = StandardPalette::read_from(&bytes[..SP_BYTES])?;
    let mut cursor = SP_BYTES;

    let (mut ep, ep_consumed) = ExtendedPalette::read_from(&bytes[cursor..])?;
    cursor += ep_consumed;

    if bytes.len() < cursor + 4 {
        return Err(RlError::truncated(cursor + 4, bytes.len()));
    }
    let data_len = LittleEndian::read_u32(&bytes[cursor..]) as usize;
    cursor += 4;
    let data_start = cursor;
    let data_end = data_start
        .checked_add(data_len)
        .ok_or(RlError::MalformedInput("data length overflows"))?;
    if bytes.len() < data_end {
        return Err(RlError::truncated(data_end, bytes.len()));
    }

    let (blocks_wide, blocks_high) = block_grid(width, height);
    'blocks: for by in 0..blocks_high {
        for bx in 0..blocks_wide {
            if cursor >= data_end {
                break 'blocks;
            }
            let mut scratch: Option<Block> = match out.as_deref() {
                Some(plane) => Some(block::extract(plane, width, height, bx, by)?),
                None => None,
            };
            let consumed = decode_block(&bytes[cursor..data_end], &sp, &mut ep, scratch.as_mut())?;
            cursor += consumed;
            if let (Some(plane), Some(b)) = (out.as_deref_mut(), scratch) {
                block::write(plane, width, height, bx, by, b)?;
            }
        }
    }

    Ok(data_end)
}
