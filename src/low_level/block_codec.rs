//! `BlockEncoder` / `BlockDecoder` (§4.3, §4.4 of `spec.md`).
//!
//! Pattern lookup always happens before any palette state is touched: if
//! the structural (reuse-bitmap, index-field) pair a block produces has no
//! match in [`pattern::TABLE`], the encoder falls back to pattern 15 and
//! resolves *all four* pixels independently rather than leaving behind a
//! partial commit from the abandoned reuse attempt. This keeps the
//! extended-palette cursor's advance exactly equal to what the chosen
//! pattern implies (property 3, EP monotonicity).

use crate::error::{Result, RlError};
use crate::low_level::block::Block;
use crate::low_level::palette::{ExtendedPalette, StandardPalette};
use crate::low_level::pattern::{self, ALL_EXTENDED};
use crate::pixel::Rgb565;

fn source_bit(source_bitmap: u8, pixel: usize) -> bool {
    (source_bitmap >> (3 - pixel)) & 1 == 1
}

fn set_source_bit(source_bitmap: &mut u8, pixel: usize) {
    *source_bitmap |= 1 << (3 - pixel);
}

/// Encodes one block, appending its bytes to `out`. Returns the number of
/// bytes appended.
pub fn encode_block(
    block: Block,
    alpha: Option<Rgb565>,
    sp: &StandardPalette,
    ep: &mut ExtendedPalette,
    out: &mut Vec<u8>,
) -> Result<usize> {
    let start = out.len();

    if let Some(alpha_color) = alpha {
        if block.iter().any(|&p| p == alpha_color) {
            let mut source_bitmap = 0u8;
            for (i, &p) in block.iter().enumerate() {
                if p == alpha_color {
                    set_source_bit(&mut source_bitmap, i);
                } else {
                    ep.push(p)?;
                }
            }
            out.push((source_bitmap << 4) | ALL_EXTENDED);
            return Ok(out.len() - start);
        }
    }

    // Step 1: structural reuse scan. Pixel 0 is always fresh.
    let mut reuse = 0u8;
    let mut index_field = 0u8;
    pattern::set_fresh(&mut reuse, 0, true);
    for i in 1..4 {
        if let Some(j) = (0..i).find(|&j| block[j] == block[i]) {
            pattern::set_fresh(&mut reuse, i, false);
            pattern::set_index_group(&mut index_field, i, j as u8);
        } else {
            pattern::set_fresh(&mut reuse, i, true);
        }
    }

    match pattern::find(reuse, index_field) {
        Some(pattern_index) => {
            let mut source_bitmap = 0u8;
            let mut sp_indices = Vec::new();
            for i in 0..4 {
                if pattern::is_fresh(reuse, i) {
                    resolve_fresh_pixel(block[i], sp, ep, &mut source_bitmap, i, &mut sp_indices)?;
                }
            }
            out.push((source_bitmap << 4) | pattern_index);
            out.extend_from_slice(&sp_indices);
        }
        None => {
            // No tabled pattern matches: fall back to pattern 15, treating
            // every pixel as an independent fresh reference.
            let mut source_bitmap = 0u8;
            let mut sp_indices = Vec::new();
            for i in 0..4 {
                resolve_fresh_pixel(block[i], sp, ep, &mut source_bitmap, i, &mut sp_indices)?;
            }
            out.push((source_bitmap << 4) | ALL_EXTENDED);
            out.extend_from_slice(&sp_indices);
        }
    }

    Ok(out.len() - start)
}

fn resolve_fresh_pixel(
    color: Rgb565,
    sp: &StandardPalette,
    ep: &mut ExtendedPalette,
    source_bitmap: &mut u8,
    pixel: usize,
    sp_indices: &mut Vec<u8>,
) -> Result<()> {
    if let Some(idx) = sp.find(color) {
        set_source_bit(source_bitmap, pixel);
        sp_indices.push(idx);
    } else {
        ep.push(color)?;
    }
    Ok(())
}

/// Decodes one block from `input`. `out` receives the four pixels unless it
/// is `None` (null-output / skip-decode mode), in which case the palette
/// cursors still advance identically. Returns the number of bytes consumed.
pub fn decode_block(
    input: &[u8],
    sp: &StandardPalette,
    ep: &mut ExtendedPalette,
    mut out: Option<&mut Block>,
) -> Result<usize> {
    if input.is_empty() {
        return Err(RlError::truncated(1, 0));
    }
    let header = input[0];
    let pattern_index = header & 0x0f;
    let source_bitmap = (header >> 4) & 0x0f;
    let mut consumed = 1usize;
    let mut scratch: Block = [0; 4];

    if pattern_index == ALL_EXTENDED {
        for i in 0..4 {
            if source_bit(source_bitmap, i) {
                // Alpha marker: position is left untouched (transparent).
                if let Some(o) = out.as_deref() {
                    scratch[i] = o[i];
                }
            } else {
                scratch[i] = ep.take_next()?;
            }
        }
    } else {
        let pat = pattern::get(pattern_index);
        for i in 0..4 {
            if pattern::is_fresh(pat.reuse, i) {
                if source_bit(source_bitmap, i) {
                    if consumed >= input.len() {
                        return Err(RlError::truncated(consumed + 1, input.len()));
                    }
                    let idx = input[consumed];
                    consumed += 1;
                    scratch[i] = sp
                        .get(idx)
                        .ok_or(RlError::MalformedInput("standard palette index out of range"))?;
                } else {
                    scratch[i] = ep.take_next()?;
                }
            } else {
                let src = pattern::index_group(pat.index_field, i) as usize;
                scratch[i] = scratch[src];
            }
        }
    }

    if let Some(o) = out {
        *o = scratch;
    }
    Ok(consumed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp_with(colors: &[Rgb565]) -> StandardPalette {
        let mut sp = StandardPalette::new();
        for &c in colors {
            sp.push(c);
        }
        sp
    }

    #[test]
    fn solid_block_encodes_as_pattern_zero() {
        let sp = sp_with(&[0xf800]);
        let mut ep = ExtendedPalette::new();
        let mut out = Vec::new();
        let n = encode_block([0xf800; 4], None, &sp, &mut ep, &mut out).unwrap();
        assert_eq!(n, 2);
        assert_eq!(out[0] & 0x0f, 0); // pattern 0
        assert_eq!(out[1], 0); // SP index 0
        assert_eq!(ep.len(), 0);
    }

    #[test]
    fn checkerboard_round_trips() {
        let block = [0xf800, 0x001f, 0x001f, 0xf800];
        let sp = sp_with(&[0xf800, 0x001f]);
        let mut ep = ExtendedPalette::new();
        let mut out = Vec::new();
        encode_block(block, None, &sp, &mut ep, &mut out).unwrap();

        let mut ep_decode = ExtendedPalette::new();
        let mut decoded: Block = [0; 4];
        let consumed = decode_block(&out, &sp, &mut ep_decode, Some(&mut decoded)).unwrap();
        assert_eq!(consumed, out.len());
        assert_eq!(decoded, block);
    }

    #[test]
    fn alpha_key_round_trips_and_leaves_marked_pixels_untouched() {
        const ALPHA: Rgb565 = 0xabcd;
        let block = [0xf800, ALPHA, ALPHA, 0x07e0];
        let sp = StandardPalette::new();
        let mut ep = ExtendedPalette::new();
        let mut out = Vec::new();
        encode_block(block, Some(ALPHA), &sp, &mut ep, &mut out).unwrap();
        assert_eq!(out.len(), 1); // no SP-index bytes for alpha pattern
        assert_eq!(out[0] & 0x0f, ALL_EXTENDED);
        assert_eq!(ep.len(), 2);

        let mut ep_decode = ep.clone();
        ep_decode.reset_cursor();
        let mut decoded: Block = [0x1234; 4]; // pre-seeded "background"
        decode_block(&out, &sp, &mut ep_decode, Some(&mut decoded)).unwrap();
        assert_eq!(decoded[0], 0xf800);
        assert_eq!(decoded[1], 0x1234); // untouched
        assert_eq!(decoded[2], 0x1234); // untouched
        assert_eq!(decoded[3], 0x07e0);
    }

    #[test]
    fn fallback_to_pattern_fifteen_resolves_every_pixel_independently() {
        // No structural pattern covers two independent horizontal bands
        // (pixels 0,1 one color; pixels 2,3 another) - see DESIGN.md.
        let block = [0x1111, 0x1111, 0x2222, 0x2222];
        let sp = sp_with(&[0x1111, 0x2222]);
        let mut ep = ExtendedPalette::new();
        let mut out = Vec::new();
        encode_block(block, None, &sp, &mut ep, &mut out).unwrap();
        assert_eq!(out[0] & 0x0f, ALL_EXTENDED);

        let mut ep_decode = ExtendedPalette::new();
        let mut decoded: Block = [0; 4];
        decode_block(&out, &sp, &mut ep_decode, Some(&mut decoded)).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn null_output_mode_still_advances_ep_cursor() {
        const ALPHA: Rgb565 = 0xffff;
        let block = [0x1111, ALPHA, 0x2222, ALPHA];
        let sp = StandardPalette::new();
        let mut ep = ExtendedPalette::new();
        let mut out = Vec::new();
        encode_block(block, Some(ALPHA), &sp, &mut ep, &mut out).unwrap();

        let mut ep_decode = ep.clone();
        ep_decode.reset_cursor();
        let consumed = decode_block(&out, &sp, &mut ep_decode, None).unwrap();
        assert_eq!(consumed, out.len());
        assert_eq!(ep_decode.read_cursor(), 2);
    }
}
