//! A 2x2 pixel block and the `extract`/`write` operations that move blocks
//! between an RGB565 image plane and block-coordinate space, honoring the
//! edge-mirroring rule for odd width/height images.

use crate::error::{Result, RlError};
use crate::pixel::Rgb565;

/// Four pixels, `[top-left, top-right, bottom-left, bottom-right]`.
pub type Block = [Rgb565; 4];

fn block_dims(width: u32, height: u32) -> (u32, u32) {
    ((width + 1) / 2, (height + 1) / 2)
}

fn check_bounds(bx: u32, by: u32, width: u32, height: u32) -> Result<()> {
    let (bw, bh) = block_dims(width, height);
    if bx >= bw || by >= bh {
        return Err(RlError::BlockBounds { bx, by, width, height });
    }
    Ok(())
}

/// Extracts the block at block-coordinates `(bx, by)` from `plane` (a
/// `width * height` row-major RGB565 image). Replicates edge pixels for
/// blocks that fall off an odd-sized image.
pub fn extract(plane: &[Rgb565], width: u32, height: u32, bx: u32, by: u32) -> Result<Block> {
    check_bounds(bx, by, width, height)?;

    let x0 = bx * 2;
    let y0 = by * 2;
    let right_mirrors = x0 + 1 == width;
    let bottom_mirrors = y0 + 1 == height;

    let at = |x: u32, y: u32| plane[(y * width + x) as usize];

    let tl = at(x0, y0);
    let tr = if right_mirrors { tl } else { at(x0 + 1, y0) };
    let bl = if bottom_mirrors { tl } else { at(x0, y0 + 1) };
    let br = if bottom_mirrors {
        if right_mirrors {
            tl
        } else {
            at(x0 + 1, y0)
        }
    } else if right_mirrors {
        at(x0, y0 + 1)
    } else {
        at(x0 + 1, y0 + 1)
    };

    Ok([tl, tr, bl, br])
}

/// Writes `block` back into `plane` at block-coordinates `(bx, by)`.
/// Pixels that fall outside an odd-sized image are discarded.
pub fn write(plane: &mut [Rgb565], width: u32, height: u32, bx: u32, by: u32, block: Block) -> Result<()> {
    check_bounds(bx, by, width, height)?;

    let x0 = bx * 2;
    let y0 = by * 2;
    let right_mirrors = x0 + 1 == width;
    let bottom_mirrors = y0 + 1 == height;

    let [tl, tr, bl, br] = block;
    let mut put = |x: u32, y: u32, v: Rgb565| plane[(y * width + x) as usize] = v;

    put(x0, y0, tl);
    if !right_mirrors {
        put(x0 + 1, y0, tr);
    }
    if !bottom_mirrors {
        put(x0, y0 + 1, bl);
        if !right_mirrors {
            put(x0 + 1, y0 + 1, br);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_interior_block() {
        // 4x2 image, two blocks side by side.
        let plane: Vec<Rgb565> = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let b = extract(&plane, 4, 2, 1, 0).unwrap();
        assert_eq!(b, [3, 4, 7, 8]);
    }

    #[test]
    fn extract_mirrors_odd_width() {
        // 3x2 image: rightmost block column is a single pixel wide.
        let plane: Vec<Rgb565> = vec![1, 2, 3, 4, 5, 6];
        let b = extract(&plane, 3, 2, 1, 0).unwrap();
        assert_eq!(b, [3, 3, 6, 6]);
    }

    #[test]
    fn extract_mirrors_odd_height() {
        // 2x3 image: bottom block row only has row 2 for real; row 3 is
        // mirrored from it.
        let plane: Vec<Rgb565> = vec![1, 2, 3, 4, 5, 6];
        let b = extract(&plane, 2, 3, 0, 1).unwrap();
        assert_eq!(b, [5, 6, 5, 6]);
    }

    #[test]
    fn extract_mirrors_single_corner_pixel() {
        // 3x3 image: the bottom-right block has only one real pixel, (2, 2).
        let plane: Vec<Rgb565> = vec![1, 2, 3, 4, 5, 6, 7, 8, 9];
        let b = extract(&plane, 3, 3, 1, 1).unwrap();
        assert_eq!(b, [9, 9, 9, 9]);
    }

    #[test]
    fn out_of_bounds_block_fails() {
        let plane: Vec<Rgb565> = vec![1, 2, 3, 4];
        assert!(extract(&plane, 2, 2, 5, 5).is_err());
    }

    #[test]
    fn write_then_extract_round_trips_on_odd_edges() {
        let mut plane: Vec<Rgb565> = vec![0; 6]; // 3x2
        write(&mut plane, 3, 2, 1, 0, [9, 9, 9, 9]).unwrap();
        assert_eq!(plane, vec![0, 0, 9, 0, 0, 9]);
        let back = extract(&plane, 3, 2, 1, 0).unwrap();
        assert_eq!(back, [9, 9, 9, 9]);
    }
}
