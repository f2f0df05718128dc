//! Pre-encoding quantizer (§4.8 of `spec.md`): collapses each 2x2 block to
//! at most four colors along its dominant-variance axis, grounded in the
//! same one-color/four-color structure as FFmpeg's RPZA encoder
//! (`libavcodec/rpzaenc.c`), which `original_source/quant.c` is itself
//! derived from.

use crate::error::Result;
use crate::low_level::block;
use crate::pixel::{rgb565_to_rgb888, rgb888_to_rgb565, Rgb565, Rgb888};

/// §4.8's own RGB888->RGB565 formula, distinct from (and not the same
/// channel arrangement as) `pixel::rgb888_to_rgb565`'s §6 wire contract:
/// `r` feeds the top bits here, not `b`. Using the §6 function internally
/// would silently swap the red and blue channels of every non-grayscale
/// quantized block, since `rgb565_to_rgb888` (used to read the block) and
/// `pixel::rgb888_to_rgb565` (§6) disagree on which channel maps to which
/// bit range.
fn quantized_rgb888_to_rgb565(c: Rgb888) -> Rgb565 {
    (((c.r as u16) >> 3) << 11) | (((c.g as u16) >> 2) << 5) | ((c.b as u16) >> 3)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    R,
    G,
    B,
}

fn channel_of(c: Rgb888, ch: Channel) -> u8 {
    match ch {
        Channel::R => c.r,
        Channel::G => c.g,
        Channel::B => c.b,
    }
}

fn set_channel(c: &mut Rgb888, ch: Channel, v: u8) {
    match ch {
        Channel::R => c.r = v,
        Channel::G => c.g = v,
        Channel::B => c.b = v,
    }
}

fn channel_stats(vals: [u8; 4]) -> (u8, u8, f64) {
    let min = *vals.iter().min().unwrap();
    let max = *vals.iter().max().unwrap();
    let avg = vals.iter().map(|&v| v as f64).sum::<f64>() / 4.0;
    (min, max, avg)
}

fn within_one_color_threshold(min: u8, max: u8, avg: f64) -> bool {
    (max as f64 - avg) <= 16.0 && (avg - min as f64) <= 16.0
}

fn clip_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Ordinary least squares fit of `ys` as an affine function of `xs`, plus
/// the max absolute residual. Falls back to a flat fit (slope 0) if `xs`
/// has no spread — unreachable in practice since the dominant channel is
/// chosen for having the largest range, but kept as a defensive guard
/// against division by zero.
fn least_squares_fit(xs: [f64; 4], ys: [f64; 4]) -> (f64, f64, f64) {
    let n = xs.len() as f64;
    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = xs.iter().zip(ys.iter()).map(|(x, y)| x * y).sum();
    let sum_xx: f64 = xs.iter().map(|x| x * x).sum();
    let denom = n * sum_xx - sum_x * sum_x;

    let (slope, intercept) = if denom.abs() < f64::EPSILON {
        (0.0, sum_y / n)
    } else {
        let slope = (n * sum_xy - sum_x * sum_y) / denom;
        let intercept = (sum_y - slope * sum_x) / n;
        (slope, intercept)
    };

    let max_err = (0..xs.len())
        .map(|i| (ys[i] - (slope * xs[i] + intercept)).abs())
        .fold(0.0_f64, f64::max);

    (slope, intercept, max_err)
}

fn sq_dist(a: Rgb888, b: Rgb888) -> i32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    dr * dr + dg * dg + db * db
}

fn nearest(c: Rgb888, palette: &[Rgb888; 4]) -> Rgb888 {
    *palette
        .iter()
        .min_by_key(|&&p| sq_dist(c, p))
        .expect("palette is non-empty")
}

/// Quantizes a single already-extracted block in place, per §4.8.
pub(crate) fn quantize_block(block: [Rgb565; 4]) -> [Rgb565; 4] {
    let rgb = block.map(rgb565_to_rgb888);
    let r_vals = rgb.map(|c| c.r);
    let g_vals = rgb.map(|c| c.g);
    let b_vals = rgb.map(|c| c.b);

    let (r_min, r_max, r_avg) = channel_stats(r_vals);
    let (g_min, g_max, g_avg) = channel_stats(g_vals);
    let (b_min, b_max, b_avg) = channel_stats(b_vals);

    if within_one_color_threshold(r_min, r_max, r_avg)
        && within_one_color_threshold(g_min, g_max, g_avg)
        && within_one_color_threshold(b_min, b_max, b_avg)
    {
        let avg = Rgb888::new(clip_u8(r_avg), clip_u8(g_avg), clip_u8(b_avg));
        let avg565 = quantized_rgb888_to_rgb565(avg);
        return [avg565; 4];
    }

    let ranges = [
        (Channel::R, r_max as i32 - r_min as i32),
        (Channel::G, g_max as i32 - g_min as i32),
        (Channel::B, b_max as i32 - b_min as i32),
    ];
    let dominant = ranges.iter().max_by_key(|(_, r)| *r).unwrap().0;
    let dom_vals = match dominant {
        Channel::R => r_vals,
        Channel::G => g_vals,
        Channel::B => b_vals,
    };
    let (dom_min, dom_max, _) = channel_stats(dom_vals);
    let dom_f = dom_vals.map(|v| v as f64);

    let others: Vec<Channel> = [Channel::R, Channel::G, Channel::B]
        .into_iter()
        .filter(|&c| c != dominant)
        .collect();

    let fits: Vec<(Channel, f64, f64, f64)> = others
        .iter()
        .map(|&ch| {
            let vals = match ch {
                Channel::R => r_vals,
                Channel::G => g_vals,
                Channel::B => b_vals,
            };
            let (slope, intercept, max_err) = least_squares_fit(dom_f, vals.map(|v| v as f64));
            (ch, slope, intercept, max_err)
        })
        .collect();

    let combined_err = fits.iter().map(|f| f.3).fold(0.0_f64, f64::max);
    if combined_err > 8.0 {
        // Fit is too poor to approximate with a 4-color ramp; leave the
        // block untouched (the encoder will fall back to the extended
        // palette for it).
        return block;
    }

    let dom_min_f = dom_min as f64;
    let dom_max_f = dom_max as f64;
    let step = ((dom_max as i32 - dom_min as i32 + 1) as f64) / 3.0;
    let dom_samples = [dom_min_f, dom_min_f + step, dom_max_f - step, dom_max_f];

    let mut palette = [Rgb888::default(); 4];
    for (i, &d) in dom_samples.iter().enumerate() {
        let mut c = Rgb888::default();
        set_channel(&mut c, dominant, clip_u8(d));
        for &(ch, slope, intercept, _) in &fits {
            set_channel(&mut c, ch, clip_u8(slope * d + intercept));
        }
        palette[i] = c;
    }

    let mut out = [0u16; 4];
    for i in 0..4 {
        out[i] = quantized_rgb888_to_rgb565(nearest(rgb[i], &palette));
    }
    out
}

/// Quantizes an entire RGB565 plane in place, block by block.
pub fn quantize(plane: &mut [Rgb565], width: u32, height: u32) -> Result<()> {
    let blocks_wide = (width + 1) / 2;
    let blocks_high = (height + 1) / 2;

    for by in 0..blocks_high {
        for bx in 0..blocks_wide {
            let blk = block::extract(plane, width, height, bx, by)?;
            let quantized = quantize_block(blk);
            block::write(plane, width, height, bx, by, quantized)?;
        }
    }
    Ok(())
}
