//! Reference CLI: `rlcodec -d <input.rl>` decodes every frame to
//! `<input.rl>_<frame>.png`; `rlcodec -e <out.rl> <frame0.png> [frame1.png ...]`
//! quantizes and encodes one or more same-sized PNGs into an RL file.
//!
//! Argument parsing is hand-rolled rather than pulled in from a crate: the
//! surface is exactly two flags, matching `original_source/main.c`'s own
//! minimalism.

use std::path::Path;
use std::process::ExitCode;

use image::{ImageBuffer, Rgb, RgbImage};
use rlcodec::{rgb565_to_rgb888, rgb888_to_rgb565, Decoder, Encoder, Rgb565};

fn main() -> ExitCode {
    #[cfg(feature = "cli-logging")]
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let result = match args.get(1).map(String::as_str) {
        Some("-d") => args.get(2).map_or_else(|| usage(&args[0]), |input| decode(input)),
        Some("-e") => run_encode(&args),
        _ => usage(&args[0]),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn usage(argv0: &str) -> Result<(), String> {
    Err(format!("Usage: {argv0} -d <input> | -e <output> <frame0.png> [frame1.png ...]"))
}

fn run_encode(args: &[String]) -> Result<(), String> {
    if args.len() < 4 {
        return usage(&args[0]);
    }
    encode(&args[2], &args[3..])
}

fn decode(input: &str) -> Result<(), String> {
    log::info!("reading {input}");
    let dec = Decoder::from_file(input).map_err(|e| format!("Failed to get info from file {input}: {e}"))?;
    println!("Width: {}, Height: {}, Frames: {}", dec.width(), dec.height(), dec.frame_count());

    for frame in 0..dec.frame_count() {
        log::debug!("decoding frame {frame}");
        let pixels = dec
            .decode_frame(frame)
            .map_err(|e| format!("Failed to decode frame {frame}: {e}"))?;
        let out_path = format!("{input}_{frame}.png");
        save_png(&pixels, dec.width(), dec.height(), &out_path)
            .map_err(|e| format!("Failed to convert frame {frame}: {e}"))?;
        log::info!("wrote {out_path}");
    }
    Ok(())
}

fn encode(out_path: &str, png_paths: &[String]) -> Result<(), String> {
    for p in png_paths {
        if !has_png_extension(p) {
            return Err(format!("File {p} is not a PNG file"));
        }
    }

    let mut frames = png_paths.iter();
    let first = frames.next().expect("run_encode already checked at least one frame");
    let (width, height, first_plane) = load_png(first)?;

    log::info!("encoding {width}x{height}, {} frame(s)", png_paths.len());
    let mut enc = Encoder::new(width, height, None);
    let mut plane = first_plane;
    enc.add_frame(&mut plane).map_err(|e| format!("Failed to encode {first}: {e}"))?;

    for path in frames {
        let (w, h, mut plane) = load_png(path)?;
        if w != width || h != height {
            return Err(format!("{path} has different dimensions"));
        }
        enc.add_frame(&mut plane).map_err(|e| format!("Failed to encode {path}: {e}"))?;
    }

    let file = std::fs::File::create(out_path).map_err(|e| format!("Failed to open file {out_path}: {e}"))?;
    let written = enc
        .finish(std::io::BufWriter::new(file))
        .map_err(|e| format!("Failed to write {out_path}: {e}"))?;
    log::info!("wrote {out_path} ({written} bytes)");
    Ok(())
}

fn has_png_extension(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

fn load_png(path: &str) -> Result<(u32, u32, Vec<Rgb565>), String> {
    let img = image::open(path).map_err(|e| format!("Failed to convert PNG file {path}: {e}"))?.to_rgb8();
    let (width, height) = img.dimensions();
    let plane = img
        .pixels()
        .map(|p| rgb888_to_rgb565(rlcodec::Rgb888::new(p[0], p[1], p[2])))
        .collect();
    Ok((width, height, plane))
}

fn save_png(pixels: &[Rgb565], width: u32, height: u32, path: &str) -> image::ImageResult<()> {
    let buf: RgbImage = ImageBuffer::from_fn(width, height, |x, y| {
        let c = rgb565_to_rgb888(pixels[(y * width + x) as usize]);
        Rgb([c.r, c.g, c.b])
    });
    buf.save(path)
}
