//! Container header encode/decode (§4.7 of `spec.md`): magic, version
//! selection, per-version info header.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::error::{Result, RlError};
use crate::low_level::{HEADER_SIZE, MAGIC, VERSION_16BIT_DIMS, VERSION_8BIT_DIMS};

/// Decoded container-level metadata, common to both wire versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerInfo {
    pub frames: u8,
    pub width: u32,
    pub height: u32,
    pub pixel_bytes: u8,
    /// 8-bit compression-savings estimate (see `Savings` in the glossary).
    pub savings: u8,
    pub w_odd: bool,
    pub h_odd: bool,
    pub reserved: u32,
}

/// Parses the base + info header. Dispatches on the version word read at
/// offset 2; the `==` comparison here is deliberate — the original source's
/// `get_info` used assignment (`=`) at this spot, a bug `spec.md` §9 calls
/// out as unintended. Fails (instead of returning a sentinel zero) on bad
/// magic, unknown version, or `pixel_bytes != 2`.
pub fn get_info(bytes: &[u8]) -> Result<ContainerInfo> {
    if bytes.len() < HEADER_SIZE {
        return Err(RlError::truncated(HEADER_SIZE, bytes.len()));
    }
    let magic = LittleEndian::read_u16(bytes);
    if magic != MAGIC {
        return Err(RlError::MalformedInput("bad magic"));
    }
    let version = LittleEndian::read_u16(&bytes[2..]);
    let frames = bytes[4];

    match version {
        VERSION_8BIT_DIMS => {
            let width = bytes[5] as u32;
            let height = bytes[6] as u32;
            let pixel_bytes = bytes[7];
            if pixel_bytes != 2 {
                return Err(RlError::MalformedInput("pixel_bytes != 2"));
            }
            let attrs = LittleEndian::read_u32(&bytes[8..]);
            Ok(ContainerInfo {
                frames,
                width,
                height,
                pixel_bytes,
                savings: (attrs & 0xff) as u8,
                w_odd: (attrs >> 8) & 1 == 1,
                h_odd: (attrs >> 9) & 1 == 1,
                reserved: attrs >> 10,
            })
        }
        VERSION_16BIT_DIMS => {
            let width = LittleEndian::read_u16(&bytes[5..]) as u32;
            let height = LittleEndian::read_u16(&bytes[7..]) as u32;
            let pixel_bytes = bytes[9];
            if pixel_bytes != 2 {
                return Err(RlError::MalformedInput("pixel_bytes != 2"));
            }
            let attrs = LittleEndian::read_u16(&bytes[10..]);
            Ok(ContainerInfo {
                frames,
                width,
                height,
                pixel_bytes,
                savings: (attrs & 0xff) as u8,
                w_odd: (attrs >> 8) & 1 == 1,
                h_odd: (attrs >> 9) & 1 == 1,
                reserved: (attrs >> 10) as u32,
            })
        }
        _ => Err(RlError::MalformedInput("unknown container version")),
    }
}

/// Chooses a version (`0x1210` if `width <= 255 && height <= 255`, else
/// `0x1013`) and writes the base + info header. `w_odd`/`h_odd` are always
/// computed as `width & 1` / `height & 1` — the source computes `W % 1`,
/// always zero; `spec.md` §9 says this is a bug and defines `& 1` as the
/// intended semantics.
pub fn make_info(frames: u8, width: u32, height: u32, savings: u8, reserved: u32) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(RlError::MalformedInput("width and height must be non-zero"));
    }
    if width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(RlError::MalformedInput("width/height exceed 16-bit range"));
    }

    let version = if width <= 255 && height <= 255 { VERSION_8BIT_DIMS } else { VERSION_16BIT_DIMS };
    let w_odd = width & 1;
    let h_odd = height & 1;

    let mut out = Vec::with_capacity(HEADER_SIZE);
    out.write_u16::<LittleEndian>(MAGIC)?;
    out.write_u16::<LittleEndian>(version)?;
    out.push(frames);

    match version {
        VERSION_8BIT_DIMS => {
            out.push(width as u8);
            out.push(height as u8);
            out.push(2);
            let attrs = (savings as u32) | (w_odd << 8) | (h_odd << 9) | ((reserved & 0x3f_ffff) << 10);
            out.write_u32::<LittleEndian>(attrs)?;
        }
        VERSION_16BIT_DIMS => {
            out.write_u16::<LittleEndian>(width as u16)?;
            out.write_u16::<LittleEndian>(height as u16)?;
            out.push(2);
            let attrs = (savings as u16) | ((w_odd as u16) << 8) | ((h_odd as u16) << 9) | (((reserved & 0x3f) as u16) << 10);
            out.write_u16::<LittleEndian>(attrs)?;
        }
        _ => unreachable!(),
    }

    debug_assert_eq!(out.len(), HEADER_SIZE);
    Ok(out)
}

/// `ceil((raw_bytes - coded_bytes) / 2 / 256)`, clamped to `u8`.
pub fn calc_savings(raw_bytes: u64, coded_bytes: u64) -> u8 {
    let diff = raw_bytes.saturating_sub(coded_bytes);
    let halved = diff / 2;
    let savings = halved.div_ceil(256);
    savings.min(u8::MAX as u64) as u8
}
