//! Distance function
//!
//! Chessboard (8-connected) or city-block (4-connected) distance from
//! every foreground pixel to the nearest background pixel, computed with
//! one raster and one anti-raster pass.

use super::check_binary;
use crate::conncomp::ConnectivityType;
use crate::error::{RegionError, RegionResult};
use pixmorph_core::{Pix, PixMut, PixelDepth};

/// Boundary condition for distance function computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryCondition {
    /// Pixels outside the image are background: the one-pixel frame of
    /// the result is 0.
    #[default]
    Background,
    /// Pixels outside the image are foreground: distances are measured
    /// only to background inside the image.
    Foreground,
}

const RASTER_4: &[(i32, i32)] = &[(0, -1), (-1, 0)];
const RASTER_8: &[(i32, i32)] = &[(-1, -1), (0, -1), (1, -1), (-1, 0)];
const ANTI_4: &[(i32, i32)] = &[(0, 1), (1, 0)];
const ANTI_8: &[(i32, i32)] = &[(1, 1), (0, 1), (-1, 1), (1, 0)];

#[inline]
fn min_neighbor(pixd: &PixMut, x: i32, y: i32, offsets: &[(i32, i32)]) -> u32 {
    offsets
        .iter()
        .map(|&(dx, dy)| pixd.get_pixel_unchecked((x + dx) as u32, (y + dy) as u32))
        .min()
        .unwrap_or(0)
}

/// Raster then anti-raster propagation over the interior of `pixd`.
///
/// The frame is read but never written.
fn propagate(pixd: &mut PixMut, connectivity: ConnectivityType, cap: u32) {
    let w = pixd.width() as i32;
    let h = pixd.height() as i32;
    let (raster, anti) = match connectivity {
        ConnectivityType::FourWay => (RASTER_4, ANTI_4),
        ConnectivityType::EightWay => (RASTER_8, ANTI_8),
    };

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            if pixd.get_pixel_unchecked(x as u32, y as u32) == 0 {
                continue;
            }
            let val = (min_neighbor(pixd, x, y, raster) + 1).min(cap);
            pixd.set_pixel_unchecked(x as u32, y as u32, val);
        }
    }

    for y in (1..h - 1).rev() {
        for x in (1..w - 1).rev() {
            let val = pixd.get_pixel_unchecked(x as u32, y as u32);
            if val == 0 {
                continue;
            }
            let val = (min_neighbor(pixd, x, y, anti) + 1).min(val);
            pixd.set_pixel_unchecked(x as u32, y as u32, val);
        }
    }
}

/// Copy the ring of pixels just inside the frame onto the frame.
fn mirror_frame(pixd: &mut PixMut) {
    let w = pixd.width();
    let h = pixd.height();
    for y in 0..h {
        let v = pixd.get_pixel_unchecked(1, y);
        pixd.set_pixel_unchecked(0, y, v);
        let v = pixd.get_pixel_unchecked(w - 2, y);
        pixd.set_pixel_unchecked(w - 1, y, v);
    }
    for x in 0..w {
        let v = pixd.get_pixel_unchecked(x, 1);
        pixd.set_pixel_unchecked(x, 0, v);
        let v = pixd.get_pixel_unchecked(x, h - 2);
        pixd.set_pixel_unchecked(x, h - 1, v);
    }
}

/// Compute the distance from each foreground pixel to the nearest
/// background pixel.
///
/// Uses one forward and one backward raster scan. Values saturate at
/// 254 for 8-bpp output and at 65534 for 16-bpp output.
///
/// # Arguments
///
/// * `pix` - 1-bpp binary input image
/// * `connectivity` - `FourWay` gives city-block distance, `EightWay`
///   gives chessboard distance
/// * `out_depth` - Output depth: [`PixelDepth::Bit8`] or
///   [`PixelDepth::Bit16`]
/// * `boundary_cond` - How to treat pixels outside the image
///
/// # Errors
///
/// Returns [`RegionError::UnsupportedDepth`] if `pix` is not 1 bpp or
/// `out_depth` is neither 8 nor 16.
pub fn distance_function(
    pix: &Pix,
    connectivity: ConnectivityType,
    out_depth: PixelDepth,
    boundary_cond: BoundaryCondition,
) -> RegionResult<Pix> {
    check_binary(pix)?;
    let cap = match out_depth {
        PixelDepth::Bit8 => 254,
        PixelDepth::Bit16 => 0xfffe,
        d => {
            return Err(RegionError::UnsupportedDepth {
                expected: "8 or 16-bit output",
                actual: d.bits(),
            });
        }
    };

    let (w, h) = (pix.width(), pix.height());
    let mut pixd = Pix::new(w, h, out_depth)?.to_mut();
    pixd.copy_resolution_from(pix);
    for y in 0..h {
        for x in 0..w {
            if pix.get_pixel_unchecked(x, y) != 0 {
                pixd.set_pixel_unchecked(x, y, 1);
            }
        }
    }

    match boundary_cond {
        BoundaryCondition::Background => {
            pixd.set_or_clear_border(1, 1, 1, 1, 0);
            propagate(&mut pixd, connectivity, cap);
        }
        BoundaryCondition::Foreground if w < 3 || h < 3 => {
            log::debug!("distance_function: {w}x{h} image has no interior; foreground left at 1");
        }
        BoundaryCondition::Foreground => {
            pixd.set_or_clear_border(1, 1, 1, 1, out_depth.max_value());
            propagate(&mut pixd, connectivity, cap);
            mirror_frame(&mut pixd);
        }
    }

    Ok(pixd.into())
}
