//! Grayscale seedfill (morphological reconstruction)
//!
//! Supports 8 and 16 bpp seed / mask pairs of the same depth.

use crate::conncomp::ConnectivityType;
use crate::error::{RegionError, RegionResult};
use pixmorph_core::pix::{get_data_byte, get_data_two_bytes, set_data_byte, set_data_two_bytes};
use pixmorph_core::{Pix, PixMut, PixelDepth};

type Getter = fn(&[u32], u32) -> u32;
type Setter = fn(&mut [u32], u32, u32);

fn accessors(seed_depth: PixelDepth, mask: &Pix) -> RegionResult<(Getter, Setter)> {
    let pair: (Getter, Setter) = match mask.depth() {
        PixelDepth::Bit8 => (get_data_byte, set_data_byte),
        PixelDepth::Bit16 => (get_data_two_bytes, set_data_two_bytes),
        d => {
            return Err(RegionError::UnsupportedDepth {
                expected: "8 or 16-bit",
                actual: d.bits(),
            });
        }
    };
    if seed_depth != mask.depth() {
        return Err(RegionError::InvalidParameters(format!(
            "seed depth {} differs from mask depth {}",
            seed_depth.bits(),
            mask.depth().bits()
        )));
    }
    Ok(pair)
}

/// Propagation direction of a reconstruction.
#[derive(Clone, Copy)]
enum Fill {
    /// Maxima grow upward, clipped from above by the mask
    Up,
    /// Minima grow downward, clipped from below by the mask
    Down,
}

impl Fill {
    #[inline]
    fn combine(self, a: u32, b: u32) -> u32 {
        match self {
            Fill::Up => a.max(b),
            Fill::Down => a.min(b),
        }
    }

    #[inline]
    fn clip(self, val: u32, maskval: u32) -> u32 {
        match self {
            Fill::Up => val.min(maskval),
            Fill::Down => val.max(maskval),
        }
    }

    /// Mask value at which a pixel takes no part in the fill.
    #[inline]
    fn excluded(self, maskval: u32, maxval: u32) -> bool {
        match self {
            Fill::Up => maskval == 0,
            Fill::Down => maskval == maxval,
        }
    }
}

/// Causal neighbor offsets for the raster pass: (dx, dy).
const RASTER_4: &[(i32, i32)] = &[(-1, 0), (0, -1)];
const RASTER_8: &[(i32, i32)] = &[(-1, 0), (-1, -1), (0, -1), (1, -1)];
/// Causal neighbor offsets for the anti-raster pass.
const ANTI_4: &[(i32, i32)] = &[(1, 0), (0, 1)];
const ANTI_8: &[(i32, i32)] = &[(1, 0), (1, 1), (0, 1), (-1, 1)];

fn reconstruct_cycle(
    seed: &mut PixMut,
    mask: &Pix,
    connectivity: ConnectivityType,
    fill: Fill,
) -> RegionResult<bool> {
    let (get, set) = accessors(seed.depth(), mask)?;
    let maxval = mask.depth().max_value();
    let w = seed.width().min(mask.width()) as i32;
    let h = seed.height().min(mask.height()) as i32;
    let wpls = seed.wpl() as usize;
    let wplm = mask.wpl() as usize;
    let (raster, anti) = match connectivity {
        ConnectivityType::FourWay => (RASTER_4, ANTI_4),
        ConnectivityType::EightWay => (RASTER_8, ANTI_8),
    };

    let mdata = mask.data();
    let sdata = seed.data_mut();
    let mut changed = false;

    let mut visit = |x: i32, y: i32, offsets: &[(i32, i32)], sdata: &mut [u32]| {
        let maskval = get(&mdata[y as usize * wplm..], x as u32);
        if fill.excluded(maskval, maxval) {
            return;
        }
        let line = y as usize * wpls;
        let val = get(&sdata[line..], x as u32);
        let mut acc = val;
        for &(dx, dy) in offsets {
            let (nx, ny) = (x + dx, y + dy);
            if nx < 0 || ny < 0 || nx >= w || ny >= h {
                continue;
            }
            acc = fill.combine(acc, get(&sdata[ny as usize * wpls..], nx as u32));
        }
        let newval = fill.clip(acc, maskval);
        if newval != val {
            set(&mut sdata[line..], x as u32, newval);
            changed = true;
        }
    };

    for y in 0..h {
        for x in 0..w {
            visit(x, y, raster, sdata);
        }
    }
    for y in (0..h).rev() {
        for x in (0..w).rev() {
            visit(x, y, anti, sdata);
        }
    }

    Ok(changed)
}

/// Clamp the seed against the mask over their common region and repeat
/// a cycle until nothing changes.
fn reconstruct(
    seed: &Pix,
    mask: &Pix,
    connectivity: ConnectivityType,
    fill: Fill,
) -> RegionResult<Pix> {
    accessors(seed.depth(), mask)?;
    let mut pixd = seed.to_mut();
    let w = seed.width().min(mask.width());
    let h = seed.height().min(mask.height());
    for y in 0..h {
        for x in 0..w {
            let s = pixd.get_pixel_unchecked(x, y);
            let m = mask.get_pixel_unchecked(x, y);
            pixd.set_pixel_unchecked(x, y, fill.clip(s, m));
        }
    }

    let mut cycles = 1;
    while reconstruct_cycle(&mut pixd, mask, connectivity, fill)? {
        cycles += 1;
    }
    log::debug!("grayscale reconstruction converged after {cycles} cycles");
    Ok(pixd.into())
}

/// One raster + anti-raster cycle of grayscale reconstruction.
///
/// Each pixel takes the maximum of itself and its causal neighbors,
/// clipped to the mask value at that pixel. Pixels where the mask is 0
/// are left alone. Neighbors outside the image are ignored.
///
/// # Returns
///
/// `true` if any pixel of `seed` changed.
///
/// # Errors
///
/// Returns [`RegionError::UnsupportedDepth`] unless the mask is 8 or
/// 16 bpp, and [`RegionError::InvalidParameters`] if seed and mask
/// depths differ.
pub fn seedfill_gray_low(
    seed: &mut PixMut,
    mask: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<bool> {
    reconstruct_cycle(seed, mask, connectivity, Fill::Up)
}

/// Grayscale reconstruction of `seed` under `mask`.
///
/// The seed is first clipped to `min(seed, mask)`, then
/// [`seedfill_gray_low`] is repeated until convergence.
///
/// # Arguments
///
/// * `seed` - 8 or 16-bpp seed image
/// * `mask` - Mask of the same depth (upper bound)
/// * `connectivity` - 4 or 8-way connectivity
pub fn seedfill_gray(seed: &Pix, mask: &Pix, connectivity: ConnectivityType) -> RegionResult<Pix> {
    reconstruct(seed, mask, connectivity, Fill::Up)
}

/// One raster + anti-raster cycle of inverse grayscale reconstruction.
///
/// Each pixel takes the minimum of itself and its causal neighbors,
/// clipped from below by the mask. Pixels where the mask holds the
/// maximum value for the depth are left alone.
pub fn seedfill_gray_inv_low(
    seed: &mut PixMut,
    mask: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<bool> {
    reconstruct_cycle(seed, mask, connectivity, Fill::Down)
}

/// Inverse grayscale seedfill (basin filling).
///
/// Like [`seedfill_gray`], but the seed value is propagated *downward*
/// (clipped from below by the mask) rather than upward.
///
/// # Arguments
///
/// * `seed` - Seed image, raised to `max(seed, mask)` before filling
/// * `mask` - Mask of the same depth (lower bound)
/// * `connectivity` - 4 or 8-way connectivity
pub fn seedfill_gray_inv(
    seed: &Pix,
    mask: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<Pix> {
    reconstruct(seed, mask, connectivity, Fill::Down)
}
