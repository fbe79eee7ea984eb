//! Word-parallel binary seedfill
//!
//! The raster pass pulls bits from the row above and the word to the
//! left, the anti-raster pass from the row below and the word to the
//! right. After each word has picked up its causal neighbors it is
//! clipped by the mask and grown horizontally inside the mask.

use super::check_binary;
use crate::conncomp::ConnectivityType;
use crate::error::RegionResult;
use pixmorph_core::pix::bits::{
    BitRowLayout, carry_from_left, carry_from_right, fill_word_horizontal,
};
use pixmorph_core::{Pix, PixMut};

/// Contribution of a neighboring row to word `j`.
///
/// `row` is the full row slice; for 8-connectivity the diagonal
/// neighbors in the same and adjacent words are included.
#[inline]
fn vertical_contribution(row: &[u32], j: usize, wpl: usize, eight: bool) -> u32 {
    let word = row[j];
    if !eight {
        return word;
    }
    let mut acc = word | (word << 1) | (word >> 1);
    if j > 0 {
        acc |= carry_from_left(row[j - 1]);
    }
    if j + 1 < wpl {
        acc |= carry_from_right(row[j + 1]);
    }
    acc
}

/// One raster + anti-raster cycle of binary reconstruction.
///
/// `seed` is updated in place and never grows outside `mask`. Only the
/// region common to both images is processed.
///
/// # Arguments
///
/// * `seed` - 1-bpp seed image, modified in place
/// * `mask` - 1-bpp filling mask
/// * `connectivity` - 4 or 8-way connectivity
///
/// # Returns
///
/// `true` if any pixel of `seed` changed during the cycle.
///
/// # Errors
///
/// Returns [`RegionError::UnsupportedDepth`](crate::RegionError) if either
/// image is not 1 bpp.
pub fn seedfill_binary_low(
    seed: &mut PixMut,
    mask: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<bool> {
    check_binary(mask)?;
    if seed.depth() != mask.depth() {
        return Err(crate::RegionError::UnsupportedDepth {
            expected: "1-bit",
            actual: seed.depth().bits(),
        });
    }

    let h = seed.height().min(mask.height()) as usize;
    let layout = BitRowLayout::new(seed.width().min(mask.width()), 1);
    let wpl = layout.wpl;
    let wpls = seed.wpl() as usize;
    let wplm = mask.wpl() as usize;
    let eight = connectivity == ConnectivityType::EightWay;

    let mdata = mask.data();
    let sdata = seed.data_mut();
    let mut changed = false;

    // UL --> LR
    for i in 0..h {
        let (above, rest) = sdata.split_at_mut(i * wpls);
        let row = &mut rest[..wpls];
        let above = (i > 0).then(|| &above[(i - 1) * wpls..i * wpls]);
        let mrow = &mdata[i * wplm..i * wplm + wplm];
        for j in 0..wpl {
            let mword = mrow[j] & layout.mask_for(j);
            let old = row[j];
            let mut word = old;
            if let Some(above) = above {
                word |= vertical_contribution(above, j, wpl, eight);
            }
            if j > 0 {
                word |= carry_from_left(row[j - 1]);
            }
            word = fill_word_horizontal(word & mword, mword);
            if word != old {
                changed = true;
                row[j] = word;
            }
        }
    }

    // LR --> UL
    for i in (0..h).rev() {
        let (head, below) = sdata.split_at_mut((i + 1) * wpls);
        let row = &mut head[i * wpls..];
        let below = (i + 1 < h).then(|| &below[..wpls]);
        let mrow = &mdata[i * wplm..i * wplm + wplm];
        for j in (0..wpl).rev() {
            let mword = mrow[j] & layout.mask_for(j);
            let old = row[j];
            let mut word = old;
            if let Some(below) = below {
                word |= vertical_contribution(below, j, wpl, eight);
            }
            if j + 1 < wpl {
                word |= carry_from_right(row[j + 1]);
            }
            word = fill_word_horizontal(word & mword, mword);
            if word != old {
                changed = true;
                row[j] = word;
            }
        }
    }

    Ok(changed)
}

/// Binary reconstruction of `seed` under `mask`.
///
/// Repeats [`seedfill_binary_low`] until the seed stops changing, so
/// every mask component that contains a seed pixel ends up completely
/// filled.
///
/// # Arguments
///
/// * `seed` - 1-bpp seed image
/// * `mask` - 1-bpp filling mask; the result never exceeds it
/// * `connectivity` - 4 or 8-way connectivity
///
/// # Returns
///
/// The filled seed, with the size of `seed`.
pub fn seedfill_binary(
    seed: &Pix,
    mask: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<Pix> {
    check_binary(seed)?;
    check_binary(mask)?;
    if seed.width() != mask.width() || seed.height() != mask.height() {
        log::debug!(
            "seedfill_binary: seed {}x{} and mask {}x{} differ; clipping to the smaller",
            seed.width(),
            seed.height(),
            mask.width(),
            mask.height()
        );
    }

    let mut pixd = seed.to_mut();
    let mut cycles = 1;
    while seedfill_binary_low(&mut pixd, mask, connectivity)? {
        cycles += 1;
    }
    log::debug!("seedfill_binary: converged after {cycles} cycles");
    Ok(pixd.into())
}

#[cfg(test)]
mod tests {
    use super::super::tests::create_test_image;
    use super::*;
    use pixmorph_core::PixelDepth;

    fn full(w: u32, h: u32) -> Pix {
        let mut pm = Pix::new(w, h, PixelDepth::Bit1).unwrap().to_mut();
        pm.set_all();
        pm.into()
    }

    #[test]
    fn test_full_mask_single_seed() {
        let mask = full(10, 10);
        let seed = create_test_image(10, 10, &[(5, 5)]);
        let filled = seedfill_binary(&seed, &mask, ConnectivityType::FourWay).unwrap();
        assert_eq!(filled.count_pixels(), 100);
    }

    #[test]
    fn test_low_performs_one_cycle() {
        // Arch: up the left leg, across the top, down the right leg.
        // The anti-raster pass climbs the left leg; descending the right
        // leg needs the raster pass of a second cycle.
        let mut pixels = Vec::new();
        for y in 0..5 {
            pixels.push((0, y));
            pixels.push((7, y));
        }
        for x in 1..7 {
            pixels.push((x, 0));
        }
        let mask = create_test_image(8, 5, &pixels);
        let seed = create_test_image(8, 5, &[(0, 4)]);

        let mut pm = seed.to_mut();
        assert!(seedfill_binary_low(&mut pm, &mask, ConnectivityType::FourWay).unwrap());
        let after_one: Pix = pm.into();
        assert!(after_one.count_pixels() < mask.count_pixels());

        let filled = seedfill_binary(&seed, &mask, ConnectivityType::FourWay).unwrap();
        assert!(filled.equals(&mask));
    }

    #[test]
    fn test_diagonal_needs_eight_way() {
        let mask = create_test_image(4, 4, &[(0, 0), (1, 1), (2, 2), (3, 3)]);
        let seed = create_test_image(4, 4, &[(0, 0)]);
        let four = seedfill_binary(&seed, &mask, ConnectivityType::FourWay).unwrap();
        let eight = seedfill_binary(&seed, &mask, ConnectivityType::EightWay).unwrap();
        assert_eq!(four.count_pixels(), 1);
        assert_eq!(eight.count_pixels(), 4);
    }

    #[test]
    fn test_crosses_word_boundaries() {
        // Horizontal bar across three words on row 1, vertical bar at x=70
        let mut pixels: Vec<(u32, u32)> = (0..80).map(|x| (x, 1)).collect();
        pixels.extend((1..6).map(|y| (70, y)));
        let mask = create_test_image(80, 6, &pixels);
        let seed = create_test_image(80, 6, &[(70, 5)]);
        let filled = seedfill_binary(&seed, &mask, ConnectivityType::FourWay).unwrap();
        assert!(filled.equals(&mask));
        // Pad bits of the last word stay clear
        assert_eq!(filled.row_data(1)[2] & 0x0000_ffff, 0);
    }

    #[test]
    fn test_seed_outside_mask_is_removed() {
        let mask = create_test_image(6, 6, &[(1, 1), (2, 1)]);
        let seed = create_test_image(6, 6, &[(1, 1), (4, 4)]);
        let filled = seedfill_binary(&seed, &mask, ConnectivityType::EightWay).unwrap();
        assert!(filled.equals(&mask));
    }
}
