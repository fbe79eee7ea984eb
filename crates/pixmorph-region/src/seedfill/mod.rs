//! Seed fill operations
//!
//! Morphological reconstruction of a seed image under a mask, for binary
//! and grayscale images, together with the distance function that shares
//! the same raster / anti-raster sweep structure.
//!
//! Every `*_low` primitive performs exactly one raster pass followed by
//! one anti-raster pass and reports whether anything changed. The
//! wrappers without the suffix repeat the primitive until it reports no
//! change.

mod binary;
mod distance;
mod gray;

pub use binary::{seedfill_binary, seedfill_binary_low};
pub use distance::{BoundaryCondition, distance_function};
pub use gray::{seedfill_gray, seedfill_gray_inv, seedfill_gray_inv_low, seedfill_gray_low};

use crate::conncomp::ConnectivityType;
use crate::error::{RegionError, RegionResult};
use pixmorph_core::{Pix, PixelDepth};

pub(crate) fn check_binary(pix: &Pix) -> RegionResult<()> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(RegionError::UnsupportedDepth {
            expected: "1-bit",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}

/// Find the holes of a binary image.
///
/// A hole is a background pixel that cannot be reached from the image
/// border by moving through background with `connectivity`.
///
/// # Arguments
///
/// * `pix` - 1-bpp input image
/// * `connectivity` - Connectivity of the background fill; use the
///   complement of the foreground connectivity
///
/// # Returns
///
/// A 1-bpp image whose foreground is exactly the hole pixels.
pub fn holes_by_filling(pix: &Pix, connectivity: ConnectivityType) -> RegionResult<Pix> {
    check_binary(pix)?;

    let background = pix.invert();
    let mut frame = pix.create_template().to_mut();
    frame.set_or_clear_border(1, 1, 1, 1, 1);
    let seed: Pix = frame.into();

    let reached = seedfill_binary(&seed, &background, connectivity)?;
    let covered = reached.or(pix)?;
    Ok(covered.invert())
}

/// Fill interior holes (background regions completely surrounded by
/// foreground).
///
/// # Arguments
///
/// * `pix` - 1-bpp input image
/// * `connectivity` - Connectivity used to flood the background
///
/// # Returns
///
/// A new image with holes filled.
pub fn fill_holes(pix: &Pix, connectivity: ConnectivityType) -> RegionResult<Pix> {
    let holes = holes_by_filling(pix, connectivity)?;
    Ok(pix.or(&holes)?)
}

/// Remove every foreground component that touches the image border.
pub fn remove_border_components(pix: &Pix, connectivity: ConnectivityType) -> RegionResult<Pix> {
    check_binary(pix)?;

    let mut frame = pix.create_template().to_mut();
    frame.set_or_clear_border(1, 1, 1, 1, 1);
    let seed = pix.and(&frame.into())?;

    let touching = seedfill_binary(&seed, pix, connectivity)?;
    Ok(pix.subtract(&touching)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(super) fn create_test_image(width: u32, height: u32, pixels: &[(u32, u32)]) -> Pix {
        let mut pix_mut = Pix::new(width, height, PixelDepth::Bit1).unwrap().to_mut();
        for &(x, y) in pixels {
            pix_mut.set_pixel(x, y, 1).unwrap();
        }
        pix_mut.into()
    }

    fn ring() -> Pix {
        let mut pixels = Vec::new();
        for x in 1..4 {
            pixels.push((x, 1));
            pixels.push((x, 3));
        }
        pixels.push((1, 2));
        pixels.push((3, 2));
        create_test_image(5, 5, &pixels)
    }

    #[test]
    fn test_holes_by_filling_ring() {
        let holes = holes_by_filling(&ring(), ConnectivityType::FourWay).unwrap();
        assert_eq!(holes.count_pixels(), 1);
        assert_eq!(holes.get_pixel(2, 2), Some(1));
    }

    #[test]
    fn test_fill_holes_ring() {
        let filled = fill_holes(&ring(), ConnectivityType::FourWay).unwrap();
        assert_eq!(filled.count_pixels(), 9);
    }

    #[test]
    fn test_diagonal_gap_is_not_a_hole_for_eight_way_background() {
        // Diamond whose interior leaks diagonally to the outside
        let pix = create_test_image(5, 5, &[(2, 1), (1, 2), (3, 2), (2, 3)]);
        let four = holes_by_filling(&pix, ConnectivityType::FourWay).unwrap();
        let eight = holes_by_filling(&pix, ConnectivityType::EightWay).unwrap();
        assert_eq!(four.count_pixels(), 1);
        assert_eq!(eight.count_pixels(), 0);
    }

    #[test]
    fn test_remove_border_components() {
        let pix = create_test_image(6, 6, &[(0, 0), (1, 0), (1, 1), (3, 3), (4, 3)]);
        let cleared = remove_border_components(&pix, ConnectivityType::EightWay).unwrap();
        assert_eq!(cleared.count_pixels(), 2);
        assert_eq!(cleared.get_pixel(1, 1), Some(0));
        assert_eq!(cleared.get_pixel(3, 3), Some(1));
    }

    #[test]
    fn test_rejects_gray_input() {
        let pix = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        assert!(holes_by_filling(&pix, ConnectivityType::FourWay).is_err());
    }
}
