//! Image comparison and pixel counting
//!
//! - Pixel equality checks
//! - Pixel difference counting
//! - Foreground pixel counting for binary images

use super::{Pix, PixelDepth};
use crate::error::{Error, Result};

impl Pix {
    /// Count pixels that differ between two images of equal size and depth.
    ///
    /// # Errors
    ///
    /// Returns error if images have different dimensions or depths.
    pub fn count_pixel_diffs(&self, other: &Pix) -> Result<u64> {
        if self.depth() != other.depth() {
            return Err(Error::IncompatibleDepths(
                self.depth().bits(),
                other.depth().bits(),
            ));
        }
        if self.width() != other.width() || self.height() != other.height() {
            return Err(Error::IncompatibleSizes(
                self.width(),
                self.height(),
                other.width(),
                other.height(),
            ));
        }
        if self.depth() == PixelDepth::Bit1 {
            return Ok(self
                .data()
                .iter()
                .zip(other.data())
                .map(|(a, b)| u64::from((a ^ b).count_ones()))
                .sum());
        }
        let mut n = 0u64;
        for y in 0..self.height() {
            for x in 0..self.width() {
                if self.get_pixel_unchecked(x, y) != other.get_pixel_unchecked(x, y) {
                    n += 1;
                }
            }
        }
        Ok(n)
    }

    /// Check whether two images have identical size, depth and pixels.
    ///
    /// Pad bits are ignored.
    pub fn equals(&self, other: &Pix) -> bool {
        if !self.sizes_equal(other) {
            return false;
        }
        matches!(self.count_pixel_diffs(other), Ok(0))
    }

    /// Count the ON pixels of a 1 bpp image, or the non-zero pixels of
    /// any other depth.
    pub fn count_pixels(&self) -> u64 {
        if self.depth() == PixelDepth::Bit1 {
            return self.data().iter().map(|w| u64::from(w.count_ones())).sum();
        }
        let mut n = 0u64;
        for y in 0..self.height() {
            for x in 0..self.width() {
                if self.get_pixel_unchecked(x, y) != 0 {
                    n += 1;
                }
            }
        }
        n
    }

    /// Check whether every pixel is zero.
    pub fn is_zero(&self) -> bool {
        self.data().iter().all(|&w| w == 0)
    }
}
