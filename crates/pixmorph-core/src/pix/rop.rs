//! Raster operations (ROP)
//!
//! This module provides bitwise raster operations on images:
//!
//! - AND, OR, XOR, subtract of two same-sized images
//! - Invert (NOT)
//! - Rectangular combination of a small image into a larger one
//!
//! Every operation keeps the pad bits of each row at zero.

use super::{Pix, PixMut};
use crate::error::{Error, Result};

/// Raster operation type
///
/// Named operations for combining a source into a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RopOp {
    /// Source AND destination
    And,
    /// Source OR destination
    Or,
    /// Source XOR destination
    Xor,
    /// Destination AND NOT source
    Subtract,
}

impl RopOp {
    #[inline]
    fn apply(self, dst: u32, src: u32) -> u32 {
        match self {
            RopOp::And => dst & src,
            RopOp::Or => dst | src,
            RopOp::Xor => dst ^ src,
            RopOp::Subtract => dst & !src,
        }
    }
}

fn check_same_size(a_w: u32, a_h: u32, a_d: u32, b: &Pix) -> Result<()> {
    if a_d != b.depth().bits() {
        return Err(Error::IncompatibleDepths(a_d, b.depth().bits()));
    }
    if a_w != b.width() || a_h != b.height() {
        return Err(Error::IncompatibleSizes(a_w, a_h, b.width(), b.height()));
    }
    Ok(())
}

impl Pix {
    /// Pixelwise AND of two images of equal size and depth.
    pub fn and(&self, other: &Pix) -> Result<Pix> {
        self.rop(other, RopOp::And)
    }

    /// Pixelwise OR of two images of equal size and depth.
    pub fn or(&self, other: &Pix) -> Result<Pix> {
        self.rop(other, RopOp::Or)
    }

    /// Pixelwise XOR of two images of equal size and depth.
    pub fn xor(&self, other: &Pix) -> Result<Pix> {
        self.rop(other, RopOp::Xor)
    }

    /// Pixels set in `self` but not in `other`.
    pub fn subtract(&self, other: &Pix) -> Result<Pix> {
        self.rop(other, RopOp::Subtract)
    }

    /// Bitwise inversion of every pixel.
    pub fn invert(&self) -> Pix {
        let mut pm = self.to_mut();
        pm.invert_inplace();
        pm.into()
    }

    /// Combine `other` into a copy of `self` with `op`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleSizes`] or [`Error::IncompatibleDepths`]
    /// when the two images differ in size or depth.
    pub fn rop(&self, other: &Pix, op: RopOp) -> Result<Pix> {
        let mut pm = self.to_mut();
        pm.rop_inplace(other, op)?;
        Ok(pm.into())
    }
}

impl PixMut {
    pub fn and_inplace(&mut self, other: &Pix) -> Result<()> {
        self.rop_inplace(other, RopOp::And)
    }

    pub fn or_inplace(&mut self, other: &Pix) -> Result<()> {
        self.rop_inplace(other, RopOp::Or)
    }

    pub fn xor_inplace(&mut self, other: &Pix) -> Result<()> {
        self.rop_inplace(other, RopOp::Xor)
    }

    pub fn subtract_inplace(&mut self, other: &Pix) -> Result<()> {
        self.rop_inplace(other, RopOp::Subtract)
    }

    /// Invert every pixel in place.
    pub fn invert_inplace(&mut self) {
        for w in self.data_mut() {
            *w = !*w;
        }
        self.clear_pad_bits();
    }

    /// Combine `other` into `self` with `op`, word by word.
    pub fn rop_inplace(&mut self, other: &Pix, op: RopOp) -> Result<()> {
        check_same_size(self.width(), self.height(), self.depth().bits(), other)?;
        for (d, &s) in self.data_mut().iter_mut().zip(other.data()) {
            *d = op.apply(*d, s);
        }
        Ok(())
    }

    /// Combine all of `src` into the rectangle of `self` whose upper-left
    /// corner is `(dx, dy)`.
    ///
    /// Parts of `src` falling outside `self` are clipped. Only 1 bpp
    /// images are supported.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleDepths`] when either image is not 1 bpp.
    pub fn rop_rect(&mut self, dx: i32, dy: i32, src: &Pix, op: RopOp) -> Result<()> {
        if self.depth().bits() != 1 || src.depth().bits() != 1 {
            return Err(Error::IncompatibleDepths(
                self.depth().bits(),
                src.depth().bits(),
            ));
        }
        let (dw, dh) = (self.width() as i32, self.height() as i32);
        for sy in 0..src.height() as i32 {
            let y = dy + sy;
            if y < 0 || y >= dh {
                continue;
            }
            let srow = src.row_data(sy as u32);
            for sx in 0..src.width() as i32 {
                let x = dx + sx;
                if x < 0 || x >= dw {
                    continue;
                }
                let s = super::get_data_bit(srow, sx as u32);
                let drow = self.row_data_mut(y as u32);
                let d = super::get_data_bit(drow, x as u32);
                super::set_data_bit(drow, x as u32, op.apply(d, s) & 1);
            }
        }
        Ok(())
    }

    /// Clear a rectangle to zero; the rectangle is clipped to the image.
    pub fn clear_region(&mut self, x: u32, y: u32, w: u32, h: u32) {
        self.fill_region(x, y, w, h, 0);
    }

    /// Set every pixel in a rectangle to its maximum value.
    pub fn set_region(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let max = self.depth().max_value();
        self.fill_region(x, y, w, h, max);
    }

    fn fill_region(&mut self, x: u32, y: u32, w: u32, h: u32, val: u32) {
        let x_end = x.saturating_add(w).min(self.width());
        let y_end = y.saturating_add(h).min(self.height());
        for yy in y..y_end {
            for xx in x..x_end {
                self.set_pixel_unchecked(xx, yy, val);
            }
        }
    }
}
