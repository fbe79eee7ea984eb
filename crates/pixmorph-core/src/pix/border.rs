//! Border operations for images
//!
//! - Uniform borders added or removed around an image
//! - Setting or clearing the outermost frame of an existing image

use super::{Pix, PixMut};
use crate::error::{Error, Result};

impl Pix {
    /// Add a uniform border around the image.
    ///
    /// # Arguments
    ///
    /// * `npix` - Border width in pixels
    /// * `val` - Border pixel value
    ///
    /// # Returns
    ///
    /// New image with dimensions `(width + 2*npix, height + 2*npix)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if the new dimensions overflow.
    pub fn add_border(&self, npix: u32, val: u32) -> Result<Pix> {
        if npix == 0 {
            return Ok(self.clone());
        }
        let (w, h) = (self.width(), self.height());
        let too_big = Error::InvalidDimension {
            width: w,
            height: h,
        };
        let wd = npix
            .checked_mul(2)
            .and_then(|b| w.checked_add(b))
            .ok_or(too_big)?;
        let hd = h
            .checked_add(2 * npix)
            .ok_or(Error::InvalidDimension { width: w, height: h })?;

        let mut pm = Pix::new(wd, hd, self.depth())?.to_mut();
        pm.copy_resolution_from(self);
        if val != 0 {
            pm.set_or_clear_border(npix, npix, npix, npix, val);
        }
        for y in 0..h {
            for x in 0..w {
                let v = self.get_pixel_unchecked(x, y);
                if v != 0 {
                    pm.set_pixel_unchecked(x + npix, y + npix, v);
                }
            }
        }
        Ok(pm.into())
    }

    /// Remove a uniform border of `npix` pixels from every side.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if nothing would be left.
    pub fn remove_border(&self, npix: u32) -> Result<Pix> {
        if npix == 0 {
            return Ok(self.clone());
        }
        let (w, h) = (self.width(), self.height());
        if w <= 2 * npix || h <= 2 * npix {
            return Err(Error::InvalidDimension {
                width: w.saturating_sub(2 * npix),
                height: h.saturating_sub(2 * npix),
            });
        }
        let mut pm = Pix::new(w - 2 * npix, h - 2 * npix, self.depth())?.to_mut();
        pm.copy_resolution_from(self);
        for y in 0..pm.height() {
            for x in 0..pm.width() {
                let v = self.get_pixel_unchecked(x + npix, y + npix);
                pm.set_pixel_unchecked(x, y, v);
            }
        }
        Ok(pm.into())
    }
}

impl PixMut {
    /// Set the outer frame of the image to `val`.
    ///
    /// The frame is `left`, `right`, `top` and `bot` pixels wide on the
    /// respective sides; widths larger than the image are clipped.
    pub fn set_or_clear_border(&mut self, left: u32, right: u32, top: u32, bot: u32, val: u32) {
        let (w, h) = (self.width(), self.height());
        let fill = |pm: &mut PixMut, x0: u32, y0: u32, x1: u32, y1: u32| {
            for y in y0..y1.min(h) {
                for x in x0..x1.min(w) {
                    pm.set_pixel_unchecked(x, y, val);
                }
            }
        };
        fill(self, 0, 0, w, top);
        fill(self, 0, h.saturating_sub(bot), w, h);
        fill(self, 0, 0, left, h);
        fill(self, w.saturating_sub(right), 0, w, h);
    }
}
