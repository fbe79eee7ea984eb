//! PIX - The main image container
//!
//! `Pix` is the packed raster every morphology and border-tracing
//! operation in this workspace reads and writes.
//!
//! # Pixel layout
//!
//! - Image data is stored in 32-bit words
//! - Every row starts on a 32-bit boundary
//! - Pixels are packed MSB to LSB within each word
//! - Bits beyond `width * depth` in the last word of a row (pad bits)
//!   are kept at zero by every operation in this crate
//!
//! # Ownership model
//!
//! `Pix` uses `Arc` for cheap cloning (shared ownership).
//! To modify pixel data, convert to `PixMut` via [`Pix::try_into_mut`]
//! or [`Pix::to_mut`], then convert back with `Into<Pix>`.

mod access;
pub mod bits;
mod border;
pub mod compare;
pub mod rop;

pub use access::*;
pub use bits::BitRowLayout;
pub use rop::RopOp;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Pixel depth (bits per pixel)
///
/// Represents the number of bits used to encode each pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelDepth {
    /// 1-bit binary image
    Bit1 = 1,
    /// 2-bit image (4 levels)
    Bit2 = 2,
    /// 4-bit image (16 levels)
    Bit4 = 4,
    /// 8-bit grayscale
    Bit8 = 8,
    /// 16-bit grayscale
    Bit16 = 16,
    /// 32-bit
    Bit32 = 32,
}

impl PixelDepth {
    /// Create `PixelDepth` from a raw bit count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] if `bits` is not 1, 2, 4, 8, 16, or 32.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            1 => Ok(PixelDepth::Bit1),
            2 => Ok(PixelDepth::Bit2),
            4 => Ok(PixelDepth::Bit4),
            8 => Ok(PixelDepth::Bit8),
            16 => Ok(PixelDepth::Bit16),
            32 => Ok(PixelDepth::Bit32),
            _ => Err(Error::InvalidDepth(bits)),
        }
    }

    /// Get the number of bits per pixel.
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Get the maximum pixel value representable at this depth.
    pub fn max_value(self) -> u32 {
        match self {
            PixelDepth::Bit32 => u32::MAX,
            _ => (1u32 << self.bits()) - 1,
        }
    }
}

/// Internal PIX data
#[derive(Debug)]
struct PixData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Depth in bits per pixel
    depth: PixelDepth,
    /// 32-bit words per line
    wpl: u32,
    /// X resolution (ppi), 0 if unknown
    xres: i32,
    /// Y resolution (ppi), 0 if unknown
    yres: i32,
    /// The image data (packed 32-bit words)
    data: Vec<u32>,
}

impl PixData {
    fn duplicate(&self) -> Self {
        PixData {
            width: self.width,
            height: self.height,
            depth: self.depth,
            wpl: self.wpl,
            xres: self.xres,
            yres: self.yres,
            data: self.data.clone(),
        }
    }
}

/// PIX - Main image container
///
/// `Pix` uses reference counting via `Arc` for efficient cloning.
///
/// # Examples
///
/// ```
/// use pixmorph_core::{Pix, PixelDepth};
///
/// let pix = Pix::new(640, 480, PixelDepth::Bit1).unwrap();
/// assert_eq!(pix.width(), 640);
/// assert_eq!(pix.wpl(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Create a new PIX with the specified dimensions and depth.
    ///
    /// The image data is initialized to zero.
    ///
    /// # Arguments
    ///
    /// * `width` - Width in pixels (must be > 0)
    /// * `height` - Height in pixels (must be > 0)
    /// * `depth` - Pixel depth
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0, or if a
    /// single row would not fit in `u32::MAX` words.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let wpl = Self::compute_wpl(width, depth)
            .ok_or(Error::InvalidDimension { width, height })?;
        let data_size = (wpl as usize) * (height as usize);

        let inner = PixData {
            width,
            height,
            depth,
            wpl,
            xres: 0,
            yres: 0,
            data: vec![0u32; data_size],
        };

        Ok(Pix {
            inner: Arc::new(inner),
        })
    }

    /// Compute words per line for given width and depth.
    ///
    /// Uses u64 arithmetic to prevent overflow for large widths.
    #[inline]
    fn compute_wpl(width: u32, depth: PixelDepth) -> Option<u32> {
        let bits_per_line = u64::from(width) * u64::from(depth.bits());
        u32::try_from(bits_per_line.div_ceil(32)).ok()
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get the number of 32-bit words per line.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Get the X resolution in pixels per inch.
    #[inline]
    pub fn xres(&self) -> i32 {
        self.inner.xres
    }

    /// Get the Y resolution in pixels per inch.
    #[inline]
    pub fn yres(&self) -> i32 {
        self.inner.yres
    }

    /// Get the raw image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Number of `Pix` handles sharing this image data.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Get a slice over one row of packed words.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let start = (y as usize) * (self.inner.wpl as usize);
        let end = start + self.inner.wpl as usize;
        &self.inner.data[start..end]
    }

    /// Create a new zeroed PIX with the same size, depth and resolution.
    pub fn create_template(&self) -> Self {
        let inner = PixData {
            width: self.inner.width,
            height: self.inner.height,
            depth: self.inner.depth,
            wpl: self.inner.wpl,
            xres: self.inner.xres,
            yres: self.inner.yres,
            data: vec![0u32; self.inner.data.len()],
        };
        Pix {
            inner: Arc::new(inner),
        }
    }

    /// Check whether two images have the same width, height and depth.
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.inner.width == other.inner.width
            && self.inner.height == other.inner.height
            && self.inner.depth == other.inner.depth
    }

    /// Create a deep copy of this PIX.
    ///
    /// Unlike `clone()` which shares data via Arc, this creates
    /// a completely independent copy.
    pub fn deep_clone(&self) -> Self {
        Pix {
            inner: Arc::new(self.inner.duplicate()),
        }
    }

    /// Try to get mutable access to the image data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<PixMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(PixMut { inner: data }),
            Err(arc) => Err(Pix { inner: arc }),
        }
    }

    /// Create a mutable copy of this PIX.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: self.inner.duplicate(),
        }
    }

    /// Get a mutable PIX, copying only if the data is shared.
    pub fn into_mut(self) -> PixMut {
        match self.try_into_mut() {
            Ok(pm) => pm,
            Err(shared) => shared.to_mut(),
        }
    }
}

/// Mutable PIX
///
/// Allows modification of image data. Convert back to an immutable
/// [`Pix`] using `Into<Pix>`.
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get words per line.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    pub fn xres(&self) -> i32 {
        self.inner.xres
    }

    pub fn yres(&self) -> i32 {
        self.inner.yres
    }

    /// Set the resolution in pixels per inch.
    pub fn set_resolution(&mut self, xres: i32, yres: i32) {
        self.inner.xres = xres;
        self.inner.yres = yres;
    }

    /// Copy the resolution of `src`.
    pub fn copy_resolution_from(&mut self, src: &Pix) {
        self.inner.xres = src.xres();
        self.inner.yres = src.yres();
    }

    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get mutable access to the image data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.inner.data
    }

    /// Get a slice over one row of packed words.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let start = (y as usize) * (self.inner.wpl as usize);
        let end = start + self.inner.wpl as usize;
        &self.inner.data[start..end]
    }

    /// Get mutable access to a specific row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data_mut(&mut self, y: u32) -> &mut [u32] {
        let start = (y as usize) * (self.inner.wpl as usize);
        let end = start + self.inner.wpl as usize;
        &mut self.inner.data[start..end]
    }

    /// Clear all pixels to zero.
    pub fn clear(&mut self) {
        self.inner.data.fill(0);
    }

    /// Set every pixel to its maximum value.
    ///
    /// Pad bits stay zero.
    pub fn set_all(&mut self) {
        self.inner.data.fill(0xFFFF_FFFF);
        self.clear_pad_bits();
    }

    /// Zero the pad bits at the end of every row.
    pub fn clear_pad_bits(&mut self) {
        let layout = BitRowLayout::new(self.width(), self.depth().bits());
        if layout.end_mask == u32::MAX {
            return;
        }
        let wpl = self.inner.wpl as usize;
        for row in self.inner.data.chunks_exact_mut(wpl) {
            row[wpl - 1] &= layout.end_mask;
        }
    }
}

impl From<PixMut> for Pix {
    fn from(pix_mut: PixMut) -> Self {
        Pix {
            inner: Arc::new(pix_mut.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_depth() {
        assert_eq!(PixelDepth::from_bits(1).unwrap(), PixelDepth::Bit1);
        assert_eq!(PixelDepth::from_bits(16).unwrap(), PixelDepth::Bit16);
        assert!(PixelDepth::from_bits(3).is_err());
        assert_eq!(PixelDepth::Bit8.max_value(), 255);
        assert_eq!(PixelDepth::Bit16.max_value(), 0xffff);
    }

    #[test]
    fn test_pix_creation_invalid() {
        assert!(Pix::new(0, 100, PixelDepth::Bit1).is_err());
        assert!(Pix::new(100, 0, PixelDepth::Bit8).is_err());
    }

    #[test]
    fn test_wpl_calculation() {
        assert_eq!(Pix::new(32, 1, PixelDepth::Bit1).unwrap().wpl(), 1);
        assert_eq!(Pix::new(33, 1, PixelDepth::Bit1).unwrap().wpl(), 2);
        assert_eq!(Pix::new(5, 1, PixelDepth::Bit8).unwrap().wpl(), 2);
        assert_eq!(Pix::new(3, 1, PixelDepth::Bit16).unwrap().wpl(), 2);
    }

    #[test]
    fn test_clone_shares_and_deep_clone_copies() {
        let pix1 = Pix::new(40, 10, PixelDepth::Bit1).unwrap();
        let pix2 = pix1.clone();
        assert_eq!(pix1.ref_count(), 2);
        assert_eq!(pix1.data().as_ptr(), pix2.data().as_ptr());

        let pix3 = pix1.deep_clone();
        assert_eq!(pix3.ref_count(), 1);
        assert_ne!(pix1.data().as_ptr(), pix3.data().as_ptr());
    }

    #[test]
    fn test_try_into_mut_requires_unique() {
        let pix = Pix::new(8, 8, PixelDepth::Bit8).unwrap();
        let other = pix.clone();
        let pix = pix.try_into_mut().unwrap_err();
        drop(other);
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_resolution(300, 300);
        let pix: Pix = pm.into();
        assert_eq!(pix.xres(), 300);
    }

    #[test]
    fn test_set_all_keeps_pad_bits_zero() {
        let mut pm = Pix::new(33, 2, PixelDepth::Bit1).unwrap().to_mut();
        pm.set_all();
        assert_eq!(pm.row_data(0)[0], 0xffff_ffff);
        assert_eq!(pm.row_data(0)[1], 0x8000_0000);
        assert_eq!(pm.row_data(1)[1], 0x8000_0000);
    }

    #[test]
    fn test_create_template_is_zeroed() {
        let mut pm = Pix::new(10, 10, PixelDepth::Bit8).unwrap().to_mut();
        pm.set_all();
        pm.set_resolution(72, 72);
        let pix: Pix = pm.into();
        let t = pix.create_template();
        assert!(t.sizes_equal(&pix));
        assert_eq!(t.xres(), 72);
        assert!(t.data().iter().all(|&w| w == 0));
    }
}
