//! Box - Rectangle regions
//!
//! Bounding boxes of connected components and the placement of
//! component-local coordinates inside an image.

use crate::error::{Error, Result};

/// A rectangle region
///
/// `Box` is a small `Copy` type with the upper-left corner at `(x, y)`.
/// `right()` and `bottom()` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Box {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Box {
    /// Create a new box
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if width or height is negative.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "negative box size: {w}x{h}"
            )));
        }
        Ok(Self { x, y, w, h })
    }

    /// Create a box without validation
    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// The 1x1 box covering a single pixel.
    pub const fn from_point(x: i32, y: i32) -> Self {
        Self { x, y, w: 1, h: 1 }
    }

    /// Exclusive right edge
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Exclusive bottom edge
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn area(&self) -> i64 {
        i64::from(self.w) * i64::from(self.h)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check if a point is inside the box
    #[inline]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &Box) -> Box {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Box {
            x,
            y,
            w: self.right().max(other.right()) - x,
            h: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Grow the box to cover the pixel at `(x, y)`.
    pub fn include_point(&mut self, x: i32, y: i32) {
        *self = self.union(&Box::from_point(x, y));
    }

    /// The box shifted by `(dx, dy)`.
    pub fn translate(&self, dx: i32, dy: i32) -> Box {
        Box {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Part of the box inside a `width` x `height` image, if any.
    pub fn clip(&self, width: i32, height: i32) -> Option<Box> {
        let x = self.x.max(0);
        let y = self.y.max(0);
        let right = self.right().min(width);
        let bottom = self.bottom().min(height);
        (x < right && y < bottom).then(|| Box {
            x,
            y,
            w: right - x,
            h: bottom - y,
        })
    }
}
