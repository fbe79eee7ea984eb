//! pixmorph-core - Packed raster images
//!
//! This crate provides the data structures shared by the morphology,
//! seedfill and border-tracing crates:
//!
//! - [`Pix`] / [`PixMut`] - The image container (immutable / mutable)
//! - [`Box`] - Rectangle regions
//! - [`pix::bits`] - Word-level helpers for packed binary rows
//!
//! # Example
//!
//! ```
//! use pixmorph_core::{Pix, PixelDepth};
//!
//! let mut pm = Pix::new(40, 8, PixelDepth::Bit1).unwrap().to_mut();
//! pm.set_pixel(35, 2, 1).unwrap();
//! let pix: Pix = pm.into();
//! assert_eq!(pix.count_pixels(), 1);
//! ```

pub mod box_;
pub mod error;
pub mod pix;

pub use box_::Box;
pub use error::{Error, Result};
pub use pix::{BitRowLayout, Pix, PixMut, PixelDepth, RopOp};
