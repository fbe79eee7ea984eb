//! pixmorph-transform - Binary image reduction for pixmorph
//!
//! This crate provides 2x reductions of 1 bpp images:
//!
//! - Subsampling through a precomputed bit-packing table
//! - Rank reduction, where each output pixel is ON when at least `level`
//!   of its 2x2 source block is ON
//! - Cascades of up to four rank reductions for cheap image pyramids
//!
//! # Example
//!
//! ```
//! use pixmorph_core::{Pix, PixelDepth};
//! use pixmorph_transform::reduce_rank_binary_cascade;
//!
//! let mut pm = Pix::new(64, 64, PixelDepth::Bit1).unwrap().to_mut();
//! pm.set_region(16, 16, 32, 32);
//! let pix: Pix = pm.into();
//!
//! let small = reduce_rank_binary_cascade(&pix, 1, 2, 0, 0).unwrap();
//! assert_eq!((small.width(), small.height()), (16, 16));
//! assert_eq!(small.count_pixels(), 64);
//! ```

mod error;
pub mod reduce;

pub use error::{TransformError, TransformResult};
pub use reduce::{
    make_subsample_tab2x, reduce_binary2, reduce_rank_binary2, reduce_rank_binary_cascade,
};
