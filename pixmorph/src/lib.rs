//! pixmorph - Morphological reconstruction and border tracing for Rust
//!
//! # Overview
//!
//! - Binary and grayscale seedfill (morphological reconstruction),
//!   hole filling and border component removal
//! - Distance functions under 4- and 8-connectivity
//! - Binary 2x subsampling and rank reduction
//! - Component border tracing with chain codes, single-path outlines,
//!   a compressed `ccba` stream format and SVG output
//!
//! # Example
//!
//! ```
//! use pixmorph::{Pix, PixelDepth};
//! use pixmorph::region::{ConnectivityType, get_all_borders};
//!
//! let mut pm = Pix::new(16, 16, PixelDepth::Bit1).unwrap().to_mut();
//! pm.set_region(4, 4, 8, 8);
//! let pix: Pix = pm.into();
//!
//! let ccba = get_all_borders(&pix, ConnectivityType::EightWay).unwrap();
//! assert_eq!(ccba.component_count(), 1);
//! assert!(ccba.display_image().unwrap().equals(&pix));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use pixmorph_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use pixmorph_region as region;
pub use pixmorph_transform as transform;
