//! pixmorph-region - Region processing for pixmorph
//!
//! This crate provides:
//!
//! - **Connected component analysis** - Union-find labeling in raster order
//! - **Seed fill operations** - Binary and grayscale reconstruction, hole
//!   filling and border-component removal
//! - **Distance function** - City-block and chessboard distance to background
//! - **Border tracing** - Outer and hole borders, step chains, single paths,
//!   compressed serialization and SVG export
//!
//! # Examples
//!
//! ## Reconstruction
//!
//! ```
//! use pixmorph_region::{seedfill_binary, ConnectivityType};
//! use pixmorph_core::{Pix, PixelDepth};
//!
//! let mut mask = Pix::new(10, 10, PixelDepth::Bit1).unwrap().to_mut();
//! mask.set_all();
//! let mask: Pix = mask.into();
//!
//! let mut seed = Pix::new(10, 10, PixelDepth::Bit1).unwrap().to_mut();
//! seed.set_pixel(5, 5, 1).unwrap();
//!
//! let filled = seedfill_binary(&seed.into(), &mask, ConnectivityType::FourWay).unwrap();
//! assert_eq!(filled.count_pixels(), 100);
//! ```
//!
//! ## Border tracing
//!
//! ```
//! use pixmorph_region::{get_all_borders, ConnectivityType};
//! use pixmorph_core::{Pix, PixelDepth};
//!
//! let mut pm = Pix::new(7, 7, PixelDepth::Bit1).unwrap().to_mut();
//! for i in 1..6 {
//!     pm.set_pixel(3, i, 1).unwrap();
//!     pm.set_pixel(i, 3, 1).unwrap();
//! }
//! let pix: Pix = pm.into();
//!
//! let borders = get_all_borders(&pix, ConnectivityType::EightWay).unwrap();
//! assert_eq!(borders.components[0].outer.len(), 12);
//! assert!(borders.display_image().unwrap().equals(&pix));
//! ```

pub mod ccbord;
pub mod conncomp;
pub mod error;
pub mod seedfill;

pub use pixmorph_core;

pub use error::{RegionError, RegionResult};

pub use conncomp::{
    ConnectedComponent, ConnectivityType, extract_component, find_connected_components,
    label_connected_components,
};

pub use seedfill::{
    BoundaryCondition, distance_function, fill_holes, holes_by_filling,
    remove_border_components, seedfill_binary, seedfill_binary_low, seedfill_gray,
    seedfill_gray_inv, seedfill_gray_inv_low, seedfill_gray_low,
};

pub use ccbord::{
    Border, BorderPoint, BorderType, ComponentBorders, CoordType, Direction, ImageBorders,
    PointsFlag, from_chain_code, get_all_borders, get_component_borders, to_chain_code,
};
