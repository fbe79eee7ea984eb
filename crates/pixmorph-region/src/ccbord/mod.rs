//! Border tracing for connected components
//!
//! Every foreground connected component of a binary image is described by
//! its outer border and one border per hole. A border passes through a
//! number of representations:
//!
//! - local border points, relative to the component bounding box
//! - global border points, in image coordinates
//! - a step chain: a start pixel plus one direction per step
//! - a single path joining the outer border and all hole borders, for
//!   vector export
//!
//! Derived representations are generated explicitly by the methods on
//! [`ImageBorders`]. Asking for one whose source has not been generated
//! yet fails with [`RegionError::MissingData`] and leaves the borders
//! untouched.
//!
//! # Example
//!
//! ```
//! use pixmorph_core::{Pix, PixelDepth};
//! use pixmorph_region::{ConnectivityType, CoordType, ImageBorders};
//!
//! let mut pm = Pix::new(8, 8, PixelDepth::Bit1).unwrap().to_mut();
//! for y in 2..6 {
//!     for x in 2..6 {
//!         pm.set_pixel(x, y, 1).unwrap();
//!     }
//! }
//! let pix: Pix = pm.into();
//!
//! let mut borders = ImageBorders::from_pix(&pix, ConnectivityType::EightWay).unwrap();
//! borders.generate_step_chains().unwrap();
//! let bytes = borders.to_bytes().unwrap();
//!
//! let mut restored = ImageBorders::from_bytes(&bytes).unwrap();
//! restored.step_chains_to_pix_coords(CoordType::Local).unwrap();
//! assert!(restored.display_image().unwrap().equals(&pix));
//! ```

mod chain;
mod render;
mod serial;
mod single_path;
mod svg;
mod trace;

pub use chain::{from_chain_code, to_chain_code};
pub use trace::{get_all_borders, get_component_borders};

use crate::conncomp::ConnectivityType;
use crate::error::{RegionError, RegionResult};
use pixmorph_core::{Box, Pix};

/// Direction for border traversal (8-connected, clockwise from West)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// West (-1, 0)
    West = 0,
    /// Northwest (-1, -1)
    NorthWest = 1,
    /// North (0, -1)
    North = 2,
    /// Northeast (1, -1)
    NorthEast = 3,
    /// East (1, 0)
    East = 4,
    /// Southeast (1, 1)
    SouthEast = 5,
    /// South (0, 1)
    South = 6,
    /// Southwest (-1, 1)
    SouthWest = 7,
}

/// X offset for each direction
pub(crate) const XPOSTAB: [i32; 8] = [-1, -1, 0, 1, 1, 1, 0, -1];

/// Y offset for each direction
pub(crate) const YPOSTAB: [i32; 8] = [0, -1, -1, -1, 0, 1, 1, 1];

/// Direction lookup table: DIRTAB[1+dy][1+dx] gives direction index
const DIRTAB: [[i32; 3]; 3] = [[1, 2, 3], [0, -1, 4], [7, 6, 5]];

impl Direction {
    /// Get the x offset for this direction
    #[inline]
    pub fn dx(self) -> i32 {
        XPOSTAB[self as usize]
    }

    /// Get the y offset for this direction
    #[inline]
    pub fn dy(self) -> i32 {
        YPOSTAB[self as usize]
    }

    /// Index 0..8, clockwise from West.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get direction from x,y offsets
    pub fn from_offset(dx: i32, dy: i32) -> Option<Self> {
        if dx.abs() > 1 || dy.abs() > 1 || (dx == 0 && dy == 0) {
            return None;
        }
        let idx = DIRTAB[(1 + dy) as usize][(1 + dx) as usize];
        (idx >= 0).then(|| Self::from_index(idx as usize))
    }

    /// Create direction from index (taken modulo 8)
    #[inline]
    pub fn from_index(idx: usize) -> Self {
        match idx % 8 {
            0 => Direction::West,
            1 => Direction::NorthWest,
            2 => Direction::North,
            3 => Direction::NorthEast,
            4 => Direction::East,
            5 => Direction::SouthEast,
            6 => Direction::South,
            _ => Direction::SouthWest,
        }
    }

    /// Whether this is one of the four axis directions.
    #[inline]
    pub fn is_axial(self) -> bool {
        self.index() % 2 == 0
    }
}

/// A point on a border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BorderPoint {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl BorderPoint {
    /// Create a new border point
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move in the given direction
    #[inline]
    pub fn moved(self, dir: Direction) -> Self {
        Self {
            x: self.x + dir.dx(),
            y: self.y + dir.dy(),
        }
    }

    /// Add offset to create new point
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(i32, i32)> for BorderPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Border type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderType {
    /// Outer border (clockwise traversal)
    #[default]
    Outer,
    /// Hole border
    Hole,
}

/// Coordinate frame of generated border points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordType {
    /// Relative to the component bounding box
    Local,
    /// Image coordinates
    Global,
}

/// Which points of a single path to keep in global coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointsFlag {
    /// Every pixel of the path
    #[default]
    All,
    /// Only the first and last points and the points where the step
    /// direction changes
    TurningPoints,
}

/// A single border (outer or hole)
///
/// Point lists are closed loops stored without repeating the first
/// point. A loop of `n > 1` points has `n` steps, the last one leading
/// back to the start; an isolated pixel has one point and no steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Border {
    /// Type of this border
    pub border_type: BorderType,
    /// First pixel of the trace, in local coordinates
    pub start: BorderPoint,
    /// Border pixels in traversal order, local coordinates
    pub local: Option<Vec<BorderPoint>>,
    /// Border pixels in traversal order, image coordinates
    pub global: Option<Vec<BorderPoint>>,
    /// Step chain starting at `start`
    pub steps: Option<Vec<Direction>>,
}

impl Border {
    /// Create a border from traced local points
    pub fn new(border_type: BorderType, points: Vec<BorderPoint>) -> Self {
        let start = points.first().copied().unwrap_or_default();
        Self {
            border_type,
            start,
            local: Some(points),
            global: None,
            steps: None,
        }
    }

    /// Create a border known only by its step chain
    pub fn from_steps(border_type: BorderType, start: BorderPoint, steps: Vec<Direction>) -> Self {
        Self {
            border_type,
            start,
            local: None,
            global: None,
            steps: Some(steps),
        }
    }

    /// Local points, or [`RegionError::MissingData`].
    pub fn local_points(&self) -> RegionResult<&[BorderPoint]> {
        self.local
            .as_deref()
            .ok_or(RegionError::MissingData("local border points"))
    }

    /// Global points, or [`RegionError::MissingData`].
    pub fn global_points(&self) -> RegionResult<&[BorderPoint]> {
        self.global
            .as_deref()
            .ok_or(RegionError::MissingData("global border points"))
    }

    /// Step chain, or [`RegionError::MissingData`].
    pub fn step_chain(&self) -> RegionResult<&[Direction]> {
        self.steps
            .as_deref()
            .ok_or(RegionError::MissingData("step chains"))
    }

    /// Number of border pixels in the trace (0 if no points are held).
    #[inline]
    pub fn len(&self) -> usize {
        self.local
            .as_ref()
            .or(self.global.as_ref())
            .map_or(0, Vec::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Borders of a single connected component
#[derive(Debug, Clone)]
pub struct ComponentBorders {
    /// Bounding box of the component (in global coordinates)
    pub bounds: Box,
    /// Bitmap of the component, the size of `bounds`; absent after reading
    /// from serialized data until rebuilt from the borders
    pub pix: Option<Pix>,
    /// The outer border
    pub outer: Border,
    /// Hole borders, ordered by the raster position of each hole
    pub holes: Vec<Border>,
    /// Single path through all borders, local coordinates
    pub sp_local: Option<Vec<BorderPoint>>,
    /// Single path in image coordinates, possibly reduced to turning points
    pub sp_global: Option<Vec<BorderPoint>>,
}

impl ComponentBorders {
    /// Create component borders with no holes
    pub fn new(bounds: Box, outer: Border) -> Self {
        Self {
            bounds,
            pix: None,
            outer,
            holes: Vec::new(),
            sp_local: None,
            sp_global: None,
        }
    }

    /// Get total number of borders (outer + holes)
    pub fn border_count(&self) -> usize {
        1 + self.holes.len()
    }

    /// Check if component has holes
    pub fn has_holes(&self) -> bool {
        !self.holes.is_empty()
    }

    /// All borders, outer first
    pub fn borders(&self) -> impl Iterator<Item = &Border> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    pub(crate) fn borders_mut(&mut self) -> impl Iterator<Item = &mut Border> {
        std::iter::once(&mut self.outer).chain(self.holes.iter_mut())
    }
}

/// Border atlas of a binary image: the borders of every connected
/// component, ordered by the raster position of each component's first
/// pixel.
#[derive(Debug, Clone)]
pub struct ImageBorders {
    /// Width of the source image
    pub width: u32,
    /// Height of the source image
    pub height: u32,
    /// Connectivity of the traced components
    pub connectivity: ConnectivityType,
    /// Borders for each connected component
    pub components: Vec<ComponentBorders>,
}

impl ImageBorders {
    /// Create new empty image borders
    pub fn new(width: u32, height: u32, connectivity: ConnectivityType) -> Self {
        Self {
            width,
            height,
            connectivity,
            components: Vec::new(),
        }
    }

    /// Trace every component of `pix`; same as [`get_all_borders`].
    pub fn from_pix(pix: &Pix, connectivity: ConnectivityType) -> RegionResult<Self> {
        get_all_borders(pix, connectivity)
    }

    /// Get total number of connected components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Get total number of borders (all outer + all holes)
    pub fn total_border_count(&self) -> usize {
        self.components.iter().map(|c| c.border_count()).sum()
    }

    /// Check if any component has holes
    pub fn has_holes(&self) -> bool {
        self.components.iter().any(|c| c.has_holes())
    }

    pub(crate) fn borders(&self) -> impl Iterator<Item = &Border> {
        self.components.iter().flat_map(|c| c.borders())
    }
}
