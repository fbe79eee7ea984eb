//! Connected component analysis
//!
//! This module provides functions for finding and labeling connected components
//! in binary images. It uses Union-Find (disjoint set) data structure for
//! efficient labeling.
//!
//! Labels are assigned in raster order of each component's first pixel, so
//! component `k` (1-based) is the k-th component met when scanning rows top
//! to bottom and each row left to right.

use crate::error::{RegionError, RegionResult};
use crate::seedfill::check_binary;
use pixmorph_core::{Box, Pix, PixelDepth};

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    #[default]
    FourWay,
    /// 8-way connectivity (includes diagonals)
    EightWay,
}

impl ConnectivityType {
    /// Numeric connectivity: 4 or 8.
    pub fn value(self) -> u32 {
        match self {
            ConnectivityType::FourWay => 4,
            ConnectivityType::EightWay => 8,
        }
    }

    /// Parse a numeric connectivity.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidParameters`] for anything but 4 or 8.
    pub fn from_value(value: u32) -> RegionResult<Self> {
        match value {
            4 => Ok(ConnectivityType::FourWay),
            8 => Ok(ConnectivityType::EightWay),
            v => Err(RegionError::InvalidParameters(format!(
                "connectivity must be 4 or 8, got {v}"
            ))),
        }
    }

    /// The connectivity under which the background of a component of
    /// this connectivity is connected.
    pub fn complement(self) -> Self {
        match self {
            ConnectivityType::FourWay => ConnectivityType::EightWay,
            ConnectivityType::EightWay => ConnectivityType::FourWay,
        }
    }
}

/// A connected component in an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedComponent {
    /// Label for this component (1-based, raster order of first pixel)
    pub label: u32,
    /// Number of pixels in this component
    pub pixel_count: u32,
    /// Bounding box of this component
    pub bounds: Box,
}

impl ConnectedComponent {
    /// Create a new connected component
    pub fn new(label: u32, pixel_count: u32, bounds: Box) -> Self {
        Self {
            label,
            pixel_count,
            bounds,
        }
    }
}

/// Disjoint-set forest over provisional labels.
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        // Slot 0 is the background
        Self { parent: vec![0] }
    }

    fn make_set(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        id
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grandparent = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grandparent;
            x = grandparent;
        }
        x
    }

    /// Merge two sets, keeping the smaller root so the earliest label wins.
    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra < rb {
            self.parent[rb as usize] = ra;
        } else if rb < ra {
            self.parent[ra as usize] = rb;
        }
    }
}

/// Two-pass labeling into a plain label vector (row-major, 0 = background).
///
/// Returns the labels and the number of components.
pub(crate) fn label_vec(pix: &Pix, connectivity: ConnectivityType) -> (Vec<u32>, u32) {
    let w = pix.width() as usize;
    let h = pix.height() as usize;
    let mut labels = vec![0u32; w * h];
    let mut uf = UnionFind::new();
    let eight = connectivity == ConnectivityType::EightWay;

    for y in 0..h {
        for x in 0..w {
            if pix.get_pixel_unchecked(x as u32, y as u32) == 0 {
                continue;
            }
            let mut neighbors = [0u32; 4];
            let mut n = 0;
            if x > 0 {
                neighbors[n] = labels[y * w + x - 1];
                n += 1;
            }
            if y > 0 {
                neighbors[n] = labels[(y - 1) * w + x];
                n += 1;
                if eight {
                    if x > 0 {
                        neighbors[n] = labels[(y - 1) * w + x - 1];
                        n += 1;
                    }
                    if x + 1 < w {
                        neighbors[n] = labels[(y - 1) * w + x + 1];
                        n += 1;
                    }
                }
            }

            let mut current = 0;
            for &nb in neighbors[..n].iter().filter(|&&l| l != 0) {
                if current == 0 {
                    current = nb;
                } else {
                    uf.union(current, nb);
                }
            }
            if current == 0 {
                current = uf.make_set();
            }
            labels[y * w + x] = current;
        }
    }

    // Resolve roots, then renumber in raster order of first appearance
    let mut remap = vec![0u32; uf.parent.len()];
    let mut count = 0u32;
    for label in labels.iter_mut() {
        if *label == 0 {
            continue;
        }
        let root = uf.find(*label) as usize;
        if remap[root] == 0 {
            count += 1;
            remap[root] = count;
        }
        *label = remap[root];
    }
    (labels, count)
}

/// Find all connected components in a binary image
///
/// Returns a vector of connected components, each with a label, pixel count,
/// and bounding box, ordered by label.
pub fn find_connected_components(
    pix: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<ConnectedComponent>> {
    check_binary(pix)?;
    let (labels, count) = label_vec(pix, connectivity);
    let w = pix.width() as usize;

    let mut components: Vec<Option<ConnectedComponent>> = vec![None; count as usize];
    for (idx, &label) in labels.iter().enumerate() {
        if label == 0 {
            continue;
        }
        let (x, y) = ((idx % w) as i32, (idx / w) as i32);
        let cc = components[(label - 1) as usize]
            .get_or_insert_with(|| ConnectedComponent::new(label, 0, Box::from_point(x, y)));
        cc.pixel_count += 1;
        cc.bounds.include_point(x, y);
    }

    log::debug!(
        "find_connected_components: {} components ({}-connected)",
        count,
        connectivity.value()
    );
    Ok(components.into_iter().flatten().collect())
}

/// Label all connected components in a binary image
///
/// Returns a 32-bit image where each pixel contains the label of its component.
pub fn label_connected_components(pix: &Pix, connectivity: ConnectivityType) -> RegionResult<Pix> {
    check_binary(pix)?;
    let (labels, _) = label_vec(pix, connectivity);
    let w = pix.width() as usize;

    let mut pm = Pix::new(pix.width(), pix.height(), PixelDepth::Bit32)?.to_mut();
    for (idx, &label) in labels.iter().enumerate() {
        if label != 0 {
            pm.set_pixel_unchecked((idx % w) as u32, (idx / w) as u32, label);
        }
    }
    Ok(pm.into())
}

/// Extract a single component from a labeled image
///
/// # Returns
///
/// A 1-bpp image the size of `component.bounds` holding the pixels of
/// `labeled` equal to `component.label`.
///
/// # Errors
///
/// Returns [`RegionError::UnsupportedDepth`] if `labeled` is not 32 bpp and
/// [`RegionError::InvalidParameters`] if the bounds leave the image.
pub fn extract_component(labeled: &Pix, component: &ConnectedComponent) -> RegionResult<Pix> {
    if labeled.depth() != PixelDepth::Bit32 {
        return Err(RegionError::UnsupportedDepth {
            expected: "32-bit",
            actual: labeled.depth().bits(),
        });
    }
    let b = component.bounds;
    if b.is_empty()
        || b.x < 0
        || b.y < 0
        || b.right() > labeled.width() as i32
        || b.bottom() > labeled.height() as i32
    {
        return Err(RegionError::InvalidParameters(format!(
            "component bounds {b:?} outside {}x{} image",
            labeled.width(),
            labeled.height()
        )));
    }

    let mut pm = Pix::new(b.w as u32, b.h as u32, PixelDepth::Bit1)?.to_mut();
    for y in 0..b.h {
        for x in 0..b.w {
            let v = labeled.get_pixel_unchecked((b.x + x) as u32, (b.y + y) as u32);
            if v == component.label {
                pm.set_pixel_unchecked(x as u32, y as u32, 1);
            }
        }
    }
    Ok(pm.into())
}
