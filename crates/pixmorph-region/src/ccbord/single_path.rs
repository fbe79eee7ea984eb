//! Single-path merging of outer and hole borders
//!
//! Each hole is attached to the path by a cut through foreground pixels,
//! from a hole border pixel to a pixel already on the path (the outer
//! border or a hole spliced earlier). Straight cuts are preferred; when
//! none exists the shortest route through the component is used. The path
//! walks the cut in, goes once around the hole and walks the cut back
//! out, so a component with holes becomes one closed walk.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};

use super::render::render_component;
use super::{BorderPoint, ComponentBorders, Direction, ImageBorders, PointsFlag};
use crate::conncomp::ConnectivityType;
use crate::error::{RegionError, RegionResult};
use pixmorph_core::Pix;

const CUT_DIRECTIONS: [Direction; 4] = [
    Direction::West,
    Direction::North,
    Direction::East,
    Direction::South,
];

const ALL_DIRECTIONS: [Direction; 8] = [
    Direction::West,
    Direction::NorthWest,
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
];

/// A connection from hole border pixel `p` to path pixel `q`.
#[derive(Debug)]
struct Cut {
    /// Index of `p` in the hole border
    hole_index: usize,
    q: BorderPoint,
    /// Pixels strictly between `p` and `q`, starting next to `p`
    inner: Vec<BorderPoint>,
}

fn is_foreground(pix: &Pix, p: BorderPoint) -> bool {
    p.x >= 0
        && p.y >= 0
        && (p.x as u32) < pix.width()
        && (p.y as u32) < pix.height()
        && pix.get_pixel_unchecked(p.x as u32, p.y as u32) != 0
}

/// Walk from `p` in `dir` until a path pixel is reached.
///
/// Fails on background or on leaving the bounding box. Border pixels of
/// holes not yet on the path are crossed like any other foreground pixel.
fn walk_cut(
    pix: &Pix,
    p: BorderPoint,
    dir: Direction,
    on_path: &HashSet<BorderPoint>,
) -> Option<(BorderPoint, Vec<BorderPoint>)> {
    let mut inner = Vec::new();
    let mut q = p.moved(dir);
    while is_foreground(pix, q) {
        if on_path.contains(&q) {
            return Some((q, inner));
        }
        inner.push(q);
        q = q.moved(dir);
    }
    None
}

/// Shortest straight cut from `hole` to the path; the first one found
/// wins ties. A hole pixel already on the path gives an empty cut.
fn find_cut(pix: &Pix, hole: &[BorderPoint], on_path: &HashSet<BorderPoint>) -> Option<Cut> {
    if let Some(hole_index) = hole.iter().position(|p| on_path.contains(p)) {
        return Some(Cut {
            hole_index,
            q: hole[hole_index],
            inner: Vec::new(),
        });
    }
    let mut best: Option<Cut> = None;
    for (hole_index, &p) in hole.iter().enumerate() {
        for dir in CUT_DIRECTIONS {
            if let Some((q, inner)) = walk_cut(pix, p, dir, on_path) {
                if best.as_ref().is_none_or(|b| inner.len() < b.inner.len()) {
                    best = Some(Cut {
                        hole_index,
                        q,
                        inner,
                    });
                }
            }
        }
    }
    best
}

/// Shortest route through foreground pixels from any hole border pixel to
/// the path, stepping with the component's connectivity.
fn find_route(
    pix: &Pix,
    hole: &[BorderPoint],
    on_path: &HashSet<BorderPoint>,
    connectivity: ConnectivityType,
) -> Option<Cut> {
    let directions: &[Direction] = match connectivity {
        ConnectivityType::FourWay => &CUT_DIRECTIONS,
        ConnectivityType::EightWay => &ALL_DIRECTIONS,
    };
    let mut sources: HashMap<BorderPoint, usize> = HashMap::new();
    let mut came_from: HashMap<BorderPoint, BorderPoint> = HashMap::new();
    let mut queue = VecDeque::new();
    for (i, &p) in hole.iter().enumerate() {
        if let Entry::Vacant(slot) = sources.entry(p) {
            slot.insert(i);
            queue.push_back(p);
        }
    }

    while let Some(cur) = queue.pop_front() {
        for &dir in directions {
            let next = cur.moved(dir);
            if sources.contains_key(&next)
                || came_from.contains_key(&next)
                || !is_foreground(pix, next)
            {
                continue;
            }
            if on_path.contains(&next) {
                let mut inner = Vec::new();
                let mut at = cur;
                while let Some(&back) = came_from.get(&at) {
                    inner.push(at);
                    at = back;
                }
                inner.reverse();
                return Some(Cut {
                    hole_index: *sources.get(&at)?,
                    q: next,
                    inner,
                });
            }
            came_from.insert(next, cur);
            queue.push_back(next);
        }
    }
    None
}

/// Outer border point closest to any hole border point.
fn nearest_jump(hole: &[BorderPoint], outer: &[BorderPoint]) -> Option<Cut> {
    let mut best: Option<(i64, Cut)> = None;
    for (hole_index, p) in hole.iter().enumerate() {
        for &q in outer {
            let (dx, dy) = ((q.x - p.x) as i64, (q.y - p.y) as i64);
            let d2 = dx * dx + dy * dy;
            if best.as_ref().is_none_or(|(bd, _)| d2 < *bd) {
                best = Some((
                    d2,
                    Cut {
                        hole_index,
                        q,
                        inner: Vec::new(),
                    },
                ));
            }
        }
    }
    best.map(|(_, cut)| cut)
}

/// Splice a hole into `path` at the first occurrence of the cut's outer
/// end.
fn splice(path: &mut Vec<BorderPoint>, hole: &[BorderPoint], cut: &Cut) -> RegionResult<()> {
    let iq = path
        .iter()
        .position(|&pt| pt == cut.q)
        .ok_or_else(|| RegionError::InvalidFormat("cut endpoint is not on the path".into()))?;
    let p = hole[cut.hole_index];

    let mut seg = Vec::with_capacity(2 * cut.inner.len() + hole.len() + 2);
    seg.extend(cut.inner.iter().rev());
    if p != cut.q {
        seg.push(p);
    }
    seg.extend(&hole[cut.hole_index + 1..]);
    seg.extend(&hole[..cut.hole_index]);
    if hole.len() > 1 {
        seg.push(p);
    }
    seg.extend(&cut.inner);
    if p != cut.q {
        seg.push(cut.q);
    }

    path.splice(iq + 1..iq + 1, seg);
    Ok(())
}

fn component_single_path(
    cc: &ComponentBorders,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<BorderPoint>> {
    let outer = cc.outer.local_points()?;
    let mut path = outer.to_vec();
    if cc.holes.is_empty() {
        return Ok(path);
    }

    let pix = match &cc.pix {
        Some(pix) => pix.clone(),
        None => render_component(cc, connectivity)?,
    };
    let mut on_path: HashSet<BorderPoint> = outer.iter().copied().collect();

    for hole in &cc.holes {
        let points = hole.local_points()?;
        let cut = match find_cut(&pix, points, &on_path)
            .or_else(|| find_route(&pix, points, &on_path, connectivity))
        {
            Some(cut) => cut,
            None => {
                log::warn!(
                    "hole at ({}, {}) in component at ({}, {}) is not connected; jumping",
                    hole.start.x,
                    hole.start.y,
                    cc.bounds.x,
                    cc.bounds.y
                );
                nearest_jump(points, outer)
                    .ok_or(RegionError::MissingData("outer border points"))?
            }
        };
        splice(&mut path, points, &cut)?;
        on_path.extend(points.iter().copied());
        on_path.extend(cut.inner.iter().copied());
    }
    Ok(path)
}

/// Keep the end points and every point where the step direction changes.
fn turning_points(path: &[BorderPoint]) -> Vec<BorderPoint> {
    if path.len() < 3 {
        return path.to_vec();
    }
    let mut out = Vec::with_capacity(path.len());
    out.push(path[0]);
    out.extend(path.windows(3).filter_map(|w| {
        let (a, b, c) = (w[0], w[1], w[2]);
        (b.x - a.x != c.x - b.x || b.y - a.y != c.y - b.y).then_some(b)
    }));
    out.push(path[path.len() - 1]);
    out
}

impl ImageBorders {
    /// Merge each component's outer border and hole borders into a single
    /// closed path in local coordinates.
    ///
    /// Components read back from serialized data have no bitmap; it is
    /// rebuilt from the borders here.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::MissingData`] if any border lacks local
    /// points.
    pub fn generate_single_path(&mut self) -> RegionResult<()> {
        for b in self.borders() {
            b.local_points()?;
        }
        let conn = self.connectivity;
        let paths = self
            .components
            .iter()
            .map(|cc| component_single_path(cc, conn))
            .collect::<RegionResult<Vec<_>>>()?;
        for (cc, path) in self.components.iter_mut().zip(paths) {
            cc.sp_local = Some(path);
        }
        Ok(())
    }

    /// Translate each single path into image coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::MissingData`] if single paths have not been
    /// generated.
    pub fn generate_sp_global_locs(&mut self, flag: PointsFlag) -> RegionResult<()> {
        if self.components.iter().any(|cc| cc.sp_local.is_none()) {
            return Err(RegionError::MissingData("local single paths"));
        }
        for cc in &mut self.components {
            let (dx, dy) = (cc.bounds.x, cc.bounds.y);
            let Some(local) = cc.sp_local.as_deref() else {
                continue;
            };
            let global: Vec<BorderPoint> = local.iter().map(|p| p.offset(dx, dy)).collect();
            cc.sp_global = Some(match flag {
                PointsFlag::All => global,
                PointsFlag::TurningPoints => turning_points(&global),
            });
        }
        Ok(())
    }
}
