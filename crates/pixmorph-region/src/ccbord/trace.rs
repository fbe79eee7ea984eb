//! Contour following for outer and hole borders

use super::{Border, BorderPoint, BorderType, ComponentBorders, Direction, ImageBorders};
use crate::conncomp::{
    ConnectivityType, extract_component, find_connected_components, label_connected_components,
    label_vec,
};
use crate::error::RegionResult;
use crate::seedfill::{check_binary, holes_by_filling};
use pixmorph_core::{Box, Pix};
use rayon::prelude::*;

/// Search position after a move in each 8-connected direction: the last
/// background pixel examined, seen from the new pixel.
const QPOSTAB: [usize; 8] = [6, 6, 0, 0, 2, 2, 4, 4];

/// The four axis directions in 4-connected search order.
const AXIAL: [Direction; 4] = [
    Direction::West,
    Direction::North,
    Direction::East,
    Direction::South,
];

#[inline]
fn is_fg(pix: &Pix, p: BorderPoint) -> bool {
    p.x >= 0
        && p.y >= 0
        && (p.x as u32) < pix.width()
        && (p.y as u32) < pix.height()
        && pix.get_pixel_unchecked(p.x as u32, p.y as u32) != 0
}

/// Find the next border pixel clockwise around `p`.
///
/// `qpos` is the search start: an index into the 8 directions for
/// 8-connectivity, or into [`AXIAL`] for 4-connectivity. Returns the next
/// pixel and the search start to use from there, or `None` if `p` has no
/// foreground neighbor.
fn find_next_border_pixel(
    pix: &Pix,
    p: BorderPoint,
    qpos: usize,
    connectivity: ConnectivityType,
) -> Option<(BorderPoint, usize)> {
    match connectivity {
        ConnectivityType::EightWay => (1..8).find_map(|i| {
            let pos = (qpos + i) % 8;
            let np = p.moved(Direction::from_index(pos));
            is_fg(pix, np).then_some((np, QPOSTAB[pos]))
        }),
        // The back-step is the last candidate so dead ends turn around
        ConnectivityType::FourWay => (1..=4).find_map(|i| {
            let pos = (qpos + i) % 4;
            let np = p.moved(AXIAL[pos]);
            is_fg(pix, np).then_some((np, (pos + 2) % 4))
        }),
    }
}

/// Trace one closed border starting at `start`.
///
/// The trace stops when it is back at `start` about to repeat its first
/// move, so the first point is not duplicated at the end.
fn trace_border(
    pix: &Pix,
    start: BorderPoint,
    qpos: usize,
    connectivity: ConnectivityType,
) -> Vec<BorderPoint> {
    let mut points = vec![start];
    let Some((second, mut qpos)) = find_next_border_pixel(pix, start, qpos, connectivity) else {
        return points;
    };

    let mut cur = second;
    while let Some((next, nq)) = find_next_border_pixel(pix, cur, qpos, connectivity) {
        if cur == start && next == second {
            break;
        }
        points.push(cur);
        cur = next;
        qpos = nq;
    }
    points
}

/// Search start for the first pixel of an outer border: West is known
/// to be background.
fn outer_qpos(connectivity: ConnectivityType) -> usize {
    match connectivity {
        ConnectivityType::EightWay => Direction::West.index(),
        ConnectivityType::FourWay => 0,
    }
}

/// Search start for a hole border whose first pixel sits directly above
/// the hole.
fn hole_qpos(connectivity: ConnectivityType) -> usize {
    match connectivity {
        ConnectivityType::EightWay => Direction::South.index(),
        ConnectivityType::FourWay => 3,
    }
}

fn first_fg_pixel(pix: &Pix) -> Option<BorderPoint> {
    (0..pix.height()).find_map(|y| {
        (0..pix.width())
            .find(|&x| pix.get_pixel_unchecked(x, y) != 0)
            .map(|x| BorderPoint::new(x as i32, y as i32))
    })
}

/// Trace the outer border and all hole borders of one component.
///
/// # Arguments
///
/// * `pix` - 1-bpp bitmap holding exactly one connected component, the
///   size of its bounding box
/// * `bounds` - Bounding box of the component in the source image
/// * `connectivity` - Connectivity of the component
///
/// # Returns
///
/// Borders with local points only; `pix` is kept on the result.
pub fn get_component_borders(
    pix: &Pix,
    bounds: Box,
    connectivity: ConnectivityType,
) -> RegionResult<ComponentBorders> {
    check_binary(pix)?;
    let Some(start) = first_fg_pixel(pix) else {
        return Err(crate::RegionError::InvalidParameters(
            "component bitmap is empty".into(),
        ));
    };

    let outer = trace_border(pix, start, outer_qpos(connectivity), connectivity);
    let mut borders = ComponentBorders::new(bounds, Border::new(BorderType::Outer, outer));

    let hole_conn = connectivity.complement();
    let holes = holes_by_filling(pix, hole_conn)?;
    if !holes.is_zero() {
        // Labels are numbered in raster order, so the first pixel seen
        // with label k + 1 is the first pixel of hole k
        let (labels, nholes) = label_vec(&holes, hole_conn);
        let w = pix.width() as usize;
        let mut next_label = 1;
        for (idx, &label) in labels.iter().enumerate() {
            if label != next_label {
                continue;
            }
            next_label += 1;
            let above = BorderPoint::new((idx % w) as i32, (idx / w) as i32 - 1);
            let points = trace_border(pix, above, hole_qpos(connectivity), connectivity);
            borders.holes.push(Border::new(BorderType::Hole, points));
            if label == nholes {
                break;
            }
        }
    }

    borders.pix = Some(pix.clone());
    Ok(borders)
}

/// Trace the borders of every connected component of a binary image.
///
/// Components are ordered by the raster position of their first pixel.
/// Each component is traced independently on the rayon thread pool.
///
/// # Errors
///
/// Returns [`RegionError::UnsupportedDepth`](crate::RegionError) if `pix`
/// is not 1 bpp.
pub fn get_all_borders(pix: &Pix, connectivity: ConnectivityType) -> RegionResult<ImageBorders> {
    check_binary(pix)?;
    let ccs = find_connected_components(pix, connectivity)?;
    let labeled = label_connected_components(pix, connectivity)?;

    let components = ccs
        .par_iter()
        .map(|cc| {
            let cpix = extract_component(&labeled, cc)?;
            get_component_borders(&cpix, cc.bounds, connectivity)
        })
        .collect::<RegionResult<Vec<_>>>()?;

    let mut ccba = ImageBorders::new(pix.width(), pix.height(), connectivity);
    ccba.components = components;
    log::debug!(
        "get_all_borders: {} components, {} borders ({}-connected)",
        ccba.component_count(),
        ccba.total_border_count(),
        connectivity.value()
    );
    Ok(ccba)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmorph_core::PixelDepth;

    fn image(w: u32, h: u32, pixels: &[(u32, u32)]) -> Pix {
        let mut pm = Pix::new(w, h, PixelDepth::Bit1).unwrap().to_mut();
        for &(x, y) in pixels {
            pm.set_pixel(x, y, 1).unwrap();
        }
        pm.into()
    }

    fn pts(v: &[(i32, i32)]) -> Vec<BorderPoint> {
        v.iter().map(|&p| p.into()).collect()
    }

    fn plus_sign() -> Pix {
        let mut pixels = Vec::new();
        for i in 1..6 {
            pixels.push((3, i));
            pixels.push((i, 3));
        }
        image(7, 7, &pixels)
    }

    #[test]
    fn test_plus_sign_eight_way() {
        let ccba = get_all_borders(&plus_sign(), ConnectivityType::EightWay).unwrap();
        assert_eq!(ccba.component_count(), 1);
        let cc = &ccba.components[0];
        assert_eq!(cc.bounds, Box::new_unchecked(1, 1, 5, 5));
        // Local coordinates: the bounding box starts at (1, 1)
        let expected = pts(&[
            (2, 0),
            (2, 1),
            (3, 2),
            (4, 2),
            (3, 2),
            (2, 3),
            (2, 4),
            (2, 3),
            (1, 2),
            (0, 2),
            (1, 2),
            (2, 1),
        ]);
        assert_eq!(cc.outer.local.as_deref(), Some(expected.as_slice()));
        assert!(!cc.has_holes());
    }

    #[test]
    fn test_plus_sign_four_way_visits_center() {
        let ccba = get_all_borders(&plus_sign(), ConnectivityType::FourWay).unwrap();
        let outer = ccba.components[0].outer.local_points().unwrap();
        assert!(outer.contains(&BorderPoint::new(2, 2)));
        // Consecutive points differ by one axis step
        for i in 0..outer.len() {
            let (a, b) = (outer[i], outer[(i + 1) % outer.len()]);
            assert_eq!((a.x - b.x).abs() + (a.y - b.y).abs(), 1);
        }
    }

    #[test]
    fn test_isolated_pixel_and_pair() {
        let pix = image(5, 3, &[(0, 0), (3, 1), (4, 1)]);
        let ccba = get_all_borders(&pix, ConnectivityType::EightWay).unwrap();
        assert_eq!(ccba.component_count(), 2);
        assert_eq!(ccba.components[0].outer.local, Some(pts(&[(0, 0)])));
        assert_eq!(ccba.components[1].outer.local, Some(pts(&[(0, 0), (1, 0)])));
    }

    #[test]
    fn test_four_way_line_turns_around() {
        let pix = image(3, 1, &[(0, 0), (1, 0), (2, 0)]);
        let ccba = get_all_borders(&pix, ConnectivityType::FourWay).unwrap();
        assert_eq!(
            ccba.components[0].outer.local,
            Some(pts(&[(0, 0), (1, 0), (2, 0), (1, 0)]))
        );
    }

    #[test]
    fn test_square_with_hole() {
        let mut pixels = Vec::new();
        for y in 0..3 {
            for x in 0..3 {
                if (x, y) != (1, 1) {
                    pixels.push((x + 2, y + 1));
                }
            }
        }
        let pix = image(8, 6, &pixels);
        for conn in [ConnectivityType::EightWay, ConnectivityType::FourWay] {
            let ccba = get_all_borders(&pix, conn).unwrap();
            assert_eq!(ccba.component_count(), 1);
            let cc = &ccba.components[0];
            assert_eq!(cc.outer.len(), 8);
            assert_eq!(cc.holes.len(), 1);
            let hole = &cc.holes[0];
            assert_eq!(hole.border_type, BorderType::Hole);
            assert_eq!(hole.start, BorderPoint::new(1, 0));
            assert!(hole.len() >= 4);
        }
    }

    #[test]
    fn test_diagonal_hole_only_for_four_way() {
        // Diamond: its center leaks diagonally, so under 8-connectivity
        // the four pixels are one component with a 4-connected hole, and
        // under 4-connectivity they are four separate pixels
        let pix = image(5, 5, &[(2, 1), (1, 2), (3, 2), (2, 3)]);
        let eight = get_all_borders(&pix, ConnectivityType::EightWay).unwrap();
        assert_eq!(eight.component_count(), 1);
        assert_eq!(eight.components[0].holes.len(), 1);
        let four = get_all_borders(&pix, ConnectivityType::FourWay).unwrap();
        assert_eq!(four.component_count(), 4);
        assert!(!four.has_holes());
    }

    #[test]
    fn test_empty_image() {
        let pix = Pix::new(10, 10, PixelDepth::Bit1).unwrap();
        let ccba = get_all_borders(&pix, ConnectivityType::EightWay).unwrap();
        assert_eq!(ccba.component_count(), 0);
        assert_eq!(ccba.total_border_count(), 0);
    }
}
