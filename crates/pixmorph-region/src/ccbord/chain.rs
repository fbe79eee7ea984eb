//! Step chains and coordinate frames

use super::{BorderPoint, CoordType, Direction, ImageBorders};
use crate::error::{RegionError, RegionResult};

/// Convert a closed loop of border points to a step chain.
///
/// The chain has one step per point, the last one leading from the final
/// point back to the first. A single point has an empty chain.
///
/// # Errors
///
/// Returns [`RegionError::InvalidParameters`] if two consecutive points
/// are not 8-adjacent.
pub fn to_chain_code(points: &[BorderPoint]) -> RegionResult<Vec<Direction>> {
    if points.len() < 2 {
        return Ok(Vec::new());
    }
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| {
            Direction::from_offset(b.x - a.x, b.y - a.y).ok_or_else(|| {
                RegionError::InvalidParameters(format!(
                    "border points ({}, {}) and ({}, {}) are not adjacent",
                    a.x, a.y, b.x, b.y
                ))
            })
        })
        .collect()
}

/// Rebuild a closed loop of border points from a start point and chain.
///
/// # Errors
///
/// Returns [`RegionError::InvalidFormat`] if the chain does not return to
/// `start`.
pub fn from_chain_code(start: BorderPoint, chain: &[Direction]) -> RegionResult<Vec<BorderPoint>> {
    let Some((&last, body)) = chain.split_last() else {
        return Ok(vec![start]);
    };
    let mut points = Vec::with_capacity(chain.len());
    let mut p = start;
    points.push(p);
    for &dir in body {
        p = p.moved(dir);
        points.push(p);
    }
    if p.moved(last) != start {
        return Err(RegionError::InvalidFormat(format!(
            "step chain from ({}, {}) does not close",
            start.x, start.y
        )));
    }
    Ok(points)
}

fn to_global(points: &[BorderPoint], dx: i32, dy: i32) -> Vec<BorderPoint> {
    points.iter().map(|p| p.offset(dx, dy)).collect()
}

impl ImageBorders {
    /// Add each component's bounding-box offset to its local border
    /// points, keeping the local points.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::MissingData`] if any border lacks local points.
    pub fn generate_global_locs(&mut self) -> RegionResult<()> {
        for b in self.borders() {
            b.local_points()?;
        }
        for cc in &mut self.components {
            let (dx, dy) = (cc.bounds.x, cc.bounds.y);
            for b in cc.borders_mut() {
                b.global = b.local.as_deref().map(|l| to_global(l, dx, dy));
            }
        }
        Ok(())
    }

    /// Derive the step chain of every border from its local points.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::MissingData`] if any border lacks local
    /// points, or [`RegionError::InvalidParameters`] if a point list is not
    /// a chain of adjacent pixels. Nothing is changed on error.
    pub fn generate_step_chains(&mut self) -> RegionResult<()> {
        let chains = self
            .borders()
            .map(|b| to_chain_code(b.local_points()?))
            .collect::<RegionResult<Vec<_>>>()?;

        let mut chains = chains.into_iter();
        for cc in &mut self.components {
            for b in cc.borders_mut() {
                b.steps = chains.next();
            }
        }
        log::debug!(
            "generate_step_chains: {} borders",
            self.total_border_count()
        );
        Ok(())
    }

    /// Regenerate border points from the step chains.
    ///
    /// With [`CoordType::Local`] the local points are replaced; with
    /// [`CoordType::Global`] the global points are.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::MissingData`] if any border lacks a step
    /// chain and [`RegionError::InvalidFormat`] if a chain does not close.
    pub fn step_chains_to_pix_coords(&mut self, coord: CoordType) -> RegionResult<()> {
        let mut loops = Vec::with_capacity(self.total_border_count());
        for cc in &self.components {
            for b in cc.borders() {
                let pts = from_chain_code(b.start, b.step_chain()?)?;
                loops.push(match coord {
                    CoordType::Local => pts,
                    CoordType::Global => to_global(&pts, cc.bounds.x, cc.bounds.y),
                });
            }
        }

        let mut loops = loops.into_iter();
        for cc in &mut self.components {
            for b in cc.borders_mut() {
                let pts = loops.next();
                match coord {
                    CoordType::Local => b.local = pts,
                    CoordType::Global => b.global = pts,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ccbord::{Border, BorderType, ComponentBorders};
    use crate::conncomp::ConnectivityType;
    use pixmorph_core::Box;

    fn pts(v: &[(i32, i32)]) -> Vec<BorderPoint> {
        v.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn test_chain_code_closes_loop() {
        let loop_ = pts(&[(0, 0), (1, 0), (1, 1), (0, 1)]);
        let chain = to_chain_code(&loop_).unwrap();
        assert_eq!(
            chain,
            vec![
                Direction::East,
                Direction::South,
                Direction::West,
                Direction::North
            ]
        );
        assert_eq!(from_chain_code(BorderPoint::new(0, 0), &chain).unwrap(), loop_);
    }

    #[test]
    fn test_single_point_has_no_steps() {
        let p = BorderPoint::new(4, 2);
        assert!(to_chain_code(&[p]).unwrap().is_empty());
        assert_eq!(from_chain_code(p, &[]).unwrap(), vec![p]);
    }

    #[test]
    fn test_gap_is_rejected() {
        assert!(to_chain_code(&pts(&[(0, 0), (2, 0)])).is_err());
        let open = [Direction::East, Direction::East];
        assert!(matches!(
            from_chain_code(BorderPoint::new(0, 0), &open),
            Err(RegionError::InvalidFormat(_))
        ));
    }

    fn one_component() -> ImageBorders {
        let outer = Border::new(BorderType::Outer, pts(&[(0, 0), (1, 0), (1, 1)]));
        let mut ccba = ImageBorders::new(20, 20, ConnectivityType::EightWay);
        ccba.components
            .push(ComponentBorders::new(Box::new_unchecked(5, 7, 2, 2), outer));
        ccba
    }

    #[test]
    fn test_global_locs_and_back() {
        let mut ccba = one_component();
        ccba.generate_global_locs().unwrap();
        let outer = &ccba.components[0].outer;
        assert_eq!(outer.global, Some(pts(&[(5, 7), (6, 7), (6, 8)])));

        ccba.generate_step_chains().unwrap();
        let local = ccba.components[0].outer.local.clone();
        let global = ccba.components[0].outer.global.clone();
        ccba.step_chains_to_pix_coords(CoordType::Global).unwrap();
        ccba.step_chains_to_pix_coords(CoordType::Local).unwrap();
        assert_eq!(ccba.components[0].outer.global, global);
        assert_eq!(ccba.components[0].outer.local, local);
    }

    #[test]
    fn test_prerequisites_leave_state_untouched() {
        let mut ccba = one_component();
        assert!(matches!(
            ccba.step_chains_to_pix_coords(CoordType::Local),
            Err(RegionError::MissingData(_))
        ));
        ccba.components[0].outer.local = None;
        assert!(ccba.generate_global_locs().is_err());
        assert!(ccba.generate_step_chains().is_err());
        assert!(ccba.components[0].outer.global.is_none());
        assert!(ccba.components[0].outer.steps.is_none());
    }
}
