//! Rendering borders back to rasters

use super::{BorderPoint, ComponentBorders, ImageBorders};
use crate::conncomp::ConnectivityType;
use crate::error::RegionResult;
use crate::seedfill::seedfill_binary;
use pixmorph_core::{Pix, PixMut, PixelDepth, RopOp};

fn plot(pm: &mut PixMut, p: BorderPoint) {
    if p.x >= 0 && p.y >= 0 && (p.x as u32) < pm.width() && (p.y as u32) < pm.height() {
        pm.set_pixel_unchecked(p.x as u32, p.y as u32, 1);
    }
}

/// Bresenham line from `a` to `b`, both ends included.
fn plot_line(pm: &mut PixMut, a: BorderPoint, b: BorderPoint) {
    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut p = a;
    loop {
        plot(pm, p);
        if p == b {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            p.x += sx;
        }
        if e2 <= dx {
            err += dx;
            p.y += sy;
        }
    }
}

/// Region enclosed by a closed border, border included, on a canvas one
/// pixel larger than the bounding box on every side.
///
/// The background reachable from `seed` is filled through the gaps of the
/// border with the complementary connectivity, then inverted.
fn enclosed_region(
    points: &[BorderPoint],
    w: u32,
    h: u32,
    seed: BorderPoint,
    connectivity: ConnectivityType,
) -> RegionResult<Pix> {
    let mut canvas = Pix::new(w + 2, h + 2, PixelDepth::Bit1)?.to_mut();
    for p in points {
        plot(&mut canvas, p.offset(1, 1));
    }
    let mask = Pix::from(canvas).invert();

    let mut seed_pm = mask.create_template().to_mut();
    plot(&mut seed_pm, seed.offset(1, 1));
    let reached = seedfill_binary(&seed_pm.into(), &mask, connectivity.complement())?;
    Ok(reached)
}

/// Rebuild the bitmap of one component, the size of its bounding box,
/// from its local border points.
pub(crate) fn render_component(
    cc: &ComponentBorders,
    connectivity: ConnectivityType,
) -> RegionResult<Pix> {
    let (w, h) = (cc.bounds.w as u32, cc.bounds.h as u32);
    let outer = cc.outer.local_points()?;

    // Outside the outer border, then everything else
    let outside = enclosed_region(outer, w, h, BorderPoint::new(-1, -1), connectivity)?;
    let mut filled = outside.invert().to_mut();

    for hole in &cc.holes {
        let points = hole.local_points()?;
        let inside = hole.start.offset(0, 1);
        let hole_pix = enclosed_region(points, w, h, inside, connectivity)?;
        filled.subtract_inplace(&hole_pix)?;
    }

    Ok(Pix::from(filled).remove_border(1)?)
}

impl ImageBorders {
    /// Draw every border pixel, from the global border points.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::MissingData`](crate::RegionError) if global
    /// points have not been generated.
    pub fn display_border(&self) -> RegionResult<Pix> {
        for b in self.borders() {
            b.global_points()?;
        }
        let mut pm = Pix::new(self.width, self.height, PixelDepth::Bit1)?.to_mut();
        for b in self.borders() {
            for &p in b.global_points()? {
                plot(&mut pm, p);
            }
        }
        Ok(pm.into())
    }

    /// Draw each global single path as a closed polyline.
    ///
    /// Works with both full paths and turning-point paths: consecutive
    /// points are joined by straight segments.
    pub fn display_sp(&self) -> RegionResult<Pix> {
        let mut paths = Vec::with_capacity(self.components.len());
        for cc in &self.components {
            paths.push(
                cc.sp_global
                    .as_deref()
                    .ok_or(crate::RegionError::MissingData("global single paths"))?,
            );
        }

        let mut pm = Pix::new(self.width, self.height, PixelDepth::Bit1)?.to_mut();
        for path in paths {
            match path {
                [] => {}
                [p] => plot(&mut pm, *p),
                _ => {
                    for (a, b) in path.iter().zip(path.iter().cycle().skip(1)) {
                        plot_line(&mut pm, *a, *b);
                    }
                }
            }
        }
        Ok(pm.into())
    }

    /// Reconstruct the foreground of the source image from the local
    /// border points.
    ///
    /// Each component is filled inside its outer border, its holes are
    /// removed, and the result is combined into the image at the
    /// component's bounding box.
    pub fn display_image(&self) -> RegionResult<Pix> {
        for b in self.borders() {
            b.local_points()?;
        }
        let mut pm = Pix::new(self.width, self.height, PixelDepth::Bit1)?.to_mut();
        for cc in &self.components {
            let cpix = render_component(cc, self.connectivity)?;
            pm.rop_rect(cc.bounds.x, cc.bounds.y, &cpix, RopOp::Or)?;
        }
        Ok(pm.into())
    }
}
