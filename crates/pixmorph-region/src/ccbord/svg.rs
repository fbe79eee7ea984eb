//! SVG export of single paths

use std::path::Path;

use super::ImageBorders;
use crate::error::{RegionError, RegionResult};

impl ImageBorders {
    /// Render the global single paths as an SVG document.
    ///
    /// Each component becomes one closed `<path>` element in image
    /// coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::MissingData`] if global single paths have
    /// not been generated.
    pub fn to_svg_string(&self) -> RegionResult<String> {
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.width,
            h = self.height
        );
        for cc in &self.components {
            let path = cc
                .sp_global
                .as_deref()
                .ok_or(RegionError::MissingData("global single paths"))?;
            let Some((first, rest)) = path.split_first() else {
                continue;
            };
            svg.push_str(&format!("<path d=\"M {} {}", first.x, first.y));
            for p in rest {
                svg.push_str(&format!(" L {} {}", p.x, p.y));
            }
            svg.push_str(" Z\" fill=\"none\" stroke=\"black\"/>\n");
        }
        svg.push_str("</svg>\n");
        Ok(svg)
    }

    /// Write the SVG document from [`ImageBorders::to_svg_string`] to a
    /// file.
    pub fn write_svg<P: AsRef<Path>>(&self, path: P) -> RegionResult<()> {
        let svg = self.to_svg_string()?;
        std::fs::write(path, svg)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::ccbord::{ImageBorders, PointsFlag};
    use crate::conncomp::ConnectivityType;
    use crate::error::RegionError;
    use pixmorph_core::{Pix, PixelDepth};

    #[test]
    fn test_svg_of_rectangle() {
        let mut pm = Pix::new(10, 8, PixelDepth::Bit1).unwrap().to_mut();
        pm.set_region(2, 3, 4, 2);
        let pix: Pix = pm.into();
        let mut ccba = ImageBorders::from_pix(&pix, ConnectivityType::EightWay).unwrap();
        assert!(matches!(
            ccba.to_svg_string(),
            Err(RegionError::MissingData(_))
        ));

        ccba.generate_single_path().unwrap();
        ccba.generate_sp_global_locs(PointsFlag::TurningPoints).unwrap();
        let svg = ccba.to_svg_string().unwrap();
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"width="10" height="8""#));
        assert!(svg.contains(r#"<path d="M 2 3 L 5 3 L 5 4 L 2 4 Z" fill="none" stroke="black"/>"#));
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
