//! pixmorph-test - Regression test harness for pixmorph
//!
//! Regression tests run in one of three modes:
//!
//! - **Generate**: Write golden files for later comparison
//! - **Compare**: Compare results with golden files
//! - **Display**: Run tests without comparison
//!
//! # Usage
//!
//! ```ignore
//! use pixmorph_test::RegParams;
//!
//! let mut rp = RegParams::new("seedfill");
//! rp.compare_values(100.0, count as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"
//! - `RUST_LOG`: Library log filter, e.g. `RUST_LOG=debug`

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use pixmorph_core::{Pix, PixelDepth};

/// Deterministic linear congruential generator for synthetic test data.
///
/// The same seed always yields the same sequence, so regression outputs
/// can be compared against golden files.
#[derive(Debug, Clone)]
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Next 31-bit value
    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    /// Value in `0..bound`
    pub fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 { 0 } else { self.next_u32() % bound }
    }
}

/// Binary image with each pixel set with probability `percent / 100`.
pub fn random_binary_pix(width: u32, height: u32, percent: u32, seed: u64) -> TestResult<Pix> {
    let mut rng = Lcg::new(seed);
    let mut pm = Pix::new(width, height, PixelDepth::Bit1)?.to_mut();
    for y in 0..height {
        for x in 0..width {
            if rng.below(100) < percent {
                pm.set_pixel_unchecked(x, y, 1);
            }
        }
    }
    Ok(pm.into())
}

/// Binary image of `count` random filled rectangles, each at most
/// `max_size` on a side.
pub fn random_blobs_pix(
    width: u32,
    height: u32,
    count: u32,
    max_size: u32,
    seed: u64,
) -> TestResult<Pix> {
    let mut rng = Lcg::new(seed);
    let mut pm = Pix::new(width, height, PixelDepth::Bit1)?.to_mut();
    for _ in 0..count {
        let w = 1 + rng.below(max_size);
        let h = 1 + rng.below(max_size);
        let x = rng.below(width);
        let y = rng.below(height);
        pm.set_region(x, y, w, h);
    }
    Ok(pm.into())
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // pixmorph-test is at crates/pixmorph-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_is_deterministic() {
        let a: Vec<u32> = {
            let mut r = Lcg::new(7);
            (0..5).map(|_| r.next_u32()).collect()
        };
        let mut r = Lcg::new(7);
        let b: Vec<u32> = (0..5).map(|_| r.next_u32()).collect();
        assert_eq!(a, b);
        assert!(Lcg::new(3).below(10) < 10);
    }

    #[test]
    fn test_random_binary_pix_density() {
        let empty = random_binary_pix(50, 40, 0, 1).unwrap();
        assert!(empty.is_zero());
        let full = random_binary_pix(50, 40, 100, 1).unwrap();
        assert_eq!(full.count_pixels(), 2000);
        let half = random_binary_pix(100, 100, 50, 9).unwrap();
        let n = half.count_pixels();
        assert!(n > 4000 && n < 6000);
    }
}
