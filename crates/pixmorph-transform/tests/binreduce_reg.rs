//! Binary reduction regression test
//!
//! Rank reduction against a per-block pixel count, monotonicity over
//! levels, subsampling and cascades.
//!
//! Run with:
//! ```text
//! cargo test -p pixmorph-transform --test binreduce_reg
//! ```

use pixmorph_core::{Pix, PixelDepth};
use pixmorph_test::{RegParams, random_binary_pix, random_blobs_pix};
use pixmorph_transform::{reduce_binary2, reduce_rank_binary_cascade, reduce_rank_binary2};

/// Reduce pixel by pixel: ON when at least `level` of the 2x2 block is ON.
fn reference_rank(pix: &Pix, level: u32) -> Pix {
    let (wd, hd) = (pix.width() / 2, pix.height() / 2);
    let mut pm = Pix::new(wd, hd, PixelDepth::Bit1).unwrap().to_mut();
    for y in 0..hd {
        for x in 0..wd {
            let count: u32 = [(0, 0), (1, 0), (0, 1), (1, 1)]
                .iter()
                .map(|&(dx, dy)| pix.get_pixel(2 * x + dx, 2 * y + dy).unwrap())
                .sum();
            if count >= level {
                pm.set_pixel(x, y, 1).unwrap();
            }
        }
    }
    pm.into()
}

#[test]
fn binreduce_reg() {
    let mut rp = RegParams::new("binreduce");

    // --- Word-parallel reduction agrees with the block count ---
    eprintln!("=== Rank levels ===");
    for (i, (w, h, density)) in [(64, 40, 50), (97, 33, 30), (150, 81, 70)]
        .into_iter()
        .enumerate()
    {
        let pix = random_binary_pix(w, h, density, 7 + i as u64).unwrap();
        let mut prev = u64::MAX;
        for level in 1..=4 {
            let out = reduce_rank_binary2(&pix, level).unwrap();
            rp.compare_values((w / 2) as f64, out.width() as f64, 0.0);
            rp.compare_values((h / 2) as f64, out.height() as f64, 0.0);
            rp.compare_pix(&reference_rank(&pix, level), &out);

            // Higher levels never turn on more pixels
            let count = out.count_pixels();
            rp.compare_values(1.0, (count <= prev) as u8 as f64, 0.0);
            eprintln!("  {w}x{h} level {level}: {count} pixels");
            prev = count;
        }
    }

    // --- Subsampling keeps the upper-left pixel of each block ---
    eprintln!("=== Subsample ===");
    let pix = random_binary_pix(101, 64, 50, 3).unwrap();
    let sub = reduce_binary2(&pix).unwrap();
    let mut mismatches = 0;
    for y in 0..sub.height() {
        for x in 0..sub.width() {
            if sub.get_pixel(x, y) != pix.get_pixel(2 * x, 2 * y) {
                mismatches += 1;
            }
        }
    }
    rp.compare_values(0.0, mismatches as f64, 0.0);

    // --- Cascade equals successive single reductions ---
    eprintln!("=== Cascade ===");
    let blobs = random_blobs_pix(320, 240, 30, 60, 11).unwrap();
    let cascade = reduce_rank_binary_cascade(&blobs, 1, 2, 3, 4).unwrap();
    let mut step = blobs.clone();
    for level in 1..=4 {
        step = reduce_rank_binary2(&step, level).unwrap();
    }
    rp.compare_values(20.0, cascade.width() as f64, 0.0);
    rp.compare_values(15.0, cascade.height() as f64, 0.0);
    rp.compare_pix(&step, &cascade);

    let copy = reduce_rank_binary_cascade(&blobs, 0, 0, 0, 0).unwrap();
    rp.compare_pix(&blobs, &copy);

    assert!(rp.cleanup());
}
