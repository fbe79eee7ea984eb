//! Distance function regression test
//!
//! Frame condition, isolated pixels, metric relations and saturation.

use pixmorph_core::{Pix, PixelDepth};
use pixmorph_region::{BoundaryCondition, ConnectivityType, distance_function};
use pixmorph_test::{RegParams, random_binary_pix, random_blobs_pix};

fn frame_sum(pix: &Pix) -> u64 {
    let (w, h) = (pix.width(), pix.height());
    let mut sum = 0u64;
    for x in 0..w {
        sum += pix.get_pixel(x, 0).unwrap() as u64 + pix.get_pixel(x, h - 1).unwrap() as u64;
    }
    for y in 0..h {
        sum += pix.get_pixel(0, y).unwrap() as u64 + pix.get_pixel(w - 1, y).unwrap() as u64;
    }
    sum
}

#[test]
fn distance_reg() {
    let mut rp = RegParams::new("distance");

    // --- Frame is zero for the background boundary condition ---
    eprintln!("=== Frame ===");
    let pix = random_blobs_pix(120, 90, 40, 30, 17).unwrap();
    for conn in [ConnectivityType::FourWay, ConnectivityType::EightWay] {
        for depth in [PixelDepth::Bit8, PixelDepth::Bit16] {
            let d = distance_function(&pix, conn, depth, BoundaryCondition::Background).unwrap();
            rp.compare_values(0.0, frame_sum(&d) as f64, 0.0);
            rp.compare_values(depth.bits() as f64, d.depth().bits() as f64, 0.0);
        }
    }

    // --- Isolated pixels have distance 1 ---
    eprintln!("=== Isolated pixels ===");
    let mut pm = Pix::new(30, 30, PixelDepth::Bit1).unwrap().to_mut();
    for &(x, y) in &[(5, 5), (10, 20), (25, 7)] {
        pm.set_pixel(x, y, 1).unwrap();
    }
    let pix: Pix = pm.into();
    for conn in [ConnectivityType::FourWay, ConnectivityType::EightWay] {
        let d = distance_function(&pix, conn, PixelDepth::Bit8, BoundaryCondition::Background)
            .unwrap();
        for &(x, y) in &[(5, 5), (10, 20), (25, 7)] {
            rp.compare_values(1.0, d.get_pixel(x, y).unwrap() as f64, 0.0);
        }
    }

    // --- Support equals the interior foreground; chessboard <= city block ---
    eprintln!("=== Metrics ===");
    let pix = random_binary_pix(70, 50, 85, 23).unwrap();
    let d4 = distance_function(
        &pix,
        ConnectivityType::FourWay,
        PixelDepth::Bit16,
        BoundaryCondition::Background,
    )
    .unwrap();
    let d8 = distance_function(
        &pix,
        ConnectivityType::EightWay,
        PixelDepth::Bit16,
        BoundaryCondition::Background,
    )
    .unwrap();
    let mut bad_support = 0;
    let mut bad_order = 0;
    let mut bad_step = 0;
    for y in 1..49 {
        for x in 1..69 {
            let fg = pix.get_pixel(x, y).unwrap() != 0;
            let v4 = d4.get_pixel(x, y).unwrap();
            let v8 = d8.get_pixel(x, y).unwrap();
            if fg != (v4 > 0) || fg != (v8 > 0) {
                bad_support += 1;
            }
            if v8 > v4 {
                bad_order += 1;
            }
            // City-block values of 4-neighbors differ by at most 1
            let right = d4.get_pixel(x + 1, y).unwrap();
            if v4.abs_diff(right) > 1 {
                bad_step += 1;
            }
        }
    }
    rp.compare_values(0.0, bad_support as f64, 0.0);
    rp.compare_values(0.0, bad_order as f64, 0.0);
    rp.compare_values(0.0, bad_step as f64, 0.0);

    // --- Saturation ---
    eprintln!("=== Saturation ===");
    let mut pm = Pix::new(700, 700, PixelDepth::Bit1).unwrap().to_mut();
    pm.set_all();
    let pix: Pix = pm.into();
    let d8 = distance_function(
        &pix,
        ConnectivityType::FourWay,
        PixelDepth::Bit8,
        BoundaryCondition::Background,
    )
    .unwrap();
    let d16 = distance_function(
        &pix,
        ConnectivityType::FourWay,
        PixelDepth::Bit16,
        BoundaryCondition::Background,
    )
    .unwrap();
    rp.compare_values(254.0, d8.get_pixel(350, 350).unwrap() as f64, 0.0);
    rp.compare_values(349.0, d16.get_pixel(350, 350).unwrap() as f64, 0.0);

    // --- Foreground boundary: a full image has no background to reach ---
    let df = distance_function(
        &pix,
        ConnectivityType::EightWay,
        PixelDepth::Bit16,
        BoundaryCondition::Foreground,
    )
    .unwrap();
    rp.compare_values(0xfffe as f64, df.get_pixel(0, 0).unwrap() as f64, 0.0);

    assert!(rp.cleanup());
}
