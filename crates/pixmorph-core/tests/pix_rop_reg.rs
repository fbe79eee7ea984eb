//! Regression test for raster operations and border handling on packed
//! binary images whose width is not a multiple of 32.

use pixmorph_core::{Pix, PixelDepth, RopOp};

fn stripes(w: u32, h: u32, period: u32) -> Pix {
    let mut pm = Pix::new(w, h, PixelDepth::Bit1).unwrap().to_mut();
    for y in 0..h {
        for x in 0..w {
            if (x / period + y) % 2 == 0 {
                pm.set_pixel_unchecked(x, y, 1);
            }
        }
    }
    pm.into()
}

// ============================================================================
// Boolean identities
// ============================================================================

#[test]
fn test_de_morgan_on_odd_width() {
    let a = stripes(71, 9, 3);
    let b = stripes(71, 9, 5);

    let lhs = a.or(&b).unwrap().invert();
    let rhs = a.invert().and(&b.invert()).unwrap();
    assert!(lhs.equals(&rhs));
    // Pad bits must stay clear after inversion
    for y in 0..lhs.height() {
        assert_eq!(lhs.row_data(y)[2] & 0x01ff_ffff, 0);
    }
}

#[test]
fn test_subtract_is_and_not() {
    let a = stripes(45, 7, 2);
    let b = stripes(45, 7, 7);
    let sub = a.subtract(&b).unwrap();
    let and_not = a.and(&b.invert()).unwrap();
    assert!(sub.equals(&and_not));
    assert_eq!(
        sub.count_pixels() + a.and(&b).unwrap().count_pixels(),
        a.count_pixels()
    );
}

#[test]
fn test_xor_self_is_zero() {
    let a = stripes(100, 10, 4);
    assert!(a.xor(&a).unwrap().is_zero());
}

// ============================================================================
// Rectangle combination and borders
// ============================================================================

#[test]
fn test_rop_rect_matches_border_embedding() {
    let small = stripes(10, 6, 3);
    let bordered = small.add_border(4, 0).unwrap();

    let mut pm = Pix::new(18, 14, PixelDepth::Bit1).unwrap().to_mut();
    pm.rop_rect(4, 4, &small, RopOp::Or).unwrap();
    let placed: Pix = pm.into();
    assert!(placed.equals(&bordered));
    assert!(placed.remove_border(4).unwrap().equals(&small));
}

#[test]
fn test_set_region_clipped() {
    let mut pm = Pix::new(10, 10, PixelDepth::Bit8).unwrap().to_mut();
    pm.set_region(8, 8, 5, 5);
    let pix: Pix = pm.into();
    assert_eq!(pix.count_pixels(), 4);
    assert_eq!(pix.get_pixel(9, 9), Some(255));
}
