//! Binary 2x reduction
//!
//! Each output pixel covers a 2x2 block of the source. Subsampling keeps
//! the upper-left pixel of the block; rank reduction sets the output pixel
//! when at least `level` of the four block pixels are ON.
//!
//! The work is done a source word at a time: the vertical and horizontal
//! combinations of a block land on the even (upper-left) bit of each pixel
//! pair, and a byte lookup table packs those even bits into 16 output bits.
//! The output is `width / 2` by `height / 2`.

use crate::error::{TransformError, TransformResult};
use pixmorph_core::pix::set_data_two_bytes;
use pixmorph_core::{Pix, PixelDepth};

/// Bits of the left pixel of every horizontal pair
const EVEN_BITS: u32 = 0xaaaa_aaaa;

/// Build the table that packs bits 7, 5, 3 and 1 of a byte into a nibble.
pub fn make_subsample_tab2x() -> [u8; 256] {
    let mut tab = [0u8; 256];
    for (i, t) in tab.iter_mut().enumerate() {
        *t = (((i >> 4) & 8) | ((i >> 3) & 4) | ((i >> 2) & 2) | ((i >> 1) & 1)) as u8;
    }
    tab
}

#[inline]
fn compact(tab: &[u8; 256], word: u32) -> u32 {
    ((tab[(word >> 24) as usize] as u32) << 12)
        | ((tab[((word >> 16) & 0xff) as usize] as u32) << 8)
        | ((tab[((word >> 8) & 0xff) as usize] as u32) << 4)
        | tab[(word & 0xff) as usize] as u32
}

fn check_reducible(pix: &Pix) -> TransformResult<()> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(TransformError::UnsupportedDepth(format!(
            "expected 1 bpp, got {} bpp",
            pix.depth().bits()
        )));
    }
    if pix.height() <= 1 {
        return Err(TransformError::InvalidParameters(format!(
            "height {} is too small to reduce",
            pix.height()
        )));
    }
    Ok(())
}

/// Run `combine(top, bottom)` over every word pair of rows `2i` and
/// `2i + 1` and pack the even bits of the result into the output.
fn reduce_with<F>(pix: &Pix, tab: &[u8; 256], combine: F) -> TransformResult<Pix>
where
    F: Fn(u32, u32) -> u32,
{
    let wd = pix.width() / 2;
    let hd = pix.height() / 2;
    let mut pixd = Pix::new(wd, hd, PixelDepth::Bit1)?.to_mut();
    pixd.set_resolution(pix.xres() / 2, pix.yres() / 2);

    // Two 16-bit output slots per destination word
    let nslots = (pix.wpl() as usize).min(2 * pixd.wpl() as usize);
    for i in 0..hd {
        let top = pix.row_data(2 * i);
        let bottom = pix.row_data(2 * i + 1);
        let lined = pixd.row_data_mut(i);
        for j in 0..nslots {
            let word = combine(top[j], bottom[j]) & EVEN_BITS;
            set_data_two_bytes(lined, j as u32, compact(tab, word));
        }
    }
    // An odd source width leaves its last pixel paired with padding
    pixd.clear_pad_bits();
    Ok(pixd.into())
}

/// 2x reduction by subsampling: output pixel `(x, y)` is source pixel
/// `(2x, 2y)`.
///
/// # Errors
///
/// Returns [`TransformError::UnsupportedDepth`] unless `pix` is 1 bpp and
/// [`TransformError::InvalidParameters`] if its height is 1.
pub fn reduce_binary2(pix: &Pix) -> TransformResult<Pix> {
    check_reducible(pix)?;
    let tab = make_subsample_tab2x();
    reduce_with(pix, &tab, |top, _| top)
}

/// 2x rank reduction.
///
/// With the 2x2 block
///
/// ```text
/// a b
/// c d
/// ```
///
/// the output pixel is ON when at least `level` of `a`, `b`, `c`, `d` are
/// ON: `level` 1 is an OR of the block, 4 is an AND.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if `level` is not in
/// `1..=4` or the height is 1, and [`TransformError::UnsupportedDepth`]
/// unless `pix` is 1 bpp.
pub fn reduce_rank_binary2(pix: &Pix, level: u32) -> TransformResult<Pix> {
    check_reducible(pix)?;
    let tab = make_subsample_tab2x();
    match level {
        // a | b | c | d
        1 => reduce_with(pix, &tab, |top, bottom| {
            let v = top | bottom;
            v | (v << 1)
        }),
        // (a | c) & (b | d), or a full column
        2 => reduce_with(pix, &tab, |top, bottom| {
            let and = top & bottom;
            let or = top | bottom;
            (or & (or << 1)) | and | (and << 1)
        }),
        // one full column and at least one pixel of the other
        3 => reduce_with(pix, &tab, |top, bottom| {
            let and = top & bottom;
            let or = top | bottom;
            (or & (and << 1)) | (and & (or << 1))
        }),
        // a & b & c & d
        4 => reduce_with(pix, &tab, |top, bottom| {
            let and = top & bottom;
            and & (and << 1)
        }),
        _ => Err(TransformError::InvalidParameters(format!(
            "rank level must be in 1..=4, got {level}"
        ))),
    }
}

/// Up to four successive 2x rank reductions.
///
/// Reduction stops at the first level that is 0. If `level1` is 0 a copy
/// of `pix` is returned.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if any level before the
/// first 0 is greater than 4, or if an intermediate image becomes too
/// small to reduce.
pub fn reduce_rank_binary_cascade(
    pix: &Pix,
    level1: u32,
    level2: u32,
    level3: u32,
    level4: u32,
) -> TransformResult<Pix> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(TransformError::UnsupportedDepth(format!(
            "expected 1 bpp, got {} bpp",
            pix.depth().bits()
        )));
    }
    let levels: Vec<u32> = [level1, level2, level3, level4]
        .into_iter()
        .take_while(|&l| l != 0)
        .collect();
    if let Some(&bad) = levels.iter().find(|&&l| l > 4) {
        return Err(TransformError::InvalidParameters(format!(
            "rank level must be in 0..=4, got {bad}"
        )));
    }
    if levels.is_empty() {
        log::warn!("reduce_rank_binary_cascade: level1 is 0; returning a copy");
        return Ok(pix.deep_clone());
    }

    let mut cur = reduce_rank_binary2(pix, levels[0])?;
    for &level in &levels[1..] {
        cur = reduce_rank_binary2(&cur, level)?;
    }
    log::debug!(
        "reduce_rank_binary_cascade: {}x{} -> {}x{} in {} stages",
        pix.width(),
        pix.height(),
        cur.width(),
        cur.height(),
        levels.len()
    );
    Ok(cur)
}
