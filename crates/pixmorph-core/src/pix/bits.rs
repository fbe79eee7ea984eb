//! Word-level helpers for packed binary rows
//!
//! Binary seedfill and rank reduction operate on whole 32-bit words
//! instead of individual pixels. These helpers encapsulate the bit
//! tricks those loops share.

/// Layout of a packed row: word count and the valid-bit mask of its
/// last word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitRowLayout {
    /// Words per line
    pub wpl: usize,
    /// Mask of the bits that hold pixels in the last word of the row
    pub end_mask: u32,
}

impl BitRowLayout {
    /// Compute the layout for `width` pixels of `depth` bits each.
    pub fn new(width: u32, depth: u32) -> Self {
        let bits = u64::from(width) * u64::from(depth);
        let wpl = bits.div_ceil(32) as usize;
        let used = (bits % 32) as u32;
        BitRowLayout {
            wpl,
            end_mask: end_mask(used),
        }
    }

    /// Mask for word `j` of a row: all ones except on the last word.
    #[inline]
    pub fn mask_for(&self, j: usize) -> u32 {
        if j + 1 == self.wpl {
            self.end_mask
        } else {
            u32::MAX
        }
    }
}

/// Mask with the `used` most significant bits set; `used == 0` means a
/// full word.
#[inline]
pub fn end_mask(used: u32) -> u32 {
    if used == 0 {
        u32::MAX
    } else {
        !(u32::MAX >> used)
    }
}

/// Bit that enters word `j` from the last pixel of the word on its left.
#[inline]
pub fn carry_from_left(left: u32) -> u32 {
    left << 31
}

/// Bit that enters word `j` from the first pixel of the word on its right.
#[inline]
pub fn carry_from_right(right: u32) -> u32 {
    right >> 31
}

/// A word together with its one-pixel horizontal neighbors.
#[inline]
pub fn smear_horizontal(word: u32) -> u32 {
    word | (word >> 1) | (word << 1)
}

/// Grow `word` horizontally inside `mask` until it stops changing.
///
/// Empty and full words are returned unchanged.
#[inline]
pub fn fill_word_horizontal(mut word: u32, mask: u32) -> u32 {
    if word == 0 || word == u32::MAX {
        return word;
    }
    loop {
        let next = smear_horizontal(word) & mask;
        if next == word {
            return word;
        }
        word = next;
    }
}
