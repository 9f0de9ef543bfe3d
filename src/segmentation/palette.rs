//! Fixed six-color palette for labeled output
//!
//! Colors are picked by `representative % 6`, so scenes with more than six
//! planes reuse colors. A color therefore marks membership only among the
//! regions it is not shared with; use the labels for identity.

/// Red, green, blue, magenta, yellow, cyan
pub const PALETTE: [[u8; 3]; 6] = [
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
    [255, 0, 255],
    [255, 255, 0],
    [0, 255, 255],
];

/// Color of the region represented by `representative`
#[inline]
pub fn color_for(representative: u32) -> [u8; 3] {
    PALETTE[(representative % PALETTE.len() as u32) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_wraps() {
        assert_eq!(color_for(0), [255, 0, 0]);
        assert_eq!(color_for(3), [255, 0, 255]);
        assert_eq!(color_for(4), [255, 255, 0]);
        assert_eq!(color_for(6), color_for(0));
        assert_eq!(color_for(11), [0, 255, 255]);
    }
}
