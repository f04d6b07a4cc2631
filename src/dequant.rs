
#[cfg(feature = "internal-no-panic")]
use no_panic::no_panic;

// each 3-bit residual code is an index into this table
const DEQUANT_TABLE: &[f32; 8] = &[
    0.75, -0.75, 2.5, -2.5, 4.5, -4.5, 7.0, -7.0
];

/// Dequantizes a 4-bit scale factor index to the scale factor `round((index + 1) ^ 2.75)`.
///
/// Only the lowest 4 bits of `index` are used and the top-most bits are ignored.
/// The result is in the range 1..=2048.
#[cfg_attr(feature = "internal-no-panic", no_panic)]
#[inline(always)]
pub fn dequant_scale_factor(index: u8) -> i16 {
    let index = index & 0x0f; // ensure index is in the range 0..=15
    #[allow(clippy::cast_possible_truncation)] // value is at most 2048
    let scale_factor = f64::from(index + 1).powf(2.75).round() as i16;
    scale_factor
}

/// Returns the dequantized value of a 3-bit residual code.
///
/// Only the lowest 3 bits of `index` are used and the top-most bits are ignored.
#[cfg_attr(feature = "internal-no-panic", no_panic)]
#[inline(always)]
pub fn dequant_residual(index: u8) -> f32 {
    DEQUANT_TABLE[usize::from(index & 0x07)]
}

/// Computes the residual `r` added to the predicted sample: the scale factor multiplied by
/// the dequantized residual, rounded to the nearest integer with ties away from zero.
#[cfg_attr(feature = "internal-no-panic", no_panic)]
#[inline(always)]
pub fn residual_contribution(scale_factor: i16, residual_index: u8) -> i32 {
    // f32::round() always rounds half-way cases away from zero
    #[allow(clippy::cast_possible_truncation)] // |r| is at most 7 * 32768
    let r = (f32::from(scale_factor) * dequant_residual(residual_index)).round() as i32;
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dequant_scale_factor() {
        let expected = [
            1, 7, 21, 45, 84, 138, 211, 304,
            421, 562, 731, 928, 1157, 1419, 1715, 2048
        ];
        for (index, value) in (0u8..).zip(expected) {
            assert_eq!(dequant_scale_factor(index), value);
        }
        // top bits are ignored
        assert_eq!(dequant_scale_factor(0x10), 1);
        assert_eq!(dequant_scale_factor(0xff), 2048);
    }

    #[test]
    fn test_dequant_residual() {
        assert_eq!(dequant_residual(0), 0.75);
        assert_eq!(dequant_residual(1), -0.75);
        assert_eq!(dequant_residual(6), 7.0);
        assert_eq!(dequant_residual(7), -7.0);
        assert_eq!(dequant_residual(0x0b), -2.5);
    }

    #[test]
    fn test_residual_contribution() {
        assert_eq!(residual_contribution(1, 0), 1);
        assert_eq!(residual_contribution(1, 1), -1);
        // ties round away from zero in both directions
        assert_eq!(residual_contribution(1, 2), 3);
        assert_eq!(residual_contribution(1, 3), -3);
        assert_eq!(residual_contribution(7, 1), -5);
        assert_eq!(residual_contribution(7, 4), 32);
        assert_eq!(residual_contribution(21, 5), -95);
        assert_eq!(residual_contribution(2048, 6), 14336);
        assert_eq!(residual_contribution(2048, 7), -14336);
    }
}
