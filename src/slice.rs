use std::io::Read;

#[cfg(feature = "internal-no-panic")]
use no_panic::no_panic;

use crate::bytes::ReadBytesBe;
use crate::dequant::{dequant_scale_factor, residual_contribution};
use crate::header::QOA_SLICE_LEN;
use crate::lms::{decode_qoa_sample, LmsState};
use crate::Error;

const SCALE_FACTOR_SHIFT: u32 = 60;
const RESIDUAL_BITS: u32 = 3;

/// Extracts the bits of `word` selected by `mask` after shifting `word` right by `shift` bits.
///
/// Shift amounts of 64 or more wrap around.
#[cfg_attr(feature = "internal-no-panic", no_panic)]
#[inline(always)]
pub fn extract_bits(word: u64, shift: u32, mask: u64) -> u64 {
    word.wrapping_shr(shift) & mask
}

/// One 64-bit slice holding 20 samples of one channel.
///
/// Bits are laid out most significant first: a 4-bit scale factor index in bits 63..60,
/// then twenty 3-bit residual codes in playback order down to bit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice(pub u64);

impl Slice {
    /// Reads an 8-byte big-endian slice.
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Slice, Error> {
        Ok(Slice(reader.read_be_u64("slice")?))
    }

    /// Returns the 4-bit scale factor index.
    #[cfg_attr(feature = "internal-no-panic", no_panic)]
    #[inline(always)]
    pub fn scale_factor_index(self) -> u8 {
        #[allow(clippy::cast_possible_truncation)] // masked to 4 bits
        let index = extract_bits(self.0, SCALE_FACTOR_SHIFT, 0x0f) as u8;
        index
    }

    /// Returns the twenty 3-bit residual codes in playback order.
    #[cfg_attr(feature = "internal-no-panic", no_panic)]
    #[inline(always)]
    pub fn residual_indices(self) -> [u8; QOA_SLICE_LEN] {
        let mut residuals = [0u8; QOA_SLICE_LEN];
        let mut shift = SCALE_FACTOR_SHIFT;
        for r in &mut residuals {
            shift -= RESIDUAL_BITS;
            #[allow(clippy::cast_possible_truncation)] // masked to 3 bits
            {
            *r = extract_bits(self.0, shift, 0b111) as u8;
            }
        }
        residuals
    }
}

/// Decodes a slice to 16-bit signed integer samples.
///
/// The `state` parameter should contain the channel's LMS state from the frame header for the
/// first slice of the frame, and subsequent calls should pass in the state from the previous
/// call.
///
/// This function outputs `min(out_samples.len(), 20)` decoded samples to `out_samples` and
/// returns that count. The state is only advanced for the samples that are output.
#[cfg_attr(feature = "internal-no-panic", no_panic)]
pub fn decode_slice(slice: Slice, state: &mut LmsState, out_samples: &mut [i16]) -> usize {
    let scale_factor = dequant_scale_factor(slice.scale_factor_index());
    let mut count = 0;
    for (out, index) in out_samples.iter_mut().zip(slice.residual_indices()) {
        *out = decode_qoa_sample(residual_contribution(scale_factor, index), state);
        count += 1;
    }
    count
}
