use std::io::Read;

#[cfg(feature = "internal-no-panic")]
use no_panic::no_panic;

use crate::bytes::ReadBytesBe;
use crate::header::QOA_LMS_LEN;
use crate::Error;

/// State values for the LMS predictor of one channel.
///
/// Every frame carries a fresh state for each channel, which replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LmsState {
    pub history: [i16; QOA_LMS_LEN],
    pub weights: [i16; QOA_LMS_LEN],
}

impl LmsState {
    /// Creates a new LmsState with zero values.
    pub fn new() -> LmsState {
        LmsState {
            history: [0; QOA_LMS_LEN],
            weights: [0; QOA_LMS_LEN],
        }
    }

    /// Reads a 16-byte LMS state: four history values followed by four weights.
    ///
    /// Any 16-bit value is accepted.
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<LmsState, Error> {
        let mut state = LmsState::new();
        for h in &mut state.history {
            *h = reader.read_be_i16("lms history")?;
        }
        for w in &mut state.weights {
            *w = reader.read_be_i16("lms weights")?;
        }
        Ok(state)
    }

    /// Returns the predicted next sample: the dot product of history and weights
    /// arithmetically shifted right by 13 bits.
    #[cfg_attr(feature = "internal-no-panic", no_panic)]
    #[inline(always)]
    pub fn predict(&self) -> i32 {
        let mut prediction: i32 = 0;
        for (h, w) in self.history.iter().zip(&self.weights) {
            prediction = prediction.wrapping_add(i32::from(*h) * i32::from(*w));
        }
        // kept at full width, not narrowed to 16 bits before the sum with the residual
        prediction >> 13
    }

    /// Adapts the weights towards `residual` and pushes `sample` to the history.
    ///
    /// The weights are updated using the history before the push.
    #[cfg_attr(feature = "internal-no-panic", no_panic)]
    #[inline(always)]
    pub fn update(&mut self, sample: i16, residual: i32) {
        #[allow(clippy::cast_possible_truncation)] // residuals from a stream are at most 14336
        let delta = (residual >> 4) as i16;
        for (w, h) in self.weights.iter_mut().zip(&self.history) {
            *w = w.wrapping_add(if *h < 0 { delta.wrapping_neg() } else { delta });
        }
        self.history.copy_within(1.., 0);
        self.history[QOA_LMS_LEN - 1] = sample;
    }
}

impl Default for LmsState {
    fn default() -> Self {
        Self::new()
    }
}

/// Reconstructs one sample from the dequantized `residual` and the LMS predictor `state`.
///
/// The predicted sample and `residual` are summed and clamped to the 16-bit range.
/// This method updates `state` with new values. Subsequent calls should pass in the state
/// values from the previous call.
#[cfg_attr(feature = "internal-no-panic", no_panic)]
#[inline(always)]
pub fn decode_qoa_sample(residual: i32, state: &mut LmsState) -> i16 {
    let predicted = state.predict();
    #[allow(clippy::cast_possible_truncation)] // value is clamped so truncation never happens
    let sample = predicted.saturating_add(residual).clamp(-32768, 32767) as i16;
    state.update(sample, residual);
    sample
}
