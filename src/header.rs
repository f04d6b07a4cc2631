use std::io::Read;

use crate::bytes::ReadBytesBe;
use crate::Error;

/// The four bytes every QOA stream starts with.
pub const QOA_MAGIC: [u8; 4] = *b"qoaf";

/// Number of samples one slice encodes for one channel.
pub const QOA_SLICE_LEN: usize = 20;

/// Number of slices per channel in a full frame.
pub const QOA_SLICES_PER_FRAME: usize = 256;

/// Length of the LMS history and weight vectors.
pub const QOA_LMS_LEN: usize = 4;

/// The container header at the start of a QOA stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Samples per channel in the whole stream.
    pub total_samples: u32,
}

impl ContainerHeader {
    /// Reads and validates the 8-byte container header.
    ///
    /// Returns [`Error::MalformedContainer`] if the magic doesn't match or if the stream ends
    /// before the header has been read.
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<ContainerHeader, Error> {
        let magic = reader.read_be_bytes::<4>("magic").map_err(truncated_header)?;
        if magic != QOA_MAGIC {
            return Err(Error::MalformedContainer("bad magic"));
        }
        let total_samples = reader.read_be_u32("total sample count").map_err(truncated_header)?;
        Ok(ContainerHeader { total_samples })
    }

    /// Number of frames the stream is expected to contain.
    pub fn frame_count(&self) -> u32 {
        frame_count(self.total_samples)
    }
}

fn truncated_header(err: Error) -> Error {
    match err {
        Error::TruncatedStream(_) => Error::MalformedContainer("stream too short for header"),
        other => other,
    }
}

/// Derives the frame count from the total sample count.
///
/// This is `round(total_samples / QOA_SLICES_PER_FRAME / QOA_SLICE_LEN + 0.5)` evaluated in
/// 32-bit floating point with ties rounded away from zero. It is not a ceiling: an exact
/// multiple of 5120 samples gives one extra frame, and zero samples gives one frame.
#[allow(clippy::cast_precision_loss)]
pub fn frame_count(total_samples: u32) -> u32 {
    let frames = (total_samples as f32 / QOA_SLICES_PER_FRAME as f32 / QOA_SLICE_LEN as f32 + 0.5)
        .round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // always in 1..=838861
    let frames = frames as u32;
    frames
}

/// Header at the start of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub channels: u8,
    /// Sample rate in Hz, 24 bits on the wire.
    pub sample_rate: u32,
    /// Samples per channel in this frame.
    pub samples: u16,
    /// Frame size in bytes including this header. Informational only.
    pub size: u16,
}

impl FrameHeader {
    /// Reads the 8-byte frame header.
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<FrameHeader, Error> {
        Ok(FrameHeader {
            channels: reader.read_u8("frame channel count")?,
            sample_rate: reader.read_be_u24("frame sample rate")?,
            samples: reader.read_be_u16("frame sample count")?,
            size: reader.read_be_u16("frame size")?,
        })
    }

    /// Number of slices per channel that follow the LMS states.
    pub fn slice_count(&self) -> usize {
        usize::from(self.samples).div_ceil(QOA_SLICE_LEN)
    }

    /// Frame size in bytes implied by the channel and sample counts.
    pub fn expected_size(&self) -> usize {
        let channels = usize::from(self.channels);
        8 + channels * QOA_LMS_LEN * 4 + self.slice_count() * channels * 8
    }
}
