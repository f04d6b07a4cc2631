use std::io::Read;

use log::{debug, info, warn};

use crate::header::{ContainerHeader, FrameHeader, QOA_SLICE_LEN};
use crate::lms::LmsState;
use crate::slice::{decode_slice, Slice};
use crate::Error;

/// Decoded PCM audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAudio {
    /// Interleaved 16-bit signed integer samples.
    pub samples: Vec<i16>,
    /// Sample rate in Hz from the last frame header.
    pub sample_rate: u32,
    /// Channel count from the last frame header.
    pub channels: u8,
}

impl DecodedAudio {
    /// Number of samples per channel.
    pub fn frames(&self) -> usize {
        match self.channels {
            0 => 0,
            ch => self.samples.len() / usize::from(ch),
        }
    }

    /// Duration in seconds, or 0.0 if the sample rate is zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Decodes a complete QOA stream.
///
/// `reader` can be anything readable, for example `&[u8]`, a `BufReader<File>` or a mutable
/// reference to one. Reads are unbuffered, so wrap slow sources in a `BufReader`.
///
/// An error is returned if the stream is malformed or ends early. No samples are returned in
/// that case.
pub fn decode<R: Read>(mut reader: R) -> Result<DecodedAudio, Error> {
    let header = ContainerHeader::read(&mut reader)?;
    let frame_count = header.frame_count();
    info!("stream contains {} samples across {} frames", header.total_samples, frame_count);

    let mut channels: Vec<Vec<i16>> = Vec::new();
    let mut states: Vec<LmsState> = Vec::new();
    let mut last_frame: Option<FrameHeader> = None;

    for frame_index in 0..frame_count {
        let frame = FrameHeader::read(&mut reader)?;
        match last_frame {
            None => channels = vec![Vec::new(); usize::from(frame.channels)],
            Some(prev) if prev.channels != frame.channels => {
                return Err(Error::ChannelCountMismatch {
                    expected: prev.channels,
                    found: frame.channels,
                });
            }
            Some(_) => (),
        }
        debug!("frame {}: {} channels, {} Hz, {} samples, {} bytes",
            frame_index, frame.channels, frame.sample_rate, frame.samples, frame.size);
        if usize::from(frame.size) != frame.expected_size() {
            warn!("frame {}: declared size {} but contents need {} bytes",
                frame_index, frame.size, frame.expected_size());
        }
        last_frame = Some(frame);

        // every frame replaces the predictor state of every channel
        states.clear();
        for _ in 0..frame.channels {
            states.push(LmsState::read(&mut reader)?);
        }

        decode_frame(&mut reader, &frame, &mut states, &mut channels)?;
    }

    let samples = interleave(&channels)?;
    let decoded_per_channel = channels.first().map_or(0, Vec::len);
    info!("decoded {} samples", samples.len());
    if u32::try_from(decoded_per_channel).ok() != Some(header.total_samples) {
        warn!("stream declares {} samples per channel but {} were decoded",
            header.total_samples, decoded_per_channel);
    }

    Ok(DecodedAudio {
        samples,
        sample_rate: last_frame.map_or(0, |f| f.sample_rate),
        channels: last_frame.map_or(0, |f| f.channels),
    })
}

// slices of all channels are interleaved: slice 0 of channel 0, slice 0 of channel 1, ..
fn decode_frame<R: Read + ?Sized>(reader: &mut R, frame: &FrameHeader, states: &mut [LmsState],
    channels: &mut [Vec<i16>]) -> Result<(), Error> {

    let frame_len = usize::from(frame.samples);
    for ch in channels.iter_mut() {
        ch.reserve(frame_len);
    }
    let mut buf = [0i16; QOA_SLICE_LEN];
    for slice_index in 0..frame.slice_count() {
        // the last slice may be partially used
        let slice_len = (frame_len - slice_index * QOA_SLICE_LEN).min(QOA_SLICE_LEN);
        for (state, out) in states.iter_mut().zip(channels.iter_mut()) {
            let slice = Slice::read(reader)?;
            let count = decode_slice(slice, state, &mut buf[..slice_len]);
            out.extend_from_slice(&buf[..count]);
        }
    }
    Ok(())
}

/// Interleaves per-channel samples in channel order: one sample from each channel for every
/// sample index.
///
/// All channels must have the same length, otherwise [`Error::ChannelLengthMismatch`] is
/// returned.
pub fn interleave<S: AsRef<[i16]>>(channels: &[S]) -> Result<Vec<i16>, Error> {
    let Some(first) = channels.first() else {
        return Ok(Vec::new());
    };
    let len = first.as_ref().len();
    for (channel, samples) in channels.iter().enumerate() {
        if samples.as_ref().len() != len {
            return Err(Error::ChannelLengthMismatch {
                channel,
                expected: len,
                found: samples.as_ref().len(),
            });
        }
    }
    let mut out = Vec::with_capacity(len * channels.len());
    for i in 0..len {
        for samples in channels {
            out.push(samples.as_ref()[i]);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interleave() {
        let interleaved = interleave(&[vec![1i16, 2, 3], vec![10, 20, 30]]).ok();
        assert_eq!(interleaved, Some(vec![1, 10, 2, 20, 3, 30]));

        let interleaved = interleave(&[[1i16, 2], [3, 4], [5, 6]]).ok();
        assert_eq!(interleaved, Some(vec![1, 3, 5, 2, 4, 6]));

        let mono: &[&[i16]] = &[&[7, 8, 9]];
        assert_eq!(interleave(mono).ok(), Some(vec![7, 8, 9]));

        let none: &[Vec<i16>] = &[];
        assert_eq!(interleave(none).ok(), Some(vec![]));
    }

    #[test]
    fn test_interleave_length_mismatch() {
        assert!(matches!(interleave(&[vec![1i16, 2, 3], vec![10, 20]]),
            Err(Error::ChannelLengthMismatch { channel: 1, expected: 3, found: 2 })));
    }

    #[test]
    fn test_decoded_audio_frames() {
        let audio = DecodedAudio { samples: vec![0; 88200], sample_rate: 44100, channels: 2 };
        assert_eq!(audio.frames(), 44100);
        assert_eq!(audio.duration_secs(), 1.0);

        let audio = DecodedAudio { samples: vec![], sample_rate: 0, channels: 0 };
        assert_eq!(audio.frames(), 0);
        assert_eq!(audio.duration_secs(), 0.0);
    }
}
