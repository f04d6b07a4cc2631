//!
//! This crate contains a decoder for the [QOA](https://qoaformat.org/) ("Quite OK Audio")
//! lossy audio format. The decoder produces interleaved, linear 16-bit signed integer samples.
//!
//! The per-sample building blocks are exposed as well:
//!  - scale factor and residual dequantization
//!  - 64-bit slice unpacking
//!  - the LMS prediction and weight update step
//!
//! ```no_run
//! let file = std::fs::File::open("audio.qoa")?;
//! let audio = qoa_decoder::decode(std::io::BufReader::new(file))?;
//! println!("{} channels at {} Hz", audio.channels, audio.sample_rate);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!

#![forbid(
    unsafe_code,
    clippy::panic,
    clippy::exit,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unimplemented,
    clippy::todo,
    clippy::unreachable,
)]
#![deny(
    clippy::cast_ptr_alignment,
    clippy::char_lit_as_u8,
    clippy::unnecessary_cast,
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::checked_conversions,
)]

mod bytes;
pub use bytes::ReadBytesBe;

mod header;
pub use header::{frame_count, ContainerHeader, FrameHeader};
pub use header::{QOA_LMS_LEN, QOA_MAGIC, QOA_SLICES_PER_FRAME, QOA_SLICE_LEN};

mod dequant;
pub use dequant::{dequant_residual, dequant_scale_factor, residual_contribution};

mod lms;
pub use lms::{decode_qoa_sample, LmsState};

mod slice;
pub use slice::{decode_slice, extract_bits, Slice};

mod decoder;
pub use decoder::{decode, interleave, DecodedAudio};

/// Error values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The stream doesn't start with a valid QOA container header.
    #[error("malformed container: {0}")]
    MalformedContainer(&'static str),

    /// The stream ended in the middle of the named field.
    #[error("stream truncated while reading {0}")]
    TruncatedStream(&'static str),

    /// A frame header declares a different channel count than the first frame.
    #[error("frame declares {found} channels but the stream started with {expected}")]
    ChannelCountMismatch { expected: u8, found: u8 },

    /// Decoded channels have different lengths and can't be interleaved.
    #[error("channel {channel} has {found} samples, expected {expected}")]
    ChannelLengthMismatch { channel: usize, expected: usize, found: usize },

    /// The underlying byte source failed for a reason other than end of stream.
    #[error("read failed")]
    Io(#[source] std::io::Error),
}
