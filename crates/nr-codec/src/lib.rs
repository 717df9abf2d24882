//! Codec boundary for nraudio.
//!
//! Defines the [`Decoder`] and [`Coder`] roles, the PCM/WAV adapter, and a
//! registry mapping extensions and magic bytes to adapters. Adapters for
//! library-backed formats (MP3, Ogg Vorbis) live outside this workspace and
//! plug in through [`CodecRegistry::register`].

mod codec;
mod pcm;
mod registry;

pub use codec::{Coder, Decoder, Quality};
pub use pcm::{PcmCoder, PcmDecoder};
pub use registry::{CodecEntry, CodecRegistry};

use thiserror::Error;

/// Error type for decoding and encoding.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Format validation or buffer storage failure.
    #[error(transparent)]
    Audio(#[from] nr_core::AudioError),

    /// Reading the source or writing the sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A container header could not be parsed.
    #[error("Malformed header: {0}")]
    Header(#[from] binrw::Error),

    /// The container structure is invalid.
    #[error("Malformed container: {0}")]
    Malformed(String),

    /// The sample payload ends before its declared length.
    #[error("Truncated data: expected {expected} bytes, found {available}")]
    Truncated { expected: usize, available: usize },

    /// The buffer cannot be expressed in the target container.
    #[error("Unrepresentable in container: {0}")]
    Unrepresentable(String),

    /// No registered adapter handles the given file or stream.
    #[error("No suitable codec for {0}")]
    NoSuitableCodec(String),

    /// Failure reported by an external codec library.
    #[error("{codec} library error: {message}")]
    Library { codec: &'static str, message: String },
}
