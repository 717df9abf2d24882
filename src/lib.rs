//! nraudio: PCM sample buffers with on-the-fly format conversion, and a
//! codec boundary for moving them in and out of containers.
//!
//! The sample model lives in [`nr_core`], the decoder/coder contracts and
//! the WAV adapter in [`nr_codec`]. This crate re-exports both and adds the
//! file-to-file [`transcode`] pipeline used by the `nr-cli` binary.

mod transcode;

pub use nr_codec::{
    Coder, CodecEntry, CodecError, CodecRegistry, Decoder, PcmCoder, PcmDecoder, Quality,
};
pub use nr_core::{
    convert, AudioError, BitDepth, Conversion, Format, Sample, SampleBuffer, SampleKind,
    SampleRate, CHUNK_FRAMES,
};
pub use transcode::{transcode, TranscodeOptions, TranscodeReport};
