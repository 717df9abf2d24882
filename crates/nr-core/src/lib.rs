//! Sample core for the nraudio codec family.
//!
//! This crate defines the format descriptor and the sample buffer shared by
//! every codec adapter. Decoders fill a [`SampleBuffer`] through its typed
//! write accessors, coders drain it through bounded reads, and the buffer
//! converts between its native integer depth and the caller's
//! representation on the fly.

mod buffer;
pub mod convert;
mod error;
mod format;

pub use buffer::{SampleBuffer, CHUNK_FRAMES};
pub use convert::{convert, Conversion, Sample, SampleKind};
pub use error::AudioError;
pub use format::{BitDepth, Format, SampleRate};
