//! Decoder and coder roles.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use nr_core::SampleBuffer;

use crate::CodecError;

/// Quality/speed trade-off, slowest and best first.
///
/// Adapters translate this into their library's own parameter. Lossless
/// adapters accept it and ignore it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Quality {
    Best,
    #[default]
    Good,
    Acceptable,
    Fastest,
}

impl Quality {
    pub const ALL: [Quality; 4] =
        [Quality::Best, Quality::Good, Quality::Acceptable, Quality::Fastest];

    pub fn name(self) -> &'static str {
        match self {
            Quality::Best => "best",
            Quality::Good => "good",
            Quality::Acceptable => "acceptable",
            Quality::Fastest => "fastest",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quality::ALL
            .into_iter()
            .find(|q| q.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown quality '{}'", s))
    }
}

/// Produces a sample buffer from encoded bytes.
pub trait Decoder {
    /// Decode a complete source.
    ///
    /// The returned buffer's format is the one found in the source.
    fn decode(&self, source: &[u8]) -> Result<SampleBuffer, CodecError>;

    fn quality(&self) -> Quality;

    fn set_quality(&mut self, quality: Quality);

    /// Read `reader` to its end, then decode.
    fn decode_reader(&self, reader: &mut dyn Read) -> Result<SampleBuffer, CodecError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.decode(&bytes)
    }

    fn decode_file(&self, path: &Path) -> Result<SampleBuffer, CodecError> {
        let bytes = std::fs::read(path)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "decoding file");
        self.decode(&bytes)
    }
}

/// Writes a sample buffer to a sink in some encoded form.
///
/// Implementations drain the buffer with bounded reads of at most
/// [`nr_core::CHUNK_FRAMES`] frames.
pub trait Coder {
    fn encode(&self, buffer: &SampleBuffer, sink: &mut dyn Write) -> Result<(), CodecError>;

    fn quality(&self) -> Quality;

    fn set_quality(&mut self, quality: Quality);

    /// Create (or truncate) `path` and encode into it.
    fn encode_file(&self, buffer: &SampleBuffer, path: &Path) -> Result<(), CodecError> {
        let mut sink = BufWriter::new(File::create(path)?);
        self.encode(buffer, &mut sink)?;
        sink.flush()?;
        tracing::debug!(path = %path.display(), frames = buffer.frame_count(), "encoded file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_quality_is_good() {
        assert_eq!(Quality::default(), Quality::Good);
    }

    #[test]
    fn quality_parses_case_insensitively() {
        assert_eq!("BEST".parse::<Quality>(), Ok(Quality::Best));
        assert_eq!("fastest".parse::<Quality>(), Ok(Quality::Fastest));
        assert!("medium".parse::<Quality>().is_err());
    }

    #[test]
    fn quality_display_round_trips() {
        for q in Quality::ALL {
            assert_eq!(q.to_string().parse::<Quality>(), Ok(q));
        }
    }
}
