//! Lookup from file extensions and magic bytes to codec adapters.

use std::path::Path;

use crate::codec::{Coder, Decoder, Quality};
use crate::pcm::{PcmCoder, PcmDecoder};
use crate::CodecError;

/// One registered container/codec.
#[derive(Clone, Copy)]
pub struct CodecEntry {
    /// Unique name; registering the same name again replaces the entry.
    pub name: &'static str,
    /// Extensions without the dot, matched ASCII case-insensitively.
    pub extensions: &'static [&'static str],
    /// Recognizes the start of an encoded stream.
    pub sniff: fn(&[u8]) -> bool,
    pub make_decoder: Option<fn() -> Box<dyn Decoder>>,
    pub make_coder: Option<fn(Quality) -> Box<dyn Coder>>,
}

impl CodecEntry {
    /// The built-in PCM/WAV entry.
    pub fn wav() -> Self {
        Self {
            name: "wav",
            extensions: &["wav", "wave"],
            sniff: is_riff_wave,
            make_decoder: Some(pcm_decoder),
            make_coder: Some(pcm_coder),
        }
    }

    fn handles_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

impl std::fmt::Debug for CodecEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecEntry")
            .field("name", &self.name)
            .field("extensions", &self.extensions)
            .field("decodes", &self.make_decoder.is_some())
            .field("encodes", &self.make_coder.is_some())
            .finish()
    }
}

fn pcm_decoder() -> Box<dyn Decoder> {
    Box::new(PcmDecoder::new())
}

fn pcm_coder(quality: Quality) -> Box<dyn Coder> {
    Box::new(PcmCoder::new(quality))
}

fn is_riff_wave(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

/// Registered codecs, searched in registration order.
#[derive(Debug)]
pub struct CodecRegistry {
    entries: Vec<CodecEntry>,
}

impl CodecRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn register(&mut self, entry: CodecEntry) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn entries(&self) -> &[CodecEntry] {
        &self.entries
    }

    /// Find a decoder by the path's extension.
    pub fn decoder_for_path(&self, path: &Path) -> Result<Box<dyn Decoder>, CodecError> {
        self.by_extension(path)
            .find_map(|e| e.make_decoder)
            .map(|make| make())
            .ok_or_else(|| CodecError::NoSuitableCodec(path.display().to_string()))
    }

    /// Find a decoder by sniffing the start of an encoded stream.
    pub fn decoder_for_bytes(&self, bytes: &[u8]) -> Result<Box<dyn Decoder>, CodecError> {
        self.entries
            .iter()
            .filter(|e| (e.sniff)(bytes))
            .find_map(|e| e.make_decoder)
            .map(|make| make())
            .ok_or_else(|| {
                let head = &bytes[..bytes.len().min(4)];
                CodecError::NoSuitableCodec(format!("stream starting {:02X?}", head))
            })
    }

    /// Find a coder by the path's extension.
    pub fn coder_for_path(&self, path: &Path, quality: Quality) -> Result<Box<dyn Coder>, CodecError> {
        self.by_extension(path)
            .find_map(|e| e.make_coder)
            .map(|make| make(quality))
            .ok_or_else(|| CodecError::NoSuitableCodec(path.display().to_string()))
    }

    fn by_extension<'a>(&'a self, path: &Path) -> impl Iterator<Item = &'a CodecEntry> + 'a {
        let ext = path.extension().and_then(|e| e.to_str()).map(str::to_owned);
        self.entries
            .iter()
            .filter(move |e| ext.as_deref().is_some_and(|ext| e.handles_extension(ext)))
    }
}

impl Default for CodecRegistry {
    /// A registry holding the built-in WAV codec.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(CodecEntry::wav());
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nr_core::SampleBuffer;
    use std::io::Write;

    struct NullCoder(Quality);

    impl Coder for NullCoder {
        fn encode(&self, _: &SampleBuffer, _: &mut dyn Write) -> Result<(), CodecError> {
            Ok(())
        }
        fn quality(&self) -> Quality {
            self.0
        }
        fn set_quality(&mut self, quality: Quality) {
            self.0 = quality;
        }
    }

    fn null_coder(quality: Quality) -> Box<dyn Coder> {
        Box::new(NullCoder(quality))
    }

    fn is_ogg(bytes: &[u8]) -> bool {
        bytes.starts_with(b"OggS")
    }

    fn ogg_entry() -> CodecEntry {
        CodecEntry {
            name: "ogg",
            extensions: &["ogg", "oga"],
            sniff: is_ogg,
            make_decoder: None,
            make_coder: Some(null_coder),
        }
    }

    #[test]
    fn default_handles_wav_extensions() {
        let registry = CodecRegistry::default();
        assert!(registry.decoder_for_path(Path::new("song.wav")).is_ok());
        assert!(registry.decoder_for_path(Path::new("SONG.WAVE")).is_ok());
        assert!(registry.coder_for_path(Path::new("/tmp/out.Wav"), Quality::Best).is_ok());
    }

    #[test]
    fn unknown_extension_has_no_codec() {
        let registry = CodecRegistry::default();
        assert!(matches!(
            registry.decoder_for_path(Path::new("song.flac")),
            Err(CodecError::NoSuitableCodec(_))
        ));
        assert!(registry.decoder_for_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn sniffs_riff_wave() {
        let registry = CodecRegistry::default();
        let mut head = b"RIFF".to_vec();
        head.extend(&0u32.to_le_bytes());
        head.extend(b"WAVE");
        assert!(registry.decoder_for_bytes(&head).is_ok());
        assert!(registry.decoder_for_bytes(b"RIFF\0\0\0\0AVI ").is_err());
        assert!(registry.decoder_for_bytes(b"").is_err());
    }

    #[test]
    fn coder_receives_quality() {
        let mut registry = CodecRegistry::default();
        registry.register(ogg_entry());
        let coder = registry.coder_for_path(Path::new("a.ogg"), Quality::Fastest).unwrap();
        assert_eq!(coder.quality(), Quality::Fastest);
    }

    #[test]
    fn encode_only_entry_has_no_decoder() {
        let mut registry = CodecRegistry::new();
        registry.register(ogg_entry());
        assert!(registry.decoder_for_path(Path::new("a.ogg")).is_err());
        assert!(registry.decoder_for_bytes(b"OggS\0\x02").is_err());
    }

    #[test]
    fn register_same_name_replaces() {
        let mut registry = CodecRegistry::default();
        let mut replacement = CodecEntry::wav();
        replacement.extensions = &["pcm"];
        registry.register(replacement);

        assert_eq!(registry.entries().len(), 1);
        assert!(registry.decoder_for_path(Path::new("x.pcm")).is_ok());
        assert!(registry.decoder_for_path(Path::new("x.wav")).is_err());
    }
}
