use std::path::Path;

use nr_codec::{CodecError, CodecRegistry, Quality};
use nr_core::{BitDepth, Format};

/// Settings for [`transcode`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TranscodeOptions {
    pub quality: Quality,
    /// Re-quantize to this depth before encoding. `None` keeps the decoded depth.
    pub bit_depth: Option<BitDepth>,
}

/// What a [`transcode`] run did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TranscodeReport {
    pub input_format: Format,
    pub output_format: Format,
    pub frame_count: usize,
    /// Seconds of audio.
    pub duration: f64,
}

/// Decode `input` and encode it to `output`.
///
/// The decoder is chosen by the input's leading bytes, falling back to its
/// extension. The coder is chosen by the output's extension.
pub fn transcode(
    registry: &CodecRegistry,
    input: &Path,
    output: &Path,
    options: TranscodeOptions,
) -> Result<TranscodeReport, CodecError> {
    let bytes = std::fs::read(input)?;
    let mut decoder = registry
        .decoder_for_bytes(&bytes)
        .or_else(|_| registry.decoder_for_path(input))?;
    decoder.set_quality(options.quality);

    let decoded = decoder.decode(&bytes)?;
    let input_format = decoded.format();
    tracing::info!(
        input = %input.display(),
        format = %input_format,
        frames = decoded.frame_count(),
        "decoded"
    );

    let buffer = match options.bit_depth {
        Some(depth) if depth != input_format.bit_depth() => {
            tracing::debug!(from = input_format.bit_depth().bits(), to = depth.bits(), "re-quantizing");
            decoded.to_bit_depth(depth)?
        }
        _ => decoded,
    };

    let coder = registry.coder_for_path(output, options.quality)?;
    coder.encode_file(&buffer, output)?;

    let report = TranscodeReport {
        input_format,
        output_format: buffer.format(),
        frame_count: buffer.frame_count(),
        duration: buffer.duration(),
    };
    tracing::info!(
        output = %output.display(),
        format = %report.output_format,
        quality = %options.quality,
        "encoded"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nr_codec::Coder;
    use nr_codec::PcmCoder;
    use nr_core::SampleBuffer;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("nraudio-transcode-{}-{}", std::process::id(), name))
    }

    fn write_source(path: &Path, bits: u16) -> SampleBuffer {
        let format = Format::new(2, 22050, bits).unwrap();
        let mut buffer = SampleBuffer::new(format);
        let samples: Vec<i16> = (0..200).map(|i| (i * 300 - 30000) as i16).collect();
        buffer.write(0, 100, &samples).unwrap();
        PcmCoder::default().encode_file(&buffer, path).unwrap();
        buffer
    }

    #[test]
    fn keeps_depth_by_default() {
        let input = temp_path("keep-in.wav");
        let output = temp_path("keep-out.wav");
        let source = write_source(&input, 16);

        let report = transcode(&CodecRegistry::default(), &input, &output, TranscodeOptions::default()).unwrap();
        assert_eq!(report.input_format, source.format());
        assert_eq!(report.output_format, source.format());
        assert_eq!(report.frame_count, 100);
        assert_eq!(std::fs::read(&input).unwrap(), std::fs::read(&output).unwrap());

        let _ = std::fs::remove_file(input);
        let _ = std::fs::remove_file(output);
    }

    #[test]
    fn requantizes_when_asked() {
        let input = temp_path("depth-in.wav");
        let output = temp_path("depth-out.wav");
        write_source(&input, 16);

        let options = TranscodeOptions { quality: Quality::Best, bit_depth: Some(BitDepth::Eight) };
        let report = transcode(&CodecRegistry::default(), &input, &output, options).unwrap();
        assert_eq!(report.input_format.bit_depth(), BitDepth::Sixteen);
        assert_eq!(report.output_format.bit_depth(), BitDepth::Eight);
        assert_eq!(report.frame_count, 100);

        let _ = std::fs::remove_file(input);
        let _ = std::fs::remove_file(output);
    }

    #[test]
    fn sniffs_input_despite_extension() {
        let input = temp_path("sniff-in.dat");
        let output = temp_path("sniff-out.wav");
        write_source(&input, 8);

        let report = transcode(&CodecRegistry::default(), &input, &output, TranscodeOptions::default()).unwrap();
        assert_eq!(report.output_format.bit_depth(), BitDepth::Eight);

        let _ = std::fs::remove_file(input);
        let _ = std::fs::remove_file(output);
    }

    #[test]
    fn unknown_output_extension_fails() {
        let input = temp_path("ext-in.wav");
        let output = temp_path("ext-out.xyz");
        write_source(&input, 16);

        let result = transcode(&CodecRegistry::default(), &input, &output, TranscodeOptions::default());
        assert!(matches!(result, Err(CodecError::NoSuitableCodec(_))));
        assert!(!output.exists());

        let _ = std::fs::remove_file(input);
    }

    #[test]
    fn missing_input_is_io_error() {
        let result = transcode(
            &CodecRegistry::default(),
            &temp_path("does-not-exist.wav"),
            &temp_path("never.wav"),
            TranscodeOptions::default(),
        );
        assert!(matches!(result, Err(CodecError::Io(_))));
    }
}
