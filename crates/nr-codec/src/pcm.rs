//! PCM/WAV encoding and decoding.
//!
//! The buffer's native bytes are the WAV payload for 16-bit data. 8-bit WAV
//! samples are unsigned with a centre of 128, so they are re-centred on the
//! way in and out.

use std::io::{Cursor, Write};

use binrw::{binrw, BinRead, BinWrite};
use nr_core::{BitDepth, Format, Sample, SampleBuffer, CHUNK_FRAMES};

use crate::codec::{Coder, Decoder, Quality};
use crate::CodecError;

const WAVE_PCM: u16 = 1;
const FMT_BODY_SIZE: u32 = 16;

#[binrw]
#[brw(little, magic = b"RIFF")]
#[derive(Debug)]
struct RiffHeader {
    size: u32,
    form: [u8; 4],
}

#[binrw]
#[brw(little)]
#[derive(Debug)]
struct ChunkHeader {
    id: [u8; 4],
    size: u32,
}

#[binrw]
#[brw(little)]
#[derive(Debug)]
struct FmtChunk {
    audio_format: u16,
    channel_count: u16,
    sample_rate: u32,
    byte_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
}

impl FmtChunk {
    fn to_format(&self) -> Result<Format, CodecError> {
        if self.audio_format != WAVE_PCM {
            return Err(CodecError::Malformed(format!(
                "unsupported audio format tag {}",
                self.audio_format
            )));
        }
        let format = Format::new(self.channel_count, self.sample_rate, self.bits_per_sample)?;
        if self.block_align as usize != format.bytes_per_frame()
            || self.byte_rate as usize != format.bytes_per_frame() * format.sample_rate().hz() as usize
        {
            tracing::warn!(
                block_align = self.block_align,
                byte_rate = self.byte_rate,
                "fmt chunk sizes disagree with {}",
                format
            );
        }
        Ok(format)
    }
}

// --- Reading ---

/// Decodes RIFF/WAVE PCM data.
#[derive(Clone, Debug, Default)]
pub struct PcmDecoder {
    quality: Quality,
}

impl PcmDecoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for PcmDecoder {
    fn decode(&self, source: &[u8]) -> Result<SampleBuffer, CodecError> {
        let mut cursor = Cursor::new(source);
        let riff = RiffHeader::read(&mut cursor)?;
        if &riff.form != b"WAVE" {
            return Err(CodecError::Malformed("RIFF form type is not WAVE".into()));
        }
        tracing::trace!(riff_size = riff.size, input = source.len(), "reading WAVE chunks");

        let mut format: Option<Format> = None;
        let mut payload: Option<&[u8]> = None;

        while source.len().saturating_sub(cursor.position() as usize) >= 8 {
            let chunk = ChunkHeader::read(&mut cursor)?;
            let start = cursor.position() as usize;
            let size = chunk.size as usize;

            match &chunk.id {
                b"fmt " => {
                    if chunk.size < FMT_BODY_SIZE {
                        return Err(CodecError::Malformed(format!(
                            "fmt chunk of {} bytes",
                            chunk.size
                        )));
                    }
                    format = Some(FmtChunk::read(&mut cursor)?.to_format()?);
                }
                b"data" => {
                    let available = source.len() - start;
                    if size > available {
                        return Err(CodecError::Truncated { expected: size, available });
                    }
                    payload = Some(&source[start..start + size]);
                }
                id => {
                    tracing::trace!(chunk = %String::from_utf8_lossy(id), size, "skipping chunk");
                }
            }

            let next = start.saturating_add(size).saturating_add(size & 1);
            cursor.set_position(next as u64);
        }

        let format = format.ok_or_else(|| CodecError::Malformed("missing fmt chunk".into()))?;
        let payload = payload.ok_or_else(|| CodecError::Malformed("missing data chunk".into()))?;
        if payload.len() % format.bytes_per_frame() != 0 {
            tracing::warn!(bytes = payload.len(), "data chunk ends with a partial frame");
        }

        let native = match format.bit_depth() {
            BitDepth::Eight => payload.iter().map(|&b| b ^ 0x80).collect(),
            BitDepth::Sixteen => payload.to_vec(),
        };
        let buffer = SampleBuffer::from_bytes(format, native);
        tracing::debug!(%format, frames = buffer.frame_count(), "decoded WAV");
        Ok(buffer)
    }

    fn quality(&self) -> Quality {
        self.quality
    }

    fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }
}

// --- Writing ---

/// Encodes a buffer as canonical 44-byte-header RIFF/WAVE PCM.
///
/// With `bit_depth` unset the buffer's native depth is written as-is.
#[derive(Clone, Debug, Default)]
pub struct PcmCoder {
    quality: Quality,
    bit_depth: Option<BitDepth>,
}

impl PcmCoder {
    pub fn new(quality: Quality) -> Self {
        Self { quality, bit_depth: None }
    }

    /// Write samples at `bit_depth` instead of the buffer's native depth.
    pub fn with_bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = Some(bit_depth);
        self
    }

    pub fn bit_depth(&self) -> Option<BitDepth> {
        self.bit_depth
    }
}

impl Coder for PcmCoder {
    fn encode(&self, buffer: &SampleBuffer, sink: &mut dyn Write) -> Result<(), CodecError> {
        let native = buffer.format();
        let target = self.bit_depth.unwrap_or(native.bit_depth());
        let format = Format::from_parts(native.channel_count(), native.sample_rate(), target)?;

        let data_len = format.byte_size_for_frame_count(buffer.frame_count());
        write_header(sink, &format, data_len)?;

        if target == native.bit_depth() {
            write_native(sink, buffer)?;
        } else {
            match target {
                BitDepth::Eight => write_converted::<i8>(sink, buffer)?,
                BitDepth::Sixteen => write_converted::<i16>(sink, buffer)?,
            }
        }
        if data_len % 2 == 1 {
            sink.write_all(&[0])?;
        }
        sink.flush()?;
        tracing::debug!(%format, frames = buffer.frame_count(), "encoded WAV");
        Ok(())
    }

    fn quality(&self) -> Quality {
        self.quality
    }

    fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }
}

fn write_header(sink: &mut dyn Write, format: &Format, data_len: usize) -> Result<(), CodecError> {
    let too_large = || CodecError::Unrepresentable(format!("{} bytes of sample data", data_len));
    let size = u32::try_from(data_len).map_err(|_| too_large())?;
    let riff_size = size
        .checked_add(4 + 8 + FMT_BODY_SIZE + 8 + (size & 1))
        .ok_or_else(too_large)?;
    let block_align = u16::try_from(format.bytes_per_frame())
        .map_err(|_| CodecError::Unrepresentable(format!("{} channels", format.channel_count())))?;

    let byte_rate = format
        .sample_rate()
        .hz()
        .checked_mul(block_align as u32)
        .ok_or_else(|| CodecError::Unrepresentable(format!("byte rate of {}", format)))?;

    let mut header = Cursor::new(Vec::with_capacity(44));
    RiffHeader { size: riff_size, form: *b"WAVE" }.write(&mut header)?;
    ChunkHeader { id: *b"fmt ", size: FMT_BODY_SIZE }.write(&mut header)?;
    FmtChunk {
        audio_format: WAVE_PCM,
        channel_count: format.channel_count(),
        sample_rate: format.sample_rate().hz(),
        byte_rate,
        block_align,
        bits_per_sample: format.bit_depth().bits(),
    }
    .write(&mut header)?;
    ChunkHeader { id: *b"data", size }.write(&mut header)?;

    sink.write_all(header.get_ref())?;
    Ok(())
}

fn write_native(sink: &mut dyn Write, buffer: &SampleBuffer) -> Result<(), CodecError> {
    match buffer.format().bit_depth() {
        BitDepth::Sixteen => sink.write_all(buffer.data())?,
        BitDepth::Eight => {
            let step = CHUNK_FRAMES * buffer.format().bytes_per_frame();
            let mut scratch = Vec::with_capacity(step);
            for chunk in buffer.data().chunks(step) {
                scratch.clear();
                scratch.extend(chunk.iter().map(|&b| b ^ 0x80));
                sink.write_all(&scratch)?;
            }
        }
    }
    Ok(())
}

/// Sample types with a WAV byte encoding.
trait WavSample: Sample {
    fn put(self, out: &mut Vec<u8>);
}

impl WavSample for i8 {
    fn put(self, out: &mut Vec<u8>) {
        out.push(self as u8 ^ 0x80);
    }
}

impl WavSample for i16 {
    fn put(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

fn write_converted<T: WavSample>(sink: &mut dyn Write, buffer: &SampleBuffer) -> Result<(), CodecError> {
    let channels = buffer.format().channel_count() as usize;
    let mut chunk = vec![T::default(); CHUNK_FRAMES * channels];
    let mut bytes = Vec::with_capacity(chunk.len() * std::mem::size_of::<T>());
    let mut offset = 0;
    while offset < buffer.frame_count() {
        let n = buffer.read(offset, CHUNK_FRAMES, &mut chunk);
        bytes.clear();
        for &sample in &chunk[..n * channels] {
            sample.put(&mut bytes);
        }
        sink.write_all(&bytes)?;
        offset += n;
    }
    Ok(())
}
