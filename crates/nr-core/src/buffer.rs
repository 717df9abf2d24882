//! Growable sample buffer with typed, layout-aware accessors.

use std::fmt;

use crate::convert::{convert, Sample};
use crate::format::{BitDepth, Format};
use crate::AudioError;

/// Frames moved per step by chunked conversions and coders.
pub const CHUNK_FRAMES: usize = 1024;

/// A store of raw audio frames in their native representation.
///
/// Samples are kept interleaved as `format.bit_depth()` integers: signed
/// `i8` for 8-bit, little-endian `i16` for 16-bit. The storage length is
/// always exactly `format.byte_size_for_frame_count(frame_count)`.
///
/// Reads clamp to what is available; writes past the end grow the buffer.
#[derive(Clone)]
pub struct SampleBuffer {
    format: Format,
    frame_count: usize,
    storage: Vec<u8>,
}

impl SampleBuffer {
    /// Create an empty buffer.
    pub fn new(format: Format) -> Self {
        Self { format, frame_count: 0, storage: Vec::new() }
    }

    /// Create a buffer of `frame_count` silent frames.
    pub fn with_frame_count(format: Format, frame_count: usize) -> Result<Self, AudioError> {
        let mut buffer = Self::new(format);
        buffer.resize(frame_count)?;
        Ok(buffer)
    }

    /// Take ownership of already-native sample bytes.
    ///
    /// A trailing partial frame is discarded.
    pub fn from_bytes(format: Format, mut bytes: Vec<u8>) -> Self {
        let frame_count = format.frame_count_for_byte_size(bytes.len());
        bytes.truncate(format.byte_size_for_frame_count(frame_count));
        Self { format, frame_count, storage: bytes }
    }

    /// Returns true if no sample bytes are held.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.format.duration_for_frame_count(self.frame_count)
    }

    /// Raw native bytes.
    pub fn data(&self) -> &[u8] {
        &self.storage
    }

    /// Set the number of frames held.
    ///
    /// Existing frames below the smaller of the old and new counts are kept;
    /// added frames are silent.
    pub fn resize(&mut self, frame_count: usize) -> Result<(), AudioError> {
        if frame_count == self.frame_count {
            return Ok(());
        }
        let size = frame_count
            .checked_mul(self.format.bytes_per_frame())
            .ok_or(AudioError::AllocationFailure { frames: frame_count })?;

        if size > self.storage.len() {
            self.storage
                .try_reserve(size - self.storage.len())
                .map_err(|_| AudioError::AllocationFailure { frames: frame_count })?;
            self.storage.resize(size, 0);
        } else {
            self.storage.truncate(size);
            self.storage.shrink_to_fit();
        }
        tracing::trace!(from = self.frame_count, to = frame_count, "resized sample buffer");
        self.frame_count = frame_count;
        Ok(())
    }

    /// Read up to `count` frames from `offset` into `dst`, interleaved.
    ///
    /// Returns the number of frames produced: `count` clamped to the frames
    /// available after `offset` and to the whole frames `dst` can hold.
    pub fn read<T: Sample>(&self, offset: usize, count: usize, dst: &mut [T]) -> usize {
        let channels = self.channels();
        let count = self.readable(offset, count).min(dst.len() / channels);
        if count == 0 {
            return 0;
        }
        let src = self.byte_range(offset, count);
        let dst = &mut dst[..count * channels];
        match self.format.bit_depth() {
            BitDepth::Eight => decode_interleaved::<i8, T>(src, dst),
            BitDepth::Sixteen => decode_interleaved::<i16, T>(src, dst),
        }
        count
    }

    /// Read up to `count` frames from `offset` into one run per channel.
    ///
    /// Frames are also limited by the shortest of the first
    /// `channel_count` runs; with fewer runs than channels nothing is read.
    pub fn read_planar<T: Sample, C: AsMut<[T]>>(
        &self,
        offset: usize,
        count: usize,
        dst: &mut [C],
    ) -> usize {
        let channels = self.channels();
        if dst.len() < channels {
            return 0;
        }
        let runs = &mut dst[..channels];
        let room = runs.iter_mut().map(|run| run.as_mut().len()).min().unwrap_or(0);
        let count = self.readable(offset, count).min(room);
        if count == 0 {
            return 0;
        }
        let src = self.byte_range(offset, count);
        match self.format.bit_depth() {
            BitDepth::Eight => decode_planar::<i8, T, C>(src, channels, count, runs),
            BitDepth::Sixteen => decode_planar::<i16, T, C>(src, channels, count, runs),
        }
        count
    }

    /// Write `count` interleaved frames from `src` at `offset`, growing the
    /// buffer if they reach past the end.
    ///
    /// Only whole frames present in `src` are written. Returns the number of
    /// frames written.
    pub fn write<T: Sample>(
        &mut self,
        offset: usize,
        count: usize,
        src: &[T],
    ) -> Result<usize, AudioError> {
        let channels = self.channels();
        let count = count.min(src.len() / channels);
        self.reserve_frames(offset, count)?;
        if count == 0 {
            return Ok(0);
        }
        let src = &src[..count * channels];
        let bit_depth = self.format.bit_depth();
        let dst = self.byte_range_mut(offset, count);
        match bit_depth {
            BitDepth::Eight => encode_interleaved::<i8, T>(src, dst),
            BitDepth::Sixteen => encode_interleaved::<i16, T>(src, dst),
        }
        Ok(count)
    }

    /// Write `count` frames from one run per channel at `offset`, growing
    /// the buffer if they reach past the end.
    ///
    /// Frames are limited by the shortest of the first `channel_count`
    /// runs; with fewer runs than channels nothing is written.
    pub fn write_planar<T: Sample, C: AsRef<[T]>>(
        &mut self,
        offset: usize,
        count: usize,
        src: &[C],
    ) -> Result<usize, AudioError> {
        let channels = self.channels();
        let count = if src.len() < channels {
            0
        } else {
            let room = src[..channels].iter().map(|run| run.as_ref().len()).min().unwrap_or(0);
            count.min(room)
        };
        self.reserve_frames(offset, count)?;
        if count == 0 {
            return Ok(0);
        }
        let bit_depth = self.format.bit_depth();
        let dst = self.byte_range_mut(offset, count);
        match bit_depth {
            BitDepth::Eight => encode_planar::<i8, T, C>(&src[..channels], count, dst),
            BitDepth::Sixteen => encode_planar::<i16, T, C>(&src[..channels], count, dst),
        }
        Ok(count)
    }

    /// Copy into a new buffer with the same channels and rate stored at
    /// another bit depth.
    pub fn to_bit_depth(&self, bit_depth: BitDepth) -> Result<SampleBuffer, AudioError> {
        let format = Format::from_parts(self.format.channel_count(), self.format.sample_rate(), bit_depth)?;
        match bit_depth {
            BitDepth::Eight => self.requantize::<i8>(format),
            BitDepth::Sixteen => self.requantize::<i16>(format),
        }
    }

    fn requantize<T: Sample>(&self, format: Format) -> Result<SampleBuffer, AudioError> {
        let mut out = SampleBuffer::with_frame_count(format, self.frame_count)?;
        let mut chunk = vec![T::default(); CHUNK_FRAMES * self.channels()];
        let mut offset = 0;
        while offset < self.frame_count {
            let n = self.read(offset, CHUNK_FRAMES, &mut chunk);
            out.write(offset, n, &chunk)?;
            offset += n;
        }
        Ok(out)
    }

    fn channels(&self) -> usize {
        self.format.channel_count() as usize
    }

    fn readable(&self, offset: usize, count: usize) -> usize {
        count.min(self.frame_count.saturating_sub(offset))
    }

    fn reserve_frames(&mut self, offset: usize, count: usize) -> Result<(), AudioError> {
        let end = offset
            .checked_add(count)
            .ok_or(AudioError::AllocationFailure { frames: usize::MAX })?;
        if end > self.frame_count {
            self.resize(end)?;
        }
        Ok(())
    }

    fn byte_range(&self, offset: usize, count: usize) -> &[u8] {
        let start = self.format.byte_size_for_frame_count(offset);
        let len = self.format.byte_size_for_frame_count(count);
        &self.storage[start..start + len]
    }

    fn byte_range_mut(&mut self, offset: usize, count: usize) -> &mut [u8] {
        let start = self.format.byte_size_for_frame_count(offset);
        let len = self.format.byte_size_for_frame_count(count);
        &mut self.storage[start..start + len]
    }
}

impl fmt::Debug for SampleBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleBuffer")
            .field("format", &self.format)
            .field("frame_count", &self.frame_count)
            .field("bytes", &self.storage.len())
            .finish()
    }
}

/// Integer types that can be stored natively.
trait NativeSample: Sample {
    const WIDTH: usize;

    fn load(raw: &[u8]) -> Self;

    fn store(self, raw: &mut [u8]);
}

impl NativeSample for i8 {
    const WIDTH: usize = 1;

    fn load(raw: &[u8]) -> Self {
        raw[0] as i8
    }

    fn store(self, raw: &mut [u8]) {
        raw[0] = self as u8;
    }
}

impl NativeSample for i16 {
    const WIDTH: usize = 2;

    fn load(raw: &[u8]) -> Self {
        i16::from_le_bytes([raw[0], raw[1]])
    }

    fn store(self, raw: &mut [u8]) {
        raw.copy_from_slice(&self.to_le_bytes());
    }
}

fn decode_interleaved<N: NativeSample, T: Sample>(src: &[u8], dst: &mut [T]) {
    for (out, raw) in dst.iter_mut().zip(src.chunks_exact(N::WIDTH)) {
        *out = convert(N::load(raw));
    }
}

fn encode_interleaved<N: NativeSample, T: Sample>(src: &[T], dst: &mut [u8]) {
    for (&value, raw) in src.iter().zip(dst.chunks_exact_mut(N::WIDTH)) {
        convert::<T, N>(value).store(raw);
    }
}

fn decode_planar<N: NativeSample, T: Sample, C: AsMut<[T]>>(
    src: &[u8],
    channels: usize,
    count: usize,
    runs: &mut [C],
) {
    let stride = channels * N::WIDTH;
    for (ch, run) in runs.iter_mut().enumerate() {
        let run = &mut run.as_mut()[..count];
        let lane = src[ch * N::WIDTH..].chunks(stride);
        for (out, raw) in run.iter_mut().zip(lane) {
            *out = convert(N::load(raw));
        }
    }
}

fn encode_planar<N: NativeSample, T: Sample, C: AsRef<[T]>>(
    runs: &[C],
    count: usize,
    dst: &mut [u8],
) {
    let stride = runs.len() * N::WIDTH;
    for (frame, raw_frame) in dst.chunks_exact_mut(stride).take(count).enumerate() {
        for (run, raw) in runs.iter().zip(raw_frame.chunks_exact_mut(N::WIDTH)) {
            convert::<T, N>(run.as_ref()[frame]).store(raw);
        }
    }
}
