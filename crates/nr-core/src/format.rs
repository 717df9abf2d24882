//! Format descriptor: channel count, sample rate and native bit depth.

use core::fmt;

use crate::AudioError;

/// Supported sample rates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SampleRate {
    Hz8000,
    Hz16000,
    Hz22050,
    #[default]
    Hz44100,
    Hz48000,
    Hz96000,
}

impl SampleRate {
    /// Every supported rate, ascending.
    pub const ALL: [SampleRate; 6] = [
        SampleRate::Hz8000,
        SampleRate::Hz16000,
        SampleRate::Hz22050,
        SampleRate::Hz44100,
        SampleRate::Hz48000,
        SampleRate::Hz96000,
    ];

    /// Rate in frames per second.
    pub const fn hz(self) -> u32 {
        match self {
            SampleRate::Hz8000 => 8000,
            SampleRate::Hz16000 => 16000,
            SampleRate::Hz22050 => 22050,
            SampleRate::Hz44100 => 44100,
            SampleRate::Hz48000 => 48000,
            SampleRate::Hz96000 => 96000,
        }
    }
}

impl TryFrom<u32> for SampleRate {
    type Error = AudioError;

    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        SampleRate::ALL
            .into_iter()
            .find(|rate| rate.hz() == hz)
            .ok_or(AudioError::InvalidFormat { field: "sample rate", value: hz })
    }
}

/// Native integer bit depth of stored samples.
///
/// Float is only a logical depth at the read/write boundary and never
/// appears here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BitDepth {
    Eight,
    #[default]
    Sixteen,
}

impl BitDepth {
    pub const fn bits(self) -> u16 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
        }
    }

    pub const fn bytes(self) -> usize {
        self.bits() as usize / 8
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = AudioError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            _ => Err(AudioError::InvalidFormat { field: "bit depth", value: bits as u32 }),
        }
    }
}

/// How raw bytes map to audio frames.
///
/// Every field always holds a value from its valid domain: construction and
/// the setters validate before anything is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Format {
    channel_count: u16,
    sample_rate: SampleRate,
    bit_depth: BitDepth,
}

impl Format {
    /// Build a format from raw header values.
    pub fn new(channel_count: u16, sample_rate: u32, bit_depth: u16) -> Result<Self, AudioError> {
        Self::from_parts(
            channel_count,
            SampleRate::try_from(sample_rate)?,
            BitDepth::try_from(bit_depth)?,
        )
    }

    /// Build a format from already-typed rate and depth.
    pub fn from_parts(
        channel_count: u16,
        sample_rate: SampleRate,
        bit_depth: BitDepth,
    ) -> Result<Self, AudioError> {
        check_channel_count(channel_count)?;
        Ok(Self { channel_count, sample_rate, bit_depth })
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    pub fn set_channel_count(&mut self, channel_count: u16) -> Result<(), AudioError> {
        check_channel_count(channel_count)?;
        self.channel_count = channel_count;
        Ok(())
    }

    pub fn set_sample_rate(&mut self, hz: u32) -> Result<(), AudioError> {
        self.sample_rate = SampleRate::try_from(hz)?;
        Ok(())
    }

    pub fn set_bit_depth(&mut self, bits: u16) -> Result<(), AudioError> {
        self.bit_depth = BitDepth::try_from(bits)?;
        Ok(())
    }

    /// Bytes used by one sample of one channel.
    pub fn bytes_per_sample(&self) -> usize {
        self.bit_depth.bytes()
    }

    /// Bytes used by one frame (one sample per channel).
    pub fn bytes_per_frame(&self) -> usize {
        self.channel_count as usize * self.bytes_per_sample()
    }

    /// Whole frames contained in `size` bytes. A trailing partial frame is
    /// not counted.
    pub fn frame_count_for_byte_size(&self, size: usize) -> usize {
        size / self.bytes_per_frame()
    }

    pub fn byte_size_for_frame_count(&self, frame_count: usize) -> usize {
        frame_count * self.bytes_per_frame()
    }

    /// Duration in seconds of `frame_count` frames.
    pub fn duration_for_frame_count(&self, frame_count: usize) -> f64 {
        frame_count as f64 / self.sample_rate.hz() as f64
    }

    /// Frames covering `duration` seconds, truncated. Negative or NaN
    /// durations give zero.
    pub fn frame_count_for_duration(&self, duration: f64) -> usize {
        (self.sample_rate.hz() as f64 * duration) as usize
    }
}

fn check_channel_count(channel_count: u16) -> Result<(), AudioError> {
    if channel_count == 0 {
        return Err(AudioError::InvalidFormat { field: "channel count", value: 0 });
    }
    Ok(())
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}ch {}Hz {}-bit",
            self.channel_count,
            self.sample_rate.hz(),
            self.bit_depth.bits()
        )
    }
}
