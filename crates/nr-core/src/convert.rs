//! Sample representations and the conversion rule between them.
//!
//! Integer samples are normalized against the positive full-scale value of
//! their type (127 for `i8`, 32767 for `i16`). Float samples are already
//! normalized. Every conversion is one of four kinds, picked from a
//! `(source, destination)` table:
//!
//! | source \ dest | i8          | i16         | f32       |
//! |---------------|-------------|-------------|-----------|
//! | i8            | Identity    | Requantize  | Normalize |
//! | i16           | Requantize  | Identity    | Normalize |
//! | f32           | Scale       | Scale       | Identity  |
//!
//! `Requantize` is exactly `Scale(Normalize(v))`; there is no separate
//! integer-to-integer path.
//!
//! Scaling rounds to the nearest integer, halves away from zero. Float
//! values are not clamped before scaling. The float-to-integer cast
//! saturates, so anything beyond full scale lands on the integer type's
//! minimum or maximum, and NaN becomes zero.

/// Kind of a sample representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleKind {
    I8,
    I16,
    F32,
}

impl SampleKind {
    /// Positive full-scale magnitude, or `None` for float.
    pub fn full_scale(self) -> Option<f32> {
        match self {
            SampleKind::I8 => Some(i8::MAX as f32),
            SampleKind::I16 => Some(i16::MAX as f32),
            SampleKind::F32 => None,
        }
    }
}

/// Conversion step between two sample kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conversion {
    /// Same kind: copied bit for bit.
    Identity,
    /// Integer to float: `v / full_scale(source)`.
    Normalize,
    /// Float to integer: `v * full_scale(dest)`, rounded to nearest.
    Scale,
    /// Integer to integer of another width: normalize, then scale.
    Requantize,
}

impl Conversion {
    pub const fn between(source: SampleKind, dest: SampleKind) -> Self {
        match (source, dest) {
            (SampleKind::I8, SampleKind::I8)
            | (SampleKind::I16, SampleKind::I16)
            | (SampleKind::F32, SampleKind::F32) => Conversion::Identity,
            (SampleKind::I8 | SampleKind::I16, SampleKind::F32) => Conversion::Normalize,
            (SampleKind::F32, SampleKind::I8 | SampleKind::I16) => Conversion::Scale,
            (SampleKind::I8, SampleKind::I16) | (SampleKind::I16, SampleKind::I8) => {
                Conversion::Requantize
            }
        }
    }
}

/// A sample representation accepted at the buffer's read/write boundary.
pub trait Sample: Copy + Default + Send + 'static {
    const KIND: SampleKind;

    /// Value on the normalized float scale.
    fn to_normalized(self) -> f32;

    /// Value from the normalized float scale.
    fn from_normalized(value: f32) -> Self;

    /// Raw bit pattern, used for identity copies.
    fn to_bits(self) -> u32;

    fn from_bits(bits: u32) -> Self;
}

impl Sample for i8 {
    const KIND: SampleKind = SampleKind::I8;

    fn to_normalized(self) -> f32 {
        self as f32 / i8::MAX as f32
    }

    fn from_normalized(value: f32) -> Self {
        (value * i8::MAX as f32).round() as i8
    }

    fn to_bits(self) -> u32 {
        self as u8 as u32
    }

    fn from_bits(bits: u32) -> Self {
        bits as u8 as i8
    }
}

impl Sample for i16 {
    const KIND: SampleKind = SampleKind::I16;

    fn to_normalized(self) -> f32 {
        self as f32 / i16::MAX as f32
    }

    fn from_normalized(value: f32) -> Self {
        (value * i16::MAX as f32).round() as i16
    }

    fn to_bits(self) -> u32 {
        self as u16 as u32
    }

    fn from_bits(bits: u32) -> Self {
        bits as u16 as i16
    }
}

impl Sample for f32 {
    const KIND: SampleKind = SampleKind::F32;

    fn to_normalized(self) -> f32 {
        self
    }

    fn from_normalized(value: f32) -> Self {
        value
    }

    fn to_bits(self) -> u32 {
        f32::to_bits(self)
    }

    fn from_bits(bits: u32) -> Self {
        f32::from_bits(bits)
    }
}

/// Convert one sample between representations.
#[inline]
pub fn convert<S: Sample, D: Sample>(sample: S) -> D {
    match Conversion::between(S::KIND, D::KIND) {
        Conversion::Identity => D::from_bits(sample.to_bits()),
        Conversion::Normalize | Conversion::Scale | Conversion::Requantize => {
            D::from_normalized(sample.to_normalized())
        }
    }
}
