//! Error type for format validation and buffer storage.

use thiserror::Error;

/// Errors raised by the sample core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// A format field holds a value outside its domain.
    #[error("Invalid format: {field} = {value}")]
    InvalidFormat { field: &'static str, value: u32 },

    /// Sample storage could not be grown to hold the requested frames.
    #[error("Failed to allocate storage for {frames} frames")]
    AllocationFailure { frames: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_format_display() {
        let err = AudioError::InvalidFormat { field: "sample rate", value: 11025 };
        assert_eq!(err.to_string(), "Invalid format: sample rate = 11025");
    }

    #[test]
    fn allocation_failure_display() {
        let err = AudioError::AllocationFailure { frames: 42 };
        assert_eq!(err.to_string(), "Failed to allocate storage for 42 frames");
    }
}
