//! Allocation-free accessor tests.
//!
//! Bounded reads into caller storage and writes inside the current frame
//! count must never touch the heap, so a streaming coder can drain a buffer
//! chunk by chunk without allocating.
//!
//! Runs under plain `cargo test`, no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use nraudio::{Format, SampleBuffer, CHUNK_FRAMES};

const FRAMES: usize = CHUNK_FRAMES * 8;

fn filled_buffer(channels: u16, bits: u16) -> SampleBuffer {
    let format = Format::new(channels, 44100, bits).unwrap();
    let samples: Vec<f32> = (0..FRAMES * channels as usize)
        .map(|i| ((i % 64) as f32 / 32.0) - 1.0)
        .collect();
    let mut buffer = SampleBuffer::new(format);
    buffer.write(0, FRAMES, &samples).unwrap();
    buffer
}

#[test]
fn interleaved_reads_alloc_free() {
    for bits in [8, 16] {
        let buffer = filled_buffer(2, bits);
        let mut as_f32 = vec![0.0f32; CHUNK_FRAMES * 2];
        let mut as_i16 = vec![0i16; CHUNK_FRAMES * 2];
        let mut as_i8 = vec![0i8; CHUNK_FRAMES * 2];

        assert_no_alloc(|| {
            let mut offset = 0;
            while offset < buffer.frame_count() {
                buffer.read(offset, CHUNK_FRAMES, &mut as_i16);
                buffer.read(offset, CHUNK_FRAMES, &mut as_i8);
                offset += buffer.read(offset, CHUNK_FRAMES, &mut as_f32);
            }
            // Past the end is a short read, not an allocation.
            assert_eq!(buffer.read(FRAMES + 10, CHUNK_FRAMES, &mut as_f32), 0);
        });
    }
}

#[test]
fn planar_reads_alloc_free() {
    let buffer = filled_buffer(2, 16);
    let mut planes = [vec![0.0f32; CHUNK_FRAMES], vec![0.0f32; CHUNK_FRAMES]];

    assert_no_alloc(|| {
        let mut offset = 0;
        while offset < buffer.frame_count() {
            offset += buffer.read_planar::<f32, _>(offset, CHUNK_FRAMES, &mut planes);
        }
    });
}

#[test]
fn in_range_writes_alloc_free() {
    let mut buffer = filled_buffer(2, 16);
    let chunk = vec![0.25f32; CHUNK_FRAMES * 2];
    let planes = [vec![-0.5f32; CHUNK_FRAMES], vec![0.5f32; CHUNK_FRAMES]];

    assert_no_alloc(|| {
        let mut offset = 0;
        while offset < FRAMES {
            buffer.write(offset, CHUNK_FRAMES, &chunk).unwrap();
            offset += buffer.write_planar::<f32, _>(offset, CHUNK_FRAMES, &planes).unwrap();
        }
    });
    assert_eq!(buffer.frame_count(), FRAMES);
}
