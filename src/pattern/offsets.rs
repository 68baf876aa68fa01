//! Offset generation for sequential and random patterns
//!
//! Offsets are produced in whole blocks, so every offset is a multiple of the
//! block size and therefore aligned for direct IO whenever the block size is.

use crate::error::BenchError;
use crate::Result;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Upper bound on precomputed random offsets
///
/// Random patterns cycle through the sequence once it is exhausted, which keeps
/// memory bounded no matter how long the run is.
pub const MAX_RANDOM_OFFSETS: usize = 100_000;

/// Precomputed, block-aligned random offsets
#[derive(Debug, Clone)]
pub struct OffsetSequence {
    offsets: Vec<u64>,
    index: usize,
}

impl OffsetSequence {
    /// Draw `count` offsets uniformly from the whole blocks of a file
    ///
    /// The upper bound is the largest multiple of `block_size` not exceeding
    /// `file_size`; all offsets are strictly below it.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the block size is 0, the file holds no
    /// whole block, or `count` is 0.
    pub fn generate(file_size: u64, block_size: u64, seed: u64, count: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(BenchError::config("block_size must be greater than 0"));
        }
        let num_blocks = file_size / block_size;
        if num_blocks == 0 {
            return Err(BenchError::config(format!(
                "file_size ({}) is smaller than one block ({})",
                file_size, block_size
            )));
        }
        if count == 0 {
            return Err(BenchError::config("offset count must be greater than 0"));
        }

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let offsets = (0..count)
            .map(|_| rng.gen_range(0..num_blocks) * block_size)
            .collect();

        Ok(Self { offsets, index: 0 })
    }

    /// Same as [`generate`](Self::generate) with the default cap
    pub fn with_default_cap(file_size: u64, block_size: u64, seed: u64) -> Result<Self> {
        Self::generate(file_size, block_size, seed, MAX_RANDOM_OFFSETS)
    }

    /// Next offset, wrapping to the start of the sequence once exhausted
    #[inline(always)]
    pub fn next_offset(&mut self) -> u64 {
        let offset = self.offsets[self.index];
        self.index += 1;
        if self.index == self.offsets.len() {
            self.index = 0;
        }
        offset
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.offsets
    }
}

/// Ring cursor for sequential patterns
///
/// Yields 0, B, 2B, ... and wraps back to 0 once the advanced position reaches
/// or exceeds the file size.
#[derive(Debug, Clone)]
pub struct SequentialCursor {
    position: u64,
    block_size: u64,
    file_size: u64,
}

impl SequentialCursor {
    pub fn new(file_size: u64, block_size: u64) -> Result<Self> {
        if block_size == 0 || file_size == 0 {
            return Err(BenchError::config(
                "file_size and block_size must be greater than 0",
            ));
        }
        Ok(Self {
            position: 0,
            block_size,
            file_size,
        })
    }

    #[inline(always)]
    pub fn next_offset(&mut self) -> u64 {
        let offset = self.position;
        self.position += self.block_size;
        if self.position >= self.file_size {
            self.position = 0;
        }
        offset
    }

    /// Offset the next call will return
    pub fn position(&self) -> u64 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_block_aligned_and_in_range() {
        let file_size = 4 * 1024 * 1024;
        let block_size = 4096;
        let seq = OffsetSequence::generate(file_size, block_size, 42, 10_000).unwrap();
        assert_eq!(seq.len(), 10_000);
        for &offset in seq.as_slice() {
            assert_eq!(offset % block_size, 0);
            assert!(offset < file_size);
        }
    }

    #[test]
    fn test_offsets_respect_partial_trailing_block() {
        // 10 whole blocks plus a 100-byte tail: the tail is never addressed
        let block_size = 4096;
        let file_size = 10 * block_size + 100;
        let seq = OffsetSequence::generate(file_size, block_size, 1, 5_000).unwrap();
        for &offset in seq.as_slice() {
            assert!(offset + block_size <= file_size);
        }
    }

    #[test]
    fn test_offsets_deterministic_for_seed() {
        let a = OffsetSequence::generate(1 << 30, 4096, 7, 1000).unwrap();
        let b = OffsetSequence::generate(1 << 30, 4096, 7, 1000).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());

        let c = OffsetSequence::generate(1 << 30, 4096, 8, 1000).unwrap();
        assert_ne!(a.as_slice(), c.as_slice());
    }

    #[test]
    fn test_default_cap() {
        let seq = OffsetSequence::with_default_cap(1 << 20, 4096, 0).unwrap();
        assert_eq!(seq.len(), MAX_RANDOM_OFFSETS);
    }

    #[test]
    fn test_offsets_cycle_when_exhausted() {
        let mut seq = OffsetSequence::generate(1 << 20, 4096, 3, 4).unwrap();
        let first: Vec<u64> = (0..4).map(|_| seq.next_offset()).collect();
        let second: Vec<u64> = (0..4).map(|_| seq.next_offset()).collect();
        assert_eq!(first, second);
        assert_eq!(first, seq.as_slice());
    }

    #[test]
    fn test_file_smaller_than_block_rejected() {
        assert!(matches!(
            OffsetSequence::generate(1000, 4096, 0, 10),
            Err(BenchError::Config(_))
        ));
        assert!(OffsetSequence::generate(4096, 0, 0, 10).is_err());
    }

    #[test]
    fn test_uniform_coverage() {
        let block_size = 4096u64;
        let num_blocks = 100u64;
        let seq = OffsetSequence::generate(num_blocks * block_size, block_size, 42, 10_000).unwrap();
        let mut buckets = [0u32; 10];
        for &offset in seq.as_slice() {
            buckets[(offset / block_size * 10 / num_blocks) as usize] += 1;
        }
        for count in buckets {
            assert!(count > 800 && count < 1200, "bucket count {} outside expected range", count);
        }
    }

    #[test]
    fn test_sequential_advances_by_block() {
        let mut cursor = SequentialCursor::new(1 << 20, 4096).unwrap();
        assert_eq!(cursor.next_offset(), 0);
        assert_eq!(cursor.next_offset(), 4096);
        assert_eq!(cursor.next_offset(), 8192);
        assert_eq!(cursor.position(), 12288);
    }

    #[test]
    fn test_sequential_wraps_at_file_size() {
        let mut cursor = SequentialCursor::new(3 * 4096, 4096).unwrap();
        let offsets: Vec<u64> = (0..7).map(|_| cursor.next_offset()).collect();
        assert_eq!(offsets, vec![0, 4096, 8192, 0, 4096, 8192, 0]);
    }

    #[test]
    fn test_sequential_wraps_when_exceeding_file_size() {
        let mut cursor = SequentialCursor::new(10_000, 4096).unwrap();
        let offsets: Vec<u64> = (0..4).map(|_| cursor.next_offset()).collect();
        assert_eq!(offsets, vec![0, 4096, 8192, 0]);
    }
}
