//! Payload and offset generation
//!
//! Everything here is deterministic for a given seed: the same seed, scheme and
//! size always produce byte-identical payloads, and the same seed, file size
//! and block size always produce the same offset sequence. This keeps runs
//! reproducible and makes the generators testable.
//!
//! # Example
//!
//! ```
//! use diskpulse::config::FillScheme;
//! use diskpulse::pattern::generate_pattern;
//!
//! let a = generate_pattern(4096, FillScheme::Random, 7).unwrap();
//! let b = generate_pattern(4096, FillScheme::Random, 7).unwrap();
//! assert_eq!(&a[..], &b[..]);
//! ```

pub mod offsets;

use crate::config::{FillScheme, DIRECT_IO_ALIGNMENT};
use crate::util::AlignedBuffer;
use crate::Result;
use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

pub use offsets::{OffsetSequence, SequentialCursor, MAX_RANDOM_OFFSETS};

/// Allocate an aligned buffer of `size` bytes filled under `scheme`
///
/// The buffer is aligned to [`DIRECT_IO_ALIGNMENT`] regardless of how it will be
/// used.
pub fn generate_pattern(size: usize, scheme: FillScheme, seed: u64) -> Result<AlignedBuffer> {
    let mut buffer = AlignedBuffer::new(size, DIRECT_IO_ALIGNMENT)?;
    fill_buffer(&mut buffer, scheme, seed);
    Ok(buffer)
}

/// Fill an existing slice under `scheme`
pub fn fill_buffer(buf: &mut [u8], scheme: FillScheme, seed: u64) {
    match scheme {
        FillScheme::Zero => buf.fill(0),
        FillScheme::Ones => buf.fill(0xFF),
        FillScheme::Random => {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            rng.fill_bytes(buf);
        }
        FillScheme::Sequential => {
            for (i, byte) in buf.iter_mut().enumerate() {
                *byte = (i % 256) as u8;
            }
        }
        FillScheme::Compressible => {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            for byte in buf.iter_mut() {
                *byte = if rng.gen_bool(0.5) { 0 } else { rng.gen() };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_scheme() {
        let buf = generate_pattern(4096, FillScheme::Zero, 1).unwrap();
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_ones_scheme() {
        let buf = generate_pattern(4096, FillScheme::Ones, 1).unwrap();
        assert!(buf.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_sequential_scheme_wraps() {
        let buf = generate_pattern(512, FillScheme::Sequential, 0).unwrap();
        for (i, &b) in buf.iter().enumerate() {
            assert_eq!(b, (i % 256) as u8);
        }
        assert_eq!(buf[256], 0);
    }

    #[test]
    fn test_random_scheme_is_deterministic() {
        let a = generate_pattern(8192, FillScheme::Random, 12345).unwrap();
        let b = generate_pattern(8192, FillScheme::Random, 12345).unwrap();
        assert_eq!(&a[..], &b[..]);
    }

    #[test]
    fn test_random_scheme_depends_on_seed() {
        let a = generate_pattern(4096, FillScheme::Random, 1).unwrap();
        let b = generate_pattern(4096, FillScheme::Random, 2).unwrap();
        assert_ne!(&a[..], &b[..]);
    }

    #[test]
    fn test_compressible_scheme_is_about_half_zero() {
        let buf = generate_pattern(64 * 1024, FillScheme::Compressible, 99).unwrap();
        let zeros = buf.iter().filter(|&&b| b == 0).count();
        let ratio = zeros as f64 / buf.len() as f64;
        // 50% forced zeros plus ~1/256 of the random half
        assert!(ratio > 0.45 && ratio < 0.56, "zero ratio {}", ratio);

        let again = generate_pattern(64 * 1024, FillScheme::Compressible, 99).unwrap();
        assert_eq!(&buf[..], &again[..]);
    }

    #[test]
    fn test_buffer_alignment_independent_of_scheme() {
        for scheme in [
            FillScheme::Zero,
            FillScheme::Ones,
            FillScheme::Random,
            FillScheme::Sequential,
            FillScheme::Compressible,
        ] {
            let buf = generate_pattern(4096, scheme, 3).unwrap();
            assert!(buf.is_aligned());
            assert_eq!(buf.alignment(), DIRECT_IO_ALIGNMENT);
        }
    }
}
