//! Shared utilities

pub mod buffer;

pub use buffer::AlignedBuffer;
