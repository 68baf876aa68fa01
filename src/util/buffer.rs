//! Memory-aligned buffers for direct IO
//!
//! Payload buffers are always aligned to the direct IO boundary, whether or not
//! the run bypasses the cache, so the same buffer works for every mode.

use crate::error::BenchError;
use crate::Result;
use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// Heap buffer with a guaranteed start address alignment
///
/// Dereferences to `[u8]`, so it can be handed directly to read/write calls.
pub struct AlignedBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl AlignedBuffer {
    /// Allocate a zero-filled buffer of `size` bytes aligned to `alignment`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `size` is 0 or `alignment` is not a
    /// power of two.
    pub fn new(size: usize, alignment: usize) -> Result<Self> {
        if size == 0 {
            return Err(BenchError::config("buffer size must be greater than 0"));
        }
        if !alignment.is_power_of_two() {
            return Err(BenchError::config(format!(
                "alignment must be a power of 2, got {}",
                alignment
            )));
        }

        let layout = Layout::from_size_align(size, alignment)
            .map_err(|e| BenchError::config(format!("invalid buffer layout: {}", e)))?;

        // SAFETY: layout has a non-zero size (checked above)
        let raw = unsafe { alloc_zeroed(layout) };
        let ptr = match NonNull::new(raw) {
            Some(ptr) => ptr,
            None => handle_alloc_error(layout),
        };

        Ok(Self { ptr, layout })
    }

    /// Size of the buffer in bytes
    #[inline]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    /// Alignment the buffer was allocated with
    #[inline]
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }

    /// True if the start address honors the requested alignment
    #[inline]
    pub fn is_aligned(&self) -> bool {
        (self.ptr.as_ptr() as usize) % self.layout.align() == 0
    }
}

impl Deref for AlignedBuffer {
    type Target = [u8];

    #[inline(always)]
    fn deref(&self) -> &[u8] {
        // SAFETY: ptr points to `size` initialized bytes owned by self
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.layout.size()) }
    }
}

impl DerefMut for AlignedBuffer {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [u8] {
        // SAFETY: ptr points to `size` initialized bytes uniquely borrowed through self
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.layout.size()) }
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        // SAFETY: ptr was allocated with exactly this layout
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

impl std::fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("size", &self.size())
            .field("alignment", &self.alignment())
            .finish()
    }
}

// AlignedBuffer owns its memory exclusively
unsafe impl Send for AlignedBuffer {}
