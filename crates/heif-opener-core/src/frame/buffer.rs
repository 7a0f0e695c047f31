//! Reference-counted pixel storage with zero-copy windows.
//!
//! The codec hands over one allocation per decoded image. Every crop view is a
//! [`PixelBuffer`] pointing into that same allocation, and the allocation is
//! released only after the last view is dropped.

use std::fmt;
use std::sync::Arc;

/// An immutable window into a shared pixel allocation.
#[derive(Clone)]
pub struct PixelBuffer {
    data: Arc<[u8]>,
    offset: usize,
    len: usize,
}

impl PixelBuffer {
    /// Wrap a decoded allocation. The window covers all of it.
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        let data = data.into();
        let len = data.len();
        Self {
            data,
            offset: 0,
            len,
        }
    }

    /// Bytes visible through this window.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[self.offset..self.offset + self.len]
    }

    /// Number of visible bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Start of this window within the shared allocation.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Narrow the window to `len` bytes starting `offset` bytes into it.
    ///
    /// Returns `None` if the requested range leaves the current window. No
    /// pixel data is copied.
    pub fn view(&self, offset: usize, len: usize) -> Option<PixelBuffer> {
        let end = offset.checked_add(len)?;
        if end > self.len {
            return None;
        }
        Some(Self {
            data: Arc::clone(&self.data),
            offset: self.offset + offset,
            len,
        })
    }

    /// A zero-length window at the start of this one.
    pub fn empty_view(&self) -> PixelBuffer {
        Self {
            data: Arc::clone(&self.data),
            offset: self.offset,
            len: 0,
        }
    }

    /// True if both windows point into the same allocation.
    pub fn shares_allocation(&self, other: &PixelBuffer) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl AsRef<[u8]> for PixelBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Vec<u8>> for PixelBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl PartialEq for PixelBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for PixelBuffer {}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("allocation_len", &self.data.len())
            .finish()
    }
}
