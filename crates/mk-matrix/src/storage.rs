use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::NonNull;

use crate::dtype::{DType, Element};

/// Alignment requested for the start of a matrix buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// The element type's own alignment.
    #[default]
    Natural,
    /// 16 bytes, enough for 4-wide f32 vector loads.
    Simd4,
    /// 32 bytes, enough for 8-wide f32 vector loads.
    Simd8,
}

impl Alignment {
    /// Returns the alignment for a vector width in f32 lanes.
    ///
    /// Widths other than 4 and 8 map to [`Alignment::Natural`].
    pub fn for_width(width: usize) -> Self {
        match width {
            4 => Alignment::Simd4,
            8 => Alignment::Simd8,
            _ => Alignment::Natural,
        }
    }

    /// Returns the byte alignment used when allocating a buffer of `T`.
    pub fn bytes<T>(&self) -> usize {
        let natural = std::mem::align_of::<T>();
        match self {
            Alignment::Natural => natural,
            Alignment::Simd4 => natural.max(16),
            Alignment::Simd8 => natural.max(32),
        }
    }
}

/// Heap buffer of elements whose start is aligned to an [`Alignment`].
///
/// This is the backing store of every owning [`crate::Matrix`]. Views never
/// hold one; they borrow a slice of it instead.
pub struct AlignedBuffer<T: Element> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
    alignment: Alignment,
}

// SAFETY: the buffer uniquely owns its allocation, like `Vec<T>`.
unsafe impl<T: Element> Send for AlignedBuffer<T> {}
// SAFETY: shared access only hands out `&[T]`, and `T: Sync`.
unsafe impl<T: Element> Sync for AlignedBuffer<T> {}

impl<T: Element> AlignedBuffer<T> {
    /// Allocate `len` zero-valued elements.
    ///
    /// # Panics
    /// Panics if the byte size overflows `isize`, the same way `vec!` does.
    pub fn zeroed(len: usize, alignment: Alignment) -> Self {
        let layout = match Layout::array::<T>(len)
            .and_then(|l| l.align_to(alignment.bytes::<T>()))
        {
            Ok(layout) => layout,
            Err(_) => panic!("capacity overflow allocating {len} elements of {}", T::DTYPE),
        };

        let ptr = if layout.size() == 0 {
            // Dangling but aligned, like SIMD-friendly allocators do for empty tensors.
            NonNull::new(layout.align() as *mut T).unwrap_or(NonNull::dangling())
        } else {
            // SAFETY: layout has non-zero size. Every `Element` type is valid
            // when all of its bytes are zero.
            let raw = unsafe { alloc::alloc_zeroed(layout) } as *mut T;
            match NonNull::new(raw) {
                Some(p) => p,
                None => alloc::handle_alloc_error(layout),
            }
        };

        AlignedBuffer {
            ptr,
            len,
            layout,
            alignment,
        }
    }

    /// Allocate a buffer holding a copy of `data`.
    pub fn from_slice(data: &[T], alignment: Alignment) -> Self {
        let mut buf = Self::zeroed(data.len(), alignment);
        buf.as_mut_slice().copy_from_slice(data);
        buf
    }

    /// Number of elements in this buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the buffer contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Alignment the buffer was allocated with.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Element type of this buffer.
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: ptr is valid for `len` initialized elements for the
        // lifetime of `self`, and is non-null and aligned even when empty.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`; `&mut self` guarantees uniqueness.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Element> Drop for AlignedBuffer<T> {
    fn drop(&mut self) {
        if self.layout.size() > 0 {
            // SAFETY: allocated in `zeroed` with this exact layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr() as *mut u8, self.layout) }
        }
    }
}

impl<T: Element> Clone for AlignedBuffer<T> {
    fn clone(&self) -> Self {
        Self::from_slice(self.as_slice(), self.alignment)
    }
}

impl<T: Element> fmt::Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("dtype", &T::DTYPE)
            .field("len", &self.len)
            .field("alignment", &self.alignment)
            .finish()
    }
}
