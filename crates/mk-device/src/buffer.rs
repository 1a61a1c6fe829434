use std::fmt;

use mk_matrix::{DType, Element};

/// Handle to a dense, row-major matrix living in device memory.
///
/// The handle only carries the device pointer and the shape. It never reads
/// or writes through the pointer; that is left to a
/// [`crate::DeviceKernel`]. Allocation and host/device transfers belong to
/// the device runtime, not to this crate.
pub struct DeviceMatrix<T: Element> {
    ptr: *mut T,
    rows: usize,
    cols: usize,
}

// SAFETY: the pointer is an opaque device address that is never
// dereferenced on the host, so moving or sharing the handle is harmless.
unsafe impl<T: Element> Send for DeviceMatrix<T> {}
// SAFETY: as above; `&DeviceMatrix` only exposes the address and shape.
unsafe impl<T: Element> Sync for DeviceMatrix<T> {}

impl<T: Element> DeviceMatrix<T> {
    /// Wrap an existing device allocation.
    ///
    /// # Safety
    /// `ptr` must point to at least `rows * cols` contiguous elements of `T`
    /// in memory the kernel receiving this handle can access. The allocation
    /// must outlive every kernel call made with the handle.
    pub unsafe fn from_raw_parts(ptr: *mut T, rows: usize, cols: usize) -> Self {
        Self { ptr, rows, cols }
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn dtype(&self) -> DType {
        T::DTYPE
    }
}

impl<T: Element> fmt::Debug for DeviceMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceMatrix")
            .field("ptr", &self.ptr)
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("dtype", &T::DTYPE)
            .finish()
    }
}
