use std::fmt::{self, Debug};
use std::ops::{Add, AddAssign, Mul, Sub};

use num_traits::{One, Zero};

/// Element types a matrix can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit signed integer.
    I32,
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
}

impl DType {
    /// Returns the size in bytes of a single element.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::I32 | DType::F32 => 4,
            DType::F64 => 8,
        }
    }

    /// Returns true for the floating point types.
    pub fn is_float(&self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::I32 => write!(f, "i32"),
            DType::F32 => write!(f, "f32"),
            DType::F64 => write!(f, "f64"),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A numeric type usable as a matrix element.
///
/// Sealed: every implementor has an all-zero bit pattern equal to
/// `Self::zero()`, which lets storage be allocated with `alloc_zeroed`.
pub trait Element:
    sealed::Sealed
    + Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + AddAssign
    + 'static
{
    /// Runtime tag for this element type.
    const DTYPE: DType;

    /// Reinterprets a slice of `Self` as `f32`, if `Self` is `f32`.
    ///
    /// This is the capability check the single-precision SIMD kernels use.
    fn as_f32_slice(_data: &[Self]) -> Option<&[f32]> {
        None
    }

    /// Mutable counterpart of [`Element::as_f32_slice`].
    fn as_f32_slice_mut(_data: &mut [Self]) -> Option<&mut [f32]> {
        None
    }
}

impl Element for i32 {
    const DTYPE: DType = DType::I32;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    fn as_f32_slice(data: &[f32]) -> Option<&[f32]> {
        Some(data)
    }

    fn as_f32_slice_mut(data: &mut [f32]) -> Option<&mut [f32]> {
        Some(data)
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;
}
