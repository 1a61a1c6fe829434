//! Validated entry points that forward a multiply to a [`DeviceKernel`].

use mk_matrix::{Element, MatrixError};

use crate::backend::{DeviceGemm, DeviceKernel};
use crate::buffer::DeviceMatrix;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Naive,
    Shared,
}

impl Variant {
    fn op_name(self) -> &'static str {
        match self {
            Variant::Naive => "device naive matmul",
            Variant::Shared => "device shared matmul",
        }
    }
}

/// Multiply on the device with the kernel's naive variant: C = A @ B.
///
/// # Errors
/// - `MatmulMismatch` unless A is m x k, B is k x n and C is m x n
/// - `UnsupportedDType` if `kernel` does not accept `T`
/// - `Backend` if the kernel itself reports a failure
pub fn naive_matmul<T: Element>(
    kernel: &dyn DeviceKernel,
    a: &DeviceMatrix<T>,
    b: &DeviceMatrix<T>,
    c: &mut DeviceMatrix<T>,
) -> Result<()> {
    dispatch(Variant::Naive, kernel, a, b, c)
}

/// Multiply on the device with the kernel's shared-memory tiled variant.
///
/// # Errors
/// Same as [`naive_matmul`].
pub fn shared_matmul<T: Element>(
    kernel: &dyn DeviceKernel,
    a: &DeviceMatrix<T>,
    b: &DeviceMatrix<T>,
    c: &mut DeviceMatrix<T>,
) -> Result<()> {
    dispatch(Variant::Shared, kernel, a, b, c)
}

fn dispatch<T: Element>(
    variant: Variant,
    kernel: &dyn DeviceKernel,
    a: &DeviceMatrix<T>,
    b: &DeviceMatrix<T>,
    c: &mut DeviceMatrix<T>,
) -> Result<()> {
    if a.cols() != b.rows() || c.shape() != (a.rows(), b.cols()) {
        return Err(MatrixError::MatmulMismatch {
            a: a.shape(),
            b: b.shape(),
            c: c.shape(),
        }
        .into());
    }
    if !kernel.supports(T::DTYPE) {
        return Err(MatrixError::UnsupportedDType {
            op: variant.op_name(),
            dtype: T::DTYPE,
        }
        .into());
    }

    let gemm = DeviceGemm::new(a, b, c);
    log::debug!(
        "{} on '{}': [{}x{}] @ [{}x{}] ({})",
        variant.op_name(),
        kernel.name(),
        gemm.rows(),
        gemm.inner(),
        gemm.inner(),
        gemm.cols(),
        gemm.dtype()
    );
    match variant {
        Variant::Naive => kernel.naive(&gemm),
        Variant::Shared => kernel.shared(&gemm),
    }
}
