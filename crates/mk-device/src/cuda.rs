//! Bindings to the external CUDA kernel library.
//!
//! The kernels are compiled separately with `nvcc` into `libmkcuda`, which
//! exports one C entry point per (variant, element type). Each entry point
//! launches its kernel, synchronizes, and returns the `cudaError_t` of the
//! launch (0 on success).

use std::ffi::c_int;

use mk_matrix::{DType, MatrixError};

use crate::backend::{DeviceGemm, DeviceKernel};
use crate::error::{DeviceError, Result};

type GemmF32 = unsafe extern "C" fn(*const f32, *const f32, *mut f32, u32, u32, u32) -> c_int;
type GemmF64 = unsafe extern "C" fn(*const f64, *const f64, *mut f64, u32, u32, u32) -> c_int;
type GemmI32 = unsafe extern "C" fn(*const i32, *const i32, *mut i32, u32, u32, u32) -> c_int;

extern "C" {
    fn mk_cuda_matmul_naive_f32(
        a: *const f32,
        b: *const f32,
        c: *mut f32,
        rows: u32,
        inner: u32,
        cols: u32,
    ) -> c_int;
    fn mk_cuda_matmul_naive_f64(
        a: *const f64,
        b: *const f64,
        c: *mut f64,
        rows: u32,
        inner: u32,
        cols: u32,
    ) -> c_int;
    fn mk_cuda_matmul_naive_i32(
        a: *const i32,
        b: *const i32,
        c: *mut i32,
        rows: u32,
        inner: u32,
        cols: u32,
    ) -> c_int;
    fn mk_cuda_matmul_shared_f32(
        a: *const f32,
        b: *const f32,
        c: *mut f32,
        rows: u32,
        inner: u32,
        cols: u32,
    ) -> c_int;
    fn mk_cuda_matmul_shared_f64(
        a: *const f64,
        b: *const f64,
        c: *mut f64,
        rows: u32,
        inner: u32,
        cols: u32,
    ) -> c_int;
    fn mk_cuda_matmul_shared_i32(
        a: *const i32,
        b: *const i32,
        c: *mut i32,
        rows: u32,
        inner: u32,
        cols: u32,
    ) -> c_int;
}

struct EntryPoints {
    f32: GemmF32,
    f64: GemmF64,
    i32: GemmI32,
}

const NAIVE: EntryPoints = EntryPoints {
    f32: mk_cuda_matmul_naive_f32,
    f64: mk_cuda_matmul_naive_f64,
    i32: mk_cuda_matmul_naive_i32,
};

const SHARED: EntryPoints = EntryPoints {
    f32: mk_cuda_matmul_shared_f32,
    f64: mk_cuda_matmul_shared_f64,
    i32: mk_cuda_matmul_shared_i32,
};

/// The naive and shared-memory CUDA kernels from `libmkcuda`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CudaKernels;

impl CudaKernels {
    pub fn new() -> Self {
        Self
    }

    fn launch(&self, entry: &EntryPoints, gemm: &DeviceGemm) -> Result<()> {
        let dim = |n: usize| {
            u32::try_from(n).map_err(|_| MatrixError::InvalidDimension {
                rows: gemm.rows(),
                cols: gemm.cols(),
                reason: "dimension exceeds the CUDA kernels' 32-bit index range",
            })
        };
        let rows = dim(gemm.rows())?;
        let inner = dim(gemm.inner())?;
        let cols = dim(gemm.cols())?;

        // SAFETY: `gemm` was built from `DeviceMatrix` handles whose
        // constructor guarantees valid device allocations of the stated
        // shape and element type, and the element type picks the entry point.
        let status = unsafe {
            match gemm.dtype() {
                DType::F32 => {
                    (entry.f32)(gemm.a().cast(), gemm.b().cast(), gemm.c().cast(), rows, inner, cols)
                }
                DType::F64 => {
                    (entry.f64)(gemm.a().cast(), gemm.b().cast(), gemm.c().cast(), rows, inner, cols)
                }
                DType::I32 => {
                    (entry.i32)(gemm.a().cast(), gemm.b().cast(), gemm.c().cast(), rows, inner, cols)
                }
            }
        };
        if status != 0 {
            return Err(DeviceError::Backend {
                kernel: self.name().to_string(),
                message: format!("CUDA error code {status}"),
            });
        }
        Ok(())
    }
}

impl DeviceKernel for CudaKernels {
    fn name(&self) -> &str {
        "cuda"
    }

    fn supports(&self, dtype: DType) -> bool {
        matches!(dtype, DType::F32 | DType::F64 | DType::I32)
    }

    fn naive(&self, gemm: &DeviceGemm) -> Result<()> {
        self.launch(&NAIVE, gemm)
    }

    fn shared(&self, gemm: &DeviceGemm) -> Result<()> {
        self.launch(&SHARED, gemm)
    }
}
