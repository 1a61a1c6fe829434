//! `mk-device` - Device-offload dispatch for matmul-kernels.
//!
//! This crate provides:
//! - `DeviceMatrix`, a (pointer, rows, cols) handle to device memory
//! - The `DeviceKernel` trait that a device runtime implements
//! - `naive_matmul` / `shared_matmul`, which validate shapes and element
//!   types before forwarding one request to a kernel
//! - With the `cuda` feature, `CudaKernels` bound to `libmkcuda`

pub mod backend;
pub mod buffer;
#[cfg(feature = "cuda")]
pub mod cuda;
pub mod dispatch;
pub mod error;

// Re-export primary types at the crate root for convenience.
pub use backend::{DeviceGemm, DeviceKernel};
pub use buffer::DeviceMatrix;
#[cfg(feature = "cuda")]
pub use cuda::CudaKernels;
pub use dispatch::{naive_matmul, shared_matmul};
pub use error::{DeviceError, Result};
