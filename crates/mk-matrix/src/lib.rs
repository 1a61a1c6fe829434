//! `mk-matrix` - Dense matrices and borrowed sub-matrix views for matmul-kernels.
//!
//! This crate provides:
//! - An owning `Matrix` type backed by aligned heap storage
//! - `MatrixView` / `MatrixViewMut` windows that share their parent's buffer
//! - Elementwise `add` / `subtract`
//! - The `Element` trait and `DType` tags for i32, f32 and f64
//! - The error taxonomy shared by every multiply strategy

pub mod dtype;
pub mod error;
pub mod matrix;
pub mod ops;
pub mod storage;
pub mod view;

// Re-export primary types at the crate root for convenience.
pub use dtype::{DType, Element};
pub use error::{MatrixError, Result};
pub use matrix::Matrix;
pub use ops::{add, subtract};
pub use storage::{AlignedBuffer, Alignment};
pub use view::{MatrixView, MatrixViewMut};
