//! `mk-kernels` - Matrix multiplication strategies over `mk-matrix` views.
//!
//! This crate provides:
//! - Naive and transposed single-threaded reference multiplies
//! - A rayon data-parallel multiply and a bounded `WorkerPool`
//! - 4-wide and 8-wide f32 SIMD multiplies over a pre-transposed operand
//! - A recursive Strassen multiply for power-of-two square matrices
//! - The `Strategy` enum for selecting any of the above by name
//!
//! Every strategy writes into a caller-supplied output view and validates
//! shapes before touching it.

mod check;
pub mod parallel;
pub mod pool;
pub mod reference;
pub mod simd;
pub mod strassen;
pub mod strategy;

// Re-export primary types at the crate root for convenience.
pub use parallel::matmul_parallel;
pub use pool::{PoolConfig, WorkerPool};
pub use reference::{matmul_naive, matmul_transposed};
pub use simd::{matmul_simd4, matmul_simd8, SimdPath, Width};
pub use strassen::matmul_strassen;
pub use strategy::{ParseStrategyError, Strategy};
