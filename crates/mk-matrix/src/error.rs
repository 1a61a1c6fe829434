use thiserror::Error;

use crate::dtype::DType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    #[error("data length mismatch: expected {expected} elements, got {got}")]
    LengthMismatch { expected: usize, got: usize },
    #[error("matmul dimension mismatch: A {a:?} x B {b:?} -> C {c:?}")]
    MatmulMismatch {
        a: (usize, usize),
        b: (usize, usize),
        c: (usize, usize),
    },
    #[error("invalid dimension {rows}x{cols}: {reason}")]
    InvalidDimension {
        rows: usize,
        cols: usize,
        reason: &'static str,
    },
    #[error(
        "sub-matrix window at ({row_offset}, {col_offset}) of size {rows}x{cols} \
         exceeds parent of size {parent_rows}x{parent_cols}"
    )]
    OutOfBounds {
        row_offset: usize,
        col_offset: usize,
        rows: usize,
        cols: usize,
        parent_rows: usize,
        parent_cols: usize,
    },
    #[error("index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("{op} does not support element type {dtype}")]
    UnsupportedDType { op: &'static str, dtype: DType },
    #[error("{op} requires {required}-byte aligned rows (misaligned by {offset} bytes)")]
    Misaligned {
        op: &'static str,
        required: usize,
        offset: usize,
    },
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, MatrixError>;
