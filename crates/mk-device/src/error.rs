use thiserror::Error;

use mk_matrix::MatrixError;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("matrix error: {0}")]
    Matrix(#[from] MatrixError),
    #[error("device kernel '{kernel}' failed: {message}")]
    Backend { kernel: String, message: String },
}

pub type Result<T> = std::result::Result<T, DeviceError>;
