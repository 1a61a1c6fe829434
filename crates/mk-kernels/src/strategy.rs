use std::fmt;
use std::str::FromStr;

use mk_matrix::{Element, MatrixView, MatrixViewMut, Result};

use crate::parallel::matmul_parallel;
use crate::reference::{matmul_naive, matmul_transposed};
use crate::simd::{matmul_simd4, matmul_simd8};
use crate::strassen::matmul_strassen;

/// A named multiplication strategy.
///
/// Every strategy computes C = A @ B. Strategies for which
/// [`Strategy::expects_transposed_rhs`] is true take B already transposed
/// (n x k) as their second operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Naive,
    Transposed,
    Parallel,
    Simd4,
    Simd8,
    Strassen,
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy '{0}'")]
pub struct ParseStrategyError(pub String);

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::Naive,
        Strategy::Transposed,
        Strategy::Parallel,
        Strategy::Simd4,
        Strategy::Simd8,
        Strategy::Strassen,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Naive => "naive",
            Strategy::Transposed => "transposed",
            Strategy::Parallel => "parallel",
            Strategy::Simd4 => "simd4",
            Strategy::Simd8 => "simd8",
            Strategy::Strassen => "strassen",
        }
    }

    /// Returns true if the second operand must be passed as B^T.
    pub fn expects_transposed_rhs(&self) -> bool {
        matches!(
            self,
            Strategy::Transposed | Strategy::Simd4 | Strategy::Simd8
        )
    }

    /// Run this strategy on `a`, `rhs` and `c`.
    ///
    /// `rhs` is B for naive, parallel and strassen, and B^T for the others.
    /// Each strategy's own preconditions and errors apply unchanged.
    pub fn multiply<T: Element>(
        &self,
        a: MatrixView<'_, T>,
        rhs: MatrixView<'_, T>,
        c: MatrixViewMut<'_, T>,
    ) -> Result<()> {
        match self {
            Strategy::Naive => matmul_naive(a, rhs, c),
            Strategy::Transposed => matmul_transposed(a, rhs, c),
            Strategy::Parallel => matmul_parallel(a, rhs, c),
            Strategy::Simd4 => matmul_simd4(a, rhs, c),
            Strategy::Simd8 => matmul_simd8(a, rhs, c),
            Strategy::Strassen => matmul_strassen(a, rhs, c),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Strategy::ALL
            .iter()
            .copied()
            .find(|st| st.name() == lower)
            .ok_or_else(|| ParseStrategyError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mk_matrix::{Alignment, Matrix, MatrixError};

    #[test]
    fn test_name_round_trip() {
        for s in Strategy::ALL {
            assert_eq!(s.to_string().parse::<Strategy>().unwrap(), s);
        }
        assert_eq!("  SIMD8 ".parse::<Strategy>().unwrap(), Strategy::Simd8);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "winograd".parse::<Strategy>().unwrap_err();
        assert_eq!(err.to_string(), "unknown strategy 'winograd'");
    }

    #[test]
    fn test_transposed_rhs() {
        let transposed: Vec<_> = Strategy::ALL
            .iter()
            .filter(|s| s.expects_transposed_rhs())
            .map(|s| s.name())
            .collect();
        assert_eq!(transposed, vec!["transposed", "simd4", "simd8"]);
    }

    #[test]
    fn test_multiply_dispatch() {
        let a = Matrix::from_vec_aligned(
            2,
            8,
            (1..=16).map(|x| x as f32).collect(),
            Alignment::Simd8,
        )
        .unwrap();
        let b = Matrix::from_fn(8, 2, |i, j| if i == j { 1.0f32 } else { 0.0 });
        let bt = b.transpose();
        let bt = Matrix::from_vec_aligned(2, 8, bt.to_vec(), Alignment::Simd8).unwrap();

        for s in Strategy::ALL {
            if s == Strategy::Strassen {
                continue;
            }
            let rhs = if s.expects_transposed_rhs() { bt.view() } else { b.view() };
            let mut c = Matrix::<f32>::zeros(2, 2);
            s.multiply(a.view(), rhs, c.view_mut()).unwrap();
            assert_eq!(c.to_vec(), vec![1.0, 2.0, 9.0, 10.0], "strategy {s}");
        }
    }

    #[test]
    fn test_multiply_forwards_errors() {
        let a = Matrix::<f64>::identity(2);
        let mut c = Matrix::<f64>::zeros(2, 2);
        let err = Strategy::Simd4
            .multiply(a.view(), a.view(), c.view_mut())
            .unwrap_err();
        assert!(matches!(err, MatrixError::UnsupportedDType { .. }));

        let a = Matrix::<f64>::zeros(2, 3);
        let b = Matrix::<f64>::zeros(3, 2);
        let err = Strategy::Strassen
            .multiply(a.view(), b.view(), c.view_mut())
            .unwrap_err();
        assert!(matches!(err, MatrixError::InvalidDimension { .. }));
    }
}
