//! Lane-array kernels with the same arithmetic order as the intrinsic ones.
//!
//! Each lane accumulates `acc[l] + a[l] * b[l]` (separate multiply and add,
//! never fused), and the lanes are summed left to right. The x86 kernels do
//! exactly the same, so both paths produce identical bits.

/// Dot product over the first `a.len() / W` full chunks of `a` and `b`.
///
/// Trailing elements past the last full chunk are not included.
pub(crate) fn dot_truncated<const W: usize>(a: &[f32], b: &[f32]) -> f32 {
    let mut acc = [0.0f32; W];
    for (ca, cb) in a.chunks_exact(W).zip(b.chunks_exact(W)) {
        for l in 0..W {
            acc[l] += ca[l] * cb[l];
        }
    }
    acc[1..].iter().fold(acc[0], |sum, &lane| sum + lane)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_chunks() {
        let a = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let b = [1.0f32; 8];
        assert_eq!(dot_truncated::<4>(&a, &b), 36.0);
        assert_eq!(dot_truncated::<8>(&a, &b), 36.0);
    }

    #[test]
    fn test_trailing_elements_are_dropped() {
        let a = [1.0f32, 1.0, 1.0, 1.0, 1.0, 100.0];
        let b = [1.0f32; 6];
        // Only the first chunk of four counts.
        assert_eq!(dot_truncated::<4>(&a, &b), 4.0);
        // No full chunk of eight at all.
        assert_eq!(dot_truncated::<8>(&a, &b), 0.0);
    }

    #[test]
    fn test_empty() {
        assert_eq!(dot_truncated::<4>(&[], &[]), 0.0);
    }
}
