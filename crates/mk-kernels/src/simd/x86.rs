//! SSE (4-wide) and AVX (8-wide) dot-product kernels using aligned loads.

use std::arch::x86_64::*;

/// 4-wide dot product over the full chunks of `a` and `b`.
///
/// # Safety
/// The CPU must support SSE, `b.len() >= a.len()`, and both slices must
/// start on a 16-byte boundary.
#[target_feature(enable = "sse")]
pub(crate) unsafe fn dot_sse(a: &[f32], b: &[f32]) -> f32 {
    debug_assert!(b.len() >= a.len());
    debug_assert_eq!(a.as_ptr() as usize % 16, 0);
    debug_assert_eq!(b.as_ptr() as usize % 16, 0);

    let chunks = a.len() / 4;
    let mut partial_sum = _mm_setzero_ps();
    for k in 0..chunks {
        let va = _mm_load_ps(a.as_ptr().add(4 * k));
        let vb = _mm_load_ps(b.as_ptr().add(4 * k));
        partial_sum = _mm_add_ps(partial_sum, _mm_mul_ps(va, vb));
    }

    let mut lanes = [0.0f32; 4];
    _mm_storeu_ps(lanes.as_mut_ptr(), partial_sum);
    lanes[0] + lanes[1] + lanes[2] + lanes[3]
}

/// 8-wide dot product over the full chunks of `a` and `b`.
///
/// # Safety
/// The CPU must support AVX, `b.len() >= a.len()`, and both slices must
/// start on a 32-byte boundary.
#[target_feature(enable = "avx")]
pub(crate) unsafe fn dot_avx(a: &[f32], b: &[f32]) -> f32 {
    debug_assert!(b.len() >= a.len());
    debug_assert_eq!(a.as_ptr() as usize % 32, 0);
    debug_assert_eq!(b.as_ptr() as usize % 32, 0);

    let chunks = a.len() / 8;
    let mut partial_sum = _mm256_setzero_ps();
    for k in 0..chunks {
        let va = _mm256_load_ps(a.as_ptr().add(8 * k));
        let vb = _mm256_load_ps(b.as_ptr().add(8 * k));
        partial_sum = _mm256_add_ps(partial_sum, _mm256_mul_ps(va, vb));
    }

    let mut lanes = [0.0f32; 8];
    _mm256_storeu_ps(lanes.as_mut_ptr(), partial_sum);
    lanes[0] + lanes[1] + lanes[2] + lanes[3] + lanes[4] + lanes[5] + lanes[6] + lanes[7]
}
