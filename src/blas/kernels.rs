//! Slice-level kernels shared by the dispatcher.

use num_traits::Float;

use crate::matrix::{DenseMatrix, SparseRowMatrix};

/// `x ← alpha·x`; `alpha == 0` writes exact zeros.
pub fn scale(alpha: f64, x: &mut [f64]) {
    if alpha == 0.0 {
        x.fill(0.0);
    } else if alpha != 1.0 {
        x.iter_mut().for_each(|v| *v *= alpha);
    }
}

/// `y ← alpha·x + beta·y`
pub fn axpby(alpha: f64, x: &[f64], beta: f64, y: &mut [f64]) {
    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi = alpha * xi + beta * *yi;
    }
}

/// `z ← alpha·x + beta·y`
pub fn add(alpha: f64, x: &[f64], beta: f64, y: &[f64], z: &mut [f64]) {
    for ((zi, &xi), &yi) in z.iter_mut().zip(x).zip(y) {
        *zi = alpha * xi + beta * yi;
    }
}

pub fn dot<T: Float>(x: &[T], y: &[T]) -> T {
    x.iter().zip(y).fold(T::zero(), |acc, (&a, &b)| acc + a * b)
}

/// Dot product visiting only the stored positions of the sparse operand.
pub fn dot_sparse<T: Float>(dense: &[T], positions: &[usize], values: &[T]) -> T {
    positions
        .iter()
        .zip(values)
        .fold(T::zero(), |acc, (&i, &v)| acc + dense[i] * v)
}

/// Sum of absolute values.
pub fn norm1<T: Float>(values: impl IntoIterator<Item = T>) -> T {
    values.into_iter().fold(T::zero(), |acc, v| acc + v.abs())
}

/// Largest absolute value.
pub fn norm_inf<T: Float>(values: impl IntoIterator<Item = T>) -> T {
    values.into_iter().fold(T::zero(), |acc, v| acc.max(v.abs()))
}

/// Euclidean norm by the scaled running sum of squares.
///
/// `scale` tracks the largest magnitude seen so far and `ssq` the sum of
/// squares relative to it, so no intermediate square overflows or underflows.
pub fn norm2<T: Float>(values: impl IntoIterator<Item = T>) -> T {
    let mut scale = T::zero();
    let mut ssq = T::one();
    for v in values {
        if v == T::zero() {
            continue;
        }
        let a = v.abs();
        if scale < a {
            let r = scale / a;
            ssq = T::one() + ssq * r * r;
            scale = a;
        } else {
            let r = a / scale;
            ssq = ssq + r * r;
        }
    }
    scale * ssq.sqrt()
}

/// `z ← alpha·(op(A)·x) + beta·z` for kernels that can only accumulate.
///
/// `z` is pre-scaled by `beta / alpha`, `accumulate` adds the unscaled
/// product into it, and the result is scaled by `alpha`. No temporary of the
/// size of `z` is needed, so `z` may double as the `y` input. `alpha` must be
/// nonzero.
pub fn rescale_accumulate<F>(alpha: f64, beta: f64, z: &mut [f64], accumulate: F)
where
    F: FnOnce(&mut [f64]),
{
    debug_assert!(alpha != 0.0);
    scale(beta / alpha, z);
    accumulate(z);
    scale(alpha, z);
}

/// `z ← alpha·A·x + beta·z`, one row at a time.
///
/// Row `i` of `z` is read and written once, so `z` may be the `y` input.
pub fn row_multiply_add(alpha: f64, a: &SparseRowMatrix, x: &[f64], beta: f64, z: &mut [f64]) {
    for (i, zi) in z.iter_mut().enumerate() {
        let (cols, vals) = a.active_row(i);
        let s = dot_sparse(x, cols, vals);
        *zi = alpha * s + beta * *zi;
    }
}

/// `z += Aᵗ·x`, scattering each row into `z`.
pub fn row_transpose_accumulate(a: &SparseRowMatrix, x: &[f64], z: &mut [f64]) {
    for (i, &xi) in x.iter().enumerate() {
        if xi == 0.0 {
            continue;
        }
        let (cols, vals) = a.active_row(i);
        for (&c, &v) in cols.iter().zip(vals) {
            z[c] += v * xi;
        }
    }
}

/// `z += A·x`, one column at a time.
pub fn column_accumulate(a: &DenseMatrix, x: &[f64], z: &mut [f64]) {
    for (j, &xj) in x.iter().enumerate() {
        if xj == 0.0 {
            continue;
        }
        for (i, zi) in z.iter_mut().enumerate() {
            *zi += a.at(i, j) * xj;
        }
    }
}

/// `z ← alpha·Aᵗ·x + beta·z`, one column of `A` per entry of `z`.
pub fn column_transpose_multiply_add(alpha: f64, a: &DenseMatrix, x: &[f64], beta: f64, z: &mut [f64]) {
    for (j, zj) in z.iter_mut().enumerate() {
        let s = x.iter().enumerate().fold(0.0, |acc, (i, &xi)| acc + a.at(i, j) * xi);
        *zj = alpha * s + beta * *zj;
    }
}
