//! Pairwise tree reduction of displacement vectors.
//!
//! Sums are accumulated in `f64` and rounded to `f32` once at the end. The
//! tree shape depends only on the input length, so a given slice always
//! reduces to the same bits; compared with a left-to-right `f32` fold the
//! result differs only by rounding.

use crate::vector::{Vector3, WideVector3};

/// Below this length a sub-slice is summed left to right.
const LEAF_WIDTH: usize = 8;

/// Associative combine step of the reduction.
#[inline]
pub fn combine(left: WideVector3, right: WideVector3) -> WideVector3 {
    left + right
}

/// Elementwise sum of `values`.
pub fn reduce(values: &[Vector3]) -> Vector3 {
    partial_sum(values).narrow()
}

/// Elementwise sum of `values`, kept in double precision.
pub fn partial_sum(values: &[Vector3]) -> WideVector3 {
    if values.len() <= LEAF_WIDTH {
        return values
            .iter()
            .fold(WideVector3::zero(), |acc, v| combine(acc, (*v).into()));
    }
    let (left, right) = values.split_at(values.len() / 2);
    combine(partial_sum(left), partial_sum(right))
}

/// Combine already widened partial sums with the same tree shape.
pub fn reduce_wide(partials: &[WideVector3]) -> WideVector3 {
    if partials.len() <= LEAF_WIDTH {
        return partials
            .iter()
            .fold(WideVector3::zero(), |acc, v| combine(acc, *v));
    }
    let (left, right) = partials.split_at(partials.len() / 2);
    combine(reduce_wide(left), reduce_wide(right))
}
