//! FRI folding primitives.
//!
//! A binary fold maps evaluations of `f` over a subgroup of order `n` to
//! evaluations of `f_e + α·f_o` over the subgroup of order `n/2`, where
//! `f(x) = f_e(x²) + x·f_o(x²)`. Index `j` of the folded layer combines
//! indices `j` and `j + n/2` of the input, which hold `f(x)` and `f(-x)`.

use ark_ff::{Field, PrimeField};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::math::domain::Radix2Domain;

/// `(a + b)/2 + α·(a - b)/(2x)` with `a = f(x)`, `b = f(-x)`.
#[inline]
pub fn fold_pair<F: Field>(a: F, b: F, x_inv: F, alpha: F, two_inv: F) -> F {
    let avg = (a + b) * two_inv;
    let diff = (a - b) * two_inv;
    avg + diff * alpha * x_inv
}

/// Folds a whole layer `steps` times, squaring the challenge after every
/// binary fold. `values` are the evaluations over `domain` in index order.
pub fn fold_layer<F: PrimeField>(
    values: &[F],
    domain: &Radix2Domain<F>,
    steps: usize,
    alpha: F,
    two_inv: F,
) -> Vec<F> {
    debug_assert_eq!(values.len(), domain.size);
    let mut current = values.to_vec();
    let mut omega_inv = domain.group_gen_inv;
    let mut alpha = alpha;

    for _ in 0..steps {
        let half = current.len() / 2;
        let x_inv: Vec<F> = core::iter::successors(Some(F::one()), |x| Some(*x * omega_inv))
            .take(half)
            .collect();
        let (lo, hi) = current.split_at(half);
        current = ark_std::cfg_iter!(lo)
            .zip(ark_std::cfg_iter!(hi))
            .zip(ark_std::cfg_iter!(x_inv))
            .map(|((a, b), x_inv)| fold_pair(*a, *b, *x_inv, alpha, two_inv))
            .collect();
        omega_inv.square_in_place();
        alpha.square_in_place();
    }
    current
}

/// Folds one coset down to a single value.
///
/// `values[k]` is the evaluation at index `index + k·(n / values.len())` of
/// `domain` (of order `n`), i.e. the content of one Merkle leaf. The result is
/// the value of the fully folded layer at position `index`.
pub fn fold_coset<F: PrimeField>(
    values: &[F],
    index: usize,
    domain: &Radix2Domain<F>,
    alpha: F,
    two_inv: F,
) -> F {
    debug_assert!(values.len().is_power_of_two());
    let stride = domain.size / values.len();
    let base = domain.group_gen_inv.pow([index as u64]);
    let step = domain.group_gen_inv.pow([stride as u64]);

    let mut x_inv: Vec<F> = core::iter::successors(Some(base), |x| Some(*x * step))
        .take(values.len() / 2)
        .collect();
    let mut current = values.to_vec();
    let mut alpha = alpha;

    while current.len() > 1 {
        let half = current.len() / 2;
        current = (0..half)
            .map(|k| fold_pair(current[k], current[k + half], x_inv[k], alpha, two_inv))
            .collect();
        x_inv.truncate(half / 2);
        for x in x_inv.iter_mut() {
            x.square_in_place();
        }
        alpha.square_in_place();
    }
    current[0]
}
