use ark_ff::PrimeField;

use super::sequence::{SequenceTables, impl_sequence_domain};
use crate::errors::DomainError;

/// Domain with points `x_i = g^i`.
///
/// In the Newton basis `N_k(g^i) = g^(k(k-1)/2) · [i]! / [i-k]!` with the
/// q-factorial `[n]! = ∏_{l=1..n} (g^l - 1)`. The points are distinct exactly
/// when every `[n]!` with `n < m` is non-zero.
#[derive(Clone, Debug)]
pub struct GeometricSequenceDomain<F> {
    pub generator: F,
    tables: SequenceTables<F>,
}

impl<F: PrimeField> GeometricSequenceDomain<F> {
    /// Geometric progression with ratio `F::GENERATOR`.
    pub fn new(size: usize) -> Result<Self, DomainError> {
        Self::with_generator(size, F::GENERATOR)
    }

    pub fn with_generator(size: usize, generator: F) -> Result<Self, DomainError> {
        if size <= 1 {
            return Err(DomainError::TooSmall(size));
        }
        if generator.is_zero() {
            return Err(DomainError::ZeroGenerator);
        }

        let mut points = Vec::with_capacity(size);
        let mut factorials = Vec::with_capacity(size);
        let mut weights = Vec::with_capacity(size);
        let (mut x, mut factorial, mut weight) = (F::one(), F::one(), F::one());
        for n in 0..size {
            if n > 0 {
                // weight_n = weight_{n-1} · g^(n-1)
                weight *= x;
                x *= generator;
                factorial *= x - F::one();
            }
            points.push(x);
            factorials.push(factorial);
            weights.push(weight);
        }

        Ok(Self {
            generator,
            tables: SequenceTables::new(points, factorials, weights)?,
        })
    }
}

impl_sequence_domain!(GeometricSequenceDomain);
