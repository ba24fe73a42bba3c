use ark_ff::PrimeField;

use super::sequence::{SequenceTables, impl_sequence_domain};
use crate::errors::DomainError;

/// Domain with points `x_i = i · g`.
///
/// In the Newton basis `N_k(i·g) = g^k · i! / (i-k)!`, so the factorials are the
/// ordinary ones and the weights are powers of `g`.
#[derive(Clone, Debug)]
pub struct ArithmeticSequenceDomain<F> {
    pub generator: F,
    tables: SequenceTables<F>,
}

impl<F: PrimeField> ArithmeticSequenceDomain<F> {
    /// Arithmetic progression with step `F::GENERATOR`.
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
        let (mut x, mut factorial, mut weight) = (F::zero(), F::one(), F::one());
        for n in 0..size {
            if n > 0 {
                x += generator;
                factorial *= F::from(n as u64);
                weight *= generator;
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

impl_sequence_domain!(ArithmeticSequenceDomain);
