//! FRI low-degree proofs over radix-2 domains.
//!
//! The prover commits to evaluations of a batch of polynomials `g_j` over the
//! first domain and proves that the combined quotient
//! `Q = Σ θ^j x^(deg V_j) (g_j - U_j) / V_j` has low degree. Plain low-degree
//! testing uses `U_j = 0` and `V_j = 1`; the list polynomial commitment uses the
//! interpolant and vanishing polynomial of the opened points. The `x^(deg V_j)`
//! factor gives every term the degree of its `g_j`, so one bound covers the
//! whole batch.

use ark_ff::PrimeField;

use crate::errors::FriError;
use crate::hash::Hasher;
use crate::math::domain::EvaluationDomain;
use crate::math::field::field_to_bytes;
use crate::math::polynomial::Polynomial;
use crate::transcript::FiatShamirTranscript;

mod params;
mod proof;
pub mod prover;
pub mod verifier;

pub use params::{FriConfig, FriParams};
pub use proof::{FriProof, InitialProof, QueryProof, RoundProof};
pub use prover::{commit, precommit, precommit_evaluations, prove, prove_low_degree};
pub use verifier::{verify, verify_low_degree};

/// Interpolant `U` and denominator `V` of one quotient `x^(deg V) (g - U) / V`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opening<F> {
    pub interpolant: Polynomial<F>,
    pub vanishing: Polynomial<F>,
}

impl<F: PrimeField> Opening<F> {
    /// `U = 0`, `V = 1`: the quotient is the committed polynomial itself.
    pub fn trivial() -> Self {
        Self {
            interpolant: Polynomial::zero(),
            vanishing: Polynomial::one(),
        }
    }

    /// `x^(deg V) (value - U(x)) / V(x)`, or `None` where `V` vanishes.
    pub(crate) fn quotient_at(&self, value: F, x: F) -> Option<F> {
        let denominator = self.vanishing.evaluate(x).inverse()?;
        let shift = x.pow([self.vanishing.degree() as u64]);
        Some((value - self.interpolant.evaluate(x)) * denominator * shift)
    }

    /// Multiplies `(g - U) / V` by `x^(deg V)`.
    pub(crate) fn shift_quotient(&self, quotient: &Polynomial<F>) -> Polynomial<F> {
        let mut coeffs = vec![F::zero(); self.vanishing.degree()];
        coeffs.extend_from_slice(quotient.coefficients());
        Polynomial::new(coeffs)
    }
}

/// Leaf `c` concatenates, for `k = 0..2^steps`, the encodings of every layer's
/// value at index `c + k·n/2^steps`.
pub(crate) fn build_leaves<F: PrimeField>(layers: &[&[F]], steps: usize) -> Vec<Vec<u8>> {
    let n = layers.first().map_or(0, |layer| layer.len());
    let leaf_count = n >> steps;
    (0..leaf_count)
        .map(|c| {
            let mut leaf = Vec::new();
            for k in 0..1usize << steps {
                for layer in layers {
                    leaf.extend_from_slice(&field_to_bytes(&layer[c + k * leaf_count]));
                }
            }
            leaf
        })
        .collect()
}

/// Leaf bytes of an initial coset opening, in the layout of [`build_leaves`].
pub(crate) fn initial_leaf_bytes<F: PrimeField>(values: &[Vec<F>]) -> Vec<u8> {
    let coset_size = values.first().map_or(0, |row| row.len());
    let mut leaf = Vec::new();
    for k in 0..coset_size {
        for row in values {
            leaf.extend_from_slice(&field_to_bytes(&row[k]));
        }
    }
    leaf
}

/// Marks the round-0 leaves whose coset avoids every root of every `V_j`.
pub(crate) fn admissible_leaves<F: PrimeField>(
    params: &FriParams<F>,
    openings: &[Opening<F>],
) -> Vec<bool> {
    let domain = params.initial_domain();
    let leaf_count = params.leaf_count(0);
    let mut admissible = vec![true; leaf_count];
    if openings.iter().all(|o| o.vanishing.degree() == 0) {
        return admissible;
    }
    for (idx, x) in domain.elements().into_iter().enumerate() {
        if openings.iter().any(|o| o.vanishing.evaluate(x).is_zero()) {
            admissible[idx % leaf_count] = false;
        }
    }
    admissible
}

/// Draws `params.lambda` query indices in `[0, |D0|)`, re-drawing any index
/// whose round-0 coset is not admissible.
pub(crate) fn sample_queries<F: PrimeField, H: Hasher>(
    transcript: &mut FiatShamirTranscript<H>,
    params: &FriParams<F>,
    admissible: &[bool],
) -> Result<Vec<usize>, FriError> {
    let domain_size = params.initial_domain().size;
    if !admissible.iter().any(|a| *a) {
        return Err(FriError::NoAdmissibleQuery(domain_size));
    }
    let leaf_count = admissible.len();
    let mut indices = Vec::with_capacity(params.lambda);
    while indices.len() < params.lambda {
        let index = transcript.int_challenge(domain_size);
        if admissible[index % leaf_count] {
            indices.push(index);
        } else {
            tracing::trace!(index, "query index hits a root of the denominator, re-sampling");
        }
    }
    Ok(indices)
}

/// Batching challenge powers `θ^j`; a single polynomial uses no challenge.
pub(crate) fn batching_powers<F: PrimeField, H: Hasher>(
    transcript: &mut FiatShamirTranscript<H>,
    batch_size: usize,
) -> Vec<F> {
    if batch_size <= 1 {
        return vec![F::one(); batch_size];
    }
    let theta: F = transcript.challenge();
    core::iter::successors(Some(F::one()), |p| Some(*p * theta))
        .take(batch_size)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ff::{One, Zero};

    type F = Fr;

    #[test]
    fn test_leaf_layout() {
        let a: Vec<F> = (0..8u64).map(F::from).collect();
        let b: Vec<F> = (100..108u64).map(F::from).collect();
        let leaves = build_leaves(&[a.as_slice(), b.as_slice()], 1);
        assert_eq!(leaves.len(), 4);
        // Leaf 1 holds indices 1 and 5 of both layers.
        let expected = initial_leaf_bytes(&[vec![a[1], a[5]], vec![b[1], b[5]]]);
        assert_eq!(leaves[1], expected);
        assert_eq!(leaves[1].len(), 4 * 32);
    }

    #[test]
    fn test_admissible_leaves() {
        let params = FriParams::<F>::new(3, 4, vec![1], 1).unwrap();
        let domain = params.initial_domain();
        let opening = Opening {
            interpolant: Polynomial::zero(),
            vanishing: Polynomial::vanishing(&[domain.get_domain_element(11)]),
        };
        let admissible = admissible_leaves(&params, &[opening]);
        assert_eq!(admissible.len(), 8);
        assert_eq!(admissible.iter().filter(|a| !**a).count(), 1);
        assert!(!admissible[3]);
        assert!(admissible_leaves(&params, &[Opening::trivial()]).iter().all(|a| *a));
    }

    #[test]
    fn test_sample_queries_skips_excluded_cosets() {
        let params = FriParams::<F>::new(3, 4, vec![1], 32).unwrap();
        let mut admissible = vec![false; 8];
        admissible[5] = true;
        let mut transcript = FiatShamirTranscript::<crate::hash::Sha256Hasher>::new(b"test");
        let indices = sample_queries(&mut transcript, &params, &admissible).unwrap();
        assert_eq!(indices.len(), 32);
        assert!(indices.iter().all(|i| i % 8 == 5));

        let none = vec![false; 8];
        assert_eq!(
            sample_queries(&mut transcript, &params, &none),
            Err(FriError::NoAdmissibleQuery(16))
        );
    }

    #[test]
    fn test_quotient_at() {
        let opening = Opening::<F> {
            interpolant: Polynomial::constant(F::from(3u64)),
            vanishing: Polynomial::new(vec![-F::one(), F::one()]),
        };
        // 3 · (11 - 3) / (3 - 1)
        assert_eq!(opening.quotient_at(F::from(11u64), F::from(3u64)), Some(F::from(12u64)));
        assert_eq!(opening.quotient_at(F::from(11u64), F::one()), None);

        let trivial = Opening::<F>::trivial();
        assert_eq!(trivial.quotient_at(F::from(11u64), F::from(3u64)), Some(F::from(11u64)));
    }

    #[test]
    fn test_shift_quotient_restores_degree() {
        let points = [F::from(2u64), F::from(5u64), F::from(9u64)];
        let opening = Opening {
            interpolant: Polynomial::zero(),
            vanishing: Polynomial::vanishing(&points),
        };
        let quotient = Polynomial::new(vec![F::from(4u64), F::one()]);
        let shifted = opening.shift_quotient(&quotient);
        assert_eq!(shifted.degree(), 4);
        assert_eq!(shifted.coefficients()[..3], [F::zero(); 3]);

        let x = F::from(7u64);
        let value = quotient.mul(&opening.vanishing).evaluate(x);
        assert_eq!(opening.quotient_at(value, x), Some(shifted.evaluate(x)));
        assert!(Opening::<F>::trivial().shift_quotient(&Polynomial::zero()).is_zero());
    }
}
