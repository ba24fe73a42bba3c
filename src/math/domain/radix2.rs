use ark_ff::{Field, PrimeField};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::EvaluationDomain;
use crate::errors::DomainError;

/// Multiplicative subgroup of power-of-two order `m`, generated by a primitive
/// `m`-th root of unity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Radix2Domain<F> {
    /// The size of the domain.
    pub size: usize,
    /// `log_2(self.size)`.
    pub log_size: u32,
    /// A generator of the subgroup.
    pub group_gen: F,
    /// Inverse of the generator of the subgroup.
    pub group_gen_inv: F,
    /// Inverse of the size in the field.
    pub size_inv: F,
}

impl<F: PrimeField> Radix2Domain<F> {
    pub fn new(size: usize) -> Result<Self, DomainError> {
        if size <= 1 {
            return Err(DomainError::TooSmall(size));
        }
        if !size.is_power_of_two() {
            return Err(DomainError::NotPowerOfTwo(size));
        }
        let group_gen =
            F::get_root_of_unity(size as u64).ok_or(DomainError::NoRootOfUnity(size))?;
        debug_assert_eq!(group_gen.pow([size as u64]), F::one());

        let group_gen_inv = group_gen
            .inverse()
            .ok_or(DomainError::NoRootOfUnity(size))?;
        let size_inv = F::from(size as u64)
            .inverse()
            .ok_or(DomainError::NoRootOfUnity(size))?;

        Ok(Self {
            size,
            log_size: size.trailing_zeros(),
            group_gen,
            group_gen_inv,
            size_inv,
        })
    }

    /// The subgroup of order `size / 2^steps`, generated by `group_gen^(2^steps)`.
    pub fn square(&self, steps: usize) -> Result<Self, DomainError> {
        let factor = u32::try_from(steps)
            .ok()
            .and_then(|steps| 1usize.checked_shl(steps))
            .ok_or(DomainError::TooSmall(0))?;
        let size = self.size / factor;
        if size <= 1 {
            return Err(DomainError::TooSmall(size));
        }
        let mut group_gen = self.group_gen;
        let mut group_gen_inv = self.group_gen_inv;
        for _ in 0..steps {
            group_gen.square_in_place();
            group_gen_inv.square_in_place();
        }
        let size_inv = self.size_inv * F::from(factor as u64);
        Ok(Self {
            size,
            log_size: size.trailing_zeros(),
            group_gen,
            group_gen_inv,
            size_inv,
        })
    }
}

impl<F: PrimeField> EvaluationDomain<F> for Radix2Domain<F> {
    fn size(&self) -> usize {
        self.size
    }

    fn transform(&self, values: &mut [F]) -> Result<(), DomainError> {
        self.check_length(values.len())?;
        radix2_fft(values, self.group_gen);
        Ok(())
    }

    fn inverse_transform(&self, values: &mut [F]) -> Result<(), DomainError> {
        self.check_length(values.len())?;
        radix2_fft(values, self.group_gen_inv);
        scale(values, self.size_inv);
        Ok(())
    }

    fn evaluate_all_lagrange_polynomials(&self, t: F) -> Vec<F> {
        radix2_lagrange_coefficients(self.size, self.group_gen, t)
    }

    fn compute_vanishing_polynomial(&self, t: F) -> F {
        t.pow([self.size as u64]) - F::one()
    }

    fn get_domain_element(&self, idx: usize) -> F {
        self.group_gen.pow([idx as u64])
    }

    fn add_poly_z(&self, coeff: F, h: &mut [F]) -> Result<(), DomainError> {
        if h.len() != self.size + 1 {
            return Err(DomainError::LengthMismatch {
                expected: self.size + 1,
                actual: h.len(),
            });
        }
        // Z(x) = x^m - 1
        h[self.size] += coeff;
        h[0] -= coeff;
        Ok(())
    }

    fn divide_by_z_on_coset(&self, values: &mut [F]) -> Result<(), DomainError> {
        self.check_length(values.len())?;
        // Z is constant on the coset: (g·w^i)^m - 1 = g^m - 1.
        let z_inv = self
            .compute_vanishing_polynomial(F::GENERATOR)
            .inverse()
            .ok_or(DomainError::VanishesOnCoset(0))?;
        scale(values, z_inv);
        Ok(())
    }
}

/// Multiplies every entry by `factor`.
pub(crate) fn scale<F: Field>(values: &mut [F], factor: F) {
    ark_std::cfg_iter_mut!(values).for_each(|v| *v *= factor);
}

#[inline]
fn bit_reverse(mut x: usize, log_n: u32) -> usize {
    let mut result = 0;
    for _ in 0..log_n {
        result = (result << 1) | (x & 1);
        x >>= 1;
    }
    result
}

/// In-place Cooley-Tukey FFT over the subgroup generated by `omega`, whose
/// order must equal `values.len()` (a power of two, possibly 1).
pub(crate) fn radix2_fft<F: Field>(values: &mut [F], omega: F) {
    let n = values.len();
    debug_assert!(n.is_power_of_two(), "FFT size must be power of 2");
    if n <= 1 {
        return;
    }
    let log_n = n.trailing_zeros();

    for i in 0..n {
        let j = bit_reverse(i, log_n);
        if i < j {
            values.swap(i, j);
        }
    }

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let w_len = omega.pow([(n / len) as u64]);
        let twiddles: Vec<F> = core::iter::successors(Some(F::one()), |w| Some(*w * w_len))
            .take(half)
            .collect();

        ark_std::cfg_chunks_mut!(values, len).for_each(|chunk| {
            let (lo, hi) = chunk.split_at_mut(half);
            for ((u, v), w) in lo.iter_mut().zip(hi.iter_mut()).zip(&twiddles) {
                let t = *v * w;
                *v = *u - t;
                *u += t;
            }
        });
        len *= 2;
    }
}

/// Values `L_i(t)` of the Lagrange basis of the subgroup of order `m` generated by `omega`.
///
/// If `t` is a subgroup element the unit vector at its index is returned
/// without touching the vanishing factor.
pub(crate) fn radix2_lagrange_coefficients<F: Field>(m: usize, omega: F, t: F) -> Vec<F> {
    if m == 1 {
        return vec![F::one()];
    }
    let mut u = vec![F::zero(); m];
    let z = t.pow([m as u64]) - F::one();

    if z.is_zero() {
        let mut omega_i = F::one();
        for slot in u.iter_mut() {
            if omega_i == t {
                *slot = F::one();
                break;
            }
            omega_i *= omega;
        }
        return u;
    }

    // L_i(t) = Z(t) · w^i / (m · (t - w^i))
    let mut denominators = Vec::with_capacity(m);
    let mut r = F::one();
    for _ in 0..m {
        denominators.push(t - r);
        r *= omega;
    }
    ark_ff::batch_inversion(&mut denominators);

    let mut l = z * F::from(m as u64).inverse().unwrap_or_else(F::zero);
    for (slot, d) in u.iter_mut().zip(denominators) {
        *slot = l * d;
        l *= omega;
    }
    u
}
