use ark_ff::PrimeField;

use super::EvaluationDomain;
use super::radix2::{radix2_fft, radix2_lagrange_coefficients, scale};
use crate::errors::DomainError;

/// Domain of size `m = big_m + small_m` made of the subgroup of order `big_m`
/// followed by a coset `omega · <small_omega>` of a subgroup of order `small_m`.
///
/// `big_m = 2^(ceil(log2 m) - 1)` and `small_m` must be a power of two.
/// `omega` has order `2 · big_m` and the big subgroup is generated by `omega²`,
/// so the two parts never intersect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StepRadix2Domain<F> {
    pub size: usize,
    pub big_m: usize,
    pub small_m: usize,
    pub omega: F,
    pub big_omega: F,
    pub small_omega: F,
    omega_inv: F,
    big_omega_inv: F,
    small_omega_inv: F,
    big_m_inv: F,
    small_m_inv: F,
    two_inv: F,
}

impl<F: PrimeField> StepRadix2Domain<F> {
    pub fn new(size: usize) -> Result<Self, DomainError> {
        if size <= 1 {
            return Err(DomainError::TooSmall(size));
        }
        let big_m = size.next_power_of_two() / 2;
        let small_m = size - big_m;
        if !small_m.is_power_of_two() {
            return Err(DomainError::SmallSubdomainNotPowerOfTwo { size, small_m });
        }

        let no_root = || DomainError::NoRootOfUnity(size);
        let omega = F::get_root_of_unity(2 * big_m as u64).ok_or_else(no_root)?;
        let small_omega = F::get_root_of_unity(small_m as u64).ok_or_else(no_root)?;
        let big_omega = omega.square();

        Ok(Self {
            size,
            big_m,
            small_m,
            omega,
            big_omega,
            small_omega,
            omega_inv: omega.inverse().ok_or_else(no_root)?,
            big_omega_inv: big_omega.inverse().ok_or_else(no_root)?,
            small_omega_inv: small_omega.inverse().ok_or_else(no_root)?,
            big_m_inv: F::from(big_m as u64).inverse().ok_or_else(no_root)?,
            small_m_inv: F::from(small_m as u64).inverse().ok_or_else(no_root)?,
            two_inv: F::from(2u64).inverse().ok_or_else(no_root)?,
        })
    }

    /// `omega^small_m`, the constant of the coset factor `x^small_m - omega^small_m`.
    fn shift_power(&self) -> F {
        self.omega.pow([self.small_m as u64])
    }
}

impl<F: PrimeField> EvaluationDomain<F> for StepRadix2Domain<F> {
    fn size(&self) -> usize {
        self.size
    }

    fn transform(&self, values: &mut [F]) -> Result<(), DomainError> {
        self.check_length(values.len())?;
        let (big_m, small_m) = (self.big_m, self.small_m);

        // On the big subgroup x^big_m = 1, on the coset x^big_m = -1.
        let mut c = Vec::with_capacity(big_m);
        let mut d = Vec::with_capacity(big_m);
        let mut omega_i = F::one();
        for i in 0..big_m {
            let (lo, hi) = if i < small_m {
                (values[i], values[i + big_m])
            } else {
                (values[i], F::zero())
            };
            c.push(lo + hi);
            d.push(omega_i * (lo - hi));
            omega_i *= self.omega;
        }

        let mut e = vec![F::zero(); small_m];
        for (i, d_i) in d.iter().enumerate() {
            e[i % small_m] += d_i;
        }

        radix2_fft(&mut c, self.big_omega);
        radix2_fft(&mut e, self.small_omega);

        values[..big_m].copy_from_slice(&c);
        values[big_m..].copy_from_slice(&e);
        Ok(())
    }

    fn inverse_transform(&self, values: &mut [F]) -> Result<(), DomainError> {
        self.check_length(values.len())?;
        let (big_m, small_m) = (self.big_m, self.small_m);

        let mut u0 = values[..big_m].to_vec();
        radix2_fft(&mut u0, self.big_omega_inv);
        scale(&mut u0, self.big_m_inv);

        let mut u1 = values[big_m..].to_vec();
        radix2_fft(&mut u1, self.small_omega_inv);
        scale(&mut u1, self.small_m_inv);

        // Strip the contributions of the coefficients that have no partner above big_m.
        let mut omega_i = F::one();
        let mut tmp = Vec::with_capacity(big_m);
        for u in &u0 {
            tmp.push(omega_i * u);
            omega_i *= self.omega;
        }
        for (i, t) in tmp.iter().enumerate().skip(small_m) {
            u1[i % small_m] -= t;
        }

        let mut omega_inv_i = F::one();
        for u in u1.iter_mut() {
            *u *= omega_inv_i;
            omega_inv_i *= self.omega_inv;
        }

        for i in 0..small_m {
            values[i] = (u0[i] + u1[i]) * self.two_inv;
            values[i + big_m] = (u0[i] - u1[i]) * self.two_inv;
        }
        values[small_m..big_m].copy_from_slice(&u0[small_m..]);
        Ok(())
    }

    fn evaluate_all_lagrange_polynomials(&self, t: F) -> Vec<F> {
        if let Some(idx) = (0..self.size).find(|&i| self.get_domain_element(i) == t) {
            let mut unit = vec![F::zero(); self.size];
            unit[idx] = F::one();
            return unit;
        }

        let shift = self.shift_power();
        let mut result = Vec::with_capacity(self.size);

        // Big subgroup: L_i(t) · (t^small_m - w^small_m) / (x_i^small_m - w^small_m)
        let inner_big = radix2_lagrange_coefficients(self.big_m, self.big_omega, t);
        let coset_factor = t.pow([self.small_m as u64]) - shift;
        let big_omega_sm = self.big_omega.pow([self.small_m as u64]);
        let mut denominators = Vec::with_capacity(self.big_m);
        let mut x_sm = F::one();
        for _ in 0..self.big_m {
            denominators.push(x_sm - shift);
            x_sm *= big_omega_sm;
        }
        ark_ff::batch_inversion(&mut denominators);
        for (l, d) in inner_big.iter().zip(&denominators) {
            result.push(*l * coset_factor * d);
        }

        // Coset: L_j(t / omega) · (t^big_m - 1) / (omega^big_m - 1)
        let inner_small =
            radix2_lagrange_coefficients(self.small_m, self.small_omega, t * self.omega_inv);
        let subgroup_factor = (t.pow([self.big_m as u64]) - F::one())
            * (self.omega.pow([self.big_m as u64]) - F::one())
                .inverse()
                .unwrap_or_else(F::zero);
        result.extend(inner_small.iter().map(|l| *l * subgroup_factor));
        result
    }

    fn compute_vanishing_polynomial(&self, t: F) -> F {
        (t.pow([self.big_m as u64]) - F::one()) * (t.pow([self.small_m as u64]) - self.shift_power())
    }

    fn get_domain_element(&self, idx: usize) -> F {
        if idx < self.big_m {
            self.big_omega.pow([idx as u64])
        } else {
            self.omega * self.small_omega.pow([(idx - self.big_m) as u64])
        }
    }

    fn add_poly_z(&self, coeff: F, h: &mut [F]) -> Result<(), DomainError> {
        if h.len() != self.size + 1 {
            return Err(DomainError::LengthMismatch {
                expected: self.size + 1,
                actual: h.len(),
            });
        }
        // Z(x) = x^m - w^small_m·x^big_m - x^small_m + w^small_m
        let shift = self.shift_power();
        h[self.size] += coeff;
        h[self.big_m] -= coeff * shift;
        h[self.small_m] -= coeff;
        h[0] += coeff * shift;
        Ok(())
    }
}
