//! Evaluation domains: finite point sets with fast transforms between the
//! coefficient basis and evaluations over the set.

use std::fmt::Debug;

use ark_ff::PrimeField;
use tracing::instrument;

use crate::errors::DomainError;
use crate::math::polynomial::Polynomial;

mod arithmetic;
mod geometric;
mod radix2;
mod sequence;
mod step_radix2;

pub use arithmetic::ArithmeticSequenceDomain;
pub use geometric::GeometricSequenceDomain;
pub use radix2::Radix2Domain;
pub use step_radix2::StepRadix2Domain;

/// Capabilities shared by every evaluation domain of size `m` over `F`.
///
/// `transform` maps `m` coefficients (ascending powers) to the evaluations at the
/// domain points in index order and `inverse_transform` maps them back. All
/// slice-taking operations require a length of exactly `m`.
pub trait EvaluationDomain<F: PrimeField>: Clone + Debug + Send + Sync {
    fn size(&self) -> usize;

    fn transform(&self, values: &mut [F]) -> Result<(), DomainError>;

    fn inverse_transform(&self, values: &mut [F]) -> Result<(), DomainError>;

    /// `[L_0(t), …, L_{m-1}(t)]` for the Lagrange basis of the domain.
    fn evaluate_all_lagrange_polynomials(&self, t: F) -> Vec<F>;

    /// `Z(t)` where `Z` is the monic polynomial vanishing on the domain.
    fn compute_vanishing_polynomial(&self, t: F) -> F;

    fn get_domain_element(&self, idx: usize) -> F;

    /// Adds `coeff · Z(x)` to the coefficient vector `h` of length `m + 1`.
    fn add_poly_z(&self, coeff: F, h: &mut [F]) -> Result<(), DomainError>;

    /// Divides evaluations over the shifted domain `g · x_i` (with
    /// `g = F::GENERATOR`) by `Z(g · x_i)`.
    ///
    /// Sequence domains override this to divide every value by the constant
    /// `Z(s)` at their `coset_shift` `s`, since `g · x_0` can be a domain point.
    fn divide_by_z_on_coset(&self, values: &mut [F]) -> Result<(), DomainError> {
        self.check_length(values.len())?;
        let mut denominators: Vec<F> = (0..self.size())
            .map(|i| self.compute_vanishing_polynomial(F::GENERATOR * self.get_domain_element(i)))
            .collect();
        if let Some(idx) = denominators.iter().position(|d| d.is_zero()) {
            return Err(DomainError::VanishesOnCoset(idx));
        }
        ark_ff::batch_inversion(&mut denominators);
        for (v, d) in values.iter_mut().zip(denominators) {
            *v *= d;
        }
        Ok(())
    }

    fn elements(&self) -> Vec<F> {
        (0..self.size()).map(|i| self.get_domain_element(i)).collect()
    }

    /// The vanishing polynomial `Z` in coefficient form.
    fn vanishing_polynomial(&self) -> Result<Polynomial<F>, DomainError> {
        let mut coeffs = vec![F::zero(); self.size() + 1];
        self.add_poly_z(F::one(), &mut coeffs)?;
        Ok(Polynomial::new(coeffs))
    }

    /// Evaluates the polynomial with coefficients `values` over `g · x_i`.
    fn coset_transform(&self, values: &mut [F]) -> Result<(), DomainError> {
        self.check_length(values.len())?;
        distribute_powers(values, F::GENERATOR);
        self.transform(values)
    }

    /// Inverse of [`Self::coset_transform`].
    fn inverse_coset_transform(&self, values: &mut [F]) -> Result<(), DomainError> {
        self.inverse_transform(values)?;
        let g_inv = F::GENERATOR
            .inverse()
            .ok_or(DomainError::VanishesOnCoset(0))?;
        distribute_powers(values, g_inv);
        Ok(())
    }

    fn check_length(&self, actual: usize) -> Result<(), DomainError> {
        if actual != self.size() {
            return Err(DomainError::LengthMismatch {
                expected: self.size(),
                actual,
            });
        }
        Ok(())
    }
}

/// Multiplies `values[i]` by `g^i`.
fn distribute_powers<F: PrimeField>(values: &mut [F], g: F) {
    let mut power = F::one();
    for v in values.iter_mut() {
        *v *= power;
        power *= g;
    }
}

/// Closed set of domain shapes; every capability is forwarded by `match`.
#[derive(Clone, Debug)]
pub enum GeneralEvaluationDomain<F: PrimeField> {
    Radix2(Radix2Domain<F>),
    StepRadix2(StepRadix2Domain<F>),
    ArithmeticSequence(ArithmeticSequenceDomain<F>),
    GeometricSequence(GeometricSequenceDomain<F>),
}

macro_rules! dispatch {
    ($self:expr, $d:ident => $body:expr) => {
        match $self {
            GeneralEvaluationDomain::Radix2($d) => $body,
            GeneralEvaluationDomain::StepRadix2($d) => $body,
            GeneralEvaluationDomain::ArithmeticSequence($d) => $body,
            GeneralEvaluationDomain::GeometricSequence($d) => $body,
        }
    };
}

impl<F: PrimeField> GeneralEvaluationDomain<F> {
    /// Picks the first shape that can host `size` points, trying in order
    /// radix-2, step radix-2, geometric sequence and arithmetic sequence.
    #[instrument(skip_all, fields(size = size))]
    pub fn new(size: usize) -> Result<Self, DomainError> {
        if size <= 1 {
            return Err(DomainError::TooSmall(size));
        }
        if let Ok(domain) = Radix2Domain::new(size) {
            return Ok(Self::Radix2(domain));
        }
        if let Ok(domain) = StepRadix2Domain::new(size) {
            return Ok(Self::StepRadix2(domain));
        }
        if let Ok(domain) = GeometricSequenceDomain::new(size) {
            return Ok(Self::GeometricSequence(domain));
        }
        if let Ok(domain) = ArithmeticSequenceDomain::new(size) {
            return Ok(Self::ArithmeticSequence(domain));
        }
        tracing::debug!(size, "no evaluation domain shape fits");
        Err(DomainError::Unsupported(size))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Radix2(_) => "radix2",
            Self::StepRadix2(_) => "step_radix2",
            Self::ArithmeticSequence(_) => "arithmetic_sequence",
            Self::GeometricSequence(_) => "geometric_sequence",
        }
    }
}

impl<F: PrimeField> EvaluationDomain<F> for GeneralEvaluationDomain<F> {
    fn size(&self) -> usize {
        dispatch!(self, d => d.size())
    }

    fn transform(&self, values: &mut [F]) -> Result<(), DomainError> {
        dispatch!(self, d => d.transform(values))
    }

    fn inverse_transform(&self, values: &mut [F]) -> Result<(), DomainError> {
        dispatch!(self, d => d.inverse_transform(values))
    }

    fn evaluate_all_lagrange_polynomials(&self, t: F) -> Vec<F> {
        dispatch!(self, d => d.evaluate_all_lagrange_polynomials(t))
    }

    fn compute_vanishing_polynomial(&self, t: F) -> F {
        dispatch!(self, d => d.compute_vanishing_polynomial(t))
    }

    fn get_domain_element(&self, idx: usize) -> F {
        dispatch!(self, d => d.get_domain_element(idx))
    }

    fn add_poly_z(&self, coeff: F, h: &mut [F]) -> Result<(), DomainError> {
        dispatch!(self, d => d.add_poly_z(coeff, h))
    }

    fn divide_by_z_on_coset(&self, values: &mut [F]) -> Result<(), DomainError> {
        dispatch!(self, d => d.divide_by_z_on_coset(values))
    }

    fn elements(&self) -> Vec<F> {
        dispatch!(self, d => d.elements())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ff::{FftField, One, UniformRand, Zero};
    use ark_std::test_rng;

    type F = Fr;

    #[test]
    fn test_selection_order() {
        assert_eq!(GeneralEvaluationDomain::<F>::new(8).unwrap().kind(), "radix2");
        assert_eq!(GeneralEvaluationDomain::<F>::new(6).unwrap().kind(), "step_radix2");
        assert_eq!(GeneralEvaluationDomain::<F>::new(3).unwrap().kind(), "step_radix2");
        assert_eq!(
            GeneralEvaluationDomain::<F>::new(7).unwrap().kind(),
            "geometric_sequence"
        );
        assert_eq!(GeneralEvaluationDomain::<F>::new(1).err(), Some(DomainError::TooSmall(1)));
    }

    #[test]
    fn test_round_trip_every_size() {
        let mut rng = test_rng();
        for m in 2..=20 {
            let domain = GeneralEvaluationDomain::<F>::new(m).unwrap();
            assert_eq!(domain.size(), m);
            let coeffs: Vec<F> = (0..m).map(|_| F::rand(&mut rng)).collect();
            let mut values = coeffs.clone();
            domain.transform(&mut values).unwrap();
            let poly = Polynomial::new(coeffs.clone());
            for (i, v) in values.iter().enumerate() {
                assert_eq!(*v, poly.evaluate(domain.get_domain_element(i)), "m = {m}");
            }
            domain.inverse_transform(&mut values).unwrap();
            assert_eq!(values, coeffs, "m = {m}");
        }
    }

    #[test]
    fn test_lagrange_outside_domain() {
        let mut rng = test_rng();
        for m in [4usize, 6, 7, 12] {
            let domain = GeneralEvaluationDomain::<F>::new(m).unwrap();
            let coeffs: Vec<F> = (0..m).map(|_| F::rand(&mut rng)).collect();
            let mut evals = coeffs.clone();
            domain.transform(&mut evals).unwrap();

            let t = F::rand(&mut rng);
            let lagrange = domain.evaluate_all_lagrange_polynomials(t);
            let interpolated: F = lagrange.iter().zip(&evals).map(|(l, e)| *l * e).sum();
            assert_eq!(interpolated, Polynomial::new(coeffs).evaluate(t), "m = {m}");
        }
    }

    #[test]
    fn test_lagrange_inside_domain_is_unit_vector() {
        for m in [8usize, 6, 7] {
            let domain = GeneralEvaluationDomain::<F>::new(m).unwrap();
            for idx in 0..m {
                let lagrange = domain.evaluate_all_lagrange_polynomials(domain.get_domain_element(idx));
                for (j, l) in lagrange.iter().enumerate() {
                    assert_eq!(*l, if j == idx { F::one() } else { F::zero() });
                }
            }
        }
    }

    #[test]
    fn test_vanishing_polynomial_agrees_with_points() {
        for m in [8usize, 6, 5, 7] {
            let domain = GeneralEvaluationDomain::<F>::new(m).unwrap();
            let z = domain.vanishing_polynomial().unwrap();
            assert_eq!(z.degree(), m);
            assert_eq!(z, Polynomial::vanishing(&domain.elements()));
            let t = F::from(1234u64);
            assert_eq!(z.evaluate(t), domain.compute_vanishing_polynomial(t));
        }
    }

    #[test]
    fn test_coset_transform_round_trip() {
        let mut rng = test_rng();
        for m in [8usize, 6] {
            let domain = GeneralEvaluationDomain::<F>::new(m).unwrap();
            let coeffs: Vec<F> = (0..m).map(|_| F::rand(&mut rng)).collect();
            let mut values = coeffs.clone();
            domain.coset_transform(&mut values).unwrap();
            let poly = Polynomial::new(coeffs.clone());
            assert_eq!(values[1], poly.evaluate(F::GENERATOR * domain.get_domain_element(1)));
            domain.inverse_coset_transform(&mut values).unwrap();
            assert_eq!(values, coeffs);
        }
    }

    #[test]
    fn test_divide_by_z_on_coset() {
        for m in [8usize, 6] {
            let domain = GeneralEvaluationDomain::<F>::new(m).unwrap();
            let mut values = vec![F::one(); m];
            domain.divide_by_z_on_coset(&mut values).unwrap();
            for (i, v) in values.iter().enumerate() {
                let shifted = F::GENERATOR * domain.get_domain_element(i);
                assert_eq!(*v * domain.compute_vanishing_polynomial(shifted), F::one());
            }
            assert!(domain.divide_by_z_on_coset(&mut vec![F::one(); m + 1]).is_err());
        }
    }
}
