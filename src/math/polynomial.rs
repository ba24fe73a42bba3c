//! Dense univariate polynomial operations over prime fields.

use std::fmt;

use ark_ff::PrimeField;
use ark_poly::DenseUVPolynomial;
use ark_poly::univariate::DensePolynomial;

use crate::errors::PolynomialError;
use crate::math::domain::{EvaluationDomain, Radix2Domain};

/// Below this many coefficient products schoolbook multiplication beats the transform.
const SCHOOLBOOK_THRESHOLD: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Polynomial with finite field coefficients.
///
/// The polynomial is stored as a vector of coefficients, where the index represents
/// the power of x. For example, [1, 2, 3] represents 3x² + 2x + 1.
///
/// # Invariants
///
/// * The coefficients vector is never empty; the zero polynomial is `[0]`
/// * Apart from the zero polynomial, the last coefficient is non-zero
pub struct Polynomial<F> {
    /// Coefficients in ascending order of power.
    coefficients: Vec<F>,
}

impl<F: PrimeField> Polynomial<F> {
    /// Creates a new polynomial from coefficients.
    ///
    /// # Arguments
    ///
    /// * `coefficients` - The coefficients of the polynomial
    ///
    /// # Note
    ///
    /// Any trailing zeros in the coefficients vector will be removed. An empty or
    /// all-zero vector yields the canonical zero polynomial.
    pub fn new(mut coefficients: Vec<F>) -> Self {
        while coefficients.len() > 1 && coefficients.last().is_some_and(|x| x.is_zero()) {
            coefficients.pop();
        }
        if coefficients.is_empty() {
            coefficients.push(F::zero());
        }
        Self { coefficients }
    }

    /// Creates the zero polynomial.
    pub fn zero() -> Self {
        Self::new(vec![F::zero()])
    }

    pub fn one() -> Self {
        Self::constant(F::one())
    }

    pub fn constant(value: F) -> Self {
        Self::new(vec![value])
    }

    /// Creates a polynomial from an arkworks dense polynomial.
    pub fn from_dense_poly(poly: DensePolynomial<F>) -> Self {
        Self::new(poly.coeffs)
    }

    pub fn to_dense_poly(&self) -> DensePolynomial<F> {
        DensePolynomial::from_coefficients_slice(&self.coefficients)
    }

    /// Returns polynomial coefficients in ascending order of power.
    pub fn coefficients(&self) -> &[F] {
        &self.coefficients
    }

    pub fn into_coefficients(self) -> Vec<F> {
        self.coefficients
    }

    /// Returns the degree of the polynomial.
    ///
    /// The degree is the highest power of x with a non-zero coefficient.
    /// For the zero polynomial, the degree is 0.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Returns the coefficient of the highest power term, zero for the zero polynomial.
    pub fn leading_coefficient(&self) -> F {
        self.coefficients.last().copied().unwrap_or_else(F::zero)
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.len() == 1 && self.coefficients[0].is_zero()
    }

    fn is_constant(&self) -> bool {
        self.coefficients.len() == 1
    }

    /// Evaluates the polynomial at point x.
    ///
    /// # Details
    ///
    /// Evaluation is performed using Horner's method.
    pub fn evaluate(&self, x: F) -> F {
        self.coefficients
            .iter()
            .rev()
            .fold(F::zero(), |acc, &coeff| acc * x + coeff)
    }

    pub fn add(&self, other: &Self) -> Self {
        let (long, short) = if self.coefficients.len() >= other.coefficients.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut result = long.coefficients.clone();
        for (coeff, rhs) in result.iter_mut().zip(&short.coefficients) {
            *coeff += rhs;
        }
        Self::new(result)
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> Self {
        Self::new(self.coefficients.iter().map(|c| -*c).collect())
    }

    /// Multiplies every coefficient by `factor`.
    pub fn scale(&self, factor: F) -> Self {
        Self::new(self.coefficients.iter().map(|c| *c * factor).collect())
    }

    /// Multiplies two polynomials.
    ///
    /// # Details
    ///
    /// Large products go through a radix-2 transform of size at least
    /// `deg(self) + deg(other) + 1`, rounded up to a power of two. Constants
    /// short-circuit to a scaling, and small products or fields without a root
    /// of unity of the needed order use schoolbook multiplication.
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_constant() {
            return other.scale(self.coefficients[0]);
        }
        if other.is_constant() {
            return self.scale(other.coefficients[0]);
        }

        let result_len = self.degree() + other.degree() + 1;
        if self.coefficients.len() * other.coefficients.len() <= SCHOOLBOOK_THRESHOLD {
            return self.mul_schoolbook(other);
        }
        match Radix2Domain::<F>::new(result_len.next_power_of_two()) {
            Ok(domain) => self.mul_with_domain(other, &domain, result_len),
            Err(_) => self.mul_schoolbook(other),
        }
    }

    fn mul_with_domain(&self, other: &Self, domain: &Radix2Domain<F>, result_len: usize) -> Self {
        let mut lhs = self.coefficients.clone();
        lhs.resize(domain.size, F::zero());
        let mut rhs = other.coefficients.clone();
        rhs.resize(domain.size, F::zero());

        // Lengths match the domain by construction.
        if domain.transform(&mut lhs).is_err() || domain.transform(&mut rhs).is_err() {
            return self.mul_schoolbook(other);
        }
        for (l, r) in lhs.iter_mut().zip(&rhs) {
            *l *= r;
        }
        if domain.inverse_transform(&mut lhs).is_err() {
            return self.mul_schoolbook(other);
        }
        lhs.truncate(result_len);
        Self::new(lhs)
    }

    fn mul_schoolbook(&self, other: &Self) -> Self {
        let mut result = vec![F::zero(); self.degree() + other.degree() + 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in other.coefficients.iter().enumerate() {
                result[i + j] += *a * b;
            }
        }
        Self::new(result)
    }

    /// Divides this polynomial by another, returns (quotient, remainder).
    ///
    /// # Errors
    ///
    /// [`PolynomialError::DivisionByZero`] if the divisor is the zero polynomial.
    ///
    /// # Details
    ///
    /// The division is performed using the standard long division algorithm
    /// over the finite field. The remainder will have degree less than the divisor.
    pub fn divide(&self, divisor: &Self) -> Result<(Self, Self), PolynomialError> {
        if divisor.is_zero() {
            return Err(PolynomialError::DivisionByZero);
        }

        let divisor_degree = divisor.degree();
        let dividend_degree = self.degree();

        // If dividend degree is less than divisor degree, quotient is zero
        if dividend_degree < divisor_degree || self.is_zero() {
            return Ok((Self::zero(), self.clone()));
        }

        let lead_inv = divisor
            .leading_coefficient()
            .inverse()
            .ok_or(PolynomialError::DivisionByZero)?;
        let mut quotient = vec![F::zero(); dividend_degree - divisor_degree + 1];
        let mut remainder = self.coefficients.clone();

        for i in (0..=dividend_degree - divisor_degree).rev() {
            let leading_coeff = remainder[i + divisor_degree];
            if leading_coeff.is_zero() {
                continue;
            }

            quotient[i] = leading_coeff * lead_inv;

            // Subtract divisor * quotient term from remainder
            for (j, d) in divisor.coefficients.iter().enumerate() {
                remainder[i + j] -= quotient[i] * d;
            }
        }

        Ok((Self::new(quotient), Self::new(remainder)))
    }

    /// Synthetic division by `x - z`, returns (quotient, remainder) where the
    /// remainder is `self(z)`.
    pub fn divide_by_linear(&self, z: F) -> (Self, F) {
        if self.is_constant() {
            return (Self::zero(), self.coefficients[0]);
        }
        let n = self.coefficients.len();
        let mut quotient = vec![F::zero(); n - 1];
        let mut carry = self.coefficients[n - 1];
        for i in (0..n - 1).rev() {
            quotient[i] = carry;
            carry = self.coefficients[i] + carry * z;
        }
        (Self::new(quotient), carry)
    }

    /// `∏ (x - p)` over `points`; the empty product is one.
    pub fn vanishing(points: &[F]) -> Self {
        // Balanced product tree keeps the transform multiplications effective.
        fn product<F: PrimeField>(points: &[F]) -> Polynomial<F> {
            match points {
                [] => Polynomial::one(),
                [p] => Polynomial::new(vec![-*p, F::one()]),
                _ => {
                    let (left, right) = points.split_at(points.len() / 2);
                    product(left).mul(&product(right))
                }
            }
        }
        product(points)
    }

    /// Lagrange interpolation: the unique polynomial of degree below `points.len()`
    /// with `p(points[i]) = values[i]`.
    ///
    /// # Errors
    ///
    /// * [`PolynomialError::InterpolationLengthMismatch`] if the slices differ in length
    /// * [`PolynomialError::DuplicatePoint`] if two points coincide
    pub fn interpolate(points: &[F], values: &[F]) -> Result<Self, PolynomialError> {
        if points.len() != values.len() {
            return Err(PolynomialError::InterpolationLengthMismatch {
                points: points.len(),
                values: values.len(),
            });
        }
        if points.is_empty() {
            return Ok(Self::zero());
        }

        let full = Self::vanishing(points);
        let mut result = Self::zero();
        for (i, (&x_i, &y_i)) in points.iter().zip(values).enumerate() {
            // L_i(x) = V(x) / ((x - x_i) · V'(x_i))
            let (basis, _) = full.divide_by_linear(x_i);
            let denominator = basis.evaluate(x_i);
            let Some(denominator_inv) = denominator.inverse() else {
                return Err(PolynomialError::DuplicatePoint(i));
            };
            result = result.add(&basis.scale(y_i * denominator_inv));
        }
        Ok(result)
    }

    /// Evaluations over every point of `domain`.
    ///
    /// # Errors
    ///
    /// [`PolynomialError::DegreeTooLarge`] if the polynomial has at least
    /// `domain.size()` coefficients.
    pub fn evaluate_over_domain<D: EvaluationDomain<F>>(
        &self,
        domain: &D,
    ) -> Result<Vec<F>, PolynomialError> {
        if self.coefficients.len() > domain.size() {
            return Err(PolynomialError::DegreeTooLarge {
                degree: self.degree(),
                domain_size: domain.size(),
            });
        }
        let mut values = self.coefficients.clone();
        values.resize(domain.size(), F::zero());
        domain.transform(&mut values)?;
        Ok(values)
    }

    /// Inverse of [`Self::evaluate_over_domain`].
    pub fn from_evaluations<D: EvaluationDomain<F>>(
        domain: &D,
        evaluations: &[F],
    ) -> Result<Self, PolynomialError> {
        let mut values = evaluations.to_vec();
        domain.inverse_transform(&mut values)?;
        Ok(Self::new(values))
    }
}

impl<F: PrimeField> Default for Polynomial<F> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<F: PrimeField> fmt::Display for Polynomial<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self
            .coefficients
            .iter()
            .enumerate()
            .filter(|(_, coeff)| !coeff.is_zero())
            .map(|(i, coeff)| match i {
                0 => format!("{coeff}"),
                1 => format!("{coeff}x"),
                _ => format!("{coeff}x^{i}"),
            })
            .collect();

        if terms.is_empty() {
            write!(f, "0")
        } else {
            write!(f, "{}", terms.join(" + "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ff::{One, UniformRand, Zero};
    use ark_poly::Polynomial as _;
    use ark_std::test_rng;
    use proptest::prelude::*;

    type F = Fr;

    fn poly(coeffs: &[u64]) -> Polynomial<F> {
        Polynomial::new(coeffs.iter().map(|&c| F::from(c)).collect())
    }

    fn random_poly(len: usize, seed: u64) -> Polynomial<F> {
        use rand::{SeedableRng, rngs::StdRng};
        let mut rng = StdRng::seed_from_u64(seed);
        Polynomial::new((0..len).map(|_| F::rand(&mut rng)).collect())
    }

    #[test]
    fn test_canonical_zero() {
        assert_eq!(Polynomial::<F>::new(vec![]).coefficients(), &[F::zero()]);
        assert_eq!(poly(&[0, 0, 0]), Polynomial::zero());
        assert!(Polynomial::<F>::zero().is_zero());
        assert_eq!(Polynomial::<F>::zero().degree(), 0);
        assert_eq!(poly(&[1, 2, 0, 0]).coefficients().len(), 2);
    }

    #[test]
    fn test_evaluate() {
        // 3x² + 2x + 1 at x = 2
        assert_eq!(poly(&[1, 2, 3]).evaluate(F::from(2u64)), F::from(17u64));
        assert_eq!(Polynomial::<F>::zero().evaluate(F::from(9u64)), F::zero());
    }

    #[test]
    fn test_add_sub_cancel() {
        let a = poly(&[1, 2, 3]);
        let b = poly(&[4, 5, 3]);
        assert_eq!(a.sub(&a), Polynomial::zero());
        assert_eq!(a.sub(&poly(&[0, 0, 3])), poly(&[1, 2]));
        assert_eq!(a.add(&b).degree(), 2);
        assert_eq!(a.add(&a.neg()), Polynomial::zero());
    }

    #[test]
    fn test_mul_small() {
        // (x + 1)(x - 1) = x² - 1
        let a = poly(&[1, 1]);
        let b = Polynomial::new(vec![-F::one(), F::one()]);
        assert_eq!(a.mul(&b), Polynomial::new(vec![-F::one(), F::zero(), F::one()]));
        assert_eq!(a.mul(&Polynomial::zero()), Polynomial::zero());
        assert_eq!(a.mul(&Polynomial::constant(F::from(3u64))), poly(&[3, 3]));
    }

    #[test]
    fn test_mul_transform_matches_arkworks() {
        let a = random_poly(100, 1);
        let b = random_poly(37, 2);
        let expected = &a.to_dense_poly() * &b.to_dense_poly();
        assert_eq!(a.mul(&b), Polynomial::from_dense_poly(expected));
        assert_eq!(a.mul(&b).degree(), 135);
    }

    #[test]
    fn test_divide_exact() {
        let a = random_poly(20, 3);
        let b = random_poly(7, 4);
        let (q, r) = a.mul(&b).divide(&b).unwrap();
        assert_eq!(q, a);
        assert!(r.is_zero());
    }

    #[test]
    fn test_divide_with_remainder() {
        let a = random_poly(12, 5);
        let b = random_poly(5, 6);
        let (q, r) = a.divide(&b).unwrap();
        assert!(r.degree() < b.degree());
        assert_eq!(q.mul(&b).add(&r), a);

        let (q, r) = b.divide(&a).unwrap();
        assert!(q.is_zero());
        assert_eq!(r, b);
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            poly(&[1, 2]).divide(&Polynomial::zero()),
            Err(PolynomialError::DivisionByZero)
        );
    }

    #[test]
    fn test_divide_by_linear() {
        let a = random_poly(9, 7);
        let z = F::from(11u64);
        let (q, r) = a.divide_by_linear(z);
        assert_eq!(r, a.evaluate(z));
        let linear = Polynomial::new(vec![-z, F::one()]);
        assert_eq!(q.mul(&linear).add(&Polynomial::constant(r)), a);
    }

    #[test]
    fn test_vanishing() {
        let points: Vec<F> = (1..=5u64).map(F::from).collect();
        let v = Polynomial::vanishing(&points);
        assert_eq!(v.degree(), 5);
        assert_eq!(v.leading_coefficient(), F::one());
        for p in &points {
            assert!(v.evaluate(*p).is_zero());
        }
        assert!(!v.evaluate(F::from(6u64)).is_zero());
        assert_eq!(Polynomial::<F>::vanishing(&[]), Polynomial::one());
    }

    #[test]
    fn test_interpolate() {
        let points: Vec<F> = [3u64, 9, 27, 81].map(F::from).to_vec();
        let target = poly(&[5, 0, 7, 1]);
        let values: Vec<F> = points.iter().map(|p| target.evaluate(*p)).collect();
        assert_eq!(Polynomial::interpolate(&points, &values).unwrap(), target);

        let single = Polynomial::interpolate(&points[..1], &values[..1]).unwrap();
        assert_eq!(single, Polynomial::constant(values[0]));
    }

    #[test]
    fn test_interpolate_errors() {
        let points = [F::from(1u64), F::from(2u64), F::from(1u64)];
        let values = [F::one(); 3];
        assert_eq!(
            Polynomial::interpolate(&points, &values[..2]),
            Err(PolynomialError::InterpolationLengthMismatch { points: 3, values: 2 })
        );
        assert!(matches!(
            Polynomial::interpolate(&points, &values),
            Err(PolynomialError::DuplicatePoint(_))
        ));
    }

    #[test]
    fn test_domain_round_trip() {
        let domain = Radix2Domain::<F>::new(16).unwrap();
        let p = random_poly(10, 8);
        let evals = p.evaluate_over_domain(&domain).unwrap();
        for (i, e) in evals.iter().enumerate() {
            assert_eq!(*e, p.evaluate(domain.get_domain_element(i)));
        }
        assert_eq!(Polynomial::from_evaluations(&domain, &evals).unwrap(), p);
        assert!(random_poly(17, 9).evaluate_over_domain(&domain).is_err());
    }

    #[test]
    fn test_dense_interop() {
        let mut rng = test_rng();
        let dense = DensePolynomial::<F>::rand(8, &mut rng);
        let p = Polynomial::from_dense_poly(dense.clone());
        let x = F::rand(&mut rng);
        assert_eq!(p.evaluate(x), dense.evaluate(&x));
        assert_eq!(p.to_dense_poly(), dense);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", poly(&[1, 0, 3])), "1 + 3x^2");
        assert_eq!(format!("{}", Polynomial::<F>::zero()), "0");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_ring_laws(len_a in 1usize..40, len_b in 1usize..40, len_c in 1usize..10, seed in any::<u64>()) {
            let a = random_poly(len_a, seed);
            let b = random_poly(len_b, seed.wrapping_add(1));
            let c = random_poly(len_c, seed.wrapping_add(2));

            prop_assert_eq!(a.mul(&b), b.mul(&a));
            prop_assert_eq!(a.add(&b), b.add(&a));
            prop_assert_eq!(a.mul(&b.add(&c)), a.mul(&b).add(&a.mul(&c)));
            prop_assert_eq!(a.mul(&Polynomial::one()), a.clone());
            prop_assert_eq!(a.add(&Polynomial::zero()), a);
        }

        #[test]
        fn prop_mul_evaluates_pointwise(len_a in 1usize..80, len_b in 1usize..80, seed in any::<u64>(), x in any::<u64>()) {
            let a = random_poly(len_a, seed);
            let b = random_poly(len_b, seed ^ 0xdead);
            let x = F::from(x);
            prop_assert_eq!(a.mul(&b).evaluate(x), a.evaluate(x) * b.evaluate(x));
        }
    }
}
