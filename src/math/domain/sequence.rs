//! Transforms for domains given by an explicit point sequence `x_0, …, x_{m-1}`.
//!
//! Coefficients are converted to the Newton basis `N_k(x) = ∏_{j<k} (x - x_j)`
//! with a subproduct tree, and Newton coefficients are turned into evaluations
//! with a single convolution. The convolution works whenever the basis values
//! factor as `N_k(x_i) = w_k · [i]! / [i-k]!`, which holds for arithmetic and
//! geometric progressions.
//!
//! Every division down the tree goes through a power-series inverse of the
//! reversed divisor, so both directions cost `O(M(m) log m)` where `M` is the
//! cost of [`Polynomial::mul`].

use ark_ff::PrimeField;
use tracing::instrument;

use crate::errors::DomainError;
use crate::math::polynomial::Polynomial;

#[derive(Clone, Debug)]
pub(crate) struct SequenceTables<F> {
    pub(crate) points: Vec<F>,
    /// Heap-indexed subproduct tree, root at index 1. Node `idx` covering
    /// `[lo, hi)` holds `∏_{lo <= j < hi} (x - x_j)`.
    tree: Vec<Vec<F>>,
    /// For an inner node `idx` split at `mid`, the inverse of the reversed left
    /// child modulo `x^(hi - mid)`.
    divisor_inverses: Vec<Vec<F>>,
    factorials: Vec<F>,
    factorials_inv: Vec<F>,
    newton_weights: Vec<F>,
    newton_weights_inv: Vec<F>,
    /// `T_n = 1 / [n]!`.
    series: Vec<F>,
    /// Power-series inverse of `series`.
    series_inv: Vec<F>,
    /// `1 / ∏_{j != i} (x_i - x_j)`.
    barycentric_weights: Vec<F>,
    /// First of `GENERATOR, GENERATOR + 1, …` outside the point set.
    coset_shift: F,
    /// `1 / Z(coset_shift)`.
    z_inv_at_shift: F,
}

impl<F: PrimeField> SequenceTables<F> {
    /// `factorials[n]` is `[n]!` and `newton_weights[k]` is `w_k`; a zero
    /// factorial means two points coincide.
    #[instrument(skip_all, fields(size = points.len()))]
    pub(crate) fn new(
        points: Vec<F>,
        factorials: Vec<F>,
        newton_weights: Vec<F>,
    ) -> Result<Self, DomainError> {
        let m = points.len();
        if m <= 1 {
            return Err(DomainError::TooSmall(m));
        }
        if let Some(n) = factorials.iter().position(|f| f.is_zero()) {
            return Err(DomainError::RepeatedPoint(n));
        }

        let mut factorials_inv = factorials.clone();
        ark_ff::batch_inversion(&mut factorials_inv);
        let mut newton_weights_inv = newton_weights.clone();
        if newton_weights_inv.iter().any(|w| w.is_zero()) {
            return Err(DomainError::ZeroGenerator);
        }
        ark_ff::batch_inversion(&mut newton_weights_inv);

        let series = factorials_inv.clone();
        let series_inv = invert_series(&series, m);

        let mut tree = vec![Vec::new(); 4 * m];
        let mut divisor_inverses = vec![Vec::new(); 4 * m];
        build_subproduct_tree(&mut tree, &mut divisor_inverses, &points, 1, 0, m);

        let mut tables = Self {
            points,
            tree,
            divisor_inverses,
            factorials,
            factorials_inv,
            newton_weights,
            newton_weights_inv,
            series,
            series_inv,
            barycentric_weights: Vec::new(),
            coset_shift: F::GENERATOR,
            z_inv_at_shift: F::one(),
        };

        // 1 / ∏_{j != i} (x_i - x_j) = 1 / Z'(x_i)
        let mut weights: Vec<F> = tables.tree[1]
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| F::from(i as u64) * c)
            .collect();
        tables.transform(&mut weights);
        if let Some(n) = weights.iter().position(|w| w.is_zero()) {
            return Err(DomainError::RepeatedPoint(n));
        }
        ark_ff::batch_inversion(&mut weights);
        tables.barycentric_weights = weights;

        // At most `m` of the `m + 1` candidates are roots of `Z`.
        let (shift, z) = (0..=m as u64)
            .map(|k| F::GENERATOR + F::from(k))
            .map(|s| (s, tables.vanishing_at(s)))
            .find(|(_, z)| !z.is_zero())
            .ok_or(DomainError::VanishesOnCoset(0))?;
        tables.coset_shift = shift;
        tables.z_inv_at_shift = z.inverse().ok_or(DomainError::VanishesOnCoset(0))?;

        Ok(tables)
    }

    pub(crate) fn size(&self) -> usize {
        self.points.len()
    }

    pub(crate) fn transform(&self, values: &mut [F]) {
        let m = self.size();
        let newton = self.monomial_to_newton(values.to_vec(), 1, 0, m);

        let weighted: Vec<F> = newton
            .iter()
            .zip(&self.newton_weights)
            .map(|(c, w)| *c * w)
            .collect();
        let conv = truncated_product(&weighted, &self.series, m);
        for ((v, c), f) in values.iter_mut().zip(conv).zip(&self.factorials) {
            *v = c * f;
        }
    }

    pub(crate) fn inverse_transform(&self, values: &mut [F]) {
        let m = self.size();
        let scaled: Vec<F> = values
            .iter()
            .zip(&self.factorials_inv)
            .map(|(v, f)| *v * f)
            .collect();
        let weighted = truncated_product(&scaled, &self.series_inv, m);
        let newton: Vec<F> = weighted
            .iter()
            .zip(&self.newton_weights_inv)
            .map(|(a, w)| *a * w)
            .collect();

        let coeffs = self.newton_to_monomial(&newton, 1, 0, m);
        values.copy_from_slice(&coeffs);
    }

    /// `f` has exactly `hi - lo` coefficients; returns its Newton coefficients
    /// relative to `x_lo, …, x_{hi-1}`.
    fn monomial_to_newton(&self, f: Vec<F>, idx: usize, lo: usize, hi: usize) -> Vec<F> {
        if hi - lo == 1 {
            return f;
        }
        let mid = lo + (hi - lo) / 2;
        let (quotient, remainder) =
            divide_by_monic(&f, &self.tree[2 * idx], &self.divisor_inverses[idx]);
        let mut out = self.monomial_to_newton(remainder, 2 * idx, lo, mid);
        out.extend(self.monomial_to_newton(quotient, 2 * idx + 1, mid, hi));
        out
    }

    fn newton_to_monomial(&self, c: &[F], idx: usize, lo: usize, hi: usize) -> Vec<F> {
        if hi - lo == 1 {
            return c.to_vec();
        }
        let mid = lo + (hi - lo) / 2;
        let (c_left, c_right) = c.split_at(mid - lo);
        let mut out = self.newton_to_monomial(c_left, 2 * idx, lo, mid);
        out.resize(hi - lo, F::zero());

        let right = Polynomial::new(self.newton_to_monomial(c_right, 2 * idx + 1, mid, hi));
        let shifted = Polynomial::new(self.tree[2 * idx].clone()).mul(&right);
        for (o, s) in out.iter_mut().zip(shifted.coefficients()) {
            *o += s;
        }
        out
    }

    pub(crate) fn lagrange_coefficients(&self, t: F) -> Vec<F> {
        let m = self.size();
        if let Some(idx) = self.points.iter().position(|x| *x == t) {
            let mut unit = vec![F::zero(); m];
            unit[idx] = F::one();
            return unit;
        }
        let mut differences: Vec<F> = self.points.iter().map(|x| t - x).collect();
        let z = differences.iter().product::<F>();
        ark_ff::batch_inversion(&mut differences);
        differences
            .iter()
            .zip(&self.barycentric_weights)
            .map(|(d, w)| z * w * d)
            .collect()
    }

    pub(crate) fn vanishing_at(&self, t: F) -> F {
        self.points.iter().map(|x| t - x).product()
    }

    pub(crate) fn coset_shift(&self) -> F {
        self.coset_shift
    }

    /// Multiplies every value by `1 / Z(coset_shift)`.
    pub(crate) fn divide_by_z_at_shift(&self, values: &mut [F]) {
        for v in values.iter_mut() {
            *v *= self.z_inv_at_shift;
        }
    }

    pub(crate) fn add_poly_z(&self, coeff: F, h: &mut [F]) -> Result<(), DomainError> {
        if h.len() != self.size() + 1 {
            return Err(DomainError::LengthMismatch {
                expected: self.size() + 1,
                actual: h.len(),
            });
        }
        for (h_i, z_i) in h.iter_mut().zip(&self.tree[1]) {
            *h_i += coeff * z_i;
        }
        Ok(())
    }
}

fn build_subproduct_tree<F: PrimeField>(
    tree: &mut [Vec<F>],
    divisor_inverses: &mut [Vec<F>],
    points: &[F],
    idx: usize,
    lo: usize,
    hi: usize,
) {
    if hi - lo == 1 {
        tree[idx] = vec![-points[lo], F::one()];
        return;
    }
    let mid = lo + (hi - lo) / 2;
    build_subproduct_tree(tree, divisor_inverses, points, 2 * idx, lo, mid);
    build_subproduct_tree(tree, divisor_inverses, points, 2 * idx + 1, mid, hi);

    let reversed: Vec<F> = tree[2 * idx].iter().rev().copied().collect();
    divisor_inverses[idx] = invert_series(&reversed, hi - mid);
    let product = Polynomial::new(tree[2 * idx].clone())
        .mul(&Polynomial::new(tree[2 * idx + 1].clone()));
    tree[idx] = product.into_coefficients();
}

/// Division by a monic divisor of degree `k < f.len()`. `divisor_rev_inv` is
/// the inverse of the reversed divisor modulo `x^(f.len() - k)`. The quotient
/// has `f.len() - k` coefficients and the remainder exactly `k`.
fn divide_by_monic<F: PrimeField>(
    f: &[F],
    divisor: &[F],
    divisor_rev_inv: &[F],
) -> (Vec<F>, Vec<F>) {
    let k = divisor.len() - 1;
    let quotient_len = f.len() - k;

    // rev(q) = rev(f) / rev(d) mod x^(n - k)
    let f_reversed: Vec<F> = f.iter().rev().take(quotient_len).copied().collect();
    let mut quotient = truncated_product(&f_reversed, divisor_rev_inv, quotient_len);
    quotient.reverse();

    let product = truncated_product(&quotient, divisor, k);
    let remainder = f[..k].iter().zip(product).map(|(a, b)| *a - b).collect();
    (quotient, remainder)
}

/// First `len` coefficients of `a · b`.
fn truncated_product<F: PrimeField>(a: &[F], b: &[F], len: usize) -> Vec<F> {
    let mut out = Polynomial::new(a.to_vec())
        .mul(&Polynomial::new(b.to_vec()))
        .into_coefficients();
    out.resize(len, F::zero());
    out
}

/// `u` with `t · u = 1 mod x^len`; requires `t[0] = 1`.
///
/// Newton iteration `u ← u · (2 - t·u)`, doubling the precision each step.
fn invert_series<F: PrimeField>(t: &[F], len: usize) -> Vec<F> {
    let mut u = vec![F::one()];
    let mut precision = 1;
    while precision < len {
        precision = (2 * precision).min(len);
        let head = &t[..precision.min(t.len())];
        let mut correction = truncated_product(head, &u, precision);
        for c in correction.iter_mut() {
            *c = -*c;
        }
        correction[0] += F::from(2u64);
        u = truncated_product(&u, &correction, precision);
    }
    u.truncate(len);
    u
}

/// Implements [`EvaluationDomain`](super::EvaluationDomain) for a wrapper
/// holding its tables in a `tables` field.
macro_rules! impl_sequence_domain {
    ($domain:ident) => {
        impl<F: ark_ff::PrimeField> $domain<F> {
            /// Point off the domain whose `Z` value coset division divides by.
            pub fn coset_shift(&self) -> F {
                self.tables.coset_shift()
            }
        }

        impl<F: ark_ff::PrimeField> $crate::math::domain::EvaluationDomain<F> for $domain<F> {
            fn size(&self) -> usize {
                self.tables.size()
            }

            fn transform(&self, values: &mut [F]) -> Result<(), $crate::errors::DomainError> {
                <Self as $crate::math::domain::EvaluationDomain<F>>::check_length(self, values.len())?;
                self.tables.transform(values);
                Ok(())
            }

            fn inverse_transform(
                &self,
                values: &mut [F],
            ) -> Result<(), $crate::errors::DomainError> {
                <Self as $crate::math::domain::EvaluationDomain<F>>::check_length(self, values.len())?;
                self.tables.inverse_transform(values);
                Ok(())
            }

            fn evaluate_all_lagrange_polynomials(&self, t: F) -> Vec<F> {
                self.tables.lagrange_coefficients(t)
            }

            fn compute_vanishing_polynomial(&self, t: F) -> F {
                self.tables.vanishing_at(t)
            }

            fn get_domain_element(&self, idx: usize) -> F {
                self.tables.points[idx]
            }

            fn elements(&self) -> Vec<F> {
                self.tables.points.clone()
            }

            fn add_poly_z(
                &self,
                coeff: F,
                h: &mut [F],
            ) -> Result<(), $crate::errors::DomainError> {
                self.tables.add_poly_z(coeff, h)
            }

            /// Divides every value by the constant `Z(s)` with `s` the
            /// [`coset_shift`](Self::coset_shift).
            fn divide_by_z_on_coset(
                &self,
                values: &mut [F],
            ) -> Result<(), $crate::errors::DomainError> {
                <Self as $crate::math::domain::EvaluationDomain<F>>::check_length(self, values.len())?;
                self.tables.divide_by_z_at_shift(values);
                Ok(())
            }
        }
    };
}

pub(crate) use impl_sequence_domain;
