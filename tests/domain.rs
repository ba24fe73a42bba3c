use ark_bls12_381::Fr;
use ark_ff::{Field, One, UniformRand, Zero};
use ark_std::test_rng;
use fri_lpc::Polynomial;
use fri_lpc::errors::DomainError;
use fri_lpc::math::domain::{
    ArithmeticSequenceDomain, EvaluationDomain, GeneralEvaluationDomain,
    GeometricSequenceDomain, Radix2Domain, StepRadix2Domain,
};
use proptest::prelude::*;

type F = Fr;

fn check_counting_vector<D: EvaluationDomain<F>>(domain: &D) {
    let coeffs: Vec<F> = (0..8u64).map(F::from).collect();
    let mut values = coeffs.clone();
    domain.transform(&mut values).unwrap();

    let poly = Polynomial::new(coeffs.clone());
    for (i, v) in values.iter().enumerate() {
        assert_eq!(*v, poly.evaluate(domain.get_domain_element(i)));
    }
    domain.inverse_transform(&mut values).unwrap();
    assert_eq!(values, coeffs);
}

#[test]
fn test_counting_vector_round_trip_on_every_shape() {
    check_counting_vector(&Radix2Domain::<F>::new(8).unwrap());
    check_counting_vector(&StepRadix2Domain::<F>::new(8).unwrap());
    check_counting_vector(&ArithmeticSequenceDomain::<F>::new(8).unwrap());
    check_counting_vector(&GeometricSequenceDomain::<F>::new(8).unwrap());
    check_counting_vector(&GeneralEvaluationDomain::<F>::new(8).unwrap());
}

#[test]
fn test_shapes_chosen_by_size() {
    let kinds: Vec<&str> = [2usize, 5, 12, 16, 24, 33]
        .iter()
        .map(|&m| GeneralEvaluationDomain::<F>::new(m).unwrap().kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "radix2",
            "step_radix2",
            "step_radix2",
            "radix2",
            "step_radix2",
            "step_radix2"
        ]
    );
    // 11 = 8 + 3 has no power-of-two split.
    assert_eq!(
        GeneralEvaluationDomain::<F>::new(11).unwrap().kind(),
        "geometric_sequence"
    );
}

#[test]
fn test_wrong_lengths_rejected() {
    let domain = GeneralEvaluationDomain::<F>::new(6).unwrap();
    let mut short = vec![F::one(); 5];
    assert_eq!(
        domain.transform(&mut short),
        Err(DomainError::LengthMismatch {
            expected: 6,
            actual: 5
        })
    );
    assert!(domain.inverse_transform(&mut vec![F::one(); 7]).is_err());
    assert!(domain.add_poly_z(F::one(), &mut vec![F::zero(); 6]).is_err());
}

#[test]
fn test_add_poly_z_matches_vanishing() {
    let mut rng = test_rng();
    let c = F::rand(&mut rng);
    let domains = [
        GeneralEvaluationDomain::Radix2(Radix2Domain::<F>::new(8).unwrap()),
        GeneralEvaluationDomain::StepRadix2(StepRadix2Domain::new(10).unwrap()),
        GeneralEvaluationDomain::ArithmeticSequence(ArithmeticSequenceDomain::new(9).unwrap()),
        GeneralEvaluationDomain::GeometricSequence(GeometricSequenceDomain::new(9).unwrap()),
    ];
    for domain in &domains {
        let m = domain.size();
        let base: Vec<F> = (0..=m).map(|_| F::rand(&mut rng)).collect();
        let mut h = base.clone();
        domain.add_poly_z(c, &mut h).unwrap();

        let expected = Polynomial::new(base)
            .add(&Polynomial::vanishing(&domain.elements()).scale(c));
        assert_eq!(Polynomial::new(h), expected, "{}", domain.kind());
    }
}

#[test]
fn test_divide_by_z_on_coset_on_every_shape() {
    let domains = [
        GeneralEvaluationDomain::<F>::new(8).unwrap(),
        GeneralEvaluationDomain::new(6).unwrap(),
        GeneralEvaluationDomain::new(11).unwrap(),
        GeneralEvaluationDomain::ArithmeticSequence(ArithmeticSequenceDomain::new(6).unwrap()),
    ];
    for domain in &domains {
        let mut values = vec![F::one(); domain.size()];
        assert!(domain.divide_by_z_on_coset(&mut values).is_ok(), "{}", domain.kind());
        assert!(values.iter().all(|v| !v.is_zero()), "{}", domain.kind());
    }
}

#[test]
fn test_sequence_domains_with_custom_generator() {
    let g = F::from(3u64);
    let arithmetic = ArithmeticSequenceDomain::<F>::with_generator(5, g).unwrap();
    let points: Vec<F> = (0..5u64).map(|i| F::from(3 * i)).collect();
    assert_eq!(arithmetic.elements(), points);
    check_degree_four_round_trip(&arithmetic);

    let geometric = GeometricSequenceDomain::<F>::with_generator(5, g).unwrap();
    let points: Vec<F> = (0..5u64).map(|i| g.pow([i])).collect();
    assert_eq!(geometric.elements(), points);
    check_degree_four_round_trip(&geometric);

    assert_eq!(
        GeometricSequenceDomain::<F>::with_generator(4, F::zero()).err(),
        Some(DomainError::ZeroGenerator)
    );
    // -1 repeats after two steps.
    assert_eq!(
        GeometricSequenceDomain::<F>::with_generator(4, -F::one()).err(),
        Some(DomainError::RepeatedPoint(2))
    );
}

fn check_degree_four_round_trip<D: EvaluationDomain<F>>(domain: &D) {
    let coeffs = vec![F::from(7u64), F::zero(), -F::one(), F::from(2u64), F::one()];
    let mut values = coeffs.clone();
    domain.transform(&mut values).unwrap();
    domain.inverse_transform(&mut values).unwrap();
    assert_eq!(values, coeffs);
}

#[test]
fn test_evaluate_over_domain_and_back() {
    let mut rng = test_rng();
    let domain = GeneralEvaluationDomain::<F>::new(13).unwrap();
    let poly = Polynomial::new((0..9).map(|_| F::rand(&mut rng)).collect());
    let evals = poly.evaluate_over_domain(&domain).unwrap();
    assert_eq!(evals.len(), 13);
    assert_eq!(Polynomial::from_evaluations(&domain, &evals).unwrap(), poly);

    let too_big = Polynomial::new((0..14).map(|_| F::rand(&mut rng)).collect());
    assert!(too_big.evaluate_over_domain(&domain).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_transform_round_trip(m in 2usize..48, seed in any::<u64>()) {
        let domain = GeneralEvaluationDomain::<F>::new(m).unwrap();
        let coeffs: Vec<F> = (0..m as u64)
            .map(|i| F::from(seed.wrapping_mul(i + 1)) + F::from(i))
            .collect();
        let mut values = coeffs.clone();
        domain.transform(&mut values).unwrap();
        let t = domain.get_domain_element(m - 1);
        prop_assert_eq!(values[m - 1], Polynomial::new(coeffs.clone()).evaluate(t));
        domain.inverse_transform(&mut values).unwrap();
        prop_assert_eq!(values, coeffs);
    }

    #[test]
    fn prop_lagrange_sums_to_one(m in 2usize..40, t in any::<u64>()) {
        let domain = GeneralEvaluationDomain::<F>::new(m).unwrap();
        let sum: F = domain
            .evaluate_all_lagrange_polynomials(F::from(t))
            .into_iter()
            .sum();
        prop_assert_eq!(sum, F::one());
    }
}

