//! List polynomial commitment built on FRI.
//!
//! A commitment is the root of the first FRI tree. To open a polynomial `g` at
//! points `p_1..p_k` the prover sends `z_j = g(p_j)` and proves with FRI that
//! `x^k (g - U) / V` has degree at most the committed bound, where `U`
//! interpolates the `z_j` and `V` vanishes on the points. The proof is repeated
//! `lambda` times on the same transcript.

use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::{FriError, LpcError, PolynomialError};
use crate::fri::{self, FriConfig, FriParams, FriProof, Opening};
use crate::hash::Hasher;
use crate::math::field::{serde_field_rows, serde_fields};
use crate::math::polynomial::Polynomial;
use crate::merkle::MerkleTree;
use crate::transcript::FiatShamirTranscript;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LpcConfig {
    pub fri: FriConfig,
    /// Number of FRI repetitions per opening.
    pub lambda: usize,
}

impl Default for LpcConfig {
    fn default() -> Self {
        Self {
            fri: FriConfig::default(),
            lambda: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LpcParams<F> {
    pub fri: FriParams<F>,
    pub lambda: usize,
}

impl<F: PrimeField> LpcParams<F> {
    pub fn new(fri: FriParams<F>, lambda: usize) -> Result<Self, LpcError> {
        if lambda == 0 {
            return Err(LpcError::InvalidParams(
                "at least one FRI repetition is required".to_string(),
            ));
        }
        Ok(Self { fri, lambda })
    }

    pub fn from_config(config: &LpcConfig) -> Result<Self, LpcError> {
        Self::new(FriParams::from_config(&config.fri)?, config.lambda)
    }
}

/// Opening of one committed polynomial at a list of points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: PrimeField")]
pub struct LpcProof<F> {
    /// Claimed evaluations, one per point.
    #[serde(with = "serde_fields")]
    pub z: Vec<F>,
    pub root: Vec<u8>,
    pub fri_proofs: Vec<FriProof<F>>,
}

/// Opening of several polynomials committed in one tree, each at its own points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: PrimeField")]
pub struct LpcBatchProof<F> {
    #[serde(with = "serde_field_rows")]
    pub z: Vec<Vec<F>>,
    pub root: Vec<u8>,
    pub fri_proofs: Vec<FriProof<F>>,
}

/// Commits to `polys`; the commitment is `tree.root()`.
pub fn commit<F: PrimeField, H: Hasher>(
    polys: &[Polynomial<F>],
    params: &LpcParams<F>,
) -> Result<MerkleTree<H>, LpcError> {
    Ok(fri::precommit(polys, &params.fri)?)
}

/// Opens `g`, committed alone in `tree`, at `points`.
#[instrument(skip_all, fields(points = points.len(), repetitions = params.lambda))]
pub fn proof_eval<F: PrimeField, H: Hasher>(
    points: &[F],
    g: &Polynomial<F>,
    tree: &MerkleTree<H>,
    params: &LpcParams<F>,
    transcript: &mut FiatShamirTranscript<H>,
) -> Result<LpcProof<F>, LpcError> {
    let (mut z, fri_proofs) = open(&[points], core::slice::from_ref(g), tree, params, transcript)?;
    Ok(LpcProof {
        z: z.pop().unwrap_or_default(),
        root: tree.root(),
        fri_proofs,
    })
}

/// Opens `polys[j]` at `points_per_poly[j]` for every polynomial of the batch
/// committed in `tree`.
#[instrument(skip_all, fields(batch = polys.len(), repetitions = params.lambda))]
pub fn proof_eval_batch<F: PrimeField, H: Hasher>(
    points_per_poly: &[Vec<F>],
    polys: &[Polynomial<F>],
    tree: &MerkleTree<H>,
    params: &LpcParams<F>,
    transcript: &mut FiatShamirTranscript<H>,
) -> Result<LpcBatchProof<F>, LpcError> {
    let points: Vec<&[F]> = points_per_poly.iter().map(Vec::as_slice).collect();
    let (z, fri_proofs) = open(&points, polys, tree, params, transcript)?;
    Ok(LpcBatchProof {
        z,
        root: tree.root(),
        fri_proofs,
    })
}

/// Checks that the polynomial committed under `root` takes the values
/// `proof.z` at `points`.
#[instrument(skip_all, fields(points = points.len()))]
pub fn verify_eval<F: PrimeField, H: Hasher>(
    points: &[F],
    root: &[u8],
    proof: &LpcProof<F>,
    params: &LpcParams<F>,
    transcript: &mut FiatShamirTranscript<H>,
) -> bool {
    check_openings(
        &[points],
        &[proof.z.as_slice()],
        root,
        &proof.root,
        &proof.fri_proofs,
        params,
        transcript,
    )
}

#[instrument(skip_all, fields(batch = points_per_poly.len()))]
pub fn verify_eval_batch<F: PrimeField, H: Hasher>(
    points_per_poly: &[Vec<F>],
    root: &[u8],
    proof: &LpcBatchProof<F>,
    params: &LpcParams<F>,
    transcript: &mut FiatShamirTranscript<H>,
) -> bool {
    let points: Vec<&[F]> = points_per_poly.iter().map(Vec::as_slice).collect();
    let z: Vec<&[F]> = proof.z.iter().map(Vec::as_slice).collect();
    check_openings(
        &points,
        &z,
        root,
        &proof.root,
        &proof.fri_proofs,
        params,
        transcript,
    )
}

fn check_points<F: PrimeField>(points: &[F]) -> Result<(), LpcError> {
    if points.is_empty() {
        return Err(LpcError::NoPoints);
    }
    for (i, p) in points.iter().enumerate() {
        if points[..i].contains(p) {
            return Err(LpcError::DuplicatePoint(i));
        }
    }
    Ok(())
}

fn opening<F: PrimeField>(points: &[F], values: &[F]) -> Result<Opening<F>, PolynomialError> {
    Ok(Opening {
        interpolant: Polynomial::interpolate(points, values)?,
        vanishing: Polynomial::vanishing(points),
    })
}

fn absorb_claims<F: PrimeField, H: Hasher>(
    transcript: &mut FiatShamirTranscript<H>,
    points: &[&[F]],
    z: &[Vec<F>],
) {
    for (p, z) in points.iter().zip(z) {
        transcript.absorb_fields(p);
        transcript.absorb_fields(z);
    }
}

fn open<F: PrimeField, H: Hasher>(
    points: &[&[F]],
    polys: &[Polynomial<F>],
    tree: &MerkleTree<H>,
    params: &LpcParams<F>,
    transcript: &mut FiatShamirTranscript<H>,
) -> Result<(Vec<Vec<F>>, Vec<FriProof<F>>), LpcError> {
    if points.len() != polys.len() {
        return Err(FriError::BatchSizeMismatch {
            expected: polys.len(),
            actual: points.len(),
        }
        .into());
    }
    for p in points {
        check_points(p)?;
    }

    let z: Vec<Vec<F>> = points
        .iter()
        .zip(polys)
        .map(|(p, g)| p.iter().map(|x| g.evaluate(*x)).collect())
        .collect();
    absorb_claims(transcript, points, &z);

    let mut openings = Vec::with_capacity(polys.len());
    let mut quotients = Vec::with_capacity(polys.len());
    for ((p, values), g) in points.iter().zip(&z).zip(polys) {
        let opening = opening(p, values)?;
        let (quotient, remainder) = g.sub(&opening.interpolant).divide(&opening.vanishing)?;
        if !remainder.is_zero() {
            return Err(LpcError::NonZeroRemainder);
        }
        openings.push(opening);
        quotients.push(quotient);
    }

    let fri_proofs = (0..params.lambda)
        .map(|_| fri::prove(polys, tree, &openings, &quotients, &params.fri, transcript))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((z, fri_proofs))
}

fn check_openings<F: PrimeField, H: Hasher>(
    points: &[&[F]],
    z: &[&[F]],
    root: &[u8],
    proof_root: &[u8],
    fri_proofs: &[FriProof<F>],
    params: &LpcParams<F>,
    transcript: &mut FiatShamirTranscript<H>,
) -> bool {
    if proof_root != root {
        debug!("proof is bound to a different commitment");
        return false;
    }
    if points.len() != z.len() || fri_proofs.len() != params.lambda {
        debug!("proof shape does not match the opening request");
        return false;
    }
    let mut openings = Vec::with_capacity(points.len());
    for (p, values) in points.iter().zip(z) {
        if let Err(err) = check_points(p) {
            debug!(%err, "invalid opening points");
            return false;
        }
        match opening(p, values) {
            Ok(opening) => openings.push(opening),
            Err(err) => {
                debug!(%err, "cannot interpolate the claimed values");
                return false;
            }
        }
    }

    let z: Vec<Vec<F>> = z.iter().map(|values| values.to_vec()).collect();
    absorb_claims(transcript, points, &z);
    fri_proofs
        .iter()
        .all(|proof| fri::verify(root, &openings, proof, &params.fri, transcript))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Sha256Hasher;
    use ark_bls12_381::Fr;
    use ark_ff::UniformRand;
    use ark_std::test_rng;

    type F = Fr;
    type Transcript = FiatShamirTranscript<Sha256Hasher>;

    fn params() -> LpcParams<F> {
        LpcParams::new(FriParams::new(15, 6, vec![1, 2], 4).unwrap(), 2).unwrap()
    }

    #[test]
    fn test_open_and_verify() {
        let mut rng = test_rng();
        let params = params();
        let g = Polynomial::new((0..16).map(|_| F::rand(&mut rng)).collect());
        let tree = commit::<F, Sha256Hasher>(core::slice::from_ref(&g), &params).unwrap();
        let points = vec![F::rand(&mut rng), F::rand(&mut rng)];

        let proof =
            proof_eval(&points, &g, &tree, &params, &mut Transcript::new(b"lpc")).unwrap();
        assert_eq!(proof.z, vec![g.evaluate(points[0]), g.evaluate(points[1])]);
        assert_eq!(proof.fri_proofs.len(), 2);
        assert!(verify_eval(&points, &tree.root(), &proof, &params, &mut Transcript::new(b"lpc")));
    }

    #[test]
    fn test_wrong_claim_rejected() {
        let mut rng = test_rng();
        let params = params();
        let g = Polynomial::new((0..10).map(|_| F::rand(&mut rng)).collect());
        let tree = commit::<F, Sha256Hasher>(core::slice::from_ref(&g), &params).unwrap();
        let points = vec![F::from(3u64)];

        let mut proof =
            proof_eval(&points, &g, &tree, &params, &mut Transcript::new(b"lpc")).unwrap();
        proof.z[0] += F::from(1u64);
        assert!(!verify_eval(&points, &tree.root(), &proof, &params, &mut Transcript::new(b"lpc")));
    }

    #[test]
    fn test_point_errors() {
        let params = params();
        let g = Polynomial::new(vec![F::from(1u64), F::from(2u64)]);
        let tree = commit::<F, Sha256Hasher>(core::slice::from_ref(&g), &params).unwrap();
        let mut transcript = Transcript::new(b"lpc");
        assert_eq!(
            proof_eval(&[], &g, &tree, &params, &mut transcript).err(),
            Some(LpcError::NoPoints)
        );
        let duplicated = [F::from(5u64), F::from(6u64), F::from(5u64)];
        assert_eq!(
            proof_eval(&duplicated, &g, &tree, &params, &mut transcript).err(),
            Some(LpcError::DuplicatePoint(2))
        );
    }

    #[test]
    fn test_invalid_repetitions() {
        let fri = FriParams::<F>::new(15, 6, vec![1], 4).unwrap();
        assert!(matches!(LpcParams::new(fri, 0), Err(LpcError::InvalidParams(_))));
        let params = LpcParams::<F>::from_config(&LpcConfig::default()).unwrap();
        assert_eq!(params.lambda, 2);
    }
}
