use ark_ff::PrimeField;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info_span, instrument};

use super::{
    FriParams, FriProof, InitialProof, Opening, QueryProof, RoundProof, admissible_leaves,
    batching_powers, build_leaves, sample_queries,
};
use crate::errors::FriError;
use crate::hash::Hasher;
use crate::math::fri::fold_layer;
use crate::math::polynomial::Polynomial;
use crate::merkle::MerkleTree;
use crate::transcript::FiatShamirTranscript;

/// Evaluates `polys` over the first FRI domain and commits to them in one tree.
#[instrument(skip_all, fields(batch = polys.len(), domain = params.initial_domain().size))]
pub fn precommit<F: PrimeField, H: Hasher>(
    polys: &[Polynomial<F>],
    params: &FriParams<F>,
) -> Result<MerkleTree<H>, FriError> {
    let evaluations = evaluate_batch(polys, params)?;
    precommit_evaluations(&evaluations, params)
}

/// Commits to evaluation vectors over the first FRI domain.
pub fn precommit_evaluations<F: PrimeField, H: Hasher>(
    evaluations: &[Vec<F>],
    params: &FriParams<F>,
) -> Result<MerkleTree<H>, FriError> {
    if evaluations.is_empty() {
        return Err(FriError::InvalidParams("nothing to commit".to_string()));
    }
    let domain_size = params.initial_domain().size;
    if let Some(evals) = evaluations.iter().find(|e| e.len() != domain_size) {
        return Err(crate::errors::DomainError::LengthMismatch {
            expected: domain_size,
            actual: evals.len(),
        }
        .into());
    }
    let layers: Vec<&[F]> = evaluations.iter().map(Vec::as_slice).collect();
    let tree = MerkleTree::new(build_leaves(&layers, params.step_list[0]));
    debug!(leaves = tree.leaf_count(), "committed initial layer");
    Ok(tree)
}

/// The commitment: the root of the precommitted tree.
pub fn commit<H: Hasher>(tree: &MerkleTree<H>) -> Vec<u8> {
    tree.root()
}

fn evaluate_batch<F: PrimeField>(
    polys: &[Polynomial<F>],
    params: &FriParams<F>,
) -> Result<Vec<Vec<F>>, FriError> {
    if polys.is_empty() {
        return Err(FriError::InvalidParams("nothing to commit".to_string()));
    }
    check_degrees(polys, params)?;
    let domain = params.initial_domain();
    ark_std::cfg_iter!(polys)
        .map(|p| p.evaluate_over_domain(domain).map_err(FriError::from))
        .collect()
}

fn check_degrees<F: PrimeField>(
    polys: &[Polynomial<F>],
    params: &FriParams<F>,
) -> Result<(), FriError> {
    match polys.iter().find(|p| p.degree() > params.max_degree) {
        Some(p) => Err(FriError::DegreeBoundExceeded {
            degree: p.degree(),
            max_degree: params.max_degree,
        }),
        None => Ok(()),
    }
}

/// Proves that `Σ θ^j x^(deg V_j) quotients[j]` has degree at most
/// `params.max_degree`.
///
/// `polys` are the polynomials committed in `tree` and `quotients[j]` must equal
/// `(polys[j] - U_j) / V_j` for `openings[j] = (U_j, V_j)`; the verifier only
/// sees `polys` through the tree and recomputes the quotients itself.
#[instrument(skip_all, fields(batch = polys.len(), rounds = params.rounds(), queries = params.lambda))]
pub fn prove<F: PrimeField, H: Hasher>(
    polys: &[Polynomial<F>],
    tree: &MerkleTree<H>,
    openings: &[Opening<F>],
    quotients: &[Polynomial<F>],
    params: &FriParams<F>,
    transcript: &mut FiatShamirTranscript<H>,
) -> Result<FriProof<F>, FriError> {
    let batch = polys.len();
    for actual in [openings.len(), quotients.len()] {
        if actual != batch {
            return Err(FriError::BatchSizeMismatch {
                expected: batch,
                actual,
            });
        }
    }
    if tree.leaf_count() != params.leaf_count(0) {
        return Err(FriError::TreeShapeMismatch {
            expected: params.leaf_count(0),
            actual: tree.leaf_count(),
        });
    }
    let shifted: Vec<Polynomial<F>> = quotients
        .iter()
        .zip(openings)
        .map(|(quotient, opening)| opening.shift_quotient(quotient))
        .collect();
    check_degrees(&shifted, params)?;
    let evaluations = evaluate_batch(polys, params)?;

    transcript.absorb_commitment(&tree.root());
    let thetas: Vec<F> = batching_powers(transcript, batch);

    let initial_domain = params.initial_domain();
    let mut layer = vec![F::zero(); initial_domain.size];
    for (quotient, theta) in shifted.iter().zip(&thetas) {
        let evals = quotient.evaluate_over_domain(initial_domain)?;
        for (l, e) in layer.iter_mut().zip(evals) {
            *l += *theta * e;
        }
    }

    let rounds = params.rounds();
    let mut layers = Vec::with_capacity(rounds - 1);
    let mut trees: Vec<MerkleTree<H>> = Vec::with_capacity(rounds - 1);
    let mut round_roots = Vec::with_capacity(rounds - 1);
    for round in 0..rounds {
        let alpha: F = transcript.challenge();
        layer = info_span!("fold", round).in_scope(|| {
            fold_layer(
                &layer,
                &params.domains[round],
                params.step_list[round],
                alpha,
                params.two_inv,
            )
        });

        if round + 1 < rounds {
            let tree = MerkleTree::<H>::new(build_leaves(&[layer.as_slice()], params.step_list[round + 1]));
            let root = tree.root();
            debug!(round = round + 1, leaves = tree.leaf_count(), "committed folded layer");
            transcript.absorb_commitment(&root);
            round_roots.push(root);
            trees.push(tree);
            layers.push(layer.clone());
        }
    }

    let final_polynomial = Polynomial::from_evaluations(params.final_domain(), &layer)?;
    debug!(degree = final_polynomial.degree(), "final polynomial");
    transcript.absorb_fields(final_polynomial.coefficients());

    let admissible = admissible_leaves(params, openings);
    let indices = sample_queries(transcript, params, &admissible)?;

    let query_proofs = info_span!("open queries").in_scope(|| {
        ark_std::cfg_iter!(indices)
            .map(|&index| open_query(index, tree, &evaluations, &trees, &layers, params))
            .collect::<Result<Vec<_>, FriError>>()
    })?;

    Ok(FriProof {
        round_roots,
        final_polynomial: final_polynomial.into_coefficients(),
        query_proofs,
    })
}

/// Plain low-degree proof for a batch of committed polynomials.
pub fn prove_low_degree<F: PrimeField, H: Hasher>(
    polys: &[Polynomial<F>],
    tree: &MerkleTree<H>,
    params: &FriParams<F>,
    transcript: &mut FiatShamirTranscript<H>,
) -> Result<FriProof<F>, FriError> {
    let openings = vec![Opening::trivial(); polys.len()];
    prove(polys, tree, &openings, polys, params, transcript)
}

fn coset_values<F: PrimeField>(layer: &[F], leaf: usize, leaf_count: usize, steps: usize) -> Vec<F> {
    (0..1usize << steps)
        .map(|k| layer[leaf + k * leaf_count])
        .collect()
}

fn open_query<F: PrimeField, H: Hasher>(
    index: usize,
    initial_tree: &MerkleTree<H>,
    evaluations: &[Vec<F>],
    trees: &[MerkleTree<H>],
    layers: &[Vec<F>],
    params: &FriParams<F>,
) -> Result<QueryProof<F>, FriError> {
    let missing_leaf = |round: usize, tree_leaves: usize| FriError::TreeShapeMismatch {
        expected: params.leaf_count(round),
        actual: tree_leaves,
    };

    let leaf_count = params.leaf_count(0);
    let leaf = index % leaf_count;
    let initial = InitialProof {
        merkle_proof: initial_tree
            .get_proof(leaf)
            .ok_or_else(|| missing_leaf(0, initial_tree.leaf_count()))?,
        values: evaluations
            .iter()
            .map(|evals| coset_values(evals, leaf, leaf_count, params.step_list[0]))
            .collect(),
    };

    let mut rounds = Vec::with_capacity(trees.len());
    let mut folded_index = leaf;
    for (i, (tree, layer)) in trees.iter().zip(layers).enumerate() {
        let round = i + 1;
        let leaf_count = params.leaf_count(round);
        let leaf = folded_index % leaf_count;
        rounds.push(RoundProof {
            merkle_proof: tree
                .get_proof(leaf)
                .ok_or_else(|| missing_leaf(round, tree.leaf_count()))?,
            values: coset_values(layer, leaf, leaf_count, params.step_list[round]),
        });
        folded_index = leaf;
    }

    Ok(QueryProof {
        index,
        initial,
        rounds,
    })
}
