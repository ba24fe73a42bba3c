use ark_ff::PrimeField;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, instrument};

use super::{
    FriParams, FriProof, Opening, QueryProof, admissible_leaves, batching_powers,
    initial_leaf_bytes, sample_queries,
};
use crate::hash::Hasher;
use crate::math::domain::EvaluationDomain;
use crate::math::field::fields_to_bytes;
use crate::math::fri::fold_coset;
use crate::math::polynomial::Polynomial;
use crate::merkle::verify_merkle_proof;
use crate::transcript::FiatShamirTranscript;

/// Transcript-derived values shared by every query check.
struct Challenges<F> {
    thetas: Vec<F>,
    alphas: Vec<F>,
    final_polynomial: Polynomial<F>,
}

/// Checks a proof produced by [`prove`](super::prove) against the initial
/// commitment `root` and the quotient data of every committed polynomial.
///
/// Never fails: a malformed or inconsistent proof is rejected with `false` and
/// the reason is logged at debug level.
#[instrument(skip_all, fields(batch = openings.len(), queries = proof.query_proofs.len()))]
pub fn verify<F: PrimeField, H: Hasher>(
    root: &[u8],
    openings: &[Opening<F>],
    proof: &FriProof<F>,
    params: &FriParams<F>,
    transcript: &mut FiatShamirTranscript<H>,
) -> bool {
    if openings.is_empty() {
        debug!("no polynomials to check");
        return false;
    }
    let rounds = params.rounds();
    if proof.round_roots.len() != rounds - 1 {
        debug!(
            expected = rounds - 1,
            actual = proof.round_roots.len(),
            "wrong number of round commitments"
        );
        return false;
    }
    if proof.query_proofs.len() != params.lambda {
        debug!(
            expected = params.lambda,
            actual = proof.query_proofs.len(),
            "wrong number of queries"
        );
        return false;
    }

    transcript.absorb_commitment(root);
    let thetas = batching_powers(transcript, openings.len());
    let mut alphas = Vec::with_capacity(rounds);
    for round in 0..rounds {
        alphas.push(transcript.challenge::<F>());
        if round + 1 < rounds {
            transcript.absorb_commitment(&proof.round_roots[round]);
        }
    }

    let final_polynomial = Polynomial::new(proof.final_polynomial.clone());
    if final_polynomial.degree() > params.final_degree_bound() {
        debug!(
            degree = final_polynomial.degree(),
            bound = params.final_degree_bound(),
            "final polynomial degree too large"
        );
        return false;
    }
    transcript.absorb_fields(&proof.final_polynomial);

    let admissible = admissible_leaves(params, openings);
    let indices = match sample_queries(transcript, params, &admissible) {
        Ok(indices) => indices,
        Err(err) => {
            debug!(%err, "cannot sample queries");
            return false;
        }
    };

    let challenges = Challenges {
        thetas,
        alphas,
        final_polynomial,
    };
    ark_std::cfg_iter!(proof.query_proofs)
        .zip(ark_std::cfg_iter!(indices))
        .all(|(query, &index)| {
            verify_query::<F, H>(root, openings, proof, &challenges, params, query, index)
        })
}

/// Plain low-degree check of `batch_size` polynomials committed under `root`.
pub fn verify_low_degree<F: PrimeField, H: Hasher>(
    root: &[u8],
    batch_size: usize,
    proof: &FriProof<F>,
    params: &FriParams<F>,
    transcript: &mut FiatShamirTranscript<H>,
) -> bool {
    let openings = vec![Opening::trivial(); batch_size];
    verify(root, &openings, proof, params, transcript)
}

fn verify_query<F: PrimeField, H: Hasher>(
    root: &[u8],
    openings: &[Opening<F>],
    proof: &FriProof<F>,
    challenges: &Challenges<F>,
    params: &FriParams<F>,
    query: &QueryProof<F>,
    index: usize,
) -> bool {
    if query.index != index {
        debug!(expected = index, actual = query.index, "query index mismatch");
        return false;
    }

    // Round 0: recompute the quotient on the coset from the committed values.
    let initial = &query.initial;
    let leaf_count = params.leaf_count(0);
    let coset_size = 1usize << params.step_list[0];
    let leaf = index % leaf_count;
    if initial.values.len() != openings.len()
        || initial.values.iter().any(|row| row.len() != coset_size)
    {
        debug!(index, "malformed initial opening");
        return false;
    }
    if initial.merkle_proof.leaf_index != leaf
        || !verify_merkle_proof::<H>(
            &initial_leaf_bytes(&initial.values),
            &initial.merkle_proof,
            root,
        )
    {
        debug!(index, leaf, "initial Merkle path rejected");
        return false;
    }

    let domain = params.initial_domain();
    let mut coset = Vec::with_capacity(coset_size);
    for k in 0..coset_size {
        let x = domain.get_domain_element(leaf + k * leaf_count);
        let mut combined = F::zero();
        for ((row, opening), theta) in initial.values.iter().zip(openings).zip(&challenges.thetas) {
            let Some(q) = opening.quotient_at(row[k], x) else {
                debug!(index, "denominator vanishes on the queried coset");
                return false;
            };
            combined += *theta * q;
        }
        coset.push(combined);
    }
    let mut folded = fold_coset(&coset, leaf, domain, challenges.alphas[0], params.two_inv);
    let mut folded_index = leaf;

    if query.rounds.len() != params.rounds() - 1 {
        debug!(index, "wrong number of round openings");
        return false;
    }
    for (i, round_proof) in query.rounds.iter().enumerate() {
        let round = i + 1;
        let leaf_count = params.leaf_count(round);
        if round_proof.values.len() != 1 << params.step_list[round] {
            debug!(index, round, "malformed round opening");
            return false;
        }
        let leaf = folded_index % leaf_count;
        let position = folded_index / leaf_count;
        if round_proof.merkle_proof.leaf_index != leaf
            || !verify_merkle_proof::<H>(
                &fields_to_bytes(&round_proof.values),
                &round_proof.merkle_proof,
                &proof.round_roots[i],
            )
        {
            debug!(index, round, "round Merkle path rejected");
            return false;
        }
        if round_proof.values[position] != folded {
            debug!(index, round, "folding mismatch");
            return false;
        }
        folded = fold_coset(
            &round_proof.values,
            leaf,
            &params.domains[round],
            challenges.alphas[round],
            params.two_inv,
        );
        folded_index = leaf;
    }

    let x = params.final_domain().get_domain_element(folded_index);
    if challenges.final_polynomial.evaluate(x) != folded {
        debug!(index, "last fold disagrees with the final polynomial");
        return false;
    }
    true
}
