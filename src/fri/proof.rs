use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};

use crate::math::field::{serde_field_rows, serde_fields};
use crate::merkle::MerkleProof;

/// Opening of one round-0 leaf: for every committed polynomial, its values on
/// the queried coset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: PrimeField")]
pub struct InitialProof<F> {
    pub merkle_proof: MerkleProof,
    #[serde(with = "serde_field_rows")]
    pub values: Vec<Vec<F>>,
}

/// Opening of one leaf of a folded layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: PrimeField")]
pub struct RoundProof<F> {
    pub merkle_proof: MerkleProof,
    #[serde(with = "serde_fields")]
    pub values: Vec<F>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: PrimeField")]
pub struct QueryProof<F> {
    /// Index in the first evaluation domain.
    pub index: usize,
    pub initial: InitialProof<F>,
    /// One entry per committed folded layer.
    pub rounds: Vec<RoundProof<F>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: PrimeField")]
pub struct FriProof<F> {
    /// Roots of the folded layers, excluding the initial commitment and the final layer.
    pub round_roots: Vec<Vec<u8>>,
    /// Coefficients of the final polynomial.
    #[serde(with = "serde_fields")]
    pub final_polynomial: Vec<F>,
    pub query_proofs: Vec<QueryProof<F>>,
}
