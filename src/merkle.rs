use core::marker::PhantomData;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::hash::Hasher;

/// Side of the path node relative to the running hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodePosition {
    /// The sibling is the left input of the compression.
    Left,
    /// The sibling is the right input of the compression.
    Right,
}

/// One level of an authentication path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePathNode {
    pub sibling: Vec<u8>,
    pub position: NodePosition,
}

/// Inclusion proof for a single leaf, stored as a flat vector of levels from the
/// leaves up to the child of the root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub leaf_index: usize,
    pub path: Vec<MerklePathNode>,
}

/// Binary Merkle tree over byte leaves.
///
/// Leaves are hashed with [`Hasher::hash`], internal nodes with
/// [`Hasher::compress`]. A level with an odd number of nodes duplicates its last
/// node. The tree is immutable once built.
#[derive(Clone, Debug)]
pub struct MerkleTree<H: Hasher> {
    pub leaves: Vec<Vec<u8>>,
    pub levels: Vec<Vec<Vec<u8>>>,
    _hasher: PhantomData<H>,
}

impl<H: Hasher> MerkleTree<H> {
    /// Builds the tree. Panics on an empty leaf set, which no caller in this
    /// crate can produce.
    pub fn new(leaves: Vec<Vec<u8>>) -> Self {
        assert!(!leaves.is_empty(), "Merkle tree needs at least one leaf");

        #[cfg(feature = "parallel")]
        let hashed: Vec<Vec<u8>> = leaves.par_iter().map(|leaf| H::hash(leaf)).collect();
        #[cfg(not(feature = "parallel"))]
        let hashed: Vec<Vec<u8>> = leaves.iter().map(|leaf| H::hash(leaf)).collect();

        let mut levels = vec![hashed];
        while levels[levels.len() - 1].len() > 1 {
            let current_level = &levels[levels.len() - 1];
            let next_level = Self::compress_level(current_level);
            levels.push(next_level);
        }

        Self {
            leaves,
            levels,
            _hasher: PhantomData,
        }
    }

    fn compress_level(level: &[Vec<u8>]) -> Vec<Vec<u8>> {
        let pair = |i: usize| {
            let left = &level[2 * i];
            // Duplicate last node if odd number
            let right = level.get(2 * i + 1).unwrap_or(left);
            H::compress(left, right)
        };
        let parents = level.len().div_ceil(2);
        #[cfg(feature = "parallel")]
        let next = (0..parents).into_par_iter().map(pair).collect();
        #[cfg(not(feature = "parallel"))]
        let next = (0..parents).map(pair).collect();
        next
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn get_proof(&self, index: usize) -> Option<MerkleProof> {
        if index >= self.leaves.len() {
            return None;
        }

        let mut path = Vec::with_capacity(self.levels.len() - 1);
        let mut current_index = index;

        // Start from the leaf level
        for level in &self.levels[..self.levels.len() - 1] {
            let node = if current_index % 2 == 0 {
                // If we're at the last node in an odd-sized level, use the node itself as sibling
                let sibling = level
                    .get(current_index + 1)
                    .unwrap_or(&level[current_index]);
                MerklePathNode {
                    sibling: sibling.clone(),
                    position: NodePosition::Right,
                }
            } else {
                MerklePathNode {
                    sibling: level[current_index - 1].clone(),
                    position: NodePosition::Left,
                }
            };
            path.push(node);
            current_index /= 2;
        }

        Some(MerkleProof {
            leaf_index: index,
            path,
        })
    }

    pub fn root(&self) -> Vec<u8> {
        self.levels[self.levels.len() - 1][0].clone()
    }
}

/// Checks that `leaf` sits at `proof.leaf_index` under `root`.
///
/// The side of every path node must agree with the corresponding bit of the leaf
/// index, so a proof for one position cannot be replayed for another.
pub fn verify_merkle_proof<H: Hasher>(leaf: &[u8], proof: &MerkleProof, root: &[u8]) -> bool {
    if proof.path.len() >= usize::BITS as usize || proof.leaf_index >> proof.path.len() != 0 {
        return false;
    }

    let mut current_hash = H::hash(leaf);
    for (level, node) in proof.path.iter().enumerate() {
        let is_right_child = (proof.leaf_index >> level) & 1 == 1;
        current_hash = match (node.position, is_right_child) {
            (NodePosition::Left, true) => H::compress(&node.sibling, &current_hash),
            (NodePosition::Right, false) => H::compress(&current_hash, &node.sibling),
            _ => return false,
        };
    }

    current_hash == root
}
