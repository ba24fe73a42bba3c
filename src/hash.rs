//! Hash functions consumed by the Merkle tree and the Fiat-Shamir transcript.

use core::fmt::Debug;
use core::marker::PhantomData;

use sha2::digest::{OutputSizeUser, typenum::Unsigned};
use sha2::{Digest, Sha256, Sha512};

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

/// A byte-oriented hash used for Merkle leaves, Merkle nodes and transcript absorption.
pub trait Hasher: Clone + Debug + Default + Send + Sync + 'static {
    /// Digest length in bytes.
    const DIGEST_LEN: usize;

    /// Hashes arbitrary bytes into a digest.
    fn hash(data: &[u8]) -> Vec<u8>;

    /// 2-to-1 compression used for internal Merkle nodes.
    fn compress(left: &[u8], right: &[u8]) -> Vec<u8>;
}

/// [`Hasher`] backed by any RustCrypto digest.
#[derive(Clone, Debug, Default)]
pub struct DigestHasher<D>(PhantomData<D>);

impl<D> Hasher for DigestHasher<D>
where
    D: Digest + Clone + Debug + Default + Send + Sync + 'static,
{
    const DIGEST_LEN: usize = <D as OutputSizeUser>::OutputSize::USIZE;

    fn hash(data: &[u8]) -> Vec<u8> {
        let mut hasher = D::new();
        hasher.update([LEAF_PREFIX]);
        hasher.update(data);
        hasher.finalize().to_vec()
    }

    fn compress(left: &[u8], right: &[u8]) -> Vec<u8> {
        let mut hasher = D::new();
        hasher.update([NODE_PREFIX]);
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().to_vec()
    }
}

pub type Sha256Hasher = DigestHasher<Sha256>;
pub type Sha512Hasher = DigestHasher<Sha512>;
