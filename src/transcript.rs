use core::marker::PhantomData;

use ark_ff::PrimeField;
use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::hash::{Hasher, Sha256Hasher};
use crate::math::field::field_to_bytes;

const CHALLENGE_TAG: &[u8] = b"challenge";
const INDEX_TAG: &[u8] = b"index";

/// Fiat-Shamir transcript for deriving verifier challenges deterministically.
/// Both prover and verifier build identical transcripts to get the same challenges.
///
/// The state is a single running digest: absorbing hashes the state together with
/// the new data, squeezing hashes the state with a tag and ratchets it forward.
#[derive(Clone, Debug)]
pub struct FiatShamirTranscript<H: Hasher = Sha256Hasher> {
    state: Vec<u8>,
    _hasher: PhantomData<H>,
}

impl<H: Hasher> FiatShamirTranscript<H> {
    pub fn new(label: &[u8]) -> Self {
        Self {
            state: H::hash(label),
            _hasher: PhantomData,
        }
    }

    /// Absorb raw bytes into the transcript.
    pub fn absorb(&mut self, data: &[u8]) {
        let mut input = Vec::with_capacity(self.state.len() + 8 + data.len());
        input.extend_from_slice(&self.state);
        input.extend_from_slice(&(data.len() as u64).to_be_bytes());
        input.extend_from_slice(data);
        self.state = H::hash(&input);
    }

    /// Absorb a field element in its canonical big-endian encoding.
    pub fn absorb_field<F: PrimeField>(&mut self, value: &F) {
        self.absorb(&field_to_bytes(value));
    }

    pub fn absorb_fields<F: PrimeField>(&mut self, values: &[F]) {
        for value in values {
            self.absorb_field(value);
        }
    }

    /// Absorb a Merkle root.
    pub fn absorb_commitment(&mut self, root: &[u8]) {
        self.absorb(root);
    }

    /// Squeeze a field element challenge from the transcript.
    pub fn challenge<F: PrimeField>(&mut self) -> F {
        F::from_be_bytes_mod_order(&self.squeeze(CHALLENGE_TAG))
    }

    /// Squeeze an index in `[0, bound)`.
    ///
    /// The digest is read as a big-endian integer and reduced modulo `bound`;
    /// the bias is negligible for bounds far below the digest size.
    pub fn int_challenge(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "index bound must be positive");
        let value = BigUint::from_bytes_be(&self.squeeze(INDEX_TAG)) % BigUint::from(bound);
        // Reduced modulo a usize, so the conversion cannot fail.
        value.to_usize().unwrap_or_default()
    }

    fn squeeze(&mut self, tag: &[u8]) -> Vec<u8> {
        let mut input = self.state.clone();
        input.extend_from_slice(tag);
        let output = H::hash(&input);
        // Feed the output back into state so subsequent squeezes differ
        self.state = H::compress(&self.state, &output);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Sha512Hasher;
    use ark_bls12_381::Fr;

    #[test]
    fn test_transcripts_agree_on_identical_input() {
        let mut prover = FiatShamirTranscript::<Sha256Hasher>::new(b"test");
        let mut verifier = FiatShamirTranscript::<Sha256Hasher>::new(b"test");
        prover.absorb(b"root");
        verifier.absorb(b"root");
        prover.absorb_field(&Fr::from(5u64));
        verifier.absorb_field(&Fr::from(5u64));
        assert_eq!(prover.challenge::<Fr>(), verifier.challenge::<Fr>());
        assert_eq!(prover.int_challenge(1000), verifier.int_challenge(1000));
    }

    #[test]
    fn test_consecutive_challenges_differ() {
        let mut transcript = FiatShamirTranscript::<Sha256Hasher>::new(b"test");
        let a: Fr = transcript.challenge();
        let b: Fr = transcript.challenge();
        assert_ne!(a, b);
    }

    #[test]
    fn test_absorption_changes_challenge() {
        let mut a = FiatShamirTranscript::<Sha256Hasher>::new(b"test");
        let mut b = a.clone();
        a.absorb(b"one");
        b.absorb(b"two");
        assert_ne!(a.challenge::<Fr>(), b.challenge::<Fr>());
    }

    #[test]
    fn test_labels_separate_transcripts() {
        let mut a = FiatShamirTranscript::<Sha256Hasher>::new(b"a");
        let mut b = FiatShamirTranscript::<Sha256Hasher>::new(b"b");
        assert_ne!(a.challenge::<Fr>(), b.challenge::<Fr>());
    }

    #[test]
    fn test_absorb_is_length_delimited() {
        let mut a = FiatShamirTranscript::<Sha256Hasher>::new(b"test");
        let mut b = a.clone();
        a.absorb(b"ab");
        a.absorb(b"c");
        b.absorb(b"a");
        b.absorb(b"bc");
        assert_ne!(a.challenge::<Fr>(), b.challenge::<Fr>());
    }

    #[test]
    fn test_int_challenge_in_range() {
        let mut transcript = FiatShamirTranscript::<Sha512Hasher>::new(b"test");
        for bound in [1usize, 2, 7, 16, 1 << 20] {
            for _ in 0..32 {
                assert!(transcript.int_challenge(bound) < bound);
            }
        }
    }
}
