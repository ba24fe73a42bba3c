use sha2::{Digest, Sha256};

pub mod errors;
pub mod fri;
pub mod hash;
pub mod lpc;
pub mod math;
pub mod merkle;
pub mod transcript;

pub use errors::{DomainError, Error, FriError, LpcError, PolynomialError, Result};
pub use math::domain::{EvaluationDomain, GeneralEvaluationDomain};
pub use math::polynomial::Polynomial;

/// Plain SHA-256 of `data`, without the leaf/node prefixes of [`hash::Hasher`].
pub fn digest_sha2(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_sha2_known_vector() {
        let digest = digest_sha2(b"abc");
        assert_eq!(&digest[..4], &[0xba, 0x78, 0x16, 0xbf]);
        assert_eq!(digest[31], 0xad);
    }
}
