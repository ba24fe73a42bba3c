//! Canonical byte encoding of field elements.
//!
//! Every element is written as the fixed-length big-endian encoding of its
//! canonical integer representative. The same bytes are used as Merkle leaf
//! material and as transcript input, so prover and verifier must agree on them
//! bit for bit.

use ark_ff::{BigInteger, PrimeField};

use crate::errors::Error;

/// Number of bytes in the encoding of one element of `F`.
pub fn field_byte_len<F: PrimeField>() -> usize {
    F::zero().into_bigint().to_bytes_be().len()
}

/// Big-endian encoding of `value`.
pub fn field_to_bytes<F: PrimeField>(value: &F) -> Vec<u8> {
    value.into_bigint().to_bytes_be()
}

/// Concatenated encodings of `values`.
pub fn fields_to_bytes<F: PrimeField>(values: &[F]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * field_byte_len::<F>());
    for value in values {
        out.extend_from_slice(&field_to_bytes(value));
    }
    out
}

/// Decodes a big-endian encoding produced by [`field_to_bytes`].
///
/// Rejects inputs of the wrong length and integers that are not reduced modulo
/// the field characteristic.
pub fn field_from_bytes<F: PrimeField>(bytes: &[u8]) -> Result<F, Error> {
    let expected = field_byte_len::<F>();
    if bytes.len() != expected {
        return Err(Error::InvalidFieldElement(format!(
            "expected {expected} bytes, got {}",
            bytes.len()
        )));
    }
    let value = F::from_be_bytes_mod_order(bytes);
    if field_to_bytes(&value) != bytes {
        return Err(Error::InvalidFieldElement(
            "integer is not reduced modulo the field order".to_string(),
        ));
    }
    Ok(value)
}

/// Serde adapter for `Vec<F>` using the canonical big-endian encoding.
pub mod serde_fields {
    use ark_ff::PrimeField;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{field_from_bytes, field_to_bytes};

    pub fn serialize<F: PrimeField, S: Serializer>(
        values: &[F],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let encoded: Vec<Vec<u8>> = values.iter().map(field_to_bytes).collect();
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, F: PrimeField, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<F>, D::Error> {
        let encoded = Vec::<Vec<u8>>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|bytes| field_from_bytes(bytes).map_err(D::Error::custom))
            .collect()
    }
}

/// Serde adapter for `Vec<Vec<F>>`.
pub mod serde_field_rows {
    use ark_ff::PrimeField;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{field_from_bytes, field_to_bytes};

    pub fn serialize<F: PrimeField, S: Serializer>(
        rows: &[Vec<F>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let encoded: Vec<Vec<Vec<u8>>> = rows
            .iter()
            .map(|row| row.iter().map(field_to_bytes).collect())
            .collect();
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, F: PrimeField, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<F>>, D::Error> {
        let encoded = Vec::<Vec<Vec<u8>>>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|row| {
                row.iter()
                    .map(|bytes| field_from_bytes(bytes).map_err(D::Error::custom))
                    .collect()
            })
            .collect()
    }
}
