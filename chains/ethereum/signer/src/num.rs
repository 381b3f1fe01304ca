//! Conversions between unsigned integers and minimal big-endian byte strings.
use crate::error::Error;
use primitive_types::U256;

/// Strips the leading zero bytes, an all zeros input yields an empty slice.
#[must_use]
pub fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Left pads `bytes` with zeros up to `N` bytes, leading zeros beyond `N` are ignored.
///
/// # Errors
/// Returns [`Error::Validation`] if the significant bytes don't fit in `N` bytes.
pub fn pad_left<const N: usize>(bytes: &[u8]) -> Result<[u8; N], Error> {
    let bytes = trim_leading_zeros(bytes);
    if bytes.len() > N {
        return Err(Error::validation(format!(
            "expected at most {N} significant bytes, got {}",
            bytes.len()
        )));
    }
    let mut output = [0u8; N];
    output[N - bytes.len()..].copy_from_slice(bytes);
    Ok(output)
}

/// Minimal big-endian representation of `value`, zero is the empty byte string.
#[must_use]
pub fn u256_to_be_bytes(value: U256) -> Vec<u8> {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    trim_leading_zeros(&bytes).to_vec()
}

/// # Errors
/// Returns [`Error::Validation`] if the value doesn't fit in 64 bits.
pub fn u64_from_be_bytes(bytes: &[u8]) -> Result<u64, Error> {
    pad_left::<8>(bytes).map(u64::from_be_bytes)
}

/// # Errors
/// Returns [`Error::Validation`] if the value doesn't fit in 256 bits.
pub fn u256_from_be_bytes(bytes: &[u8]) -> Result<U256, Error> {
    pad_left::<32>(bytes).map(|bytes| U256::from_big_endian(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn trims_leading_zeros() {
        assert_eq!(trim_leading_zeros(&[0, 0, 1, 0]), &[1, 0]);
        assert_eq!(trim_leading_zeros(&[0, 0]), &[] as &[u8]);
        assert_eq!(trim_leading_zeros(&[]), &[] as &[u8]);
    }

    #[test]
    fn minimal_big_endian() {
        assert!(u256_to_be_bytes(U256::zero()).is_empty());
        assert_eq!(u256_to_be_bytes(U256::from(20_000_000_000u64)), hex!("04a817c800").to_vec());
    }

    #[test]
    fn parses_big_endian() {
        assert_eq!(u64_from_be_bytes(&[]).unwrap(), 0);
        assert_eq!(u64_from_be_bytes(&hex!("0000000000000000ff")).unwrap(), 0xff);
        assert_eq!(u256_from_be_bytes(&hex!("04a817c800")).unwrap(), U256::from(20_000_000_000u64));
        assert!(matches!(u64_from_be_bytes(&hex!("010000000000000000")), Err(Error::Validation(_))));
        assert!(matches!(u256_from_be_bytes(&[1u8; 33]), Err(Error::Validation(_))));
    }

    #[test]
    fn pads_signature_components() {
        let padded = pad_left::<32>(&hex!("604383eacb4bbef6e1aad0ccac46636074b606cd46fba6fd6f2930c660fb54")).unwrap();
        assert_eq!(padded, hex!("00604383eacb4bbef6e1aad0ccac46636074b606cd46fba6fd6f2930c660fb54"));
    }
}
