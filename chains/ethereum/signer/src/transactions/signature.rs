use crate::{
    constants::{EIP155_V_OFFSET, LEGACY_V_OFFSET},
    error::Error,
    num,
};
#[cfg(feature = "serde")]
use crate::serde_utils::uint_to_hex;
use core::fmt::{Display, Formatter, Result as FmtResult};
use primitive_types::U256;

/// Returns `true` if `v` carries an [EIP-155] chain id, i.e. `v >= 35`.
///
/// [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
#[must_use]
pub const fn is_chain_encoded(v: u64) -> bool {
    v >= EIP155_V_OFFSET
}

/// Returns `true` for the pre typed transactions `v` family, `27`, `28` and any chain encoded
/// value.
#[must_use]
pub const fn is_legacy_style(v: u64) -> bool {
    v >= LEGACY_V_OFFSET
}

/// Returns `true` if `v` is a typed transaction y-parity, `0` or `1`.
#[must_use]
pub const fn is_y_parity(v: u64) -> bool {
    matches!(v, 0 | 1)
}

/// Extracts the chain id of an [EIP-155] `v`, `None` when `v` isn't chain encoded.
///
/// [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
#[must_use]
pub const fn chain_id_from_v(v: u64) -> Option<u64> {
    if is_chain_encoded(v) {
        Some((v - EIP155_V_OFFSET) / 2)
    } else {
        None
    }
}

/// Computes `v - 2 * chain_id - 35`.
///
/// # Errors
/// Returns [`Error::Validation`] if `v` is not a chain encoded `v` of `chain_id`.
pub fn recovery_index_from_chain_v(v: u64, chain_id: u64) -> Result<u8, Error> {
    chain_id
        .checked_mul(2)
        .and_then(|chain| v.checked_sub(chain))
        .and_then(|rest| rest.checked_sub(EIP155_V_OFFSET))
        .and_then(|index| u8::try_from(index).ok())
        .filter(|index| *index <= 3)
        .ok_or_else(|| Error::validation(format!("v {v} is not an EIP-155 v of chain {chain_id}")))
}

/// Computes `2 * chain_id + recovery_index + 35`.
///
/// # Errors
/// Returns [`Error::Validation`] if the recovery index is greater than 3 or `v` overflows `u64`.
pub fn compose_chain_v(chain_id: u64, recovery_index: u8) -> Result<u64, Error> {
    if recovery_index > 3 {
        return Err(Error::InvalidRecoveryIndex(recovery_index));
    }
    chain_id
        .checked_mul(2)
        .and_then(|chain| chain.checked_add(EIP155_V_OFFSET + u64::from(recovery_index)))
        .ok_or_else(|| Error::validation(format!("chain id {chain_id} overflows v")))
}

/// Signing scheme encoded by a signature `v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    /// `v` is `27` or `28`, no replay protection.
    Legacy,
    /// `v = chain_id * 2 + 35 + recovery_index`.
    Eip155 { chain_id: u64 },
    /// `v` is the y-parity `0` or `1`, used by every typed transaction.
    YParity,
}

impl SignatureScheme {
    /// Classifies `v`.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if `v` doesn't belong to any scheme.
    pub fn from_v(v: u64) -> Result<Self, Error> {
        if let Some(chain_id) = chain_id_from_v(v) {
            return Ok(Self::Eip155 { chain_id });
        }
        match v {
            0 | 1 => Ok(Self::YParity),
            27 | 28 => Ok(Self::Legacy),
            _ => Err(Error::validation(format!("invalid signature v: {v}"))),
        }
    }
}

impl Display for SignatureScheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Legacy => f.write_str("legacy"),
            Self::Eip155 { chain_id } => write!(f, "EIP-155 (chain id {chain_id})"),
            Self::YParity => f.write_str("y-parity"),
        }
    }
}

/// An ECDSA signature
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Signature {
    /// The ECDSA recovery id, this value encodes the parity of the y-coordinate of the secp256k1
    /// signature. May also encode the chain_id for legacy EIP-155 transactions.
    pub v: RecoveryId,
    /// The ECDSA signature r
    pub r: U256,
    /// The ECDSA signature s
    pub s: U256,
}

impl Signature {
    /// Builds a signature from big-endian `r` and `s` of at most 32 significant bytes.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if `r` or `s` has more than 32 significant bytes.
    pub fn from_rsv(r: &[u8], s: &[u8], v: u64) -> Result<Self, Error> {
        Ok(Self {
            v: RecoveryId::new(v),
            r: num::u256_from_be_bytes(r)?,
            s: num::u256_from_be_bytes(s)?,
        })
    }

    /// `r` and `s` trimmed of their leading zeros, as encoded on the wire.
    #[must_use]
    pub fn trimmed_rs(&self) -> (Vec<u8>, Vec<u8>) {
        (num::u256_to_be_bytes(self.r), num::u256_to_be_bytes(self.s))
    }

    /// Writes `r || s || y_parity`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_raw_signature(&self, output: &mut [u8; 65]) {
        self.r.to_big_endian(&mut output[0..32]);
        self.s.to_big_endian(&mut output[32..64]);
        output[64] = self.v.y_parity() as u8;
    }

    /// Replaces `v`, keeping `r` and `s`.
    #[must_use]
    pub const fn with_v(self, v: u64) -> Self {
        Self { v: RecoveryId::new(v), r: self.r, s: self.s }
    }

    /// # Errors
    /// Returns [`Error::Validation`] if `v` doesn't belong to any scheme.
    pub fn scheme(&self) -> Result<SignatureScheme, Error> {
        SignatureScheme::from_v(self.v.as_u64())
    }
}

/// The ECDSA recovery id, encodes the parity of the y-coordinate and for EIP-155 compatible
/// transactions also encodes the chain id
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecoveryId(#[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))] u64);

impl RecoveryId {
    #[must_use]
    pub const fn new(v: u64) -> Self {
        Self(v)
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the parity (0 for even, 1 for odd) of the y-value of a secp256k1 signature.
    #[must_use]
    pub const fn y_parity(self) -> u64 {
        let v = self.as_u64();

        // if v is greather or equal to 35, it is an EIP-155 signature
        // [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
        if v >= EIP155_V_OFFSET {
            return (v - EIP155_V_OFFSET) & 1;
        }

        // 27 or 28, it is a legacy signature
        if v == 27 || v == 28 {
            return v - LEGACY_V_OFFSET;
        }

        // otherwise, simply return the parity of the least significant bit
        v & 1
    }

    /// The recovery index selected by this `v`, whatever its scheme.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if `v` doesn't belong to any scheme.
    #[allow(clippy::cast_possible_truncation)]
    pub fn recovery_index(self) -> Result<u8, Error> {
        let v = self.as_u64();
        match SignatureScheme::from_v(v)? {
            SignatureScheme::Eip155 { chain_id } => recovery_index_from_chain_v(v, chain_id),
            SignatureScheme::Legacy => Ok((v - LEGACY_V_OFFSET) as u8),
            SignatureScheme::YParity => Ok(v as u8),
        }
    }

    #[must_use]
    pub const fn chain_id(self) -> Option<u64> {
        chain_id_from_v(self.as_u64())
    }

    #[must_use]
    pub const fn is_eip155(self) -> bool {
        is_chain_encoded(self.as_u64())
    }

    /// the recovery id is encoded as 0 or 1 for typed transactions.
    #[must_use]
    pub const fn is_y_parity(self) -> bool {
        is_y_parity(self.as_u64())
    }

    /// Returns a legacy signature `v`, `27` or `28`
    #[must_use]
    pub const fn as_legacy(self) -> u64 {
        self.y_parity() + LEGACY_V_OFFSET
    }
}

impl From<RecoveryId> for u64 {
    fn from(v: RecoveryId) -> Self {
        v.as_u64()
    }
}

impl From<u64> for RecoveryId {
    fn from(v: u64) -> Self {
        Self::new(v)
    }
}

impl rlp::Encodable for RecoveryId {
    fn rlp_append(&self, s: &mut rlp::RlpStream) {
        let v = self.as_u64();
        <u64 as rlp::Encodable>::rlp_append(&v, s);
    }
}

impl rlp::Decodable for RecoveryId {
    fn decode(rlp: &rlp::Rlp) -> Result<Self, rlp::DecoderError> {
        let v = <u64 as rlp::Decodable>::decode(rlp)?;
        Ok(Self::new(v))
    }
}
