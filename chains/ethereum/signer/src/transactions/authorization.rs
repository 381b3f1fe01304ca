//! [EIP-7702] authorization tuples, signed independently of the transaction that carries them.
//!
//! [EIP-7702]: https://eips.ethereum.org/EIPS/eip-7702
use crate::{
    constants::AUTHORIZATION_MAGIC,
    crypto::{Crypto, DefaultCrypto, Signer},
    error::Error,
    num, recovery,
    rlp_utils::RlpExt,
    transactions::{payload::decode_signature, signature::Signature},
    Address, LOG_TARGET,
};
use bytes::{BufMut, BytesMut};
use primitive_types::{H256, U256};
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

/// Unsigned delegation of an account to the code at `address`.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash, rlp_derive::RlpEncodable)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Authorization {
    /// Chain where the delegation is valid, zero means any chain.
    pub chain_id: U256,
    /// Address of the delegated code.
    pub address: Address,
    /// Nonce of the authority account.
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_utils::uint_to_hex"))]
    pub nonce: u64,
}

impl Authorization {
    #[must_use]
    pub const fn new(chain_id: U256, address: Address, nonce: u64) -> Self {
        Self { chain_id, address, nonce }
    }

    /// Builds an authorization from big-endian byte fields.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if `chain_id >= 2^256`, `nonce >= 2^64` or the address is
    /// not 20 bytes long.
    pub fn try_from_parts(chain_id: &[u8], address: &[u8], nonce: &[u8]) -> Result<Self, Error> {
        if address.len() != Address::len_bytes() {
            return Err(Error::validation(format!(
                "authorization address must be 20 bytes, got {}",
                address.len()
            )));
        }
        Ok(Self {
            chain_id: num::u256_from_be_bytes(chain_id)?,
            address: Address::from_slice(address),
            nonce: num::u64_from_be_bytes(nonce)?,
        })
    }

    /// `0x05 || rlp([chain_id, address, nonce])`
    #[must_use]
    pub fn signing_message(&self) -> BytesMut {
        let encoded = rlp::encode(self);
        let mut message = BytesMut::with_capacity(encoded.len() + 1);
        message.put_u8(AUTHORIZATION_MAGIC);
        message.extend_from_slice(&encoded);
        message
    }

    /// Keccak256 of [`Authorization::signing_message`].
    #[must_use]
    pub fn signature_hash(&self) -> H256 {
        let hash = DefaultCrypto::keccak256(self.signing_message());
        tracing::trace!(target: LOG_TARGET, %hash, nonce = self.nonce, "authorization hash");
        hash
    }

    /// Signs the authorization.
    ///
    /// # Errors
    /// Returns `Err` if the signer fails.
    pub fn sign<S>(self, signer: &S) -> Result<SignedAuthorization, Error>
    where
        S: Signer,
        S::Error: Into<Error>,
    {
        let signature = signer.sign_prehash(self.signature_hash()).map_err(Into::into)?;
        self.into_signed(signature)
    }

    /// Attaches an externally produced signature.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if `v` is not a y-parity.
    pub fn into_signed(self, signature: Signature) -> Result<SignedAuthorization, Error> {
        if !signature.v.is_y_parity() {
            return Err(Error::validation(format!(
                "authorization signatures use a y-parity v, got {}",
                signature.v.as_u64()
            )));
        }
        Ok(SignedAuthorization { authorization: self, signature })
    }

    /// Decodes `[chain_id, address, nonce]` or `[chain_id, address, nonce, v, r, s]`, an empty
    /// signature decodes as `None`.
    ///
    /// # Errors
    /// Returns `Err` if the item is not a list of 3 or 6 valid elements.
    pub fn decode_rlp(rlp: &Rlp) -> Result<(Self, Option<Signature>), Error> {
        let is_signed = match rlp.item_count()? {
            3 => false,
            6 => true,
            _ => return Err(DecoderError::RlpIncorrectListLen.into()),
        };
        let authorization =
            Self::try_from_parts(rlp.data_at(0)?, rlp.data_at(1)?, rlp.data_at(2)?)?;
        let signature = if is_signed { decode_signature(rlp, 3)? } else { None };
        Ok((authorization, signature))
    }
}

/// An [`Authorization`] with its y-parity signature, the form embedded in transactions.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct SignedAuthorization {
    #[cfg_attr(feature = "serde", serde(flatten))]
    authorization: Authorization,
    #[cfg_attr(feature = "serde", serde(flatten))]
    signature: Signature,
}

impl SignedAuthorization {
    #[must_use]
    pub const fn authorization(&self) -> &Authorization {
        &self.authorization
    }

    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Recovers the address that signed this authorization.
    ///
    /// # Errors
    /// Returns `Err` if the signature doesn't recover to a public key.
    pub fn recover_authority(&self) -> Result<Address, Error> {
        let hash = self.authorization.signature_hash();
        recovery::recover_address::<DefaultCrypto>(&self.signature, hash)
    }

    #[must_use]
    pub fn into_parts(self) -> (Authorization, Signature) {
        (self.authorization, self.signature)
    }
}

impl Encodable for SignedAuthorization {
    fn rlp_append(&self, s: &mut RlpStream) {
        let (r, sig_s) = self.signature.trimmed_rs();
        s.begin_list(6)
            .append(&self.authorization.chain_id)
            .append(&self.authorization.address)
            .append(&self.authorization.nonce)
            .append(&self.signature.v)
            .append(&r)
            .append(&sig_s);
    }
}

impl Decodable for SignedAuthorization {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        let (authorization, signature) =
            Authorization::decode_rlp(rlp).map_err(|error| match error {
                Error::Rlp(error) => error,
                _ => DecoderError::Custom("invalid authorization"),
            })?;
        let signature =
            signature.ok_or(DecoderError::Custom("authorization signature is missing"))?;
        authorization
            .into_signed(signature)
            .map_err(|_| DecoderError::Custom("invalid authorization signature"))
    }
}

/// List of signed authorizations carried by an [EIP-7702] transaction.
///
/// [EIP-7702]: https://eips.ethereum.org/EIPS/eip-7702
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash, rlp_derive::RlpEncodableWrapper)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuthorizationList(pub Vec<SignedAuthorization>);

impl AuthorizationList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignedAuthorization> {
        self.0.iter()
    }

    /// Decodes the list, every item must be signed.
    ///
    /// # Errors
    /// Returns `Err` if an item is malformed or unsigned.
    pub fn decode_rlp(rlp: &Rlp) -> Result<Self, Error> {
        if !rlp.is_list() {
            return Err(DecoderError::RlpExpectedToBeList.into());
        }
        let mut items = Vec::with_capacity(rlp.item_count()?);
        for item in rlp {
            let (authorization, signature) = Authorization::decode_rlp(&item)?;
            let signature = signature
                .ok_or_else(|| Error::validation("authorization list items must be signed"))?;
            items.push(authorization.into_signed(signature)?);
        }
        Ok(Self(items))
    }
}

impl From<Vec<SignedAuthorization>> for AuthorizationList {
    fn from(src: Vec<SignedAuthorization>) -> Self {
        Self(src)
    }
}

impl Decodable for AuthorizationList {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        Ok(Self(rlp.as_list()?))
    }
}
