use super::{payload::SignedPayload, signature::Signature, TransactionT};
use crate::{
    bytes::Bytes,
    crypto::{Crypto, DefaultCrypto, Signer},
    error::Error,
    recovery, Address, TxHash, LOG_TARGET,
};
use primitive_types::H256;

/// A transaction together with its encoded fields and optional signature.
///
/// The transaction is immutable once wrapped, only the signature can change.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SignedTransaction<T> {
    payload: T,
    encoding: SignedPayload,
}

impl<T> SignedTransaction<T>
where
    T: TransactionT,
{
    /// Wraps an unsigned transaction.
    pub fn new(payload: T) -> Self {
        let encoding = SignedPayload::from_fields(T::TRANSACTION_TYPE, payload.encoded_elements());
        Self { payload, encoding }
    }

    /// Wraps a transaction with an existing signature.
    ///
    /// # Errors
    /// Returns [`Error::WrongTransactionClass`] if the signature `v` belongs to another
    /// transaction type.
    pub fn with_signature(payload: T, signature: Signature) -> Result<Self, Error> {
        let mut tx = Self::new(payload);
        tx.set_signature(signature)?;
        Ok(tx)
    }

    /// Builds and signs the transaction in one step.
    ///
    /// # Errors
    /// Returns `Err` if signing fails.
    pub fn new_signed<S>(payload: T, signer: &S) -> Result<Self, Error>
    where
        S: Signer,
        S::Error: Into<Error>,
    {
        let mut tx = Self::new(payload);
        tx.sign(signer)?;
        Ok(tx)
    }

    /// Decodes the output of [`SignedTransaction::encode`].
    ///
    /// # Errors
    /// Returns `Err` if the bytes are not a valid encoding of this transaction type, or if they
    /// carry a signature of another transaction type.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let encoding = SignedPayload::from_bytes(T::TRANSACTION_TYPE, bytes, T::FIELD_COUNT)?;
        Self::from_encoding(encoding)
    }

    pub(crate) fn from_encoding(mut encoding: SignedPayload) -> Result<Self, Error> {
        let payload = T::from_payload(&mut encoding)?;
        if let Some(signature) = encoding.signature() {
            payload.check_signature(signature)?;
        }
        Ok(Self { payload, encoding })
    }

    pub const fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    pub const fn signature(&self) -> Option<&Signature> {
        self.encoding.signature()
    }

    pub const fn is_signed(&self) -> bool {
        self.encoding.signature().is_some()
    }

    /// Attaches or replaces the signature.
    ///
    /// # Errors
    /// Returns [`Error::WrongTransactionClass`] if the signature `v` belongs to another
    /// transaction type.
    pub fn set_signature(&mut self, signature: Signature) -> Result<(), Error> {
        self.payload.check_signature(&signature)?;
        self.encoding.set_signature(signature);
        Ok(())
    }

    /// Signs the raw hash and attaches the signature, replacing any previous one.
    ///
    /// # Errors
    /// Returns `Err` if the signer fails or returns an invalid recovery index.
    pub fn sign<S>(&mut self, signer: &S) -> Result<Signature, Error>
    where
        S: Signer,
        S::Error: Into<Error>,
    {
        let raw_hash = self.raw_hash();
        let signature = signer.sign_prehash(raw_hash).map_err(Into::into)?;
        let recovery_index = signature.v.recovery_index()?;
        let signature = signature.with_v(self.payload.compose_v(recovery_index)?);
        tracing::debug!(
            target: LOG_TARGET,
            tx_type = T::NAME,
            %raw_hash,
            recovery_index,
            v = signature.v.as_u64(),
            "transaction signed"
        );
        self.set_signature(signature)?;
        Ok(signature)
    }

    /// The rlp encoded fields, signature excluded.
    pub fn encoded_elements(&self) -> &[Bytes] {
        self.encoding.fields()
    }

    /// The signing message: envelope byte and the rlp list of the fields, extended with the
    /// signing only items of the transaction type.
    pub fn encode_raw(&self) -> Bytes {
        self.encoding.encode_raw_with(&self.payload.signing_extension())
    }

    /// Hash signed by the sender, unaffected by the signature.
    pub fn raw_hash(&self) -> H256 {
        let hash = self.encoding.raw_hash_with(&self.payload.signing_extension());
        tracing::trace!(target: LOG_TARGET, tx_type = T::NAME, %hash, "raw hash");
        hash
    }

    /// The broadcastable encoding, envelope byte and the rlp list of the fields plus `v`, `r`,
    /// `s`.
    ///
    /// Unsigned transactions encode `v`, `r` and `s` as empty strings, except types with signing
    /// only items which encode as their signing message so no field is lost.
    pub fn encode(&self) -> Bytes {
        if !self.is_signed() {
            let extension = self.payload.signing_extension();
            if !extension.is_empty() {
                return self.encoding.encode_raw_with(&extension);
            }
        }
        self.encoding.encoded().clone()
    }

    /// Hash of the signed encoding, the transaction identifier.
    pub fn full_hash(&self) -> TxHash {
        let hash = DefaultCrypto::keccak256(self.encode());
        tracing::trace!(target: LOG_TARGET, tx_type = T::NAME, %hash, "full hash");
        hash
    }

    /// Recovers the sender address using the given crypto implementation.
    ///
    /// # Errors
    /// Returns `Err` if the transaction is unsigned or the signature doesn't recover.
    pub fn recover_signer_with<C: Crypto>(&self) -> Result<Address, Error> {
        let signature = self.signature().ok_or_else(|| {
            Error::validation("cannot recover the signer of an unsigned transaction")
        })?;
        recovery::recover_address::<C>(signature, self.raw_hash())
    }

    /// Recovers the sender address.
    ///
    /// # Errors
    /// Returns `Err` if the transaction is unsigned or the signature doesn't recover.
    pub fn recover_signer(&self) -> Result<Address, Error> {
        self.recover_signer_with::<DefaultCrypto>()
    }

    /// Returns `true` if the transaction is signed and its signer can be recovered.
    pub fn verify(&self) -> bool {
        self.recover_signer().is_ok()
    }
}

impl<T> From<T> for SignedTransaction<T>
where
    T: TransactionT,
{
    fn from(payload: T) -> Self {
        Self::new(payload)
    }
}
