use super::{
    access_list::AccessList,
    authorization::AuthorizationList,
    eip1559::Eip1559Transaction,
    eip2930::Eip2930Transaction,
    eip7702::Eip7702Transaction,
    legacy::LegacyTransaction,
    legacy_chain_id::LegacyChainIdTransaction,
    payload::SignedPayload,
    signature::Signature,
    GasPrice, SignedTransaction, TransactionT,
};
use crate::{
    bytes::Bytes,
    constants::{EIP1559_TX_TYPE, EIP2930_TX_TYPE, EIP7702_TX_TYPE, MAX_TX_TYPE},
    error::Error,
    Address, TxHash, LOG_TARGET,
};
use primitive_types::{H256, U256};
use rlp::DecoderError;

/// The [`Transaction`] enum represents all Ethereum transaction types.
///
/// Its variants correspond to specific allowed transactions:
/// 1. Legacy (pre-EIP155) [`LegacyTransaction`]
/// 2. Legacy bound to a chain (EIP155) [`LegacyChainIdTransaction`]
/// 3. EIP2930 (state access lists) [`Eip2930Transaction`]
/// 4. EIP1559 [`Eip1559Transaction`]
/// 5. EIP7702 (set code) [`Eip7702Transaction`]
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Transaction {
    Legacy(SignedTransaction<LegacyTransaction>),
    LegacyChainId(SignedTransaction<LegacyChainIdTransaction>),
    Eip2930(SignedTransaction<Eip2930Transaction>),
    Eip1559(SignedTransaction<Eip1559Transaction>),
    Eip7702(SignedTransaction<Eip7702Transaction>),
}

macro_rules! for_each_variant {
    ($self:ident, $tx:ident => $body:expr) => {
        match $self {
            Self::Legacy($tx) => $body,
            Self::LegacyChainId($tx) => $body,
            Self::Eip2930($tx) => $body,
            Self::Eip1559($tx) => $body,
            Self::Eip7702($tx) => $body,
        }
    };
}

impl Transaction {
    /// Decodes any transaction type from its broadcastable encoding.
    ///
    /// The first byte selects the decoder: `0xc0` and above is a legacy rlp list, `0x01`, `0x02`
    /// and `0x04` are [EIP-2718] envelopes. Legacy encodings whose `v` is chain encoded, or
    /// whose `r` and `s` are zero as in the EIP-155 signing message, decode as
    /// [`LegacyChainIdTransaction`].
    ///
    /// [EIP-2718]: https://eips.ethereum.org/EIPS/eip-2718
    ///
    /// # Errors
    /// Returns [`Error::UnknownTransactionType`] for other envelope bytes, and `Err` if the
    /// selected decoder fails.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let first = *bytes.first().ok_or(DecoderError::RlpIsTooShort)?;
        let tx = match first {
            EIP2930_TX_TYPE => Self::Eip2930(SignedTransaction::decode(bytes)?),
            EIP1559_TX_TYPE => Self::Eip1559(SignedTransaction::decode(bytes)?),
            EIP7702_TX_TYPE => Self::Eip7702(SignedTransaction::decode(bytes)?),
            tx_type if tx_type <= MAX_TX_TYPE => {
                return Err(Error::UnknownTransactionType(tx_type))
            },
            _ => Self::decode_legacy(bytes)?,
        };
        tracing::debug!(
            target: LOG_TARGET,
            first_byte = first,
            tx_type = tx.name(),
            "transaction decoded"
        );
        Ok(tx)
    }

    /// Same as [`Transaction::decode`], from a hex string with or without `0x` prefix.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the string isn't valid hex.
    pub fn decode_hex(hex: &str) -> Result<Self, Error> {
        let bytes = const_hex::decode(hex)?;
        Self::decode(&bytes)
    }

    fn decode_legacy(bytes: &[u8]) -> Result<Self, Error> {
        let encoding = SignedPayload::from_bytes(None, bytes, LegacyTransaction::FIELD_COUNT)?;
        let chain_bound = encoding.signature().is_some_and(|signature| {
            signature.v.is_eip155() || (signature.r.is_zero() && signature.s.is_zero())
        });
        if chain_bound {
            Ok(Self::LegacyChainId(SignedTransaction::from_encoding(encoding)?))
        } else {
            Ok(Self::Legacy(SignedTransaction::from_encoding(encoding)?))
        }
    }

    /// Type name of the wrapped transaction.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Legacy(_) => LegacyTransaction::NAME,
            Self::LegacyChainId(_) => LegacyChainIdTransaction::NAME,
            Self::Eip2930(_) => Eip2930Transaction::NAME,
            Self::Eip1559(_) => Eip1559Transaction::NAME,
            Self::Eip7702(_) => Eip7702Transaction::NAME,
        }
    }

    /// EIP-2718 transaction type, `None` for legacy transactions.
    #[must_use]
    pub fn transaction_type(&self) -> Option<u8> {
        for_each_variant!(self, tx => tx.payload().transaction_type())
    }

    #[must_use]
    pub fn chain_id(&self) -> Option<u64> {
        for_each_variant!(self, tx => tx.payload().chain_id())
    }

    #[must_use]
    pub fn nonce(&self) -> u64 {
        for_each_variant!(self, tx => tx.payload().nonce())
    }

    #[must_use]
    pub fn gas_price(&self) -> GasPrice {
        for_each_variant!(self, tx => tx.payload().gas_price())
    }

    #[must_use]
    pub fn gas_limit(&self) -> u64 {
        for_each_variant!(self, tx => tx.payload().gas_limit())
    }

    #[must_use]
    pub fn to(&self) -> Option<Address> {
        for_each_variant!(self, tx => tx.payload().to())
    }

    #[must_use]
    pub fn value(&self) -> U256 {
        for_each_variant!(self, tx => tx.payload().value())
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        for_each_variant!(self, tx => tx.payload().data())
    }

    #[must_use]
    pub fn access_list(&self) -> Option<&AccessList> {
        for_each_variant!(self, tx => tx.payload().access_list())
    }

    #[must_use]
    pub fn authorization_list(&self) -> Option<&AuthorizationList> {
        for_each_variant!(self, tx => tx.payload().authorization_list())
    }

    #[must_use]
    pub fn signature(&self) -> Option<&Signature> {
        for_each_variant!(self, tx => tx.signature())
    }

    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.signature().is_some()
    }

    /// Hash of the signing message.
    #[must_use]
    pub fn raw_hash(&self) -> H256 {
        for_each_variant!(self, tx => tx.raw_hash())
    }

    /// Hash of the broadcastable encoding.
    #[must_use]
    pub fn full_hash(&self) -> TxHash {
        for_each_variant!(self, tx => tx.full_hash())
    }

    #[must_use]
    pub fn encode(&self) -> Bytes {
        for_each_variant!(self, tx => tx.encode())
    }

    #[must_use]
    pub fn encode_raw(&self) -> Bytes {
        for_each_variant!(self, tx => tx.encode_raw())
    }

    /// # Errors
    /// Returns `Err` if the transaction is unsigned or the signature doesn't recover.
    pub fn recover_signer(&self) -> Result<Address, Error> {
        for_each_variant!(self, tx => tx.recover_signer())
    }

    #[must_use]
    pub fn verify(&self) -> bool {
        for_each_variant!(self, tx => tx.verify())
    }
}

impl From<SignedTransaction<LegacyTransaction>> for Transaction {
    fn from(tx: SignedTransaction<LegacyTransaction>) -> Self {
        Self::Legacy(tx)
    }
}

impl From<SignedTransaction<LegacyChainIdTransaction>> for Transaction {
    fn from(tx: SignedTransaction<LegacyChainIdTransaction>) -> Self {
        Self::LegacyChainId(tx)
    }
}

impl From<SignedTransaction<Eip2930Transaction>> for Transaction {
    fn from(tx: SignedTransaction<Eip2930Transaction>) -> Self {
        Self::Eip2930(tx)
    }
}

impl From<SignedTransaction<Eip1559Transaction>> for Transaction {
    fn from(tx: SignedTransaction<Eip1559Transaction>) -> Self {
        Self::Eip1559(tx)
    }
}

impl From<SignedTransaction<Eip7702Transaction>> for Transaction {
    fn from(tx: SignedTransaction<Eip7702Transaction>) -> Self {
        Self::Eip7702(tx)
    }
}
