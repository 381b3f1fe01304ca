use crate::transactions::signature::SignatureScheme;

/// Errors produced while building, encoding, decoding, signing or recovering transactions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A field is malformed or out of range, e.g. an address that is not 20 bytes long.
    #[error("validation error: {0}")]
    Validation(String),

    /// The signature `v` belongs to another transaction class, `use_instead` names the type
    /// that accepts it.
    #[error("{expected} does not accept {found} signatures, use {use_instead} instead")]
    WrongTransactionClass {
        expected: &'static str,
        found: SignatureScheme,
        use_instead: &'static str,
    },

    /// None of the four candidate recovery indexes produce the expected public key.
    #[error("signature recovery impossible: no recovery index matches the public key")]
    RecoveryImpossible,

    /// The EC engine could not recover a public key for this index and message hash.
    #[error("invalid recovery index: {0}")]
    InvalidRecoveryIndex(u8),

    #[error("malformed access list: every item must have exactly two elements")]
    MalformedAccessList,

    #[error("unknown transaction type: {0:#04x}")]
    UnknownTransactionType(u8),

    #[error("rlp decoding failed: {0}")]
    Rlp(#[from] rlp::DecoderError),

    #[error("secp256k1: {0}")]
    Secp256k1(#[from] secp256k1::Error),
}

impl Error {
    pub(crate) fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<const_hex::FromHexError> for Error {
    fn from(error: const_hex::FromHexError) -> Self {
        Self::Validation(format!("invalid hex: {error}"))
    }
}
