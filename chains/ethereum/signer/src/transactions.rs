pub mod access_list;
pub mod authorization;
pub mod eip1559;
pub mod eip2930;
pub mod eip7702;
pub mod legacy;
pub mod legacy_chain_id;
pub mod payload;
pub mod signature;
pub mod signed_transaction;
pub mod typed_transaction;

use crate::{bytes::Bytes, error::Error, Address};
pub use access_list::AccessList;
pub use authorization::AuthorizationList;
pub use legacy::LegacyTransaction;
pub use legacy_chain_id::LegacyChainIdTransaction;
pub use payload::SignedPayload;
use primitive_types::U256;
pub use signature::{Signature, SignatureScheme};
pub use signed_transaction::SignedTransaction;
pub use typed_transaction::Transaction;

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum GasPrice {
    Legacy(U256),
    Eip1559 { max_priority_fee_per_gas: U256, max_fee_per_gas: U256 },
}

impl Default for GasPrice {
    fn default() -> Self {
        Self::Legacy(U256::zero())
    }
}

/// Field layout, envelope and signing domain of one transaction type.
pub trait TransactionT: Sized {
    /// [EIP-2718] envelope byte, `None` for legacy transactions.
    ///
    /// [EIP-2718]: https://eips.ethereum.org/EIPS/eip-2718
    const TRANSACTION_TYPE: Option<u8>;

    /// Number of fields, signature excluded.
    const FIELD_COUNT: usize;

    /// Type name used in error messages.
    const NAME: &'static str;

    /// The rlp encoded fields in wire order, signature excluded.
    fn encoded_elements(&self) -> Vec<Bytes>;

    /// Decodes the fields of `payload`. May consume the payload signature when it is not a
    /// real signature, as the chain id placeholder of an unsigned [EIP-155] transaction.
    ///
    /// [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
    ///
    /// # Errors
    /// Returns `Err` if a field can't be decoded.
    fn from_payload(payload: &mut SignedPayload) -> Result<Self, Error>;

    /// Items appended to the fields when computing the signing hash only.
    fn signing_extension(&self) -> Vec<Bytes> {
        Vec::new()
    }

    /// The `v` this transaction type encodes for `recovery_index`.
    ///
    /// # Errors
    /// Returns `Err` if `v` can't be represented.
    fn compose_v(&self, recovery_index: u8) -> Result<u64, Error>;

    /// Checks the signature belongs to this transaction signing domain.
    ///
    /// # Errors
    /// Returns [`Error::WrongTransactionClass`] if `v` belongs to another transaction type.
    fn check_signature(&self, signature: &Signature) -> Result<(), Error>;

    // chain id, is only None for Legacy Transactions
    fn chain_id(&self) -> Option<u64>;
    fn nonce(&self) -> u64;
    fn gas_price(&self) -> GasPrice;
    fn gas_limit(&self) -> u64;
    fn to(&self) -> Option<Address>;
    fn value(&self) -> U256;
    fn data(&self) -> &[u8];

    /// EIP-2930 access list
    fn access_list(&self) -> Option<&AccessList> {
        None
    }

    /// EIP-7702 authorization list
    fn authorization_list(&self) -> Option<&AuthorizationList> {
        None
    }

    /// EIP-2718 transaction type
    fn transaction_type(&self) -> Option<u8> {
        Self::TRANSACTION_TYPE
    }
}

/// `check_signature` of the typed transactions, which all sign with a y-parity `v`.
pub(crate) fn check_y_parity<T: TransactionT>(signature: &Signature) -> Result<(), Error> {
    let found = signature.scheme()?;
    let use_instead = match found {
        SignatureScheme::YParity => return Ok(()),
        SignatureScheme::Eip155 { .. } => LegacyChainIdTransaction::NAME,
        SignatureScheme::Legacy => LegacyTransaction::NAME,
    };
    Err(Error::WrongTransactionClass { expected: T::NAME, found, use_instead })
}

/// `compose_v` of the typed transactions.
pub(crate) fn y_parity_v(recovery_index: u8) -> Result<u64, Error> {
    if recovery_index > 1 {
        return Err(Error::InvalidRecoveryIndex(recovery_index));
    }
    Ok(u64::from(recovery_index))
}
