mod bytes;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod legacy_signer;
pub mod num;
pub mod recovery;
pub mod rlp_utils;
#[cfg(feature = "serde")]
pub mod serde_utils;
pub mod transactions;

pub use self::bytes::{Bytes, ParseBytesError};
pub use constants::Chain;
pub use error::Error;
pub use legacy_signer::LegacyTransactionSigner;
pub use primitive_types::{H160, H256, U256};
pub use transactions::{
    access_list::{AccessList, AccessListItem},
    authorization::{Authorization, AuthorizationList, SignedAuthorization},
    eip1559::Eip1559Transaction,
    eip2930::Eip2930Transaction,
    eip7702::Eip7702Transaction,
    legacy::LegacyTransaction,
    legacy_chain_id::LegacyChainIdTransaction,
    signature::{RecoveryId, Signature, SignatureScheme},
    signed_transaction::SignedTransaction,
    typed_transaction::Transaction,
    GasPrice, TransactionT,
};

pub type Address = H160;
pub type TxHash = H256;

/// Target used by every `tracing` event emitted by this crate.
pub(crate) const LOG_TARGET: &str = "rosetta-ethereum-signer";

/// Re-exports for downstream crates to not require any additional
/// dependencies to be explicitly added on the client side.
pub mod ext {
    pub use bytes;
    pub use const_hex;
    pub use libsecp256k1;
    pub use primitive_types;
    pub use rlp;
    pub use secp256k1;
    pub use sha3;
}
