use super::{
    access_list::AccessList, check_y_parity, payload::SignedPayload, signature::Signature,
    y_parity_v, GasPrice, TransactionT,
};
use crate::{
    bytes::Bytes,
    constants::EIP2930_TX_TYPE,
    error::Error,
    rlp_utils::{encode_element, encode_opt_element},
    Address,
};
#[cfg(feature = "serde")]
use crate::serde_utils::uint_to_hex;
use primitive_types::U256;

/// Transactions with type 0x1 are transactions introduced in EIP-2930. They contain, along with the
/// legacy parameters, an access list which specifies an array of addresses and storage keys that
/// the transaction plans to access (an access list)
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Eip2930Transaction {
    /// The chain ID of the transaction. It is mandatory for EIP-2930 transactions.
    ///
    /// [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
    /// [EIP-2718]: https://eips.ethereum.org/EIPS/eip-2718
    /// [EIP-2930]: https://eips.ethereum.org/EIPS/eip-2930
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub chain_id: u64,

    /// The nonce of the transaction.
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub nonce: u64,

    /// Gas price
    pub gas_price: U256,

    /// Supplied gas
    #[cfg_attr(feature = "serde", serde(rename = "gas", with = "uint_to_hex"))]
    pub gas_limit: u64,

    /// Recipient address (None for contract creation)
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub to: Option<Address>,

    /// Transferred value
    pub value: U256,

    /// The data of the transaction.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Bytes::is_empty"))]
    pub data: Bytes,

    /// Optional access list introduced in EIP-2930.
    /// [EIP-2930]: https://eips.ethereum.org/EIPS/eip-2930
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "AccessList::is_empty"))]
    pub access_list: AccessList,
}

impl TransactionT for Eip2930Transaction {
    const TRANSACTION_TYPE: Option<u8> = Some(EIP2930_TX_TYPE);
    const FIELD_COUNT: usize = 8;
    const NAME: &'static str = "Eip2930Transaction";

    fn encoded_elements(&self) -> Vec<Bytes> {
        vec![
            encode_element(&self.chain_id),
            encode_element(&self.nonce),
            encode_element(&self.gas_price),
            encode_element(&self.gas_limit),
            encode_opt_element(self.to.as_ref()),
            encode_element(&self.value),
            encode_element(&self.data),
            encode_element(&self.access_list),
        ]
    }

    fn from_payload(payload: &mut SignedPayload) -> Result<Self, Error> {
        Ok(Self {
            chain_id: payload.field(0)?,
            nonce: payload.field(1)?,
            gas_price: payload.field(2)?,
            gas_limit: payload.field(3)?,
            to: payload.opt_field(4)?,
            value: payload.field(5)?,
            data: payload.field(6)?,
            access_list: AccessList::decode_rlp(&payload.field_rlp(7)?)?,
        })
    }

    fn compose_v(&self, recovery_index: u8) -> Result<u64, Error> {
        y_parity_v(recovery_index)
    }

    fn check_signature(&self, signature: &Signature) -> Result<(), Error> {
        check_y_parity::<Self>(signature)
    }

    fn chain_id(&self) -> Option<u64> {
        Some(self.chain_id)
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn gas_price(&self) -> GasPrice {
        GasPrice::Legacy(self.gas_price)
    }

    fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    fn to(&self) -> Option<Address> {
        self.to
    }

    fn value(&self) -> U256 {
        self.value
    }

    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn access_list(&self) -> Option<&AccessList> {
        Some(&self.access_list)
    }
}
