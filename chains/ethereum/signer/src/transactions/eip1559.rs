use super::{
    access_list::AccessList, check_y_parity, payload::SignedPayload, signature::Signature,
    y_parity_v, GasPrice, TransactionT,
};
use crate::{
    bytes::Bytes,
    constants::EIP1559_TX_TYPE,
    error::Error,
    rlp_utils::{encode_element, encode_opt_element},
    Address,
};
#[cfg(feature = "serde")]
use crate::serde_utils::uint_to_hex;
use primitive_types::U256;

/// Transactions with type 0x2 are transactions introduced in EIP-1559, included in Ethereum's
/// London fork. EIP-1559 addresses the network congestion and overpricing of transaction fees
/// caused by the historical fee market, in which users send transactions specifying a gas price bid
/// using the gasPrice parameter, and miners choose transactions with the highest bids.
///
/// EIP-1559 transactions don’t specify gasPrice, and instead use an in-protocol, dynamically
/// changing base fee per gas. At each block, the base fee per gas is adjusted to address network
/// congestion as measured by a gas target.
///
/// An EIP-1559 transaction always pays the base fee of the block it’s included in, and it pays a
/// priority fee as priced by `max_priority_fee_per_gas` or, if the base fee per gas +
/// `max_priority_fee_per_gas` exceeds `max_fee_per_gas`, it pays a priority fee as priced by
/// `max_fee_per_gas` minus the base fee per gas. The base fee is burned, and the priority fee is
/// paid to the miner that included the transaction. A transaction’s priority fee per gas
/// incentivizes miners to include the transaction over other transactions with lower priority fees
/// per gas.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Eip1559Transaction {
    /// The chain ID of the transaction. It is mandatory for EIP-1559 transactions.
    ///
    /// [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
    /// [EIP-2718]: https://eips.ethereum.org/EIPS/eip-2718
    /// [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub chain_id: u64,

    /// The nonce of the transaction.
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub nonce: u64,

    /// Represents the maximum tx fee that will go to the miner as part of the user's
    /// fee payment. It serves 3 purposes:
    /// 1. Compensates miners for the uncle/ommer risk + fixed costs of including transaction in a
    /// block;
    /// 2. Allows users with high opportunity costs to pay a premium to miners;
    /// 3. In times where demand exceeds the available block space (i.e. 100% full, 30mm gas),
    /// this component allows first price auctions (i.e. the pre-1559 fee model) to happen on the
    /// priority fee.
    ///
    /// Incorporated as part of the London upgrade via [EIP-1559].
    /// [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559
    pub max_priority_fee_per_gas: U256,

    /// Represents the maximum amount that a user is willing to pay for their tx (inclusive of
    /// baseFeePerGas and maxPriorityFeePerGas). The difference between maxFeePerGas and
    /// baseFeePerGas + maxPriorityFeePerGas is “refunded” to the user.
    ///
    /// Incorporated as part of the London upgrade via [EIP-1559].
    /// [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559
    pub max_fee_per_gas: U256,

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

impl TransactionT for Eip1559Transaction {
    const TRANSACTION_TYPE: Option<u8> = Some(EIP1559_TX_TYPE);
    const FIELD_COUNT: usize = 9;
    const NAME: &'static str = "Eip1559Transaction";

    fn encoded_elements(&self) -> Vec<Bytes> {
        vec![
            encode_element(&self.chain_id),
            encode_element(&self.nonce),
            encode_element(&self.max_priority_fee_per_gas),
            encode_element(&self.max_fee_per_gas),
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
            max_priority_fee_per_gas: payload.field(2)?,
            max_fee_per_gas: payload.field(3)?,
            gas_limit: payload.field(4)?,
            to: payload.opt_field(5)?,
            value: payload.field(6)?,
            data: payload.field(7)?,
            access_list: AccessList::decode_rlp(&payload.field_rlp(8)?)?,
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
        GasPrice::Eip1559 {
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            max_fee_per_gas: self.max_fee_per_gas,
        }
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
