use super::{
    access_list::AccessList, authorization::AuthorizationList, check_y_parity,
    payload::SignedPayload, signature::Signature, y_parity_v, GasPrice, TransactionT,
};
use crate::{
    bytes::Bytes,
    constants::EIP7702_TX_TYPE,
    error::Error,
    rlp_utils::{encode_element, encode_opt_element},
    Address,
};
#[cfg(feature = "serde")]
use crate::serde_utils::uint_to_hex;
use primitive_types::U256;

/// Transactions with type 0x4 are set code transactions introduced in EIP-7702. Along with the
/// EIP-1559 fee market fields they carry an authorization list, each item independently signed by
/// an account delegating its code to a contract address.
///
/// [EIP-7702]: https://eips.ethereum.org/EIPS/eip-7702
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Eip7702Transaction {
    /// The chain ID of the transaction.
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub chain_id: u64,

    /// The nonce of the transaction.
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub nonce: u64,

    /// Maximum tip paid to the block producer, see [`super::eip1559::Eip1559Transaction`].
    pub max_priority_fee_per_gas: U256,

    /// Maximum total fee per gas, base fee included.
    pub max_fee_per_gas: U256,

    /// Supplied gas
    #[cfg_attr(feature = "serde", serde(rename = "gas", with = "uint_to_hex"))]
    pub gas_limit: u64,

    /// Recipient address
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub to: Option<Address>,

    /// Transferred value
    pub value: U256,

    /// The data of the transaction.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Bytes::is_empty"))]
    pub data: Bytes,

    /// Optional access list introduced in EIP-2930.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "AccessList::is_empty"))]
    pub access_list: AccessList,

    /// Signed code delegations.
    #[cfg_attr(feature = "serde", serde(default))]
    pub authorization_list: AuthorizationList,
}

impl TransactionT for Eip7702Transaction {
    const TRANSACTION_TYPE: Option<u8> = Some(EIP7702_TX_TYPE);
    const FIELD_COUNT: usize = 10;
    const NAME: &'static str = "Eip7702Transaction";

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
            encode_element(&self.authorization_list),
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
            authorization_list: AuthorizationList::decode_rlp(&payload.field_rlp(9)?)?,
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

    fn authorization_list(&self) -> Option<&AuthorizationList> {
        Some(&self.authorization_list)
    }
}

#[cfg(test)]
mod tests {
    use super::Eip7702Transaction;
    use crate::{
        crypto::Keypair,
        error::Error,
        transactions::{
            authorization::{tests::authorization, AuthorizationList},
            legacy::tests::SECRET,
            AccessList, SignedTransaction, TransactionT,
        },
        Bytes,
    };
    use hex_literal::hex;
    use primitive_types::{H256, U256};

    static RLP_EIP7702_UNSIGNED: &[u8] = &hex!("04f887010184773594008506fc23ac00830186a0941ad91ee08f21be3de0ba2ba6918e714da6b458368080c0f85cf85a019411111111111111111111111111111111111111118001a0b27ae918868f156ecc2b55eba1e3cd7a97836f4f5a198cea3aaabeb20ca17b67a0414c2f56457cea3fd18819ff0a26a2e4faacabbc9a371f312f3984ac7a499cbc");
    static RLP_EIP7702_SIGNED: &[u8] = &hex!("04f8c9010184773594008506fc23ac00830186a0941ad91ee08f21be3de0ba2ba6918e714da6b458368080c0f85cf85a019411111111111111111111111111111111111111118001a0b27ae918868f156ecc2b55eba1e3cd7a97836f4f5a198cea3aaabeb20ca17b67a0414c2f56457cea3fd18819ff0a26a2e4faacabbc9a371f312f3984ac7a499cbc809f604383eacb4bbef6e1aad0ccac46636074b606cd46fba6fd6f2930c660fb54a059d58a7b029a49bb4669cdc666472ad7c21eb8a365ac209c482e5204a0e0c513");

    fn build_eip7702(keypair: &Keypair) -> Eip7702Transaction {
        Eip7702Transaction {
            chain_id: 1,
            nonce: 1,
            max_priority_fee_per_gas: U256::from(2_000_000_000u64),
            max_fee_per_gas: U256::from(30_000_000_000u64),
            gas_limit: 100_000,
            to: Some(hex!("1ad91ee08f21be3de0ba2ba6918e714da6b45836").into()),
            value: U256::zero(),
            data: Bytes::new(),
            access_list: AccessList::default(),
            authorization_list: AuthorizationList(vec![authorization().sign(keypair).unwrap()]),
        }
    }

    #[test]
    fn sign_eip7702() {
        let keypair = Keypair::from_bytes(SECRET).unwrap();
        let tx = SignedTransaction::new_signed(build_eip7702(&keypair), &keypair).unwrap();
        assert_eq!(tx.encode_raw(), RLP_EIP7702_UNSIGNED);
        assert_eq!(
            tx.raw_hash(),
            H256(hex!("c040cc94bd89df9c05737128c38de2b759a8333e802b27ccb4cba7180ed1a2d9"))
        );
        // `r` has a leading zero byte and is encoded on 31 bytes
        assert_eq!(tx.encode(), RLP_EIP7702_SIGNED);
        assert_eq!(
            tx.full_hash(),
            H256(hex!("db81174759f760e4c76aaa29c22a4ed8bb40f3b790edd679f864a0a0718cfffb"))
        );
        assert_eq!(tx.payload().transaction_type(), Some(0x04));
    }

    #[test]
    fn decode_and_recover_all_signers() {
        let keypair = Keypair::from_bytes(SECRET).unwrap();
        let tx = SignedTransaction::<Eip7702Transaction>::decode(RLP_EIP7702_SIGNED).unwrap();
        assert_eq!(tx.payload(), &build_eip7702(&keypair));
        assert_eq!(tx.recover_signer().unwrap(), keypair.address());
        let authorizations = tx.payload().authorization_list().unwrap();
        assert_eq!(authorizations.len(), 1);
        for item in authorizations.iter() {
            assert_eq!(item.recover_authority().unwrap(), keypair.address());
            assert_eq!(item.authorization(), &authorization());
        }
    }

    #[test]
    fn rejects_unsigned_authorizations() {
        let keypair = Keypair::from_bytes(SECRET).unwrap();
        let tx = SignedTransaction::new(build_eip7702(&keypair));
        let mut fields = tx.encoded_elements().to_vec();
        fields[9] = rlp::encode_list::<crate::transactions::authorization::Authorization, _>(&[
            authorization(),
        ])
        .freeze()
        .into();
        let mut stream = rlp::RlpStream::new();
        stream.append_raw(&[0x04], 0);
        stream.begin_list(fields.len());
        for field in &fields {
            stream.append_raw(field, 1);
        }
        assert!(matches!(
            SignedTransaction::<Eip7702Transaction>::decode(&stream.out()),
            Err(Error::Validation(_))
        ));
    }
}
