use super::{
    legacy_chain_id::LegacyChainIdTransaction,
    payload::SignedPayload,
    signature::{Signature, SignatureScheme},
    GasPrice, TransactionT,
};
use crate::{
    bytes::Bytes,
    constants::{DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE, LEGACY_V_OFFSET},
    error::Error,
    rlp_utils::{encode_element, encode_opt_element},
    Address,
};
#[cfg(feature = "serde")]
use crate::serde_utils::uint_to_hex;
use primitive_types::U256;

/// Legacy transaction that use the transaction format existing before typed transactions were
/// introduced in EIP-2718. Legacy transactions don’t use access lists or incorporate EIP-1559 fee
/// market changes, and their signature isn't bound to any chain.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct LegacyTransaction {
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
}

impl LegacyTransaction {
    /// Value transfer using [`DEFAULT_GAS_PRICE`] and [`DEFAULT_GAS_LIMIT`].
    #[must_use]
    pub const fn new(to: Address, value: U256, nonce: u64) -> Self {
        Self {
            nonce,
            gas_price: DEFAULT_GAS_PRICE,
            gas_limit: DEFAULT_GAS_LIMIT,
            to: Some(to),
            value,
            data: Bytes::new(),
        }
    }

    /// Binds the transaction to `chain_id` per EIP-155.
    #[must_use]
    pub const fn with_chain_id(self, chain_id: u64) -> LegacyChainIdTransaction {
        LegacyChainIdTransaction { transaction: self, chain_id }
    }

    pub(crate) fn legacy_elements(&self) -> Vec<Bytes> {
        vec![
            encode_element(&self.nonce),
            encode_element(&self.gas_price),
            encode_element(&self.gas_limit),
            encode_opt_element(self.to.as_ref()),
            encode_element(&self.value),
            encode_element(&self.data),
        ]
    }

    pub(crate) fn decode_legacy_fields(payload: &SignedPayload) -> Result<Self, Error> {
        Ok(Self {
            nonce: payload.field(0)?,
            gas_price: payload.field(1)?,
            gas_limit: payload.field(2)?,
            to: payload.opt_field(3)?,
            value: payload.field(4)?,
            data: payload.field(5)?,
        })
    }
}

impl TransactionT for LegacyTransaction {
    const TRANSACTION_TYPE: Option<u8> = None;
    const FIELD_COUNT: usize = 6;
    const NAME: &'static str = "LegacyTransaction";

    fn encoded_elements(&self) -> Vec<Bytes> {
        self.legacy_elements()
    }

    fn from_payload(payload: &mut SignedPayload) -> Result<Self, Error> {
        Self::decode_legacy_fields(payload)
    }

    fn compose_v(&self, recovery_index: u8) -> Result<u64, Error> {
        if recovery_index > 1 {
            return Err(Error::InvalidRecoveryIndex(recovery_index));
        }
        Ok(LEGACY_V_OFFSET + u64::from(recovery_index))
    }

    fn check_signature(&self, signature: &Signature) -> Result<(), Error> {
        let found = signature.scheme()?;
        let use_instead = match found {
            SignatureScheme::Legacy => return Ok(()),
            SignatureScheme::Eip155 { .. } => LegacyChainIdTransaction::NAME,
            // y-parity signatures belong to typed transactions, which have no chain free form.
            SignatureScheme::YParity => "a typed transaction",
        };
        Err(Error::WrongTransactionClass { expected: Self::NAME, found, use_instead })
    }

    fn chain_id(&self) -> Option<u64> {
        None
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
}

#[cfg(test)]
pub(crate) mod tests {
    use super::LegacyTransaction;
    use crate::{
        crypto::Keypair,
        error::Error,
        transactions::{
            signature::{Signature, SignatureScheme},
            SignedTransaction, TransactionT,
        },
        Address,
    };
    use hex_literal::hex;
    use primitive_types::{H256, U256};

    pub const SECRET: [u8; 32] =
        hex!("b5b1870957d373ef0eeffecc6e4812c0fd08f554b37b233526acc331bf1544f7");

    pub fn transfer() -> LegacyTransaction {
        LegacyTransaction::new(Address::from_low_u64_be(1), U256::one(), 0)
    }

    #[test]
    fn raw_encoding_uses_default_gas() {
        let tx = SignedTransaction::new(transfer());
        assert_eq!(
            tx.encode_raw(),
            hex!("e1808504a817c8008252089400000000000000000000000000000000000000010180")
        );
        assert_eq!(
            tx.raw_hash(),
            H256(hex!("058c3b60e611892b54e01c68305aa94de3130b3e1d3bf09a5eec3916120ef181"))
        );
        assert_eq!(tx.payload().chain_id(), None);
        assert_eq!(tx.payload().transaction_type(), None);
    }

    #[test]
    fn sign_golden_vector() {
        let keypair = Keypair::from_bytes(SECRET).unwrap();
        let tx = SignedTransaction::new_signed(transfer(), &keypair).unwrap();
        let signature = tx.signature().copied().unwrap();
        assert_eq!(signature.v.as_u64(), 27);
        assert_eq!(
            signature.r,
            U256::from_big_endian(&hex!("e6fc1310cc5c6999d4c7f8d21b6cc5dacc392ba7e50268035c5db4742b917d6c"))
        );
        assert_eq!(
            signature.s,
            U256::from_big_endian(&hex!("5f80c0d3eb227d40a94902afc3d99bf7bf78c32aa6b95a7c11f142ce17e5550f"))
        );
        assert_eq!(
            tx.encode(),
            hex!("f864808504a817c80082520894000000000000000000000000000000000000000101801ba0e6fc1310cc5c6999d4c7f8d21b6cc5dacc392ba7e50268035c5db4742b917d6ca05f80c0d3eb227d40a94902afc3d99bf7bf78c32aa6b95a7c11f142ce17e5550f")
        );
        assert_eq!(
            tx.full_hash(),
            H256(hex!("31ba1995d118a9a7b80ef20c9519449dc8eb3524a3d3c18bed71d63b71837ee8"))
        );
        assert_eq!(tx.recover_signer().unwrap(), keypair.address());
        assert!(tx.verify());
    }

    #[test]
    fn decode_round_trip() {
        let keypair = Keypair::from_bytes(SECRET).unwrap();
        let tx = SignedTransaction::new_signed(transfer(), &keypair).unwrap();
        let decoded = SignedTransaction::<LegacyTransaction>::decode(&tx.encode()).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.payload(), &transfer());

        // contract creation with data and zero values everywhere
        let create = LegacyTransaction {
            nonce: 0,
            gas_price: U256::zero(),
            gas_limit: 0,
            to: None,
            value: U256::zero(),
            data: hex!("6080604052").into(),
        };
        let unsigned = SignedTransaction::new(create.clone());
        let decoded = SignedTransaction::<LegacyTransaction>::decode(&unsigned.encode()).unwrap();
        assert_eq!(decoded.payload(), &create);
        assert!(!decoded.is_signed());
        assert!(!decoded.verify());
    }

    #[test]
    fn rejects_chain_encoded_signatures() {
        // signed with EIP-155, chain id 1
        let encoded = hex!("f864808504a817c800825208940000000000000000000000000000000000000001018026a0b6c4c3eb0dfb424e166bc15c0ff71d1c145d23ddaf3f57b436a900cbeb61920aa02eb7fb1b60bb1c89d07491d568ce12164a96928bcbd4f87a6887444a6832239c");
        assert_eq!(
            SignedTransaction::<LegacyTransaction>::decode(&encoded),
            Err(Error::WrongTransactionClass {
                expected: "LegacyTransaction",
                found: SignatureScheme::Eip155 { chain_id: 1 },
                use_instead: "LegacyChainIdTransaction",
            })
        );

        let mut tx = SignedTransaction::new(transfer());
        let signature = Signature { v: 38.into(), r: U256::one(), s: U256::one() };
        assert!(matches!(
            tx.set_signature(signature),
            Err(Error::WrongTransactionClass { .. })
        ));
        assert!(!tx.is_signed());
    }
}
