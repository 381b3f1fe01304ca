use super::{
    legacy::LegacyTransaction,
    payload::SignedPayload,
    signature::{compose_chain_v, Signature, SignatureScheme},
    GasPrice, SignedTransaction, TransactionT,
};
use crate::{bytes::Bytes, error::Error, rlp_utils::encode_element, Address, LOG_TARGET};
#[cfg(feature = "serde")]
use crate::serde_utils::uint_to_hex;
use primitive_types::U256;

/// Legacy transaction bound to a chain per [EIP-155].
///
/// Shares the six fields of [`LegacyTransaction`], the chain id is committed in the signing
/// message as `(chain_id, 0, 0)` and in the signature `v` as `2 * chain_id + 35 + parity`.
///
/// [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct LegacyChainIdTransaction {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub transaction: LegacyTransaction,

    /// Chain id the signature is bound to.
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub chain_id: u64,
}

impl LegacyChainIdTransaction {
    #[must_use]
    pub const fn new(transaction: LegacyTransaction, chain_id: u64) -> Self {
        Self { transaction, chain_id }
    }

    fn wrong_class(found: SignatureScheme) -> Error {
        let use_instead = match found {
            SignatureScheme::Legacy => LegacyTransaction::NAME,
            _ => "a typed transaction",
        };
        Error::WrongTransactionClass { expected: Self::NAME, found, use_instead }
    }
}

/// Chain id zero can't be told apart from an unsigned [`LegacyTransaction`] once encoded.
fn non_zero_chain_id(chain_id: u64) -> Result<u64, Error> {
    if chain_id == 0 {
        return Err(Error::validation("EIP-155 chain id must be non-zero"));
    }
    Ok(chain_id)
}

impl From<LegacyChainIdTransaction> for LegacyTransaction {
    fn from(tx: LegacyChainIdTransaction) -> Self {
        tx.transaction
    }
}

impl TransactionT for LegacyChainIdTransaction {
    const TRANSACTION_TYPE: Option<u8> = None;
    const FIELD_COUNT: usize = 6;
    const NAME: &'static str = "LegacyChainIdTransaction";

    fn encoded_elements(&self) -> Vec<Bytes> {
        self.transaction.legacy_elements()
    }

    fn from_payload(payload: &mut SignedPayload) -> Result<Self, Error> {
        let transaction = LegacyTransaction::decode_legacy_fields(payload)?;
        let chain_id = match payload.signature().copied() {
            // signing message form, `(chain_id, 0, 0)` in place of the signature
            Some(signature) if signature.r.is_zero() && signature.s.is_zero() => {
                payload.take_signature();
                non_zero_chain_id(signature.v.as_u64())?
            },
            Some(signature) => match signature.scheme()? {
                SignatureScheme::Eip155 { chain_id } => non_zero_chain_id(chain_id)?,
                found => return Err(Self::wrong_class(found)),
            },
            None => return Err(Error::validation("chain id missing")),
        };
        Ok(Self { transaction, chain_id })
    }

    fn signing_extension(&self) -> Vec<Bytes> {
        let empty = encode_element(&Bytes::new());
        vec![encode_element(&self.chain_id), empty.clone(), empty]
    }

    fn compose_v(&self, recovery_index: u8) -> Result<u64, Error> {
        if recovery_index > 1 {
            return Err(Error::InvalidRecoveryIndex(recovery_index));
        }
        compose_chain_v(non_zero_chain_id(self.chain_id)?, recovery_index)
    }

    fn check_signature(&self, signature: &Signature) -> Result<(), Error> {
        match signature.scheme()? {
            SignatureScheme::Eip155 { chain_id } if chain_id == self.chain_id => {
                non_zero_chain_id(chain_id).map(drop)
            },
            SignatureScheme::Eip155 { chain_id } => Err(Error::validation(format!(
                "signature is bound to chain {chain_id}, transaction to chain {}",
                self.chain_id
            ))),
            found => Err(Self::wrong_class(found)),
        }
    }

    fn chain_id(&self) -> Option<u64> {
        Some(self.chain_id)
    }

    fn nonce(&self) -> u64 {
        self.transaction.nonce
    }

    fn gas_price(&self) -> GasPrice {
        GasPrice::Legacy(self.transaction.gas_price)
    }

    fn gas_limit(&self) -> u64 {
        self.transaction.gas_limit
    }

    fn to(&self) -> Option<Address> {
        self.transaction.to
    }

    fn value(&self) -> U256 {
        self.transaction.value
    }

    fn data(&self) -> &[u8] {
        self.transaction.data.as_ref()
    }
}

impl SignedTransaction<LegacyChainIdTransaction> {
    /// Decodes a legacy encoding whose signature doesn't carry the chain id, as the unsigned
    /// six fields form, binding it to `chain_id`.
    ///
    /// # Errors
    /// Returns `Err` if `chain_id` is zero, the bytes are not a legacy encoding, or if they carry
    /// a signature of another chain or transaction type.
    pub fn decode_with_chain_id(bytes: &[u8], chain_id: u64) -> Result<Self, Error> {
        let chain_id = non_zero_chain_id(chain_id)?;
        let encoding = SignedPayload::from_bytes(None, bytes, LegacyChainIdTransaction::FIELD_COUNT)?;
        if encoding.signature().is_none() {
            let transaction = LegacyTransaction::decode_legacy_fields(&encoding)?;
            tracing::trace!(target: LOG_TARGET, chain_id, "binding unsigned legacy fields to chain");
            return Ok(Self::new(transaction.with_chain_id(chain_id)));
        }
        let tx = Self::from_encoding(encoding)?;
        if tx.payload().chain_id != chain_id {
            return Err(Error::validation(format!(
                "transaction is bound to chain {}, expected {chain_id}",
                tx.payload().chain_id
            )));
        }
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::LegacyChainIdTransaction;
    use crate::{
        constants::Chain,
        crypto::Keypair,
        error::Error,
        transactions::{
            legacy::tests::{transfer, SECRET},
            payload::SignedPayload,
            signature::{Signature, SignatureScheme},
            LegacyTransaction, SignedTransaction, TransactionT,
        },
    };
    use hex_literal::hex;
    use primitive_types::{H256, U256};

    const SIGNED_CHAIN_1: [u8; 102] = hex!("f864808504a817c800825208940000000000000000000000000000000000000001018026a0b6c4c3eb0dfb424e166bc15c0ff71d1c145d23ddaf3f57b436a900cbeb61920aa02eb7fb1b60bb1c89d07491d568ce12164a96928bcbd4f87a6887444a6832239c");

    fn keypair() -> Keypair {
        Keypair::from_bytes(SECRET).unwrap()
    }

    #[test]
    fn signing_message_commits_chain_id() {
        let tx = SignedTransaction::new(transfer().with_chain_id(Chain::Mainnet.id()));
        assert_eq!(
            tx.encode_raw(),
            hex!("e4808504a817c8008252089400000000000000000000000000000000000000010180018080")
        );
        assert_eq!(
            tx.raw_hash(),
            H256(hex!("e107afd4d583e425be471c87610c222e4a0b0406044521ceabcfbe2e0383ca6d"))
        );
        // unsigned transactions encode as their signing message
        assert_eq!(tx.encode(), tx.encode_raw());
        assert_eq!(tx.payload().chain_id(), Some(1));
    }

    #[test]
    fn raw_hash_depends_on_chain() {
        let mainnet = SignedTransaction::new(transfer().with_chain_id(1));
        let goerli = SignedTransaction::new(transfer().with_chain_id(5));
        let legacy = SignedTransaction::new(transfer());
        assert_ne!(mainnet.raw_hash(), goerli.raw_hash());
        assert_ne!(mainnet.raw_hash(), legacy.raw_hash());
        assert_eq!(
            goerli.raw_hash(),
            H256(hex!("6c7871f4044461974284f728df72fd0a90e6ae0a6586dcadadf241bfeac991eb"))
        );
    }

    #[test]
    fn sign_mainnet() {
        let keypair = keypair();
        let tx = SignedTransaction::new_signed(transfer().with_chain_id(1), &keypair).unwrap();
        let signature = tx.signature().copied().unwrap();
        assert_eq!(signature.v.as_u64(), 38);
        assert_eq!(signature.scheme().unwrap(), SignatureScheme::Eip155 { chain_id: 1 });
        assert_eq!(
            signature.r,
            U256::from_big_endian(&hex!(
                "b6c4c3eb0dfb424e166bc15c0ff71d1c145d23ddaf3f57b436a900cbeb61920a"
            ))
        );
        assert_eq!(tx.encode(), SIGNED_CHAIN_1);
        assert_eq!(
            tx.full_hash(),
            H256(hex!("5b3e692111e826e32198180b0f22f49be915c397d4c67a2c590edb9f9d34894a"))
        );
        assert_eq!(tx.recover_signer().unwrap(), keypair.address());
    }

    #[test]
    fn sign_goerli() {
        let keypair = keypair();
        let tx = SignedTransaction::new_signed(transfer().with_chain_id(5), &keypair).unwrap();
        let signature = tx.signature().copied().unwrap();
        assert_eq!(signature.v.as_u64(), 46);
        assert_eq!(
            signature.r,
            U256::from_big_endian(&hex!(
                "c1ae3b349097af2299a7ee1cf681a83c78d60f9221bac2b2f22d375a6ee9d0f7"
            ))
        );
        assert_eq!(
            signature.s,
            U256::from_big_endian(&hex!(
                "6d4a76cb888349bde17e86e7f8605b669e6eb02058d48727b64baf8ff7d89db4"
            ))
        );
        assert_eq!(tx.recover_signer().unwrap(), keypair.address());
    }

    #[test]
    fn decode_signed_and_unsigned() {
        let decoded =
            SignedTransaction::<LegacyChainIdTransaction>::decode(&SIGNED_CHAIN_1).unwrap();
        assert_eq!(decoded.payload(), &transfer().with_chain_id(1));
        assert_eq!(decoded.recover_signer().unwrap(), keypair().address());
        assert_eq!(decoded.encode(), SIGNED_CHAIN_1);

        let unsigned = SignedTransaction::new(transfer().with_chain_id(1337));
        let decoded =
            SignedTransaction::<LegacyChainIdTransaction>::decode(&unsigned.encode()).unwrap();
        assert!(!decoded.is_signed());
        assert_eq!(decoded.payload().chain_id, 1337);
        assert_eq!(decoded.raw_hash(), unsigned.raw_hash());
    }

    #[test]
    fn decode_with_chain_id() {
        let legacy = SignedTransaction::new(transfer());
        let decoded = SignedTransaction::<LegacyChainIdTransaction>::decode_with_chain_id(
            &legacy.encode(),
            5,
        )
        .unwrap();
        assert_eq!(decoded.payload().chain_id, 5);

        assert!(SignedTransaction::<LegacyChainIdTransaction>::decode_with_chain_id(
            &SIGNED_CHAIN_1,
            1
        )
        .is_ok());
        assert!(matches!(
            SignedTransaction::<LegacyChainIdTransaction>::decode_with_chain_id(&SIGNED_CHAIN_1, 5),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn rejects_foreign_signatures() {
        let keypair = keypair();
        let legacy = SignedTransaction::new_signed(transfer(), &keypair).unwrap();
        assert_eq!(
            SignedTransaction::<LegacyChainIdTransaction>::decode(&legacy.encode()),
            Err(Error::WrongTransactionClass {
                expected: LegacyChainIdTransaction::NAME,
                found: SignatureScheme::Legacy,
                use_instead: LegacyTransaction::NAME,
            })
        );

        // y-parity `v` with a real signature
        let mut encoding = SignedPayload::from_fields(None, transfer().legacy_elements());
        let mut signature = legacy.signature().copied().unwrap();
        signature.v = 1.into();
        encoding.set_signature(signature);
        assert_eq!(
            SignedTransaction::<LegacyChainIdTransaction>::decode(encoding.encoded()),
            Err(Error::WrongTransactionClass {
                expected: LegacyChainIdTransaction::NAME,
                found: SignatureScheme::YParity,
                use_instead: "a typed transaction",
            })
        );

        let mut tx = SignedTransaction::new(transfer().with_chain_id(1));
        let legacy_signature = legacy.signature().copied().unwrap();
        assert_eq!(
            tx.set_signature(legacy_signature),
            Err(Error::WrongTransactionClass {
                expected: LegacyChainIdTransaction::NAME,
                found: SignatureScheme::Legacy,
                use_instead: LegacyTransaction::NAME,
            })
        );

        // chain 5 signature on a chain 1 transaction
        let other_chain = Signature { v: 46.into(), r: U256::one(), s: U256::one() };
        assert!(matches!(tx.set_signature(other_chain), Err(Error::Validation(_))));
    }

    #[test]
    fn rejects_chain_id_zero() {
        let keypair = keypair();
        let tx = transfer().with_chain_id(0);
        assert_eq!(
            SignedTransaction::new_signed(tx.clone(), &keypair),
            Err(Error::validation("EIP-155 chain id must be non-zero"))
        );

        // v = 35 encodes chain zero
        let signature = Signature { v: 35.into(), r: U256::one(), s: U256::one() };
        let mut unsigned = SignedTransaction::new(tx);
        assert!(matches!(unsigned.set_signature(signature), Err(Error::Validation(_))));
        let mut encoding = SignedPayload::from_fields(None, transfer().legacy_elements());
        encoding.set_signature(signature);
        assert!(matches!(
            SignedTransaction::<LegacyChainIdTransaction>::decode(encoding.encoded()),
            Err(Error::Validation(_))
        ));

        let legacy = SignedTransaction::new(transfer());
        assert!(matches!(
            SignedTransaction::<LegacyChainIdTransaction>::decode_with_chain_id(&legacy.encode(), 0),
            Err(Error::Validation(_))
        ));
    }
}
