//! One call signing of legacy value transfers, returning the broadcastable hex.
use crate::{
    bytes::Bytes,
    constants::Chain,
    crypto::{Keypair, Signer},
    error::Error,
    transactions::{LegacyTransaction, SignedTransaction},
    Address, LOG_TARGET,
};
use primitive_types::U256;

/// Signs [`LegacyTransaction`]s, optionally bound to a chain per EIP-155, and returns the
/// signed encoding as lowercase hex without the "0x" prefix.
#[derive(Debug, Clone)]
pub struct LegacyTransactionSigner<S = Keypair> {
    signer: S,
}

impl LegacyTransactionSigner<Keypair> {
    /// # Errors
    /// Returns `Err` if `private_key` is not a valid hex encoded secp256k1 secret key.
    pub fn from_private_key(private_key: &str) -> Result<Self, Error> {
        Keypair::from_hex(private_key).map(Self::new)
    }
}

impl<S> LegacyTransactionSigner<S>
where
    S: Signer,
    S::Error: Into<Error>,
{
    pub const fn new(signer: S) -> Self {
        Self { signer }
    }

    pub const fn signer(&self) -> &S {
        &self.signer
    }

    /// Transfer of `amount` wei using the default gas price and gas limit.
    ///
    /// # Errors
    /// Returns `Err` if signing fails.
    pub fn sign_transfer(&self, to: Address, amount: U256, nonce: u64) -> Result<String, Error> {
        self.sign_transaction(LegacyTransaction::new(to, amount, nonce))
    }

    /// Same as [`Self::sign_transfer`], replay protected on `chain`.
    ///
    /// # Errors
    /// Returns `Err` if signing fails.
    pub fn sign_transfer_on_chain(
        &self,
        chain: Chain,
        to: Address,
        amount: U256,
        nonce: u64,
    ) -> Result<String, Error> {
        self.sign_transaction_with_chain_id(LegacyTransaction::new(to, amount, nonce), chain.id())
    }

    /// # Errors
    /// Returns `Err` if signing fails.
    pub fn sign_transaction(&self, transaction: LegacyTransaction) -> Result<String, Error> {
        let tx = SignedTransaction::new_signed(transaction, &self.signer)?;
        Ok(Self::finish(&tx.encode(), None))
    }

    /// # Errors
    /// Returns `Err` if signing fails or `chain_id` overflows the signature `v`.
    pub fn sign_transaction_with_chain_id(
        &self,
        transaction: LegacyTransaction,
        chain_id: u64,
    ) -> Result<String, Error> {
        let tx = SignedTransaction::new_signed(transaction.with_chain_id(chain_id), &self.signer)?;
        Ok(Self::finish(&tx.encode(), Some(chain_id)))
    }

    fn finish(encoded: &Bytes, chain_id: Option<u64>) -> String {
        tracing::debug!(target: LOG_TARGET, ?chain_id, len = encoded.len(), "legacy transaction signed");
        encoded.to_hex()
    }
}

/// Builds and signs a legacy transaction with a raw 32 bytes private key, EIP-155 bound when
/// `chain_id` is set.
///
/// # Errors
/// Returns `Err` if the private key is invalid or signing fails.
#[allow(clippy::too_many_arguments)]
pub fn sign_legacy_transaction(
    private_key: &[u8],
    to: Address,
    amount: U256,
    nonce: u64,
    gas_price: U256,
    gas_limit: u64,
    data: Bytes,
    chain_id: Option<u64>,
) -> Result<String, Error> {
    let signer = LegacyTransactionSigner::new(Keypair::from_slice(private_key)?);
    let transaction =
        LegacyTransaction { nonce, gas_price, gas_limit, to: Some(to), value: amount, data };
    match chain_id {
        Some(chain_id) => signer.sign_transaction_with_chain_id(transaction, chain_id),
        None => signer.sign_transaction(transaction),
    }
}

#[cfg(test)]
mod tests {
    use super::{sign_legacy_transaction, LegacyTransactionSigner};
    use crate::{
        constants::{Chain, DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE},
        error::Error,
        transactions::Transaction,
        Address, Bytes,
    };
    use hex_literal::hex;
    use primitive_types::U256;

    const PRIVATE_KEY: &str = "0xb5b1870957d373ef0eeffecc6e4812c0fd08f554b37b233526acc331bf1544f7";
    const SIGNED_LEGACY: &str = "f864808504a817c80082520894000000000000000000000000000000000000000101801ba0e6fc1310cc5c6999d4c7f8d21b6cc5dacc392ba7e50268035c5db4742b917d6ca05f80c0d3eb227d40a94902afc3d99bf7bf78c32aa6b95a7c11f142ce17e5550f";
    const SIGNED_MAINNET: &str = "f864808504a817c800825208940000000000000000000000000000000000000001018026a0b6c4c3eb0dfb424e166bc15c0ff71d1c145d23ddaf3f57b436a900cbeb61920aa02eb7fb1b60bb1c89d07491d568ce12164a96928bcbd4f87a6887444a6832239c";

    fn to() -> Address {
        Address::from_low_u64_be(1)
    }

    #[test]
    fn sign_transfer() {
        let signer = LegacyTransactionSigner::from_private_key(PRIVATE_KEY).unwrap();
        assert_eq!(signer.sign_transfer(to(), U256::one(), 0).unwrap(), SIGNED_LEGACY);
        assert_eq!(
            signer.sign_transfer_on_chain(Chain::Mainnet, to(), U256::one(), 0).unwrap(),
            SIGNED_MAINNET
        );

        let decoded = Transaction::decode_hex(SIGNED_MAINNET).unwrap();
        assert_eq!(decoded.chain_id(), Some(1));
        assert_eq!(decoded.recover_signer().unwrap(), signer.signer().address());
    }

    #[test]
    fn sign_with_explicit_fields() {
        let key = hex!("b5b1870957d373ef0eeffecc6e4812c0fd08f554b37b233526acc331bf1544f7");
        let signed = sign_legacy_transaction(
            &key,
            to(),
            U256::one(),
            0,
            DEFAULT_GAS_PRICE,
            DEFAULT_GAS_LIMIT,
            Bytes::new(),
            Some(1),
        )
        .unwrap();
        assert_eq!(signed, SIGNED_MAINNET);

        let signed = sign_legacy_transaction(
            &key,
            to(),
            U256::one(),
            0,
            DEFAULT_GAS_PRICE,
            DEFAULT_GAS_LIMIT,
            Bytes::new(),
            None,
        )
        .unwrap();
        assert_eq!(signed, SIGNED_LEGACY);
    }

    #[test]
    fn rejects_invalid_keys() {
        assert!(matches!(
            LegacyTransactionSigner::from_private_key("0xzz"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            sign_legacy_transaction(
                &[0u8; 32],
                to(),
                U256::one(),
                0,
                DEFAULT_GAS_PRICE,
                DEFAULT_GAS_LIMIT,
                Bytes::new(),
                None
            ),
            Err(Error::Secp256k1(_))
        ));
    }
}
