//! Signer recovery: finds which of the four candidate public keys produced a signature and
//! derives addresses from public keys.
use crate::{
    crypto::{Crypto, DefaultCrypto},
    error::Error,
    transactions::signature::Signature,
    Address, LOG_TARGET,
};
use primitive_types::{H256, U256};

/// Uncompressed secp256k1 public key, `0x04 || x || y`.
pub type PublicKey = [u8; 65];

/// Returns the first recovery index (0..=3) whose recovered public key equals
/// `expected_public_key`, given either uncompressed (65 bytes) or without its prefix (64 bytes).
///
/// # Errors
/// Returns [`Error::RecoveryImpossible`] if no candidate matches, and [`Error::Validation`] if
/// `expected_public_key` has an invalid length.
pub fn find_recovery_index<C: Crypto>(
    r: U256,
    s: U256,
    message_hash: H256,
    expected_public_key: &[u8],
) -> Result<u8, Error> {
    let expected = match expected_public_key.len() {
        65 => &expected_public_key[1..],
        64 => expected_public_key,
        len => return Err(Error::validation(format!("invalid public key length: {len}"))),
    };
    for recovery_index in 0..4 {
        let Some(candidate) = C::secp256k1_recover(recovery_index, r, s, message_hash) else {
            continue;
        };
        if &candidate[1..] == expected {
            return Ok(recovery_index);
        }
    }
    tracing::warn!(
        target: LOG_TARGET,
        %message_hash,
        "no recovery index matches the expected public key"
    );
    Err(Error::RecoveryImpossible)
}

/// Recovers the public key that produced `signature` over `message_hash` using
/// `recovery_index`, ignoring the index encoded in `signature.v`.
///
/// # Errors
/// Returns [`Error::InvalidRecoveryIndex`] if the EC engine can't recover a key.
pub fn recover_public_key<C: Crypto>(
    signature: &Signature,
    message_hash: H256,
    recovery_index: u8,
) -> Result<PublicKey, Error> {
    C::secp256k1_recover(recovery_index, signature.r, signature.s, message_hash)
        .ok_or(Error::InvalidRecoveryIndex(recovery_index))
}

/// Keccak256 of the public key without its prefix, keeping the low 20 bytes.
///
/// # Errors
/// Returns [`Error::Validation`] if the public key is not 64 or 65 bytes long.
pub fn public_key_to_address(public_key: &[u8]) -> Result<Address, Error> {
    let key = match public_key.len() {
        65 => &public_key[1..],
        64 => public_key,
        len => return Err(Error::validation(format!("invalid public key length: {len}"))),
    };
    Ok(Address::from(DefaultCrypto::keccak256(key)))
}

/// Recovers the signer address, using the recovery index encoded in `signature.v`.
///
/// # Errors
/// Returns `Err` if `v` is invalid or the EC engine can't recover a key.
pub fn recover_address<C: Crypto>(signature: &Signature, message_hash: H256) -> Result<Address, Error> {
    let recovery_index = signature.v.recovery_index()?;
    let public_key = recover_public_key::<C>(signature, message_hash, recovery_index)?;
    public_key_to_address(&public_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Keypair, Signer};
    use hex_literal::hex;

    const SECRET: [u8; 32] = hex!("b5b1870957d373ef0eeffecc6e4812c0fd08f554b37b233526acc331bf1544f7");

    #[test]
    fn finds_the_signing_index() {
        let keypair = Keypair::from_bytes(SECRET).unwrap();
        let hash = DefaultCrypto::keccak256(b"recovery");
        let signature = keypair.sign_prehash(hash).unwrap();
        let index = find_recovery_index::<DefaultCrypto>(
            signature.r,
            signature.s,
            hash,
            &keypair.pubkey_uncompressed(),
        )
        .unwrap();
        assert_eq!(u64::from(index), signature.v.as_u64());

        // also accepts the key without the 0x04 prefix
        let index_64 = find_recovery_index::<DefaultCrypto>(
            signature.r,
            signature.s,
            hash,
            &keypair.pubkey_uncompressed()[1..],
        )
        .unwrap();
        assert_eq!(index, index_64);

        let public_key = recover_public_key::<DefaultCrypto>(&signature, hash, index).unwrap();
        assert_eq!(public_key, keypair.pubkey_uncompressed());
        assert_eq!(public_key_to_address(&public_key).unwrap(), keypair.address());
    }

    #[test]
    fn recovery_impossible_for_another_key() {
        let keypair = Keypair::from_bytes(SECRET).unwrap();
        let other = Keypair::from_bytes([0x11; 32]).unwrap();
        let hash = DefaultCrypto::keccak256(b"recovery");
        let signature = keypair.sign_prehash(hash).unwrap();
        let result = find_recovery_index::<DefaultCrypto>(
            signature.r,
            signature.s,
            hash,
            &other.pubkey_uncompressed(),
        );
        assert_eq!(result, Err(Error::RecoveryImpossible));
    }

    #[test]
    fn invalid_recovery_index() {
        let signature = Signature { v: 0.into(), r: U256::zero(), s: U256::one() };
        let hash = H256(hex!("058c3b60e611892b54e01c68305aa94de3130b3e1d3bf09a5eec3916120ef181"));
        assert_eq!(
            recover_public_key::<DefaultCrypto>(&signature, hash, 0),
            Err(Error::InvalidRecoveryIndex(0))
        );
        assert_eq!(
            recover_public_key::<DefaultCrypto>(&signature, hash, 4),
            Err(Error::InvalidRecoveryIndex(4))
        );
    }

    #[test]
    fn address_from_public_key() {
        assert!(matches!(public_key_to_address(&[4u8; 33]), Err(Error::Validation(_))));
        let keypair = Keypair::from_bytes(SECRET).unwrap();
        assert_eq!(
            public_key_to_address(&keypair.pubkey_uncompressed()).unwrap(),
            Address::from(hex!("12890d2cce102216644c59dae5baed380d84830c"))
        );
    }
}
