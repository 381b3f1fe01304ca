use crate::{
    error::Error,
    recovery,
    transactions::signature::{RecoveryId, Signature},
    Address, LOG_TARGET,
};
use primitive_types::{H256, U256};

/// cryptographic hash function and secp256k1 public key recovery implementation
pub trait Crypto {
    fn keccak256_to(data: impl AsRef<[u8]>, output: &mut [u8; 32]);

    fn keccak256(data: impl AsRef<[u8]>) -> H256 {
        let mut hash = [0u8; 32];
        Self::keccak256_to(data, &mut hash);
        hash.into()
    }

    /// Recover the uncompressed `SECP256k1` public key that produced `(r, s)` over
    /// `message_hash`, selecting the candidate point with `recovery_index` (0..=3).
    ///
    /// Returns `None` if no key can be recovered for this index and message hash.
    fn secp256k1_recover(
        recovery_index: u8,
        r: U256,
        s: U256,
        message_hash: H256,
    ) -> Option<[u8; 65]>;
}

pub trait Signer {
    type Error;

    /// Address derived from the signer public key.
    fn address(&self) -> Address;

    /// Hash and sign an arbitrary message.
    ///
    /// # Errors
    /// Returns `Err` if the message can't be signed.
    fn sign<I: AsRef<[u8]>>(&self, message: I) -> Result<Signature, Self::Error> {
        self.sign_prehash(DefaultCrypto::keccak256(message))
    }

    /// Attempt to sign the given message digest, returning a signature whose `v` is the
    /// y-parity, or an error if something went wrong.
    ///
    /// # Errors
    /// Returns `Err` if the message can't be signed.
    fn sign_prehash(&self, prehash: H256) -> Result<Signature, Self::Error>;
}

pub struct DefaultCrypto;

impl Crypto for DefaultCrypto {
    fn keccak256_to(data: impl AsRef<[u8]>, output: &mut [u8; 32]) {
        use sha3::Digest;
        let mut hasher = sha3::Keccak256::new();
        hasher.update(data);
        hasher.finalize_into(output.into());
    }

    fn keccak256(data: impl AsRef<[u8]>) -> H256 {
        use sha3::Digest;
        let hash: [u8; 32] = sha3::Keccak256::digest(data).into();
        hash.into()
    }

    fn secp256k1_recover(
        recovery_index: u8,
        r: U256,
        s: U256,
        message_hash: H256,
    ) -> Option<[u8; 65]> {
        let mut sig = [0u8; 64];
        r.to_big_endian(&mut sig[0..32]);
        s.to_big_endian(&mut sig[32..64]);
        let rid = libsecp256k1::RecoveryId::parse(recovery_index).ok()?;
        let sig = libsecp256k1::Signature::parse_overflowing_slice(&sig).ok()?;
        let msg = libsecp256k1::Message::parse(message_hash.as_fixed_bytes());
        let pubkey = libsecp256k1::recover(&msg, &sig, &rid).ok()?;
        Some(pubkey.serialize())
    }
}

/// secp256k1 private key, signs with deterministic RFC6979 nonces and low `s` values.
pub struct Keypair {
    keypair: secp256k1::Keypair,
}

impl Keypair {
    /// Create a new private key from a slice of bytes.
    ///
    /// # Errors
    /// Returns `Err` if the slice is greater than secp256k1 curve order.
    pub fn from_bytes<I: AsRef<[u8]>>(bytes: I) -> Result<Self, Error> {
        Self::from_slice(bytes.as_ref())
    }

    /// Create a new private key from a slice of bytes.
    ///
    /// # Errors
    /// Returns `Err` if the slice is greater than secp256k1 curve order.
    pub fn from_slice(slice: &[u8]) -> Result<Self, Error> {
        let secret = secp256k1::SecretKey::from_slice(slice)?;
        let keypair = secret.keypair(secp256k1::SECP256K1);
        Ok(Self { keypair })
    }

    /// Parses a hex encoded private key, with or without the "0x" prefix.
    ///
    /// # Errors
    /// Returns `Err` if the string is not valid hex or not a valid private key.
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let bytes = const_hex::decode(hex)?;
        Self::from_slice(&bytes)
    }

    #[must_use]
    pub fn pubkey(&self) -> [u8; 33] {
        self.keypair.public_key().serialize()
    }

    #[must_use]
    pub fn pubkey_uncompressed(&self) -> [u8; 65] {
        self.keypair.public_key().serialize_uncompressed()
    }

    #[must_use]
    pub fn address(&self) -> Address {
        // uncompress the key
        let uncompressed = self.pubkey_uncompressed();
        let hash = DefaultCrypto::keccak256(&uncompressed[1..]);
        Address::from(hash)
    }
}

impl core::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Keypair").field("address", &self.address()).finish_non_exhaustive()
    }
}

impl Signer for Keypair {
    type Error = Error;

    fn address(&self) -> Address {
        Self::address(self)
    }

    /// Sign a pre-hashed message
    fn sign_prehash(&self, prehash: H256) -> Result<Signature, Self::Error> {
        use secp256k1::Message;

        let msg = Message::from_digest(prehash.0);
        let mut sig = secp256k1::SECP256K1.sign_ecdsa(&msg, &self.keypair.secret_key());
        sig.normalize_s();
        let compact = sig.serialize_compact();
        let r = U256::from_big_endian(&compact[0..32]);
        let s = U256::from_big_endian(&compact[32..64]);

        // All transaction signatures whose s-value is greater than secp256k1n/2 are invalid.
        // - https://github.com/ethereum/EIPs/blob/master/EIPS/eip-2.md
        // - https://github.com/ethereum/go-ethereum/blob/v1.13.14/crypto/crypto.go#L260-L273
        let secp256k1_half_n = U256::from_big_endian(&secp256k1::constants::CURVE_ORDER) >> 1;
        if s > secp256k1_half_n {
            return Err(Error::Secp256k1(secp256k1::Error::IncorrectSignature));
        }

        let recovery_index = recovery::find_recovery_index::<DefaultCrypto>(
            r,
            s,
            prehash,
            &self.pubkey_uncompressed(),
        )?;
        // Indexes 2 and 3 require `r >= n`, which typed transactions can't express.
        if recovery_index > 1 {
            return Err(Error::InvalidRecoveryIndex(recovery_index));
        }
        tracing::trace!(target: LOG_TARGET, %prehash, recovery_index, "signed message hash");
        Ok(Signature { v: RecoveryId::new(u64::from(recovery_index)), r, s })
    }
}
