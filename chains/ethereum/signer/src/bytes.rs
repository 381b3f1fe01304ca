use core::{
    borrow::Borrow,
    fmt::{Debug, Display, Formatter, LowerHex, Result as FmtResult},
    ops::Deref,
    str::FromStr,
};

/// Raw byte string used for transaction data and encoded payloads, displayed as a "0x" prefixed
/// hex string.
#[derive(Clone, Default, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bytes(
    #[cfg_attr(
        feature = "serde",
        serde(serialize_with = "serialize_bytes", deserialize_with = "deserialize_bytes")
    )]
    pub bytes::Bytes,
);

impl Bytes {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(bytes::Bytes::new())
    }

    /// Creates a new `Bytes` from a static slice, without copying.
    ///
    /// ```
    /// use rosetta_ethereum_signer::Bytes;
    ///
    /// let b = Bytes::from_static(b"hello");
    /// assert_eq!(&b[..], b"hello");
    /// ```
    #[inline]
    #[must_use]
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        Self(bytes::Bytes::from_static(bytes))
    }

    /// Copies `data` into a new `Bytes`.
    #[must_use]
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self(bytes::Bytes::copy_from_slice(data))
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex without the "0x" prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        const_hex::encode(self.0.as_ref())
    }
}

impl Debug for Bytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Bytes(0x{})", self.to_hex())
    }
}

impl Display for Bytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "0x{}", self.to_hex())
    }
}

impl LowerHex for Bytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "0x{}", self.to_hex())
    }
}

impl Deref for Bytes {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_ref()
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Borrow<[u8]> for Bytes {
    fn borrow(&self) -> &[u8] {
        self.as_ref()
    }
}

impl From<bytes::Bytes> for Bytes {
    fn from(src: bytes::Bytes) -> Self {
        Self(src)
    }
}

impl From<bytes::BytesMut> for Bytes {
    fn from(src: bytes::BytesMut) -> Self {
        Self(src.freeze())
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(src: Vec<u8>) -> Self {
        Self(src.into())
    }
}

impl From<&[u8]> for Bytes {
    fn from(src: &[u8]) -> Self {
        Self::copy_from_slice(src)
    }
}

impl<const N: usize> From<[u8; N]> for Bytes {
    fn from(src: [u8; N]) -> Self {
        Self::copy_from_slice(src.as_slice())
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Bytes {
    fn from(src: &'a [u8; N]) -> Self {
        Self::copy_from_slice(src)
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(src: Bytes) -> Self {
        src.0.into()
    }
}

impl PartialEq<[u8]> for Bytes {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_ref() == other
    }
}

impl PartialEq<&[u8]> for Bytes {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_ref() == *other
    }
}

impl PartialEq<Vec<u8>> for Bytes {
    fn eq(&self, other: &Vec<u8>) -> bool {
        self.as_ref() == &other[..]
    }
}

impl<const N: usize> PartialEq<[u8; N]> for Bytes {
    fn eq(&self, other: &[u8; N]) -> bool {
        self.as_ref() == other.as_slice()
    }
}

impl rlp::Encodable for Bytes {
    fn rlp_append(&self, s: &mut rlp::RlpStream) {
        s.append(&self.as_ref());
    }
}

impl rlp::Decodable for Bytes {
    fn decode(rlp: &rlp::Rlp) -> Result<Self, rlp::DecoderError> {
        rlp.decoder().decode_value(|bytes| Ok(Self::copy_from_slice(bytes)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to parse bytes: {0}")]
pub struct ParseBytesError(const_hex::FromHexError);

impl FromStr for Bytes {
    type Err = ParseBytesError;

    /// Accepts hex with or without the "0x" prefix.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        const_hex::decode(value).map(Into::into).map_err(ParseBytesError)
    }
}

/// Serialize bytes as "0x" prefixed hex string
///
/// # Errors
/// never fails
#[cfg(feature = "serde")]
pub fn serialize_bytes<S, T>(d: T, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: AsRef<[u8]>,
{
    const_hex::serialize::<S, T>(d, s)
}

/// Deserialize bytes from a "0x" prefixed hex string
///
/// # Errors
/// Returns `Err` if the string is not valid hex
#[cfg(feature = "serde")]
pub fn deserialize_bytes<'de, D>(d: D) -> Result<bytes::Bytes, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = <String as serde::Deserialize>::deserialize(d)?;
    const_hex::decode(value).map(Into::into).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::Bytes;
    use hex_literal::hex;

    #[test]
    fn parse_and_display() {
        let expected = Bytes::from(hex!("deadbeef"));
        assert_eq!("0xdeadbeef".parse::<Bytes>().unwrap(), expected);
        assert_eq!("deadbeef".parse::<Bytes>().unwrap(), expected);
        assert_eq!(expected.to_string(), "0xdeadbeef");
        assert_eq!(format!("{expected:?}"), "Bytes(0xdeadbeef)");
        assert!("0xzz".parse::<Bytes>().is_err());
    }

    #[test]
    fn rlp_encode_works() {
        assert_eq!(rlp::encode(&Bytes::new()).as_ref(), &[0x80]);
        assert_eq!(rlp::encode(&Bytes::from(hex!("7f"))).as_ref(), &[0x7f]);
        assert_eq!(rlp::encode(&Bytes::from(hex!("8081"))).as_ref(), &hex!("828081"));
        let decoded: Bytes = rlp::decode(&hex!("828081")).unwrap();
        assert_eq!(decoded, hex!("8081"));
    }
}
