use serde::{Deserializer, Serializer};

/// serde functions for converting primitive uints to and from hexadecimal string
pub mod uint_to_hex {
    use super::{DeserializableNumber, SerializableNumber};
    use serde::{Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    /// # Errors
    /// Returns `Err` if the value cannot be encoded as bytes
    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: SerializableNumber,
        S: Serializer,
    {
        T::serialize_eth_uint(value, serializer)
    }

    /// # Errors
    /// Returns `Err` source is not a valid hexadecimal string
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: DeserializableNumber<'de>,
        D: Deserializer<'de>,
    {
        T::deserialize_eth_uint(deserializer)
    }
}

/// Serialize a primitive uint as hexadecimal string
pub trait SerializableNumber {
    /// # Errors
    /// should never fails
    fn serialize_eth_uint<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer;
}

/// Deserialize a primitive uint from hexadecimal string
pub trait DeserializableNumber<'de>: Sized {
    /// # Errors
    /// Returns `Err` if the string is not a `0x` prefixed hex number that fits in `Self`
    fn deserialize_eth_uint<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>;
}

macro_rules! impl_serialize_uint {
    ($name: ident, $len: expr) => {
        impl SerializableNumber for $name {
            fn serialize_eth_uint<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                let mut slice = [0u8; 2 + 2 * $len];
                let bytes = $name::to_be_bytes(*self);
                ::impl_serde_macro::serialize::serialize_uint(&mut slice, &bytes, serializer)
            }
        }

        impl<'de> DeserializableNumber<'de> for $name {
            fn deserialize_eth_uint<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let mut bytes = [0u8; $len];
                let wrote = ::impl_serde_macro::serialize::deserialize_check_len(
                    deserializer,
                    ::impl_serde_macro::serialize::ExpectedLen::Between(0, &mut bytes),
                )?;
                let mut output = [0u8; $len];
                output[($len - wrote)..].copy_from_slice(&bytes[..wrote]);
                Ok(Self::from_be_bytes(output))
            }
        }
    };
}

impl_serialize_uint!(u64, 8);
