use crate::bytes::Bytes;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

pub trait RlpStreamExt {
    /// Appends an optional value to the end of stream, chainable.
    ///
    /// ```
    /// use rlp::RlpStream;
    /// use rosetta_ethereum_signer::rlp_utils::RlpStreamExt;
    /// let mut stream = RlpStream::new_list(2);
    /// stream.append_opt(Some(&"cat")).append_opt(Option::<&u32>::None);
    /// let out = stream.out();
    /// assert_eq!(out, vec![0xc5, 0x83, b'c', b'a', b't', 0x80]);
    /// ```
    fn append_opt<E: Encodable>(&mut self, value: Option<&E>) -> &mut Self;

    /// Appends items which are already rlp encoded, each counted as one list element.
    fn append_raw_items<'a, I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a Bytes>;
}

impl RlpStreamExt for RlpStream {
    fn append_opt<E: Encodable>(&mut self, opt: Option<&E>) -> &mut Self {
        if let Some(inner) = opt {
            self.append(inner);
        } else {
            self.append(&"");
        }
        self
    }

    fn append_raw_items<'a, I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a Bytes>,
    {
        for item in items {
            self.append_raw(item.as_ref(), 1);
        }
        self
    }
}

#[allow(clippy::missing_errors_doc)]
pub trait RlpExt {
    /// Decodes an item where the empty string stands for `None`.
    fn as_opt<T: Decodable>(&self) -> Result<Option<T>, DecoderError>;

    /// Payload of the string item at `index`, fails if the item is a list.
    fn data_at(&self, index: usize) -> Result<&[u8], DecoderError>;
}

impl RlpExt for Rlp<'_> {
    fn as_opt<T: Decodable>(&self) -> Result<Option<T>, DecoderError> {
        if self.is_empty() {
            if self.is_data() {
                Ok(None)
            } else {
                Err(DecoderError::RlpExpectedToBeData)
            }
        } else {
            self.as_val().map(Some)
        }
    }

    fn data_at(&self, index: usize) -> Result<&[u8], DecoderError> {
        let item = self.at(index)?;
        if !item.is_data() {
            return Err(DecoderError::RlpExpectedToBeData);
        }
        item.data()
    }
}

/// Rlp encoding of a single element.
pub fn encode_element<E: Encodable>(value: &E) -> Bytes {
    rlp::encode(value).into()
}

/// Rlp encoding of an optional element, `None` is the empty string.
pub fn encode_opt_element<E: Encodable>(value: Option<&E>) -> Bytes {
    let mut stream = RlpStream::new();
    stream.append_opt(value);
    stream.out().into()
}

#[cfg(test)]
mod tests {
    use super::{encode_element, encode_opt_element, RlpExt};
    use primitive_types::{H160, U256};
    use rlp::{DecoderError, Rlp};

    #[test]
    fn encode_elements() {
        assert_eq!(encode_element(&0u64), [0x80u8]);
        assert_eq!(encode_element(&U256::from(1024)), [0x82u8, 0x04, 0x00]);
        assert_eq!(encode_opt_element::<H160>(None), [0x80u8]);
        let address = H160::repeat_byte(0x11);
        assert_eq!(encode_opt_element(Some(&address)), encode_element(&address));
    }

    #[test]
    fn optional_items() {
        // [0x80, [], 0x0400]
        let encoded = [0xc5, 0x80, 0xc0, 0x82, 0x04, 0x00];
        let rlp = Rlp::new(&encoded);
        assert_eq!(rlp.at(0).unwrap().as_opt::<u64>(), Ok(None));
        assert_eq!(rlp.at(1).unwrap().as_opt::<u64>(), Err(DecoderError::RlpExpectedToBeData));
        assert_eq!(rlp.at(2).unwrap().as_opt::<u64>(), Ok(Some(1024)));
        assert_eq!(rlp.data_at(2), Ok(&[0x04u8, 0x00][..]));
        assert_eq!(rlp.data_at(1), Err(DecoderError::RlpExpectedToBeData));
    }
}
