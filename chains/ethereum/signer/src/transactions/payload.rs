//! Field-level encoding engine shared by every transaction type.
use crate::{
    bytes::Bytes,
    crypto::{Crypto, DefaultCrypto},
    error::Error,
    num,
    rlp_utils::{RlpExt, RlpStreamExt},
    transactions::signature::Signature,
};
use core::cell::OnceCell;
use derivative::Derivative;
use primitive_types::H256;
use rlp::{Decodable, DecoderError, Rlp, RlpStream};

/// Ordered rlp encoded fields of a transaction plus its optional signature.
///
/// The signed encoding is computed once and cached, [`SignedPayload::set_signature`] is the only
/// way to change the signature and always drops the cache.
#[derive(Derivative)]
#[derivative(Clone, PartialEq, Eq, Debug)]
pub struct SignedPayload {
    envelope: Option<u8>,
    fields: Vec<Bytes>,
    signature: Option<Signature>,
    #[derivative(PartialEq = "ignore", Debug = "ignore")]
    encoded: OnceCell<Bytes>,
}

impl SignedPayload {
    /// Unsigned payload from already encoded fields.
    #[must_use]
    pub fn from_fields(envelope: Option<u8>, fields: Vec<Bytes>) -> Self {
        Self { envelope, fields, signature: None, encoded: OnceCell::new() }
    }

    /// Splits an encoded transaction into its first `field_count` fields and, when three more
    /// items follow, the `(v, r, s)` signature. Three empty trailing items decode as unsigned.
    ///
    /// # Errors
    /// Returns `Err` if the envelope byte doesn't match, the input isn't a single rlp list or
    /// the list has neither `field_count` nor `field_count + 3` items.
    pub fn from_bytes(envelope: Option<u8>, buf: &[u8], field_count: usize) -> Result<Self, Error> {
        let body = match envelope {
            Some(tx_type) => {
                let (first, rest) = buf.split_first().ok_or(DecoderError::RlpIsTooShort)?;
                if *first != tx_type {
                    return Err(DecoderError::Custom("invalid transaction type").into());
                }
                rest
            },
            None => buf,
        };

        let rlp = Rlp::new(body);
        if !rlp.is_list() {
            return Err(DecoderError::RlpExpectedToBeList.into());
        }
        if rlp.payload_info()?.total() != body.len() {
            return Err(DecoderError::RlpInconsistentLengthAndData.into());
        }

        let is_signed = match rlp.item_count()? {
            count if count == field_count => false,
            count if count == field_count + 3 => true,
            _ => return Err(DecoderError::RlpIncorrectListLen.into()),
        };

        let fields = (0..field_count)
            .map(|index| rlp.at(index).map(|item| Bytes::copy_from_slice(item.as_raw())))
            .collect::<Result<Vec<_>, _>>()?;

        let signature =
            if is_signed { decode_signature(&rlp, field_count)? } else { None };

        Ok(Self { envelope, fields, signature, encoded: OnceCell::new() })
    }

    #[must_use]
    pub const fn envelope(&self) -> Option<u8> {
        self.envelope
    }

    #[must_use]
    pub fn fields(&self) -> &[Bytes] {
        &self.fields
    }

    #[must_use]
    pub const fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Attach or replace the signature, invalidating the cached encoding.
    pub fn set_signature(&mut self, signature: Signature) {
        self.signature = Some(signature);
        self.encoded = OnceCell::new();
    }

    /// Remove the signature, invalidating the cached encoding.
    pub fn take_signature(&mut self) -> Option<Signature> {
        self.encoded = OnceCell::new();
        self.signature.take()
    }

    /// # Errors
    /// Returns `Err` if `index` is out of bounds.
    pub fn field_rlp(&self, index: usize) -> Result<Rlp<'_>, Error> {
        self.fields
            .get(index)
            .map(|field| Rlp::new(field.as_ref()))
            .ok_or_else(|| DecoderError::RlpIsTooShort.into())
    }

    /// # Errors
    /// Returns `Err` if `index` is out of bounds or the field doesn't decode as `T`.
    pub fn field<T: Decodable>(&self, index: usize) -> Result<T, Error> {
        Ok(self.field_rlp(index)?.as_val()?)
    }

    /// Decodes a field where the empty string stands for `None`.
    ///
    /// # Errors
    /// Returns `Err` if `index` is out of bounds or the field doesn't decode as `T`.
    pub fn opt_field<T: Decodable>(&self, index: usize) -> Result<Option<T>, Error> {
        Ok(self.field_rlp(index)?.as_opt()?)
    }

    /// Envelope byte followed by the rlp list of the fields and `extra` trailing items, without
    /// signature.
    #[must_use]
    pub fn encode_raw_with(&self, extra: &[Bytes]) -> Bytes {
        let mut stream = self.open_stream(self.fields.len() + extra.len());
        stream.append_raw_items(&self.fields).append_raw_items(extra);
        stream.out().into()
    }

    /// Keccak256 of [`SignedPayload::encode_raw_with`], recomputed on every call.
    #[must_use]
    pub fn raw_hash_with(&self, extra: &[Bytes]) -> H256 {
        DefaultCrypto::keccak256(self.encode_raw_with(extra))
    }

    /// Envelope byte followed by the rlp list of the fields and `(v, r, s)`, cached until the
    /// signature changes. Without signature `v`, `r` and `s` are empty strings.
    pub fn encoded(&self) -> &Bytes {
        self.encoded.get_or_init(|| self.encode_signed())
    }

    /// Keccak256 of [`SignedPayload::encoded`].
    #[must_use]
    pub fn full_hash(&self) -> H256 {
        DefaultCrypto::keccak256(self.encoded())
    }

    fn encode_signed(&self) -> Bytes {
        let mut stream = self.open_stream(self.fields.len() + 3);
        stream.append_raw_items(&self.fields);
        if let Some(signature) = &self.signature {
            // zero `v` is the empty string, `r` and `s` are trimmed of their leading zeros.
            let (r, s) = signature.trimmed_rs();
            stream.append(&signature.v).append(&r).append(&s);
        } else {
            stream.append_empty_data().append_empty_data().append_empty_data();
        }
        stream.out().into()
    }

    fn open_stream(&self, len: usize) -> RlpStream {
        let mut stream = RlpStream::new();
        if let Some(tx_type) = self.envelope {
            stream.append_raw(&[tx_type], 0);
        }
        stream.begin_list(len);
        stream
    }
}

/// Decodes `(v, r, s)` starting at `offset`, three empty strings mean no signature.
pub(crate) fn decode_signature(rlp: &Rlp, offset: usize) -> Result<Option<Signature>, Error> {
    let v = rlp.data_at(offset)?;
    let r = rlp.data_at(offset + 1)?;
    let s = rlp.data_at(offset + 2)?;
    if v.is_empty() && r.is_empty() && s.is_empty() {
        return Ok(None);
    }
    Signature::from_rsv(r, s, num::u64_from_be_bytes(v)?).map(Some)
}
