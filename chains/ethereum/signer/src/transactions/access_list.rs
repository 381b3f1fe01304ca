use crate::{error::Error, Address};
use primitive_types::H256;
use rlp::{DecoderError, Rlp};

/// [EIP-2930] list of addresses and storage keys a transaction plans to access, in declaration
/// order. Encodes as the empty list `0xc0` when empty.
///
/// [EIP-2930]: https://eips.ethereum.org/EIPS/eip-2930
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash, rlp_derive::RlpEncodableWrapper)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct AccessList(pub Vec<AccessListItem>);

impl AccessList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccessListItem> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_raw(self) -> Vec<(Address, Vec<H256>)> {
        self.0
            .into_iter()
            .map(|item| (item.address, item.storage_keys))
            .collect::<Vec<_>>()
    }

    /// Decodes an access list, rejecting items that aren't exactly `[address, [keys...]]`.
    ///
    /// # Errors
    /// Returns [`Error::MalformedAccessList`] if an item doesn't have exactly two elements.
    pub fn decode_rlp(rlp: &Rlp) -> Result<Self, Error> {
        if !rlp.is_list() {
            return Err(DecoderError::RlpExpectedToBeList.into());
        }
        let mut items = Vec::with_capacity(rlp.item_count()?);
        for item in rlp {
            if !item.is_list() || item.item_count()? != 2 {
                return Err(Error::MalformedAccessList);
            }
            items.push(AccessListItem {
                address: item.val_at(0)?,
                storage_keys: item.list_at(1)?,
            });
        }
        Ok(Self(items))
    }
}

impl From<Vec<(Address, Vec<H256>)>> for AccessList {
    fn from(src: Vec<(Address, Vec<H256>)>) -> Self {
        Self(
            src.into_iter()
                .map(|(address, storage_keys)| AccessListItem { address, storage_keys })
                .collect(),
        )
    }
}

impl From<Vec<AccessListItem>> for AccessList {
    fn from(src: Vec<AccessListItem>) -> Self {
        Self(src)
    }
}

impl IntoIterator for AccessList {
    type Item = AccessListItem;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl rlp::Decodable for AccessList {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        Self::decode_rlp(rlp).map_err(|error| match error {
            Error::Rlp(error) => error,
            _ => DecoderError::Custom("malformed access list"),
        })
    }
}

/// Access list item
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash, rlp_derive::RlpEncodable)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct AccessListItem {
    /// Accessed address
    pub address: Address,
    /// Accessed storage keys
    pub storage_keys: Vec<H256>,
}
