use primitive_types::U256;

/// Offset added to the recovery index of a legacy signature, `v = 27 + recovery_index`.
pub const LEGACY_V_OFFSET: u64 = 27;

/// Offset of a [EIP-155] chain protected signature, `v = chain_id * 2 + 35 + recovery_index`.
///
/// [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
pub const EIP155_V_OFFSET: u64 = 35;

/// [EIP-2930] access list transaction envelope byte.
///
/// [EIP-2930]: https://eips.ethereum.org/EIPS/eip-2930
pub const EIP2930_TX_TYPE: u8 = 0x01;

/// [EIP-1559] fee market transaction envelope byte.
///
/// [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559
pub const EIP1559_TX_TYPE: u8 = 0x02;

/// [EIP-7702] set code transaction envelope byte.
///
/// [EIP-7702]: https://eips.ethereum.org/EIPS/eip-7702
pub const EIP7702_TX_TYPE: u8 = 0x04;

/// Highest envelope byte reserved for typed transactions by [EIP-2718].
///
/// [EIP-2718]: https://eips.ethereum.org/EIPS/eip-2718
pub const MAX_TX_TYPE: u8 = 0x7f;

/// Domain separator prepended to the rlp encoded authorization tuple before hashing.
pub const AUTHORIZATION_MAGIC: u8 = 0x05;

/// Default gas price of legacy transactions built without an explicit price (20 gwei).
///
/// Legacy convenience only, the protocol doesn't mandate any default.
pub const DEFAULT_GAS_PRICE: U256 = U256([20_000_000_000, 0, 0, 0]);

/// Default gas limit of legacy transactions built without an explicit limit, the cost of a
/// plain value transfer.
pub const DEFAULT_GAS_LIMIT: u64 = 21_000;

/// Well known chain ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum Chain {
    Mainnet = 1,
    Morden = 2,
    Ropsten = 3,
    Rinkeby = 4,
    Goerli = 5,
    Kovan = 42,
    Sepolia = 11_155_111,
    Holesky = 17000,
    ClassicMainnet = 61,
    ClassicTestnet = 62,
    Private = 1337,
}

impl Chain {
    #[must_use]
    pub const fn id(self) -> u64 {
        self as u64
    }
}

impl From<Chain> for u64 {
    fn from(chain: Chain) -> Self {
        chain.id()
    }
}

impl TryFrom<u64> for Chain {
    type Error = u64;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        let chain = match id {
            1 => Self::Mainnet,
            2 => Self::Morden,
            3 => Self::Ropsten,
            4 => Self::Rinkeby,
            5 => Self::Goerli,
            42 => Self::Kovan,
            11_155_111 => Self::Sepolia,
            17000 => Self::Holesky,
            61 => Self::ClassicMainnet,
            62 => Self::ClassicTestnet,
            1337 => Self::Private,
            _ => return Err(id),
        };
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::{Chain, DEFAULT_GAS_PRICE};
    use primitive_types::U256;

    #[test]
    fn default_gas_price_is_20_gwei() {
        assert_eq!(DEFAULT_GAS_PRICE, U256::from(20_000_000_000u64));
    }

    #[test]
    fn chain_ids() {
        assert_eq!(Chain::Mainnet.id(), 1);
        assert_eq!(u64::from(Chain::Sepolia), 11_155_111);
        assert_eq!(Chain::try_from(5), Ok(Chain::Goerli));
        assert_eq!(Chain::try_from(999), Err(999));
    }
}
