//! Length-based registration pricing.
//!
//! Short names are scarce and cost more. Prices are expressed in wei of the
//! target chain's native currency.

use std::fmt;

use kot_blockchain_core::U256;

/// Shortest name the client will submit.
pub const MIN_NAME_LENGTH: usize = 3;
/// Longest name the client will submit.
pub const MAX_NAME_LENGTH: usize = 12;

const WEI_PER_UNIT: u64 = 1_000_000_000_000_000_000;

/// Registration price in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(U256);

impl Price {
    pub const fn from_wei(wei: U256) -> Self {
        Self(wei)
    }

    /// Price of `tenths` tenths of one native unit (e.g. `5` = 0.5 MATIC).
    pub fn from_tenths(tenths: u64) -> Self {
        Self(U256::from(tenths) * U256::from(WEI_PER_UNIT / 10))
    }

    pub fn wei(self) -> U256 {
        self.0
    }
}

impl fmt::Display for Price {
    /// Decimal native units with trailing zeros trimmed (`0.5`, `1`, `0.125`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = U256::from(WEI_PER_UNIT);
        let whole = self.0 / unit;
        let fraction = self.0 % unit;
        if fraction.is_zero() {
            return write!(f, "{whole}");
        }
        let digits = format!("{:0>18}", fraction.to_string());
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

/// Price for a name of `length` characters, or `None` below the minimum.
///
/// | length | price |
/// |--------|-------|
/// | 3      | 0.5   |
/// | 4      | 0.3   |
/// | 5+     | 0.1   |
pub fn price_for_length(length: usize) -> Option<Price> {
    let tenths = match length {
        0..MIN_NAME_LENGTH => return None,
        3 => 5,
        4 => 3,
        _ => 1,
    };
    Some(Price::from_tenths(tenths))
}

/// Price for `name`, counting characters rather than bytes.
pub fn price_for_name(name: &str) -> Option<Price> {
    price_for_length(name.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_tiers_follow_length() {
        assert_eq!(price_for_length(2), None);
        assert_eq!(price_for_length(3).unwrap().to_string(), "0.5");
        assert_eq!(price_for_length(4).unwrap().to_string(), "0.3");
        assert_eq!(price_for_length(5).unwrap().to_string(), "0.1");
        assert_eq!(price_for_length(12).unwrap().to_string(), "0.1");
        assert_eq!(
            price_for_length(3).unwrap().wei(),
            U256::from(500_000_000_000_000_000u64)
        );
    }

    #[test]
    fn pricing_counts_characters_not_bytes() {
        // "ñña" is 3 characters but 5 bytes.
        assert_eq!(price_for_name("ñña"), price_for_length(3));
        assert_eq!(price_for_name("ab"), None);
    }

    #[test]
    fn whole_units_render_without_fraction() {
        assert_eq!(Price::from_tenths(10).to_string(), "1");
        assert_eq!(Price::from_tenths(25).to_string(), "2.5");
    }
}
