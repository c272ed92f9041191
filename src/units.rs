//! Ether denomination conversions.

use crate::types::U256;

/// Wei in one gwei.
pub const WEI_PER_GWEI: U256 = U256::new(1_000_000_000);

/// Wei in one ether.
pub const WEI_PER_ETHER: U256 = U256::new(1_000_000_000_000_000_000);

/// Converts an amount of ether to wei, returning `None` on overflow.
pub fn ether_to_wei(ether: U256) -> Option<U256> {
    ether.checked_mul(WEI_PER_ETHER)
}

/// Converts an amount of gwei to wei, returning `None` on overflow.
pub fn gwei_to_wei(gwei: U256) -> Option<U256> {
    gwei.checked_mul(WEI_PER_GWEI)
}

/// Converts wei to ether as a floating point number, which loses precision
/// for large amounts.
pub fn wei_to_ether(wei: U256) -> f64 {
    let (high, low) = wei.into_words();
    let wei = high as f64 * 2_f64.powi(128) + low as f64;
    wei / 1e18
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ether_conversions() {
        assert_eq!(
            ether_to_wei(U256::new(2)),
            Some(U256::new(2_000_000_000_000_000_000))
        );
        assert_eq!(ether_to_wei(U256::MAX), None);
        assert_eq!(gwei_to_wei(U256::new(50)), Some(U256::new(50_000_000_000)));
        assert_eq!(wei_to_ether(U256::new(1_500_000_000_000_000_000)), 1.5);
        assert_eq!(wei_to_ether(U256::ZERO), 0.0);
    }

    #[test]
    fn large_amounts() {
        let wei = U256::from_words(1, 0);
        assert_eq!(wei_to_ether(wei), 2_f64.powi(128) / 1e18);
    }
}
