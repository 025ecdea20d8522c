//! Rider product terms: the age-banded maximum annual withdrawal rate

/// Maximum annual withdrawal rate from a given attained age
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WithdrawalBand {
    pub from_age: u32,
    pub rate: f64,
}

/// Bands in ascending age order; the first band covers all younger ages
pub const WITHDRAWAL_BANDS: [WithdrawalBand; 3] = [
    WithdrawalBand { from_age: 0, rate: 0.05 },
    WithdrawalBand { from_age: 65, rate: 0.06 },
    WithdrawalBand { from_age: 76, rate: 0.07 },
];

/// Maximum annual withdrawal rate (as a fraction of benefit base) at attained age
pub fn max_withdrawal_rate(age: u32) -> f64 {
    WITHDRAWAL_BANDS
        .iter()
        .rev()
        .find(|band| age >= band.from_age)
        .map(|band| band.rate)
        .unwrap_or(WITHDRAWAL_BANDS[0].rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(max_withdrawal_rate(0), 0.05);
        assert_eq!(max_withdrawal_rate(64), 0.05);
        assert_eq!(max_withdrawal_rate(65), 0.06);
        assert_eq!(max_withdrawal_rate(75), 0.06);
        assert_eq!(max_withdrawal_rate(76), 0.07);
        assert_eq!(max_withdrawal_rate(120), 0.07);
    }
}
