//! Adapter layer: converts between the engine's f64 amounts and the
//! Decimal values used by the conservation audit.

use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Convert f64 to Decimal (lossy but sufficient for simulation).
/// Non-finite inputs map to zero.
pub fn to_decimal(v: f64) -> Decimal {
    Decimal::from_f64(v).unwrap_or(Decimal::ZERO)
}

/// Convert Decimal to f64.
pub fn from_decimal(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_trip_simple_values() {
        assert_eq!(to_decimal(1.5), dec!(1.5));
        assert!((from_decimal(dec!(1.9999)) - 1.9999).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_maps_to_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }
}
