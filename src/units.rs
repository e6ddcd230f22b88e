// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weight ⇄ egg-count conversion.

/// Estimated number of waxworm eggs in one gram.
pub const EGGS_PER_GRAM: f64 = 650.0;

/// Convert a harvested weight to an estimated egg count.
pub fn grams_to_eggs(grams: f64) -> i64 {
    (grams * EGGS_PER_GRAM).round() as i64
}

/// Convert an egg count back to grams, rounded to 3 decimal places.
///
/// This is not an exact inverse of [`grams_to_eggs`]; the rounding on both
/// sides loses precision.
pub fn eggs_to_grams(eggs: i64) -> f64 {
    round_to(eggs as f64 / EGGS_PER_GRAM, 3)
}

/// Round `value` to `places` decimal places (half away from zero).
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grams_to_eggs() {
        assert_eq!(grams_to_eggs(0.0), 0);
        assert_eq!(grams_to_eggs(1.0), 650);
        assert_eq!(grams_to_eggs(2.5), 1625);
        assert_eq!(grams_to_eggs(3.2), 2080);
        assert_eq!(grams_to_eggs(15.0), 9750);
    }

    #[test]
    fn test_grams_to_eggs_rounds() {
        // 0.001g * 650 = 0.65 eggs
        assert_eq!(grams_to_eggs(0.001), 1);
        // 0.0007g * 650 = 0.455 eggs
        assert_eq!(grams_to_eggs(0.0007), 0);
    }

    #[test]
    fn test_eggs_to_grams() {
        assert_eq!(eggs_to_grams(650), 1.0);
        assert_eq!(eggs_to_grams(1625), 2.5);
        // 1 / 650 = 0.0015384...
        assert_eq!(eggs_to_grams(1), 0.002);
    }

    #[test]
    fn test_round_trip_is_close_not_exact() {
        let one_egg = 1.0 / EGGS_PER_GRAM;
        for grams in [4.0, 0.123, 7.777, 12.3456] {
            let back = eggs_to_grams(grams_to_eggs(grams));
            assert!(
                (back - grams).abs() <= one_egg,
                "{} -> {} drifted more than one egg",
                grams,
                back
            );
        }
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(5.555, 1), 5.6);
        assert_eq!(round_to(4.499, 2), 4.5);
        assert_eq!(round_to(0.0, 3), 0.0);
    }
}
