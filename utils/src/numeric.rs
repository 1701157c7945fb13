/*
 * Copyright (c):
 * 2025 zephyrj
 * zephyrj@protonmail.com
 *
 * This file is part of gear-guesser.
 *
 * gear-guesser is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * gear-guesser is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with gear-guesser. If not, see <https://www.gnu.org/licenses/>.
 */

pub fn round_float_to(float: f64, decimal_places: u32) -> f64 {
    let precision_base: u64 = 10;
    let precision_factor = precision_base.pow(decimal_places) as f64;
    (float * precision_factor).round() / precision_factor
}

/// Returns true if `val` is a usable physical quantity, i.e. finite and greater than zero
pub fn is_positive_finite(val: f64) -> bool {
    val.is_finite() && val > 0.0
}

pub fn is_valid_month(month: u32) -> bool {
    month >= 1 && month <= 12
}

#[cfg(test)]
mod tests {
    use crate::numeric::{is_positive_finite, is_valid_month, round_float_to};

    #[test]
    fn round_float_tests() {
        assert_eq!(round_float_to(2.9449, 2), 2.94);
        assert_eq!(round_float_to(2.945, 1), 2.9);
        assert_eq!(round_float_to(0.805, 0), 1.0);
        assert_eq!(round_float_to(1.0, 2), 1.0);
    }

    #[test]
    fn positive_finite_tests() {
        assert_eq!(is_positive_finite(26.5), true);
        assert_eq!(is_positive_finite(f64::MIN_POSITIVE), true);
        assert_eq!(is_positive_finite(0.0), false);
        assert_eq!(is_positive_finite(-1.0), false);
        assert_eq!(is_positive_finite(f64::NAN), false);
        assert_eq!(is_positive_finite(f64::INFINITY), false);
    }

    #[test]
    fn valid_month_tests() {
        assert_eq!(is_valid_month(0), false);
        assert_eq!(is_valid_month(1), true);
        assert_eq!(is_valid_month(12), true);
        assert_eq!(is_valid_month(13), false);
    }
}
