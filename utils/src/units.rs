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

pub const METRES_PER_INCH: f64 = 0.0254;
pub const METRES_PER_MINUTE_PER_KMH: f64 = 1000.0 / 60.0;

pub fn inches_to_metres(inches: f64) -> f64 {
    inches * METRES_PER_INCH
}

pub fn kmh_to_metres_per_minute(speed_kmh: f64) -> f64 {
    speed_kmh * METRES_PER_MINUTE_PER_KMH
}

/// Circumference in metres of a wheel/tyre with the given outer diameter in inches
pub fn circumference_from_diameter_inches(diameter_inches: f64) -> f64 {
    std::f64::consts::PI * inches_to_metres(diameter_inches)
}

#[cfg(test)]
mod tests {
    use crate::units::{circumference_from_diameter_inches, inches_to_metres, kmh_to_metres_per_minute};

    #[test]
    fn unit_conversions() {
        assert!((inches_to_metres(1.0) - 0.0254).abs() < 1e-12);
        assert!((kmh_to_metres_per_minute(60.0) - 1000.0).abs() < 1e-9);
        assert!((circumference_from_diameter_inches(26.5) - 2.114606015).abs() < 1e-6);
    }
}
