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

use serde::{Deserialize, Serialize};
use utils::numeric::is_positive_finite;
use crate::error::{InferenceError, Result};

/// Everything the inference pipeline needs from its caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Number of forward gears to find
    pub n_gears: usize,
    pub tire_diameter_inches: f64,
    /// Final drive ratio. When absent the fourth gear is assumed to be 1:1
    pub axle_ratio: Option<f64>,
    /// Fixed bandwidth for the RPM clustering. Estimated from the data when absent
    pub rpm_bandwidth: Option<f64>,
    /// Fixed bandwidth for the phi clustering. Estimated from the data when absent
    pub phi_bandwidth: Option<f64>,
    /// Fail rather than warn when population ties select more than `n_gears` gears
    pub strict_gear_count: bool
}

impl InferenceConfig {
    pub fn new(n_gears: usize, tire_diameter_inches: f64) -> InferenceConfig {
        InferenceConfig {
            n_gears,
            tire_diameter_inches,
            axle_ratio: None,
            rpm_bandwidth: None,
            phi_bandwidth: None,
            strict_gear_count: false
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_gears < 1 {
            return Err(InferenceError::invalid_parameter("n_gears", "at least one gear is required"));
        }
        if !is_positive_finite(self.tire_diameter_inches) {
            return Err(InferenceError::invalid_parameter(
                "tire_diameter_inches", format!("{} must be greater than zero", self.tire_diameter_inches)
            ));
        }
        let optional_values = [
            ("axle_ratio", self.axle_ratio),
            ("rpm_bandwidth", self.rpm_bandwidth),
            ("phi_bandwidth", self.phi_bandwidth)
        ];
        for (name, value) in optional_values {
            if let Some(v) = value {
                if !is_positive_finite(v) {
                    return Err(InferenceError::invalid_parameter(name, format!("{} must be greater than zero", v)));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::InferenceConfig;
    use crate::error::InferenceError;

    #[test]
    fn validation() {
        let config = InferenceConfig::new(5, 26.5);
        assert_eq!(config.validate(), Ok(()));

        let mut bad = config.clone();
        bad.n_gears = 0;
        assert!(matches!(bad.validate(), Err(InferenceError::InvalidParameter(name, _)) if name == "n_gears"));

        let mut bad = config.clone();
        bad.tire_diameter_inches = 0.0;
        assert!(matches!(bad.validate(), Err(InferenceError::InvalidParameter(name, _)) if name == "tire_diameter_inches"));

        let mut bad = config.clone();
        bad.axle_ratio = Some(-3.9);
        assert!(matches!(bad.validate(), Err(InferenceError::InvalidParameter(name, _)) if name == "axle_ratio"));

        let mut bad = config.clone();
        bad.phi_bandwidth = Some(f64::NAN);
        assert!(matches!(bad.validate(), Err(InferenceError::InvalidParameter(name, _)) if name == "phi_bandwidth"));

        let mut good = config;
        good.axle_ratio = Some(4.1);
        good.rpm_bandwidth = Some(250.0);
        assert_eq!(good.validate(), Ok(()));
    }
}
