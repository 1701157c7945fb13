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

use std::f64::consts::FRAC_PI_2;
use serde::Serialize;
use tracing::info;
use utils::numeric::is_positive_finite;
use utils::units::{circumference_from_diameter_inches, kmh_to_metres_per_minute};
use crate::error::{InferenceError, Result};

/// Gear whose engine revolutions per wheel rotation stand in for the axle ratio when none is
/// known. Many manual gearboxes run a 1:1 fourth gear.
pub const REFERENCE_GEAR: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxleRatio {
    Known(f64),
    FourthGearReference
}

impl From<Option<f64>> for AxleRatio {
    fn from(ratio: Option<f64>) -> Self {
        match ratio {
            Some(r) => AxleRatio::Known(r),
            None => AxleRatio::FourthGearReference
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GearRatio {
    pub gear: usize,
    pub ratio: f64
}

/// Engine revolutions per metre travelled for a gear with angle `phi`.
///
/// Samples in one gear lie along the direction (cos(phi), sin(phi)) in (rpm, km/h) space, so the
/// engine speed per unit road speed only depends on phi.
pub fn revs_per_meter(phi: f64) -> f64 {
    phi.cos() / kmh_to_metres_per_minute(phi.sin())
}

fn check_angle(gear: usize, phi: f64) -> Result<f64> {
    if !phi.is_finite() || phi <= 0.0 || phi >= FRAC_PI_2 {
        return Err(InferenceError::DegenerateAngle { gear, phi });
    }
    Ok(phi)
}

fn check_axle_ratio(axle_ratio: AxleRatio) -> Result<AxleRatio> {
    match axle_ratio {
        AxleRatio::Known(ratio) if !is_positive_finite(ratio) => {
            Err(InferenceError::invalid_parameter("axle_ratio", format!("{} must be greater than zero", ratio)))
        }
        _ => Ok(axle_ratio)
    }
}

/// Divide each gear's engine revolutions per wheel rotation by the axle ratio.
///
/// Gears are numbered from 1 in the order given.
pub fn ratios_from_revs_per_rotation(revs_per_rotation: &[f64], axle_ratio: AxleRatio) -> Result<Vec<GearRatio>> {
    let divisor = match check_axle_ratio(axle_ratio)? {
        AxleRatio::Known(ratio) => ratio,
        AxleRatio::FourthGearReference => {
            let reference = revs_per_rotation.get(REFERENCE_GEAR - 1).copied().ok_or_else(|| {
                InferenceError::invalid_parameter(
                    "axle_ratio",
                    format!("only {} gears found so there's no gear {} to use as a reference. Provide the axle ratio",
                            revs_per_rotation.len(), REFERENCE_GEAR)
                )
            })?;
            if !is_positive_finite(reference) {
                return Err(InferenceError::invalid_parameter(
                    "axle_ratio", format!("reference gear gives an unusable ratio of {}", reference)
                ));
            }
            info!("Using gear {} revs per wheel rotation ({}) as the axle ratio", REFERENCE_GEAR, reference);
            reference
        }
    };
    Ok(revs_per_rotation.iter()
        .enumerate()
        .map(|(idx, revs)| GearRatio { gear: idx + 1, ratio: revs / divisor })
        .collect())
}

/// Turns gear angles into gearbox ratios using the tyre size
#[derive(Debug, Clone)]
pub struct RatioEstimator {
    tire_diameter_inches: f64,
    axle_ratio: AxleRatio
}

impl RatioEstimator {
    pub fn new(tire_diameter_inches: f64, axle_ratio: AxleRatio) -> Result<RatioEstimator> {
        if !is_positive_finite(tire_diameter_inches) {
            return Err(InferenceError::invalid_parameter(
                "tire_diameter_inches", format!("{} must be greater than zero", tire_diameter_inches)
            ));
        }
        Ok(RatioEstimator { tire_diameter_inches, axle_ratio: check_axle_ratio(axle_ratio)? })
    }

    /// Tyre circumference in metres
    pub fn tire_circumference(&self) -> f64 {
        circumference_from_diameter_inches(self.tire_diameter_inches)
    }

    /// Engine revolutions per wheel rotation for each gear angle
    pub fn revs_per_rotation(&self, gear_boundaries: &[f64]) -> Result<Vec<f64>> {
        let circumference = self.tire_circumference();
        gear_boundaries.iter()
            .enumerate()
            .map(|(idx, phi)| -> Result<f64> {
                Ok(revs_per_meter(check_angle(idx + 1, *phi)?) * circumference)
            })
            .collect()
    }

    pub fn estimate(&self, gear_boundaries: &[f64]) -> Result<Vec<GearRatio>> {
        let revs_per_rotation = self.revs_per_rotation(gear_boundaries)?;
        ratios_from_revs_per_rotation(&revs_per_rotation, self.axle_ratio)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;
    use utils::units::METRES_PER_MINUTE_PER_KMH;
    use crate::error::InferenceError;
    use crate::ratio::{AxleRatio, GearRatio, ratios_from_revs_per_rotation, RatioEstimator, revs_per_meter};

    const TIRE_DIAMETER: f64 = 26.5;

    fn phi_for_revs_per_rotation(revs_per_rotation: f64, circumference: f64) -> f64 {
        let cot_phi = (revs_per_rotation / circumference) * METRES_PER_MINUTE_PER_KMH;
        1.0f64.atan2(cot_phi)
    }

    #[test]
    fn reference_gear_ratios_are_unchanged_when_it_is_one_to_one() {
        let ratios = ratios_from_revs_per_rotation(&[2.9, 1.8, 1.3, 1.0, 0.8], AxleRatio::FourthGearReference).unwrap();
        assert_eq!(ratios, vec![
            GearRatio { gear: 1, ratio: 2.9 },
            GearRatio { gear: 2, ratio: 1.8 },
            GearRatio { gear: 3, ratio: 1.3 },
            GearRatio { gear: 4, ratio: 1.0 },
            GearRatio { gear: 5, ratio: 0.8 },
        ]);
    }

    #[test]
    fn recovers_ratios_from_angles() {
        let estimator = RatioEstimator::new(TIRE_DIAMETER, AxleRatio::FourthGearReference).unwrap();
        let circumference = estimator.tire_circumference();
        let expected = [2.9, 1.8, 1.3, 1.0, 0.8];
        let boundaries: Vec<f64> = expected.iter().map(|r| phi_for_revs_per_rotation(*r, circumference)).collect();
        assert!(boundaries.windows(2).all(|w| w[0] < w[1]));

        let ratios = estimator.estimate(&boundaries).unwrap();
        assert_eq!(ratios.len(), expected.len());
        for (ratio, expected) in ratios.iter().zip(expected) {
            assert!((ratio.ratio - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn known_axle_ratio_divides_revs() {
        let estimator = RatioEstimator::new(TIRE_DIAMETER, AxleRatio::Known(3.5)).unwrap();
        let circumference = estimator.tire_circumference();
        let phi = phi_for_revs_per_rotation(10.5, circumference);
        let ratios = estimator.estimate(&[phi]).unwrap();
        assert_eq!(ratios[0].gear, 1);
        assert!((ratios[0].ratio - 3.0).abs() < 1e-9);
    }

    #[test]
    fn ratios_are_positive_and_fall_with_gear() {
        let estimator = RatioEstimator::new(TIRE_DIAMETER, AxleRatio::FourthGearReference).unwrap();
        let ratios = estimator.estimate(&[0.008, 0.013, 0.018, 0.024, 0.03]).unwrap();
        assert!(ratios.iter().all(|r| r.ratio > 0.0));
        assert!(ratios.windows(2).all(|w| w[0].ratio > w[1].ratio));
        assert!((ratios[3].ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn revs_per_meter_for_known_angle() {
        // 45 degrees means 1 km/h per rpm, i.e. 1 rev per 1000/60 metres
        assert!((revs_per_meter(FRAC_PI_2 / 2.0) - 0.06).abs() < 1e-12);
    }

    #[test]
    fn rejects_degenerate_angles() {
        let estimator = RatioEstimator::new(TIRE_DIAMETER, AxleRatio::Known(4.1)).unwrap();
        assert_eq!(estimator.estimate(&[0.0, 0.02]), Err(InferenceError::DegenerateAngle { gear: 1, phi: 0.0 }));
        assert_eq!(estimator.estimate(&[0.01, 0.02, FRAC_PI_2]),
                   Err(InferenceError::DegenerateAngle { gear: 3, phi: FRAC_PI_2 }));
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(matches!(RatioEstimator::new(0.0, AxleRatio::FourthGearReference), Err(InferenceError::InvalidParameter(_, _))));
        assert!(matches!(RatioEstimator::new(-26.5, AxleRatio::FourthGearReference), Err(InferenceError::InvalidParameter(_, _))));
        assert!(matches!(RatioEstimator::new(f64::NAN, AxleRatio::FourthGearReference), Err(InferenceError::InvalidParameter(_, _))));
        assert!(matches!(RatioEstimator::new(TIRE_DIAMETER, AxleRatio::Known(0.0)), Err(InferenceError::InvalidParameter(_, _))));
        assert!(matches!(ratios_from_revs_per_rotation(&[2.9, 1.8, 1.3], AxleRatio::FourthGearReference),
                         Err(InferenceError::InvalidParameter(_, _))));
        assert_eq!(AxleRatio::from(None), AxleRatio::FourthGearReference);
        assert_eq!(AxleRatio::from(Some(3.9)), AxleRatio::Known(3.9));
    }
}
