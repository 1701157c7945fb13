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

use serde::Serialize;
use crate::sample::{CleanedSample, SampleId};

/// An (RPM, speed) pair expressed as magnitude and angle.
///
/// Within one gear RPM and speed are proportional, so every sample in that gear shares roughly
/// the same `phi` whatever the load or speed. Taller gears give larger angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolarPoint {
    pub id: SampleId,
    pub rho: f64,
    pub phi: f64
}

impl PolarPoint {
    pub fn from_sample(sample: &CleanedSample) -> PolarPoint {
        PolarPoint {
            id: sample.id,
            rho: sample.rpm.hypot(sample.speed_kmh),
            phi: sample.speed_kmh.atan2(sample.rpm)
        }
    }

    pub fn rpm(&self) -> f64 {
        self.rho * self.phi.cos()
    }

    pub fn speed_kmh(&self) -> f64 {
        self.rho * self.phi.sin()
    }
}

pub fn to_polar(samples: &[CleanedSample]) -> Vec<PolarPoint> {
    samples.iter().map(PolarPoint::from_sample).collect()
}
