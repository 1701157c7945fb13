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

use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Row identity assigned when telemetry is ingested. Carried through every derived table so they
/// can be joined back together after rows have been dropped at different stages.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct SampleId(pub usize);

impl Display for SampleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A raw telemetry record. Any field may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub id: SampleId,
    pub timestamp: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rpm: Option<f64>,
    pub speed_kmh: Option<f64>
}

/// A complete sample recorded while the engine was on and the vehicle was moving
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedSample {
    pub id: SampleId,
    pub timestamp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rpm: f64,
    pub speed_kmh: f64
}

impl From<&CleanedSample> for Sample {
    fn from(sample: &CleanedSample) -> Self {
        Sample {
            id: sample.id,
            timestamp: Some(sample.timestamp.clone()),
            latitude: Some(sample.latitude),
            longitude: Some(sample.longitude),
            rpm: Some(sample.rpm),
            speed_kmh: Some(sample.speed_kmh)
        }
    }
}

fn present(val: Option<f64>) -> Option<f64> {
    val.filter(|v| !v.is_nan())
}

impl Sample {
    /// Returns the cleaned form of this sample, or None if a field is missing or the car
    /// was stationary or the engine off
    pub fn to_cleaned(&self) -> Option<CleanedSample> {
        let timestamp = self.timestamp.as_ref()?;
        let latitude = present(self.latitude)?;
        let longitude = present(self.longitude)?;
        let rpm = present(self.rpm)?;
        let speed_kmh = present(self.speed_kmh)?;
        if rpm <= 0.0 || speed_kmh <= 0.0 {
            return None;
        }
        Some(CleanedSample {
            id: self.id,
            timestamp: timestamp.clone(),
            latitude,
            longitude,
            rpm,
            speed_kmh
        })
    }
}

/// Drop incomplete samples and any where the vehicle is not moving or the engine is off.
/// Ordering and ids are preserved.
pub fn clean_samples(samples: &[Sample]) -> Vec<CleanedSample> {
    let cleaned: Vec<CleanedSample> = samples.iter().filter_map(Sample::to_cleaned).collect();
    info!("{} of {} samples are complete, on and moving", cleaned.len(), samples.len());
    cleaned
}
