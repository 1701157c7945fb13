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

use std::collections::HashMap;
use serde::Serialize;
use tracing::info;
use crate::config::InferenceConfig;
use crate::error::{InferenceError, Result};
use crate::gears::{GearAssignment, GearClusterer, LabelledPoint};
use crate::neutral::filter_neutral;
use crate::polar::to_polar;
use crate::ratio::{GearRatio, RatioEstimator};
use crate::sample::{clean_samples, CleanedSample, Sample, SampleId};

/// Everything produced by one inference run
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceReport {
    /// Complete samples where the car was on and moving
    pub cleaned: Vec<CleanedSample>,
    /// Cleaned samples with the neutral cluster removed
    pub in_gear: Vec<CleanedSample>,
    /// Polar form of each in-gear sample with its gear label
    pub labelled: Vec<LabelledPoint>,
    pub assignment: GearAssignment,
    pub gear_boundaries: Vec<f64>,
    pub ratios: Vec<GearRatio>
}

/// An in-gear sample joined with its polar coordinates and gear label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GearedSample {
    pub sample: CleanedSample,
    pub rho: f64,
    pub phi: f64,
    pub gear: usize
}

impl InferenceReport {
    /// Join the labelled points back onto their samples by id
    pub fn merged(&self) -> Vec<GearedSample> {
        let samples_by_id: HashMap<SampleId, &CleanedSample> =
            self.in_gear.iter().map(|s| (s.id, s)).collect();
        self.labelled.iter()
            .filter_map(|labelled| {
                let sample = samples_by_id.get(&labelled.point.id)?;
                Some(GearedSample {
                    sample: (*sample).clone(),
                    rho: labelled.point.rho,
                    phi: labelled.point.phi,
                    gear: labelled.gear
                })
            })
            .collect()
    }
}

pub struct GearInference {
    config: InferenceConfig
}

impl GearInference {
    pub fn new(config: InferenceConfig) -> Result<GearInference> {
        config.validate()?;
        Ok(GearInference { config })
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    pub fn run(&self, samples: &[Sample]) -> Result<InferenceReport> {
        let cleaned = clean_samples(samples);
        if cleaned.is_empty() {
            return Err(InferenceError::InsufficientData(
                format!("none of the {} samples were recorded with the car on and moving", samples.len())
            ));
        }
        let in_gear = filter_neutral(&cleaned, self.config.rpm_bandwidth)?;
        if in_gear.is_empty() {
            return Err(InferenceError::InsufficientData("every moving sample was in the neutral cluster".to_string()));
        }

        let polar = to_polar(&in_gear);
        let labelling = GearClusterer::new(self.config.n_gears)?
            .with_bandwidth(self.config.phi_bandwidth)
            .strict_gear_count(self.config.strict_gear_count)
            .label(&polar)?;

        let estimator = RatioEstimator::new(self.config.tire_diameter_inches, self.config.axle_ratio.into())?;
        let ratios = estimator.estimate(&labelling.gear_boundaries)?;
        for gear_ratio in &ratios {
            info!("Gear {} ratio estimated at {:.3}", gear_ratio.gear, gear_ratio.ratio);
        }

        Ok(InferenceReport {
            cleaned,
            in_gear,
            labelled: labelling.points,
            assignment: labelling.assignment,
            gear_boundaries: labelling.gear_boundaries,
            ratios
        })
    }
}
