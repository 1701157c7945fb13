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

//! Infers a vehicle's gearbox ratios from logged engine RPM and road speed.
//!
//! The pipeline runs in one direction:
//! raw samples -> cleaned samples -> neutral filtered samples -> polar points -> labelled
//! points -> gear ratios. Every derived table carries the [SampleId] it came from.

pub mod error;
pub mod config;
pub mod sample;
pub mod mean_shift;
pub mod neutral;
pub mod polar;
pub mod gears;
pub mod ratio;
pub mod pipeline;

pub use error::{InferenceError, Result};
pub use config::InferenceConfig;
pub use sample::{CleanedSample, Sample, SampleId, clean_samples};
pub use mean_shift::{ClusterModel, MeanShift};
pub use polar::PolarPoint;
pub use gears::{GearAssignment, GearClusterer, LabelledPoint, NOT_A_GEAR};
pub use ratio::{AxleRatio, GearRatio, RatioEstimator};
pub use pipeline::{GearInference, GearedSample, InferenceReport};
