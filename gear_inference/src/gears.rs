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

use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, info, warn};
use crate::error::{InferenceError, Result};
use crate::mean_shift::{cluster, ClusterModel};
use crate::polar::PolarPoint;

/// Gear label given to points whose cluster isn't one of the recognised gears
pub const NOT_A_GEAR: usize = 0;

/// Maps each phi cluster index to a gear number, or [NOT_A_GEAR]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GearAssignment {
    cluster_gears: Vec<usize>
}

impl GearAssignment {
    pub fn gear_for_cluster(&self, cluster_idx: usize) -> usize {
        self.cluster_gears.get(cluster_idx).copied().unwrap_or(NOT_A_GEAR)
    }

    pub fn cluster_gears(&self) -> &[usize] {
        &self.cluster_gears
    }

    pub fn num_gears(&self) -> usize {
        self.cluster_gears.iter().filter(|g| **g != NOT_A_GEAR).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelledPoint {
    pub point: PolarPoint,
    pub gear: usize
}

#[derive(Debug, Clone, PartialEq)]
pub struct GearLabelling {
    pub assignment: GearAssignment,
    pub points: Vec<LabelledPoint>,
    /// Representative phi of each gear, index 0 being first gear
    pub gear_boundaries: Vec<f64>
}

/// Discovers gears as the most populous clusters of phi values
#[derive(Debug, Clone)]
pub struct GearClusterer {
    n_gears: usize,
    bandwidth: Option<f64>,
    strict_gear_count: bool
}

impl GearClusterer {
    pub fn new(n_gears: usize) -> Result<GearClusterer> {
        if n_gears < 1 {
            return Err(InferenceError::invalid_parameter("n_gears", "at least one gear is required"));
        }
        Ok(GearClusterer { n_gears, bandwidth: None, strict_gear_count: false })
    }

    pub fn with_bandwidth(mut self, bandwidth: Option<f64>) -> GearClusterer {
        self.bandwidth = bandwidth;
        self
    }

    /// When set, a population tie that would select more than the requested number of gears
    /// is an error instead of a warning
    pub fn strict_gear_count(mut self, strict: bool) -> GearClusterer {
        self.strict_gear_count = strict;
        self
    }

    pub fn label(&self, points: &[PolarPoint]) -> Result<GearLabelling> {
        let phi_values: Vec<f64> = points.iter().map(|p| p.phi).collect();
        let model = cluster(&phi_values, self.bandwidth)?;
        info!("Found {} phi clusters from {} points", model.n_clusters(), points.len());

        let (assignment, gear_boundaries) = self.select(&model)?;
        let points = points.iter()
            .zip(model.labels())
            .map(|(point, cluster_idx)| LabelledPoint {
                point: *point,
                gear: assignment.gear_for_cluster(*cluster_idx)
            })
            .collect();
        Ok(GearLabelling { assignment, points, gear_boundaries })
    }

    /// Pick the gears out of a phi clustering.
    ///
    /// Every cluster at least as populous as the `n_gears`-th most populous cluster is a gear.
    /// Clusters tied on that population are all selected, so more than `n_gears` gears can
    /// be returned. Gears are numbered from 1 in order of ascending phi.
    pub fn select(&self, model: &ClusterModel) -> Result<(GearAssignment, Vec<f64>)> {
        let populations = model.populations();
        let centers = model.centers();
        if self.n_gears > populations.len() {
            return Err(InferenceError::InsufficientData(
                format!("requested {} gears but only {} clusters were found", self.n_gears, populations.len())
            ));
        }
        let threshold = populations.iter()
            .sorted_by(|a, b| b.cmp(a))
            .nth(self.n_gears - 1)
            .copied()
            .unwrap_or(0);
        if threshold == 0 {
            return Err(InferenceError::InsufficientData(
                format!("requested {} gears but fewer clusters contain any points", self.n_gears)
            ));
        }

        let selected: Vec<usize> = (0..populations.len())
            .filter(|idx| populations[*idx] >= threshold)
            .sorted_by(|a, b| centers[*a].total_cmp(&centers[*b]))
            .collect();
        if selected.len() > self.n_gears {
            if self.strict_gear_count {
                return Err(InferenceError::AmbiguousGearSelection {
                    requested: self.n_gears,
                    selected: selected.len()
                });
            }
            warn!("{} clusters share the population threshold of {}. Returning {} gears instead of {}",
                  selected.len(), threshold, selected.len(), self.n_gears);
        }

        let mut cluster_gears = vec![NOT_A_GEAR; populations.len()];
        for (rank, cluster_idx) in selected.iter().enumerate() {
            cluster_gears[*cluster_idx] = rank + 1;
            debug!("Gear {} -> cluster {} phi {} ({} points)",
                   rank + 1, cluster_idx, centers[*cluster_idx], populations[*cluster_idx]);
        }
        let gear_boundaries = selected.iter().map(|idx| centers[*idx]).collect();
        Ok((GearAssignment { cluster_gears }, gear_boundaries))
    }
}
