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

//! One dimensional mean-shift clustering.
//!
//! Modes are found with a flat kernel: a candidate repeatedly moves to the mean of every value
//! within `bandwidth` of it until it stops moving. Candidates are seeded from a grid of
//! `bandwidth` sized bins over the data rather than from every value, and candidates that end up
//! within `bandwidth` of a stronger mode are merged into it.
//!
//! The number of clusters is discovered, not requested. Results are fully deterministic for a
//! given input and bandwidth.

use itertools::Itertools;
use statrs::statistics::Statistics;
use tracing::debug;
use utils::numeric::is_positive_finite;
use crate::error::{InferenceError, Result};

/// Fraction of the data used as the neighbour count when estimating a bandwidth
pub const DEFAULT_QUANTILE: f64 = 0.1;
pub const DEFAULT_MAX_ITERATIONS: usize = 300;
/// Bandwidth used when the estimate collapses to zero (too few values, or all identical)
pub const MIN_BANDWIDTH: f64 = 1e-6;
const CONVERGENCE_FACTOR: f64 = 1e-3;

/// Result of clustering a sequence of values
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterModel {
    bandwidth: f64,
    centers: Vec<f64>,
    labels: Vec<usize>
}

impl ClusterModel {
    pub fn new(bandwidth: f64, centers: Vec<f64>, labels: Vec<usize>) -> Result<ClusterModel> {
        if centers.is_empty() {
            return Err(InferenceError::InsufficientData("a cluster model needs at least one center".to_string()));
        }
        if let Some(bad_label) = labels.iter().find(|&&l| l >= centers.len()) {
            return Err(InferenceError::invalid_parameter(
                "labels",
                format!("label {} refers to one of only {} centers", bad_label, centers.len())
            ));
        }
        Ok(ClusterModel { bandwidth, centers, labels })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// Cluster index of each input value, in input order
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn n_clusters(&self) -> usize {
        self.centers.len()
    }

    pub fn label_of(&self, value_idx: usize) -> Option<usize> {
        self.labels.get(value_idx).copied()
    }

    /// Number of values labelled with each cluster, indexed by cluster
    pub fn populations(&self) -> Vec<usize> {
        let mut counts = vec![0; self.centers.len()];
        self.labels.iter().for_each(|l| counts[*l] += 1);
        counts
    }
}

#[derive(Debug, Clone)]
pub struct MeanShift {
    bandwidth: Option<f64>,
    quantile: f64,
    max_iterations: usize
}

impl Default for MeanShift {
    fn default() -> Self {
        MeanShift {
            bandwidth: None,
            quantile: DEFAULT_QUANTILE,
            max_iterations: DEFAULT_MAX_ITERATIONS
        }
    }
}

impl MeanShift {
    /// Create a clusterer with a fixed bandwidth, or one that estimates it from the data when
    /// `bandwidth` is None
    pub fn with_bandwidth(bandwidth: Option<f64>) -> MeanShift {
        MeanShift { bandwidth, ..MeanShift::default() }
    }

    pub fn cluster(&self, values: &[f64]) -> Result<ClusterModel> {
        if values.is_empty() {
            return Err(InferenceError::InsufficientData("can't cluster zero values".to_string()));
        }
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(InferenceError::invalid_parameter(
                "values", format!("value at index {} is not finite", idx)
            ));
        }
        let bandwidth = match self.bandwidth {
            Some(bw) if is_positive_finite(bw) => bw,
            Some(bw) => {
                return Err(InferenceError::invalid_parameter("bandwidth", format!("{} must be greater than zero", bw)));
            }
            None => estimate_bandwidth(values, self.quantile)?
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let seeds = bin_seeds(&sorted, bandwidth);
        let mut modes: Vec<(f64, usize)> = seeds.iter()
            .filter_map(|seed| self.climb(&sorted, *seed, bandwidth))
            .collect();
        if modes.is_empty() {
            return Err(InferenceError::InsufficientData(format!("no value within bandwidth {} of any seed", bandwidth)));
        }
        // Strongest modes first so they absorb the weaker ones nearby
        modes.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.total_cmp(&a.0)));

        let mut centers: Vec<f64> = Vec::new();
        for (mode, _) in modes {
            if centers.iter().all(|c| (c - mode).abs() > bandwidth) {
                centers.push(mode);
            }
        }
        debug!("{} seeds converged to {} clusters with bandwidth {}", seeds.len(), centers.len(), bandwidth);

        let labels = values.iter().map(|v| nearest_center(&centers, *v)).collect();
        ClusterModel::new(bandwidth, centers, labels)
    }

    /// Move `seed` uphill until it converges. Returns the mode and the number of values that were
    /// within the bandwidth of it, or None if the seed had no values nearby.
    fn climb(&self, sorted: &[f64], seed: f64, bandwidth: f64) -> Option<(f64, usize)> {
        let threshold = CONVERGENCE_FACTOR * bandwidth;
        let mut mean = seed;
        let mut iterations = 0;
        loop {
            let window = values_within(sorted, mean, bandwidth);
            if window.is_empty() {
                return None;
            }
            let old_mean = mean;
            mean = window.iter().mean();
            iterations += 1;
            if (mean - old_mean).abs() <= threshold || iterations >= self.max_iterations {
                return Some((mean, window.len()));
            }
        }
    }
}

/// Cluster `values` with mean-shift, estimating the bandwidth if one isn't provided
pub fn cluster(values: &[f64], bandwidth: Option<f64>) -> Result<ClusterModel> {
    MeanShift::with_bandwidth(bandwidth).cluster(values)
}

/// Estimate a bandwidth as the average distance from each value to its k-th nearest neighbour,
/// where `k = ceil(quantile * n)` and each value counts as its own first neighbour.
///
/// Falls back to [MIN_BANDWIDTH] if the estimate is zero.
pub fn estimate_bandwidth(values: &[f64], quantile: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(InferenceError::InsufficientData("can't estimate a bandwidth from zero values".to_string()));
    }
    if !(quantile > 0.0 && quantile <= 1.0) {
        return Err(InferenceError::invalid_parameter("quantile", format!("{} must be in (0, 1]", quantile)));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let k = ((quantile * n as f64).ceil() as usize).clamp(1, n);

    let total: f64 = (0..n).map(|idx| kth_neighbour_distance(&sorted, idx, k)).sum();
    let bandwidth = total / n as f64;
    if bandwidth > MIN_BANDWIDTH {
        Ok(bandwidth)
    } else {
        debug!("Bandwidth estimate {} from {} values too small. Using {}", bandwidth, n, MIN_BANDWIDTH);
        Ok(MIN_BANDWIDTH)
    }
}

/// Distance from `sorted[idx]` to its k-th nearest value (itself being the first)
fn kth_neighbour_distance(sorted: &[f64], idx: usize, k: usize) -> f64 {
    let needed = k - 1;
    if needed == 0 {
        return 0.0;
    }
    let to_left = |t: usize| if t == 0 { 0.0 } else { sorted[idx] - sorted[idx - t] };
    let to_right = |t: usize| if t == 0 { 0.0 } else { sorted[idx + t] - sorted[idx] };
    // Taking t neighbours from the left and the rest from the right; left distance grows and
    // right distance shrinks with t, so the cost is minimised where they cross
    let lo = needed.saturating_sub(sorted.len() - 1 - idx);
    let hi = needed.min(idx);
    let cost = |t: usize| to_left(t).max(to_right(needed - t));

    let (mut start, mut end) = (lo, hi + 1);
    while start < end {
        let mid = (start + end) / 2;
        if to_left(mid) >= to_right(needed - mid) {
            end = mid;
        } else {
            start = mid + 1;
        }
    }
    let mut best = f64::INFINITY;
    if start <= hi {
        best = best.min(cost(start));
    }
    if start > lo {
        best = best.min(cost(start - 1));
    }
    best
}

fn bin_seeds(sorted: &[f64], bandwidth: f64) -> Vec<f64> {
    sorted.iter()
        .map(|v| (v / bandwidth).round() as i64)
        .dedup()
        .map(|bin| bin as f64 * bandwidth)
        .collect()
}

fn values_within(sorted: &[f64], center: f64, radius: f64) -> &[f64] {
    let start = sorted.partition_point(|v| *v < center - radius);
    let end = sorted.partition_point(|v| *v <= center + radius);
    &sorted[start..end]
}

fn nearest_center(centers: &[f64], value: f64) -> usize {
    let mut best_idx = 0;
    let mut best_distance = f64::INFINITY;
    for (idx, center) in centers.iter().enumerate() {
        let distance = (center - value).abs();
        if distance < best_distance {
            best_idx = idx;
            best_distance = distance;
        }
    }
    best_idx
}
