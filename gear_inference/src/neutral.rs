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

use tracing::{debug, info};
use crate::error::Result;
use crate::mean_shift::{cluster, ClusterModel};
use crate::sample::CleanedSample;

/// Index of the neutral/idle cluster: the one with the lowest center. If several clusters share
/// the lowest center the lowest indexed one is chosen.
pub fn neutral_label(model: &ClusterModel) -> usize {
    let mut neutral = 0;
    for (idx, center) in model.centers().iter().enumerate() {
        if *center < model.centers()[neutral] {
            neutral = idx;
        }
    }
    neutral
}

/// Cluster the samples by RPM and remove every sample in the lowest RPM cluster, which is
/// assumed to be the car idling in neutral or coasting with the clutch in
pub fn filter_neutral(samples: &[CleanedSample], bandwidth: Option<f64>) -> Result<Vec<CleanedSample>> {
    let rpm_values: Vec<f64> = samples.iter().map(|s| s.rpm).collect();
    let model = cluster(&rpm_values, bandwidth)?;
    let neutral = neutral_label(&model);
    debug!("RPM cluster centers {:?}. Neutral cluster is {} at {} rpm",
           model.centers(), neutral, model.centers()[neutral]);

    let in_gear: Vec<CleanedSample> = samples.iter()
        .zip(model.labels())
        .filter(|(_, label)| **label != neutral)
        .map(|(sample, _)| sample.clone())
        .collect();
    info!("Removed {} neutral samples. {} remain", samples.len() - in_gear.len(), in_gear.len());
    Ok(in_gear)
}

#[cfg(test)]
mod tests {
    use crate::error::InferenceError;
    use crate::mean_shift::{cluster, ClusterModel};
    use crate::neutral::{filter_neutral, neutral_label};
    use crate::sample::{CleanedSample, SampleId};

    fn cleaned(id: usize, rpm: f64, speed_kmh: f64) -> CleanedSample {
        CleanedSample {
            id: SampleId(id),
            timestamp: format!("2016-03-02 17:{:02}:00", id % 60),
            latitude: 37.8,
            longitude: -122.3,
            rpm,
            speed_kmh
        }
    }

    fn idle_and_driving() -> Vec<CleanedSample> {
        let rpm_levels = [1800.0, 750.0, 2400.0, 3000.0];
        (0..90).map(|id| {
            let rpm = if id < 30 { 750.0 } else { rpm_levels[id % 4] };
            cleaned(id, rpm, 5.0 + id as f64)
        }).collect()
    }

    fn min_rpm_center(samples: &[CleanedSample]) -> f64 {
        let rpm: Vec<f64> = samples.iter().map(|s| s.rpm).collect();
        let model = cluster(&rpm, None).unwrap();
        model.centers()[neutral_label(&model)]
    }

    #[test]
    fn removes_idle_cluster_only() {
        let samples = idle_and_driving();
        let in_gear = filter_neutral(&samples, None).unwrap();
        assert!(in_gear.iter().all(|s| s.rpm > 750.0));
        let expected: Vec<SampleId> = samples.iter().filter(|s| s.rpm > 750.0).map(|s| s.id).collect();
        let kept: Vec<SampleId> = in_gear.iter().map(|s| s.id).collect();
        assert_eq!(kept, expected);
    }

    #[test]
    fn lowest_cluster_center_rises() {
        let samples = idle_and_driving();
        let in_gear = filter_neutral(&samples, None).unwrap();
        assert!(min_rpm_center(&in_gear) > min_rpm_center(&samples));
    }

    #[test]
    fn ties_pick_lowest_index() {
        let model = ClusterModel::new(100.0, vec![2000.0, 800.0, 800.0], vec![0, 1, 2, 1]).unwrap();
        assert_eq!(neutral_label(&model), 1);
        let model = ClusterModel::new(100.0, vec![650.0, 2200.0], vec![1, 0]).unwrap();
        assert_eq!(neutral_label(&model), 0);
    }

    #[test]
    fn nothing_to_filter() {
        assert!(matches!(filter_neutral(&[], None), Err(InferenceError::InsufficientData(_))));
    }
}
