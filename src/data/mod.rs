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

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use gear_inference::{GearedSample, GearRatio, Sample, SampleId};
use utils::filesystem::{create_safe_filename_in_path, get_sorted_filetypes_in_path};
use crate::error::AppError;

pub const DATA_FILE_EXTENSION: &'static str = "csv";

/// One row of a monthly telemetry export. Cells that are empty or can't be parsed are missing.
#[derive(Debug, Deserialize)]
struct TelemetryRecord {
    #[serde(rename = "recordDateTime")]
    record_date_time: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
    #[serde(rename = "vehicleSpeedSensorKmPerHour", deserialize_with = "csv::invalid_option")]
    speed_kmh: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    rpm: Option<f64>
}

impl TelemetryRecord {
    fn into_sample(self, id: SampleId) -> Sample {
        Sample {
            id,
            timestamp: self.record_date_time,
            latitude: self.latitude,
            longitude: self.longitude,
            rpm: self.rpm,
            speed_kmh: self.speed_kmh
        }
    }
}

#[derive(Debug, Serialize)]
struct MergedRecord<'a> {
    id: usize,
    #[serde(rename = "recordDateTime")]
    record_date_time: &'a str,
    latitude: f64,
    longitude: f64,
    #[serde(rename = "vehicleSpeedSensorKmPerHour")]
    speed_kmh: f64,
    rpm: f64,
    rho: f64,
    phi: f64,
    gear: usize
}

impl<'a> From<&'a GearedSample> for MergedRecord<'a> {
    fn from(row: &'a GearedSample) -> Self {
        MergedRecord {
            id: row.sample.id.0,
            record_date_time: &row.sample.timestamp,
            latitude: row.sample.latitude,
            longitude: row.sample.longitude,
            speed_kmh: row.sample.speed_kmh,
            rpm: row.sample.rpm,
            rho: row.rho,
            phi: row.phi,
            gear: row.gear
        }
    }
}

/// Find the data file for the requested month. Files are named `YYYY-MM.csv`.
///
/// If the month isn't available, or no month was requested, the latest file in `data_path`
/// is used instead.
pub fn find_month_file(data_path: &Path, month: Option<u32>, year: Option<i32>) -> Result<PathBuf, AppError> {
    let files = get_sorted_filetypes_in_path(data_path, DATA_FILE_EXTENSION)?;
    if let (Some(month), Some(year)) = (month, year) {
        let filename = format!("{}-{:02}.{}", year, month, DATA_FILE_EXTENSION);
        if let Some(file) = files.iter().find(|f| f.file_name() == Some(OsStr::new(&filename))) {
            return Ok(file.clone());
        }
        warn!("{} not found in {}. Finding another...", filename, data_path.display());
    }
    files.last().cloned().ok_or_else(|| AppError::NoDataFile {
        path: data_path.display().to_string(),
        extension: DATA_FILE_EXTENSION.to_string()
    })
}

/// The period a data file covers, taken from its name. i.e. `2016-03` for `2016-03.csv`
pub fn time_period(data_file: &Path) -> String {
    data_file.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Read every row of a telemetry export. Each sample's id is its row number.
pub fn load_samples(data_file: &Path) -> Result<Vec<Sample>, AppError> {
    let mut rdr = csv::Reader::from_path(data_file)?;
    let mut samples = Vec::new();
    for (row_idx, result) in rdr.deserialize().enumerate() {
        let record: TelemetryRecord = result?;
        samples.push(record.into_sample(SampleId(row_idx)));
    }
    info!("Loaded {} samples from {}", samples.len(), data_file.display());
    Ok(samples)
}

fn output_file(output_path: &Path, time_period: &str, table: &str) -> Result<PathBuf, AppError> {
    fs::create_dir_all(output_path)?;
    let name = format!("{}_{}", time_period.replace("-", ""), table);
    Ok(create_safe_filename_in_path(output_path, &name, DATA_FILE_EXTENSION))
}

/// Write the in-gear samples joined with their polar coordinates and gear
pub fn write_merged(output_path: &Path, time_period: &str, rows: &[GearedSample]) -> Result<PathBuf, AppError> {
    let path = output_file(output_path, time_period, "merged")?;
    let mut writer = csv::Writer::from_path(&path)?;
    for row in rows {
        writer.serialize(MergedRecord::from(row))?;
    }
    writer.flush()?;
    info!("Wrote {} merged rows to {}", rows.len(), path.display());
    Ok(path)
}

pub fn write_ratios(output_path: &Path, time_period: &str, ratios: &[GearRatio]) -> Result<PathBuf, AppError> {
    let path = output_file(output_path, time_period, "ratios")?;
    let mut writer = csv::Writer::from_path(&path)?;
    for ratio in ratios {
        writer.serialize(ratio)?;
    }
    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};
    use gear_inference::{CleanedSample, GearedSample, GearRatio, SampleId};
    use crate::data::{find_month_file, load_samples, time_period, write_merged, write_ratios};
    use crate::error::AppError;

    const TEST_DATA_PATH: &'static str = "test_data";

    fn get_test_data_path() -> PathBuf {
        let mut test_folder_path = PathBuf::from(Path::new(file!()).parent().unwrap());
        test_folder_path.push(TEST_DATA_PATH);
        test_folder_path
    }

    fn make_tmp_dir(test_name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gear_guesser_data_{}", test_name));
        if dir.exists() {
            fs::remove_dir_all(&dir).unwrap();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_samples_with_missing_values() {
        let samples = load_samples(&get_test_data_path().join("2016-03.csv")).unwrap();
        assert_eq!(samples.len(), 8);
        assert_eq!(samples.iter().map(|s| s.id).collect::<Vec<_>>(), (0..8).map(SampleId).collect::<Vec<_>>());

        assert_eq!(samples[0].speed_kmh, Some(0.0));
        assert_eq!(samples[2].rpm, Some(2100.0));
        assert_eq!(samples[2].speed_kmh, Some(23.5));
        assert_eq!(samples[2].timestamp.as_deref(), Some("2016-03-01 08:00:00"));
        assert_eq!(samples[3].latitude, None);
        assert_eq!(samples[4].speed_kmh, None);
        assert_eq!(samples[5].rpm, None);
        assert_eq!(samples[6].timestamp, None);

        let cleaned = gear_inference::clean_samples(&samples);
        assert_eq!(cleaned.iter().map(|s| s.id.0).collect::<Vec<_>>(), vec![1, 2, 7]);
    }

    #[test]
    fn finds_requested_month_or_latest() {
        let dir = make_tmp_dir("find_month");
        for name in ["2016-01.csv", "2016-03.csv", "2015-11.csv", "readme.txt"] {
            fs::write(dir.join(name), "").unwrap();
        }
        assert_eq!(find_month_file(&dir, Some(1), Some(2016)).unwrap(), dir.join("2016-01.csv"));
        assert_eq!(find_month_file(&dir, Some(2), Some(2016)).unwrap(), dir.join("2016-03.csv"));
        assert_eq!(find_month_file(&dir, None, Some(2015)).unwrap(), dir.join("2016-03.csv"));
        assert_eq!(time_period(&dir.join("2016-03.csv")), "2016-03");
        fs::remove_dir_all(&dir).unwrap();

        let empty = make_tmp_dir("find_month_empty");
        assert!(matches!(find_month_file(&empty, Some(3), Some(2016)), Err(AppError::NoDataFile { .. })));
        fs::remove_dir_all(&empty).unwrap();
    }

    #[test]
    fn writes_tables() {
        let dir = make_tmp_dir("write_tables");
        let rows = vec![GearedSample {
            sample: CleanedSample {
                id: SampleId(7),
                timestamp: "2016-03-01 08:05:00".to_string(),
                latitude: 37.781,
                longitude: -122.412,
                rpm: 2650.0,
                speed_kmh: 88.25
            },
            rho: 2651.469,
            phi: 0.0333,
            gear: 4
        }];
        let merged_path = write_merged(&dir, "2016-03", &rows).unwrap();
        assert_eq!(merged_path, dir.join("201603_merged.csv"));
        let contents = fs::read_to_string(&merged_path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("id,recordDateTime,latitude,longitude,vehicleSpeedSensorKmPerHour,rpm,rho,phi,gear"));
        assert_eq!(lines.next(), Some("7,2016-03-01 08:05:00,37.781,-122.412,88.25,2650.0,2651.469,0.0333,4"));

        let second = write_merged(&dir, "2016-03", &rows).unwrap();
        assert_eq!(second, dir.join("201603_merged2.csv"));

        let ratios_path = write_ratios(&dir, "2016-03", &[GearRatio { gear: 1, ratio: 3.5 }]).unwrap();
        let contents = fs::read_to_string(&ratios_path).unwrap();
        assert_eq!(contents.lines().collect::<Vec<_>>(), vec!["gear,ratio", "1,3.5"]);
        fs::remove_dir_all(&dir).unwrap();
    }
}
