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

use std::fs;
use std::path::{Path, PathBuf};
use config::{Config, ConfigBuilder, ConfigError};
use config::builder::DefaultState;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use gear_inference::InferenceConfig;
use utils::numeric::is_valid_month;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    data_path: String,
    output_path: String,
    #[serde(default)]
    month: Option<u32>,
    #[serde(default)]
    year: Option<i32>,
    write_tables: bool,
    n_gears: usize,
    tire_diameter_inches: f64,
    #[serde(default)]
    axle_ratio: Option<f64>,
    #[serde(default)]
    rpm_bandwidth: Option<f64>,
    #[serde(default)]
    phi_bandwidth: Option<f64>,
    strict_gear_count: bool
}

impl Settings {
    const DATA_PATH: &'static str = "data_path";
    const OUTPUT_PATH: &'static str = "output_path";
    const WRITE_TABLES: &'static str = "write_tables";
    const N_GEARS: &'static str = "n_gears";
    const TIRE_DIAMETER_INCHES: &'static str = "tire_diameter_inches";
    const STRICT_GEAR_COUNT: &'static str = "strict_gear_count";
    pub const CONFIG_FILENAME: &'static str = "gear-guesser-conf.toml";
    pub const ENV_PREFIX: &'static str = "GEAR";

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default(Settings::DATA_PATH, ".")?
            .set_default(Settings::OUTPUT_PATH, "pydata")?
            .set_default(Settings::WRITE_TABLES, true)?
            .set_default(Settings::N_GEARS, 5_i64)?
            .set_default(Settings::TIRE_DIAMETER_INCHES, 26.5_f64)?
            .set_default(Settings::STRICT_GEAR_COUNT, false)
    }

    pub fn default() -> Self {
        Settings {
            data_path: ".".to_string(),
            output_path: "pydata".to_string(),
            month: None,
            year: None,
            write_tables: true,
            n_gears: 5,
            tire_diameter_inches: 26.5,
            axle_ratio: None,
            rpm_bandwidth: None,
            phi_bandwidth: None,
            strict_gear_count: false
        }
    }

    pub fn load() -> Result<Self, ConfigError> {
        Settings::load_from(Path::new(Settings::CONFIG_FILENAME))
    }

    /// Load settings from `config_path` with environment overrides. If that fails the defaults
    /// are used and written to `config_path` so they can be edited for the next run.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        return match Settings::builder_with_defaults()?
            .add_source(config::File::from(config_path))
            .add_source(config::Environment::with_prefix(Settings::ENV_PREFIX))
            .build() {
            Ok(settings) => {
                settings.try_deserialize()
            }
            Err(e) => {
                warn!("Failed to load settings. {}", e.to_string());
                let ret = Settings::default();
                ret.write_to(config_path).unwrap_or_else(|e| { error!("Failed to write settings. {}", e.to_string())});
                Ok(ret)
            }
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(month) = self.month {
            if !is_valid_month(month) {
                return Err(AppError::InvalidSetting("month".to_string(), format!("{} is not in 1..=12", month)));
            }
        }
        self.inference_config().validate()?;
        Ok(())
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_path)
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_path)
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn write_tables(&self) -> bool {
        self.write_tables
    }

    pub fn inference_config(&self) -> InferenceConfig {
        InferenceConfig {
            n_gears: self.n_gears,
            tire_diameter_inches: self.tire_diameter_inches,
            axle_ratio: self.axle_ratio,
            rpm_bandwidth: self.rpm_bandwidth,
            phi_bandwidth: self.phi_bandwidth,
            strict_gear_count: self.strict_gear_count
        }
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, toml::to_string(&self).map_err(|_e|{
            std::io::Error::new(std::io::ErrorKind::Other, "Failed to encode settings to toml")
        })?)
    }
}
