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

mod error;
mod settings;
mod data;

use std::env;
use std::process::ExitCode;
use itertools::Itertools;
use tracing::{error, info};

use gear_inference::{GearInference, GearRatio};
use utils::numeric::round_float_to;

use crate::error::AppError;
use crate::settings::Settings;

fn init_logging() {
    match env::current_dir() {
        Ok(current_dir) => {
            let file_appender = tracing_appender::rolling::never(current_dir, "gear_guesser.log");
            let subscriber = tracing_subscriber::fmt()
                .with_writer(file_appender)
                .with_ansi(false)
                .compact()
                .finish();
            match tracing::subscriber::set_global_default(subscriber) {
                Ok(_) => {
                    info!("Logging initialised");
                }
                Err(e) => {
                    eprintln!("Failed to init logging. {}", e.to_string());
                }
            }
        }
        Err(e) => {
            eprintln!("Failed to init logging. Couldn't determine current dir {}", e.to_string());
        }
    }
}

fn print_ratios(ratios: &[GearRatio]) {
    println!("Best guesses for Gear Ratios:");
    for gear_ratio in ratios {
        println!("Gear {} : {:.2}", gear_ratio.gear, round_float_to(gear_ratio.ratio, 2));
    }
}

fn run() -> Result<(), AppError> {
    let settings = Settings::load()?;
    settings.validate()?;

    let data_path = settings.data_path();
    let data_file = data::find_month_file(&data_path, settings.month(), settings.year())?;
    let time_period = data::time_period(&data_file);
    info!("Guessing gear ratios for {} from {}", time_period, data_file.display());

    let samples = data::load_samples(&data_file)?;
    let inference = GearInference::new(settings.inference_config())?;
    let report = inference.run(&samples)?;
    info!("Gear boundaries (phi): {}", report.gear_boundaries.iter().map(|phi| format!("{:.5}", phi)).join(", "));
    print_ratios(&report.ratios);

    if settings.write_tables() {
        let output_path = settings.output_path();
        data::write_merged(&output_path, &time_period, &report.merged())?;
        data::write_ratios(&output_path, &time_period, &report.ratios)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
