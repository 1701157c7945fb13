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

use std::io;
use gear_inference::InferenceError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("gear inference failed. {0}")]
    Inference(#[from] InferenceError),
    #[error("io error. {0}")]
    Io(#[from] io::Error),
    #[error("csv error. {0}")]
    Csv(#[from] csv::Error),
    #[error("settings error. {0}")]
    Settings(#[from] config::ConfigError),
    #[error("no `.{extension}` data files found in `{path}`")]
    NoDataFile {
        path: String,
        extension: String
    },
    #[error("invalid setting `{0}`. `{1}`")]
    InvalidSetting(String, String)
}
