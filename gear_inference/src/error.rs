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

pub type Result<T> = std::result::Result<T, InferenceError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("insufficient data. `{0}`")]
    InsufficientData(String),
    #[error("degenerate angle `{phi}` for gear {gear}. check neutral filtering and the requested gear count")]
    DegenerateAngle {
        gear: usize,
        phi: f64
    },
    #[error("invalid parameter `{0}`. `{1}`")]
    InvalidParameter(String, String),
    #[error("ambiguous gear selection. requested {requested} gears but {selected} clusters meet the population threshold")]
    AmbiguousGearSelection {
        requested: usize,
        selected: usize
    }
}

impl InferenceError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> InferenceError {
        InferenceError::InvalidParameter(name.to_string(), reason.into())
    }
}
