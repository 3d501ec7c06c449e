// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use serde::Deserialize;

use super::error::ConfigError;
use crate::preset::{self, PresetList, Value};

/// A YAML representation of a single preset. Exactly one of the value
/// fields must be set.
#[derive(Deserialize, Clone, Default)]
pub struct Preset {
    /// The name used in logs. Derived from the value when missing.
    #[serde(alias = "label")]
    name: Option<String>,

    /// A color temperature in Kelvin.
    kelvin: Option<u32>,

    /// An RGB color.
    rgb: Option<Vec<u8>>,

    /// A brightness percentage.
    percent: Option<u8>,
}

impl Preset {
    /// Converts this into a catalog preset, validating its value.
    fn to_preset(&self, list: &str, index: usize) -> Result<preset::Preset, ConfigError> {
        let label = || {
            self.name
                .clone()
                .unwrap_or_else(|| format!("#{}", index + 1))
        };

        let value = match (self.kelvin, self.rgb.as_deref(), self.percent) {
            (Some(kelvin), None, None) => Value::Kelvin(kelvin),
            (None, Some(&[r, g, b]), None) => Value::Rgb([r, g, b]),
            (None, None, Some(percent)) if percent > 100 => {
                return Err(ConfigError::Percent {
                    list: list.to_string(),
                    preset: label(),
                    percent,
                })
            }
            (None, None, Some(percent)) => Value::Percent(percent),
            _ => {
                return Err(ConfigError::PresetValue {
                    list: list.to_string(),
                    preset: label(),
                })
            }
        };

        let name = self.name.clone().unwrap_or_else(|| value.to_string());
        Ok(preset::Preset::new(&name, value))
    }
}

/// Builds a preset list out of its YAML representation.
pub fn to_list(name: &str, presets: &[Preset]) -> Result<PresetList, ConfigError> {
    let presets = presets
        .iter()
        .enumerate()
        .map(|(index, preset)| preset.to_preset(name, index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PresetList::new(name, presets)?)
}
