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
use crate::preset::{Kind, PresetError};

/// Typed error for config load/parse failures so callers can distinguish
/// e.g. file-not-found from a bad mapping without string matching.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config load/parse error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid duration '{value}': {reason}")]
    Duration { value: String, reason: String },

    #[error("Home Assistant {0} is not configured")]
    MissingCredential(&'static str),

    #[error("MIDI channel {0} is out of range (0-15)")]
    Channel(u8),

    #[error(transparent)]
    Preset(#[from] PresetError),

    #[error("Preset '{preset}' in list '{list}' must set exactly one of kelvin, rgb (three values) or percent")]
    PresetValue { list: String, preset: String },

    #[error("Preset '{preset}' in list '{list}' has brightness {percent}%, above 100%")]
    Percent {
        list: String,
        preset: String,
        percent: u8,
    },

    #[error("Control {0} is out of range (0-127)")]
    Control(u8),

    #[error("Control {0} is mapped more than once")]
    DuplicateControl(u8),

    #[error("Mapping for control {control} is missing '{field}'")]
    MissingField { control: u8, field: &'static str },

    #[error("Mapping for control {control} refers to unknown preset list '{list}'")]
    UnknownPresets { control: u8, list: String },

    #[error("Mapping for control {control} needs {expected} presets, but '{list}' holds {found} presets")]
    PresetKind {
        control: u8,
        list: String,
        expected: Kind,
        found: Kind,
    },
}
