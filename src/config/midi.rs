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

use super::{error::ConfigError, expand_env};
use crate::midi::{Port, DEFAULT_CHANNEL};

/// A YAML representation of the MIDI input configuration.
#[derive(Deserialize, Clone, Default)]
pub struct Midi {
    /// Part of the name of the input port to listen on.
    device: Option<String>,

    /// The zero-based channel to listen on.
    channel: Option<u8>,
}

impl Midi {
    /// New will create a new MIDI configuration.
    pub fn new(device: Option<&str>, channel: Option<u8>) -> Midi {
        Midi {
            device: device.map(|device| device.to_string()),
            channel,
        }
    }

    /// Returns the device from the configuration.
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    /// Returns the channel to listen on.
    pub fn channel(&self) -> Result<u8, ConfigError> {
        match self.channel {
            Some(channel) if channel > 15 => Err(ConfigError::Channel(channel)),
            Some(channel) => Ok(channel),
            None => Ok(DEFAULT_CHANNEL),
        }
    }

    /// Picks the input port. An explicit index wins over the configured
    /// device name; with neither, the port is auto-detected.
    pub fn port(&self, index: Option<usize>) -> Port {
        match (index, self.device()) {
            (Some(index), _) => Port::Index(index),
            (None, Some(device)) => Port::Name(device.to_string()),
            (None, None) => Port::Auto,
        }
    }

    pub(super) fn expand_env(&mut self) {
        self.device = self.device.as_deref().map(expand_env);
    }
}
