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
use std::{env, error::Error, path::Path, sync::Arc};

use tracing::info;

use crate::{controller::Controller, dispatch::Dispatcher, lights};

pub use self::error::ConfigError;
pub use self::settings::Settings;

pub mod error;
pub mod homeassistant;
pub mod mapping;
pub mod midi;
pub mod preset;
pub mod settings;

/// Replaces `${VAR}` references with the value of the environment variable.
/// Unset variables expand to the empty string.
pub(crate) fn expand_env(value: &str) -> String {
    let mut expanded = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        expanded.push_str(&rest[..start]);
        let reference = &rest[start + 2..];
        match reference.find('}') {
            Some(end) => {
                expanded.push_str(&env::var(&reference[..end]).unwrap_or_default());
                rest = &reference[end + 1..];
            }
            None => {
                expanded.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    expanded.push_str(rest);
    expanded
}

/// Initializes the controller from the given config file. An explicit port
/// index takes precedence over the configured device name.
pub fn init_controller(
    config_path: &Path,
    port_index: Option<usize>,
) -> Result<Controller, Box<dyn Error>> {
    let settings = Settings::deserialize(config_path)?;
    let mappings = settings.mappings()?;
    let channel = settings.midi().channel()?;

    let home_assistant = settings.home_assistant();
    if mappings.uses_lights() {
        home_assistant.validate()?;
    }
    let client = lights::homeassistant::Client::new(
        home_assistant.url(),
        home_assistant.token(),
        home_assistant.timeout()?,
    )?;
    info!(lights = %client, "Using light backend.");

    let device = crate::midi::get_device(&settings.midi().port(port_index))?;
    Controller::new(
        device,
        Dispatcher::new(mappings, Arc::new(client)),
        channel,
    )
}
