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
use std::{collections::HashMap, path::Path};

use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;

use super::{
    error::ConfigError,
    homeassistant::HomeAssistant,
    mapping::Mapping,
    midi::Midi,
    preset::{self, Preset},
};
use crate::{
    mapping::{Mappings, DEFAULT_CYCLES},
    preset::Catalog,
};

/// Environment variables with this prefix override file settings, using `__`
/// between nested keys, e.g. `CCLIGHT_HOME_ASSISTANT__TOKEN`.
const ENV_PREFIX: &str = "CCLIGHT";

/// The configuration for cclight.
#[derive(Deserialize, Default)]
pub struct Settings {
    /// The Home Assistant connection.
    #[serde(default)]
    home_assistant: HomeAssistant,

    /// The MIDI input.
    #[serde(default)]
    midi: Midi,

    /// Preset lists in addition to the built-in ones.
    #[serde(default)]
    presets: HashMap<String, Vec<Preset>>,

    /// Control mappings. The stock layout is used when empty.
    #[serde(default)]
    mappings: Vec<Mapping>,
}

impl Settings {
    /// Deserializes the settings from a YAML file, applying environment overrides.
    pub fn deserialize(path: &Path) -> Result<Settings, ConfigError> {
        Settings::build(Config::builder().add_source(File::from(path)))
    }

    /// Deserializes the settings from a YAML string, applying environment overrides.
    pub fn from_yaml(yaml: &str) -> Result<Settings, ConfigError> {
        Settings::build(Config::builder().add_source(File::from_str(yaml, FileFormat::Yaml)))
    }

    fn build(
        builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Settings, ConfigError> {
        let mut settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.home_assistant.expand_env();
        settings.midi.expand_env();
        settings
            .mappings
            .iter_mut()
            .for_each(|mapping| mapping.expand_env());
        Ok(settings)
    }

    /// Returns the Home Assistant connection settings.
    pub fn home_assistant(&self) -> &HomeAssistant {
        &self.home_assistant
    }

    /// Returns the MIDI input settings.
    pub fn midi(&self) -> &Midi {
        &self.midi
    }

    /// Builds the preset catalog. Configured lists replace built-in lists of
    /// the same name.
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        let mut catalog = Catalog::builtin();
        for (name, presets) in &self.presets {
            catalog.insert(preset::to_list(name, presets)?);
        }
        Ok(catalog)
    }

    /// Builds the mapping table. Every configured preset list is validated,
    /// whether or not a mapping refers to it.
    pub fn mappings(&self) -> Result<Mappings, ConfigError> {
        let entity_id = self.home_assistant.entity_id();
        let catalog = self.catalog()?;

        if self.mappings.is_empty() {
            for (control, name, expected) in DEFAULT_CYCLES {
                if let Some(list) = catalog.get(name) {
                    if list.kind() != expected {
                        return Err(ConfigError::PresetKind {
                            control,
                            list: name.to_string(),
                            expected,
                            found: list.kind(),
                        });
                    }
                }
            }
            return Ok(Mappings::defaults(entity_id, &catalog));
        }

        let mut actions = Vec::with_capacity(self.mappings.len());
        for mapping in &self.mappings {
            let control = mapping.control()?;
            if actions.iter().any(|(existing, _)| *existing == control) {
                return Err(ConfigError::DuplicateControl(control));
            }
            actions.push((control, mapping.to_action(entity_id, &catalog)?));
        }
        Ok(Mappings::build(actions))
    }
}
