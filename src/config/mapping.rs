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
use crate::{
    action::{Action, Command},
    preset::{Catalog, Kind},
};

/// The kinds of actions a control can be bound to.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Toggle,
    ColorTemperature,
    Color,
    Brightness,
    Shell,
}

impl ActionKind {
    /// The kind of preset list this action cycles through, if any.
    fn preset_kind(&self) -> Option<Kind> {
        match self {
            ActionKind::ColorTemperature => Some(Kind::ColorTemperature),
            ActionKind::Color => Some(Kind::Color),
            ActionKind::Brightness => Some(Kind::Brightness),
            ActionKind::Toggle | ActionKind::Shell => None,
        }
    }
}

/// A YAML representation of a control mapping.
#[derive(Deserialize, Clone)]
pub struct Mapping {
    /// The control change number.
    control: u8,

    /// What the control does.
    action: ActionKind,

    /// The preset list to cycle through.
    presets: Option<String>,

    /// The light to target. Defaults to the Home Assistant entity.
    entity_id: Option<String>,

    /// Whether presses step through the list or always fire the first preset.
    cycle: Option<bool>,

    /// The shell command to run.
    command: Option<String>,
}

impl Mapping {
    /// Returns the control change number.
    pub fn control(&self) -> Result<u8, ConfigError> {
        if self.control > 127 {
            return Err(ConfigError::Control(self.control));
        }
        Ok(self.control)
    }

    /// Builds the action for this mapping.
    pub fn to_action(
        &self,
        default_entity_id: &str,
        catalog: &Catalog,
    ) -> Result<Action, ConfigError> {
        let control = self.control()?;
        let entity_id = self.entity_id.as_deref().unwrap_or(default_entity_id);

        match self.action {
            ActionKind::Toggle => Ok(Action::simple(Command::Toggle {
                entity_id: entity_id.to_string(),
            })),
            ActionKind::Shell => match self.command.as_deref() {
                Some(command) if !command.trim().is_empty() => Ok(Action::simple(Command::Shell {
                    command: command.to_string(),
                })),
                _ => Err(ConfigError::MissingField {
                    control,
                    field: "command",
                }),
            },
            ActionKind::ColorTemperature | ActionKind::Color | ActionKind::Brightness => {
                let name = self.presets.as_deref().ok_or(ConfigError::MissingField {
                    control,
                    field: "presets",
                })?;
                let list = catalog.get(name).ok_or_else(|| ConfigError::UnknownPresets {
                    control,
                    list: name.to_string(),
                })?;

                if let Some(expected) = self.action.preset_kind() {
                    if list.kind() != expected {
                        return Err(ConfigError::PresetKind {
                            control,
                            list: name.to_string(),
                            expected,
                            found: list.kind(),
                        });
                    }
                }

                if self.cycle.unwrap_or(true) {
                    Ok(Action::cycling(entity_id, list.clone()))
                } else {
                    Ok(Action::simple(Command::apply(entity_id, list.first().value())))
                }
            }
        }
    }

    pub(super) fn expand_env(&mut self) {
        self.entity_id = self.entity_id.as_deref().map(expand_env);
        self.command = self.command.as_deref().map(expand_env);
    }
}
