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
use std::fmt;

use crate::{
    lights::{EffectError, Lights},
    preset::{Preset, PresetList, Rgb, Value},
    shell,
};

/// A single side effect. Light commands go to the light backend; shell
/// commands run locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Toggle { entity_id: String },
    SetColorTemperature { entity_id: String, kelvin: u32 },
    SetColor { entity_id: String, rgb: Rgb },
    SetBrightness { entity_id: String, percent: u8 },
    Shell { command: String },
}

impl Command {
    /// Builds the command that applies a preset value to the given light.
    pub fn apply(entity_id: &str, value: Value) -> Command {
        let entity_id = entity_id.to_string();
        match value {
            Value::Kelvin(kelvin) => Command::SetColorTemperature { entity_id, kelvin },
            Value::Rgb(rgb) => Command::SetColor { entity_id, rgb },
            Value::Percent(percent) => Command::SetBrightness { entity_id, percent },
        }
    }

    /// Performs the command exactly once.
    pub async fn execute(&self, lights: &dyn Lights) -> Result<(), EffectError> {
        match self {
            Command::Toggle { entity_id } => lights.toggle(entity_id).await,
            Command::SetColorTemperature { entity_id, kelvin } => {
                lights.set_color_temperature(entity_id, *kelvin).await
            }
            Command::SetColor { entity_id, rgb } => lights.set_color(entity_id, *rgb).await,
            Command::SetBrightness { entity_id, percent } => {
                lights.set_brightness(entity_id, *percent).await
            }
            Command::Shell { command } => shell::run(command).await,
        }
    }

    /// The light this command targets, if any.
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            Command::Toggle { entity_id }
            | Command::SetColorTemperature { entity_id, .. }
            | Command::SetColor { entity_id, .. }
            | Command::SetBrightness { entity_id, .. } => Some(entity_id),
            Command::Shell { .. } => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Toggle { entity_id } => write!(f, "toggle {}", entity_id),
            Command::SetColorTemperature { entity_id, kelvin } => {
                write!(f, "set {} to {}", entity_id, Value::Kelvin(*kelvin))
            }
            Command::SetColor { entity_id, rgb } => {
                write!(f, "set {} to {}", entity_id, Value::Rgb(*rgb))
            }
            Command::SetBrightness { entity_id, percent } => {
                write!(f, "set {} to {} brightness", entity_id, Value::Percent(*percent))
            }
            Command::Shell { command } => write!(f, "run `{}`", command),
        }
    }
}

/// What a mapped control does when pressed.
#[derive(Debug, Clone)]
pub enum Action {
    /// Fires the same command on every press.
    Simple { command: Command },

    /// Applies the preset under the cursor to a light, then moves the cursor
    /// to the next preset, wrapping at the end of the list.
    Cycling {
        entity_id: String,
        presets: PresetList,
        cursor: usize,
    },
}

impl Action {
    /// Creates an action that always fires the given command.
    pub fn simple(command: Command) -> Action {
        Action::Simple { command }
    }

    /// Creates an action that cycles the given light through the presets,
    /// starting at the first one.
    pub fn cycling(entity_id: &str, presets: PresetList) -> Action {
        Action::Cycling {
            entity_id: entity_id.to_string(),
            presets,
            cursor: 0,
        }
    }

    /// Fires the action. A cycling action advances its cursor even when the
    /// command fails, so a broken preset can't stall the cycle.
    pub async fn trigger(&mut self, lights: &dyn Lights) -> Result<(), EffectError> {
        match self {
            Action::Simple { command } => command.execute(lights).await,
            Action::Cycling {
                entity_id,
                presets,
                cursor,
            } => {
                let command = Command::apply(entity_id, presets.at(*cursor).value());
                let result = command.execute(lights).await;
                *cursor = (*cursor + 1) % presets.len();
                result
            }
        }
    }

    /// Moves a cycling action back to its first preset. Does nothing for
    /// simple actions.
    pub fn reset(&mut self) {
        if let Action::Cycling { cursor, .. } = self {
            *cursor = 0;
        }
    }

    /// The position of the next preset to fire, for cycling actions.
    pub fn cursor(&self) -> Option<usize> {
        match self {
            Action::Simple { .. } => None,
            Action::Cycling { cursor, .. } => Some(*cursor),
        }
    }

    /// The preset the next trigger will fire, for cycling actions.
    pub fn current_preset(&self) -> Option<&Preset> {
        match self {
            Action::Simple { .. } => None,
            Action::Cycling {
                presets, cursor, ..
            } => Some(presets.at(*cursor)),
        }
    }

    /// The command the next trigger will fire.
    pub fn pending(&self) -> Command {
        match self {
            Action::Simple { command } => command.clone(),
            Action::Cycling {
                entity_id,
                presets,
                cursor,
            } => Command::apply(entity_id, presets.at(*cursor).value()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Simple { command } => write!(f, "{}", command),
            Action::Cycling {
                entity_id, presets, ..
            } => write!(
                f,
                "cycle {} through {} ({} {} presets)",
                entity_id,
                presets.name(),
                presets.len(),
                presets.kind()
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use super::{Action, Command};
    use crate::{
        lights::mock,
        preset::{self, Preset, PresetList, Value},
    };

    fn kelvin(entity_id: &str, kelvin: u32) -> Command {
        Command::SetColorTemperature {
            entity_id: entity_id.to_string(),
            kelvin,
        }
    }

    fn temperatures() -> PresetList {
        PresetList::new(
            "temperatures",
            [2200, 2700, 4000, 6500]
                .iter()
                .map(|k| Preset::new(&format!("{}K", k), Value::Kelvin(*k)))
                .collect(),
        )
        .expect("valid preset list")
    }

    #[tokio::test]
    async fn test_cycle_visits_every_preset_then_wraps() -> Result<(), Box<dyn Error>> {
        let lights = mock::Lights::new();
        let mut action = Action::cycling("light.lights", temperatures());

        for _ in 0..5 {
            action.trigger(&lights).await?;
        }

        assert_eq!(
            vec![
                kelvin("light.lights", 2200),
                kelvin("light.lights", 2700),
                kelvin("light.lights", 4000),
                kelvin("light.lights", 6500),
                kelvin("light.lights", 2200),
            ],
            lights.calls()
        );
        assert_eq!(Some(1), action.cursor());
        Ok(())
    }

    #[tokio::test]
    async fn test_reset() -> Result<(), Box<dyn Error>> {
        let lights = mock::Lights::new();
        let mut action = Action::cycling("light.lights", temperatures());

        action.trigger(&lights).await?;
        action.trigger(&lights).await?;
        assert_eq!(Some(2), action.cursor());
        assert_eq!(Some("4000K"), action.current_preset().map(|p| p.name()));

        action.reset();
        assert_eq!(Some(0), action.cursor());
        assert_eq!(kelvin("light.lights", 2200), action.pending());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_trigger_still_advances() {
        let lights = mock::Lights::new();
        lights.fail_call(0);
        let mut action = Action::cycling("light.lights", temperatures());

        assert!(action.trigger(&lights).await.is_err());
        assert_eq!(Some(1), action.cursor());
        assert!(action.trigger(&lights).await.is_ok());
        assert_eq!(
            vec![kelvin("light.lights", 2200), kelvin("light.lights", 2700)],
            lights.calls()
        );
    }

    #[tokio::test]
    async fn test_single_preset_stays_put() -> Result<(), Box<dyn Error>> {
        let lights = mock::Lights::new();
        let only = PresetList::new("only", vec![Preset::new("half", Value::Percent(50))])?;
        let mut action = Action::cycling("light.lights", only);

        for _ in 0..3 {
            action.trigger(&lights).await?;
            assert_eq!(Some(0), action.cursor());
        }
        assert_eq!(3, lights.calls().len());
        Ok(())
    }

    #[tokio::test]
    async fn test_simple_fires_its_command() -> Result<(), Box<dyn Error>> {
        let lights = mock::Lights::new();
        let toggle = Command::Toggle {
            entity_id: "light.lights".to_string(),
        };
        let mut action = Action::simple(toggle.clone());

        action.reset();
        action.trigger(&lights).await?;
        action.trigger(&lights).await?;

        assert_eq!(None, action.cursor());
        assert_eq!(vec![toggle.clone(), toggle], lights.calls());
        Ok(())
    }

    #[tokio::test]
    async fn test_simple_reports_failure() {
        let lights = mock::Lights::new();
        lights.fail_call(0);
        let mut action = Action::simple(Command::Toggle {
            entity_id: "light.lights".to_string(),
        });

        assert!(action.trigger(&lights).await.is_err());
    }

    #[test]
    fn test_apply_and_display() {
        assert_eq!(
            Command::SetColor {
                entity_id: "light.desk".to_string(),
                rgb: [255, 0, 0],
            },
            Command::apply("light.desk", Value::Rgb([255, 0, 0]))
        );
        assert_eq!(
            "set light.desk to 20% brightness",
            Command::apply("light.desk", Value::Percent(20)).to_string()
        );
        assert_eq!(
            "cycle light.lights through natural_light (5 color temperature presets)",
            Action::cycling("light.lights", preset::natural_light()).to_string()
        );
        assert_eq!(
            None,
            Command::Shell {
                command: "true".to_string()
            }
            .entity_id()
        );
    }
}
