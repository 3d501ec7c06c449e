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
use std::sync::Arc;

use tracing::{error, info, trace};

use crate::{lights::Lights, mapping::Mappings, midi::ControlChange};

/// What happened to a dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The control isn't mapped. Nothing fired and no state changed.
    Ignored,
    /// The mapped action fired successfully.
    Fired,
    /// The mapped action fired but its command failed. The failure has been
    /// logged and state moved on as if it had succeeded.
    Failed,
}

/// Routes control changes to their actions. Remembers the last control that
/// fired so that a cycling action starts over whenever a different control
/// was pressed in between.
pub struct Dispatcher {
    mappings: Mappings,
    lights: Arc<dyn Lights>,
    last_control: Option<u8>,
}

impl Dispatcher {
    /// Creates a new dispatcher. No control has fired yet.
    pub fn new(mappings: Mappings, lights: Arc<dyn Lights>) -> Dispatcher {
        Dispatcher {
            mappings,
            lights,
            last_control: None,
        }
    }

    /// The last control that was dispatched to an action.
    pub fn last_control(&self) -> Option<u8> {
        self.last_control
    }

    pub fn mappings(&self) -> &Mappings {
        &self.mappings
    }

    /// Dispatches a single event to completion. Command failures are logged
    /// here and never returned to the caller.
    pub async fn dispatch(&mut self, event: ControlChange) -> Outcome {
        let control = event.control;
        let action = match self.mappings.lookup_mut(control) {
            Some(action) => action,
            None => {
                trace!(control, "No mapping for control.");
                return Outcome::Ignored;
            }
        };

        if self.last_control.is_some_and(|last| last != control) {
            action.reset();
        }

        let command = action.pending();
        let preset = action
            .current_preset()
            .map(|preset| preset.name().to_string());
        let result = action.trigger(self.lights.as_ref()).await;
        self.last_control = Some(control);

        match result {
            Ok(()) => {
                info!(control, preset, command = %command, "Fired action.");
                Outcome::Fired
            }
            Err(e) => {
                error!(
                    control,
                    entity_id = command.entity_id(),
                    command = %command,
                    err = e.to_string(),
                    "Action failed."
                );
                Outcome::Failed
            }
        }
    }
}
