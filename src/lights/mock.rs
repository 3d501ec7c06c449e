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
use std::{collections::HashSet, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::EffectError;
use crate::{action::Command, preset::Rgb};

/// The timeout reported by calls that have been told to fail.
const SIMULATED_TIMEOUT: Duration = Duration::from_secs(5);

/// A mock light backend. Records every call as the equivalent command and
/// can be told to fail specific calls.
#[derive(Default)]
pub struct Lights {
    calls: Mutex<Vec<Command>>,
    failing: Mutex<HashSet<usize>>,
}

impl Lights {
    /// Creates a new mock backend that accepts every call.
    pub fn new() -> Lights {
        Lights::default()
    }

    /// Makes the call with the given zero-based index fail with a timeout.
    pub fn fail_call(&self, index: usize) {
        self.failing.lock().insert(index);
    }

    /// Gets every call made so far, in order.
    pub fn calls(&self) -> Vec<Command> {
        self.calls.lock().clone()
    }

    fn record(&self, command: Command) -> Result<(), EffectError> {
        let mut calls = self.calls.lock();
        let index = calls.len();
        calls.push(command);

        if self.failing.lock().contains(&index) {
            return Err(EffectError::Timeout(SIMULATED_TIMEOUT));
        }
        Ok(())
    }
}

#[async_trait]
impl super::Lights for Lights {
    async fn toggle(&self, entity_id: &str) -> Result<(), EffectError> {
        self.record(Command::Toggle {
            entity_id: entity_id.to_string(),
        })
    }

    async fn set_color_temperature(
        &self,
        entity_id: &str,
        kelvin: u32,
    ) -> Result<(), EffectError> {
        self.record(Command::SetColorTemperature {
            entity_id: entity_id.to_string(),
            kelvin,
        })
    }

    async fn set_color(&self, entity_id: &str, rgb: Rgb) -> Result<(), EffectError> {
        self.record(Command::SetColor {
            entity_id: entity_id.to_string(),
            rgb,
        })
    }

    async fn set_brightness(&self, entity_id: &str, percent: u8) -> Result<(), EffectError> {
        self.record(Command::SetBrightness {
            entity_id: entity_id.to_string(),
            percent,
        })
    }
}
