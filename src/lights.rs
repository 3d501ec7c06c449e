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
use std::{io, time::Duration};

use async_trait::async_trait;

use crate::preset::Rgb;

pub mod homeassistant;
pub mod mock;

/// Reasons a light or shell command failed. None of these are fatal; the
/// dispatcher logs them and moves on to the next event.
#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unexpected response {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Command `{command}` exited with {code:?}: {stderr}")]
    Shell {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// The light primitives that actions drive. Each call is idempotent from the
/// point of view of the caller and reports success or a failure reason.
#[async_trait]
pub trait Lights: Send + Sync {
    /// Toggles the given light.
    async fn toggle(&self, entity_id: &str) -> Result<(), EffectError>;

    /// Sets the color temperature of the given light, in Kelvin.
    async fn set_color_temperature(&self, entity_id: &str, kelvin: u32)
        -> Result<(), EffectError>;

    /// Sets the RGB color of the given light.
    async fn set_color(&self, entity_id: &str, rgb: Rgb) -> Result<(), EffectError>;

    /// Sets the brightness of the given light as a percentage.
    async fn set_brightness(&self, entity_id: &str, percent: u8) -> Result<(), EffectError>;
}
