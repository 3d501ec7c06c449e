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
use std::time::Duration;

use duration_string::DurationString;
use serde::Deserialize;

use super::{error::ConfigError, expand_env};

const DEFAULT_ENTITY_ID: &str = "light.lights";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A YAML representation of the Home Assistant connection.
#[derive(Deserialize, Clone, Default)]
pub struct HomeAssistant {
    /// The base URL of the Home Assistant instance.
    #[serde(default)]
    url: String,

    /// A long-lived access token.
    #[serde(default)]
    token: String,

    /// The light that mappings target unless they name their own.
    entity_id: Option<String>,

    /// How long to wait for each request.
    timeout: Option<String>,
}

impl HomeAssistant {
    /// New will create a new Home Assistant configuration.
    pub fn new(url: &str, token: &str) -> HomeAssistant {
        HomeAssistant {
            url: url.to_string(),
            token: token.to_string(),
            entity_id: None,
            timeout: None,
        }
    }

    /// Returns the base URL without any trailing slash.
    pub fn url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Returns the access token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the default target light.
    pub fn entity_id(&self) -> &str {
        self.entity_id.as_deref().unwrap_or(DEFAULT_ENTITY_ID)
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        match &self.timeout {
            Some(timeout) => Ok(DurationString::from_string(timeout.clone())
                .map_err(|e| ConfigError::Duration {
                    value: timeout.clone(),
                    reason: e.to_string(),
                })?
                .into()),
            None => Ok(DEFAULT_TIMEOUT),
        }
    }

    /// Makes sure there is enough here to talk to Home Assistant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url().trim().is_empty() {
            return Err(ConfigError::MissingCredential("url"));
        }
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingCredential("token"));
        }
        self.timeout()?;
        Ok(())
    }

    pub(super) fn expand_env(&mut self) {
        self.url = expand_env(&self.url);
        self.token = expand_env(&self.token);
        self.entity_id = self.entity_id.as_deref().map(expand_env);
    }
}
