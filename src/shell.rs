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

use tokio::process::Command;
use tracing::info;

use crate::lights::EffectError;

/// Commands that run longer than this are killed and reported as failed.
const SHELL_TIMEOUT: Duration = Duration::from_secs(10);

/// At most this many lines of a command's output are logged.
const MAX_OUTPUT_LINES: usize = 3;

/// Runs the given command through `sh -c`.
pub async fn run(command: &str) -> Result<(), EffectError> {
    run_with_timeout(command, SHELL_TIMEOUT).await
}

async fn run_with_timeout(command: &str, timeout: Duration) -> Result<(), EffectError> {
    let output = tokio::time::timeout(
        timeout,
        Command::new("sh")
            .arg("-c")
            .arg(command)
            .kill_on_drop(true)
            .output(),
    )
    .await
    .map_err(|_| EffectError::Timeout(timeout))??;

    if !output.status.success() {
        return Err(EffectError::Shell {
            command: command.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.trim().lines().take(MAX_OUTPUT_LINES) {
        info!(command, output = line, "Command output.");
    }

    Ok(())
}
