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
use std::error::Error;
use std::path::PathBuf;

use cclight::config::{self, Settings};
use cclight::midi;
use clap::{crate_version, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "cclight.yaml";

const SYSTEMD_SERVICE: &str = r#"
[Unit]
Description=MIDI foot controller for smart lights
After=network-online.target sound.target

[Service]
Type=simple
Restart=on-failure
EnvironmentFile=-/etc/default/cclight
ExecStart=/usr/local/bin/cclight start --config "$CCLIGHT_CONFIG"

[Install]
WantedBy=multi-user.target
Alias=cclight.service
"#;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Drives smart lights from a MIDI foot controller."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start will listen for control changes and drive the lights.
    Start {
        /// The path to the config file.
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
        /// The index of the MIDI input port to listen on, as shown by midi-devices.
        port_index: Option<usize>,
    },
    /// Lists the available MIDI input devices.
    MidiDevices {},
    /// Prints the control mappings resolved from the config file.
    Mappings {
        /// The path to the config file.
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
    /// Prints the built-in and configured preset lists.
    Presets {
        /// The path to the config file.
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
    /// Prints a systemd service definition to stdout.
    Systemd {},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            config: config_path,
            port_index,
        } => {
            config::init_controller(&config_path, port_index)?
                .join()
                .await?;
        }
        Commands::MidiDevices {} => {
            let devices = midi::list_devices()?;

            if devices.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for device in devices {
                println!("- {}", device);
            }
        }
        Commands::Mappings { config } => {
            let mappings = Settings::deserialize(&config)?.mappings()?;

            println!("Mappings:");
            println!("{}", mappings);
        }
        Commands::Presets { config } => {
            let catalog = Settings::deserialize(&config)?.catalog()?;

            println!("Presets:");
            for list in catalog.iter() {
                println!("- {}", list);
            }
        }
        Commands::Systemd {} => {
            println!("{}", SYSTEMD_SERVICE)
        }
    }

    Ok(())
}
