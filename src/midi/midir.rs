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
use std::{error::Error, fmt, mem};

use midir::{MidiInput, MidiInputConnection, MidiInputPort};
use parking_lot::Mutex;
use tokio::sync::mpsc::Sender;
use tracing::{error, info, span, trace, Level};

use super::{Port, DEFAULT_DEVICE};

/// A MIDI input port reached through midir.
pub struct Device {
    name: String,
    index: usize,
    input_port: MidiInputPort,
    event_connection: Mutex<Option<MidiInputConnection<()>>>,
}

impl super::Device for Device {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn watch_events(&self, sender: Sender<Vec<u8>>) -> Result<(), Box<dyn Error>> {
        let span = span!(Level::INFO, "watch events (midir)");
        let _enter = span.enter();

        let mut event_connection = self.event_connection.lock();
        if event_connection.is_some() {
            return Err("Already watching events.".into());
        }

        info!(device = self.name, "Watching MIDI events.");

        let input = MidiInput::new("cclight input")?;
        *event_connection = Some(input.connect(
            &self.input_port,
            "cclight input watcher",
            move |_, raw_event, _| {
                trace!(raw = ?raw_event, "Received MIDI bytes.");
                if let Err(e) = sender.blocking_send(Vec::from(raw_event)) {
                    error!(
                        err = format!("{:?}", e),
                        "Error sending MIDI event to receiver."
                    );
                }
            },
            (),
        )?);

        Ok(())
    }

    fn stop_watch_events(&self) {
        // Dropping the connection closes the port and the sender it owns.
        let event_connection = self.event_connection.lock().take();
        mem::drop(event_connection);
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.index, self.name)
    }
}

/// Lists midir input devices and produces the Device trait.
pub fn list() -> Result<Vec<Box<dyn super::Device>>, Box<dyn Error>> {
    Ok(list_midir_devices()?
        .into_iter()
        .map(|device| {
            let device: Box<dyn super::Device> = Box::new(device);
            device
        })
        .collect())
}

/// Lists midir input devices in port order.
fn list_midir_devices() -> Result<Vec<Device>, Box<dyn Error>> {
    let input = MidiInput::new("cclight input listing")?;

    input
        .ports()
        .into_iter()
        .enumerate()
        .map(|(index, port)| -> Result<Device, Box<dyn Error>> {
            Ok(Device {
                name: input.port_name(&port)?,
                index,
                input_port: port,
                event_connection: Mutex::new(None),
            })
        })
        .collect()
}

/// Gets the midir device for the given port.
pub fn get(port: &Port) -> Result<Device, Box<dyn Error>> {
    let mut devices = list_midir_devices()?;
    let names = devices
        .iter()
        .map(|device| device.name.clone())
        .collect::<Vec<String>>();

    let index = select(&names, port)?;
    Ok(devices.swap_remove(index))
}

/// Picks a port out of the listed port names. Auto-detection takes the first
/// port named like the default device, and otherwise the only port there is.
fn select(names: &[String], port: &Port) -> Result<usize, Box<dyn Error>> {
    let matching = |needle: &str| {
        names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.contains(needle))
            .map(|(index, _)| index)
            .collect::<Vec<usize>>()
    };

    let candidates = match port {
        Port::Index(index) => {
            if *index >= names.len() {
                return Err(format!(
                    "no MIDI input port at index {} ({} available)",
                    index,
                    names.len()
                )
                .into());
            }
            vec![*index]
        }
        Port::Name(name) => matching(name),
        Port::Auto => match matching(DEFAULT_DEVICE).first() {
            Some(index) => vec![*index],
            None => (0..names.len()).collect(),
        },
    };

    match candidates.as_slice() {
        [] => Err(match port {
            Port::Name(name) => format!("no MIDI input port found with name {}", name),
            _ => "no MIDI input ports found".to_string(),
        }
        .into()),
        [index] => Ok(*index),
        _ => Err(format!(
            "found too many MIDI input ports ({}), pick one by name or index",
            candidates
                .iter()
                .map(|index| names[*index].as_str())
                .collect::<Vec<&str>>()
                .join(", ")
        )
        .into()),
    }
}
