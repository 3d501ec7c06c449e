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
use std::{error::Error, fmt, sync::Arc};

use midly::{live::LiveEvent, MidiMessage};
use tokio::sync::mpsc::Sender;
use tracing::debug;

mod midir;
pub mod mock;

/// The default MIDI channel to listen on, zero-based.
pub const DEFAULT_CHANNEL: u8 = 0;

/// Auto-detection picks the first input port whose name contains this.
pub const DEFAULT_DEVICE: &str = "Quad Cortex";

/// A MIDI device that can be listened to.
pub trait Device: fmt::Display + std::marker::Send + std::marker::Sync {
    /// Returns the name of the device.
    fn name(&self) -> String;

    /// Watches MIDI input for events and sends the raw bytes to the given sender.
    fn watch_events(&self, sender: Sender<Vec<u8>>) -> Result<(), Box<dyn Error>>;

    /// Stops watching events.
    fn stop_watch_events(&self);
}

/// How to pick the input port to listen on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Port {
    /// The port at this position in the port listing.
    Index(usize),
    /// The only port whose name contains this string.
    Name(String),
    /// The first port named like the default device, else the only port
    /// available.
    Auto,
}

/// A control change, normalized from raw MIDI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlChange {
    /// The zero-based channel the message arrived on.
    pub channel: u8,
    /// The controller number, 0-127.
    pub control: u8,
    /// The controller value, 0-127.
    pub value: u8,
}

impl fmt::Display for ControlChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CC ch={} cc={} val={}",
            self.channel, self.control, self.value
        )
    }
}

/// Decodes raw MIDI bytes into a control change on the given channel. Other
/// message types, other channels and malformed input all yield None.
pub fn decode(raw: &[u8], channel: u8) -> Option<ControlChange> {
    let event = match LiveEvent::parse(raw) {
        Ok(event) => event,
        Err(e) => {
            debug!(err = format!("{:?}", e), raw = ?raw, "Dropping unparseable MIDI.");
            return None;
        }
    };

    match event {
        LiveEvent::Midi {
            channel: event_channel,
            message: MidiMessage::Controller { controller, value },
        } if event_channel.as_int() == channel => Some(ControlChange {
            channel,
            control: controller.as_int(),
            value: value.as_int(),
        }),
        _ => {
            debug!(event = format!("{:?}", event), "Dropping MIDI event.");
            None
        }
    }
}

/// Lists input devices known to midir.
pub fn list_devices() -> Result<Vec<Box<dyn Device>>, Box<dyn Error>> {
    midir::list()
}

/// Gets the device for the given port. Port names starting with "mock" give a
/// mock device.
pub fn get_device(port: &Port) -> Result<Arc<dyn Device>, Box<dyn Error>> {
    if let Port::Name(name) = port {
        if name.starts_with("mock") {
            return Ok(Arc::new(mock::Device::get(name)));
        }
    }

    Ok(Arc::new(midir::get(port)?))
}
