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
use std::{error::Error, sync::Arc};

use tokio::{
    sync::mpsc::{self, Receiver},
    task::{JoinError, JoinHandle},
};
use tracing::{info, span, warn, Instrument, Level};

use crate::{dispatch::Dispatcher, midi};

/// How many raw MIDI events can queue up while an action is running.
const EVENT_BUFFER: usize = 32;

/// Listens to a MIDI device and feeds its control changes, one at a time and
/// in arrival order, into a dispatcher.
pub struct Controller {
    handle: JoinHandle<()>,
}

impl Controller {
    /// Starts watching the device. Fails if the device can't be watched.
    pub fn new(
        device: Arc<dyn midi::Device>,
        dispatcher: Dispatcher,
        channel: u8,
    ) -> Result<Controller, Box<dyn Error>> {
        let (events_tx, events_rx) = mpsc::channel::<Vec<u8>>(EVENT_BUFFER);
        device.watch_events(events_tx)?;

        info!(
            device = device.name(),
            channel,
            mappings = dispatcher.mappings().len(),
            "Controller started."
        );

        Ok(Controller {
            handle: tokio::spawn(
                Controller::dispatch_events(device, dispatcher, events_rx, channel)
                    .instrument(span!(Level::INFO, "controller")),
            ),
        })
    }

    /// Join will block until the controller finishes, which only happens once
    /// the device stops sending events.
    pub async fn join(&mut self) -> Result<(), JoinError> {
        (&mut self.handle).await
    }

    /// Decodes and dispatches events until the device goes away.
    async fn dispatch_events(
        device: Arc<dyn midi::Device>,
        mut dispatcher: Dispatcher,
        mut events_rx: Receiver<Vec<u8>>,
        channel: u8,
    ) {
        while let Some(raw_event) = events_rx.recv().await {
            if let Some(event) = midi::decode(&raw_event, channel) {
                info!(event = %event, "Received control change.");
                dispatcher.dispatch(event).await;
            }
        }

        warn!(device = device.name(), "MIDI watcher closed.");
        device.stop_watch_events();
    }
}

#[cfg(test)]
mod test {
    use std::{error::Error, sync::Arc};

    use midly::{num::u7, MidiMessage};

    use super::Controller;
    use crate::{
        action::{Action, Command},
        dispatch::Dispatcher,
        lights::mock,
        mapping::Mappings,
        midi::{self, test::control_change, Device as _},
        preset::{Catalog, Preset, PresetList, Value},
        testutil::eventually,
    };

    #[tokio::test(flavor = "multi_thread")]
    async fn test_controller() -> Result<(), Box<dyn Error>> {
        let lights = Arc::new(mock::Lights::new());
        let temperatures = PresetList::new(
            "temperatures",
            [2200, 2700, 4000, 6500]
                .iter()
                .map(|k| Preset::new(&format!("{}K", k), Value::Kelvin(*k)))
                .collect(),
        )?;
        let toggle = Command::Toggle {
            entity_id: "light.lights".to_string(),
        };
        let mappings = Mappings::build([
            (1, Action::cycling("light.lights", temperatures)),
            (2, Action::simple(toggle.clone())),
        ]);

        let device = Arc::new(midi::mock::Device::get("mock-device"));
        let mut controller = Controller::new(
            device.clone(),
            Dispatcher::new(mappings, lights.clone()),
            0,
        )?;

        let note_on = midi::test::encode(
            0,
            MidiMessage::NoteOn {
                key: u7::from(60),
                vel: u7::from(100),
            },
        );

        // Everything other than control changes on channel 0 should be ignored.
        assert!(device.mock_event(&note_on));
        assert!(device.mock_event(&control_change(3, 1, 127)));
        assert!(device.mock_event(&[1, 2, 3, 4]));
        assert!(device.mock_event(&control_change(0, 1, 127)));
        assert!(device.mock_event(&control_change(0, 1, 127)));
        assert!(device.mock_event(&control_change(0, 99, 127)));
        assert!(device.mock_event(&control_change(0, 2, 0)));
        assert!(device.mock_event(&control_change(0, 1, 127)));

        eventually(|| lights.calls().len() >= 4, "Lights never got four calls");

        let kelvin = |kelvin| Command::SetColorTemperature {
            entity_id: "light.lights".to_string(),
            kelvin,
        };
        assert_eq!(
            vec![kelvin(2200), kelvin(2700), toggle, kelvin(2200)],
            lights.calls()
        );

        device.stop_watch_events();
        assert!(
            controller.join().await.is_ok(),
            "Error waiting for controller"
        );
        assert!(!device.is_watched());

        Ok(())
    }

    #[tokio::test]
    async fn test_device_already_watched() -> Result<(), Box<dyn Error>> {
        let device = Arc::new(midi::mock::Device::get("mock-device"));
        let dispatcher = || {
            Dispatcher::new(
                Mappings::defaults("light.lights", &Catalog::builtin()),
                Arc::new(mock::Lights::new()),
            )
        };

        let _controller = Controller::new(device.clone(), dispatcher(), 0)?;
        assert!(Controller::new(device, dispatcher(), 0).is_err());
        Ok(())
    }
}
