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
use std::{collections::BTreeMap, fmt, iter};

use crate::{
    action::{Action, Command},
    preset::{Catalog, Kind, BRIGHTNESS_NAME, NATURAL_LIGHT_NAME, WARM_COLORS_NAME},
};

/// The cycling controls of the stock layout, with the list each one steps
/// through and the kind of presets that list must hold.
pub const DEFAULT_CYCLES: [(u8, &str, Kind); 3] = [
    (1, NATURAL_LIGHT_NAME, Kind::ColorTemperature),
    (2, WARM_COLORS_NAME, Kind::Color),
    (3, BRIGHTNESS_NAME, Kind::Brightness),
];

/// The mapping from CC numbers to actions. Entries are fixed once built; the
/// actions themselves keep their own cycle positions.
#[derive(Debug, Clone, Default)]
pub struct Mappings {
    actions: BTreeMap<u8, Action>,
}

impl Mappings {
    /// Builds the mapping table from (control, action) pairs. A later pair for
    /// the same control replaces an earlier one; configuration loading rejects
    /// duplicates before they get here.
    pub fn build<I>(actions: I) -> Mappings
    where
        I: IntoIterator<Item = (u8, Action)>,
    {
        Mappings {
            actions: actions.into_iter().collect(),
        }
    }

    /// The stock layout for a four-switch controller, all targeting one light:
    /// CC0 toggles, CC1 cycles color temperature, CC2 cycles warm colors and
    /// CC3 cycles brightness. The lists come from the catalog, so configured
    /// lists under the built-in names take their place.
    pub fn defaults(entity_id: &str, catalog: &Catalog) -> Mappings {
        let toggle = Action::simple(Command::Toggle {
            entity_id: entity_id.to_string(),
        });
        let cycles = DEFAULT_CYCLES.iter().filter_map(|(control, name, _)| {
            catalog
                .get(name)
                .map(|list| (*control, Action::cycling(entity_id, list.clone())))
        });
        Mappings::build(iter::once((0, toggle)).chain(cycles))
    }

    /// Gets the action mapped to the given control.
    pub fn lookup(&self, control: u8) -> Option<&Action> {
        self.actions.get(&control)
    }

    /// Gets the action mapped to the given control for triggering.
    pub(crate) fn lookup_mut(&mut self, control: u8) -> Option<&mut Action> {
        self.actions.get_mut(&control)
    }

    /// Iterates over the mappings in control order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Action)> {
        self.actions.iter().map(|(control, action)| (*control, action))
    }

    /// Whether any mapped action talks to a light.
    pub fn uses_lights(&self) -> bool {
        self.iter()
            .any(|(_, action)| action.pending().entity_id().is_some())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Display for Mappings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (control, action) in self.iter() {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "- CC{}: {}", control, action)?;
        }
        Ok(())
    }
}
