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
use std::{collections::BTreeMap, fmt, sync::Arc};

/// An RGB color triple.
pub type Rgb = [u8; 3];

/// The payload carried by a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// A color temperature in Kelvin.
    Kelvin(u32),
    /// An RGB color.
    Rgb(Rgb),
    /// A brightness percentage, 0-100.
    Percent(u8),
}

impl Value {
    /// Returns the kind of light setting this value describes.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Kelvin(_) => Kind::ColorTemperature,
            Value::Rgb(_) => Kind::Color,
            Value::Percent(_) => Kind::Brightness,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Kelvin(kelvin) => write!(f, "{}K", kelvin),
            Value::Rgb([r, g, b]) => write!(f, "rgb({}, {}, {})", r, g, b),
            Value::Percent(percent) => write!(f, "{}%", percent),
        }
    }
}

/// The kinds of values a preset list can hold. A list never mixes kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    ColorTemperature,
    Color,
    Brightness,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::ColorTemperature => "color temperature",
            Kind::Color => "color",
            Kind::Brightness => "brightness",
        })
    }
}

/// A named, immutable light setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    name: String,
    value: Value,
}

impl Preset {
    /// Creates a new preset.
    pub fn new(name: &str, value: Value) -> Preset {
        Preset {
            name: name.to_string(),
            value,
        }
    }

    /// Gets the name of the preset.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the value of the preset.
    pub fn value(&self) -> Value {
        self.value
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.value)
    }
}

/// Errors raised while assembling preset lists.
#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("Preset list '{0}' is empty")]
    Empty(String),

    #[error("Preset list '{list}' holds {expected} presets, but '{preset}' is a {found} preset")]
    MixedKinds {
        list: String,
        preset: String,
        expected: Kind,
        found: Kind,
    },
}

/// An ordered, non-empty list of presets of a single kind. Cloning is cheap and
/// clones share the underlying presets.
#[derive(Debug, Clone)]
pub struct PresetList {
    name: String,
    kind: Kind,
    presets: Arc<[Preset]>,
}

impl PresetList {
    /// Creates a new preset list. Fails if the list is empty or mixes kinds.
    pub fn new(name: &str, presets: Vec<Preset>) -> Result<PresetList, PresetError> {
        let kind = match presets.first() {
            Some(first) => first.value.kind(),
            None => return Err(PresetError::Empty(name.to_string())),
        };

        if let Some(mismatch) = presets.iter().find(|preset| preset.value.kind() != kind) {
            return Err(PresetError::MixedKinds {
                list: name.to_string(),
                preset: mismatch.name.clone(),
                expected: kind,
                found: mismatch.value.kind(),
            });
        }

        Ok(PresetList {
            name: name.to_string(),
            kind,
            presets: presets.into(),
        })
    }

    /// Gets the name of the list.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the kind of every preset in the list.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Gets the number of presets. Never zero.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Gets the preset at the given position, if any.
    pub fn get(&self, index: usize) -> Option<&Preset> {
        self.presets.get(index)
    }

    /// Gets the preset at the given position. Callers keep the position in
    /// range; release builds fall back to the first preset if they don't.
    pub fn at(&self, index: usize) -> &Preset {
        debug_assert!(
            index < self.presets.len(),
            "preset index {} is past the end of '{}' ({} presets)",
            index,
            self.name,
            self.presets.len()
        );
        self.presets.get(index).unwrap_or_else(|| self.first())
    }

    /// Gets the first preset in the list.
    pub fn first(&self) -> &Preset {
        // Construction rejects empty lists.
        &self.presets[0]
    }

    /// Iterates over the presets in order.
    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }
}

impl fmt::Display for PresetList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}):", self.name, self.kind)?;
        for preset in self.presets.iter() {
            write!(f, "\n  - {}", preset)?;
        }
        Ok(())
    }
}

const NATURAL_LIGHT: &[(&str, Value)] = &[
    ("cool daylight", Value::Kelvin(6500)),
    ("daylight", Value::Kelvin(5500)),
    ("neutral", Value::Kelvin(4000)),
    ("warm white", Value::Kelvin(3000)),
    ("candlelight", Value::Kelvin(2200)),
];

const WARM_COLORS: &[(&str, Value)] = &[
    ("deep amber", Value::Rgb([255, 100, 0])),
    ("red", Value::Rgb([255, 0, 0])),
];

const BRIGHTNESS: &[(&str, Value)] = &[
    ("dim", Value::Percent(20)),
    ("40%", Value::Percent(40)),
    ("60%", Value::Percent(60)),
    ("80%", Value::Percent(80)),
    ("full", Value::Percent(100)),
];

pub const NATURAL_LIGHT_NAME: &str = "natural_light";
pub const WARM_COLORS_NAME: &str = "warm_colors";
pub const BRIGHTNESS_NAME: &str = "brightness";

fn builtin(name: &str, presets: &[(&str, Value)]) -> PresetList {
    PresetList {
        name: name.to_string(),
        kind: presets[0].1.kind(),
        presets: presets
            .iter()
            .map(|(preset_name, value)| Preset::new(preset_name, *value))
            .collect(),
    }
}

/// Color temperatures from cool daylight down to candlelight.
pub fn natural_light() -> PresetList {
    builtin(NATURAL_LIGHT_NAME, NATURAL_LIGHT)
}

/// Deep amber and red.
pub fn warm_colors() -> PresetList {
    builtin(WARM_COLORS_NAME, WARM_COLORS)
}

/// Brightness levels from dim to full.
pub fn brightness() -> PresetList {
    builtin(BRIGHTNESS_NAME, BRIGHTNESS)
}

/// The named preset lists available to mappings.
#[derive(Debug, Clone)]
pub struct Catalog {
    lists: BTreeMap<String, PresetList>,
}

impl Catalog {
    /// Creates a catalog holding only the built-in lists.
    pub fn builtin() -> Catalog {
        let mut catalog = Catalog {
            lists: BTreeMap::new(),
        };
        catalog.insert(natural_light());
        catalog.insert(warm_colors());
        catalog.insert(brightness());
        catalog
    }

    /// Adds a list, replacing any existing list with the same name.
    pub fn insert(&mut self, list: PresetList) {
        self.lists.insert(list.name.clone(), list);
    }

    /// Gets the list with the given name.
    pub fn get(&self, name: &str) -> Option<&PresetList> {
        self.lists.get(name)
    }

    /// Iterates over all lists, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &PresetList> {
        self.lists.values()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty_list_rejected() {
        assert!(matches!(
            PresetList::new("nothing", vec![]),
            Err(PresetError::Empty(name)) if name == "nothing"
        ));
    }

    #[test]
    fn test_mixed_kinds_rejected() {
        let result = PresetList::new(
            "mixed",
            vec![
                Preset::new("warm", Value::Kelvin(2700)),
                Preset::new("half", Value::Percent(50)),
            ],
        );

        match result {
            Err(PresetError::MixedKinds {
                preset,
                expected,
                found,
                ..
            }) => {
                assert_eq!("half", preset);
                assert_eq!(Kind::ColorTemperature, expected);
                assert_eq!(Kind::Brightness, found);
            }
            other => panic!("expected mixed kinds error, got {:?}", other),
        }
    }

    #[test]
    fn test_builtin_lists() {
        let natural = natural_light();
        assert_eq!(5, natural.len());
        assert_eq!(Kind::ColorTemperature, natural.kind());
        assert_eq!(Value::Kelvin(6500), natural.first().value());
        assert_eq!(Some("candlelight"), natural.get(4).map(|p| p.name()));
        assert!(natural.get(5).is_none());

        assert_eq!(Kind::Color, warm_colors().kind());
        assert_eq!(
            vec![20, 40, 60, 80, 100],
            brightness()
                .iter()
                .map(|preset| match preset.value() {
                    Value::Percent(percent) => percent,
                    other => panic!("unexpected value {:?}", other),
                })
                .collect::<Vec<u8>>()
        );
    }

    #[test]
    fn test_catalog_override() -> Result<(), PresetError> {
        let mut catalog = Catalog::builtin();
        assert_eq!(
            vec![BRIGHTNESS_NAME, NATURAL_LIGHT_NAME, WARM_COLORS_NAME],
            catalog.iter().map(|list| list.name()).collect::<Vec<&str>>()
        );

        catalog.insert(PresetList::new(
            BRIGHTNESS_NAME,
            vec![Preset::new("half", Value::Percent(50))],
        )?);
        let list = catalog.get(BRIGHTNESS_NAME).expect("expected brightness list");
        assert_eq!(1, list.len());
        assert_eq!("half", list.first().name());
        assert!(catalog.get("missing").is_none());
        Ok(())
    }

    #[test]
    fn test_display() {
        assert_eq!(
            "candlelight (2200K)",
            Preset::new("candlelight", Value::Kelvin(2200)).to_string()
        );
        assert_eq!("rgb(255, 100, 0)", Value::Rgb([255, 100, 0]).to_string());
        assert_eq!(
            "warm_colors (color):\n  - deep amber (rgb(255, 100, 0))\n  - red (rgb(255, 0, 0))",
            warm_colors().to_string()
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "past the end")]
    fn test_at_rejects_out_of_range_index() {
        natural_light().at(5);
    }
}
