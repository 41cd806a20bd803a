/*
 * Copyright (C) Oscar Shrimpton 2020
 *
 * This program is free software: you can redistribute it and/or modify it
 * under the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT
 * ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
 * FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for
 * more details.
 *
 * You should have received a copy of the GNU General Public License along
 * with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Entity class metadata, as supplied by whatever parses the host's class schema.

use std::collections::HashMap;
use std::iter::FromIterator;

use na::Vector3;

use crate::coords::Aabb;
use crate::types::Rgba;

/// Broad kind of an entity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassType {
    /// Placed at a single point. Drawn as a marker shape.
    Point,
    /// Made of brushes.
    Brush,
    /// Not in the definition table.
    Unknown,
}

impl Default for ClassType {
    fn default() -> ClassType {
        ClassType::Point
    }
}

/// What to draw for a point entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderSource {
    /// A box the size of the definition's `size`.
    Size,
    /// A model whose path is in the given key. Drawn as a red marker.
    Model { key: String },
    /// Another map document whose path is in the given key.
    Instance { key: String },
    /// A generic marker.
    Marker,
}

impl Default for RenderSource {
    fn default() -> RenderSource {
        RenderSource::Marker
    }
}

/// How a key's value changes when its entity is transformed or renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    None,
    /// `pitch yaw roll`, or a single yaw.
    Angles,
    /// A point in map space.
    Position,
    /// An entity name, subject to fixup.
    Name,
}

impl Default for TransformKind {
    fn default() -> TransformKind {
        TransformKind::None
    }
}

bitflags!(
    /// Which parts of an entity are written when a map is saved.
    pub struct Saveability: u8 {
        /// Key/values
        const ENTITY = 0x1;

        /// Own solids
        const SOLIDS = 0x2;

        /// Child entities
        const CHILDREN = 0x4;

        const ALL = Self::ENTITY.bits | Self::SOLIDS.bits | Self::CHILDREN.bits;
    }
);

impl Default for Saveability {
    fn default() -> Saveability {
        Saveability::ALL
    }
}

/// Metadata for one entity class.
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Definition {
    #[builder(setter(into))]
    pub class_name: String,

    #[builder(default)]
    pub class_type: ClassType,

    #[builder(default)]
    pub color: Rgba,

    /// Bounds of the class's box, relative to the entity's position.
    #[builder(default, setter(strip_option))]
    pub size: Option<Aabb>,

    #[builder(default)]
    pub render_source: RenderSource,

    #[builder(default)]
    pub saveability: Saveability,

    /// Transform kinds for keys that don't use the usual names.
    #[builder(default)]
    pub key_transforms: HashMap<String, TransformKind>,
}

impl Definition {
    /// Stands in for a class name that isn't in the table.
    pub fn unknown<S: Into<String>>(class_name: S) -> Definition {
        Definition {
            class_name: class_name.into(),
            class_type: ClassType::Unknown,
            color: Rgba::magenta(),
            size: None,
            render_source: RenderSource::Marker,
            saveability: Saveability::ALL,
            key_transforms: HashMap::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.class_type == ClassType::Unknown
    }

    /// How `key` changes under transforms. Keys the definition doesn't mention
    /// fall back to the names every Quake-family game uses.
    pub fn transform_kind(&self, key: &str) -> TransformKind {
        if let Some(kind) = self.key_transforms.get(key) {
            return *kind;
        }

        match key {
            "origin" => TransformKind::Position,
            "angle" | "angles" | "mangle" => TransformKind::Angles,
            "targetname" | "target" | "killtarget" => TransformKind::Name,
            _ => TransformKind::None,
        }
    }

    /// The path key, if this class instances another document.
    pub fn instance_key(&self) -> Option<&str> {
        match &self.render_source {
            RenderSource::Instance { key } => Some(key),
            _ => None,
        }
    }
}

/// Something that can look up entity classes by name.
pub trait HasDefinitions {
    fn get_definition(&self, class_name: &str) -> Option<&Definition>;

    /// Clone the named definition, or build the unknown sentinel for it.
    fn definition_or_unknown(&self, class_name: &str) -> Definition {
        match self.get_definition(class_name) {
            Some(def) => def.clone(),
            None => Definition::unknown(class_name),
        }
    }
}

/// A plain table of definitions, keyed by class name.
#[derive(Debug, Clone, Default)]
pub struct DefinitionDictionary {
    definitions: HashMap<String, Definition>,
}

impl DefinitionDictionary {
    pub fn new() -> DefinitionDictionary {
        DefinitionDictionary::default()
    }

    /// Add `definition`, replacing any with the same class name.
    pub fn insert(&mut self, definition: Definition) -> Option<Definition> {
        self.definitions
            .insert(definition.class_name.clone(), definition)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.values()
    }

    /// A small table covering the classes most Quake-family maps use.
    pub fn quake() -> DefinitionDictionary {
        let brush = |name: &str| Definition {
            class_type: ClassType::Brush,
            ..Definition::unknown(name)
        };
        let sized = |name: &str, color: Rgba, min: Vector3<f32>, max: Vector3<f32>| Definition {
            class_type: ClassType::Point,
            color,
            size: Some(Aabb::new(min, max)),
            render_source: RenderSource::Size,
            ..Definition::unknown(name)
        };

        vec![
            Definition {
                color: Rgba::white(),
                ..brush("worldspawn")
            },
            Definition {
                color: Rgba::new(0, 255, 255, 255),
                ..brush("func_group")
            },
            Definition {
                color: Rgba::new(0, 128, 255, 255),
                ..brush("func_detail")
            },
            Definition {
                color: Rgba::new(0, 128, 204, 255),
                ..brush("func_door")
            },
            Definition {
                color: Rgba::new(128, 128, 128, 255),
                ..brush("func_wall")
            },
            Definition {
                color: Rgba::new(128, 128, 128, 255),
                ..brush("trigger_multiple")
            },
            sized(
                "info_player_start",
                Rgba::new(255, 0, 0, 255),
                Vector3::new(-16.0, -16.0, -24.0),
                Vector3::new(16.0, 16.0, 32.0),
            ),
            sized(
                "light",
                Rgba::new(255, 255, 102, 255),
                Vector3::new(-8.0, -8.0, -8.0),
                Vector3::new(8.0, 8.0, 8.0),
            ),
            Definition {
                class_type: ClassType::Point,
                color: Rgba::new(0, 255, 0, 255),
                ..Definition::unknown("info_null")
            },
            Definition {
                class_type: ClassType::Point,
                color: Rgba::red(),
                render_source: RenderSource::Model {
                    key: "model".to_string(),
                },
                ..Definition::unknown("misc_model")
            },
            Definition {
                class_type: ClassType::Point,
                color: Rgba::orange(),
                render_source: RenderSource::Instance {
                    key: "file".to_string(),
                },
                saveability: Saveability::CHILDREN,
                ..Definition::unknown("func_instance")
            },
        ]
        .into_iter()
        .collect()
    }
}

impl FromIterator<Definition> for DefinitionDictionary {
    fn from_iter<I: IntoIterator<Item = Definition>>(iter: I) -> DefinitionDictionary {
        let mut dict = DefinitionDictionary::new();
        for definition in iter {
            dict.insert(definition);
        }

        dict
    }
}

impl HasDefinitions for DefinitionDictionary {
    fn get_definition(&self, class_name: &str) -> Option<&Definition> {
        self.definitions.get(class_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_classes_get_sentinel() {
        let defs = DefinitionDictionary::quake();

        let def = defs.definition_or_unknown("monster_zombie");
        assert_eq!(def.class_name, "monster_zombie");
        assert_eq!(def.class_type, ClassType::Unknown);
        assert_eq!(def.color, Rgba::magenta());

        let def = defs.definition_or_unknown("worldspawn");
        assert_eq!(def.class_type, ClassType::Brush);
    }

    #[test]
    fn key_transforms_override_fallbacks() {
        let mut key_transforms = HashMap::new();
        key_transforms.insert("target".to_string(), TransformKind::None);
        key_transforms.insert("destination".to_string(), TransformKind::Position);

        let def = DefinitionBuilder::default()
            .class_name("trigger_teleport")
            .class_type(ClassType::Brush)
            .key_transforms(key_transforms)
            .build()
            .unwrap();

        assert_eq!(def.transform_kind("target"), TransformKind::None);
        assert_eq!(def.transform_kind("destination"), TransformKind::Position);
        assert_eq!(def.transform_kind("targetname"), TransformKind::Name);
        assert_eq!(def.transform_kind("angles"), TransformKind::Angles);
        assert_eq!(def.transform_kind("message"), TransformKind::None);
        assert_eq!(def.saveability, Saveability::ALL);
    }

    #[test]
    fn instance_class_has_path_key() {
        let defs = DefinitionDictionary::quake();
        let def = defs.get_definition("func_instance").unwrap();

        assert_eq!(def.instance_key(), Some("file"));
        assert_eq!(def.saveability, Saveability::CHILDREN);
        assert_eq!(defs.get_definition("light").unwrap().instance_key(), None);
    }
}
