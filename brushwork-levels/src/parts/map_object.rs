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

//! The entity tree.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use log::warn;
use na::Vector3;

use super::polygons::Renderable;
use crate::coords::{Aabb, Transform};
use crate::helpers::{format_float, format_vec3, parse_floats, parse_vec3};
use crate::quake;
use crate::traits::definitions::{ClassType, Definition, Saveability, TransformKind};
use crate::traits::textures::HasTextures;
use crate::types::Rgba;

/// The document format an object was read from. Selects format-specific behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapFormat {
    Quake,
}

/// Where the fixup name goes when renaming instanced entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixUpStyle {
    Prefix,
    Postfix,
    /// Leave names alone.
    None,
}

impl FixUpStyle {
    /// From a `fixup_style` value. Unrecognised values mean prefix.
    pub fn from_value(value: &str) -> FixUpStyle {
        match value.trim() {
            "1" => FixUpStyle::Postfix,
            "2" => FixUpStyle::None,
            _ => FixUpStyle::Prefix,
        }
    }
}

/// A value, and how it changes when its entity is transformed or renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub value: String,
    pub transform: TransformKind,
}

/// One entity, and everything nested in it.
#[derive(Clone)]
pub struct MapObject {
    pub key_values: HashMap<String, KeyValue>,
    pub definition: Definition,
    pub position: Vector3<f32>,
    pub aabb: Aabb,
    pub children: Vec<MapObject>,
    pub renderables: Vec<Renderable>,
    pub translucent: bool,
    pub saveability: Saveability,
    pub color: Rgba,

    /// Anything the host wants to attach. Instances keep their parsed document here.
    pub user_data: Option<Arc<dyn Any + Send + Sync>>,

    pub format: MapFormat,
}

impl fmt::Debug for MapObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MapObject")
            .field("class_name", &self.definition.class_name)
            .field("key_values", &self.key_values)
            .field("position", &self.position)
            .field("aabb", &self.aabb)
            .field("children", &self.children)
            .field("renderables", &self.renderables.len())
            .field("translucent", &self.translucent)
            .field("saveability", &self.saveability)
            .field("user_data", &self.user_data.is_some())
            .field("format", &self.format)
            .finish()
    }
}

impl MapObject {
    /// An object with no key/values, children or geometry.
    pub fn new(definition: Definition, format: MapFormat) -> MapObject {
        MapObject {
            key_values: HashMap::new(),
            position: Vector3::zeros(),
            aabb: Aabb::point(Vector3::zeros()),
            children: vec![],
            renderables: vec![],
            translucent: false,
            saveability: definition.saveability,
            color: definition.color,
            user_data: None,
            format,
            definition,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.definition.class_name
    }

    /// Whether this object splices in another document.
    pub fn is_instance(&self) -> bool {
        self.definition.instance_key().is_some()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.key_values.get(key).map(|kv| kv.value.as_str())
    }

    /// Set `key`, taking its transform kind from the definition.
    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let transform = self.definition.transform_kind(&key);
        self.key_values.insert(
            key,
            KeyValue {
                value: value.into(),
                transform,
            },
        );
    }

    /// This object and every descendant, depth first.
    pub fn all_objects(&self) -> Vec<&MapObject> {
        let mut all = vec![self];
        for child in self.children.iter() {
            all.extend(child.all_objects());
        }

        all
    }

    /// Every renderable in this object and its descendants.
    pub fn all_renderables(&self) -> Vec<&Renderable> {
        let mut all: Vec<&Renderable> = self.renderables.iter().collect();
        for child in self.children.iter() {
            all.extend(child.all_renderables());
        }

        all
    }

    fn has_geometry(&self) -> bool {
        !self.renderables.is_empty() || self.children.iter().any(|c| c.has_geometry())
    }

    /// Recompute bounds from the bottom up. Objects with nothing in them
    /// get a zero-sized box at their position.
    pub fn update_bounds(&mut self) -> Aabb {
        let mut aabb: Option<Aabb> = None;
        let mut include = |other: Aabb| {
            aabb = Some(match aabb {
                Some(aabb) => aabb.union(&other),
                None => other,
            })
        };

        for child in self.children.iter_mut() {
            include(child.update_bounds());
        }
        for renderable in self.renderables.iter_mut() {
            include(renderable.update_bounds());
        }

        self.aabb = aabb.unwrap_or_else(|| Aabb::point(self.position));
        self.aabb
    }

    /// Transform this object, its geometry, and every position or angle typed value.
    pub fn transform(&mut self, transform: &Transform) {
        for child in self.children.iter_mut() {
            child.transform(transform);
        }
        for renderable in self.renderables.iter_mut() {
            renderable.transform(transform);
        }

        // Overwritten below if there's a position key.
        self.position = if self.has_geometry() {
            self.update_bounds().center()
        } else {
            transform.apply(&self.position)
        };

        // `origin` wins, then the first position key by name.
        let mut moved_to: Option<(&str, Vector3<f32>)> = None;
        for (key, kv) in self.key_values.iter_mut() {
            match kv.transform {
                TransformKind::Angles => match rotate_angles(&kv.value, &transform.rotation) {
                    Some(value) => kv.value = value,
                    None => warn!("Couldn't rotate {} value {:?}", key, kv.value),
                },
                TransformKind::Position => match parse_vec3(&kv.value) {
                    Some(position) => {
                        let position = transform.apply(&position);
                        kv.value = format_vec3(&position);
                        let better = match moved_to {
                            None => true,
                            Some((chosen, _)) => {
                                chosen != "origin" && (key == "origin" || key.as_str() < chosen)
                            }
                        };
                        if better {
                            moved_to = Some((key.as_str(), position));
                        }
                    }
                    None => warn!("Couldn't move {} value {:?}", key, kv.value),
                },
                _ => {}
            }
        }

        if let Some((_, position)) = moved_to {
            self.position = position;
        }
        self.update_bounds();
    }

    /// Rename entities so copies of the same instance don't collide.
    ///
    /// Values starting with `$` are replaced from `replacements`, as are
    /// texture names whose `#`-prefixed form is a key. Name-typed values get
    /// `name` added to the front or back. Without a name, `{default_text}{counter}`
    /// is used, and `counter` is bumped first if this object is an instance.
    /// Empty names are left empty.
    pub fn fix_up(
        &mut self,
        style: FixUpStyle,
        name: Option<&str>,
        replacements: &HashMap<String, String>,
        default_text: &str,
        counter: &mut u32,
    ) {
        let fix = match name.filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => {
                if self.is_instance() {
                    *counter += 1;
                }
                format!("{}{}", default_text, counter)
            }
        };

        self.apply_fix_up(style, &fix, replacements);
    }

    fn apply_fix_up(&mut self, style: FixUpStyle, fix: &str, replacements: &HashMap<String, String>) {
        for child in self.children.iter_mut() {
            child.apply_fix_up(style, fix, replacements);
        }

        for kv in self.key_values.values_mut() {
            if kv.value.starts_with('$') {
                if let Some(replacement) = replacements.get(&kv.value) {
                    kv.value = replacement.clone();
                }
            } else if kv.transform == TransformKind::Name && !kv.value.is_empty() {
                match style {
                    FixUpStyle::Prefix => kv.value = format!("{}{}", fix, kv.value),
                    FixUpStyle::Postfix => kv.value = format!("{}{}", kv.value, fix),
                    FixUpStyle::None => {}
                }
            }
        }

        for renderable in self.renderables.iter_mut() {
            for polygon in renderable.polygons.iter_mut() {
                if let Some(replacement) = replacements.get(&format!("#{}", polygon.texture.name)) {
                    polygon.texture.name = replacement.clone();
                }
            }
        }
    }

    /// Remove every descendant of the given class type, along with its subtree.
    pub fn prune(&mut self, class_type: ClassType) {
        self.children
            .retain(|child| child.definition.class_type != class_type);
        for child in self.children.iter_mut() {
            child.prune(class_type);
        }
    }

    /// Work out translucency from the bottom up, moving translucent children
    /// and renderables after opaque ones. Returns whether this object is translucent.
    pub fn update_translucency(&mut self, translucent: &HashSet<String>) -> bool {
        let mut opaque = vec![];
        let mut clear = vec![];
        for mut child in self.children.drain(..) {
            if child.update_translucency(translucent) {
                clear.push(child);
            } else {
                opaque.push(child);
            }
        }
        self.translucent = !clear.is_empty();
        self.children = opaque;
        self.children.extend(clear);

        // Every renderable is updated, even once the answer is known.
        let mut opaque = vec![];
        let mut clear = vec![];
        for mut renderable in self.renderables.drain(..) {
            if renderable.update_translucency(translucent) {
                clear.push(renderable);
            } else {
                opaque.push(renderable);
            }
        }
        self.translucent |= !clear.is_empty();
        self.renderables = opaque;
        self.renderables.extend(clear);

        self.translucent
    }

    /// Recompute texture coordinates throughout the tree.
    pub fn update_textures(&mut self, textures: &dyn HasTextures) {
        for child in self.children.iter_mut() {
            child.update_textures(textures);
        }
        for renderable in self.renderables.iter_mut() {
            renderable.update_textures(textures);
        }
    }

    /// A copy flattened for saving. An object that only saves its children is
    /// replaced by them.
    pub fn collapse(&self, world_class: &str) -> Vec<MapObject> {
        match self.format {
            MapFormat::Quake => quake::object::collapse(self, world_class),
        }
    }
}

/// Add a rotation to an angle-typed value. Three components are
/// `pitch yaw roll`; a single one is a yaw, where `-1` and `-2` mean up and down.
fn rotate_angles(value: &str, rotation: &Vector3<f32>) -> Option<String> {
    let wrap = |angle: f32| format_float(angle.rem_euclid(360.0));

    match parse_floats(value)?.as_slice() {
        [pitch, yaw, roll] => Some(format!(
            "{} {} {}",
            wrap(pitch + rotation.y),
            wrap(yaw + rotation.z),
            wrap(roll + rotation.x)
        )),
        [yaw] if *yaw == -1.0 || *yaw == -2.0 => Some(value.trim().to_string()),
        [yaw] => Some(wrap(yaw + rotation.z)),
        _ => None,
    }
}
