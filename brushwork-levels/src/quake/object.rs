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

//! Turning blocks into entity trees and back.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};
use na::Vector3;

use super::block::Block;
use super::file::QuakeMap;
use super::side;
use crate::config::LoadConfig;
use crate::coords::{Aabb, Transform};
use crate::helpers::{parse_floats, parse_vec3};
use crate::parts::data::{Renderable, Solid};
use crate::parts::markers::{self, INSTANCE_BOX_SIZE};
use crate::parts::{FixUpStyle, MapFormat, MapObject};
use crate::traits::definitions::{HasDefinitions, RenderSource, Saveability};
use crate::traits::textures::HasTextures;
use crate::types::{Result, Rgba};

/// Everything threaded through the loading of one root document and its instances.
pub(crate) struct LoadContext<'a> {
    pub definitions: &'a dyn HasDefinitions,
    pub textures: &'a dyn HasTextures,
    pub config: &'a LoadConfig,

    /// Documents currently being loaded, outermost first
    pub stack: Vec<PathBuf>,

    /// Shared by every instance fixup below the root document
    pub fixup_counter: u32,
}

impl<'a> LoadContext<'a> {
    pub fn new(
        definitions: &'a dyn HasDefinitions,
        textures: &'a dyn HasTextures,
        config: &'a LoadConfig,
    ) -> LoadContext<'a> {
        LoadContext {
            definitions,
            textures,
            config,
            stack: vec![],
            fixup_counter: 0,
        }
    }
}

/// Build the object for an entity block. Instance paths are resolved against `base_dir`.
pub(crate) fn build(block: &Block, base_dir: Option<&Path>, ctx: &mut LoadContext) -> Result<MapObject> {
    let class_name = block.get("classname").unwrap_or_default();
    let definition = ctx.definitions.definition_or_unknown(class_name);
    if definition.is_unknown() {
        warn!("Unknown class {:?} at {}", class_name, block.location);
    }

    let mut object = MapObject::new(definition, MapFormat::Quake);
    for (key, value) in block.key_values.iter() {
        object.set(key.as_str(), value.as_str());
    }

    let is_world = class_name == ctx.config.world_class;
    let origin = match (is_world, block.get("origin")) {
        (false, Some(value)) => {
            let origin = parse_vec3(value);
            if origin.is_none() {
                warn!("Ignoring bad origin {:?} at {}", value, block.location);
            }
            origin
        }
        _ => None,
    };
    if let Some(origin) = origin {
        object.position = origin;
    }

    let mut solids = vec![];
    if !block.sides.is_empty() {
        solids.push(Solid::new(block.sides.clone()));
    }
    for child in block.children.iter() {
        if child.is_entity() {
            object.children.push(build(child, base_dir, ctx)?);
        } else {
            solids.push(Solid::new(child.sides.clone()));
        }
    }

    for solid in solids.iter() {
        match solid.to_renderable(ctx.config.winding, ctx.config.epsilon, object.color, ctx.textures) {
            Ok(renderable) => object.renderables.push(renderable),
            Err(e) => warn!("Dropping brush of {} at {}: {}", class_name, block.location, e),
        }
    }

    if object.renderables.is_empty() && !is_world {
        let winding = ctx.config.winding;
        match object.definition.render_source.clone() {
            RenderSource::Instance { key } => load_instance(&mut object, &key, base_dir, ctx)?,
            RenderSource::Model { .. } => object
                .renderables
                .push(markers::gem(&object.position, Rgba::red(), winding)),
            RenderSource::Size => {
                let renderable = match object.definition.size {
                    Some(size) => markers::cuboid(
                        &Aabb::new(size.min + object.position, size.max + object.position),
                        object.color,
                        winding,
                    ),
                    None => markers::gem(&object.position, Rgba::lime(), winding),
                };
                object.renderables.push(renderable);
            }
            RenderSource::Marker => {
                let color = if object.definition.is_unknown() {
                    Rgba::magenta()
                } else {
                    Rgba::lime()
                };
                object
                    .renderables
                    .push(markers::gem(&object.position, color, winding));
            }
        }
    }

    object.update_bounds();
    if origin.is_none() && !is_world && !object.all_renderables().is_empty() {
        object.position = object.aabb.center();
    }

    Ok(object)
}

/// Rotation from an instance's `angles` or `angle`, as (roll, pitch, yaw).
fn instance_rotation(object: &MapObject) -> Vector3<f32> {
    if let Some(value) = object.get("angles") {
        match parse_floats(value).as_deref() {
            Some([pitch, yaw, roll]) => return Vector3::new(*roll, *pitch, *yaw),
            _ => warn!("Ignoring bad instance angles {:?}", value),
        }
    }

    match object.get("angle").map(|v| v.trim().parse::<f32>()) {
        Some(Ok(yaw)) if yaw == -1.0 => Vector3::new(0.0, -90.0, 0.0),
        Some(Ok(yaw)) if yaw == -2.0 => Vector3::new(0.0, 90.0, 0.0),
        Some(Ok(yaw)) => Vector3::new(0.0, 0.0, yaw),
        Some(Err(_)) => {
            warn!("Ignoring bad instance angle {:?}", object.get("angle"));
            Vector3::zeros()
        }
        None => Vector3::zeros(),
    }
}

/// Where an instance puts its copy of the document.
pub(crate) fn instance_transform(object: &MapObject) -> Transform {
    let scale = match object.get("scale").map(|v| v.trim().parse::<f32>()) {
        Some(Ok(scale)) if scale != 0.0 => scale,
        Some(_) => {
            warn!("Ignoring bad instance scale {:?}", object.get("scale"));
            1.0
        }
        None => 1.0,
    };

    Transform::new(object.position, instance_rotation(object), Vector3::repeat(scale))
}

/// `replaceNN` values, split into what to replace and what with.
pub(crate) fn instance_replacements(object: &MapObject) -> HashMap<String, String> {
    let mut replacements = HashMap::new();
    for (key, kv) in object.key_values.iter() {
        if !key.to_ascii_lowercase().starts_with("replace") {
            continue;
        }

        match kv.value.trim().split_once(char::is_whitespace) {
            Some((from, to)) => {
                replacements.insert(from.to_string(), to.trim().to_string());
            }
            None => warn!("Ignoring {} without a replacement: {:?}", key, kv.value),
        }
    }

    replacements
}

/// Load the document named by `key`, and splice a transformed copy of it in
/// as `object`'s children.
fn load_instance(object: &mut MapObject, key: &str, base_dir: Option<&Path>, ctx: &mut LoadContext) -> Result<()> {
    let winding = ctx.config.winding;
    let marker = markers::cube(&object.position, INSTANCE_BOX_SIZE, Rgba::orange(), winding);

    let value = match object.get(key).map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => {
            warn!("Instance has no {:?} key", key);
            object.renderables.push(marker);
            return Ok(());
        }
    };
    if !ctx.config.is_instance_path(&value) {
        warn!(
            "Not loading instance {:?}, expected a .{} file",
            value, ctx.config.instance_extension
        );
        object.renderables.push(marker);
        return Ok(());
    }

    let path = match base_dir {
        Some(dir) => dir.join(&value),
        None => PathBuf::from(&value),
    };
    let map = QuakeMap::open_nested(&path, ctx)?;
    debug!("Loaded instance {:?} with {} objects", path, map.objects.len());

    let transform = instance_transform(object);
    for root in map.objects.iter() {
        let mut copy = root.clone();
        copy.transform(&transform);
        if copy.class_name() == ctx.config.world_class {
            copy.saveability = Saveability::SOLIDS;
        }
        object.children.push(copy);
    }
    object.user_data = Some(Arc::new(map));

    // The instance's own name is the fix, so only its copies are renamed.
    let style = FixUpStyle::from_value(object.get("fixup_style").unwrap_or_default());
    let fix = match object.get("targetname").filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => {
            ctx.fixup_counter += 1;
            format!("{}{}", ctx.config.default_fixup_text, ctx.fixup_counter)
        }
    };
    let replacements = instance_replacements(object);
    for child in object.children.iter_mut() {
        child.fix_up(
            style,
            Some(&fix),
            &replacements,
            &ctx.config.default_fixup_text,
            &mut ctx.fixup_counter,
        );
    }

    object.renderables.push(marker);
    Ok(())
}

/// Copy of `object` without its children.
fn shallow_copy(object: &MapObject) -> MapObject {
    MapObject {
        key_values: object.key_values.clone(),
        definition: object.definition.clone(),
        position: object.position,
        aabb: object.aabb,
        children: vec![],
        renderables: object.renderables.clone(),
        translucent: object.translucent,
        saveability: object.saveability,
        color: object.color,
        user_data: object.user_data.clone(),
        format: object.format,
    }
}

/// Collapse `object`'s subtree. Objects that only save their children are
/// replaced by them.
pub(crate) fn collapse(object: &MapObject, world_class: &str) -> Vec<MapObject> {
    let mut copy = shallow_copy(object);
    for child in object.children.iter() {
        copy.children.extend(collapse(child, world_class));
    }

    if copy.saveability == Saveability::CHILDREN {
        copy.children
    } else {
        vec![copy]
    }
}

/// Take every world-class object out of `objects` and their descendants.
/// Their solids go to `brushes`, their children back into the search.
pub(crate) fn extract_worlds(objects: &mut Vec<MapObject>, world_class: &str, brushes: &mut Vec<Renderable>) -> Vec<MapObject> {
    let mut lifted = vec![];
    let mut kept = Vec::with_capacity(objects.len());
    for mut object in objects.drain(..) {
        lifted.extend(extract_worlds(&mut object.children, world_class, brushes));
        if object.class_name() == world_class {
            brushes.extend(object.renderables.into_iter().filter(Renderable::is_brush));
            lifted.extend(object.children);
        } else {
            kept.push(object);
        }
    }
    *objects = kept;

    lifted
}

/// `classname` first, then the rest by key.
fn key_values(object: &MapObject) -> Vec<(String, String)> {
    let mut rest: Vec<(String, String)> = object
        .key_values
        .iter()
        .filter(|(key, _)| key.as_str() != "classname")
        .map(|(key, kv)| (key.clone(), kv.value.clone()))
        .collect();
    rest.sort();

    let mut all = vec![("classname".to_string(), object.class_name().to_string())];
    all.extend(rest);
    all
}

/// One block per brush. Markers aren't written.
fn brush_blocks(object: &MapObject) -> Vec<Block> {
    object
        .renderables
        .iter()
        .filter(|r| r.is_brush())
        .map(|renderable| Block {
            sides: renderable
                .polygons
                .iter()
                .filter_map(side::from_polygon)
                .collect(),
            ..Block::default()
        })
        .collect()
}

fn write_object(object: &MapObject, out: &mut Vec<Block>, world_brushes: &mut Vec<Block>) {
    let save = object.saveability;
    if save.contains(Saveability::ENTITY) {
        let mut block = Block {
            key_values: key_values(object),
            ..Block::default()
        };
        if save.contains(Saveability::SOLIDS) {
            block.children.extend(brush_blocks(object));
        }
        if save.contains(Saveability::CHILDREN) {
            for child in object.children.iter() {
                write_object(child, &mut block.children, world_brushes);
            }
        }
        out.push(block);
    } else {
        if save.contains(Saveability::SOLIDS) {
            world_brushes.extend(brush_blocks(object));
        }
        if save.contains(Saveability::CHILDREN) {
            for child in object.children.iter() {
                write_object(child, out, world_brushes);
            }
        }
    }
}

/// Blocks for a list of root objects, world first. Solids of objects that
/// only save solids are moved into the world.
pub(crate) fn to_blocks(roots: &[MapObject], world_class: &str) -> Vec<Block> {
    let mut world = None;
    let mut world_brushes = vec![];
    let mut blocks = vec![];

    for root in roots.iter() {
        if world.is_none() && root.class_name() == world_class {
            world = Some(root);
        } else {
            write_object(root, &mut blocks, &mut world_brushes);
        }
    }

    let world = match world {
        Some(world) => world,
        None => return blocks,
    };

    let mut world_block = Block {
        key_values: key_values(world),
        children: brush_blocks(world),
        ..Block::default()
    };
    let mut nested = vec![];
    for child in world.children.iter() {
        write_object(child, &mut nested, &mut world_brushes);
    }
    world_block.children.extend(world_brushes);
    world_block.children.extend(nested);

    let mut all = vec![world_block];
    all.extend(blocks);
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::definitions::{ClassType, DefinitionDictionary};
    use crate::traits::textures::TextureDictionary;
    use crate::types::Winding;

    const BOX: &str = "{
( -16 -16 -16 ) ( -16 -15 -16 ) ( -16 -16 -15 ) base 0 0 0 1 1
( 16 16 16 ) ( 16 16 17 ) ( 16 17 16 ) base 0 0 0 1 1
( -16 -16 -16 ) ( -16 -16 -15 ) ( -15 -16 -16 ) base 0 0 0 1 1
( 16 16 16 ) ( 17 16 16 ) ( 16 16 17 ) base 0 0 0 1 1
( -16 -16 -16 ) ( -15 -16 -16 ) ( -16 -15 -16 ) base 0 0 0 1 1
( 16 16 16 ) ( 16 17 16 ) ( 17 16 16 ) base 0 0 0 1 1
}";

    fn build_text(text: &str) -> Result<MapObject> {
        let defs = DefinitionDictionary::quake();
        let textures = TextureDictionary::new();
        let config = LoadConfig::default();
        let mut ctx = LoadContext::new(&defs, &textures, &config);

        let blocks = Block::parse_all(text, '{', '}')?;
        build(&blocks[0], None, &mut ctx)
    }

    fn object(class_name: &str) -> MapObject {
        let defs = DefinitionDictionary::quake();
        MapObject::new(defs.definition_or_unknown(class_name), MapFormat::Quake)
    }

    #[test]
    fn brush_entity_is_positioned_at_its_centre() {
        let text = format!("{{\n\"classname\" \"func_door\"\n\"targetname\" \"d\"\n{}\n}}", BOX);
        let door = build_text(&text).unwrap();

        assert_eq!(door.renderables.len(), 1);
        assert_eq!(door.renderables[0].polygons.len(), 6);
        assert_eq!(door.position, Vector3::zeros());
        assert_eq!(door.aabb.max, Vector3::repeat(16.0));
        assert_eq!(door.get("targetname"), Some("d"));
    }

    #[test]
    fn world_stays_at_origin() {
        let world = build_text("{ \"classname\" \"worldspawn\" \"origin\" \"5 5 5\" }").unwrap();

        assert_eq!(world.position, Vector3::zeros());
        assert!(world.renderables.is_empty());
    }

    #[test]
    fn point_entities_get_markers() {
        let light = build_text("{ \"classname\" \"light\" \"origin\" \"0 0 64\" }").unwrap();
        assert_eq!(light.position, Vector3::new(0.0, 0.0, 64.0));
        assert_eq!(light.aabb.min, Vector3::new(-8.0, -8.0, 56.0));
        assert!(!light.renderables[0].is_brush());

        let model = build_text("{ \"classname\" \"misc_model\" \"origin\" \"0 0 0\" }").unwrap();
        assert_eq!(model.renderables[0].color, Rgba::red());

        let odd = build_text("{ \"classname\" \"info_teleport_somewhere\" \"origin\" \"8 0 0\" }").unwrap();
        assert_eq!(odd.definition.class_type, ClassType::Unknown);
        assert_eq!(odd.renderables[0].color, Rgba::magenta());
        assert_eq!(odd.position, Vector3::new(8.0, 0.0, 0.0));
    }

    #[test]
    fn degenerate_brush_is_dropped() {
        let text = "{ \"classname\" \"func_wall\"
{
( 0 0 0 ) ( 0 1 0 ) ( 1 0 0 ) base 0 0 0 1 1
( 0 0 0 ) ( 1 0 0 ) ( 0 0 1 ) base 0 0 0 1 1
}
}";
        let wall = build_text(text).unwrap();
        assert!(wall.renderables.iter().all(|r| !r.is_brush()));
    }

    #[test]
    fn unloadable_instance_is_only_a_marker() {
        let instance = build_text("{ \"classname\" \"func_instance\" \"file\" \"door.mdl\" \"origin\" \"0 0 0\" }").unwrap();

        assert!(instance.children.is_empty());
        assert_eq!(instance.renderables.len(), 1);
        assert_eq!(instance.renderables[0].color, Rgba::orange());
    }

    #[test]
    fn instance_parameters() {
        let mut instance = object("func_instance");
        instance.position = Vector3::new(100.0, 0.0, 0.0);
        instance.set("angle", "-2");
        instance.set("scale", "2");
        instance.set("replace01", "$light 300");
        instance.set("replace02", "#base metal/floor1");
        instance.set("replace03", "$broken");

        let transform = instance_transform(&instance);
        assert_eq!(transform.translation, Vector3::new(100.0, 0.0, 0.0));
        assert_eq!(transform.rotation, Vector3::new(0.0, 90.0, 0.0));
        assert_eq!(transform.scale, Vector3::repeat(2.0));

        instance.set("angles", "10 20 30");
        assert_eq!(instance_transform(&instance).rotation, Vector3::new(30.0, 10.0, 20.0));

        let replacements = instance_replacements(&instance);
        assert_eq!(replacements.len(), 2);
        assert_eq!(replacements["$light"], "300");
        assert_eq!(replacements["#base"], "metal/floor1");
    }

    #[test]
    fn collapse_replaces_children_only_objects() {
        let mut instance = object("func_instance");
        instance.children.push(object("light"));
        instance.children.push(object("info_null"));
        instance
            .renderables
            .push(markers::cube(&Vector3::zeros(), 16.0, Rgba::orange(), Winding::Cw));

        let mut world = object("worldspawn");
        world.children.push(instance);

        let collapsed = collapse(&world, "worldspawn");
        assert_eq!(collapsed.len(), 1);
        assert_eq!(collapsed[0].children.len(), 2);
        assert_eq!(collapsed[0].children[0].class_name(), "light");
        assert_eq!(collapse(&collapsed[0], "worldspawn")[0].all_objects().len(), 3);
    }

    #[test]
    fn nested_worlds_are_lifted() {
        let text = format!("{{\n\"classname\" \"worldspawn\"\n{}\n}}", BOX);
        let mut inner = build_text(&text).unwrap();
        inner.saveability = Saveability::SOLIDS;
        inner.children.push(object("light"));

        let mut group = object("func_group");
        group.children.push(inner);
        let mut objects = vec![group];

        let mut brushes = vec![];
        let lifted = extract_worlds(&mut objects, "worldspawn", &mut brushes);

        assert_eq!(brushes.len(), 1);
        assert_eq!(lifted.len(), 1);
        assert_eq!(lifted[0].class_name(), "light");
        assert!(objects[0].children.is_empty());
    }

    #[test]
    fn blocks_put_world_first() {
        let text = format!("{{\n\"classname\" \"func_group\"\n{}\n}}", BOX);
        let mut group = build_text(&text).unwrap();
        group.saveability = Saveability::SOLIDS;

        let mut light = object("light");
        light.set("origin", "0 0 64");
        light.set("classname", "light");

        let mut hidden = object("info_null");
        hidden.saveability = Saveability::empty();

        let mut world = object("worldspawn");
        world.set("wad", "base.wad");
        world.set("classname", "worldspawn");

        let blocks = to_blocks(&[light, group, world, hidden], "worldspawn");

        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0].key_values,
            vec![
                ("classname".to_string(), "worldspawn".to_string()),
                ("wad".to_string(), "base.wad".to_string())
            ]
        );
        assert_eq!(blocks[0].children.len(), 1);
        assert_eq!(blocks[0].children[0].sides.len(), 6);
        assert_eq!(blocks[1].get("origin"), Some("0 0 64"));
        assert!(blocks[1].children.is_empty());
    }
}
