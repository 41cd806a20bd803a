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

//! A whole map document.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::block::Block;
use super::object::{self, LoadContext};
use super::SideFormat;
use crate::config::LoadConfig;
use crate::coords::{Aabb, CoordSystem, MapSystem, SwizzleFromTo, Swizzler, Transform};
use crate::parts::data::Renderable;
use crate::parts::{FixUpStyle, MapObject};
use crate::traits::definitions::{ClassType, HasDefinitions};
use crate::traits::textures::HasTextures;
use crate::types::{ParseError, Result};

/// A parsed map document: its root entities, and how it was read.
#[derive(Debug, Clone)]
pub struct QuakeMap {
    /// Root entities, in document order. One of them is the world.
    pub objects: Vec<MapObject>,

    /// Canonical path the document was read from, if any
    pub path: Option<PathBuf>,

    pub config: LoadConfig,

    /// Face format detected while parsing
    pub side_format: SideFormat,

    /// Bounds of every root object
    pub aabb: Aabb,
}

impl QuakeMap {
    /// Parse a document held in memory. Instance paths are resolved against
    /// the working directory.
    pub fn parse(
        text: &str,
        definitions: &dyn HasDefinitions,
        textures: &dyn HasTextures,
        config: &LoadConfig,
    ) -> Result<QuakeMap> {
        let mut ctx = LoadContext::new(definitions, textures, config);
        QuakeMap::load(text, None, &mut ctx)
    }

    /// Read and parse the document at `path`. Instance paths are resolved
    /// against its directory.
    pub fn open<P: AsRef<Path>>(
        path: P,
        definitions: &dyn HasDefinitions,
        textures: &dyn HasTextures,
        config: &LoadConfig,
    ) -> Result<QuakeMap> {
        let mut ctx = LoadContext::new(definitions, textures, config);
        QuakeMap::open_nested(path.as_ref(), &mut ctx)
    }

    /// Open a document while others may already be loading.
    pub(crate) fn open_nested(path: &Path, ctx: &mut LoadContext) -> Result<QuakeMap> {
        let path = path.canonicalize().map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if ctx.stack.contains(&path) {
            let mut chain = ctx.stack.clone();
            chain.push(path);
            return Err(ParseError::CyclicInstance { chain });
        }

        let text = fs::read_to_string(&path).map_err(|source| ParseError::Io {
            path: path.clone(),
            source,
        })?;

        ctx.stack.push(path.clone());
        let map = QuakeMap::load(&text, Some(path.clone()), ctx);
        ctx.stack.pop();

        map.map_err(|e| e.with_path(path))
    }

    fn load(text: &str, path: Option<PathBuf>, ctx: &mut LoadContext) -> Result<QuakeMap> {
        let config = ctx.config;
        let blocks = Block::parse_all(text, config.open_delimiter, config.close_delimiter)?;

        let base_dir = path.as_deref().and_then(Path::parent).map(Path::to_path_buf);
        let mut objects = Vec::with_capacity(blocks.len());
        for block in blocks.iter() {
            objects.push(object::build(block, base_dir.as_deref(), ctx)?);
        }

        let worlds = objects
            .iter()
            .filter(|o| o.class_name() == config.world_class)
            .count();
        match worlds {
            0 => return Err(ParseError::MissingRootEntity { path }),
            1 => {}
            n => warn!("{} {} entities, only the first is the world", n, config.world_class),
        }

        let mut side_format = blocks
            .iter()
            .find_map(|b| b.side_format)
            .unwrap_or_default();
        let world = blocks
            .iter()
            .find(|b| b.get("classname") == Some(config.world_class.as_str()));
        if world.and_then(|w| w.get("mapversion")).map(str::trim) == Some("220") {
            side_format = SideFormat::Valve220;
        }

        let mut map = QuakeMap {
            objects,
            path,
            config: config.clone(),
            side_format,
            aabb: Aabb::point(Default::default()),
        };
        map.update_bounds();

        debug!(
            "Parsed {} with {} objects",
            map.display_path(),
            map.all_objects().len()
        );

        Ok(map)
    }

    fn display_path(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "<input>".to_string(),
        }
    }

    fn is_world(&self, object: &MapObject) -> bool {
        object.class_name() == self.config.world_class
    }

    pub fn world(&self) -> Option<&MapObject> {
        self.objects.iter().find(|o| self.is_world(o))
    }

    pub fn world_mut(&mut self) -> Option<&mut MapObject> {
        let world_class = self.config.world_class.clone();
        self.objects
            .iter_mut()
            .find(|o| o.class_name() == world_class)
    }

    /// Every object in the document, depth first.
    pub fn all_objects(&self) -> Vec<&MapObject> {
        self.objects.iter().flat_map(|o| o.all_objects()).collect()
    }

    pub fn all_renderables(&self) -> Vec<&Renderable> {
        self.objects
            .iter()
            .flat_map(|o| o.all_renderables())
            .collect()
    }

    /// Copies of every renderable, converted to the given coordinate system.
    pub fn renderables_in<D: CoordSystem>(&self) -> Vec<Renderable>
    where
        Swizzler: SwizzleFromTo<MapSystem, D>,
    {
        self.all_renderables()
            .into_iter()
            .map(|renderable| {
                let mut renderable = renderable.clone();
                renderable.swizzle_to::<D>();
                renderable
            })
            .collect()
    }

    pub fn update_bounds(&mut self) -> Aabb {
        let mut aabb: Option<Aabb> = None;
        for object in self.objects.iter_mut() {
            let bounds = object.update_bounds();
            aabb = Some(match aabb {
                Some(aabb) => aabb.union(&bounds),
                None => bounds,
            });
        }

        self.aabb = aabb.unwrap_or_else(|| Aabb::point(Default::default()));
        self.aabb
    }

    pub fn transform(&mut self, transform: &Transform) {
        for object in self.objects.iter_mut() {
            object.transform(transform);
        }
        self.update_bounds();
    }

    /// Rename every entity in the document. See [`MapObject::fix_up`].
    pub fn fix_up(
        &mut self,
        style: FixUpStyle,
        name: Option<&str>,
        replacements: &HashMap<String, String>,
        counter: &mut u32,
    ) {
        for object in self.objects.iter_mut() {
            object.fix_up(style, name, replacements, &self.config.default_fixup_text, counter);
        }
    }

    /// Remove every entity of the given class type. World entities are kept.
    pub fn prune(&mut self, class_type: ClassType) {
        let world_class = self.config.world_class.clone();
        self.objects
            .retain(|o| o.class_name() == world_class || o.definition.class_type != class_type);
        for object in self.objects.iter_mut() {
            object.prune(class_type);
        }
        self.update_bounds();
    }

    /// Returns whether anything in the document is translucent.
    pub fn update_translucency(&mut self, translucent: &HashSet<String>) -> bool {
        let mut any = false;
        for object in self.objects.iter_mut() {
            any |= object.update_translucency(translucent);
        }

        any
    }

    pub fn update_textures(&mut self, textures: &dyn HasTextures) {
        for object in self.objects.iter_mut() {
            object.update_textures(textures);
        }
    }

    /// A copy flattened for saving.
    ///
    /// The world keeps its own solids. Objects that only save their children
    /// are replaced by them. World entities brought in by instances are
    /// merged into the world, and their entities become roots.
    pub fn collapse(&self) -> QuakeMap {
        let world_class = &self.config.world_class;

        let mut world = None;
        let mut objects = vec![];
        for root in self.objects.iter() {
            let collapsed = root.collapse(world_class);
            if world.is_none() && self.is_world(root) {
                let mut collapsed = collapsed.into_iter();
                world = collapsed.next();
                objects.extend(collapsed);
            } else {
                objects.extend(collapsed);
            }
        }

        let mut brushes = vec![];
        let mut lifted = object::extract_worlds(&mut objects, world_class, &mut brushes);
        if let Some(world) = world.as_mut() {
            lifted.extend(object::extract_worlds(&mut world.children, world_class, &mut brushes));
            world.renderables.extend(brushes);
        }

        let mut roots: Vec<MapObject> = world.into_iter().collect();
        roots.extend(objects);
        roots.extend(lifted);

        let mut map = QuakeMap {
            objects: roots,
            path: self.path.clone(),
            config: self.config.clone(),
            side_format: self.side_format,
            aabb: self.aabb,
        };
        map.update_bounds();

        debug!(
            "Collapsed {} from {} to {} objects",
            self.display_path(),
            self.all_objects().len(),
            map.all_objects().len()
        );

        map
    }

    /// The face format used when writing.
    pub fn output_format(&self) -> SideFormat {
        self.config.side_format.unwrap_or(self.side_format)
    }

    /// Document text for the collapsed tree.
    pub fn to_text(&self) -> String {
        let collapsed = self.collapse();
        let format = self.output_format();
        let (open, close) = (self.config.open_delimiter, self.config.close_delimiter);

        object::to_blocks(&collapsed.objects, &self.config.world_class)
            .iter()
            .map(|block| block.to_text(open, close, format))
            .collect()
    }

    /// Write the collapsed tree to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_text()).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Display for QuakeMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::YUpSystem;
    use crate::traits::definitions::DefinitionDictionary;
    use crate::traits::textures::TextureDictionary;
    use na::Vector3;

    const MAP: &str = r#"// Game: Quake
{
"classname" "worldspawn"
"mapversion" "220"
{
( -64 -64 -16 ) ( -64 -63 -16 ) ( -64 -64 -15 ) base [ 0 1 0 0 ] [ 0 0 -1 0 ] 0 1 1
( 64 64 16 ) ( 64 64 17 ) ( 64 65 16 ) base [ 0 1 0 0 ] [ 0 0 -1 0 ] 0 1 1
( -64 -64 -16 ) ( -64 -64 -15 ) ( -63 -64 -16 ) base [ 1 0 0 0 ] [ 0 0 -1 0 ] 0 1 1
( 64 64 16 ) ( 65 64 16 ) ( 64 64 17 ) base [ 1 0 0 0 ] [ 0 0 -1 0 ] 0 1 1
( -64 -64 -16 ) ( -63 -64 -16 ) ( -64 -63 -16 ) base [ 1 0 0 0 ] [ 0 -1 0 0 ] 0 1 1
( 64 64 16 ) ( 64 65 16 ) ( 65 64 16 ) base [ 1 0 0 0 ] [ 0 -1 0 0 ] 0 1 1
}
}
{
"classname" "info_player_start"
"origin" "0 0 40"
"angle" "90"
}
{
"classname" "func_group"
}
"#;

    fn parse(text: &str) -> Result<QuakeMap> {
        QuakeMap::parse(
            text,
            &DefinitionDictionary::quake(),
            &TextureDictionary::new(),
            &LoadConfig::default(),
        )
    }

    #[test]
    fn parses_document() {
        let map = parse(MAP).unwrap();

        assert_eq!(map.objects.len(), 3);
        assert_eq!(map.side_format, SideFormat::Valve220);
        assert_eq!(map.world().unwrap().renderables[0].polygons.len(), 6);
        assert_eq!(map.aabb.min, Vector3::new(-64.0, -64.0, -16.0));
        assert_eq!(map.aabb.max, Vector3::new(64.0, 64.0, 72.0));
    }

    #[test]
    fn missing_world_fails() {
        let err = parse("{ \"classname\" \"light\" }").unwrap_err();
        assert!(matches!(err, ParseError::MissingRootEntity { path: None }));
    }

    #[test]
    fn empty_document_fails() {
        assert!(matches!(
            parse("// nothing here\n").unwrap_err(),
            ParseError::MissingRootEntity { .. }
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = QuakeMap::open(
            "/nonexistent/brushwork/start.map",
            &DefinitionDictionary::quake(),
            &TextureDictionary::new(),
            &LoadConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ParseError::Io { .. }));
    }

    #[test]
    fn prune_keeps_world() {
        let mut map = parse(MAP).unwrap();
        map.prune(ClassType::Brush);

        assert_eq!(map.objects.len(), 2);
        assert!(map.world().is_some());
    }

    #[test]
    fn text_keeps_format_and_entities() {
        let map = parse(MAP).unwrap();
        let again = parse(&map.to_text()).unwrap();

        assert_eq!(again.side_format, SideFormat::Valve220);
        assert_eq!(again.objects.len(), 3);
        assert_eq!(again.aabb, map.aabb);
        assert_eq!(
            again.objects[1].get("origin"),
            map.objects[1].get("origin")
        );
    }

    #[test]
    fn renderables_in_y_up() {
        let map = parse(MAP).unwrap();
        let renderables = map.renderables_in::<YUpSystem>();

        assert_eq!(renderables.len(), map.all_renderables().len());
        assert_eq!(renderables[0].aabb.min.y, -16.0);
        assert_eq!(renderables[0].aabb.max.z, 64.0);
    }
}
