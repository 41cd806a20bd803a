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

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::iter::FromIterator;

/// Width and height given to textures that can't be found.
pub const MISSING_TEXTURE_SIZE: u32 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A texture, as far as projecting and ordering faces is concerned.
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub translucent: bool,
}

impl Texture {
    /// Names starting with `{` are translucent, as in most Quake source ports.
    pub fn new<S: Into<String>>(name: S, width: u32, height: u32) -> Texture {
        let name = name.into();
        let translucent = name.starts_with('{');
        Texture {
            name,
            width,
            height,
            translucent,
        }
    }

    /// Placeholder for a texture that isn't in the table.
    pub fn missing<S: Into<String>>(name: S) -> Texture {
        Texture::new(name, MISSING_TEXTURE_SIZE, MISSING_TEXTURE_SIZE)
    }
}

/// Something that can look up textures by name.
pub trait HasTextures {
    fn get_texture(&self, name: &str) -> Option<&Texture>;

    fn texture_or_missing(&self, name: &str) -> Cow<'_, Texture> {
        match self.get_texture(name) {
            Some(texture) => Cow::Borrowed(texture),
            None => Cow::Owned(Texture::missing(name)),
        }
    }
}

/// A plain table of textures, keyed by name. Lookups ignore case, as WAD names do.
#[derive(Debug, Clone, Default)]
pub struct TextureDictionary {
    textures: HashMap<String, Texture>,
}

impl TextureDictionary {
    pub fn new() -> TextureDictionary {
        TextureDictionary::default()
    }

    pub fn insert(&mut self, texture: Texture) -> Option<Texture> {
        self.textures.insert(texture.name.to_lowercase(), texture)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Texture> {
        self.textures.values()
    }

    /// Lowercased names of every translucent texture, for `update_translucency`.
    pub fn translucent_names(&self) -> HashSet<String> {
        self.textures
            .iter()
            .filter(|(_, t)| t.translucent)
            .map(|(key, _)| key.clone())
            .collect()
    }
}

impl FromIterator<Texture> for TextureDictionary {
    fn from_iter<I: IntoIterator<Item = Texture>>(iter: I) -> TextureDictionary {
        let mut dict = TextureDictionary::new();
        for texture in iter {
            dict.insert(texture);
        }

        dict
    }
}

impl HasTextures for TextureDictionary {
    fn get_texture(&self, name: &str) -> Option<&Texture> {
        self.textures.get(&name.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_textures_are_placeholders() {
        let dict: TextureDictionary = vec![Texture::new("BRICK1", 128, 64), Texture::new("{Fence", 64, 64)]
            .into_iter()
            .collect();

        assert_eq!(dict.get_texture("brick1").map(|t| t.width), Some(128));
        assert_eq!(*dict.texture_or_missing("sky4"), Texture::missing("sky4"));
        assert_eq!(dict.texture_or_missing("sky4").width, MISSING_TEXTURE_SIZE);

        let translucent = dict.translucent_names();
        assert!(translucent.contains("{fence"));
        assert_eq!(translucent.len(), 1);
    }
}
