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

//! Settings used while loading a document.

use serde::{Deserialize, Serialize};

use crate::quake::SideFormat;
use crate::types::Winding;

/// How to read, compose and write map documents.
///
/// Hosts usually build this with [`LoadConfigBuilder`], or deserialize it from
/// whatever settings format they already use.
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(default)]
#[serde(default)]
pub struct LoadConfig {
    /// Point order of face records.
    pub winding: Winding,

    pub open_delimiter: char,
    pub close_delimiter: char,

    /// Tolerance for deciding a point is on or behind a plane, and for merging vertices.
    pub epsilon: f32,

    /// Class name of the mandatory root entity.
    #[builder(setter(into))]
    pub world_class: String,

    /// File extension an instance path needs before it's loaded, without the dot.
    #[builder(setter(into))]
    pub instance_extension: String,

    /// Used to build `{text}{counter}` names for instances without a fixup name.
    #[builder(setter(into))]
    pub default_fixup_text: String,

    /// Face format to write. `None` keeps whatever the document was read as.
    #[builder(setter(strip_option))]
    pub side_format: Option<SideFormat>,
}

impl Default for LoadConfig {
    fn default() -> LoadConfig {
        LoadConfig {
            winding: Winding::Cw,
            open_delimiter: '{',
            close_delimiter: '}',
            epsilon: 0.01,
            world_class: "worldspawn".to_string(),
            instance_extension: "map".to_string(),
            default_fixup_text: "InstanceAuto".to_string(),
            side_format: None,
        }
    }
}

impl LoadConfig {
    /// Whether `path` has the configured instance extension. Case insensitive.
    pub fn is_instance_path(&self, path: &str) -> bool {
        std::path::Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case(&self.instance_extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_unset_defaults() {
        let config = LoadConfigBuilder::default()
            .winding(Winding::Ccw)
            .default_fixup_text("unit")
            .build()
            .unwrap();

        assert_eq!(config.winding, Winding::Ccw);
        assert_eq!(config.default_fixup_text, "unit");
        assert_eq!(config.world_class, "worldspawn");
        assert_eq!(config.open_delimiter, '{');
        assert_eq!(config.side_format, None);
    }

    #[test]
    fn instance_paths_match_extension() {
        let config = LoadConfig::default();

        assert!(config.is_instance_path("prefabs/door.map"));
        assert!(config.is_instance_path("DOOR.MAP"));
        assert!(!config.is_instance_path("progs/player.mdl"));
        assert!(!config.is_instance_path("map"));
    }
}
