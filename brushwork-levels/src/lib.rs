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

//! Parses brush-based map documents into convex solids and entity trees.
//!
//! A document is read into a [`quake::QuakeMap`]: a list of root
//! [`parts::MapObject`]s, one of which is the world. Brushes become
//! [`parts::data::Renderable`]s with wound, textured polygons; instance
//! entities pull in transformed copies of other documents. The tree can be
//! transformed, renamed, pruned and collapsed, then written back out.
//!
//! Entity classes and textures come from the host, through
//! [`traits::HasDefinitions`] and [`traits::HasTextures`].

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate derive_builder;
extern crate nalgebra as na;

pub mod config;
pub mod coords;
pub mod helpers;
pub mod math;
pub mod parts;
pub mod quake;
pub mod traits;
pub mod types;

/// Everything needed to load and walk a document.
pub mod prelude {
    pub use crate::config::{LoadConfig, LoadConfigBuilder};
    pub use crate::coords::{Aabb, MapSystem, Transform, YUpSystem};
    pub use crate::parts::data::{Polygon, Renderable, Vertex};
    pub use crate::parts::{FixUpStyle, MapObject};
    pub use crate::quake::{QuakeMap, SideFormat};
    pub use crate::traits::*;
    pub use crate::types::{ParseError, Rgba, Winding};
}
