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

//! Reading and writing Quake-family `.map` documents

use serde::{Deserialize, Serialize};

pub mod block;
pub mod file;
pub(crate) mod object;
pub mod side;
pub mod tokens;

pub use self::block::Block;
pub use self::file::QuakeMap;

/// How face records lay out their texture parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideFormat {
    /// `tex offX offY rot scaleX scaleY`
    Standard,
    /// `tex [ ux uy uz offX ] [ vx vy vz offY ] rot scaleX scaleY`
    Valve220,
}

impl Default for SideFormat {
    fn default() -> SideFormat {
        SideFormat::Standard
    }
}
