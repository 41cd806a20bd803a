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

//! Stand-in shapes for entities that have no solids of their own.

use na::Vector3;

use super::polygons::{Polygon, Renderable, RenderableKind, TextureInfo};
use crate::coords::Aabb;
use crate::math::sort_vertices;
use crate::traits::textures::TextureDictionary;
use crate::types::{Rgba, Winding};

/// Edge length of the box drawn at an instance's origin.
pub const INSTANCE_BOX_SIZE: f32 = 16.0;

/// Distance from a gem's centre to each of its points.
pub const GEM_RADIUS: f32 = 8.0;

/// Texture name given to marker faces.
pub const MARKER_TEXTURE: &str = "__marker";

fn face(points: &[Vector3<f32>], normal: Vector3<f32>, color: Rgba, winding: Winding) -> Polygon {
    let order = sort_vertices(points, &normal, winding);
    let looped: Vec<_> = order.iter().map(|&i| points[i]).collect();

    Polygon::new(
        &looped,
        normal,
        TextureInfo::new(MARKER_TEXTURE),
        color,
        &TextureDictionary::new(),
    )
}

/// A box filling `aabb`.
pub fn cuboid(aabb: &Aabb, color: Rgba, winding: Winding) -> Renderable {
    let (min, max) = (aabb.min, aabb.max);
    let corner = |x: bool, y: bool, z: bool| {
        Vector3::new(
            if x { max.x } else { min.x },
            if y { max.y } else { min.y },
            if z { max.z } else { min.z },
        )
    };

    let mut polygons = Vec::with_capacity(6);
    for axis in 0..3 {
        for &high in [false, true].iter() {
            let mut normal = Vector3::zeros();
            normal[axis] = if high { 1.0 } else { -1.0 };

            let points: Vec<_> = [(false, false), (true, false), (true, true), (false, true)]
                .iter()
                .map(|&(a, b)| match axis {
                    0 => corner(high, a, b),
                    1 => corner(a, high, b),
                    _ => corner(a, b, high),
                })
                .collect();

            polygons.push(face(&points, normal, color, winding));
        }
    }

    Renderable::new(RenderableKind::Marker, polygons, color)
}

/// A cube of edge `size` centred on `center`.
pub fn cube(center: &Vector3<f32>, size: f32, color: Rgba, winding: Winding) -> Renderable {
    let half = Vector3::repeat(size / 2.0);
    cuboid(&Aabb::new(center - half, center + half), color, winding)
}

/// An octahedron centred on `center`.
pub fn gem(center: &Vector3<f32>, color: Rgba, winding: Winding) -> Renderable {
    let mut polygons = Vec::with_capacity(8);
    for &sx in [-1.0f32, 1.0].iter() {
        for &sy in [-1.0f32, 1.0].iter() {
            for &sz in [-1.0f32, 1.0].iter() {
                let points = [
                    center + Vector3::new(sx * GEM_RADIUS, 0.0, 0.0),
                    center + Vector3::new(0.0, sy * GEM_RADIUS, 0.0),
                    center + Vector3::new(0.0, 0.0, sz * GEM_RADIUS),
                ];
                let normal = Vector3::new(sx, sy, sz).normalize();

                polygons.push(face(&points, normal, color, winding));
            }
        }
    }

    Renderable::new(RenderableKind::Marker, polygons, color)
}
