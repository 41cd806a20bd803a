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

//! Faces of solids and markers, grouped into renderables.

use std::collections::HashSet;

use na::{Vector2, Vector3};

use super::vertices::Vertex;
use crate::coords::{rotate, Aabb, CoordSystem, MapSystem, SwizzleFromTo, Swizzler, Transform};
use crate::math::signed_area;
use crate::traits::textures::HasTextures;
use crate::types::Rgba;

/// Quake's paraxial texture axes: a face normal, then the S and T axes used
/// for faces closest to it.
const BASE_AXES: [[[f32; 3]; 3]; 6] = [
    // floor
    [[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]],
    // ceiling
    [[0.0, 0.0, -1.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]],
    // west wall
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]],
    // east wall
    [[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]],
    // south wall
    [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]],
    // north wall
    [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]],
];

/// How a texture is laid onto a face, as written in the face record.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    pub name: String,
    pub offset: Vector2<f32>,
    /// Degrees
    pub rotation: f32,
    pub scale: Vector2<f32>,
    /// Explicit S and T axes, from Valve 220 records.
    pub axes: Option<[Vector3<f32>; 2]>,
    /// Trailing fields like Quake 2 surface flags, kept as written.
    pub extra: Vec<String>,
}

impl TextureInfo {
    pub fn new<S: Into<String>>(name: S) -> TextureInfo {
        TextureInfo {
            name: name.into(),
            offset: Vector2::zeros(),
            rotation: 0.0,
            scale: Vector2::repeat(1.0),
            axes: None,
            extra: vec![],
        }
    }

    /// S and T axes for a face with the given normal.
    pub fn basis(&self, normal: &Vector3<f32>) -> [Vector3<f32>; 2] {
        match self.axes {
            Some(axes) => axes,
            None => paraxial_basis(normal, self.rotation),
        }
    }

    fn scale(&self) -> Vector2<f32> {
        let fix = |s: f32| if s == 0.0 { 1.0 } else { s };
        Vector2::new(fix(self.scale.x), fix(self.scale.y))
    }
}

/// The base axes closest to `normal`, rotated by `rotation` degrees.
pub fn paraxial_basis(normal: &Vector3<f32>, rotation: f32) -> [Vector3<f32>; 2] {
    let mut best = 0;
    let mut best_dot = 0.0;
    for (i, axes) in BASE_AXES.iter().enumerate() {
        let dot = normal.dot(&Vector3::from(axes[0]));
        if dot > best_dot {
            best_dot = dot;
            best = i;
        }
    }

    let mut s = Vector3::from(BASE_AXES[best][1]);
    let mut t = Vector3::from(BASE_AXES[best][2]);

    let (sin, cos) = match rotation.rem_euclid(360.0) {
        r if r == 0.0 => (0.0, 1.0),
        r if r == 90.0 => (1.0, 0.0),
        r if r == 180.0 => (0.0, -1.0),
        r if r == 270.0 => (-1.0, 0.0),
        r => r.to_radians().sin_cos(),
    };

    // Rotate within the plane of the two axes' non-zero components.
    let sv = first_nonzero(&s);
    let tv = first_nonzero(&t);
    for axis in [&mut s, &mut t] {
        let ns = cos * axis[sv] - sin * axis[tv];
        let nt = sin * axis[sv] + cos * axis[tv];
        axis[sv] = ns;
        axis[tv] = nt;
    }

    [s, t]
}

fn first_nonzero(vec: &Vector3<f32>) -> usize {
    if vec.x != 0.0 {
        0
    } else if vec.y != 0.0 {
        1
    } else {
        2
    }
}

/// Triangle fan over a loop of `count` vertices, anchored at the first.
pub fn fan_indices(count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(count.saturating_sub(2) * 3);
    for i in 1..count.saturating_sub(1) {
        indices.extend_from_slice(&[0, i as u32, i as u32 + 1]);
    }

    indices
}

/// One convex, planar face.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Wound loop
    pub vertices: Vec<Vertex>,
    /// Triangles over `vertices`
    pub indices: Vec<u32>,
    pub normal: Vector3<f32>,
    pub texture: TextureInfo,
    /// S and T texture axes
    pub basis: [Vector3<f32>; 2],
    pub aabb: Aabb,
}

impl Polygon {
    /// Build a face from an already wound loop and compute its texture coordinates.
    pub fn new(
        positions: &[Vector3<f32>],
        normal: Vector3<f32>,
        texture: TextureInfo,
        color: Rgba,
        textures: &dyn HasTextures,
    ) -> Polygon {
        let vertices = positions
            .iter()
            .map(|p| Vertex {
                color,
                ..Vertex::new(*p, normal)
            })
            .collect();

        let basis = texture.basis(&normal);
        let mut polygon = Polygon {
            indices: fan_indices(positions.len()),
            aabb: bounds(positions),
            vertices,
            normal,
            texture,
            basis,
        };
        polygon.update_textures(textures);

        polygon
    }

    /// Recompute texture coordinates, eg. after the texture table changes.
    pub fn update_textures(&mut self, textures: &dyn HasTextures) {
        let texture = textures.texture_or_missing(&self.texture.name);
        let size = Vector2::new(texture.width.max(1) as f32, texture.height.max(1) as f32);
        let scale = self.texture.scale();

        for vertex in self.vertices.iter_mut() {
            let u = (vertex.position.dot(&self.basis[0]) / scale.x + self.texture.offset.x) / size.x;
            let v = (vertex.position.dot(&self.basis[1]) / scale.y + self.texture.offset.y) / size.y;
            vertex.tex = Vector2::new(u, v);
        }
    }

    /// Texture coordinates are left alone, so textures stay locked to the face.
    pub fn transform(&mut self, transform: &Transform) {
        for vertex in self.vertices.iter_mut() {
            vertex.position = transform.apply(&vertex.position);
            vertex.normal = transform.apply_normal(&vertex.normal);
        }
        self.normal = transform.apply_normal(&self.normal);

        for axis in self.basis.iter_mut() {
            *axis = rotate(axis, &transform.rotation);
        }
        if let Some(axes) = self.texture.axes.as_mut() {
            for axis in axes.iter_mut() {
                *axis = rotate(axis, &transform.rotation);
            }
        }

        self.update_bounds();
    }

    pub fn update_bounds(&mut self) -> Aabb {
        self.aabb = bounds(self.vertices.iter().map(|v| &v.position));
        self.aabb
    }

    /// `translucent` holds lowercase names, as [`TextureDictionary::translucent_names`] returns them.
    ///
    /// [`TextureDictionary::translucent_names`]: crate::traits::TextureDictionary::translucent_names
    pub fn is_translucent(&self, translucent: &HashSet<String>) -> bool {
        translucent.contains(&self.texture.name.to_lowercase())
    }

    pub fn positions(&self) -> impl Iterator<Item = &Vector3<f32>> {
        self.vertices.iter().map(|v| &v.position)
    }

    /// Positive if the loop turns counter-clockwise about the normal.
    pub fn signed_area(&self) -> f32 {
        let positions: Vec<_> = self.positions().copied().collect();
        signed_area(&positions, &self.normal)
    }

    pub fn swizzle_to<D: CoordSystem>(&mut self)
    where
        Swizzler: SwizzleFromTo<MapSystem, D>,
    {
        for vertex in self.vertices.iter_mut() {
            <Swizzler as SwizzleFromTo<MapSystem, D>>::swizzle(&mut vertex.position);
            <Swizzler as SwizzleFromTo<MapSystem, D>>::swizzle(&mut vertex.normal);
        }
        <Swizzler as SwizzleFromTo<MapSystem, D>>::swizzle(&mut self.normal);
        self.update_bounds();
    }
}

fn bounds<'a, I: IntoIterator<Item = &'a Vector3<f32>>>(points: I) -> Aabb {
    Aabb::from_points(points).unwrap_or_else(|| Aabb::point(Vector3::zeros()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderableKind {
    /// Built from a solid in the document. Saved with the map.
    Brush,
    /// Generated to show a point entity. Never saved.
    Marker,
}

/// A group of polygons drawn together: one solid, or one marker shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    pub kind: RenderableKind,
    pub polygons: Vec<Polygon>,
    pub aabb: Aabb,
    pub translucent: bool,
    pub color: Rgba,
}

impl Renderable {
    pub fn new(kind: RenderableKind, polygons: Vec<Polygon>, color: Rgba) -> Renderable {
        let mut renderable = Renderable {
            kind,
            polygons,
            aabb: Aabb::point(Vector3::zeros()),
            translucent: false,
            color,
        };
        renderable.update_bounds();

        renderable
    }

    pub fn is_brush(&self) -> bool {
        self.kind == RenderableKind::Brush
    }

    pub fn update_bounds(&mut self) -> Aabb {
        let mut polygons = self.polygons.iter_mut();
        if let Some(first) = polygons.next() {
            let mut aabb = first.update_bounds();
            for polygon in polygons {
                aabb = aabb.union(&polygon.update_bounds());
            }
            self.aabb = aabb;
        }

        self.aabb
    }

    pub fn transform(&mut self, transform: &Transform) {
        for polygon in self.polygons.iter_mut() {
            polygon.transform(transform);
        }
        self.update_bounds();
    }

    pub fn update_textures(&mut self, textures: &dyn HasTextures) {
        for polygon in self.polygons.iter_mut() {
            polygon.update_textures(textures);
        }
    }

    /// Mark translucency and move translucent polygons after opaque ones.
    pub fn update_translucency(&mut self, translucent: &HashSet<String>) -> bool {
        let (opaque, clear): (Vec<Polygon>, Vec<Polygon>) = self
            .polygons
            .drain(..)
            .partition(|p| !p.is_translucent(translucent));

        self.translucent = !clear.is_empty();
        self.polygons = opaque;
        self.polygons.extend(clear);

        self.translucent
    }

    pub fn swizzle_to<D: CoordSystem>(&mut self)
    where
        Swizzler: SwizzleFromTo<MapSystem, D>,
    {
        for polygon in self.polygons.iter_mut() {
            polygon.swizzle_to::<D>();
        }
        self.update_bounds();
    }
}
