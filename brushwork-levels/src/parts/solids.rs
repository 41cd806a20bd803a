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

//! Turning the planes of a brush into its faces.

use log::{trace, warn};
use na::Vector3;
use thiserror::Error;

use super::polygons::{Polygon, Renderable, RenderableKind, TextureInfo};
use super::vertices::approx_eq;
use crate::math::combinatorics::{combinations, indices};
use crate::math::{sort_vertices, Plane};
use crate::traits::textures::HasTextures;
use crate::types::{Rgba, Winding};

/// One face record: three points on the plane, and the texture laid on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    pub points: [Vector3<f32>; 3],
    pub texture: TextureInfo,
}

impl Side {
    pub fn plane(&self, winding: Winding) -> Option<Plane> {
        Plane::new(self.points[0], self.points[1], self.points[2], winding)
    }
}

/// A brush that doesn't enclose any volume. Never fatal to a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolidError {
    #[error("solid has {found} usable planes, needs at least 4")]
    TooFewPlanes { found: usize },

    #[error("solid has {found} faces, needs at least 4")]
    TooFewFaces { found: usize },
}

/// A convex brush, as the intersection of the half-spaces behind its sides.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Solid {
    pub sides: Vec<Side>,
}

impl Solid {
    pub fn new(sides: Vec<Side>) -> Solid {
        Solid { sides }
    }

    /// Build one polygon per side that touches the solid's surface.
    pub fn build(
        &self,
        winding: Winding,
        epsilon: f32,
        color: Rgba,
        textures: &dyn HasTextures,
    ) -> Result<Vec<Polygon>, SolidError> {
        let mut planes = Vec::with_capacity(self.sides.len());
        for side in self.sides.iter() {
            match side.plane(winding) {
                Some(plane) => planes.push((plane, side)),
                None => warn!("Skipping side with collinear points {:?}", side.points),
            }
        }

        if planes.len() < 4 {
            return Err(SolidError::TooFewPlanes {
                found: planes.len(),
            });
        }

        let mut corners: Vec<Vec<Vector3<f32>>> = vec![vec![]; planes.len()];
        for combo in combinations(&indices(planes.len()), 3) {
            let point = match Plane::intersect(&planes[combo[0]].0, &planes[combo[1]].0, &planes[combo[2]].0) {
                Some(point) => point,
                None => continue,
            };

            let inside = planes
                .iter()
                .all(|(plane, _)| plane.distance_to(&point) <= epsilon);
            if !inside {
                continue;
            }

            for &i in combo.iter() {
                if !corners[i].iter().any(|c| approx_eq(c, &point, epsilon)) {
                    corners[i].push(point);
                }
            }
        }

        let mut polygons = Vec::with_capacity(planes.len());
        for ((plane, side), points) in planes.iter().zip(corners.iter()) {
            if points.len() < 3 {
                continue;
            }

            let order = sort_vertices(points, &plane.normal, winding);
            if order.len() < 3 {
                warn!(
                    "Dropping face with {} of {} corners in a loop",
                    order.len(),
                    points.len()
                );
                continue;
            }
            let looped: Vec<_> = order.iter().map(|&i| points[i]).collect();

            polygons.push(Polygon::new(
                &looped,
                plane.normal,
                side.texture.clone(),
                color,
                textures,
            ));
        }

        trace!(
            "Built {} faces from {} sides",
            polygons.len(),
            self.sides.len()
        );

        if polygons.len() < 4 {
            return Err(SolidError::TooFewFaces {
                found: polygons.len(),
            });
        }

        Ok(polygons)
    }

    /// As [`Solid::build`], grouped into a brush renderable.
    pub fn to_renderable(
        &self,
        winding: Winding,
        epsilon: f32,
        color: Rgba,
        textures: &dyn HasTextures,
    ) -> Result<Renderable, SolidError> {
        let polygons = self.build(winding, epsilon, color, textures)?;
        Ok(Renderable::new(RenderableKind::Brush, polygons, color))
    }
}
