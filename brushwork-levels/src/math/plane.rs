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

//! Planes defined by three points, as written in face records.

use na::Vector3;

use crate::types::Winding;

/// Below this, three normals don't meet at a single point.
pub const PARALLEL_EPSILON: f32 = 0.001;

/// A face plane. The normal points out of the solid for either winding.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub points: [Vector3<f32>; 3],
    pub winding: Winding,

    /// Unit normal
    pub normal: Vector3<f32>,

    /// Distance from origin to plane along normal
    pub dist: f32,
}

impl Plane {
    /// Returns `None` if the points are collinear or coincident.
    pub fn new(p0: Vector3<f32>, p1: Vector3<f32>, p2: Vector3<f32>, winding: Winding) -> Option<Plane> {
        let mut a = p2 - p0;
        let mut b = p1 - p0;

        if winding == Winding::Ccw {
            std::mem::swap(&mut a, &mut b);
        }

        let normal = a.cross(&b).try_normalize(f32::EPSILON)?;

        Some(Plane {
            points: [p0, p1, p2],
            winding,
            normal,
            dist: p0.dot(&normal),
        })
    }

    /// Signed distance of `point` in front of the plane. Negative is behind, ie. inside the solid.
    pub fn distance_to(&self, point: &Vector3<f32>) -> f32 {
        self.normal.dot(point) - self.dist
    }

    /// The single point shared by three planes, or `None` if any two are (nearly) parallel.
    pub fn intersect(a: &Plane, b: &Plane, c: &Plane) -> Option<Vector3<f32>> {
        let bc = b.normal.cross(&c.normal);
        let denom = a.normal.dot(&bc);

        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let ca = c.normal.cross(&a.normal);
        let ab = a.normal.cross(&b.normal);

        Some((bc * a.dist + ca * b.dist + ab * c.dist) / denom)
    }
}
