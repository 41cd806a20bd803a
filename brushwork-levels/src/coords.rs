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

//! Bounding boxes, rigid transforms and coordinate system conversion.

use na::base::Scalar;
use na::{Rotation3, Vector3};
use std::ops::Neg;

pub trait CoordSystem {}

/// X points East, Y points North, Z points upwards. What map documents use.
pub struct MapSystem;
impl CoordSystem for MapSystem {}

/// X points East, Y points upwards, Z points South. What most renderers expect.
pub struct YUpSystem;
impl CoordSystem for YUpSystem {}

pub struct Swizzler;

pub trait SwizzleFromTo<F: CoordSystem, T: CoordSystem> {
    fn swizzle<U: Scalar + Copy + Neg<Output = U>>(vec: &mut Vector3<U>);
}

impl SwizzleFromTo<MapSystem, MapSystem> for Swizzler {
    fn swizzle<U: Scalar + Copy + Neg<Output = U>>(_vec: &mut Vector3<U>) {}
}

impl SwizzleFromTo<MapSystem, YUpSystem> for Swizzler {
    fn swizzle<U: Scalar + Copy + Neg<Output = U>>(vec: &mut Vector3<U>) {
        let temp = vec.y;
        vec.y = vec.z;
        vec.z = -temp;
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Aabb {
        Aabb { min, max }
    }

    /// A zero-sized box at `point`.
    pub fn point(point: Vector3<f32>) -> Aabb {
        Aabb {
            min: point,
            max: point,
        }
    }

    /// The smallest box containing every point, or `None` if there are none.
    pub fn from_points<'a, I: IntoIterator<Item = &'a Vector3<f32>>>(points: I) -> Option<Aabb> {
        let mut iter = points.into_iter();
        let mut aabb = Aabb::point(*iter.next()?);
        for point in iter {
            aabb.add_point(point);
        }

        Some(aabb)
    }

    pub fn add_point(&mut self, point: &Vector3<f32>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    pub fn center(&self) -> Vector3<f32> {
        self.min + (self.max - self.min) / 2.0
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn contains(&self, point: &Vector3<f32>, epsilon: f32) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] - epsilon && point[i] <= self.max[i] + epsilon)
    }
}

/// Rotate `point` about the coordinate origin. Each component of `degrees`
/// is the rotation about that axis; Y is applied first, then Z, then X.
pub fn rotate(point: &Vector3<f32>, degrees: &Vector3<f32>) -> Vector3<f32> {
    rotation_matrix(degrees) * point
}

fn rotation_matrix(degrees: &Vector3<f32>) -> Rotation3<f32> {
    let about_x = Rotation3::from_axis_angle(&Vector3::x_axis(), degrees.x.to_radians());
    let about_y = Rotation3::from_axis_angle(&Vector3::y_axis(), degrees.y.to_radians());
    let about_z = Rotation3::from_axis_angle(&Vector3::z_axis(), degrees.z.to_radians());

    about_x * about_z * about_y
}

/// Scale, then rotation, then translation, all about the coordinate origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    /// Degrees about each axis, see [`rotate`].
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Transform {
        Transform::identity()
    }
}

impl Transform {
    pub fn identity() -> Transform {
        Transform {
            translation: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::repeat(1.0),
        }
    }

    pub fn new(translation: Vector3<f32>, rotation: Vector3<f32>, scale: Vector3<f32>) -> Transform {
        Transform {
            translation,
            rotation,
            scale,
        }
    }

    pub fn translation(translation: Vector3<f32>) -> Transform {
        Transform {
            translation,
            ..Transform::identity()
        }
    }

    pub fn apply(&self, point: &Vector3<f32>) -> Vector3<f32> {
        rotate(&point.component_mul(&self.scale), &self.rotation) + self.translation
    }

    /// Transform a surface normal. Non-uniform scale uses the inverse scale so the normal stays perpendicular.
    pub fn apply_normal(&self, normal: &Vector3<f32>) -> Vector3<f32> {
        let scaled = normal.component_div(&self.scale);
        rotate(&scaled, &self.rotation)
            .try_normalize(f32::EPSILON)
            .unwrap_or(*normal)
    }
}
