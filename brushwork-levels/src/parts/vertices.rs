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

use crate::types::Rgba;
use na::{Vector2, Vector3};

/// A corner of a polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub tex: Vector2<f32>,
    pub color: Rgba,
}

impl Vertex {
    pub fn new(position: Vector3<f32>, normal: Vector3<f32>) -> Vertex {
        Vertex {
            position,
            normal,
            tex: Vector2::zeros(),
            color: Rgba::white(),
        }
    }

    /// Whether the positions are within `epsilon` of each other on every axis.
    pub fn approx_eq(&self, other: &Vertex, epsilon: f32) -> bool {
        approx_eq(&self.position, &other.position, epsilon)
    }
}

/// Whether two points are within `epsilon` of each other on every axis.
pub fn approx_eq(a: &Vector3<f32>, b: &Vector3<f32>, epsilon: f32) -> bool {
    (a - b).amax() <= epsilon
}
