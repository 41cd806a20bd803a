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

//! Ordering the corners of a planar convex polygon into a loop.

use na::Vector3;

use super::combinatorics::{indices, permutations};
use crate::coords::Aabb;
use crate::types::Winding;

/// Angle from `a` to `b` in degrees, positive when counter-clockwise about `normal`.
pub fn signed_angle(a: &Vector3<f32>, b: &Vector3<f32>, normal: &Vector3<f32>) -> f32 {
    let y = normal.dot(&a.cross(b));
    let x = a.dot(b);

    y.atan2(x).to_degrees()
}

/// Order `points`, which must lie in one plane with the given `normal`, into a
/// convex loop. Returns indices into `points`; the first point is always first.
///
/// Starting from the first point, each step moves to the unvisited point with
/// the smallest counter-clockwise turn about the centre of the points' bounding
/// box, measured in `(0, 360]`. Ties go to the lowest index. Every point is
/// placed, including the half turn across the centre that a right triangle
/// needs. The loop turns counter-clockwise about `normal`, and is reversed for
/// [`Winding::Cw`].
pub fn sort_vertices(points: &[Vector3<f32>], normal: &Vector3<f32>, winding: Winding) -> Vec<usize> {
    if points.is_empty() {
        return vec![];
    }

    let center = match Aabb::from_points(points) {
        Some(aabb) => aabb.center(),
        None => return vec![],
    };

    // angles[from][to], as a counter-clockwise turn.
    let mut angles = vec![vec![0.0; points.len()]; points.len()];
    for pair in permutations(&indices(points.len()), 2) {
        let a = points[pair[0]] - center;
        let b = points[pair[1]] - center;

        let angle = signed_angle(&a, &b, normal);
        angles[pair[0]][pair[1]] = if angle > 0.0 { angle } else { angle + 360.0 };
    }

    let mut visited = vec![false; points.len()];
    let mut sorted = Vec::with_capacity(points.len());

    let mut current = 0;
    visited[0] = true;
    sorted.push(0);

    while sorted.len() < points.len() {
        let mut next = None;
        let mut smallest = f32::INFINITY;
        for (candidate, &angle) in angles[current].iter().enumerate() {
            if !visited[candidate] && angle < smallest {
                smallest = angle;
                next = Some(candidate);
            }
        }

        match next {
            Some(next) => {
                visited[next] = true;
                sorted.push(next);
                current = next;
            }
            None => break,
        }
    }

    if winding == Winding::Cw {
        sorted[1..].reverse();
    }

    sorted
}

/// `normal · Σ (vᵢ × vᵢ₊₁)`. Positive for a loop that turns counter-clockwise about `normal`.
pub fn signed_area(points: &[Vector3<f32>], normal: &Vector3<f32>) -> f32 {
    let mut total = Vector3::zeros();
    for (i, point) in points.iter().enumerate() {
        let next = &points[(i + 1) % points.len()];
        total += point.cross(next);
    }

    normal.dot(&total) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vector3<f32>> {
        // Deliberately out of order.
        vec![
            Vector3::new(-16.0, -16.0, 16.0),
            Vector3::new(16.0, 16.0, 16.0),
            Vector3::new(16.0, -16.0, 16.0),
            Vector3::new(-16.0, 16.0, 16.0),
        ]
    }

    #[test]
    fn signed_angle_sign_follows_normal() {
        let up = Vector3::z();

        assert!((signed_angle(&Vector3::x(), &Vector3::y(), &up) - 90.0).abs() < 1e-4);
        assert!((signed_angle(&Vector3::y(), &Vector3::x(), &up) + 90.0).abs() < 1e-4);
        assert!((signed_angle(&Vector3::x(), &-Vector3::x(), &up).abs() - 180.0).abs() < 1e-4);
    }

    #[test]
    fn ccw_loop_turns_positive() {
        let points = square();
        let order = sort_vertices(&points, &Vector3::z(), Winding::Ccw);

        assert_eq!(order, vec![0, 2, 1, 3]);

        let looped: Vec<_> = order.iter().map(|&i| points[i]).collect();
        assert!(signed_area(&looped, &Vector3::z()) > 0.0);
    }

    #[test]
    fn cw_loop_is_reversed_with_same_start() {
        let points = square();
        let order = sort_vertices(&points, &Vector3::z(), Winding::Cw);

        assert_eq!(order, vec![0, 3, 1, 2]);

        let looped: Vec<_> = order.iter().map(|&i| points[i]).collect();
        assert!(signed_area(&looped, &Vector3::z()) < 0.0);
    }

    #[test]
    fn right_triangles_keep_every_corner() {
        // The bounding box centre lies on the hypotenuse, half a turn between its ends.
        for &(sx, sy) in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)].iter() {
            let points = vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(64.0 * sx, 0.0, 0.0),
                Vector3::new(0.0, 64.0 * sy, 0.0),
            ];

            for &winding in [Winding::Cw, Winding::Ccw].iter() {
                let order = sort_vertices(&points, &Vector3::z(), winding);
                assert_eq!(order.len(), 3, "({}, {}) {:?}", sx, sy, winding);

                let looped: Vec<_> = order.iter().map(|&i| points[i]).collect();
                let area = signed_area(&looped, &Vector3::z());
                match winding {
                    Winding::Ccw => assert!(area > 0.0),
                    Winding::Cw => assert!(area < 0.0),
                }
            }
        }
    }

    #[test]
    fn every_point_is_used_once() {
        let points: Vec<_> = (0..7)
            .map(|i| {
                let a = (i as f32 * 3.0 * 360.0 / 7.0).to_radians();
                Vector3::new(a.cos() * 64.0, 0.0, a.sin() * 64.0)
            })
            .collect();

        let mut order = sort_vertices(&points, &Vector3::y(), Winding::Ccw);
        assert_eq!(order[0], 0);

        order.sort_unstable();
        assert_eq!(order, (0..7).collect::<Vec<_>>());
    }
}
