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

//! Helpers for reading and writing the numbers stored in key/values.

use na::Vector3;

/// Parse whitespace-separated floats, as used by `origin` and `angles` values.
/// Returns `None` if any component isn't a number.
pub fn parse_floats(value: &str) -> Option<Vec<f32>> {
    value
        .split_whitespace()
        .map(|part| part.parse::<f32>().ok())
        .collect()
}

/// Parse a value like `"128 -64 0"` into a vector.
pub fn parse_vec3(value: &str) -> Option<Vector3<f32>> {
    match parse_floats(value)?.as_slice() {
        [x, y, z] => Some(Vector3::new(*x, *y, *z)),
        _ => None,
    }
}

/// Format a float the way map editors do: no trailing zeros, no `-0`, and
/// rounding noise from rotations removed.
pub fn format_float(value: f32) -> String {
    let rounded = (value as f64 * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }

    format!("{}", rounded as f32)
}

/// Format a vector as three space-separated floats.
pub fn format_vec3(vec: &Vector3<f32>) -> String {
    format!(
        "{} {} {}",
        format_float(vec.x),
        format_float(vec.y),
        format_float(vec.z)
    )
}
