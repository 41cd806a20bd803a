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

#![allow(dead_code, unused_macros)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use brushwork_levels::prelude::*;
use brushwork_levels::types::Result;

macro_rules! map(
    { $($key:expr => $value:expr),* } => {
        {
            let mut m = ::std::collections::HashMap::new();
            $(
                m.insert($key, $value);
            )*
            m
        }
    };
);

fn point(p: [f32; 3]) -> String {
    format!("( {} {} {} )", p[0], p[1], p[2])
}

/// Face records for an axis-aligned box, listed in the given winding.
pub fn box_sides(min: [f32; 3], max: [f32; 3], texture: &str, winding: Winding) -> Vec<String> {
    let [x0, y0, z0] = min;
    let [x1, y1, z1] = max;

    // Clockwise from outside: p0, p1, p2 with (p2 - p0) x (p1 - p0) pointing out.
    let faces = [
        [[x0, y0, z0], [x0, y0 + 1.0, z0], [x0, y0, z0 + 1.0]],
        [[x1, y1, z1], [x1, y1, z1 + 1.0], [x1, y1 + 1.0, z1]],
        [[x0, y0, z0], [x0, y0, z0 + 1.0], [x0 + 1.0, y0, z0]],
        [[x1, y1, z1], [x1 + 1.0, y1, z1], [x1, y1, z1 + 1.0]],
        [[x0, y0, z0], [x0 + 1.0, y0, z0], [x0, y0 + 1.0, z0]],
        [[x1, y1, z1], [x1, y1 + 1.0, z1], [x1 + 1.0, y1, z1]],
    ];

    faces
        .iter()
        .map(|[p0, p1, p2]| {
            let (p1, p2) = match winding {
                Winding::Cw => (p1, p2),
                Winding::Ccw => (p2, p1),
            };
            format!("{} {} {} {} 0 0 0 1 1", point(*p0), point(*p1), point(*p2), texture)
        })
        .collect()
}

/// A brush block for an axis-aligned box.
pub fn box_brush(min: [f32; 3], max: [f32; 3], texture: &str, winding: Winding) -> String {
    format!("{{\n{}\n}}", box_sides(min, max, texture, winding).join("\n"))
}

/// A cube of side `2 * half` centred on the origin, clockwise.
pub fn cube_brush(half: f32) -> String {
    box_brush([-half; 3], [half; 3], "base", Winding::Cw)
}

/// An entity block. `classname` is written first.
pub fn entity(class_name: &str, key_values: &HashMap<&str, &str>, brushes: &[String]) -> String {
    let mut keys: Vec<_> = key_values.iter().collect();
    keys.sort();

    let mut lines = vec![format!("\"classname\" \"{}\"", class_name)];
    lines.extend(keys.iter().map(|(k, v)| format!("\"{}\" \"{}\"", k, v)));
    lines.extend(brushes.iter().cloned());

    format!("{{\n{}\n}}\n", lines.join("\n"))
}

pub fn world(brushes: &[String]) -> String {
    entity("worldspawn", &HashMap::new(), brushes)
}

/// Show warnings from the parser. Only the first call in a test binary does anything.
pub fn init_logging() {
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .init();
}

pub fn parse_with(text: &str, config: &LoadConfig) -> Result<QuakeMap> {
    init_logging();
    QuakeMap::parse(
        text,
        &DefinitionDictionary::quake(),
        &TextureDictionary::new(),
        config,
    )
}

pub fn parse(text: &str) -> Result<QuakeMap> {
    parse_with(text, &LoadConfig::default())
}

pub fn open(path: &Path) -> Result<QuakeMap> {
    init_logging();
    QuakeMap::open(
        path,
        &DefinitionDictionary::quake(),
        &TextureDictionary::new(),
        &LoadConfig::default(),
    )
}

/// Write `text` to `dir/name`, returning the path.
pub fn write_map(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

pub fn assert_near(a: &Vector3, b: &Vector3, epsilon: f32) {
    assert!((a - b).norm() <= epsilon, "{:?} != {:?}", a, b);
}

pub type Vector3 = nalgebra::Vector3<f32>;
