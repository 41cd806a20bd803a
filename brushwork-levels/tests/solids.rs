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

#[macro_use]
mod helpers;

use brushwork_levels::math::Plane;
use brushwork_levels::parts::data::{Side, Solid, TextureInfo};
use brushwork_levels::prelude::*;
use helpers::*;

fn side(p0: [f32; 3], p1: [f32; 3], p2: [f32; 3]) -> Side {
    Side {
        points: [Vector3::from(p0), Vector3::from(p1), Vector3::from(p2)],
        texture: TextureInfo::new("base"),
    }
}

/// A 64 unit box with its top sloping down towards +x.
fn sloped_box() -> Solid {
    Solid::new(vec![
        side([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        side([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
        side([64.0, 64.0, 0.0], [65.0, 64.0, 0.0], [64.0, 64.0, 1.0]),
        side([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        side([64.0, 0.0, 0.0], [64.0, 0.0, 1.0], [64.0, 1.0, 0.0]),
        side([0.0, 0.0, 64.0], [0.0, 1.0, 64.0], [64.0, 0.0, 32.0]),
    ])
}

/// A face record through `a`, `b` and `c`, ordered so its normal faces `out`.
fn face(a: Vector3, b: Vector3, c: Vector3, out: Vector3, winding: Winding) -> String {
    let cw_normal = (c - a).cross(&(b - a));
    let (b, c) = if cw_normal.dot(&out) > 0.0 { (b, c) } else { (c, b) };
    let (b, c) = match winding {
        Winding::Cw => (b, c),
        Winding::Ccw => (c, b),
    };

    let point = |p: Vector3| format!("( {} {} {} )", p.x, p.y, p.z);
    format!("{} {} {} base 0 0 0 1 1", point(a), point(b), point(c))
}

/// A ramp brush: a right-triangle prism with the slope facing `+x +z`.
fn ramp(winding: Winding) -> String {
    let o = Vector3::new(0.0, 0.0, 0.0);
    let x = Vector3::new(64.0, 0.0, 0.0);
    let z = Vector3::new(0.0, 0.0, 64.0);
    let deep = Vector3::new(0.0, 32.0, 0.0);

    let faces = [
        face(o, x, o + deep, -Vector3::z(), winding),
        face(o, z, o + deep, -Vector3::x(), winding),
        face(x, z, x + deep, Vector3::new(1.0, 0.0, 1.0), winding),
        face(o, x, z, -Vector3::y(), winding),
        face(o + deep, x + deep, z + deep, Vector3::y(), winding),
    ];
    format!("{{\n{}\n}}", faces.join("\n"))
}

#[test]
fn ramp_has_triangle_ends() {
    for &winding in [Winding::Cw, Winding::Ccw].iter() {
        let config = LoadConfigBuilder::default().winding(winding).build().unwrap();
        let map = parse_with(&world(&[ramp(winding)]), &config).unwrap();

        let brush = &map.world().unwrap().renderables[0];
        assert!(brush.polygons.iter().all(|p| p.vertices.len() >= 3));

        let mut counts: Vec<_> = brush.polygons.iter().map(|p| p.vertices.len()).collect();
        counts.sort_unstable();
        assert_eq!(counts, vec![3, 3, 4, 4, 4]);
        assert_eq!(brush.aabb.max, Vector3::new(64.0, 32.0, 64.0));
    }
}

#[test]
fn ccw_cube_has_six_quads() {
    let config = LoadConfigBuilder::default()
        .winding(Winding::Ccw)
        .build()
        .unwrap();
    let text = world(&[box_brush([-16.0; 3], [16.0; 3], "base", Winding::Ccw)]);
    let map = parse_with(&text, &config).unwrap();

    let brush = &map.world().unwrap().renderables[0];
    assert_eq!(brush.polygons.len(), 6);
    assert!(brush.polygons.iter().all(|p| p.vertices.len() == 4));
    assert_eq!(brush.aabb.min, Vector3::repeat(-16.0));
    assert_eq!(brush.aabb.max, Vector3::repeat(16.0));
    assert!(brush.polygons.iter().all(|p| p.signed_area() > 0.0));
}

#[test]
fn vertices_are_inside_every_plane() {
    let solid = sloped_box();
    let polygons = solid
        .build(Winding::Cw, 0.01, Rgba::white(), &TextureDictionary::new())
        .unwrap();
    assert_eq!(polygons.len(), 6);

    let planes: Vec<Plane> = solid
        .sides
        .iter()
        .map(|s| s.plane(Winding::Cw).unwrap())
        .collect();

    for polygon in polygons.iter() {
        for position in polygon.positions() {
            for plane in planes.iter() {
                assert!(plane.distance_to(position) <= 0.01, "{:?} outside {:?}", position, plane);
            }
        }
    }
}

#[test]
fn polygons_are_planar() {
    let solid = sloped_box();
    let polygons = solid
        .build(Winding::Cw, 0.01, Rgba::white(), &TextureDictionary::new())
        .unwrap();

    for polygon in polygons.iter() {
        assert!(polygon.vertices.len() >= 3);
        let first = polygon.vertices[0].position;
        for position in polygon.positions() {
            assert!(polygon.normal.dot(&(position - first)).abs() <= 0.01);
        }
    }

    let mut counts: Vec<_> = polygons.iter().map(|p| p.vertices.len()).collect();
    counts.sort_unstable();
    assert_eq!(counts, vec![4, 4, 4, 4, 4, 4]);
}

#[test]
fn winding_sign_is_uniform() {
    let solid = sloped_box();
    let textures = TextureDictionary::new();

    let cw = solid.build(Winding::Cw, 0.01, Rgba::white(), &textures).unwrap();
    assert!(cw.iter().all(|p| p.signed_area() < 0.0));

    let map = parse_with(
        &world(&[box_brush([0.0; 3], [32.0, 8.0, 8.0], "base", Winding::Ccw)]),
        &LoadConfigBuilder::default().winding(Winding::Ccw).build().unwrap(),
    )
    .unwrap();
    let ccw = &map.world().unwrap().renderables[0].polygons;
    assert!(ccw.iter().all(|p| p.signed_area() > 0.0));
}

#[test]
fn near_parallel_planes_do_not_meet() {
    let tilt = 0.0005_f32.to_radians().tan();
    let a = Plane::new(
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Winding::Cw,
    )
    .unwrap();
    let b = Plane::new(
        Vector3::new(0.0, 0.0, 16.0),
        Vector3::new(0.0, 1.0, 16.0),
        Vector3::new(1.0, 0.0, 16.0 + tilt),
        Winding::Cw,
    )
    .unwrap();
    let c = Plane::new(
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(1.0, 0.0, 0.0),
        Winding::Cw,
    )
    .unwrap();

    assert_eq!(Plane::intersect(&a, &b, &c), None);
}

#[test]
fn open_solid_is_reported() {
    let solid = Solid::new(sloped_box().sides.into_iter().take(5).collect());
    assert!(solid
        .build(Winding::Cw, 0.01, Rgba::white(), &TextureDictionary::new())
        .is_err());
}
