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

//! Face records: `( x y z ) ( x y z ) ( x y z ) texture ...`

use na::{Vector2, Vector3};

use super::tokens::{Token, TokenKind};
use super::SideFormat;
use crate::helpers::format_float;
use crate::parts::data::{Polygon, Side, TextureInfo};
use crate::types::{Location, ParseError, Result};

/// Steps through the tokens of one record.
struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    /// Where an error about the next token should point.
    fn location(&self) -> Location {
        match self.tokens.get(self.pos).or_else(|| self.tokens.last()) {
            Some(token) => token.location(),
            None => Location::default(),
        }
    }

    fn next(&mut self, expected: &str) -> Result<&'a Token> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Ok(token)
            }
            None => Err(ParseError::format(
                self.location(),
                format!("expected {}, found end of input", expected),
            )),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<()> {
        let location = self.location();
        let token = self.next(expected)?;
        if token.kind == kind {
            Ok(())
        } else {
            Err(ParseError::format(
                location,
                format!("expected {}, found {}", expected, describe(&token.kind)),
            ))
        }
    }

    fn number(&mut self) -> Result<f32> {
        let location = self.location();
        match &self.next("a number")?.kind {
            TokenKind::Word(word) => word
                .parse::<f32>()
                .map_err(|_| ParseError::format(location, format!("expected a number, found {:?}", word))),
            other => Err(ParseError::format(
                location,
                format!("expected a number, found {}", describe(other)),
            )),
        }
    }

    fn point(&mut self) -> Result<Vector3<f32>> {
        self.expect(TokenKind::LParen, "'('")?;
        let point = Vector3::new(self.number()?, self.number()?, self.number()?);
        self.expect(TokenKind::RParen, "')'")?;

        Ok(point)
    }

    /// `[ x y z offset ]`
    fn axis(&mut self) -> Result<(Vector3<f32>, f32)> {
        self.expect(TokenKind::LBracket, "'['")?;
        let axis = Vector3::new(self.number()?, self.number()?, self.number()?);
        let offset = self.number()?;
        self.expect(TokenKind::RBracket, "']'")?;

        Ok((axis, offset))
    }
}

pub(crate) fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Open => "block start".to_string(),
        TokenKind::Close => "block end".to_string(),
        TokenKind::Quoted(s) => format!("\"{}\"", s),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::LBracket => "'['".to_string(),
        TokenKind::RBracket => "']'".to_string(),
        TokenKind::Word(s) => format!("{:?}", s),
    }
}

/// Parse the face record starting at `tokens[start]`. Returns the side, its
/// format, and how many tokens it used.
pub fn parse(tokens: &[Token], start: usize) -> Result<(Side, SideFormat, usize)> {
    let mut cursor = Cursor { tokens, pos: start };

    let points = [cursor.point()?, cursor.point()?, cursor.point()?];

    let location = cursor.location();
    let name = match &cursor.next("a texture name")?.kind {
        TokenKind::Word(name) | TokenKind::Quoted(name) => name.clone(),
        other => {
            return Err(ParseError::format(
                location,
                format!("expected a texture name, found {}", describe(other)),
            ))
        }
    };

    let mut texture = TextureInfo::new(name);
    let format = match cursor.peek().map(|t| &t.kind) {
        Some(TokenKind::LBracket) => {
            let (u, u_offset) = cursor.axis()?;
            let (v, v_offset) = cursor.axis()?;
            texture.axes = Some([u, v]);
            texture.offset = Vector2::new(u_offset, v_offset);
            SideFormat::Valve220
        }
        _ => {
            texture.offset = Vector2::new(cursor.number()?, cursor.number()?);
            SideFormat::Standard
        }
    };
    texture.rotation = cursor.number()?;
    texture.scale = Vector2::new(cursor.number()?, cursor.number()?);

    // Surface flags and the like.
    while let Some(TokenKind::Word(word)) = cursor.peek().map(|t| &t.kind) {
        if word.parse::<f32>().is_err() {
            break;
        }
        texture.extra.push(word.clone());
        cursor.pos += 1;
    }

    Ok((Side { points, texture }, format, cursor.pos - start))
}

/// A side that reproduces `polygon`'s plane. Texture axes are filled in from
/// the polygon so the side can be written in either format.
pub fn from_polygon(polygon: &Polygon) -> Option<Side> {
    let positions: Vec<_> = polygon.positions().copied().collect();
    if positions.len() < 3 {
        return None;
    }

    let (p0, p1) = (positions[0], positions[1]);
    let edge = p1 - p0;
    let p2 = positions[2..]
        .iter()
        .copied()
        .max_by(|a, b| {
            let a = edge.cross(&(a - p0)).norm();
            let b = edge.cross(&(b - p0)).norm();
            a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
        })?;

    let mut texture = polygon.texture.clone();
    if texture.axes.is_none() {
        texture.axes = Some(polygon.basis);
    }

    Some(Side {
        points: [p0, p1, p2],
        texture,
    })
}

fn point_text(point: &Vector3<f32>) -> String {
    format!(
        "( {} {} {} )",
        format_float(point.x),
        format_float(point.y),
        format_float(point.z)
    )
}

/// Write `side` as one line, without a line break.
pub fn to_text(side: &Side, format: SideFormat) -> String {
    let texture = &side.texture;
    let mut parts: Vec<String> = side.points.iter().map(point_text).collect();
    parts.push(texture.name.clone());

    match (format, texture.axes) {
        (SideFormat::Valve220, Some([u, v])) => {
            parts.push(format!(
                "[ {} {} {} {} ]",
                format_float(u.x),
                format_float(u.y),
                format_float(u.z),
                format_float(texture.offset.x)
            ));
            parts.push(format!(
                "[ {} {} {} {} ]",
                format_float(v.x),
                format_float(v.y),
                format_float(v.z),
                format_float(texture.offset.y)
            ));
        }
        _ => {
            parts.push(format_float(texture.offset.x));
            parts.push(format_float(texture.offset.y));
        }
    }

    parts.push(format_float(texture.rotation));
    parts.push(format_float(texture.scale.x));
    parts.push(format_float(texture.scale.y));
    parts.extend(texture.extra.iter().cloned());

    parts.join(" ")
}
