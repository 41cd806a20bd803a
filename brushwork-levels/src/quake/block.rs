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

//! Delimited blocks: the syntax tree of a map document.

use std::fmt;

use super::side;
use super::tokens::{tokenize, Token, TokenKind};
use super::SideFormat;
use crate::parts::data::Side;
use crate::types::{Location, ParseError, Result};

/// One delimited block. Entities have key/values; brushes have only sides.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub key_values: Vec<(String, String)>,
    pub children: Vec<Block>,
    pub sides: Vec<Side>,

    /// Format of the first side in this block or its children
    pub side_format: Option<SideFormat>,

    /// Where the block opened
    pub location: Location,
}

impl Block {
    /// Whether this block describes an entity rather than a brush.
    pub fn is_entity(&self) -> bool {
        !self.key_values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.key_values
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parse the block opening at `tokens[start]`. Returns the block and how
    /// many tokens it used, delimiters included.
    pub fn parse(tokens: &[Token], start: usize) -> Result<(Block, usize)> {
        let opener = match tokens.get(start) {
            Some(token) if token.kind == TokenKind::Open => token,
            Some(token) => {
                return Err(ParseError::format(
                    token.location(),
                    format!("expected block start, found {}", side::describe(&token.kind)),
                ))
            }
            None => {
                return Err(ParseError::format(
                    Location::default(),
                    "expected block start, found end of input",
                ))
            }
        };

        let mut block = Block {
            location: opener.location(),
            ..Block::default()
        };

        let mut i = start + 1;
        loop {
            let token = match tokens.get(i) {
                Some(token) => token,
                None => return Err(ParseError::format(block.location.clone(), "block is never closed")),
            };

            match &token.kind {
                TokenKind::Close => return Ok((block, i - start + 1)),
                TokenKind::Open => {
                    let (child, used) = Block::parse(tokens, i)?;
                    if block.side_format.is_none() {
                        block.side_format = child.side_format;
                    }
                    block.children.push(child);
                    i += used;
                }
                TokenKind::LParen => {
                    let (side, format, used) = side::parse(tokens, i)?;
                    block.side_format.get_or_insert(format);
                    block.sides.push(side);
                    i += used;
                }
                TokenKind::Quoted(key) => match tokens.get(i + 1).map(|t| &t.kind) {
                    Some(TokenKind::Quoted(value)) => {
                        block.key_values.push((key.clone(), value.clone()));
                        i += 2;
                    }
                    _ => {
                        return Err(ParseError::format(
                            token.location(),
                            format!("key \"{}\" has no value", key),
                        ))
                    }
                },
                other => {
                    return Err(ParseError::format(
                        token.location(),
                        format!("unexpected {}", side::describe(other)),
                    ))
                }
            }
        }
    }

    /// Parse a whole document into its top-level blocks.
    pub fn parse_all(text: &str, open: char, close: char) -> Result<Vec<Block>> {
        let tokens = tokenize(text, open, close)?;

        let mut blocks = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let (block, used) = Block::parse(&tokens, i)?;
            blocks.push(block);
            i += used;
        }

        Ok(blocks)
    }

    /// Write this block with the given delimiters and face format.
    pub fn to_text(&self, open: char, close: char, format: SideFormat) -> String {
        let mut out = String::new();
        self.write(&mut out, open, close, format);
        out
    }

    fn write(&self, out: &mut String, open: char, close: char, format: SideFormat) {
        out.push(open);
        out.push('\n');
        for (key, value) in self.key_values.iter() {
            out.push_str(&format!("\"{}\" \"{}\"\n", key, value));
        }
        for side in self.sides.iter() {
            out.push_str(&side::to_text(side, format));
            out.push('\n');
        }
        for child in self.children.iter() {
            child.write(out, open, close, format);
        }
        out.push(close);
        out.push('\n');
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let format = self.side_format.unwrap_or_default();
        f.write_str(&self.to_text('{', '}', format))
    }
}
