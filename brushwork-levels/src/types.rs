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

//! Various types used in parsed map documents.

use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA Colour (0-255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Rgba {
        Rgba { r, g, b, a }
    }

    /// 255, 255, 255, 255
    pub const fn white() -> Rgba {
        Rgba::new(255, 255, 255, 255)
    }

    pub const fn orange() -> Rgba {
        Rgba::new(255, 165, 0, 255)
    }

    pub const fn lime() -> Rgba {
        Rgba::new(0, 255, 0, 255)
    }

    pub const fn red() -> Rgba {
        Rgba::new(255, 0, 0, 255)
    }

    pub const fn magenta() -> Rgba {
        Rgba::new(255, 0, 255, 255)
    }

    /// Interpret the given bytes as an RGBA colour.
    pub fn from_bytes(bytes: [u8; 4]) -> Rgba {
        Rgba::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

impl Default for Rgba {
    fn default() -> Rgba {
        Rgba::white()
    }
}

/// The order in which a document lists the points of a face, as seen from outside the solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winding {
    /// Clockwise. What Quake-family editors write.
    Cw,
    /// Counter-clockwise.
    Ccw,
}

impl Default for Winding {
    fn default() -> Winding {
        Winding::Cw
    }
}

/// Where in a document something went wrong.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: Option<PathBuf>,
    /// 1-based
    pub line: usize,
    /// 1-based, in characters
    pub column: usize,
    /// Byte offset from the start of the document
    pub offset: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}:{}:{}", path.display(), self.line, self.column),
            None => write!(f, "<input>:{}:{}", self.line, self.column),
        }
    }
}

/// An error encountered while parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Unbalanced delimiters, bad numbers and other malformed text.
    #[error("{location}: {message}")]
    Format { location: Location, message: String },

    #[error("{}: no root entity", display_path(.path))]
    MissingRootEntity { path: Option<PathBuf> },

    #[error("instance cycle: {}", display_chain(.chain))]
    CyclicInstance { chain: Vec<PathBuf> },

    #[error("couldn't read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ParseError {
    pub(crate) fn format<S: Into<String>>(location: Location, message: S) -> ParseError {
        ParseError::Format {
            location,
            message: message.into(),
        }
    }

    /// Attach a document path to an error that doesn't have one yet.
    pub fn with_path(self, path: PathBuf) -> ParseError {
        match self {
            ParseError::Format {
                mut location,
                message,
            } => {
                if location.path.is_none() {
                    location.path = Some(path);
                }
                ParseError::Format { location, message }
            }
            ParseError::MissingRootEntity { path: None } => {
                ParseError::MissingRootEntity { path: Some(path) }
            }
            other => other,
        }
    }

    /// The document the error was found in, if known.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ParseError::Format { location, .. } => location.path.as_ref(),
            ParseError::MissingRootEntity { path } => path.as_ref(),
            ParseError::CyclicInstance { chain } => chain.last(),
            ParseError::Io { path, .. } => Some(path),
        }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "<input>".to_string(),
    }
}

fn display_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<String>>()
        .join(" -> ")
}

/// Standard result type.
pub type Result<T> = std::result::Result<T, ParseError>;
