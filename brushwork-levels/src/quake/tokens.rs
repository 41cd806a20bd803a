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

//! Splitting map text into tokens.

use crate::types::{Location, ParseError, Result};

const QUOTE: char = '"';

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// The open delimiter, when it starts a block
    Open,
    /// The close delimiter
    Close,
    /// Text between double quotes, without them
    Quoted(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    /// Anything else: numbers, texture names
    Word(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based
    pub line: usize,
    /// 1-based, in characters
    pub column: usize,
    /// In bytes
    pub offset: usize,
}

impl Token {
    pub fn location(&self) -> Location {
        Location {
            path: None,
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }
}

/// Internal state while scanning.
#[derive(PartialEq, Eq)]
enum ScanState {
    Between,
    InQuote,
    InWord,
    InComment,
}

struct Scanner {
    chars: Vec<(usize, char)>,
    close: char,
}

impl Scanner {
    fn char_at(&self, i: usize) -> Option<char> {
        self.chars.get(i).map(|(_, c)| *c)
    }

    fn starts_comment(&self, i: usize) -> bool {
        self.char_at(i) == Some('/') && self.char_at(i + 1) == Some('/')
    }

    /// Whether the open delimiter at `i` starts a block rather than a name like `{fence`.
    fn is_structural_open(&self, i: usize) -> bool {
        match self.char_at(i + 1) {
            None => true,
            Some(c) if c.is_whitespace() => true,
            Some(QUOTE) | Some('(') => true,
            Some(c) if c == self.close => true,
            Some(_) => self.starts_comment(i + 1),
        }
    }

    /// Whether `c` ends a word.
    fn ends_word(&self, c: char) -> bool {
        c.is_whitespace() || c == QUOTE || c == self.close || "()[]".contains(c)
    }
}

/// Split `text` into tokens. `//` comments outside quotes are dropped.
pub fn tokenize(text: &str, open: char, close: char) -> Result<Vec<Token>> {
    use self::ScanState::*;

    let scanner = Scanner {
        chars: text.char_indices().collect(),
        close,
    };

    let mut tokens = Vec::new();
    let mut state = Between;

    let mut line = 1;
    let mut column = 1;

    // Where the current quote or word started
    let mut start = Token {
        kind: TokenKind::Open,
        line,
        column,
        offset: 0,
    };
    let mut buffer = String::new();

    let mut i = 0;
    while i < scanner.chars.len() {
        let (offset, chr) = scanner.chars[i];
        let here = Token {
            kind: TokenKind::Open,
            line,
            column,
            offset,
        };

        match state {
            InComment => {
                if chr == '\n' {
                    state = Between;
                }
            }
            InQuote => {
                if chr == QUOTE {
                    tokens.push(Token {
                        kind: TokenKind::Quoted(std::mem::take(&mut buffer)),
                        ..start.clone()
                    });
                    state = Between;
                } else {
                    buffer.push(chr);
                }
            }
            InWord if !scanner.ends_word(chr) => {
                buffer.push(chr);
            }
            InWord | Between => {
                if state == InWord {
                    tokens.push(Token {
                        kind: TokenKind::Word(std::mem::take(&mut buffer)),
                        ..start.clone()
                    });
                    state = Between;
                }

                let single = match chr {
                    '(' => Some(TokenKind::LParen),
                    ')' => Some(TokenKind::RParen),
                    '[' => Some(TokenKind::LBracket),
                    ']' => Some(TokenKind::RBracket),
                    c if c == close => Some(TokenKind::Close),
                    c if c == open && scanner.is_structural_open(i) => Some(TokenKind::Open),
                    _ => None,
                };

                if let Some(kind) = single {
                    tokens.push(Token { kind, ..here });
                } else if chr == QUOTE {
                    state = InQuote;
                    start = here;
                } else if scanner.starts_comment(i) {
                    state = InComment;
                } else if !chr.is_whitespace() {
                    state = InWord;
                    start = here;
                    buffer.push(chr);
                }
            }
        }

        if chr == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
        i += 1;
    }

    match state {
        InQuote => Err(ParseError::format(start.location(), "unterminated quote")),
        InWord => {
            tokens.push(Token {
                kind: TokenKind::Word(buffer),
                ..start
            });
            Ok(tokens)
        }
        _ => Ok(tokens),
    }
}
