// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field path grammar.
//!
//! ```text
//! path       := segment ('.' segment)*
//! segment    := identifier ('[' index ']')?
//! identifier := [A-Za-z_][A-Za-z0-9_]*
//! index      := [0-9]+
//! ```
//!
//! `.` descends into a structure member, `[i]` selects element `i` of an
//! array. Anything else (empty segments, whitespace, signs, nested brackets)
//! is rejected rather than reinterpreted.

use crate::config::{INDEX_CLOSE, INDEX_OPEN, PATH_SEPARATOR};
use crate::error::{Error, Result};

/// One step of a field path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'p> {
    pub name: &'p str,
    pub index: Option<usize>,
}

/// Check a published name against the identifier rule.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split a field path into segments.
///
/// `max_depth` bounds the number of segments.
pub fn parse(path: &str, max_depth: usize) -> Result<Vec<Segment<'_>>> {
    let invalid = || Error::InvalidFieldName(path.to_string());
    let mut segments = Vec::new();
    for token in path.split(PATH_SEPARATOR) {
        if segments.len() == max_depth {
            return Err(invalid());
        }
        segments.push(parse_segment(token).ok_or_else(invalid)?);
    }
    Ok(segments)
}

fn parse_segment(token: &str) -> Option<Segment<'_>> {
    match token.find(INDEX_OPEN) {
        None => is_identifier(token).then_some(Segment {
            name: token,
            index: None,
        }),
        Some(open) => {
            let name = &token[..open];
            let digits = token[open + 1..].strip_suffix(INDEX_CLOSE)?;
            if !is_identifier(name)
                || digits.is_empty()
                || !digits.bytes().all(|b| b.is_ascii_digit())
            {
                return None;
            }
            let index = digits.parse().ok()?;
            Some(Segment {
                name,
                index: Some(index),
            })
        }
    }
}
