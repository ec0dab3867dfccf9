// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

mod matchall;
mod matches;
mod replacement;

use std::fmt::Display;

pub use matchall::{MatchAllEntry, MatchAllResult};
pub use matches::MatchResult;
pub use replacement::{ReplacementResult, ReplacementSpec};

/// The text captured by a group.
///
/// `Located` captures also carry the byte offset of the text in the
/// subject, the offset is `None` when the group did not take part
/// in the match.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Capture {
    Text(String),
    Located { text: String, offset: Option<usize> },
}

impl Capture {
    pub fn as_str(&self) -> &str {
        match self {
            Capture::Text(text) => text,
            Capture::Located { text, .. } => text,
        }
    }

    pub fn offset(&self) -> Option<usize> {
        match self {
            Capture::Text(_) => None,
            Capture::Located { offset, .. } => *offset,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn is_located(&self) -> bool {
        matches!(self, Capture::Located { .. })
    }

    /// Replaces the text, keeping the offset.
    pub(crate) fn set_text(&mut self, value: &str) {
        match self {
            Capture::Text(text) => *text = value.to_owned(),
            Capture::Located { text, .. } => *text = value.to_owned(),
        }
    }

    /// An empty capture of the same kind.
    pub(crate) fn absent(located: bool) -> Capture {
        if located {
            Capture::Located {
                text: String::new(),
                offset: None,
            }
        } else {
            Capture::Text(String::new())
        }
    }
}

impl Display for Capture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for Capture {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Capture {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
