// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::fmt::Display;

use indexmap::IndexMap;

use crate::key::Key;

/// The text an operation runs against: a single string, or an
/// ordered map of strings whose keys are preserved in the output.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Subject {
    Single(String),
    Many(IndexMap<Key, String>),
}

impl Subject {
    /// Builds an array subject keyed `0..n`.
    pub fn many<I, S>(items: I) -> Subject
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Subject::Many(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (Key::Index(index), item.into()))
                .collect(),
        )
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Subject::Many(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Subject::Single(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Subject::Single(text) => Some(text),
            Subject::Many(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Key, String>> {
        match self {
            Subject::Single(_) => None,
            Subject::Many(map) => Some(map),
        }
    }

    /// Views the subject as a map, a single string becoming entry `0`.
    pub fn to_map(&self) -> IndexMap<Key, String> {
        match self {
            Subject::Single(text) => IndexMap::from([(Key::Index(0), text.clone())]),
            Subject::Many(map) => map.clone(),
        }
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subject::Single(text) => f.write_str(text),
            Subject::Many(map) => {
                let items: Vec<&str> = map.values().map(|s| s.as_str()).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

impl From<&str> for Subject {
    fn from(value: &str) -> Self {
        Subject::Single(value.to_owned())
    }
}

impl From<String> for Subject {
    fn from(value: String) -> Self {
        Subject::Single(value)
    }
}

impl From<&String> for Subject {
    fn from(value: &String) -> Self {
        Subject::Single(value.clone())
    }
}

impl From<Vec<&str>> for Subject {
    fn from(value: Vec<&str>) -> Self {
        Subject::many(value)
    }
}

impl From<Vec<String>> for Subject {
    fn from(value: Vec<String>) -> Self {
        Subject::many(value)
    }
}

impl<const N: usize> From<[&str; N]> for Subject {
    fn from(value: [&str; N]) -> Self {
        Subject::many(value)
    }
}

impl From<IndexMap<Key, String>> for Subject {
    fn from(value: IndexMap<Key, String>) -> Self {
        Subject::Many(value)
    }
}
