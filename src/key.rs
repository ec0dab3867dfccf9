// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::fmt::Display;

/// Addresses a capture group or an entry of an array subject,
/// either by position or by name.
#[derive(Debug, PartialEq, Eq, Hash, Clone, PartialOrd, Ord)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl Key {
    pub fn is_index(&self) -> bool {
        matches!(self, Key::Index(_))
    }

    pub fn is_name(&self) -> bool {
        matches!(self, Key::Name(_))
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(index) => Some(*index),
            Key::Name(_) => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Index(_) => None,
            Key::Name(name) => Some(name),
        }
    }
}

/// Whether the text is the canonical decimal form of an index,
/// i.e. `"0"` or digits without a leading zero.
pub fn is_numeric(text: &str) -> bool {
    let bytes = text.as_bytes();
    match bytes {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        _ => bytes.iter().all(|b| b.is_ascii_digit()),
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{}", index),
            Key::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// Conversion of the values accepted as lookup keys.
///
/// Canonical numeric strings such as `"2"` address indexed groups,
/// while negative numbers and empty strings are rejected, the
/// rejected value being returned in its textual form.
pub trait IntoKey {
    fn into_key(self) -> Result<Key, String>;
}

impl IntoKey for Key {
    fn into_key(self) -> Result<Key, String> {
        Ok(self)
    }
}

impl IntoKey for &Key {
    fn into_key(self) -> Result<Key, String> {
        Ok(self.clone())
    }
}

impl IntoKey for usize {
    fn into_key(self) -> Result<Key, String> {
        Ok(Key::Index(self))
    }
}

impl IntoKey for i32 {
    fn into_key(self) -> Result<Key, String> {
        (self as i64).into_key()
    }
}

impl IntoKey for i64 {
    fn into_key(self) -> Result<Key, String> {
        usize::try_from(self)
            .map(Key::Index)
            .map_err(|_| self.to_string())
    }
}

impl IntoKey for &str {
    fn into_key(self) -> Result<Key, String> {
        if self.is_empty() {
            return Err("''".to_owned());
        }

        if is_numeric(self) {
            // digits beyond usize are kept as a name
            if let Ok(index) = self.parse::<usize>() {
                return Ok(Key::Index(index));
            }
        }

        Ok(Key::Name(self.to_owned()))
    }
}

impl IntoKey for String {
    fn into_key(self) -> Result<Key, String> {
        self.as_str().into_key()
    }
}

impl IntoKey for &String {
    fn into_key(self) -> Result<Key, String> {
        self.as_str().into_key()
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Key::Index(value)
    }
}
