// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::{fmt::Display, str::FromStr};

use crate::error::RegexError;

/// The character wrapping a regex body in the wire format,
/// e.g. the `/` of `/abc/u`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub enum Delimiter {
    #[default]
    Slash,
    Tilde,
    Hash,
    Percent,
    Plus,
}

impl Delimiter {
    pub const ALL: [Delimiter; 5] = [
        Delimiter::Slash,
        Delimiter::Tilde,
        Delimiter::Hash,
        Delimiter::Percent,
        Delimiter::Plus,
    ];

    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Slash => '/',
            Delimiter::Tilde => '~',
            Delimiter::Hash => '#',
            Delimiter::Percent => '%',
            Delimiter::Plus => '+',
        }
    }

    pub fn from_char(c: char) -> Option<Delimiter> {
        Delimiter::ALL.into_iter().find(|d| d.as_char() == c)
    }

    pub fn is_valid(value: &str) -> bool {
        value.parse::<Delimiter>().is_ok()
    }
}

impl TryFrom<char> for Delimiter {
    type Error = RegexError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Delimiter::from_char(value).ok_or_else(|| RegexError::InvalidDelimiter(value.to_string()))
    }
}

impl FromStr for Delimiter {
    type Err = RegexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Delimiter::try_from(c),
            _ => Err(RegexError::InvalidDelimiter(s.to_owned())),
        }
    }
}

impl Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::error::RegexError;

    use super::Delimiter;

    #[test]
    fn test_parse_delimiter() {
        assert_eq!("/".parse::<Delimiter>(), Ok(Delimiter::Slash));
        assert_eq!("~".parse::<Delimiter>(), Ok(Delimiter::Tilde));
        assert_eq!("#".parse::<Delimiter>(), Ok(Delimiter::Hash));
        assert_eq!("%".parse::<Delimiter>(), Ok(Delimiter::Percent));
        assert_eq!("+".parse::<Delimiter>(), Ok(Delimiter::Plus));

        assert_eq!(
            "@".parse::<Delimiter>(),
            Err(RegexError::InvalidDelimiter("@".to_owned()))
        );
        assert_eq!(
            "//".parse::<Delimiter>(),
            Err(RegexError::InvalidDelimiter("//".to_owned()))
        );
        assert!(!Delimiter::is_valid(""));
    }

    #[test]
    fn test_display_delimiter() {
        let s: String = Delimiter::ALL.iter().map(|d| d.to_string()).collect();
        assert_eq!(s, "/~#%+");
    }
}
