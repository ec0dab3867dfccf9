// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::{collections::HashMap, fmt::Display, str::FromStr, sync::LazyLock};

use crate::error::RegexError;

bitflags::bitflags! {
    /// Single-letter flags appended after the closing delimiter,
    /// e.g. the `ui` of `/abc/ui`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const UTF8           = 1 << 0;
        const CASELESS       = 1 << 1;
        const MULTILINE      = 1 << 2;
        const DOTALL         = 1 << 3;
        const EXTENDED       = 1 << 4;
        const ANCHORED       = 1 << 5;
        const DOLLAR_ENDONLY = 1 << 6;
        const STUDY          = 1 << 7;
        const UNGREEDY       = 1 << 8;
        const EXTRA          = 1 << 9;
        const INFO_JCHANGED  = 1 << 10;
    }
}

// in the canonical display order
const LETTERS: [(char, Modifiers); 11] = [
    ('u', Modifiers::UTF8),
    ('i', Modifiers::CASELESS),
    ('m', Modifiers::MULTILINE),
    ('s', Modifiers::DOTALL),
    ('x', Modifiers::EXTENDED),
    ('A', Modifiers::ANCHORED),
    ('D', Modifiers::DOLLAR_ENDONLY),
    ('S', Modifiers::STUDY),
    ('U', Modifiers::UNGREEDY),
    ('X', Modifiers::EXTRA),
    ('J', Modifiers::INFO_JCHANGED),
];

pub const ALL_LETTERS: &str = "uimsxADSUXJ";

// non-ASCII letters that are commonly typed in place of a modifier letter
const LOOK_ALIKES: [(char, &str); 11] = [
    ('i', "íìỉĩịîïīĭįıιίϊΐἰἱἲἳἴἵἶἷὶίῐῑῒΐῖῗіїиဣိီǐიइی"),
    ('m', "мμمမმ"),
    ('s', "śšşсσșςسصစſს"),
    ('x', "χξ"),
    ('A', "ÁÀẢÃẠĂẮẰẲẴẶÂẤẦẨẪẬÅĀĄΑΆἈἉἊἋἌἍἎἏᾈᾉᾊᾋᾌᾍᾎᾏᾸᾹᾺΆᾼАǺǍ"),
    ('D', "ĎÐĐƉƊƋᴅᴆДΔ"),
    ('S', "ŞŜȘŠŚСΣ"),
    ('U', "ÚÙỦŨỤƯỨỪỬỮỰÛŪŮŰŬŲУǓǕǗǙǛ"),
    ('X', "ΧΞ"),
    ('J', "Ĵĵјจჯج"),
    ('u', "úùủũụưứừửữựûūůűŭųµуဉုူǔǖǘǚǜუउ"),
];

static ASCII_MAP: LazyLock<HashMap<char, char>> = LazyLock::new(|| {
    LOOK_ALIKES
        .iter()
        .flat_map(|(ascii, look_alikes)| look_alikes.chars().map(move |c| (c, *ascii)))
        .collect()
});

impl Modifiers {
    pub fn from_letter(letter: char) -> Option<Modifiers> {
        LETTERS
            .iter()
            .find(|(c, _)| *c == letter)
            .map(|(_, modifier)| *modifier)
    }

    /// Parses a modifier string. Whitespace is ignored and repeated
    /// letters are merged; every unknown letter is reported at once.
    pub fn parse(value: &str) -> Result<Modifiers, RegexError> {
        let mut modifiers = Modifiers::empty();
        let mut invalid = String::new();

        for c in value.chars().filter(|c| !c.is_whitespace()) {
            match Modifiers::from_letter(c) {
                Some(modifier) => modifiers |= modifier,
                None => invalid.push(c),
            }
        }

        if invalid.is_empty() {
            Ok(modifiers)
        } else {
            Err(RegexError::InvalidModifier(invalid))
        }
    }

    pub fn is_valid(value: &str) -> bool {
        Modifiers::parse(value).is_ok()
    }

    /// Replaces non-ASCII look-alike letters with the modifier
    /// letter they resemble, e.g. `"úí"` becomes `"ui"`.
    /// Other characters are kept as they are.
    pub fn to_ascii(value: &str) -> String {
        if value.is_ascii() {
            return value.to_owned();
        }

        value
            .chars()
            .map(|c| *ASCII_MAP.get(&c).unwrap_or(&c))
            .collect()
    }

    pub fn letters(&self) -> String {
        LETTERS
            .iter()
            .filter(|(_, modifier)| self.contains(*modifier))
            .map(|(c, _)| *c)
            .collect()
    }
}

impl FromStr for Modifiers {
    type Err = RegexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modifiers::parse(s)
    }
}

impl Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.letters())
    }
}
