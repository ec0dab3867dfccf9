// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

/// Shifts every numeric backreference `\N` in the regex literal by `offset`,
/// so that the literal keeps referring to its own groups once it is
/// spliced after `offset` capture groups of another pattern.
///
/// Escaped backslashes (`\\1` is a backslash followed by `1`) and
/// character classes (`[\1]` is an octal escape) are left untouched.
pub fn renumber_backreferences(literal: &str, offset: usize) -> String {
    if offset == 0 {
        return literal.to_owned();
    }

    let mut output = String::with_capacity(literal.len() + 4);
    let mut chars = literal.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                output.push(c);

                let Some(next) = chars.next() else {
                    break;
                };

                if !in_class && matches!(next, '1'..='9') {
                    let mut digits = String::from(next);
                    while let Some(d) = chars.next_if(|d| d.is_ascii_digit()) {
                        digits.push(d);
                    }

                    match digits.parse::<usize>() {
                        Ok(number) => output.push_str(&(number + offset).to_string()),
                        Err(_) => output.push_str(&digits),
                    }
                } else {
                    output.push(next);
                }
            }
            '[' if !in_class => {
                in_class = true;
                output.push(c);

                // a leading `]` (or `^]`) is a member, not the end of the class
                if let Some(caret) = chars.next_if_eq(&'^') {
                    output.push(caret);
                }
                if let Some(bracket) = chars.next_if_eq(&']') {
                    output.push(bracket);
                }
            }
            ']' if in_class => {
                in_class = false;
                output.push(c);
            }
            _ => output.push(c),
        }
    }

    output
}
