// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::fmt::Display;

use fancy_regex::{Captures, Regex, RegexBuilder, RuntimeError};
use indexmap::IndexMap;

use crate::{
    config::Config,
    delimiter::Delimiter,
    flags::{MatchFlags, SplitFlags},
    key::Key,
    modifier::Modifiers,
    pattern::Pattern,
    result::Capture,
};

/// The captures of one match occurrence, keyed by group name (when
/// the group is named) followed by group index, in group order.
pub type Groups = IndexMap<Key, Capture>;

/// The raw output of a global match.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct RawMatches {
    /// Every group key of the pattern, in group order.
    pub keys: Vec<Key>,

    /// One entry per occurrence, trailing groups that did not
    /// participate are omitted.
    pub sets: Vec<Groups>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Internal = 0,
    Syntax,
    BacktrackLimit,
    RecursionLimit,
    BadUtf8Offset,
    InvalidFlags,
}

const ERROR_NAMES: [&str; 6] = [
    "INTERNAL_ERROR",
    "SYNTAX_ERROR",
    "BACKTRACK_LIMIT_ERROR",
    "RECURSION_LIMIT_ERROR",
    "BAD_UTF8_OFFSET_ERROR",
    "INVALID_FLAGS_ERROR",
];

impl ErrorCode {
    pub fn name(&self) -> &'static str {
        ERROR_NAMES[*self as usize]
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A hard failure reported by an engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct EngineError {
    pub code: ErrorCode,
    pub message: String,
}

impl EngineError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        EngineError {
            code,
            message: message.into(),
        }
    }
}

impl From<fancy_regex::Error> for EngineError {
    fn from(err: fancy_regex::Error) -> Self {
        let code = match &err {
            fancy_regex::Error::RuntimeError(RuntimeError::BacktrackLimitExceeded) => {
                ErrorCode::BacktrackLimit
            }
            fancy_regex::Error::RuntimeError(RuntimeError::StackOverflow) => {
                ErrorCode::RecursionLimit
            }
            fancy_regex::Error::ParseError(..) | fancy_regex::Error::CompileError(..) => {
                ErrorCode::Syntax
            }
            _ => ErrorCode::Internal,
        };
        EngineError::new(code, err.to_string())
    }
}

/// The regex primitives the library is built on.
///
/// A pattern is compiled once with `compile` and the handle is reused
/// for every subject. Offsets are byte offsets into the subject. A
/// `limit` of `None` means no limit.
pub trait Engine {
    type Compiled;

    fn compile(&self, pattern: &Pattern) -> Result<Self::Compiled, EngineError>;

    fn is_match(&self, compiled: &Self::Compiled, subject: &str) -> Result<bool, EngineError>;

    /// Returns the captures of the first match at or after `offset`.
    fn match_first(
        &self,
        compiled: &Self::Compiled,
        subject: &str,
        flags: MatchFlags,
        offset: usize,
    ) -> Result<Option<Groups>, EngineError>;

    fn match_all(
        &self,
        compiled: &Self::Compiled,
        subject: &str,
        flags: MatchFlags,
        offset: usize,
    ) -> Result<RawMatches, EngineError>;

    /// Replaces matches with the text returned by `replacer`, returning
    /// the new text and the number of replacements.
    fn replace(
        &self,
        compiled: &Self::Compiled,
        subject: &str,
        replacer: &mut dyn FnMut(&Groups) -> String,
        limit: Option<usize>,
    ) -> Result<(String, usize), EngineError>;

    /// Splits the subject on matches, a `limit` of `Some(n)` returning
    /// at most `n` pieces (captured delimiters not included).
    fn split(
        &self,
        compiled: &Self::Compiled,
        subject: &str,
        limit: Option<usize>,
        flags: SplitFlags,
    ) -> Result<Vec<Capture>, EngineError>;

    fn quote(&self, text: &str, delimiter: Option<Delimiter>) -> String;

    /// Keeps the subjects that match, or those that do not when `invert`.
    fn filter(
        &self,
        compiled: &Self::Compiled,
        subjects: &IndexMap<Key, String>,
        invert: bool,
    ) -> Result<IndexMap<Key, String>, EngineError> {
        let mut kept = IndexMap::new();
        for (key, text) in subjects {
            if self.is_match(compiled, text)? != invert {
                kept.insert(key.clone(), text.clone());
            }
        }
        Ok(kept)
    }
}

/// An engine backed by `fancy_regex`, emulating the PCRE features
/// the wire format allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FancyEngine {
    backtrack_limit: usize,
}

impl Default for FancyEngine {
    fn default() -> Self {
        FancyEngine {
            backtrack_limit: Config::current().backtrack_limit,
        }
    }
}

/// A pattern compiled by `FancyEngine`.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,

    /// Matches only non-empty text at the search position, tried after
    /// an empty match before stepping forward.
    non_empty: Option<Regex>,
    names: Vec<Option<String>>,
    anchored: bool,
}

impl FancyEngine {
    pub fn with_backtrack_limit(backtrack_limit: usize) -> Self {
        FancyEngine { backtrack_limit }
    }

    pub fn backtrack_limit(&self) -> usize {
        self.backtrack_limit
    }

    fn build(&self, source: &str) -> Result<Regex, fancy_regex::Error> {
        RegexBuilder::new(source)
            .backtrack_limit(self.backtrack_limit)
            .build()
    }

    /// Visits every match from `start`, until `visit` returns false.
    ///
    /// After an empty match, a non-empty match at the same position is
    /// tried first, then the search steps over one char.
    fn scan<F>(
        &self,
        compiled: &CompiledPattern,
        subject: &str,
        start: usize,
        mut visit: F,
    ) -> Result<(), EngineError>
    where
        F: FnMut(&Captures) -> bool,
    {
        let mut position = start;
        let mut after_empty = false;

        while position <= subject.len() {
            let captures = if after_empty {
                let retry = match &compiled.non_empty {
                    Some(non_empty) => non_empty.captures_from_pos(subject, position)?,
                    None => None,
                };

                match retry {
                    Some(captures) => captures,
                    None => {
                        let Some(c) = subject[position..].chars().next() else {
                            break;
                        };
                        position += c.len_utf8();
                        after_empty = false;
                        continue;
                    }
                }
            } else {
                let Some(captures) = compiled.regex.captures_from_pos(subject, position)? else {
                    break;
                };
                captures
            };

            let Some(whole) = captures.get(0) else {
                break;
            };

            if compiled.anchored && whole.start() != position {
                break;
            }

            if !visit(&captures) {
                break;
            }

            after_empty = whole.start() == whole.end();
            position = whole.end();
        }

        Ok(())
    }
}

fn check_offset(subject: &str, offset: usize) -> Result<(), EngineError> {
    if offset > subject.len() || !subject.is_char_boundary(offset) {
        return Err(EngineError::new(
            ErrorCode::BadUtf8Offset,
            format!("offset {} is not a char boundary of the subject", offset),
        ));
    }
    Ok(())
}

fn group_keys(names: &[Option<String>]) -> Vec<Key> {
    let mut keys = Vec::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        if let Some(name) = name {
            keys.push(Key::Name(name.clone()));
        }
        keys.push(Key::Index(index));
    }
    keys
}

// the index of the last group that took part in the match
fn last_participating(captures: &Captures) -> usize {
    (0..captures.len())
        .rev()
        .find(|index| captures.get(*index).is_some())
        .unwrap_or(0)
}

fn collect_groups(captures: &Captures, names: &[Option<String>], offset_capture: bool) -> Groups {
    let mut groups = Groups::new();

    for index in 0..=last_participating(captures) {
        let capture = match (captures.get(index), offset_capture) {
            (Some(m), true) => Capture::Located {
                text: m.as_str().to_owned(),
                offset: Some(m.start()),
            },
            (Some(m), false) => Capture::Text(m.as_str().to_owned()),
            (None, true) => Capture::Located {
                text: String::new(),
                offset: None,
            },
            (None, false) => Capture::Text(String::new()),
        };

        if let Some(Some(name)) = names.get(index) {
            groups.insert(Key::Name(name.clone()), capture.clone());
        }
        groups.insert(Key::Index(index), capture);
    }

    groups
}

impl Engine for FancyEngine {
    type Compiled = CompiledPattern;

    fn compile(&self, pattern: &Pattern) -> Result<CompiledPattern, EngineError> {
        let source = translate(pattern);
        tracing::trace!(pattern = %pattern, source = %source, "compile pattern");

        let regex = self.build(&source)?;

        // without it, empty matches fall back to stepping over one char
        let non_empty = match self.build(&non_empty_source(pattern)) {
            Ok(regex) => Some(regex),
            Err(err) => {
                tracing::trace!(error = %err, "no non-empty variant");
                None
            }
        };

        let names = regex
            .capture_names()
            .map(|name| name.map(str::to_owned))
            .collect();

        Ok(CompiledPattern {
            regex,
            non_empty,
            names,
            anchored: pattern.has_modifiers(Modifiers::ANCHORED),
        })
    }

    fn is_match(&self, compiled: &CompiledPattern, subject: &str) -> Result<bool, EngineError> {
        Ok(self
            .match_first(compiled, subject, MatchFlags::empty(), 0)?
            .is_some())
    }

    fn match_first(
        &self,
        compiled: &CompiledPattern,
        subject: &str,
        flags: MatchFlags,
        offset: usize,
    ) -> Result<Option<Groups>, EngineError> {
        check_offset(subject, offset)?;

        let mut found = None;
        self.scan(compiled, subject, offset, |captures| {
            found = Some(collect_groups(
                captures,
                &compiled.names,
                flags.offset_capture(),
            ));
            false
        })?;

        Ok(found)
    }

    fn match_all(
        &self,
        compiled: &CompiledPattern,
        subject: &str,
        flags: MatchFlags,
        offset: usize,
    ) -> Result<RawMatches, EngineError> {
        if flags.order().is_none() {
            return Err(EngineError::new(
                ErrorCode::InvalidFlags,
                "pattern order and set order are mutually exclusive",
            ));
        }
        check_offset(subject, offset)?;

        let mut sets = Vec::new();
        self.scan(compiled, subject, offset, |captures| {
            sets.push(collect_groups(
                captures,
                &compiled.names,
                flags.offset_capture(),
            ));
            true
        })?;

        Ok(RawMatches {
            keys: group_keys(&compiled.names),
            sets,
        })
    }

    fn replace(
        &self,
        compiled: &CompiledPattern,
        subject: &str,
        replacer: &mut dyn FnMut(&Groups) -> String,
        limit: Option<usize>,
    ) -> Result<(String, usize), EngineError> {
        let mut output = String::with_capacity(subject.len());
        let mut last = 0;
        let mut count = 0;

        self.scan(compiled, subject, 0, |captures| {
            if limit.is_some_and(|limit| count >= limit) {
                return false;
            }
            let Some(whole) = captures.get(0) else {
                return false;
            };

            let groups = collect_groups(captures, &compiled.names, false);
            output.push_str(&subject[last..whole.start()]);
            output.push_str(&replacer(&groups));
            last = whole.end();
            count += 1;
            true
        })?;

        output.push_str(&subject[last..]);
        Ok((output, count))
    }

    fn split(
        &self,
        compiled: &CompiledPattern,
        subject: &str,
        limit: Option<usize>,
        flags: SplitFlags,
    ) -> Result<Vec<Capture>, EngineError> {
        let no_empty = flags.contains(SplitFlags::NO_EMPTY);
        let delim_capture = flags.contains(SplitFlags::DELIM_CAPTURE);
        let offset_capture = flags.contains(SplitFlags::OFFSET_CAPTURE);

        let piece = |start: usize, end: usize| {
            let text = subject[start..end].to_owned();
            if offset_capture {
                Capture::Located {
                    text,
                    offset: Some(start),
                }
            } else {
                Capture::Text(text)
            }
        };

        // zero means no limit
        let mut remaining = limit.filter(|limit| *limit > 0);
        let mut pieces = Vec::new();
        let mut last = 0;

        self.scan(compiled, subject, 0, |captures| {
            if remaining.is_some_and(|remaining| remaining <= 1) {
                return false;
            }
            let Some(whole) = captures.get(0) else {
                return false;
            };

            if !no_empty || whole.start() != last {
                pieces.push(piece(last, whole.start()));
                remaining = remaining.map(|remaining| remaining - 1);
            }

            if delim_capture {
                for index in 1..=last_participating(captures) {
                    match captures.get(index) {
                        Some(m) if !(no_empty && m.as_str().is_empty()) => {
                            pieces.push(piece(m.start(), m.end()));
                        }
                        None if !no_empty => pieces.push(if offset_capture {
                            Capture::Located {
                                text: String::new(),
                                offset: None,
                            }
                        } else {
                            Capture::Text(String::new())
                        }),
                        _ => {}
                    }
                }
            }

            last = whole.end();
            true
        })?;

        if !no_empty || last < subject.len() {
            pieces.push(piece(last, subject.len()));
        }

        Ok(pieces)
    }

    fn quote(&self, text: &str, delimiter: Option<Delimiter>) -> String {
        quote(text, delimiter)
    }
}

/// Escapes the regex meta characters of the text, and the delimiter
/// when given, so that the text matches itself literally.
pub fn quote(text: &str, delimiter: Option<Delimiter>) -> String {
    const SPECIAL: &str = "\\.+*?()|[]{}^$#&-~";

    let delimiter = delimiter.map(|d| d.as_char());
    let mut output = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if c == '\0' {
            output.push_str("\\x00");
            continue;
        }
        if SPECIAL.contains(c) || Some(c) == delimiter {
            output.push('\\');
        }
        output.push(c);
    }

    output
}

/// Expands `$n`, `${n}`, `\n` (n up to 99) and `${name}` references
/// of a replacement template, `\\` being a literal backslash. Groups
/// that did not match expand to an empty string.
pub fn expand_template(template: &str, groups: &Groups) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(index) = rest.find(['$', '\\']) {
        output.push_str(&rest[..index]);
        let sigil = &rest[index..index + 1];
        let after = &rest[index + 1..];

        if sigil == "\\" && after.starts_with('\\') {
            output.push('\\');
            rest = &after[1..];
            continue;
        }

        match read_reference(after, sigil == "$") {
            Some((key, consumed)) => {
                if let Some(capture) = groups.get(&key) {
                    output.push_str(capture.as_str());
                }
                rest = &after[consumed..];
            }
            None => {
                output.push_str(sigil);
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}

// returns the referenced key and the number of bytes consumed
fn read_reference(text: &str, braces: bool) -> Option<(Key, usize)> {
    let digits = text
        .bytes()
        .take(2)
        .take_while(|b| b.is_ascii_digit())
        .count();

    if digits > 0 {
        let index = text[..digits].parse().ok()?;
        return Some((Key::Index(index), digits));
    }

    if !braces || !text.starts_with('{') {
        return None;
    }

    let close = text.find('}')?;
    let inner = &text[1..close];
    let key = if !inner.is_empty() && inner.len() <= 2 && inner.bytes().all(|b| b.is_ascii_digit()) {
        Key::Index(inner.parse().ok()?)
    } else if inner.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && inner.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Key::Name(inner.to_owned())
    } else {
        return None;
    };

    Some((key, close + 1))
}

// PCRE spellings without a direct equivalent
const LINE_BREAK: &str = "(?:\\r\\n|[\\n\\x0B\\x0C\\r\\x{85}\\x{2028}\\x{2029}])";
const END_OR_FINAL_NEWLINE: &str = "(?=\\n?\\z)";

/// Converts a pattern into the source accepted by `fancy_regex`.
fn translate(pattern: &Pattern) -> String {
    let modifiers = pattern.modifiers();

    let ignored = modifiers
        & (Modifiers::DOLLAR_ENDONLY
            | Modifiers::STUDY
            | Modifiers::EXTRA
            | Modifiers::INFO_JCHANGED);
    if !ignored.is_empty() {
        tracing::debug!(modifiers = %ignored, "modifiers have no effect on this engine");
    }

    format!("{}{}", inline_flags(modifiers), rewrite_escapes(pattern.body()))
}

/// The source of a pattern that only matches non-empty text at the
/// search position.
fn non_empty_source(pattern: &Pattern) -> String {
    format!(
        "{}\\G(?:{})(?!\\G)",
        inline_flags(pattern.modifiers()),
        rewrite_escapes(pattern.body())
    )
}

fn inline_flags(modifiers: Modifiers) -> String {
    let flags: String = [
        (Modifiers::CASELESS, 'i'),
        (Modifiers::MULTILINE, 'm'),
        (Modifiers::DOTALL, 's'),
        (Modifiers::EXTENDED, 'x'),
        (Modifiers::UNGREEDY, 'U'),
    ]
    .iter()
    .filter(|(modifier, _)| modifiers.contains(*modifier))
    .map(|(_, c)| *c)
    .collect();

    if flags.is_empty() {
        flags
    } else {
        format!("(?{})", flags)
    }
}

fn rewrite_escapes(body: &str) -> String {
    let mut output = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('R') if !in_class => output.push_str(LINE_BREAK),
                Some('Z') if !in_class => output.push_str(END_OR_FINAL_NEWLINE),
                Some(next) => {
                    output.push(c);
                    output.push(next);
                }
                None => output.push(c),
            },
            '[' if !in_class => {
                in_class = true;
                output.push(c);
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
