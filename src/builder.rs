// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::fmt::Display;

use crate::{
    config::Config,
    delimiter::Delimiter,
    engine::quote,
    error::Result,
    modifier::Modifiers,
    pattern::Pattern,
    renumber::renumber_backreferences,
};

const LETTERS: &str = "A-Za-z";
const LOWER_CASE_LETTERS: &str = "a-z";
const UPPER_CASE_LETTERS: &str = "A-Z";

/// What the pending fragment matches.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub enum Fragment {
    #[default]
    None,

    /// Quoted text.
    Literal(String),
    AnyChar,
    Backreference(usize),
    CharSet {
        chars: String,
        negated: bool,
    },

    /// Regex source spliced from another pattern, along with the number
    /// of capture groups it contains.
    Like {
        literal: String,
        groups: usize,
    },
}

/// Repeat bounds, both ends inclusive.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Quantity {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl Quantity {
    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => write!(f, "{{{}}}", min),
            (Some(min), Some(max)) => write!(f, "{{{},{}}}", min, max),
            (Some(min), None) => write!(f, "{{{},}}", min),
            (None, Some(max)) => write!(f, "{{0,{}}}", max),
            (None, None) => Ok(()),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub enum Grouping {
    #[default]
    None,
    Unnamed,
    Named(String),
}

impl Grouping {
    pub fn is_capturing(&self) -> bool {
        !matches!(self, Grouping::None)
    }
}

/// The fragment being assembled, with everything that applies to it.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Pending {
    pub fragment: Fragment,
    pub quantity: Quantity,
    pub reluctant: bool,
    pub grouping: Grouping,
}

impl Pending {
    /// Renders the fragment, `None` when no fragment is pending.
    ///
    /// `groups_used` is the number of capture groups before this
    /// fragment, backreferences of a spliced `Like` fragment are
    /// shifted past them (and past the fragment's own group).
    pub fn flush(&self, groups_used: usize) -> Option<String> {
        let offset = groups_used + usize::from(self.grouping.is_capturing());

        let chars = match &self.fragment {
            Fragment::None => return None,
            Fragment::Literal(text) => text.clone(),
            Fragment::AnyChar => ".".to_owned(),
            Fragment::Backreference(number) => format!("\\{}", number),
            Fragment::CharSet {
                chars,
                negated: false,
            } => format!("[{}]", chars),
            Fragment::CharSet {
                chars,
                negated: true,
            } => format!("[^{}]", chars),
            Fragment::Like { literal, .. } => renumber_backreferences(literal, offset),
        };

        // a lazy suffix without a quantifier would read as `?`
        let reluctant = if self.reluctant && self.quantity.is_set() {
            "?"
        } else {
            ""
        };

        let body = format!("(?:{}){}{}", chars, self.quantity, reluctant);

        Some(match &self.grouping {
            Grouping::None => body,
            Grouping::Unnamed => format!("({})", body),
            Grouping::Named(name) => format!("(?P<{}>{})", name, body),
        })
    }

    /// The number of capture groups the rendered fragment holds.
    pub fn groups(&self) -> usize {
        if self.fragment == Fragment::None {
            return 0;
        }

        let own = usize::from(self.grouping.is_capturing());
        match &self.fragment {
            Fragment::Like { groups, .. } => own + groups,
            _ => own,
        }
    }
}

/// Something that can be spliced into a builder.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    /// Text matched literally, it is quoted before splicing.
    Text(&'a str),

    /// Regex source, spliced as it is.
    Source(&'a str),
    Pattern(&'a Pattern),
    Builder(&'a PatternBuilder),
}

impl Operand<'_> {
    /// The regex literal and the number of capture groups known to be in it.
    ///
    /// Groups of raw sources and compiled patterns are not counted.
    fn resolve(&self, delimiter: Delimiter) -> (String, usize) {
        match self {
            Operand::Text(text) => (quote(text, Some(delimiter)), 0),
            Operand::Source(source) => (source.to_string(), 0),
            Operand::Pattern(pattern) => (pattern.body().to_owned(), 0),
            Operand::Builder(builder) => (builder.literal(), builder.groups_used()),
        }
    }
}

impl<'a> From<&'a str> for Operand<'a> {
    fn from(value: &'a str) -> Self {
        Operand::Text(value)
    }
}

impl<'a> From<&'a String> for Operand<'a> {
    fn from(value: &'a String) -> Self {
        Operand::Text(value)
    }
}

impl<'a> From<&'a Pattern> for Operand<'a> {
    fn from(value: &'a Pattern) -> Self {
        Operand::Pattern(value)
    }
}

impl<'a> From<&'a PatternBuilder> for Operand<'a> {
    fn from(value: &'a PatternBuilder) -> Self {
        Operand::Builder(value)
    }
}

impl<'a> From<&'a mut PatternBuilder> for Operand<'a> {
    fn from(value: &'a mut PatternBuilder) -> Self {
        Operand::Builder(value)
    }
}

/// Assembles a pattern from readable method calls.
///
/// A quantifier (`exactly`, `min`, `max`, `limit`) is followed by what it
/// applies to (`of`, `of_any`, `of_group`, `from`, `not_from`, `like`),
/// which stays pending, and may still be made lazy or a group, until the
/// next quantifier or anchor renders it.
///
/// ```
/// use regex_fluent::PatternBuilder;
///
/// let pattern = PatternBuilder::new()
///     .start_of_input()
///     .exactly(3).digits()
///     .then("-")
///     .exactly(4).digits()
///     .end_of_input()
///     .compile();
///
/// assert!(pattern.is_match("555-1212").unwrap());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PatternBuilder {
    fragments: Vec<String>,
    pending: Pending,
    either: Option<String>,
    groups_used: usize,
    modifiers: Modifiers,
    delimiter: Delimiter,
}

impl Default for PatternBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternBuilder {
    /// Creates an empty builder with the configured default modifiers
    /// and delimiter.
    pub fn new() -> Self {
        let config = Config::current();
        Self::with(config.delimiter, config.modifiers)
    }

    pub fn with(delimiter: Delimiter, modifiers: Modifiers) -> Self {
        PatternBuilder {
            fragments: vec![],
            pending: Pending::default(),
            either: None,
            groups_used: 0,
            modifiers,
            delimiter,
        }
    }

    /// Starts from an existing pattern, its body becomes the first fragment.
    pub fn from_pattern(pattern: &Pattern) -> Self {
        let mut builder = Self::with(pattern.delimiter(), pattern.modifiers());
        if !pattern.body().is_empty() {
            builder.fragments.push(pattern.body().to_owned());
        }
        builder
    }

    /// Starts from a wire-format pattern, an empty string gives an
    /// empty builder.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim_matches(' ').is_empty() {
            return Ok(Self::new());
        }
        Ok(Self::from_pattern(&Pattern::parse(text)?))
    }

    /// A fresh builder with the same delimiter, for building operands.
    pub fn sub(&self) -> Self {
        Self::with(self.delimiter, Config::current().modifiers)
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// The number of capture groups, including those of the pending fragment.
    pub fn groups_used(&self) -> usize {
        self.groups_used + self.pending.groups()
    }

    pub fn pending(&self) -> &Pending {
        &self.pending
    }

    // Modifiers

    /// Adds modifier letters, e.g. `"im"`, whitespace is ignored.
    pub fn add_modifiers(&mut self, letters: &str) -> Result<&mut Self> {
        let modifiers = Modifiers::parse(letters)?;
        self.modifiers |= modifiers;
        Ok(self)
    }

    pub fn add_modifier(&mut self, modifier: Modifiers) -> &mut Self {
        self.modifiers |= modifier;
        self
    }

    pub fn remove_modifiers(&mut self, modifiers: Modifiers) -> &mut Self {
        self.modifiers.remove(modifiers);
        self
    }

    /// Whether all of the given modifiers are set, or any of them when `any`.
    pub fn has_modifiers(&self, modifiers: Modifiers, any: bool) -> bool {
        if any {
            self.modifiers.intersects(modifiers)
        } else {
            self.modifiers.contains(modifiers)
        }
    }

    pub fn ignore_case(&mut self, enable: bool) -> &mut Self {
        self.modifiers.set(Modifiers::CASELESS, enable);
        self
    }

    pub fn multi_line(&mut self, enable: bool) -> &mut Self {
        self.modifiers.set(Modifiers::MULTILINE, enable);
        self
    }

    // Quantifiers

    pub fn exactly(&mut self, n: usize) -> &mut Self {
        self.limit(n, Some(n))
    }

    pub fn min(&mut self, n: usize) -> &mut Self {
        self.flush();
        self.pending.quantity.min = Some(n);
        self
    }

    pub fn max(&mut self, n: usize) -> &mut Self {
        self.flush();
        self.pending.quantity.max = Some(n);
        self
    }

    /// Between `min` and `max` repetitions, exactly `min` without a `max`.
    pub fn limit(&mut self, min: usize, max: Option<usize>) -> &mut Self {
        self.flush();
        self.pending.quantity = Quantity {
            min: Some(min),
            max: Some(max.unwrap_or(min)),
        };
        self
    }

    pub fn reluctantly(&mut self) -> &mut Self {
        self.pending.reluctant = true;
        self
    }

    pub fn as_group(&mut self) -> &mut Self {
        self.pending.grouping = Grouping::Unnamed;
        self
    }

    pub fn as_named_group(&mut self, name: &str) -> &mut Self {
        self.pending.grouping = Grouping::Named(name.to_owned());
        self
    }

    // What to match

    pub fn of(&mut self, text: &str) -> &mut Self {
        self.pending.fragment = Fragment::Literal(quote(text, Some(self.delimiter)));
        self
    }

    pub fn of_any(&mut self) -> &mut Self {
        self.pending.fragment = Fragment::AnyChar;
        self
    }

    /// Matches what the capture group `number` matched.
    pub fn of_group(&mut self, number: usize) -> &mut Self {
        self.pending.fragment = Fragment::Backreference(number);
        self
    }

    /// Any one of the characters.
    pub fn from(&mut self, chars: &str) -> &mut Self {
        self.pending.fragment = Fragment::CharSet {
            chars: quote(chars, Some(self.delimiter)),
            negated: false,
        };
        self
    }

    /// Any character but those given.
    pub fn not_from(&mut self, chars: &str) -> &mut Self {
        self.pending.fragment = Fragment::CharSet {
            chars: quote(chars, Some(self.delimiter)),
            negated: true,
        };
        self
    }

    /// Splices another pattern as the pending fragment.
    ///
    /// Its backreferences are shifted by the groups before it, plus one
    /// when the fragment itself is made a group with `as_group`.
    pub fn like<'a>(&mut self, operand: impl Into<Operand<'a>>) -> &mut Self {
        let (literal, groups) = operand.into().resolve(self.delimiter);
        self.pending.fragment = Fragment::Like { literal, groups };
        self
    }

    pub fn append<'a>(&mut self, operand: impl Into<Operand<'a>>) -> &mut Self {
        self.exactly(1).like(operand)
    }

    pub fn optional<'a>(&mut self, operand: impl Into<Operand<'a>>) -> &mut Self {
        self.max(1).like(operand)
    }

    // Shorthands

    pub fn then(&mut self, text: &str) -> &mut Self {
        self.exactly(1).of(text)
    }

    pub fn find(&mut self, text: &str) -> &mut Self {
        self.then(text)
    }

    pub fn some(&mut self, chars: &str) -> &mut Self {
        self.min(1).from(chars)
    }

    pub fn maybe_some(&mut self, chars: &str) -> &mut Self {
        self.min(0).from(chars)
    }

    pub fn maybe(&mut self, text: &str) -> &mut Self {
        self.max(1).of(text)
    }

    pub fn anything(&mut self) -> &mut Self {
        self.min(0).of_any()
    }

    pub fn something(&mut self) -> &mut Self {
        self.min(1).of_any()
    }

    pub fn any(&mut self) -> &mut Self {
        self.exactly(1).of_any()
    }

    /// Anything not containing the text, one or more characters other
    /// than it when it is a single character.
    pub fn anything_but(&mut self, text: &str) -> &mut Self {
        if text.chars().count() == 1 {
            return self.min(1).not_from(text);
        }

        self.not_ahead(Operand::Text(text)).min(0).of_any()
    }

    pub fn digit(&mut self) -> &mut Self {
        self.shorthand("\\d")
    }

    pub fn not_digit(&mut self) -> &mut Self {
        self.shorthand("\\D")
    }

    pub fn whitespace(&mut self) -> &mut Self {
        self.shorthand("\\s")
    }

    pub fn not_whitespace(&mut self) -> &mut Self {
        self.shorthand("\\S")
    }

    pub fn tab(&mut self) -> &mut Self {
        self.shorthand("\\t")
    }

    pub fn line_break(&mut self) -> &mut Self {
        self.shorthand("\\R")
    }

    pub fn digits(&mut self) -> &mut Self {
        self.plural("\\d")
    }

    pub fn not_digits(&mut self) -> &mut Self {
        self.plural("\\D")
    }

    pub fn whitespaces(&mut self) -> &mut Self {
        self.plural("\\s")
    }

    pub fn not_whitespaces(&mut self) -> &mut Self {
        self.plural("\\S")
    }

    pub fn tabs(&mut self) -> &mut Self {
        self.plural("\\t")
    }

    pub fn line_breaks(&mut self) -> &mut Self {
        self.plural("\\R")
    }

    pub fn letter(&mut self) -> &mut Self {
        self.exactly(1).char_set(LETTERS, false)
    }

    pub fn not_letter(&mut self) -> &mut Self {
        self.exactly(1).char_set(LETTERS, true)
    }

    pub fn letters(&mut self) -> &mut Self {
        self.one_or_more().char_set(LETTERS, false)
    }

    pub fn not_letters(&mut self) -> &mut Self {
        self.one_or_more().char_set(LETTERS, true)
    }

    pub fn lower_case_letter(&mut self) -> &mut Self {
        self.exactly(1).char_set(LOWER_CASE_LETTERS, false)
    }

    pub fn lower_case_letters(&mut self) -> &mut Self {
        self.one_or_more().char_set(LOWER_CASE_LETTERS, false)
    }

    pub fn upper_case_letter(&mut self) -> &mut Self {
        self.exactly(1).char_set(UPPER_CASE_LETTERS, false)
    }

    pub fn upper_case_letters(&mut self) -> &mut Self {
        self.one_or_more().char_set(UPPER_CASE_LETTERS, false)
    }

    // a single class atom, or the pending fragment when a quantifier waits for one
    fn shorthand(&mut self, atom: &str) -> &mut Self {
        self.settle();
        if self.pending.quantity.is_set() {
            self.pending.fragment = Fragment::Like {
                literal: atom.to_owned(),
                groups: 0,
            };
            return self;
        }

        self.push(format!("(?:{})", atom))
    }

    fn plural(&mut self, atom: &str) -> &mut Self {
        let mut single = self.sub();
        single.shorthand(atom);
        self.one_or_more().like(&single)
    }

    fn one_or_more(&mut self) -> &mut Self {
        self.settle();
        if !self.pending.quantity.is_set() {
            self.pending.quantity.min = Some(1);
        }
        self
    }

    // a pending fragment keeps its quantifier
    fn settle(&mut self) {
        if self.pending.fragment != Fragment::None {
            self.flush();
        }
    }

    fn char_set(&mut self, chars: &str, negated: bool) -> &mut Self {
        self.pending.fragment = Fragment::CharSet {
            chars: chars.to_owned(),
            negated,
        };
        self
    }

    // Anchors and lookaheads

    pub fn start_of_input(&mut self) -> &mut Self {
        self.push("(?:^)".to_owned())
    }

    pub fn start_of_line(&mut self) -> &mut Self {
        self.multi_line(true).start_of_input()
    }

    pub fn end_of_input(&mut self) -> &mut Self {
        self.push("(?:$)".to_owned())
    }

    pub fn end_of_line(&mut self) -> &mut Self {
        self.multi_line(true).end_of_input()
    }

    pub fn ahead<'a>(&mut self, operand: impl Into<Operand<'a>>) -> &mut Self {
        self.flush();
        let literal = self.splice(operand.into());
        self.push(format!("(?={})", literal))
    }

    pub fn not_ahead<'a>(&mut self, operand: impl Into<Operand<'a>>) -> &mut Self {
        self.flush();
        let literal = self.splice(operand.into());
        self.push(format!("(?!{})", literal))
    }

    // Alternation

    /// Holds the first branch of an alternation, see `or_find`.
    pub fn either_find<'a>(&mut self, operand: impl Into<Operand<'a>>) -> &mut Self {
        self.flush();
        let literal = self.splice(operand.into());
        self.either = Some(literal);
        self
    }

    /// Closes an alternation with the pending `either_find` branch, or
    /// without one, adds a branch to the last rendered fragment, wrapping
    /// it in a group when it is not one already.
    pub fn or_find<'a>(&mut self, operand: impl Into<Operand<'a>>) -> &mut Self {
        let either = self.either.take();
        self.flush();
        let literal = self.splice(operand.into());

        if let Some(either) = either {
            self.fragments
                .push(format!("(?:(?:{})|(?:{}))", either, literal));
            return self;
        }

        match self.fragments.last_mut() {
            Some(last) if last.ends_with(')') => {
                last.pop();
                last.push_str(&format!("|(?:{}))", literal));
            }
            Some(last) => *last = format!("(?:{}|(?:{}))", last, literal),
            None => self.fragments.push(format!("(?:{})", literal)),
        }
        self
    }

    pub fn any_of<'a, I, O>(&mut self, operands: I) -> &mut Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand<'a>>,
    {
        for (index, operand) in operands.into_iter().enumerate() {
            if index == 0 {
                self.either_find(operand);
            } else {
                self.or_find(operand);
            }
        }
        self
    }

    pub fn neither<'a>(&mut self, operand: impl Into<Operand<'a>>) -> &mut Self {
        self.not_ahead(operand)
    }

    /// Excludes one more alternative in a `neither` chain, followed by anything.
    pub fn nor<'a>(&mut self, operand: impl Into<Operand<'a>>) -> &mut Self {
        // drop the trailing `anything()` of the previous link
        if self.pending.quantity.min == Some(0) && self.pending.fragment == Fragment::AnyChar {
            self.pending.quantity.min = None;
            self.pending.fragment = Fragment::None;
        }

        self.neither(operand).min(0).of_any()
    }

    // Output

    /// The regex body assembled so far, the pending fragment included.
    pub fn literal(&self) -> String {
        let mut literal = self.fragments.concat();
        if let Some(either) = &self.either {
            literal.push_str(&format!("(?:{})", either));
        }
        if let Some(pending) = self.pending.flush(self.groups_used) {
            literal.push_str(&pending);
        }
        literal
    }

    pub fn compile(&self) -> Pattern {
        Pattern::from_parts(self.literal(), self.modifiers, self.delimiter)
    }

    fn push(&mut self, fragment: String) -> &mut Self {
        self.flush();
        self.fragments.push(fragment);
        self
    }

    // renders the held either branch and the pending fragment
    fn flush(&mut self) {
        if let Some(either) = self.either.take() {
            self.fragments.push(format!("(?:{})", either));
        }

        if let Some(literal) = self.pending.flush(self.groups_used) {
            self.groups_used += self.pending.groups();
            self.fragments.push(literal);
            self.pending = Pending::default();
        }
    }

    fn splice(&mut self, operand: Operand) -> String {
        let (literal, groups) = operand.resolve(self.delimiter);
        let literal = renumber_backreferences(&literal, self.groups_used);
        self.groups_used += groups;
        literal
    }
}

impl Display for PatternBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.compile())
    }
}
