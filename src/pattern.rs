// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::{fmt::Display, str::FromStr};

use indexmap::IndexMap;

use crate::{
    adapter::Adapter,
    config::Config,
    delimiter::Delimiter,
    error::{RegexError, Result},
    flags::{MatchFlags, SplitFlags},
    key::Key,
    modifier::{Modifiers, ALL_LETTERS},
    result::{Capture, MatchAllResult, MatchResult, ReplacementResult},
    subject::Subject,
};

/// An immutable regex: a body together with its delimiter and modifiers.
///
/// The wire format (see `Display`) is `<delimiter><body><delimiter><modifiers>`,
/// e.g. `/^\+254\d{9}$/u`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Pattern {
    body: String,
    modifiers: Modifiers,
    delimiter: Delimiter,
}

impl Pattern {
    /// Creates a pattern with the configured default modifiers and delimiter.
    pub fn new(body: impl Into<String>) -> Self {
        let config = Config::current();
        Pattern {
            body: body.into(),
            modifiers: config.modifiers,
            delimiter: config.delimiter,
        }
    }

    pub fn from_parts(body: impl Into<String>, modifiers: Modifiers, delimiter: Delimiter) -> Self {
        Pattern {
            body: body.into(),
            modifiers,
            delimiter,
        }
    }

    /// Splits a wire-format string into body, delimiter and modifiers.
    ///
    /// A string that does not start with a delimiter, or whose closing
    /// delimiter is not followed by modifier letters only, is taken
    /// as a body as a whole. Missing modifiers fall back to the
    /// configured defaults.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim_matches(' ');
        if text.is_empty() {
            return Err(RegexError::InvalidRegexPattern(text.to_owned()));
        }

        let config = Config::current();

        if let Some((body, modifiers, delimiter)) = split_delimited(text) {
            let modifiers = Modifiers::parse(modifiers)?;
            let modifiers = if modifiers.is_empty() {
                config.modifiers
            } else {
                modifiers
            };
            return Ok(Pattern::from_parts(body, modifiers, delimiter));
        }

        Ok(Pattern::from_parts(text, config.modifiers, config.delimiter))
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    pub fn has_modifiers(&self, modifiers: Modifiers) -> bool {
        self.modifiers.contains(modifiers)
    }

    pub fn with_modifiers(&self, modifiers: Modifiers) -> Pattern {
        Pattern {
            modifiers,
            ..self.clone()
        }
    }

    pub fn with_delimiter(&self, delimiter: Delimiter) -> Pattern {
        Pattern {
            delimiter,
            ..self.clone()
        }
    }

    pub fn is_match(&self, subject: &str) -> Result<bool> {
        Adapter::fancy().is_match(self, subject)
    }

    pub fn match_first(&self, subject: &str) -> Result<MatchResult> {
        Adapter::fancy().match_first(self, subject, MatchFlags::empty(), 0)
    }

    pub fn match_all(&self, subject: &str, flags: MatchFlags) -> Result<MatchAllResult> {
        Adapter::fancy().match_all(self, subject, flags, 0)
    }

    pub fn replace(
        &self,
        template: &str,
        subject: impl Into<Subject>,
        limit: Option<usize>,
    ) -> Result<ReplacementResult> {
        Adapter::fancy().replace(self, template, subject, limit)
    }

    pub fn replace_callback<F>(
        &self,
        callback: F,
        subject: impl Into<Subject>,
        limit: Option<usize>,
    ) -> Result<ReplacementResult>
    where
        F: FnMut(&MatchResult) -> String,
    {
        Adapter::fancy().replace_callback(self, callback, subject, limit)
    }

    pub fn replaced(
        &self,
        template: &str,
        subject: impl Into<Subject>,
        limit: Option<usize>,
    ) -> Result<Option<ReplacementResult>> {
        Adapter::fancy().replaced(self, template, subject, limit)
    }

    pub fn filter(&self, subjects: impl Into<Subject>, invert: bool) -> Result<IndexMap<Key, String>> {
        Adapter::fancy().filter(self, subjects, invert)
    }

    pub fn split(&self, subject: &str, limit: Option<usize>) -> Result<Vec<String>> {
        Adapter::fancy().split(self, subject, limit)
    }

    pub fn split_with(
        &self,
        subject: &str,
        limit: Option<usize>,
        flags: SplitFlags,
    ) -> Result<Vec<Capture>> {
        Adapter::fancy().split_with(self, subject, limit, flags)
    }
}

// returns (body, modifiers, delimiter)
fn split_delimited(text: &str) -> Option<(&str, &str, Delimiter)> {
    let first = text.chars().next()?;
    let delimiter = Delimiter::from_char(first)?;
    let rest = &text[first.len_utf8()..];

    // the last closing delimiter followed by modifier letters only,
    // the body is never empty
    rest.rmatch_indices(first)
        .filter(|(index, _)| *index > 0)
        .map(|(index, _)| (&rest[..index], &rest[index + first.len_utf8()..]))
        .find(|(_, suffix)| {
            suffix
                .chars()
                .all(|c| c.is_whitespace() || ALL_LETTERS.contains(c))
        })
        .map(|(body, suffix)| (body, suffix, delimiter))
}

impl FromStr for Pattern {
    type Err = RegexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Pattern::parse(s)
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let delimiter = self.delimiter.as_char();
        write!(f, "{}{}{}{}", delimiter, self.body, delimiter, self.modifiers)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{delimiter::Delimiter, error::RegexError, modifier::Modifiers};

    use super::Pattern;

    #[test]
    fn test_parse_pattern() {
        let p = Pattern::parse("/[\\s,]+/").unwrap();
        assert_eq!(p.body(), "[\\s,]+");
        assert_eq!(p.delimiter(), Delimiter::Slash);
        assert_eq!(p.modifiers(), Modifiers::UTF8);

        let p = Pattern::parse("#(?:\\D+|<\\d+>)*[!?]#usm").unwrap();
        assert_eq!(p.body(), "(?:\\D+|<\\d+>)*[!?]");
        assert_eq!(p.delimiter(), Delimiter::Hash);
        assert_eq!(
            p.modifiers(),
            Modifiers::UTF8 | Modifiers::DOTALL | Modifiers::MULTILINE
        );

        // surrounding spaces
        let p = Pattern::parse("  ~a/b~i ").unwrap();
        assert_eq!(p.body(), "a/b");
        assert_eq!(p.delimiter(), Delimiter::Tilde);
        assert_eq!(p.modifiers(), Modifiers::CASELESS);

        // the last delimiter closes the body
        let p = Pattern::parse("/a/b/u").unwrap();
        assert_eq!(p.body(), "a/b");
    }

    #[test]
    fn test_parse_undelimited_pattern() {
        let p = Pattern::parse("\n[\\s,]+").unwrap();
        assert_eq!(p.body(), "\n[\\s,]+");
        assert_eq!(p.delimiter(), Delimiter::Slash);
        assert_eq!(p.modifiers(), Modifiers::UTF8);

        let p = Pattern::parse("(?:(?:\\D+|<\\d+>)*[!?])").unwrap();
        assert_eq!(p.body(), "(?:(?:\\D+|<\\d+>)*[!?])");

        // not a modifier suffix
        let p = Pattern::parse("/abc/g").unwrap();
        assert_eq!(p.body(), "/abc/g");

        // no closing delimiter
        let p = Pattern::parse("+254").unwrap();
        assert_eq!(p.body(), "+254");

        // a lone delimiter pair has no body
        let p = Pattern::parse("//").unwrap();
        assert_eq!(p.body(), "//");

        assert_eq!(
            Pattern::parse("   "),
            Err(RegexError::InvalidRegexPattern("".to_owned()))
        );
    }

    #[test]
    fn test_display_pattern() {
        let p = Pattern::from_parts("^\\+254\\d{9}$", Modifiers::UTF8, Delimiter::Slash);
        assert_eq!(p.to_string(), "/^\\+254\\d{9}$/u");

        let p = p
            .with_delimiter(Delimiter::Percent)
            .with_modifiers(Modifiers::CASELESS | Modifiers::EXTENDED);
        assert_eq!(p.to_string(), "%^\\+254\\d{9}$%ix");

        let p: Pattern = "#(a)(b)#ius".parse().unwrap();
        assert_eq!(p.to_string(), "#(a)(b)#uis");
        assert_eq!(Pattern::parse(&p.to_string()), Ok(p));
    }

    #[test]
    fn test_pattern_operations() {
        let p = Pattern::parse("/^\\+254\\d{9}$/u").unwrap();
        assert!(p.is_match("+254701888020").unwrap());
        assert!(!p.is_match("0722555121").unwrap());

        let filtered = p.filter(vec!["0722555121", "+254701888020"], false).unwrap();
        assert_eq!(
            filtered.values().cloned().collect::<Vec<_>>(),
            vec!["+254701888020".to_owned()]
        );

        let p = Pattern::parse("/[\\s,]+/").unwrap();
        assert_eq!(
            p.split("hypertext language, programming", None).unwrap(),
            vec!["hypertext", "language", "programming"]
        );

        let r = Pattern::new("o").replace("0", "foo", None).unwrap();
        assert_eq!(r.to_string(), "f00");
        assert_eq!(r.count(), 2);
    }
}
