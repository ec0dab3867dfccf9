// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::{cell::OnceCell, ops::Index};

use indexmap::IndexMap;

use crate::{
    engine::Groups,
    error::{ErrorContext, RegexError, Result},
    flags::{MatchFlags, MatchOrder},
    key::{IntoKey, Key},
    pattern::Pattern,
};

use super::Capture;

/// The outcome of a single match.
///
/// Groups are addressed by index (`0` is the whole match) or by name.
/// Queries never change the result, only `default` rewrites it.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pattern: Pattern,
    subject: String,
    has_match: bool,
    flags: MatchFlags,
    groups: Groups,

    indexed: OnceCell<IndexMap<usize, Capture>>,
    named: OnceCell<IndexMap<String, Capture>>,
}

impl MatchResult {
    pub(crate) fn new(
        pattern: Pattern,
        subject: String,
        groups: Option<Groups>,
        flags: MatchFlags,
    ) -> Self {
        MatchResult {
            pattern,
            subject,
            has_match: groups.is_some(),
            flags,
            groups: groups.unwrap_or_default(),
            indexed: OnceCell::new(),
            named: OnceCell::new(),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn flags(&self) -> MatchFlags {
        self.flags
    }

    pub fn any(&self) -> bool {
        self.has_match
    }

    /// The whole matched text.
    pub fn matched(&self) -> Option<&str> {
        self.groups.get(&Key::Index(0)).map(Capture::as_str)
    }

    /// Every capture, named ones before the index of the same group.
    pub fn all(&self) -> &Groups {
        &self.groups
    }

    pub fn has<K: IntoKey>(&self, key: K) -> Result<bool> {
        let key = self.resolve(key)?;
        Ok(self.groups.contains_key(&key))
    }

    pub fn get<K: IntoKey>(&self, key: K) -> Result<Option<&Capture>> {
        let key = self.resolve(key)?;
        Ok(self.groups.get(&key))
    }

    pub fn get_or<'a, K: IntoKey>(&'a self, key: K, default: &'a str) -> Result<&'a str> {
        Ok(self.get(key)?.map_or(default, Capture::as_str))
    }

    pub fn get_or_else<K, F>(&self, key: K, default: F) -> Result<String>
    where
        K: IntoKey,
        F: FnOnce() -> String,
    {
        Ok(self
            .get(key)?
            .map_or_else(default, |capture| capture.as_str().to_owned()))
    }

    pub fn group<K: IntoKey>(&self, key: K) -> Result<&Capture> {
        let key = self.resolve(key)?;
        self.groups
            .get(&key)
            .ok_or_else(|| RegexError::GroupDoesNotExist {
                context: self.context(),
                key: key.to_string(),
            })
    }

    /// Looks up several groups at once, failing on the first missing one.
    pub fn group_many<I, K>(&self, keys: I) -> Result<IndexMap<Key, &Capture>>
    where
        I: IntoIterator<Item = K>,
        K: IntoKey,
    {
        keys.into_iter()
            .map(|key| {
                let key = self.resolve(key)?;
                let capture = self.group(&key)?;
                Ok((key, capture))
            })
            .collect()
    }

    /// Groups `1..`, in order.
    pub fn groups(&self) -> Vec<&Capture> {
        self.indexed_groups()
            .iter()
            .filter(|(index, _)| **index != 0)
            .map(|(_, capture)| capture)
            .collect()
    }

    pub fn indexed_groups(&self) -> &IndexMap<usize, Capture> {
        self.indexed.get_or_init(|| {
            self.groups
                .iter()
                .filter_map(|(key, capture)| key.as_index().map(|index| (index, capture.clone())))
                .collect()
        })
    }

    pub fn named_groups(&self) -> &IndexMap<String, Capture> {
        self.named.get_or_init(|| {
            self.groups
                .iter()
                .filter_map(|(key, capture)| {
                    key.as_name().map(|name| (name.to_owned(), capture.clone()))
                })
                .collect()
        })
    }

    pub fn named_group(&self, name: &str) -> Result<&Capture> {
        if name.is_empty() || looks_numeric(name) {
            return Err(RegexError::InvalidGroupIndex {
                context: self.context(),
                key: format!("'{}'", name),
            });
        }

        self.named_groups()
            .get(name)
            .ok_or_else(|| RegexError::NamedGroupDoesntExist {
                context: self.context(),
                name: name.to_owned(),
            })
    }

    /// The number of captured groups, the whole match excluded.
    pub fn count(&self) -> usize {
        self.groups.keys().filter(|key| key.as_index().is_some_and(|i| i != 0)).count()
    }

    /// Replaces the text of every empty capture with `value`,
    /// the offsets of located captures are kept.
    pub fn default(&mut self, value: &str) -> &mut Self {
        for capture in self.groups.values_mut() {
            if capture.is_empty() {
                capture.set_text(value);
            }
        }

        self.indexed.take();
        self.named.take();
        self
    }

    pub fn is_set_order(&self) -> bool {
        self.flags.order() == Some(MatchOrder::Set)
    }

    pub fn is_pattern_order(&self) -> bool {
        !self.is_set_order()
    }

    pub fn offset_captured(&self) -> bool {
        self.flags.offset_capture()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capture> {
        self.groups().into_iter()
    }

    fn resolve<K: IntoKey>(&self, key: K) -> Result<Key> {
        key.into_key().map_err(|key| RegexError::InvalidGroupIndex {
            context: self.context(),
            key,
        })
    }

    pub(crate) fn context(&self) -> ErrorContext {
        ErrorContext::from_text(&self.pattern, &self.subject)
    }
}

// numbers in any notation, e.g. "1", "01", "-2" and "1.5"
pub(crate) fn looks_numeric(text: &str) -> bool {
    let text = text.trim();
    let text = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (integer, fraction) = text.split_once('.').unwrap_or((text, ""));

    !(integer.is_empty() && fraction.is_empty())
        && integer.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

// the memoized views are derived from the groups
impl PartialEq for MatchResult {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && self.subject == other.subject
            && self.has_match == other.has_match
            && self.flags == other.flags
            && self.groups == other.groups
    }
}

impl<'a> IntoIterator for &'a MatchResult {
    type Item = &'a Capture;
    type IntoIter = std::vec::IntoIter<&'a Capture>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups().into_iter()
    }
}

impl Index<usize> for MatchResult {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        self.groups
            .get(&Key::Index(index))
            .unwrap_or_else(|| panic!(
                "Index {} is out of range of the capture groups and the number of capture groups is {}.",
                index, self.count()))
            .as_str()
    }
}

impl Index<&str> for MatchResult {
    type Output = str;

    fn index(&self, name: &str) -> &Self::Output {
        self.named_groups()
            .get(name)
            .unwrap_or_else(|| panic!("Cannot find the capture group named \"{}\".", name))
            .as_str()
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    use crate::{
        adapter::Adapter,
        error::RegexError,
        flags::MatchFlags,
        key::Key,
        pattern::Pattern,
        result::Capture,
    };

    use super::{looks_numeric, MatchResult};

    const PHONES: &str = "Call 555-1212 or 1-800-555-1212";

    fn match_first(pattern: &str, subject: &str, flags: MatchFlags) -> MatchResult {
        Adapter::fancy()
            .match_first(&Pattern::parse(pattern).unwrap(), subject, flags, 0)
            .unwrap()
    }

    #[test]
    fn test_match_groups() {
        let m = match_first(
            "/\\s*([a-zA-Z]*)\\s*(\\d{0,1}\\-{0,1}(?:\\d\\d\\d\\-){1,2}\\d{4})/u",
            PHONES,
            MatchFlags::empty(),
        );

        assert!(m.any());
        assert_eq!(m.matched(), Some("Call 555-1212"));
        assert_eq!(m.count(), 2);
        assert_eq!(
            m.groups().iter().map(|c| c.as_str()).collect::<Vec<_>>(),
            vec!["Call", "555-1212"]
        );
        assert_eq!(&m[0], "Call 555-1212");
        assert_eq!(&m[2], "555-1212");
        assert_eq!(m.iter().count(), 2);
        assert!(m.named_groups().is_empty());
    }

    #[test]
    fn test_no_match() {
        let m = match_first("/\\d+/", "none", MatchFlags::empty());
        assert!(!m.any());
        assert_eq!(m.matched(), None);
        assert_eq!(m.count(), 0);
        assert!(m.all().is_empty());
    }

    #[test]
    fn test_get_and_group() {
        let m = match_first(
            "/(?P<year>\\d{4})-(?P<month>\\d{2})/",
            "on 2024-05",
            MatchFlags::empty(),
        );

        assert_eq!(m.get(1).unwrap().map(|c| c.as_str()), Some("2024"));
        assert_eq!(m.get("1").unwrap().map(|c| c.as_str()), Some("2024"));
        assert_eq!(m.get("year").unwrap().map(|c| c.as_str()), Some("2024"));
        assert_eq!(m.get(5).unwrap(), None);

        assert_eq!(m.get_or("day", "01").unwrap(), "01");
        assert_eq!(m.get_or("month", "01").unwrap(), "05");
        assert_eq!(m.get_or_else(9, || "none".to_owned()).unwrap(), "none");

        assert_eq!(m.group("month").unwrap().as_str(), "05");
        assert!(m.has(2).unwrap());
        assert!(!m.has("day").unwrap());

        assert!(matches!(
            m.group(3),
            Err(RegexError::GroupDoesNotExist { key, .. }) if key == "3"
        ));
        assert!(matches!(
            m.get(-1),
            Err(RegexError::InvalidGroupIndex { key, .. }) if key == "-1"
        ));
        assert!(matches!(m.has(""), Err(RegexError::InvalidGroupIndex { .. })));

        assert_eq!(&m["year"], "2024");
    }

    #[test]
    fn test_group_many() {
        let m = match_first("/(?P<a>x)(y)/", "xy", MatchFlags::empty());

        let found = m.group_many(["a", "2"]).unwrap();
        assert_eq!(
            found.keys().cloned().collect::<Vec<_>>(),
            vec![Key::Name("a".to_owned()), Key::Index(2)]
        );
        assert_eq!(found[&Key::Index(2)].as_str(), "y");

        // one missing key fails the whole lookup
        assert!(matches!(
            m.group_many([1, 7]),
            Err(RegexError::GroupDoesNotExist { key, .. }) if key == "7"
        ));
    }

    #[test]
    fn test_named_groups() {
        let m = match_first(
            "/(?P<space>\\s*)(?P<net>07\\d{2})/",
            "0722",
            MatchFlags::empty(),
        );

        assert_eq!(
            m.named_groups(),
            &IndexMap::from([
                ("space".to_owned(), Capture::Text("".to_owned())),
                ("net".to_owned(), Capture::Text("0722".to_owned())),
            ])
        );
        assert_eq!(
            m.indexed_groups().keys().copied().collect::<Vec<_>>(),
            vec![0, 1, 2]
        );

        assert_eq!(m.named_group("net").unwrap().as_str(), "0722");
        assert!(matches!(
            m.named_group("phone"),
            Err(RegexError::NamedGroupDoesntExist { name, .. }) if name == "phone"
        ));
        assert!(matches!(
            m.named_group("2"),
            Err(RegexError::InvalidGroupIndex { .. })
        ));
    }

    #[test]
    fn test_default_substitution() {
        let mut m = match_first("/(a)(x?)(b)/", "ab", MatchFlags::empty());
        assert_eq!(m.get(2).unwrap().map(|c| c.as_str()), Some(""));

        m.default("-");
        assert_eq!(
            m.groups().iter().map(|c| c.as_str()).collect::<Vec<_>>(),
            vec!["a", "-", "b"]
        );
        assert_eq!(m.indexed_groups()[&2].as_str(), "-");

        // a second call changes nothing
        let before = m.all().clone();
        m.default("-");
        assert_eq!(m.all(), &before);
    }

    #[test]
    fn test_default_keeps_offsets() {
        let mut m = match_first("/(a)(x?)(b)/", "zab", MatchFlags::OFFSET_CAPTURE);
        assert!(m.offset_captured());

        m.default("none");
        assert_eq!(
            m.group(2).unwrap(),
            &Capture::Located {
                text: "none".to_owned(),
                offset: Some(2)
            }
        );
        assert_eq!(m.group(3).unwrap().offset(), Some(2));
    }

    #[test]
    fn test_order_queries() {
        let m = match_first("/a/", "a", MatchFlags::SET_ORDER);
        assert!(m.is_set_order());
        assert!(!m.is_pattern_order());

        let m = match_first("/a/", "a", MatchFlags::PATTERN_ORDER);
        assert!(m.is_pattern_order());
        assert!(!m.offset_captured());
    }

    #[test]
    fn test_looks_numeric() {
        assert!(looks_numeric("1"));
        assert!(looks_numeric("01"));
        assert!(looks_numeric("-2"));
        assert!(looks_numeric("1.5"));
        assert!(looks_numeric(" 3 "));

        assert!(!looks_numeric("phone"));
        assert!(!looks_numeric("1a"));
        assert!(!looks_numeric("."));
        assert!(!looks_numeric("-"));
    }
}
