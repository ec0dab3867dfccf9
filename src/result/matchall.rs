// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::{cell::OnceCell, ops::Index};

use indexmap::IndexMap;

use crate::{
    engine::RawMatches,
    error::{ErrorContext, RegexError, Result},
    flags::{MatchFlags, MatchOrder},
    key::{IntoKey, Key},
    pattern::Pattern,
};

use super::{matches::looks_numeric, Capture, MatchResult};

/// An entry of a global match: the captures of one group across all
/// occurrences (pattern order), or one occurrence (set order).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchAllEntry<'a> {
    Group(&'a [Capture]),
    Set(&'a MatchResult),
}

impl<'a> MatchAllEntry<'a> {
    pub fn as_group(&self) -> Option<&'a [Capture]> {
        match self {
            MatchAllEntry::Group(captures) => Some(captures),
            MatchAllEntry::Set(_) => None,
        }
    }

    pub fn as_set(&self) -> Option<&'a MatchResult> {
        match self {
            MatchAllEntry::Group(_) => None,
            MatchAllEntry::Set(set) => Some(set),
        }
    }
}

/// The outcome of a global match.
///
/// Occurrences are kept as a sequence of `MatchResult`, the pattern
/// order view (`table`) is built from them on first use.
#[derive(Debug, Clone)]
pub struct MatchAllResult {
    pattern: Pattern,
    subject: String,
    flags: MatchFlags,
    keys: Vec<Key>,
    sets: Vec<MatchResult>,

    // the text of groups missing from an occurrence
    fill: Option<String>,
    table: OnceCell<IndexMap<Key, Vec<Capture>>>,
}

impl MatchAllResult {
    pub(crate) fn new(pattern: Pattern, subject: String, raw: RawMatches, flags: MatchFlags) -> Self {
        let sets = raw
            .sets
            .into_iter()
            .map(|groups| MatchResult::new(pattern.clone(), subject.clone(), Some(groups), flags))
            .collect();

        MatchAllResult {
            pattern,
            subject,
            flags,
            keys: raw.keys,
            sets,
            fill: None,
            table: OnceCell::new(),
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
        !self.sets.is_empty()
    }

    /// The number of occurrences.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn sets(&self) -> &[MatchResult] {
        &self.sets
    }

    pub fn occurrence(&self, index: usize) -> Option<&MatchResult> {
        self.sets.get(index)
    }

    /// Every group of the pattern with its captures across occurrences.
    pub fn table(&self) -> &IndexMap<Key, Vec<Capture>> {
        self.table.get_or_init(|| {
            let offset_capture = self.flags.offset_capture();
            self.keys
                .iter()
                .map(|key| {
                    let captures = self
                        .sets
                        .iter()
                        .map(|set| match set.all().get(key) {
                            Some(capture) => capture.clone(),
                            None => {
                                let mut capture = Capture::absent(offset_capture);
                                if let Some(fill) = &self.fill {
                                    capture.set_text(fill);
                                }
                                capture
                            }
                        })
                        .collect();
                    (key.clone(), captures)
                })
                .collect()
        })
    }

    pub fn get<K: IntoKey>(&self, key: K) -> Result<Option<MatchAllEntry<'_>>> {
        let key = self.resolve(key)?;
        Ok(self.lookup(&key))
    }

    pub fn group<K: IntoKey>(&self, key: K) -> Result<MatchAllEntry<'_>> {
        let key = self.resolve(key)?;
        self.lookup(&key)
            .ok_or_else(|| RegexError::GroupDoesNotExist {
                context: self.context(),
                key: key.to_string(),
            })
    }

    pub fn has<K: IntoKey>(&self, key: K) -> Result<bool> {
        let key = self.resolve(key)?;
        Ok(self.lookup(&key).is_some())
    }

    fn lookup(&self, key: &Key) -> Option<MatchAllEntry<'_>> {
        match self.order() {
            MatchOrder::Pattern => self
                .table()
                .get(key)
                .map(|captures| MatchAllEntry::Group(captures.as_slice())),
            MatchOrder::Set => key
                .as_index()
                .and_then(|index| self.sets.get(index))
                .map(MatchAllEntry::Set),
        }
    }

    /// Groups `1..` across occurrences.
    pub fn groups(&self) -> IndexMap<usize, &[Capture]> {
        self.table()
            .iter()
            .filter_map(|(key, captures)| match key.as_index() {
                Some(0) | None => None,
                Some(index) => Some((index, captures.as_slice())),
            })
            .collect()
    }

    pub fn named_groups(&self) -> IndexMap<&str, &[Capture]> {
        self.table()
            .iter()
            .filter_map(|(key, captures)| key.as_name().map(|name| (name, captures.as_slice())))
            .collect()
    }

    pub fn named_group(&self, name: &str) -> Result<&[Capture]> {
        if name.is_empty() || looks_numeric(name) {
            return Err(RegexError::InvalidGroupIndex {
                context: self.context(),
                key: format!("'{}'", name),
            });
        }

        self.table()
            .get(&Key::Name(name.to_owned()))
            .map(|captures| captures.as_slice())
            .ok_or_else(|| RegexError::NamedGroupDoesntExist {
                context: self.context(),
                name: name.to_owned(),
            })
    }

    /// The number of captures of groups `1..` over all occurrences.
    pub fn count(&self) -> usize {
        match self.order() {
            MatchOrder::Set => self.sets.iter().map(MatchResult::count).sum(),
            MatchOrder::Pattern => self.groups().values().map(|captures| captures.len()).sum(),
        }
    }

    /// Replaces the text of every empty capture of every occurrence
    /// with `value`.
    pub fn default(&mut self, value: &str) -> &mut Self {
        for set in self.sets.iter_mut() {
            set.default(value);
        }
        self.fill = Some(value.to_owned());
        self.table.take();
        self
    }

    pub fn order(&self) -> MatchOrder {
        self.flags.order().unwrap_or_default()
    }

    pub fn is_set_order(&self) -> bool {
        self.order() == MatchOrder::Set
    }

    pub fn is_pattern_order(&self) -> bool {
        self.order() == MatchOrder::Pattern
    }

    pub fn offset_captured(&self) -> bool {
        self.flags.offset_capture()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchResult> {
        self.sets.iter()
    }

    fn resolve<K: IntoKey>(&self, key: K) -> Result<Key> {
        key.into_key().map_err(|key| RegexError::InvalidGroupIndex {
            context: self.context(),
            key,
        })
    }

    fn context(&self) -> ErrorContext {
        ErrorContext::from_text(&self.pattern, &self.subject)
    }
}

impl<'a> IntoIterator for &'a MatchAllResult {
    type Item = &'a MatchResult;
    type IntoIter = std::slice::Iter<'a, MatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}

impl Index<usize> for MatchAllResult {
    type Output = MatchResult;

    fn index(&self, index: usize) -> &Self::Output {
        self.sets.get(index).unwrap_or_else(|| {
            panic!(
                "Index {} is out of range of the occurrences and the number of occurrences is {}.",
                index,
                self.len()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        adapter::Adapter, error::RegexError, flags::MatchFlags, key::Key, pattern::Pattern,
        result::Capture,
    };

    use super::{MatchAllEntry, MatchAllResult};

    const PHONES: &str = "Call 555-1212 or 1-800-555-1212";
    const PHONE_PATTERN: &str = "/\\s*([a-zA-Z]*)\\s*(\\d{0,1}\\-{0,1}(?:\\d\\d\\d\\-){1,2}\\d{4})/u";

    fn match_all(pattern: &str, subject: &str, flags: MatchFlags) -> MatchAllResult {
        Adapter::fancy()
            .match_all(&Pattern::parse(pattern).unwrap(), subject, flags, 0)
            .unwrap()
    }

    fn texts(captures: &[Capture]) -> Vec<&str> {
        captures.iter().map(|c| c.as_str()).collect()
    }

    #[test]
    fn test_pattern_order() {
        let m = match_all(PHONE_PATTERN, PHONES, MatchFlags::PATTERN_ORDER);

        assert!(m.any());
        assert!(m.is_pattern_order());
        assert_eq!(m.len(), 2);
        assert_eq!(m.count(), 4);

        let entry = m.group(1).unwrap();
        assert_eq!(texts(entry.as_group().unwrap()), vec!["Call", "or"]);
        assert_eq!(
            texts(m.group(2).unwrap().as_group().unwrap()),
            vec!["555-1212", "1-800-555-1212"]
        );
        assert_eq!(
            m.groups().keys().copied().collect::<Vec<_>>(),
            vec![1, 2]
        );

        assert!(m.has(0).unwrap());
        assert!(!m.has(3).unwrap());
        assert!(matches!(
            m.group(3),
            Err(RegexError::GroupDoesNotExist { .. })
        ));
    }

    #[test]
    fn test_set_order() {
        let m = match_all(PHONE_PATTERN, PHONES, MatchFlags::SET_ORDER);

        assert!(m.is_set_order());
        assert_eq!(m.count(), 4);

        let second = m.group(1).unwrap().as_set().unwrap();
        assert_eq!(second.matched(), Some(" or 1-800-555-1212"));
        assert_eq!(&m[0][1], "Call");
        assert_eq!(m.iter().count(), 2);

        // occurrences are addressed by position only
        assert_eq!(m.get("name").unwrap(), None);
        assert_eq!(m.get(2).unwrap(), None);

        // the pattern order view is always available
        assert_eq!(texts(&m.table()[&Key::Index(1)]), vec!["Call", "or"]);
    }

    #[test]
    fn test_count_identity() {
        let subject = "a1 b c3";
        for flags in [
            MatchFlags::PATTERN_ORDER,
            MatchFlags::SET_ORDER,
            MatchFlags::PATTERN_ORDER | MatchFlags::OFFSET_CAPTURE,
            MatchFlags::SET_ORDER | MatchFlags::OFFSET_CAPTURE,
        ] {
            let m = match_all("/([a-z])(\\d)?/", subject, flags);
            assert_eq!(m.len(), 3);

            let expected = if m.is_set_order() { 5 } else { 6 };
            assert_eq!(m.count(), expected, "{:?}", flags);
        }
    }

    #[test]
    fn test_no_match() {
        let m = match_all("/(x)(y)/", "abc", MatchFlags::PATTERN_ORDER);
        assert!(!m.any());
        assert_eq!(m.count(), 0);
        assert_eq!(m.group(1).unwrap(), MatchAllEntry::Group(&[]));
    }

    #[test]
    fn test_missing_groups_are_padded() {
        let m = match_all("/([a-z])(\\d)?/", "a1 b", MatchFlags::OFFSET_CAPTURE);
        assert_eq!(
            m.group(2).unwrap().as_group().unwrap(),
            &[
                Capture::Located {
                    text: "1".to_owned(),
                    offset: Some(1)
                },
                Capture::Located {
                    text: "".to_owned(),
                    offset: None
                },
            ]
        );
    }

    #[test]
    fn test_default_applies_to_every_occurrence() {
        let mut m = match_all("/([a-z])(\\d)?/", "a1 b", MatchFlags::PATTERN_ORDER);
        m.default("0");

        assert_eq!(texts(m.group(2).unwrap().as_group().unwrap()), vec!["1", "0"]);
        assert_eq!(m[1].get(2).unwrap(), None);

        let mut m = match_all("/([a-z])(x?)(\\d)/", "a1 bx2", MatchFlags::SET_ORDER);
        m.default("-");
        assert_eq!(&m[0][2], "-");
        assert_eq!(&m[1][2], "x");
    }

    #[test]
    fn test_named_groups() {
        let m = match_all(
            "/(?P<word>[a-z]+)(?P<digit>\\d)/",
            "ab1 cd2",
            MatchFlags::PATTERN_ORDER,
        );

        assert_eq!(
            m.named_groups().keys().copied().collect::<Vec<_>>(),
            vec!["word", "digit"]
        );
        assert_eq!(texts(m.named_group("word").unwrap()), vec!["ab", "cd"]);
        assert!(matches!(
            m.named_group("other"),
            Err(RegexError::NamedGroupDoesntExist { .. })
        ));
        assert!(matches!(
            m.named_group("1"),
            Err(RegexError::InvalidGroupIndex { .. })
        ));
    }
}
