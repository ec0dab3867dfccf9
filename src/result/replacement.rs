// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::fmt::Display;

use indexmap::IndexMap;

use crate::{
    error::{ErrorContext, RegexError, Result, Shape},
    key::{IntoKey, Key},
    pattern::Pattern,
    subject::Subject,
};

/// What matches were replaced with.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ReplacementSpec {
    Template(String),
    Callback,
}

/// The outcome of a replacement, shaped like the subject it was
/// applied to: a single string or a map of strings.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ReplacementResult {
    pattern: Pattern,
    subject: Subject,
    replacement: ReplacementSpec,
    result: Subject,
    count: usize,
    limit: Option<usize>,
}

impl ReplacementResult {
    pub(crate) fn new(
        pattern: Pattern,
        subject: Subject,
        replacement: ReplacementSpec,
        result: Subject,
        count: usize,
        limit: Option<usize>,
    ) -> Self {
        ReplacementResult {
            pattern,
            subject,
            replacement,
            result,
            count,
            limit,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn result(&self) -> &Subject {
        &self.result
    }

    pub fn replacement(&self) -> &ReplacementSpec {
        &self.replacement
    }

    /// The number of replacements over all subjects.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn is_array(&self) -> bool {
        self.result.is_array()
    }

    pub fn is_string(&self) -> bool {
        self.result.is_string()
    }

    pub fn as_str(&self) -> Result<&str> {
        self.result
            .as_str()
            .ok_or_else(|| self.illegal_access(Shape::Array, Shape::String))
    }

    pub fn has<K: IntoKey>(&self, key: K) -> Result<bool> {
        let (map, key) = self.resolve(key)?;
        Ok(map.contains_key(&key))
    }

    pub fn get<K: IntoKey>(&self, key: K) -> Result<Option<&str>> {
        let (map, key) = self.resolve(key)?;
        Ok(map.get(&key).map(|s| s.as_str()))
    }

    pub fn get_or<'a, K: IntoKey>(&'a self, key: K, default: &'a str) -> Result<&'a str> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    pub fn get_or_else<K, F>(&self, key: K, default: F) -> Result<String>
    where
        K: IntoKey,
        F: FnOnce() -> String,
    {
        Ok(self.get(key)?.map_or_else(default, str::to_owned))
    }

    /// Like `get`, but a missing key is an error.
    pub fn entry<K: IntoKey>(&self, key: K) -> Result<&str> {
        let (map, key) = self.resolve(key)?;
        map.get(&key)
            .map(|s| s.as_str())
            .ok_or_else(|| RegexError::UnknownReplacementKey {
                context: self.context(),
                key: key.to_string(),
            })
    }

    pub fn iter(&self) -> Result<indexmap::map::Iter<'_, Key, String>> {
        self.result
            .as_map()
            .map(|map| map.iter())
            .ok_or_else(|| self.illegal_access(Shape::String, Shape::Array))
    }

    pub fn to_vec(&self) -> Vec<String> {
        match &self.result {
            Subject::Single(text) => vec![text.clone()],
            Subject::Many(map) => map.values().cloned().collect(),
        }
    }

    /// What changed: `None` when the result equals the subject,
    /// otherwise the new string, or the entries that differ from
    /// the subject.
    pub fn replaced(&self) -> Option<Subject> {
        if self.result == self.subject {
            return None;
        }

        match (&self.subject, &self.result) {
            (Subject::Many(before), Subject::Many(after)) => {
                let changed: IndexMap<Key, String> = after
                    .iter()
                    .filter(|(key, value)| before.get(*key) != Some(*value))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                Some(Subject::Many(changed))
            }
            _ => Some(self.result.clone()),
        }
    }

    fn resolve<K: IntoKey>(&self, key: K) -> Result<(&IndexMap<Key, String>, Key)> {
        let map = self
            .result
            .as_map()
            .ok_or_else(|| self.illegal_access(Shape::String, Shape::Array))?;

        let key = key
            .into_key()
            .map_err(|key| RegexError::InvalidReplacementKey {
                context: self.context(),
                key,
            })?;

        Ok((map, key))
    }

    fn illegal_access(&self, actual: Shape, requested: Shape) -> RegexError {
        RegexError::IllegalReplacementTypeAccess {
            context: self.context(),
            actual,
            requested,
        }
    }

    fn context(&self) -> ErrorContext {
        ErrorContext::new(&self.pattern, &self.subject)
    }
}

impl Display for ReplacementResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.result {
            Subject::Single(text) => f.write_str(text),
            Subject::Many(map) => f.write_str(map.values().next().map_or("", |s| s.as_str())),
        }
    }
}
