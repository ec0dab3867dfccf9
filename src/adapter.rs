// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use indexmap::IndexMap;

use crate::{
    delimiter::Delimiter,
    engine::{expand_template, Engine, EngineError, FancyEngine, Groups},
    error::{ErrorContext, RegexError, Result},
    flags::{MatchFlags, SplitFlags},
    key::Key,
    pattern::Pattern,
    result::{Capture, MatchAllResult, MatchResult, ReplacementResult, ReplacementSpec},
    subject::Subject,
};

/// Runs patterns on an engine and wraps the raw output into results.
///
/// Engine failures are reported as the error of the operation that
/// hit them, e.g. `MatchError` for `match_first`.
#[derive(Debug, Clone, Default)]
pub struct Adapter<E: Engine = FancyEngine> {
    engine: E,
}

enum Operation {
    Match,
    Replacement,
    Split,
    Filter,
}

fn engine_error(
    operation: Operation,
    pattern: &Pattern,
    subject: &Subject,
    source: EngineError,
) -> RegexError {
    let context = ErrorContext::new(pattern, subject);
    tracing::debug!(%context, error = %source, "engine failure");

    match operation {
        Operation::Match => RegexError::MatchError { context, source },
        Operation::Replacement => RegexError::ReplacementError { context, source },
        Operation::Split => RegexError::SplitError { context, source },
        Operation::Filter => RegexError::FilterError { context, source },
    }
}

impl Adapter<FancyEngine> {
    /// An adapter on `FancyEngine` with the configured backtrack limit.
    pub fn fancy() -> Self {
        Adapter::new(FancyEngine::default())
    }
}

impl<E: Engine> Adapter<E> {
    pub fn new(engine: E) -> Self {
        Adapter { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn is_match(&self, pattern: &Pattern, subject: &str) -> Result<bool> {
        self.engine
            .compile(pattern)
            .and_then(|compiled| self.engine.is_match(&compiled, subject))
            .map_err(|err| engine_error(Operation::Match, pattern, &subject.into(), err))
    }

    /// Matches once, from byte `offset` of the subject.
    pub fn match_first(
        &self,
        pattern: &Pattern,
        subject: &str,
        flags: MatchFlags,
        offset: usize,
    ) -> Result<MatchResult> {
        let flags = flags.resolve();
        let groups = self
            .engine
            .compile(pattern)
            .and_then(|compiled| self.engine.match_first(&compiled, subject, flags, offset))
            .map_err(|err| engine_error(Operation::Match, pattern, &subject.into(), err))?;

        Ok(MatchResult::new(
            pattern.clone(),
            subject.to_owned(),
            groups,
            flags,
        ))
    }

    /// Matches every occurrence, from byte `offset` of the subject.
    pub fn match_all(
        &self,
        pattern: &Pattern,
        subject: &str,
        flags: MatchFlags,
        offset: usize,
    ) -> Result<MatchAllResult> {
        let flags = flags.resolve();
        let raw = self
            .engine
            .compile(pattern)
            .and_then(|compiled| self.engine.match_all(&compiled, subject, flags, offset))
            .map_err(|err| engine_error(Operation::Match, pattern, &subject.into(), err))?;

        Ok(MatchAllResult::new(
            pattern.clone(),
            subject.to_owned(),
            raw,
            flags,
        ))
    }

    /// Replaces matches with a template, see `expand_template` for
    /// the group references it may contain.
    pub fn replace(
        &self,
        pattern: &Pattern,
        template: &str,
        subject: impl Into<Subject>,
        limit: Option<usize>,
    ) -> Result<ReplacementResult> {
        let subject = subject.into();
        let mut replacer = |_: &str, groups: &Groups| expand_template(template, groups);
        let (result, count) = self.replace_each(pattern, &subject, &mut replacer, limit, false)?;

        Ok(ReplacementResult::new(
            pattern.clone(),
            subject,
            ReplacementSpec::Template(template.to_owned()),
            result,
            count,
            limit,
        ))
    }

    /// Replaces matches with the text returned by the callback, which
    /// receives every match as a `MatchResult`.
    pub fn replace_callback<F>(
        &self,
        pattern: &Pattern,
        mut callback: F,
        subject: impl Into<Subject>,
        limit: Option<usize>,
    ) -> Result<ReplacementResult>
    where
        F: FnMut(&MatchResult) -> String,
    {
        let subject = subject.into();
        let mut replacer = |text: &str, groups: &Groups| {
            let m = MatchResult::new(
                pattern.clone(),
                text.to_owned(),
                Some(groups.clone()),
                MatchFlags::empty().resolve(),
            );
            callback(&m)
        };
        let (result, count) = self.replace_each(pattern, &subject, &mut replacer, limit, false)?;

        Ok(ReplacementResult::new(
            pattern.clone(),
            subject,
            ReplacementSpec::Callback,
            result,
            count,
            limit,
        ))
    }

    /// Like `replace`, but `None` when nothing was replaced, and only
    /// the subjects that matched are kept in the result.
    pub fn replaced(
        &self,
        pattern: &Pattern,
        template: &str,
        subject: impl Into<Subject>,
        limit: Option<usize>,
    ) -> Result<Option<ReplacementResult>> {
        let subject = subject.into();
        let mut replacer = |_: &str, groups: &Groups| expand_template(template, groups);
        let (result, count) = self.replace_each(pattern, &subject, &mut replacer, limit, true)?;

        if count == 0 {
            return Ok(None);
        }

        Ok(Some(ReplacementResult::new(
            pattern.clone(),
            subject,
            ReplacementSpec::Template(template.to_owned()),
            result,
            count,
            limit,
        )))
    }

    // one compilation serves every subject, the limit applies to
    // every subject on its own
    fn replace_each(
        &self,
        pattern: &Pattern,
        subject: &Subject,
        replacer: &mut dyn FnMut(&str, &Groups) -> String,
        limit: Option<usize>,
        matched_only: bool,
    ) -> Result<(Subject, usize)> {
        let compiled = self
            .engine
            .compile(pattern)
            .map_err(|err| engine_error(Operation::Replacement, pattern, subject, err))?;

        let mut replace_one = |text: &str| {
            let mut on_match = |groups: &Groups| replacer(text, groups);
            self.engine
                .replace(&compiled, text, &mut on_match, limit)
                .map_err(|err| engine_error(Operation::Replacement, pattern, subject, err))
        };

        match subject {
            Subject::Single(text) => {
                let (result, count) = replace_one(text)?;
                Ok((Subject::Single(result), count))
            }
            Subject::Many(texts) => {
                let mut results = IndexMap::with_capacity(texts.len());
                let mut total = 0;
                for (key, text) in texts {
                    let (result, count) = replace_one(text)?;
                    if count > 0 || !matched_only {
                        results.insert(key.clone(), result);
                    }
                    total += count;
                }
                Ok((Subject::Many(results), total))
            }
        }
    }

    /// Keeps the subjects that match the pattern, or those that do not
    /// when `invert`. A single subject is keyed `0`.
    pub fn filter(
        &self,
        pattern: &Pattern,
        subjects: impl Into<Subject>,
        invert: bool,
    ) -> Result<IndexMap<Key, String>> {
        let subjects = subjects.into();
        self.engine
            .compile(pattern)
            .and_then(|compiled| self.engine.filter(&compiled, &subjects.to_map(), invert))
            .map_err(|err| engine_error(Operation::Filter, pattern, &subjects, err))
    }

    pub fn split(&self, pattern: &Pattern, subject: &str, limit: Option<usize>) -> Result<Vec<String>> {
        let pieces = self.split_with(pattern, subject, limit, SplitFlags::empty())?;
        Ok(pieces
            .into_iter()
            .map(|piece| match piece {
                Capture::Text(text) => text,
                Capture::Located { text, .. } => text,
            })
            .collect())
    }

    pub fn split_with(
        &self,
        pattern: &Pattern,
        subject: &str,
        limit: Option<usize>,
        flags: SplitFlags,
    ) -> Result<Vec<Capture>> {
        self.engine
            .compile(pattern)
            .and_then(|compiled| self.engine.split(&compiled, subject, limit, flags))
            .map_err(|err| engine_error(Operation::Split, pattern, &subject.into(), err))
    }

    pub fn quote(&self, text: &str, delimiter: Option<Delimiter>) -> String {
        self.engine.quote(text, delimiter)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    use crate::{
        delimiter::Delimiter,
        engine::{
            CompiledPattern, Engine, EngineError, ErrorCode, FancyEngine, Groups, RawMatches,
        },
        error::RegexError,
        flags::{MatchFlags, SplitFlags},
        key::Key,
        pattern::Pattern,
        result::Capture,
        subject::Subject,
    };

    use super::Adapter;

    fn pattern(text: &str) -> Pattern {
        Pattern::parse(text).unwrap()
    }

    /// Counts compilations, running everything else on `FancyEngine`.
    #[derive(Default)]
    struct CountingEngine {
        inner: FancyEngine,
        compiles: Cell<usize>,
    }

    impl Engine for CountingEngine {
        type Compiled = CompiledPattern;

        fn compile(&self, pattern: &Pattern) -> Result<CompiledPattern, EngineError> {
            self.compiles.set(self.compiles.get() + 1);
            self.inner.compile(pattern)
        }

        fn is_match(&self, compiled: &CompiledPattern, subject: &str) -> Result<bool, EngineError> {
            self.inner.is_match(compiled, subject)
        }

        fn match_first(
            &self,
            compiled: &CompiledPattern,
            subject: &str,
            flags: MatchFlags,
            offset: usize,
        ) -> Result<Option<Groups>, EngineError> {
            self.inner.match_first(compiled, subject, flags, offset)
        }

        fn match_all(
            &self,
            compiled: &CompiledPattern,
            subject: &str,
            flags: MatchFlags,
            offset: usize,
        ) -> Result<RawMatches, EngineError> {
            self.inner.match_all(compiled, subject, flags, offset)
        }

        fn replace(
            &self,
            compiled: &CompiledPattern,
            subject: &str,
            replacer: &mut dyn FnMut(&Groups) -> String,
            limit: Option<usize>,
        ) -> Result<(String, usize), EngineError> {
            self.inner.replace(compiled, subject, replacer, limit)
        }

        fn split(
            &self,
            compiled: &CompiledPattern,
            subject: &str,
            limit: Option<usize>,
            flags: SplitFlags,
        ) -> Result<Vec<Capture>, EngineError> {
            self.inner.split(compiled, subject, limit, flags)
        }

        fn quote(&self, text: &str, delimiter: Option<Delimiter>) -> String {
            self.inner.quote(text, delimiter)
        }
    }

    #[test]
    fn test_pattern_is_compiled_once_per_operation() {
        let adapter = Adapter::new(CountingEngine::default());
        let digit = pattern("/\\d/");
        let subjects = vec!["a1", "b2", "c3"];

        let r = adapter.replace(&digit, "#", subjects.clone(), None).unwrap();
        assert_eq!(r.to_vec(), vec!["a#", "b#", "c#"]);
        assert_eq!(adapter.engine().compiles.get(), 1);

        adapter
            .replace_callback(&digit, |_| "#".to_owned(), subjects.clone(), None)
            .unwrap();
        assert_eq!(adapter.engine().compiles.get(), 2);

        adapter.filter(&digit, subjects.clone(), false).unwrap();
        assert_eq!(adapter.engine().compiles.get(), 3);

        // a syntax error is reported once, for the whole operation
        let err = adapter
            .replace(&pattern("/(/"), "#", subjects, None)
            .unwrap_err();
        assert!(matches!(
            err,
            RegexError::ReplacementError { ref source, .. } if source.code == ErrorCode::Syntax
        ));
        assert_eq!(adapter.engine().compiles.get(), 4);
    }

    #[test]
    fn test_match_first() {
        let adapter = Adapter::fancy();
        let m = adapter
            .match_first(&pattern("/(?:a){1}/u"), "aab", MatchFlags::empty(), 0)
            .unwrap();

        assert!(m.any());
        assert_eq!(m.get(0).unwrap().map(|c| c.as_str()), Some("a"));
        assert!(m.flags().order().is_some());
    }

    #[test]
    fn test_match_errors() {
        let adapter = Adapter::fancy();

        let err = adapter
            .match_first(&pattern("/(a/u"), "a", MatchFlags::empty(), 0)
            .unwrap_err();
        assert!(matches!(
            err,
            RegexError::MatchError { ref source, .. } if source.code == ErrorCode::Syntax
        ));

        let err = adapter
            .match_all(
                &pattern("/a/"),
                "a",
                MatchFlags::PATTERN_ORDER | MatchFlags::SET_ORDER,
                0,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            RegexError::MatchError { ref source, .. } if source.code == ErrorCode::InvalidFlags
        ));

        let adapter = Adapter::new(FancyEngine::with_backtrack_limit(10));
        let err = adapter
            .is_match(&pattern("/^(?:(a)\\1?)*$/"), "aaaaaaaaaaaaaaaaaaaaaaaab")
            .unwrap_err();
        assert!(matches!(
            err,
            RegexError::MatchError { ref source, .. } if source.code == ErrorCode::BacktrackLimit
        ));
        assert!(err
            .to_string()
            .starts_with("match failed for pattern `/^(?:(a)\\1?)*$/u` with subject `aaaa"));
    }

    #[test]
    fn test_error_context_is_shortened() {
        let adapter = Adapter::fancy();
        let subject = "x".repeat(50);
        let err = adapter.split(&pattern("/(/"), &subject, None).unwrap_err();

        match err {
            RegexError::SplitError { context, .. } => {
                assert_eq!(context.subject, format!("{}...", "x".repeat(40)));
                assert_eq!(context.pattern, "/(/u");
            }
            _ => panic!("unexpected error {:?}", err),
        }
    }

    #[test]
    fn test_filter() {
        let adapter = Adapter::fancy();
        let p = pattern("/^\\+254\\d{9}$/u");

        assert_eq!(
            adapter
                .filter(&p, vec!["0722555121", "+254701888020"], false)
                .unwrap(),
            IndexMap::from([(Key::Index(1), "+254701888020".to_owned())])
        );
        assert_eq!(
            adapter
                .filter(&p, vec!["0722555121", "+254701888020"], true)
                .unwrap(),
            IndexMap::from([(Key::Index(0), "0722555121".to_owned())])
        );

        // a single subject is keyed 0
        assert_eq!(
            adapter.filter(&p, "+254701888020", false).unwrap(),
            IndexMap::from([(Key::Index(0), "+254701888020".to_owned())])
        );

        let err = adapter.filter(&pattern("/[/"), vec!["a"], false).unwrap_err();
        assert!(matches!(err, RegexError::FilterError { .. }));
    }

    #[test]
    fn test_split() {
        let adapter = Adapter::fancy();
        let p = pattern("/[\\s,]+/");
        let subject = "hypertext language, programming";

        assert_eq!(
            adapter.split(&p, subject, None).unwrap(),
            vec!["hypertext", "language", "programming"]
        );
        assert_eq!(
            adapter.split(&p, subject, Some(2)).unwrap(),
            vec!["hypertext", "language, programming"]
        );
        assert_eq!(
            adapter
                .split_with(&p, "a, b", None, SplitFlags::OFFSET_CAPTURE)
                .unwrap(),
            vec![
                Capture::Located {
                    text: "a".to_owned(),
                    offset: Some(0)
                },
                Capture::Located {
                    text: "b".to_owned(),
                    offset: Some(3)
                },
            ]
        );
    }

    #[test]
    fn test_replaced() {
        let adapter = Adapter::fancy();
        let p = pattern("/^0(7\\d{2})/u");
        let subject = Subject::from(IndexMap::from([
            (Key::Name("home".to_owned()), "0722555121".to_owned()),
            (Key::Name("office".to_owned()), "+254701888020".to_owned()),
            (Key::Name("cell".to_owned()), "0733446643".to_owned()),
        ]));

        let r = adapter.replaced(&p, "+254$1", subject, None).unwrap().unwrap();
        assert_eq!(r.count(), 2);
        assert_eq!(
            r.result(),
            &Subject::from(IndexMap::from([
                (Key::Name("home".to_owned()), "+254722555121".to_owned()),
                (Key::Name("cell".to_owned()), "+254733446643".to_owned()),
            ]))
        );

        assert_eq!(
            adapter
                .replaced(&p, "+254$1", "+254722555121", None)
                .unwrap(),
            None
        );
        assert_eq!(
            adapter
                .replaced(&p, "+254$1", vec!["+254722555121", "+254701888020"], None)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_replace_limit_applies_per_subject() {
        let adapter = Adapter::fancy();
        let r = adapter
            .replace(&pattern("/a/"), "b", vec!["aaa", "aa"], Some(1))
            .unwrap();
        assert_eq!(r.to_vec(), vec!["baa", "ba"]);
        assert_eq!(r.count(), 2);
    }

    #[test]
    fn test_replace_callback_receives_matches() {
        let adapter = Adapter::fancy();
        let mut seen = Vec::new();
        let r = adapter
            .replace_callback(
                &pattern("/(\\d)(\\d)/"),
                |m| {
                    seen.push(m.matched().unwrap_or("").to_owned());
                    format!("{}{}", &m[2], &m[1])
                },
                "12 34",
                None,
            )
            .unwrap();

        assert_eq!(r.as_str().unwrap(), "21 43");
        assert_eq!(seen, vec!["12", "34"]);
    }

    #[test]
    fn test_quote() {
        let adapter = Adapter::fancy();
        assert_eq!(adapter.quote("1+1", None), "1\\+1");
        assert_eq!(adapter.quote("a#b", Some(Delimiter::Hash)), "a\\#b");
    }
}
