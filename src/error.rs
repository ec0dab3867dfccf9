// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::fmt::Display;

use crate::{engine::EngineError, pattern::Pattern, subject::Subject};

const PREVIEW_MAX_CHARS: usize = 40;

/// The pattern and subject an error was raised for, both shortened
/// to a preview suitable for messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    pub pattern: String,
    pub subject: String,
}

impl ErrorContext {
    pub fn new(pattern: &Pattern, subject: &Subject) -> Self {
        Self {
            pattern: preview(&pattern.to_string()),
            subject: preview(&subject.to_string()),
        }
    }

    pub fn from_text(pattern: &Pattern, subject: &str) -> Self {
        Self {
            pattern: preview(&pattern.to_string()),
            subject: preview(subject),
        }
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pattern `{}` with subject `{}`", self.pattern, self.subject)
    }
}

/// Whether a replacement result holds one string or an array of strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    String,
    Array,
}

impl Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::String => f.write_str("string"),
            Shape::Array => f.write_str("array"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegexError {
    #[error("invalid modifier(s) '{0}', expected letters from 'uimsxADSUXJ'")]
    InvalidModifier(String),

    #[error("invalid delimiter '{0}', expected '/', '~', '#', '%' or '+'")]
    InvalidDelimiter(String),

    #[error("cannot convert '{0}' into a regex pattern")]
    InvalidRegexPattern(String),

    #[error("match failed for {context}: {source}")]
    MatchError {
        context: ErrorContext,
        source: EngineError,
    },

    #[error("split failed for {context}: {source}")]
    SplitError {
        context: ErrorContext,
        source: EngineError,
    },

    #[error("filter failed for {context}: {source}")]
    FilterError {
        context: ErrorContext,
        source: EngineError,
    },

    #[error("replacement failed for {context}: {source}")]
    ReplacementError {
        context: ErrorContext,
        source: EngineError,
    },

    #[error("{context} didn't capture group {key}")]
    GroupDoesNotExist { context: ErrorContext, key: String },

    #[error("{context} didn't capture a group named '{name}'")]
    NamedGroupDoesntExist { context: ErrorContext, name: String },

    #[error("{context} cannot be indexed by {key}, expected a group number or name")]
    InvalidGroupIndex { context: ErrorContext, key: String },

    #[error("replacement result for {context} has no key {key}")]
    UnknownReplacementKey { context: ErrorContext, key: String },

    #[error("replacement result for {context} cannot be indexed by {key}")]
    InvalidReplacementKey { context: ErrorContext, key: String },

    #[error("{actual} replacement result for {context} can't be accessed as {requested}")]
    IllegalReplacementTypeAccess {
        context: ErrorContext,
        actual: Shape,
        requested: Shape,
    },
}

pub type Result<T> = std::result::Result<T, RegexError>;

/// Shortens the text to at most 40 characters, appending "..." when cut.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_MAX_CHARS) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{engine::ErrorCode, pattern::Pattern, subject::Subject};

    use super::{preview, ErrorContext, RegexError, Shape};

    #[test]
    fn test_preview() {
        assert_eq!(preview("short"), "short");
        assert_eq!(
            preview("0123456789012345678901234567890123456789"),
            "0123456789012345678901234567890123456789"
        );
        assert_eq!(
            preview("0123456789012345678901234567890123456789xyz"),
            "0123456789012345678901234567890123456789..."
        );

        // cut on chars, not bytes
        let text = "文".repeat(41);
        assert_eq!(preview(&text), format!("{}...", "文".repeat(40)));
    }

    #[test]
    fn test_error_messages() {
        let pattern = Pattern::parse("/(a)/u").unwrap();
        let context = ErrorContext::new(&pattern, &Subject::from(vec!["x", "y"]));

        let err = RegexError::GroupDoesNotExist {
            context: context.clone(),
            key: "3".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "pattern `/(a)/u` with subject `[x, y]` didn't capture group 3"
        );

        let err = RegexError::IllegalReplacementTypeAccess {
            context: context.clone(),
            actual: Shape::String,
            requested: Shape::Array,
        };
        assert_eq!(
            err.to_string(),
            "string replacement result for pattern `/(a)/u` with subject `[x, y]` can't be accessed as array"
        );

        let err = RegexError::MatchError {
            context,
            source: crate::engine::EngineError::new(ErrorCode::BacktrackLimit, "too much"),
        };
        assert_eq!(
            err.to_string(),
            "match failed for pattern `/(a)/u` with subject `[x, y]`: BACKTRACK_LIMIT_ERROR: too much"
        );
    }
}
