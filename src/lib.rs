// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

mod adapter;
mod builder;
mod config;
mod delimiter;
mod error;
mod flags;
mod key;
mod modifier;
mod pattern;
mod renumber;
mod subject;

pub mod engine;
pub mod result;

pub use adapter::Adapter;
pub use builder::{Fragment, Grouping, Operand, PatternBuilder, Pending, Quantity};
pub use config::Config;
pub use delimiter::Delimiter;
pub use engine::{Engine, EngineError, ErrorCode, FancyEngine};
pub use error::{ErrorContext, RegexError, Result, Shape};
pub use flags::{MatchFlags, MatchOrder, SplitFlags};
pub use key::{IntoKey, Key};
pub use modifier::Modifiers;
pub use pattern::Pattern;
pub use renumber::renumber_backreferences;
pub use result::{Capture, MatchAllResult, MatchResult, ReplacementResult, ReplacementSpec};
pub use subject::Subject;

/// Creates a pattern from a body, with the configured default
/// modifiers and delimiter.
///
/// ```
/// let phone = regex_fluent::re("^\\+254\\d{9}$");
/// assert!(phone.is_match("+254722555121").unwrap());
/// ```
pub fn re(body: impl Into<String>) -> Pattern {
    Pattern::new(body)
}
