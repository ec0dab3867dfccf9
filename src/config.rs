// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use parking_lot::RwLock;

use crate::{delimiter::Delimiter, error::RegexError, flags::MatchOrder, modifier::Modifiers};

/// Process-wide defaults consumed by patterns, builders and engines
/// created without explicit settings.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Config {
    pub delimiter: Delimiter,
    pub modifiers: Modifiers,
    pub match_order: MatchOrder,
    pub backtrack_limit: usize,
}

static CURRENT: RwLock<Config> = parking_lot::const_rwlock(Config::DEFAULT);

impl Config {
    pub const DEFAULT: Config = Config {
        delimiter: Delimiter::Slash,
        modifiers: Modifiers::UTF8,
        match_order: MatchOrder::Pattern,
        backtrack_limit: 1_000_000,
    };

    pub fn current() -> Config {
        *CURRENT.read()
    }

    /// Replaces the process-wide defaults, returning the previous ones.
    pub fn install(config: Config) -> Config {
        std::mem::replace(&mut *CURRENT.write(), config)
    }

    pub fn set_delimiter(delimiter: Delimiter) {
        CURRENT.write().delimiter = delimiter;
    }

    pub fn set_modifiers(modifiers: &str) -> Result<(), RegexError> {
        let modifiers = Modifiers::parse(modifiers)?;
        CURRENT.write().modifiers = modifiers;
        Ok(())
    }

    pub fn set_match_order(order: MatchOrder) {
        CURRENT.write().match_order = order;
    }

    pub fn set_backtrack_limit(limit: usize) {
        CURRENT.write().backtrack_limit = limit;
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::DEFAULT
    }
}
