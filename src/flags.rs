// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use crate::config::Config;

bitflags::bitflags! {
    /// Flags shaping the output of match operations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MatchFlags: u8 {
        /// Global matches are grouped by capture group, each group
        /// holding its captures across all occurrences.
        const PATTERN_ORDER  = 1;

        /// Global matches are grouped by occurrence, each occurrence
        /// holding all of its own captures.
        const SET_ORDER      = 2;

        /// Every capture is paired with its byte offset in the subject.
        const OFFSET_CAPTURE = 4;
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SplitFlags: u8 {
        /// Drop empty pieces from the output.
        const NO_EMPTY       = 1;

        /// Also return the text captured by groups of the delimiter pattern.
        const DELIM_CAPTURE  = 2;

        /// Pair every piece with its byte offset in the subject.
        const OFFSET_CAPTURE = 4;
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub enum MatchOrder {
    #[default]
    Pattern,
    Set,
}

impl MatchFlags {
    pub fn offset_capture(&self) -> bool {
        self.contains(MatchFlags::OFFSET_CAPTURE)
    }

    /// The order requested by the flags, `None` when both orders
    /// are requested at once.
    /// Without an order flag the configured default order applies.
    pub fn order(&self) -> Option<MatchOrder> {
        match (
            self.contains(MatchFlags::PATTERN_ORDER),
            self.contains(MatchFlags::SET_ORDER),
        ) {
            (true, true) => None,
            (true, false) => Some(MatchOrder::Pattern),
            (false, true) => Some(MatchOrder::Set),
            (false, false) => Some(Config::current().match_order),
        }
    }

    /// Returns the flags with the order bit made explicit.
    pub fn resolve(&self) -> MatchFlags {
        match self.order() {
            Some(MatchOrder::Pattern) => *self | MatchFlags::PATTERN_ORDER,
            Some(MatchOrder::Set) => *self | MatchFlags::SET_ORDER,
            None => *self,
        }
    }
}

impl From<MatchOrder> for MatchFlags {
    fn from(value: MatchOrder) -> Self {
        match value {
            MatchOrder::Pattern => MatchFlags::PATTERN_ORDER,
            MatchOrder::Set => MatchFlags::SET_ORDER,
        }
    }
}
