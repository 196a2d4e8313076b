// Dweve Retort - Composable Grammar Engine
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for grammar building, matching, and result access.

use std::fmt;
use thiserror::Error;

/// The kind of error that occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetortErrorKind {
    /// Input did not match at the required position. Recoverable locally:
    /// an alternation tries its next branch, a repetition stops.
    Structural,
    /// Malformed grammar (undefined forward reference, invalid node wiring).
    Grammar,
    /// Unknown capture name passed to a result accessor.
    UnknownName,
    /// Out-of-range position passed to a result accessor.
    IndexOutOfRange,
    /// An error raised inside a user-supplied parse action.
    Action,
}

impl fmt::Display for RetortErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => write!(f, "MatchError"),
            Self::Grammar => write!(f, "GrammarError"),
            Self::UnknownName => write!(f, "NameError"),
            Self::IndexOutOfRange => write!(f, "IndexError"),
            Self::Action => write!(f, "ActionError"),
        }
    }
}

/// An error produced by the grammar engine.
///
/// `position` is a byte offset into the input for match failures and 0 for
/// errors with no position (grammar wiring, result access).
#[derive(Debug, Clone, Error)]
#[error("{kind} at offset {position}: {message}")]
pub struct RetortError {
    /// The kind of error.
    pub kind: RetortErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Byte offset into the input (0 when not applicable).
    pub position: usize,
    /// Expected-token description for match failures.
    pub expected: Option<String>,
    /// Additional context (e.g., "in branch 2 of alternation").
    pub context: Option<String>,
}

impl RetortError {
    /// Create a new error.
    pub fn new(kind: RetortErrorKind, message: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            position,
            expected: None,
            context: None,
        }
    }

    /// Add an expected-token description.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Add context information.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Replace the recorded position.
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    // Convenience constructors for each error kind
    pub fn structural(message: impl Into<String>, position: usize) -> Self {
        Self::new(RetortErrorKind::Structural, message, position)
    }

    pub fn grammar(message: impl Into<String>) -> Self {
        Self::new(RetortErrorKind::Grammar, message, 0)
    }

    pub fn unknown_name(name: &str) -> Self {
        Self::new(
            RetortErrorKind::UnknownName,
            format!("no capture named {:?}", name),
            0,
        )
    }

    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::new(
            RetortErrorKind::IndexOutOfRange,
            format!("index {} out of range for {} tokens", index, len),
            0,
        )
    }

    pub fn action(message: impl Into<String>, position: usize) -> Self {
        Self::new(RetortErrorKind::Action, message, position)
    }

    /// Whether this failure is recoverable by backtracking.
    pub fn is_structural(&self) -> bool {
        self.kind == RetortErrorKind::Structural
    }
}

/// Result type for engine operations.
pub type RetortResult<T> = Result<T, RetortError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== RetortErrorKind Display tests ====================

    #[test]
    fn test_error_kind_display_structural() {
        assert_eq!(format!("{}", RetortErrorKind::Structural), "MatchError");
    }

    #[test]
    fn test_error_kind_display_grammar() {
        assert_eq!(format!("{}", RetortErrorKind::Grammar), "GrammarError");
    }

    #[test]
    fn test_error_kind_display_unknown_name() {
        assert_eq!(format!("{}", RetortErrorKind::UnknownName), "NameError");
    }

    #[test]
    fn test_error_kind_display_index_out_of_range() {
        assert_eq!(format!("{}", RetortErrorKind::IndexOutOfRange), "IndexError");
    }

    #[test]
    fn test_error_kind_display_action() {
        assert_eq!(format!("{}", RetortErrorKind::Action), "ActionError");
    }

    #[test]
    fn test_error_kind_equality() {
        assert_eq!(RetortErrorKind::Structural, RetortErrorKind::Structural);
        assert_ne!(RetortErrorKind::Structural, RetortErrorKind::Grammar);
        assert_ne!(RetortErrorKind::UnknownName, RetortErrorKind::IndexOutOfRange);
    }

    // ==================== RetortError Display tests ====================

    #[test]
    fn test_error_display() {
        let err = RetortError::structural("expected \"mol\"", 17);
        let msg = format!("{}", err);
        assert!(msg.contains("MatchError"));
        assert!(msg.contains("offset 17"));
        assert!(msg.contains("expected \"mol\""));
    }

    #[test]
    fn test_error_with_expected() {
        let err = RetortError::structural("no match", 3).with_expected("digit");
        assert_eq!(err.expected, Some("digit".to_string()));
    }

    #[test]
    fn test_error_with_context() {
        let err = RetortError::grammar("bad node").with_context("while defining forward");
        assert_eq!(err.context, Some("while defining forward".to_string()));
    }

    #[test]
    fn test_error_with_position() {
        let err = RetortError::grammar("late").with_position(9);
        assert_eq!(err.position, 9);
    }

    // ==================== Convenience constructor tests ====================

    #[test]
    fn test_error_structural() {
        let err = RetortError::structural("no match", 5);
        assert_eq!(err.kind, RetortErrorKind::Structural);
        assert_eq!(err.position, 5);
        assert!(err.is_structural());
    }

    #[test]
    fn test_error_grammar() {
        let err = RetortError::grammar("undefined forward");
        assert_eq!(err.kind, RetortErrorKind::Grammar);
        assert_eq!(err.position, 0);
        assert!(!err.is_structural());
    }

    #[test]
    fn test_error_unknown_name() {
        let err = RetortError::unknown_name("coeff");
        assert_eq!(err.kind, RetortErrorKind::UnknownName);
        assert!(err.message.contains("coeff"));
    }

    #[test]
    fn test_error_index_out_of_range() {
        let err = RetortError::index_out_of_range(4, 2);
        assert_eq!(err.kind, RetortErrorKind::IndexOutOfRange);
        assert!(err.message.contains('4'));
        assert!(err.message.contains('2'));
    }

    #[test]
    fn test_error_action() {
        let err = RetortError::action("division by zero", 12);
        assert_eq!(err.kind, RetortErrorKind::Action);
        assert_eq!(err.position, 12);
    }

    #[test]
    fn test_access_error_kinds_are_distinct() {
        let lookup = RetortError::unknown_name("x");
        let index = RetortError::index_out_of_range(0, 0);
        assert_ne!(lookup.kind, index.kind);
    }

    // ==================== Error trait tests ====================

    #[test]
    fn test_error_is_std_error() {
        fn accepts_error<E: std::error::Error>(_: E) {}
        accepts_error(RetortError::structural("test", 0));
    }

    #[test]
    fn test_error_clone() {
        let original = RetortError::structural("msg", 5)
            .with_expected("letter")
            .with_context("in scan");
        let cloned = original.clone();
        assert_eq!(original.kind, cloned.kind);
        assert_eq!(original.message, cloned.message);
        assert_eq!(original.position, cloned.position);
        assert_eq!(original.expected, cloned.expected);
        assert_eq!(original.context, cloned.context);
    }

    // ==================== Edge cases ====================

    #[test]
    fn test_error_empty_message() {
        let err = RetortError::structural("", 0);
        assert_eq!(err.message, "");
    }

    #[test]
    fn test_error_chained_builders() {
        let err = RetortError::structural("no match", 2)
            .with_expected("\"Na\"")
            .with_context("in alternation");
        assert_eq!(err.expected, Some("\"Na\"".to_string()));
        assert_eq!(err.context, Some("in alternation".to_string()));
    }

    #[test]
    fn test_error_large_position() {
        let err = RetortError::structural("end", usize::MAX);
        assert_eq!(err.position, usize::MAX);
    }

    #[test]
    fn test_error_debug() {
        let err = RetortError::grammar("bad");
        let debug = format!("{:?}", err);
        assert!(debug.contains("Grammar"));
        assert!(debug.contains("bad"));
    }
}
