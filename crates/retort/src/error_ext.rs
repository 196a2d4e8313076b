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

//! Error context helpers for improved ergonomics.
//!
//! This module provides an extension trait for `Result` that makes it easy
//! to add contextual information to errors as they propagate through the
//! call stack.
//!
//! # Examples
//!
//! ## Basic Context
//!
//! ```rust
//! use retort::{Grammar, RetortResultExt};
//!
//! let mut g = Grammar::new();
//! let rule = g.literal("mol");
//! let err = g
//!     .parse_all(rule, "gram")
//!     .context("while reading the unit field")
//!     .unwrap_err();
//! assert_eq!(err.context.as_deref(), Some("while reading the unit field"));
//! ```
//!
//! ## Lazy Context with Closures
//!
//! Use `with_context` when the context message is expensive to compute:
//!
//! ```rust
//! use retort::{Grammar, RetortResultExt};
//!
//! fn check(g: &Grammar, rule: retort::ExprId, line: usize, text: &str)
//!     -> Result<retort::ParseResults, retort::RetortError>
//! {
//!     g.parse_all(rule, text)
//!         .with_context(|| format!("on line {} ({} bytes)", line, text.len()))
//! }
//! ```
//!
//! ## Converting Foreign Errors
//!
//! ```rust
//! use retort::{RetortError, RetortResultExt};
//!
//! fn read_grammar_file(path: &str) -> Result<String, RetortError> {
//!     std::fs::read_to_string(path)
//!         .map_err_to_retort(|e| RetortError::grammar(format!("failed to read {}: {}", path, e)))
//! }
//! ```

use crate::RetortError;
use std::fmt;

fn add_context_to_error(mut error: RetortError, context: String) -> RetortError {
    error.context = match error.context.take() {
        Some(existing) => Some(format!("{}; {}", context, existing)),
        None => Some(context),
    };
    error
}

/// Extension trait for adding context to `Result`s that flow into
/// [`RetortError`].
///
/// Context is appended to the error's `context` field without modifying
/// the original error message, and chains through multiple layers.
pub trait RetortResultExt<T> {
    /// The error type for this Result
    type ErrorType;

    /// Add context to an error.
    ///
    /// Immediately evaluates the context message. For expensive context
    /// computations, prefer [`with_context`].
    ///
    /// [`with_context`]: RetortResultExt::with_context
    fn context<C>(self, context: C) -> Result<T, RetortError>
    where
        C: fmt::Display;

    /// Add context to an error using a closure, evaluated only on the
    /// error path.
    fn with_context<C, F>(self, f: F) -> Result<T, RetortError>
    where
        C: fmt::Display,
        F: FnOnce() -> C;

    /// Convert a foreign error type to `RetortError`.
    fn map_err_to_retort<F>(self, f: F) -> Result<T, RetortError>
    where
        F: FnOnce(Self::ErrorType) -> RetortError,
        Self: Sized;
}

// Specialized implementation for the engine's own error type
impl<T> RetortResultExt<T> for Result<T, RetortError> {
    type ErrorType = RetortError;

    fn context<C>(self, context: C) -> Result<T, RetortError>
    where
        C: fmt::Display,
    {
        self.map_err(|e| add_context_to_error(e, context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, RetortError>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| add_context_to_error(e, f().to_string()))
    }

    fn map_err_to_retort<F>(self, _f: F) -> Result<T, RetortError>
    where
        F: FnOnce(Self::ErrorType) -> RetortError,
    {
        // Already a RetortError; nothing to convert.
        self
    }
}

// Specialized implementation for I/O errors (grammar files, test inputs)
impl<T> RetortResultExt<T> for Result<T, std::io::Error> {
    type ErrorType = std::io::Error;

    fn context<C>(self, context: C) -> Result<T, RetortError>
    where
        C: fmt::Display,
    {
        self.map_err(|e| {
            add_context_to_error(RetortError::grammar(e.to_string()), context.to_string())
        })
    }

    fn with_context<C, F>(self, f: F) -> Result<T, RetortError>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            add_context_to_error(RetortError::grammar(e.to_string()), f().to_string())
        })
    }

    fn map_err_to_retort<F>(self, f: F) -> Result<T, RetortError>
    where
        F: FnOnce(Self::ErrorType) -> RetortError,
    {
        self.map_err(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fail() -> Result<(), RetortError> {
        Err(RetortError::structural("no match", 3))
    }

    #[test]
    fn test_context_added() {
        let err = fail().context("outer").unwrap_err();
        assert_eq!(err.context.as_deref(), Some("outer"));
        assert_eq!(err.position, 3);
    }

    #[test]
    fn test_context_chains() {
        let err = fail().context("inner").context("outer").unwrap_err();
        let ctx = err.context.unwrap();
        assert!(ctx.contains("inner"));
        assert!(ctx.contains("outer"));
    }

    #[test]
    fn test_with_context_lazy() {
        let mut ran = false;
        let ok: Result<i32, RetortError> = Ok(1);
        let value = ok
            .with_context(|| {
                ran = true;
                "context"
            })
            .unwrap();
        assert_eq!(value, 1);
        assert!(!ran);
    }

    #[test]
    fn test_with_context_on_error() {
        let err = fail().with_context(|| format!("attempt {}", 2)).unwrap_err();
        assert_eq!(err.context.as_deref(), Some("attempt 2"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing file",
        ));
        let err = io.context("loading grammar").unwrap_err();
        assert_eq!(err.kind, crate::RetortErrorKind::Grammar);
        assert!(err.message.contains("missing file"));
    }

    #[test]
    fn test_map_err_to_retort() {
        let io: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "boom",
        ));
        let err = io
            .map_err_to_retort(|e| RetortError::grammar(format!("io: {}", e)))
            .unwrap_err();
        assert!(err.message.contains("boom"));
    }

    #[test]
    fn test_map_err_to_retort_identity() {
        let err = fail()
            .map_err_to_retort(|e| e.with_context("never used"))
            .unwrap_err();
        assert!(err.context.is_none());
    }
}
