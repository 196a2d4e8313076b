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

//! # Retort - Composable Grammar Engine
//!
//! Retort builds grammars by composing small matching primitives
//! (literals, character classes, sequences, alternations, repetitions,
//! forward references) into an expression graph, and evaluates that graph
//! against text to produce a structured, queryable result tree.
//!
//! ## Quick Start
//!
//! ```rust
//! use retort::{chars, Grammar};
//!
//! // term := symbol count?   e.g. "He4" or "Na"
//! let mut g = Grammar::new();
//! let symbol = g.word(chars::ALPHAS);
//! let count = g.word(chars::NUMS);
//! g.set_results_name(symbol, "symbol");
//! g.set_results_name(count, "count");
//! let opt_count = g.optional(count);
//! let term = g.sequence(&[symbol, opt_count]);
//!
//! let hit = g.parse_all(term, "He4").expect("term matches");
//! assert_eq!(hit.get_named("symbol").unwrap().as_str(), Some("He"));
//! assert_eq!(hit.get_named("count").unwrap().as_str(), Some("4"));
//!
//! // Scan an input for every occurrence.
//! let found = g.scan(term, "mix of Na and Cl2").count();
//! assert_eq!(found, 5);
//! ```
//!
//! ## Features
//!
//! - **Arena-backed graphs**: expressions refer to each other by id, so
//!   recursive grammars never form ownership cycles
//! - **Forward references**: define a rule after the expressions that use
//!   it, enabling self-referential grammars
//! - **Queryable results**: positional and named access, merge-safe
//!   capture offsets, nested and flattened list views
//! - **Parse actions**: post-match transforms that can rewrite or veto a
//!   match
//! - **Advisory diagnostics**: structural warnings about suspicious
//!   grammars, toggled globally and suppressible per node
//!
//! ## Modules
//!
//! - [`chars`]: common character classes for word expressions

// Re-export core types
pub use retort_core::{
    // Character classes
    chars,
    // Diagnostics
    Diagnostic,
    DiagnosticKind,
    // Grammar graph
    ExprId,
    ExprKind,
    ExprNode,
    Grammar,
    // Results
    Anchor,
    ListValue,
    OffsetToken,
    ParseAction,
    ParseOptions,
    ParseOptionsBuilder,
    ParseResults,
    // Errors
    RetortError,
    RetortErrorKind,
    RetortResult,
    ScanMatches,
    Settings,
    Severity,
    Token,
    Value,
    DEFAULT_WHITE_CHARS,
};

// Error handling extensions
mod error_ext;
pub use error_ext::RetortResultExt;

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
