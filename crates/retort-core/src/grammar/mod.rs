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

//! The expression graph: construction, traversal, and evaluation.
//!
//! Grammars are assembled through [`Grammar`]'s builder methods into an
//! arena of [`ExprNode`]s addressed by [`ExprId`] handles, then evaluated
//! with [`Grammar::parse`] or scanned with [`Grammar::scan`]. Forward
//! references ([`Grammar::forward`] + [`Grammar::define`]) make recursive
//! grammars possible; cycles are index cycles, never ownership cycles.
//!
//! # Example
//!
//! ```
//! use retort_core::{chars, Grammar};
//!
//! let mut g = Grammar::new();
//! let symbol = g.word(chars::ALPHAS);
//! let count = g.word(chars::NUMS);
//! g.set_results_name(symbol, "symbol");
//! g.set_results_name(count, "count");
//! let opt_count = g.optional(count);
//! let term = g.sequence(&[symbol, opt_count]);
//!
//! let hit = g.parse_all(term, "He4").unwrap();
//! assert_eq!(hit.get_named("symbol").unwrap().as_str(), Some("He"));
//! assert_eq!(hit.get_named("count").unwrap().as_str(), Some("4"));
//! ```

pub mod chars;

mod build;
mod eval;
mod node;
mod parser;
mod traverse;

pub use build::Grammar;
pub use node::{ExprId, ExprKind, ExprNode, ParseAction};
pub use parser::{ParseOptions, ParseOptionsBuilder, ScanMatches};
