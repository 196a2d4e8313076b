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

//! Core engine for the Retort grammar library.
//!
//! This crate provides the two halves of the engine:
//!
//! - the expression graph ([`Grammar`], [`ExprId`], [`ExprKind`]):
//!   grammars composed from literals, character classes, sequences,
//!   alternations, repetitions, optionals, groups, and forward references,
//!   stored in an id-addressed arena so recursive grammars never form
//!   ownership cycles;
//! - the result tree ([`ParseResults`]): ordered tokens plus named
//!   captures whose recorded positions survive merging, insertion, and
//!   deletion.
//!
//! Grammars are built once and evaluated many times; evaluation never
//! mutates node state, so a grammar can be shared across threads. The one
//! piece of shared mutable state is the [`Settings`] object (default
//! whitespace, diagnostic toggles), guarded by a single lock and mutated
//! only through explicit configuration calls.

mod diagnostic;
mod error;
pub mod grammar;
mod results;
mod settings;
mod value;

pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use error::{RetortError, RetortErrorKind, RetortResult};
pub use grammar::chars;
pub use grammar::{
    ExprId, ExprKind, ExprNode, Grammar, ParseAction, ParseOptions, ParseOptionsBuilder,
    ScanMatches,
};
pub use results::{Anchor, ListValue, OffsetToken, ParseResults, Token};
pub use settings::{Settings, DEFAULT_WHITE_CHARS};
pub use value::Value;
