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

//! Expression-graph vertices.
//!
//! Nodes live in the arena owned by [`Grammar`](crate::Grammar) and refer to
//! each other through [`ExprId`] handles, so recursive grammars are plain
//! index cycles rather than ownership cycles. Each node pairs a closed
//! [`ExprKind`] variant with the base configuration shared by every kind
//! (whitespace handling, capture name, parse actions, diagnostics
//! suppression).

use crate::diagnostic::DiagnosticKind;
use crate::error::RetortResult;
use crate::results::ParseResults;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Stable handle to an expression node inside one grammar's arena.
///
/// Handles are only meaningful for the grammar that minted them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Arena index of this node.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expr#{}", self.0)
    }
}

/// A post-match transform.
///
/// Receives the input, the byte offset the match started at, and the match
/// results; returns `Ok(Some(..))` to replace the results, `Ok(None)` to
/// keep them. A structural error vetoes the match (recoverable, like any
/// match failure); any other error aborts the parse and is attributed to
/// the action.
pub type ParseAction =
    Arc<dyn Fn(&str, usize, &ParseResults) -> RetortResult<Option<ParseResults>> + Send + Sync>;

/// The closed set of expression-node kinds.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Matches nothing, consumes nothing, always succeeds.
    Empty,
    /// Matches an exact string.
    Literal(String),
    /// Matches a run of characters drawn from a class.
    Word {
        chars: BTreeSet<char>,
        min: usize,
        max: Option<usize>,
    },
    /// Matches each part in order.
    Sequence(Vec<ExprId>),
    /// Tries each branch in order; first success wins.
    Alternation(Vec<ExprId>),
    /// Matches the inner expression between `min` and `max` times.
    Repeat {
        expr: ExprId,
        min: usize,
        max: Option<usize>,
    },
    /// Matches the inner expression, or nothing.
    Optional { expr: ExprId },
    /// Matches the inner expression and nests its results as one token.
    Group { expr: ExprId },
    /// Placeholder whose definition is attached after construction,
    /// enabling recursive grammars.
    Forward { target: Option<ExprId> },
}

impl ExprKind {
    /// The sub-expressions this node owns. Leaves return an empty list,
    /// which is what terminates graph traversal.
    pub fn children(&self) -> Vec<ExprId> {
        match self {
            Self::Empty | Self::Literal(_) | Self::Word { .. } => Vec::new(),
            Self::Sequence(parts) => parts.clone(),
            Self::Alternation(branches) => branches.clone(),
            Self::Repeat { expr, .. } | Self::Optional { expr } | Self::Group { expr } => {
                vec![*expr]
            }
            Self::Forward { target } => target.iter().copied().collect(),
        }
    }

    /// Short human-readable description used in error messages and
    /// diagnostics when no custom name is set.
    pub fn describe(&self) -> String {
        match self {
            Self::Empty => "empty".to_string(),
            Self::Literal(s) => format!("{:?}", s),
            Self::Word { chars, .. } => {
                let shown: String = chars.iter().take(12).collect();
                if chars.len() > 12 {
                    format!("word({}…)", shown)
                } else {
                    format!("word({})", shown)
                }
            }
            Self::Sequence(_) => "sequence".to_string(),
            Self::Alternation(_) => "alternation".to_string(),
            Self::Repeat { .. } => "repetition".to_string(),
            Self::Optional { .. } => "optional".to_string(),
            Self::Group { .. } => "group".to_string(),
            Self::Forward { .. } => "forward".to_string(),
        }
    }
}

/// One vertex of the grammar graph: a kind plus the shared base
/// configuration.
#[derive(Clone)]
pub struct ExprNode {
    pub(crate) kind: ExprKind,
    pub(crate) custom_name: Option<String>,
    pub(crate) results_name: Option<String>,
    pub(crate) list_all_matches: bool,
    pub(crate) save_as_list: bool,
    pub(crate) skip_whitespace: bool,
    pub(crate) whitespace: BTreeSet<char>,
    pub(crate) inherits_default_whitespace: bool,
    pub(crate) may_return_empty: bool,
    pub(crate) suppressed: Vec<DiagnosticKind>,
    pub(crate) actions: Vec<ParseAction>,
}

impl ExprNode {
    pub(crate) fn new(kind: ExprKind, may_return_empty: bool, whitespace: BTreeSet<char>) -> Self {
        let save_as_list = matches!(kind, ExprKind::Repeat { .. });
        Self {
            kind,
            custom_name: None,
            results_name: None,
            list_all_matches: false,
            save_as_list,
            skip_whitespace: true,
            whitespace,
            inherits_default_whitespace: true,
            may_return_empty,
            suppressed: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// The node's kind.
    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    /// The capture name under which this node's output is stored in its
    /// parent's results, if any.
    pub fn results_name(&self) -> Option<&str> {
        self.results_name.as_deref()
    }

    /// Whether zero-length matches are legal for this node.
    pub fn may_return_empty(&self) -> bool {
        self.may_return_empty
    }

    /// Whether leading whitespace is skipped before matching.
    pub fn skip_whitespace(&self) -> bool {
        self.skip_whitespace
    }

    /// Whether this node follows the shared default whitespace set.
    pub fn inherits_default_whitespace(&self) -> bool {
        self.inherits_default_whitespace
    }

    /// The node's pinned whitespace set (meaningful when not inheriting).
    pub fn whitespace_chars(&self) -> &BTreeSet<char> {
        &self.whitespace
    }

    /// Number of attached parse actions.
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// The sub-expressions this node owns.
    pub fn children(&self) -> Vec<ExprId> {
        self.kind.children()
    }

    /// Display name: the custom name when set, otherwise derived from the
    /// kind.
    pub fn name(&self) -> String {
        self.custom_name
            .clone()
            .unwrap_or_else(|| self.kind.describe())
    }

    /// Whether this node suppresses the given diagnostic kind.
    pub fn is_suppressed(&self, kind: DiagnosticKind) -> bool {
        self.suppressed.contains(&kind)
    }
}

impl fmt::Debug for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprNode")
            .field("kind", &self.kind)
            .field("custom_name", &self.custom_name)
            .field("results_name", &self.results_name)
            .field("list_all_matches", &self.list_all_matches)
            .field("save_as_list", &self.save_as_list)
            .field("skip_whitespace", &self.skip_whitespace)
            .field("inherits_default_whitespace", &self.inherits_default_whitespace)
            .field("may_return_empty", &self.may_return_empty)
            .field("suppressed", &self.suppressed)
            .field("actions", &self.actions.len())
            .finish()
    }
}
