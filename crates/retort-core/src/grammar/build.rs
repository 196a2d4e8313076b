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

//! Grammar construction.
//!
//! A [`Grammar`] owns the arena of expression nodes and hands out [`ExprId`]
//! handles. Grammars are built once through `&mut self` methods and then
//! evaluated any number of times through `&self`; no node state changes
//! during evaluation, so a built grammar can be shared freely between
//! threads.
//!
//! Build-time [`Diagnostic`]s accumulate on the grammar and are read with
//! [`Grammar::diagnostics`] / [`Grammar::take_diagnostics`].
//!
//! # Panics
//!
//! Builder methods take child handles minted by the same grammar; passing a
//! handle from another grammar is a programming error and panics, like an
//! out-of-range slice index.

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::error::{RetortError, RetortResult};
use crate::grammar::node::{ExprId, ExprKind, ExprNode, ParseAction};
use crate::settings::Settings;
use std::collections::BTreeSet;
use std::sync::Arc;

/// An expression graph plus its shared settings and build diagnostics.
#[derive(Debug)]
pub struct Grammar {
    pub(crate) nodes: Vec<ExprNode>,
    pub(crate) settings: Arc<Settings>,
    diagnostics: Vec<Diagnostic>,
}

impl Grammar {
    /// Create a grammar with its own default [`Settings`].
    pub fn new() -> Self {
        Self::with_settings(Arc::new(Settings::new()))
    }

    /// Create a grammar sharing an existing settings object.
    pub fn with_settings(settings: Arc<Settings>) -> Self {
        Self {
            nodes: Vec::new(),
            settings,
            diagnostics: Vec::new(),
        }
    }

    /// The settings object this grammar consults.
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a node by handle.
    pub fn node(&self, id: ExprId) -> Option<&ExprNode> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node_ref(&self, id: ExprId) -> &ExprNode {
        match self.nodes.get(id.index()) {
            Some(node) => node,
            None => panic!("{} does not belong to this grammar", id),
        }
    }

    fn node_mut(&mut self, id: ExprId) -> &mut ExprNode {
        match self.nodes.get_mut(id.index()) {
            Some(node) => node,
            None => panic!("{} does not belong to this grammar", id),
        }
    }

    fn add(&mut self, kind: ExprKind, may_return_empty: bool) -> ExprId {
        let id = ExprId::new(self.nodes.len());
        let whitespace = self.settings.default_whitespace();
        self.nodes.push(ExprNode::new(kind, may_return_empty, whitespace));
        id
    }

    // ---- leaves ----

    /// An expression matching nothing and always succeeding.
    pub fn empty(&mut self) -> ExprId {
        self.add(ExprKind::Empty, true)
    }

    /// An exact-string match. The empty string degrades to [`Grammar::empty`].
    pub fn literal(&mut self, text: &str) -> ExprId {
        if text.is_empty() {
            return self.empty();
        }
        self.add(ExprKind::Literal(text.to_string()), false)
    }

    /// A run of one or more characters drawn from `chars`.
    pub fn word(&mut self, chars: &str) -> ExprId {
        self.word_with(chars, 1, None)
    }

    /// A run of `min..=max` characters drawn from `chars` (`max = None`
    /// means unbounded).
    pub fn word_with(&mut self, chars: &str, min: usize, max: Option<usize>) -> ExprId {
        let chars: BTreeSet<char> = chars.chars().collect();
        let may_return_empty = min == 0;
        self.add(ExprKind::Word { chars, min, max }, may_return_empty)
    }

    // ---- composites ----

    /// Match each part in order, merging their results.
    pub fn sequence(&mut self, parts: &[ExprId]) -> ExprId {
        let may_return_empty = parts
            .iter()
            .all(|&p| self.node_ref(p).may_return_empty());
        self.add(ExprKind::Sequence(parts.to_vec()), may_return_empty)
    }

    /// Try each branch in order; the first success wins.
    pub fn alternation(&mut self, branches: &[ExprId]) -> ExprId {
        let may_return_empty = branches
            .iter()
            .any(|&b| self.node_ref(b).may_return_empty());
        self.add(ExprKind::Alternation(branches.to_vec()), may_return_empty)
    }

    /// Match `expr` or nothing.
    pub fn optional(&mut self, expr: ExprId) -> ExprId {
        self.node_ref(expr);
        self.add(ExprKind::Optional { expr }, true)
    }

    /// Match `expr` zero or more times.
    pub fn zero_or_more(&mut self, expr: ExprId) -> ExprId {
        self.repeat(expr, 0, None)
    }

    /// Match `expr` one or more times.
    pub fn one_or_more(&mut self, expr: ExprId) -> ExprId {
        self.repeat(expr, 1, None)
    }

    /// Match `expr` exactly `count` times.
    pub fn repeat_exact(&mut self, expr: ExprId, count: usize) -> ExprId {
        self.repeat(expr, count, Some(count))
    }

    /// Match `expr` between `min` and `max` times (`max = None` means
    /// unbounded).
    pub fn repeat(&mut self, expr: ExprId, min: usize, max: Option<usize>) -> ExprId {
        let inner_empty = self.node_ref(expr).may_return_empty();
        let may_return_empty = min == 0 || inner_empty;
        let id = self.add(ExprKind::Repeat { expr, min, max }, may_return_empty);
        self.check_ungrouped_collection(id, expr);
        id
    }

    /// Match `expr` and nest its results as a single token.
    pub fn group(&mut self, expr: ExprId) -> ExprId {
        let inner_empty = self.node_ref(expr).may_return_empty();
        self.add(ExprKind::Group { expr }, inner_empty)
    }

    /// A placeholder to be defined later with [`Grammar::define`].
    pub fn forward(&mut self) -> ExprId {
        self.add(ExprKind::Forward { target: None }, true)
    }

    /// Attach the real definition to a forward reference.
    ///
    /// Fails when `forward` is not a forward node or when the definition
    /// would point the forward at itself. Redefining an already-defined
    /// forward replaces the target and emits a [`DiagnosticKind::RedefinedForward`]
    /// diagnostic.
    pub fn define(&mut self, forward: ExprId, target: ExprId) -> RetortResult<()> {
        if self.nodes.get(target.index()).is_none() {
            return Err(RetortError::grammar(format!(
                "definition target {} does not exist",
                target
            )));
        }
        if forward == target {
            return Err(RetortError::grammar(format!(
                "forward reference {} cannot be defined as itself",
                forward
            )));
        }
        let target_empty = self.node_ref(target).may_return_empty();
        let redefined = {
            let node = self.node_mut(forward);
            match node.kind {
                ExprKind::Forward { target: ref mut slot } => {
                    let redefined = slot.is_some();
                    *slot = Some(target);
                    node.may_return_empty = target_empty;
                    redefined
                }
                _ => {
                    return Err(RetortError::grammar(format!(
                        "{} is not a forward reference",
                        forward
                    )))
                }
            }
        };
        if redefined {
            self.emit(
                forward,
                Diagnostic::warning(
                    DiagnosticKind::RedefinedForward,
                    format!("forward reference {} was redefined", forward),
                )
                .with_expr(forward),
            );
        }
        Ok(())
    }

    // ---- per-node configuration ----

    /// Independent clone of a node: fresh parse-action and suppression
    /// lists, shallow child references. Useful for attaching a different
    /// capture name or action set to the same pattern.
    pub fn copy(&mut self, expr: ExprId) -> ExprId {
        let mut node = self.node_ref(expr).clone();
        if node.inherits_default_whitespace {
            node.whitespace = self.settings.default_whitespace();
        }
        let id = ExprId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Store this node's output under `name` in its parent's results,
    /// keeping only the latest assignment (modal).
    pub fn set_results_name(&mut self, expr: ExprId, name: &str) {
        self.apply_results_name(expr, name, false);
    }

    /// Store this node's output under `name`, accumulating every match
    /// (non-modal), so each repetition stays retrievable.
    pub fn set_results_name_all(&mut self, expr: ExprId, name: &str) {
        self.apply_results_name(expr, name, true);
    }

    fn apply_results_name(&mut self, expr: ExprId, name: &str, list_all: bool) {
        {
            let node = self.node_mut(expr);
            node.results_name = Some(name.to_string());
            node.list_all_matches = list_all;
        }
        self.check_named_alternation(expr, name);
        self.check_named_empty_forward(expr, name);
    }

    /// Append a post-match transform.
    pub fn add_parse_action(&mut self, expr: ExprId, action: ParseAction) {
        self.node_mut(expr).actions.push(action);
    }

    /// Never emit `kind` for this node.
    pub fn suppress_warning(&mut self, expr: ExprId, kind: DiagnosticKind) {
        let node = self.node_mut(expr);
        if !node.suppressed.contains(&kind) {
            node.suppressed.push(kind);
        }
    }

    /// Pin this node's whitespace set, detaching it from the shared
    /// default.
    pub fn set_whitespace_chars(&mut self, expr: ExprId, chars: &str) {
        let node = self.node_mut(expr);
        node.whitespace = chars.chars().collect();
        node.inherits_default_whitespace = false;
    }

    /// Disable whitespace skipping for this node.
    pub fn leave_whitespace(&mut self, expr: ExprId) {
        self.node_mut(expr).skip_whitespace = false;
    }

    /// Set a display name used in error messages and diagnostics.
    pub fn set_name(&mut self, expr: ExprId, name: &str) {
        self.node_mut(expr).custom_name = Some(name.to_string());
    }

    // ---- diagnostics ----

    /// Diagnostics collected while building.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain the collected diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn emit(&mut self, expr: ExprId, diagnostic: Diagnostic) {
        if !self.settings.diag_enabled(diagnostic.kind()) {
            return;
        }
        if self.node_ref(expr).is_suppressed(diagnostic.kind()) {
            return;
        }
        self.diagnostics.push(diagnostic);
    }

    fn check_named_alternation(&mut self, expr: ExprId, name: &str) {
        let ambiguous = match &self.node_ref(expr).kind {
            ExprKind::Alternation(branches) => branches.iter().any(|&b| {
                matches!(&self.node_ref(b).kind, ExprKind::Sequence(parts) if parts.len() > 1)
            }),
            _ => false,
        };
        if ambiguous {
            self.emit(
                expr,
                Diagnostic::warning(
                    DiagnosticKind::MultipleTokensInNamedAlternation,
                    format!(
                        "name {:?} set on an alternation with multi-element sequence branches",
                        name
                    ),
                )
                .with_expr(expr)
                .with_suggestion("group the branches to make the capture unambiguous"),
            );
        }
    }

    fn check_named_empty_forward(&mut self, expr: ExprId, name: &str) {
        if matches!(self.node_ref(expr).kind, ExprKind::Forward { target: None }) {
            self.emit(
                expr,
                Diagnostic::warning(
                    DiagnosticKind::NameSetOnEmptyForward,
                    format!("name {:?} set on a forward reference with no definition", name),
                )
                .with_expr(expr),
            );
        }
    }

    fn check_ungrouped_collection(&mut self, repeat: ExprId, inner: ExprId) {
        let inner_node = self.node_ref(inner);
        let inner_named = inner_node.results_name.is_some()
            || inner_node
                .children()
                .iter()
                .any(|&c| self.node_ref(c).results_name.is_some());
        let grouped = matches!(inner_node.kind, ExprKind::Group { .. });
        if inner_named && !grouped {
            self.emit(
                repeat,
                Diagnostic::warning(
                    DiagnosticKind::UngroupedNamedTokensInCollection,
                    "repetition over named sub-expressions that are not grouped".to_string(),
                )
                .with_expr(repeat)
                .with_suggestion("wrap the repeated expression in a group"),
            );
        }
    }

    /// Check that every forward reference reachable from `root` has a
    /// definition.
    pub fn validate(&self, root: ExprId) -> RetortResult<()> {
        for id in self.traverse(root) {
            if let ExprKind::Forward { target: None } = self.node_ref(id).kind {
                return Err(RetortError::grammar(format!(
                    "forward reference {} used before its definition was attached",
                    id
                )));
            }
        }
        Ok(())
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}
