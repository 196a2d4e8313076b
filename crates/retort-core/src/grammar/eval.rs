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

//! The matcher.
//!
//! Matching is a synchronous depth-first walk of the expression graph. A
//! node either succeeds at a position, returning the new position and a
//! fresh [`ParseResults`], or fails with a structural error carrying the
//! position and an expected-token description. Structural failures are
//! recoverable (alternations try the next branch, repetitions stop);
//! grammar and action errors abort the attempt.
//!
//! All per-attempt state lives in a [`MatchContext`]: the whitespace
//! default is snapshotted once per top-level call, and the guard against
//! re-entering a recursive rule at the same position is a call-scoped set.
//! Nodes are never mutated during evaluation, so one grammar serves many
//! concurrent parse calls.

use crate::error::{RetortError, RetortErrorKind, RetortResult};
use crate::grammar::build::Grammar;
use crate::grammar::node::{ExprId, ExprKind};
use crate::results::{ParseResults, Token};
use std::collections::{BTreeSet, HashSet};

/// Transient state for one top-level match attempt.
pub(crate) struct MatchContext<'i> {
    pub(crate) input: &'i str,
    pub(crate) default_ws: BTreeSet<char>,
    active: HashSet<(ExprId, usize)>,
}

impl<'i> MatchContext<'i> {
    pub(crate) fn new(grammar: &Grammar, input: &'i str) -> Self {
        Self {
            input,
            default_ws: grammar.settings.default_whitespace(),
            active: HashSet::new(),
        }
    }
}

pub(crate) fn skip_whitespace(input: &str, pos: usize, chars: &BTreeSet<char>) -> usize {
    let mut p = pos;
    for ch in input[pos..].chars() {
        if chars.contains(&ch) {
            p += ch.len_utf8();
        } else {
            break;
        }
    }
    p
}

impl Grammar {
    /// Position where `id` would start consuming at `pos` (after its
    /// whitespace skip).
    pub(crate) fn effective_start(
        &self,
        id: ExprId,
        input: &str,
        pos: usize,
        default_ws: &BTreeSet<char>,
    ) -> usize {
        let node = self.node_ref(id);
        if node.skip_whitespace {
            let chars = if node.inherits_default_whitespace {
                default_ws
            } else {
                &node.whitespace
            };
            skip_whitespace(input, pos, chars)
        } else {
            pos
        }
    }

    /// Attempt to match `id` at byte position `pos`.
    pub(crate) fn match_at(
        &self,
        ctx: &mut MatchContext<'_>,
        id: ExprId,
        pos: usize,
    ) -> RetortResult<(usize, ParseResults)> {
        let start = self.effective_start(id, ctx.input, pos, &ctx.default_ws);
        let node = self.node_ref(id);

        let (end, mut results) = match &node.kind {
            ExprKind::Empty => (start, ParseResults::new()),

            ExprKind::Literal(text) => {
                if ctx.input[start..].starts_with(text.as_str()) {
                    (start + text.len(), ParseResults::from_values([text.clone()]))
                } else {
                    return Err(RetortError::structural(
                        format!("expected {}", node.name()),
                        start,
                    )
                    .with_expected(node.name()));
                }
            }

            ExprKind::Word { chars, min, max } => {
                let mut taken = 0usize;
                let mut bytes = 0usize;
                for ch in ctx.input[start..].chars() {
                    if let Some(m) = max {
                        if taken == *m {
                            break;
                        }
                    }
                    if chars.contains(&ch) {
                        taken += 1;
                        bytes += ch.len_utf8();
                    } else {
                        break;
                    }
                }
                if taken < *min {
                    return Err(RetortError::structural(
                        format!("expected {}", node.name()),
                        start,
                    )
                    .with_expected(node.name()));
                }
                if bytes == 0 {
                    (start, ParseResults::new())
                } else {
                    let text = &ctx.input[start..start + bytes];
                    (start + bytes, ParseResults::from_values([text]))
                }
            }

            ExprKind::Sequence(parts) => {
                let acc = ParseResults::new();
                let mut cur = start;
                for &part in parts {
                    let (next, r) = self.match_at(ctx, part, cur)?;
                    acc.merge(&r);
                    cur = next;
                }
                (cur, acc)
            }

            ExprKind::Alternation(branches) => {
                let mut best: Option<RetortError> = None;
                let mut matched = None;
                for &branch in branches {
                    match self.match_at(ctx, branch, start) {
                        Ok(hit) => {
                            matched = Some(hit);
                            break;
                        }
                        Err(e) if e.is_structural() => {
                            best = match best {
                                Some(b) if b.position >= e.position => Some(b),
                                _ => Some(e),
                            };
                        }
                        Err(e) => return Err(e),
                    }
                }
                match matched {
                    Some(hit) => hit,
                    None => {
                        return Err(best.unwrap_or_else(|| {
                            RetortError::structural("alternation has no branches", start)
                        }))
                    }
                }
            }

            ExprKind::Repeat { expr, min, max } => {
                let acc = ParseResults::new();
                let mut cur = start;
                let mut count = 0usize;
                let mut last_err: Option<RetortError> = None;
                loop {
                    if let Some(m) = max {
                        if count == *m {
                            break;
                        }
                    }
                    match self.match_at(ctx, *expr, cur) {
                        Ok((next, r)) => {
                            // A zero-length iteration would never terminate.
                            if next == cur && r.is_empty() {
                                break;
                            }
                            acc.merge(&r);
                            count += 1;
                            if next == cur {
                                break;
                            }
                            cur = next;
                        }
                        Err(e) if e.is_structural() => {
                            last_err = Some(e);
                            break;
                        }
                        Err(e) => return Err(e),
                    }
                }
                if count < *min {
                    return Err(match last_err {
                        Some(e) => e,
                        None => RetortError::structural(
                            format!(
                                "expected at least {} of {}",
                                min,
                                self.node_ref(*expr).name()
                            ),
                            cur,
                        ),
                    });
                }
                (cur, acc)
            }

            ExprKind::Optional { expr } => match self.match_at(ctx, *expr, start) {
                Ok(hit) => hit,
                Err(e) if e.is_structural() => (start, ParseResults::new()),
                Err(e) => return Err(e),
            },

            ExprKind::Group { expr } => {
                let (next, inner) = self.match_at(ctx, *expr, start)?;
                (next, ParseResults::from_tokens(vec![Token::Group(inner)]))
            }

            ExprKind::Forward { target } => {
                let Some(target) = *target else {
                    return Err(RetortError::grammar(format!(
                        "forward reference {} used before its definition was attached",
                        id
                    )));
                };
                let key = (id, start);
                if !ctx.active.insert(key) {
                    return Err(RetortError::structural(
                        format!(
                            "recursive rule {} re-entered without consuming input",
                            node.name()
                        ),
                        start,
                    ));
                }
                let outcome = self.match_at(ctx, target, start);
                ctx.active.remove(&key);
                outcome?
            }
        };

        for action in &node.actions {
            match action(ctx.input, start, &results) {
                Ok(Some(replacement)) => results = replacement,
                Ok(None) => {}
                Err(e) if e.is_structural() => {
                    let position = if e.position == 0 { start } else { e.position };
                    return Err(e.with_position(position));
                }
                Err(e) if e.kind == RetortErrorKind::Action => return Err(e),
                Err(e) => {
                    // An accessor error escaping a user action is the
                    // action's fault, not the engine's.
                    return Err(RetortError::action(
                        format!("parse action on {} failed: {}", node.name(), e),
                        start,
                    ));
                }
            }
        }

        if let Some(name) = &node.results_name {
            results.stamp_name(name, node.save_as_list, !node.list_all_matches);
        }

        Ok((end, results))
    }
}
