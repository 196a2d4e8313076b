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

//! Structured match results with positional and named access.
//!
//! A [`ParseResults`] node holds an ordered token list plus a name map whose
//! entries remember the logical position they were captured at. Composite
//! expressions combine child results with [`ParseResults::merge`], which
//! shifts those positions so named captures stay addressable after
//! concatenation.
//!
//! `ParseResults` is a shared handle: `Clone` aliases the same node (the
//! engine threads one accumulator through a match attempt this way), while
//! [`ParseResults::deep_copy`] produces an independent tree. Parent links
//! are weak; ownership always points downward. Construction is
//! single-threaded per match attempt, so handles are deliberately not
//! `Send`.

use crate::error::{RetortError, RetortResult};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// One entry in a result node's token list.
#[derive(Debug, Clone)]
pub enum Token {
    /// A terminal value.
    Value(Value),
    /// A nested result node.
    Group(ParseResults),
}

impl Token {
    /// Try to view this token as a terminal value.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Try to view this token as a nested result node.
    pub fn as_group(&self) -> Option<&ParseResults> {
        match self {
            Self::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Shorthand for `as_value().and_then(Value::as_str)`.
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Group(a), Self::Group(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Value> for Token {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self::Value(Value::from(s))
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Self::Value(Value::from(s))
    }
}

impl From<i64> for Token {
    fn from(n: i64) -> Self {
        Self::Value(Value::from(n))
    }
}

impl From<f64> for Token {
    fn from(n: f64) -> Self {
        Self::Value(Value::from(n))
    }
}

impl From<bool> for Token {
    fn from(b: bool) -> Self {
        Self::Value(Value::from(b))
    }
}

impl From<ParseResults> for Token {
    fn from(r: ParseResults) -> Self {
        Self::Group(r)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(Value::Str(s)) => write!(f, "{:?}", s),
            Self::Value(v) => write!(f, "{}", v),
            Self::Group(g) => write!(f, "{}", g),
        }
    }
}

/// Logical position recorded for a named capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Position within the token list; shifted on merge, renumbered on
    /// insert/delete.
    Index(usize),
    /// End-relative position; clamped to the boundary on merge, never
    /// shifted.
    End,
}

/// Immutable `(value, anchor)` pair stored in a result node's name map.
#[derive(Debug, Clone)]
pub struct OffsetToken {
    value: Token,
    anchor: Anchor,
}

impl OffsetToken {
    /// Create a new pair.
    pub fn new(value: Token, anchor: Anchor) -> Self {
        Self { value, anchor }
    }

    /// The captured value.
    pub fn value(&self) -> &Token {
        &self.value
    }

    /// The recorded logical position.
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }
}

/// Entries captured under one name, with the modality the slot was created
/// with. Non-modal slots accumulate; modal slots resolve to the latest
/// assignment.
#[derive(Debug, Clone)]
struct NamedSlot {
    entries: Vec<OffsetToken>,
    modal: bool,
}

#[derive(Debug)]
struct ResultsCore {
    tokens: Vec<Token>,
    names: BTreeMap<String, NamedSlot>,
    name: Option<String>,
    modal: bool,
    parent: Weak<RefCell<ResultsCore>>,
}

/// A nested-list view of a result tree, as returned by
/// [`ParseResults::as_list`].
#[derive(Debug, Clone, PartialEq)]
pub enum ListValue {
    /// A terminal value.
    Value(Value),
    /// A nested result node, recursively expanded.
    List(Vec<ListValue>),
}

impl fmt::Display for ListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(Value::Str(s)) => write!(f, "{:?}", s),
            Self::Value(v) => write!(f, "{}", v),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Hierarchical container for the outcome of a match attempt.
pub struct ParseResults {
    core: Rc<RefCell<ResultsCore>>,
}

impl Clone for ParseResults {
    /// Clones the handle; both handles address the same node. Use
    /// [`ParseResults::deep_copy`] for an independent tree.
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl Default for ParseResults {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseResults {
    /// Create an empty result node (modal by default).
    pub fn new() -> Self {
        Self {
            core: Rc::new(RefCell::new(ResultsCore {
                tokens: Vec::new(),
                names: BTreeMap::new(),
                name: None,
                modal: true,
                parent: Weak::new(),
            })),
        }
    }

    /// Create a node holding the given terminal values.
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let node = Self::new();
        {
            let mut core = node.core.borrow_mut();
            core.tokens = values
                .into_iter()
                .map(|v| Token::Value(v.into()))
                .collect();
        }
        node
    }

    /// Create a node holding the given tokens. Nested groups are
    /// re-parented to the new node.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let node = Self::new();
        node.core.borrow_mut().tokens = tokens;
        node.reparent_children();
        node
    }

    /// Construct a result node, reusing `tokens` when no name is given.
    ///
    /// With a name, the node is stamped in place: its modality is set, its
    /// primary name recorded, and a self-named entry inserted: the single
    /// token (at anchor 0) when exactly one token is present and `as_list`
    /// is false, an aggregate group (at anchor 0) when `as_list`, or an
    /// empty group at the end-relative anchor when the node is empty.
    pub fn build(tokens: ParseResults, name: Option<&str>, as_list: bool, modal: bool) -> Self {
        match name {
            None => tokens,
            Some("") => tokens,
            Some(n) => {
                tokens.stamp_name(n, as_list, modal);
                tokens
            }
        }
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.core.borrow().tokens.len()
    }

    /// Whether the token list is empty.
    pub fn is_empty(&self) -> bool {
        self.core.borrow().tokens.is_empty()
    }

    /// Snapshot of the token list (cheap: groups are handle clones).
    pub fn tokens(&self) -> Vec<Token> {
        self.core.borrow().tokens.clone()
    }

    /// Get a token by position.
    pub fn get(&self, index: usize) -> RetortResult<Token> {
        let core = self.core.borrow();
        core.tokens
            .get(index)
            .cloned()
            .ok_or_else(|| RetortError::index_out_of_range(index, core.tokens.len()))
    }

    /// Get the value captured under `name`.
    ///
    /// A slot with a single entry yields that value. A non-modal slot with
    /// several entries yields an aggregate node wrapping all of them in
    /// capture order; a modal slot yields only the latest.
    pub fn get_named(&self, name: &str) -> RetortResult<Token> {
        let (mut values, modal) = {
            let core = self.core.borrow();
            let slot = core
                .names
                .get(name)
                .ok_or_else(|| RetortError::unknown_name(name))?;
            let values: Vec<Token> = slot.entries.iter().map(|e| e.value().clone()).collect();
            (values, slot.modal)
        };
        match values.len() {
            0 => Err(RetortError::unknown_name(name)),
            1 => Ok(values.remove(0)),
            n if modal => Ok(values.remove(n - 1)),
            _ => Ok(Token::Group(Self::from_tokens(values))),
        }
    }

    /// Anchors currently recorded for `name`, in capture order.
    pub fn offsets(&self, name: &str) -> Option<Vec<Anchor>> {
        let core = self.core.borrow();
        core.names
            .get(name)
            .map(|slot| slot.entries.iter().map(|e| e.anchor()).collect())
    }

    /// Replace the token at `index`. A group value is re-parented to this
    /// node.
    pub fn set(&self, index: usize, value: impl Into<Token>) -> RetortResult<()> {
        let value = value.into();
        {
            let mut core = self.core.borrow_mut();
            let len = core.tokens.len();
            let slot = core
                .tokens
                .get_mut(index)
                .ok_or_else(|| RetortError::index_out_of_range(index, len))?;
            *slot = value.clone();
        }
        self.adopt(&value);
        Ok(())
    }

    /// Assign `value` under `name` at anchor 0.
    ///
    /// On a modal node the assignment overwrites; on a non-modal node it
    /// accumulates, so every repetition of a capture stays retrievable.
    pub fn set_named(&self, name: &str, value: impl Into<Token>) {
        let value = value.into();
        let modal = self.core.borrow().modal;
        self.push_entry(name, OffsetToken::new(value.clone(), Anchor::Index(0)), modal);
        self.adopt(&value);
    }

    /// Append a token at the end (no anchors change).
    pub fn push(&self, value: impl Into<Token>) {
        let value = value.into();
        self.core.borrow_mut().tokens.push(value.clone());
        self.adopt(&value);
    }

    /// Insert a token at `index`, shifting later tokens right. Every anchor
    /// at or after `index` is incremented, the exact inverse of
    /// [`ParseResults::delete`]'s renumbering.
    pub fn insert(&self, index: usize, value: impl Into<Token>) -> RetortResult<()> {
        let value = value.into();
        {
            let mut core = self.core.borrow_mut();
            if index > core.tokens.len() {
                return Err(RetortError::index_out_of_range(index, core.tokens.len()));
            }
            core.tokens.insert(index, value.clone());
            for slot in core.names.values_mut() {
                let entries = std::mem::take(&mut slot.entries);
                slot.entries = entries
                    .into_iter()
                    .map(|e| match e.anchor() {
                        Anchor::Index(i) if i >= index => {
                            OffsetToken::new(e.value().clone(), Anchor::Index(i + 1))
                        }
                        _ => e,
                    })
                    .collect();
            }
        }
        self.adopt(&value);
        Ok(())
    }

    /// Remove the token at `index`. Anchors beyond it are decremented;
    /// anchors exactly at it are invalidated (their entry is dropped, and
    /// the slot with it when emptied). End-relative anchors are untouched.
    pub fn delete(&self, index: usize) -> RetortResult<()> {
        let mut core = self.core.borrow_mut();
        if index >= core.tokens.len() {
            return Err(RetortError::index_out_of_range(index, core.tokens.len()));
        }
        core.tokens.remove(index);
        let mut emptied = Vec::new();
        for (name, slot) in core.names.iter_mut() {
            let entries = std::mem::take(&mut slot.entries);
            slot.entries = entries
                .into_iter()
                .filter_map(|e| match e.anchor() {
                    Anchor::Index(i) if i == index => None,
                    Anchor::Index(i) if i > index => {
                        Some(OffsetToken::new(e.value().clone(), Anchor::Index(i - 1)))
                    }
                    _ => Some(e),
                })
                .collect();
            if slot.entries.is_empty() {
                emptied.push(name.clone());
            }
        }
        for name in emptied {
            core.names.remove(&name);
        }
        Ok(())
    }

    /// Remove the whole slot for `name`.
    pub fn delete_named(&self, name: &str) -> RetortResult<()> {
        let mut core = self.core.borrow_mut();
        core.names
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| RetortError::unknown_name(name))
    }

    /// Concatenate `other` onto this node.
    ///
    /// `other`'s tokens are appended, its group tokens re-parented here,
    /// and every named entry is carried over with positional anchors
    /// shifted by the pre-merge length. End-relative anchors are clamped to
    /// the new boundary (kept symbolic), not shifted. Slot modality merges
    /// as "non-modal wins", so accumulated captures survive concatenation.
    pub fn merge(&self, other: &ParseResults) {
        let (other_tokens, other_names) = {
            let oc = other.core.borrow();
            (oc.tokens.clone(), oc.names.clone())
        };
        {
            let mut core = self.core.borrow_mut();
            let base = core.tokens.len();
            core.tokens.extend(other_tokens.iter().cloned());
            for (name, slot) in other_names {
                let shifted: Vec<OffsetToken> = slot
                    .entries
                    .iter()
                    .map(|e| match e.anchor() {
                        Anchor::Index(i) => {
                            OffsetToken::new(e.value().clone(), Anchor::Index(i + base))
                        }
                        Anchor::End => e.clone(),
                    })
                    .collect();
                match core.names.get_mut(&name) {
                    Some(target) => {
                        target.modal = target.modal && slot.modal;
                        target.entries.extend(shifted);
                    }
                    None => {
                        core.names.insert(
                            name,
                            NamedSlot {
                                entries: shifted,
                                modal: slot.modal,
                            },
                        );
                    }
                }
            }
        }
        for token in &other_tokens {
            self.adopt(token);
        }
    }

    /// Nested-list view: each nested node is recursively expanded.
    pub fn as_list(&self) -> Vec<ListValue> {
        self.tokens()
            .into_iter()
            .map(|t| match t {
                Token::Value(v) => ListValue::Value(v),
                Token::Group(g) => ListValue::List(g.as_list()),
            })
            .collect()
    }

    /// Terminal values only, in left-to-right order.
    ///
    /// Implemented with an explicit work stack rather than recursive calls,
    /// so arbitrarily deep trees flatten without exhausting the call stack.
    pub fn as_flat_list(&self) -> Vec<Value> {
        let mut out = Vec::new();
        let mut stack = self.tokens();
        stack.reverse();
        while let Some(token) = stack.pop() {
            match token {
                Token::Value(v) => out.push(v),
                Token::Group(g) => {
                    let mut children = g.tokens();
                    children.reverse();
                    stack.extend(children);
                }
            }
        }
        out
    }

    /// Name → value view, resolved like [`ParseResults::get_named`].
    pub fn as_dict(&self) -> BTreeMap<String, Token> {
        let names: Vec<String> = self.core.borrow().names.keys().cloned().collect();
        let mut out = BTreeMap::new();
        for name in names {
            if let Ok(value) = self.get_named(&name) {
                out.insert(name, value);
            }
        }
        out
    }

    /// The name stamped on this node by its producing expression, if any.
    pub fn primary_name(&self) -> Option<String> {
        self.core.borrow().name.clone()
    }

    /// Whether `set_named` overwrites (modal) or accumulates.
    pub fn modal(&self) -> bool {
        self.core.borrow().modal
    }

    /// Switch between overwriting (modal) and accumulating assignment.
    /// Affects slots created after the call; existing slots keep the
    /// modality they were created with.
    pub fn set_modal(&self, modal: bool) {
        self.core.borrow_mut().modal = modal;
    }

    /// The enclosing result node, when this node is still attached.
    pub fn parent(&self) -> Option<ParseResults> {
        self.core
            .borrow()
            .parent
            .upgrade()
            .map(|core| ParseResults { core })
    }

    /// Independent copy of the whole tree. Parent links inside the copy
    /// point at the copied nodes; the copy's own parent is unset.
    pub fn deep_copy(&self) -> ParseResults {
        let (tokens, names, name, modal) = {
            let core = self.core.borrow();
            (
                core.tokens.clone(),
                core.names.clone(),
                core.name.clone(),
                core.modal,
            )
        };
        let copy = ParseResults::new();
        {
            let mut core = copy.core.borrow_mut();
            core.tokens = tokens
                .into_iter()
                .map(|t| match t {
                    Token::Value(v) => Token::Value(v),
                    Token::Group(g) => Token::Group(g.deep_copy()),
                })
                .collect();
            core.names = names
                .into_iter()
                .map(|(k, slot)| {
                    let entries = slot
                        .entries
                        .into_iter()
                        .map(|e| {
                            let value = match e.value() {
                                Token::Value(v) => Token::Value(v.clone()),
                                Token::Group(g) => Token::Group(g.deep_copy()),
                            };
                            OffsetToken::new(value, e.anchor())
                        })
                        .collect();
                    (
                        k,
                        NamedSlot {
                            entries,
                            modal: slot.modal,
                        },
                    )
                })
                .collect();
            core.name = name;
            core.modal = modal;
        }
        copy.reparent_children();
        copy
    }

    // ---- crate-internal plumbing used by the evaluator ----

    /// Stamp a capture name on this node (see [`ParseResults::build`]).
    pub(crate) fn stamp_name(&self, name: &str, as_list: bool, modal: bool) {
        let tokens = self.tokens();
        {
            let mut core = self.core.borrow_mut();
            core.modal = modal;
            core.name = Some(name.to_string());
        }
        let entry = if tokens.is_empty() {
            OffsetToken::new(Token::Group(ParseResults::new()), Anchor::End)
        } else if tokens.len() == 1 && !as_list {
            OffsetToken::new(tokens[0].clone(), Anchor::Index(0))
        } else {
            let aggregate = ParseResults::from_tokens(tokens);
            aggregate.core.borrow_mut().name = Some(name.to_string());
            OffsetToken::new(Token::Group(aggregate), Anchor::Index(0))
        };
        self.push_entry(name, entry, modal);
    }

    pub(crate) fn set_parent(&self, parent: &ParseResults) {
        if Rc::ptr_eq(&self.core, &parent.core) {
            return;
        }
        self.core.borrow_mut().parent = Rc::downgrade(&parent.core);
    }

    fn adopt(&self, token: &Token) {
        if let Token::Group(g) = token {
            g.set_parent(self);
        }
    }

    fn reparent_children(&self) {
        for token in self.tokens() {
            self.adopt(&token);
        }
    }

    /// Append an entry under `name`. An existing slot keeps its own
    /// modality; a fresh slot takes `default_modal`. Modal slots are
    /// cleared first (overwrite semantics).
    fn push_entry(&self, name: &str, entry: OffsetToken, default_modal: bool) {
        let mut core = self.core.borrow_mut();
        let slot = core
            .names
            .entry(name.to_string())
            .or_insert_with(|| NamedSlot {
                entries: Vec::new(),
                modal: default_modal,
            });
        if slot.modal {
            slot.entries.clear();
        }
        slot.entries.push(entry);
    }
}

impl PartialEq for ParseResults {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core) || self.tokens() == other.tokens()
    }
}

impl fmt::Debug for ParseResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.borrow();
        f.debug_struct("ParseResults")
            .field("tokens", &core.tokens)
            .field("names", &core.names)
            .field("name", &core.name)
            .field("modal", &core.modal)
            .finish()
    }
}

impl fmt::Display for ParseResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, token) in self.tokens().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", token)?;
        }
        write!(f, "]")
    }
}

impl std::ops::AddAssign<&ParseResults> for ParseResults {
    /// `self += other` merges `other` into `self`.
    fn add_assign(&mut self, other: &ParseResults) {
        self.merge(other);
    }
}

impl std::ops::Add<&ParseResults> for &ParseResults {
    type Output = ParseResults;

    /// `a + b` deep-copies `a`, then merges `b` into the copy.
    fn add(self, other: &ParseResults) -> ParseResults {
        let out = self.deep_copy();
        out.merge(other);
        out
    }
}

impl IntoIterator for &ParseResults {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens().into_iter()
    }
}
