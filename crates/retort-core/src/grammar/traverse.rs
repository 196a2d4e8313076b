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

//! Cycle-safe graph traversal.
//!
//! Grammars are graphs, not trees: forward references make them cyclic for
//! any recursive language. The walk keeps a seen-set keyed by node identity,
//! so every reachable node is visited exactly once and the walk terminates
//! on self-referential grammars.

use crate::grammar::build::Grammar;
use crate::grammar::node::{ExprId, ExprNode};
use std::collections::{HashSet, VecDeque};

impl Grammar {
    /// Every node reachable from `start`, each exactly once, in
    /// breadth-first discovery order.
    pub fn traverse(&self, start: ExprId) -> Vec<ExprId> {
        let mut order = Vec::new();
        self.walk(start, |id, _| order.push(id));
        order
    }

    /// Visit every node reachable from `start` exactly once.
    pub fn walk<F>(&self, start: ExprId, mut visit: F)
    where
        F: FnMut(ExprId, &ExprNode),
    {
        let mut seen: HashSet<ExprId> = HashSet::new();
        let mut queue: VecDeque<ExprId> = VecDeque::new();
        queue.push_back(start);
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            let node = self.node_ref(id);
            visit(id, node);
            queue.extend(node.children());
        }
    }
}
