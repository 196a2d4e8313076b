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

//! Shared engine settings.
//!
//! A [`Settings`] object holds the default whitespace set and the enabled
//! diagnostic kinds behind a single lock. Every [`Grammar`](crate::Grammar)
//! carries one as `Arc<Settings>`; sharing the same `Arc` between grammars
//! gives them a common default. Mutation is an explicit, rare configuration
//! call; evaluation only reads (once per top-level parse), so a grammar can
//! be evaluated from many threads concurrently.

use crate::diagnostic::DiagnosticKind;
use std::collections::BTreeSet;
use std::sync::RwLock;

/// Default characters skipped before matching: tab, newline, carriage
/// return, space.
pub const DEFAULT_WHITE_CHARS: &str = "\t\n\r ";

#[derive(Debug)]
struct SettingsState {
    whitespace: BTreeSet<char>,
    enabled: BTreeSet<DiagnosticKind>,
}

/// Lock-guarded configuration shared by grammars.
#[derive(Debug)]
pub struct Settings {
    state: RwLock<SettingsState>,
}

impl Settings {
    /// Create settings with the default whitespace set and all diagnostics
    /// disabled.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SettingsState {
                whitespace: DEFAULT_WHITE_CHARS.chars().collect(),
                enabled: BTreeSet::new(),
            }),
        }
    }

    /// Replace the default whitespace set. Nodes that inherit the default
    /// observe the new value on their next evaluation.
    pub fn set_default_whitespace(&self, chars: &str) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.whitespace = chars.chars().collect();
    }

    /// Snapshot of the current default whitespace set.
    pub fn default_whitespace(&self) -> BTreeSet<char> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.whitespace.clone()
    }

    /// Enable emission of one diagnostic kind.
    pub fn enable_diag(&self, kind: DiagnosticKind) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.enabled.insert(kind);
    }

    /// Disable emission of one diagnostic kind.
    pub fn disable_diag(&self, kind: DiagnosticKind) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.enabled.remove(&kind);
    }

    /// Enable every diagnostic kind.
    pub fn enable_all_warnings(&self) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.enabled.extend(DiagnosticKind::ALL);
    }

    /// Whether a diagnostic kind is currently enabled.
    pub fn diag_enabled(&self, kind: DiagnosticKind) -> bool {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.enabled.contains(&kind)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}
