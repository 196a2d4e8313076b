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

//! Advisory diagnostics for suspicious grammar constructions.
//!
//! Diagnostics are emitted while a grammar is being built, collected on the
//! [`Grammar`](crate::Grammar), and never influence match outcomes. All
//! kinds are disabled by default; enable them through
//! [`Settings`](crate::Settings) and route the collected values to your own
//! logging.

use crate::grammar::ExprId;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational hint
    Hint,
    /// Warning - might be an issue
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hint => write!(f, "hint"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Kind of diagnostic. A closed enumeration; every kind can be toggled in
/// [`Settings`](crate::Settings) and suppressed per expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticKind {
    /// A capture name was assigned to an alternation whose branches are
    /// multi-element sequences, making the capture contents ambiguous.
    MultipleTokensInNamedAlternation,
    /// A repetition contains named sub-expressions that are not grouped,
    /// so repeated captures overwrite or interleave.
    UngroupedNamedTokensInCollection,
    /// A capture name was assigned to a forward reference that has no
    /// definition yet.
    NameSetOnEmptyForward,
    /// A forward reference that already had a definition was redefined.
    RedefinedForward,
}

impl DiagnosticKind {
    /// All diagnostic kinds, for bulk enable/disable.
    pub const ALL: [DiagnosticKind; 4] = [
        DiagnosticKind::MultipleTokensInNamedAlternation,
        DiagnosticKind::UngroupedNamedTokensInCollection,
        DiagnosticKind::NameSetOnEmptyForward,
        DiagnosticKind::RedefinedForward,
    ];

    /// Stable rule identifier used in rendered diagnostics.
    pub fn rule_id(&self) -> &'static str {
        match self {
            Self::MultipleTokensInNamedAlternation => "named-alternation",
            Self::UngroupedNamedTokensInCollection => "ungrouped-collection",
            Self::NameSetOnEmptyForward => "name-on-empty-forward",
            Self::RedefinedForward => "redefined-forward",
        }
    }
}

/// An advisory diagnostic attached to a grammar under construction.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    severity: Severity,
    /// Kind of issue
    kind: DiagnosticKind,
    /// Human-readable message
    message: String,
    /// Expression node the diagnostic refers to
    expr: Option<ExprId>,
    /// Suggested fix (if any)
    suggestion: Option<String>,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            expr: None,
            suggestion: None,
        }
    }

    pub fn hint(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Hint,
            kind,
            message: message.into(),
            expr: None,
            suggestion: None,
        }
    }

    pub fn with_expr(mut self, expr: ExprId) -> Self {
        self.expr = Some(expr);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    // Public getters
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn expr(&self) -> Option<ExprId> {
        self.expr
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.kind.rule_id(),
            self.severity,
            self.message
        )?;

        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({})", suggestion)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Severity tests ====================

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Hint < Severity::Warning);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(format!("{}", Severity::Hint), "hint");
        assert_eq!(format!("{}", Severity::Warning), "warning");
    }

    #[test]
    fn test_severity_copy() {
        let sev = Severity::Warning;
        let copied: Severity = sev;
        assert_eq!(sev, copied);
    }

    // ==================== DiagnosticKind tests ====================

    #[test]
    fn test_diagnostic_kind_eq() {
        assert_eq!(
            DiagnosticKind::RedefinedForward,
            DiagnosticKind::RedefinedForward
        );
        assert_ne!(
            DiagnosticKind::RedefinedForward,
            DiagnosticKind::NameSetOnEmptyForward
        );
    }

    #[test]
    fn test_diagnostic_kind_all_distinct() {
        for (i, a) in DiagnosticKind::ALL.iter().enumerate() {
            for (j, b) in DiagnosticKind::ALL.iter().enumerate() {
                if i == j {
                    assert_eq!(a, b);
                } else {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_diagnostic_kind_rule_ids_distinct() {
        let ids: Vec<&str> = DiagnosticKind::ALL.iter().map(|k| k.rule_id()).collect();
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
    }

    // ==================== Diagnostic constructor tests ====================

    #[test]
    fn test_diagnostic_warning() {
        let diag = Diagnostic::warning(
            DiagnosticKind::NameSetOnEmptyForward,
            "name set before definition",
        );
        assert_eq!(diag.severity(), Severity::Warning);
        assert_eq!(diag.kind(), DiagnosticKind::NameSetOnEmptyForward);
        assert_eq!(diag.message(), "name set before definition");
        assert!(diag.expr().is_none());
        assert!(diag.suggestion().is_none());
    }

    #[test]
    fn test_diagnostic_hint() {
        let diag = Diagnostic::hint(DiagnosticKind::RedefinedForward, "msg");
        assert_eq!(diag.severity(), Severity::Hint);
    }

    #[test]
    fn test_diagnostic_with_suggestion() {
        let diag = Diagnostic::warning(
            DiagnosticKind::UngroupedNamedTokensInCollection,
            "ungrouped names",
        )
        .with_suggestion("wrap the repeated expression in a group");
        assert_eq!(
            diag.suggestion(),
            Some("wrap the repeated expression in a group")
        );
    }

    // ==================== Display tests ====================

    #[test]
    fn test_display_basic() {
        let diag = Diagnostic::warning(DiagnosticKind::RedefinedForward, "forward redefined");
        let display = format!("{}", diag);
        assert!(display.contains("[redefined-forward]"));
        assert!(display.contains("warning"));
        assert!(display.contains("forward redefined"));
    }

    #[test]
    fn test_display_with_suggestion() {
        let diag = Diagnostic::warning(DiagnosticKind::NameSetOnEmptyForward, "msg")
            .with_suggestion("define it first");
        let display = format!("{}", diag);
        assert!(display.contains("(define it first)"));
    }

    // ==================== Edge cases ====================

    #[test]
    fn test_diagnostic_empty_message() {
        let diag = Diagnostic::warning(DiagnosticKind::RedefinedForward, "");
        assert_eq!(diag.message(), "");
    }

    #[test]
    fn test_diagnostic_clone() {
        let diag = Diagnostic::warning(DiagnosticKind::RedefinedForward, "msg")
            .with_suggestion("fix");
        let cloned = diag.clone();
        assert_eq!(cloned.severity(), diag.severity());
        assert_eq!(cloned.kind(), diag.kind());
        assert_eq!(cloned.message(), diag.message());
        assert_eq!(cloned.suggestion(), diag.suggestion());
    }
}
