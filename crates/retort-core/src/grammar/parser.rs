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

//! Evaluation entry points: whole-input parsing and lazy scanning.

use crate::error::{RetortError, RetortResult};
use crate::grammar::build::Grammar;
use crate::grammar::eval::{skip_whitespace, MatchContext};
use crate::grammar::node::ExprId;
use crate::results::ParseResults;
use std::collections::BTreeSet;

/// Options for a parse call.
///
/// # Examples
///
/// ```
/// use retort_core::ParseOptions;
///
/// let opts = ParseOptions::builder().require_full_match(true).build();
/// assert!(opts.require_full_match);
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// When true, unconsumed trailing input (after trailing default
    /// whitespace) is an error.
    pub require_full_match: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            require_full_match: false,
        }
    }
}

impl ParseOptions {
    /// Create a new builder for ParseOptions.
    pub fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::new()
    }
}

/// Builder for ergonomic construction of [`ParseOptions`].
#[derive(Debug, Clone)]
pub struct ParseOptionsBuilder {
    require_full_match: bool,
}

impl ParseOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            require_full_match: false,
        }
    }

    /// Treat unconsumed trailing input as an error.
    pub fn require_full_match(mut self, value: bool) -> Self {
        self.require_full_match = value;
        self
    }

    /// Build the final ParseOptions.
    pub fn build(self) -> ParseOptions {
        ParseOptions {
            require_full_match: self.require_full_match,
        }
    }
}

impl Default for ParseOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    /// Match `expr` at the start of `input` with default options (trailing
    /// input is allowed).
    pub fn parse(&self, expr: ExprId, input: &str) -> RetortResult<ParseResults> {
        self.parse_with_options(expr, input, &ParseOptions::default())
    }

    /// Match `expr` against the whole of `input`; trailing input (beyond
    /// default whitespace) is an error.
    pub fn parse_all(&self, expr: ExprId, input: &str) -> RetortResult<ParseResults> {
        self.parse_with_options(
            expr,
            input,
            &ParseOptions {
                require_full_match: true,
            },
        )
    }

    /// Match `expr` at the start of `input` with explicit options.
    pub fn parse_with_options(
        &self,
        expr: ExprId,
        input: &str,
        options: &ParseOptions,
    ) -> RetortResult<ParseResults> {
        let mut ctx = MatchContext::new(self, input);
        let (end, results) = self.match_at(&mut ctx, expr, 0)?;
        if options.require_full_match {
            let rest = skip_whitespace(input, end, &ctx.default_ws);
            if rest != input.len() {
                return Err(RetortError::structural(
                    "expected end of input",
                    rest,
                )
                .with_expected("end of input".to_string()));
            }
        }
        Ok(results)
    }

    /// Whether `expr` matches the whole of `input`.
    pub fn matches(&self, expr: ExprId, input: &str) -> bool {
        self.parse_all(expr, input).is_ok()
    }

    /// Lazily scan `input` for non-overlapping matches of `expr`.
    ///
    /// Yields `(results, start, end)` byte ranges in order. A structural
    /// failure just advances the scan by one character; a grammar or
    /// action error is yielded once and ends the iteration.
    pub fn scan<'g, 'i>(&'g self, expr: ExprId, input: &'i str) -> ScanMatches<'g, 'i> {
        ScanMatches {
            grammar: self,
            expr,
            input,
            pos: 0,
            default_ws: self.settings.default_whitespace(),
            done: false,
        }
    }
}

/// Lazy iterator over the matches of one expression in an input string.
///
/// Returned by [`Grammar::scan`].
#[derive(Debug)]
pub struct ScanMatches<'g, 'i> {
    grammar: &'g Grammar,
    expr: ExprId,
    input: &'i str,
    pos: usize,
    default_ws: BTreeSet<char>,
    done: bool,
}

impl ScanMatches<'_, '_> {
    fn advance_one_char(&self, pos: usize) -> usize {
        match self.input[pos..].chars().next() {
            Some(ch) => pos + ch.len_utf8(),
            None => self.input.len() + 1,
        }
    }
}

impl Iterator for ScanMatches<'_, '_> {
    type Item = RetortResult<(ParseResults, usize, usize)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while self.pos <= self.input.len() {
            let start =
                self.grammar
                    .effective_start(self.expr, self.input, self.pos, &self.default_ws);
            if start > self.input.len() {
                break;
            }
            let mut ctx = MatchContext::new(self.grammar, self.input);
            match self.grammar.match_at(&mut ctx, self.expr, start) {
                Ok((end, results)) => {
                    self.pos = if end > start {
                        end
                    } else {
                        self.advance_one_char(start)
                    };
                    return Some(Ok((results, start, end)));
                }
                Err(e) if e.is_structural() => {
                    self.pos = self.advance_one_char(start);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        self.done = true;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::chars::NUMS;

    // ==================== ParseOptions tests ====================

    #[test]
    fn test_options_default() {
        let opts = ParseOptions::default();
        assert!(!opts.require_full_match);
    }

    #[test]
    fn test_options_builder() {
        let opts = ParseOptions::builder().require_full_match(true).build();
        assert!(opts.require_full_match);
    }

    #[test]
    fn test_options_builder_defaults() {
        let opts = ParseOptions::builder().build();
        assert!(!opts.require_full_match);
    }

    // ==================== parse entry point tests ====================

    #[test]
    fn test_parse_allows_trailing_input() {
        let mut g = Grammar::new();
        let a = g.literal("a");
        assert!(g.parse(a, "abc").is_ok());
    }

    #[test]
    fn test_parse_all_rejects_trailing_input() {
        let mut g = Grammar::new();
        let a = g.literal("a");
        let err = g.parse_all(a, "abc").unwrap_err();
        assert!(err.is_structural());
        assert_eq!(err.position, 1);
        assert_eq!(err.expected.as_deref(), Some("end of input"));
    }

    #[test]
    fn test_parse_all_skips_trailing_whitespace() {
        let mut g = Grammar::new();
        let a = g.literal("a");
        assert!(g.parse_all(a, "a  \n").is_ok());
    }

    #[test]
    fn test_matches() {
        let mut g = Grammar::new();
        let num = g.word(NUMS);
        assert!(g.matches(num, "123"));
        assert!(!g.matches(num, "12x"));
        assert!(!g.matches(num, "x"));
    }

    // ==================== scan tests ====================

    #[test]
    fn test_scan_finds_all_occurrences() {
        let mut g = Grammar::new();
        let num = g.word(NUMS);
        let hits: Vec<_> = g
            .scan(num, "a 12 bb 345 c 6")
            .collect::<RetortResult<Vec<_>>>()
            .unwrap();
        let texts: Vec<String> = hits
            .iter()
            .map(|(r, _, _)| r.tokens()[0].as_str().unwrap().to_string())
            .collect();
        assert_eq!(texts, vec!["12", "345", "6"]);
    }

    #[test]
    fn test_scan_reports_byte_ranges() {
        let mut g = Grammar::new();
        let num = g.word(NUMS);
        let hits: Vec<_> = g
            .scan(num, "x42y7")
            .collect::<RetortResult<Vec<_>>>()
            .unwrap();
        let ranges: Vec<(usize, usize)> = hits.iter().map(|(_, s, e)| (*s, *e)).collect();
        assert_eq!(ranges, vec![(1, 3), (4, 5)]);
    }

    #[test]
    fn test_scan_is_non_overlapping() {
        let mut g = Grammar::new();
        let aa = g.literal("aa");
        let hits: Vec<_> = g
            .scan(aa, "aaaa")
            .collect::<RetortResult<Vec<_>>>()
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_scan_no_matches() {
        let mut g = Grammar::new();
        let num = g.word(NUMS);
        assert_eq!(g.scan(num, "abc").count(), 0);
    }

    #[test]
    fn test_scan_zero_width_advances() {
        let mut g = Grammar::new();
        let e = g.empty();
        // Every position matches zero-width; the scan must still finish.
        let count = g.scan(e, "ab").count();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_scan_yields_grammar_error_once() {
        let mut g = Grammar::new();
        let f = g.forward();
        let mut iter = g.scan(f, "abc");
        let first = iter.next().expect("one item");
        assert!(first.is_err());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_scan_is_lazy() {
        let mut g = Grammar::new();
        let num = g.word(NUMS);
        let mut iter = g.scan(num, "1 2 3");
        let first = iter.next().unwrap().unwrap();
        assert_eq!(first.1, 0);
        // Remaining matches have not been computed yet; pulling the next
        // one continues from where we stopped.
        let second = iter.next().unwrap().unwrap();
        assert_eq!(second.1, 2);
    }

    #[test]
    fn test_scan_unicode_input() {
        let mut g = Grammar::new();
        let num = g.word(NUMS);
        let hits: Vec<_> = g
            .scan(num, "α1β22γ")
            .collect::<RetortResult<Vec<_>>>()
            .unwrap();
        assert_eq!(hits.len(), 2);
    }
}
