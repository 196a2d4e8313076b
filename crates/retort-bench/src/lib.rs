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

//! Deterministic input generators for the Retort benchmarks.

use retort::{chars, ExprId, Grammar};

/// Standard input sizes (number of terms) used across benchmarks.
pub const SIZES: [usize; 3] = [100, 1_000, 10_000];

/// Generate a flat list of `n` alternating words and numbers:
/// `alpha0 0 alpha1 1 ...`.
pub fn generate_flat_input(n: usize) -> String {
    let mut out = String::new();
    for i in 0..n {
        out.push_str("alpha");
        out.push_str(&i.to_string());
        out.push(' ');
        out.push_str(&i.to_string());
        out.push(' ');
    }
    out
}

/// Generate a nested parenthesized list `((…(0 1 2)…))` of the given
/// depth.
pub fn generate_nested_input(depth: usize) -> String {
    let mut out = String::new();
    for _ in 0..depth {
        out.push('(');
    }
    out.push_str("0 1 2");
    for _ in 0..depth {
        out.push(')');
    }
    out
}

/// Generate key=value pairs separated by noise, for scanning benchmarks.
pub fn generate_scan_input(pairs: usize) -> String {
    let mut out = String::new();
    for i in 0..pairs {
        out.push_str("noise ");
        out.push_str("key");
        out.push_str(&i.to_string());
        out.push('=');
        out.push_str(&i.to_string());
        out.push(' ');
    }
    out
}

/// A grammar matching a run of alphanumeric tokens, returned with its
/// root.
pub fn flat_grammar() -> (Grammar, ExprId) {
    let mut g = Grammar::new();
    let token = g.word(&chars::alphanums());
    let root = g.one_or_more(token);
    (g, root)
}

/// A recursive grammar for nested parenthesized number lists.
pub fn nested_grammar() -> (Grammar, ExprId) {
    let mut g = Grammar::new();
    let list = g.forward();
    let num = g.word(chars::NUMS);
    let item = g.alternation(&[num, list]);
    let items = g.zero_or_more(item);
    let open = g.literal("(");
    let close = g.literal(")");
    let body = g.sequence(&[open, items, close]);
    g.define(list, body).expect("list is a forward reference");
    (g, list)
}

/// A key=value grammar with named captures, for scanning benchmarks.
pub fn pair_grammar() -> (Grammar, ExprId) {
    let mut g = Grammar::new();
    let key = g.word(&chars::alphanums());
    let eq = g.literal("=");
    let value = g.word(chars::NUMS);
    g.set_results_name(key, "key");
    g.set_results_name(value, "value");
    let pair = g.sequence(&[key, eq, value]);
    (g, pair)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_input_parses() {
        let (g, root) = flat_grammar();
        let input = generate_flat_input(10);
        let r = g.parse_all(root, &input).unwrap();
        assert_eq!(r.len(), 20);
    }

    #[test]
    fn test_nested_input_parses() {
        let (g, root) = nested_grammar();
        let input = generate_nested_input(50);
        assert!(g.parse_all(root, &input).is_ok());
    }

    #[test]
    fn test_scan_input_yields_pairs() {
        let (g, pair) = pair_grammar();
        let input = generate_scan_input(25);
        let found = g.scan(pair, &input).count();
        assert_eq!(found, 25);
    }
}
