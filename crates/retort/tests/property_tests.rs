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

//! Property-based tests for grammar evaluation.
//!
//! These verify evaluation invariants across randomly generated inputs:
//! literals match exactly what they were built from, repetition counts
//! follow the input, scanning finds every occurrence, and failed attempts
//! never corrupt later ones.

use proptest::prelude::*;
use retort::{chars, Grammar};

proptest! {
    /// Property: a literal matches exactly the string it was built from,
    /// and nothing else with a different prefix.
    #[test]
    fn prop_literal_roundtrip(text in "[a-zA-Z0-9]{1,12}") {
        let mut g = Grammar::new();
        let lit = g.literal(&text);
        prop_assert!(g.matches(lit, &text));

        let altered = format!("_{}", text);
        prop_assert!(!g.matches(lit, &altered));
    }

    /// Property: a digit word consumes the full digit run.
    #[test]
    fn prop_word_consumes_run(digits in "[0-9]{1,16}") {
        let mut g = Grammar::new();
        let w = g.word(chars::NUMS);
        let r = g.parse_all(w, &digits).unwrap();
        let first = r.get(0).unwrap();
        prop_assert_eq!(first.as_str(), Some(digits.as_str()));
    }

    /// Property: one-or-more over space-separated words yields one token
    /// per word.
    #[test]
    fn prop_repeat_counts(words in prop::collection::vec("[a-z]{1,6}", 1..10)) {
        let mut g = Grammar::new();
        let w = g.word(chars::ALPHAS);
        let rep = g.one_or_more(w);
        let input = words.join(" ");
        let r = g.parse_all(rep, &input).unwrap();
        prop_assert_eq!(r.len(), words.len());
    }

    /// Property: scanning finds every digit run in a noisy input.
    #[test]
    fn prop_scan_finds_every_run(runs in prop::collection::vec("[0-9]{1,4}", 0..6)) {
        let mut g = Grammar::new();
        let w = g.word(chars::NUMS);
        // Interleave digit runs with non-matching noise.
        let input = runs
            .iter()
            .map(|r| format!("x{}y", r))
            .collect::<Vec<_>>()
            .join("");
        let found: Vec<String> = g
            .scan(w, &input)
            .map(|item| {
                let (r, _, _) = item.unwrap();
                r.get(0).unwrap().as_str().unwrap().to_string()
            })
            .collect();
        prop_assert_eq!(found, runs);
    }

    /// Property: an alternation over distinct literals accepts each of
    /// them, whatever the order.
    #[test]
    fn prop_alternation_accepts_each_branch(
        mut words in prop::collection::hash_set("[a-z]{1,6}", 1..6)
    ) {
        let words: Vec<String> = words.drain().collect();
        let mut g = Grammar::new();
        let branches: Vec<_> = words.iter().map(|w| g.literal(w)).collect();
        let alt = g.alternation(&branches);
        for word in &words {
            prop_assert!(g.parse(alt, word).is_ok());
        }
    }

    /// Property: a failed parse never affects a later parse with the same
    /// grammar (attempts are atomic and nodes never mutate).
    #[test]
    fn prop_failures_do_not_poison_grammar(good in "[0-9]{1,8}", bad in "[a-z]{1,8}") {
        let mut g = Grammar::new();
        let w = g.word(chars::NUMS);
        let rep = g.one_or_more(w);
        prop_assert!(g.parse_all(rep, &bad).is_err());
        let r = g.parse_all(rep, &good).unwrap();
        let first = r.get(0).unwrap();
        prop_assert_eq!(first.as_str(), Some(good.as_str()));
    }
}
