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

//! A recursive grammar via forward references: nested parenthesized
//! number lists like `(1 (2 3) ((4)))`, with parse actions converting
//! digit strings to integers.

use retort::{chars, Grammar, ParseResults, Value};
use std::sync::Arc;

fn main() {
    // list := "(" item* ")"
    // item := number | list
    let mut g = Grammar::new();
    let list = g.forward();
    let number = g.word(chars::NUMS);
    g.add_parse_action(
        number,
        Arc::new(|_, _, r: &ParseResults| {
            let text = r.get(0)?;
            let n: i64 = text.as_str().unwrap_or("0").parse().unwrap_or(0);
            Ok(Some(ParseResults::from_values([Value::Int(n)])))
        }),
    );
    let item = g.alternation(&[number, list]);
    let items = g.zero_or_more(item);
    let open = g.literal("(");
    let close = g.literal(")");
    let grouped = g.group(items);
    let body = g.sequence(&[open, grouped, close]);
    g.define(list, body).expect("list is a forward reference");

    g.validate(list).expect("grammar is complete");

    let input = "(1 (2 3) ((4)))";
    let result = g.parse_all(list, input).expect("parses");
    println!("{} -> {}", input, result);

    let total: i64 = result
        .as_flat_list()
        .iter()
        .filter_map(|v| v.as_int())
        .sum();
    println!("sum of all numbers: {}", total);
}
