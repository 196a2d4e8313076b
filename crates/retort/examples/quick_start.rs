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

//! Quick start: build a small grammar, parse, and query the results.

use retort::{chars, Grammar};

fn main() {
    // key := letters "=" digits
    let mut g = Grammar::new();
    let key = g.word(chars::ALPHAS);
    let eq = g.literal("=");
    let value = g.word(chars::NUMS);
    g.set_results_name(key, "key");
    g.set_results_name(value, "value");
    let assignment = g.sequence(&[key, eq, value]);

    let hit = g.parse_all(assignment, "answer = 42").expect("parses");

    println!("tokens: {}", hit);
    println!("key   = {:?}", hit.get_named("key").unwrap().as_str());
    println!("value = {:?}", hit.get_named("value").unwrap().as_str());

    // Scan a larger input for every assignment.
    let input = "a=1 b=2 noise c=3";
    for item in g.scan(assignment, input) {
        let (result, start, end) = item.expect("no grammar errors");
        println!(
            "{}..{}: {} = {}",
            start,
            end,
            result.get_named("key").unwrap().as_str().unwrap(),
            result.get_named("value").unwrap().as_str().unwrap(),
        );
    }
}
