// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use regex_fluent::{MatchFlags, PatternBuilder};

pub fn main() {
    color();
    keywords();
}

fn color() {
    let mut hex = PatternBuilder::new();
    hex.exactly(2).from("0123456789abcdefABCDEF");

    let re = PatternBuilder::new()
        .then("#")
        .append(&hex)
        .as_named_group("red")
        .append(&hex)
        .as_named_group("green")
        .append(&hex)
        .as_named_group("blue")
        .compile();

    println!("Pattern: {}", re);

    let text = "The color is #ffbb33 and the background is #bbdd99.";
    let all = re.match_all(text, MatchFlags::SET_ORDER).unwrap();
    for m in &all {
        println!("Found match: {}", &m[0]);
        println!("Red: {}", &m["red"]);
        println!("Green: {}", &m["green"]);
        println!("Blue: {}", &m["blue"]);
    }
}

fn keywords() {
    let re = PatternBuilder::new()
        .start_of_line()
        .any_of(["fn", "struct", "enum"])
        .whitespaces()
        .letters()
        .as_named_group("name")
        .compile();

    println!("Pattern: {}", re);

    let text = "fn main\nstruct Point\nlet x";
    let all = re.match_all(text, MatchFlags::PATTERN_ORDER).unwrap();
    for name in all.named_group("name").unwrap() {
        println!("Declared: {}", name);
    }
}
