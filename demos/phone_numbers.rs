// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use regex_fluent::{MatchFlags, Pattern};

pub fn main() {
    matching();
    replacing();
    filtering();
}

fn matching() {
    let re = Pattern::parse(r"/\s*([a-zA-Z]*)\s*(\d{0,1}\-{0,1}(?:\d\d\d\-){1,2}\d{4})/u").unwrap();
    let text = "Call 555-1212 or 1-800-555-1212";

    // match once
    let m = re.match_first(text).unwrap();
    if m.any() {
        println!("Found match: {}", &m[0]);
        println!("Verb: {}", &m[1]);
        println!("Number: {}", &m[2]);
    } else {
        println!("No match found");
    }

    // match all, one set per occurrence
    let all = re.match_all(text, MatchFlags::SET_ORDER).unwrap();
    for m in &all {
        println!("Found match: {:?} with number {}", &m[0], &m[2]);
    }
}

fn replacing() {
    let re = Pattern::parse(r"/(?:^|(?P<space>\s+))0(?P<net>7\d{2})/u").unwrap();
    let text = "0722555121 0701888020 +254711345543";

    let r = re.replace("$1+254$2", text, None).unwrap();
    println!("Replaced {} number(s): {}", r.count(), r);

    let r = re
        .replace_callback(
            |m| {
                let space = m.named_group("space").map(|c| c.as_str()).unwrap_or("");
                let net = m.named_group("net").map(|c| c.as_str()).unwrap_or("");
                format!("{}(+254) {}", space, net)
            },
            text,
            Some(1),
        )
        .unwrap();
    println!("First number only: {}", r);
}

fn filtering() {
    let re = Pattern::parse(r"/^\+254\d{9}$/u").unwrap();
    let numbers = vec!["0722555121", "+254701888020", "+254711345543"];

    for (key, number) in re.filter(numbers.clone(), false).unwrap() {
        println!("International #{}: {}", key, number);
    }
    for (key, number) in re.filter(numbers, true).unwrap() {
        println!("Local #{}: {}", key, number);
    }
}
