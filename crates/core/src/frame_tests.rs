// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn distinct_frame_instances_at_same_source_point_collapse() {
    let a = Frame::new("lib/foo.rb", 10, "Foo#bar");
    let b = Frame::new(String::from("lib/foo.rb"), 10, String::from("Foo#bar"));
    assert_eq!(LocationKey::from(&a), LocationKey::from(&b));
}

#[test]
fn different_line_does_not_collapse() {
    let a = Frame::new("lib/foo.rb", 10, "Foo#bar");
    let b = Frame::new("lib/foo.rb", 11, "Foo#bar");
    assert_ne!(LocationKey::from(&a), LocationKey::from(&b));
}

#[test]
fn printable_form_is_path_colon_line_colon_label() {
    let f = Frame::new("lib/foo.rb", 10, "Foo#bar");
    assert_eq!(LocationKey::from(&f).as_str(), "lib/foo.rb:10:Foo#bar");
}
